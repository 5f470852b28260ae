//! Loading documents from disk and the load error taxonomy.

use libmodel::{Library, LoadError};
use rstest::rstest;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::helpers::library_fixtures::{fixture, fixtures_dir, load_fixtures};

const SMALL_DOC: &str = r#"<?xml version="1.0"?>
<def format="2">
  <define name="LIMIT" value="16"/>
  <function name="f"><arg nr="1"/></function>
</def>"#;

#[test]
fn test_load_std_fixture() {
    let lib = load_fixtures(&["std.cfg"]);
    assert!(lib.has_function("strlen"));
    assert!(lib.has_function("std::strlen"));
    assert!(lib.defines().contains("EOF -1"));
    assert!(lib.defines().contains("NULL 0"));
    assert_eq!(lib.loaded_files().count(), 1);
}

#[test]
fn test_reloading_same_path_is_noop() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let path = dir.path().join("small.cfg");
    std::fs::write(&path, SMALL_DOC).unwrap();

    let mut once = Library::new();
    once.load_file(&path).unwrap();

    let mut twice = Library::new();
    twice.load_file(&path).unwrap();
    twice.load_file(&path).unwrap();
    twice
        .load_file(dir.path().join("sub").join("..").join("small.cfg"))
        .unwrap();

    assert_eq!(twice.loaded_files().count(), 1);
    assert_eq!(twice.defines(), once.defines());
    assert_eq!(twice.functions(), once.functions());
}

#[test]
fn test_same_text_from_str_is_not_deduplicated() {
    let mut lib = Library::new();
    lib.load_str(SMALL_DOC).unwrap();
    assert_eq!(
        lib.load_str(SMALL_DOC),
        Err(LoadError::DuplicateDefine("LIMIT".into()))
    );
}

#[test]
fn test_failed_load_is_not_recorded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("later.cfg");
    std::fs::write(&path, r#"<def format="9"/>"#).unwrap();

    let mut lib = Library::new();
    assert_eq!(
        lib.load_file(&path),
        Err(LoadError::UnsupportedFormatVersion("9".into()))
    );
    assert_eq!(lib.loaded_files().count(), 0);

    std::fs::write(&path, SMALL_DOC).unwrap();
    lib.load_file(&path).unwrap();
    assert!(lib.has_function("f"));
    assert_eq!(lib.loaded_files().count(), 1);
}

#[test]
fn test_missing_file() {
    let mut lib = Library::new();
    let result = lib.load_file(fixture("does-not-exist.cfg"));
    assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
}

fn error_kind(error: &LoadError) -> &'static str {
    match error {
        LoadError::FileNotFound { .. } => "FileNotFound",
        LoadError::BadXmlStructure(_) => "BadXmlStructure",
        LoadError::UnsupportedFormatVersion(_) => "UnsupportedFormatVersion",
        LoadError::MissingRequiredAttribute(_) => "MissingRequiredAttribute",
        LoadError::BadAttributeValue(_) => "BadAttributeValue",
        LoadError::DuplicateDefine(_) => "DuplicateDefine",
        LoadError::DuplicatePlatformType(_) => "DuplicatePlatformType",
        LoadError::PlatformTypeRedefined(_) => "PlatformTypeRedefined",
        LoadError::UnknownElement(_) => "UnknownElement",
    }
}

#[rstest]
#[case::mismatched_tags(r#"<def><function name="f"></def>"#, "BadXmlStructure")]
#[case::unclosed(r#"<def><function name="f">"#, "BadXmlStructure")]
#[case::empty_document("", "BadXmlStructure")]
#[case::wrong_root("<library/>", "UnsupportedFormatVersion")]
#[case::future_format(r#"<def format="3"/>"#, "UnsupportedFormatVersion")]
#[case::garbled_format(r#"<def format="two"/>"#, "UnsupportedFormatVersion")]
#[case::function_without_name("<def><function/></def>", "MissingRequiredAttribute")]
#[case::arg_without_nr(r#"<def><function name="f"><arg/></function></def>"#, "MissingRequiredAttribute")]
#[case::bad_range(
    r#"<def><function name="f"><arg nr="1"><valid>1:.5</valid></arg></function></def>"#,
    "BadAttributeValue"
)]
#[case::bad_arg_number(r#"<def><function name="f"><arg nr="first"/></function></def>"#, "BadAttributeValue")]
#[case::bad_buffer_size(r#"<def><memory><alloc buffer-size="huge">a</alloc></memory></def>"#, "BadAttributeValue")]
#[case::bad_warn_severity(
    r#"<def><function name="f"><warn severity="fatal">no</warn></function></def>"#,
    "BadAttributeValue"
)]
#[case::duplicate_define(
    r#"<def><define name="A" value="1"/><define name="A" value="1"/></def>"#,
    "DuplicateDefine"
)]
#[case::duplicate_platform_type(
    r#"<def><platformtype name="T" value="int"/><platformtype name="T" value="int"/></def>"#,
    "DuplicatePlatformType"
)]
#[case::redefined_platform_type(
    r#"<def><platformtype name="T" value="int"/><platformtype name="T" value="long"/></def>"#,
    "PlatformTypeRedefined"
)]
#[case::unknown_element("<def><bogus/></def>", "UnknownElement")]
fn test_load_error_taxonomy(#[case] source: &str, #[case] expected: &str) {
    let mut lib = Library::new();
    let error = lib.load_str(source).expect_err("load should fail");
    assert_eq!(error_kind(&error), expected, "{error}");
}

#[test]
fn test_unknown_elements_reported_together() {
    let mut lib = Library::new();
    let result = lib.load_str(
        r#"<def>
             <gadget/>
             <function name="f"><sparkle/></function>
             <define name="KEPT" value="1"/>
           </def>"#,
    );
    assert_eq!(
        result,
        Err(LoadError::UnknownElement(vec!["gadget".into(), "sparkle".into()]))
    );
    assert!(lib.has_function("f"));
    assert!(lib.defines().contains("KEPT 1"));
}

#[test]
fn test_every_fixture_loads() {
    let mut lib = Library::new();
    let mut count = 0;
    for entry in WalkDir::new(fixtures_dir()).sort_by_file_name() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "cfg") {
            lib.load_file(path)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
            count += 1;
        }
    }
    assert!(count >= 5);
    assert_eq!(lib.loaded_files().count(), count);
}

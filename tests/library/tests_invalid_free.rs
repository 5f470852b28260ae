//! Consumer pass: deallocating an offset address.

use libmodel::GroupId;
use libmodel::checks::{CheckSettings, Severity, check_invalid_free};
use libmodel::resolve::{CallResolver, SymbolMap};

use crate::helpers::library_fixtures::{STD, load_doc, tokens_with_vars};

const MALLOC_FREE: &str = r#"<def format="2">
  <memory>
    <alloc>malloc</alloc>
    <dealloc>free</dealloc>
  </memory>
</def>"#;

#[test]
fn test_offset_free_end_to_end() {
    let lib = load_doc(MALLOC_FREE);
    assert_eq!(lib.alloc_id_by_name("malloc"), GroupId::new(1));
    assert_eq!(lib.dealloc_id_by_name("free"), GroupId::new(1));

    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&lib, &symbols);
    let body = tokens_with_vars(
        "{ char * p = malloc ( 10 ) ; if ( p ) { free ( p + 1 ) ; } }",
        &["p"],
    );
    let diags = check_invalid_free(&resolver, &body, &CheckSettings::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].code.as_deref(), Some("invalidFree"));
    assert_eq!(
        &*diags[0].message,
        "Mismatching address is freed. The address you get from malloc() must be freed without offset."
    );
    assert_eq!(u32::from(diags[0].offset), 40);
}

#[test]
fn test_unknown_deallocator_is_ignored() {
    let lib = load_doc(MALLOC_FREE);
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&lib, &symbols);
    let body = tokens_with_vars("p = malloc ( 10 ) ; release ( p + 1 ) ;", &["p"]);
    assert!(check_invalid_free(&resolver, &body, &CheckSettings::default()).is_empty());
}

#[test]
fn test_std_fixture_pure_calls_keep_tracking() {
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&STD, &symbols);
    let settings = CheckSettings::default();

    let body = tokens_with_vars("p = malloc ( n ) ; x = strlen ( p ) ; free ( p + 4 ) ;", &["p", "n", "x"]);
    assert_eq!(check_invalid_free(&resolver, &body, &settings).len(), 1);

    let body = tokens_with_vars("p = malloc ( n ) ; memcpy ( p , q , n ) ; free ( p + 4 ) ;", &["p", "n", "q"]);
    assert!(check_invalid_free(&resolver, &body, &settings).is_empty());

    let body = tokens_with_vars("p = strdup ( s ) ; free ( p - 1 ) ;", &["p", "s"]);
    let diags = check_invalid_free(&resolver, &body, &settings);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("strdup()"));
}

#[test]
fn test_pointer_arithmetic_is_inconclusive() {
    let lib = load_doc(MALLOC_FREE);
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&lib, &symbols);
    let body = tokens_with_vars("p = malloc ( 8 ) ; p = p + 2 ; free ( p - 2 ) ;", &["p"]);

    assert!(check_invalid_free(&resolver, &body, &CheckSettings::default()).is_empty());
    let diags = check_invalid_free(&resolver, &body, &CheckSettings { inconclusive: true });
    assert_eq!(diags.len(), 1);
    assert!(diags[0].inconclusive);
}

#[test]
fn test_resource_deallocator_does_not_pair_with_heap() {
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&STD, &symbols);
    let settings = CheckSettings::default();
    assert_ne!(STD.alloc_id_by_name("malloc"), STD.dealloc_id_by_name("fclose"));

    let body = tokens_with_vars("p = malloc ( 10 ) ; fclose ( p + 1 ) ;", &["p"]);
    assert!(check_invalid_free(&resolver, &body, &settings).is_empty());

    let body = tokens_with_vars("f = fopen ( n , m ) ; fclose ( f + 1 ) ;", &["f", "n", "m"]);
    assert_eq!(check_invalid_free(&resolver, &body, &settings).len(), 1);
}

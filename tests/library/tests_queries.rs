//! Queries against the shared std/posix/qt fixtures.

use libmodel::library::{Direction, NoReturn, PodStdType, TypeCheck, UseRetVal, WarnSeverity};
use libmodel::resolve::{CallExpr, CallResolver, SymbolMap};

use crate::helpers::library_fixtures::STD;

fn with_resolver(f: impl FnOnce(CallResolver<'_, SymbolMap>)) {
    let symbols = SymbolMap::new();
    f(CallResolver::new(&STD, &symbols));
}

#[test]
fn test_name_based_function_queries() {
    assert!(STD.is_leak_ignore("strlen"));
    assert!(STD.is_function_const_name("strlen", true));
    assert!(!STD.is_function_const_name("strlen", false));
    assert!(!STD.is_leak_ignore("exit"));
    assert_eq!(
        STD.function_by_name("exit").and_then(|f| f.noreturn),
        Some(NoReturn::True)
    );
    assert_eq!(
        STD.function_by_name("strlen").map(|f| f.use_retval),
        Some(UseRetVal::Default)
    );
}

#[test]
fn test_qualified_and_global_spellings() {
    with_resolver(|resolver| {
        for name in ["strlen", "std::strlen", "::strlen"] {
            let call = CallExpr::named(name, 1);
            assert!(resolver.function(&call).is_some(), "{name}");
            assert!(resolver.is_null_arg_bad(&call, 1), "{name}");
        }
        assert_eq!(
            resolver.return_value_type(&CallExpr::named("strlen", 1)),
            Some("size_t")
        );
    });
}

#[test]
fn test_noreturn_queries() {
    with_resolver(|resolver| {
        assert!(resolver.is_noreturn(&CallExpr::named("exit", 1)));
        assert!(resolver.is_noreturn(&CallExpr::named("pthread_exit", 1)));
        assert!(resolver.is_noreturn(&CallExpr::named("qFatal", 3)));
        assert!(resolver.is_not_noreturn(&CallExpr::named("memcpy", 3)));
        assert!(!resolver.is_noreturn(&CallExpr::named("memcpy", 3)));
        assert!(!resolver.is_noreturn(&CallExpr::named("user_function", 0)));
        assert!(!resolver.is_not_noreturn(&CallExpr::named("user_function", 0)));
    });
}

#[test]
fn test_memcpy_contract() {
    with_resolver(|resolver| {
        let call = CallExpr::named("memcpy", 3);
        assert_eq!(resolver.arg_direction(&call, 1, 0), Direction::Out);
        assert_eq!(resolver.arg_direction(&call, 2, 0), Direction::In);
        assert!(resolver.is_uninit_arg_bad(&call, 2, 0));
        assert!(!resolver.is_uninit_arg_bad(&call, 1, 0));
        assert!(resolver.has_minsize(&call));
        assert!(resolver.is_int_arg_valid(&call, 3, 0));
        assert!(!resolver.is_int_arg_valid(&call, 3, -1));
        assert_eq!(resolver.return_value(&call), Some("arg1"));

        let overlap = resolver.non_overlapping_data(&call).unwrap();
        assert_eq!((overlap.ptr1_arg, overlap.ptr2_arg, overlap.size_arg), (1, 2, 3));
        assert_eq!(overlap.strlen_arg, -1);
    });
}

#[test]
fn test_format_string_functions() {
    with_resolver(|resolver| {
        let printf = CallExpr::named("printf", 4);
        assert!(resolver.formatstr_function(&printf));
        assert_eq!(resolver.formatstr_argno(&printf), Some(1));
        assert_eq!(resolver.arg_direction(&printf, 3, 0), Direction::In);

        let sscanf = CallExpr::named("sscanf", 4);
        assert!(resolver.formatstr_scan(&sscanf));
        assert_eq!(resolver.formatstr_argno(&sscanf), Some(2));
        assert_eq!(resolver.arg_direction(&sscanf, 3, 0), Direction::Out);
        assert_eq!(resolver.arg_direction(&sscanf, 1, 0), Direction::In);
        assert!(resolver.is_null_arg_bad(&sscanf, 4));

        assert!(resolver.function(&CallExpr::named("sscanf", 1)).is_none());
    });
}

#[test]
fn test_value_ranges_through_calls() {
    with_resolver(|resolver| {
        let isalpha = CallExpr::named("isalpha", 1);
        assert!(resolver.is_int_arg_valid(&isalpha, 1, 255));
        assert!(!resolver.is_int_arg_valid(&isalpha, 1, 256));

        let strtol = CallExpr::named("strtol", 3);
        assert!(resolver.is_int_arg_valid(&strtol, 3, 0));
        assert!(resolver.is_int_arg_valid(&strtol, 3, 16));
        assert!(!resolver.is_int_arg_valid(&strtol, 3, 1));
        assert!(!resolver.is_int_arg_valid(&strtol, 3, 37));

        let sqrt = CallExpr::named("sqrt", 1);
        assert!(resolver.is_float_arg_valid(&sqrt, 1, 2.25));
        assert!(!resolver.is_float_arg_valid(&sqrt, 1, -1.0));
        assert_eq!(resolver.return_value(&sqrt), Some("sqrt(arg1)"));
    });
}

#[test]
fn test_warnings() {
    with_resolver(|resolver| {
        let warn = resolver.warn_info(&CallExpr::named("gets", 1)).unwrap();
        assert_eq!(warn.severity, WarnSeverity::Warning);
        assert_eq!(
            warn.message,
            "Obsolete function 'gets' called. It is recommended to use 'fgets' or 'std::fgets' instead."
        );
        assert!(
            resolver
                .warn_info(&CallExpr::named("std::gets", 1))
                .is_some_and(|w| w.message.contains("'std::gets'"))
        );
    });
    assert_eq!(STD.function_warnings().count(), 2);
}

#[test]
fn test_optional_trailing_argument() {
    with_resolver(|resolver| {
        assert!(resolver.function(&CallExpr::named("QObject::connect", 4)).is_some());
        assert!(resolver.function(&CallExpr::named("QObject::connect", 5)).is_some());
        assert!(resolver.function(&CallExpr::named("QObject::connect", 3)).is_none());
        assert!(resolver.function(&CallExpr::named("connect", 4)).is_none());
    });
}

#[test]
fn test_type_tables() {
    let int8 = STD.podtype("int8_t").unwrap();
    assert_eq!((int8.size, int8.sign), (1, Some('s')));
    assert_eq!(int8.std_type, PodStdType::default());
    assert_eq!(STD.podtype("std::uint16_t").map(|p| p.size), Some(2));

    let dword = STD.platform_type("DWORD", "win64").unwrap();
    assert_eq!(dword.type_name, "long");
    assert!(dword.unsigned);
    assert!(STD.platform_type("DWORD", "unix64").is_none());

    assert_eq!(STD.type_check("unusedvar", "std::lock_guard"), TypeCheck::Suppress);
    assert_eq!(STD.type_check("unusedvar", "std::string"), TypeCheck::Check);
    assert_eq!(STD.type_check("unusedvar", "int"), TypeCheck::Default);
}

#[test]
fn test_entrypoints_reflection_and_markup() {
    assert!(STD.is_entrypoint("main"));
    assert!(STD.is_entrypoint("_start"));
    assert!(!STD.is_entrypoint("start"));

    assert!(STD.is_reflection("invokeMethod"));
    assert_eq!(STD.reflection_argument("invokeMethod"), Some(2));

    assert!(STD.is_markup_file("ui/Main.QML"));
    assert!(!STD.report_errors("ui/Main.qml"));
    assert!(STD.process_markup_after_code("ui/Main.qml"));
    assert!(STD.report_errors("main.c"));
    assert!(STD.is_markup_keyword("Main.qml", "while"));
    assert!(STD.is_importer("Main.qml", "connect"));
    assert!(STD.is_executable_block("Main.qml", "onClicked"));
    assert_eq!(STD.block_start("Main.qml"), Some("{"));
    assert_eq!(STD.block_end("Main.qml"), Some("}"));
    assert_eq!(STD.block_start_offset("Main.qml"), Some(3));
    assert!(STD.is_exporter("Q_PROPERTY"));
    assert!(STD.is_exported_suffix("Q_PROPERTY", "READ"));
    assert!(STD.is_exported_prefix("Q_PROPERTY", "WRITE"));
    assert!(!STD.is_exported_prefix("Q_PROPERTY", "READ"));
}

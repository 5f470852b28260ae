//! Container, iterator and smart pointer detection.

use libmodel::library::{Action, DetectMode, Yield};
use libmodel::resolve::{CallExpr, CallResolver, Expr, SymbolMap, Variable};
use libmodel::token::TokenList;
use rstest::rstest;

use crate::helpers::library_fixtures::{STD, load_doc};

#[rstest]
#[case::exact_name("Foo < int > )", Some("Foo"))]
#[case::longer_name("FooBar < int > )", None)]
#[case::nested_argument("Foo < Bar < int > > )", Some("Foo"))]
#[case::wrong_suffix("Foo < int > ;", None)]
fn test_start_and_end_patterns(#[case] source: &str, #[case] expected: Option<&str>) {
    let lib = load_doc(r#"<def><container id="Foo" startPattern="Foo &lt;" endPattern="&gt; )"/></def>"#);
    let tokens = TokenList::tokenize(source);
    assert_eq!(lib.detect_container(&tokens).map(|d| d.id), expected);
}

#[test]
fn test_std_fixture_detection() {
    let vector = TokenList::tokenize("std :: vector < int > v ;");
    let found = STD.detect_container(&vector).unwrap();
    assert_eq!(found.id, "stdVector");
    assert!(!found.is_iterator);

    let iterator = TokenList::tokenize("std :: vector < int > :: iterator it ;");
    assert!(STD.detect_container(&iterator).is_none());
    let found = STD.detect_iterator(&iterator).unwrap();
    assert_eq!(found.id, "stdVector");
    assert!(found.is_iterator);
    let both = STD.detect(&iterator, DetectMode::Both, false).unwrap();
    assert!(both.is_iterator);

    let unqualified = TokenList::tokenize("vector < int > v ;");
    assert!(STD.detect_container(&unqualified).is_none());
    assert_eq!(
        STD.detect_container_or_iterator(&unqualified, true).map(|d| d.id),
        Some("stdVector")
    );

    let string = TokenList::tokenize("std :: string s ;");
    assert_eq!(STD.detect_container(&string).map(|d| d.id), Some("stdString"));
    let nested = TokenList::tokenize("std :: string :: npos");
    assert!(STD.detect_container(&nested).is_none());

    // The base descriptor has no start pattern of its own.
    let list = TokenList::tokenize("std :: list < int > l ;");
    assert!(STD.detect_container(&list).is_none());
}

#[test]
fn test_first_loaded_descriptor_wins() {
    let lib = load_doc(
        r#"<def>
             <container id="first" startPattern="Pair &lt;" endPattern="&gt; !!::"/>
             <container id="second" startPattern="Pair &lt;" endPattern="&gt;"/>
           </def>"#,
    );
    let tokens = TokenList::tokenize("Pair < int > p");
    assert_eq!(lib.detect_container(&tokens).map(|d| d.id), Some("first"));
}

#[test]
fn test_inherited_descriptor_members() {
    let vector = STD.container("stdVector").unwrap();
    assert_eq!(vector.yield_of("size"), Yield::Size);
    assert_eq!(vector.yield_of("front"), Yield::Item);
    assert_eq!(vector.action_of("push_back"), Action::Push);
    assert_eq!(vector.return_type_of("data"), Some("$T*"));
    assert_eq!(vector.type_template_arg, 0);
    assert!(vector.array_like_index_op);
    assert_eq!(vector.yield_of("missing"), Yield::NoYield);

    let base = STD.container("stdAllStdContainer").unwrap();
    assert!(base.return_type_of("data").is_none());
    assert!(!base.array_like_index_op);

    let string = STD.container("stdString").unwrap();
    assert!(string.std_string_like);
    assert_eq!(string.yield_of("c_str"), Yield::BufferNt);
}

#[test]
fn test_container_member_calls() {
    let mut symbols = SymbolMap::new();
    symbols
        .variable(
            "v",
            Variable {
                type_name: "std::vector".into(),
                container: Some("stdVector".into()),
                ..Variable::default()
            },
        )
        .variable(
            "s",
            Variable {
                type_name: "std::string".into(),
                container: Some("stdString".into()),
                ..Variable::default()
            },
        );
    let resolver = CallResolver::new(&STD, &symbols);

    let size = CallExpr::new(Expr::member(Expr::name("v"), "size"), vec![]);
    assert_eq!(resolver.container_yield(&size), Yield::Size);
    assert!(resolver.is_function_const(&size));

    let push = CallExpr::new(Expr::member(Expr::name("v"), "push_back"), vec![Expr::name("x")]);
    assert_eq!(resolver.container_action(&push), Action::Push);
    assert!(!resolver.is_function_const(&push));

    let data = CallExpr::new(Expr::member(Expr::name("v"), "data"), vec![]);
    assert_eq!(resolver.return_value_type(&data), Some("$T*"));

    let c_str = CallExpr::new(Expr::member(Expr::name("s"), "c_str"), vec![]);
    assert!(resolver.is_function_const(&c_str));

    let free_function = CallExpr::named("size", 0);
    assert_eq!(resolver.container_yield(&free_function), Yield::NoYield);
}

#[test]
fn test_smart_pointers() {
    let unique = TokenList::tokenize("std :: unique_ptr < int > p ;");
    assert!(STD.detect_smart_pointer(&unique, false).is_some_and(|sp| sp.unique));
    assert!(STD.is_smart_pointer(&unique));

    let shared = TokenList::tokenize("shared_ptr < int > p ;");
    assert!(!STD.is_smart_pointer(&shared));
    assert!(STD.detect_smart_pointer(&shared, true).is_some_and(|sp| !sp.unique));
}

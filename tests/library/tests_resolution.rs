//! Callee resolution: the gate, arity matching and base-class fallback.

use libmodel::resolve::{
    CallExpr, CallResolver, DeclScope, Declaration, Expr, Ident, ScopeId, SymbolMap, Variable,
};
use libmodel::token::TokenList;
use rstest::rstest;

use crate::helpers::library_fixtures::{STD, load_doc, tokens_with_vars};

const ARITY_DOC: &str = r#"<def>
  <function name="exact"><arg nr="1"/><arg nr="2"/><arg nr="3"/></function>
  <function name="trailing"><arg nr="1"/><arg nr="2"/><arg nr="3" default="0"/></function>
  <function name="variadic"><arg nr="1"/><arg nr="variadic"/></function>
  <function name="nullary"/>
</def>"#;

#[rstest]
#[case::exact_two("exact", 2, false)]
#[case::exact_three("exact", 3, true)]
#[case::exact_four("exact", 4, false)]
#[case::trailing_one("trailing", 1, false)]
#[case::trailing_two("trailing", 2, true)]
#[case::trailing_three("trailing", 3, true)]
#[case::trailing_four("trailing", 4, false)]
#[case::variadic_zero("variadic", 0, false)]
#[case::variadic_one("variadic", 1, true)]
#[case::variadic_many("variadic", 7, true)]
#[case::nullary_zero("nullary", 0, true)]
#[case::nullary_one("nullary", 1, false)]
fn test_arity_matching(#[case] name: &str, #[case] count: usize, #[case] expected: bool) {
    let lib = load_doc(ARITY_DOC);
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&lib, &symbols);
    assert_eq!(
        resolver.function(&CallExpr::named(name, count)).is_some(),
        expected,
        "{name} with {count} arguments"
    );
    assert_eq!(resolver.is_not_library_function(&CallExpr::named(name, count)), !expected);
}

const CLASS_DOC: &str = r#"<def>
  <function name="A::f"><noreturn>false</noreturn></function>
  <function name="A::g"><arg nr="1"/></function>
</def>"#;

fn class_symbols() -> SymbolMap {
    let mut symbols = SymbolMap::new();
    symbols
        .scope(ScopeId(1), &["B"])
        .class("B", &["A"])
        .variable(
            "b",
            Variable {
                type_name: "B".into(),
                ..Variable::default()
            },
        )
        .variable(
            "pb",
            Variable {
                type_name: "B".into(),
                pointer: true,
                ..Variable::default()
            },
        );
    symbols
}

#[test]
fn test_member_call_falls_back_to_base() {
    let lib = load_doc(CLASS_DOC);
    let symbols = class_symbols();
    let resolver = CallResolver::new(&lib, &symbols);

    let call = CallExpr::new(Expr::member(Expr::name("b"), "f"), vec![]);
    assert_eq!(resolver.callee_name(&call).as_deref(), Some("A::f"));
    assert!(resolver.is_not_noreturn(&call));

    let through_pointer = CallExpr::new(Expr::arrow(Expr::name("pb"), "f"), vec![]);
    assert_eq!(resolver.callee_name(&through_pointer).as_deref(), Some("A::f"));

    let wrong_operator = CallExpr::new(Expr::member(Expr::name("pb"), "f"), vec![]);
    assert_eq!(resolver.callee_name(&wrong_operator), None);
}

#[test]
fn test_own_declaration_shadows_base() {
    let mut lib = load_doc(CLASS_DOC);
    lib.load_str(r#"<def><function name="B::f"/></def>"#).unwrap();
    let symbols = class_symbols();
    let resolver = CallResolver::new(&lib, &symbols);

    let call = CallExpr::new(Expr::member(Expr::name("b"), "f"), vec![]);
    assert_eq!(resolver.callee_name(&call).as_deref(), Some("B::f"));
}

#[test]
fn test_unqualified_call_inside_class_scope() {
    let lib = load_doc(CLASS_DOC);
    let symbols = class_symbols();
    let resolver = CallResolver::new(&lib, &symbols);

    let inside = CallExpr::named("g", 1).in_scope(ScopeId(1));
    assert_eq!(resolver.callee_name(&inside).as_deref(), Some("A::g"));
    assert!(resolver.function(&inside).is_some());

    // Base candidates must match the call's arity.
    let wrong_arity = CallExpr::named("g", 2).in_scope(ScopeId(1));
    assert_eq!(resolver.callee_name(&wrong_arity).as_deref(), Some("g"));
    assert!(resolver.function(&wrong_arity).is_none());

    let outside = CallExpr::named("g", 1);
    assert_eq!(resolver.callee_name(&outside).as_deref(), Some("g"));
}

#[test]
fn test_gate_rejections() {
    let lib = load_doc(CLASS_DOC);
    let symbols = class_symbols();
    let resolver = CallResolver::new(&lib, &symbols);

    let keyword = CallExpr::named("sizeof", 1);
    assert!(keyword.callee_ident().is_some_and(|ident| ident.is_keyword));
    assert!(resolver.is_not_library_function(&keyword));

    let standard_type = CallExpr::named("int", 1);
    assert!(resolver.is_not_library_function(&standard_type));

    let nested = Ident::new("g").with_declaration(Declaration {
        scope: DeclScope::Nested,
        is_const: false,
        is_noreturn: false,
    });
    let own_method = CallExpr::new(Expr::Name(nested), vec![Expr::name("x")]).in_scope(ScopeId(1));
    assert!(resolver.is_not_library_function(&own_method));
}

#[test]
fn test_calls_from_tokens() {
    let tokens: TokenList = tokens_with_vars("n = std :: strlen ( s ) + printf ( \"%d\" , n , m ) ;", &["n", "s", "m"]);
    let symbols = SymbolMap::new();
    let resolver = CallResolver::new(&STD, &symbols);

    let strlen = CallExpr::from_tokens(&tokens, 4).unwrap();
    assert_eq!(strlen.arg_count(), 1);
    assert_eq!(resolver.callee_name(&strlen).as_deref(), Some("std::strlen"));
    assert!(resolver.function(&strlen).is_some());

    let printf = CallExpr::from_tokens(&tokens, 9).unwrap();
    assert_eq!(printf.arg_count(), 3);
    assert!(resolver.formatstr_function(&printf));

    // `n` carries a variable id, so it is never a library call.
    let variable = Ident::from(tokens.get(0).unwrap());
    assert!(variable.var_id.is_some());
}

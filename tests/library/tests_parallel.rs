//! Independent per-run copies of one loaded library.

use libmodel::resolve::{CallExpr, CallResolver, SymbolMap};
use rayon::prelude::*;

use crate::helpers::library_fixtures::STD;

#[test]
fn test_clones_are_independent() {
    let runs: Vec<usize> = (0..8)
        .into_par_iter()
        .map(|run| {
            let mut lib = STD.clone();
            lib.load_str(&format!(r#"<def><define name="RUN_{run}" value="{run}"/></def>"#))
                .unwrap();
            lib.defines().iter().filter(|d| d.starts_with("RUN_")).count()
        })
        .collect();
    assert!(runs.iter().all(|&count| count == 1));
    assert!(!STD.defines().iter().any(|d| d.starts_with("RUN_")));
}

#[test]
fn test_shared_store_answers_concurrent_queries() {
    let names = ["strlen", "std::strlen", "memcpy", "printf", "exit"];
    let arities = [1, 1, 3, 2, 1];
    let resolved = names
        .par_iter()
        .zip(arities.par_iter())
        .filter(|&(name, &arity)| {
            let symbols = SymbolMap::new();
            let resolver = CallResolver::new(&STD, &symbols);
            resolver.function(&CallExpr::named(name, arity)).is_some()
        })
        .count();
    assert_eq!(resolved, names.len());
}

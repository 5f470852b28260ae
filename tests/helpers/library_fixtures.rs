//! Library documents under `tests/fixtures`.

use std::path::PathBuf;

use libmodel::Library;
use libmodel::token::{TokenList, VarId};
use once_cell::sync::Lazy;

/// std, posix and qt fixtures loaded once and shared read-only.
pub static STD: Lazy<Library> = Lazy::new(|| load_fixtures(&["std.cfg", "posix.cfg", "qt.cfg"]));

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Load the named fixtures in order into a fresh library.
pub fn load_fixtures(names: &[&str]) -> Library {
    let mut lib = Library::new();
    for name in names {
        lib.load_file(fixture(name))
            .unwrap_or_else(|e| panic!("failed to load {name}: {e}"));
    }
    lib
}

/// Load an inline document into a fresh library.
pub fn load_doc(source: &str) -> Library {
    let mut lib = Library::new();
    lib.load_str(source)
        .unwrap_or_else(|e| panic!("failed to load document: {e}"));
    lib
}

/// Tokenize `source` and number the listed variables from 1.
pub fn tokens_with_vars(source: &str, vars: &[&str]) -> TokenList {
    let mut tokens = TokenList::tokenize(source);
    for (n, var) in vars.iter().enumerate() {
        tokens.mark_variable(var, VarId(n as u32 + 1));
    }
    tokens
}

//! Name list and qualified-name helpers.

/// Split a comma separated name list (`"malloc,calloc"`) into its names.
///
/// Empty entries are dropped, so `""` yields no names at all.
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a qualifier and a name with `::`.
pub fn join_qualified(qualifier: &str, name: &str) -> String {
    let mut joined = String::with_capacity(qualifier.len() + name.len() + 2);
    joined.push_str(qualifier);
    joined.push_str("::");
    joined.push_str(name);
    joined
}

/// Remove a leading global-scope `::` from a qualified name.
pub fn strip_global_qualifier(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}

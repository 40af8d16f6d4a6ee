//! Common utility functions shared across the codebase.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the trailing element of a Go import path, skipping a `/vN`
/// major-version element and a gopkg.in style `.vN` suffix.
static IMPORT_PATH_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)([^/]+?)(?:\.v\d+)?(?:/v\d+)?$").expect("valid import path regex")
});

/// Guesses the package name Go code uses for an import path when it is
/// imported without an explicit alias.
///
/// # Examples
///
/// ```
/// use optguard::utils::go_package_name;
///
/// assert_eq!(go_package_name("github.com/uptrace/bun"), "bun");
/// assert_eq!(go_package_name("github.com/jackc/pgx/v5"), "pgx");
/// assert_eq!(go_package_name("gopkg.in/yaml.v3"), "yaml");
/// assert_eq!(go_package_name("github.com/go-chi/chi"), "chi");
/// assert_eq!(go_package_name("context"), "context");
/// ```
pub fn go_package_name(import_path: &str) -> String {
    let tail = IMPORT_PATH_TAIL
        .captures(import_path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(import_path);

    let name = tail.strip_prefix("go-").unwrap_or(tail);
    name.replace(['-', '.'], "_")
}

/// Checks if the text is a valid Go identifier (ASCII subset).
///
/// # Examples
///
/// ```
/// use optguard::utils::is_go_identifier;
///
/// assert!(is_go_identifier("NewUpdate"));
/// assert!(is_go_identifier("_exec2"));
/// assert!(!is_go_identifier("2exec"));
/// assert!(!is_go_identifier("Exec()"));
/// assert!(!is_go_identifier(""));
/// ```
pub fn is_go_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

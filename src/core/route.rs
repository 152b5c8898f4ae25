//! Path handling for the gallery shell.
//!
//! The overview lives at the base path (default `/`). Example pages live at
//! `{base}examples/{id}`. Any path maps back to an identifier through its last
//! segment, so the overview maps to `""`.

/// Directory segment example pages are mounted under.
pub const EXAMPLES_SEGMENT: &str = "examples";

/// Ensures a base path starts and ends with `/`.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Joins `path` onto the base path.
pub fn relative_path(base: &str, path: &str) -> String {
    format!("{}{}", normalize_base(base), path.trim_start_matches('/'))
}

/// Path of an example page.
pub fn example_path(base: &str, id: &str) -> String {
    relative_path(base, &format!("{EXAMPLES_SEGMENT}/{id}"))
}

/// Last path segment, ignoring trailing slashes.
pub fn identifier_from_path(pathname: &str) -> &str {
    pathname
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
}

pub fn is_overview(pathname: &str, base: &str) -> bool {
    normalize_base(pathname) == normalize_base(base)
}

/// Whether the fullscreen controls are shown at `pathname`.
pub fn controls_visible(pathname: &str, base: &str) -> bool {
    !is_overview(pathname, base)
}

//! Identifier alphabet accepted by the interface description.

use std::sync::OnceLock;

use regex::Regex;

static IDENT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn ident_pattern() -> &'static Regex {
    IDENT_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"))
}

/// Check that `name` is a C identifier (`[A-Za-z_][A-Za-z0-9_]*`).
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    ident_pattern().is_match(name)
}

/// Check that a library name can be embedded in a quoted string literal.
#[must_use]
pub fn is_library_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_control() || matches!(c, '"' | '\'' | '\\'))
}

//! Recognizers for C literal text shared by the back-ends.

use std::sync::OnceLock;

use regex::Regex;

static FLOAT_PATTERN: OnceLock<Regex> = OnceLock::new();
static CHAR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn float_pattern() -> &'static Regex {
    FLOAT_PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)[fFlL]?$")
            .expect("float pattern")
    })
}

fn char_pattern() -> &'static Regex {
    CHAR_PATTERN
        .get_or_init(|| Regex::new(r#"^'(?:[^'\\]|\\[nrt0'"\\])'$"#).expect("char pattern"))
}

/// Decimal floating literal without its C suffix (`1.5f` gives `1.5`).
///
/// Hex floats are rejected.
#[must_use]
pub fn float_body(text: &str) -> Option<&str> {
    let captures = float_pattern().captures(text)?;
    captures.get(1).map(|m| m.as_str())
}

/// A single-character literal (`'a'`, `'\n'`) with escapes both Java and
/// Python understand.
#[must_use]
pub fn is_char_literal(text: &str) -> bool {
    char_pattern().is_match(text)
}

/// Boolean literal.
#[must_use]
pub fn bool_value(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Null pointer literal.
#[must_use]
pub fn is_null_pointer(text: &str) -> bool {
    matches!(text, "0" | "NULL" | "nullptr" | "((void*)0)" | "((void *)0)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_body() {
        assert_eq!(float_body("1.5f"), Some("1.5"));
        assert_eq!(float_body("-2.0"), Some("-2.0"));
        assert_eq!(float_body("1e10"), Some("1e10"));
        assert_eq!(float_body(".5"), Some(".5"));
        assert_eq!(float_body("3."), Some("3."));
        assert_eq!(float_body("0x1p3"), None);
        assert_eq!(float_body("abc"), None);
    }

    #[test]
    fn test_char_literal() {
        assert!(is_char_literal("'a'"));
        assert!(is_char_literal(r"'\n'"));
        assert!(is_char_literal(r"'\''"));
        assert!(!is_char_literal("'ab'"));
        assert!(!is_char_literal(r"U'\U0001F600'"));
        assert!(!is_char_literal(r"'\x41'"));
    }

    #[test]
    fn test_bool_and_null() {
        assert_eq!(bool_value("true"), Some(true));
        assert_eq!(bool_value("1"), None);
        assert!(is_null_pointer("NULL"));
        assert!(!is_null_pointer("1"));
    }
}

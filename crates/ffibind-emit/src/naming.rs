//! Identifier conventions per back-end.
//!
//! Translation is total: every identifier the IR accepts maps to a non-empty
//! host identifier. Reserved words get a trailing underscore.

use rustc_hash::FxHashMap;

use crate::error::{EmitError, Result};

/// Case convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Casing {
    /// Keep the native spelling.
    Preserve,
    /// `ExportMe`
    PascalCase,
    /// `exportMe`
    CamelCase,
    /// `export_me`
    SnakeCase,
    /// `EXPORT_ME`
    ScreamingSnakeCase,
}

impl Casing {
    /// Apply the convention to a native identifier.
    ///
    /// Leading underscores are kept. Word boundaries are underscores and
    /// lower-to-upper transitions; the interior of a word keeps its case for
    /// the mixed-case conventions so acronyms survive (`HTTP_server` becomes
    /// `HTTPServer`).
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        let body = name.trim_start_matches('_');
        let prefix = &name[..name.len() - body.len()];
        let words = split_words(body);

        let mut out = String::with_capacity(name.len() + 4);
        out.push_str(prefix);
        match self {
            Self::Preserve => out.push_str(body),
            Self::PascalCase => {
                for word in &words {
                    push_capitalized(&mut out, word);
                }
            }
            Self::CamelCase => {
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        push_uncapitalized(&mut out, word);
                    } else {
                        push_capitalized(&mut out, word);
                    }
                }
            }
            Self::SnakeCase => out.push_str(&words.join("_").to_lowercase()),
            Self::ScreamingSnakeCase => out.push_str(&words.join("_").to_uppercase()),
        }

        if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
            out.insert(0, '_');
        }
        out
    }
}

fn split_words(body: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for segment in body.split('_').filter(|s| !s.is_empty()) {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (i, c) in segment.char_indices() {
            if let Some(p) = prev
                && c.is_ascii_uppercase()
                && (p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                words.push(&segment[start..i]);
                start = i;
            }
            prev = Some(c);
        }
        words.push(&segment[start..]);
    }
    words
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
}

fn push_uncapitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_lowercase());
        out.push_str(chars.as_str());
    }
}

/// Kind of identifier being translated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentKind {
    Type,
    Function,
    Field,
    Constant,
    Variant,
    Param,
}

/// Naming rules of one back-end.
#[derive(Clone, Debug)]
pub struct NamingPolicy {
    pub types: Casing,
    pub functions: Casing,
    pub fields: Casing,
    pub constants: Casing,
    pub variants: Casing,
    pub params: Casing,
    /// Appended to a struct's type name for its by-reference declaration.
    pub reference_suffix: &'static str,
    /// Enums also get a by-reference declaration.
    pub enum_references: bool,
    /// Types, functions and constants live in one scope.
    pub shared_namespace: bool,
    /// Words that cannot be used as identifiers.
    pub reserved: &'static [&'static str],
}

impl NamingPolicy {
    #[must_use]
    pub const fn casing(&self, kind: IdentKind) -> Casing {
        match kind {
            IdentKind::Type => self.types,
            IdentKind::Function => self.functions,
            IdentKind::Field => self.fields,
            IdentKind::Constant => self.constants,
            IdentKind::Variant => self.variants,
            IdentKind::Param => self.params,
        }
    }

    /// Host identifier for a native name.
    #[must_use]
    pub fn ident(&self, kind: IdentKind, name: &str) -> String {
        self.escape(self.casing(kind).apply(name))
    }

    /// Name of a struct's by-value declaration.
    #[must_use]
    pub fn value_type_name(&self, name: &str) -> String {
        self.ident(IdentKind::Type, name)
    }

    /// Name of a type's by-reference declaration.
    #[must_use]
    pub fn reference_type_name(&self, name: &str) -> String {
        let base = self.casing(IdentKind::Type).apply(name);
        self.escape(format!("{base}{}", self.reference_suffix))
    }

    /// Escape reserved words with a trailing underscore.
    #[must_use]
    pub fn escape(&self, ident: String) -> String {
        if self.reserved.contains(&ident.as_str()) {
            format!("{ident}_")
        } else {
            ident
        }
    }
}

/// One host-language scope, used to detect identifiers that collide after
/// translation.
pub struct Scope {
    backend: &'static str,
    names: FxHashMap<String, String>,
}

impl Scope {
    pub(crate) fn new(backend: &'static str) -> Self {
        Self {
            backend,
            names: FxHashMap::default(),
        }
    }

    /// Claim `host` for the native item `native`.
    pub(crate) fn claim(&mut self, host: &str, native: &str) -> Result<()> {
        if let Some(first) = self.names.get(host) {
            return Err(EmitError::NameCollision {
                backend: self.backend,
                name: host.to_string(),
                first: first.clone(),
                second: native.to_string(),
            });
        }
        self.names.insert(host.to_string(), native.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(Casing::PascalCase.apply("export_me"), "ExportMe");
        assert_eq!(Casing::PascalCase.apply("ExportMe"), "ExportMe");
        assert_eq!(Casing::PascalCase.apply("export_me_2"), "ExportMe2");
        assert_eq!(Casing::PascalCase.apply("ExportMe2"), "ExportMe2");
        assert_eq!(Casing::PascalCase.apply("HTTP_server"), "HTTPServer");
        assert_eq!(Casing::PascalCase.apply("_private_thing"), "_PrivateThing");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(Casing::CamelCase.apply("export_me"), "exportMe");
        assert_eq!(Casing::CamelCase.apply("ExportMe"), "exportMe");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(Casing::SnakeCase.apply("ExportMe"), "export_me");
        assert_eq!(Casing::SnakeCase.apply("exportMe2Now"), "export_me2_now");
        assert_eq!(Casing::SnakeCase.apply("already_snake"), "already_snake");
    }

    #[test]
    fn test_screaming_snake_case() {
        let screaming = Casing::ScreamingSnakeCase;
        assert_eq!(screaming.apply("maxSize"), "MAX_SIZE");
        assert_eq!(screaming.apply("EXPORT_ME_TOO"), "EXPORT_ME_TOO");
    }

    #[test]
    fn test_casing_is_total() {
        for casing in [
            Casing::Preserve,
            Casing::PascalCase,
            Casing::CamelCase,
            Casing::SnakeCase,
            Casing::ScreamingSnakeCase,
        ] {
            for name in ["_", "__", "a", "_1", "x_", "A__B"] {
                let out = casing.apply(name);
                assert!(!out.is_empty(), "{casing:?} {name}");
                let leading_digit = out.starts_with(|c: char| c.is_ascii_digit());
                assert!(!leading_digit, "{casing:?} {name}");
            }
        }
    }

    fn policy() -> NamingPolicy {
        NamingPolicy {
            types: Casing::PascalCase,
            functions: Casing::Preserve,
            fields: Casing::Preserve,
            constants: Casing::Preserve,
            variants: Casing::Preserve,
            params: Casing::Preserve,
            reference_suffix: "ByReference",
            enum_references: true,
            shared_namespace: false,
            reserved: &["class", "int"],
        }
    }

    #[test]
    fn test_escape_reserved() {
        let policy = policy();
        assert_eq!(policy.ident(IdentKind::Field, "class"), "class_");
        assert_eq!(policy.ident(IdentKind::Field, "klass"), "klass");
        assert_eq!(policy.ident(IdentKind::Param, "int"), "int_");
    }

    #[test]
    fn test_type_names() {
        let policy = policy();
        assert_eq!(policy.value_type_name("export_me"), "ExportMe");
        assert_eq!(
            policy.reference_type_name("export_me"),
            "ExportMeByReference"
        );
    }

    #[test]
    fn test_scope_collision() {
        let mut scope = Scope::new("test");
        scope.claim("FooBar", "foo_bar").unwrap();
        let err = scope.claim("FooBar", "FooBar").unwrap_err();
        assert!(matches!(
            err,
            EmitError::NameCollision { ref name, ref first, ref second, .. }
                if name == "FooBar" && first == "foo_bar" && second == "FooBar"
        ));
    }
}

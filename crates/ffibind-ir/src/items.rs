//! Exported items: structures, functions, constants and enums.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::literal::Literal;
use crate::types::NativeType;

/// How a structure crosses the FFI boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassingMode {
    /// Independent copy owned by the host.
    ByValue,
    /// Handle aliasing native memory.
    ByReference,
}

impl fmt::Display for PassingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByValue => f.write_str("by-value"),
            Self::ByReference => f.write_str("by-reference"),
        }
    }
}

/// Set of passing modes a structure supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<PassingMode>", into = "Vec<PassingMode>")]
pub struct PassingModes {
    by_value: bool,
    by_reference: bool,
}

impl PassingModes {
    pub const NONE: Self = Self {
        by_value: false,
        by_reference: false,
    };
    pub const VALUE: Self = Self {
        by_value: true,
        by_reference: false,
    };
    pub const REFERENCE: Self = Self {
        by_value: false,
        by_reference: true,
    };
    pub const BOTH: Self = Self {
        by_value: true,
        by_reference: true,
    };

    #[must_use]
    pub const fn contains(self, mode: PassingMode) -> bool {
        match mode {
            PassingMode::ByValue => self.by_value,
            PassingMode::ByReference => self.by_reference,
        }
    }

    #[must_use]
    pub const fn with(mut self, mode: PassingMode) -> Self {
        match mode {
            PassingMode::ByValue => self.by_value = true,
            PassingMode::ByReference => self.by_reference = true,
        }
        self
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.by_value && !self.by_reference
    }

    /// Supported modes, value first.
    pub fn iter(self) -> impl Iterator<Item = PassingMode> {
        [PassingMode::ByValue, PassingMode::ByReference]
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl From<Vec<PassingMode>> for PassingModes {
    fn from(modes: Vec<PassingMode>) -> Self {
        modes.into_iter().fold(Self::NONE, Self::with)
    }
}

impl From<PassingModes> for Vec<PassingMode> {
    fn from(modes: PassingModes) -> Self {
        modes.iter().collect()
    }
}

/// Structure field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: NativeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: Vec::new(),
        }
    }
}

/// Structure definition.
///
/// Field order is the native memory order and is never changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<Field>,
    pub modes: PassingModes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl StructDef {
    #[must_use]
    pub fn new(name: impl Into<String>, modes: PassingModes) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            modes,
            doc: Vec::new(),
            deprecated: None,
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: NativeType) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    /// Append a documented field.
    #[must_use]
    pub fn documented_field(
        mut self,
        name: impl Into<String>,
        ty: NativeType,
        doc: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut field = Field::new(name, ty);
        field.doc = doc.into_iter().map(Into::into).collect();
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.doc = doc.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_deprecated(mut self, note: impl Into<String>) -> Self {
        self.deprecated = Some(note.into());
        self
    }
}

/// Function parameter. A missing (or `_`) name is emitted positionally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: NativeType,
}

impl Param {
    #[must_use]
    pub fn named(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    #[must_use]
    pub const fn unnamed(ty: NativeType) -> Self {
        Self { name: None, ty }
    }

    /// The declared name, unless it is absent or a placeholder.
    #[must_use]
    pub fn explicit_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty() && *name != "_")
    }
}

/// Exported function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default = "void")]
    pub ret: NativeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

const fn void() -> NativeType {
    NativeType::Void
}

impl FunctionDef {
    /// Function returning `void` with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: NativeType::Void,
            doc: Vec::new(),
            deprecated: None,
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: NativeType) -> Self {
        self.params.push(Param::named(name, ty));
        self
    }

    #[must_use]
    pub fn unnamed_param(mut self, ty: NativeType) -> Self {
        self.params.push(Param::unnamed(ty));
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: NativeType) -> Self {
        self.ret = ty;
        self
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.doc = doc.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_deprecated(mut self, note: impl Into<String>) -> Self {
        self.deprecated = Some(note.into());
        self
    }
}

/// Exported constant.
///
/// Whether the literal can be written in a host language is decided per
/// back-end at emission time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantDef {
    pub name: String,
    pub ty: NativeType,
    pub value: Literal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
}

impl ConstantDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: NativeType, value: Literal) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
            doc: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.doc = doc.into_iter().map(Into::into).collect();
        self
    }
}

/// Enum variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub discriminant: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
}

/// C-like enum, represented natively as a 32-bit integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<EnumVariant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            doc: Vec::new(),
            deprecated: None,
        }
    }

    /// Append a variant with an implicit discriminant.
    #[must_use]
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(EnumVariant {
            name: name.into(),
            discriminant: None,
            doc: Vec::new(),
        });
        self
    }

    /// Append a variant with an explicit discriminant.
    #[must_use]
    pub fn variant_with(mut self, name: impl Into<String>, discriminant: i64) -> Self {
        self.variants.push(EnumVariant {
            name: name.into(),
            discriminant: Some(discriminant),
            doc: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.doc = doc.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_deprecated(mut self, note: impl Into<String>) -> Self {
        self.deprecated = Some(note.into());
        self
    }

    /// Variants paired with their resolved discriminants.
    ///
    /// Implicit discriminants follow C: the first is 0, each later one is the
    /// previous value plus one.
    pub fn discriminants(&self) -> impl Iterator<Item = (&EnumVariant, i64)> {
        let mut next = 0i64;
        self.variants.iter().map(move |variant| {
            let value = variant.discriminant.unwrap_or(next);
            next = value.wrapping_add(1);
            (variant, value)
        })
    }
}

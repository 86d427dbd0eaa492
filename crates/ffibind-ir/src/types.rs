//! Native type model.
//!
//! These types describe values as the native side sees them. They carry no
//! knowledge of any host language; back-ends map them to their own syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Signed integer.
    Int,
    /// Unsigned integer.
    #[serde(rename = "uint")]
    UInt,
    /// IEEE floating point.
    Float,
    /// Boolean (one byte).
    Bool,
    /// Character code unit.
    Char,
}

/// Primitive width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Width {
    /// Fixed number of bits.
    Bits(u16),
    /// Pointer-sized word (`intptr_t` / `size_t`), resolved by the data model.
    Native,
}

impl Width {
    /// Fixed bit count, if any.
    #[must_use]
    pub const fn bits(self) -> Option<u16> {
        match self {
            Self::Bits(bits) => Some(bits),
            Self::Native => None,
        }
    }
}

/// Primitive type: kind plus width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveType {
    pub kind: PrimitiveKind,
    pub width: Width,
}

impl PrimitiveType {
    #[must_use]
    pub const fn new(kind: PrimitiveKind, width: Width) -> Self {
        Self { kind, width }
    }

    /// Whether the width is legal for the kind.
    ///
    /// Back-ends may still lack a mapping for a legal width.
    #[must_use]
    pub const fn has_valid_width(&self) -> bool {
        match (self.kind, self.width) {
            (PrimitiveKind::Int | PrimitiveKind::UInt, Width::Native) => true,
            (PrimitiveKind::Int | PrimitiveKind::UInt, Width::Bits(bits)) => {
                matches!(bits, 8 | 16 | 32 | 64 | 128)
            }
            (PrimitiveKind::Float, Width::Bits(bits)) => matches!(bits, 16 | 32 | 64 | 128),
            (PrimitiveKind::Bool, Width::Bits(bits)) => bits == 8,
            (PrimitiveKind::Char, Width::Bits(bits)) => matches!(bits, 8 | 16 | 32),
            (PrimitiveKind::Float | PrimitiveKind::Bool | PrimitiveKind::Char, Width::Native) => {
                false
            }
        }
    }

    /// Whether this is an integer kind (signed or unsigned).
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Int | PrimitiveKind::UInt)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.width) {
            (PrimitiveKind::Int, Width::Native) => f.write_str("intptr_t"),
            (PrimitiveKind::UInt, Width::Native) => f.write_str("uintptr_t"),
            (PrimitiveKind::Int, Width::Bits(bits)) => write!(f, "int{bits}_t"),
            (PrimitiveKind::UInt, Width::Bits(bits)) => write!(f, "uint{bits}_t"),
            (PrimitiveKind::Float, Width::Bits(32)) => f.write_str("float"),
            (PrimitiveKind::Float, Width::Bits(64)) => f.write_str("double"),
            (PrimitiveKind::Float, Width::Bits(bits)) => write!(f, "float{bits}"),
            (PrimitiveKind::Bool, Width::Bits(8)) => f.write_str("bool"),
            (PrimitiveKind::Bool, Width::Bits(bits)) => write!(f, "bool{bits}"),
            (PrimitiveKind::Char, Width::Bits(8)) => f.write_str("char"),
            (PrimitiveKind::Char, Width::Bits(bits)) => write!(f, "char{bits}_t"),
            (kind, Width::Native) => write!(f, "{kind:?}(native)"),
        }
    }
}

/// A native type.
///
/// Structures may reference each other (or themselves) only through
/// [`NativeType::Pointer`]; direct value nesting must be acyclic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Primitive(PrimitiveType),
    Pointer(Box<Self>),
    Struct(String),
    Enum(String),
    Void,
}

impl NativeType {
    /// Signed integer of the given width in bits.
    #[must_use]
    pub const fn int(bits: u16) -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::Int, Width::Bits(bits)))
    }

    /// Unsigned integer of the given width in bits.
    #[must_use]
    pub const fn uint(bits: u16) -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::UInt, Width::Bits(bits)))
    }

    /// Pointer-sized signed integer.
    #[must_use]
    pub const fn isize() -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::Int, Width::Native))
    }

    /// Pointer-sized unsigned integer.
    #[must_use]
    pub const fn usize() -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::UInt, Width::Native))
    }

    /// Floating point of the given width in bits.
    #[must_use]
    pub const fn float(bits: u16) -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::Float, Width::Bits(bits)))
    }

    #[must_use]
    pub const fn bool() -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::Bool, Width::Bits(8)))
    }

    /// Character code unit of the given width in bits.
    #[must_use]
    pub const fn char(bits: u16) -> Self {
        Self::Primitive(PrimitiveType::new(PrimitiveKind::Char, Width::Bits(bits)))
    }

    #[must_use]
    pub fn pointer(to: Self) -> Self {
        Self::Pointer(Box::new(to))
    }

    #[must_use]
    pub fn structure(name: impl Into<String>) -> Self {
        Self::Struct(name.into())
    }

    #[must_use]
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Number of pointer indirections before the base type.
    #[must_use]
    pub fn pointer_depth(&self) -> usize {
        let mut depth = 0;
        let mut ty = self;
        while let Self::Pointer(inner) = ty {
            depth += 1;
            ty = inner;
        }
        depth
    }

    /// Base type after stripping all pointers.
    #[must_use]
    pub fn base(&self) -> &Self {
        let mut ty = self;
        while let Self::Pointer(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Struct name referenced directly by value.
    #[must_use]
    pub fn value_struct(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            _ => None,
        }
    }

    /// Struct name referenced through exactly one pointer.
    #[must_use]
    pub fn referenced_struct(&self) -> Option<&str> {
        match self {
            Self::Pointer(inner) => inner.value_struct(),
            _ => None,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(prim) => write!(f, "{prim}"),
            Self::Pointer(inner) => write!(f, "{inner}*"),
            Self::Struct(name) => write!(f, "struct {name}"),
            Self::Enum(name) => write!(f, "enum {name}"),
            Self::Void => f.write_str("void"),
        }
    }
}

impl From<PrimitiveType> for NativeType {
    fn from(prim: PrimitiveType) -> Self {
        Self::Primitive(prim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_depth() {
        let ty = NativeType::pointer(NativeType::pointer(NativeType::int(32)));
        assert_eq!(ty.pointer_depth(), 2);
        assert_eq!(ty.base(), &NativeType::int(32));
        assert_eq!(NativeType::Void.pointer_depth(), 0);
    }

    #[test]
    fn test_struct_references() {
        let by_value = NativeType::structure("Point");
        let by_ref = NativeType::pointer(NativeType::structure("Point"));
        let nested = NativeType::pointer(by_ref.clone());

        assert_eq!(by_value.value_struct(), Some("Point"));
        assert_eq!(by_value.referenced_struct(), None);
        assert_eq!(by_ref.referenced_struct(), Some("Point"));
        assert_eq!(nested.referenced_struct(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NativeType::int(64).to_string(), "int64_t");
        assert_eq!(NativeType::usize().to_string(), "uintptr_t");
        assert_eq!(NativeType::float(32).to_string(), "float");
        assert_eq!(
            NativeType::pointer(NativeType::structure("Foo")).to_string(),
            "struct Foo*"
        );
        assert_eq!(NativeType::pointer(NativeType::Void).to_string(), "void*");
    }

    #[test]
    fn test_valid_widths() {
        assert!(PrimitiveType::new(PrimitiveKind::Int, Width::Bits(128)).has_valid_width());
        assert!(PrimitiveType::new(PrimitiveKind::UInt, Width::Native).has_valid_width());
        assert!(!PrimitiveType::new(PrimitiveKind::Int, Width::Bits(24)).has_valid_width());
        assert!(!PrimitiveType::new(PrimitiveKind::Float, Width::Native).has_valid_width());
        assert!(!PrimitiveType::new(PrimitiveKind::Bool, Width::Bits(32)).has_valid_width());
        assert!(PrimitiveType::new(PrimitiveKind::Char, Width::Bits(32)).has_valid_width());
    }

    #[test]
    fn test_json_shape() {
        let ty: NativeType = serde_json::from_str(
            r#"{"pointer": {"primitive": {"kind": "int", "width": {"bits": 64}}}}"#,
        )
        .unwrap();
        assert_eq!(ty, NativeType::pointer(NativeType::int(64)));

        let ty: NativeType = serde_json::from_str(r#""void""#).unwrap();
        assert!(ty.is_void());

        let ty: NativeType =
            serde_json::from_str(r#"{"primitive": {"kind": "uint", "width": "native"}}"#).unwrap();
        assert_eq!(ty, NativeType::usize());
    }
}

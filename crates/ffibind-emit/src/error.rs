//! Emission errors.

use ffibind_ir::DescriptorError;
use thiserror::Error;

/// Why a back-end cannot express a native type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    #[error("no host type for `{0}`")]
    Primitive(String),

    #[error("pointer depth {depth} exceeds the supported maximum of {max}")]
    PointerDepth { depth: usize, max: usize },

    #[error("`void` is only valid as a return type or pointee")]
    Void,

    #[error("struct `{0}` has no declaration for this passing mode")]
    MissingMode(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("struct has no fields")]
    EmptyStruct,
}

/// Emission error.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(#[from] DescriptorError),

    #[error("{backend}: unsupported type `{ty}` in {item}: {reason}")]
    UnsupportedType {
        backend: &'static str,
        item: String,
        ty: String,
        reason: Unsupported,
    },

    #[error("{backend}: `{first}` and `{second}` both translate to `{name}`")]
    NameCollision {
        backend: &'static str,
        name: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, EmitError>;

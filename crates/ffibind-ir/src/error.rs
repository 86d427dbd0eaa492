use thiserror::Error;

use crate::items::PassingMode;

/// Structural problems in a module descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("invalid module name {0:?}")]
    InvalidModuleName(String),
    #[error("invalid identifier {name:?} for {what}")]
    InvalidIdentifier { what: String, name: String },
    #[error("duplicate {scope} name `{name}`")]
    DuplicateName { scope: String, name: String },
    #[error("{item} references undeclared struct `{name}`")]
    UndeclaredStruct { item: String, name: String },
    #[error("{item} references undeclared enum `{name}`")]
    UndeclaredEnum { item: String, name: String },
    #[error("{item} passes struct `{name}` {mode}, which the struct does not support")]
    ModeMismatch {
        item: String,
        name: String,
        mode: PassingMode,
    },
    #[error("struct `{0}` declares no passing mode")]
    NoPassingModes(String),
    #[error("{item} uses `void` as a value type")]
    VoidValue { item: String },
    #[error("{item} has invalid primitive width in `{ty}`")]
    InvalidWidth { item: String, ty: String },
    #[error("struct `{name}` contains itself by value ({})", .path.join(" -> "))]
    RecursiveStruct { name: String, path: Vec<String> },
}

pub type Result<T> = std::result::Result<T, DescriptorError>;

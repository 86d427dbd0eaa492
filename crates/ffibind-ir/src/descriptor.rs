//! Module descriptor: the complete exported surface of one native module.

use serde::{Deserialize, Serialize};

use crate::items::{ConstantDef, EnumDef, FunctionDef, StructDef};

/// IR for one native module.
///
/// Every sequence is in declaration order, which emission preserves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module name; also the default library name for load declarations.
    pub name: String,
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub constants: Vec<ConstantDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a struct by native name.
    #[must_use]
    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Look up an enum by native name.
    #[must_use]
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Total number of exported items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.functions.len() + self.structs.len() + self.constants.len() + self.enums.len()
    }

    /// Check if the module exports nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

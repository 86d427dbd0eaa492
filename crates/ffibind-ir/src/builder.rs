//! Module descriptor fluent API.

use crate::descriptor::ModuleDescriptor;
use crate::error::Result;
use crate::items::{ConstantDef, EnumDef, FunctionDef, StructDef};

/// Builder for a [`ModuleDescriptor`].
///
/// Items are kept in the order they are added.
pub struct ModuleBuilder {
    module: ModuleDescriptor,
}

impl ModuleBuilder {
    /// Create a builder for the named module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            module: ModuleDescriptor::new(name),
        }
    }

    /// Add a constant.
    #[must_use]
    pub fn constant(mut self, constant: ConstantDef) -> Self {
        self.module.constants.push(constant);
        self
    }

    /// Add an enum.
    #[must_use]
    pub fn enumeration(mut self, def: EnumDef) -> Self {
        self.module.enums.push(def);
        self
    }

    /// Add a structure.
    #[must_use]
    pub fn structure(mut self, def: StructDef) -> Self {
        self.module.structs.push(def);
        self
    }

    /// Add a function.
    #[must_use]
    pub fn function(mut self, def: FunctionDef) -> Self {
        self.module.functions.push(def);
        self
    }

    /// Finish without validation.
    #[must_use]
    pub fn build(self) -> ModuleDescriptor {
        self.module
    }

    /// Finish and validate.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found in the descriptor.
    pub fn build_validated(self) -> Result<ModuleDescriptor> {
        self.module.validate()?;
        Ok(self.module)
    }
}

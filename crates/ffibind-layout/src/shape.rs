//! Wrapper shapes for each passing mode.

use ffibind_ir::PassingMode;

/// Who owns the memory behind an emitted structure instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The instance holds a private copy.
    Owned,
    /// The instance aliases memory owned elsewhere.
    Aliased,
}

/// Constructor every emitted structure declaration provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constructor {
    /// Zero-initialized instance.
    Default,
    /// Instance read from a raw memory handle. Copies for [`Ownership::Owned`],
    /// aliases for [`Ownership::Aliased`].
    FromHandle,
}

/// Resolved wrapper shape for one passing mode of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariantShape {
    pub mode: PassingMode,
    pub ownership: Ownership,
    pub constructors: [Constructor; 2],
}

impl VariantShape {
    #[must_use]
    pub const fn for_mode(mode: PassingMode) -> Self {
        let ownership = match mode {
            PassingMode::ByValue => Ownership::Owned,
            PassingMode::ByReference => Ownership::Aliased,
        };
        Self {
            mode,
            ownership,
            constructors: [Constructor::Default, Constructor::FromHandle],
        }
    }

    #[must_use]
    pub const fn is_aliased(&self) -> bool {
        matches!(self.ownership, Ownership::Aliased)
    }
}

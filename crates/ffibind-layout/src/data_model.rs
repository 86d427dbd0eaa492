//! Target data models.

use ffibind_ir::{PrimitiveKind, PrimitiveType, Width};

/// Sizes the native side uses for pointer-dependent types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataModel {
    /// Bytes per pointer and per native word.
    pub pointer_bytes: usize,
    /// Bytes per C enum.
    pub enum_bytes: usize,
    /// Largest alignment any primitive receives.
    pub max_align: usize,
}

impl DataModel {
    /// 64-bit Unix (x86-64, aarch64).
    pub const LP64: Self = Self {
        pointer_bytes: 8,
        enum_bytes: 4,
        max_align: 16,
    };

    /// 32-bit targets with 8-byte aligned 64-bit types (ARM EABI, wasm32).
    pub const ILP32: Self = Self {
        pointer_bytes: 4,
        enum_bytes: 4,
        max_align: 8,
    };

    /// Size and alignment of a primitive.
    #[must_use]
    pub const fn primitive(&self, prim: PrimitiveType) -> (usize, usize) {
        let size = match (prim.kind, prim.width) {
            (PrimitiveKind::Bool, _) => 1,
            (_, Width::Native) => self.pointer_bytes,
            (_, Width::Bits(bits)) => bits as usize / 8,
        };
        (size, self.clamp_align(size))
    }

    /// Bits per pointer and per native word.
    #[must_use]
    pub fn pointer_bits(&self) -> u32 {
        u32::try_from(self.pointer_bytes * 8).unwrap_or(u32::MAX)
    }

    /// Size and alignment of a pointer.
    #[must_use]
    pub const fn pointer(&self) -> (usize, usize) {
        (self.pointer_bytes, self.pointer_bytes)
    }

    /// Size and alignment of an enum.
    #[must_use]
    pub const fn enumeration(&self) -> (usize, usize) {
        (self.enum_bytes, self.enum_bytes)
    }

    const fn clamp_align(&self, size: usize) -> usize {
        if size == 0 {
            1
        } else if size > self.max_align {
            self.max_align
        } else {
            size
        }
    }
}

impl Default for DataModel {
    fn default() -> Self {
        Self::LP64
    }
}

/// Round `offset` up to a multiple of `align` (a power of two).
#[must_use]
pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

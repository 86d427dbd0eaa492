//! Constant literal values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant's value as produced by the front-end.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Source-level expression text (`42`, `0x2aull`, `1.5f`, `'a'`, `true`).
    Expr(String),
    /// Value the front-end could not reduce to an expression.
    Opaque(String),
}

impl Literal {
    #[must_use]
    pub fn expr(text: impl Into<String>) -> Self {
        Self::Expr(text.into())
    }

    #[must_use]
    pub fn opaque(text: impl Into<String>) -> Self {
        Self::Opaque(text.into())
    }

    /// Expression text, if this is an expression literal.
    #[must_use]
    pub fn as_expr(&self) -> Option<&str> {
        match self {
            Self::Expr(text) => Some(text.trim()),
            Self::Opaque(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(text) => f.write_str(text),
            Self::Opaque(text) => write!(f, "<opaque {text}>"),
        }
    }
}

/// Parsed C integer literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntLiteral {
    /// Magnitude, before applying `negative`.
    pub magnitude: u128,
    pub negative: bool,
    pub radix: u32,
    /// Carries a `u`/`U` suffix.
    pub unsigned_suffix: bool,
    /// Number of `l`/`L` in the suffix.
    pub long_suffix: u8,
}

impl IntLiteral {
    /// Parse a C integer literal (`42`, `-7`, `0x2a`, `017`, `0b101`, `10ull`).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, body) = text
            .strip_prefix('-')
            .map_or((false, text), |rest| (true, rest.trim_start()));

        let digits_end = body
            .find(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'))
            .unwrap_or(body.len());
        let (digits, suffix) = body.split_at(digits_end);

        let mut unsigned_suffix = false;
        let mut long_suffix = 0u8;
        for c in suffix.chars() {
            match c {
                'u' | 'U' if !unsigned_suffix => unsigned_suffix = true,
                'l' | 'L' if long_suffix < 2 => long_suffix += 1,
                _ => return None,
            }
        }

        let hex = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"));
        let bin = digits
            .strip_prefix("0b")
            .or_else(|| digits.strip_prefix("0B"));
        let (radix, digits) = match (hex, bin) {
            (Some(hex), _) => (16, hex),
            (None, Some(bin)) => (2, bin),
            (None, None) if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
            (None, None) => (10, digits),
        };

        if digits.is_empty() {
            return None;
        }
        let magnitude = u128::from_str_radix(digits, radix).ok()?;
        Some(Self {
            magnitude,
            negative,
            radix,
            unsigned_suffix,
            long_suffix,
        })
    }

    /// Signed value, if it fits in `i128`.
    #[must_use]
    pub fn value(&self) -> Option<i128> {
        let magnitude = i128::try_from(self.magnitude).ok()?;
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Whether the value fits a signed integer of `bits` width.
    #[must_use]
    pub fn fits_signed(&self, bits: u32) -> bool {
        let Some(value) = self.value() else {
            return false;
        };
        if bits >= 128 {
            return true;
        }
        let max = (1i128 << (bits - 1)) - 1;
        let min = -(1i128 << (bits - 1));
        (min..=max).contains(&value)
    }

    /// Whether the value fits an unsigned integer of `bits` width.
    #[must_use]
    pub const fn fits_unsigned(&self, bits: u32) -> bool {
        if self.negative && self.magnitude != 0 {
            return false;
        }
        bits >= 128 || self.magnitude < (1u128 << bits)
    }

    /// Digits without sign or suffix, with a host-neutral radix prefix.
    #[must_use]
    pub fn digits(&self) -> String {
        match self.radix {
            16 => format!("0x{:x}", self.magnitude),
            2 => format!("0b{:b}", self.magnitude),
            8 => format!("0o{:o}", self.magnitude),
            _ => self.magnitude.to_string(),
        }
    }
}

//! Java constant literals.
//!
//! Java has no unsigned integer types, so unsigned constants are not
//! representable; neither are literals carrying a `u` suffix.

use ffibind_ir::{IntLiteral, Literal, NativeType, PrimitiveKind, PrimitiveType, Width};

use crate::literal::{bool_value, float_body, is_char_literal};

/// Java expression for `literal` of type `ty`, before enum wrapping.
///
/// A native word holds `native_bits`, whatever the width of Java's `long`.
pub(super) fn java_literal(ty: &NativeType, literal: &Literal, native_bits: u32) -> Option<String> {
    let text = literal.as_expr()?;
    match ty {
        NativeType::Primitive(prim) => primitive(*prim, text, native_bits),
        NativeType::Enum(_) => integer(text, 32),
        _ => None,
    }
}

fn primitive(prim: PrimitiveType, text: &str, native_bits: u32) -> Option<String> {
    match (prim.kind, prim.width) {
        (PrimitiveKind::Int, Width::Native) => {
            integer(text, native_bits).map(|v| format!("new NativeLong({v}L)"))
        }
        (PrimitiveKind::Int, Width::Bits(bits @ (8 | 16 | 32))) => integer(text, u32::from(bits)),
        (PrimitiveKind::Int, Width::Bits(64)) => integer(text, 64).map(|v| format!("{v}L")),
        (PrimitiveKind::Float, Width::Bits(32)) => float_body(text).map(|v| format!("{v}f")),
        (PrimitiveKind::Float, Width::Bits(64)) => float_body(text).map(|v| format!("{v}d")),
        (PrimitiveKind::Bool, _) => bool_value(text).map(|v| v.to_string()),
        (PrimitiveKind::Char, Width::Bits(8)) => {
            (is_char_literal(text) && text.is_ascii()).then(|| format!("(byte) {text}"))
        }
        (PrimitiveKind::Char, Width::Bits(16)) => is_char_literal(text).then(|| text.to_string()),
        _ => None,
    }
}

fn integer(text: &str, bits: u32) -> Option<String> {
    let lit = IntLiteral::parse(text)?;
    if lit.unsigned_suffix || !lit.fits_signed(bits) {
        return None;
    }
    let sign = if lit.negative && lit.magnitude != 0 { "-" } else { "" };
    let digits = if lit.radix == 16 {
        lit.digits()
    } else {
        lit.magnitude.to_string()
    };
    Some(format!("{sign}{digits}"))
}

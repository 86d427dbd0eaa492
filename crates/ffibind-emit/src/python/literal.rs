//! Python constant literals.

use ffibind_ir::{IntLiteral, Literal, NativeType, PrimitiveKind, PrimitiveType, Width};

use crate::literal::{bool_value, float_body, is_char_literal, is_null_pointer};

/// Python expression for `literal` of type `ty`, where a native word holds
/// `native_bits`.
pub(super) fn python_literal(
    ty: &NativeType,
    literal: &Literal,
    native_bits: u32,
) -> Option<String> {
    let text = literal.as_expr()?;
    match ty {
        NativeType::Primitive(prim) => primitive(*prim, text, native_bits),
        NativeType::Enum(_) => integer(text, |lit| lit.fits_signed(32)),
        NativeType::Pointer(_) => is_null_pointer(text).then(|| "None".to_string()),
        NativeType::Struct(_) | NativeType::Void => None,
    }
}

fn primitive(prim: PrimitiveType, text: &str, native_bits: u32) -> Option<String> {
    let bits = prim.width.bits().map_or(native_bits, u32::from);
    match (prim.kind, prim.width) {
        (PrimitiveKind::Int, _) => integer(text, |lit| lit.fits_signed(bits)),
        (PrimitiveKind::UInt, _) => integer(text, |lit| lit.fits_unsigned(bits)),
        (PrimitiveKind::Float, Width::Bits(32 | 64)) => float_body(text).map(str::to_string),
        (PrimitiveKind::Bool, _) => {
            bool_value(text).map(|v| if v { "True" } else { "False" }.to_string())
        }
        (PrimitiveKind::Char, _) => is_char_literal(text).then(|| format!("ord({text})")),
        _ => None,
    }
}

fn integer(text: &str, fits: impl FnOnce(&IntLiteral) -> bool) -> Option<String> {
    let lit = IntLiteral::parse(text)?;
    if !fits(&lit) {
        return None;
    }
    let sign = if lit.negative && lit.magnitude != 0 { "-" } else { "" };
    Some(format!("{sign}{}", lit.digits()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_with(ty: &NativeType, text: &str, native_bits: u32) -> Option<String> {
        python_literal(ty, &Literal::expr(text), native_bits)
    }

    fn python(ty: &NativeType, text: &str) -> Option<String> {
        python_with(ty, text, 64)
    }

    #[test]
    fn test_integers() {
        let cases = [
            (NativeType::uint(8), "0x2a", Some("0x2a")),
            (NativeType::uint(64), "10ull", Some("10")),
            (NativeType::int(32), "017", Some("0o17")),
            (NativeType::int(32), "-5", Some("-5")),
            (NativeType::uint(8), "256", None),
            (NativeType::uint(32), "-1", None),
            (NativeType::enumeration("E"), "3", Some("3")),
        ];
        for (ty, text, expected) in cases {
            assert_eq!(python(&ty, text).as_deref(), expected, "{ty} {text}");
        }
    }

    #[test]
    fn test_native_words_follow_pointer_width() {
        let cases = [
            (NativeType::usize(), "4294967296", 64, Some("4294967296")),
            (NativeType::usize(), "4294967296", 32, None),
            (NativeType::usize(), "0xffffffff", 32, Some("0xffffffff")),
            (NativeType::isize(), "0x80000000", 32, None),
            (NativeType::isize(), "-0x80000000", 32, Some("-0x80000000")),
        ];
        for (ty, text, bits, expected) in cases {
            let actual = python_with(&ty, text, bits);
            assert_eq!(actual.as_deref(), expected, "{ty} {text} at {bits} bits");
        }
    }

    #[test]
    fn test_other_literals() {
        let cases = [
            (NativeType::float(32), "1.5f", Some("1.5")),
            (NativeType::bool(), "false", Some("False")),
            (NativeType::char(8), "'a'", Some("ord('a')")),
            (NativeType::pointer(NativeType::Void), "NULL", Some("None")),
            (NativeType::pointer(NativeType::Void), "0x10", None),
            (NativeType::structure("S"), "{0}", None),
        ];
        for (ty, text, expected) in cases {
            assert_eq!(python(&ty, text).as_deref(), expected, "{ty} {text}");
        }

        let opaque = Literal::opaque("x");
        assert_eq!(python_literal(&NativeType::int(8), &opaque, 64), None);
    }
}

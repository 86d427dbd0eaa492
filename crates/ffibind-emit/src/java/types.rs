//! Native to JNA type mapping.
//!
//! Storage types follow the native width, since JNA sizes a `Structure` field
//! by its Java type: `bool` is a `byte` and wide characters are `short` or
//! `int`. Only constants, which never touch native memory, use `boolean` and
//! `char`.

use ffibind_ir::{NativeType, PrimitiveKind, PrimitiveType, Width};

use crate::backend::{TypeContext, TypeSlot};
use crate::error::Unsupported;

/// Deepest pointer JNA can express without a hand-written wrapper.
const MAX_POINTER_DEPTH: usize = 2;

pub(super) fn map_type(ty: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
    match ty {
        NativeType::Void if cx.slot == TypeSlot::Return => Ok("void".to_string()),
        NativeType::Void => Err(Unsupported::Void),
        NativeType::Primitive(prim) => primitive(*prim, cx.slot).map(str::to_string),
        NativeType::Struct(name) => cx.names.value_name(name).map(str::to_string),
        NativeType::Enum(name) => cx.names.enum_name(name).map(str::to_string),
        NativeType::Pointer(pointee) => match ty.pointer_depth() {
            1 => pointer_to(pointee, cx),
            depth if depth <= MAX_POINTER_DEPTH => Ok("PointerByReference".to_string()),
            depth => Err(Unsupported::PointerDepth {
                depth,
                max: MAX_POINTER_DEPTH,
            }),
        },
    }
}

fn primitive(prim: PrimitiveType, slot: TypeSlot) -> Result<&'static str, Unsupported> {
    use PrimitiveKind::{Bool, Char, Float, Int, UInt};

    let name = match (prim.kind, prim.width) {
        (Bool, _) if slot == TypeSlot::Constant => "boolean",
        (Char, Width::Bits(16)) if slot == TypeSlot::Constant => "char",
        (Int | UInt, Width::Native) => "NativeLong",
        (Int | UInt | Char, Width::Bits(8)) | (Bool, _) => "byte",
        (Int | UInt | Char, Width::Bits(16)) => "short",
        (Int | UInt | Char, Width::Bits(32)) => "int",
        (Int | UInt, Width::Bits(64)) => "long",
        (Float, Width::Bits(32)) => "float",
        (Float, Width::Bits(64)) => "double",
        _ => return Err(Unsupported::Primitive(prim.to_string())),
    };
    Ok(name)
}

fn pointer_to(pointee: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
    use PrimitiveKind::{Bool, Char, Float, Int, UInt};

    let name = match pointee {
        NativeType::Void => "Pointer",
        NativeType::Struct(name) => return cx.names.reference_name(name).map(str::to_string),
        NativeType::Enum(name) => return cx.names.enum_reference_name(name).map(str::to_string),
        NativeType::Primitive(prim) => match (prim.kind, prim.width) {
            (Int | UInt, Width::Native) => "NativeLongByReference",
            (Int | UInt | Char, Width::Bits(8)) | (Bool, _) => "ByteByReference",
            (Int | UInt | Char, Width::Bits(16)) => "ShortByReference",
            (Int | UInt | Char, Width::Bits(32)) => "IntByReference",
            (Int | UInt, Width::Bits(64)) => "LongByReference",
            (Float, Width::Bits(32)) => "FloatByReference",
            (Float, Width::Bits(64)) => "DoubleByReference",
            _ => return Err(Unsupported::Primitive(prim.to_string())),
        },
        NativeType::Pointer(_) => "PointerByReference",
    };
    Ok(name.to_string())
}

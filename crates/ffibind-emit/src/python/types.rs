//! Native to `ctypes` type mapping.
//!
//! A struct that embeds a later struct by value is declared without
//! `_fields_`; the plan maps its fields as if every class existed.

use ffibind_ir::{NativeType, PrimitiveKind, PrimitiveType, Width};

use crate::backend::{TypeContext, TypeSlot};
use crate::error::Unsupported;

pub(super) fn map_type(ty: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
    match ty {
        NativeType::Void if cx.slot == TypeSlot::Return => Ok("None".to_string()),
        NativeType::Void => Err(Unsupported::Void),
        NativeType::Primitive(prim) => primitive(*prim).map(str::to_string),
        NativeType::Struct(name) => cx.names.value_name(name).map(str::to_string),
        NativeType::Enum(_) => Ok("ctypes.c_int".to_string()),
        NativeType::Pointer(pointee) => pointer_to(pointee, cx),
    }
}

fn primitive(prim: PrimitiveType) -> Result<&'static str, Unsupported> {
    let name = match (prim.kind, prim.width) {
        (PrimitiveKind::Int, Width::Native) => "ctypes.c_ssize_t",
        (PrimitiveKind::UInt, Width::Native) => "ctypes.c_size_t",
        (PrimitiveKind::Int, Width::Bits(8)) => "ctypes.c_int8",
        (PrimitiveKind::Int, Width::Bits(16)) => "ctypes.c_int16",
        (PrimitiveKind::Int, Width::Bits(32)) => "ctypes.c_int32",
        (PrimitiveKind::Int, Width::Bits(64)) => "ctypes.c_int64",
        (PrimitiveKind::UInt, Width::Bits(8)) => "ctypes.c_uint8",
        (PrimitiveKind::UInt | PrimitiveKind::Char, Width::Bits(16)) => "ctypes.c_uint16",
        (PrimitiveKind::UInt | PrimitiveKind::Char, Width::Bits(32)) => "ctypes.c_uint32",
        (PrimitiveKind::UInt, Width::Bits(64)) => "ctypes.c_uint64",
        (PrimitiveKind::Float, Width::Bits(32)) => "ctypes.c_float",
        (PrimitiveKind::Float, Width::Bits(64)) => "ctypes.c_double",
        (PrimitiveKind::Bool, _) => "ctypes.c_bool",
        (PrimitiveKind::Char, Width::Bits(8)) => "ctypes.c_char",
        _ => return Err(Unsupported::Primitive(prim.to_string())),
    };
    Ok(name)
}

fn pointer_to(pointee: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
    match pointee {
        NativeType::Void => Ok("ctypes.c_void_p".to_string()),
        NativeType::Primitive(prim)
            if prim.kind == PrimitiveKind::Char && prim.width == Width::Bits(8) =>
        {
            Ok("ctypes.c_char_p".to_string())
        }
        // A class cannot name itself or a later class while its body runs.
        NativeType::Struct(name) if cx.slot == TypeSlot::Field && cx.is_forward(name) => {
            Ok("ctypes.c_void_p".to_string())
        }
        NativeType::Struct(name) => {
            let reference = cx.names.reference_name(name)?;
            Ok(format!("ctypes.POINTER({reference})"))
        }
        NativeType::Primitive(_) | NativeType::Enum(_) | NativeType::Pointer(_) => {
            let inner = map_type(pointee, cx)?;
            Ok(format!("ctypes.POINTER({inner})"))
        }
    }
}

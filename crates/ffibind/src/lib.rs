//! ffibind - FFI binding generator
//!
//! Turns a language-agnostic description of a native module into
//! host-language bindings: Java on JNA and Python on `ctypes`.
//!
//! # Example
//!
//! ```ignore
//! use ffibind::{Generator, JavaJna, ModuleBuilder, FunctionDef};
//!
//! let module = ModuleBuilder::new("mylib").function(FunctionDef::new("init")).build();
//! let file = Generator::with_defaults().generate(&module, &JavaJna::default())?;
//! file.write_to("out/".as_ref())?;
//! ```

// Re-export from sub-crates
pub use ffibind_emit::{
    Backend, BindingEmitter, Bindings, Casing, Emission, EmitConfig, EmitError, IdentKind, JavaJna,
    JavaJnaConfig, ListLayout, LiteralFilter, ModulePlan, NamingPolicy, PythonCtypes,
    PythonCtypesConfig, Section, TextBlock, Unsupported, VERSION, emit, plan_module,
};
pub use ffibind_ir::{
    ConstantDef, DescriptorError, EnumDef, EnumVariant, Field, FunctionDef, Literal,
    ModuleBuilder, ModuleDescriptor, NativeType, Param, PassingMode, PassingModes,
    PrimitiveKind, PrimitiveType, StructDef, Width,
};
pub use ffibind_layout::{DataModel, LayoutResolver, ModuleLayout, Ownership, StructLayout};

mod error;
mod generator;

pub use error::*;
pub use generator::*;

//! Back-end policy trait.
//!
//! A back-end maps native types to host types, decides which constant
//! literals it can express, names things, and renders planned items. Mapping
//! and naming happen while the plan is built; rendering cannot fail.

use ffibind_ir::{ConstantDef, ModuleDescriptor, NativeType};
use ffibind_layout::DataModel;

use crate::config::EmitConfig;
use crate::error::Unsupported;
use crate::naming::NamingPolicy;
use crate::plan::{
    ModulePlan, NameTable, PlannedConstant, PlannedEnum, PlannedFunction, PlannedStruct,
};
use crate::writer::SourceWriter;

/// Where a type appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSlot {
    Field,
    Param,
    Return,
    Constant,
}

/// Context for a type mapping.
#[derive(Clone, Copy)]
pub struct TypeContext<'a> {
    pub slot: TypeSlot,
    pub names: &'a NameTable,
    /// Declaration index of the struct whose fields are being mapped.
    pub declaring: Option<usize>,
}

impl<'a> TypeContext<'a> {
    #[must_use]
    pub const fn new(slot: TypeSlot, names: &'a NameTable) -> Self {
        Self {
            slot,
            names,
            declaring: None,
        }
    }

    #[must_use]
    pub const fn declaring(mut self, index: usize) -> Self {
        self.declaring = Some(index);
        self
    }

    /// Whether struct `name` is declared at or after the struct being
    /// declared.
    #[must_use]
    pub fn is_forward(&self, name: &str) -> bool {
        match (self.declaring, self.names.struct_index(name)) {
            (Some(current), Some(index)) => index >= current,
            _ => false,
        }
    }
}

/// Host-language binding policy.
pub trait Backend: Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    fn naming(&self) -> &NamingPolicy;

    /// Spaces per indentation level.
    fn indent_width(&self) -> usize;

    /// Indentation level of item blocks.
    #[must_use]
    fn item_level(&self) -> usize {
        0
    }

    /// Library name when the configuration does not override it.
    #[must_use]
    fn default_library_name(&self, module: &ModuleDescriptor) -> String {
        module.name.clone()
    }

    /// File name the bindings are usually saved under.
    fn file_name(&self, module: &ModuleDescriptor) -> String;

    /// Whether functions are bound by their host identifier, so escaping a
    /// function name breaks symbol lookup.
    #[must_use]
    fn binds_by_identifier(&self) -> bool {
        false
    }

    /// Type names the library load itself declares, each paired with a
    /// description of its declaration.
    #[must_use]
    fn reserved_type_names(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Whether a struct without fields can be declared.
    #[must_use]
    fn supports_empty_structs(&self) -> bool {
        true
    }

    /// Whether a struct that embeds a later struct by value can be declared
    /// with its fields left for the epilogue to fill in.
    #[must_use]
    fn defers_forward_values(&self) -> bool {
        false
    }

    /// Host type expression for a native type.
    ///
    /// # Errors
    ///
    /// Returns the reason when the type has no host representation.
    fn map_type(&self, ty: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported>;

    /// Default representability predicate for constant literals.
    fn is_representable(&self, constant: &ConstantDef, model: &DataModel) -> bool;

    /// Host literal for a constant, `None` when it cannot be expressed.
    fn render_literal(
        &self,
        constant: &ConstantDef,
        names: &NameTable,
        model: &DataModel,
    ) -> Option<String>;

    /// A single-line comment.
    fn comment(&self, text: &str) -> String;

    fn write_library_load(&self, out: &mut SourceWriter, plan: &ModulePlan, config: &EmitConfig);

    fn write_constant(
        &self,
        out: &mut SourceWriter,
        constant: &PlannedConstant,
        config: &EmitConfig,
    );

    fn write_enum(&self, out: &mut SourceWriter, def: &PlannedEnum, config: &EmitConfig);

    fn write_struct(&self, out: &mut SourceWriter, def: &PlannedStruct, config: &EmitConfig);

    fn write_function(&self, out: &mut SourceWriter, def: &PlannedFunction, config: &EmitConfig);

    /// Close whatever the library load opened and finish deferred
    /// declarations. Returns false when there is nothing to write.
    fn write_epilogue(
        &self,
        _out: &mut SourceWriter,
        _plan: &ModulePlan,
        _config: &EmitConfig,
    ) -> bool {
        false
    }
}

//! Python back-end targeting `ctypes`.
//!
//! Emits one module. The shared library is opened on first use and each
//! foreign function gets its `restype`/`argtypes` bound once, on its first
//! call.

mod literal;
mod render;
mod types;

use ffibind_ir::{ConstantDef, ModuleDescriptor, NativeType};
use ffibind_layout::DataModel;

use crate::backend::{Backend, TypeContext};
use crate::config::EmitConfig;
use crate::error::Unsupported;
use crate::naming::{Casing, NamingPolicy};
use crate::plan::{
    ModulePlan, NameTable, PlannedConstant, PlannedEnum, PlannedFunction, PlannedStruct,
};
use crate::writer::SourceWriter;

const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
    // Module-level names the generated code itself defines or imports.
    "ctypes", "enum", "_LIBRARY_NAME", "_library", "_functions", "_lib", "_bind",
];

/// Python-specific settings.
#[derive(Clone, Copy, Debug)]
pub struct PythonCtypesConfig {
    /// Resolve the library through `ctypes.util.find_library` before falling
    /// back to the bare name.
    pub use_find_library: bool,
}

impl Default for PythonCtypesConfig {
    fn default() -> Self {
        Self {
            use_find_library: true,
        }
    }
}

impl PythonCtypesConfig {
    #[must_use]
    pub const fn with_find_library(mut self, enabled: bool) -> Self {
        self.use_find_library = enabled;
        self
    }
}

/// `ctypes` bindings back-end.
#[derive(Clone, Debug)]
pub struct PythonCtypes {
    config: PythonCtypesConfig,
    naming: NamingPolicy,
}

impl PythonCtypes {
    pub const NAME: &'static str = "python-ctypes";

    #[must_use]
    pub const fn new(config: PythonCtypesConfig) -> Self {
        Self {
            config,
            naming: NamingPolicy {
                types: Casing::PascalCase,
                functions: Casing::Preserve,
                fields: Casing::Preserve,
                constants: Casing::Preserve,
                variants: Casing::Preserve,
                params: Casing::Preserve,
                reference_suffix: "ByReference",
                enum_references: false,
                shared_namespace: true,
                reserved: RESERVED,
            },
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PythonCtypesConfig {
        &self.config
    }
}

impl Default for PythonCtypes {
    fn default() -> Self {
        Self::new(PythonCtypesConfig::default())
    }
}

impl Backend for PythonCtypes {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    fn indent_width(&self) -> usize {
        4
    }

    fn file_name(&self, module: &ModuleDescriptor) -> String {
        format!("{}.py", module.name)
    }

    fn defers_forward_values(&self) -> bool {
        true
    }

    fn map_type(&self, ty: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
        types::map_type(ty, cx)
    }

    fn is_representable(&self, constant: &ConstantDef, model: &DataModel) -> bool {
        let bits = model.pointer_bits();
        literal::python_literal(&constant.ty, &constant.value, bits).is_some()
    }

    fn render_literal(
        &self,
        constant: &ConstantDef,
        _names: &NameTable,
        model: &DataModel,
    ) -> Option<String> {
        literal::python_literal(&constant.ty, &constant.value, model.pointer_bits())
    }

    fn comment(&self, text: &str) -> String {
        format!("# {text}")
    }

    fn write_library_load(&self, out: &mut SourceWriter, plan: &ModulePlan, config: &EmitConfig) {
        render::library_load(out, self.config, plan, config);
    }

    fn write_constant(
        &self,
        out: &mut SourceWriter,
        constant: &PlannedConstant,
        _config: &EmitConfig,
    ) {
        render::constant(out, constant);
    }

    fn write_enum(&self, out: &mut SourceWriter, def: &PlannedEnum, _config: &EmitConfig) {
        render::enumeration(out, def);
    }

    fn write_struct(&self, out: &mut SourceWriter, def: &PlannedStruct, config: &EmitConfig) {
        render::structure(out, def, config);
    }

    fn write_function(&self, out: &mut SourceWriter, def: &PlannedFunction, config: &EmitConfig) {
        render::function(out, def, config);
    }

    fn write_epilogue(
        &self,
        out: &mut SourceWriter,
        plan: &ModulePlan,
        config: &EmitConfig,
    ) -> bool {
        if plan.completion_order.is_empty() {
            return false;
        }
        render::completions(out, plan, config);
        true
    }
}

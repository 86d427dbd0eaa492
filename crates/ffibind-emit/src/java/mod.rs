//! Java back-end targeting JNA.
//!
//! The whole module becomes one interface extending `Library`. Structs and
//! enums are nested classes; the native library is loaded once through an
//! enum singleton.

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
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "var", "void", "volatile", "while", "yield", "_",
    // JNA and java.lang names the bindings refer to unqualified.
    "ByReference", "IntegerType", "Library", "Native", "NativeLong", "Object", "Pointer", "String",
    "Structure",
];

/// Java-specific settings.
#[derive(Clone, Debug)]
pub struct JavaJnaConfig {
    /// `package` declaration, if any.
    pub package: Option<String>,
    /// Name of the generated interface.
    pub interface_name: String,
    /// Lines placed verbatim inside the interface, after the instance field.
    pub extra_defs: Vec<String>,
}

impl Default for JavaJnaConfig {
    fn default() -> Self {
        Self {
            package: None,
            interface_name: "Bindings".to_string(),
            extra_defs: Vec::new(),
        }
    }
}

impl JavaJnaConfig {
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    #[must_use]
    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = name.into();
        self
    }

    #[must_use]
    pub fn with_extra_defs(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_defs = lines.into_iter().map(Into::into).collect();
        self
    }
}

/// JNA bindings back-end.
#[derive(Clone, Debug)]
pub struct JavaJna {
    config: JavaJnaConfig,
    naming: NamingPolicy,
}

impl JavaJna {
    pub const NAME: &'static str = "java-jna";

    #[must_use]
    pub const fn new(config: JavaJnaConfig) -> Self {
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
                enum_references: true,
                shared_namespace: false,
                reserved: RESERVED,
            },
        }
    }

    #[must_use]
    pub const fn config(&self) -> &JavaJnaConfig {
        &self.config
    }
}

impl Default for JavaJna {
    fn default() -> Self {
        Self::new(JavaJnaConfig::default())
    }
}

impl Backend for JavaJna {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    fn indent_width(&self) -> usize {
        2
    }

    fn item_level(&self) -> usize {
        1
    }

    fn file_name(&self, _module: &ModuleDescriptor) -> String {
        format!("{}.java", self.config.interface_name)
    }

    fn binds_by_identifier(&self) -> bool {
        true
    }

    fn reserved_type_names(&self) -> Vec<(String, String)> {
        let name = &self.config.interface_name;
        vec![
            (name.clone(), format!("interface {name}")),
            (format!("{name}Singleton"), format!("enum {name}Singleton")),
        ]
    }

    fn supports_empty_structs(&self) -> bool {
        false
    }

    fn map_type(&self, ty: &NativeType, cx: &TypeContext<'_>) -> Result<String, Unsupported> {
        types::map_type(ty, cx)
    }

    fn is_representable(&self, constant: &ConstantDef, model: &DataModel) -> bool {
        let bits = model.pointer_bits();
        literal::java_literal(&constant.ty, &constant.value, bits).is_some()
    }

    fn render_literal(
        &self,
        constant: &ConstantDef,
        names: &NameTable,
        model: &DataModel,
    ) -> Option<String> {
        let bits = model.pointer_bits();
        let value = literal::java_literal(&constant.ty, &constant.value, bits)?;
        match &constant.ty {
            NativeType::Enum(name) => {
                let class = names.enum_name(name).ok()?;
                Some(format!("new {class}({value})"))
            }
            _ => Some(value),
        }
    }

    fn comment(&self, text: &str) -> String {
        format!("/* {text} */")
    }

    fn write_library_load(&self, out: &mut SourceWriter, plan: &ModulePlan, config: &EmitConfig) {
        render::library_load(out, &self.config, plan, config);
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
        _plan: &ModulePlan,
        _config: &EmitConfig,
    ) -> bool {
        out.line("}");
        true
    }
}

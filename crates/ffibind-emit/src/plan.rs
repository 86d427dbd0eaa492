//! Binding plans.
//!
//! A plan is a module with every host name chosen, every type mapped and
//! every literal rendered. Building it runs all fatal checks, so rendering a
//! plan cannot fail.

use std::ops::Range;

use ffibind_ir::{
    ConstantDef, DescriptorError, EnumDef, FunctionDef, ModuleDescriptor, NativeType, PassingMode,
    StructDef,
};
use ffibind_layout::{ModuleLayout, VariantShape};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::backend::{Backend, TypeContext, TypeSlot};
use crate::config::EmitConfig;
use crate::error::{EmitError, Result, Unsupported};
use crate::naming::{IdentKind, Scope};

/// Documentation attached to a planned item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Docs {
    pub lines: Vec<String>,
    pub deprecated: Option<String>,
}

impl Docs {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.deprecated.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedConstant {
    pub native_name: String,
    pub name: String,
    pub ty: String,
    pub value: String,
    pub docs: Docs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedVariant {
    pub name: String,
    pub value: i64,
    pub docs: Docs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedEnum {
    pub native_name: String,
    pub name: String,
    pub reference_name: Option<String>,
    /// Size in bytes under the data model.
    pub size: usize,
    pub variants: Vec<PlannedVariant>,
    pub docs: Docs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedField {
    pub name: String,
    pub ty: String,
    pub offset: usize,
    pub size: usize,
    pub docs: Docs,
}

/// One passing-mode declaration of a struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedStruct {
    pub native_name: String,
    pub name: String,
    pub shape: VariantShape,
    pub fields: Vec<PlannedField>,
    pub size: usize,
    pub align: usize,
    pub docs: Docs,
    /// Fields are mapped for completion after every struct is declared.
    pub deferred: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedParam {
    pub name: String,
    pub ty: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedFunction {
    pub native_name: String,
    pub name: String,
    pub params: Vec<PlannedParam>,
    pub ret: String,
    pub docs: Docs,
}

/// An item that is either declared or replaced by a placeholder comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Planned<T> {
    Declared(T),
    Placeholder { native_name: String, reason: String },
}

impl<T> Planned<T> {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Everything needed to render a module for one back-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModulePlan {
    pub module_name: String,
    pub library_name: String,
    pub constants: Vec<Planned<PlannedConstant>>,
    pub enums: Vec<PlannedEnum>,
    /// Struct declarations, each mode right after its struct's previous one.
    pub structs: Vec<PlannedStruct>,
    pub functions: Vec<Planned<PlannedFunction>>,
    /// Deferred declarations, as indices into `structs`, in an order where
    /// every embedded struct is complete before its container.
    pub completion_order: Vec<usize>,
}

impl ModulePlan {
    /// Number of placeholder items.
    #[must_use]
    pub fn placeholders(&self) -> usize {
        self.constants.iter().filter(|c| c.is_placeholder()).count()
            + self.functions.iter().filter(|f| f.is_placeholder()).count()
    }
}

#[derive(Clone, Debug)]
struct StructNames {
    index: usize,
    value: Option<String>,
    reference: Option<String>,
}

#[derive(Clone, Debug)]
struct EnumNames {
    name: String,
    reference: Option<String>,
}

/// Host names of every type declared by a module.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    structs: FxHashMap<String, StructNames>,
    enums: FxHashMap<String, EnumNames>,
}

impl NameTable {
    /// Name every type and claim the names in `scope`.
    fn build(module: &ModuleDescriptor, backend: &dyn Backend, scope: &mut Scope) -> Result<Self> {
        let naming = backend.naming();
        let mut table = Self::default();

        for (name, declaration) in backend.reserved_type_names() {
            scope.claim(&name, &declaration)?;
        }

        for (index, def) in module.structs.iter().enumerate() {
            let value = def
                .modes
                .contains(PassingMode::ByValue)
                .then(|| naming.value_type_name(&def.name));
            let reference = def
                .modes
                .contains(PassingMode::ByReference)
                .then(|| naming.reference_type_name(&def.name));
            for name in value.iter().chain(reference.iter()) {
                scope.claim(name, &def.name)?;
            }
            table.structs.insert(
                def.name.clone(),
                StructNames {
                    index,
                    value,
                    reference,
                },
            );
        }

        for def in &module.enums {
            let name = naming.value_type_name(&def.name);
            scope.claim(&name, &def.name)?;
            let reference = if naming.enum_references {
                let reference = naming.reference_type_name(&def.name);
                scope.claim(&reference, &def.name)?;
                Some(reference)
            } else {
                None
            };
            let names = EnumNames { name, reference };
            table.enums.insert(def.name.clone(), names);
        }

        Ok(table)
    }

    /// Declaration index of a struct.
    #[must_use]
    pub fn struct_index(&self, name: &str) -> Option<usize> {
        self.structs.get(name).map(|s| s.index)
    }

    /// Host name of a struct's by-value declaration.
    ///
    /// # Errors
    ///
    /// Fails when the struct is unknown or has no by-value mode.
    pub fn value_name(&self, name: &str) -> std::result::Result<&str, Unsupported> {
        let names = self.struct_names(name)?;
        names
            .value
            .as_deref()
            .ok_or_else(|| Unsupported::MissingMode(name.to_string()))
    }

    /// Host name of a struct's by-reference declaration.
    ///
    /// # Errors
    ///
    /// Fails when the struct is unknown or has no by-reference mode.
    pub fn reference_name(&self, name: &str) -> std::result::Result<&str, Unsupported> {
        let names = self.struct_names(name)?;
        names
            .reference
            .as_deref()
            .ok_or_else(|| Unsupported::MissingMode(name.to_string()))
    }

    /// Host name of an enum.
    ///
    /// # Errors
    ///
    /// Fails when the enum is unknown.
    pub fn enum_name(&self, name: &str) -> std::result::Result<&str, Unsupported> {
        self.enums
            .get(name)
            .map(|e| e.name.as_str())
            .ok_or_else(|| Unsupported::UnknownType(name.to_string()))
    }

    /// Host name of an enum's by-reference declaration.
    ///
    /// # Errors
    ///
    /// Fails when the enum is unknown or the back-end declares no enum
    /// references.
    pub fn enum_reference_name(&self, name: &str) -> std::result::Result<&str, Unsupported> {
        self.enums
            .get(name)
            .ok_or_else(|| Unsupported::UnknownType(name.to_string()))?
            .reference
            .as_deref()
            .ok_or_else(|| Unsupported::MissingMode(name.to_string()))
    }

    fn struct_names(&self, name: &str) -> std::result::Result<&StructNames, Unsupported> {
        self.structs
            .get(name)
            .ok_or_else(|| Unsupported::UnknownType(name.to_string()))
    }
}

impl ModulePlan {
    /// Build the plan of a validated module.
    pub(crate) fn build(
        module: &ModuleDescriptor,
        layout: &ModuleLayout,
        backend: &dyn Backend,
        config: &EmitConfig,
    ) -> Result<Self> {
        let mut types = Scope::new(backend.name());
        let names = NameTable::build(module, backend, &mut types)?;
        let planner = Planner {
            backend,
            config,
            names: &names,
        };

        // Types, functions and constants share one scope in some host languages.
        let shared = backend.naming().shared_namespace;
        let mut functions_scope = Scope::new(backend.name());
        let mut constants_scope = Scope::new(backend.name());

        let mut constants = Vec::with_capacity(module.constants.len());
        for def in &module.constants {
            let scope = if shared { &mut types } else { &mut constants_scope };
            constants.push(planner.constant(def, scope)?);
        }

        let enums = module
            .enums
            .iter()
            .map(|def| planner.enumeration(def))
            .collect::<Result<Vec<_>>>()?;

        let deferred = if backend.defers_forward_values() {
            deferred_structs(module, &names)
        } else {
            vec![false; module.structs.len()]
        };
        let mut structs = Vec::with_capacity(module.structs.len() * 2);
        let mut declarations = Vec::with_capacity(module.structs.len());
        for (index, def) in module.structs.iter().enumerate() {
            let start = structs.len();
            planner.structure(index, def, layout, deferred[index], &mut structs)?;
            declarations.push(start..structs.len());
        }
        let completion_order = completion_order(module, &names, &deferred, &declarations);

        let mut functions = Vec::with_capacity(module.functions.len());
        for def in &module.functions {
            let scope = if shared { &mut types } else { &mut functions_scope };
            functions.push(planner.function(def, scope)?);
        }

        let plan = Self {
            module_name: module.name.clone(),
            library_name: config
                .library_name
                .clone()
                .unwrap_or_else(|| backend.default_library_name(module)),
            constants,
            enums,
            structs,
            functions,
            completion_order,
        };
        debug!(
            backend = backend.name(),
            constants = plan.constants.len(),
            enums = plan.enums.len(),
            structs = plan.structs.len(),
            functions = plan.functions.len(),
            placeholders = plan.placeholders(),
            deferred = plan.completion_order.len(),
            "binding plan ready"
        );
        Ok(plan)
    }
}

/// Declaration indices of the structs `def` embeds by value.
fn embedded<'a>(def: &'a StructDef, names: &'a NameTable) -> impl Iterator<Item = usize> + 'a {
    def.fields.iter().filter_map(move |field| match &field.ty {
        NativeType::Struct(name) => names.struct_index(name),
        _ => None,
    })
}

/// Structs that embed, directly or through another deferred struct, a struct
/// declared at or after themselves.
fn deferred_structs(module: &ModuleDescriptor, names: &NameTable) -> Vec<bool> {
    let mut deferred: Vec<bool> = Vec::with_capacity(module.structs.len());
    for (index, def) in module.structs.iter().enumerate() {
        let late = embedded(def, names).any(|j| j >= index || deferred[j]);
        deferred.push(late);
    }
    deferred
}

/// Post-order walk over the by-value dependencies of deferred structs.
fn completion_order(
    module: &ModuleDescriptor,
    names: &NameTable,
    deferred: &[bool],
    declarations: &[Range<usize>],
) -> Vec<usize> {
    let mut walk = Completion {
        module,
        names,
        deferred,
        declarations,
        visited: vec![false; deferred.len()],
        order: Vec::new(),
    };
    for index in (0..deferred.len()).filter(|&i| deferred[i]) {
        walk.visit(index);
    }
    walk.order
}

struct Completion<'a> {
    module: &'a ModuleDescriptor,
    names: &'a NameTable,
    deferred: &'a [bool],
    declarations: &'a [Range<usize>],
    visited: Vec<bool>,
    order: Vec<usize>,
}

impl Completion<'_> {
    fn visit(&mut self, index: usize) {
        if self.visited[index] {
            return;
        }
        self.visited[index] = true;
        let (module, names) = (self.module, self.names);
        for dep in embedded(&module.structs[index], names) {
            if self.deferred[dep] {
                self.visit(dep);
            }
        }
        self.order.extend(self.declarations[index].clone());
    }
}

struct Planner<'a> {
    backend: &'a dyn Backend,
    config: &'a EmitConfig,
    names: &'a NameTable,
}

impl Planner<'_> {
    fn ident(&self, kind: IdentKind, name: &str) -> String {
        self.backend.naming().ident(kind, name)
    }

    fn docs(&self, lines: &[String], deprecated: Option<&str>) -> Docs {
        if !self.config.emit_docs {
            return Docs::default();
        }
        Docs {
            lines: lines.to_vec(),
            deprecated: deprecated.map(String::from),
        }
    }

    fn map(
        &self,
        ty: &NativeType,
        cx: TypeContext<'_>,
        item: impl FnOnce() -> String,
    ) -> Result<String> {
        self.backend
            .map_type(ty, &cx)
            .map_err(|reason| EmitError::UnsupportedType {
                backend: self.backend.name(),
                item: item(),
                ty: ty.to_string(),
                reason,
            })
    }

    fn is_representable(&self, def: &ConstantDef) -> bool {
        let model = &self.config.data_model;
        self.config.literal_filter.as_ref().map_or_else(
            || self.backend.is_representable(def, model),
            |filter| filter.accepts(def),
        )
    }

    fn constant(&self, def: &ConstantDef, scope: &mut Scope) -> Result<Planned<PlannedConstant>> {
        let value = if self.is_representable(def) {
            let model = &self.config.data_model;
            self.backend.render_literal(def, self.names, model)
        } else {
            None
        };
        let Some(value) = value else {
            warn!(
                backend = self.backend.name(),
                constant = %def.name,
                literal = %def.value,
                "unsupported literal, emitting placeholder"
            );
            return Ok(Planned::Placeholder {
                native_name: def.name.clone(),
                reason: format!("unsupported literal `{}`", def.value),
            });
        };

        let cx = TypeContext::new(TypeSlot::Constant, self.names);
        let ty = self.map(&def.ty, cx, || format!("constant `{}`", def.name))?;
        let name = self.ident(IdentKind::Constant, &def.name);
        scope.claim(&name, &def.name)?;
        Ok(Planned::Declared(PlannedConstant {
            native_name: def.name.clone(),
            name,
            ty,
            value,
            docs: self.docs(&def.doc, None),
        }))
    }

    fn enumeration(&self, def: &EnumDef) -> Result<PlannedEnum> {
        let mut scope = Scope::new(self.backend.name());
        let mut variants = Vec::with_capacity(def.variants.len());
        for (variant, value) in def.discriminants() {
            let name = self.ident(IdentKind::Variant, &variant.name);
            scope.claim(&name, &variant.name)?;
            variants.push(PlannedVariant {
                name,
                value,
                docs: self.docs(&variant.doc, None),
            });
        }

        let name = self
            .names
            .enum_name(&def.name)
            .map_err(|_| undeclared_enum(&def.name))?;
        let reference_name = self.names.enum_reference_name(&def.name).ok();
        Ok(PlannedEnum {
            native_name: def.name.clone(),
            name: name.to_string(),
            reference_name: reference_name.map(String::from),
            size: self.config.data_model.enum_bytes,
            variants,
            docs: self.docs(&def.doc, def.deprecated.as_deref()),
        })
    }

    fn structure(
        &self,
        index: usize,
        def: &StructDef,
        layout: &ModuleLayout,
        deferred: bool,
        out: &mut Vec<PlannedStruct>,
    ) -> Result<()> {
        let resolved = layout
            .get(&def.name)
            .ok_or_else(|| DescriptorError::UndeclaredStruct {
                item: format!("struct `{}`", def.name),
                name: def.name.clone(),
            })?;
        if def.fields.is_empty() && !self.backend.supports_empty_structs() {
            return Err(self.unsupported_struct(def, Unsupported::EmptyStruct));
        }

        let mut scope = Scope::new(self.backend.name());
        let mut fields = Vec::with_capacity(def.fields.len());
        for (field, placed) in def.fields.iter().zip(&resolved.fields) {
            let name = self.ident(IdentKind::Field, &field.name);
            scope.claim(&name, &field.name)?;
            // Deferred fields are mapped as if every struct were declared.
            let mut cx = TypeContext::new(TypeSlot::Field, self.names);
            if !deferred {
                cx = cx.declaring(index);
            }
            let ty = self.map(&field.ty, cx, || {
                format!("struct `{}` field `{}`", def.name, field.name)
            })?;
            fields.push(PlannedField {
                name,
                ty,
                offset: placed.offset,
                size: placed.size,
                docs: self.docs(&field.doc, None),
            });
        }

        for shape in &resolved.shapes {
            let name = match shape.mode {
                PassingMode::ByValue => self.names.value_name(&def.name),
                PassingMode::ByReference => self.names.reference_name(&def.name),
            }
            .map_err(|reason| self.unsupported_struct(def, reason))?;
            out.push(PlannedStruct {
                native_name: def.name.clone(),
                name: name.to_string(),
                shape: *shape,
                fields: fields.clone(),
                size: resolved.size,
                align: resolved.align,
                docs: self.docs(&def.doc, def.deprecated.as_deref()),
                deferred,
            });
        }
        Ok(())
    }

    fn unsupported_struct(&self, def: &StructDef, reason: Unsupported) -> EmitError {
        EmitError::UnsupportedType {
            backend: self.backend.name(),
            item: format!("struct `{}`", def.name),
            ty: format!("struct {}", def.name),
            reason,
        }
    }

    fn function(&self, def: &FunctionDef, scope: &mut Scope) -> Result<Planned<PlannedFunction>> {
        let planned = match self.signature(def) {
            Ok(planned) => planned,
            Err(err @ EmitError::UnsupportedType { .. })
                if !self.config.error_on_unsupported_type =>
            {
                warn!(
                    backend = self.backend.name(),
                    function = %def.name,
                    error = %err,
                    "unsupported signature, emitting placeholder"
                );
                return Ok(Planned::Placeholder {
                    native_name: def.name.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        scope.claim(&planned.name, &def.name)?;
        if planned.name != def.name && self.backend.binds_by_identifier() {
            warn!(
                backend = self.backend.name(),
                function = %def.name,
                emitted = %planned.name,
                "function identifier differs from its native symbol"
            );
        }
        Ok(Planned::Declared(planned))
    }

    fn signature(&self, def: &FunctionDef) -> Result<PlannedFunction> {
        let mut scope = Scope::new(self.backend.name());
        let mut params = Vec::with_capacity(def.params.len());
        for (index, param) in def.params.iter().enumerate() {
            let name = param.explicit_name().map_or_else(
                || format!("arg{index}"),
                |name| self.ident(IdentKind::Param, name),
            );
            scope.claim(&name, param.explicit_name().unwrap_or(&name))?;
            let cx = TypeContext::new(TypeSlot::Param, self.names);
            let ty = self.map(&param.ty, cx, || {
                format!("function `{}` parameter {index}", def.name)
            })?;
            params.push(PlannedParam { name, ty });
        }

        let cx = TypeContext::new(TypeSlot::Return, self.names);
        let ret = self.map(&def.ret, cx, || {
            format!("function `{}` return type", def.name)
        })?;

        Ok(PlannedFunction {
            native_name: def.name.clone(),
            name: self.ident(IdentKind::Function, &def.name),
            params,
            ret,
            docs: self.docs(&def.doc, def.deprecated.as_deref()),
        })
    }
}

fn undeclared_enum(name: &str) -> EmitError {
    DescriptorError::UndeclaredEnum {
        item: format!("enum `{name}`"),
        name: name.to_string(),
    }
    .into()
}

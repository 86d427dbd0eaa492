//! Structure layout resolution.
//!
//! Mirrors the native layout: fields stay in declaration order and are placed
//! with C alignment rules. Nothing is reordered or packed.

use ffibind_ir::{DescriptorError, ModuleDescriptor, NativeType, StructDef};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::data_model::{DataModel, align_up};
use crate::shape::VariantShape;

/// Placement of one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
}

/// Resolved layout of one structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
    /// One shape per supported passing mode, by-value first.
    pub shapes: Vec<VariantShape>,
}

impl StructLayout {
    /// Field names in emitted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Layouts for every structure of a module, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ModuleLayout {
    structs: Vec<StructLayout>,
    index: FxHashMap<String, usize>,
}

impl ModuleLayout {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StructLayout> {
        self.index.get(name).map(|&i| &self.structs[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StructLayout> {
        self.structs.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.structs.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModuleLayout {
    type Item = &'a StructLayout;
    type IntoIter = std::slice::Iter<'a, StructLayout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Computes [`ModuleLayout`] under a [`DataModel`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutResolver {
    model: DataModel,
}

impl LayoutResolver {
    #[must_use]
    pub const fn new(model: DataModel) -> Self {
        Self { model }
    }

    #[must_use]
    pub const fn model(&self) -> DataModel {
        self.model
    }

    /// Resolve every structure in the module.
    ///
    /// # Errors
    ///
    /// Fails on by-value cycles and references to undeclared structs.
    pub fn resolve(&self, module: &ModuleDescriptor) -> Result<ModuleLayout, DescriptorError> {
        let defs: FxHashMap<&str, &StructDef> = module
            .structs
            .iter()
            .map(|s| (s.name.as_str(), s))
            .collect();
        let mut state = Resolution {
            model: self.model,
            defs,
            resolved: FxHashMap::default(),
            stack: Vec::new(),
        };

        let mut layout = ModuleLayout::default();
        for def in &module.structs {
            let resolved = state.resolve_named(&def.name, &def.name)?.clone();
            trace!(
                name = %resolved.name,
                size = resolved.size,
                align = resolved.align,
                "resolved struct layout"
            );
            layout.index.insert(def.name.clone(), layout.structs.len());
            layout.structs.push(resolved);
        }

        debug!(module = %module.name, structs = layout.len(), "resolved layouts");
        Ok(layout)
    }
}

struct Resolution<'a> {
    model: DataModel,
    defs: FxHashMap<&'a str, &'a StructDef>,
    resolved: FxHashMap<&'a str, StructLayout>,
    /// Structs whose layout is being computed, outermost first.
    stack: Vec<&'a str>,
}

impl<'a> Resolution<'a> {
    fn resolve_named(
        &mut self,
        owner: &str,
        name: &'a str,
    ) -> Result<&StructLayout, DescriptorError> {
        if self.resolved.contains_key(name) {
            return Ok(&self.resolved[name]);
        }
        if let Some(start) = self.stack.iter().position(|s| *s == name) {
            let mut path: Vec<String> =
                self.stack[start..].iter().map(ToString::to_string).collect();
            path.push(name.to_string());
            return Err(DescriptorError::RecursiveStruct {
                name: name.to_string(),
                path,
            });
        }

        let def = *self
            .defs
            .get(name)
            .ok_or_else(|| DescriptorError::UndeclaredStruct {
                item: format!("struct `{owner}`"),
                name: name.to_string(),
            })?;

        self.stack.push(name);
        let computed = self.layout_of(def);
        self.stack.pop();
        self.resolved.insert(name, computed?);
        Ok(&self.resolved[name])
    }

    fn layout_of(&mut self, def: &'a StructDef) -> Result<StructLayout, DescriptorError> {
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut offset = 0;
        let mut align = 1;
        for field in &def.fields {
            let (size, field_align) = self.size_of(&def.name, &field.ty)?;
            offset = align_up(offset, field_align);
            fields.push(FieldLayout {
                name: field.name.clone(),
                offset,
                size,
                align: field_align,
            });
            offset += size;
            align = align.max(field_align);
        }

        Ok(StructLayout {
            name: def.name.clone(),
            fields,
            size: align_up(offset, align),
            align,
            shapes: def.modes.iter().map(VariantShape::for_mode).collect(),
        })
    }

    fn size_of(
        &mut self,
        owner: &str,
        ty: &'a NativeType,
    ) -> Result<(usize, usize), DescriptorError> {
        match ty {
            NativeType::Primitive(prim) => Ok(self.model.primitive(*prim)),
            NativeType::Pointer(_) => Ok(self.model.pointer()),
            NativeType::Enum(_) => Ok(self.model.enumeration()),
            NativeType::Void => Err(DescriptorError::VoidValue {
                item: format!("struct `{owner}`"),
            }),
            NativeType::Struct(name) => {
                let nested = self.resolve_named(owner, name)?;
                Ok((nested.size, nested.align))
            }
        }
    }
}

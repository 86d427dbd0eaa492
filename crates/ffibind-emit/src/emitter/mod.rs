//! Lazy block emission.
//!
//! [`emit`] validates the module, resolves layouts and builds the binding
//! plan up front. Every fatal error surfaces there; the returned
//! [`Emission`] only renders.

use std::iter::FusedIterator;

use ffibind_ir::{ModuleDescriptor, PassingMode};
use ffibind_layout::LayoutResolver;
use tracing::{debug, trace};

use crate::backend::Backend;
use crate::block::{Bindings, Section, TextBlock};
use crate::config::EmitConfig;
use crate::error::Result;
use crate::plan::{ModulePlan, Planned, PlannedConstant, PlannedFunction};
use crate::writer::SourceWriter;

/// Validate, lay out and plan `module` for `backend`.
///
/// # Errors
///
/// Fails on malformed descriptors, unsupported types and name collisions.
pub fn plan_module(
    module: &ModuleDescriptor,
    backend: &dyn Backend,
    config: &EmitConfig,
) -> Result<ModulePlan> {
    module.validate()?;
    let layout = LayoutResolver::new(config.data_model).resolve(module)?;
    ModulePlan::build(module, &layout, backend, config)
}

/// Emit `module` through `backend`.
///
/// Blocks come out in a fixed order: library load, constants, enums, structs
/// (each passing mode right after the previous one of the same struct,
/// by-value first), functions, epilogue.
///
/// # Errors
///
/// Fails before producing any block on malformed descriptors, unsupported
/// types and name collisions.
pub fn emit<'a>(
    module: &ModuleDescriptor,
    backend: &'a dyn Backend,
    config: &'a EmitConfig,
) -> Result<Emission<'a>> {
    let plan = plan_module(module, backend, config)?;
    debug!(backend = backend.name(), module = %module.name, "emitting bindings");
    Ok(Emission {
        backend,
        config,
        plan,
        cursor: Cursor::LibraryLoad,
    })
}

/// Emitter bound to one configuration.
#[derive(Clone, Debug, Default)]
pub struct BindingEmitter {
    config: EmitConfig,
}

impl BindingEmitter {
    #[must_use]
    pub const fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// See [`plan_module`].
    ///
    /// # Errors
    ///
    /// Fails on malformed descriptors, unsupported types and name collisions.
    pub fn plan(&self, module: &ModuleDescriptor, backend: &dyn Backend) -> Result<ModulePlan> {
        plan_module(module, backend, &self.config)
    }

    /// See [`emit`].
    ///
    /// # Errors
    ///
    /// Fails on malformed descriptors, unsupported types and name collisions.
    pub fn emit<'a>(
        &'a self,
        module: &ModuleDescriptor,
        backend: &'a dyn Backend,
    ) -> Result<Emission<'a>> {
        emit(module, backend, &self.config)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    LibraryLoad,
    Constant(usize),
    Enum(usize),
    Struct(usize),
    Function(usize),
    Epilogue,
    Done,
}

/// Lazy, single-pass sequence of [`TextBlock`]s.
pub struct Emission<'a> {
    backend: &'a dyn Backend,
    config: &'a EmitConfig,
    plan: ModulePlan,
    cursor: Cursor,
}

impl Emission<'_> {
    /// The plan being rendered.
    #[must_use]
    pub const fn plan(&self) -> &ModulePlan {
        &self.plan
    }

    /// Render the remaining blocks into one source file.
    #[must_use]
    pub fn into_source(self) -> String {
        self.collect::<Bindings>().to_source()
    }

    fn writer(&self, level: usize) -> SourceWriter {
        let indent = self
            .config
            .indent_width
            .unwrap_or_else(|| self.backend.indent_width());
        SourceWriter::new(indent, self.config.line_length).at_level(level)
    }

    fn library_load(&self) -> TextBlock {
        let mut out = self.writer(0);
        self.backend
            .write_library_load(&mut out, &self.plan, self.config);
        TextBlock::new(Section::LibraryLoad, None, out.finish())
    }

    fn placeholder(&self, section: Section, name: &str, text: &str) -> TextBlock {
        let mut out = self.writer(self.backend.item_level());
        out.line(&self.backend.comment(text));
        TextBlock::placeholder(section, name.to_string(), out.finish())
    }

    fn constant(&self, item: &Planned<PlannedConstant>) -> TextBlock {
        match item {
            Planned::Declared(constant) => {
                let mut out = self.writer(self.backend.item_level());
                self.backend.write_constant(&mut out, constant, self.config);
                let name = Some(constant.native_name.clone());
                TextBlock::new(Section::Constant, name, out.finish())
            }
            Planned::Placeholder { native_name, .. } => self.placeholder(
                Section::Constant,
                native_name,
                &format!("Unsupported literal for constant {native_name}"),
            ),
        }
    }

    fn enumeration(&self, index: usize) -> Option<TextBlock> {
        let def = self.plan.enums.get(index)?;
        let mut out = self.writer(self.backend.item_level());
        self.backend.write_enum(&mut out, def, self.config);
        let name = Some(def.native_name.clone());
        Some(TextBlock::new(Section::Enum, name, out.finish()))
    }

    fn structure(&self, index: usize) -> Option<TextBlock> {
        let def = self.plan.structs.get(index)?;
        let section = match def.shape.mode {
            PassingMode::ByValue => Section::StructValue,
            PassingMode::ByReference => Section::StructReference,
        };
        let mut out = self.writer(self.backend.item_level());
        self.backend.write_struct(&mut out, def, self.config);
        let name = Some(def.native_name.clone());
        Some(TextBlock::new(section, name, out.finish()))
    }

    fn function(&self, item: &Planned<PlannedFunction>) -> TextBlock {
        match item {
            Planned::Declared(function) => {
                let mut out = self.writer(self.backend.item_level());
                self.backend.write_function(&mut out, function, self.config);
                let name = Some(function.native_name.clone());
                TextBlock::new(Section::Function, name, out.finish())
            }
            Planned::Placeholder {
                native_name,
                reason,
            } => self.placeholder(
                Section::Function,
                native_name,
                &format!("Not implemented yet: function {native_name} ({reason})"),
            ),
        }
    }

    fn epilogue(&self) -> Option<TextBlock> {
        let mut out = self.writer(0);
        self.backend
            .write_epilogue(&mut out, &self.plan, self.config)
            .then(|| TextBlock::new(Section::Epilogue, None, out.finish()))
    }
}

impl Iterator for Emission<'_> {
    type Item = TextBlock;

    fn next(&mut self) -> Option<TextBlock> {
        loop {
            let (block, next) = match self.cursor {
                Cursor::LibraryLoad => (Some(self.library_load()), Cursor::Constant(0)),
                Cursor::Constant(i) => match self.plan.constants.get(i) {
                    Some(item) => (Some(self.constant(item)), Cursor::Constant(i + 1)),
                    None => (None, Cursor::Enum(0)),
                },
                Cursor::Enum(i) => match self.enumeration(i) {
                    Some(block) => (Some(block), Cursor::Enum(i + 1)),
                    None => (None, Cursor::Struct(0)),
                },
                Cursor::Struct(i) => match self.structure(i) {
                    Some(block) => (Some(block), Cursor::Struct(i + 1)),
                    None => (None, Cursor::Function(0)),
                },
                Cursor::Function(i) => match self.plan.functions.get(i) {
                    Some(item) => (Some(self.function(item)), Cursor::Function(i + 1)),
                    None => (None, Cursor::Epilogue),
                },
                Cursor::Epilogue => (self.epilogue(), Cursor::Done),
                Cursor::Done => return None,
            };
            self.cursor = next;
            if let Some(block) = block {
                trace!(section = %block.section, name = ?block.name, "emitted block");
                return Some(block);
            }
        }
    }
}

impl FusedIterator for Emission<'_> {}

#[cfg(test)]
mod tests;

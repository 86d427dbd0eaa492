//! Structural validation of module descriptors.
//!
//! A descriptor that passes validation has no dangling references, no
//! duplicate names within a scope, only legal primitive widths, passing
//! modes that match every use site, and acyclic by-value nesting.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::ModuleDescriptor;
use crate::error::{DescriptorError, Result};
use crate::ident::{is_identifier, is_library_name};
use crate::items::{PassingMode, StructDef};
use crate::types::NativeType;

/// Where a type appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    /// Field, parameter or constant.
    Value,
    /// Function return.
    Return,
    /// Directly behind one pointer.
    Pointee,
    /// Behind two or more pointers.
    Indirect,
}

impl ModuleDescriptor {
    /// Check the descriptor's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in declaration order.
    pub fn validate(&self) -> Result<()> {
        Validator::new(self).run()
    }
}

struct Validator<'a> {
    module: &'a ModuleDescriptor,
    structs: FxHashMap<&'a str, &'a StructDef>,
    enums: FxHashSet<&'a str>,
}

impl<'a> Validator<'a> {
    fn new(module: &'a ModuleDescriptor) -> Self {
        Self {
            module,
            structs: module
                .structs
                .iter()
                .map(|s| (s.name.as_str(), s))
                .collect(),
            enums: module.enums.iter().map(|e| e.name.as_str()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        if !is_library_name(&self.module.name) {
            return Err(DescriptorError::InvalidModuleName(self.module.name.clone()));
        }

        // Structs and enums share the C tag namespace.
        unique(
            "type",
            self.module
                .structs
                .iter()
                .map(|s| s.name.as_str())
                .chain(self.module.enums.iter().map(|e| e.name.as_str())),
        )?;
        unique(
            "function",
            self.module.functions.iter().map(|f| f.name.as_str()),
        )?;
        unique(
            "constant",
            self.module.constants.iter().map(|c| c.name.as_str()),
        )?;

        for constant in &self.module.constants {
            identifier("constant", &constant.name)?;
            let item = format!("constant `{}`", constant.name);
            self.check_type(&item, &constant.ty, Position::Value)?;
        }

        for def in &self.module.enums {
            identifier("enum", &def.name)?;
            let scope = format!("enum `{}` variant", def.name);
            for variant in &def.variants {
                identifier(&scope, &variant.name)?;
            }
            unique(&scope, def.variants.iter().map(|v| v.name.as_str()))?;
        }

        for def in &self.module.structs {
            self.check_struct(def)?;
        }

        for func in &self.module.functions {
            identifier("function", &func.name)?;
            let scope = format!("function `{}` parameter", func.name);
            unique(&scope, func.params.iter().filter_map(|p| p.explicit_name()))?;
            for (index, param) in func.params.iter().enumerate() {
                if let Some(name) = param.explicit_name() {
                    identifier(&scope, name)?;
                }
                let item = format!("function `{}` parameter {index}", func.name);
                self.check_type(&item, &param.ty, Position::Value)?;
            }
            let item = format!("function `{}` return type", func.name);
            self.check_type(&item, &func.ret, Position::Return)?;
        }

        self.check_acyclic()
    }

    fn check_struct(&self, def: &StructDef) -> Result<()> {
        identifier("struct", &def.name)?;
        if def.modes.is_empty() {
            return Err(DescriptorError::NoPassingModes(def.name.clone()));
        }
        let scope = format!("struct `{}` field", def.name);
        unique(&scope, def.fields.iter().map(|f| f.name.as_str()))?;
        for field in &def.fields {
            identifier(&scope, &field.name)?;
            let item = format!("struct `{}` field `{}`", def.name, field.name);
            self.check_type(&item, &field.ty, Position::Value)?;
        }
        Ok(())
    }

    fn check_type(&self, item: &str, ty: &NativeType, position: Position) -> Result<()> {
        match ty {
            NativeType::Void => {
                if position == Position::Value {
                    return Err(DescriptorError::VoidValue {
                        item: item.to_string(),
                    });
                }
                Ok(())
            }
            NativeType::Primitive(prim) => {
                if prim.has_valid_width() {
                    Ok(())
                } else {
                    Err(DescriptorError::InvalidWidth {
                        item: item.to_string(),
                        ty: ty.to_string(),
                    })
                }
            }
            NativeType::Struct(name) => {
                let def = self.structs.get(name.as_str()).ok_or_else(|| {
                    DescriptorError::UndeclaredStruct {
                        item: item.to_string(),
                        name: name.clone(),
                    }
                })?;
                let required = match position {
                    Position::Value | Position::Return => Some(PassingMode::ByValue),
                    Position::Pointee => Some(PassingMode::ByReference),
                    Position::Indirect => None,
                };
                if let Some(mode) = required
                    && !def.modes.contains(mode)
                {
                    return Err(DescriptorError::ModeMismatch {
                        item: item.to_string(),
                        name: name.clone(),
                        mode,
                    });
                }
                Ok(())
            }
            NativeType::Enum(name) => {
                if self.enums.contains(name.as_str()) {
                    Ok(())
                } else {
                    Err(DescriptorError::UndeclaredEnum {
                        item: item.to_string(),
                        name: name.clone(),
                    })
                }
            }
            NativeType::Pointer(inner) => {
                let next = match position {
                    Position::Value | Position::Return => Position::Pointee,
                    Position::Pointee | Position::Indirect => Position::Indirect,
                };
                self.check_type(item, inner, next)
            }
        }
    }

    /// Reject structs that contain themselves through by-value fields.
    fn check_acyclic(&self) -> Result<()> {
        let mut done: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<&str> = Vec::new();
        let module = self.module;
        for def in &module.structs {
            self.visit(def.name.as_str(), &mut stack, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut FxHashSet<&'a str>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(start) = stack.iter().position(|s| *s == name) {
            let mut path: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
            path.push(name.to_string());
            return Err(DescriptorError::RecursiveStruct {
                name: name.to_string(),
                path,
            });
        }
        let Some(&def) = self.structs.get(name) else {
            return Ok(());
        };
        stack.push(name);
        for field in &def.fields {
            if let Some(inner) = field.ty.value_struct() {
                self.visit(inner, stack, done)?;
            }
        }
        stack.pop();
        done.insert(name);
        Ok(())
    }
}

fn identifier(what: &str, name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidIdentifier {
            what: what.to_string(),
            name: name.to_string(),
        })
    }
}

fn unique<'n>(scope: &str, names: impl Iterator<Item = &'n str>) -> Result<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(DescriptorError::DuplicateName {
                scope: scope.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

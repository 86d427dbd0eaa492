//! Python source rendering.

use ffibind_layout::{Constructor, Ownership};

use super::PythonCtypesConfig;
use crate::VERSION;
use crate::config::EmitConfig;
use crate::plan::{Docs, ModulePlan, PlannedConstant, PlannedEnum, PlannedFunction, PlannedStruct};
use crate::writer::{SourceWriter, string_literal};

pub(super) fn library_load(
    out: &mut SourceWriter,
    python: PythonCtypesConfig,
    plan: &ModulePlan,
    config: &EmitConfig,
) {
    if let Some(header) = &config.header {
        out.lines(header.lines());
    }
    if config.include_version {
        out.line(&format!("# Generated with ffibind:{VERSION}"));
    }
    if let Some(warning) = &config.autogen_warning {
        for line in warning.lines() {
            out.line(format!("# {line}").trim_end());
        }
    }
    out.blank_line();

    out.line("import ctypes");
    if python.use_find_library {
        out.line("import ctypes.util");
    }
    if !plan.enums.is_empty() {
        out.line("import enum");
    }
    out.blank_line();

    out.line(&format!("_LIBRARY_NAME = {}", string_literal(&plan.library_name)));
    out.line("_library = None");
    out.line("_functions = {}");
    out.blank_line();
    out.new_line();

    out.line("def _lib():");
    out.indent();
    out.line("global _library");
    out.line("if _library is None:");
    out.indent();
    if python.use_find_library {
        out.lines([
            "path = ctypes.util.find_library(_LIBRARY_NAME) or _LIBRARY_NAME",
            "_library = ctypes.CDLL(path)",
        ]);
    } else {
        out.line("_library = ctypes.CDLL(_LIBRARY_NAME)");
    }
    out.dedent();
    out.line("return _library");
    out.dedent();
    out.blank_line();
    out.new_line();

    out.line("def _bind(symbol, restype, argtypes):");
    out.indent();
    out.line("fn = _functions.get(symbol)");
    out.line("if fn is None:");
    out.indent();
    out.lines([
        "fn = _lib()[symbol]",
        "fn.restype = restype",
        "fn.argtypes = argtypes",
        "_functions[symbol] = fn",
    ]);
    out.dedent();
    out.line("return fn");
    out.dedent();
}

fn escape_doc(line: &str) -> String {
    line.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Docstring for a class or function body.
fn docstring(out: &mut SourceWriter, docs: &Docs) -> bool {
    let mut lines: Vec<String> = docs.lines.iter().map(|l| escape_doc(l)).collect();
    if let Some(note) = &docs.deprecated {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let note = format!(".. deprecated:: {}", escape_doc(note));
        lines.push(note.trim_end().to_string());
    }
    match lines.as_slice() {
        [] => false,
        [line] => {
            out.line(&format!("\"\"\"{line}\"\"\""));
            true
        }
        [first, rest @ ..] => {
            out.line(&format!("\"\"\"{first}"));
            for line in rest {
                out.line(line);
            }
            out.line("\"\"\"");
            true
        }
    }
}

/// `#:` comments for attributes, which have no docstrings.
fn attribute_docs(out: &mut SourceWriter, docs: &Docs) {
    for line in &docs.lines {
        out.line(format!("#: {line}").trim_end());
    }
}

pub(super) fn constant(out: &mut SourceWriter, constant: &PlannedConstant) {
    attribute_docs(out, &constant.docs);
    out.line(&format!("{} = {}", constant.name, constant.value));
}

pub(super) fn enumeration(out: &mut SourceWriter, def: &PlannedEnum) {
    out.line(&format!("class {}(enum.IntEnum):", def.name));
    out.indent();
    let documented = docstring(out, &def.docs);
    if def.variants.is_empty() && !documented {
        out.line("pass");
    }
    for variant in &def.variants {
        attribute_docs(out, &variant.docs);
        out.line(&format!("{} = {}", variant.name, variant.value));
    }
    out.dedent();
}

pub(super) fn structure(out: &mut SourceWriter, def: &PlannedStruct, config: &EmitConfig) {
    out.line(&format!("class {}(ctypes.Structure):", def.name));
    out.indent();
    docstring(out, &def.docs);
    if config.emit_layout_comments {
        out.line(&format!("# size {}, align {}", def.size, def.align));
    }

    if def.deferred {
        out.line("# _fields_ is assigned once every class is declared.");
    } else {
        fields(out, "_fields_", def, config);
    }

    for constructor in def.shape.constructors {
        match constructor {
            // ctypes zero-initializes structures; the inherited constructor
            // is the default one.
            Constructor::Default => {}
            Constructor::FromHandle => {
                out.blank_line();
                out.line("@classmethod");
                out.line("def from_handle(cls, handle):");
                out.indent();
                match def.shape.ownership {
                    Ownership::Owned => out.lines([
                        r#""""Copy the structure stored at ``handle``.""""#,
                        "return cls.from_buffer_copy(ctypes.string_at(handle, ctypes.sizeof(cls)))",
                    ]),
                    Ownership::Aliased => out.lines([
                        r#""""View the structure stored at ``handle`` without copying.""""#,
                        "return cls.from_address(ctypes.cast(handle, ctypes.c_void_p).value)",
                    ]),
                }
                out.dedent();
            }
        }
    }
    out.dedent();
}

/// A `_fields_` list assigned to `target`.
fn fields(out: &mut SourceWriter, target: &str, def: &PlannedStruct, config: &EmitConfig) {
    if def.fields.is_empty() {
        out.line(&format!("{target} = []"));
        return;
    }
    out.line(&format!("{target} = ["));
    out.indent();
    for field in &def.fields {
        attribute_docs(out, &field.docs);
        let entry = format!("({}, {}),", string_literal(&field.name), field.ty);
        if config.emit_layout_comments {
            let (offset, size) = (field.offset, field.size);
            out.line(&format!("{entry}  # offset {offset}, size {size}"));
        } else {
            out.line(&entry);
        }
    }
    out.dedent();
    out.line("]");
}

/// `_fields_` of deferred classes, embedded structs first.
pub(super) fn completions(out: &mut SourceWriter, plan: &ModulePlan, config: &EmitConfig) {
    for &index in &plan.completion_order {
        let def = &plan.structs[index];
        fields(out, &format!("{}._fields_", def.name), def, config);
    }
}

pub(super) fn function(out: &mut SourceWriter, def: &PlannedFunction, config: &EmitConfig) {
    let names: Vec<String> = def.params.iter().map(|p| p.name.clone()).collect();
    out.write(&format!("def {}(", def.name));
    out.write_list(&names, ", ", config.list_layout, "):");
    out.line("):");
    out.indent();
    docstring(out, &def.docs);
    let argtypes: Vec<&str> = def.params.iter().map(|p| p.ty.as_str()).collect();
    out.line(&format!(
        "return _bind({}, {}, [{}])({})",
        string_literal(&def.native_name),
        def.ret,
        argtypes.join(", "),
        names.join(", ")
    ));
    out.dedent();
}

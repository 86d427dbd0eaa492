//! Java source rendering.

use ffibind_layout::{Constructor, Ownership};

use super::JavaJnaConfig;
use crate::VERSION;
use crate::config::EmitConfig;
use crate::plan::{Docs, ModulePlan, PlannedConstant, PlannedEnum, PlannedFunction, PlannedStruct};
use crate::writer::{SourceWriter, string_literal};

pub(super) fn library_load(
    out: &mut SourceWriter,
    java: &JavaJnaConfig,
    plan: &ModulePlan,
    config: &EmitConfig,
) {
    if let Some(header) = &config.header {
        out.lines(header.lines());
    }
    if config.include_version {
        out.line(&format!("/* Generated with ffibind:{VERSION} */"));
    }
    if let Some(warning) = &config.autogen_warning {
        for line in warning.lines() {
            out.line(format!("// {line}").trim_end());
        }
    }
    out.blank_line();

    if let Some(package) = &java.package {
        out.line(&format!("package {package};"));
        out.blank_line();
    }
    out.line("import com.sun.jna.*;");
    out.line("import com.sun.jna.ptr.*;");
    out.blank_line();

    let name = &java.interface_name;
    out.write(&format!("enum {name}Singleton"));
    out.open_brace();
    out.line("INSTANCE;");
    out.line(&format!(
        "final {name} lib = Native.load({}, {name}.class);",
        string_literal(&plan.library_name)
    ));
    out.close_brace("");
    out.blank_line();

    out.write(&format!("interface {name} extends Library"));
    out.open_brace();
    out.line(&format!("{name} INSTANCE = {name}Singleton.INSTANCE.lib;"));
    if !java.extra_defs.is_empty() {
        out.blank_line();
        out.lines(java.extra_defs.iter().map(String::as_str));
    }
}

/// Javadoc block plus `@Deprecated`.
fn docs(out: &mut SourceWriter, docs: &Docs) {
    let note = docs.deprecated.as_deref().filter(|note| !note.is_empty());
    if !docs.lines.is_empty() || note.is_some() {
        out.line("/**");
        for line in &docs.lines {
            out.line(format!(" * {line}").trim_end());
        }
        if let Some(note) = note {
            if !docs.lines.is_empty() {
                out.line(" *");
            }
            out.line(&format!(" * @deprecated {note}"));
        }
        out.line(" */");
    }
    if docs.deprecated.is_some() {
        out.line("@Deprecated");
    }
}

pub(super) fn constant(out: &mut SourceWriter, constant: &PlannedConstant) {
    docs(out, &constant.docs);
    out.line(&format!(
        "public static final {} {} = {};",
        constant.ty, constant.name, constant.value
    ));
}

/// Accessors on `Pointer` for an integer of `size` bytes.
const fn accessors(size: usize) -> (&'static str, &'static str, &'static str) {
    match size {
        1 => ("getByte", "setByte", "(byte) value.intValue()"),
        2 => ("getShort", "setShort", "(short) value.intValue()"),
        8 => ("getLong", "setLong", "value.longValue()"),
        _ => ("getInt", "setInt", "value.intValue()"),
    }
}

pub(super) fn enumeration(out: &mut SourceWriter, def: &PlannedEnum) {
    let name = &def.name;
    let size = def.size;
    let (get, set, value) = accessors(size);

    docs(out, &def.docs);
    out.write(&format!("class {name} extends IntegerType"));
    out.open_brace();
    out.write(&format!("public {name}()"));
    out.open_brace();
    out.line(&format!("super({size});"));
    out.close_brace("");
    out.new_line();
    out.write(&format!("public {name}(long value)"));
    out.open_brace();
    out.line(&format!("super({size}, value);"));
    out.close_brace("");
    out.new_line();
    out.write(&format!("public {name}(Pointer p)"));
    out.open_brace();
    out.line(&format!("this(p.{get}(0));"));
    out.close_brace("");
    if !def.variants.is_empty() {
        out.new_line();
    }
    for variant in &def.variants {
        docs(out, &variant.docs);
        out.line(&format!(
            "public static final {name} {} = new {name}({});",
            variant.name, variant.value
        ));
    }
    out.close_brace("");

    let Some(reference) = &def.reference_name else {
        return;
    };
    out.new_line();
    docs(out, &def.docs);
    out.write(&format!("class {reference} extends ByReference"));
    out.open_brace();
    out.write(&format!("public {reference}()"));
    out.open_brace();
    out.line(&format!("super({size});"));
    out.close_brace("");
    out.new_line();
    out.write(&format!("public {reference}(Pointer p)"));
    out.open_brace();
    out.line(&format!("super({size});"));
    out.line("setPointer(p);");
    out.close_brace("");
    out.new_line();
    out.write(&format!("public {name} getValue()"));
    out.open_brace();
    out.line(&format!("return new {name}(getPointer().{get}(0));"));
    out.close_brace("");
    out.new_line();
    out.write(&format!("public void setValue({name} value)"));
    out.open_brace();
    out.line(&format!("getPointer().{set}(0, {value});"));
    out.close_brace("");
    out.close_brace("");
}

pub(super) fn structure(out: &mut SourceWriter, def: &PlannedStruct, config: &EmitConfig) {
    let name = &def.name;
    let interface = match def.shape.ownership {
        Ownership::Owned => "Structure.ByValue",
        Ownership::Aliased => "Structure.ByReference",
    };

    docs(out, &def.docs);
    let order: Vec<String> = def.fields.iter().map(|f| string_literal(&f.name)).collect();
    out.write("@Structure.FieldOrder({");
    out.write_list(&order, ", ", config.list_layout, "})");
    out.line("})");
    out.write(&format!("class {name} extends Structure implements {interface}"));
    out.open_brace();
    if config.emit_layout_comments {
        out.line(&format!("// size {}, align {}", def.size, def.align));
    }

    for (i, constructor) in def.shape.constructors.iter().enumerate() {
        if i > 0 {
            out.new_line();
        }
        match constructor {
            Constructor::Default => {
                out.write(&format!("public {name}()"));
                out.open_brace();
                out.line("super();");
            }
            Constructor::FromHandle => {
                out.write(&format!("public {name}(Pointer p)"));
                out.open_brace();
                match def.shape.ownership {
                    Ownership::Owned => {
                        out.line("super();");
                        out.line("byte[] bytes = p.getByteArray(0, size());");
                        out.line("getPointer().write(0, bytes, 0, bytes.length);");
                    }
                    Ownership::Aliased => out.line("super(p);"),
                }
                out.line("read();");
            }
        }
        out.close_brace("");
    }

    if !def.fields.is_empty() {
        out.new_line();
    }
    for field in &def.fields {
        docs(out, &field.docs);
        let decl = format!("public {} {};", field.ty, field.name);
        if config.emit_layout_comments {
            out.line(&format!("{decl} // offset {}, size {}", field.offset, field.size));
        } else {
            out.line(&decl);
        }
    }
    out.close_brace("");
}

pub(super) fn function(out: &mut SourceWriter, def: &PlannedFunction, config: &EmitConfig) {
    docs(out, &def.docs);
    out.write(&format!("{} {}(", def.ret, def.name));
    let params: Vec<String> = def
        .params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    out.write_list(&params, ", ", config.list_layout, ");");
    out.line(");");
}

use std::sync::atomic::{AtomicUsize, Ordering};

use ffibind_ir::{
    ConstantDef, DescriptorError, EnumDef, FunctionDef, Literal, ModuleBuilder, ModuleDescriptor,
    NativeType, PassingModes, PrimitiveKind, StructDef, Width,
};
use ffibind_layout::DataModel;

use super::*;
use crate::backend::TypeContext;
use crate::error::{EmitError, Unsupported};
use crate::naming::{Casing, NamingPolicy};
use crate::plan::{NameTable, PlannedEnum, PlannedStruct};

/// Minimal back-end that records how many blocks it rendered.
struct Stub {
    naming: NamingPolicy,
    rendered: AtomicUsize,
    defers: bool,
}

impl Stub {
    fn new() -> Self {
        Self {
            naming: NamingPolicy {
                types: Casing::Preserve,
                functions: Casing::Preserve,
                fields: Casing::Preserve,
                constants: Casing::Preserve,
                variants: Casing::Preserve,
                params: Casing::Preserve,
                reference_suffix: "Ref",
                enum_references: false,
                shared_namespace: false,
                reserved: &["fn"],
            },
            rendered: AtomicUsize::new(0),
            defers: false,
        }
    }

    fn deferring() -> Self {
        Self {
            defers: true,
            ..Self::new()
        }
    }

    fn rendered(&self) -> usize {
        self.rendered.load(Ordering::Relaxed)
    }

    fn line(&self, out: &mut SourceWriter, text: &str) {
        self.rendered.fetch_add(1, Ordering::Relaxed);
        out.line(text);
    }
}

impl Backend for Stub {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    fn indent_width(&self) -> usize {
        2
    }

    fn file_name(&self, module: &ModuleDescriptor) -> String {
        format!("{}.stub", module.name)
    }

    fn defers_forward_values(&self) -> bool {
        self.defers
    }

    fn map_type(
        &self,
        ty: &NativeType,
        cx: &TypeContext<'_>,
    ) -> std::result::Result<String, Unsupported> {
        match ty {
            NativeType::Void => Ok("void".to_string()),
            NativeType::Primitive(prim)
                if prim.kind == PrimitiveKind::Float && prim.width == Width::Bits(16) =>
            {
                Err(Unsupported::Primitive(prim.to_string()))
            }
            NativeType::Primitive(prim) => Ok(prim.to_string()),
            NativeType::Struct(name) => cx.names.value_name(name).map(str::to_string),
            NativeType::Enum(name) => cx.names.enum_name(name).map(str::to_string),
            NativeType::Pointer(pointee) => match pointee.as_ref() {
                NativeType::Struct(name) => cx.names.reference_name(name).map(str::to_string),
                other => Ok(format!("*{}", self.map_type(other, cx)?)),
            },
        }
    }

    fn is_representable(&self, constant: &ConstantDef, _model: &DataModel) -> bool {
        constant.value.as_expr().is_some()
    }

    fn render_literal(
        &self,
        constant: &ConstantDef,
        _names: &NameTable,
        _model: &DataModel,
    ) -> Option<String> {
        constant.value.as_expr().map(str::to_string)
    }

    fn comment(&self, text: &str) -> String {
        format!("// {text}")
    }

    fn write_library_load(&self, out: &mut SourceWriter, plan: &ModulePlan, _config: &EmitConfig) {
        self.line(out, &format!("load {}", plan.library_name));
    }

    fn write_constant(
        &self,
        out: &mut SourceWriter,
        constant: &PlannedConstant,
        _config: &EmitConfig,
    ) {
        let PlannedConstant { name, ty, value, .. } = constant;
        self.line(out, &format!("const {name}: {ty} = {value}"));
    }

    fn write_enum(&self, out: &mut SourceWriter, def: &PlannedEnum, _config: &EmitConfig) {
        let variants: Vec<String> = def
            .variants
            .iter()
            .map(|v| format!("{}={}", v.name, v.value))
            .collect();
        self.line(out, &format!("enum {} {}", def.name, variants.join(" ")));
    }

    fn write_struct(&self, out: &mut SourceWriter, def: &PlannedStruct, _config: &EmitConfig) {
        let fields: Vec<String> = def
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.ty))
            .collect();
        let fields = fields.join(", ");
        self.line(out, &format!("struct {} {{ {fields} }}", def.name));
    }

    fn write_function(&self, out: &mut SourceWriter, def: &PlannedFunction, _config: &EmitConfig) {
        let params: Vec<String> = def
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        let params = params.join(", ");
        self.line(out, &format!("fn {}({params}) -> {}", def.name, def.ret));
    }

    fn write_epilogue(
        &self,
        out: &mut SourceWriter,
        _plan: &ModulePlan,
        _config: &EmitConfig,
    ) -> bool {
        self.line(out, "end");
        true
    }
}

fn int_constant(name: &str, value: &str) -> ConstantDef {
    ConstantDef::new(name, NativeType::int(32), Literal::expr(value))
}

fn sample() -> ModuleDescriptor {
    let b_ref = NativeType::pointer(NativeType::structure("b"));
    let a = StructDef::new("a", PassingModes::REFERENCE).field("b", NativeType::structure("b"));
    ModuleBuilder::new("sample")
        .function(FunctionDef::new("first").param("p", b_ref))
        .structure(StructDef::new("b", PassingModes::BOTH).field("x", NativeType::int(32)))
        .constant(int_constant("ONE", "1"))
        .enumeration(
            EnumDef::new("e")
                .variant("A")
                .variant_with("B", 7)
                .variant("C"),
        )
        .structure(a)
        .constant(int_constant("TWO", "2"))
        .function(FunctionDef::new("second").returns(NativeType::enumeration("e")))
        .build()
}

fn half_float_struct() -> ModuleDescriptor {
    ModuleBuilder::new("half")
        .structure(StructDef::new("s", PassingModes::VALUE).field("h", NativeType::float(16)))
        .build()
}

#[test]
fn test_block_order() {
    let stub = Stub::new();
    let config = EmitConfig::default();
    let blocks: Vec<TextBlock> = emit(&sample(), &stub, &config).unwrap().collect();
    let listing: Vec<(Section, Option<&str>, &str)> = blocks
        .iter()
        .map(|b| (b.section, b.name.as_deref(), b.text.as_str()))
        .collect();
    assert_eq!(
        listing,
        [
            (Section::LibraryLoad, None, "load sample\n"),
            (Section::Constant, Some("ONE"), "const ONE: int32_t = 1\n"),
            (Section::Constant, Some("TWO"), "const TWO: int32_t = 2\n"),
            (Section::Enum, Some("e"), "enum e A=0 B=7 C=8\n"),
            (Section::StructValue, Some("b"), "struct b { x: int32_t }\n"),
            (Section::StructReference, Some("b"), "struct bRef { x: int32_t }\n"),
            (Section::StructReference, Some("a"), "struct aRef { b: b }\n"),
            (Section::Function, Some("first"), "fn first(p: bRef) -> void\n"),
            (Section::Function, Some("second"), "fn second() -> e\n"),
            (Section::Epilogue, None, "end\n"),
        ]
    );
}

#[test]
fn test_emission_is_lazy() {
    let stub = Stub::new();
    let config = EmitConfig::default();
    let mut emission = emit(&sample(), &stub, &config).unwrap();
    assert_eq!(stub.rendered(), 0);

    let load = emission.next().unwrap();
    assert_eq!(load.section, Section::LibraryLoad);
    assert_eq!(stub.rendered(), 1);

    let first = emission.next().unwrap();
    assert_eq!(first.name.as_deref(), Some("ONE"));
    assert_eq!(stub.rendered(), 2);

    // Dropping the rest renders nothing more.
    drop(emission);
    assert_eq!(stub.rendered(), 2);
}

#[test]
fn test_emission_is_fused() {
    let stub = Stub::new();
    let config = EmitConfig::default();
    let mut emission = emit(&ModuleDescriptor::new("empty"), &stub, &config).unwrap();
    let mut next = || emission.next().map(|b| b.section);
    assert_eq!(next(), Some(Section::LibraryLoad));
    assert_eq!(next(), Some(Section::Epilogue));
    assert_eq!(next(), None);
    assert_eq!(next(), None);
    assert_eq!(stub.rendered(), 2);
}

#[test]
fn test_emission_is_deterministic() {
    let stub = Stub::new();
    let config = EmitConfig::default();
    let first = emit(&sample(), &stub, &config).unwrap().into_source();
    for _ in 0..5 {
        let again = emit(&sample(), &stub, &config).unwrap().into_source();
        assert_eq!(again, first);
    }
}

#[test]
fn test_fatal_errors_produce_no_blocks() {
    let stub = Stub::new();
    let config = EmitConfig::default();

    let missing = NativeType::structure("missing");
    let undeclared = ModuleBuilder::new("broken")
        .function(FunctionDef::new("f").param("p", missing))
        .build();
    let err = emit(&undeclared, &stub, &config).err();
    assert!(matches!(
        err,
        Some(EmitError::MalformedDescriptor(DescriptorError::UndeclaredStruct { ref name, .. }))
            if name == "missing"
    ));

    let err = emit(&half_float_struct(), &stub, &config).err();
    assert!(matches!(
        err,
        Some(EmitError::UnsupportedType { backend: "stub", ref item, .. })
            if item == "struct `s` field `h`"
    ));

    assert_eq!(stub.rendered(), 0);
}

#[test]
fn test_lenient_functions_become_placeholders() {
    let stub = Stub::new();
    let config = EmitConfig::default().with_error_on_unsupported_type(false);
    let module = ModuleBuilder::new("lenient")
        .function(FunctionDef::new("ok"))
        .function(FunctionDef::new("half").returns(NativeType::float(16)))
        .function(FunctionDef::new("also_ok"))
        .build();
    let emission = emit(&module, &stub, &config).unwrap();
    assert_eq!(emission.plan().placeholders(), 1);

    let bindings: Bindings = emission.collect();
    assert_eq!(
        bindings.names(Section::Function).collect::<Vec<_>>(),
        ["ok", "half", "also_ok"]
    );
    let placeholders: Vec<&TextBlock> = bindings.placeholders().collect();
    assert_eq!(placeholders.len(), 1);
    let text = &placeholders[0].text;
    assert!(text.starts_with("// Not implemented yet: function half ("));

    // Struct fields stay fatal in lenient mode.
    assert!(emit(&half_float_struct(), &stub, &config).is_err());
}

#[test]
fn test_constant_placeholder() {
    let stub = Stub::new();
    let config = EmitConfig::default();
    let opaque = Literal::opaque("FOO | BAR");
    let module = ModuleBuilder::new("consts")
        .constant(int_constant("A", "1"))
        .constant(ConstantDef::new("OPAQUE", NativeType::int(32), opaque))
        .constant(int_constant("B", "2"))
        .build();
    let bindings: Bindings = emit(&module, &stub, &config).unwrap().collect();
    let constants: Vec<(&str, bool)> = bindings
        .section(Section::Constant)
        .map(|b| (b.text.as_str(), b.placeholder))
        .collect();
    assert_eq!(
        constants,
        [
            ("const A: int32_t = 1\n", false),
            ("// Unsupported literal for constant OPAQUE\n", true),
            ("const B: int32_t = 2\n", false),
        ]
    );
}

#[test]
fn test_escaped_names_and_collisions() {
    let stub = Stub::new();
    let config = EmitConfig::default();

    let function = FunctionDef::new("fn")
        .param("fn", NativeType::int(8))
        .unnamed_param(NativeType::int(8));
    let reserved = ModuleBuilder::new("reserved").function(function).build();
    let source = emit(&reserved, &stub, &config).unwrap().into_source();
    assert!(source.contains("fn fn_(fn_: int8_t, arg1: int8_t) -> void\n"));

    // `aRef` is both the reference name of `a` and a struct of its own.
    let clash = ModuleBuilder::new("clash")
        .structure(StructDef::new("a", PassingModes::BOTH))
        .structure(StructDef::new("aRef", PassingModes::VALUE))
        .build();
    let err = emit(&clash, &stub, &config).err();
    assert!(matches!(
        err,
        Some(EmitError::NameCollision {
            backend: "stub",
            ref name,
            ref first,
            ref second,
        }) if name == "aRef" && first == "a" && second == "aRef"
    ));
}

#[test]
fn test_completion_order_puts_embedded_structs_first() {
    let embeds = |name: &str, modes, inner: &str| {
        StructDef::new(name, modes).field(inner, NativeType::structure(inner))
    };
    let module = ModuleBuilder::new("chain")
        .structure(embeds("a", PassingModes::BOTH, "b"))
        .structure(embeds("b", PassingModes::VALUE, "c"))
        .structure(StructDef::new("c", PassingModes::VALUE).field("x", NativeType::int(32)))
        .structure(embeds("d", PassingModes::VALUE, "c"))
        .build();

    let plan = plan_module(&module, &Stub::deferring(), &EmitConfig::default()).unwrap();
    let deferred: Vec<(&str, bool)> = plan
        .structs
        .iter()
        .map(|s| (s.name.as_str(), s.deferred))
        .collect();
    assert_eq!(
        deferred,
        [
            ("a", true),
            ("aRef", true),
            ("b", true),
            ("c", false),
            ("d", false),
        ]
    );
    let order: Vec<&str> = plan
        .completion_order
        .iter()
        .map(|&i| plan.structs[i].name.as_str())
        .collect();
    assert_eq!(order, ["b", "a", "aRef"]);

    // Without deferral nothing is left for the epilogue.
    let plan = plan_module(&module, &Stub::new(), &EmitConfig::default()).unwrap();
    assert!(plan.completion_order.is_empty());
    assert!(plan.structs.iter().all(|s| !s.deferred));
}

#[test]
fn test_binding_emitter() {
    let stub = Stub::new();
    let emitter = BindingEmitter::new(EmitConfig::default().with_library_name("libsample.so"));
    let plan = emitter.plan(&sample(), &stub).unwrap();
    assert_eq!(plan.library_name, "libsample.so");
    assert_eq!(plan.structs.len(), 3);
    assert_eq!(stub.rendered(), 0);

    let source = emitter.emit(&sample(), &stub).unwrap().into_source();
    assert!(source.starts_with("load libsample.so\n\nconst ONE"));
    assert!(source.ends_with("\nend\n"));
}

#[test]
fn test_indent_override() {
    struct Nested(Stub);

    impl Backend for Nested {
        fn name(&self) -> &'static str {
            self.0.name()
        }
        fn naming(&self) -> &NamingPolicy {
            self.0.naming()
        }
        fn indent_width(&self) -> usize {
            self.0.indent_width()
        }
        fn item_level(&self) -> usize {
            1
        }
        fn file_name(&self, module: &ModuleDescriptor) -> String {
            self.0.file_name(module)
        }
        fn map_type(
            &self,
            ty: &NativeType,
            cx: &TypeContext<'_>,
        ) -> std::result::Result<String, Unsupported> {
            self.0.map_type(ty, cx)
        }
        fn is_representable(&self, constant: &ConstantDef, model: &DataModel) -> bool {
            self.0.is_representable(constant, model)
        }
        fn render_literal(
            &self,
            constant: &ConstantDef,
            names: &NameTable,
            model: &DataModel,
        ) -> Option<String> {
            self.0.render_literal(constant, names, model)
        }
        fn comment(&self, text: &str) -> String {
            self.0.comment(text)
        }
        fn write_library_load(
            &self,
            out: &mut SourceWriter,
            plan: &ModulePlan,
            config: &EmitConfig,
        ) {
            self.0.write_library_load(out, plan, config);
        }
        fn write_constant(
            &self,
            out: &mut SourceWriter,
            constant: &PlannedConstant,
            config: &EmitConfig,
        ) {
            self.0.write_constant(out, constant, config);
        }
        fn write_enum(&self, out: &mut SourceWriter, def: &PlannedEnum, config: &EmitConfig) {
            self.0.write_enum(out, def, config);
        }
        fn write_struct(&self, out: &mut SourceWriter, def: &PlannedStruct, config: &EmitConfig) {
            self.0.write_struct(out, def, config);
        }
        fn write_function(
            &self,
            out: &mut SourceWriter,
            def: &PlannedFunction,
            config: &EmitConfig,
        ) {
            self.0.write_function(out, def, config);
        }
    }

    let nested = Nested(Stub::new());
    let module = ModuleBuilder::new("nested")
        .function(FunctionDef::new("f"))
        .build();

    let default: Bindings = emit(&module, &nested, &EmitConfig::default())
        .unwrap()
        .collect();
    assert_eq!(default.names(Section::Function).count(), 1);
    assert_eq!(default.blocks[1].text, "  fn f() -> void\n");
    // No epilogue unless the back-end writes one.
    assert_eq!(default.blocks.len(), 2);

    let config = EmitConfig::default().with_indent_width(4);
    let wide: Bindings = emit(&module, &nested, &config).unwrap().collect();
    assert_eq!(wide.blocks[1].text, "    fn f() -> void\n");
}

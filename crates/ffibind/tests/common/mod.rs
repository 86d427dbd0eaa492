//! Shared fixtures for integration tests.

#![allow(dead_code)]

use ffibind::{
    ConstantDef, FunctionDef, Literal, ModuleBuilder, ModuleDescriptor, NativeType, PassingModes,
    StructDef,
};

/// The module from the reference scenario: one constant that Java cannot
/// express, one single-field struct in both passing modes, two functions.
pub fn mod_2018() -> ModuleDescriptor {
    let too = ConstantDef::new("EXPORT_ME_TOO", NativeType::uint(8), Literal::expr("0x2a"));
    let def = StructDef::new("ExportMe", PassingModes::BOTH).field("val", NativeType::uint(64));
    let handle = NativeType::pointer(NativeType::structure("ExportMe"));
    ModuleBuilder::new("mod_2018")
        .constant(too)
        .structure(def)
        .function(FunctionDef::new("export_me").param("val", handle))
        .function(FunctionDef::new("from_really_nested_mod"))
        .build()
}

/// JSON form of [`mod_2018`].
pub const MOD_2018_JSON: &str = r#"{
  "name": "mod_2018",
  "constants": [
    {
      "name": "EXPORT_ME_TOO",
      "ty": {"primitive": {"kind": "uint", "width": {"bits": 8}}},
      "value": {"expr": "0x2a"}
    }
  ],
  "structs": [
    {
      "name": "ExportMe",
      "fields": [{"name": "val", "ty": {"primitive": {"kind": "uint", "width": {"bits": 64}}}}],
      "modes": ["by_value", "by_reference"]
    }
  ],
  "functions": [
    {"name": "export_me", "params": [{"name": "val", "ty": {"pointer": {"struct": "ExportMe"}}}]},
    {"name": "from_really_nested_mod"}
  ]
}"#;

/// Deterministic Fisher-Yates shuffle driven by xorshift.
pub fn shuffled(n: usize, seed: u64) -> Vec<usize> {
    let mut state = seed.max(1);
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = usize::try_from(state % (i as u64 + 1)).unwrap();
        order.swap(i, j);
    }
    order
}

/// Names in declaration order plus the module declaring `count` structs,
/// functions and constants, each kind numbered in shuffled order.
pub struct ScaleModule {
    pub module: ModuleDescriptor,
    pub structs: Vec<String>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
}

pub fn scale_module(count: usize, seed: u64) -> ScaleModule {
    let widths = [8, 16, 32, 64];
    let mut builder = ModuleBuilder::new("scale");
    let mut structs = Vec::new();
    let mut functions = Vec::new();
    let mut constants = Vec::new();

    for (position, k) in shuffled(count, seed).into_iter().enumerate() {
        let name = format!("record_{k}");
        let mut def = StructDef::new(&name, PassingModes::BOTH);
        for f in 0..=(k % 4) {
            def = def.field(format!("f{f}"), NativeType::int(widths[(k + f) % 4]));
        }
        // Embed the previous struct by value to exercise nested layout.
        if let Some(previous) = structs.last().filter(|_| position % 3 == 0) {
            def = def.field("inner", NativeType::structure(previous));
        }
        builder = builder.structure(def);
        structs.push(name);
    }

    for k in shuffled(count, seed.rotate_left(17)) {
        let name = format!("call_{k}");
        let target = &structs[k % structs.len()];
        builder = builder.function(
            FunctionDef::new(&name)
                .param("handle", NativeType::pointer(NativeType::structure(target)))
                .param("count", NativeType::int(32))
                .returns(NativeType::int(64)),
        );
        functions.push(name);
    }

    for k in shuffled(count, seed.rotate_left(31)) {
        let name = format!("LIMIT_{k}");
        builder = builder.constant(ConstantDef::new(
            &name,
            NativeType::int(32),
            Literal::expr(k.to_string()),
        ));
        constants.push(name);
    }

    ScaleModule {
        module: builder.build(),
        structs,
        functions,
        constants,
    }
}

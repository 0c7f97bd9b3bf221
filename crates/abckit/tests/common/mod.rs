//! Shared fixtures for integration tests

#![allow(dead_code)]

use abckit::{
    BlockRef, File, FileBuilder, FunctionDecl, FunctionRef, Graph, Mode, ModuleRef, Scope,
    Target, TypeId,
};
use tempfile::TempDir;

/// Dynamic file with one module, one top-level function `m0F0` and four
/// anonymous functions
pub fn enumerators0_dynamic() -> File {
    let mut builder = FileBuilder::new(Mode::Dynamic);
    let module = builder
        .add_module("enumerators0_dynamic", Target::Js)
        .unwrap();
    builder
        .add_function(Scope::Module(module), "m0F0", FunctionDecl::new())
        .unwrap();
    for _ in 0..4 {
        builder.add_anonymous_function(module, 0).unwrap();
    }
    builder.build()
}

/// Static file with a class hierarchy, a namespace and typed functions
pub fn static_shapes() -> File {
    let mut builder = FileBuilder::new(Mode::Static);
    let module = builder.add_module("shapes", Target::ArkTsV1).unwrap();
    let shape = builder.add_class(Scope::Module(module), "Shape").unwrap();
    let circle = builder.add_class(Scope::Module(module), "Circle").unwrap();
    builder.set_super_class(circle, shape).unwrap();
    builder
        .add_function(Scope::Class(circle), "area", FunctionDecl::new())
        .unwrap();

    let geometry = builder.add_namespace(Scope::Module(module), "geometry").unwrap();
    let file = builder.file_mut();
    let f64_ty = file.create_type(TypeId::F64).unwrap();
    let i32_ty = file.create_type(TypeId::I32).unwrap();
    builder
        .add_function(
            Scope::Namespace(geometry),
            "scale",
            FunctionDecl::static_fn().with_signature(vec![f64_ty, i32_ty], f64_ty),
        )
        .unwrap();
    builder.build()
}

/// Dynamic file with a JS module holding `main` and a native module
pub fn mixed_targets() -> (File, ModuleRef, ModuleRef) {
    let mut builder = FileBuilder::new(Mode::Dynamic);
    let js = builder.add_module("app", Target::Js).unwrap();
    let native = builder.add_module("libnative", Target::Native).unwrap();
    builder
        .add_function(Scope::Module(js), "main", FunctionDecl::new())
        .unwrap();
    (builder.build(), js, native)
}

pub fn first_module(file: &File) -> ModuleRef {
    let mut found = None;
    file.file_enumerate_modules(|m| {
        found = Some(m);
        false
    });
    found.expect("file has a module")
}

pub fn top_level_functions(file: &File, module: ModuleRef) -> Vec<FunctionRef> {
    let mut out = Vec::new();
    file.module_enumerate_top_level_functions(module, |f| {
        out.push(f);
        true
    })
    .unwrap();
    out
}

/// The block between start and end in a default body
pub fn body_block(graph: &Graph) -> BlockRef {
    graph.block_succ(graph.start_block(), 0).unwrap()
}

/// Write `file` into a temporary directory and open it again
pub fn reopen(file: &File) -> (TempDir, File) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.abc");
    file.write(&path).unwrap();
    let reopened = File::open(&path).unwrap();
    (dir, reopened)
}

//! Integration tests for the modify API
//!
//! Every edit here is written out and read back before it is checked.

mod common;

use abckit::ir::{DynOpcode, Opcode};
use abckit::params::{DynamicModuleExportParams, ExternalModuleParams, ImportFromDynamicModuleParams};
use abckit::{File, Graph, LiteralTag, Status, Target};
use common::*;

fn opcodes(graph: &Graph) -> Vec<Opcode> {
    let block = body_block(graph);
    let mut out = Vec::new();
    graph
        .block_visit_insts(block, |inst| {
            out.push(graph.inst_opcode(inst).unwrap());
            true
        })
        .unwrap();
    out
}

#[test]
fn test_literal_array_survives_body_rewrite() {
    let mut file = enumerators0_dynamic();
    let module = first_module(&file);
    let function = top_level_functions(&file, module)[0];

    let literal = file.create_literal_u32(42).unwrap();
    let array = file.create_literal_array(&[literal]).unwrap();

    let mut graph = file.create_graph_from_function(function).unwrap();
    let block = body_block(&graph);
    let ret = graph.block_last_inst(block).unwrap().unwrap();
    let create = graph.dynamic_isa().unwrap().create_createarraywithbuffer(array).unwrap();
    graph.inst_insert_before(create, ret).unwrap();
    file.function_set_graph(function, &graph).unwrap();

    let (_dir, reopened) = reopen(&file);
    let module = first_module(&reopened);
    let function = top_level_functions(&reopened, module)[0];
    let graph = reopened.create_graph_from_function(function).unwrap();
    let block = body_block(&graph);
    let first = graph.block_first_inst(block).unwrap().unwrap();
    assert_eq!(
        graph.inst_opcode(first).unwrap(),
        Opcode::Dynamic(DynOpcode::Createarraywithbuffer)
    );

    let array = graph.inst_literal_array(first).unwrap();
    let mut literals = Vec::new();
    reopened
        .literal_array_enumerate_elements(array, |l| {
            literals.push(l);
            true
        })
        .unwrap();
    assert_eq!(literals.len(), 1);
    assert_eq!(reopened.literal_get_tag(literals[0]).unwrap(), LiteralTag::U32);
    assert_eq!(reopened.literal_get_u32(literals[0]).unwrap(), 42);
}

#[test]
fn test_graph_from_another_file_is_rejected() {
    let source = enumerators0_dynamic();
    let mut target = enumerators0_dynamic();
    let source_fn = top_level_functions(&source, first_module(&source))[0];
    let target_fn = top_level_functions(&target, first_module(&target))[0];

    let mut graph = source.create_graph_from_function(source_fn).unwrap();
    let block = body_block(&graph);
    let load = graph.dynamic_isa().unwrap().create_ldtrue().unwrap();
    graph.block_add_inst_front(block, load).unwrap();

    let err = target.function_set_graph(target_fn, &graph).unwrap_err();
    assert_eq!(err.status(), Status::WrongCtx);

    // neither body changed
    for (file, function) in [(&source, source_fn), (&target, target_fn)] {
        let graph = file.create_graph_from_function(function).unwrap();
        assert_eq!(
            opcodes(&graph),
            vec![Opcode::Dynamic(DynOpcode::Returnundefined)]
        );
    }
}

#[test]
fn test_last_installed_graph_wins() {
    let mut file = enumerators0_dynamic();
    let function = top_level_functions(&file, first_module(&file))[0];

    let mut first = file.create_graph_from_function(function).unwrap();
    let block = body_block(&first);
    let load = first.dynamic_isa().unwrap().create_ldtrue().unwrap();
    first.block_add_inst_front(block, load).unwrap();

    let mut second = file.create_graph_from_function(function).unwrap();
    let block = body_block(&second);
    let mut isa = second.dynamic_isa().unwrap();
    let a = isa.create_ldfalse().unwrap();
    let b = isa.create_ldnull().unwrap();
    second.block_add_inst_front(block, b).unwrap();
    second.block_add_inst_front(block, a).unwrap();

    file.function_set_graph(function, &first).unwrap();
    file.function_set_graph(function, &second).unwrap();

    let expected = vec![
        Opcode::Dynamic(DynOpcode::Ldfalse),
        Opcode::Dynamic(DynOpcode::Ldnull),
        Opcode::Dynamic(DynOpcode::Returnundefined),
    ];
    let attached = file.create_graph_from_function(function).unwrap();
    assert_eq!(opcodes(&attached), expected);

    let (_dir, reopened) = reopen(&file);
    let function = top_level_functions(&reopened, first_module(&reopened))[0];
    let decoded = reopened.create_graph_from_function(function).unwrap();
    assert_eq!(opcodes(&decoded), expected);
}

fn import_names(file: &File, module: abckit::ModuleRef) -> Vec<(String, String)> {
    let mut imports = Vec::new();
    file.module_enumerate_imports(module, |i| {
        imports.push(i);
        true
    })
    .unwrap();
    imports
        .into_iter()
        .map(|i| (file.import_get_name(i).unwrap(), file.import_get_alias(i).unwrap()))
        .collect()
}

#[test]
fn test_js_descriptors_survive_reopen() {
    let (mut file, app, _) = mixed_targets();
    let main = top_level_functions(&file, app)[0];
    let lib = file
        .js_file_add_external_module(&ExternalModuleParams::new("lib"))
        .unwrap();
    assert!(file.module_is_external(lib).unwrap());

    let import = file
        .js_module_add_import_from_js_to_js(
            app,
            lib,
            &ImportFromDynamicModuleParams::new("parse", "libParse"),
        )
        .unwrap();
    let export = file
        .js_module_add_export_from_js_to_js(app, app, &DynamicModuleExportParams::new("main"))
        .unwrap();
    assert_eq!(file.export_get_alias(export).unwrap(), "main");

    // a body that loads the import pins it
    let mut graph = file.create_graph_from_function(main).unwrap();
    let block = body_block(&graph);
    let load = graph
        .dynamic_isa()
        .unwrap()
        .create_ldexternalmodulevar(import)
        .unwrap();
    graph.block_add_inst_front(block, load).unwrap();
    file.function_set_graph(main, &graph).unwrap();
    let err = file.js_module_remove_import(app, import).unwrap_err();
    assert_eq!(err.status(), Status::BadArgument);

    let (_dir, reopened) = reopen(&file);
    let mut modules = Vec::new();
    reopened.file_enumerate_modules(|m| {
        modules.push(m);
        true
    });
    let app = modules[0];
    assert_eq!(
        import_names(&reopened, app),
        vec![("parse".to_string(), "libParse".to_string())]
    );

    let mut externals = Vec::new();
    reopened.file_enumerate_external_modules(|m| {
        externals.push(m);
        true
    });
    assert_eq!(externals.len(), 1);
    assert_eq!(reopened.module_get_name(externals[0]).unwrap(), "lib");
    assert_eq!(reopened.module_get_target(externals[0]).unwrap(), Target::Js);
}

#[test]
fn test_unused_export_can_be_removed() {
    let (mut file, app, _) = mixed_targets();
    let export = file
        .js_module_add_export_from_js_to_js(
            app,
            app,
            &DynamicModuleExportParams::new("main").with_alias("entry"),
        )
        .unwrap();
    file.js_module_remove_export(app, export).unwrap();

    // the handle is stale now
    let err = file.export_get_name(export).unwrap_err();
    assert_eq!(err.status(), Status::BadArgument);

    let (_dir, reopened) = reopen(&file);
    let mut count = 0;
    reopened
        .module_enumerate_exports(first_module(&reopened), |_| {
            count += 1;
            true
        })
        .unwrap();
    assert_eq!(count, 0);
}

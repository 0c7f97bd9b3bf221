//! Drives the C tables the way a C client would

use abckit::{FileBuilder, FunctionDecl, Mode, Scope, Status, Target};
use abckit_ffi::*;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::path::Path;
use std::ptr;

struct Tables {
    api: &'static AbckitApi,
    inspect: &'static AbckitInspectApi,
    modify: &'static AbckitModifyApi,
    graph: &'static AbckitGraphApi,
    dynamic: &'static AbckitIsaApiDynamic,
    statik: &'static AbckitIsaApiStatic,
    js: &'static AbckitJsModifyApi,
}

fn tables() -> Tables {
    unsafe {
        Tables {
            api: &*AbckitGetApiImpl(0),
            inspect: &*AbckitGetInspectApiImpl(0),
            modify: &*AbckitGetModifyApiImpl(0),
            graph: &*AbckitGetGraphApiImpl(0),
            dynamic: &*AbckitGetIsaApiDynamicImpl(0),
            statik: &*AbckitGetIsaApiStaticImpl(0),
            js: &*AbckitGetJsModifyApiImpl(0),
        }
    }
}

unsafe extern "C" fn collect<T>(item: *mut T, data: *mut c_void) -> bool {
    (*(data as *mut Vec<*mut T>)).push(item);
    true
}

unsafe extern "C" fn stop_at_first<T>(item: *mut T, data: *mut c_void) -> bool {
    (*(data as *mut Vec<*mut T>)).push(item);
    false
}

fn write_fixture(path: &Path) {
    let mut builder = FileBuilder::new(Mode::Dynamic);
    let app = builder.add_module("app", Target::Js).unwrap();
    builder.add_module("lib", Target::Js).unwrap();
    builder
        .add_function(Scope::Module(app), "main", FunctionDecl::new())
        .unwrap();
    builder.build().write(path).unwrap();
}

unsafe fn open(t: &Tables, path: &Path) -> *mut AbckitFile {
    let path = path.to_str().unwrap();
    let file = (t.api.open_abc)(path.as_ptr().cast::<c_char>(), path.len());
    assert!(!file.is_null());
    assert_eq!((t.api.get_last_error)(), Status::NoError);
    file
}

unsafe fn modules(t: &Tables, file: *mut AbckitFile) -> Vec<*mut AbckitCoreModule> {
    let mut out: Vec<*mut AbckitCoreModule> = Vec::new();
    let data = &mut out as *mut Vec<_> as *mut c_void;
    assert!((t.inspect.file_enumerate_modules)(file, data, Some(collect::<AbckitCoreModule>)));
    out
}

unsafe fn name(t: &Tables, string: *mut AbckitString) -> String {
    let text = (t.inspect.abckit_string_to_string)(string);
    CStr::from_ptr(text).to_str().unwrap().to_string()
}

unsafe fn main_function(t: &Tables, module: *mut AbckitCoreModule) -> *mut AbckitCoreFunction {
    let mut functions: Vec<*mut AbckitCoreFunction> = Vec::new();
    let data = &mut functions as *mut Vec<_> as *mut c_void;
    (t.inspect.module_enumerate_top_level_functions)(module, data, Some(collect::<AbckitCoreFunction>));
    assert_eq!(functions.len(), 1);
    functions[0]
}

#[test]
fn test_enumerate_and_name_modules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.abc");
    write_fixture(&path);
    let t = tables();
    unsafe {
        let file = open(&t, &path);
        let first = modules(&t, file);
        let names: Vec<String> = first
            .iter()
            .map(|&m| name(&t, (t.inspect.module_get_name)(m)))
            .collect();
        assert_eq!(names, vec!["app", "lib"]);
        assert_eq!((t.inspect.module_get_target)(first[0]), Target::Js);

        // the same entity always comes back as the same pointer
        assert_eq!(modules(&t, file), first);

        let mut seen: Vec<*mut AbckitCoreModule> = Vec::new();
        let data = &mut seen as *mut Vec<_> as *mut c_void;
        assert!(!(t.inspect.file_enumerate_modules)(file, data, Some(stop_at_first::<AbckitCoreModule>)));
        assert_eq!(seen.len(), 1);

        (t.api.close_file)(file);
        assert_eq!((t.api.get_last_error)(), Status::NoError);
    }
}

#[test]
fn test_null_arguments_report_bad_argument() {
    let t = tables();
    unsafe {
        assert!((t.inspect.module_get_name)(ptr::null_mut()).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert!(!(t.inspect.function_is_static)(ptr::null_mut()));
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert!((t.inspect.file_get_version)(ptr::null_mut()).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert!((t.modify.create_value_u1)(ptr::null_mut(), true).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert_eq!((t.graph.bb_get_id)(ptr::null_mut()), 0);
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert!((t.dynamic.icreate_ldtrue)(ptr::null_mut()).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        assert!((t.js.file_add_external_module)(ptr::null_mut(), ptr::null()).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        (t.api.close_file)(ptr::null_mut());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
    }
}

#[test]
fn test_missing_callback_is_bad_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.abc");
    write_fixture(&path);
    let t = tables();
    unsafe {
        let file = open(&t, &path);
        assert!(!(t.inspect.file_enumerate_modules)(file, ptr::null_mut(), None));
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
        (t.api.close_file)(file);
    }
}

#[test]
fn test_static_builder_rejects_dynamic_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.abc");
    write_fixture(&path);
    let t = tables();
    unsafe {
        let file = open(&t, &path);
        let app = modules(&t, file)[0];
        let graph = (t.inspect.create_graph_from_function)(main_function(&t, app));
        assert!(!graph.is_null());

        assert!((t.statik.icreate_return_void)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::WrongMode);

        // a failed call leaves the graph usable
        assert!(!(t.dynamic.icreate_ldtrue)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::NoError);

        (t.api.destroy_graph)(graph);
        (t.api.close_file)(file);
    }
}

#[test]
fn test_graph_outliving_its_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.abc");
    write_fixture(&path);
    let t = tables();
    unsafe {
        let file = open(&t, &path);
        let app = modules(&t, file)[0];
        let graph = (t.inspect.create_graph_from_function)(main_function(&t, app));
        let start = (t.graph.graph_get_start_basic_block)(graph);
        let body = (t.graph.bb_get_succ_block)(start, 0);
        let ret = (t.graph.bb_get_last_inst)(body);
        assert!(!(t.graph.graph_get_function)(graph).is_null());
        (t.api.close_file)(file);

        assert!((t.graph.graph_get_function)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
        assert!((t.graph.graph_get_start_basic_block)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
        assert!((t.graph.bb_get_last_inst)(body).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
        assert!((t.graph.iget_next)(ret).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);
        assert!((t.dynamic.icreate_ldtrue)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::BadArgument);

        // the caller still owns the graph and frees it as usual
        (t.api.destroy_graph)(graph);
        assert_eq!((t.api.get_last_error)(), Status::NoError);
    }
}

#[test]
fn test_dynamic_builder_rejects_static_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("static.abc");
    let mut builder = FileBuilder::new(Mode::Static);
    let module = builder.add_module("shapes", Target::ArkTsV1).unwrap();
    builder
        .add_function(Scope::Module(module), "main", FunctionDecl::static_fn())
        .unwrap();
    builder.build().write(&path).unwrap();

    let t = tables();
    unsafe {
        let file = open(&t, &path);
        let module = modules(&t, file)[0];
        let graph = (t.inspect.create_graph_from_function)(main_function(&t, module));
        assert!(!graph.is_null());

        assert!((t.dynamic.icreate_ldtrue)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::WrongMode);
        assert!(!(t.statik.icreate_load_undefined)(graph).is_null());
        assert_eq!((t.api.get_last_error)(), Status::NoError);

        (t.api.destroy_graph)(graph);
        (t.api.close_file)(file);
    }
}

#[test]
fn test_edit_body_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.abc");
    let output = dir.path().join("out.abc");
    write_fixture(&input);
    let t = tables();
    unsafe {
        let file = open(&t, &input);
        let app = modules(&t, file)[0];
        let main = main_function(&t, app);
        let graph = (t.inspect.create_graph_from_function)(main);

        let start = (t.graph.graph_get_start_basic_block)(graph);
        let body = (t.graph.bb_get_succ_block)(start, 0);
        assert_eq!((t.graph.bb_get_number_of_instructions)(body), 1);
        let ret = (t.graph.bb_get_last_inst)(body);
        let load = (t.dynamic.icreate_ldtrue)(graph);
        (t.graph.iinsert_before)(load, ret);
        assert_eq!((t.api.get_last_error)(), Status::NoError);
        assert_eq!((t.graph.iget_next)(load), ret);

        (t.modify.function_set_graph)(main, graph);
        assert_eq!((t.api.get_last_error)(), Status::NoError);
        (t.api.destroy_graph)(graph);

        let out = output.to_str().unwrap();
        (t.api.write_abc)(file, out.as_ptr().cast::<c_char>(), out.len());
        assert_eq!((t.api.get_last_error)(), Status::NoError);
        (t.api.close_file)(file);

        let file = open(&t, &output);
        let app = modules(&t, file)[0];
        let graph = (t.inspect.create_graph_from_function)(main_function(&t, app));
        let start = (t.graph.graph_get_start_basic_block)(graph);
        let body = (t.graph.bb_get_succ_block)(start, 0);
        assert_eq!((t.graph.bb_get_number_of_instructions)(body), 2);
        (t.api.destroy_graph)(graph);
        (t.api.close_file)(file);
    }
}

//! Integration tests for metadata inspection
//!
//! Enumeration order, scope paths, back-end dispatch and literal tag
//! discipline, checked on built files and on files read back from disk.

mod common;

use abckit::{
    FileBuilder, FunctionRef, LiteralTag, LiteralValue, Mode, Status, Target, TypeId,
};
use common::*;

fn anonymous_functions(file: &abckit::File, module: abckit::ModuleRef) -> Vec<FunctionRef> {
    let mut out = Vec::new();
    file.module_enumerate_anonymous_functions(module, |f| {
        out.push(f);
        true
    })
    .unwrap();
    out
}

#[test]
fn test_enumerators0_dynamic() {
    let (_dir, file) = reopen(&enumerators0_dynamic());
    let module = first_module(&file);
    assert_eq!(file.module_get_name(module).unwrap(), "enumerators0_dynamic");
    assert_eq!(file.module_get_target(module).unwrap(), Target::Js);

    let functions = top_level_functions(&file, module);
    assert_eq!(functions.len(), 1);
    assert_eq!(file.function_get_name(functions[0]).unwrap(), "m0F0");
    assert_eq!(
        file.function_get_scope_path(functions[0]).unwrap(),
        vec!["enumerators0_dynamic".to_string()]
    );
    assert_eq!(
        file.function_get_qualified_name(functions[0]).unwrap(),
        "enumerators0_dynamic.m0F0"
    );

    let anonymous = anonymous_functions(&file, module);
    assert_eq!(anonymous.len(), 4);
    let names: Vec<String> = anonymous
        .iter()
        .map(|&f| file.function_get_name(f).unwrap())
        .collect();
    assert!(names.contains(&"enumerators0_dynamic.#*@0*#".to_string()));
    assert!(anonymous.iter().all(|&f| file.function_is_anonymous(f).unwrap()));
}

#[test]
fn test_enumeration_is_deterministic() {
    let file = enumerators0_dynamic();
    let module = first_module(&file);
    let first = anonymous_functions(&file, module);
    let second = anonymous_functions(&file, module);
    assert_eq!(first, second);

    let (_dir, reopened) = reopen(&file);
    let module = first_module(&reopened);
    let names = |file: &abckit::File, functions: &[FunctionRef]| -> Vec<String> {
        functions
            .iter()
            .map(|&f| file.function_get_name(f).unwrap())
            .collect()
    };
    assert_eq!(
        names(&file, &first),
        names(&reopened, &anonymous_functions(&reopened, module))
    );
}

#[test]
fn test_enumeration_stops_when_visitor_declines() {
    let file = enumerators0_dynamic();
    let module = first_module(&file);
    let mut seen = 0;
    let completed = file
        .module_enumerate_anonymous_functions(module, |_| {
            seen += 1;
            seen < 2
        })
        .unwrap();
    assert!(!completed);
    assert_eq!(seen, 2);
}

#[test]
fn test_static_scope_paths_and_signatures() {
    let (_dir, file) = reopen(&static_shapes());
    let module = first_module(&file);

    let mut classes = Vec::new();
    file.module_enumerate_classes(module, |c| {
        classes.push(c);
        true
    })
    .unwrap();
    assert_eq!(classes.len(), 2);
    let (shape, circle) = (classes[0], classes[1]);
    assert_eq!(file.class_get_name(circle).unwrap(), "Circle");
    assert_eq!(file.class_get_super_class(circle).unwrap(), Some(shape));
    assert_eq!(file.class_get_super_class(shape).unwrap(), None);

    let mut methods = Vec::new();
    file.class_enumerate_methods(circle, |f| {
        methods.push(f);
        true
    })
    .unwrap();
    assert_eq!(
        file.function_get_qualified_name(methods[0]).unwrap(),
        "shapes.Circle.area"
    );

    let mut namespaces = Vec::new();
    file.module_enumerate_namespaces(module, |n| {
        namespaces.push(n);
        true
    })
    .unwrap();
    let mut scale = None;
    file.namespace_enumerate_top_level_functions(namespaces[0], |f| {
        scale = Some(f);
        false
    })
    .unwrap();
    let scale = scale.unwrap();
    assert_eq!(file.function_get_name(scale).unwrap(), "scale");
    assert_eq!(
        file.function_get_scope_path(scale).unwrap(),
        vec!["shapes".to_string(), "geometry".to_string()]
    );
    assert!(file.function_is_static(scale).unwrap());

    let ret = file.function_get_return_type(scale).unwrap();
    assert_eq!(file.type_get_type_id(ret).unwrap(), TypeId::F64);
    let mut params = Vec::new();
    file.function_enumerate_parameter_types(scale, |t| {
        params.push(file.type_get_type_id(t).unwrap());
        true
    })
    .unwrap();
    assert_eq!(params, vec![TypeId::F64, TypeId::I32]);
}

#[test]
fn test_static_only_accessors_reject_dynamic_functions() {
    let file = enumerators0_dynamic();
    let module = first_module(&file);
    let function = top_level_functions(&file, module)[0];
    let err = file.function_get_return_type(function).unwrap_err();
    assert_eq!(err.status(), Status::WrongMode);
    let err = file
        .function_enumerate_parameter_types(function, |_| true)
        .unwrap_err();
    assert_eq!(err.status(), Status::WrongMode);
}

#[test]
fn test_native_modules_fail_dispatch() {
    let (file, js, native) = mixed_targets();
    assert_eq!(file.module_get_name(js).unwrap(), "app");
    assert_eq!(
        file.module_get_name(native).unwrap_err().status(),
        Status::WrongTarget
    );
    assert_eq!(
        file.module_enumerate_classes(native, |_| true)
            .unwrap_err()
            .status(),
        Status::WrongTarget
    );
    // target and external flag are mode independent
    assert_eq!(file.module_get_target(native).unwrap(), Target::Native);
    assert!(!file.module_is_external(native).unwrap());
}

#[test]
fn test_dynamic_graph_builders_reject_static_graphs() {
    let file = static_shapes();
    let module = first_module(&file);
    let mut classes = Vec::new();
    file.module_enumerate_classes(module, |c| {
        classes.push(c);
        true
    })
    .unwrap();
    let mut method = None;
    file.class_enumerate_methods(classes[1], |f| {
        method = Some(f);
        false
    })
    .unwrap();

    let mut graph = file.create_graph_from_function(method.unwrap()).unwrap();
    assert_eq!(graph.mode(), Mode::Static);
    assert_eq!(graph.dynamic_isa().err().map(|e| e.status()), Some(Status::WrongMode));
    assert!(graph.static_isa().is_ok());
}

#[test]
fn test_literal_accessors_follow_tag_families() {
    let mut builder = FileBuilder::new(Mode::Dynamic);
    let cases = [
        (LiteralTag::Bool, LiteralValue::Bool(true)),
        (LiteralTag::Accessor, LiteralValue::U8(3)),
        (LiteralTag::U16, LiteralValue::U16(7)),
        (LiteralTag::LiteralBufferIndex, LiteralValue::U32(9)),
        (LiteralTag::Double, LiteralValue::Double(0.5)),
    ];
    let literals: Vec<_> = cases
        .iter()
        .map(|&(tag, value)| builder.add_literal(tag, value).unwrap())
        .collect();
    let file = builder.build();

    assert!(file.literal_get_bool(literals[0]).unwrap());
    assert_eq!(file.literal_get_u8(literals[1]).unwrap(), 3);
    assert_eq!(file.literal_get_u16(literals[2]).unwrap(), 7);
    assert_eq!(file.literal_get_u32(literals[3]).unwrap(), 9);
    assert_eq!(file.literal_get_double(literals[4]).unwrap(), 0.5);

    for (i, &literal) in literals.iter().enumerate() {
        assert_eq!(file.literal_get_tag(literal).unwrap(), cases[i].0);
        if i != 0 {
            let err = file.literal_get_bool(literal).unwrap_err();
            assert_eq!(err.status(), Status::WrongLiteralType);
        }
        if i != 3 {
            let err = file.literal_get_u32(literal).unwrap_err();
            assert_eq!(err.status(), Status::WrongLiteralType);
        }
    }
    let err = file.literal_get_method(literals[1]).unwrap_err();
    assert_eq!(err.status(), Status::WrongLiteralType);
}

//! Inspect API table

use crate::error::entry;
use crate::handles::*;
use abckit::{KitResult, LiteralTag, Target, TypeId};
use std::os::raw::{c_char, c_void};

/// Enumeration callback: return false to stop
pub type Visitor<T> = Option<unsafe extern "C" fn(*mut T, *mut c_void) -> bool>;

/// Intern `items`, then hand them to `visitor` until it returns false
///
/// No borrow of the file is held while the visitor runs, so it may call
/// back into the API.
pub(crate) unsafe fn visit<T>(
    owner: *mut FileHandle,
    items: Vec<Entity>,
    data: *mut c_void,
    visitor: Visitor<T>,
) -> KitResult<bool> {
    let visitor = visitor.ok_or_else(|| null_argument("callback"))?;
    let pointers: Vec<*mut T> = {
        let handle = &mut *owner;
        items.into_iter().map(|e| handle.intern(e)).collect()
    };
    Ok(pointers.into_iter().all(|p| visitor(p, data)))
}

/// Entry points that enumerate children of an entity
macro_rules! enumerators {
    ($($name:ident($arg:ident: $c_in:ty) via $resolve:ident, $method:ident => $c_out:ty as $variant:ident;)*) => {
        entry! {
            $(
                fn $name($arg: *mut $c_in, data: *mut c_void, cb: Visitor<$c_out>) -> bool {
                    let (handle, r) = $resolve($arg)?;
                    let mut items = Vec::new();
                    handle.file.$method(r, |x| {
                        items.push(Entity::$variant(x));
                        true
                    })?;
                    visit(handle, items, data, cb)
                }
            )*
        }
    };
}

/// Entry points returning a name as a string handle
macro_rules! names {
    ($($name:ident($arg:ident: $c_in:ty) via $resolve:ident, $method:ident;)*) => {
        entry! {
            $(
                fn $name($arg: *mut $c_in) -> *mut AbckitString {
                    let (handle, r) = $resolve($arg)?;
                    let name = handle.file.$method(r)?;
                    Ok(handle.new_string(&name))
                }
            )*
        }
    };
}

/// Entry points returning a related entity
macro_rules! links {
    ($($name:ident($arg:ident: $c_in:ty) via $resolve:ident, $method:ident => $c_out:ty as $variant:ident;)*) => {
        entry! {
            $(
                fn $name($arg: *mut $c_in) -> *mut $c_out {
                    let (handle, r) = $resolve($arg)?;
                    let linked = handle.file.$method(r)?;
                    Ok(handle.intern(Entity::$variant(linked)))
                }
            )*
        }
    };
}

/// Entry points returning an optional related entity (NULL when absent)
macro_rules! optional_links {
    ($($name:ident($arg:ident: $c_in:ty) via $resolve:ident, $method:ident => $c_out:ty as $variant:ident;)*) => {
        entry! {
            $(
                fn $name($arg: *mut $c_in) -> *mut $c_out {
                    let (handle, r) = $resolve($arg)?;
                    let linked = handle.file.$method(r)?;
                    Ok(handle.intern_opt(linked.map(Entity::$variant)))
                }
            )*
        }
    };
}

/// Entry points returning a plain value
macro_rules! scalars {
    ($($name:ident($arg:ident: $c_in:ty) via $resolve:ident, $method:ident -> $ret:ty;)*) => {
        entry! {
            $(
                fn $name($arg: *mut $c_in) -> $ret {
                    let (handle, r) = $resolve($arg)?;
                    handle.file.$method(r)
                }
            )*
        }
    };
}

entry! {
    fn file_get_version(file: *mut AbckitFile) -> *const u8 {
        Ok(file_handle(file)?.version_ptr())
    }

    fn file_enumerate_modules(file: *mut AbckitFile, data: *mut c_void, cb: Visitor<AbckitCoreModule>) -> bool {
        let handle = file_handle(file)?;
        let mut items = Vec::new();
        handle.file.file_enumerate_modules(|m| {
            items.push(Entity::Module(m));
            true
        });
        visit(handle, items, data, cb)
    }

    fn file_enumerate_external_modules(file: *mut AbckitFile, data: *mut c_void, cb: Visitor<AbckitCoreModule>) -> bool {
        let handle = file_handle(file)?;
        let mut items = Vec::new();
        handle.file.file_enumerate_external_modules(|m| {
            items.push(Entity::Module(m));
            true
        });
        visit(handle, items, data, cb)
    }

    fn module_get_file(module: *mut AbckitCoreModule) -> *mut AbckitFile {
        let (handle, _) = module_ref(module)?;
        let file: *mut FileHandle = handle;
        Ok(file.cast())
    }

    fn abckit_string_to_string(string: *mut AbckitString) -> *const c_char {
        let (handle, s) = string_ref(string)?;
        handle.c_string(s)
    }

    fn create_graph_from_function(function: *mut AbckitCoreFunction) -> *mut AbckitGraph {
        let (handle, f) = function_ref(function)?;
        let graph = handle.file.create_graph_from_function(f)?;
        Ok(Box::into_raw(GraphHandle::new(graph, handle)).cast())
    }
}

names! {
    module_get_name(module: AbckitCoreModule) via module_ref, module_get_name;
    namespace_get_name(namespace: AbckitCoreNamespace) via namespace_ref, namespace_get_name;
    class_get_name(class: AbckitCoreClass) via class_ref, class_get_name;
    function_get_name(function: AbckitCoreFunction) via function_ref, function_get_name;
    function_get_qualified_name(function: AbckitCoreFunction) via function_ref, function_get_qualified_name;
    import_descriptor_get_name(import: AbckitCoreImportDescriptor) via import_ref, import_get_name;
    import_descriptor_get_alias(import: AbckitCoreImportDescriptor) via import_ref, import_get_alias;
    export_descriptor_get_name(export: AbckitCoreExportDescriptor) via export_ref, export_get_name;
    export_descriptor_get_alias(export: AbckitCoreExportDescriptor) via export_ref, export_get_alias;
    annotation_element_get_name(element: AbckitCoreAnnotationElement) via annotation_element_ref, annotation_element_get_name;
    annotation_interface_get_name(interface: AbckitCoreAnnotationInterface) via annotation_interface_ref, annotation_interface_get_name;
    annotation_interface_field_get_name(field: AbckitCoreAnnotationInterfaceField) via annotation_interface_field_ref, annotation_interface_field_get_name;
}

scalars! {
    module_get_target(module: AbckitCoreModule) via module_ref, module_get_target -> Target;
    module_is_external(module: AbckitCoreModule) via module_ref, module_is_external -> bool;
    function_is_static(function: AbckitCoreFunction) via function_ref, function_is_static -> bool;
    function_is_ctor(function: AbckitCoreFunction) via function_ref, function_is_ctor -> bool;
    function_is_anonymous(function: AbckitCoreFunction) via function_ref, function_is_anonymous -> bool;
    literal_get_tag(literal: AbckitLiteral) via literal_ref, literal_get_tag -> LiteralTag;
    literal_get_bool(literal: AbckitLiteral) via literal_ref, literal_get_bool -> bool;
    literal_get_u8(literal: AbckitLiteral) via literal_ref, literal_get_u8 -> u8;
    literal_get_u16(literal: AbckitLiteral) via literal_ref, literal_get_u16 -> u16;
    literal_get_method_affiliate(literal: AbckitLiteral) via literal_ref, literal_get_method_affiliate -> u16;
    literal_get_u32(literal: AbckitLiteral) via literal_ref, literal_get_u32 -> u32;
    literal_get_u64(literal: AbckitLiteral) via literal_ref, literal_get_u64 -> u64;
    literal_get_float(literal: AbckitLiteral) via literal_ref, literal_get_float -> f32;
    literal_get_double(literal: AbckitLiteral) via literal_ref, literal_get_double -> f64;
    type_get_type_id(ty: AbckitType) via type_ref, type_get_type_id -> TypeId;
    value_get_u1(value: AbckitValue) via value_ref, value_get_u1 -> bool;
    value_get_double(value: AbckitValue) via value_ref, value_get_double -> f64;
}

links! {
    namespace_get_module(namespace: AbckitCoreNamespace) via namespace_ref, namespace_get_module => AbckitCoreModule as Module;
    class_get_module(class: AbckitCoreClass) via class_ref, class_get_module => AbckitCoreModule as Module;
    function_get_module(function: AbckitCoreFunction) via function_ref, function_get_module => AbckitCoreModule as Module;
    function_get_return_type(function: AbckitCoreFunction) via function_ref, function_get_return_type => AbckitType as Type;
    import_descriptor_get_importing_module(import: AbckitCoreImportDescriptor) via import_ref, import_get_importing_module => AbckitCoreModule as Module;
    import_descriptor_get_imported_module(import: AbckitCoreImportDescriptor) via import_ref, import_get_imported_module => AbckitCoreModule as Module;
    export_descriptor_get_exporting_module(export: AbckitCoreExportDescriptor) via export_ref, export_get_exporting_module => AbckitCoreModule as Module;
    export_descriptor_get_exported_module(export: AbckitCoreExportDescriptor) via export_ref, export_get_exported_module => AbckitCoreModule as Module;
    annotation_get_interface(annotation: AbckitCoreAnnotation) via annotation_ref, annotation_get_interface => AbckitCoreAnnotationInterface as AnnotationInterface;
    annotation_element_get_value(element: AbckitCoreAnnotationElement) via annotation_element_ref, annotation_element_get_value => AbckitValue as Value;
    annotation_interface_get_module(interface: AbckitCoreAnnotationInterface) via annotation_interface_ref, annotation_interface_get_module => AbckitCoreModule as Module;
    annotation_interface_field_get_type(field: AbckitCoreAnnotationInterfaceField) via annotation_interface_field_ref, annotation_interface_field_get_type => AbckitType as Type;
    literal_get_string(literal: AbckitLiteral) via literal_ref, literal_get_string => AbckitString as String;
    literal_get_literal_array(literal: AbckitLiteral) via literal_ref, literal_get_literal_array => AbckitLiteralArray as LiteralArray;
    literal_get_method(literal: AbckitLiteral) via literal_ref, literal_get_method => AbckitCoreFunction as Function;
    type_get_reference_class(ty: AbckitType) via type_ref, type_get_reference_class => AbckitCoreClass as Class;
    value_get_type(value: AbckitValue) via value_ref, value_get_type => AbckitType as Type;
    value_get_string(value: AbckitValue) via value_ref, value_get_string => AbckitString as String;
    value_get_literal_array(value: AbckitValue) via value_ref, value_get_literal_array => AbckitLiteralArray as LiteralArray;
}

optional_links! {
    namespace_get_parent_namespace(namespace: AbckitCoreNamespace) via namespace_ref, namespace_get_parent_namespace => AbckitCoreNamespace as Namespace;
    class_get_parent_function(class: AbckitCoreClass) via class_ref, class_get_parent_function => AbckitCoreFunction as Function;
    class_get_parent_namespace(class: AbckitCoreClass) via class_ref, class_get_parent_namespace => AbckitCoreNamespace as Namespace;
    class_get_super_class(class: AbckitCoreClass) via class_ref, class_get_super_class => AbckitCoreClass as Class;
    function_get_parent_class(function: AbckitCoreFunction) via function_ref, function_get_parent_class => AbckitCoreClass as Class;
    function_get_parent_function(function: AbckitCoreFunction) via function_ref, function_get_parent_function => AbckitCoreFunction as Function;
    function_get_parent_namespace(function: AbckitCoreFunction) via function_ref, function_get_parent_namespace => AbckitCoreNamespace as Namespace;
    annotation_interface_field_get_default_value(field: AbckitCoreAnnotationInterfaceField) via annotation_interface_field_ref, annotation_interface_field_get_default_value => AbckitValue as Value;
}

enumerators! {
    module_enumerate_imports(module: AbckitCoreModule) via module_ref, module_enumerate_imports => AbckitCoreImportDescriptor as Import;
    module_enumerate_exports(module: AbckitCoreModule) via module_ref, module_enumerate_exports => AbckitCoreExportDescriptor as Export;
    module_enumerate_namespaces(module: AbckitCoreModule) via module_ref, module_enumerate_namespaces => AbckitCoreNamespace as Namespace;
    module_enumerate_classes(module: AbckitCoreModule) via module_ref, module_enumerate_classes => AbckitCoreClass as Class;
    module_enumerate_top_level_functions(module: AbckitCoreModule) via module_ref, module_enumerate_top_level_functions => AbckitCoreFunction as Function;
    module_enumerate_anonymous_functions(module: AbckitCoreModule) via module_ref, module_enumerate_anonymous_functions => AbckitCoreFunction as Function;
    module_enumerate_annotation_interfaces(module: AbckitCoreModule) via module_ref, module_enumerate_annotation_interfaces => AbckitCoreAnnotationInterface as AnnotationInterface;
    namespace_enumerate_namespaces(namespace: AbckitCoreNamespace) via namespace_ref, namespace_enumerate_namespaces => AbckitCoreNamespace as Namespace;
    namespace_enumerate_classes(namespace: AbckitCoreNamespace) via namespace_ref, namespace_enumerate_classes => AbckitCoreClass as Class;
    namespace_enumerate_top_level_functions(namespace: AbckitCoreNamespace) via namespace_ref, namespace_enumerate_top_level_functions => AbckitCoreFunction as Function;
    class_enumerate_methods(class: AbckitCoreClass) via class_ref, class_enumerate_methods => AbckitCoreFunction as Function;
    class_enumerate_annotations(class: AbckitCoreClass) via class_ref, class_enumerate_annotations => AbckitCoreAnnotation as Annotation;
    function_enumerate_nested_functions(function: AbckitCoreFunction) via function_ref, function_enumerate_nested_functions => AbckitCoreFunction as Function;
    function_enumerate_nested_classes(function: AbckitCoreFunction) via function_ref, function_enumerate_nested_classes => AbckitCoreClass as Class;
    function_enumerate_annotations(function: AbckitCoreFunction) via function_ref, function_enumerate_annotations => AbckitCoreAnnotation as Annotation;
    function_enumerate_parameter_types(function: AbckitCoreFunction) via function_ref, function_enumerate_parameter_types => AbckitType as Type;
    annotation_enumerate_elements(annotation: AbckitCoreAnnotation) via annotation_ref, annotation_enumerate_elements => AbckitCoreAnnotationElement as AnnotationElement;
    annotation_interface_enumerate_fields(interface: AbckitCoreAnnotationInterface) via annotation_interface_ref, annotation_interface_enumerate_fields => AbckitCoreAnnotationInterfaceField as AnnotationInterfaceField;
    literal_array_enumerate_elements(array: AbckitLiteralArray) via literal_array_ref, literal_array_enumerate_elements => AbckitLiteral as Literal;
}

type Enumerate<T, U> = unsafe extern "C" fn(*mut T, *mut c_void, Visitor<U>) -> bool;
type Name<T> = unsafe extern "C" fn(*mut T) -> *mut AbckitString;
type Link<T, U> = unsafe extern "C" fn(*mut T) -> *mut U;
type Scalar<T, R> = unsafe extern "C" fn(*mut T) -> R;

/// Read-only accessors
#[repr(C)]
pub struct AbckitInspectApi {
    // File
    pub file_get_version: unsafe extern "C" fn(*mut AbckitFile) -> *const u8,
    pub file_enumerate_modules: Enumerate<AbckitFile, AbckitCoreModule>,
    pub file_enumerate_external_modules: Enumerate<AbckitFile, AbckitCoreModule>,
    // String
    pub abckit_string_to_string: unsafe extern "C" fn(*mut AbckitString) -> *const c_char,
    // Module
    pub module_get_file: Link<AbckitCoreModule, AbckitFile>,
    pub module_get_target: Scalar<AbckitCoreModule, Target>,
    pub module_get_name: Name<AbckitCoreModule>,
    pub module_is_external: Scalar<AbckitCoreModule, bool>,
    pub module_enumerate_imports: Enumerate<AbckitCoreModule, AbckitCoreImportDescriptor>,
    pub module_enumerate_exports: Enumerate<AbckitCoreModule, AbckitCoreExportDescriptor>,
    pub module_enumerate_namespaces: Enumerate<AbckitCoreModule, AbckitCoreNamespace>,
    pub module_enumerate_classes: Enumerate<AbckitCoreModule, AbckitCoreClass>,
    pub module_enumerate_top_level_functions: Enumerate<AbckitCoreModule, AbckitCoreFunction>,
    pub module_enumerate_anonymous_functions: Enumerate<AbckitCoreModule, AbckitCoreFunction>,
    pub module_enumerate_annotation_interfaces: Enumerate<AbckitCoreModule, AbckitCoreAnnotationInterface>,
    // Namespace
    pub namespace_get_name: Name<AbckitCoreNamespace>,
    pub namespace_get_module: Link<AbckitCoreNamespace, AbckitCoreModule>,
    pub namespace_get_parent_namespace: Link<AbckitCoreNamespace, AbckitCoreNamespace>,
    pub namespace_enumerate_namespaces: Enumerate<AbckitCoreNamespace, AbckitCoreNamespace>,
    pub namespace_enumerate_classes: Enumerate<AbckitCoreNamespace, AbckitCoreClass>,
    pub namespace_enumerate_top_level_functions: Enumerate<AbckitCoreNamespace, AbckitCoreFunction>,
    // Class
    pub class_get_name: Name<AbckitCoreClass>,
    pub class_get_module: Link<AbckitCoreClass, AbckitCoreModule>,
    pub class_get_parent_function: Link<AbckitCoreClass, AbckitCoreFunction>,
    pub class_get_parent_namespace: Link<AbckitCoreClass, AbckitCoreNamespace>,
    pub class_get_super_class: Link<AbckitCoreClass, AbckitCoreClass>,
    pub class_enumerate_methods: Enumerate<AbckitCoreClass, AbckitCoreFunction>,
    pub class_enumerate_annotations: Enumerate<AbckitCoreClass, AbckitCoreAnnotation>,
    // Function
    pub function_get_name: Name<AbckitCoreFunction>,
    pub function_get_qualified_name: Name<AbckitCoreFunction>,
    pub function_get_module: Link<AbckitCoreFunction, AbckitCoreModule>,
    pub function_get_parent_class: Link<AbckitCoreFunction, AbckitCoreClass>,
    pub function_get_parent_function: Link<AbckitCoreFunction, AbckitCoreFunction>,
    pub function_get_parent_namespace: Link<AbckitCoreFunction, AbckitCoreNamespace>,
    pub function_is_static: Scalar<AbckitCoreFunction, bool>,
    pub function_is_ctor: Scalar<AbckitCoreFunction, bool>,
    pub function_is_anonymous: Scalar<AbckitCoreFunction, bool>,
    pub function_enumerate_nested_functions: Enumerate<AbckitCoreFunction, AbckitCoreFunction>,
    pub function_enumerate_nested_classes: Enumerate<AbckitCoreFunction, AbckitCoreClass>,
    pub function_enumerate_annotations: Enumerate<AbckitCoreFunction, AbckitCoreAnnotation>,
    pub function_get_return_type: Link<AbckitCoreFunction, AbckitType>,
    pub function_enumerate_parameter_types: Enumerate<AbckitCoreFunction, AbckitType>,
    pub create_graph_from_function: Link<AbckitCoreFunction, AbckitGraph>,
    // Import and export descriptors
    pub import_descriptor_get_name: Name<AbckitCoreImportDescriptor>,
    pub import_descriptor_get_alias: Name<AbckitCoreImportDescriptor>,
    pub import_descriptor_get_importing_module: Link<AbckitCoreImportDescriptor, AbckitCoreModule>,
    pub import_descriptor_get_imported_module: Link<AbckitCoreImportDescriptor, AbckitCoreModule>,
    pub export_descriptor_get_name: Name<AbckitCoreExportDescriptor>,
    pub export_descriptor_get_alias: Name<AbckitCoreExportDescriptor>,
    pub export_descriptor_get_exporting_module: Link<AbckitCoreExportDescriptor, AbckitCoreModule>,
    pub export_descriptor_get_exported_module: Link<AbckitCoreExportDescriptor, AbckitCoreModule>,
    // Annotations
    pub annotation_get_interface: Link<AbckitCoreAnnotation, AbckitCoreAnnotationInterface>,
    pub annotation_enumerate_elements: Enumerate<AbckitCoreAnnotation, AbckitCoreAnnotationElement>,
    pub annotation_element_get_name: Name<AbckitCoreAnnotationElement>,
    pub annotation_element_get_value: Link<AbckitCoreAnnotationElement, AbckitValue>,
    pub annotation_interface_get_name: Name<AbckitCoreAnnotationInterface>,
    pub annotation_interface_get_module: Link<AbckitCoreAnnotationInterface, AbckitCoreModule>,
    pub annotation_interface_enumerate_fields:
        Enumerate<AbckitCoreAnnotationInterface, AbckitCoreAnnotationInterfaceField>,
    pub annotation_interface_field_get_name: Name<AbckitCoreAnnotationInterfaceField>,
    pub annotation_interface_field_get_type: Link<AbckitCoreAnnotationInterfaceField, AbckitType>,
    pub annotation_interface_field_get_default_value: Link<AbckitCoreAnnotationInterfaceField, AbckitValue>,
    // Literals
    pub literal_get_tag: Scalar<AbckitLiteral, LiteralTag>,
    pub literal_get_bool: Scalar<AbckitLiteral, bool>,
    pub literal_get_u8: Scalar<AbckitLiteral, u8>,
    pub literal_get_u16: Scalar<AbckitLiteral, u16>,
    pub literal_get_method_affiliate: Scalar<AbckitLiteral, u16>,
    pub literal_get_u32: Scalar<AbckitLiteral, u32>,
    pub literal_get_u64: Scalar<AbckitLiteral, u64>,
    pub literal_get_float: Scalar<AbckitLiteral, f32>,
    pub literal_get_double: Scalar<AbckitLiteral, f64>,
    pub literal_get_string: Link<AbckitLiteral, AbckitString>,
    pub literal_get_literal_array: Link<AbckitLiteral, AbckitLiteralArray>,
    pub literal_get_method: Link<AbckitLiteral, AbckitCoreFunction>,
    pub literal_array_enumerate_elements: Enumerate<AbckitLiteralArray, AbckitLiteral>,
    // Types and values
    pub type_get_type_id: Scalar<AbckitType, TypeId>,
    pub type_get_reference_class: Link<AbckitType, AbckitCoreClass>,
    pub value_get_type: Link<AbckitValue, AbckitType>,
    pub value_get_u1: Scalar<AbckitValue, bool>,
    pub value_get_double: Scalar<AbckitValue, f64>,
    pub value_get_string: Link<AbckitValue, AbckitString>,
    pub value_get_literal_array: Link<AbckitValue, AbckitLiteralArray>,
}

pub(crate) static INSPECT_API_V1: AbckitInspectApi = AbckitInspectApi {
    file_get_version,
    file_enumerate_modules,
    file_enumerate_external_modules,
    abckit_string_to_string,
    module_get_file,
    module_get_target,
    module_get_name,
    module_is_external,
    module_enumerate_imports,
    module_enumerate_exports,
    module_enumerate_namespaces,
    module_enumerate_classes,
    module_enumerate_top_level_functions,
    module_enumerate_anonymous_functions,
    module_enumerate_annotation_interfaces,
    namespace_get_name,
    namespace_get_module,
    namespace_get_parent_namespace,
    namespace_enumerate_namespaces,
    namespace_enumerate_classes,
    namespace_enumerate_top_level_functions,
    class_get_name,
    class_get_module,
    class_get_parent_function,
    class_get_parent_namespace,
    class_get_super_class,
    class_enumerate_methods,
    class_enumerate_annotations,
    function_get_name,
    function_get_qualified_name,
    function_get_module,
    function_get_parent_class,
    function_get_parent_function,
    function_get_parent_namespace,
    function_is_static,
    function_is_ctor,
    function_is_anonymous,
    function_enumerate_nested_functions,
    function_enumerate_nested_classes,
    function_enumerate_annotations,
    function_get_return_type,
    function_enumerate_parameter_types,
    create_graph_from_function,
    import_descriptor_get_name,
    import_descriptor_get_alias,
    import_descriptor_get_importing_module,
    import_descriptor_get_imported_module,
    export_descriptor_get_name,
    export_descriptor_get_alias,
    export_descriptor_get_exporting_module,
    export_descriptor_get_exported_module,
    annotation_get_interface,
    annotation_enumerate_elements,
    annotation_element_get_name,
    annotation_element_get_value,
    annotation_interface_get_name,
    annotation_interface_get_module,
    annotation_interface_enumerate_fields,
    annotation_interface_field_get_name,
    annotation_interface_field_get_type,
    annotation_interface_field_get_default_value,
    literal_get_tag,
    literal_get_bool,
    literal_get_u8,
    literal_get_u16,
    literal_get_method_affiliate,
    literal_get_u32,
    literal_get_u64,
    literal_get_float,
    literal_get_double,
    literal_get_string,
    literal_get_literal_array,
    literal_get_method,
    literal_array_enumerate_elements,
    type_get_type_id,
    type_get_reference_class,
    value_get_type,
    value_get_u1,
    value_get_double,
    value_get_string,
    value_get_literal_array,
};

//! Language extension tables: ArkTS and JS structural edits

use crate::error::entry;
use crate::handles::*;
use abckit::params::{
    AnnotationElementParams, AnnotationInterfaceFieldParams, AnnotationInterfaceParams,
    AnnotationParams, DynamicModuleExportParams, ExternalModuleParams,
    ImportFromDynamicModuleParams,
};
use abckit::{KitError, KitResult};
use std::ffi::CStr;
use std::os::raw::c_char;

/// Parameters for adding an import: `name` bound locally as `alias`
#[repr(C)]
pub struct AbckitImportFromDynamicModuleCreateParams {
    pub name: *const c_char,
    pub alias: *const c_char,
}

/// Parameters for adding an export; a NULL alias exports under `name`
#[repr(C)]
pub struct AbckitDynamicModuleExportCreateParams {
    pub name: *const c_char,
    pub alias: *const c_char,
}

#[repr(C)]
pub struct AbckitExternalModuleCreateParams {
    pub name: *const c_char,
}

#[repr(C)]
pub struct AbckitArktsAnnotationCreateParams {
    pub ai: *mut AbckitCoreAnnotationInterface,
}

#[repr(C)]
pub struct AbckitArktsAnnotationElementCreateParams {
    pub name: *const c_char,
    pub value: *mut AbckitValue,
}

#[repr(C)]
pub struct AbckitArktsAnnotationInterfaceCreateParams {
    pub name: *const c_char,
}

/// Field parameters; `default_value` may be NULL
#[repr(C)]
pub struct AbckitArktsAnnotationInterfaceFieldCreateParams {
    pub name: *const c_char,
    pub ty: *mut AbckitType,
    pub default_value: *mut AbckitValue,
}

unsafe fn c_str(value: *const c_char, what: &str) -> KitResult<String> {
    if value.is_null() {
        return Err(null_argument(what));
    }
    CStr::from_ptr(value)
        .to_str()
        .map(str::to_owned)
        .map_err(|_| KitError::BadArgument(format!("{} is not UTF-8", what)))
}

unsafe fn params<'a, T>(ptr: *const T) -> KitResult<&'a T> {
    if ptr.is_null() {
        return Err(null_argument("params"));
    }
    Ok(&*ptr)
}

impl AbckitImportFromDynamicModuleCreateParams {
    unsafe fn to_params(&self) -> KitResult<ImportFromDynamicModuleParams> {
        Ok(ImportFromDynamicModuleParams::new(
            c_str(self.name, "import name")?,
            c_str(self.alias, "import alias")?,
        ))
    }
}

impl AbckitDynamicModuleExportCreateParams {
    unsafe fn to_params(&self) -> KitResult<DynamicModuleExportParams> {
        let params = DynamicModuleExportParams::new(c_str(self.name, "export name")?);
        if self.alias.is_null() {
            Ok(params)
        } else {
            Ok(params.with_alias(c_str(self.alias, "export alias")?))
        }
    }
}

impl AbckitExternalModuleCreateParams {
    unsafe fn to_params(&self) -> KitResult<ExternalModuleParams> {
        Ok(ExternalModuleParams::new(c_str(self.name, "module name")?))
    }
}

// ============================================================================
// ArkTS
// ============================================================================

entry! {
    fn arkts_module_add_import_from_arkts_v1_to_arkts_v1(
        importing: *mut AbckitCoreModule,
        imported: *mut AbckitCoreModule,
        params_ptr: *const AbckitImportFromDynamicModuleCreateParams,
    ) -> *mut AbckitCoreImportDescriptor {
        let (handle, importing) = module_ref(importing)?;
        let imported = module_id(imported)?;
        let params = params(params_ptr)?.to_params()?;
        let import = handle
            .file
            .arkts_module_add_import_from_arkts_v1_to_arkts_v1(importing, imported, &params)?;
        Ok(handle.intern(Entity::Import(import)))
    }

    fn arkts_module_remove_import(module: *mut AbckitCoreModule, import: *mut AbckitCoreImportDescriptor) -> () {
        let (handle, m) = module_ref(module)?;
        let i = import_id(import)?;
        handle.file.arkts_module_remove_import(m, i)
    }

    fn arkts_module_add_export_from_arkts_v1_to_arkts_v1(
        exporting: *mut AbckitCoreModule,
        exported: *mut AbckitCoreModule,
        params_ptr: *const AbckitDynamicModuleExportCreateParams,
    ) -> *mut AbckitCoreExportDescriptor {
        let (handle, exporting) = module_ref(exporting)?;
        let exported = module_id(exported)?;
        let params = params(params_ptr)?.to_params()?;
        let export = handle
            .file
            .arkts_module_add_export_from_arkts_v1_to_arkts_v1(exporting, exported, &params)?;
        Ok(handle.intern(Entity::Export(export)))
    }

    fn arkts_module_remove_export(module: *mut AbckitCoreModule, export: *mut AbckitCoreExportDescriptor) -> () {
        let (handle, m) = module_ref(module)?;
        let e = export_id(export)?;
        handle.file.arkts_module_remove_export(m, e)
    }

    fn arkts_file_add_external_module_arkts_v1(
        file: *mut AbckitFile,
        params_ptr: *const AbckitExternalModuleCreateParams,
    ) -> *mut AbckitCoreModule {
        let handle = file_handle(file)?;
        let params = params(params_ptr)?.to_params()?;
        let module = handle.file.arkts_file_add_external_module_arkts_v1(&params)?;
        Ok(handle.intern(Entity::Module(module)))
    }

    fn arkts_module_add_annotation_interface(
        module: *mut AbckitCoreModule,
        params_ptr: *const AbckitArktsAnnotationInterfaceCreateParams,
    ) -> *mut AbckitCoreAnnotationInterface {
        let (handle, m) = module_ref(module)?;
        let name = c_str(params(params_ptr)?.name, "annotation interface name")?;
        let interface = handle
            .file
            .arkts_module_add_annotation_interface(m, &AnnotationInterfaceParams::new(name))?;
        Ok(handle.intern(Entity::AnnotationInterface(interface)))
    }

    fn arkts_class_add_annotation(
        class: *mut AbckitCoreClass,
        params_ptr: *const AbckitArktsAnnotationCreateParams,
    ) -> *mut AbckitCoreAnnotation {
        let (handle, c) = class_ref(class)?;
        let interface = annotation_interface_id(params(params_ptr)?.ai)?;
        let annotation = handle
            .file
            .arkts_class_add_annotation(c, &AnnotationParams { interface })?;
        Ok(handle.intern(Entity::Annotation(annotation)))
    }

    fn arkts_class_remove_annotation(class: *mut AbckitCoreClass, annotation: *mut AbckitCoreAnnotation) -> () {
        let (handle, c) = class_ref(class)?;
        let a = annotation_id(annotation)?;
        handle.file.arkts_class_remove_annotation(c, a)
    }

    fn arkts_function_add_annotation(
        function: *mut AbckitCoreFunction,
        params_ptr: *const AbckitArktsAnnotationCreateParams,
    ) -> *mut AbckitCoreAnnotation {
        let (handle, f) = function_ref(function)?;
        let interface = annotation_interface_id(params(params_ptr)?.ai)?;
        let annotation = handle
            .file
            .arkts_function_add_annotation(f, &AnnotationParams { interface })?;
        Ok(handle.intern(Entity::Annotation(annotation)))
    }

    fn arkts_function_remove_annotation(function: *mut AbckitCoreFunction, annotation: *mut AbckitCoreAnnotation) -> () {
        let (handle, f) = function_ref(function)?;
        let a = annotation_id(annotation)?;
        handle.file.arkts_function_remove_annotation(f, a)
    }

    fn arkts_annotation_add_annotation_element(
        annotation: *mut AbckitCoreAnnotation,
        params_ptr: *const AbckitArktsAnnotationElementCreateParams,
    ) -> *mut AbckitCoreAnnotationElement {
        let (handle, a) = annotation_ref(annotation)?;
        let raw = params(params_ptr)?;
        let value = value_id(raw.value)?;
        let params = AnnotationElementParams {
            name: c_str(raw.name, "annotation element name")?,
            value,
        };
        let element = handle.file.arkts_annotation_add_annotation_element(a, &params)?;
        Ok(handle.intern(Entity::AnnotationElement(element)))
    }

    fn arkts_annotation_remove_annotation_element(
        annotation: *mut AbckitCoreAnnotation,
        element: *mut AbckitCoreAnnotationElement,
    ) -> () {
        let (handle, a) = annotation_ref(annotation)?;
        let e = annotation_element_id(element)?;
        handle.file.arkts_annotation_remove_annotation_element(a, e)
    }

    fn arkts_annotation_interface_add_field(
        interface: *mut AbckitCoreAnnotationInterface,
        params_ptr: *const AbckitArktsAnnotationInterfaceFieldCreateParams,
    ) -> *mut AbckitCoreAnnotationInterfaceField {
        let (handle, i) = annotation_interface_ref(interface)?;
        let raw = params(params_ptr)?;
        let ty = type_id(raw.ty)?;
        let default_value = if raw.default_value.is_null() {
            None
        } else {
            Some(value_ref(raw.default_value)?.1)
        };
        let params = AnnotationInterfaceFieldParams {
            name: c_str(raw.name, "field name")?,
            ty,
            default_value,
        };
        let field = handle.file.arkts_annotation_interface_add_field(i, &params)?;
        Ok(handle.intern(Entity::AnnotationInterfaceField(field)))
    }

    fn arkts_annotation_interface_remove_field(
        interface: *mut AbckitCoreAnnotationInterface,
        field: *mut AbckitCoreAnnotationInterfaceField,
    ) -> () {
        let (handle, i) = annotation_interface_ref(interface)?;
        let f = annotation_interface_field_id(field)?;
        handle.file.arkts_annotation_interface_remove_field(i, f)
    }
}

/// Structural edits of ArkTS modules
#[repr(C)]
pub struct AbckitArktsModifyApi {
    pub module_add_import_from_arkts_v1_to_arkts_v1: unsafe extern "C" fn(
        *mut AbckitCoreModule,
        *mut AbckitCoreModule,
        *const AbckitImportFromDynamicModuleCreateParams,
    ) -> *mut AbckitCoreImportDescriptor,
    pub module_remove_import: unsafe extern "C" fn(*mut AbckitCoreModule, *mut AbckitCoreImportDescriptor),
    pub module_add_export_from_arkts_v1_to_arkts_v1: unsafe extern "C" fn(
        *mut AbckitCoreModule,
        *mut AbckitCoreModule,
        *const AbckitDynamicModuleExportCreateParams,
    ) -> *mut AbckitCoreExportDescriptor,
    pub module_remove_export: unsafe extern "C" fn(*mut AbckitCoreModule, *mut AbckitCoreExportDescriptor),
    pub file_add_external_module_arkts_v1:
        unsafe extern "C" fn(*mut AbckitFile, *const AbckitExternalModuleCreateParams) -> *mut AbckitCoreModule,
    pub module_add_annotation_interface: unsafe extern "C" fn(
        *mut AbckitCoreModule,
        *const AbckitArktsAnnotationInterfaceCreateParams,
    ) -> *mut AbckitCoreAnnotationInterface,
    pub class_add_annotation: unsafe extern "C" fn(
        *mut AbckitCoreClass,
        *const AbckitArktsAnnotationCreateParams,
    ) -> *mut AbckitCoreAnnotation,
    pub class_remove_annotation: unsafe extern "C" fn(*mut AbckitCoreClass, *mut AbckitCoreAnnotation),
    pub function_add_annotation: unsafe extern "C" fn(
        *mut AbckitCoreFunction,
        *const AbckitArktsAnnotationCreateParams,
    ) -> *mut AbckitCoreAnnotation,
    pub function_remove_annotation: unsafe extern "C" fn(*mut AbckitCoreFunction, *mut AbckitCoreAnnotation),
    pub annotation_add_annotation_element: unsafe extern "C" fn(
        *mut AbckitCoreAnnotation,
        *const AbckitArktsAnnotationElementCreateParams,
    ) -> *mut AbckitCoreAnnotationElement,
    pub annotation_remove_annotation_element:
        unsafe extern "C" fn(*mut AbckitCoreAnnotation, *mut AbckitCoreAnnotationElement),
    pub annotation_interface_add_field: unsafe extern "C" fn(
        *mut AbckitCoreAnnotationInterface,
        *const AbckitArktsAnnotationInterfaceFieldCreateParams,
    ) -> *mut AbckitCoreAnnotationInterfaceField,
    pub annotation_interface_remove_field:
        unsafe extern "C" fn(*mut AbckitCoreAnnotationInterface, *mut AbckitCoreAnnotationInterfaceField),
}

pub(crate) static ARKTS_MODIFY_API_V1: AbckitArktsModifyApi = AbckitArktsModifyApi {
    module_add_import_from_arkts_v1_to_arkts_v1: arkts_module_add_import_from_arkts_v1_to_arkts_v1,
    module_remove_import: arkts_module_remove_import,
    module_add_export_from_arkts_v1_to_arkts_v1: arkts_module_add_export_from_arkts_v1_to_arkts_v1,
    module_remove_export: arkts_module_remove_export,
    file_add_external_module_arkts_v1: arkts_file_add_external_module_arkts_v1,
    module_add_annotation_interface: arkts_module_add_annotation_interface,
    class_add_annotation: arkts_class_add_annotation,
    class_remove_annotation: arkts_class_remove_annotation,
    function_add_annotation: arkts_function_add_annotation,
    function_remove_annotation: arkts_function_remove_annotation,
    annotation_add_annotation_element: arkts_annotation_add_annotation_element,
    annotation_remove_annotation_element: arkts_annotation_remove_annotation_element,
    annotation_interface_add_field: arkts_annotation_interface_add_field,
    annotation_interface_remove_field: arkts_annotation_interface_remove_field,
};

// ============================================================================
// JS
// ============================================================================

entry! {
    fn js_module_add_import_from_js_to_js(
        importing: *mut AbckitCoreModule,
        imported: *mut AbckitCoreModule,
        params_ptr: *const AbckitImportFromDynamicModuleCreateParams,
    ) -> *mut AbckitCoreImportDescriptor {
        let (handle, importing) = module_ref(importing)?;
        let imported = module_id(imported)?;
        let params = params(params_ptr)?.to_params()?;
        let import = handle
            .file
            .js_module_add_import_from_js_to_js(importing, imported, &params)?;
        Ok(handle.intern(Entity::Import(import)))
    }

    fn js_module_remove_import(module: *mut AbckitCoreModule, import: *mut AbckitCoreImportDescriptor) -> () {
        let (handle, m) = module_ref(module)?;
        let i = import_id(import)?;
        handle.file.js_module_remove_import(m, i)
    }

    fn js_module_add_export_from_js_to_js(
        exporting: *mut AbckitCoreModule,
        exported: *mut AbckitCoreModule,
        params_ptr: *const AbckitDynamicModuleExportCreateParams,
    ) -> *mut AbckitCoreExportDescriptor {
        let (handle, exporting) = module_ref(exporting)?;
        let exported = module_id(exported)?;
        let params = params(params_ptr)?.to_params()?;
        let export = handle
            .file
            .js_module_add_export_from_js_to_js(exporting, exported, &params)?;
        Ok(handle.intern(Entity::Export(export)))
    }

    fn js_module_remove_export(module: *mut AbckitCoreModule, export: *mut AbckitCoreExportDescriptor) -> () {
        let (handle, m) = module_ref(module)?;
        let e = export_id(export)?;
        handle.file.js_module_remove_export(m, e)
    }

    fn js_file_add_external_module(
        file: *mut AbckitFile,
        params_ptr: *const AbckitExternalModuleCreateParams,
    ) -> *mut AbckitCoreModule {
        let handle = file_handle(file)?;
        let params = params(params_ptr)?.to_params()?;
        let module = handle.file.js_file_add_external_module(&params)?;
        Ok(handle.intern(Entity::Module(module)))
    }
}

/// Structural edits of JS modules
#[repr(C)]
pub struct AbckitJsModifyApi {
    pub module_add_import_from_js_to_js: unsafe extern "C" fn(
        *mut AbckitCoreModule,
        *mut AbckitCoreModule,
        *const AbckitImportFromDynamicModuleCreateParams,
    ) -> *mut AbckitCoreImportDescriptor,
    pub module_remove_import: unsafe extern "C" fn(*mut AbckitCoreModule, *mut AbckitCoreImportDescriptor),
    pub module_add_export_from_js_to_js: unsafe extern "C" fn(
        *mut AbckitCoreModule,
        *mut AbckitCoreModule,
        *const AbckitDynamicModuleExportCreateParams,
    ) -> *mut AbckitCoreExportDescriptor,
    pub module_remove_export: unsafe extern "C" fn(*mut AbckitCoreModule, *mut AbckitCoreExportDescriptor),
    pub file_add_external_module:
        unsafe extern "C" fn(*mut AbckitFile, *const AbckitExternalModuleCreateParams) -> *mut AbckitCoreModule,
}

pub(crate) static JS_MODIFY_API_V1: AbckitJsModifyApi = AbckitJsModifyApi {
    module_add_import_from_js_to_js: js_module_add_import_from_js_to_js,
    module_remove_import: js_module_remove_import,
    module_add_export_from_js_to_js: js_module_add_export_from_js_to_js,
    module_remove_export: js_module_remove_export,
    file_add_external_module: js_file_add_external_module,
};

//! ArkTS extension operations
//!
//! Import and export descriptors carry names only in ArkTS-v1 modules, so
//! the descriptor operations reject ArkTS-v2 modules with `Unsupported`.
//! Annotations are available to both ArkTS targets.

use super::params::{
    AnnotationElementParams, AnnotationInterfaceFieldParams, AnnotationInterfaceParams,
    AnnotationParams, DynamicModuleExportParams, ExternalModuleParams,
    ImportFromDynamicModuleParams,
};
use crate::backend::{require_arkts, require_descriptor_names};
use crate::file::File;
use crate::metadata::entities::{
    AnnotationData, AnnotationElementData, AnnotationInterfaceData, AnnotationInterfaceFieldData,
};
use crate::metadata::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationOwner,
    AnnotationRef, ClassRef, ExportRef, FunctionRef, ImportRef, ModuleRef,
};
use crate::status::{KitError, KitResult};
use crate::target::{Mode, Target};

impl File {
    /// ArkTS module whose descriptors carry names
    fn require_arkts_descriptors(&self, module: ModuleRef, operation: &'static str) -> KitResult<()> {
        let target = self.module_target(module)?;
        require_arkts(target, operation)?;
        require_descriptor_names(target, operation)
    }

    pub fn arkts_module_add_import_from_arkts_v1_to_arkts_v1(
        &mut self,
        importing: ModuleRef,
        imported: ModuleRef,
        params: &ImportFromDynamicModuleParams,
    ) -> KitResult<ImportRef> {
        const OP: &str = "moduleAddImportFromArktsV1ToArktsV1";
        tracing::debug!(target: "abckit::modify", importing = importing.index, imported = imported.index, name = %params.name, operation = OP);
        self.require_arkts_descriptors(importing, OP)?;
        self.require_arkts_descriptors(imported, OP)?;
        self.insert_import(importing, imported, params)
    }

    pub fn arkts_module_remove_import(&mut self, module: ModuleRef, import: ImportRef) -> KitResult<()> {
        const OP: &str = "moduleRemoveImport";
        tracing::debug!(target: "abckit::modify", module = module.index, import = import.index, operation = OP);
        self.require_arkts_descriptors(module, OP)?;
        self.detach_import(module, import)
    }

    pub fn arkts_module_add_export_from_arkts_v1_to_arkts_v1(
        &mut self,
        exporting: ModuleRef,
        exported: ModuleRef,
        params: &DynamicModuleExportParams,
    ) -> KitResult<ExportRef> {
        const OP: &str = "moduleAddExportFromArktsV1ToArktsV1";
        tracing::debug!(target: "abckit::modify", exporting = exporting.index, exported = exported.index, name = %params.name, operation = OP);
        self.require_arkts_descriptors(exporting, OP)?;
        self.require_arkts_descriptors(exported, OP)?;
        self.insert_export(exporting, exported, params)
    }

    pub fn arkts_module_remove_export(&mut self, module: ModuleRef, export: ExportRef) -> KitResult<()> {
        const OP: &str = "moduleRemoveExport";
        tracing::debug!(target: "abckit::modify", module = module.index, export = export.index, operation = OP);
        self.require_arkts_descriptors(module, OP)?;
        self.detach_export(module, export)
    }

    /// Declare an external ArkTS-v1 module, static files only
    pub fn arkts_file_add_external_module_arkts_v1(
        &mut self,
        params: &ExternalModuleParams,
    ) -> KitResult<ModuleRef> {
        const OP: &str = "fileAddExternalModuleArktsV1";
        tracing::debug!(target: "abckit::modify", name = %params.name, operation = OP);
        self.mode.expect(Mode::Static, OP)?;
        self.insert_external_module(params, Target::ArkTsV1)
    }

    pub fn arkts_module_add_annotation_interface(
        &mut self,
        module: ModuleRef,
        params: &AnnotationInterfaceParams,
    ) -> KitResult<AnnotationInterfaceRef> {
        const OP: &str = "moduleAddAnnotationInterface";
        tracing::debug!(target: "abckit::modify", module = module.index, name = %params.name, operation = OP);
        require_arkts(self.module_target(module)?, OP)?;
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let index = self.annotation_interfaces.push(AnnotationInterfaceData {
            module,
            name,
            fields: Vec::new(),
        });
        let interface = AnnotationInterfaceRef::new(self.id, index);
        self.module_mut(module)?.annotation_interfaces.push(interface);
        Ok(interface)
    }

    pub fn arkts_class_add_annotation(
        &mut self,
        class: ClassRef,
        params: &AnnotationParams,
    ) -> KitResult<AnnotationRef> {
        const OP: &str = "classAddAnnotation";
        tracing::debug!(target: "abckit::modify", class = class.index, operation = OP);
        let module = self.class(class)?.module;
        require_arkts(self.module_target(module)?, OP)?;
        params.validate(self)?;
        let annotation = self.push_annotation(params.interface, AnnotationOwner::Class(class));
        self.class_mut(class)?.annotations.push(annotation);
        Ok(annotation)
    }

    pub fn arkts_class_remove_annotation(
        &mut self,
        class: ClassRef,
        annotation: AnnotationRef,
    ) -> KitResult<()> {
        const OP: &str = "classRemoveAnnotation";
        tracing::debug!(target: "abckit::modify", class = class.index, annotation = annotation.index, operation = OP);
        let module = self.class(class)?.module;
        require_arkts(self.module_target(module)?, OP)?;
        if self.annotation(annotation)?.owner != AnnotationOwner::Class(class) {
            return Err(KitError::bad_argument("annotation is not attached to this class"));
        }
        self.class_mut(class)?.annotations.retain(|&a| a != annotation);
        self.drop_annotation(annotation);
        Ok(())
    }

    pub fn arkts_function_add_annotation(
        &mut self,
        function: FunctionRef,
        params: &AnnotationParams,
    ) -> KitResult<AnnotationRef> {
        const OP: &str = "functionAddAnnotation";
        tracing::debug!(target: "abckit::modify", function = function.index, operation = OP);
        let module = self.function(function)?.module;
        require_arkts(self.module_target(module)?, OP)?;
        params.validate(self)?;
        let annotation = self.push_annotation(params.interface, AnnotationOwner::Function(function));
        self.function_mut(function)?.annotations.push(annotation);
        Ok(annotation)
    }

    pub fn arkts_function_remove_annotation(
        &mut self,
        function: FunctionRef,
        annotation: AnnotationRef,
    ) -> KitResult<()> {
        const OP: &str = "functionRemoveAnnotation";
        tracing::debug!(target: "abckit::modify", function = function.index, annotation = annotation.index, operation = OP);
        let module = self.function(function)?.module;
        require_arkts(self.module_target(module)?, OP)?;
        if self.annotation(annotation)?.owner != AnnotationOwner::Function(function) {
            return Err(KitError::bad_argument("annotation is not attached to this function"));
        }
        self.function_mut(function)?.annotations.retain(|&a| a != annotation);
        self.drop_annotation(annotation);
        Ok(())
    }

    pub fn arkts_annotation_add_annotation_element(
        &mut self,
        annotation: AnnotationRef,
        params: &AnnotationElementParams,
    ) -> KitResult<AnnotationElementRef> {
        const OP: &str = "annotationAddAnnotationElement";
        tracing::debug!(target: "abckit::modify", annotation = annotation.index, name = %params.name, operation = OP);
        let module = self.annotation_module(annotation)?;
        require_arkts(self.module_target(module)?, OP)?;
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let index = self.annotation_elements.push(AnnotationElementData {
            annotation,
            name,
            value: params.value,
        });
        let element = AnnotationElementRef::new(self.id, index);
        self.annotation_mut(annotation)?.elements.push(element);
        Ok(element)
    }

    pub fn arkts_annotation_remove_annotation_element(
        &mut self,
        annotation: AnnotationRef,
        element: AnnotationElementRef,
    ) -> KitResult<()> {
        const OP: &str = "annotationRemoveAnnotationElement";
        tracing::debug!(target: "abckit::modify", annotation = annotation.index, element = element.index, operation = OP);
        let module = self.annotation_module(annotation)?;
        require_arkts(self.module_target(module)?, OP)?;
        if self.annotation_element(element)?.annotation != annotation {
            return Err(KitError::bad_argument("element belongs to another annotation"));
        }
        self.annotation_mut(annotation)?.elements.retain(|&e| e != element);
        self.annotation_elements.remove(element.index);
        Ok(())
    }

    pub fn arkts_annotation_interface_add_field(
        &mut self,
        interface: AnnotationInterfaceRef,
        params: &AnnotationInterfaceFieldParams,
    ) -> KitResult<AnnotationInterfaceFieldRef> {
        const OP: &str = "annotationInterfaceAddField";
        tracing::debug!(target: "abckit::modify", interface = interface.index, name = %params.name, operation = OP);
        let module = self.annotation_interface_module(interface)?;
        require_arkts(self.module_target(module)?, OP)?;
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let index = self.annotation_interface_fields.push(AnnotationInterfaceFieldData {
            interface,
            name,
            ty: params.ty,
            default_value: params.default_value,
        });
        let field = AnnotationInterfaceFieldRef::new(self.id, index);
        self.annotation_interface_mut(interface)?.fields.push(field);
        Ok(field)
    }

    pub fn arkts_annotation_interface_remove_field(
        &mut self,
        interface: AnnotationInterfaceRef,
        field: AnnotationInterfaceFieldRef,
    ) -> KitResult<()> {
        const OP: &str = "annotationInterfaceRemoveField";
        tracing::debug!(target: "abckit::modify", interface = interface.index, field = field.index, operation = OP);
        let module = self.annotation_interface_module(interface)?;
        require_arkts(self.module_target(module)?, OP)?;
        if self.annotation_interface_field(field)?.interface != interface {
            return Err(KitError::bad_argument("field belongs to another interface"));
        }
        self.annotation_interface_mut(interface)?.fields.retain(|&f| f != field);
        self.annotation_interface_fields.remove(field.index);
        Ok(())
    }

    fn push_annotation(&mut self, interface: AnnotationInterfaceRef, owner: AnnotationOwner) -> AnnotationRef {
        let index = self.annotations.push(AnnotationData {
            interface,
            owner,
            elements: Vec::new(),
        });
        AnnotationRef::new(self.id, index)
    }

    /// Remove an annotation together with its elements
    fn drop_annotation(&mut self, annotation: AnnotationRef) {
        if let Some(data) = self.annotations.remove(annotation.index) {
            for element in data.elements {
                self.annotation_elements.remove(element.index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FileBuilder, FunctionDecl};
    use crate::metadata::{Scope, TypeId};
    use crate::status::Status;

    #[test]
    fn test_descriptors_need_arkts_v1() {
        let mut builder = FileBuilder::new(Mode::Static);
        let v1 = builder.add_module("v1", Target::ArkTsV1).unwrap();
        let other = builder.add_module("other", Target::ArkTsV1).unwrap();
        let v2 = builder.add_module("v2", Target::ArkTsV2).unwrap();
        let native = builder.add_module("native", Target::Native).unwrap();
        let mut file = builder.build();
        let params = ImportFromDynamicModuleParams::new("a", "b");

        assert!(file
            .arkts_module_add_import_from_arkts_v1_to_arkts_v1(v1, other, &params)
            .is_ok());
        let err = file
            .arkts_module_add_import_from_arkts_v1_to_arkts_v1(v2, other, &params)
            .unwrap_err();
        assert_eq!(err.status(), Status::Unsupported);
        let err = file
            .arkts_module_add_import_from_arkts_v1_to_arkts_v1(native, other, &params)
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongTarget);
        assert!(file.module(v2).unwrap().imports.is_empty());
    }

    #[test]
    fn test_annotation_lifecycle() {
        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV2).unwrap();
        let c = builder.add_class(Scope::Module(m), "C").unwrap();
        let f = builder.add_function(Scope::Class(c), "run", FunctionDecl::new()).unwrap();
        let mut file = builder.build();

        let interface = file
            .arkts_module_add_annotation_interface(m, &AnnotationInterfaceParams::new("Anno"))
            .unwrap();
        let ty = file.create_type(TypeId::F64).unwrap();
        let field = file
            .arkts_annotation_interface_add_field(
                interface,
                &AnnotationInterfaceFieldParams {
                    name: "weight".into(),
                    ty,
                    default_value: None,
                },
            )
            .unwrap();
        let anno = file
            .arkts_function_add_annotation(f, &AnnotationParams { interface })
            .unwrap();
        let value = file.create_value_double(2.0);
        let element = file
            .arkts_annotation_add_annotation_element(
                anno,
                &AnnotationElementParams {
                    name: "weight".into(),
                    value,
                },
            )
            .unwrap();

        let err = file.arkts_class_remove_annotation(c, anno).unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);

        file.arkts_function_remove_annotation(f, anno).unwrap();
        assert!(file.function(f).unwrap().annotations.is_empty());
        assert_eq!(file.annotation_element(element).unwrap_err().status(), Status::BadArgument);

        file.arkts_annotation_interface_remove_field(interface, field).unwrap();
        assert!(file.annotation_interface(interface).unwrap().fields.is_empty());
    }

    #[test]
    fn test_annotations_reject_js_modules() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let m = builder.add_module("m", Target::Js).unwrap();
        let mut file = builder.build();
        let err = file
            .arkts_module_add_annotation_interface(m, &AnnotationInterfaceParams::new("A"))
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongTarget);
    }
}

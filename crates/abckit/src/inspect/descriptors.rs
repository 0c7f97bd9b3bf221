//! Import/export descriptors and annotations

use super::visit_all;
use crate::backend::require_descriptor_names;
use crate::file::File;
use crate::metadata::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationOwner,
    AnnotationRef, ExportRef, ImportRef, ModuleRef, TypeRef, ValueRef,
};
use crate::status::KitResult;

impl File {
    /// Name imported from the other module, ArkTS-v1 and JS only
    pub fn import_get_name(&self, import: ImportRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", import = import.index, "importDescriptorGetName");
        require_descriptor_names(self.import_target(import)?, "importDescriptorGetName")?;
        self.string_to_string(self.import(import)?.name)
    }

    /// Local binding of the import, ArkTS-v1 and JS only
    pub fn import_get_alias(&self, import: ImportRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", import = import.index, "importDescriptorGetAlias");
        require_descriptor_names(self.import_target(import)?, "importDescriptorGetAlias")?;
        self.string_to_string(self.import(import)?.alias)
    }

    pub fn import_get_importing_module(&self, import: ImportRef) -> KitResult<ModuleRef> {
        Ok(self.import(import)?.module)
    }

    pub fn import_get_imported_module(&self, import: ImportRef) -> KitResult<ModuleRef> {
        Ok(self.import(import)?.imported)
    }

    pub fn export_get_name(&self, export: ExportRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", export = export.index, "exportDescriptorGetName");
        require_descriptor_names(self.export_target(export)?, "exportDescriptorGetName")?;
        self.string_to_string(self.export(export)?.name)
    }

    pub fn export_get_alias(&self, export: ExportRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", export = export.index, "exportDescriptorGetAlias");
        require_descriptor_names(self.export_target(export)?, "exportDescriptorGetAlias")?;
        self.string_to_string(self.export(export)?.alias)
    }

    pub fn export_get_exporting_module(&self, export: ExportRef) -> KitResult<ModuleRef> {
        Ok(self.export(export)?.module)
    }

    pub fn export_get_exported_module(&self, export: ExportRef) -> KitResult<ModuleRef> {
        Ok(self.export(export)?.exported)
    }

    pub fn annotation_get_interface(&self, annotation: AnnotationRef) -> KitResult<AnnotationInterfaceRef> {
        Ok(self.annotation(annotation)?.interface)
    }

    pub fn annotation_get_owner(&self, annotation: AnnotationRef) -> KitResult<AnnotationOwner> {
        Ok(self.annotation(annotation)?.owner)
    }

    pub fn annotation_enumerate_elements(
        &self,
        annotation: AnnotationRef,
        visitor: impl FnMut(AnnotationElementRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", annotation = annotation.index, "annotationEnumerateElements");
        Ok(visit_all(&self.annotation(annotation)?.elements, visitor))
    }

    pub fn annotation_element_get_annotation(&self, element: AnnotationElementRef) -> KitResult<AnnotationRef> {
        Ok(self.annotation_element(element)?.annotation)
    }

    pub fn annotation_element_get_name(&self, element: AnnotationElementRef) -> KitResult<String> {
        self.string_to_string(self.annotation_element(element)?.name)
    }

    pub fn annotation_element_get_value(&self, element: AnnotationElementRef) -> KitResult<ValueRef> {
        Ok(self.annotation_element(element)?.value)
    }

    pub fn annotation_interface_get_name(&self, interface: AnnotationInterfaceRef) -> KitResult<String> {
        self.string_to_string(self.annotation_interface(interface)?.name)
    }

    pub fn annotation_interface_get_module(&self, interface: AnnotationInterfaceRef) -> KitResult<ModuleRef> {
        self.annotation_interface_module(interface)
    }

    pub fn annotation_interface_enumerate_fields(
        &self,
        interface: AnnotationInterfaceRef,
        visitor: impl FnMut(AnnotationInterfaceFieldRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", interface = interface.index, "annotationInterfaceEnumerateFields");
        Ok(visit_all(&self.annotation_interface(interface)?.fields, visitor))
    }

    pub fn annotation_interface_field_get_interface(
        &self,
        field: AnnotationInterfaceFieldRef,
    ) -> KitResult<AnnotationInterfaceRef> {
        Ok(self.annotation_interface_field(field)?.interface)
    }

    pub fn annotation_interface_field_get_name(&self, field: AnnotationInterfaceFieldRef) -> KitResult<String> {
        self.string_to_string(self.annotation_interface_field(field)?.name)
    }

    pub fn annotation_interface_field_get_type(&self, field: AnnotationInterfaceFieldRef) -> KitResult<TypeRef> {
        Ok(self.annotation_interface_field(field)?.ty)
    }

    pub fn annotation_interface_field_get_default_value(
        &self,
        field: AnnotationInterfaceFieldRef,
    ) -> KitResult<Option<ValueRef>> {
        Ok(self.annotation_interface_field(field)?.default_value)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::FileBuilder;
    use crate::status::Status;
    use crate::target::{Mode, Target};

    #[test]
    fn test_descriptor_names_by_target() {
        let mut builder = FileBuilder::new(Mode::Static);
        let v1 = builder.add_module("v1", Target::ArkTsV1).unwrap();
        let v2 = builder.add_module("v2", Target::ArkTsV2).unwrap();
        let named = builder.add_import(v1, v2, "sum", "add").unwrap();
        let unnamed = builder.add_import(v2, v1, "sum", "add").unwrap();
        let file = builder.build();

        assert_eq!(file.import_get_name(named).unwrap(), "sum");
        assert_eq!(file.import_get_alias(named).unwrap(), "add");
        assert_eq!(file.import_get_imported_module(named).unwrap(), v2);
        assert_eq!(file.import_get_name(unnamed).unwrap_err().status(), Status::Unsupported);
    }
}

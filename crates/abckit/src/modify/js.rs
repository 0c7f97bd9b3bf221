//! JS extension operations

use super::params::{DynamicModuleExportParams, ExternalModuleParams, ImportFromDynamicModuleParams};
use crate::backend::require_js;
use crate::file::File;
use crate::metadata::{ExportRef, ImportRef, ModuleRef};
use crate::status::KitResult;
use crate::target::{Mode, Target};

impl File {
    /// Import `params.name` from `imported` into `importing`, both JS
    pub fn js_module_add_import_from_js_to_js(
        &mut self,
        importing: ModuleRef,
        imported: ModuleRef,
        params: &ImportFromDynamicModuleParams,
    ) -> KitResult<ImportRef> {
        const OP: &str = "moduleAddImportFromJsToJs";
        tracing::debug!(target: "abckit::modify", importing = importing.index, imported = imported.index, name = %params.name, operation = OP);
        require_js(self.module_target(importing)?, OP)?;
        require_js(self.module_target(imported)?, OP)?;
        self.insert_import(importing, imported, params)
    }

    pub fn js_module_remove_import(&mut self, module: ModuleRef, import: ImportRef) -> KitResult<()> {
        const OP: &str = "moduleRemoveImport";
        tracing::debug!(target: "abckit::modify", module = module.index, import = import.index, operation = OP);
        require_js(self.module_target(module)?, OP)?;
        self.detach_import(module, import)
    }

    /// Export `params.name` of `exported` from `exporting`, both JS
    pub fn js_module_add_export_from_js_to_js(
        &mut self,
        exporting: ModuleRef,
        exported: ModuleRef,
        params: &DynamicModuleExportParams,
    ) -> KitResult<ExportRef> {
        const OP: &str = "moduleAddExportFromJsToJs";
        tracing::debug!(target: "abckit::modify", exporting = exporting.index, exported = exported.index, name = %params.name, operation = OP);
        require_js(self.module_target(exporting)?, OP)?;
        require_js(self.module_target(exported)?, OP)?;
        self.insert_export(exporting, exported, params)
    }

    pub fn js_module_remove_export(&mut self, module: ModuleRef, export: ExportRef) -> KitResult<()> {
        const OP: &str = "moduleRemoveExport";
        tracing::debug!(target: "abckit::modify", module = module.index, export = export.index, operation = OP);
        require_js(self.module_target(module)?, OP)?;
        self.detach_export(module, export)
    }

    /// Declare an external JS module, dynamic files only
    pub fn js_file_add_external_module(&mut self, params: &ExternalModuleParams) -> KitResult<ModuleRef> {
        const OP: &str = "fileAddExternalModule";
        tracing::debug!(target: "abckit::modify", name = %params.name, operation = OP);
        self.mode.expect(Mode::Dynamic, OP)?;
        self.insert_external_module(params, Target::Js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FileBuilder;
    use crate::status::Status;

    fn two_modules() -> (File, ModuleRef, ModuleRef) {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let a = builder.add_module("a", Target::Js).unwrap();
        let b = builder.add_module("b", Target::Js).unwrap();
        (builder.build(), a, b)
    }

    #[test]
    fn test_import_add_and_remove() {
        let (mut file, a, b) = two_modules();
        let params = ImportFromDynamicModuleParams::new("foo", "bar");
        let import = file.js_module_add_import_from_js_to_js(a, b, &params).unwrap();
        assert_eq!(file.module(a).unwrap().imports, vec![import]);

        file.js_module_remove_import(a, import).unwrap();
        assert!(file.module(a).unwrap().imports.is_empty());
        let err = file.js_module_remove_import(a, import).unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
    }

    #[test]
    fn test_remove_from_wrong_module() {
        let (mut file, a, b) = two_modules();
        let export = file
            .js_module_add_export_from_js_to_js(a, b, &DynamicModuleExportParams::new("x"))
            .unwrap();
        let err = file.js_module_remove_export(b, export).unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
        assert_eq!(file.module(a).unwrap().exports, vec![export]);
    }

    #[test]
    fn test_external_module_needs_dynamic_file() {
        let (mut file, _, _) = two_modules();
        let module = file
            .js_file_add_external_module(&ExternalModuleParams::new("ext"))
            .unwrap();
        assert!(file.module(module).unwrap().is_external);
        let err = file
            .js_file_add_external_module(&ExternalModuleParams::new("ext"))
            .unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);

        let mut builder = FileBuilder::new(Mode::Static);
        builder.add_module("s", Target::ArkTsV1).unwrap();
        let mut file = builder.build();
        let err = file
            .js_file_add_external_module(&ExternalModuleParams::new("ext"))
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongMode);
    }
}

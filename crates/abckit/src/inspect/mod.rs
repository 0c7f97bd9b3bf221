//! Inspect API
//!
//! Read-only accessors over a [`File`]. Enumerations visit entities in
//! storage order and stop as soon as the visitor returns `false`; they
//! report whether the walk ran to completion. Back-end specific accessors
//! dispatch on the target of the governing module.

mod descriptors;
mod function;
mod literal;

use crate::backend::{arkts, dynamic};
use crate::file::File;
use crate::ir::body;
use crate::ir::graph::Graph;
use crate::metadata::{
    AnnotationInterfaceRef, ClassRef, ExportRef, FunctionRef, ImportRef, ModuleRef, NamespaceRef,
};
use crate::status::KitResult;
use crate::target::{Mode, Target};
use crate::version::FileVersion;

/// Visit `items` until `visitor` returns `false`
pub(crate) fn visit_all<T: Copy>(items: &[T], mut visitor: impl FnMut(T) -> bool) -> bool {
    items.iter().all(|&item| visitor(item))
}

impl File {
    pub fn file_get_version(&self) -> FileVersion {
        tracing::debug!(target: "abckit::inspect", file = %self.id, "fileGetVersion");
        self.version
    }

    /// Visit local modules
    pub fn file_enumerate_modules(&self, visitor: impl FnMut(ModuleRef) -> bool) -> bool {
        tracing::debug!(target: "abckit::inspect", file = %self.id, "fileEnumerateModules");
        self.enumerate_modules(false, visitor)
    }

    /// Visit external modules
    pub fn file_enumerate_external_modules(&self, visitor: impl FnMut(ModuleRef) -> bool) -> bool {
        tracing::debug!(target: "abckit::inspect", file = %self.id, "fileEnumerateExternalModules");
        self.enumerate_modules(true, visitor)
    }

    fn enumerate_modules(&self, external: bool, mut visitor: impl FnMut(ModuleRef) -> bool) -> bool {
        self.modules
            .iter()
            .filter(|(_, m)| m.is_external == external)
            .all(|(index, _)| visitor(ModuleRef::new(self.id, index)))
    }

    pub fn module_get_name(&self, module: ModuleRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleGetName");
        self.dispatch_module(module, "moduleGetName")?;
        self.string_to_string(self.module(module)?.name)
    }

    pub fn module_get_target(&self, module: ModuleRef) -> KitResult<Target> {
        self.module_target(module)
    }

    pub fn module_is_external(&self, module: ModuleRef) -> KitResult<bool> {
        Ok(self.module(module)?.is_external)
    }

    pub fn module_enumerate_namespaces(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(NamespaceRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateNamespaces");
        self.dispatch_module(module, "moduleEnumerateNamespaces")?;
        Ok(visit_all(&self.module(module)?.namespaces, visitor))
    }

    pub fn module_enumerate_classes(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(ClassRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateClasses");
        self.dispatch_module(module, "moduleEnumerateClasses")?;
        Ok(visit_all(&self.module(module)?.classes, visitor))
    }

    pub fn module_enumerate_top_level_functions(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(FunctionRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateTopLevelFunctions");
        self.dispatch_module(module, "moduleEnumerateTopLevelFunctions")?;
        Ok(visit_all(&self.module(module)?.functions, visitor))
    }

    /// Visit anonymous functions; static modules have none
    pub fn module_enumerate_anonymous_functions(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(FunctionRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateAnonymousFunctions");
        self.dispatch_module(module, "moduleEnumerateAnonymousFunctions")?;
        Ok(visit_all(&self.module(module)?.anonymous_functions, visitor))
    }

    pub fn module_enumerate_imports(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(ImportRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateImports");
        self.dispatch_module(module, "moduleEnumerateImports")?;
        Ok(visit_all(&self.module(module)?.imports, visitor))
    }

    pub fn module_enumerate_exports(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(ExportRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateExports");
        self.dispatch_module(module, "moduleEnumerateExports")?;
        Ok(visit_all(&self.module(module)?.exports, visitor))
    }

    pub fn module_enumerate_annotation_interfaces(
        &self,
        module: ModuleRef,
        visitor: impl FnMut(AnnotationInterfaceRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", module = module.index, "moduleEnumerateAnnotationInterfaces");
        self.dispatch_module(module, "moduleEnumerateAnnotationInterfaces")?;
        Ok(visit_all(&self.module(module)?.annotation_interfaces, visitor))
    }

    pub fn namespace_get_name(&self, namespace: NamespaceRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", namespace = namespace.index, "namespaceGetName");
        self.string_to_string(self.namespace(namespace)?.name)
    }

    pub fn namespace_get_module(&self, namespace: NamespaceRef) -> KitResult<ModuleRef> {
        self.namespace_module(namespace)
    }

    pub fn namespace_get_parent_namespace(&self, namespace: NamespaceRef) -> KitResult<Option<NamespaceRef>> {
        Ok(self.namespace(namespace)?.parent)
    }

    pub fn namespace_enumerate_namespaces(
        &self,
        namespace: NamespaceRef,
        visitor: impl FnMut(NamespaceRef) -> bool,
    ) -> KitResult<bool> {
        Ok(visit_all(&self.namespace(namespace)?.namespaces, visitor))
    }

    pub fn namespace_enumerate_classes(
        &self,
        namespace: NamespaceRef,
        visitor: impl FnMut(ClassRef) -> bool,
    ) -> KitResult<bool> {
        Ok(visit_all(&self.namespace(namespace)?.classes, visitor))
    }

    pub fn namespace_enumerate_top_level_functions(
        &self,
        namespace: NamespaceRef,
        visitor: impl FnMut(FunctionRef) -> bool,
    ) -> KitResult<bool> {
        Ok(visit_all(&self.namespace(namespace)?.functions, visitor))
    }

    /// Graph of the function body
    ///
    /// Returns a copy of the graph installed by the last
    /// [`function_set_graph`](File::function_set_graph), otherwise decodes
    /// the stored body. The caller owns the result.
    pub fn create_graph_from_function(&self, function: FunctionRef) -> KitResult<Graph> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "createGraphFromFunction");
        self.dispatch_function(function, "createGraphFromFunction")?;
        let data = self.function(function)?;
        let graph = match &data.attached {
            Some(attached) => attached.fork(),
            None => body::decode(&data.body, self, function)?,
        };
        tracing::trace!(target: "abckit::ir", graph = %graph.id(), blocks = graph.block_count(), "created graph");
        Ok(graph)
    }

    /// Name of a function as reported by its back-end
    pub(crate) fn backend_function_name(&self, function: FunctionRef, operation: &'static str) -> KitResult<String> {
        match self.dispatch_function(function, operation)? {
            Mode::Dynamic => dynamic::function_name(self, function),
            Mode::Static => arkts::function_name(self, function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FileBuilder;
    use crate::status::Status;

    #[test]
    fn test_enumeration_stops_early() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        for name in ["a", "b", "c"] {
            builder.add_module(name, Target::Js).unwrap();
        }
        builder.add_external_module("ext", Target::Js).unwrap();
        let file = builder.build();

        let mut seen = Vec::new();
        let finished = file.file_enumerate_modules(|m| {
            seen.push(file.module_get_name(m).unwrap());
            seen.len() < 2
        });
        assert!(!finished);
        assert_eq!(seen, ["a", "b"]);

        let mut external = 0;
        assert!(file.file_enumerate_external_modules(|_| {
            external += 1;
            true
        }));
        assert_eq!(external, 1);
    }

    #[test]
    fn test_native_module_has_no_back_end() {
        let mut builder = FileBuilder::new(Mode::Static);
        let native = builder.add_external_module("libc", Target::Native).unwrap();
        let file = builder.build();
        assert_eq!(file.module_get_target(native).unwrap(), Target::Native);
        let err = file.module_get_name(native).unwrap_err();
        assert_eq!(err.status(), Status::WrongTarget);
    }
}

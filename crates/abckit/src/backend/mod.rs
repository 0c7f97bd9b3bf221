//! Back-end dispatch
//!
//! Operations whose meaning depends on the back-end resolve the module
//! that governs the entity, read its [`Target`] and pick the dynamic or the
//! static implementation. The choice is made once per call at the module
//! boundary; entities never carry their own back-end tag.

pub(crate) mod arkts;
pub(crate) mod dynamic;

use crate::file::File;
use crate::metadata::{
    AnnotationInterfaceRef, AnnotationOwner, AnnotationRef, ClassRef, ExportRef, FunctionRef,
    ImportRef, ModuleRef, NamespaceRef,
};
use crate::status::{KitError, KitResult};
use crate::target::{Mode, Target};

/// How a function is declared, which decides its stored name
#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionKind<'a> {
    /// Module or namespace level
    TopLevel,
    /// Method of `class`
    Method { class: &'a str },
    /// Constructor of `class`
    Ctor { class: &'a str },
    /// Declared inside the function stored as `parent_raw`
    Nested { parent_raw: &'a str },
    /// Anonymous function number `index` of its module
    Anonymous { index: usize },
}

impl File {
    pub(crate) fn module_target(&self, module: ModuleRef) -> KitResult<Target> {
        Ok(self.module(module)?.target)
    }

    /// Back-end serving `module`, `WrongTarget` for native and unknown ones
    pub(crate) fn dispatch_module(&self, module: ModuleRef, operation: &'static str) -> KitResult<Mode> {
        let target = self.module_target(module)?;
        let mode = target.require_mode(operation).map_err(|err| {
            tracing::warn!(target: "abckit::dispatch", operation, %target, "no back-end for target");
            err
        })?;
        tracing::trace!(target: "abckit::dispatch", operation, %target, %mode, "dispatched");
        Ok(mode)
    }

    pub(crate) fn dispatch_function(&self, function: FunctionRef, operation: &'static str) -> KitResult<Mode> {
        let module = self.function(function)?.module;
        self.dispatch_module(module, operation)
    }

    pub(crate) fn dispatch_class(&self, class: ClassRef, operation: &'static str) -> KitResult<Mode> {
        let module = self.class(class)?.module;
        self.dispatch_module(module, operation)
    }

    pub(crate) fn namespace_module(&self, namespace: NamespaceRef) -> KitResult<ModuleRef> {
        Ok(self.namespace(namespace)?.module)
    }

    pub(crate) fn import_target(&self, import: ImportRef) -> KitResult<Target> {
        let module = self.import(import)?.module;
        self.module_target(module)
    }

    pub(crate) fn export_target(&self, export: ExportRef) -> KitResult<Target> {
        let module = self.export(export)?.module;
        self.module_target(module)
    }

    pub(crate) fn annotation_interface_module(
        &self,
        interface: AnnotationInterfaceRef,
    ) -> KitResult<ModuleRef> {
        Ok(self.annotation_interface(interface)?.module)
    }

    pub(crate) fn annotation_module(&self, annotation: AnnotationRef) -> KitResult<ModuleRef> {
        match self.annotation(annotation)?.owner {
            AnnotationOwner::Class(class) => Ok(self.class(class)?.module),
            AnnotationOwner::Function(function) => Ok(self.function(function)?.module),
        }
    }

    /// Mode of `module`, `WrongMode` unless it is `expected`
    pub(crate) fn require_module_mode(
        &self,
        module: ModuleRef,
        expected: Mode,
        operation: &'static str,
    ) -> KitResult<()> {
        self.dispatch_module(module, operation)?
            .expect(expected, operation)
    }
}

/// `Arkts*` extension operations accept both ArkTS targets
pub(crate) fn require_arkts(target: Target, operation: &'static str) -> KitResult<()> {
    if target.is_arkts() {
        Ok(())
    } else {
        tracing::warn!(target: "abckit::dispatch", operation, %target, "ArkTS operation on another target");
        Err(KitError::WrongTarget { operation, target })
    }
}

/// `Js*` extension operations accept JS only
pub(crate) fn require_js(target: Target, operation: &'static str) -> KitResult<()> {
    if target.is_js() {
        Ok(())
    } else {
        tracing::warn!(target: "abckit::dispatch", operation, %target, "JS operation on another target");
        Err(KitError::WrongTarget { operation, target })
    }
}

/// Import and export descriptors carry names only for ArkTS-v1 and JS
pub(crate) fn require_descriptor_names(target: Target, operation: &'static str) -> KitResult<()> {
    match target {
        Target::ArkTsV1 | Target::Js => Ok(()),
        _ => Err(KitError::Unsupported { operation, target }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_extension_target_checks() {
        assert!(require_arkts(Target::ArkTsV2, "op").is_ok());
        assert_eq!(
            require_arkts(Target::Js, "op").unwrap_err().status(),
            Status::WrongTarget
        );
        assert!(require_js(Target::Js, "op").is_ok());
        assert_eq!(
            require_js(Target::Ts, "op").unwrap_err().status(),
            Status::WrongTarget
        );
    }

    #[test]
    fn test_descriptor_names() {
        assert!(require_descriptor_names(Target::ArkTsV1, "op").is_ok());
        assert!(require_descriptor_names(Target::Js, "op").is_ok());
        for target in [Target::ArkTsV2, Target::Ts, Target::Native, Target::Unknown] {
            assert_eq!(
                require_descriptor_names(target, "op").unwrap_err().status(),
                Status::Unsupported
            );
        }
    }
}

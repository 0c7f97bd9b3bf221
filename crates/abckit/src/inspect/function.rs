//! Class and function accessors

use super::visit_all;
use crate::backend::{arkts, dynamic};
use crate::file::File;
use crate::metadata::{AnnotationRef, ClassRef, FunctionRef, ModuleRef, NamespaceRef, TypeRef};
use crate::status::KitResult;
use crate::target::Mode;

impl File {
    pub fn class_get_name(&self, class: ClassRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", class = class.index, "classGetName");
        self.dispatch_class(class, "classGetName")?;
        self.string_to_string(self.class(class)?.name)
    }

    pub fn class_get_module(&self, class: ClassRef) -> KitResult<ModuleRef> {
        Ok(self.class(class)?.module)
    }

    pub fn class_get_parent_function(&self, class: ClassRef) -> KitResult<Option<FunctionRef>> {
        Ok(self.class(class)?.parent_function)
    }

    pub fn class_get_parent_namespace(&self, class: ClassRef) -> KitResult<Option<NamespaceRef>> {
        Ok(self.class(class)?.parent_namespace)
    }

    /// Super class of a static class
    pub fn class_get_super_class(&self, class: ClassRef) -> KitResult<Option<ClassRef>> {
        tracing::debug!(target: "abckit::inspect", class = class.index, "classGetSuperClass");
        self.dispatch_class(class, "classGetSuperClass")?
            .expect(Mode::Static, "classGetSuperClass")?;
        arkts::super_class(self, class)
    }

    pub fn class_enumerate_methods(
        &self,
        class: ClassRef,
        visitor: impl FnMut(FunctionRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", class = class.index, "classEnumerateMethods");
        self.dispatch_class(class, "classEnumerateMethods")?;
        Ok(visit_all(&self.class(class)?.methods, visitor))
    }

    pub fn class_enumerate_annotations(
        &self,
        class: ClassRef,
        visitor: impl FnMut(AnnotationRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", class = class.index, "classEnumerateAnnotations");
        self.dispatch_class(class, "classEnumerateAnnotations")?;
        Ok(visit_all(&self.class(class)?.annotations, visitor))
    }

    /// Declared name of a function
    ///
    /// Anonymous dynamic functions have no declared name and report
    /// `<module>.<raw tag>`, e.g. `main.#*@0*#`.
    pub fn function_get_name(&self, function: FunctionRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionGetName");
        self.backend_function_name(function, "functionGetName")
    }

    pub fn function_get_module(&self, function: FunctionRef) -> KitResult<ModuleRef> {
        Ok(self.function(function)?.module)
    }

    pub fn function_get_parent_class(&self, function: FunctionRef) -> KitResult<Option<ClassRef>> {
        Ok(self.function(function)?.parent_class)
    }

    pub fn function_get_parent_function(&self, function: FunctionRef) -> KitResult<Option<FunctionRef>> {
        Ok(self.function(function)?.parent_function)
    }

    pub fn function_get_parent_namespace(&self, function: FunctionRef) -> KitResult<Option<NamespaceRef>> {
        Ok(self.function(function)?.parent_namespace)
    }

    pub fn function_is_static(&self, function: FunctionRef) -> KitResult<bool> {
        Ok(self.function(function)?.is_static)
    }

    pub fn function_is_ctor(&self, function: FunctionRef) -> KitResult<bool> {
        Ok(self.function(function)?.is_ctor)
    }

    pub fn function_is_anonymous(&self, function: FunctionRef) -> KitResult<bool> {
        Ok(self.function(function)?.is_anonymous)
    }

    pub fn function_enumerate_nested_functions(
        &self,
        function: FunctionRef,
        visitor: impl FnMut(FunctionRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionEnumerateNestedFunctions");
        self.dispatch_function(function, "functionEnumerateNestedFunctions")?;
        Ok(visit_all(&self.function(function)?.nested_functions, visitor))
    }

    pub fn function_enumerate_nested_classes(
        &self,
        function: FunctionRef,
        visitor: impl FnMut(ClassRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionEnumerateNestedClasses");
        self.dispatch_function(function, "functionEnumerateNestedClasses")?;
        Ok(visit_all(&self.function(function)?.nested_classes, visitor))
    }

    pub fn function_enumerate_annotations(
        &self,
        function: FunctionRef,
        visitor: impl FnMut(AnnotationRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionEnumerateAnnotations");
        self.dispatch_function(function, "functionEnumerateAnnotations")?;
        Ok(visit_all(&self.function(function)?.annotations, visitor))
    }

    /// Return type of a static function
    pub fn function_get_return_type(&self, function: FunctionRef) -> KitResult<TypeRef> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionGetReturnType");
        self.dispatch_function(function, "functionGetReturnType")?
            .expect(Mode::Static, "functionGetReturnType")?;
        Ok(arkts::signature(self, function)?.ret)
    }

    /// Parameter types of a static function, in declaration order
    pub fn function_enumerate_parameter_types(
        &self,
        function: FunctionRef,
        visitor: impl FnMut(TypeRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionEnumerateParameterTypes");
        self.dispatch_function(function, "functionEnumerateParameterTypes")?
            .expect(Mode::Static, "functionEnumerateParameterTypes")?;
        Ok(visit_all(&arkts::signature(self, function)?.params, visitor))
    }

    /// Enclosing scopes of a function, outermost (the module) first
    pub fn function_get_scope_path(&self, function: FunctionRef) -> KitResult<Vec<String>> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionGetScopePath");
        self.dispatch_function(function, "functionGetScopePath")?;
        self.function_scope(function)
    }

    /// Scope path and local name joined with `.`
    pub fn function_get_qualified_name(&self, function: FunctionRef) -> KitResult<String> {
        tracing::debug!(target: "abckit::inspect", function = function.index, "functionGetQualifiedName");
        self.dispatch_function(function, "functionGetQualifiedName")?;
        let mut path = self.function_scope(function)?;
        path.push(self.scope_component(function)?);
        Ok(path.join("."))
    }

    fn scope_component(&self, function: FunctionRef) -> KitResult<String> {
        match self.dispatch_function(function, "functionGetScopePath")? {
            Mode::Dynamic => dynamic::scope_component(self, function),
            Mode::Static => arkts::function_name(self, function),
        }
    }

    fn function_scope(&self, function: FunctionRef) -> KitResult<Vec<String>> {
        let data = self.function(function)?;
        if let Some(parent) = data.parent_function {
            let mut path = self.function_scope(parent)?;
            path.push(self.scope_component(parent)?);
            Ok(path)
        } else if let Some(class) = data.parent_class {
            let mut path = self.class_scope(class)?;
            path.push(self.string_to_string(self.class(class)?.name)?);
            Ok(path)
        } else if let Some(namespace) = data.parent_namespace {
            self.namespace_path(namespace)
        } else {
            Ok(vec![self.string_to_string(self.module(data.module)?.name)?])
        }
    }

    fn class_scope(&self, class: ClassRef) -> KitResult<Vec<String>> {
        let data = self.class(class)?;
        if let Some(parent) = data.parent_function {
            let mut path = self.function_scope(parent)?;
            path.push(self.scope_component(parent)?);
            Ok(path)
        } else if let Some(namespace) = data.parent_namespace {
            self.namespace_path(namespace)
        } else {
            Ok(vec![self.string_to_string(self.module(data.module)?.name)?])
        }
    }

    /// Module name followed by the namespaces down to `namespace`
    fn namespace_path(&self, namespace: NamespaceRef) -> KitResult<Vec<String>> {
        let data = self.namespace(namespace)?;
        let mut path = match data.parent {
            Some(parent) => self.namespace_path(parent)?,
            None => vec![self.string_to_string(self.module(data.module)?.name)?],
        };
        path.push(self.string_to_string(data.name)?);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{FileBuilder, FunctionDecl};
    use crate::metadata::{Scope, TypeId};
    use crate::status::Status;
    use crate::target::{Mode, Target};

    #[test]
    fn test_scope_path_through_namespace_and_class() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let m = builder.add_module("app", Target::Js).unwrap();
        let ns = builder.add_namespace(Scope::Module(m), "util").unwrap();
        let c = builder.add_class(Scope::Namespace(ns), "Point").unwrap();
        let method = builder.add_function(Scope::Class(c), "norm", FunctionDecl::new()).unwrap();
        let inner = builder
            .add_function(Scope::Function(method), "helper", FunctionDecl::new())
            .unwrap();
        let file = builder.build();

        assert_eq!(file.function_get_name(method).unwrap(), "norm");
        assert_eq!(
            file.function_get_scope_path(inner).unwrap(),
            ["app", "util", "Point", "norm"]
        );
        assert_eq!(
            file.function_get_qualified_name(inner).unwrap(),
            "app.util.Point.norm.helper"
        );
    }

    #[test]
    fn test_static_only_accessors() {
        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV1).unwrap();
        let base = builder.add_class(Scope::Module(m), "Base").unwrap();
        let derived = builder.add_class(Scope::Module(m), "Derived").unwrap();
        builder.set_super_class(derived, base).unwrap();
        let ty = builder.file_mut().create_type(TypeId::F64).unwrap();
        let f = builder
            .add_function(
                Scope::Module(m),
                "scale",
                FunctionDecl::static_fn().with_signature(vec![ty, ty], ty),
            )
            .unwrap();
        let file = builder.build();

        assert_eq!(file.class_get_super_class(derived).unwrap(), Some(base));
        assert_eq!(file.function_get_name(f).unwrap(), "scale");
        assert_eq!(file.function_get_return_type(f).unwrap(), ty);
        let mut params = Vec::new();
        file.function_enumerate_parameter_types(f, |t| {
            params.push(t);
            true
        })
        .unwrap();
        assert_eq!(params, [ty, ty]);
    }

    #[test]
    fn test_static_only_accessors_reject_dynamic() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let m = builder.add_module("m", Target::Js).unwrap();
        let c = builder.add_class(Scope::Module(m), "C").unwrap();
        let f = builder.add_function(Scope::Module(m), "f", FunctionDecl::new()).unwrap();
        let file = builder.build();

        assert_eq!(file.class_get_super_class(c).unwrap_err().status(), Status::WrongMode);
        assert_eq!(file.function_get_return_type(f).unwrap_err().status(), Status::WrongMode);
    }
}

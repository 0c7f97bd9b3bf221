//! File builder for constructing files from scratch
//!
//! Declarations that only a compiler produces (modules, namespaces,
//! classes, functions, literals with arbitrary tags) are added here. Every
//! function gets a default body that returns immediately; richer bodies are
//! installed afterwards with [`File::function_set_graph`].

use crate::backend::{arkts, dynamic, FunctionKind};
use crate::config::KitConfig;
use crate::file::File;
use crate::ir::body;
use crate::ir::Graph;
use crate::metadata::entities::{
    ClassData, ExportData, FunctionData, ImportData, ModuleData, NamespaceData, Signature,
};
use crate::metadata::literal::LiteralData;
use crate::metadata::types::TypeData;
use crate::metadata::{
    ClassRef, ExportRef, FunctionRef, ImportRef, LiteralRef, LiteralTag, LiteralValue, ModuleRef,
    NamespaceRef, Scope, TypeId, TypeRef,
};
use crate::status::{KitError, KitResult};
use crate::target::{Mode, Target};

/// Function declaration details
#[derive(Debug, Clone, Default)]
pub struct FunctionDecl {
    pub is_static: bool,
    pub is_ctor: bool,
    /// Parameter types, static files only
    pub params: Vec<TypeRef>,
    /// Return type, static files only; `void` when absent
    pub ret: Option<TypeRef>,
    /// Argument count, dynamic files only
    pub arg_count: u32,
}

impl FunctionDecl {
    /// Plain instance function without parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn static_fn() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    pub fn ctor() -> Self {
        Self {
            is_ctor: true,
            ..Self::default()
        }
    }

    pub fn with_args(mut self, arg_count: u32) -> Self {
        self.arg_count = arg_count;
        self
    }

    pub fn with_signature(mut self, params: Vec<TypeRef>, ret: TypeRef) -> Self {
        self.params = params;
        self.ret = Some(ret);
        self
    }
}

/// Helper for building files
pub struct FileBuilder {
    file: File,
}

impl FileBuilder {
    pub fn new(mode: Mode) -> Self {
        Self::with_config(mode, KitConfig::default())
    }

    pub fn with_config(mode: Mode, config: KitConfig) -> Self {
        Self {
            file: File::empty(mode, config),
        }
    }

    /// The file under construction, for the modify API
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Add a local module
    pub fn add_module(&mut self, name: &str, target: Target) -> KitResult<ModuleRef> {
        self.push_module(name, target, false)
    }

    /// Add an external module
    pub fn add_external_module(&mut self, name: &str, target: Target) -> KitResult<ModuleRef> {
        self.push_module(name, target, true)
    }

    fn push_module(&mut self, name: &str, target: Target, is_external: bool) -> KitResult<ModuleRef> {
        if name.is_empty() {
            return Err(KitError::bad_argument("module name is empty"));
        }
        if let Some(mode) = target.mode() {
            mode.expect(self.file.mode, "addModule")?;
        }
        let name = self.file.create_string(name);
        let index = self.file.modules.push(ModuleData::new(name, target, is_external));
        Ok(ModuleRef::new(self.file.id, index))
    }

    /// Add a namespace to a module or a namespace
    pub fn add_namespace(&mut self, scope: Scope, name: &str) -> KitResult<NamespaceRef> {
        let (module, parent) = match scope {
            Scope::Module(m) => (m, None),
            Scope::Namespace(n) => (self.file.namespace_module(n)?, Some(n)),
            _ => {
                return Err(KitError::bad_argument(
                    "namespaces live in modules or namespaces",
                ))
            }
        };
        self.file.module(module)?;
        let name = self.file.create_string(name);
        let index = self.file.namespaces.push(NamespaceData {
            name,
            module,
            parent,
            namespaces: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
        });
        let namespace = NamespaceRef::new(self.file.id, index);
        match parent {
            None => self.file.module_mut(module)?.namespaces.push(namespace),
            Some(p) => self.file.namespace_mut(p)?.namespaces.push(namespace),
        }
        Ok(namespace)
    }

    /// Add a class to a module, a namespace or a function
    pub fn add_class(&mut self, scope: Scope, name: &str) -> KitResult<ClassRef> {
        let (module, parent_function, parent_namespace) = match scope {
            Scope::Module(m) => (m, None, None),
            Scope::Namespace(n) => (self.file.namespace_module(n)?, None, Some(n)),
            Scope::Function(f) => (self.file.function(f)?.module, Some(f), None),
            Scope::Class(_) => return Err(KitError::bad_argument("classes do not nest")),
        };
        self.file.module(module)?;
        check_name(self.file.mode, "class", name)?;
        let name = self.file.create_string(name);
        let index = self.file.classes.push(ClassData {
            name,
            module,
            parent_function,
            parent_namespace,
            super_class: None,
            methods: Vec::new(),
            annotations: Vec::new(),
        });
        let class = ClassRef::new(self.file.id, index);
        match scope {
            Scope::Module(m) => self.file.module_mut(m)?.classes.push(class),
            Scope::Namespace(n) => self.file.namespace_mut(n)?.classes.push(class),
            Scope::Function(f) => self.file.function_mut(f)?.nested_classes.push(class),
            Scope::Class(_) => {}
        }
        Ok(class)
    }

    /// Set the super class of a static class
    pub fn set_super_class(&mut self, class: ClassRef, super_class: ClassRef) -> KitResult<()> {
        let module = self.file.class(class)?.module;
        self.file
            .require_module_mode(module, Mode::Static, "setSuperClass")?;
        self.file.class(super_class)?;
        self.file.class_mut(class)?.super_class = Some(super_class);
        Ok(())
    }

    /// Add a named function to a module, namespace, class or function
    pub fn add_function(&mut self, scope: Scope, name: &str, decl: FunctionDecl) -> KitResult<FunctionRef> {
        if name.is_empty() {
            return Err(KitError::bad_argument("function name is empty"));
        }
        let file = &self.file;
        let (module, parent_function, parent_class, parent_namespace) = match scope {
            Scope::Module(m) => (m, None, None, None),
            Scope::Namespace(n) => (file.namespace_module(n)?, None, None, Some(n)),
            Scope::Class(c) => (file.class(c)?.module, None, Some(c), None),
            Scope::Function(f) => (file.function(f)?.module, Some(f), None, None),
        };
        let mode = file.dispatch_module(module, "addFunction")?;
        check_name(mode, "function", name)?;

        let (raw, signature, param_count) = match mode {
            Mode::Dynamic => {
                let class_name;
                let parent_raw;
                let kind = match scope {
                    Scope::Class(c) => {
                        class_name = file.string_to_string(file.class(c)?.name)?;
                        if decl.is_ctor {
                            FunctionKind::Ctor { class: &class_name }
                        } else {
                            FunctionKind::Method { class: &class_name }
                        }
                    }
                    Scope::Function(f) => {
                        parent_raw = file.string_to_string(file.function(f)?.raw_name)?;
                        FunctionKind::Nested {
                            parent_raw: &parent_raw,
                        }
                    }
                    _ => FunctionKind::TopLevel,
                };
                (dynamic::raw_function_name(name, kind), None, decl.arg_count)
            }
            Mode::Static => {
                let ret = match decl.ret {
                    Some(ret) => {
                        self.file.type_data(ret)?;
                        ret
                    }
                    None => self.file.intern_type(TypeData {
                        id: TypeId::Void,
                        class: None,
                    }),
                };
                let signature = Signature {
                    params: decl.params.clone(),
                    ret,
                };
                let raw = arkts::mangle_signature(&self.file, name, &signature)?;
                let count = signature.params.len() as u32;
                (raw, Some(signature), count)
            }
        };

        let function = self.push_function(module, raw, param_count, mode, |data| {
            data.parent_function = parent_function;
            data.parent_class = parent_class;
            data.parent_namespace = parent_namespace;
            data.is_static = decl.is_static;
            data.is_ctor = decl.is_ctor;
            data.signature = signature;
        })?;
        match scope {
            Scope::Module(m) => self.file.module_mut(m)?.functions.push(function),
            Scope::Namespace(n) => self.file.namespace_mut(n)?.functions.push(function),
            Scope::Class(c) => self.file.class_mut(c)?.methods.push(function),
            Scope::Function(f) => self.file.function_mut(f)?.nested_functions.push(function),
        }
        Ok(function)
    }

    /// Add an anonymous function to a dynamic module
    pub fn add_anonymous_function(&mut self, module: ModuleRef, arg_count: u32) -> KitResult<FunctionRef> {
        self.file
            .require_module_mode(module, Mode::Dynamic, "addAnonymousFunction")?;
        let index = self.file.module(module)?.anonymous_functions.len();
        let raw = dynamic::raw_function_name("", FunctionKind::Anonymous { index });
        let function = self.push_function(module, raw, arg_count, Mode::Dynamic, |data| {
            data.is_anonymous = true;
        })?;
        self.file
            .module_mut(module)?
            .anonymous_functions
            .push(function);
        Ok(function)
    }

    fn push_function(
        &mut self,
        module: ModuleRef,
        raw: String,
        param_count: u32,
        mode: Mode,
        configure: impl FnOnce(&mut FunctionData),
    ) -> KitResult<FunctionRef> {
        let raw_name = self.file.create_string(&raw);
        let mut data = FunctionData {
            raw_name,
            module,
            parent_function: None,
            parent_class: None,
            parent_namespace: None,
            is_static: false,
            is_ctor: false,
            is_anonymous: false,
            nested_functions: Vec::new(),
            nested_classes: Vec::new(),
            annotations: Vec::new(),
            signature: None,
            param_count,
            body: Vec::new(),
            attached: None,
        };
        configure(&mut data);
        let index = self.file.functions.push(data);
        let function = FunctionRef::new(self.file.id, index);

        let graph = default_body(&self.file, function, mode, param_count)?;
        self.file.function_mut(function)?.body = body::encode(&graph)?;
        tracing::trace!(target: "abckit::modify", function = %raw, "declared function");
        Ok(function)
    }

    /// Add an import descriptor without target checks
    pub fn add_import(
        &mut self,
        module: ModuleRef,
        imported: ModuleRef,
        name: &str,
        alias: &str,
    ) -> KitResult<ImportRef> {
        self.file.module(imported)?;
        let name = self.file.create_string(name);
        let alias = self.file.create_string(alias);
        let index = self.file.imports.push(ImportData {
            module,
            imported,
            name,
            alias,
        });
        let import = ImportRef::new(self.file.id, index);
        self.file.module_mut(module)?.imports.push(import);
        Ok(import)
    }

    /// Add an export descriptor without target checks
    pub fn add_export(
        &mut self,
        module: ModuleRef,
        exported: ModuleRef,
        name: &str,
        alias: &str,
    ) -> KitResult<ExportRef> {
        self.file.module(exported)?;
        let name = self.file.create_string(name);
        let alias = self.file.create_string(alias);
        let index = self.file.exports.push(ExportData {
            module,
            exported,
            name,
            alias,
        });
        let export = ExportRef::new(self.file.id, index);
        self.file.module_mut(module)?.exports.push(export);
        Ok(export)
    }

    /// Add a literal with any tag whose payload fits the tag's family
    pub fn add_literal(&mut self, tag: LiteralTag, value: LiteralValue) -> KitResult<LiteralRef> {
        self.file.push_literal(tag, value)
    }

    /// Finish building and return the file
    pub fn build(self) -> File {
        tracing::debug!(
            target: "abckit::file",
            id = %self.file.id,
            modules = self.file.modules.len(),
            functions = self.file.functions.len(),
            "built file"
        );
        self.file
    }
}

/// One block that returns straight away
fn default_body(file: &File, function: FunctionRef, mode: Mode, param_count: u32) -> KitResult<Graph> {
    let mut graph = Graph::new(file.id, function, mode, param_count);
    let block = graph.create_empty_block();
    let (start, end) = (graph.start_block(), graph.end_block());
    graph.block_append_succ(start, block)?;
    graph.block_append_succ(block, end)?;
    let ret = match mode {
        Mode::Dynamic => graph.dynamic_isa()?.create_returnundefined()?,
        Mode::Static => graph.static_isa()?.create_return_void()?,
    };
    graph.block_add_inst_back(block, ret)?;
    Ok(graph)
}

impl File {
    /// Store a literal after checking the payload against the tag
    pub(crate) fn push_literal(&mut self, tag: LiteralTag, value: LiteralValue) -> KitResult<LiteralRef> {
        let family = tag
            .family()
            .ok_or_else(|| KitError::bad_argument("the invalid tag has no payload"))?;
        if !value.fits(family) {
            return Err(KitError::bad_argument(format!(
                "{:?} payload does not fit a {:?} literal",
                value, tag
            )));
        }
        match value {
            LiteralValue::String(s) => {
                self.string_to_str(s)?;
            }
            LiteralValue::LiteralArray(a) => {
                self.literal_array(a)?;
            }
            LiteralValue::Method(f) => {
                self.function(f)?;
            }
            _ => {}
        }
        let index = self.literals.push(LiteralData { tag, value });
        Ok(LiteralRef::new(self.id, index))
    }
}

/// Reject names that would not survive the stored-name encoding of `mode`
fn check_name(mode: Mode, what: &str, name: &str) -> KitResult<()> {
    let reserved = match mode {
        Mode::Dynamic => dynamic::RESERVED,
        Mode::Static => arkts::RESERVED,
    };
    match name.chars().find(|c| reserved.contains(c)) {
        Some(c) => Err(KitError::bad_argument(format!(
            "{} name {:?} contains reserved character {:?}",
            what, name, c
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_module_mode_must_match_file() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        assert!(builder.add_module("m", Target::Js).is_ok());
        let err = builder.add_module("s", Target::ArkTsV1).unwrap_err();
        assert_eq!(err.status(), Status::WrongMode);
        assert!(builder.add_module("n", Target::Native).is_ok());
    }

    #[test]
    fn test_dynamic_names() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let m = builder.add_module("m", Target::Js).unwrap();
        let c = builder.add_class(Scope::Module(m), "C").unwrap();
        let ctor = builder
            .add_function(Scope::Class(c), "C", FunctionDecl::ctor())
            .unwrap();
        let anon = builder.add_anonymous_function(m, 0).unwrap();
        let file = builder.build();
        let raw = file.function(ctor).unwrap().raw_name;
        assert_eq!(file.string_to_str(raw).unwrap(), "#~@C=#C");
        let raw = file.function(anon).unwrap().raw_name;
        assert_eq!(file.string_to_str(raw).unwrap(), "#*@0*#");
        assert!(!file.function(ctor).unwrap().body.is_empty());
    }

    #[test]
    fn test_static_names_are_mangled() {
        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV2).unwrap();
        let i32_ty = builder.file_mut().create_type(TypeId::I32).unwrap();
        let f = builder
            .add_function(
                Scope::Module(m),
                "inc",
                FunctionDecl::static_fn().with_signature(vec![i32_ty], i32_ty),
            )
            .unwrap();
        let file = builder.build();
        let data = file.function(f).unwrap();
        assert_eq!(file.string_to_str(data.raw_name).unwrap(), "inc:i32;i32;");
        assert_eq!(data.param_count, 1);
    }

    #[test]
    fn test_names_with_separators_are_rejected() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let m = builder.add_module("m", Target::Js).unwrap();
        let err = builder
            .add_function(Scope::Module(m), "a#b", FunctionDecl::new())
            .unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
        let err = builder.add_class(Scope::Module(m), "C#D").unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
        // the other mode's separators are plain characters here
        let f = builder
            .add_function(Scope::Module(m), "a:b", FunctionDecl::new())
            .unwrap();
        let file = builder.build();
        assert_eq!(file.function_get_name(f).unwrap(), "a:b");

        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV1).unwrap();
        for name in ["a:b", "a;b"] {
            let err = builder
                .add_function(Scope::Module(m), name, FunctionDecl::static_fn())
                .unwrap_err();
            assert_eq!(err.status(), Status::BadArgument);
        }
        let err = builder.add_class(Scope::Module(m), "C;").unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
        let f = builder
            .add_function(Scope::Module(m), "a#b", FunctionDecl::static_fn())
            .unwrap();
        assert_eq!(builder.build().function_get_name(f).unwrap(), "a#b");
    }

    #[test]
    fn test_anonymous_functions_are_dynamic_only() {
        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV1).unwrap();
        let err = builder.add_anonymous_function(m, 0).unwrap_err();
        assert_eq!(err.status(), Status::WrongMode);
    }

    #[test]
    fn test_literal_payload_must_fit_tag() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        assert!(builder
            .add_literal(LiteralTag::NullValue, LiteralValue::U8(0))
            .is_ok());
        let err = builder
            .add_literal(LiteralTag::Double, LiteralValue::U8(0))
            .unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
    }
}

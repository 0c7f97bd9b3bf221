//! Entity records stored in a file's arenas

use super::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationOwner,
    AnnotationRef, ClassRef, ExportRef, FunctionRef, ImportRef, ModuleRef, NamespaceRef,
    StringRef, TypeRef, ValueRef,
};
use crate::ir::Graph;
use crate::target::Target;

#[derive(Debug, Clone)]
pub(crate) struct ModuleData {
    pub name: StringRef,
    pub target: Target,
    pub is_external: bool,
    pub namespaces: Vec<NamespaceRef>,
    pub classes: Vec<ClassRef>,
    pub functions: Vec<FunctionRef>,
    pub anonymous_functions: Vec<FunctionRef>,
    pub annotation_interfaces: Vec<AnnotationInterfaceRef>,
    pub imports: Vec<ImportRef>,
    pub exports: Vec<ExportRef>,
}

impl ModuleData {
    pub fn new(name: StringRef, target: Target, is_external: bool) -> Self {
        Self {
            name,
            target,
            is_external,
            namespaces: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            anonymous_functions: Vec::new(),
            annotation_interfaces: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NamespaceData {
    pub name: StringRef,
    pub module: ModuleRef,
    pub parent: Option<NamespaceRef>,
    pub namespaces: Vec<NamespaceRef>,
    pub classes: Vec<ClassRef>,
    pub functions: Vec<FunctionRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassData {
    pub name: StringRef,
    pub module: ModuleRef,
    pub parent_function: Option<FunctionRef>,
    pub parent_namespace: Option<NamespaceRef>,
    pub super_class: Option<ClassRef>,
    pub methods: Vec<FunctionRef>,
    pub annotations: Vec<AnnotationRef>,
}

/// Parameter and return types of a static function
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Signature {
    pub params: Vec<TypeRef>,
    pub ret: TypeRef,
}

#[derive(Debug)]
pub(crate) struct FunctionData {
    /// Name as stored in the back-end record (scoped or mangled)
    pub raw_name: StringRef,
    pub module: ModuleRef,
    pub parent_function: Option<FunctionRef>,
    pub parent_class: Option<ClassRef>,
    pub parent_namespace: Option<NamespaceRef>,
    pub is_static: bool,
    pub is_ctor: bool,
    pub is_anonymous: bool,
    pub nested_functions: Vec<FunctionRef>,
    pub nested_classes: Vec<ClassRef>,
    pub annotations: Vec<AnnotationRef>,
    pub signature: Option<Signature>,
    pub param_count: u32,
    /// Encoded body
    pub body: Vec<u8>,
    /// Graph installed by the last `function_set_graph`, not persisted
    pub attached: Option<Box<Graph>>,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportData {
    pub module: ModuleRef,
    pub imported: ModuleRef,
    pub name: StringRef,
    pub alias: StringRef,
}

#[derive(Debug, Clone)]
pub(crate) struct ExportData {
    pub module: ModuleRef,
    pub exported: ModuleRef,
    pub name: StringRef,
    pub alias: StringRef,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationInterfaceData {
    pub module: ModuleRef,
    pub name: StringRef,
    pub fields: Vec<AnnotationInterfaceFieldRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationInterfaceFieldData {
    pub interface: AnnotationInterfaceRef,
    pub name: StringRef,
    pub ty: TypeRef,
    pub default_value: Option<ValueRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationData {
    pub interface: AnnotationInterfaceRef,
    pub owner: AnnotationOwner,
    pub elements: Vec<AnnotationElementRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationElementData {
    pub annotation: AnnotationRef,
    pub name: StringRef,
    pub value: ValueRef,
}

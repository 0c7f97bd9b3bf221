//! Opaque handle tables
//!
//! Every entity pointer handed to C is a [`Node`] owned by the file's
//! [`FileHandle`]. Asking for the same entity twice yields the same
//! pointer, and all nodes are freed when the file is closed. Blocks and
//! instructions are interned the same way by their [`GraphHandle`].

use abckit::ir::ConditionCode;
use abckit::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationRef,
    BlockRef, ClassRef, ExportRef, File, FunctionRef, Graph, ImportRef, InstRef, KitError,
    KitResult, LiteralArrayRef, LiteralRef, ModuleRef, NamespaceRef, StringRef, TypeId, TypeRef,
    ValueRef,
};
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::rc::Rc;

macro_rules! opaque {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque! {
    /// Opaque handle to an open file
    AbckitFile;
    /// Opaque handle to a function graph
    AbckitGraph;
    AbckitBasicBlock;
    AbckitInst;
    AbckitCoreModule;
    AbckitCoreNamespace;
    AbckitCoreClass;
    AbckitCoreFunction;
    AbckitCoreImportDescriptor;
    AbckitCoreExportDescriptor;
    AbckitCoreAnnotation;
    AbckitCoreAnnotationElement;
    AbckitCoreAnnotationInterface;
    AbckitCoreAnnotationInterfaceField;
    AbckitLiteral;
    AbckitLiteralArray;
    AbckitType;
    AbckitValue;
    AbckitString;
}

/// Metadata entity behind an opaque pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Entity {
    Module(ModuleRef),
    Namespace(NamespaceRef),
    Class(ClassRef),
    Function(FunctionRef),
    Import(ImportRef),
    Export(ExportRef),
    Annotation(AnnotationRef),
    AnnotationElement(AnnotationElementRef),
    AnnotationInterface(AnnotationInterfaceRef),
    AnnotationInterfaceField(AnnotationInterfaceFieldRef),
    Literal(LiteralRef),
    LiteralArray(LiteralArrayRef),
    Type(TypeRef),
    Value(ValueRef),
    String(StringRef),
}

pub(crate) struct Node {
    owner: *mut FileHandle,
    entity: Entity,
}

/// An open file together with the pointers handed out for it
pub(crate) struct FileHandle {
    pub file: File,
    version: [u8; 4],
    nodes: Vec<Box<Node>>,
    interned: FxHashMap<Entity, usize>,
    c_strings: FxHashMap<StringRef, CString>,
    /// Shared with every graph created from this file; cleared on close
    alive: Rc<Cell<bool>>,
}

impl FileHandle {
    pub fn new(file: File) -> Box<Self> {
        Box::new(Self {
            version: file.version().as_bytes(),
            file,
            nodes: Vec::new(),
            interned: FxHashMap::default(),
            c_strings: FxHashMap::default(),
            alive: Rc::new(Cell::new(true)),
        })
    }

    /// Token that graphs of this file hold to notice the file closing
    pub fn liveness(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.alive)
    }

    /// Mark the file closed for every graph created from it
    pub fn mark_closed(&self) {
        self.alive.set(false);
    }

    pub fn version_ptr(&self) -> *const u8 {
        self.version.as_ptr()
    }

    /// Stable pointer for `entity`
    pub fn intern<T>(&mut self, entity: Entity) -> *mut T {
        let owner: *mut FileHandle = self;
        let index = match self.interned.get(&entity) {
            Some(&index) => index,
            None => {
                self.nodes.push(Box::new(Node { owner, entity }));
                let index = self.nodes.len() - 1;
                self.interned.insert(entity, index);
                index
            }
        };
        let node: *mut Node = &mut *self.nodes[index];
        node.cast()
    }

    pub fn intern_opt<T>(&mut self, entity: Option<Entity>) -> *mut T {
        match entity {
            Some(entity) => self.intern(entity),
            None => std::ptr::null_mut(),
        }
    }

    /// Intern `text` in the file and return its string handle
    pub fn new_string(&mut self, text: &str) -> *mut AbckitString {
        let string = self.file.create_string(text);
        self.intern(Entity::String(string))
    }

    /// NUL-terminated copy of a string, valid until the file is closed
    pub fn c_string(&mut self, string: StringRef) -> KitResult<*const c_char> {
        if let Some(cached) = self.c_strings.get(&string) {
            return Ok(cached.as_ptr());
        }
        let text = self.file.string_to_str(string)?;
        let owned = CString::new(text)
            .map_err(|_| KitError::BadArgument("string contains a NUL byte".to_string()))?;
        let ptr = owned.as_ptr();
        self.c_strings.insert(string, owned);
        Ok(ptr)
    }
}

pub(crate) fn null_argument(what: &str) -> KitError {
    KitError::BadArgument(format!("{} is null", what))
}

/// File behind a file pointer
pub(crate) unsafe fn file_handle<'a>(file: *mut AbckitFile) -> KitResult<&'a mut FileHandle> {
    if file.is_null() {
        return Err(null_argument("file"));
    }
    Ok(&mut *file.cast::<FileHandle>())
}

unsafe fn node<'a, T>(ptr: *mut T, what: &str) -> KitResult<&'a Node> {
    if ptr.is_null() {
        return Err(null_argument(what));
    }
    Ok(&*ptr.cast::<Node>())
}

macro_rules! resolvers {
    ($($fn_name:ident, $id_name:ident($c:ty) -> $variant:ident($r:ty);)*) => {
        $(
            /// Entity behind the pointer, without borrowing its file
            #[allow(dead_code)]
            pub(crate) unsafe fn $id_name(ptr: *mut $c) -> KitResult<$r> {
                match node(ptr, stringify!($c))?.entity {
                    Entity::$variant(r) => Ok(r),
                    other => Err(KitError::BadArgument(format!(
                        "expected {}, got {:?}",
                        stringify!($c),
                        other
                    ))),
                }
            }

            pub(crate) unsafe fn $fn_name<'a>(ptr: *mut $c) -> KitResult<(&'a mut FileHandle, $r)> {
                let r = $id_name(ptr)?;
                Ok((&mut *node(ptr, stringify!($c))?.owner, r))
            }
        )*
    };
}

resolvers! {
    module_ref, module_id(AbckitCoreModule) -> Module(ModuleRef);
    namespace_ref, namespace_id(AbckitCoreNamespace) -> Namespace(NamespaceRef);
    class_ref, class_id(AbckitCoreClass) -> Class(ClassRef);
    function_ref, function_id(AbckitCoreFunction) -> Function(FunctionRef);
    import_ref, import_id(AbckitCoreImportDescriptor) -> Import(ImportRef);
    export_ref, export_id(AbckitCoreExportDescriptor) -> Export(ExportRef);
    annotation_ref, annotation_id(AbckitCoreAnnotation) -> Annotation(AnnotationRef);
    annotation_element_ref, annotation_element_id(AbckitCoreAnnotationElement) -> AnnotationElement(AnnotationElementRef);
    annotation_interface_ref, annotation_interface_id(AbckitCoreAnnotationInterface) -> AnnotationInterface(AnnotationInterfaceRef);
    annotation_interface_field_ref, annotation_interface_field_id(AbckitCoreAnnotationInterfaceField) -> AnnotationInterfaceField(AnnotationInterfaceFieldRef);
    literal_ref, literal_id(AbckitLiteral) -> Literal(LiteralRef);
    literal_array_ref, literal_array_id(AbckitLiteralArray) -> LiteralArray(LiteralArrayRef);
    type_ref, type_id(AbckitType) -> Type(TypeRef);
    value_ref, value_id(AbckitValue) -> Value(ValueRef);
    string_ref, string_id(AbckitString) -> String(StringRef);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum GraphEntity {
    Block(BlockRef),
    Inst(InstRef),
}

pub(crate) struct GraphNode {
    owner: *mut GraphHandle,
    entity: GraphEntity,
}

/// A graph owned by C together with its block and instruction pointers
pub(crate) struct GraphHandle {
    pub graph: Graph,
    /// File the graph was created from; only followed while `file_alive` holds
    pub file: *mut FileHandle,
    file_alive: Rc<Cell<bool>>,
    nodes: Vec<Box<GraphNode>>,
    interned: FxHashMap<GraphEntity, usize>,
    dump: Option<CString>,
}

impl GraphHandle {
    pub fn new(graph: Graph, file: &mut FileHandle) -> Box<Self> {
        let file_alive = file.liveness();
        Box::new(Self {
            graph,
            file,
            file_alive,
            nodes: Vec::new(),
            interned: FxHashMap::default(),
            dump: None,
        })
    }

    pub fn intern<T>(&mut self, entity: GraphEntity) -> *mut T {
        let owner: *mut GraphHandle = self;
        let index = match self.interned.get(&entity) {
            Some(&index) => index,
            None => {
                self.nodes.push(Box::new(GraphNode { owner, entity }));
                let index = self.nodes.len() - 1;
                self.interned.insert(entity, index);
                index
            }
        };
        let node: *mut GraphNode = &mut *self.nodes[index];
        node.cast()
    }

    pub fn block(&mut self, block: BlockRef) -> *mut AbckitBasicBlock {
        self.intern(GraphEntity::Block(block))
    }

    pub fn inst(&mut self, inst: InstRef) -> *mut AbckitInst {
        self.intern(GraphEntity::Inst(inst))
    }

    pub fn opt_inst(&mut self, inst: Option<InstRef>) -> *mut AbckitInst {
        match inst {
            Some(inst) => self.inst(inst),
            None => std::ptr::null_mut(),
        }
    }

    /// Text dump of the graph, valid until the next dump or destruction
    pub fn dump(&mut self) -> KitResult<*const c_char> {
        let text = CString::new(self.graph.dump())
            .map_err(|_| KitError::Internal("graph dump contains a NUL byte".to_string()))?;
        Ok(self.dump.insert(text).as_ptr())
    }

    /// File the graph belongs to
    pub unsafe fn file_handle<'a>(&self) -> KitResult<&'a mut FileHandle> {
        self.check_file()?;
        Ok(&mut *self.file)
    }

    /// Fails once the file the graph came from is closed
    fn check_file(&self) -> KitResult<()> {
        if self.file.is_null() || !self.file_alive.get() {
            return Err(KitError::BadArgument(
                "the file of this graph is closed".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) unsafe fn graph_handle<'a>(graph: *mut AbckitGraph) -> KitResult<&'a mut GraphHandle> {
    if graph.is_null() {
        return Err(null_argument("graph"));
    }
    let handle = &mut *graph.cast::<GraphHandle>();
    handle.check_file()?;
    Ok(handle)
}

unsafe fn graph_node<'a, T>(ptr: *mut T, what: &str) -> KitResult<&'a GraphNode> {
    if ptr.is_null() {
        return Err(null_argument(what));
    }
    Ok(&*ptr.cast::<GraphNode>())
}

/// Block behind a block pointer, without touching its graph
pub(crate) unsafe fn block_id(block: *mut AbckitBasicBlock) -> KitResult<BlockRef> {
    match graph_node(block, "basic block")?.entity {
        GraphEntity::Block(b) => Ok(b),
        _ => Err(KitError::BadArgument("expected a basic block".to_string())),
    }
}

/// Instruction behind an instruction pointer, without touching its graph
pub(crate) unsafe fn inst_id(inst: *mut AbckitInst) -> KitResult<InstRef> {
    match graph_node(inst, "instruction")?.entity {
        GraphEntity::Inst(i) => Ok(i),
        _ => Err(KitError::BadArgument("expected an instruction".to_string())),
    }
}

pub(crate) unsafe fn block_ref<'a>(block: *mut AbckitBasicBlock) -> KitResult<(&'a mut GraphHandle, BlockRef)> {
    let b = block_id(block)?;
    let owner = &mut *graph_node(block, "basic block")?.owner;
    owner.check_file()?;
    Ok((owner, b))
}

pub(crate) unsafe fn inst_ref<'a>(inst: *mut AbckitInst) -> KitResult<(&'a mut GraphHandle, InstRef)> {
    let i = inst_id(inst)?;
    let owner = &mut *graph_node(inst, "instruction")?.owner;
    owner.check_file()?;
    Ok((owner, i))
}

/// Instruction handles of a pointer array
pub(crate) unsafe fn inst_refs(insts: *mut *mut AbckitInst, count: usize) -> KitResult<Vec<InstRef>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if insts.is_null() {
        return Err(null_argument("instruction array"));
    }
    std::slice::from_raw_parts(insts, count)
        .iter()
        .map(|&inst| inst_id(inst))
        .collect()
}

pub(crate) fn raw_type_id(raw: u8) -> KitResult<TypeId> {
    TypeId::from_u8(raw).ok_or_else(|| KitError::BadArgument(format!("unknown type id {}", raw)))
}

pub(crate) fn raw_condition_code(raw: u8) -> KitResult<ConditionCode> {
    ConditionCode::from_u8(raw)
        .ok_or_else(|| KitError::BadArgument(format!("unknown condition code {}", raw)))
}

/// UTF-8 text of a pointer and length pair
pub(crate) unsafe fn text<'a>(value: *const c_char, len: usize) -> KitResult<&'a str> {
    if value.is_null() {
        return Err(null_argument("string"));
    }
    let bytes = std::slice::from_raw_parts(value.cast::<u8>(), len);
    std::str::from_utf8(bytes).map_err(|_| KitError::BadArgument("string is not UTF-8".to_string()))
}

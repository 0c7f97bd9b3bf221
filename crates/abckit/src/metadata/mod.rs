//! Metadata entity model
//!
//! A [`File`](crate::File) owns flat arenas of entity records. Public
//! handles are small copyable values holding the owning file's id and an
//! arena index, so a handle from one file is detected when passed to
//! another and a handle to a removed entity is detected as stale.

pub(crate) mod arena;
pub(crate) mod entities;
pub mod literal;
pub(crate) mod strings;
pub mod types;

pub use literal::{LiteralFamily, LiteralTag, LiteralValue};
pub use types::TypeId;

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an open file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl FileId {
    pub(crate) fn fresh() -> Self {
        FileId(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

macro_rules! define_handles {
    ($($(#[$meta:meta])* $name:ident => $what:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name {
                pub(crate) file: FileId,
                pub(crate) index: u32,
            }

            impl $name {
                pub(crate) const KIND: &'static str = $what;

                pub(crate) fn new(file: FileId, index: u32) -> Self {
                    Self { file, index }
                }

                /// File that allocated this handle
                pub fn file_id(&self) -> FileId {
                    self.file
                }

                /// Position in the owning file's table
                pub fn index(&self) -> u32 {
                    self.index
                }
            }
        )*
    };
}

define_handles! {
    /// Module handle
    ModuleRef => "module";
    /// Namespace handle
    NamespaceRef => "namespace";
    /// Class handle
    ClassRef => "class";
    /// Function handle
    FunctionRef => "function";
    /// Import descriptor handle
    ImportRef => "import descriptor";
    /// Export descriptor handle
    ExportRef => "export descriptor";
    /// Annotation handle
    AnnotationRef => "annotation";
    /// Annotation element handle
    AnnotationElementRef => "annotation element";
    /// Annotation interface handle
    AnnotationInterfaceRef => "annotation interface";
    /// Annotation interface field handle
    AnnotationInterfaceFieldRef => "annotation interface field";
    /// Literal handle
    LiteralRef => "literal";
    /// Literal array handle
    LiteralArrayRef => "literal array";
    /// Type handle
    TypeRef => "type";
    /// Value handle
    ValueRef => "value";
    /// String handle
    StringRef => "string";
}

/// Declaration scope that can own classes and functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Module(ModuleRef),
    Namespace(NamespaceRef),
    Class(ClassRef),
    Function(FunctionRef),
}

/// Entity an annotation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationOwner {
    Class(ClassRef),
    Function(FunctionRef),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ids_are_unique() {
        let a = FileId::fresh();
        let b = FileId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handles_compare_by_file_and_index() {
        let file = FileId::fresh();
        let other = FileId::fresh();
        assert_eq!(ModuleRef::new(file, 1), ModuleRef::new(file, 1));
        assert_ne!(ModuleRef::new(file, 1), ModuleRef::new(other, 1));
        assert_eq!(ModuleRef::KIND, "module");
    }
}

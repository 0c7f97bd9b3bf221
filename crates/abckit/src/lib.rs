//! Abckit: inspection and rewriting of compiled bytecode modules
//!
//! A [`File`] owns a graph of metadata entities (modules, namespaces,
//! classes, functions, import/export descriptors, annotations, literals,
//! types and values) addressed through small copyable handles. Read-only
//! accessors live in [`inspect`], mutating ones in [`modify`], and function
//! bodies are edited as control-flow graphs through [`ir`].
//!
//! Every module has a [`Target`]; the target decides which back-end
//! ([`Mode::Dynamic`] or [`Mode::Static`]) serves operations on the module
//! and everything it owns. Calls against the wrong back-end fail with
//! [`Status::WrongMode`] or [`Status::WrongTarget`] instead of producing a
//! plausible answer.

#![warn(rust_2018_idioms)]

pub(crate) mod backend;
pub mod builder;
pub mod codec;
pub mod config;
pub mod file;
pub mod inspect;
pub mod ir;
pub mod logging;
pub mod metadata;
pub mod modify;
pub mod status;
pub mod target;
pub mod version;

pub use builder::{FileBuilder, FunctionDecl};
pub use config::{ConfigError, KitConfig};
pub use file::File;
pub use ir::{BlockRef, Graph, InstRef};
pub use metadata::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationOwner,
    AnnotationRef, ClassRef, ExportRef, FileId, FunctionRef, ImportRef, LiteralArrayRef,
    LiteralFamily, LiteralRef, LiteralTag, LiteralValue, ModuleRef, NamespaceRef, Scope,
    StringRef, TypeId, TypeRef, ValueRef,
};
pub use modify::params;
pub use status::{KitError, KitResult, Status};
pub use target::{Mode, Target};
pub use version::{ApiVersion, FileVersion};

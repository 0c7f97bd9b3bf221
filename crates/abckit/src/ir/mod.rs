//! Intermediate representation of function bodies
//!
//! A function body is edited as a [`Graph`] of basic blocks. Instructions
//! come from the generic set (constants, parameters, phis) plus one of two
//! instruction families, chosen by the file's [`Mode`](crate::Mode):
//! [`DynOpcode`] for dynamic files and [`StaticOpcode`] for static ones.

pub(crate) mod body;
pub mod graph;
pub mod isa_dynamic;
pub mod isa_static;
pub mod opcode;
pub mod pretty;
pub mod verify;

pub use graph::{BlockRef, Graph, GraphId, InstRef};
pub use isa_dynamic::{DynOpcode, DynamicIsa};
pub use isa_static::{StaticIsa, StaticOpcode};
pub use opcode::{
    Arity, ConditionCode, ConstantValue, GenericOpcode, Opcode, OpcodeInfo, Payload, PayloadKind,
};
pub use pretty::PrettyPrint;
pub use verify::{verify_graph, VerifyError};

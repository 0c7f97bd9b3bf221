//! Opcodes shared by both instruction families

use super::isa_dynamic::DynOpcode;
use super::isa_static::StaticOpcode;
use crate::metadata::{
    ClassRef, ExportRef, FunctionRef, ImportRef, LiteralArrayRef, ModuleRef, StringRef, TypeId,
};
use crate::target::Mode;

/// Number of value inputs an opcode takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(u8),
    Variadic { min: u8 },
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n as usize,
            Arity::Variadic { min } => count >= min as usize,
        }
    }

    pub fn is_variadic(self) -> bool {
        matches!(self, Arity::Variadic { .. })
    }
}

/// Kind of entity reference an instruction carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    String,
    LiteralArray,
    Function,
    Module,
    Import,
    Export,
    Class,
    Type,
}

/// Entity reference carried by an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payload {
    String(StringRef),
    LiteralArray(LiteralArrayRef),
    Function(FunctionRef),
    Module(ModuleRef),
    Import(ImportRef),
    Export(ExportRef),
    Class(ClassRef),
    Type(TypeId),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::String(_) => PayloadKind::String,
            Payload::LiteralArray(_) => PayloadKind::LiteralArray,
            Payload::Function(_) => PayloadKind::Function,
            Payload::Module(_) => PayloadKind::Module,
            Payload::Import(_) => PayloadKind::Import,
            Payload::Export(_) => PayloadKind::Export,
            Payload::Class(_) => PayloadKind::Class,
            Payload::Type(_) => PayloadKind::Type,
        }
    }
}

/// Static description of an opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub inputs: Arity,
    pub imms: u8,
    pub payload: PayloadKind,
    pub flags: u8,
}

impl OpcodeInfo {
    /// Ends a block and jumps to the end block
    pub const TERMINATOR: u8 = 1 << 0;
    /// Ends a block with two successors
    pub const BRANCH: u8 = 1 << 1;
    /// Carries a condition code
    pub const CONDITION: u8 = 1 << 2;

    pub fn is_terminator(&self) -> bool {
        self.flags & Self::TERMINATOR != 0
    }

    pub fn is_branch(&self) -> bool {
        self.flags & Self::BRANCH != 0
    }

    pub fn has_condition(&self) -> bool {
        self.flags & Self::CONDITION != 0
    }
}

/// Declare one instruction family
///
/// Each row is `Variant => "mnemonic", arity, immediates, payload, flags`.
macro_rules! define_isa {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $mnemonic:literal, $inputs:expr, $imms:literal, $payload:ident, $flags:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Position in [`Self::ALL`], used as the encoded opcode
            pub fn code(self) -> u16 {
                self as u16
            }

            pub fn from_code(code: u16) -> Option<Self> {
                Self::ALL.get(code as usize).copied()
            }

            pub fn info(self) -> $crate::ir::opcode::OpcodeInfo {
                match self {
                    $($name::$variant => $crate::ir::opcode::OpcodeInfo {
                        mnemonic: $mnemonic,
                        inputs: $inputs,
                        imms: $imms,
                        payload: $crate::ir::opcode::PayloadKind::$payload,
                        flags: $flags,
                    },)*
                }
            }
        }
    };
}

pub(crate) use define_isa;

/// Opcodes usable in both families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOpcode {
    Constant,
    Parameter,
    Phi,
}

impl GenericOpcode {
    pub fn info(self) -> OpcodeInfo {
        match self {
            GenericOpcode::Constant => OpcodeInfo {
                mnemonic: "constant",
                inputs: Arity::Fixed(0),
                imms: 0,
                payload: PayloadKind::None,
                flags: 0,
            },
            GenericOpcode::Parameter => OpcodeInfo {
                mnemonic: "parameter",
                inputs: Arity::Fixed(0),
                imms: 1,
                payload: PayloadKind::None,
                flags: 0,
            },
            GenericOpcode::Phi => OpcodeInfo {
                mnemonic: "phi",
                inputs: Arity::Variadic { min: 1 },
                imms: 0,
                payload: PayloadKind::None,
                flags: 0,
            },
        }
    }
}

/// Any instruction opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Generic(GenericOpcode),
    Dynamic(DynOpcode),
    Static(StaticOpcode),
}

const GENERIC_BASE: u16 = 0x0000;
const DYNAMIC_BASE: u16 = 0x1000;
const STATIC_BASE: u16 = 0x2000;

impl Opcode {
    pub fn info(self) -> OpcodeInfo {
        match self {
            Opcode::Generic(op) => op.info(),
            Opcode::Dynamic(op) => op.info(),
            Opcode::Static(op) => op.info(),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        self.info().mnemonic
    }

    /// Family the opcode belongs to, `None` for generic opcodes
    pub fn mode(self) -> Option<Mode> {
        match self {
            Opcode::Generic(_) => None,
            Opcode::Dynamic(_) => Some(Mode::Dynamic),
            Opcode::Static(_) => Some(Mode::Static),
        }
    }

    /// Encoded form used in function bodies
    pub fn encode(self) -> u16 {
        match self {
            Opcode::Generic(GenericOpcode::Constant) => GENERIC_BASE,
            Opcode::Generic(GenericOpcode::Parameter) => GENERIC_BASE + 1,
            Opcode::Generic(GenericOpcode::Phi) => GENERIC_BASE + 2,
            Opcode::Dynamic(op) => DYNAMIC_BASE + op.code(),
            Opcode::Static(op) => STATIC_BASE + op.code(),
        }
    }

    pub fn decode(raw: u16) -> Option<Self> {
        match raw & 0xF000 {
            GENERIC_BASE => match raw {
                0 => Some(Opcode::Generic(GenericOpcode::Constant)),
                1 => Some(Opcode::Generic(GenericOpcode::Parameter)),
                2 => Some(Opcode::Generic(GenericOpcode::Phi)),
                _ => None,
            },
            DYNAMIC_BASE => DynOpcode::from_code(raw - DYNAMIC_BASE).map(Opcode::Dynamic),
            STATIC_BASE => StaticOpcode::from_code(raw - STATIC_BASE).map(Opcode::Static),
            _ => None,
        }
    }
}

/// Comparison used by conditional branches
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    Eq = 0,
    Ne = 1,
    Lt = 2,
    Le = 3,
    Gt = 4,
    Ge = 5,
}

impl ConditionCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ConditionCode::Eq),
            1 => Some(ConditionCode::Ne),
            2 => Some(ConditionCode::Lt),
            3 => Some(ConditionCode::Le),
            4 => Some(ConditionCode::Gt),
            5 => Some(ConditionCode::Ge),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionCode::Eq => "eq",
            ConditionCode::Ne => "ne",
            ConditionCode::Lt => "lt",
            ConditionCode::Le => "le",
            ConditionCode::Gt => "gt",
            ConditionCode::Ge => "ge",
        }
    }
}

/// Value of a constant instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    I32(i32),
    I64(i64),
    U64(u64),
    F64(f64),
}

impl ConstantValue {
    /// Bitwise identity, so `-0.0` and `0.0` stay distinct
    pub fn same_as(&self, other: &ConstantValue) -> bool {
        match (self, other) {
            (ConstantValue::I32(a), ConstantValue::I32(b)) => a == b,
            (ConstantValue::I64(a), ConstantValue::I64(b)) => a == b,
            (ConstantValue::U64(a), ConstantValue::U64(b)) => a == b,
            (ConstantValue::F64(a), ConstantValue::F64(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::I32(v) => write!(f, "i32 {}", v),
            ConstantValue::I64(v) => write!(f, "i64 {}", v),
            ConstantValue::U64(v) => write!(f, "u64 {}", v),
            ConstantValue::F64(v) => write!(f, "f64 {}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_encoding_is_reversible() {
        for op in DynOpcode::ALL {
            let opcode = Opcode::Dynamic(*op);
            assert_eq!(Opcode::decode(opcode.encode()), Some(opcode));
        }
        for op in StaticOpcode::ALL {
            let opcode = Opcode::Static(*op);
            assert_eq!(Opcode::decode(opcode.encode()), Some(opcode));
        }
        assert_eq!(Opcode::decode(0x0fff), None);
        assert_eq!(Opcode::decode(0x3000), None);
    }

    #[test]
    fn test_families_are_disjoint() {
        let add = Opcode::Dynamic(DynOpcode::Add2);
        assert_eq!(add.mode(), Some(Mode::Dynamic));
        assert_eq!(Opcode::Static(StaticOpcode::Add).mode(), Some(Mode::Static));
        assert_eq!(Opcode::Generic(GenericOpcode::Constant).mode(), None);
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(3));
        assert!(Arity::Variadic { min: 1 }.accepts(4));
        assert!(!Arity::Variadic { min: 1 }.accepts(0));
    }

    #[test]
    fn test_constant_identity() {
        assert!(ConstantValue::F64(1.5).same_as(&ConstantValue::F64(1.5)));
        assert!(!ConstantValue::F64(0.0).same_as(&ConstantValue::F64(-0.0)));
        assert!(!ConstantValue::I32(1).same_as(&ConstantValue::I64(1)));
    }
}

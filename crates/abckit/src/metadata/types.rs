//! Types and annotation values

use super::{ClassRef, LiteralArrayRef, StringRef, TypeRef};

/// Type tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Invalid = 0,
    Void = 1,
    U1 = 2,
    I8 = 3,
    U8 = 4,
    I16 = 5,
    U16 = 6,
    I32 = 7,
    U32 = 8,
    F32 = 9,
    F64 = 10,
    I64 = 11,
    U64 = 12,
    String = 13,
    Any = 14,
    Reference = 15,
    LiteralArray = 16,
}

impl TypeId {
    pub fn from_u8(value: u8) -> Option<Self> {
        use TypeId::*;
        let id = match value {
            0 => Invalid,
            1 => Void,
            2 => U1,
            3 => I8,
            4 => U8,
            5 => I16,
            6 => U16,
            7 => I32,
            8 => U32,
            9 => F32,
            10 => F64,
            11 => I64,
            12 => U64,
            13 => String,
            14 => Any,
            15 => Reference,
            16 => LiteralArray,
            _ => return None,
        };
        Some(id)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short name used in mangled static signatures
    pub fn mangled(self) -> &'static str {
        use TypeId::*;
        match self {
            Invalid => "?",
            Void => "void",
            U1 => "u1",
            I8 => "i8",
            U8 => "u8",
            I16 => "i16",
            U16 => "u16",
            I32 => "i32",
            U32 => "u32",
            F32 => "f32",
            F64 => "f64",
            I64 => "i64",
            U64 => "u64",
            String => "std.core.String",
            Any => "std.core.Object",
            Reference => "ref",
            LiteralArray => "litarr",
        }
    }
}

/// Stored type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TypeData {
    pub id: TypeId,
    /// Referenced class, only for `TypeId::Reference`
    pub class: Option<ClassRef>,
}

/// Stored value payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ValuePayload {
    U1(bool),
    Double(f64),
    String(StringRef),
    LiteralArray(LiteralArrayRef),
}

impl ValuePayload {
    /// Type tag implied by the payload
    pub fn type_id(&self) -> TypeId {
        match self {
            ValuePayload::U1(_) => TypeId::U1,
            ValuePayload::Double(_) => TypeId::F64,
            ValuePayload::String(_) => TypeId::String,
            ValuePayload::LiteralArray(_) => TypeId::LiteralArray,
        }
    }
}

/// Stored value
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ValueData {
    pub ty: TypeRef,
    pub payload: ValuePayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_raw_values() {
        for raw in 0..=16u8 {
            assert_eq!(TypeId::from_u8(raw).map(TypeId::as_u8), Some(raw));
        }
        assert_eq!(TypeId::from_u8(17), None);
    }
}

//! Literal tags and payloads
//!
//! Every tag belongs to exactly one [`LiteralFamily`]; the family decides
//! which typed accessor can read a literal of that tag.

use super::{FunctionRef, LiteralArrayRef, LiteralRef, StringRef};

/// Literal tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralTag {
    Invalid = 0,
    Bool = 1,
    U8 = 2,
    U16 = 3,
    U32 = 4,
    U64 = 5,
    Float = 6,
    Double = 7,
    ArrayU1 = 8,
    ArrayU8 = 9,
    ArrayI8 = 10,
    ArrayU16 = 11,
    ArrayI16 = 12,
    ArrayU32 = 13,
    ArrayI32 = 14,
    ArrayU64 = 15,
    ArrayI64 = 16,
    ArrayF32 = 17,
    ArrayF64 = 18,
    ArrayString = 19,
    String = 20,
    Method = 21,
    GeneratorMethod = 22,
    Accessor = 23,
    MethodAffiliate = 24,
    NullValue = 25,
    TagValue = 26,
    AsyncGeneratorMethod = 27,
    LiteralBufferIndex = 28,
    LiteralArray = 29,
    BuiltinTypeIndex = 30,
    Getter = 31,
    Setter = 32,
    EtsImplements = 33,
    BigInt = 34,
}

/// Accessor family a tag is read through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralFamily {
    Bool,
    U8,
    U16,
    MethodAffiliate,
    U32,
    U64,
    Float,
    Double,
    String,
    LiteralArray,
    Method,
}

impl LiteralTag {
    pub const ALL: [LiteralTag; 35] = [
        LiteralTag::Invalid,
        LiteralTag::Bool,
        LiteralTag::U8,
        LiteralTag::U16,
        LiteralTag::U32,
        LiteralTag::U64,
        LiteralTag::Float,
        LiteralTag::Double,
        LiteralTag::ArrayU1,
        LiteralTag::ArrayU8,
        LiteralTag::ArrayI8,
        LiteralTag::ArrayU16,
        LiteralTag::ArrayI16,
        LiteralTag::ArrayU32,
        LiteralTag::ArrayI32,
        LiteralTag::ArrayU64,
        LiteralTag::ArrayI64,
        LiteralTag::ArrayF32,
        LiteralTag::ArrayF64,
        LiteralTag::ArrayString,
        LiteralTag::String,
        LiteralTag::Method,
        LiteralTag::GeneratorMethod,
        LiteralTag::Accessor,
        LiteralTag::MethodAffiliate,
        LiteralTag::NullValue,
        LiteralTag::TagValue,
        LiteralTag::AsyncGeneratorMethod,
        LiteralTag::LiteralBufferIndex,
        LiteralTag::LiteralArray,
        LiteralTag::BuiltinTypeIndex,
        LiteralTag::Getter,
        LiteralTag::Setter,
        LiteralTag::EtsImplements,
        LiteralTag::BigInt,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Accessor family, `None` for `Invalid`
    pub fn family(self) -> Option<LiteralFamily> {
        use LiteralTag::*;
        let family = match self {
            Invalid => return None,
            Bool => LiteralFamily::Bool,
            U8 | Accessor | NullValue | TagValue | BuiltinTypeIndex => LiteralFamily::U8,
            U16 => LiteralFamily::U16,
            MethodAffiliate => LiteralFamily::MethodAffiliate,
            U32 | LiteralBufferIndex | ArrayU1 | ArrayU8 | ArrayI8 | ArrayU16 | ArrayI16
            | ArrayU32 | ArrayI32 | ArrayU64 | ArrayI64 | ArrayF32 | ArrayF64 | ArrayString => {
                LiteralFamily::U32
            }
            U64 => LiteralFamily::U64,
            Float => LiteralFamily::Float,
            Double => LiteralFamily::Double,
            String | EtsImplements | BigInt => LiteralFamily::String,
            LiteralArray => LiteralFamily::LiteralArray,
            Method | GeneratorMethod | AsyncGeneratorMethod | Getter | Setter => {
                LiteralFamily::Method
            }
        };
        Some(family)
    }

    /// Whether the tag only occurs in dynamic literal arrays
    pub fn is_dynamic_only(self) -> bool {
        matches!(self.family(), Some(LiteralFamily::Method | LiteralFamily::MethodAffiliate))
            || matches!(
                self,
                LiteralTag::Accessor
                    | LiteralTag::NullValue
                    | LiteralTag::TagValue
                    | LiteralTag::LiteralBufferIndex
                    | LiteralTag::BuiltinTypeIndex
            )
    }
}

/// Decoded literal payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Float(f32),
    Double(f64),
    String(StringRef),
    LiteralArray(LiteralArrayRef),
    Method(FunctionRef),
}

impl LiteralValue {
    /// Family this payload belongs to
    ///
    /// `U16` payloads also serve the method-affiliate family.
    pub fn fits(&self, family: LiteralFamily) -> bool {
        matches!(
            (self, family),
            (LiteralValue::Bool(_), LiteralFamily::Bool)
                | (LiteralValue::U8(_), LiteralFamily::U8)
                | (LiteralValue::U16(_), LiteralFamily::U16)
                | (LiteralValue::U16(_), LiteralFamily::MethodAffiliate)
                | (LiteralValue::U32(_), LiteralFamily::U32)
                | (LiteralValue::U64(_), LiteralFamily::U64)
                | (LiteralValue::Float(_), LiteralFamily::Float)
                | (LiteralValue::Double(_), LiteralFamily::Double)
                | (LiteralValue::String(_), LiteralFamily::String)
                | (LiteralValue::LiteralArray(_), LiteralFamily::LiteralArray)
                | (LiteralValue::Method(_), LiteralFamily::Method)
        )
    }
}

/// Stored literal
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LiteralData {
    pub tag: LiteralTag,
    pub value: LiteralValue,
}

/// Stored literal array
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LiteralArrayData {
    pub items: Vec<LiteralRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table_is_dense() {
        for (i, tag) in LiteralTag::ALL.iter().enumerate() {
            assert_eq!(tag.as_u8() as usize, i);
            assert_eq!(LiteralTag::from_u8(i as u8), Some(*tag));
        }
        assert_eq!(LiteralTag::from_u8(200), None);
    }

    #[test]
    fn test_every_valid_tag_has_a_family() {
        for tag in LiteralTag::ALL {
            assert_eq!(tag.family().is_none(), tag == LiteralTag::Invalid);
        }
    }

    #[test]
    fn test_families() {
        assert_eq!(LiteralTag::Getter.family(), Some(LiteralFamily::Method));
        assert_eq!(LiteralTag::NullValue.family(), Some(LiteralFamily::U8));
        assert_eq!(LiteralTag::ArrayString.family(), Some(LiteralFamily::U32));
        assert_eq!(LiteralTag::BigInt.family(), Some(LiteralFamily::String));
        assert!(LiteralTag::Method.is_dynamic_only());
        assert!(!LiteralTag::Double.is_dynamic_only());
    }
}

//! Literal, type and value accessors
//!
//! A typed literal accessor succeeds only for tags of its family and fails
//! with `WrongLiteralType` otherwise.

use super::visit_all;
use crate::file::File;
use crate::metadata::types::ValuePayload;
use crate::metadata::{
    ClassRef, FunctionRef, LiteralArrayRef, LiteralFamily, LiteralRef, LiteralTag, LiteralValue,
    StringRef, TypeId, TypeRef, ValueRef,
};
use crate::status::{KitError, KitResult};

impl File {
    pub fn literal_get_tag(&self, literal: LiteralRef) -> KitResult<LiteralTag> {
        Ok(self.literal(literal)?.tag)
    }

    /// Payload of `literal` if its tag belongs to `family`
    fn literal_payload(
        &self,
        literal: LiteralRef,
        family: LiteralFamily,
        accessor: &'static str,
    ) -> KitResult<LiteralValue> {
        tracing::debug!(target: "abckit::inspect", literal = literal.index, accessor);
        let data = self.literal(literal)?;
        if data.tag.family() == Some(family) {
            Ok(data.value)
        } else {
            tracing::warn!(target: "abckit::inspect", accessor, tag = ?data.tag, "literal tag mismatch");
            Err(KitError::WrongLiteralType {
                accessor,
                tag: data.tag,
            })
        }
    }

    pub fn literal_get_bool(&self, literal: LiteralRef) -> KitResult<bool> {
        match self.literal_payload(literal, LiteralFamily::Bool, "literalGetBool")? {
            LiteralValue::Bool(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_u8(&self, literal: LiteralRef) -> KitResult<u8> {
        match self.literal_payload(literal, LiteralFamily::U8, "literalGetU8")? {
            LiteralValue::U8(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_u16(&self, literal: LiteralRef) -> KitResult<u16> {
        match self.literal_payload(literal, LiteralFamily::U16, "literalGetU16")? {
            LiteralValue::U16(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_method_affiliate(&self, literal: LiteralRef) -> KitResult<u16> {
        match self.literal_payload(literal, LiteralFamily::MethodAffiliate, "literalGetMethodAffiliate")? {
            LiteralValue::U16(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    /// Plain `u32` literals, buffer indices and typed-array element counts
    pub fn literal_get_u32(&self, literal: LiteralRef) -> KitResult<u32> {
        match self.literal_payload(literal, LiteralFamily::U32, "literalGetU32")? {
            LiteralValue::U32(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_u64(&self, literal: LiteralRef) -> KitResult<u64> {
        match self.literal_payload(literal, LiteralFamily::U64, "literalGetU64")? {
            LiteralValue::U64(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_float(&self, literal: LiteralRef) -> KitResult<f32> {
        match self.literal_payload(literal, LiteralFamily::Float, "literalGetFloat")? {
            LiteralValue::Float(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_double(&self, literal: LiteralRef) -> KitResult<f64> {
        match self.literal_payload(literal, LiteralFamily::Double, "literalGetDouble")? {
            LiteralValue::Double(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    /// String payload; big integers are stored as decimal text
    pub fn literal_get_string(&self, literal: LiteralRef) -> KitResult<StringRef> {
        match self.literal_payload(literal, LiteralFamily::String, "literalGetString")? {
            LiteralValue::String(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_literal_array(&self, literal: LiteralRef) -> KitResult<LiteralArrayRef> {
        match self.literal_payload(literal, LiteralFamily::LiteralArray, "literalGetLiteralArray")? {
            LiteralValue::LiteralArray(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_get_method(&self, literal: LiteralRef) -> KitResult<FunctionRef> {
        match self.literal_payload(literal, LiteralFamily::Method, "literalGetMethod")? {
            LiteralValue::Method(v) => Ok(v),
            other => Err(mismatched_payload(other)),
        }
    }

    pub fn literal_array_enumerate_elements(
        &self,
        array: LiteralArrayRef,
        visitor: impl FnMut(LiteralRef) -> bool,
    ) -> KitResult<bool> {
        tracing::debug!(target: "abckit::inspect", array = array.index, "literalArrayEnumerateElements");
        Ok(visit_all(&self.literal_array(array)?.items, visitor))
    }

    pub fn type_get_type_id(&self, ty: TypeRef) -> KitResult<TypeId> {
        Ok(self.type_data(ty)?.id)
    }

    /// Class named by a reference type
    pub fn type_get_reference_class(&self, ty: TypeRef) -> KitResult<ClassRef> {
        let data = self.type_data(ty)?;
        data.class.ok_or_else(|| {
            KitError::bad_argument(format!("type {:?} is not a reference type", data.id))
        })
    }

    pub fn value_get_type(&self, value: ValueRef) -> KitResult<TypeRef> {
        Ok(self.value(value)?.ty)
    }

    pub fn value_get_u1(&self, value: ValueRef) -> KitResult<bool> {
        match self.value(value)?.payload {
            ValuePayload::U1(v) => Ok(v),
            other => Err(wrong_value_type(TypeId::U1, other)),
        }
    }

    pub fn value_get_double(&self, value: ValueRef) -> KitResult<f64> {
        match self.value(value)?.payload {
            ValuePayload::Double(v) => Ok(v),
            other => Err(wrong_value_type(TypeId::F64, other)),
        }
    }

    pub fn value_get_string(&self, value: ValueRef) -> KitResult<StringRef> {
        match self.value(value)?.payload {
            ValuePayload::String(v) => Ok(v),
            other => Err(wrong_value_type(TypeId::String, other)),
        }
    }

    pub fn value_get_literal_array(&self, value: ValueRef) -> KitResult<LiteralArrayRef> {
        match self.value(value)?.payload {
            ValuePayload::LiteralArray(v) => Ok(v),
            other => Err(wrong_value_type(TypeId::LiteralArray, other)),
        }
    }
}

/// Stored payload disagrees with its tag's family
fn mismatched_payload(value: LiteralValue) -> KitError {
    KitError::Internal(format!("literal payload {:?} does not match its tag", value))
}

fn wrong_value_type(expected: TypeId, payload: ValuePayload) -> KitError {
    KitError::bad_argument(format!(
        "value of type {:?} read as {:?}",
        payload.type_id(),
        expected
    ))
}

#[cfg(test)]
mod tests {
    use crate::builder::FileBuilder;
    use crate::metadata::{LiteralTag, LiteralValue};
    use crate::status::Status;
    use crate::target::Mode;

    #[test]
    fn test_accessor_follows_tag_family() {
        let mut builder = FileBuilder::new(Mode::Dynamic);
        let null = builder
            .add_literal(LiteralTag::NullValue, LiteralValue::U8(0))
            .unwrap();
        let count = builder
            .add_literal(LiteralTag::ArrayI32, LiteralValue::U32(4))
            .unwrap();
        let file = builder.build();

        assert_eq!(file.literal_get_u8(null).unwrap(), 0);
        assert_eq!(file.literal_get_u32(count).unwrap(), 4);
        let err = file.literal_get_u16(null).unwrap_err();
        assert_eq!(err.status(), Status::WrongLiteralType);
        let err = file.literal_get_double(count).unwrap_err();
        assert_eq!(err.status(), Status::WrongLiteralType);
    }

    #[test]
    fn test_value_accessors_check_type() {
        let mut builder = FileBuilder::new(Mode::Static);
        let file = builder.file_mut();
        let text = file.create_value_string("hi");
        let s = file.value_get_string(text).unwrap();
        assert_eq!(file.string_to_str(s).unwrap(), "hi");
        assert_eq!(file.value_get_u1(text).unwrap_err().status(), Status::BadArgument);
        let ty = file.value_get_type(text).unwrap();
        assert_eq!(file.type_get_reference_class(ty).unwrap_err().status(), Status::BadArgument);
    }
}

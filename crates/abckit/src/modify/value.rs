//! Types and annotation values

use crate::file::File;
use crate::metadata::literal::{LiteralArrayData, LiteralData};
use crate::metadata::types::{TypeData, ValueData, ValuePayload};
use crate::metadata::{
    ClassRef, LiteralArrayRef, LiteralRef, LiteralTag, LiteralValue, TypeId, TypeRef, ValueRef,
};
use crate::status::{KitError, KitResult};

impl File {
    /// Pooled type handle for `data`
    pub(crate) fn intern_type(&mut self, data: TypeData) -> TypeRef {
        if let Some((index, _)) = self.types.iter().find(|(_, existing)| **existing == data) {
            return TypeRef::new(self.id, index);
        }
        TypeRef::new(self.id, self.types.push(data))
    }

    /// Type handle for a primitive or builtin type id
    pub fn create_type(&mut self, id: TypeId) -> KitResult<TypeRef> {
        tracing::debug!(target: "abckit::modify", ?id, "createType");
        match id {
            TypeId::Invalid => Err(KitError::bad_argument("cannot create a type of id Invalid")),
            TypeId::Reference => Err(KitError::bad_argument(
                "reference types are created from a class",
            )),
            id => Ok(self.intern_type(TypeData { id, class: None })),
        }
    }

    /// Reference type naming `class`
    pub fn create_reference_type(&mut self, class: ClassRef) -> KitResult<TypeRef> {
        tracing::debug!(target: "abckit::modify", class = class.index, "createReferenceType");
        self.class(class)?;
        Ok(self.intern_type(TypeData {
            id: TypeId::Reference,
            class: Some(class),
        }))
    }

    fn push_value(&mut self, payload: ValuePayload) -> ValueRef {
        let ty = self.intern_type(TypeData {
            id: payload.type_id(),
            class: None,
        });
        ValueRef::new(self.id, self.values.push(ValueData { ty, payload }))
    }

    pub fn create_value_u1(&mut self, value: bool) -> ValueRef {
        tracing::debug!(target: "abckit::modify", value, "createValueU1");
        self.push_value(ValuePayload::U1(value))
    }

    pub fn create_value_double(&mut self, value: f64) -> ValueRef {
        tracing::debug!(target: "abckit::modify", value, "createValueDouble");
        self.push_value(ValuePayload::Double(value))
    }

    pub fn create_value_string(&mut self, value: &str) -> ValueRef {
        tracing::debug!(target: "abckit::modify", value, "createValueString");
        let string = self.create_string(value);
        self.push_value(ValuePayload::String(string))
    }

    /// Literal-array value holding `values` in order
    ///
    /// Each element is materialised as a literal of the matching tag in the
    /// file's literal pool.
    pub fn create_literal_array_value(&mut self, values: &[ValueRef]) -> KitResult<ValueRef> {
        tracing::debug!(target: "abckit::modify", count = values.len(), "createLiteralArrayValue");
        let mut pending = Vec::with_capacity(values.len());
        for &value in values {
            let payload = self.value(value)?.payload;
            pending.push(match payload {
                ValuePayload::U1(v) => (LiteralTag::Bool, LiteralValue::Bool(v)),
                ValuePayload::Double(v) => (LiteralTag::Double, LiteralValue::Double(v)),
                ValuePayload::String(s) => (LiteralTag::String, LiteralValue::String(s)),
                ValuePayload::LiteralArray(a) => {
                    (LiteralTag::LiteralArray, LiteralValue::LiteralArray(a))
                }
            });
        }
        let items = pending
            .into_iter()
            .map(|(tag, value)| LiteralRef::new(self.id, self.literals.push(LiteralData { tag, value })))
            .collect();
        let array = LiteralArrayRef::new(self.id, self.literal_arrays.push(LiteralArrayData { items }));
        Ok(self.push_value(ValuePayload::LiteralArray(array)))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::KitConfig;
    use crate::file::File;
    use crate::metadata::TypeId;
    use crate::status::Status;
    use crate::target::Mode;

    #[test]
    fn test_types_are_pooled() {
        let mut file = File::empty(Mode::Static, KitConfig::default());
        let a = file.create_type(TypeId::I32).unwrap();
        let b = file.create_type(TypeId::I32).unwrap();
        let c = file.create_type(TypeId::F64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_and_reference_ids_are_rejected() {
        let mut file = File::empty(Mode::Static, KitConfig::default());
        for id in [TypeId::Invalid, TypeId::Reference] {
            assert_eq!(file.create_type(id).unwrap_err().status(), Status::BadArgument);
        }
    }

    #[test]
    fn test_literal_array_value_materialises_literals() {
        let mut file = File::empty(Mode::Static, KitConfig::default());
        let flag = file.create_value_u1(true);
        let text = file.create_value_string("x");
        let array = file.create_literal_array_value(&[flag, text]).unwrap();
        assert_eq!(file.literals.len(), 2);
        let ty = file.value_get_type(array).unwrap();
        assert_eq!(file.type_get_type_id(ty).unwrap(), TypeId::LiteralArray);
    }
}

//! Literal constructors

use crate::file::File;
use crate::metadata::literal::LiteralArrayData;
use crate::metadata::{FunctionRef, LiteralArrayRef, LiteralRef, LiteralTag, LiteralValue};
use crate::status::KitResult;
use crate::target::Mode;

impl File {
    pub fn create_literal_bool(&mut self, value: bool) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralBool");
        self.push_literal(LiteralTag::Bool, LiteralValue::Bool(value))
    }

    pub fn create_literal_u8(&mut self, value: u8) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralU8");
        self.push_literal(LiteralTag::U8, LiteralValue::U8(value))
    }

    pub fn create_literal_u16(&mut self, value: u16) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralU16");
        self.push_literal(LiteralTag::U16, LiteralValue::U16(value))
    }

    /// Method-affiliate literal, dynamic files only
    pub fn create_literal_method_affiliate(&mut self, value: u16) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralMethodAffiliate");
        self.mode.expect(Mode::Dynamic, "createLiteralMethodAffiliate")?;
        self.push_literal(LiteralTag::MethodAffiliate, LiteralValue::U16(value))
    }

    pub fn create_literal_u32(&mut self, value: u32) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralU32");
        self.push_literal(LiteralTag::U32, LiteralValue::U32(value))
    }

    pub fn create_literal_u64(&mut self, value: u64) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralU64");
        self.push_literal(LiteralTag::U64, LiteralValue::U64(value))
    }

    pub fn create_literal_float(&mut self, value: f32) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralFloat");
        self.push_literal(LiteralTag::Float, LiteralValue::Float(value))
    }

    pub fn create_literal_double(&mut self, value: f64) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralDouble");
        self.push_literal(LiteralTag::Double, LiteralValue::Double(value))
    }

    pub fn create_literal_string(&mut self, value: &str) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", value, "createLiteralString");
        let string = self.create_string(value);
        self.push_literal(LiteralTag::String, LiteralValue::String(string))
    }

    pub fn create_literal_literal_array(&mut self, array: LiteralArrayRef) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", array = array.index, "createLiteralLiteralArray");
        self.push_literal(LiteralTag::LiteralArray, LiteralValue::LiteralArray(array))
    }

    /// Method literal, dynamic files only
    pub fn create_literal_method(&mut self, function: FunctionRef) -> KitResult<LiteralRef> {
        tracing::debug!(target: "abckit::modify", function = function.index, "createLiteralMethod");
        self.mode.expect(Mode::Dynamic, "createLiteralMethod")?;
        self.push_literal(LiteralTag::Method, LiteralValue::Method(function))
    }

    /// Literal array of `literals` in order
    pub fn create_literal_array(&mut self, literals: &[LiteralRef]) -> KitResult<LiteralArrayRef> {
        tracing::debug!(target: "abckit::modify", count = literals.len(), "createLiteralArray");
        for &literal in literals {
            self.literal(literal)?;
        }
        let index = self.literal_arrays.push(LiteralArrayData {
            items: literals.to_vec(),
        });
        Ok(LiteralArrayRef::new(self.id, index))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::KitConfig;
    use crate::file::File;
    use crate::metadata::LiteralTag;
    use crate::status::Status;
    use crate::target::Mode;

    #[test]
    fn test_method_literals_are_dynamic_only() {
        let mut file = File::empty(Mode::Static, KitConfig::default());
        let err = file.create_literal_method_affiliate(3).unwrap_err();
        assert_eq!(err.status(), Status::WrongMode);
        assert_eq!(file.literals.len(), 0);

        let mut file = File::empty(Mode::Dynamic, KitConfig::default());
        let lit = file.create_literal_method_affiliate(3).unwrap();
        assert_eq!(file.literal_get_tag(lit).unwrap(), LiteralTag::MethodAffiliate);
        assert_eq!(file.literal_get_method_affiliate(lit).unwrap(), 3);
    }

    #[test]
    fn test_array_rejects_foreign_literals() {
        let mut a = File::empty(Mode::Dynamic, KitConfig::default());
        let mut b = File::empty(Mode::Dynamic, KitConfig::default());
        let foreign = b.create_literal_u32(1).unwrap();
        let own = a.create_literal_u32(2).unwrap();
        let err = a.create_literal_array(&[own, foreign]).unwrap_err();
        assert_eq!(err.status(), Status::WrongCtx);
        assert_eq!(a.literal_arrays.len(), 0);
    }
}

//! Static back-end: mangled record names and signatures

use crate::file::File;
use crate::metadata::entities::Signature;
use crate::metadata::{ClassRef, FunctionRef, TypeId, TypeRef};
use crate::status::{KitError, KitResult};

/// Characters a declared name cannot carry
pub(crate) const RESERVED: &[char] = &[':', ';'];

/// Stored name of a static function: `name:param;...;ret;`
pub(crate) fn mangle(name: &str, params: &[String], ret: &str) -> String {
    let mut raw = String::with_capacity(name.len() + 8 * (params.len() + 1));
    raw.push_str(name);
    raw.push(':');
    for param in params {
        raw.push_str(param);
        raw.push(';');
    }
    raw.push_str(ret);
    raw.push(';');
    raw
}

/// Declared name: the text before the first `:`
pub(crate) fn demangle(raw: &str) -> &str {
    raw.split(':').next().unwrap_or(raw)
}

/// Name of a type as it appears in mangled signatures
pub(crate) fn type_name(file: &File, ty: TypeRef) -> KitResult<String> {
    let data = file.type_data(ty)?;
    match (data.id, data.class) {
        (TypeId::Reference, Some(class)) => {
            let class = file.class(class)?;
            Ok(file.string_to_str(class.name)?.to_owned())
        }
        (TypeId::Reference, None) => Err(KitError::Internal(format!(
            "reference type {} has no class",
            ty.index
        ))),
        (id, _) => Ok(id.mangled().to_owned()),
    }
}

/// Mangled name for `name` with `signature`
pub(crate) fn mangle_signature(file: &File, name: &str, signature: &Signature) -> KitResult<String> {
    let params = signature
        .params
        .iter()
        .map(|&p| type_name(file, p))
        .collect::<KitResult<Vec<_>>>()?;
    let ret = type_name(file, signature.ret)?;
    Ok(mangle(name, &params, &ret))
}

pub(crate) fn function_name(file: &File, function: FunctionRef) -> KitResult<String> {
    let data = file.function(function)?;
    Ok(demangle(file.string_to_str(data.raw_name)?).to_owned())
}

pub(crate) fn signature(file: &File, function: FunctionRef) -> KitResult<&Signature> {
    file.function(function)?
        .signature
        .as_ref()
        .ok_or_else(|| KitError::Internal(format!("static function {} has no signature", function.index)))
}

pub(crate) fn super_class(file: &File, class: ClassRef) -> KitResult<Option<ClassRef>> {
    Ok(file.class(class)?.super_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangle_and_demangle() {
        let raw = mangle("add", &["i32".into(), "i32".into()], "i32");
        assert_eq!(raw, "add:i32;i32;i32;");
        assert_eq!(demangle(&raw), "add");
        assert_eq!(mangle("main", &[], "void"), "main:void;");
        assert_eq!(demangle("plain"), "plain");
    }
}

//! Dynamic back-end: scoped record names
//!
//! Dynamic function records are stored under scoped names:
//! `#*#name` at module or namespace level, `#~@Class>#name` for methods,
//! `#~@Class=#name` for constructors, `<parent>*#name` for nested
//! functions and `#*@N*#` for the N-th anonymous function of a module.

use super::FunctionKind;
use crate::file::File;
use crate::metadata::FunctionRef;
use crate::status::KitResult;

/// Characters a declared name cannot carry
pub(crate) const RESERVED: &[char] = &['#'];

/// Stored name for a function declared as `kind`
pub(crate) fn raw_function_name(name: &str, kind: FunctionKind<'_>) -> String {
    match kind {
        FunctionKind::TopLevel => format!("#*#{}", name),
        FunctionKind::Method { class } => format!("#~@{}>#{}", class, name),
        FunctionKind::Ctor { class } => format!("#~@{}=#{}", class, name),
        FunctionKind::Nested { parent_raw } => format!("{}*#{}", parent_raw, name),
        FunctionKind::Anonymous { index } => format!("#*@{}*#", index),
    }
}

/// Declared name inside the scope: the text after the last `#`
pub(crate) fn local_name(raw: &str) -> &str {
    match raw.rfind('#') {
        Some(pos) if pos + 1 < raw.len() => &raw[pos + 1..],
        _ => raw,
    }
}

/// Name reported for a function record
///
/// Anonymous functions have no declared name and are reported with their
/// module prefix.
pub(crate) fn function_name(file: &File, function: FunctionRef) -> KitResult<String> {
    let data = file.function(function)?;
    let raw = file.string_to_str(data.raw_name)?;
    if data.is_anonymous {
        let module = file.module(data.module)?;
        Ok(format!("{}.{}", file.string_to_str(module.name)?, raw))
    } else {
        Ok(local_name(raw).to_owned())
    }
}

/// Name used as a scope path component
pub(crate) fn scope_component(file: &File, function: FunctionRef) -> KitResult<String> {
    let data = file.function(function)?;
    let raw = file.string_to_str(data.raw_name)?;
    if data.is_anonymous {
        Ok(raw.to_owned())
    } else {
        Ok(local_name(raw).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_names_decode_to_local_names() {
        let cases = [
            (FunctionKind::TopLevel, "#*#m0F0"),
            (FunctionKind::Method { class: "C" }, "#~@C>#m0F0"),
            (FunctionKind::Ctor { class: "C" }, "#~@C=#m0F0"),
            (FunctionKind::Nested { parent_raw: "#*#outer" }, "#*#outer*#m0F0"),
        ];
        for (kind, expected) in cases {
            let raw = raw_function_name("m0F0", kind);
            assert_eq!(raw, expected);
            assert_eq!(local_name(&raw), "m0F0");
        }
    }

    #[test]
    fn test_anonymous_raw_name() {
        let raw = raw_function_name("", FunctionKind::Anonymous { index: 0 });
        assert_eq!(raw, "#*@0*#");
        assert_eq!(local_name(&raw), "#*@0*#");
    }
}

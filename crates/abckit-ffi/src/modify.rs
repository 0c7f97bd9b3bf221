//! Modify API table

use crate::error::entry;
use crate::handles::*;
use abckit::{KitResult, LiteralRef, ValueRef};
use std::os::raw::c_char;

/// Handles of a pointer array, resolved through `resolve`
unsafe fn collect<C, R>(
    items: *mut *mut C,
    count: usize,
    resolve: unsafe fn(*mut C) -> KitResult<R>,
) -> KitResult<Vec<R>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if items.is_null() {
        return Err(null_argument("array"));
    }
    std::slice::from_raw_parts(items, count)
        .iter()
        .map(|&item| resolve(item))
        .collect()
}

entry! {
    fn function_set_graph(function: *mut AbckitCoreFunction, graph: *mut AbckitGraph) -> () {
        let (handle, f) = function_ref(function)?;
        let graph = graph_handle(graph)?;
        handle.file.function_set_graph(f, &graph.graph)
    }

    fn create_string(file: *mut AbckitFile, value: *const c_char, len: usize) -> *mut AbckitString {
        let handle = file_handle(file)?;
        Ok(handle.new_string(text(value, len)?))
    }

    fn create_type(file: *mut AbckitFile, id: u8) -> *mut AbckitType {
        let handle = file_handle(file)?;
        let ty = handle.file.create_type(raw_type_id(id)?)?;
        Ok(handle.intern(Entity::Type(ty)))
    }

    fn create_reference_type(class: *mut AbckitCoreClass) -> *mut AbckitType {
        let (handle, c) = class_ref(class)?;
        let ty = handle.file.create_reference_type(c)?;
        Ok(handle.intern(Entity::Type(ty)))
    }

    fn create_value_u1(file: *mut AbckitFile, value: bool) -> *mut AbckitValue {
        let handle = file_handle(file)?;
        let v = handle.file.create_value_u1(value);
        Ok(handle.intern(Entity::Value(v)))
    }

    fn create_value_double(file: *mut AbckitFile, value: f64) -> *mut AbckitValue {
        let handle = file_handle(file)?;
        let v = handle.file.create_value_double(value);
        Ok(handle.intern(Entity::Value(v)))
    }

    fn create_value_string(file: *mut AbckitFile, value: *const c_char, len: usize) -> *mut AbckitValue {
        let handle = file_handle(file)?;
        let v = handle.file.create_value_string(text(value, len)?);
        Ok(handle.intern(Entity::Value(v)))
    }

    fn create_literal_array_value(file: *mut AbckitFile, values: *mut *mut AbckitValue, size: usize) -> *mut AbckitValue {
        let handle = file_handle(file)?;
        let values: Vec<ValueRef> = collect(values, size, value_id)?;
        let v = handle.file.create_literal_array_value(&values)?;
        Ok(handle.intern(Entity::Value(v)))
    }

    fn create_literal_array(file: *mut AbckitFile, literals: *mut *mut AbckitLiteral, size: usize) -> *mut AbckitLiteralArray {
        let handle = file_handle(file)?;
        let literals: Vec<LiteralRef> = collect(literals, size, literal_id)?;
        let array = handle.file.create_literal_array(&literals)?;
        Ok(handle.intern(Entity::LiteralArray(array)))
    }

    fn create_literal_string(file: *mut AbckitFile, value: *const c_char, len: usize) -> *mut AbckitLiteral {
        let handle = file_handle(file)?;
        let literal = handle.file.create_literal_string(text(value, len)?)?;
        Ok(handle.intern(Entity::Literal(literal)))
    }

    fn create_literal_literal_array(file: *mut AbckitFile, array: *mut AbckitLiteralArray) -> *mut AbckitLiteral {
        let handle = file_handle(file)?;
        let array = literal_array_id(array)?;
        let literal = handle.file.create_literal_literal_array(array)?;
        Ok(handle.intern(Entity::Literal(literal)))
    }

    fn create_literal_method(file: *mut AbckitFile, function: *mut AbckitCoreFunction) -> *mut AbckitLiteral {
        let handle = file_handle(file)?;
        let f = function_id(function)?;
        let literal = handle.file.create_literal_method(f)?;
        Ok(handle.intern(Entity::Literal(literal)))
    }
}

/// Scalar literal constructors taking the file and the value
macro_rules! scalar_literals {
    ($($name:ident($ty:ty);)*) => {
        entry! {
            $(
                fn $name(file: *mut AbckitFile, value: $ty) -> *mut AbckitLiteral {
                    let handle = file_handle(file)?;
                    let literal = handle.file.$name(value)?;
                    Ok(handle.intern(Entity::Literal(literal)))
                }
            )*
        }
    };
}

scalar_literals! {
    create_literal_bool(bool);
    create_literal_u8(u8);
    create_literal_u16(u16);
    create_literal_method_affiliate(u16);
    create_literal_u32(u32);
    create_literal_u64(u64);
    create_literal_float(f32);
    create_literal_double(f64);
}

type LiteralOf<T> = unsafe extern "C" fn(*mut AbckitFile, T) -> *mut AbckitLiteral;

/// Mutating operations shared by every target
#[repr(C)]
pub struct AbckitModifyApi {
    pub function_set_graph: unsafe extern "C" fn(*mut AbckitCoreFunction, *mut AbckitGraph),
    pub create_string: unsafe extern "C" fn(*mut AbckitFile, *const c_char, usize) -> *mut AbckitString,
    pub create_type: unsafe extern "C" fn(*mut AbckitFile, u8) -> *mut AbckitType,
    pub create_reference_type: unsafe extern "C" fn(*mut AbckitCoreClass) -> *mut AbckitType,
    pub create_value_u1: unsafe extern "C" fn(*mut AbckitFile, bool) -> *mut AbckitValue,
    pub create_value_double: unsafe extern "C" fn(*mut AbckitFile, f64) -> *mut AbckitValue,
    pub create_value_string: unsafe extern "C" fn(*mut AbckitFile, *const c_char, usize) -> *mut AbckitValue,
    pub create_literal_array_value:
        unsafe extern "C" fn(*mut AbckitFile, *mut *mut AbckitValue, usize) -> *mut AbckitValue,
    pub create_literal_array:
        unsafe extern "C" fn(*mut AbckitFile, *mut *mut AbckitLiteral, usize) -> *mut AbckitLiteralArray,
    pub create_literal_bool: LiteralOf<bool>,
    pub create_literal_u8: LiteralOf<u8>,
    pub create_literal_u16: LiteralOf<u16>,
    pub create_literal_method_affiliate: LiteralOf<u16>,
    pub create_literal_u32: LiteralOf<u32>,
    pub create_literal_u64: LiteralOf<u64>,
    pub create_literal_float: LiteralOf<f32>,
    pub create_literal_double: LiteralOf<f64>,
    pub create_literal_string: unsafe extern "C" fn(*mut AbckitFile, *const c_char, usize) -> *mut AbckitLiteral,
    pub create_literal_literal_array: LiteralOf<*mut AbckitLiteralArray>,
    pub create_literal_method: LiteralOf<*mut AbckitCoreFunction>,
}

pub(crate) static MODIFY_API_V1: AbckitModifyApi = AbckitModifyApi {
    function_set_graph,
    create_string,
    create_type,
    create_reference_type,
    create_value_u1,
    create_value_double,
    create_value_string,
    create_literal_array_value,
    create_literal_array,
    create_literal_bool,
    create_literal_u8,
    create_literal_u16,
    create_literal_method_affiliate,
    create_literal_u32,
    create_literal_u64,
    create_literal_float,
    create_literal_double,
    create_literal_string,
    create_literal_literal_array,
    create_literal_method,
};

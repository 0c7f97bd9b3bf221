//! Instruction builder tables
//!
//! Builders take the graph first and return a detached instruction. The
//! dynamic table rejects static graphs and the static table rejects
//! dynamic ones, both with `WRONG_MODE`.

use crate::error::entry;
use crate::handles::*;
use abckit::{InstRef, KitResult};

type Graph = *mut AbckitGraph;
type Inst = *mut AbckitInst;

/// Declare a table struct and its v1 instance with the same field list
macro_rules! table {
    ($(#[$meta:meta])* $name:ident = $v1:ident { $($field:ident: $ty:ty,)* }) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        pub(crate) static $v1: $name = $name {
            $($field,)*
        };
    };
}

/// Builders whose operands are all instructions
macro_rules! inst_builders {
    ($isa:ident: $($name:ident => $method:ident($($arg:ident),*);)*) => {
        entry! {
            $(
                fn $name(graph: Graph $(, $arg: Inst)*) -> Inst {
                    let handle = graph_handle(graph)?;
                    $(let $arg = inst_id($arg)?;)*
                    let inst = handle.graph.$isa()?.$method($($arg),*)?;
                    Ok(handle.inst(inst))
                }
            )*
        }
    };
}

/// Leading instruction followed by `count` instructions from `args`
unsafe fn with_args(
    graph: Graph,
    head: Inst,
    args: *mut Inst,
    count: usize,
) -> KitResult<(&'static mut GraphHandle, InstRef, Vec<InstRef>)> {
    let handle = graph_handle(graph)?;
    let head = inst_id(head)?;
    let args = inst_refs(args, count)?;
    Ok((handle, head, args))
}

// ============================================================================
// Dynamic
// ============================================================================

inst_builders! { dynamic_isa:
    icreate_ldnan => create_ldnan();
    icreate_ldinfinity => create_ldinfinity();
    icreate_ldundefined => create_ldundefined();
    icreate_ldnull => create_ldnull();
    icreate_ldsymbol => create_ldsymbol();
    icreate_ldglobal => create_ldglobal();
    icreate_ldtrue => create_ldtrue();
    icreate_ldfalse => create_ldfalse();
    icreate_ldhole => create_ldhole();
    icreate_ldthis => create_ldthis();
    icreate_ldfunction => create_ldfunction();
    icreate_ldnewtarget => create_ldnewtarget();
    icreate_debugger => create_debugger();
    icreate_createemptyobject => create_createemptyobject();
    icreate_createemptyarray => create_createemptyarray();
    icreate_getunmappedargs => create_getunmappedargs();
    icreate_returnundefined => create_returnundefined();
    icreate_typeof => create_typeof(acc);
    icreate_tonumber => create_tonumber(acc);
    icreate_tonumeric => create_tonumeric(acc);
    icreate_neg => create_neg(acc);
    icreate_not => create_not(acc);
    icreate_inc => create_inc(acc);
    icreate_dec => create_dec(acc);
    icreate_istrue => create_istrue(acc);
    icreate_isfalse => create_isfalse(acc);
    icreate_callarg0 => create_callarg0(acc);
    icreate_dynamicimport => create_dynamicimport(acc);
    icreate_return => create_return(acc);
    icreate_throw => create_throw(acc);
    icreate_add2 => create_add2(acc, input);
    icreate_sub2 => create_sub2(acc, input);
    icreate_mul2 => create_mul2(acc, input);
    icreate_div2 => create_div2(acc, input);
    icreate_mod2 => create_mod2(acc, input);
    icreate_exp => create_exp(acc, input);
    icreate_shl2 => create_shl2(acc, input);
    icreate_shr2 => create_shr2(acc, input);
    icreate_ashr2 => create_ashr2(acc, input);
    icreate_and2 => create_and2(acc, input);
    icreate_or2 => create_or2(acc, input);
    icreate_xor2 => create_xor2(acc, input);
    icreate_eq => create_eq(acc, input);
    icreate_noteq => create_noteq(acc, input);
    icreate_less => create_less(acc, input);
    icreate_lesseq => create_lesseq(acc, input);
    icreate_greater => create_greater(acc, input);
    icreate_greatereq => create_greatereq(acc, input);
    icreate_stricteq => create_stricteq(acc, input);
    icreate_strictnoteq => create_strictnoteq(acc, input);
    icreate_isin => create_isin(acc, input);
    icreate_instanceof => create_instanceof(acc, input);
    icreate_callarg1 => create_callarg1(acc, input);
    icreate_callthis0 => create_callthis0(acc, input);
    icreate_ldobjbyvalue => create_ldobjbyvalue(acc, input);
    icreate_callargs2 => create_callargs2(callee, a0, a1);
    icreate_callargs3 => create_callargs3(callee, a0, a1, a2);
    icreate_callthis1 => create_callthis1(callee, this, a0);
    icreate_callthis2 => create_callthis2(callee, this, a0, a1);
    icreate_stobjbyvalue => create_stobjbyvalue(value, object, key);
}

entry! {
    fn icreate_dyn_load_string(graph: Graph, string: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let s = string_id(string)?;
        let inst = handle.graph.dynamic_isa()?.create_load_string(s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_createarraywithbuffer(graph: Graph, array: *mut AbckitLiteralArray) -> Inst {
        let handle = graph_handle(graph)?;
        let a = literal_array_id(array)?;
        let inst = handle.graph.dynamic_isa()?.create_createarraywithbuffer(a)?;
        Ok(handle.inst(inst))
    }

    fn icreate_createobjectwithbuffer(graph: Graph, array: *mut AbckitLiteralArray) -> Inst {
        let handle = graph_handle(graph)?;
        let a = literal_array_id(array)?;
        let inst = handle.graph.dynamic_isa()?.create_createobjectwithbuffer(a)?;
        Ok(handle.inst(inst))
    }

    fn icreate_definefunc(graph: Graph, function: *mut AbckitCoreFunction, arg_count: u64) -> Inst {
        let handle = graph_handle(graph)?;
        let f = function_id(function)?;
        let inst = handle.graph.dynamic_isa()?.create_definefunc(f, arg_count)?;
        Ok(handle.inst(inst))
    }

    fn icreate_copyrestargs(graph: Graph, index: u64) -> Inst {
        let handle = graph_handle(graph)?;
        let inst = handle.graph.dynamic_isa()?.create_copyrestargs(index)?;
        Ok(handle.inst(inst))
    }

    fn icreate_callrange(graph: Graph, callee: Inst, count: usize, args: *mut Inst) -> Inst {
        let (handle, callee, args) = with_args(graph, callee, args, count)?;
        let inst = handle.graph.dynamic_isa()?.create_callrange(callee, &args)?;
        Ok(handle.inst(inst))
    }

    fn icreate_newobjrange(graph: Graph, class: Inst, count: usize, args: *mut Inst) -> Inst {
        let (handle, class, args) = with_args(graph, class, args, count)?;
        let inst = handle.graph.dynamic_isa()?.create_newobjrange(class, &args)?;
        Ok(handle.inst(inst))
    }

    fn icreate_ldobjbyname(graph: Graph, object: Inst, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let o = inst_id(object)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_ldobjbyname(o, s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_stobjbyname(graph: Graph, value: Inst, object: Inst, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let v = inst_id(value)?;
        let o = inst_id(object)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_stobjbyname(v, o, s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_tryldglobalbyname(graph: Graph, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_tryldglobalbyname(s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_trystglobalbyname(graph: Graph, value: Inst, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let v = inst_id(value)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_trystglobalbyname(v, s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_ldglobalvar(graph: Graph, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_ldglobalvar(s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_stglobalvar(graph: Graph, value: Inst, name: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let v = inst_id(value)?;
        let s = string_id(name)?;
        let inst = handle.graph.dynamic_isa()?.create_stglobalvar(v, s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_ldexternalmodulevar(graph: Graph, import: *mut AbckitCoreImportDescriptor) -> Inst {
        let handle = graph_handle(graph)?;
        let i = import_id(import)?;
        let inst = handle.graph.dynamic_isa()?.create_ldexternalmodulevar(i)?;
        Ok(handle.inst(inst))
    }

    fn icreate_ldlocalmodulevar(graph: Graph, export: *mut AbckitCoreExportDescriptor) -> Inst {
        let handle = graph_handle(graph)?;
        let e = export_id(export)?;
        let inst = handle.graph.dynamic_isa()?.create_ldlocalmodulevar(e)?;
        Ok(handle.inst(inst))
    }

    fn icreate_stmodulevar(graph: Graph, value: Inst, export: *mut AbckitCoreExportDescriptor) -> Inst {
        let handle = graph_handle(graph)?;
        let v = inst_id(value)?;
        let e = export_id(export)?;
        let inst = handle.graph.dynamic_isa()?.create_stmodulevar(v, e)?;
        Ok(handle.inst(inst))
    }

    fn icreate_getmodulenamespace(graph: Graph, module: *mut AbckitCoreModule) -> Inst {
        let handle = graph_handle(graph)?;
        let m = module_id(module)?;
        let inst = handle.graph.dynamic_isa()?.create_getmodulenamespace(m)?;
        Ok(handle.inst(inst))
    }

    fn icreate_dyn_if(graph: Graph, acc: Inst, imm: u64, cc: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let a = inst_id(acc)?;
        let inst = handle.graph.dynamic_isa()?.create_if(a, imm, raw_condition_code(cc)?)?;
        Ok(handle.inst(inst))
    }
}

type Nullary = unsafe extern "C" fn(Graph) -> Inst;
type Unary = unsafe extern "C" fn(Graph, Inst) -> Inst;
type Binary = unsafe extern "C" fn(Graph, Inst, Inst) -> Inst;
type Ternary = unsafe extern "C" fn(Graph, Inst, Inst, Inst) -> Inst;
type WithString = unsafe extern "C" fn(Graph, *mut AbckitString) -> Inst;
type InstWithString = unsafe extern "C" fn(Graph, Inst, *mut AbckitString) -> Inst;
type Range = unsafe extern "C" fn(Graph, Inst, usize, *mut Inst) -> Inst;

table! {
    /// Builders for dynamic (JS, TS) graphs
    AbckitIsaApiDynamic = ISA_DYNAMIC_V1 {
        icreate_ldnan: Nullary,
        icreate_ldinfinity: Nullary,
        icreate_ldundefined: Nullary,
        icreate_ldnull: Nullary,
        icreate_ldsymbol: Nullary,
        icreate_ldglobal: Nullary,
        icreate_ldtrue: Nullary,
        icreate_ldfalse: Nullary,
        icreate_ldhole: Nullary,
        icreate_ldthis: Nullary,
        icreate_ldfunction: Nullary,
        icreate_ldnewtarget: Nullary,
        icreate_debugger: Nullary,
        icreate_createemptyobject: Nullary,
        icreate_createemptyarray: Nullary,
        icreate_getunmappedargs: Nullary,
        icreate_returnundefined: Nullary,
        icreate_typeof: Unary,
        icreate_tonumber: Unary,
        icreate_tonumeric: Unary,
        icreate_neg: Unary,
        icreate_not: Unary,
        icreate_inc: Unary,
        icreate_dec: Unary,
        icreate_istrue: Unary,
        icreate_isfalse: Unary,
        icreate_callarg0: Unary,
        icreate_dynamicimport: Unary,
        icreate_return: Unary,
        icreate_throw: Unary,
        icreate_add2: Binary,
        icreate_sub2: Binary,
        icreate_mul2: Binary,
        icreate_div2: Binary,
        icreate_mod2: Binary,
        icreate_exp: Binary,
        icreate_shl2: Binary,
        icreate_shr2: Binary,
        icreate_ashr2: Binary,
        icreate_and2: Binary,
        icreate_or2: Binary,
        icreate_xor2: Binary,
        icreate_eq: Binary,
        icreate_noteq: Binary,
        icreate_less: Binary,
        icreate_lesseq: Binary,
        icreate_greater: Binary,
        icreate_greatereq: Binary,
        icreate_stricteq: Binary,
        icreate_strictnoteq: Binary,
        icreate_isin: Binary,
        icreate_instanceof: Binary,
        icreate_callarg1: Binary,
        icreate_callthis0: Binary,
        icreate_ldobjbyvalue: Binary,
        icreate_callargs2: Ternary,
        icreate_callargs3: unsafe extern "C" fn(Graph, Inst, Inst, Inst, Inst) -> Inst,
        icreate_callthis1: Ternary,
        icreate_callthis2: unsafe extern "C" fn(Graph, Inst, Inst, Inst, Inst) -> Inst,
        icreate_stobjbyvalue: Ternary,
        icreate_dyn_load_string: WithString,
        icreate_createarraywithbuffer: unsafe extern "C" fn(Graph, *mut AbckitLiteralArray) -> Inst,
        icreate_createobjectwithbuffer: unsafe extern "C" fn(Graph, *mut AbckitLiteralArray) -> Inst,
        icreate_definefunc: unsafe extern "C" fn(Graph, *mut AbckitCoreFunction, u64) -> Inst,
        icreate_copyrestargs: unsafe extern "C" fn(Graph, u64) -> Inst,
        icreate_callrange: Range,
        icreate_newobjrange: Range,
        icreate_ldobjbyname: InstWithString,
        icreate_stobjbyname: unsafe extern "C" fn(Graph, Inst, Inst, *mut AbckitString) -> Inst,
        icreate_tryldglobalbyname: WithString,
        icreate_trystglobalbyname: InstWithString,
        icreate_ldglobalvar: WithString,
        icreate_stglobalvar: InstWithString,
        icreate_ldexternalmodulevar: unsafe extern "C" fn(Graph, *mut AbckitCoreImportDescriptor) -> Inst,
        icreate_ldlocalmodulevar: unsafe extern "C" fn(Graph, *mut AbckitCoreExportDescriptor) -> Inst,
        icreate_stmodulevar: unsafe extern "C" fn(Graph, Inst, *mut AbckitCoreExportDescriptor) -> Inst,
        icreate_getmodulenamespace: unsafe extern "C" fn(Graph, *mut AbckitCoreModule) -> Inst,
        icreate_dyn_if: unsafe extern "C" fn(Graph, Inst, u64, u8) -> Inst,
    }
}

// ============================================================================
// Static
// ============================================================================

inst_builders! { static_isa:
    icreate_add => create_add(lhs, rhs);
    icreate_sub => create_sub(lhs, rhs);
    icreate_mul => create_mul(lhs, rhs);
    icreate_div => create_div(lhs, rhs);
    icreate_mod => create_mod(lhs, rhs);
    icreate_shl => create_shl(lhs, rhs);
    icreate_shr => create_shr(lhs, rhs);
    icreate_ashr => create_ashr(lhs, rhs);
    icreate_and => create_and(lhs, rhs);
    icreate_or => create_or(lhs, rhs);
    icreate_xor => create_xor(lhs, rhs);
    icreate_cmp => create_cmp(lhs, rhs);
    icreate_equals => create_equals(lhs, rhs);
    icreate_static_neg => create_neg(input);
    icreate_static_not => create_not(input);
    icreate_load_undefined => create_load_undefined();
    icreate_is_undefined => create_is_undefined(input);
    icreate_len_array => create_len_array(array);
    icreate_static_return => create_return(value);
    icreate_return_void => create_return_void();
    icreate_static_throw => create_throw(value);
}

entry! {
    fn icreate_compare(graph: Graph, lhs: Inst, rhs: Inst, cc: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let l = inst_id(lhs)?;
        let r = inst_id(rhs)?;
        let inst = handle.graph.static_isa()?.create_compare(l, r, raw_condition_code(cc)?)?;
        Ok(handle.inst(inst))
    }

    fn icreate_static_load_string(graph: Graph, string: *mut AbckitString) -> Inst {
        let handle = graph_handle(graph)?;
        let s = string_id(string)?;
        let inst = handle.graph.static_isa()?.create_load_string(s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_load_const_array(graph: Graph, array: *mut AbckitLiteralArray) -> Inst {
        let handle = graph_handle(graph)?;
        let a = literal_array_id(array)?;
        let inst = handle.graph.static_isa()?.create_load_const_array(a)?;
        Ok(handle.inst(inst))
    }

    fn icreate_cast(graph: Graph, input: Inst, target: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let i = inst_id(input)?;
        let inst = handle.graph.static_isa()?.create_cast(i, raw_type_id(target)?)?;
        Ok(handle.inst(inst))
    }

    fn icreate_call_static(graph: Graph, function: *mut AbckitCoreFunction, count: usize, args: *mut Inst) -> Inst {
        let handle = graph_handle(graph)?;
        let f = function_id(function)?;
        let args = inst_refs(args, count)?;
        let inst = handle.graph.static_isa()?.create_call_static(f, &args)?;
        Ok(handle.inst(inst))
    }

    fn icreate_call_virtual(graph: Graph, object: Inst, function: *mut AbckitCoreFunction, count: usize, args: *mut Inst) -> Inst {
        let (handle, object, args) = with_args(graph, object, args, count)?;
        let f = function_id(function)?;
        let inst = handle.graph.static_isa()?.create_call_virtual(f, object, &args)?;
        Ok(handle.inst(inst))
    }

    fn icreate_new_object(graph: Graph, class: *mut AbckitCoreClass) -> Inst {
        let handle = graph_handle(graph)?;
        let c = class_id(class)?;
        let inst = handle.graph.static_isa()?.create_new_object(c)?;
        Ok(handle.inst(inst))
    }

    fn icreate_new_array(graph: Graph, class: *mut AbckitCoreClass, size: Inst) -> Inst {
        let handle = graph_handle(graph)?;
        let c = class_id(class)?;
        let s = inst_id(size)?;
        let inst = handle.graph.static_isa()?.create_new_array(c, s)?;
        Ok(handle.inst(inst))
    }

    fn icreate_load_array(graph: Graph, array: Inst, index: Inst, element: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let a = inst_id(array)?;
        let i = inst_id(index)?;
        let inst = handle.graph.static_isa()?.create_load_array(a, i, raw_type_id(element)?)?;
        Ok(handle.inst(inst))
    }

    fn icreate_store_array(graph: Graph, array: Inst, index: Inst, value: Inst, element: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let a = inst_id(array)?;
        let i = inst_id(index)?;
        let v = inst_id(value)?;
        let inst = handle.graph.static_isa()?.create_store_array(a, i, v, raw_type_id(element)?)?;
        Ok(handle.inst(inst))
    }

    fn icreate_check_cast(graph: Graph, input: Inst, class: *mut AbckitCoreClass) -> Inst {
        let handle = graph_handle(graph)?;
        let i = inst_id(input)?;
        let c = class_id(class)?;
        let inst = handle.graph.static_isa()?.create_check_cast(i, c)?;
        Ok(handle.inst(inst))
    }

    fn icreate_is_instance(graph: Graph, input: Inst, class: *mut AbckitCoreClass) -> Inst {
        let handle = graph_handle(graph)?;
        let i = inst_id(input)?;
        let c = class_id(class)?;
        let inst = handle.graph.static_isa()?.create_is_instance(i, c)?;
        Ok(handle.inst(inst))
    }

    fn icreate_static_if(graph: Graph, lhs: Inst, rhs: Inst, cc: u8) -> Inst {
        let handle = graph_handle(graph)?;
        let l = inst_id(lhs)?;
        let r = inst_id(rhs)?;
        let inst = handle.graph.static_isa()?.create_if(l, r, raw_condition_code(cc)?)?;
        Ok(handle.inst(inst))
    }
}

table! {
    /// Builders for static (ArkTS) graphs
    AbckitIsaApiStatic = ISA_STATIC_V1 {
        icreate_add: Binary,
        icreate_sub: Binary,
        icreate_mul: Binary,
        icreate_div: Binary,
        icreate_mod: Binary,
        icreate_shl: Binary,
        icreate_shr: Binary,
        icreate_ashr: Binary,
        icreate_and: Binary,
        icreate_or: Binary,
        icreate_xor: Binary,
        icreate_cmp: Binary,
        icreate_equals: Binary,
        icreate_static_neg: Unary,
        icreate_static_not: Unary,
        icreate_compare: unsafe extern "C" fn(Graph, Inst, Inst, u8) -> Inst,
        icreate_static_load_string: WithString,
        icreate_load_const_array: unsafe extern "C" fn(Graph, *mut AbckitLiteralArray) -> Inst,
        icreate_load_undefined: Nullary,
        icreate_cast: unsafe extern "C" fn(Graph, Inst, u8) -> Inst,
        icreate_is_undefined: Unary,
        icreate_call_static: unsafe extern "C" fn(Graph, *mut AbckitCoreFunction, usize, *mut Inst) -> Inst,
        icreate_call_virtual: unsafe extern "C" fn(Graph, Inst, *mut AbckitCoreFunction, usize, *mut Inst) -> Inst,
        icreate_new_object: unsafe extern "C" fn(Graph, *mut AbckitCoreClass) -> Inst,
        icreate_new_array: unsafe extern "C" fn(Graph, *mut AbckitCoreClass, Inst) -> Inst,
        icreate_len_array: Unary,
        icreate_load_array: unsafe extern "C" fn(Graph, Inst, Inst, u8) -> Inst,
        icreate_store_array: unsafe extern "C" fn(Graph, Inst, Inst, Inst, u8) -> Inst,
        icreate_check_cast: unsafe extern "C" fn(Graph, Inst, *mut AbckitCoreClass) -> Inst,
        icreate_is_instance: unsafe extern "C" fn(Graph, Inst, *mut AbckitCoreClass) -> Inst,
        icreate_static_if: unsafe extern "C" fn(Graph, Inst, Inst, u8) -> Inst,
        icreate_static_return: Unary,
        icreate_return_void: Nullary,
        icreate_static_throw: Unary,
    }
}

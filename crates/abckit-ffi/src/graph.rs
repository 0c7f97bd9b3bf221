//! Graph API table: blocks and generic instruction operations

use crate::error::entry;
use crate::handles::*;
use abckit::KitResult;
use std::os::raw::{c_char, c_void};

/// Enumeration callback over graph pointers: return false to stop
pub type GraphVisitor<T> = Option<unsafe extern "C" fn(*mut T, *mut c_void) -> bool>;

unsafe fn visit<T>(
    owner: *mut GraphHandle,
    items: Vec<GraphEntity>,
    data: *mut c_void,
    visitor: GraphVisitor<T>,
) -> KitResult<bool> {
    let visitor = visitor.ok_or_else(|| null_argument("callback"))?;
    let pointers: Vec<*mut T> = {
        let handle = &mut *owner;
        items.into_iter().map(|e| handle.intern(e)).collect()
    };
    Ok(pointers.into_iter().all(|p| visitor(p, data)))
}

// ============================================================================
// Graph
// ============================================================================

entry! {
    fn graph_get_start_basic_block(graph: *mut AbckitGraph) -> *mut AbckitBasicBlock {
        let handle = graph_handle(graph)?;
        let start = handle.graph.start_block();
        Ok(handle.block(start))
    }

    fn graph_get_end_basic_block(graph: *mut AbckitGraph) -> *mut AbckitBasicBlock {
        let handle = graph_handle(graph)?;
        let end = handle.graph.end_block();
        Ok(handle.block(end))
    }

    fn graph_get_number_of_basic_blocks(graph: *mut AbckitGraph) -> u32 {
        Ok(graph_handle(graph)?.graph.block_count() as u32)
    }

    fn graph_get_basic_block(graph: *mut AbckitGraph, id: u32) -> *mut AbckitBasicBlock {
        let handle = graph_handle(graph)?;
        let block = handle.graph.block_by_id(id)?;
        Ok(handle.block(block))
    }

    fn graph_get_number_of_parameters(graph: *mut AbckitGraph) -> u32 {
        Ok(graph_handle(graph)?.graph.parameter_count() as u32)
    }

    fn graph_get_parameter(graph: *mut AbckitGraph, index: u32) -> *mut AbckitInst {
        let handle = graph_handle(graph)?;
        let param = handle.graph.parameter(index)?;
        Ok(handle.inst(param))
    }

    fn graph_visit_blocks_rpo(graph: *mut AbckitGraph, data: *mut c_void, cb: GraphVisitor<AbckitBasicBlock>) -> bool {
        let handle = graph_handle(graph)?;
        let items = handle.graph.blocks_rpo().into_iter().map(GraphEntity::Block).collect();
        visit(handle, items, data, cb)
    }

    fn graph_find_or_create_constant_i32(graph: *mut AbckitGraph, value: i32) -> *mut AbckitInst {
        let handle = graph_handle(graph)?;
        let inst = handle.graph.find_or_create_constant_i32(value);
        Ok(handle.inst(inst))
    }

    fn graph_find_or_create_constant_i64(graph: *mut AbckitGraph, value: i64) -> *mut AbckitInst {
        let handle = graph_handle(graph)?;
        let inst = handle.graph.find_or_create_constant_i64(value);
        Ok(handle.inst(inst))
    }

    fn graph_find_or_create_constant_u64(graph: *mut AbckitGraph, value: u64) -> *mut AbckitInst {
        let handle = graph_handle(graph)?;
        let inst = handle.graph.find_or_create_constant_u64(value);
        Ok(handle.inst(inst))
    }

    fn graph_find_or_create_constant_f64(graph: *mut AbckitGraph, value: f64) -> *mut AbckitInst {
        let handle = graph_handle(graph)?;
        let inst = handle.graph.find_or_create_constant_f64(value);
        Ok(handle.inst(inst))
    }

    fn graph_remove_unreachable_blocks(graph: *mut AbckitGraph) -> u32 {
        Ok(graph_handle(graph)?.graph.remove_unreachable_blocks() as u32)
    }

    fn graph_dump(graph: *mut AbckitGraph) -> *const c_char {
        graph_handle(graph)?.dump()
    }

    fn graph_get_function(graph: *mut AbckitGraph) -> *mut AbckitCoreFunction {
        let handle = graph_handle(graph)?;
        let function = handle.graph.function();
        let file = handle.file_handle()?;
        Ok(file.intern(Entity::Function(function)))
    }
}

// ============================================================================
// Basic blocks
// ============================================================================

entry! {
    fn bb_create_empty(graph: *mut AbckitGraph) -> *mut AbckitBasicBlock {
        let handle = graph_handle(graph)?;
        let block = handle.graph.create_empty_block();
        Ok(handle.block(block))
    }

    fn bb_get_graph(block: *mut AbckitBasicBlock) -> *mut AbckitGraph {
        let (handle, _) = block_ref(block)?;
        let graph: *mut GraphHandle = handle;
        Ok(graph.cast())
    }

    fn bb_get_id(block: *mut AbckitBasicBlock) -> u32 {
        let (handle, b) = block_ref(block)?;
        handle.graph.block_id(b)
    }

    fn bb_is_start(block: *mut AbckitBasicBlock) -> bool {
        let (handle, b) = block_ref(block)?;
        handle.graph.block_is_start(b)
    }

    fn bb_is_end(block: *mut AbckitBasicBlock) -> bool {
        let (handle, b) = block_ref(block)?;
        handle.graph.block_is_end(b)
    }

    fn bb_get_succ_block_count(block: *mut AbckitBasicBlock) -> u64 {
        let (handle, b) = block_ref(block)?;
        Ok(handle.graph.block_succ_count(b)? as u64)
    }

    fn bb_get_pred_block_count(block: *mut AbckitBasicBlock) -> u64 {
        let (handle, b) = block_ref(block)?;
        Ok(handle.graph.block_pred_count(b)? as u64)
    }

    fn bb_get_succ_block(block: *mut AbckitBasicBlock, index: u32) -> *mut AbckitBasicBlock {
        let (handle, b) = block_ref(block)?;
        let succ = handle.graph.block_succ(b, index as usize)?;
        Ok(handle.block(succ))
    }

    fn bb_get_pred_block(block: *mut AbckitBasicBlock, index: u32) -> *mut AbckitBasicBlock {
        let (handle, b) = block_ref(block)?;
        let pred = handle.graph.block_pred(b, index as usize)?;
        Ok(handle.block(pred))
    }

    fn bb_visit_succ_blocks(block: *mut AbckitBasicBlock, data: *mut c_void, cb: GraphVisitor<AbckitBasicBlock>) -> bool {
        let (handle, b) = block_ref(block)?;
        let mut items = Vec::new();
        handle.graph.block_visit_succs(b, |s| {
            items.push(GraphEntity::Block(s));
            true
        })?;
        visit(handle, items, data, cb)
    }

    fn bb_visit_pred_blocks(block: *mut AbckitBasicBlock, data: *mut c_void, cb: GraphVisitor<AbckitBasicBlock>) -> bool {
        let (handle, b) = block_ref(block)?;
        let mut items = Vec::new();
        handle.graph.block_visit_preds(b, |p| {
            items.push(GraphEntity::Block(p));
            true
        })?;
        visit(handle, items, data, cb)
    }

    fn bb_append_succ_block(block: *mut AbckitBasicBlock, succ: *mut AbckitBasicBlock) -> () {
        let (handle, b) = block_ref(block)?;
        let s = block_id(succ)?;
        handle.graph.block_append_succ(b, s)
    }

    fn bb_insert_succ_block(block: *mut AbckitBasicBlock, succ: *mut AbckitBasicBlock, index: u32) -> () {
        let (handle, b) = block_ref(block)?;
        let s = block_id(succ)?;
        handle.graph.block_insert_succ(b, s, index as usize)
    }

    fn bb_disconnect_succ_block(block: *mut AbckitBasicBlock, index: u32) -> () {
        let (handle, b) = block_ref(block)?;
        handle.graph.block_disconnect_succ(b, index as usize)
    }

    fn bb_get_first_inst(block: *mut AbckitBasicBlock) -> *mut AbckitInst {
        let (handle, b) = block_ref(block)?;
        let first = handle.graph.block_first_inst(b)?;
        Ok(handle.opt_inst(first))
    }

    fn bb_get_last_inst(block: *mut AbckitBasicBlock) -> *mut AbckitInst {
        let (handle, b) = block_ref(block)?;
        let last = handle.graph.block_last_inst(b)?;
        Ok(handle.opt_inst(last))
    }

    fn bb_get_number_of_instructions(block: *mut AbckitBasicBlock) -> u32 {
        let (handle, b) = block_ref(block)?;
        Ok(handle.graph.block_inst_count(b)? as u32)
    }

    fn bb_visit_insts(block: *mut AbckitBasicBlock, data: *mut c_void, cb: GraphVisitor<AbckitInst>) -> bool {
        let (handle, b) = block_ref(block)?;
        let mut items = Vec::new();
        handle.graph.block_visit_insts(b, |i| {
            items.push(GraphEntity::Inst(i));
            true
        })?;
        visit(handle, items, data, cb)
    }

    fn bb_add_inst_front(block: *mut AbckitBasicBlock, inst: *mut AbckitInst) -> () {
        let (handle, b) = block_ref(block)?;
        let i = inst_id(inst)?;
        handle.graph.block_add_inst_front(b, i)
    }

    fn bb_add_inst_back(block: *mut AbckitBasicBlock, inst: *mut AbckitInst) -> () {
        let (handle, b) = block_ref(block)?;
        let i = inst_id(inst)?;
        handle.graph.block_add_inst_back(b, i)
    }

    fn bb_remove_all_insts(block: *mut AbckitBasicBlock) -> () {
        let (handle, b) = block_ref(block)?;
        handle.graph.block_remove_all_insts(b)
    }

    fn bb_split_block_after_instruction(inst: *mut AbckitInst) -> *mut AbckitBasicBlock {
        let (handle, i) = inst_ref(inst)?;
        let tail = handle.graph.block_split_after(i)?;
        Ok(handle.block(tail))
    }

    fn bb_dominates(dominator: *mut AbckitBasicBlock, block: *mut AbckitBasicBlock) -> bool {
        let (handle, d) = block_ref(dominator)?;
        let b = block_id(block)?;
        handle.graph.block_dominates(d, b)
    }
}

// ============================================================================
// Instructions
// ============================================================================

entry! {
    fn iget_id(inst: *mut AbckitInst) -> u32 {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_id(i)
    }

    /// Encoded opcode; see `Opcode::decode`
    fn iget_opcode(inst: *mut AbckitInst) -> u16 {
        let (handle, i) = inst_ref(inst)?;
        Ok(handle.graph.inst_opcode(i)?.encode())
    }

    fn iget_basic_block(inst: *mut AbckitInst) -> *mut AbckitBasicBlock {
        let (handle, i) = inst_ref(inst)?;
        match handle.graph.inst_block(i)? {
            Some(block) => Ok(handle.block(block)),
            None => Ok(std::ptr::null_mut()),
        }
    }

    fn iget_next(inst: *mut AbckitInst) -> *mut AbckitInst {
        let (handle, i) = inst_ref(inst)?;
        let next = handle.graph.inst_next(i)?;
        Ok(handle.opt_inst(next))
    }

    fn iget_prev(inst: *mut AbckitInst) -> *mut AbckitInst {
        let (handle, i) = inst_ref(inst)?;
        let prev = handle.graph.inst_prev(i)?;
        Ok(handle.opt_inst(prev))
    }

    fn iinsert_after(new_inst: *mut AbckitInst, reference: *mut AbckitInst) -> () {
        let (handle, n) = inst_ref(new_inst)?;
        let r = inst_id(reference)?;
        handle.graph.inst_insert_after(n, r)
    }

    fn iinsert_before(new_inst: *mut AbckitInst, reference: *mut AbckitInst) -> () {
        let (handle, n) = inst_ref(new_inst)?;
        let r = inst_id(reference)?;
        handle.graph.inst_insert_before(n, r)
    }

    fn iremove(inst: *mut AbckitInst) -> () {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_remove(i)
    }

    fn iget_input_count(inst: *mut AbckitInst) -> u64 {
        let (handle, i) = inst_ref(inst)?;
        Ok(handle.graph.inst_input_count(i)? as u64)
    }

    fn iget_input(inst: *mut AbckitInst, index: u32) -> *mut AbckitInst {
        let (handle, i) = inst_ref(inst)?;
        let input = handle.graph.inst_input(i, index as usize)?;
        Ok(handle.inst(input))
    }

    fn iset_input(inst: *mut AbckitInst, input: *mut AbckitInst, index: u32) -> () {
        let (handle, i) = inst_ref(inst)?;
        let input = inst_id(input)?;
        handle.graph.inst_set_input(i, index as usize, input)
    }

    fn iappend_input(inst: *mut AbckitInst, input: *mut AbckitInst) -> () {
        let (handle, i) = inst_ref(inst)?;
        let input = inst_id(input)?;
        handle.graph.inst_append_input(i, input)
    }

    fn iget_user_count(inst: *mut AbckitInst) -> u32 {
        let (handle, i) = inst_ref(inst)?;
        Ok(handle.graph.inst_user_count(i)? as u32)
    }

    fn ivisit_users(inst: *mut AbckitInst, data: *mut c_void, cb: GraphVisitor<AbckitInst>) -> bool {
        let (handle, i) = inst_ref(inst)?;
        let mut items = Vec::new();
        handle.graph.inst_visit_users(i, |u| {
            items.push(GraphEntity::Inst(u));
            true
        })?;
        visit(handle, items, data, cb)
    }

    fn iget_immediate_count(inst: *mut AbckitInst) -> u64 {
        let (handle, i) = inst_ref(inst)?;
        Ok(handle.graph.inst_immediate_count(i)? as u64)
    }

    fn iget_immediate(inst: *mut AbckitInst, index: u64) -> u64 {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_immediate(i, index as usize)
    }

    fn iset_immediate(inst: *mut AbckitInst, index: u64, value: u64) -> () {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_set_immediate(i, index as usize, value)
    }

    fn iget_constant_value_i64(inst: *mut AbckitInst) -> i64 {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_constant_i64(i)
    }

    fn iget_constant_value_u64(inst: *mut AbckitInst) -> u64 {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_constant_u64(i)
    }

    fn iget_constant_value_f64(inst: *mut AbckitInst) -> f64 {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_constant_f64(i)
    }

    fn iget_string(inst: *mut AbckitInst) -> *mut AbckitString {
        let (handle, i) = inst_ref(inst)?;
        let string = handle.graph.inst_string(i)?;
        Ok(handle.file_handle()?.intern(Entity::String(string)))
    }

    fn iset_string(inst: *mut AbckitInst, string: *mut AbckitString) -> () {
        let (handle, i) = inst_ref(inst)?;
        let s = string_id(string)?;
        handle.graph.inst_set_string(i, s)
    }

    fn iget_literal_array(inst: *mut AbckitInst) -> *mut AbckitLiteralArray {
        let (handle, i) = inst_ref(inst)?;
        let array = handle.graph.inst_literal_array(i)?;
        Ok(handle.file_handle()?.intern(Entity::LiteralArray(array)))
    }

    fn iset_literal_array(inst: *mut AbckitInst, array: *mut AbckitLiteralArray) -> () {
        let (handle, i) = inst_ref(inst)?;
        let a = literal_array_id(array)?;
        handle.graph.inst_set_literal_array(i, a)
    }

    fn iget_function(inst: *mut AbckitInst) -> *mut AbckitCoreFunction {
        let (handle, i) = inst_ref(inst)?;
        let function = handle.graph.inst_function(i)?;
        Ok(handle.file_handle()?.intern(Entity::Function(function)))
    }

    fn iset_function(inst: *mut AbckitInst, function: *mut AbckitCoreFunction) -> () {
        let (handle, i) = inst_ref(inst)?;
        let f = function_id(function)?;
        handle.graph.inst_set_function(i, f)
    }

    fn iget_condition_code(inst: *mut AbckitInst) -> u8 {
        let (handle, i) = inst_ref(inst)?;
        Ok(handle.graph.inst_condition_code(i)? as u8)
    }

    fn iset_condition_code(inst: *mut AbckitInst, cc: u8) -> () {
        let (handle, i) = inst_ref(inst)?;
        handle.graph.inst_set_condition_code(i, raw_condition_code(cc)?)
    }
}

type Block<T> = unsafe extern "C" fn(*mut AbckitBasicBlock) -> T;
type Inst<T> = unsafe extern "C" fn(*mut AbckitInst) -> T;
type BlockVisit<T> = unsafe extern "C" fn(*mut AbckitBasicBlock, *mut c_void, GraphVisitor<T>) -> bool;

/// Block and generic instruction operations
#[repr(C)]
pub struct AbckitGraphApi {
    // Graph
    pub graph_get_start_basic_block: unsafe extern "C" fn(*mut AbckitGraph) -> *mut AbckitBasicBlock,
    pub graph_get_end_basic_block: unsafe extern "C" fn(*mut AbckitGraph) -> *mut AbckitBasicBlock,
    pub graph_get_number_of_basic_blocks: unsafe extern "C" fn(*mut AbckitGraph) -> u32,
    pub graph_get_basic_block: unsafe extern "C" fn(*mut AbckitGraph, u32) -> *mut AbckitBasicBlock,
    pub graph_get_number_of_parameters: unsafe extern "C" fn(*mut AbckitGraph) -> u32,
    pub graph_get_parameter: unsafe extern "C" fn(*mut AbckitGraph, u32) -> *mut AbckitInst,
    pub graph_visit_blocks_rpo:
        unsafe extern "C" fn(*mut AbckitGraph, *mut c_void, GraphVisitor<AbckitBasicBlock>) -> bool,
    pub graph_find_or_create_constant_i32: unsafe extern "C" fn(*mut AbckitGraph, i32) -> *mut AbckitInst,
    pub graph_find_or_create_constant_i64: unsafe extern "C" fn(*mut AbckitGraph, i64) -> *mut AbckitInst,
    pub graph_find_or_create_constant_u64: unsafe extern "C" fn(*mut AbckitGraph, u64) -> *mut AbckitInst,
    pub graph_find_or_create_constant_f64: unsafe extern "C" fn(*mut AbckitGraph, f64) -> *mut AbckitInst,
    pub graph_remove_unreachable_blocks: unsafe extern "C" fn(*mut AbckitGraph) -> u32,
    pub graph_dump: unsafe extern "C" fn(*mut AbckitGraph) -> *const c_char,
    pub graph_get_function: unsafe extern "C" fn(*mut AbckitGraph) -> *mut AbckitCoreFunction,
    // Basic blocks
    pub bb_create_empty: unsafe extern "C" fn(*mut AbckitGraph) -> *mut AbckitBasicBlock,
    pub bb_get_graph: Block<*mut AbckitGraph>,
    pub bb_get_id: Block<u32>,
    pub bb_is_start: Block<bool>,
    pub bb_is_end: Block<bool>,
    pub bb_get_succ_block_count: Block<u64>,
    pub bb_get_pred_block_count: Block<u64>,
    pub bb_get_succ_block: unsafe extern "C" fn(*mut AbckitBasicBlock, u32) -> *mut AbckitBasicBlock,
    pub bb_get_pred_block: unsafe extern "C" fn(*mut AbckitBasicBlock, u32) -> *mut AbckitBasicBlock,
    pub bb_visit_succ_blocks: BlockVisit<AbckitBasicBlock>,
    pub bb_visit_pred_blocks: BlockVisit<AbckitBasicBlock>,
    pub bb_append_succ_block: unsafe extern "C" fn(*mut AbckitBasicBlock, *mut AbckitBasicBlock),
    pub bb_insert_succ_block: unsafe extern "C" fn(*mut AbckitBasicBlock, *mut AbckitBasicBlock, u32),
    pub bb_disconnect_succ_block: unsafe extern "C" fn(*mut AbckitBasicBlock, u32),
    pub bb_get_first_inst: Block<*mut AbckitInst>,
    pub bb_get_last_inst: Block<*mut AbckitInst>,
    pub bb_get_number_of_instructions: Block<u32>,
    pub bb_visit_insts: BlockVisit<AbckitInst>,
    pub bb_add_inst_front: unsafe extern "C" fn(*mut AbckitBasicBlock, *mut AbckitInst),
    pub bb_add_inst_back: unsafe extern "C" fn(*mut AbckitBasicBlock, *mut AbckitInst),
    pub bb_remove_all_insts: Block<()>,
    pub bb_split_block_after_instruction: Inst<*mut AbckitBasicBlock>,
    pub bb_dominates: unsafe extern "C" fn(*mut AbckitBasicBlock, *mut AbckitBasicBlock) -> bool,
    // Instructions
    pub iget_id: Inst<u32>,
    pub iget_opcode: Inst<u16>,
    pub iget_basic_block: Inst<*mut AbckitBasicBlock>,
    pub iget_next: Inst<*mut AbckitInst>,
    pub iget_prev: Inst<*mut AbckitInst>,
    pub iinsert_after: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitInst),
    pub iinsert_before: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitInst),
    pub iremove: Inst<()>,
    pub iget_input_count: Inst<u64>,
    pub iget_input: unsafe extern "C" fn(*mut AbckitInst, u32) -> *mut AbckitInst,
    pub iset_input: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitInst, u32),
    pub iappend_input: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitInst),
    pub iget_user_count: Inst<u32>,
    pub ivisit_users: unsafe extern "C" fn(*mut AbckitInst, *mut c_void, GraphVisitor<AbckitInst>) -> bool,
    pub iget_immediate_count: Inst<u64>,
    pub iget_immediate: unsafe extern "C" fn(*mut AbckitInst, u64) -> u64,
    pub iset_immediate: unsafe extern "C" fn(*mut AbckitInst, u64, u64),
    pub iget_constant_value_i64: Inst<i64>,
    pub iget_constant_value_u64: Inst<u64>,
    pub iget_constant_value_f64: Inst<f64>,
    pub iget_string: Inst<*mut AbckitString>,
    pub iset_string: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitString),
    pub iget_literal_array: Inst<*mut AbckitLiteralArray>,
    pub iset_literal_array: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitLiteralArray),
    pub iget_function: Inst<*mut AbckitCoreFunction>,
    pub iset_function: unsafe extern "C" fn(*mut AbckitInst, *mut AbckitCoreFunction),
    pub iget_condition_code: Inst<u8>,
    pub iset_condition_code: unsafe extern "C" fn(*mut AbckitInst, u8),
}

pub(crate) static GRAPH_API_V1: AbckitGraphApi = AbckitGraphApi {
    graph_get_start_basic_block,
    graph_get_end_basic_block,
    graph_get_number_of_basic_blocks,
    graph_get_basic_block,
    graph_get_number_of_parameters,
    graph_get_parameter,
    graph_visit_blocks_rpo,
    graph_find_or_create_constant_i32,
    graph_find_or_create_constant_i64,
    graph_find_or_create_constant_u64,
    graph_find_or_create_constant_f64,
    graph_remove_unreachable_blocks,
    graph_dump,
    graph_get_function,
    bb_create_empty,
    bb_get_graph,
    bb_get_id,
    bb_is_start,
    bb_is_end,
    bb_get_succ_block_count,
    bb_get_pred_block_count,
    bb_get_succ_block,
    bb_get_pred_block,
    bb_visit_succ_blocks,
    bb_visit_pred_blocks,
    bb_append_succ_block,
    bb_insert_succ_block,
    bb_disconnect_succ_block,
    bb_get_first_inst,
    bb_get_last_inst,
    bb_get_number_of_instructions,
    bb_visit_insts,
    bb_add_inst_front,
    bb_add_inst_back,
    bb_remove_all_insts,
    bb_split_block_after_instruction,
    bb_dominates,
    iget_id,
    iget_opcode,
    iget_basic_block,
    iget_next,
    iget_prev,
    iinsert_after,
    iinsert_before,
    iremove,
    iget_input_count,
    iget_input,
    iset_input,
    iappend_input,
    iget_user_count,
    ivisit_users,
    iget_immediate_count,
    iget_immediate,
    iset_immediate,
    iget_constant_value_i64,
    iget_constant_value_u64,
    iget_constant_value_f64,
    iget_string,
    iset_string,
    iget_literal_array,
    iset_literal_array,
    iget_function,
    iset_function,
    iget_condition_code,
    iset_condition_code,
};

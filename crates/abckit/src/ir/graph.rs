//! Control-flow graphs
//!
//! A [`Graph`] holds the basic blocks and instructions of one function body.
//! Block 0 is the start block (parameters and constants live there) and
//! block 1 is the end block that every returning block flows into.
//!
//! Blocks and instructions are addressed through [`BlockRef`] and
//! [`InstRef`], which remember the graph that created them; passing a
//! handle to another graph is rejected with `BadArgument`.

use super::isa_dynamic::DynOpcode;
use super::isa_static::StaticOpcode;
use super::opcode::{ConditionCode, ConstantValue, GenericOpcode, Opcode, Payload};
use crate::metadata::{FileId, FunctionRef, LiteralArrayRef, StringRef};
use crate::status::{KitError, KitResult};
use crate::target::Mode;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    fn fresh() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Basic block handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub(crate) graph: GraphId,
    pub(crate) index: u32,
}

/// Instruction handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef {
    pub(crate) graph: GraphId,
    pub(crate) index: u32,
}

impl BlockRef {
    pub fn graph_id(&self) -> GraphId {
        self.graph
    }
}

impl InstRef {
    pub fn graph_id(&self) -> GraphId {
        self.graph
    }
}

pub(crate) const START_BLOCK: u32 = 0;
pub(crate) const END_BLOCK: u32 = 1;

#[derive(Debug, Clone, Default)]
pub(crate) struct BlockData {
    pub insts: Vec<u32>,
    pub succs: Vec<u32>,
    pub preds: Vec<u32>,
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct InstData {
    pub opcode: Opcode,
    pub inputs: Vec<u32>,
    pub imms: Vec<u64>,
    pub payload: Option<Payload>,
    pub constant: Option<ConstantValue>,
    pub cc: Option<ConditionCode>,
    pub block: Option<u32>,
    pub removed: bool,
}

impl InstData {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            inputs: Vec::new(),
            imms: Vec::new(),
            payload: None,
            constant: None,
            cc: None,
            block: None,
            removed: false,
        }
    }
}

/// Control-flow graph of one function
#[derive(Debug)]
pub struct Graph {
    pub(crate) id: GraphId,
    pub(crate) file: FileId,
    pub(crate) function: FunctionRef,
    pub(crate) mode: Mode,
    pub(crate) blocks: Vec<BlockData>,
    pub(crate) insts: Vec<InstData>,
}

impl Graph {
    /// Graph with connected start/end blocks and `param_count` parameters
    pub(crate) fn new(file: FileId, function: FunctionRef, mode: Mode, param_count: u32) -> Self {
        let mut graph = Self::bare(file, function, mode);
        graph.blocks.push(BlockData::default());
        graph.blocks.push(BlockData::default());
        for index in 0..param_count {
            let mut inst = InstData::new(Opcode::Generic(GenericOpcode::Parameter));
            inst.imms.push(index as u64);
            inst.block = Some(START_BLOCK);
            let id = graph.insts.len() as u32;
            graph.insts.push(inst);
            graph.blocks[START_BLOCK as usize].insts.push(id);
        }
        graph
    }

    /// Graph without blocks, filled in by the body decoder
    pub(crate) fn bare(file: FileId, function: FunctionRef, mode: Mode) -> Self {
        Self {
            id: GraphId::fresh(),
            file,
            function,
            mode,
            blocks: Vec::new(),
            insts: Vec::new(),
        }
    }

    /// Independent copy with a new identity
    pub(crate) fn fork(&self) -> Graph {
        Graph {
            id: GraphId::fresh(),
            file: self.file,
            function: self.function,
            mode: self.mode,
            blocks: self.blocks.clone(),
            insts: self.insts.clone(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// File the graph's operands belong to
    pub fn file_id(&self) -> FileId {
        self.file
    }

    /// Function the graph was built from
    pub fn function(&self) -> FunctionRef {
        self.function
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // ------------------------------------------------------------------
    // Handle validation
    // ------------------------------------------------------------------

    pub(crate) fn block_ref(&self, index: u32) -> BlockRef {
        BlockRef {
            graph: self.id,
            index,
        }
    }

    pub(crate) fn inst_ref(&self, index: u32) -> InstRef {
        InstRef {
            graph: self.id,
            index,
        }
    }

    pub(crate) fn check_block(&self, block: BlockRef) -> KitResult<u32> {
        if block.graph != self.id {
            return Err(KitError::bad_argument(format!(
                "block belongs to graph {}, not {}",
                block.graph, self.id
            )));
        }
        match self.blocks.get(block.index as usize) {
            Some(data) if !data.removed => Ok(block.index),
            _ => Err(KitError::bad_argument(format!(
                "block bb{} is removed or unknown",
                block.index
            ))),
        }
    }

    pub(crate) fn check_inst(&self, inst: InstRef) -> KitResult<u32> {
        if inst.graph != self.id {
            return Err(KitError::bad_argument(format!(
                "instruction belongs to graph {}, not {}",
                inst.graph, self.id
            )));
        }
        match self.insts.get(inst.index as usize) {
            Some(data) if !data.removed => Ok(inst.index),
            _ => Err(KitError::bad_argument(format!(
                "instruction %{} is removed or unknown",
                inst.index
            ))),
        }
    }

    pub(crate) fn check_payload(&self, payload: &Payload) -> KitResult<()> {
        let file = match payload {
            Payload::String(r) => r.file,
            Payload::LiteralArray(r) => r.file,
            Payload::Function(r) => r.file,
            Payload::Module(r) => r.file,
            Payload::Import(r) => r.file,
            Payload::Export(r) => r.file,
            Payload::Class(r) => r.file,
            Payload::Type(_) => return Ok(()),
        };
        if file == self.file {
            Ok(())
        } else {
            Err(KitError::WrongCtx(format!(
                "instruction operand belongs to {}, graph belongs to {}",
                file, self.file
            )))
        }
    }

    fn inst_data(&self, inst: InstRef) -> KitResult<&InstData> {
        let index = self.check_inst(inst)?;
        Ok(&self.insts[index as usize])
    }

    fn inst_data_mut(&mut self, inst: InstRef) -> KitResult<&mut InstData> {
        let index = self.check_inst(inst)?;
        Ok(&mut self.insts[index as usize])
    }

    /// Create a detached instruction after validating it against the opcode
    pub(crate) fn new_inst(
        &mut self,
        opcode: Opcode,
        inputs: &[InstRef],
        imms: &[u64],
        payload: Option<Payload>,
        cc: Option<ConditionCode>,
    ) -> KitResult<InstRef> {
        let info = opcode.info();
        if !info.inputs.accepts(inputs.len()) {
            return Err(KitError::bad_argument(format!(
                "{} does not take {} inputs",
                info.mnemonic,
                inputs.len()
            )));
        }
        if imms.len() != info.imms as usize {
            return Err(KitError::bad_argument(format!(
                "{} takes {} immediates, got {}",
                info.mnemonic,
                info.imms,
                imms.len()
            )));
        }
        match payload {
            Some(p) if p.kind() == info.payload => self.check_payload(&p)?,
            None if info.payload == super::opcode::PayloadKind::None => {}
            _ => {
                return Err(KitError::bad_argument(format!(
                    "{} expects a {:?} operand",
                    info.mnemonic, info.payload
                )))
            }
        }
        let inputs = inputs
            .iter()
            .map(|i| self.check_inst(*i))
            .collect::<KitResult<Vec<_>>>()?;

        let mut data = InstData::new(opcode);
        data.inputs = inputs;
        data.imms = imms.to_vec();
        data.payload = payload;
        data.cc = cc;
        let index = self.insts.len() as u32;
        self.insts.push(data);
        tracing::trace!(target: "abckit::ir", graph = %self.id, inst = index, opcode = info.mnemonic, "created instruction");
        Ok(self.inst_ref(index))
    }

    // ------------------------------------------------------------------
    // Graph-level queries
    // ------------------------------------------------------------------

    pub fn start_block(&self) -> BlockRef {
        self.block_ref(START_BLOCK)
    }

    pub fn end_block(&self) -> BlockRef {
        self.block_ref(END_BLOCK)
    }

    /// Number of live blocks, start and end included
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.removed).count()
    }

    /// Block with the given id
    pub fn block_by_id(&self, id: u32) -> KitResult<BlockRef> {
        let block = self.block_ref(id);
        self.check_block(block)?;
        Ok(block)
    }

    /// Live blocks reachable from the start block, in reverse post-order
    pub fn blocks_rpo(&self) -> Vec<BlockRef> {
        self.rpo_indices()
            .into_iter()
            .map(|i| self.block_ref(i))
            .collect()
    }

    /// Visit blocks in reverse post-order; stops when `visitor` returns false
    pub fn visit_blocks_rpo(&self, mut visitor: impl FnMut(BlockRef) -> bool) -> bool {
        self.rpo_indices()
            .into_iter()
            .all(|i| visitor(self.block_ref(i)))
    }

    pub(crate) fn rpo_indices(&self) -> Vec<u32> {
        let mut visited = vec![false; self.blocks.len()];
        let mut postorder = Vec::with_capacity(self.blocks.len());
        // (block, next successor position)
        let mut stack = vec![(START_BLOCK, 0usize)];
        visited[START_BLOCK as usize] = true;
        while let Some((block, pos)) = stack.pop() {
            let succs = &self.blocks[block as usize].succs;
            if pos < succs.len() {
                stack.push((block, pos + 1));
                let next = succs[pos];
                if !visited[next as usize] && !self.blocks[next as usize].removed {
                    visited[next as usize] = true;
                    stack.push((next, 0));
                }
            } else {
                postorder.push(block);
            }
        }
        postorder.reverse();
        postorder
    }

    /// Parameter instruction by position
    pub fn parameter(&self, index: u32) -> KitResult<InstRef> {
        self.blocks[START_BLOCK as usize]
            .insts
            .iter()
            .copied()
            .find(|&i| {
                let data = &self.insts[i as usize];
                data.opcode == Opcode::Generic(GenericOpcode::Parameter)
                    && data.imms.first() == Some(&(index as u64))
            })
            .map(|i| self.inst_ref(i))
            .ok_or_else(|| KitError::bad_argument(format!("no parameter {}", index)))
    }

    pub fn parameter_count(&self) -> usize {
        self.blocks[START_BLOCK as usize]
            .insts
            .iter()
            .filter(|&&i| self.insts[i as usize].opcode == Opcode::Generic(GenericOpcode::Parameter))
            .count()
    }

    fn find_or_create_constant(&mut self, value: ConstantValue) -> InstRef {
        let existing = self.blocks[START_BLOCK as usize].insts.iter().copied().find(|&i| {
            self.insts[i as usize]
                .constant
                .map_or(false, |c| c.same_as(&value))
        });
        if let Some(index) = existing {
            return self.inst_ref(index);
        }
        let mut data = InstData::new(Opcode::Generic(GenericOpcode::Constant));
        data.constant = Some(value);
        data.block = Some(START_BLOCK);
        let index = self.insts.len() as u32;
        self.insts.push(data);
        self.blocks[START_BLOCK as usize].insts.push(index);
        self.inst_ref(index)
    }

    pub fn find_or_create_constant_i32(&mut self, value: i32) -> InstRef {
        self.find_or_create_constant(ConstantValue::I32(value))
    }

    pub fn find_or_create_constant_i64(&mut self, value: i64) -> InstRef {
        self.find_or_create_constant(ConstantValue::I64(value))
    }

    pub fn find_or_create_constant_u64(&mut self, value: u64) -> InstRef {
        self.find_or_create_constant(ConstantValue::U64(value))
    }

    pub fn find_or_create_constant_f64(&mut self, value: f64) -> InstRef {
        self.find_or_create_constant(ConstantValue::F64(value))
    }

    /// Remove blocks that cannot be reached from the start block
    pub fn remove_unreachable_blocks(&mut self) -> usize {
        let mut reachable = vec![false; self.blocks.len()];
        for index in self.rpo_indices() {
            reachable[index as usize] = true;
        }
        reachable[END_BLOCK as usize] = true;

        let mut removed = 0;
        for index in 0..self.blocks.len() {
            if reachable[index] || self.blocks[index].removed {
                continue;
            }
            let succs = std::mem::take(&mut self.blocks[index].succs);
            for succ in succs {
                self.blocks[succ as usize].preds.retain(|&p| p != index as u32);
            }
            let preds = std::mem::take(&mut self.blocks[index].preds);
            for pred in preds {
                self.blocks[pred as usize].succs.retain(|&s| s != index as u32);
            }
            for inst in std::mem::take(&mut self.blocks[index].insts) {
                let data = &mut self.insts[inst as usize];
                data.block = None;
                data.removed = true;
            }
            self.blocks[index].removed = true;
            removed += 1;
        }
        tracing::debug!(target: "abckit::ir", graph = %self.id, removed, "removed unreachable blocks");
        removed
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    /// Create an unconnected empty block
    pub fn create_empty_block(&mut self) -> BlockRef {
        let index = self.blocks.len() as u32;
        self.blocks.push(BlockData::default());
        self.block_ref(index)
    }

    pub fn block_id(&self, block: BlockRef) -> KitResult<u32> {
        self.check_block(block)
    }

    pub fn block_is_start(&self, block: BlockRef) -> KitResult<bool> {
        Ok(self.check_block(block)? == START_BLOCK)
    }

    pub fn block_is_end(&self, block: BlockRef) -> KitResult<bool> {
        Ok(self.check_block(block)? == END_BLOCK)
    }

    pub fn block_succ_count(&self, block: BlockRef) -> KitResult<usize> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize].succs.len())
    }

    pub fn block_pred_count(&self, block: BlockRef) -> KitResult<usize> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize].preds.len())
    }

    pub fn block_succ(&self, block: BlockRef, position: usize) -> KitResult<BlockRef> {
        let index = self.check_block(block)?;
        self.blocks[index as usize]
            .succs
            .get(position)
            .map(|&s| self.block_ref(s))
            .ok_or_else(|| KitError::bad_argument(format!("bb{} has no successor {}", index, position)))
    }

    pub fn block_pred(&self, block: BlockRef, position: usize) -> KitResult<BlockRef> {
        let index = self.check_block(block)?;
        self.blocks[index as usize]
            .preds
            .get(position)
            .map(|&p| self.block_ref(p))
            .ok_or_else(|| {
                KitError::bad_argument(format!("bb{} has no predecessor {}", index, position))
            })
    }

    pub fn block_visit_succs(
        &self,
        block: BlockRef,
        mut visitor: impl FnMut(BlockRef) -> bool,
    ) -> KitResult<bool> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize]
            .succs
            .iter()
            .all(|&s| visitor(self.block_ref(s))))
    }

    pub fn block_visit_preds(
        &self,
        block: BlockRef,
        mut visitor: impl FnMut(BlockRef) -> bool,
    ) -> KitResult<bool> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize]
            .preds
            .iter()
            .all(|&p| visitor(self.block_ref(p))))
    }

    /// Add `succ` as the last successor of `block`
    pub fn block_append_succ(&mut self, block: BlockRef, succ: BlockRef) -> KitResult<()> {
        let position = self.block_succ_count(block)?;
        self.block_insert_succ(block, succ, position)
    }

    /// Add `succ` as successor number `position` of `block`
    pub fn block_insert_succ(
        &mut self,
        block: BlockRef,
        succ: BlockRef,
        position: usize,
    ) -> KitResult<()> {
        let from = self.check_block(block)?;
        let to = self.check_block(succ)?;
        if from == END_BLOCK {
            return Err(KitError::bad_argument("the end block has no successors"));
        }
        if to == START_BLOCK {
            return Err(KitError::bad_argument("the start block has no predecessors"));
        }
        let succs = &mut self.blocks[from as usize].succs;
        if position > succs.len() {
            return Err(KitError::bad_argument(format!(
                "successor position {} out of range",
                position
            )));
        }
        succs.insert(position, to);
        self.blocks[to as usize].preds.push(from);
        Ok(())
    }

    /// Remove successor number `position` of `block`
    pub fn block_disconnect_succ(&mut self, block: BlockRef, position: usize) -> KitResult<()> {
        let from = self.check_block(block)?;
        let succs = &mut self.blocks[from as usize].succs;
        if position >= succs.len() {
            return Err(KitError::bad_argument(format!(
                "successor position {} out of range",
                position
            )));
        }
        let to = succs.remove(position);
        let preds = &mut self.blocks[to as usize].preds;
        if let Some(at) = preds.iter().position(|&p| p == from) {
            preds.remove(at);
        }
        Ok(())
    }

    pub fn block_first_inst(&self, block: BlockRef) -> KitResult<Option<InstRef>> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize]
            .insts
            .first()
            .map(|&i| self.inst_ref(i)))
    }

    pub fn block_last_inst(&self, block: BlockRef) -> KitResult<Option<InstRef>> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize]
            .insts
            .last()
            .map(|&i| self.inst_ref(i)))
    }

    pub fn block_inst_count(&self, block: BlockRef) -> KitResult<usize> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize].insts.len())
    }

    pub fn block_visit_insts(
        &self,
        block: BlockRef,
        mut visitor: impl FnMut(InstRef) -> bool,
    ) -> KitResult<bool> {
        let index = self.check_block(block)?;
        Ok(self.blocks[index as usize]
            .insts
            .iter()
            .all(|&i| visitor(self.inst_ref(i))))
    }

    fn check_detached(&self, inst: InstRef) -> KitResult<u32> {
        let index = self.check_inst(inst)?;
        if self.insts[index as usize].block.is_some() {
            return Err(KitError::bad_argument(format!(
                "instruction %{} is already in a block",
                index
            )));
        }
        Ok(index)
    }

    fn check_insertable(&self, block: u32, inst: u32) -> KitResult<()> {
        if block == END_BLOCK {
            return Err(KitError::bad_argument("the end block holds no instructions"));
        }
        let opcode = self.insts[inst as usize].opcode;
        if block == START_BLOCK && opcode.mode().is_some() {
            return Err(KitError::bad_argument(
                "the start block only holds parameters and constants",
            ));
        }
        Ok(())
    }

    pub fn block_add_inst_front(&mut self, block: BlockRef, inst: InstRef) -> KitResult<()> {
        let b = self.check_block(block)?;
        let i = self.check_detached(inst)?;
        self.check_insertable(b, i)?;
        self.blocks[b as usize].insts.insert(0, i);
        self.insts[i as usize].block = Some(b);
        Ok(())
    }

    pub fn block_add_inst_back(&mut self, block: BlockRef, inst: InstRef) -> KitResult<()> {
        let b = self.check_block(block)?;
        let i = self.check_detached(inst)?;
        self.check_insertable(b, i)?;
        self.blocks[b as usize].insts.push(i);
        self.insts[i as usize].block = Some(b);
        Ok(())
    }

    /// Remove every instruction of a block
    pub fn block_remove_all_insts(&mut self, block: BlockRef) -> KitResult<()> {
        let b = self.check_block(block)?;
        for inst in std::mem::take(&mut self.blocks[b as usize].insts) {
            let data = &mut self.insts[inst as usize];
            data.block = None;
            data.removed = true;
        }
        Ok(())
    }

    /// Move everything after `inst` into a new block that inherits the
    /// successors; the old block falls through to the new one
    pub fn block_split_after(&mut self, inst: InstRef) -> KitResult<BlockRef> {
        let i = self.check_inst(inst)?;
        let b = self.insts[i as usize]
            .block
            .ok_or_else(|| KitError::bad_argument("instruction is not in a block"))?;
        if b == START_BLOCK {
            return Err(KitError::bad_argument("the start block cannot be split"));
        }
        let new_block = self.create_empty_block().index;
        let position = self.blocks[b as usize]
            .insts
            .iter()
            .position(|&x| x == i)
            .ok_or_else(|| KitError::Internal(format!("%{} missing from bb{}", i, b)))?;
        let tail = self.blocks[b as usize].insts.split_off(position + 1);
        for &moved in &tail {
            self.insts[moved as usize].block = Some(new_block);
        }
        self.blocks[new_block as usize].insts = tail;

        let succs = std::mem::take(&mut self.blocks[b as usize].succs);
        for &succ in &succs {
            for pred in self.blocks[succ as usize].preds.iter_mut() {
                if *pred == b {
                    *pred = new_block;
                }
            }
        }
        self.blocks[new_block as usize].succs = succs;
        self.blocks[b as usize].succs.push(new_block);
        self.blocks[new_block as usize].preds.push(b);
        Ok(self.block_ref(new_block))
    }

    /// Whether `dominator` dominates `block`
    pub fn block_dominates(&self, dominator: BlockRef, block: BlockRef) -> KitResult<bool> {
        let d = self.check_block(dominator)?;
        let b = self.check_block(block)?;
        let idom = self.immediate_dominators();
        let mut current = Some(b);
        while let Some(c) = current {
            if c == d {
                return Ok(true);
            }
            current = idom[c as usize].filter(|&parent| parent != c);
        }
        Ok(false)
    }

    /// Immediate dominators (Cooper, Harvey, Kennedy)
    fn immediate_dominators(&self) -> Vec<Option<u32>> {
        let rpo = self.rpo_indices();
        let mut order = vec![usize::MAX; self.blocks.len()];
        for (pos, &b) in rpo.iter().enumerate() {
            order[b as usize] = pos;
        }
        let mut idom: Vec<Option<u32>> = vec![None; self.blocks.len()];
        idom[START_BLOCK as usize] = Some(START_BLOCK);
        let mut changed = true;
        while changed {
            changed = false;
            for &b in rpo.iter().skip(1) {
                let mut new_idom: Option<u32> = None;
                for &p in &self.blocks[b as usize].preds {
                    if idom[p as usize].is_none() {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => p,
                        Some(current) => {
                            let (mut x, mut y) = (p, current);
                            while x != y {
                                while order[x as usize] > order[y as usize] {
                                    x = idom[x as usize].unwrap_or(START_BLOCK);
                                }
                                while order[y as usize] > order[x as usize] {
                                    y = idom[y as usize].unwrap_or(START_BLOCK);
                                }
                            }
                            x
                        }
                    });
                }
                if new_idom.is_some() && idom[b as usize] != new_idom {
                    idom[b as usize] = new_idom;
                    changed = true;
                }
            }
        }
        idom
    }

    // ------------------------------------------------------------------
    // Instructions
    // ------------------------------------------------------------------

    pub fn inst_id(&self, inst: InstRef) -> KitResult<u32> {
        self.check_inst(inst)
    }

    pub fn inst_opcode(&self, inst: InstRef) -> KitResult<Opcode> {
        Ok(self.inst_data(inst)?.opcode)
    }

    /// Dynamic opcode of an instruction, `None` for generic instructions
    pub fn dyn_opcode(&self, inst: InstRef) -> KitResult<Option<DynOpcode>> {
        self.mode.expect(Mode::Dynamic, "iGetOpcodeDynamic")?;
        Ok(match self.inst_data(inst)?.opcode {
            Opcode::Dynamic(op) => Some(op),
            _ => None,
        })
    }

    /// Static opcode of an instruction, `None` for generic instructions
    pub fn static_opcode(&self, inst: InstRef) -> KitResult<Option<StaticOpcode>> {
        self.mode.expect(Mode::Static, "iGetOpcodeStatic")?;
        Ok(match self.inst_data(inst)?.opcode {
            Opcode::Static(op) => Some(op),
            _ => None,
        })
    }

    pub fn inst_block(&self, inst: InstRef) -> KitResult<Option<BlockRef>> {
        Ok(self.inst_data(inst)?.block.map(|b| self.block_ref(b)))
    }

    fn position_in_block(&self, inst: InstRef) -> KitResult<Option<(u32, usize)>> {
        let i = self.check_inst(inst)?;
        let Some(b) = self.insts[i as usize].block else {
            return Ok(None);
        };
        let position = self.blocks[b as usize]
            .insts
            .iter()
            .position(|&x| x == i)
            .ok_or_else(|| KitError::Internal(format!("%{} missing from bb{}", i, b)))?;
        Ok(Some((b, position)))
    }

    pub fn inst_next(&self, inst: InstRef) -> KitResult<Option<InstRef>> {
        Ok(self.position_in_block(inst)?.and_then(|(b, pos)| {
            self.blocks[b as usize]
                .insts
                .get(pos + 1)
                .map(|&i| self.inst_ref(i))
        }))
    }

    pub fn inst_prev(&self, inst: InstRef) -> KitResult<Option<InstRef>> {
        Ok(self.position_in_block(inst)?.and_then(|(b, pos)| {
            pos.checked_sub(1)
                .map(|p| self.inst_ref(self.blocks[b as usize].insts[p]))
        }))
    }

    fn insert_relative(&mut self, new_inst: InstRef, reference: InstRef, after: bool) -> KitResult<()> {
        let n = self.check_detached(new_inst)?;
        let (b, pos) = self
            .position_in_block(reference)?
            .ok_or_else(|| KitError::bad_argument("reference instruction is not in a block"))?;
        self.check_insertable(b, n)?;
        let at = if after { pos + 1 } else { pos };
        self.blocks[b as usize].insts.insert(at, n);
        self.insts[n as usize].block = Some(b);
        Ok(())
    }

    pub fn inst_insert_after(&mut self, new_inst: InstRef, reference: InstRef) -> KitResult<()> {
        self.insert_relative(new_inst, reference, true)
    }

    pub fn inst_insert_before(&mut self, new_inst: InstRef, reference: InstRef) -> KitResult<()> {
        self.insert_relative(new_inst, reference, false)
    }

    /// Remove an instruction; its handle becomes invalid
    pub fn inst_remove(&mut self, inst: InstRef) -> KitResult<()> {
        if let Some((b, pos)) = self.position_in_block(inst)? {
            self.blocks[b as usize].insts.remove(pos);
        }
        let data = &mut self.insts[inst.index as usize];
        data.block = None;
        data.removed = true;
        Ok(())
    }

    pub fn inst_input_count(&self, inst: InstRef) -> KitResult<usize> {
        Ok(self.inst_data(inst)?.inputs.len())
    }

    pub fn inst_input(&self, inst: InstRef, position: usize) -> KitResult<InstRef> {
        let data = self.inst_data(inst)?;
        data.inputs
            .get(position)
            .map(|&i| self.inst_ref(i))
            .ok_or_else(|| KitError::bad_argument(format!("no input {}", position)))
    }

    pub fn inst_set_input(&mut self, inst: InstRef, position: usize, input: InstRef) -> KitResult<()> {
        let value = self.check_inst(input)?;
        let data = self.inst_data_mut(inst)?;
        let slot = data
            .inputs
            .get_mut(position)
            .ok_or_else(|| KitError::bad_argument(format!("no input {}", position)))?;
        *slot = value;
        Ok(())
    }

    /// Append an input to a variadic instruction
    pub fn inst_append_input(&mut self, inst: InstRef, input: InstRef) -> KitResult<()> {
        let value = self.check_inst(input)?;
        let data = self.inst_data_mut(inst)?;
        if !data.opcode.info().inputs.is_variadic() {
            return Err(KitError::bad_argument(format!(
                "{} has a fixed number of inputs",
                data.opcode.mnemonic()
            )));
        }
        data.inputs.push(value);
        Ok(())
    }

    fn users_of(&self, index: u32) -> impl Iterator<Item = u32> + '_ {
        self.insts
            .iter()
            .enumerate()
            .filter(move |(_, d)| !d.removed && d.inputs.contains(&index))
            .map(|(i, _)| i as u32)
    }

    pub fn inst_user_count(&self, inst: InstRef) -> KitResult<usize> {
        let index = self.check_inst(inst)?;
        Ok(self.users_of(index).count())
    }

    pub fn inst_visit_users(
        &self,
        inst: InstRef,
        mut visitor: impl FnMut(InstRef) -> bool,
    ) -> KitResult<bool> {
        let index = self.check_inst(inst)?;
        Ok(self.users_of(index).all(|u| visitor(self.inst_ref(u))))
    }

    pub fn inst_immediate_count(&self, inst: InstRef) -> KitResult<usize> {
        Ok(self.inst_data(inst)?.imms.len())
    }

    pub fn inst_immediate(&self, inst: InstRef, position: usize) -> KitResult<u64> {
        self.inst_data(inst)?
            .imms
            .get(position)
            .copied()
            .ok_or_else(|| KitError::bad_argument(format!("no immediate {}", position)))
    }

    pub fn inst_set_immediate(&mut self, inst: InstRef, position: usize, value: u64) -> KitResult<()> {
        let slot = self
            .inst_data_mut(inst)?
            .imms
            .get_mut(position)
            .ok_or_else(|| KitError::bad_argument(format!("no immediate {}", position)))?;
        *slot = value;
        Ok(())
    }

    pub fn inst_constant(&self, inst: InstRef) -> KitResult<ConstantValue> {
        self.inst_data(inst)?
            .constant
            .ok_or_else(|| KitError::bad_argument("instruction is not a constant"))
    }

    pub fn inst_constant_i64(&self, inst: InstRef) -> KitResult<i64> {
        match self.inst_constant(inst)? {
            ConstantValue::I32(v) => Ok(v as i64),
            ConstantValue::I64(v) => Ok(v),
            other => Err(KitError::bad_argument(format!("constant {} is not signed", other))),
        }
    }

    pub fn inst_constant_u64(&self, inst: InstRef) -> KitResult<u64> {
        match self.inst_constant(inst)? {
            ConstantValue::U64(v) => Ok(v),
            other => Err(KitError::bad_argument(format!("constant {} is not u64", other))),
        }
    }

    pub fn inst_constant_f64(&self, inst: InstRef) -> KitResult<f64> {
        match self.inst_constant(inst)? {
            ConstantValue::F64(v) => Ok(v),
            other => Err(KitError::bad_argument(format!("constant {} is not f64", other))),
        }
    }

    pub fn inst_payload(&self, inst: InstRef) -> KitResult<Option<Payload>> {
        Ok(self.inst_data(inst)?.payload)
    }

    /// Replace the entity operand of an instruction with one of the same kind
    pub fn inst_set_payload(&mut self, inst: InstRef, payload: Payload) -> KitResult<()> {
        self.check_payload(&payload)?;
        let data = self.inst_data_mut(inst)?;
        if data.opcode.info().payload != payload.kind() {
            return Err(KitError::bad_argument(format!(
                "{} does not take a {:?} operand",
                data.opcode.mnemonic(),
                payload.kind()
            )));
        }
        data.payload = Some(payload);
        Ok(())
    }

    pub fn inst_string(&self, inst: InstRef) -> KitResult<StringRef> {
        match self.inst_payload(inst)? {
            Some(Payload::String(s)) => Ok(s),
            _ => Err(KitError::bad_argument("instruction has no string operand")),
        }
    }

    pub fn inst_set_string(&mut self, inst: InstRef, string: StringRef) -> KitResult<()> {
        self.inst_set_payload(inst, Payload::String(string))
    }

    pub fn inst_literal_array(&self, inst: InstRef) -> KitResult<LiteralArrayRef> {
        match self.inst_payload(inst)? {
            Some(Payload::LiteralArray(l)) => Ok(l),
            _ => Err(KitError::bad_argument("instruction has no literal array operand")),
        }
    }

    pub fn inst_set_literal_array(&mut self, inst: InstRef, array: LiteralArrayRef) -> KitResult<()> {
        self.inst_set_payload(inst, Payload::LiteralArray(array))
    }

    pub fn inst_function(&self, inst: InstRef) -> KitResult<FunctionRef> {
        match self.inst_payload(inst)? {
            Some(Payload::Function(f)) => Ok(f),
            _ => Err(KitError::bad_argument("instruction has no function operand")),
        }
    }

    pub fn inst_set_function(&mut self, inst: InstRef, function: FunctionRef) -> KitResult<()> {
        self.inst_set_payload(inst, Payload::Function(function))
    }

    pub fn inst_condition_code(&self, inst: InstRef) -> KitResult<ConditionCode> {
        self.inst_data(inst)?
            .cc
            .ok_or_else(|| KitError::bad_argument("instruction has no condition code"))
    }

    pub fn inst_set_condition_code(&mut self, inst: InstRef, cc: ConditionCode) -> KitResult<()> {
        let data = self.inst_data_mut(inst)?;
        if !data.opcode.info().has_condition() {
            return Err(KitError::bad_argument(format!(
                "{} takes no condition code",
                data.opcode.mnemonic()
            )));
        }
        data.cc = Some(cc);
        Ok(())
    }

    /// Live instructions that sit in a block, in block order
    pub(crate) fn attached_insts(&self) -> impl Iterator<Item = u32> + '_ {
        self.blocks
            .iter()
            .filter(|b| !b.removed)
            .flat_map(|b| b.insts.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FileId;

    fn graph(mode: Mode) -> Graph {
        let file = FileId::fresh();
        Graph::new(file, FunctionRef::new(file, 0), mode, 2)
    }

    #[test]
    fn test_new_graph_layout() {
        let g = graph(Mode::Dynamic);
        assert_eq!(g.block_count(), 2);
        assert_eq!(g.parameter_count(), 2);
        assert!(g.block_is_start(g.start_block()).unwrap());
        assert!(g.block_is_end(g.end_block()).unwrap());
        assert!(g.parameter(1).is_ok());
        assert!(g.parameter(2).is_err());
    }

    #[test]
    fn test_constants_are_deduplicated() {
        let mut g = graph(Mode::Static);
        let a = g.find_or_create_constant_i64(7);
        let b = g.find_or_create_constant_i64(7);
        let c = g.find_or_create_constant_i32(7);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(g.inst_constant_i64(c).unwrap(), 7);
        assert!(g.inst_constant_f64(c).is_err());
    }

    #[test]
    fn test_rpo_and_dominance() {
        let mut g = graph(Mode::Dynamic);
        let (start, end) = (g.start_block(), g.end_block());
        let a = g.create_empty_block();
        let b = g.create_empty_block();
        let c = g.create_empty_block();
        let join = g.create_empty_block();
        g.block_append_succ(start, a).unwrap();
        g.block_append_succ(a, b).unwrap();
        g.block_append_succ(a, c).unwrap();
        g.block_append_succ(b, join).unwrap();
        g.block_append_succ(c, join).unwrap();
        g.block_append_succ(join, end).unwrap();

        let rpo = g.blocks_rpo();
        assert_eq!(rpo.first(), Some(&start));
        assert_eq!(rpo.last(), Some(&end));
        assert!(g.block_dominates(a, join).unwrap());
        assert!(!g.block_dominates(b, join).unwrap());
        assert!(g.block_dominates(join, join).unwrap());
    }

    #[test]
    fn test_unreachable_blocks_are_removed() {
        let mut g = graph(Mode::Dynamic);
        let (start, end) = (g.start_block(), g.end_block());
        let live = g.create_empty_block();
        let dead = g.create_empty_block();
        g.block_append_succ(start, live).unwrap();
        g.block_append_succ(live, end).unwrap();
        g.block_append_succ(dead, end).unwrap();
        assert_eq!(g.block_pred_count(end).unwrap(), 2);

        assert_eq!(g.remove_unreachable_blocks(), 1);
        assert_eq!(g.block_pred_count(end).unwrap(), 1);
        assert!(g.block_id(dead).is_err());
    }

    #[test]
    fn test_foreign_handles_are_rejected() {
        let g1 = graph(Mode::Dynamic);
        let g2 = graph(Mode::Dynamic);
        let err = g1.block_succ_count(g2.start_block()).unwrap_err();
        assert_eq!(err.status(), crate::Status::BadArgument);
    }

    #[test]
    fn test_split_block() {
        let mut g = graph(Mode::Static);
        let (start, end) = (g.start_block(), g.end_block());
        let body = g.create_empty_block();
        g.block_append_succ(start, body).unwrap();
        g.block_append_succ(body, end).unwrap();
        let p0 = g.parameter(0).unwrap();
        let p1 = g.parameter(1).unwrap();
        let add = g
            .new_inst(Opcode::Static(StaticOpcode::Add), &[p0, p1], &[], None, None)
            .unwrap();
        let ret = g
            .new_inst(Opcode::Static(StaticOpcode::Return), &[add], &[], None, None)
            .unwrap();
        g.block_add_inst_back(body, add).unwrap();
        g.block_add_inst_back(body, ret).unwrap();

        let tail = g.block_split_after(add).unwrap();
        assert_eq!(g.block_inst_count(body).unwrap(), 1);
        assert_eq!(g.block_first_inst(tail).unwrap(), Some(ret));
        assert_eq!(g.block_succ(body, 0).unwrap(), tail);
        assert_eq!(g.block_succ(tail, 0).unwrap(), end);
        assert_eq!(g.block_pred(end, 0).unwrap(), tail);
        assert_eq!(g.inst_user_count(add).unwrap(), 1);
    }
}

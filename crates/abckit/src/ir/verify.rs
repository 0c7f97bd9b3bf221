//! Graph verification
//!
//! Run before a graph replaces a function body.

use super::graph::{Graph, END_BLOCK, START_BLOCK};
use super::opcode::{GenericOpcode, Opcode, PayloadKind};
use thiserror::Error;

/// Graph verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Instruction of the other family
    #[error("%{inst} uses a {family} opcode in a {mode} graph")]
    WrongFamily {
        inst: u32,
        family: &'static str,
        mode: &'static str,
    },

    /// Input count does not match the opcode
    #[error("%{inst} ({mnemonic}) has {count} inputs")]
    BadArity {
        inst: u32,
        mnemonic: &'static str,
        count: usize,
    },

    /// Missing or mismatched entity operand
    #[error("%{inst} ({mnemonic}) has a missing or mismatched operand")]
    BadPayload { inst: u32, mnemonic: &'static str },

    /// Branch without a condition code
    #[error("%{inst} ({mnemonic}) has no condition code")]
    MissingCondition { inst: u32, mnemonic: &'static str },

    /// Input is not placed in a live block
    #[error("%{inst} uses %{input}, which is not in the graph")]
    DetachedInput { inst: u32, input: u32 },

    /// Terminator or branch in the middle of a block
    #[error("%{inst} ends control flow but is not last in bb{block}")]
    MisplacedTerminator { inst: u32, block: u32 },

    /// Successor count does not match how the block ends
    #[error("bb{block} has {actual} successors, expected {expected}")]
    BadSuccessors {
        block: u32,
        expected: usize,
        actual: usize,
    },

    /// Returning block does not flow into the end block
    #[error("bb{0} returns but does not flow into the end block")]
    ReturnNotToEnd(u32),

    /// The end block holds instructions or successors
    #[error("the end block must be empty")]
    NonEmptyEnd,

    /// Non-constant instruction in the start block
    #[error("%{0} is not allowed in the start block")]
    BadStartInst(u32),
}

fn family_name(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::Generic(_) => "generic",
        Opcode::Dynamic(_) => "dynamic",
        Opcode::Static(_) => "static",
    }
}

/// Verify the structure of a graph
pub fn verify_graph(graph: &Graph) -> Result<(), VerifyError> {
    let mode_name = match graph.mode {
        crate::Mode::Dynamic => "dynamic",
        crate::Mode::Static => "static",
    };
    let end = &graph.blocks[END_BLOCK as usize];
    if !end.insts.is_empty() || !end.succs.is_empty() {
        return Err(VerifyError::NonEmptyEnd);
    }

    for (b, block) in graph.blocks.iter().enumerate() {
        if block.removed || b as u32 == END_BLOCK {
            continue;
        }
        let b = b as u32;
        for (pos, &i) in block.insts.iter().enumerate() {
            let inst = &graph.insts[i as usize];
            let info = inst.opcode.info();

            if let Some(family) = inst.opcode.mode() {
                if family != graph.mode {
                    return Err(VerifyError::WrongFamily {
                        inst: i,
                        family: family_name(inst.opcode),
                        mode: mode_name,
                    });
                }
            }
            if b == START_BLOCK
                && !matches!(
                    inst.opcode,
                    Opcode::Generic(GenericOpcode::Constant | GenericOpcode::Parameter)
                )
            {
                return Err(VerifyError::BadStartInst(i));
            }
            if !info.inputs.accepts(inst.inputs.len()) {
                return Err(VerifyError::BadArity {
                    inst: i,
                    mnemonic: info.mnemonic,
                    count: inst.inputs.len(),
                });
            }
            let payload_ok = match inst.payload {
                Some(p) => p.kind() == info.payload,
                None => info.payload == PayloadKind::None,
            };
            if !payload_ok {
                return Err(VerifyError::BadPayload {
                    inst: i,
                    mnemonic: info.mnemonic,
                });
            }
            if info.has_condition() && inst.cc.is_none() {
                return Err(VerifyError::MissingCondition {
                    inst: i,
                    mnemonic: info.mnemonic,
                });
            }
            for &input in &inst.inputs {
                let placed = graph
                    .insts
                    .get(input as usize)
                    .and_then(|d| (!d.removed).then_some(d.block).flatten())
                    .map_or(false, |ib| !graph.blocks[ib as usize].removed);
                if !placed {
                    return Err(VerifyError::DetachedInput { inst: i, input });
                }
            }
            let ends_flow = info.is_terminator() || info.is_branch();
            if ends_flow && pos + 1 != block.insts.len() {
                return Err(VerifyError::MisplacedTerminator { inst: i, block: b });
            }
        }

        let last = block
            .insts
            .last()
            .map(|&i| graph.insts[i as usize].opcode.info());
        match last {
            Some(info) if info.is_terminator() => {
                if block.succs.as_slice() != [END_BLOCK] {
                    return Err(VerifyError::ReturnNotToEnd(b));
                }
            }
            Some(info) if info.is_branch() => {
                if block.succs.len() != 2 {
                    return Err(VerifyError::BadSuccessors {
                        block: b,
                        expected: 2,
                        actual: block.succs.len(),
                    });
                }
            }
            _ => {
                if block.succs.len() != 1 {
                    return Err(VerifyError::BadSuccessors {
                        block: b,
                        expected: 1,
                        actual: block.succs.len(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::isa_dynamic::DynOpcode;
    use crate::metadata::{FileId, FunctionRef};
    use crate::target::Mode;

    fn returning_graph() -> Graph {
        let file = FileId::fresh();
        let mut g = Graph::new(file, FunctionRef::new(file, 0), Mode::Dynamic, 1);
        let body = g.create_empty_block();
        let (start, end) = (g.start_block(), g.end_block());
        g.block_append_succ(start, body).unwrap();
        g.block_append_succ(body, end).unwrap();
        let ret = g.dynamic_isa().unwrap().create_returnundefined().unwrap();
        g.block_add_inst_back(body, ret).unwrap();
        g
    }

    #[test]
    fn test_valid_graph() {
        assert_eq!(verify_graph(&returning_graph()), Ok(()));
    }

    #[test]
    fn test_return_must_reach_end() {
        let mut g = returning_graph();
        let body = g.block_by_id(2).unwrap();
        g.block_disconnect_succ(body, 0).unwrap();
        assert_eq!(verify_graph(&g), Err(VerifyError::ReturnNotToEnd(2)));
    }

    #[test]
    fn test_detached_input() {
        let mut g = returning_graph();
        let body = g.block_by_id(2).unwrap();
        let first = g.block_first_inst(body).unwrap().unwrap();
        let dangling = g.dynamic_isa().unwrap().create_ldtrue().unwrap();
        let neg = g.dynamic_isa().unwrap().create_neg(dangling).unwrap();
        g.inst_insert_before(neg, first).unwrap();
        assert!(matches!(
            verify_graph(&g),
            Err(VerifyError::DetachedInput { .. })
        ));
    }

    #[test]
    fn test_branch_needs_two_successors() {
        let mut g = returning_graph();
        let body = g.block_by_id(2).unwrap();
        g.block_remove_all_insts(body).unwrap();
        let p = g.parameter(0).unwrap();
        let branch = g
            .dynamic_isa()
            .unwrap()
            .create_if(p, 0, crate::ir::ConditionCode::Eq)
            .unwrap();
        g.block_add_inst_back(body, branch).unwrap();
        assert_eq!(
            verify_graph(&g),
            Err(VerifyError::BadSuccessors {
                block: 2,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(g.dyn_opcode(branch).unwrap(), Some(DynOpcode::If));
    }
}

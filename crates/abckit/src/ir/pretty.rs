//! Pretty-printing for graphs
//!
//! Human-readable dumps used by debug logging and tests.

use super::graph::{Graph, END_BLOCK, START_BLOCK};
use super::opcode::{ConstantValue, Opcode, Payload};
use std::fmt::{self, Write};

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Graph {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = write_graph(self, &mut output);
        output
    }
}

impl Graph {
    /// Debug dump of the reachable blocks
    pub fn dump(&self) -> String {
        let text = self.pretty_print();
        tracing::trace!(target: "abckit::ir", graph = %self.id, "\n{}", text);
        text
    }
}

fn write_graph(graph: &Graph, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "graph {} ({}, function {}) {{",
        graph.id,
        graph.mode,
        graph.function.index()
    )?;
    for index in graph.rpo_indices() {
        let block = &graph.blocks[index as usize];
        let label = match index {
            START_BLOCK => " ; start",
            END_BLOCK => " ; end",
            _ => "",
        };
        let preds: Vec<String> = block.preds.iter().map(|p| format!("bb{}", p)).collect();
        writeln!(out, "  bb{}:{} preds: [{}]", index, label, preds.join(", "))?;
        for &inst in &block.insts {
            writeln!(out, "    {}", format_inst(graph, inst))?;
        }
        if !block.succs.is_empty() {
            let succs: Vec<String> = block.succs.iter().map(|s| format!("bb{}", s)).collect();
            writeln!(out, "    -> {}", succs.join(", "))?;
        }
    }
    writeln!(out, "}}")
}

fn format_inst(graph: &Graph, index: u32) -> String {
    let data = &graph.insts[index as usize];
    let mut text = format!("%{} = {}", index, data.opcode.mnemonic());
    if let Some(cc) = data.cc {
        text.push('.');
        text.push_str(cc.as_str());
    }
    if let (Opcode::Generic(_), Some(constant)) = (data.opcode, data.constant) {
        text.push(' ');
        text.push_str(&format_constant(constant));
    }
    let mut operands: Vec<String> = data.inputs.iter().map(|i| format!("%{}", i)).collect();
    operands.extend(data.imms.iter().map(|imm| format!("#{}", imm)));
    if let Some(payload) = data.payload {
        operands.push(format_payload(payload));
    }
    if !operands.is_empty() {
        text.push(' ');
        text.push_str(&operands.join(", "));
    }
    text
}

fn format_constant(constant: ConstantValue) -> String {
    match constant {
        ConstantValue::I32(v) => format!("i32 {}", v),
        ConstantValue::I64(v) => format!("i64 {}", v),
        ConstantValue::U64(v) => format!("u64 {}", v),
        ConstantValue::F64(v) => format!("f64 {}", v),
    }
}

fn format_payload(payload: Payload) -> String {
    match payload {
        Payload::String(r) => format!("string@{}", r.index()),
        Payload::LiteralArray(r) => format!("litarr@{}", r.index()),
        Payload::Function(r) => format!("function@{}", r.index()),
        Payload::Module(r) => format!("module@{}", r.index()),
        Payload::Import(r) => format!("import@{}", r.index()),
        Payload::Export(r) => format!("export@{}", r.index()),
        Payload::Class(r) => format!("class@{}", r.index()),
        Payload::Type(ty) => format!("type {}", ty.mangled()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FileId, FunctionRef};
    use crate::target::Mode;

    #[test]
    fn test_dump_lists_blocks_and_instructions() {
        let file = FileId::fresh();
        let mut g = Graph::new(file, FunctionRef::new(file, 4), Mode::Dynamic, 1);
        let body = g.create_empty_block();
        let (start, end) = (g.start_block(), g.end_block());
        g.block_append_succ(start, body).unwrap();
        g.block_append_succ(body, end).unwrap();
        let p = g.parameter(0).unwrap();
        let ret = g.dynamic_isa().unwrap().create_return(p).unwrap();
        g.block_add_inst_back(body, ret).unwrap();

        let text = g.pretty_print();
        assert!(text.contains("function 4"));
        assert!(text.contains("bb0: ; start"));
        assert!(text.contains("%1 = return %0"));
        assert!(text.contains("-> bb1"));
    }
}

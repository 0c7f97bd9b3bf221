//! Function body encoding
//!
//! A body is a serialized graph: the mode byte, the block table (successor
//! lists), then every placed instruction in block order. Detached or
//! removed instructions and removed blocks are dropped, and the survivors
//! are renumbered densely.

use super::graph::{BlockData, Graph, InstData};
use super::opcode::{ConditionCode, ConstantValue, Opcode, Payload};
use crate::codec::{AbcReader, AbcWriter, DecodeError};
use crate::file::File;
use crate::metadata::{
    ClassRef, ExportRef, FileId, FunctionRef, ImportRef, LiteralArrayRef, ModuleRef, StringRef,
    TypeId,
};
use crate::status::{KitError, KitResult};
use crate::target::Mode;
use rustc_hash::FxHashMap;

const NO_CC: u8 = 0xFF;

/// Encode a graph into body bytes
pub(crate) fn encode(graph: &Graph) -> KitResult<Vec<u8>> {
    let mut block_map = FxHashMap::default();
    for (old, _) in graph.blocks.iter().enumerate().filter(|(_, b)| !b.removed) {
        let new = block_map.len() as u32;
        block_map.insert(old as u32, new);
    }
    let mut inst_map = FxHashMap::default();
    for old in graph.attached_insts() {
        let new = inst_map.len() as u32;
        inst_map.insert(old, new);
    }

    let mut writer = AbcWriter::with_capacity(64 + graph.insts.len() * 16);
    writer.emit_u8(graph.mode.as_u8());
    writer.emit_u32(block_map.len() as u32);
    for block in graph.blocks.iter().filter(|b| !b.removed) {
        writer.emit_u32(block.succs.len() as u32);
        for succ in &block.succs {
            writer.emit_u32(block_map[succ]);
        }
    }

    writer.emit_u32(inst_map.len() as u32);
    for (old_block, block) in graph.blocks.iter().enumerate().filter(|(_, b)| !b.removed) {
        for &old in &block.insts {
            let inst = &graph.insts[old as usize];
            writer.emit_u32(block_map[&(old_block as u32)]);
            writer.emit_u16(inst.opcode.encode());
            writer.emit_u8(inst.cc.map_or(NO_CC, |cc| cc as u8));
            writer.emit_u32(inst.inputs.len() as u32);
            for input in &inst.inputs {
                let mapped = inst_map.get(input).ok_or_else(|| {
                    KitError::bad_argument(format!(
                        "%{} uses %{} which is not placed in a block",
                        old, input
                    ))
                })?;
                writer.emit_u32(*mapped);
            }
            writer.emit_u8(inst.imms.len() as u8);
            for imm in &inst.imms {
                writer.emit_u64(*imm);
            }
            encode_payload(&mut writer, inst.payload);
            encode_constant(&mut writer, inst.constant);
        }
    }
    Ok(writer.into_bytes())
}

fn encode_payload(writer: &mut AbcWriter, payload: Option<Payload>) {
    match payload {
        None => writer.emit_u8(0),
        Some(Payload::String(r)) => {
            writer.emit_u8(1);
            writer.emit_u32(r.index);
        }
        Some(Payload::LiteralArray(r)) => {
            writer.emit_u8(2);
            writer.emit_u32(r.index);
        }
        Some(Payload::Function(r)) => {
            writer.emit_u8(3);
            writer.emit_u32(r.index);
        }
        Some(Payload::Module(r)) => {
            writer.emit_u8(4);
            writer.emit_u32(r.index);
        }
        Some(Payload::Import(r)) => {
            writer.emit_u8(5);
            writer.emit_u32(r.index);
        }
        Some(Payload::Export(r)) => {
            writer.emit_u8(6);
            writer.emit_u32(r.index);
        }
        Some(Payload::Class(r)) => {
            writer.emit_u8(7);
            writer.emit_u32(r.index);
        }
        Some(Payload::Type(ty)) => {
            writer.emit_u8(8);
            writer.emit_u32(ty.as_u8() as u32);
        }
    }
}

fn encode_constant(writer: &mut AbcWriter, constant: Option<ConstantValue>) {
    match constant {
        None => writer.emit_u8(0),
        Some(ConstantValue::I32(v)) => {
            writer.emit_u8(1);
            writer.emit_u64(v as i64 as u64);
        }
        Some(ConstantValue::I64(v)) => {
            writer.emit_u8(2);
            writer.emit_u64(v as u64);
        }
        Some(ConstantValue::U64(v)) => {
            writer.emit_u8(3);
            writer.emit_u64(v);
        }
        Some(ConstantValue::F64(v)) => {
            writer.emit_u8(4);
            writer.emit_u64(v.to_bits());
        }
    }
}

/// Decode body bytes of `function` into a fresh graph
pub(crate) fn decode(bytes: &[u8], file: &File, function: FunctionRef) -> KitResult<Graph> {
    let mut reader = AbcReader::new(bytes);
    let offset = reader.position();
    let raw_mode = reader.read_u8()?;
    let mode = Mode::from_u8(raw_mode).ok_or(DecodeError::InvalidValue {
        what: "body mode",
        value: raw_mode as u64,
        offset,
    })?;
    if mode != file.mode {
        return Err(KitError::Internal(format!(
            "{} body stored in a {} file",
            mode, file.mode
        )));
    }

    let mut graph = Graph::bare(file.id, function, mode);
    let block_count = reader.read_count(4)?;
    if block_count < 2 {
        return Err(DecodeError::InvalidValue {
            what: "block count",
            value: block_count as u64,
            offset: reader.position(),
        }
        .into());
    }
    for _ in 0..block_count {
        let succs = reader.read_indices()?;
        if let Some(&bad) = succs.iter().find(|&&s| s as usize >= block_count) {
            return Err(DecodeError::DanglingReference {
                what: "block",
                index: bad,
            }
            .into());
        }
        graph.blocks.push(BlockData {
            succs,
            ..BlockData::default()
        });
    }
    for from in 0..block_count {
        for i in 0..graph.blocks[from].succs.len() {
            let to = graph.blocks[from].succs[i];
            graph.blocks[to as usize].preds.push(from as u32);
        }
    }

    let inst_count = reader.read_count(8)?;
    for index in 0..inst_count {
        let block = reader.read_u32()?;
        if block as usize >= block_count {
            return Err(DecodeError::DanglingReference {
                what: "block",
                index: block,
            }
            .into());
        }
        let offset = reader.position();
        let raw = reader.read_u16()?;
        let opcode = Opcode::decode(raw).ok_or(DecodeError::InvalidValue {
            what: "opcode",
            value: raw as u64,
            offset,
        })?;
        if let Some(family) = opcode.mode() {
            if family != mode {
                return Err(DecodeError::InvalidValue {
                    what: "opcode family",
                    value: raw as u64,
                    offset,
                }
                .into());
            }
        }
        let offset = reader.position();
        let raw_cc = reader.read_u8()?;
        let cc = match raw_cc {
            NO_CC => None,
            other => Some(ConditionCode::from_u8(other).ok_or(DecodeError::InvalidValue {
                what: "condition code",
                value: other as u64,
                offset,
            })?),
        };
        let inputs = reader.read_indices()?;
        if let Some(&bad) = inputs.iter().find(|&&i| i as usize >= inst_count) {
            return Err(DecodeError::DanglingReference {
                what: "instruction",
                index: bad,
            }
            .into());
        }
        let imm_count = reader.read_u8()?;
        let imms = (0..imm_count)
            .map(|_| reader.read_u64())
            .collect::<Result<Vec<_>, _>>()?;
        let payload = decode_payload(&mut reader, file)?;
        let constant = decode_constant(&mut reader)?;

        let mut data = InstData::new(opcode);
        data.inputs = inputs;
        data.imms = imms;
        data.payload = payload;
        data.constant = constant;
        data.cc = cc;
        data.block = Some(block);
        graph.insts.push(data);
        graph.blocks[block as usize].insts.push(index as u32);
    }
    if reader.has_more() {
        return Err(DecodeError::TrailingData(reader.position()).into());
    }
    Ok(graph)
}

fn decode_payload(reader: &mut AbcReader<'_>, file: &File) -> KitResult<Option<Payload>> {
    let offset = reader.position();
    let tag = reader.read_u8()?;
    if tag == 0 {
        return Ok(None);
    }
    let index = reader.read_u32()?;
    let id: FileId = file.id;
    let payload = match tag {
        1 => {
            let r = StringRef::new(id, index);
            file.string_to_str(r)?;
            Payload::String(r)
        }
        2 => {
            let r = LiteralArrayRef::new(id, index);
            file.literal_array(r)?;
            Payload::LiteralArray(r)
        }
        3 => {
            let r = FunctionRef::new(id, index);
            file.function(r)?;
            Payload::Function(r)
        }
        4 => {
            let r = ModuleRef::new(id, index);
            file.module(r)?;
            Payload::Module(r)
        }
        5 => {
            let r = ImportRef::new(id, index);
            file.import(r)?;
            Payload::Import(r)
        }
        6 => {
            let r = ExportRef::new(id, index);
            file.export(r)?;
            Payload::Export(r)
        }
        7 => {
            let r = ClassRef::new(id, index);
            file.class(r)?;
            Payload::Class(r)
        }
        8 => {
            let ty = u8::try_from(index)
                .ok()
                .and_then(TypeId::from_u8)
                .ok_or(DecodeError::InvalidValue {
                    what: "type id",
                    value: index as u64,
                    offset,
                })?;
            Payload::Type(ty)
        }
        other => {
            return Err(DecodeError::InvalidValue {
                what: "payload tag",
                value: other as u64,
                offset,
            }
            .into())
        }
    };
    Ok(Some(payload))
}

fn decode_constant(reader: &mut AbcReader<'_>) -> Result<Option<ConstantValue>, DecodeError> {
    let offset = reader.position();
    let tag = reader.read_u8()?;
    if tag == 0 {
        return Ok(None);
    }
    let bits = reader.read_u64()?;
    Ok(Some(match tag {
        1 => ConstantValue::I32(bits as i64 as i32),
        2 => ConstantValue::I64(bits as i64),
        3 => ConstantValue::U64(bits),
        4 => ConstantValue::F64(f64::from_bits(bits)),
        other => {
            return Err(DecodeError::InvalidValue {
                what: "constant tag",
                value: other as u64,
                offset,
            })
        }
    }))
}

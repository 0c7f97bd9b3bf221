//! Container format
//!
//! Layout:
//! - Header: magic (8 bytes) + version (4 bytes) + mode (u8) + flags (u32)
//!   + checksum (u32, CRC-32 of everything after the header)
//! - One section per entity table, in a fixed order. Each table is a slot
//!   count followed by slots; a slot is a presence byte and, when present,
//!   the record. Cross references are table indices, `NO_INDEX` for none.
//!
//! Function bodies are stored as opaque blobs and decoded on demand.

use super::{AbcReader, AbcWriter, DecodeError};
use crate::config::KitConfig;
use crate::file::File;
use crate::metadata::arena::Arena;
use crate::metadata::entities::{
    AnnotationData, AnnotationElementData, AnnotationInterfaceData, AnnotationInterfaceFieldData,
    ClassData, ExportData, FunctionData, ImportData, ModuleData, NamespaceData, Signature,
};
use crate::metadata::literal::{LiteralArrayData, LiteralData, LiteralTag, LiteralValue};
use crate::metadata::types::{TypeData, TypeId, ValueData, ValuePayload};
use crate::metadata::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationOwner,
    AnnotationRef, ClassRef, ExportRef, FileId, FunctionRef, ImportRef, LiteralArrayRef,
    LiteralRef, ModuleRef, NamespaceRef, StringRef, TypeRef, ValueRef,
};
use crate::status::KitResult;
use crate::target::{Mode, Target};
use crate::version::FileVersion;

/// Container magic
pub const MAGIC: [u8; 8] = *b"PANDA\0\0\0";

/// Header size: magic + version + mode + flags + checksum
pub const HEADER_SIZE: usize = 8 + 4 + 1 + 4 + 4;

/// Header flags
pub mod flags {
    /// At least one module targets an ArkTS back-end
    pub const HAS_ARKTS: u32 = 1 << 0;
    /// At least one module is external
    pub const HAS_EXTERNAL: u32 = 1 << 1;
}

// ----------------------------------------------------------------------
// Encoding
// ----------------------------------------------------------------------

/// Encode a file into container bytes
pub fn encode(file: &File) -> Vec<u8> {
    let mut writer = AbcWriter::with_capacity(4096);
    writer.emit_bytes(&MAGIC);
    writer.emit_bytes(&file.version.as_bytes());
    writer.emit_u8(file.mode.as_u8());
    writer.emit_u32(header_flags(file));
    let checksum_offset = writer.reserve_u32();

    writer.emit_u32(file.strings.len() as u32);
    for s in file.strings.iter() {
        writer.emit_string(s);
    }
    emit_slots(&mut writer, &file.literals, emit_literal);
    emit_slots(&mut writer, &file.literal_arrays, |w, a| {
        w.emit_indices(a.items.iter().map(|l| l.index));
    });
    emit_slots(&mut writer, &file.types, |w, t| {
        w.emit_u8(t.id.as_u8());
        w.emit_index(t.class.map(|c| c.index));
    });
    emit_slots(&mut writer, &file.values, emit_value);
    emit_slots(&mut writer, &file.modules, emit_module);
    emit_slots(&mut writer, &file.namespaces, |w, n| {
        w.emit_u32(n.name.index);
        w.emit_u32(n.module.index);
        w.emit_index(n.parent.map(|p| p.index));
        w.emit_indices(n.namespaces.iter().map(|x| x.index));
        w.emit_indices(n.classes.iter().map(|x| x.index));
        w.emit_indices(n.functions.iter().map(|x| x.index));
    });
    emit_slots(&mut writer, &file.classes, |w, c| {
        w.emit_u32(c.name.index);
        w.emit_u32(c.module.index);
        w.emit_index(c.parent_function.map(|x| x.index));
        w.emit_index(c.parent_namespace.map(|x| x.index));
        w.emit_index(c.super_class.map(|x| x.index));
        w.emit_indices(c.methods.iter().map(|x| x.index));
        w.emit_indices(c.annotations.iter().map(|x| x.index));
    });
    emit_slots(&mut writer, &file.functions, emit_function);
    emit_slots(&mut writer, &file.imports, |w, i| {
        w.emit_u32(i.module.index);
        w.emit_u32(i.imported.index);
        w.emit_u32(i.name.index);
        w.emit_u32(i.alias.index);
    });
    emit_slots(&mut writer, &file.exports, |w, e| {
        w.emit_u32(e.module.index);
        w.emit_u32(e.exported.index);
        w.emit_u32(e.name.index);
        w.emit_u32(e.alias.index);
    });
    emit_slots(&mut writer, &file.annotation_interfaces, |w, ai| {
        w.emit_u32(ai.module.index);
        w.emit_u32(ai.name.index);
        w.emit_indices(ai.fields.iter().map(|x| x.index));
    });
    emit_slots(&mut writer, &file.annotation_interface_fields, |w, f| {
        w.emit_u32(f.interface.index);
        w.emit_u32(f.name.index);
        w.emit_u32(f.ty.index);
        w.emit_index(f.default_value.map(|v| v.index));
    });
    emit_slots(&mut writer, &file.annotations, |w, a| {
        w.emit_u32(a.interface.index);
        match a.owner {
            AnnotationOwner::Class(c) => {
                w.emit_u8(0);
                w.emit_u32(c.index);
            }
            AnnotationOwner::Function(f) => {
                w.emit_u8(1);
                w.emit_u32(f.index);
            }
        }
        w.emit_indices(a.elements.iter().map(|x| x.index));
    });
    emit_slots(&mut writer, &file.annotation_elements, |w, e| {
        w.emit_u32(e.annotation.index);
        w.emit_u32(e.name.index);
        w.emit_u32(e.value.index);
    });

    let checksum = crc32fast::hash(&writer.buffer()[HEADER_SIZE..]);
    writer.patch_u32(checksum_offset, checksum);
    tracing::trace!(target: "abckit::file", id = %file.id, bytes = writer.offset(), checksum, "encoded container");
    writer.into_bytes()
}

fn header_flags(file: &File) -> u32 {
    let mut bits = 0;
    for (_, module) in file.modules.iter() {
        if module.target.is_arkts() {
            bits |= flags::HAS_ARKTS;
        }
        if module.is_external {
            bits |= flags::HAS_EXTERNAL;
        }
    }
    bits
}

fn emit_slots<T>(writer: &mut AbcWriter, arena: &Arena<T>, mut emit: impl FnMut(&mut AbcWriter, &T)) {
    writer.emit_u32(arena.len() as u32);
    for slot in arena.slots() {
        match slot {
            None => writer.emit_u8(0),
            Some(value) => {
                writer.emit_u8(1);
                emit(writer, value);
            }
        }
    }
}

fn emit_literal(writer: &mut AbcWriter, literal: &LiteralData) {
    writer.emit_u8(literal.tag.as_u8());
    match literal.value {
        LiteralValue::Bool(v) => {
            writer.emit_u8(0);
            writer.emit_bool(v);
        }
        LiteralValue::U8(v) => {
            writer.emit_u8(1);
            writer.emit_u8(v);
        }
        LiteralValue::U16(v) => {
            writer.emit_u8(2);
            writer.emit_u16(v);
        }
        LiteralValue::U32(v) => {
            writer.emit_u8(3);
            writer.emit_u32(v);
        }
        LiteralValue::U64(v) => {
            writer.emit_u8(4);
            writer.emit_u64(v);
        }
        LiteralValue::Float(v) => {
            writer.emit_u8(5);
            writer.emit_f32(v);
        }
        LiteralValue::Double(v) => {
            writer.emit_u8(6);
            writer.emit_f64(v);
        }
        LiteralValue::String(s) => {
            writer.emit_u8(7);
            writer.emit_u32(s.index);
        }
        LiteralValue::LiteralArray(a) => {
            writer.emit_u8(8);
            writer.emit_u32(a.index);
        }
        LiteralValue::Method(f) => {
            writer.emit_u8(9);
            writer.emit_u32(f.index);
        }
    }
}

fn emit_value(writer: &mut AbcWriter, value: &ValueData) {
    writer.emit_u32(value.ty.index);
    match value.payload {
        ValuePayload::U1(v) => {
            writer.emit_u8(0);
            writer.emit_bool(v);
        }
        ValuePayload::Double(v) => {
            writer.emit_u8(1);
            writer.emit_f64(v);
        }
        ValuePayload::String(s) => {
            writer.emit_u8(2);
            writer.emit_u32(s.index);
        }
        ValuePayload::LiteralArray(a) => {
            writer.emit_u8(3);
            writer.emit_u32(a.index);
        }
    }
}

fn emit_module(writer: &mut AbcWriter, module: &ModuleData) {
    writer.emit_u32(module.name.index);
    writer.emit_u32(module.target.as_u32());
    writer.emit_bool(module.is_external);
    writer.emit_indices(module.namespaces.iter().map(|x| x.index));
    writer.emit_indices(module.classes.iter().map(|x| x.index));
    writer.emit_indices(module.functions.iter().map(|x| x.index));
    writer.emit_indices(module.anonymous_functions.iter().map(|x| x.index));
    writer.emit_indices(module.annotation_interfaces.iter().map(|x| x.index));
    writer.emit_indices(module.imports.iter().map(|x| x.index));
    writer.emit_indices(module.exports.iter().map(|x| x.index));
}

fn emit_function(writer: &mut AbcWriter, function: &FunctionData) {
    writer.emit_u32(function.raw_name.index);
    writer.emit_u32(function.module.index);
    writer.emit_index(function.parent_function.map(|x| x.index));
    writer.emit_index(function.parent_class.map(|x| x.index));
    writer.emit_index(function.parent_namespace.map(|x| x.index));
    let bits = function.is_static as u8
        | (function.is_ctor as u8) << 1
        | (function.is_anonymous as u8) << 2;
    writer.emit_u8(bits);
    writer.emit_indices(function.nested_functions.iter().map(|x| x.index));
    writer.emit_indices(function.nested_classes.iter().map(|x| x.index));
    writer.emit_indices(function.annotations.iter().map(|x| x.index));
    match &function.signature {
        None => writer.emit_bool(false),
        Some(sig) => {
            writer.emit_bool(true);
            writer.emit_indices(sig.params.iter().map(|t| t.index));
            writer.emit_u32(sig.ret.index);
        }
    }
    writer.emit_u32(function.param_count);
    writer.emit_blob(&function.body);
}

// ----------------------------------------------------------------------
// Decoding
// ----------------------------------------------------------------------

/// Decode container bytes into a new file
pub fn decode(data: &[u8], config: &KitConfig) -> KitResult<File> {
    let mut reader = AbcReader::new(data);

    let magic = reader.read_bytes(MAGIC.len())?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic.into());
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(reader.read_bytes(4)?);
    let version = FileVersion(version);
    if !version.is_supported() {
        return Err(DecodeError::UnsupportedVersion(version.to_string()).into());
    }
    let offset = reader.position();
    let raw_mode = reader.read_u8()?;
    let mode = Mode::from_u8(raw_mode).ok_or(DecodeError::InvalidValue {
        what: "file mode",
        value: raw_mode as u64,
        offset,
    })?;
    let _flags = reader.read_u32()?;
    let stored = reader.read_u32()?;
    if config.file.verify_checksum {
        let actual = crc32fast::hash(&data[HEADER_SIZE..]);
        if stored != actual {
            return Err(DecodeError::ChecksumMismatch {
                expected: stored,
                actual,
            }
            .into());
        }
    }

    let mut file = File::empty(mode, config.clone());
    file.version = version;
    let id = file.id;

    let string_count = reader.read_count(4)?;
    for index in 0..string_count {
        let s = reader.read_string()?;
        // Duplicates would shift every later index.
        if file.strings.intern(&s) as usize != index {
            return Err(DecodeError::InvalidValue {
                what: "duplicate string",
                value: index as u64,
                offset: reader.position(),
            }
            .into());
        }
    }
    file.literals = read_slots(&mut reader, |r| read_literal(r, id))?;
    file.literal_arrays = read_slots(&mut reader, |r| {
        Ok(LiteralArrayData {
            items: refs(r.read_indices()?, id, LiteralRef::new),
        })
    })?;
    file.types = read_slots(&mut reader, |r| {
        let offset = r.position();
        let raw = r.read_u8()?;
        let ty = TypeId::from_u8(raw).ok_or(DecodeError::InvalidValue {
            what: "type id",
            value: raw as u64,
            offset,
        })?;
        Ok(TypeData {
            id: ty,
            class: r.read_index()?.map(|i| ClassRef::new(id, i)),
        })
    })?;
    file.values = read_slots(&mut reader, |r| read_value(r, id))?;
    file.modules = read_slots(&mut reader, |r| read_module(r, id))?;
    file.namespaces = read_slots(&mut reader, |r| {
        Ok(NamespaceData {
            name: StringRef::new(id, r.read_u32()?),
            module: ModuleRef::new(id, r.read_u32()?),
            parent: r.read_index()?.map(|i| NamespaceRef::new(id, i)),
            namespaces: refs(r.read_indices()?, id, NamespaceRef::new),
            classes: refs(r.read_indices()?, id, ClassRef::new),
            functions: refs(r.read_indices()?, id, FunctionRef::new),
        })
    })?;
    file.classes = read_slots(&mut reader, |r| {
        Ok(ClassData {
            name: StringRef::new(id, r.read_u32()?),
            module: ModuleRef::new(id, r.read_u32()?),
            parent_function: r.read_index()?.map(|i| FunctionRef::new(id, i)),
            parent_namespace: r.read_index()?.map(|i| NamespaceRef::new(id, i)),
            super_class: r.read_index()?.map(|i| ClassRef::new(id, i)),
            methods: refs(r.read_indices()?, id, FunctionRef::new),
            annotations: refs(r.read_indices()?, id, AnnotationRef::new),
        })
    })?;
    file.functions = read_slots(&mut reader, |r| read_function(r, id))?;
    file.imports = read_slots(&mut reader, |r| {
        Ok(ImportData {
            module: ModuleRef::new(id, r.read_u32()?),
            imported: ModuleRef::new(id, r.read_u32()?),
            name: StringRef::new(id, r.read_u32()?),
            alias: StringRef::new(id, r.read_u32()?),
        })
    })?;
    file.exports = read_slots(&mut reader, |r| {
        Ok(ExportData {
            module: ModuleRef::new(id, r.read_u32()?),
            exported: ModuleRef::new(id, r.read_u32()?),
            name: StringRef::new(id, r.read_u32()?),
            alias: StringRef::new(id, r.read_u32()?),
        })
    })?;
    file.annotation_interfaces = read_slots(&mut reader, |r| {
        Ok(AnnotationInterfaceData {
            module: ModuleRef::new(id, r.read_u32()?),
            name: StringRef::new(id, r.read_u32()?),
            fields: refs(r.read_indices()?, id, AnnotationInterfaceFieldRef::new),
        })
    })?;
    file.annotation_interface_fields = read_slots(&mut reader, |r| {
        Ok(AnnotationInterfaceFieldData {
            interface: AnnotationInterfaceRef::new(id, r.read_u32()?),
            name: StringRef::new(id, r.read_u32()?),
            ty: TypeRef::new(id, r.read_u32()?),
            default_value: r.read_index()?.map(|i| ValueRef::new(id, i)),
        })
    })?;
    file.annotations = read_slots(&mut reader, |r| {
        let interface = AnnotationInterfaceRef::new(id, r.read_u32()?);
        let offset = r.position();
        let owner = match r.read_u8()? {
            0 => AnnotationOwner::Class(ClassRef::new(id, r.read_u32()?)),
            1 => AnnotationOwner::Function(FunctionRef::new(id, r.read_u32()?)),
            other => {
                return Err(DecodeError::InvalidValue {
                    what: "annotation owner",
                    value: other as u64,
                    offset,
                })
            }
        };
        Ok(AnnotationData {
            interface,
            owner,
            elements: refs(r.read_indices()?, id, AnnotationElementRef::new),
        })
    })?;
    file.annotation_elements = read_slots(&mut reader, |r| {
        Ok(AnnotationElementData {
            annotation: AnnotationRef::new(id, r.read_u32()?),
            name: StringRef::new(id, r.read_u32()?),
            value: ValueRef::new(id, r.read_u32()?),
        })
    })?;

    if reader.has_more() {
        return Err(DecodeError::TrailingData(reader.position()).into());
    }
    check_links(&file)?;
    Ok(file)
}

fn refs<R>(indices: Vec<u32>, file: FileId, make: fn(FileId, u32) -> R) -> Vec<R> {
    indices.into_iter().map(|i| make(file, i)).collect()
}

fn read_slots<T>(
    reader: &mut AbcReader<'_>,
    mut read: impl FnMut(&mut AbcReader<'_>) -> Result<T, DecodeError>,
) -> Result<Arena<T>, DecodeError> {
    let count = reader.read_count(1)?;
    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        if reader.read_bool()? {
            slots.push(Some(read(reader)?));
        } else {
            slots.push(None);
        }
    }
    Ok(Arena::from_slots(slots))
}

fn read_literal(reader: &mut AbcReader<'_>, id: FileId) -> Result<LiteralData, DecodeError> {
    let offset = reader.position();
    let raw = reader.read_u8()?;
    let tag = LiteralTag::from_u8(raw).ok_or(DecodeError::InvalidValue {
        what: "literal tag",
        value: raw as u64,
        offset,
    })?;
    let offset = reader.position();
    let value = match reader.read_u8()? {
        0 => LiteralValue::Bool(reader.read_bool()?),
        1 => LiteralValue::U8(reader.read_u8()?),
        2 => LiteralValue::U16(reader.read_u16()?),
        3 => LiteralValue::U32(reader.read_u32()?),
        4 => LiteralValue::U64(reader.read_u64()?),
        5 => LiteralValue::Float(reader.read_f32()?),
        6 => LiteralValue::Double(reader.read_f64()?),
        7 => LiteralValue::String(StringRef::new(id, reader.read_u32()?)),
        8 => LiteralValue::LiteralArray(LiteralArrayRef::new(id, reader.read_u32()?)),
        9 => LiteralValue::Method(FunctionRef::new(id, reader.read_u32()?)),
        other => {
            return Err(DecodeError::InvalidValue {
                what: "literal payload",
                value: other as u64,
                offset,
            })
        }
    };
    let fits = tag.family().map_or(false, |family| value.fits(family));
    if !fits {
        return Err(DecodeError::InvalidValue {
            what: "literal payload for tag",
            value: raw as u64,
            offset,
        });
    }
    Ok(LiteralData { tag, value })
}

fn read_value(reader: &mut AbcReader<'_>, id: FileId) -> Result<ValueData, DecodeError> {
    let ty = TypeRef::new(id, reader.read_u32()?);
    let offset = reader.position();
    let payload = match reader.read_u8()? {
        0 => ValuePayload::U1(reader.read_bool()?),
        1 => ValuePayload::Double(reader.read_f64()?),
        2 => ValuePayload::String(StringRef::new(id, reader.read_u32()?)),
        3 => ValuePayload::LiteralArray(LiteralArrayRef::new(id, reader.read_u32()?)),
        other => {
            return Err(DecodeError::InvalidValue {
                what: "value payload",
                value: other as u64,
                offset,
            })
        }
    };
    Ok(ValueData { ty, payload })
}

fn read_module(reader: &mut AbcReader<'_>, id: FileId) -> Result<ModuleData, DecodeError> {
    let name = StringRef::new(id, reader.read_u32()?);
    let offset = reader.position();
    let raw = reader.read_u32()?;
    let target = Target::from_u32(raw).ok_or(DecodeError::InvalidValue {
        what: "module target",
        value: raw as u64,
        offset,
    })?;
    let mut module = ModuleData::new(name, target, reader.read_bool()?);
    module.namespaces = refs(reader.read_indices()?, id, NamespaceRef::new);
    module.classes = refs(reader.read_indices()?, id, ClassRef::new);
    module.functions = refs(reader.read_indices()?, id, FunctionRef::new);
    module.anonymous_functions = refs(reader.read_indices()?, id, FunctionRef::new);
    module.annotation_interfaces = refs(reader.read_indices()?, id, AnnotationInterfaceRef::new);
    module.imports = refs(reader.read_indices()?, id, ImportRef::new);
    module.exports = refs(reader.read_indices()?, id, ExportRef::new);
    Ok(module)
}

fn read_function(reader: &mut AbcReader<'_>, id: FileId) -> Result<FunctionData, DecodeError> {
    let raw_name = StringRef::new(id, reader.read_u32()?);
    let module = ModuleRef::new(id, reader.read_u32()?);
    let parent_function = reader.read_index()?.map(|i| FunctionRef::new(id, i));
    let parent_class = reader.read_index()?.map(|i| ClassRef::new(id, i));
    let parent_namespace = reader.read_index()?.map(|i| NamespaceRef::new(id, i));
    let offset = reader.position();
    let bits = reader.read_u8()?;
    if bits & !0b111 != 0 {
        return Err(DecodeError::InvalidValue {
            what: "function flags",
            value: bits as u64,
            offset,
        });
    }
    let nested_functions = refs(reader.read_indices()?, id, FunctionRef::new);
    let nested_classes = refs(reader.read_indices()?, id, ClassRef::new);
    let annotations = refs(reader.read_indices()?, id, AnnotationRef::new);
    let signature = if reader.read_bool()? {
        Some(Signature {
            params: refs(reader.read_indices()?, id, TypeRef::new),
            ret: TypeRef::new(id, reader.read_u32()?),
        })
    } else {
        None
    };
    Ok(FunctionData {
        raw_name,
        module,
        parent_function,
        parent_class,
        parent_namespace,
        is_static: bits & 1 != 0,
        is_ctor: bits & 2 != 0,
        is_anonymous: bits & 4 != 0,
        nested_functions,
        nested_classes,
        annotations,
        signature,
        param_count: reader.read_u32()?,
        body: reader.read_blob()?,
        attached: None,
    })
}

/// Reject references to missing or removed entities
fn check_links(file: &File) -> Result<(), DecodeError> {
    macro_rules! link {
        ($table:ident, $handle:expr) => {{
            let index = $handle.index;
            let live = file.$table.contains(index);
            if !live {
                return Err(DecodeError::DanglingReference {
                    what: stringify!($table),
                    index,
                });
            }
        }};
    }
    macro_rules! string {
        ($handle:expr) => {{
            let index = $handle.index;
            if file.strings.get(index).is_none() {
                return Err(DecodeError::DanglingReference {
                    what: "strings",
                    index,
                });
            }
        }};
    }

    for (_, literal) in file.literals.iter() {
        match literal.value {
            LiteralValue::String(s) => string!(s),
            LiteralValue::LiteralArray(a) => link!(literal_arrays, a),
            LiteralValue::Method(f) => link!(functions, f),
            _ => {}
        }
    }
    for (_, array) in file.literal_arrays.iter() {
        array.items.iter().try_for_each(|l| {
            link!(literals, l);
            Ok(())
        })?;
    }
    for (_, ty) in file.types.iter() {
        if let Some(class) = ty.class {
            link!(classes, class);
        }
    }
    for (_, value) in file.values.iter() {
        link!(types, value.ty);
        match value.payload {
            ValuePayload::String(s) => string!(s),
            ValuePayload::LiteralArray(a) => link!(literal_arrays, a),
            _ => {}
        }
    }
    for (_, module) in file.modules.iter() {
        string!(module.name);
        module.namespaces.iter().try_for_each(|x| {
            link!(namespaces, x);
            Ok(())
        })?;
        module.classes.iter().try_for_each(|x| {
            link!(classes, x);
            Ok(())
        })?;
        module
            .functions
            .iter()
            .chain(&module.anonymous_functions)
            .try_for_each(|x| {
                link!(functions, x);
                Ok(())
            })?;
        module.annotation_interfaces.iter().try_for_each(|x| {
            link!(annotation_interfaces, x);
            Ok(())
        })?;
        module.imports.iter().try_for_each(|x| {
            link!(imports, x);
            Ok(())
        })?;
        module.exports.iter().try_for_each(|x| {
            link!(exports, x);
            Ok(())
        })?;
    }
    for (_, ns) in file.namespaces.iter() {
        string!(ns.name);
        link!(modules, ns.module);
        if let Some(parent) = ns.parent {
            link!(namespaces, parent);
        }
    }
    for (_, class) in file.classes.iter() {
        string!(class.name);
        link!(modules, class.module);
        if let Some(sup) = class.super_class {
            link!(classes, sup);
        }
        class.methods.iter().try_for_each(|x| {
            link!(functions, x);
            Ok(())
        })?;
    }
    for (_, function) in file.functions.iter() {
        string!(function.raw_name);
        link!(modules, function.module);
        if let Some(parent) = function.parent_class {
            link!(classes, parent);
        }
        if let Some(parent) = function.parent_function {
            link!(functions, parent);
        }
        if let Some(sig) = &function.signature {
            link!(types, sig.ret);
            sig.params.iter().try_for_each(|t| {
                link!(types, t);
                Ok(())
            })?;
        }
    }
    for (_, import) in file.imports.iter() {
        link!(modules, import.module);
        link!(modules, import.imported);
        string!(import.name);
        string!(import.alias);
    }
    for (_, export) in file.exports.iter() {
        link!(modules, export.module);
        link!(modules, export.exported);
        string!(export.name);
        string!(export.alias);
    }
    for (_, field) in file.annotation_interface_fields.iter() {
        link!(annotation_interfaces, field.interface);
        link!(types, field.ty);
        string!(field.name);
        if let Some(value) = field.default_value {
            link!(values, value);
        }
    }
    for (_, annotation) in file.annotations.iter() {
        link!(annotation_interfaces, annotation.interface);
        match annotation.owner {
            AnnotationOwner::Class(c) => link!(classes, c),
            AnnotationOwner::Function(f) => link!(functions, f),
        }
    }
    for (_, element) in file.annotation_elements.iter() {
        link!(annotations, element.annotation);
        link!(values, element.value);
        string!(element.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn sample() -> File {
        let mut file = File::empty(Mode::Dynamic, KitConfig::default());
        let id = file.id;
        let name = file.create_string("m0");
        let m = file.modules.push(ModuleData::new(name, Target::Js, false));
        let s = file.create_string("hello");
        let lit = file.literals.push(LiteralData {
            tag: LiteralTag::String,
            value: LiteralValue::String(s),
        });
        file.literal_arrays.push(LiteralArrayData {
            items: vec![LiteralRef::new(id, lit)],
        });
        let removed = file.literals.push(LiteralData {
            tag: LiteralTag::U32,
            value: LiteralValue::U32(9),
        });
        file.literals.remove(removed);
        assert_eq!(m, 0);
        file
    }

    #[test]
    fn test_reopen_keeps_tables_and_tombstones() {
        let file = sample();
        let bytes = encode(&file);
        assert_eq!(&bytes[..8], &MAGIC);
        let reopened = decode(&bytes, &KitConfig::default()).unwrap();
        assert_ne!(reopened.id, file.id);
        assert_eq!(reopened.mode, Mode::Dynamic);
        assert_eq!(reopened.literals.len(), 2);
        assert!(!reopened.literals.contains(1));
        let module = reopened.modules.get(0).unwrap();
        assert_eq!(reopened.strings.get(module.name.index), Some("m0"));
        assert_eq!(module.name.file, reopened.id);
    }

    #[test]
    fn test_corruption_is_detected() {
        let mut bytes = encode(&sample());
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = decode(&bytes, &KitConfig::default()).unwrap_err();
        assert_eq!(err.status(), Status::IoError);

        let mut relaxed = KitConfig::default();
        relaxed.file.verify_checksum = false;
        let mut bytes = encode(&sample());
        bytes.push(0);
        assert!(matches!(
            decode(&bytes, &relaxed),
            Err(crate::KitError::Decode(DecodeError::TrailingData(_)))
        ));
    }

    #[test]
    fn test_bad_magic_and_truncation() {
        let bytes = encode(&sample());
        assert!(decode(&bytes[..5], &KitConfig::default()).is_err());
        let mut wrong = bytes.clone();
        wrong[0] = b'X';
        assert!(matches!(
            decode(&wrong, &KitConfig::default()),
            Err(crate::KitError::Decode(DecodeError::InvalidMagic))
        ));
    }
}

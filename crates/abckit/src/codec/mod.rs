//! Binary encoding primitives
//!
//! Little-endian writer/reader pair shared by the container format and the
//! function body encoding.

pub mod container;

use thiserror::Error;

/// Sentinel index for "no reference"
pub const NO_INDEX: u32 = u32::MAX;

/// Decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    #[error("Invalid magic number")]
    InvalidMagic,

    #[error("Unsupported container version {0}")]
    UnsupportedVersion(String),

    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// A discriminant byte had no meaning in its position
    #[error("Invalid {what} value {value} at offset {offset}")]
    InvalidValue {
        what: &'static str,
        value: u64,
        offset: usize,
    },

    /// An index pointed past the end of its table
    #[error("Dangling {what} reference {index}")]
    DanglingReference { what: &'static str, index: u32 },

    #[error("Trailing data at offset {0}")]
    TrailingData(usize),
}

/// Byte buffer writer
#[derive(Debug, Default)]
pub struct AbcWriter {
    pub(crate) buffer: Vec<u8>,
}

impl AbcWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Current write offset
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    pub fn emit_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn emit_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    pub fn emit_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit an optional index, `None` as [`NO_INDEX`]
    pub fn emit_index(&mut self, index: Option<u32>) {
        self.emit_u32(index.unwrap_or(NO_INDEX));
    }

    /// Emit a length-prefixed UTF-8 string
    pub fn emit_string(&mut self, value: &str) {
        self.emit_u32(value.len() as u32);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Emit a length-prefixed byte blob
    pub fn emit_blob(&mut self, bytes: &[u8]) {
        self.emit_u32(bytes.len() as u32);
        self.buffer.extend_from_slice(bytes);
    }

    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Emit a count-prefixed list of indices
    pub fn emit_indices(&mut self, indices: impl ExactSizeIterator<Item = u32>) {
        self.emit_u32(indices.len() as u32);
        for index in indices {
            self.emit_u32(index);
        }
    }

    /// Reserve space for a u32 value (returns offset for later patching)
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.offset();
        self.emit_u32(0);
        offset
    }

    /// Patch a u32 value at a specific offset
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        let bytes = value.to_le_bytes();
        self.buffer[offset..offset + 4].copy_from_slice(&bytes);
    }
}

/// Byte buffer reader
#[derive(Debug)]
pub struct AbcReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> AbcReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn has_more(&self) -> bool {
        self.position < self.buffer.len()
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        if count > self.remaining() {
            return Err(DecodeError::UnexpectedEnd(self.position));
        }
        let bytes = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let offset = self.position;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidValue {
                what: "bool",
                value: other as u64,
                offset,
            }),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read an optional index written by [`AbcWriter::emit_index`]
    pub fn read_index(&mut self) -> Result<Option<u32>, DecodeError> {
        let raw = self.read_u32()?;
        Ok((raw != NO_INDEX).then_some(raw))
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u32()? as usize;
        let start = self.position;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8(start))
    }

    /// Read a length-prefixed byte blob
    pub fn read_blob(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Read a fixed number of bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        self.take(count)
    }

    /// Read a count-prefixed list of indices
    pub fn read_indices(&mut self) -> Result<Vec<u32>, DecodeError> {
        let count = self.read_u32()? as usize;
        if count.saturating_mul(4) > self.remaining() {
            return Err(DecodeError::UnexpectedEnd(self.position));
        }
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Read a count prefix, rejecting counts the input cannot hold
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize, DecodeError> {
        let offset = self.position;
        let count = self.read_u32()? as usize;
        if count.saturating_mul(min_item_size) > self.remaining() {
            return Err(DecodeError::UnexpectedEnd(offset));
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_sequence() {
        let mut writer = AbcWriter::new();
        writer.emit_u8(7);
        writer.emit_u16(0x1234);
        writer.emit_string("enumerators0_dynamic");
        writer.emit_index(None);
        writer.emit_index(Some(3));
        writer.emit_f64(-0.5);
        writer.emit_indices([4u32, 5, 6].into_iter());

        let bytes = writer.into_bytes();
        let mut reader = AbcReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_string().unwrap(), "enumerators0_dynamic");
        assert_eq!(reader.read_index().unwrap(), None);
        assert_eq!(reader.read_index().unwrap(), Some(3));
        assert_eq!(reader.read_f64().unwrap(), -0.5);
        assert_eq!(reader.read_indices().unwrap(), vec![4, 5, 6]);
        assert!(!reader.has_more());
    }

    #[test]
    fn test_truncated_input() {
        let mut reader = AbcReader::new(&[1, 2]);
        assert!(matches!(reader.read_u32(), Err(DecodeError::UnexpectedEnd(0))));
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let mut writer = AbcWriter::new();
        writer.emit_u32(u32::MAX - 1);
        let bytes = writer.into_bytes();
        let mut reader = AbcReader::new(&bytes);
        assert!(reader.read_indices().is_err());
    }

    #[test]
    fn test_patch_u32() {
        let mut writer = AbcWriter::new();
        let at = writer.reserve_u32();
        writer.emit_u8(0xff);
        writer.patch_u32(at, 0xdead_beef);
        let bytes = writer.into_bytes();
        let mut reader = AbcReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 0xdead_beef);
    }

    #[test]
    fn test_invalid_bool() {
        let mut reader = AbcReader::new(&[2]);
        assert!(matches!(
            reader.read_bool(),
            Err(DecodeError::InvalidValue { what: "bool", .. })
        ));
    }
}

use super::{
    compact_length_size, guard_buffer, read_compact_length, read_int32_length, required,
    write_compact_length, write_compact_null, write_int32_length, Type, LENGTH_PREFIX_SIZE,
    NULL_LENGTH,
};
use crate::protocol::{Buffer, Result, Value};

/// NULLABLE_BYTES: INT32 length followed by that many bytes, or a length of
/// -1 and no content for null.
///
/// Only the unread part of a value is encoded: the length is the value's
/// `remaining()`, not its total length, so a partially consumed buffer writes
/// just its tail. The value itself is only borrowed and its cursor never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableBytes;

/// BYTES: like [`NullableBytes`] without the null marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bytes;

/// COMPACT_BYTES: unsigned varint N + 1 followed by N bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactBytes;

/// COMPACT_NULLABLE_BYTES: unsigned varint N + 1, 0 for null.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactNullableBytes;

impl Type for NullableBytes {
    type Value = Option<Buffer>;

    fn write(&self, value: &Option<Buffer>, destination: &mut Buffer) -> Result<()> {
        match value {
            None => destination.write_i32(NULL_LENGTH),
            Some(content) => {
                write_int32_length(content.remaining(), destination)?;
                destination.write(content.content())
            }
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<Buffer>> {
        match read_int32_length(source)? {
            None => Ok(None),
            Some(length) => Ok(Some(source.read(length)?.into())),
        }
    }

    fn size_of(&self, value: &Option<Buffer>) -> usize {
        LENGTH_PREFIX_SIZE + value.as_ref().map_or(0, Buffer::remaining)
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        guard_buffer(value)
    }
}

impl Type for Bytes {
    type Value = Buffer;

    fn write(&self, value: &Buffer, destination: &mut Buffer) -> Result<()> {
        write_int32_length(value.remaining(), destination)?;
        destination.write(value.content())
    }

    fn read(&self, source: &mut Buffer) -> Result<Buffer> {
        let length = required(read_int32_length(source)?)?;
        Ok(source.read(length)?.into())
    }

    fn size_of(&self, value: &Buffer) -> usize {
        LENGTH_PREFIX_SIZE + value.remaining()
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_buffer(value)
    }
}

impl Type for CompactBytes {
    type Value = Buffer;

    fn write(&self, value: &Buffer, destination: &mut Buffer) -> Result<()> {
        write_compact_length(value.remaining(), destination)?;
        destination.write(value.content())
    }

    fn read(&self, source: &mut Buffer) -> Result<Buffer> {
        let length = required(read_compact_length(source)?)?;
        Ok(source.read(length)?.into())
    }

    fn size_of(&self, value: &Buffer) -> usize {
        compact_length_size(value.remaining()) + value.remaining()
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_buffer(value)
    }
}

impl Type for CompactNullableBytes {
    type Value = Option<Buffer>;

    fn write(&self, value: &Option<Buffer>, destination: &mut Buffer) -> Result<()> {
        match value {
            None => write_compact_null(destination),
            Some(content) => CompactBytes.write(content, destination),
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<Buffer>> {
        match read_compact_length(source)? {
            None => Ok(None),
            Some(length) => Ok(Some(source.read(length)?.into())),
        }
    }

    fn size_of(&self, value: &Option<Buffer>) -> usize {
        value.as_ref().map_or(1, |content| CompactBytes.size_of(content))
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        guard_buffer(value)
    }
}

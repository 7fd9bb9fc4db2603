// https://kafka.apache.org/protocol.html#protocol_types

mod array;
mod binary;
mod primitive;
mod string;
mod varint;

use std::any::type_name;

pub use array::{ArrayOf, CompactArrayOf, CompactNullableArrayOf, NullableArrayOf};
pub use binary::{Bytes, CompactBytes, CompactNullableBytes, NullableBytes};
pub use primitive::{Boolean, Int16, Int32, Int64, Int8};
pub use string::{CompactNullableString, CompactString, KafkaString, NullableString};
pub use varint::{UnsignedVarInt, VarInt, VarLong};

use super::buffer::Buffer;
use super::error::{Error, Result};
use super::value::Value;

/// Length prefix that marks a null string, byte array or array.
pub const NULL_LENGTH: i32 = -1;
/// Width of the INT32 length prefix of BYTES, NULLABLE_BYTES and ARRAY.
pub const LENGTH_PREFIX_SIZE: usize = 4;
/// Width of the INT16 length prefix of STRING and NULLABLE_STRING.
pub const STRING_LENGTH_PREFIX_SIZE: usize = 2;

/// Codec for one kind of protocol field.
///
/// Implementations hold no state of their own: everything lives in the
/// buffer they are given and in the value, so one instance can serve any
/// number of (concurrent) calls as long as each call gets its own buffer.
///
/// Callers are expected to run `validate` on external input, then
/// `size_of` to allocate the destination, then `write`. Bounds failures
/// from the buffer are returned as-is.
pub trait Type {
    /// Strongly typed value; nullable types use `Option`.
    type Value;

    /// Appends the encoded `value` at the cursor of `destination`.
    fn write(&self, value: &Self::Value, destination: &mut Buffer) -> Result<()>;

    /// Decodes one value at the cursor of `source`, advancing past it.
    fn read(&self, source: &mut Buffer) -> Result<Self::Value>;

    /// Number of bytes `write` produces for `value`.
    fn size_of(&self, value: &Self::Value) -> usize;

    fn is_nullable(&self) -> bool {
        false
    }

    /// Checks that loosely-typed input has the shape this type encodes.
    fn validate(&self, value: &Value) -> Result<()>;
}

pub(crate) fn guard_buffer(value: &Value) -> Result<()> {
    if !value.is_object() {
        return Err(Error::incorrect_type("an object", value.kind()));
    }

    match value {
        Value::Buffer(_) => Ok(()),
        other => Err(Error::incorrect_class(type_name::<Buffer>(), other.kind())),
    }
}

pub(crate) fn guard_string(value: &Value) -> Result<()> {
    match value {
        Value::String(_) => Ok(()),
        other => Err(Error::incorrect_type("a string", other.kind())),
    }
}

pub(crate) fn guard_int(value: &Value, min: i64, max: i64) -> Result<()> {
    match value {
        Value::Int(n) if (min..=max).contains(n) => Ok(()),
        Value::Int(n) => {
            tracing::debug!(n, min, max, "integer out of range");
            Err(Error::SchemaValidationFailure(format!(
                "expected an integer between {min} and {max}, got {n}"
            )))
        }
        other => Err(Error::incorrect_type("an integer", other.kind())),
    }
}

pub(crate) fn write_int32_length(length: usize, destination: &mut Buffer) -> Result<()> {
    let length = i32::try_from(length).map_err(|_| Error::invalid_length(length as i64))?;
    destination.write_i32(length)
}

/// `None` for the null marker; other negative lengths are rejected.
pub(crate) fn read_int32_length(source: &mut Buffer) -> Result<Option<usize>> {
    match source.read_i32()? {
        NULL_LENGTH => Ok(None),
        length if length < 0 => Err(Error::invalid_length(length.into())),
        length => Ok(Some(length as usize)),
    }
}

pub(crate) fn write_int16_length(length: usize, destination: &mut Buffer) -> Result<()> {
    let length = i16::try_from(length).map_err(|_| Error::invalid_length(length as i64))?;
    destination.write_i16(length)
}

pub(crate) fn read_int16_length(source: &mut Buffer) -> Result<Option<usize>> {
    match source.read_i16()? {
        -1 => Ok(None),
        length if length < 0 => Err(Error::invalid_length(length.into())),
        length => Ok(Some(length as usize)),
    }
}

/// Compact lengths are stored as N + 1 in an unsigned varint; 0 means null.
pub(crate) fn write_compact_length(length: usize, destination: &mut Buffer) -> Result<()> {
    let encoded = u32::try_from(length)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| Error::invalid_length(length as i64))?;
    varint::write_raw(encoded.into(), destination)
}

pub(crate) fn write_compact_null(destination: &mut Buffer) -> Result<()> {
    varint::write_raw(0, destination)
}

pub(crate) fn read_compact_length(source: &mut Buffer) -> Result<Option<usize>> {
    match varint::read_unsigned(source)? {
        0 => Ok(None),
        n => Ok(Some(n as usize - 1)),
    }
}

pub(crate) fn compact_length_size(length: usize) -> usize {
    varint::raw_size(length as u64 + 1)
}

/// Non-nullable fields treat the null marker as a malformed length.
pub(crate) fn required(length: Option<usize>) -> Result<usize> {
    length.ok_or_else(|| Error::invalid_length(NULL_LENGTH.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_length_rejects_negative_values_other_than_null() {
        let mut src = Buffer::from_content([0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(read_int32_length(&mut src), Ok(None));
        assert_eq!(read_int32_length(&mut src), Err(Error::InvalidLength(-2)));
    }

    #[test]
    fn int16_length_overflow_is_rejected_on_write() {
        let mut dst = Buffer::allocate(2);
        assert_eq!(
            write_int16_length(40_000, &mut dst),
            Err(Error::InvalidLength(40_000))
        );
        assert_eq!(dst.position(), 0);
    }

    #[test]
    fn compact_lengths_are_offset_by_one() {
        let mut dst = Buffer::allocate(3);
        write_compact_null(&mut dst).unwrap();
        write_compact_length(0, &mut dst).unwrap();
        write_compact_length(3, &mut dst).unwrap();
        dst.reset();

        assert_eq!(dst.content(), &[0, 1, 4]);
        assert_eq!(read_compact_length(&mut dst), Ok(None));
        assert_eq!(read_compact_length(&mut dst), Ok(Some(0)));
        assert_eq!(read_compact_length(&mut dst), Ok(Some(3)));
        assert_eq!(compact_length_size(126), 1);
        assert_eq!(compact_length_size(127), 2);
    }

    #[test]
    fn buffer_guard_distinguishes_scalars_from_other_objects() {
        assert!(guard_buffer(&Value::Buffer(Buffer::allocate(0))).is_ok());

        let err = guard_buffer(&Value::Bool(false)).unwrap_err();
        assert!(err.to_string().contains("object"));

        let err = guard_buffer(&Value::Struct(vec![])).unwrap_err();
        assert!(err.to_string().contains(type_name::<Buffer>()));
    }

    #[test]
    fn int_guard_checks_range() {
        assert!(guard_int(&Value::Int(127), -128, 127).is_ok());
        assert!(guard_int(&Value::Int(128), -128, 127).is_err());
        assert!(guard_int(&Value::from("1"), -128, 127).is_err());
    }
}

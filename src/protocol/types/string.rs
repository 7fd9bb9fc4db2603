use super::{
    compact_length_size, guard_string, read_compact_length, read_int16_length, required,
    write_compact_length, write_compact_null, write_int16_length, Type,
    STRING_LENGTH_PREFIX_SIZE,
};
use crate::protocol::{Buffer, Error, Result, Value};

/// STRING: INT16 length N followed by N bytes of UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaString;

/// NULLABLE_STRING: like [`KafkaString`], a length of -1 means null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableString;

/// Represents a sequence of characters. First the length N + 1 is given as an UNSIGNED_VARINT.
/// Then N bytes follow which are the UTF-8 encoding of the character sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactString;

/// COMPACT_NULLABLE_STRING: a length of 0 means null.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactNullableString;

impl Type for KafkaString {
    type Value = String;

    fn write(&self, value: &String, destination: &mut Buffer) -> Result<()> {
        write_int16_length(value.len(), destination)?;
        destination.write(value.as_bytes())
    }

    fn read(&self, source: &mut Buffer) -> Result<String> {
        let length = required(read_int16_length(source)?)?;
        read_utf8(source, length)
    }

    fn size_of(&self, value: &String) -> usize {
        STRING_LENGTH_PREFIX_SIZE + value.len()
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_string(value)
    }
}

impl Type for NullableString {
    type Value = Option<String>;

    fn write(&self, value: &Option<String>, destination: &mut Buffer) -> Result<()> {
        match value {
            None => destination.write_i16(-1),
            Some(s) => KafkaString.write(s, destination),
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<String>> {
        read_int16_length(source)?
            .map(|length| read_utf8(source, length))
            .transpose()
    }

    fn size_of(&self, value: &Option<String>) -> usize {
        STRING_LENGTH_PREFIX_SIZE + value.as_ref().map_or(0, String::len)
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        guard_string(value)
    }
}

impl Type for CompactString {
    type Value = String;

    fn write(&self, value: &String, destination: &mut Buffer) -> Result<()> {
        write_compact_length(value.len(), destination)?;
        destination.write(value.as_bytes())
    }

    fn read(&self, source: &mut Buffer) -> Result<String> {
        let length = required(read_compact_length(source)?)?;
        read_utf8(source, length)
    }

    fn size_of(&self, value: &String) -> usize {
        compact_length_size(value.len()) + value.len()
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_string(value)
    }
}

impl Type for CompactNullableString {
    type Value = Option<String>;

    fn write(&self, value: &Option<String>, destination: &mut Buffer) -> Result<()> {
        match value {
            None => write_compact_null(destination),
            Some(s) => CompactString.write(s, destination),
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<String>> {
        read_compact_length(source)?
            .map(|length| read_utf8(source, length))
            .transpose()
    }

    fn size_of(&self, value: &Option<String>) -> usize {
        value.as_ref().map_or(1, |s| CompactString.size_of(s))
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        guard_string(value)
    }
}

fn read_utf8(source: &mut Buffer, length: usize) -> Result<String> {
    let bytes = source.read(length)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        tracing::debug!(length, "string field is not valid UTF-8");
        Error::InvalidUtf8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_wire_format() {
        let value = "kafka".to_string();
        let mut dst = Buffer::allocate(KafkaString.size_of(&value));
        KafkaString.write(&value, &mut dst).unwrap();
        dst.reset();

        assert_eq!(hex::encode(dst.content()), "00056b61666b61");
        assert_eq!(KafkaString.read(&mut dst), Ok(value));
    }

    #[test]
    fn nullable_string_uses_minus_one_for_null() {
        let mut dst = Buffer::allocate(2);
        NullableString.write(&None, &mut dst).unwrap();
        dst.reset();

        assert_eq!(dst.content(), &[0xff, 0xff]);
        assert_eq!(NullableString.read(&mut dst), Ok(None));
        assert_eq!(NullableString.size_of(&None), 2);
    }

    #[test]
    fn non_nullable_string_rejects_null_marker() {
        let mut src = Buffer::from_content([0xff, 0xff]);
        assert_eq!(KafkaString.read(&mut src), Err(Error::InvalidLength(-1)));

        let mut src = Buffer::from_content([0xff, 0xfe]);
        assert_eq!(NullableString.read(&mut src), Err(Error::InvalidLength(-2)));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let mut src = Buffer::from_content([0x00, 0x02, 0xc3, 0x28]);
        assert_eq!(KafkaString.read(&mut src), Err(Error::InvalidUtf8));
    }

    #[test]
    fn compact_string_wire_format() {
        let value = Some("foo".to_string());
        let mut dst = Buffer::allocate(CompactNullableString.size_of(&value) + 1);
        CompactNullableString.write(&value, &mut dst).unwrap();
        CompactNullableString.write(&None, &mut dst).unwrap();
        dst.reset();

        assert_eq!(hex::encode(dst.content()), "04666f6f00");
        assert_eq!(CompactNullableString.read(&mut dst), Ok(value));
        assert_eq!(CompactNullableString.read(&mut dst), Ok(None));
    }

    #[test]
    fn empty_compact_string() {
        let mut src = Buffer::from_content([0x01]);
        assert_eq!(CompactString.read(&mut src), Ok(String::new()));
        assert_eq!(CompactString.size_of(&String::new()), 1);
    }

    #[test]
    fn too_long_string_is_rejected_before_writing() {
        let value = "x".repeat(i16::MAX as usize + 1);
        let mut dst = Buffer::allocate(KafkaString.size_of(&value));

        assert_eq!(
            KafkaString.write(&value, &mut dst),
            Err(Error::InvalidLength(i16::MAX as i64 + 1))
        );
        assert_eq!(dst.position(), 0);
    }

    #[test]
    fn validation() {
        assert!(KafkaString.validate(&Value::from("a")).is_ok());
        assert!(KafkaString.validate(&Value::Null).is_err());
        assert!(NullableString.validate(&Value::Null).is_ok());
        assert!(CompactNullableString.validate(&Value::Null).is_ok());

        let err = CompactString.validate(&Value::Int(3)).unwrap_err();
        assert!(err.to_string().contains("string"));
    }
}

use super::{guard_int, Type};
use crate::protocol::{Buffer, Error, Result, Value};

const MAX_VARINT_WIDTH: usize = 5;
const MAX_VARLONG_WIDTH: usize = 10;

/// UNSIGNED_VARINT: LEB128, 7 bits per byte, high bit set on all but the last byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsignedVarInt;

/// VARINT: zig-zag encoded `i32` stored as an unsigned varint.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarInt;

/// VARLONG: zig-zag encoded `i64`, up to 10 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarLong;

impl Type for UnsignedVarInt {
    type Value = u32;

    fn write(&self, value: &u32, destination: &mut Buffer) -> Result<()> {
        write_raw((*value).into(), destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<u32> {
        read_unsigned(source)
    }

    fn size_of(&self, value: &u32) -> usize {
        raw_size((*value).into())
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_int(value, 0, u32::MAX.into())
    }
}

impl Type for VarInt {
    type Value = i32;

    fn write(&self, value: &i32, destination: &mut Buffer) -> Result<()> {
        write_raw(zigzag32(*value).into(), destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<i32> {
        let n = read_unsigned(source)?;
        Ok((n >> 1) as i32 ^ -((n & 1) as i32))
    }

    fn size_of(&self, value: &i32) -> usize {
        raw_size(zigzag32(*value).into())
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_int(value, i32::MIN.into(), i32::MAX.into())
    }
}

impl Type for VarLong {
    type Value = i64;

    fn write(&self, value: &i64, destination: &mut Buffer) -> Result<()> {
        write_raw(zigzag64(*value), destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<i64> {
        let n = read_raw(source, MAX_VARLONG_WIDTH)?;
        Ok((n >> 1) as i64 ^ -((n & 1) as i64))
    }

    fn size_of(&self, value: &i64) -> usize {
        raw_size(zigzag64(*value))
    }

    fn validate(&self, value: &Value) -> Result<()> {
        guard_int(value, i64::MIN, i64::MAX)
    }
}

fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

pub(super) fn raw_size(value: u64) -> usize {
    let bits = (64 - value.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

/// Encodes into a scratch array first so a short destination is left untouched.
pub(super) fn write_raw(mut value: u64, destination: &mut Buffer) -> Result<()> {
    let mut encoded = [0u8; MAX_VARLONG_WIDTH];
    let mut width = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            encoded[width] = byte;
            width += 1;
            break;
        }
        encoded[width] = byte | 0x80;
        width += 1;
    }
    destination.write(&encoded[..width])
}

pub(super) fn read_unsigned(source: &mut Buffer) -> Result<u32> {
    let n = read_raw(source, MAX_VARINT_WIDTH)?;
    u32::try_from(n).map_err(|_| overflow())
}

/// Decodes from the unread content before consuming, so the cursor only
/// moves once a complete varint was found.
fn read_raw(source: &mut Buffer, max_width: usize) -> Result<u64> {
    let mut value = 0u64;
    let mut width = None;
    for (i, byte) in source.content().iter().take(max_width).enumerate() {
        if i == MAX_VARLONG_WIDTH - 1 && *byte > 1 {
            return Err(overflow());
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            width = Some(i + 1);
            break;
        }
    }

    match width {
        Some(width) => {
            source.skip(width)?;
            Ok(value)
        }
        None if source.remaining() >= max_width => Err(overflow()),
        None => Err(Error::not_enough_bytes(
            source.remaining() + 1,
            source.remaining(),
        )),
    }
}

fn overflow() -> Error {
    tracing::debug!("variable-length integer overflow");
    Error::VarIntOverflow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: Type>(ty: T, value: T::Value) -> Vec<u8> {
        let mut dst = Buffer::allocate(ty.size_of(&value));
        ty.write(&value, &mut dst).unwrap();
        assert_eq!(dst.remaining(), 0);
        dst.freeze().to_vec()
    }

    #[test]
    fn unsigned_varint_wire_format() {
        assert_eq!(encode(UnsignedVarInt, 0), [0x00]);
        assert_eq!(encode(UnsignedVarInt, 1), [0x01]);
        assert_eq!(encode(UnsignedVarInt, 127), [0x7f]);
        assert_eq!(encode(UnsignedVarInt, 128), [0x80, 0x01]);
        assert_eq!(encode(UnsignedVarInt, 300), [0xac, 0x02]);
        assert_eq!(encode(UnsignedVarInt, u32::MAX), [0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn zigzag_wire_format() {
        assert_eq!(encode(VarInt, 0), [0x00]);
        assert_eq!(encode(VarInt, -1), [0x01]);
        assert_eq!(encode(VarInt, 1), [0x02]);
        assert_eq!(encode(VarInt, -64), [0x7f]);
        assert_eq!(encode(VarInt, 64), [0x80, 0x01]);
        assert_eq!(encode(VarLong, i64::MIN).len(), 10);
    }

    #[test]
    fn read_zigzag() {
        let mut src = Buffer::from_content([0x01, 0x02, 0x80, 0x01]);
        assert_eq!(VarInt.read(&mut src), Ok(-1));
        assert_eq!(VarInt.read(&mut src), Ok(1));
        assert_eq!(VarLong.read(&mut src), Ok(64));
        assert_eq!(src.remaining(), 0);

        let mut src = Buffer::from_content(encode(VarLong, i64::MIN));
        assert_eq!(VarLong.read(&mut src), Ok(i64::MIN));
    }

    #[test]
    fn truncated_varint_does_not_move_the_cursor() {
        let mut src = Buffer::from_content([0x80, 0x80]);
        assert!(matches!(
            UnsignedVarInt.read(&mut src),
            Err(Error::NotEnoughBytesAllocated { .. })
        ));
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let mut src = Buffer::from_content([0xff; 6]);
        assert_eq!(UnsignedVarInt.read(&mut src), Err(Error::VarIntOverflow));

        // five bytes, but the value does not fit 32 bits
        let mut src = Buffer::from_content([0xff, 0xff, 0xff, 0xff, 0x1f]);
        assert_eq!(UnsignedVarInt.read(&mut src), Err(Error::VarIntOverflow));
    }

    #[test]
    fn short_destination_is_left_untouched() {
        let mut dst = Buffer::allocate(1);
        assert!(UnsignedVarInt.write(&300, &mut dst).is_err());
        assert_eq!(dst.position(), 0);
    }

    #[test]
    fn validate_ranges() {
        assert!(UnsignedVarInt.validate(&Value::Int(-1)).is_err());
        assert!(UnsignedVarInt.validate(&Value::Int(u32::MAX.into())).is_ok());
        assert!(VarInt.validate(&Value::Int(i64::from(i32::MAX) + 1)).is_err());
        assert!(VarLong.validate(&Value::Int(i64::MIN)).is_ok());
        assert!(VarLong.validate(&Value::Null).is_err());
    }
}

use super::{guard_int, Type};
use crate::protocol::{Buffer, Error, Result, Value};

/// BOOLEAN: a single byte, 0 for false and 1 for true.
/// Any non-zero byte decodes as true.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Type for Boolean {
    type Value = bool;

    fn write(&self, value: &bool, destination: &mut Buffer) -> Result<()> {
        destination.write_u8((*value).into())
    }

    fn read(&self, source: &mut Buffer) -> Result<bool> {
        Ok(source.read_u8()? != 0)
    }

    fn size_of(&self, _value: &bool) -> usize {
        1
    }

    fn validate(&self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(_) => Ok(()),
            other => Err(Error::incorrect_type("a boolean", other.kind())),
        }
    }
}

macro_rules! fixed_width_int {
    ($($(#[$doc:meta])* $name:ident => $ty:ty, $write:ident, $read:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl Type for $name {
                type Value = $ty;

                fn write(&self, value: &$ty, destination: &mut Buffer) -> Result<()> {
                    destination.$write(*value)
                }

                fn read(&self, source: &mut Buffer) -> Result<$ty> {
                    source.$read()
                }

                fn size_of(&self, _value: &$ty) -> usize {
                    std::mem::size_of::<$ty>()
                }

                fn validate(&self, value: &Value) -> Result<()> {
                    guard_int(value, <$ty>::MIN.into(), <$ty>::MAX.into())
                }
            }
        )*
    };
}

fixed_width_int! {
    /// INT8
    Int8 => i8, write_i8, read_i8;
    /// INT16: big-endian, e.g. API keys and error codes.
    Int16 => i16, write_i16, read_i16;
    /// INT32: big-endian, e.g. correlation ids and length prefixes.
    Int32 => i32, write_i32, read_i32;
    /// INT64: big-endian, e.g. offsets and timestamps.
    Int64 => i64, write_i64, read_i64;
}

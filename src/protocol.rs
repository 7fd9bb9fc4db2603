pub mod buffer;
pub mod error;
pub mod types;
pub mod value;

pub use buffer::Buffer;
pub use error::{Error, Result};
pub use types::Type;
pub use value::Value;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// https://kafka.apache.org/protocol.html#protocol_error_codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i16)]
pub enum ErrorCode {
    None = 0,
    /// The message contents do not match the expected encoding.
    CorruptMessage = 2,
    InvalidRequest = 42,
}

/// Sizes a buffer for `value`, writes it and rewinds the cursor, ready to be
/// read back or frozen for the transport.
pub fn encode<T: Type>(ty: &T, value: &T::Value) -> Result<Buffer> {
    let size = ty.size_of(value);
    let mut buffer = Buffer::allocate(size);
    ty.write(value, &mut buffer)?;
    debug_assert_eq!(buffer.remaining(), 0, "size_of disagrees with write");
    tracing::trace!(size, "encoded value");
    buffer.reset();
    Ok(buffer)
}

/// Reads one `T` from the cursor of `source`.
pub fn decode<T: Type>(ty: &T, source: &mut Buffer) -> Result<T::Value> {
    ty.read(source)
}

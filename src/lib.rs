//! Encoders and decoders for the Kafka wire protocol types.
//!
//! Values are written into and read out of a fixed-size [`Buffer`] by a
//! stateless [`Type`] per field kind. Sizing happens up front through
//! [`Type::size_of`], so the buffer never has to grow.
//!
//! ```
//! use kafka_protocol_codec::protocol::types::NullableBytes;
//! use kafka_protocol_codec::{Buffer, Type};
//!
//! let value = Some(Buffer::from_content("1234"));
//! let mut message = Buffer::allocate(NullableBytes.size_of(&value));
//! NullableBytes.write(&value, &mut message).unwrap();
//!
//! message.reset();
//! assert_eq!(NullableBytes.read(&mut message).unwrap(), value);
//! ```

pub mod protocol;

pub use protocol::{Buffer, Error, ErrorCode, Result, Type, Value};

use thiserror::Error;

use super::ErrorCode;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while encoding, decoding or validating protocol values.
///
/// None of these are recovered from inside the codec; they abort the
/// encode/decode of the whole message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read or write would go past the end of the buffer.
    #[error("not enough bytes allocated: {required} required, {remaining} remaining")]
    NotEnoughBytesAllocated { required: usize, remaining: usize },

    /// The value handed to `Type::validate` does not have the expected shape.
    #[error("schema validation failure: {0}")]
    SchemaValidationFailure(String),

    /// A length (or count) prefix is negative, or too large for its wire width.
    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("string content is not valid UTF-8")]
    InvalidUtf8,

    #[error("variable-length integer is longer than its maximum width")]
    VarIntOverflow,
}

impl Error {
    pub(crate) fn not_enough_bytes(required: usize, remaining: usize) -> Self {
        tracing::trace!(required, remaining, "buffer bounds exceeded");
        Error::NotEnoughBytesAllocated {
            required,
            remaining,
        }
    }

    pub(crate) fn incorrect_type(expected: &str, actual: &str) -> Self {
        tracing::debug!(expected, actual, "value rejected by schema validation");
        Error::SchemaValidationFailure(format!("expected {expected}, got {actual}"))
    }

    pub(crate) fn incorrect_class(expected: &str, actual: &str) -> Self {
        tracing::debug!(expected, actual, "value rejected by schema validation");
        Error::SchemaValidationFailure(format!(
            "expected an instance of {expected}, got {actual}"
        ))
    }

    pub(crate) fn invalid_length(length: i64) -> Self {
        tracing::debug!(length, "invalid length prefix");
        Error::InvalidLength(length)
    }

    /// Maps the failure to the Kafka error code a broker would answer with.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::SchemaValidationFailure(_) => ErrorCode::InvalidRequest,
            Error::NotEnoughBytesAllocated { .. }
            | Error::InvalidLength(_)
            | Error::InvalidUtf8
            | Error::VarIntOverflow => ErrorCode::CorruptMessage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_expectation() {
        let err = Error::incorrect_type("an object", "bool");
        assert_eq!(
            err.to_string(),
            "schema validation failure: expected an object, got bool"
        );

        let err = Error::not_enough_bytes(4, 0);
        assert_eq!(
            err.to_string(),
            "not enough bytes allocated: 4 required, 0 remaining"
        );
    }

    #[test]
    fn codes() {
        assert_eq!(
            i16::from(Error::not_enough_bytes(1, 0).code()),
            2,
            "CORRUPT_MESSAGE"
        );
        assert_eq!(i16::from(Error::InvalidUtf8.code()), 2);
        assert_eq!(
            i16::from(Error::incorrect_type("a string", "int").code()),
            42,
            "INVALID_REQUEST"
        );
    }
}

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::error::{Error, Result};

/// Fixed-capacity byte storage with a read/write cursor.
///
/// Every access is bounds-checked against the storage length: a read or
/// write of width `w` at position `p` needs `p + w <= length`, otherwise it
/// fails with [`Error::NotEnoughBytesAllocated`] and the cursor stays where
/// it was. The storage never grows.
///
/// Two buffers compare equal when the bytes from their cursors to their ends
/// match, whatever the cursor positions are.
#[derive(Clone, Default)]
pub struct Buffer {
    storage: BytesMut,
    position: usize,
}

macro_rules! primitive_accessors {
    ($($ty:ty => $write:ident / $put:ident, $read:ident / $get:ident;)*) => {
        $(
            #[doc = concat!("Writes a big-endian `", stringify!($ty), "` and advances the cursor.")]
            pub fn $write(&mut self, value: $ty) -> Result<()> {
                let width = std::mem::size_of::<$ty>();
                self.ensure(width)?;
                (&mut self.storage[self.position..]).$put(value);
                self.position += width;
                Ok(())
            }

            #[doc = concat!("Reads a big-endian `", stringify!($ty), "` and advances the cursor.")]
            pub fn $read(&mut self) -> Result<$ty> {
                let width = std::mem::size_of::<$ty>();
                self.ensure(width)?;
                let value = (&self.storage[self.position..]).$get();
                self.position += width;
                Ok(value)
            }
        )*
    };
}

impl Buffer {
    /// Zero-filled storage of exactly `capacity` bytes, cursor at 0.
    pub fn allocate(capacity: usize) -> Self {
        Self {
            storage: BytesMut::zeroed(capacity),
            position: 0,
        }
    }

    /// Storage initialized with a copy of `content`, cursor at 0.
    pub fn from_content(content: impl AsRef<[u8]>) -> Self {
        Self {
            storage: BytesMut::from(content.as_ref()),
            position: 0,
        }
    }

    primitive_accessors! {
        u8 => write_u8 / put_u8, read_u8 / get_u8;
        i8 => write_i8 / put_i8, read_i8 / get_i8;
        i16 => write_i16 / put_i16, read_i16 / get_i16;
        i32 => write_i32 / put_i32, read_i32 / get_i32;
        i64 => write_i64 / put_i64, read_i64 / get_i64;
        u32 => write_u32 / put_u32, read_u32 / get_u32;
    }

    /// Copies `src` to the cursor and advances past it.
    pub fn write(&mut self, src: &[u8]) -> Result<()> {
        self.ensure(src.len())?;
        let end = self.position + src.len();
        self.storage[self.position..end].copy_from_slice(src);
        self.position = end;
        Ok(())
    }

    /// Reads exactly `n` bytes from the cursor and advances past them.
    pub fn read(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let end = self.position + n;
        let bytes = Bytes::copy_from_slice(&self.storage[self.position..end]);
        self.position = end;
        Ok(bytes)
    }

    /// Advances the cursor by `n` bytes without copying them out.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.position += n;
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewinds the cursor to the start of the storage.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Bytes between the cursor and the end of the storage.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.position
    }

    pub fn length(&self) -> usize {
        self.storage.len()
    }

    pub fn capacity(&self) -> usize {
        self.length()
    }

    /// The bytes between the cursor and the end of the storage.
    pub fn content(&self) -> &[u8] {
        &self.storage[self.position..]
    }

    /// Hands the whole storage over, e.g. to the transport.
    pub fn freeze(self) -> Bytes {
        self.storage.freeze()
    }

    fn ensure(&self, width: usize) -> Result<()> {
        let remaining = self.remaining();
        if width > remaining {
            return Err(Error::not_enough_bytes(width, remaining));
        }
        Ok(())
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.content() == other.content()
    }
}

impl Eq for Buffer {}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("position", &self.position)
            .field("length", &self.storage.len())
            .field("content", &hex::encode(self.content()))
            .finish()
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self::from_content(bytes)
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_content(bytes)
    }
}

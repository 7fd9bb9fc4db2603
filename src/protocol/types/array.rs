use super::{
    compact_length_size, read_compact_length, read_int32_length, required, write_compact_length,
    write_compact_null, write_int32_length, Type, LENGTH_PREFIX_SIZE, NULL_LENGTH,
};
use crate::protocol::{Buffer, Error, Result, Value};

/// ARRAY: INT32 item count followed by the items, each encoded with `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayOf<T>(pub T);

/// Nullable ARRAY: a count of -1 means null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableArrayOf<T>(pub T);

// Represents a sequence of objects of a given type T. Type T can be either a primitive type (e.g. STRING) or a structure.
// First, the length N + 1 is given as an UNSIGNED_VARINT. Then N instances of type T follow.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactArrayOf<T>(pub T);

/// COMPACT_ARRAY that may be null, represented with a length of 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactNullableArrayOf<T>(pub T);

impl<T: Type> Type for ArrayOf<T> {
    type Value = Vec<T::Value>;

    fn write(&self, items: &Vec<T::Value>, destination: &mut Buffer) -> Result<()> {
        write_int32_length(items.len(), destination)?;
        write_items(&self.0, items, destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<Vec<T::Value>> {
        let count = required(read_int32_length(source)?)?;
        read_items(&self.0, count, source)
    }

    fn size_of(&self, items: &Vec<T::Value>) -> usize {
        LENGTH_PREFIX_SIZE + items_size(&self.0, items)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        validate_items(&self.0, value)
    }
}

impl<T: Type> Type for NullableArrayOf<T> {
    type Value = Option<Vec<T::Value>>;

    fn write(&self, items: &Option<Vec<T::Value>>, destination: &mut Buffer) -> Result<()> {
        match items {
            None => destination.write_i32(NULL_LENGTH),
            Some(items) => ArrayOf(&self.0).write(items, destination),
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<Vec<T::Value>>> {
        read_int32_length(source)?
            .map(|count| read_items(&self.0, count, source))
            .transpose()
    }

    fn size_of(&self, items: &Option<Vec<T::Value>>) -> usize {
        LENGTH_PREFIX_SIZE + items.as_ref().map_or(0, |items| items_size(&self.0, items))
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        validate_items(&self.0, value)
    }
}

impl<T: Type> Type for CompactArrayOf<T> {
    type Value = Vec<T::Value>;

    fn write(&self, items: &Vec<T::Value>, destination: &mut Buffer) -> Result<()> {
        write_compact_length(items.len(), destination)?;
        write_items(&self.0, items, destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<Vec<T::Value>> {
        let count = required(read_compact_length(source)?)?;
        read_items(&self.0, count, source)
    }

    fn size_of(&self, items: &Vec<T::Value>) -> usize {
        compact_length_size(items.len()) + items_size(&self.0, items)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        validate_items(&self.0, value)
    }
}

impl<T: Type> Type for CompactNullableArrayOf<T> {
    type Value = Option<Vec<T::Value>>;

    fn write(&self, items: &Option<Vec<T::Value>>, destination: &mut Buffer) -> Result<()> {
        match items {
            None => write_compact_null(destination),
            Some(items) => CompactArrayOf(&self.0).write(items, destination),
        }
    }

    fn read(&self, source: &mut Buffer) -> Result<Option<Vec<T::Value>>> {
        read_compact_length(source)?
            .map(|count| read_items(&self.0, count, source))
            .transpose()
    }

    fn size_of(&self, items: &Option<Vec<T::Value>>) -> usize {
        items
            .as_ref()
            .map_or(1, |items| CompactArrayOf(&self.0).size_of(items))
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        validate_items(&self.0, value)
    }
}

/// Lets the nullable wrappers delegate to the plain ones without cloning the element type.
impl<T: Type> Type for &T {
    type Value = T::Value;

    fn write(&self, value: &T::Value, destination: &mut Buffer) -> Result<()> {
        (**self).write(value, destination)
    }

    fn read(&self, source: &mut Buffer) -> Result<T::Value> {
        (**self).read(source)
    }

    fn size_of(&self, value: &T::Value) -> usize {
        (**self).size_of(value)
    }

    fn is_nullable(&self) -> bool {
        (**self).is_nullable()
    }

    fn validate(&self, value: &Value) -> Result<()> {
        (**self).validate(value)
    }
}

fn write_items<T: Type>(element: &T, items: &[T::Value], destination: &mut Buffer) -> Result<()> {
    items
        .iter()
        .try_for_each(|item| element.write(item, destination))
}

fn read_items<T: Type>(element: &T, count: usize, source: &mut Buffer) -> Result<Vec<T::Value>> {
    // every item takes at least one byte, so a count beyond that is a truncated source
    let mut items = Vec::with_capacity(count.min(source.remaining()));
    for _ in 0..count {
        items.push(element.read(source)?);
    }
    Ok(items)
}

fn items_size<T: Type>(element: &T, items: &[T::Value]) -> usize {
    items.iter().map(|item| element.size_of(item)).sum()
}

fn validate_items<T: Type>(element: &T, value: &Value) -> Result<()> {
    match value {
        Value::Array(items) => items.iter().try_for_each(|item| element.validate(item)),
        other => Err(Error::incorrect_type("an array", other.kind())),
    }
}

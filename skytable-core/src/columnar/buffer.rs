//! This module defines [Buffer], a payload together with its invalid elements.

use std::ops::Range;

use num::complex::Complex64;

use crate::{
    datatypes::{Element, Number, NumericType},
    error::Error,
    util::Mask,
};

use super::{
    data::{forward_to_numeric, ColumnData},
    Array, NullSentinel,
};

fn typed_mut<T: Element>(data: &mut ColumnData) -> Result<&mut Vec<T>, Error> {
    let found = data.describe();
    T::values_mut(data).ok_or_else(|| Error::type_mismatch(found, std::any::type_name::<T>()))
}

/// Payload of a column or array, together with the set of its invalid elements.
///
/// For strings and arrays, a slot is invalid exactly if it holds [None].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Buffer {
    data: ColumnData,
    invalid: Mask,
}

impl Buffer {
    /// Create a [Buffer] in which every element is invalid.
    pub(crate) fn invalid(data: ColumnData) -> Self {
        let len = data.len();
        Self {
            data,
            invalid: Mask::full(len),
        }
    }

    /// Create a [Buffer] in which every element is valid.
    pub(crate) fn valid(data: ColumnData) -> Self {
        let len = data.len();
        Self {
            data,
            invalid: Mask::empty(len),
        }
    }

    /// Create a [Buffer] from its parts.
    pub(crate) fn from_parts(data: ColumnData, invalid: Mask) -> Self {
        debug_assert_eq!(data.len(), invalid.len());
        Self { data, invalid }
    }

    /// Create a [Buffer] of strings, [None] entries are invalid.
    pub(crate) fn from_strings(values: Vec<Option<String>>) -> Self {
        let invalid = Mask::from_bits(values.iter().map(Option::is_none).collect());
        Self {
            data: ColumnData::Text(values),
            invalid,
        }
    }

    pub(crate) fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    /// Move the payload out, leaving an empty buffer behind.
    pub(crate) fn take_data(&mut self) -> ColumnData {
        self.invalid = Mask::empty(0);
        std::mem::take(&mut self.data)
    }

    pub(crate) fn invalid_mask(&self) -> &Mask {
        &self.invalid
    }

    pub(crate) fn len(&self) -> usize {
        self.invalid.len()
    }

    pub(crate) fn count_invalid(&self) -> usize {
        self.invalid.count()
    }

    pub(crate) fn has_invalid(&self) -> bool {
        !self.invalid.is_clear()
    }

    pub(crate) fn has_valid(&self) -> bool {
        !self.invalid.is_full()
    }

    /// Return an error if `row` is out of range.
    pub(crate) fn check(&self, row: usize) -> Result<(), Error> {
        if row < self.len() {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                index: row,
                len: self.len(),
            })
        }
    }

    /// Return an error if `start..start + count` leaves the buffer,
    /// otherwise return that range.
    pub(crate) fn check_window(&self, start: usize, count: usize) -> Result<Range<usize>, Error> {
        let end = start.checked_add(count).unwrap_or(usize::MAX);
        if start > self.len() || end > self.len() {
            return Err(Error::OutOfRange {
                index: end.saturating_sub(1).max(start),
                len: self.len(),
            });
        }

        Ok(start..end)
    }

    pub(crate) fn is_valid(&self, row: usize) -> Result<bool, Error> {
        self.check(row)?;
        Ok(!self.invalid.get(row))
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::type_mismatch(self.data.describe(), expected)
    }

    pub(crate) fn get<T: Element>(&self, row: usize) -> Result<Option<T>, Error> {
        self.check(row)?;
        let values = T::values(&self.data).ok_or_else(|| self.mismatch(std::any::type_name::<T>()))?;

        Ok((!self.invalid.get(row)).then(|| values[row]))
    }

    pub(crate) fn get_number(&self, row: usize) -> Result<Option<Number>, Error> {
        self.check(row)?;
        if self.data.numeric_type().is_none() {
            return Err(self.mismatch("numeric"));
        }

        Ok(if self.invalid.get(row) {
            None
        } else {
            self.data.number_at(row)
        })
    }

    pub(crate) fn get_double(&self, row: usize) -> Result<Option<f64>, Error> {
        match self.data.numeric_type() {
            Some(numeric) if !numeric.is_complex() => {
                Ok(self.get_number(row)?.and_then(|number| number.as_f64()))
            }
            _ => Err(self.mismatch("non-complex numeric")),
        }
    }

    pub(crate) fn get_complex(&self, row: usize) -> Result<Option<Complex64>, Error> {
        Ok(self.get_number(row)?.map(|number| number.as_complex()))
    }

    pub(crate) fn get_string(&self, row: usize) -> Result<Option<&str>, Error> {
        self.check(row)?;
        match &self.data {
            ColumnData::Text(values) => Ok(values[row].as_deref()),
            _ => Err(self.mismatch("string")),
        }
    }

    pub(crate) fn get_array(&self, row: usize) -> Result<Option<&Array>, Error> {
        self.check(row)?;
        match &self.data {
            ColumnData::Array(values) => Ok(values[row].as_ref()),
            _ => Err(self.mismatch("array")),
        }
    }

    pub(crate) fn get_array_mut(&mut self, row: usize) -> Result<Option<&mut Array>, Error> {
        self.check(row)?;
        match &mut self.data {
            ColumnData::Array(values) => Ok(values[row].as_mut()),
            other => Err(Error::type_mismatch(other.describe(), "array")),
        }
    }

    pub(crate) fn set<T: Element>(&mut self, row: usize, value: T) -> Result<(), Error> {
        self.check(row)?;
        let values = typed_mut::<T>(&mut self.data)?;

        values[row] = value;
        self.invalid.set(row, false);

        Ok(())
    }

    pub(crate) fn set_number(&mut self, row: usize, number: Number) -> Result<(), Error> {
        self.check(row)?;
        match self.data.numeric_type() {
            Some(numeric) if numeric.is_complex() || !number.is_complex() => {}
            Some(_) => return Err(self.mismatch("complex")),
            None => return Err(self.mismatch("numeric")),
        }

        forward_to_numeric!(&mut self.data, values => values[row] = Element::from_number(number),
            ColumnData::Text(_) | ColumnData::Array(_) => unreachable!("checked to be numeric"));
        self.invalid.set(row, false);

        Ok(())
    }

    pub(crate) fn set_string(&mut self, row: usize, value: String) -> Result<(), Error> {
        self.check(row)?;
        match &mut self.data {
            ColumnData::Text(values) => values[row] = Some(value),
            other => return Err(Error::type_mismatch(other.describe(), "string")),
        }
        self.invalid.set(row, false);

        Ok(())
    }

    pub(crate) fn set_array(&mut self, row: usize, array: Array) -> Result<(), Error> {
        self.check(row)?;
        match &mut self.data {
            ColumnData::Array(values) => values[row] = Some(array),
            other => return Err(Error::type_mismatch(other.describe(), "array")),
        }
        self.invalid.set(row, false);

        Ok(())
    }

    /// Mark an element as invalid.
    ///
    /// Numeric payloads are left untouched, strings and arrays are released.
    pub(crate) fn set_invalid(&mut self, row: usize) -> Result<(), Error> {
        self.check(row)?;
        self.invalid.set(row, true);
        self.data.release(row);

        Ok(())
    }

    /// Overwrite the payload of every invalid element with `code`.
    pub(crate) fn fill_invalid_number(&mut self, code: Number) {
        if self.invalid.is_clear() {
            return;
        }

        let invalid = &self.invalid;
        forward_to_numeric!(&mut self.data, values => {
            let code = Element::from_number(code);
            for row in invalid.ones() {
                values[row] = code;
            }
        }, ColumnData::Text(_) | ColumnData::Array(_) => {});
    }

    pub(crate) fn fill_invalid_int(&mut self, code: i64) -> Result<(), Error> {
        match self.data.numeric_type() {
            Some(numeric) if numeric.is_integer() => {
                self.fill_invalid_number(Number::Integer(code));
                Ok(())
            }
            _ => Err(self.mismatch("integer")),
        }
    }

    pub(crate) fn fill_invalid_real(&mut self, code: f64) -> Result<(), Error> {
        match self.data.numeric_type() {
            Some(numeric) if numeric.is_real() => {
                self.fill_invalid_number(Number::Real(code));
                Ok(())
            }
            _ => Err(self.mismatch("float or double")),
        }
    }

    /// Check whether a single integer represents every invalid element.
    pub(crate) fn null_sentinel(&self) -> Result<NullSentinel, Error> {
        match self.data.numeric_type() {
            Some(numeric) if numeric.is_integer() => {}
            _ => return Err(self.mismatch("integer")),
        }

        let mut payloads = self.invalid.ones().map(|row| match self.data.number_at(row) {
            Some(Number::Integer(value)) => value,
            _ => unreachable!("integer payloads widen to integers"),
        });

        Ok(match payloads.next() {
            None => NullSentinel::Unneeded,
            Some(first) if payloads.all(|value| value == first) => NullSentinel::Uniform(first),
            Some(_) => NullSentinel::Mixed,
        })
    }

    /// Mark every element in the range as valid and set it to `value`.
    pub(crate) fn fill_window<T: Element>(&mut self, range: Range<usize>, value: T) -> Result<(), Error> {
        let values = typed_mut::<T>(&mut self.data)?;

        values[range.clone()].fill(value);
        self.invalid.fill_range(range, false);

        Ok(())
    }

    /// Mark every element in the range as valid and set it to `value`.
    pub(crate) fn fill_window_string(&mut self, range: Range<usize>, value: &str) -> Result<(), Error> {
        match &mut self.data {
            ColumnData::Text(values) => {
                for slot in &mut values[range.clone()] {
                    *slot = Some(value.to_string());
                }
            }
            other => return Err(Error::type_mismatch(other.describe(), "string")),
        }
        self.invalid.fill_range(range, false);

        Ok(())
    }

    /// Mark every element in the range as invalid.
    pub(crate) fn fill_window_invalid(&mut self, range: Range<usize>) {
        for row in range.clone() {
            self.data.release(row);
        }
        self.invalid.fill_range(range, true);
    }

    /// Replace the whole payload, marking every element valid.
    pub(crate) fn copy_data<T: Element>(&mut self, source: &[T]) -> Result<(), Error> {
        let len = self.len();
        let values = typed_mut::<T>(&mut self.data)?;
        if source.len() != len {
            return Err(Error::IncompatibleInput(format!(
                "expected {len} values, got {}",
                source.len()
            )));
        }

        values.copy_from_slice(source);
        self.invalid.fill(false);

        Ok(())
    }

    /// Apply `update` to the widened value of every valid element.
    ///
    /// The element becomes invalid if `update` returns [None].
    pub(crate) fn update<F>(&mut self, mut update: F)
    where
        F: FnMut(usize, Number) -> Option<Number>,
    {
        if self.invalid.is_full() {
            return;
        }

        let invalid = &self.invalid;
        let mut invalidated = Vec::new();
        forward_to_numeric!(&mut self.data, values => {
            for row in invalid.zeros() {
                match update(row, values[row].to_number()) {
                    Some(number) => values[row] = Element::from_number(number),
                    None => invalidated.push(row),
                }
            }
        }, ColumnData::Text(_) | ColumnData::Array(_) => {});

        for row in invalidated {
            self.invalid.set(row, true);
        }
    }

    /// Convert every element to the given numeric type, keeping validity.
    pub(crate) fn cast(&self, numeric: NumericType) -> Result<Buffer, Error> {
        let data = forward_to_numeric!(&self.data, values => {
            ColumnData::from_numbers(numeric, values.iter().map(|value| value.to_number()))
        }, ColumnData::Text(_) | ColumnData::Array(_) => {
            return Err(Error::InvalidType(format!("cannot cast {} to {numeric}", self.data.describe())))
        });

        Ok(Buffer::from_parts(data, self.invalid.clone()))
    }

    pub(crate) fn resize(&mut self, len: usize) {
        self.data.resize(len);
        self.invalid.resize(len, true);
    }

    pub(crate) fn insert_invalid(&mut self, at: usize, amount: usize) {
        self.data.insert_default(at, amount);
        self.invalid.insert(at, amount, true);
    }

    pub(crate) fn remove(&mut self, at: usize, amount: usize) {
        self.data.remove(at, amount);
        self.invalid.remove(at, amount);
    }

    pub(crate) fn extract(&self, range: Range<usize>) -> Buffer {
        Buffer {
            data: self.data.extract(range.clone()),
            invalid: self.invalid.extract(range),
        }
    }

    pub(crate) fn gather(&self, indices: &[usize]) -> Buffer {
        Buffer {
            data: self.data.gather(indices),
            invalid: self.invalid.gather(indices),
        }
    }

    pub(crate) fn insert_from(&mut self, at: usize, other: &Buffer) -> Result<(), Error> {
        if !self.data.insert_from(at, &other.data) {
            return Err(Error::IncompatibleInput(format!(
                "cannot insert {} into {}",
                other.data.describe(),
                self.data.describe()
            )));
        }
        self.invalid.insert_mask(at, &other.invalid);

        Ok(())
    }

    /// Reorder such that row `i` receives the element at `order[i]`.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        self.data.permute(order);
        self.invalid.permute(order);
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        columnar::{data::ColumnData, NullSentinel},
        datatypes::{Number, NumericType},
        error::Error,
    };

    use super::Buffer;

    #[test]
    fn fresh_buffer_is_invalid() {
        let buffer = Buffer::invalid(ColumnData::numeric(NumericType::Int, 4));
        assert_eq!(buffer.count_invalid(), 4);
        assert!(!buffer.has_valid());
        assert_eq!(buffer.get::<i32>(2), Ok(None));
        assert!(matches!(buffer.get::<i32>(4), Err(Error::OutOfRange { .. })));
        assert!(matches!(buffer.get::<f64>(0), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn typed_writes_check_storage() {
        let mut buffer = Buffer::invalid(ColumnData::numeric(NumericType::Int, 2));
        assert!(matches!(buffer.set(0, 1.5_f64), Err(Error::TypeMismatch { .. })));
        assert!(matches!(
            buffer.copy_data(&[1_i16, 2]),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(buffer.count_invalid(), 2);

        buffer.set(1, 9_i32).unwrap();
        assert_eq!(buffer.get::<i32>(1), Ok(Some(9)));
    }

    #[test]
    fn set_and_invalidate() {
        let mut buffer = Buffer::invalid(ColumnData::numeric(NumericType::Short, 3));
        buffer.set::<i16>(1, 12).unwrap();
        assert_eq!(buffer.get_double(1), Ok(Some(12.0)));
        assert_eq!(buffer.count_invalid(), 2);

        buffer.set_number(0, Number::Real(70000.7)).unwrap();
        assert_eq!(buffer.get::<i16>(0), Ok(Some(i16::MAX)));

        buffer.set_invalid(1).unwrap();
        assert_eq!(buffer.get::<i16>(1), Ok(None));
        assert_eq!(buffer.count_invalid(), 2);
    }

    #[test]
    fn strings_release_on_invalidate() {
        let mut buffer = Buffer::from_strings(vec![Some("a".to_string()), None]);
        assert_eq!(buffer.count_invalid(), 1);

        buffer.set_invalid(0).unwrap();
        assert_eq!(buffer.data(), &ColumnData::Text(vec![None, None]));
        assert!(buffer.invalid_mask().is_full());
    }

    #[test]
    fn fill_invalid_keeps_validity() {
        let mut buffer = Buffer::valid(ColumnData::Int(vec![1, 2, 3, 4]));
        buffer.set_invalid(1).unwrap();
        buffer.set_invalid(3).unwrap();
        assert_eq!(buffer.null_sentinel(), Ok(NullSentinel::Mixed));

        buffer.fill_invalid_int(-99).unwrap();
        assert_eq!(buffer.data(), &ColumnData::Int(vec![1, -99, 3, -99]));
        assert_eq!(buffer.count_invalid(), 2);
        assert_eq!(buffer.null_sentinel(), Ok(NullSentinel::Uniform(-99)));

        let mut reals = Buffer::valid(ColumnData::Double(vec![1.0]));
        assert!(reals.fill_invalid_int(0).is_err());
        assert!(reals.null_sentinel().is_err());
        reals.fill_invalid_real(f64::NAN).unwrap();
    }

    #[test]
    fn update_invalidates() {
        let mut buffer = Buffer::valid(ColumnData::Int(vec![4, 0, 8]));
        buffer.update(|_, value| Number::Integer(8).apply(crate::datatypes::ArithmeticOperator::Divide, value));

        assert_eq!(buffer.get::<i32>(0), Ok(Some(2)));
        assert_eq!(buffer.get::<i32>(1), Ok(None));
        assert_eq!(buffer.get::<i32>(2), Ok(Some(1)));
    }
}

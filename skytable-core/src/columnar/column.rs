//! This module defines [Column], a named sequence of values of one [ColumnType].

use std::ops::Range;

use num::complex::Complex64;

use crate::{
    datatypes::{ColumnType, Element, ElementType, Number, NumericType},
    error::Error,
};

use super::{buffer::Buffer, data::ColumnData, Array};

/// Whether the payload of a column was handed over by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Ownership {
    /// The column allocated its payload itself
    Owned,
    /// The payload was adopted from the caller and is expected to be unwrapped again
    Wrapped,
}

/// Result of checking whether a single integer code represents
/// every invalid element of a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NullSentinel {
    /// The column has no invalid elements
    Unneeded,
    /// Every invalid element carries this payload
    Uniform(i64),
    /// Invalid elements carry different payloads
    Mixed,
}

impl NullSentinel {
    fn combine(self, other: NullSentinel) -> NullSentinel {
        match (self, other) {
            (NullSentinel::Unneeded, other) | (other, NullSentinel::Unneeded) => other,
            (NullSentinel::Uniform(left), NullSentinel::Uniform(right)) if left == right => {
                NullSentinel::Uniform(left)
            }
            _ => NullSentinel::Mixed,
        }
    }
}

/// A named sequence of values of one [ColumnType],
/// in which every element is independently valid or invalid.
#[derive(Debug)]
pub struct Column {
    name: String,
    unit: Option<String>,
    format: String,
    save_type: ElementType,
    column_type: ColumnType,
    buffer: Buffer,
    ownership: Ownership,
}

impl Column {
    /// Create a column of `len` invalid elements.
    ///
    /// Fails for an empty name and for arrays of depth zero.
    pub fn new(name: &str, column_type: ColumnType, len: usize) -> Result<Self, Error> {
        if let ColumnType::Array(_, 0) = column_type {
            return Err(Error::IllegalInput(format!(
                "column \"{name}\" cannot hold arrays of depth 0"
            )));
        }

        Self::from_buffer(
            name,
            column_type,
            Buffer::invalid(ColumnData::new(column_type, len)),
        )
    }

    /// Create a column that adopts the given values, all of which are valid.
    pub fn wrap<T: Element>(name: &str, values: Vec<T>) -> Result<Self, Error> {
        Self::wrap_with_type(name, values, T::NATIVE)
    }

    /// Like [Column::wrap], but picks the numeric type of the column.
    ///
    /// This is needed to tell [NumericType::Long] and [NumericType::LongLong] apart.
    pub fn wrap_with_type<T: Element>(
        name: &str,
        values: Vec<T>,
        numeric: NumericType,
    ) -> Result<Self, Error> {
        if !T::accepts(numeric) {
            return Err(Error::type_mismatch(numeric, std::any::type_name::<T>()));
        }

        let mut column = Self::from_buffer(
            name,
            ColumnType::Scalar(numeric),
            Buffer::valid(T::into_data(values, numeric)),
        )?;
        column.ownership = Ownership::Wrapped;

        Ok(column)
    }

    /// Create a column that adopts the given strings, [None] entries are invalid.
    pub fn wrap_strings(name: &str, values: Vec<Option<String>>) -> Result<Self, Error> {
        let mut column = Self::from_buffer(name, ColumnType::Text, Buffer::from_strings(values))?;
        column.ownership = Ownership::Wrapped;

        Ok(column)
    }

    pub(crate) fn from_buffer(
        name: &str,
        column_type: ColumnType,
        buffer: Buffer,
    ) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::NullArgument("name"));
        }

        Ok(Self {
            name: name.to_string(),
            unit: None,
            format: column_type.default_format().to_string(),
            save_type: column_type.element(),
            column_type,
            buffer,
            ownership: Ownership::Owned,
        })
    }

    /// Create a column of the given type that shares the name and unit of this column.
    pub(crate) fn derive(&self, column_type: ColumnType, buffer: Buffer) -> Self {
        Self {
            name: self.name.clone(),
            unit: self.unit.clone(),
            format: column_type.default_format().to_string(),
            save_type: column_type.element(),
            column_type,
            buffer,
            ownership: Ownership::Owned,
        }
    }

    /// Hand the payload back to the caller.
    ///
    /// The column is left empty and no longer counts as wrapped.
    pub(crate) fn release<T: Element>(&mut self) -> Result<Vec<T>, Error> {
        self.check_releasable(T::values(self.buffer.data()).is_some(), std::any::type_name::<T>())?;
        self.ownership = Ownership::Owned;

        T::from_data(self.buffer.take_data())
            .map_err(|data| Error::type_mismatch(data.describe(), std::any::type_name::<T>()))
    }

    /// Hand the strings back to the caller, see [Column::release].
    pub(crate) fn release_strings(&mut self) -> Result<Vec<Option<String>>, Error> {
        self.check_releasable(self.column_type == ColumnType::Text, "string")?;
        self.ownership = Ownership::Owned;

        match self.buffer.take_data() {
            ColumnData::Text(values) => Ok(values),
            other => Err(Error::type_mismatch(other.describe(), "string")),
        }
    }

    fn check_releasable(&self, matches: bool, expected: &'static str) -> Result<(), Error> {
        if self.column_type.is_array() {
            return Err(Error::UnsupportedMode(format!(
                "cannot unwrap array column \"{}\"",
                self.name
            )));
        }

        if !matches {
            return Err(Error::type_mismatch(self.column_type, expected));
        }

        Ok(())
    }

    /// Return the name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Return the unit of the column.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Set or clear the unit of the column.
    pub fn set_unit(&mut self, unit: Option<&str>) {
        self.unit = unit.map(str::to_string);
    }

    /// Return the display format of the column.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Set the display format, [None] restores the default of the column type.
    pub fn set_format(&mut self, format: Option<&str>) {
        self.format = format
            .unwrap_or(self.column_type.default_format())
            .to_string();
    }

    /// Return the type the elements should be saved as.
    pub fn save_type(&self) -> ElementType {
        self.save_type
    }

    /// Set the type the elements should be saved as.
    ///
    /// The save type must belong to the same family as the element type:
    /// integers and booleans, floating point values, complex values or strings.
    pub fn set_save_type(&mut self, save_type: ElementType) -> Result<(), Error> {
        let compatible = match (self.column_type.element(), save_type) {
            (ElementType::Numeric(current), ElementType::Numeric(target)) => {
                current.can_save_as(target)
            }
            (ElementType::Text, ElementType::Text) => true,
            _ => false,
        };

        if !compatible {
            return Err(Error::InvalidType(format!(
                "column \"{}\" of type {} cannot be saved as {save_type}",
                self.name, self.column_type
            )));
        }

        self.save_type = save_type;
        Ok(())
    }

    /// Return the type of the column.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Length of the arrays stored in this column, `0` for scalar columns.
    pub fn depth(&self) -> usize {
        self.column_type.depth()
    }

    /// Return whether the payload was adopted from the caller.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Return `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of invalid elements.
    pub fn count_invalid(&self) -> usize {
        self.buffer.count_invalid()
    }

    /// Return `true` if at least one element is invalid.
    pub fn has_invalid(&self) -> bool {
        self.buffer.has_invalid()
    }

    /// Return `true` if at least one element is valid.
    pub fn has_valid(&self) -> bool {
        self.buffer.has_valid()
    }

    /// Return whether the element in the given row is valid.
    pub fn is_valid(&self, row: usize) -> Result<bool, Error> {
        self.buffer.is_valid(row)
    }

    /// Read an element of exactly the type `T`, [None] if it is invalid.
    pub fn get<T: Element>(&self, row: usize) -> Result<Option<T>, Error> {
        self.buffer.get(row)
    }

    /// Read a numeric element, widened to [Number].
    pub fn get_number(&self, row: usize) -> Result<Option<Number>, Error> {
        self.buffer.get_number(row)
    }

    /// Read any non-complex numeric element as [`f64`].
    pub fn get_double(&self, row: usize) -> Result<Option<f64>, Error> {
        self.buffer.get_double(row)
    }

    /// Read any numeric element as [`Complex64`].
    pub fn get_complex(&self, row: usize) -> Result<Option<Complex64>, Error> {
        self.buffer.get_complex(row)
    }

    /// Read a string element.
    pub fn get_string(&self, row: usize) -> Result<Option<&str>, Error> {
        self.buffer.get_string(row)
    }

    /// Read the array stored in the given row, [None] if it is null.
    pub fn get_array(&self, row: usize) -> Result<Option<&Array>, Error> {
        self.buffer.get_array(row)
    }

    /// Mutable access to the array stored in the given row.
    pub fn get_array_mut(&mut self, row: usize) -> Result<Option<&mut Array>, Error> {
        self.buffer.get_array_mut(row)
    }

    /// Write an element of exactly the type `T` and mark it valid.
    pub fn set<T: Element>(&mut self, row: usize, value: T) -> Result<(), Error> {
        self.buffer.set(row, value)
    }

    /// Write a numeric element, narrowing it to the type of the column.
    pub fn set_number(&mut self, row: usize, value: Number) -> Result<(), Error> {
        self.buffer.set_number(row, value)
    }

    /// Write a string element and mark it valid.
    pub fn set_string(&mut self, row: usize, value: &str) -> Result<(), Error> {
        self.buffer.set_string(row, value.to_string())
    }

    /// Store an array in the given row.
    ///
    /// The array must have the element type and the depth of the column.
    pub fn set_array(&mut self, row: usize, array: Array) -> Result<(), Error> {
        let ColumnType::Array(element, depth) = self.column_type else {
            return Err(Error::type_mismatch(self.column_type, "array"));
        };

        if array.element_type() != element {
            return Err(Error::type_mismatch(array.element_type(), "array element type"));
        }
        if array.len() != depth {
            return Err(Error::IncompatibleInput(format!(
                "array of length {} does not fit column \"{}\" of depth {depth}",
                array.len(),
                self.name
            )));
        }

        self.buffer.set_array(row, array)
    }

    /// Mark an element as invalid, releasing strings and arrays.
    pub fn set_invalid(&mut self, row: usize) -> Result<(), Error> {
        self.buffer.set_invalid(row)
    }

    /// Overwrite the payload of every invalid element with `code`,
    /// including the invalid elements inside integer arrays.
    ///
    /// Validity is not changed.
    pub fn fill_invalid_int(&mut self, code: i64) -> Result<(), Error> {
        match self.column_type {
            ColumnType::Array(ElementType::Numeric(numeric), _) if numeric.is_integer() => {
                for array in self.arrays_mut().flatten() {
                    array.buffer_mut().fill_invalid_number(Number::Integer(code));
                }
                Ok(())
            }
            _ => self.buffer.fill_invalid_int(code),
        }
    }

    /// Overwrite the payload of every invalid element with `code`
    /// in a float or double column.
    pub fn fill_invalid_real(&mut self, code: f64) -> Result<(), Error> {
        self.buffer.fill_invalid_real(code)
    }

    /// Check whether a single integer payload represents every invalid element.
    ///
    /// For integer array columns, the elements of all non-null arrays are considered.
    pub fn null_sentinel(&self) -> Result<NullSentinel, Error> {
        match self.column_type {
            ColumnType::Array(ElementType::Numeric(numeric), _) if numeric.is_integer() => {
                let mut result = NullSentinel::Unneeded;
                for array in self.arrays().into_iter().flatten().flatten() {
                    result = result.combine(array.buffer().null_sentinel()?);
                }
                Ok(result)
            }
            _ => self.buffer.null_sentinel(),
        }
    }

    /// Return the raw numeric payload, including the payload of invalid elements.
    ///
    /// Returns [None] if `T` does not match the column type.
    pub fn data<T: Element>(&self) -> Option<&[T]> {
        T::values(self.buffer.data()).map(Vec::as_slice)
    }

    /// Mutable access to the raw numeric payload.
    ///
    /// Writing through this slice does not change the validity of any element.
    pub fn data_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        T::values_mut(self.buffer.data_mut()).map(Vec::as_mut_slice)
    }

    /// Return the strings of a string column, [None] marks invalid elements.
    pub fn strings(&self) -> Option<&[Option<String>]> {
        match self.buffer.data() {
            ColumnData::Text(values) => Some(values),
            _ => None,
        }
    }

    /// Return the arrays of an array column, [None] marks null rows.
    pub fn arrays(&self) -> Option<&[Option<Array>]> {
        match self.buffer.data() {
            ColumnData::Array(values) => Some(values),
            _ => None,
        }
    }

    fn arrays_mut(&mut self) -> impl Iterator<Item = &mut Option<Array>> {
        match self.buffer.data_mut() {
            ColumnData::Array(values) => Some(values.iter_mut()),
            _ => None,
        }
        .into_iter()
        .flatten()
    }

    /// Set `count` elements starting at `start` to `value` and mark them valid.
    pub fn fill_window<T: Element>(&mut self, start: usize, count: usize, value: T) -> Result<(), Error> {
        let range = self.buffer.check_window(start, count)?;
        self.buffer.fill_window(range, value)
    }

    /// Set `count` strings starting at `start` to `value` and mark them valid.
    pub fn fill_window_string(&mut self, start: usize, count: usize, value: &str) -> Result<(), Error> {
        let range = self.buffer.check_window(start, count)?;
        self.buffer.fill_window_string(range, value)
    }

    /// Mark `count` elements starting at `start` as invalid.
    pub fn fill_window_invalid(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let range = self.buffer.check_window(start, count)?;
        self.buffer.fill_window_invalid(range);
        Ok(())
    }

    /// Replace the payload by a copy of `values` and mark every element valid.
    pub fn copy_data<T: Element>(&mut self, values: &[T]) -> Result<(), Error> {
        self.buffer.copy_data(values)
    }

    pub(crate) fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub(crate) fn invalid_rows(&self) -> &crate::util::Mask {
        self.buffer.invalid_mask()
    }

    /// Return `true` if both columns have the same name, type and unit.
    pub(crate) fn same_structure(&self, other: &Column) -> bool {
        self.name == other.name && self.column_type == other.column_type && self.unit == other.unit
    }

    pub(crate) fn resize(&mut self, len: usize) {
        self.buffer.resize(len);
    }

    pub(crate) fn insert_invalid(&mut self, at: usize, amount: usize) {
        self.buffer.insert_invalid(at, amount);
    }

    pub(crate) fn remove(&mut self, at: usize, amount: usize) {
        self.buffer.remove(at, amount);
    }

    /// Deep copy of the given rows, keeping all metadata.
    pub(crate) fn extract(&self, range: Range<usize>) -> Column {
        self.with_buffer(self.buffer.extract(range))
    }

    /// Deep copy of the rows at the given indices, keeping all metadata.
    pub(crate) fn gather(&self, rows: &[usize]) -> Column {
        self.with_buffer(self.buffer.gather(rows))
    }

    /// Keep only the rows at the given indices, in that order.
    pub(crate) fn retain_rows(&mut self, rows: &[usize]) {
        self.buffer = self.buffer.gather(rows);
    }

    fn with_buffer(&self, buffer: Buffer) -> Column {
        Column {
            name: self.name.clone(),
            unit: self.unit.clone(),
            format: self.format.clone(),
            save_type: self.save_type,
            column_type: self.column_type,
            buffer,
            ownership: Ownership::Owned,
        }
    }

    pub(crate) fn insert_from(&mut self, at: usize, other: &Column) -> Result<(), Error> {
        if self.column_type != other.column_type {
            return Err(Error::IncompatibleInput(format!(
                "cannot insert {} into column \"{}\" of type {}",
                other.column_type, self.name, self.column_type
            )));
        }

        self.buffer.insert_from(at, &other.buffer)
    }

    pub(crate) fn permute(&mut self, order: &[usize]) {
        self.buffer.permute(order);
    }
}

impl Clone for Column {
    fn clone(&self) -> Self {
        self.with_buffer(self.buffer.clone())
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        if self.ownership == Ownership::Wrapped {
            log::warn!(
                "column \"{}\" is dropped while still wrapping a caller buffer",
                self.name
            );
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        columnar::{Array, NullSentinel, Ownership},
        datatypes::{ColumnType, ElementType, Number, NumericType},
        error::Error,
    };

    use super::Column;

    #[test]
    fn create_column() {
        let column = Column::new("FLUX", ColumnType::Scalar(NumericType::Double), 5).unwrap();
        assert_eq!(column.len(), 5);
        assert_eq!(column.count_invalid(), 5);
        assert_eq!(column.format(), "% 1.5e");
        assert_eq!(column.ownership(), Ownership::Owned);

        assert_eq!(
            Column::new("", ColumnType::Text, 1).unwrap_err(),
            Error::NullArgument("name")
        );
        assert!(matches!(
            Column::new("SPEC", ColumnType::Array(ElementType::Text, 0), 1),
            Err(Error::IllegalInput(_))
        ));
    }

    #[test]
    fn wrap_and_release() {
        let values = vec![1_i64, 2, 3];
        let pointer = values.as_ptr();

        let mut column = Column::wrap_with_type("ID", values, NumericType::LongLong).unwrap();
        assert_eq!(column.column_type(), ColumnType::Scalar(NumericType::LongLong));
        assert_eq!(column.ownership(), Ownership::Wrapped);
        assert!(!column.has_invalid());

        assert!(matches!(column.release::<i32>(), Err(Error::TypeMismatch { .. })));
        let values = column.release::<i64>().unwrap();
        assert_eq!(values.as_ptr(), pointer);
        assert_eq!(column.ownership(), Ownership::Owned);

        assert!(Column::wrap_with_type("ID", vec![1_i32], NumericType::Long).is_err());
    }

    #[test]
    fn save_type_and_format() {
        let mut column = Column::new("N", ColumnType::Scalar(NumericType::Int), 0).unwrap();
        column.set_save_type(NumericType::Short.into()).unwrap();
        assert_eq!(column.save_type(), ElementType::Numeric(NumericType::Short));
        assert!(matches!(
            column.set_save_type(NumericType::Float.into()),
            Err(Error::InvalidType(_))
        ));

        column.set_format(Some("%5d"));
        assert_eq!(column.format(), "%5d");
        column.set_format(None);
        assert_eq!(column.format(), "% 7d");
    }

    #[test]
    fn array_rows() {
        let column_type = ColumnType::Array(NumericType::Int.into(), 2);
        let mut column = Column::new("PIX", column_type, 3).unwrap();

        assert!(matches!(
            column.set_array(0, Array::from_values(vec![1_i32])),
            Err(Error::IncompatibleInput(_))
        ));
        assert!(matches!(
            column.set_array(0, Array::from_values(vec![1.0_f64, 2.0])),
            Err(Error::TypeMismatch { .. })
        ));

        let mut array = Array::from_values(vec![7_i32, 8]);
        array.set_invalid(1).unwrap();
        column.set_array(0, array).unwrap();
        assert_eq!(column.count_invalid(), 2);

        column.fill_invalid_int(-1).unwrap();
        let array = column.get_array(0).unwrap().unwrap();
        assert_eq!(array.data::<i32>(), Some(&[7, -1][..]));
        assert_eq!(array.count_invalid(), 1);
        assert_eq!(column.null_sentinel(), Ok(NullSentinel::Uniform(-1)));

        column.set_invalid(0).unwrap();
        assert_eq!(column.get_array(0), Ok(None));
        assert_eq!(column.null_sentinel(), Ok(NullSentinel::Unneeded));
    }

    #[test]
    fn window_fillers() {
        let mut column = Column::new("X", ColumnType::Scalar(NumericType::Float), 4).unwrap();
        column.fill_window(1, 2, 0.5_f32).unwrap();
        assert_eq!(column.count_invalid(), 2);
        assert_eq!(column.get_double(2), Ok(Some(0.5)));

        column.fill_window_invalid(2, 2).unwrap();
        assert_eq!(column.count_invalid(), 3);
        assert!(matches!(
            column.fill_window_invalid(3, 2),
            Err(Error::OutOfRange { .. })
        ));

        column.copy_data(&[1.0_f32, 2.0, 3.0, 4.0]).unwrap();
        assert!(!column.has_invalid());
        assert!(column.copy_data(&[1.0_f32]).is_err());
        assert_eq!(column.get_number(3), Ok(Some(Number::Real(4.0))));
    }

    #[test]
    fn clone_is_owned() {
        let column = Column::wrap("F", vec![1.5_f64]).unwrap();
        let copy = column.clone();
        assert_eq!(copy.ownership(), Ownership::Owned);
        assert_eq!(copy.get_double(0), Ok(Some(1.5)));

        let mut column = column;
        column.release::<f64>().unwrap();
    }
}

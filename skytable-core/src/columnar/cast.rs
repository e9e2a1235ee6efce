//! This module implements type conversion of columns.

use bitvec::vec::BitVec;

use crate::{
    datatypes::{CastTarget, ColumnType, ElementType, Number, NumericType},
    error::Error,
    util::Mask,
};

use super::{buffer::Buffer, data::ColumnData, Array, Column};

impl Column {
    /// Return a copy of this column with every element converted to `target`.
    ///
    /// Validity is preserved.
    /// Scalars become arrays of depth one if `target` requests an array,
    /// arrays of depth one are flattened to their first element if `target` requests a scalar,
    /// and the elements of deeper arrays are converted in place.
    /// Strings cannot be cast and complex values cannot be cast to real types.
    pub fn cast_to(&self, target: CastTarget) -> Result<Column, Error> {
        let source = match self.column_type().element() {
            ElementType::Numeric(numeric) => numeric,
            ElementType::Text => {
                return Err(Error::InvalidType(format!(
                    "cannot cast string column \"{}\"",
                    self.name()
                )))
            }
        };

        if source.is_complex() && !target.element.is_complex() {
            return Err(Error::InvalidType(format!(
                "cannot cast complex column \"{}\" to {}",
                self.name(),
                target.element
            )));
        }

        let result_type = self.column_type().cast_result(target);
        log::debug!(
            "casting column \"{}\" from {} to {result_type}",
            self.name(),
            self.column_type()
        );

        let buffer = match (self.column_type(), result_type) {
            (ColumnType::Scalar(_), ColumnType::Scalar(element)) => self.buffer().cast(element)?,
            (ColumnType::Scalar(_), ColumnType::Array(_, _)) => self.scalars_to_arrays(target.element),
            (ColumnType::Array(_, _), ColumnType::Scalar(element)) => self.arrays_to_scalars(element),
            (ColumnType::Array(_, _), ColumnType::Array(_, _)) => self.cast_arrays(target.element)?,
            (ColumnType::Text, _) | (_, ColumnType::Text) => {
                unreachable!("string columns are rejected above")
            }
        };

        Ok(self.derive(result_type, buffer))
    }

    fn scalars_to_arrays(&self, element: NumericType) -> Buffer {
        let arrays = (0..self.len())
            .map(|row| {
                let number = self.buffer().get_number(row).ok().flatten()?;
                let data = ColumnData::from_numbers(element, std::iter::once(number));
                Some(Array::from_buffer(element.into(), Buffer::valid(data)))
            })
            .collect();

        Buffer::from_parts(ColumnData::Array(arrays), self.invalid_rows().clone())
    }

    fn arrays_to_scalars(&self, element: NumericType) -> Buffer {
        let firsts: Vec<Option<Number>> = self
            .arrays()
            .unwrap_or_default()
            .iter()
            .map(|array| array.as_ref()?.get_number(0).ok().flatten())
            .collect();

        let invalid: BitVec = firsts.iter().map(Option::is_none).collect();
        let data = ColumnData::from_numbers(
            element,
            firsts
                .into_iter()
                .map(|number| number.unwrap_or(Number::Integer(0))),
        );

        Buffer::from_parts(data, Mask::from_bits(invalid))
    }

    fn cast_arrays(&self, element: NumericType) -> Result<Buffer, Error> {
        let arrays = self
            .arrays()
            .unwrap_or_default()
            .iter()
            .map(|array| {
                array
                    .as_ref()
                    .map(|array| {
                        let buffer = array.buffer().cast(element)?;
                        Ok(Array::from_buffer(element.into(), buffer))
                    })
                    .transpose()
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Buffer::from_parts(
            ColumnData::Array(arrays),
            self.invalid_rows().clone(),
        ))
    }
}

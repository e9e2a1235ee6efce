//! This module implements the row selection of a [Table].
//!
//! Selections are refined by predicates on the values of a column.
//! `and_` functions only ever unselect rows,
//! while `or_` functions only ever select additional rows.
//! An invalid element never satisfies a predicate, not even [Operator::NotEqual].

use std::cmp::Ordering;

use regex::Regex;

use crate::{
    columnar::Column,
    datatypes::{ColumnType, Value},
    error::Error,
    util::Mask,
};

use super::{table::lookup, Table};

/// Comparison operators for selecting rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// Equal to the reference; for strings, the reference is matched as a regular expression
    Equal,
    /// Not equal to the reference; for strings, the regular expression does not match
    NotEqual,
    /// Greater than the reference
    Greater,
    /// Less than or equal to the reference
    NotGreater,
    /// Less than the reference
    Less,
    /// Greater than or equal to the reference
    NotLess,
}

impl Operator {
    /// Return the operator that holds exactly if this one does not.
    pub fn inverse(self) -> Self {
        match self {
            Operator::Equal => Operator::NotEqual,
            Operator::NotEqual => Operator::Equal,
            Operator::Greater => Operator::NotGreater,
            Operator::NotGreater => Operator::Greater,
            Operator::Less => Operator::NotLess,
            Operator::NotLess => Operator::Less,
        }
    }

    fn is_ordering(self) -> bool {
        !matches!(self, Operator::Equal | Operator::NotEqual)
    }

    /// Evaluate the operator given the result of comparing a value with the reference.
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            Operator::Equal => ordering == Some(Ordering::Equal),
            Operator::NotEqual => ordering != Some(Ordering::Equal),
            Operator::Greater => ordering == Some(Ordering::Greater),
            Operator::NotGreater => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Operator::Less => ordering == Some(Ordering::Less),
            Operator::NotLess => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

type RowPredicate<'a> = Box<dyn Fn(usize) -> bool + 'a>;

fn unsupported_arrays(column: &Column) -> Error {
    Error::UnsupportedMode(format!(
        "array column \"{}\" can only be selected by invalid elements",
        column.name()
    ))
}

fn unsupported_ordering(column: &Column, operator: Operator) -> Error {
    Error::UnsupportedMode(format!(
        "complex column \"{}\" cannot be compared with {operator:?}",
        column.name()
    ))
}

/// Build a predicate that compares each element of `column` with `value`.
fn value_predicate<'a>(
    column: &'a Column,
    operator: Operator,
    value: &Value,
) -> Result<RowPredicate<'a>, Error> {
    match (column.column_type(), value) {
        (ColumnType::Array(_, _), _) => Err(unsupported_arrays(column)),
        (ColumnType::Scalar(numeric), Value::Number(reference)) => {
            if operator.is_ordering() && (numeric.is_complex() || reference.is_complex()) {
                return Err(unsupported_ordering(column, operator));
            }

            let reference = *reference;
            let data = column.buffer().data();
            let invalid = column.invalid_rows();

            Ok(Box::new(move |row| {
                !invalid.get(row)
                    && data
                        .number_at(row)
                        .is_some_and(|number| operator.holds(number.compare(&reference)))
            }))
        }
        (ColumnType::Text, Value::Text(pattern)) => {
            let strings = column.strings().unwrap_or_default();

            if operator.is_ordering() {
                let pattern = pattern.clone();
                return Ok(Box::new(move |row| {
                    strings[row]
                        .as_deref()
                        .is_some_and(|string| operator.holds(Some(string.cmp(pattern.as_str()))))
                }));
            }

            let regex = Regex::new(pattern).map_err(|error| {
                Error::IllegalInput(format!("invalid pattern \"{pattern}\": {error}"))
            })?;
            let expected = operator == Operator::Equal;

            Ok(Box::new(move |row| {
                strings[row]
                    .as_deref()
                    .is_some_and(|string| regex.is_match(string) == expected)
            }))
        }
        (ColumnType::Scalar(_), Value::Text(_)) => {
            Err(Error::type_mismatch(column.column_type(), "string column"))
        }
        (ColumnType::Text, Value::Number(_)) => {
            Err(Error::type_mismatch(column.column_type(), "numeric column"))
        }
    }
}

/// Build a predicate that compares the elements of two columns row by row.
fn columns_predicate<'a>(
    left: &'a Column,
    operator: Operator,
    right: &'a Column,
) -> Result<RowPredicate<'a>, Error> {
    match (left.column_type(), right.column_type()) {
        (ColumnType::Array(_, _), _) => Err(unsupported_arrays(left)),
        (_, ColumnType::Array(_, _)) => Err(unsupported_arrays(right)),
        (ColumnType::Scalar(first), ColumnType::Scalar(second)) => {
            if operator.is_ordering() && (first.is_complex() || second.is_complex()) {
                let complex = if first.is_complex() { left } else { right };
                return Err(unsupported_ordering(complex, operator));
            }

            let (left_invalid, right_invalid) = (left.invalid_rows(), right.invalid_rows());
            let (left, right) = (left.buffer().data(), right.buffer().data());

            Ok(Box::new(move |row| {
                if left_invalid.get(row) || right_invalid.get(row) {
                    return false;
                }

                match (left.number_at(row), right.number_at(row)) {
                    (Some(first), Some(second)) => operator.holds(first.compare(&second)),
                    _ => false,
                }
            }))
        }
        (ColumnType::Text, ColumnType::Text) => {
            let left = left.strings().unwrap_or_default();
            let right = right.strings().unwrap_or_default();

            Ok(Box::new(move |row| match (&left[row], &right[row]) {
                (Some(first), Some(second)) => operator.holds(Some(first.cmp(second))),
                _ => false,
            }))
        }
        (first, second) => Err(Error::type_mismatch(
            format!("{first} and {second}"),
            "columns of comparable types",
        )),
    }
}

/// Unselect every selected row that does not satisfy `matches`.
fn refine_and(selection: &mut Mask, has_valid: bool, matches: RowPredicate) -> usize {
    if selection.is_clear() {
        log::trace!("selection is empty, nothing to refine");
        return 0;
    }

    if !has_valid {
        log::trace!("column has no valid elements, unselecting every row");
        selection.fill(false);
        return 0;
    }

    selection.retain(matches);
    selection.count()
}

/// Select every unselected row that satisfies `matches`.
fn refine_or(selection: &mut Mask, has_valid: bool, matches: RowPredicate) -> usize {
    if selection.is_full() || !has_valid {
        log::trace!("selection cannot grow");
        return selection.count();
    }

    selection.extend_where(matches);
    selection.count()
}

impl Table {
    /// Select every row.
    pub fn select_all(&mut self) {
        self.selection.fill(true);
    }

    /// Unselect every row.
    pub fn unselect_all(&mut self) {
        self.selection.fill(false);
    }

    fn check_row(&self, row: usize) -> Result<(), Error> {
        if row >= self.rows {
            return Err(Error::OutOfRange {
                index: row,
                len: self.rows,
            });
        }

        Ok(())
    }

    /// Select a single row.
    pub fn select_row(&mut self, row: usize) -> Result<(), Error> {
        self.check_row(row)?;
        self.selection.set(row, true);

        Ok(())
    }

    /// Unselect a single row.
    pub fn unselect_row(&mut self, row: usize) -> Result<(), Error> {
        self.check_row(row)?;
        self.selection.set(row, false);

        Ok(())
    }

    /// Select exactly the rows that are currently unselected.
    pub fn invert_selection(&mut self) -> usize {
        self.selection.invert();
        self.selection.count()
    }

    /// Return whether a row is selected.
    pub fn is_selected(&self, row: usize) -> Result<bool, Error> {
        self.check_row(row)?;
        Ok(self.selection.get(row))
    }

    /// Number of selected rows.
    pub fn count_selected(&self) -> usize {
        self.selection.count()
    }

    /// Indices of the selected rows in ascending order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.ones().collect()
    }

    /// Unselect every row outside the window of `count` rows starting at `start`.
    ///
    /// Returns the number of selected rows.
    pub fn and_selected_window(&mut self, start: usize, count: usize) -> Result<usize, Error> {
        let count = self.clamp_window(start, count)?;
        let window = start..start + count;
        self.selection.retain(|row| window.contains(&row));

        Ok(self.selection.count())
    }

    /// Select every row in the window of `count` rows starting at `start`.
    ///
    /// Returns the number of selected rows.
    pub fn or_selected_window(&mut self, start: usize, count: usize) -> Result<usize, Error> {
        let count = self.clamp_window(start, count)?;
        self.selection.fill_range(start..start + count, true);

        Ok(self.selection.count())
    }

    /// Unselect every row in which the column holds a valid element.
    ///
    /// Returns the number of selected rows.
    pub fn and_selected_invalid(&mut self, name: &str) -> Result<usize, Error> {
        let invalid = lookup(&self.columns, name)?.invalid_rows();

        if invalid.is_clear() {
            self.selection.fill(false);
        } else if !invalid.is_full() {
            self.selection.retain(|row| invalid.get(row));
        }

        Ok(self.selection.count())
    }

    /// Select every row in which the column holds an invalid element.
    ///
    /// Returns the number of selected rows.
    pub fn or_selected_invalid(&mut self, name: &str) -> Result<usize, Error> {
        let invalid = lookup(&self.columns, name)?.invalid_rows();

        if invalid.is_full() {
            self.selection.fill(true);
        } else if !invalid.is_clear() {
            self.selection.extend_where(|row| invalid.get(row));
        }

        Ok(self.selection.count())
    }

    /// Unselect every row in which the element of the column
    /// does not compare to `value` as required by `operator`.
    ///
    /// Returns the number of selected rows.
    pub fn and_selected(
        &mut self,
        name: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Result<usize, Error> {
        let value = value.into();
        let column = lookup(&self.columns, name)?;
        let matches = value_predicate(column, operator, &value)?;

        Ok(refine_and(&mut self.selection, column.has_valid(), matches))
    }

    /// Select every row in which the element of the column
    /// compares to `value` as required by `operator`.
    ///
    /// Returns the number of selected rows.
    pub fn or_selected(
        &mut self,
        name: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Result<usize, Error> {
        let value = value.into();
        let column = lookup(&self.columns, name)?;
        let matches = value_predicate(column, operator, &value)?;

        Ok(refine_or(&mut self.selection, column.has_valid(), matches))
    }

    /// Unselect every row in which the elements of the two columns
    /// do not compare as required by `operator`.
    ///
    /// Strings are compared literally.
    /// Returns the number of selected rows.
    pub fn and_selected_columns(
        &mut self,
        left: &str,
        operator: Operator,
        right: &str,
    ) -> Result<usize, Error> {
        let left = lookup(&self.columns, left)?;
        let right = lookup(&self.columns, right)?;
        let matches = columns_predicate(left, operator, right)?;
        let has_valid = left.has_valid() && right.has_valid();

        Ok(refine_and(&mut self.selection, has_valid, matches))
    }

    /// Select every row in which the elements of the two columns
    /// compare as required by `operator`.
    ///
    /// Returns the number of selected rows.
    pub fn or_selected_columns(
        &mut self,
        left: &str,
        operator: Operator,
        right: &str,
    ) -> Result<usize, Error> {
        let left = lookup(&self.columns, left)?;
        let right = lookup(&self.columns, right)?;
        let matches = columns_predicate(left, operator, right)?;
        let has_valid = left.has_valid() && right.has_valid();

        Ok(refine_or(&mut self.selection, has_valid, matches))
    }

    /// Return a new table with a copy of the selected rows, all of which are selected.
    pub fn extract_selected(&self) -> Table {
        self.gather(&self.selected_rows())
    }

    /// Delete the selected rows.
    ///
    /// Resets the selection to all remaining rows.
    pub fn erase_selected(&mut self) {
        let rows = self.selected_rows();
        log::debug!("erasing {} selected rows", rows.len());

        self.erase_rows(&rows);
        self.reset_selection();
    }
}

//! This module implements the stable multi-key sort of a [Table].
//!
//! Keys are processed from the least significant to the most significant one.
//! Each pass moves the rows with an invalid key to the front and stably sorts the rest,
//! so that earlier passes decide the order among rows that tie in later ones.

use std::cmp::Ordering;

use crate::{
    columnar::{data::ColumnData, Column},
    datatypes::ColumnType,
    error::Error,
};

use super::{table::lookup, Table};

/// A column to sort by, together with the direction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortKey {
    /// Name of the column
    pub column: String,
    /// Sort from the largest to the smallest value
    pub descending: bool,
}

/// Ordered list of [SortKey]s, the most significant key first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SortCriteria {
    keys: Vec<SortKey>,
}

/// Value of a [Property].
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Double(f64),
    /// String value
    String(String),
}

/// A named value, as found in the header of a data file.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Name of the property
    pub name: String,
    /// Value of the property
    pub value: PropertyValue,
}

impl Property {
    /// Create a new [Property].
    pub fn new(name: &str, value: PropertyValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl SortCriteria {
    /// Create empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a less significant key in ascending direction.
    pub fn ascending(mut self, column: &str) -> Self {
        self.push(column, false);
        self
    }

    /// Append a less significant key in descending direction.
    pub fn descending(mut self, column: &str) -> Self {
        self.push(column, true);
        self
    }

    /// Append a less significant key.
    pub fn push(&mut self, column: &str, descending: bool) {
        self.keys.push(SortKey {
            column: column.to_string(),
            descending,
        });
    }

    /// Return the keys, the most significant key first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Return `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Read the criteria from a list of properties.
    ///
    /// Each property names a column, its boolean value selects descending order.
    pub fn from_properties(properties: &[Property]) -> Result<Self, Error> {
        let mut criteria = Self::new();
        for property in properties {
            match property.value {
                PropertyValue::Bool(descending) => criteria.push(&property.name, descending),
                _ => {
                    return Err(Error::IllegalInput(format!(
                        "sort property \"{}\" must be boolean",
                        property.name
                    )))
                }
            }
        }

        Ok(criteria)
    }
}

/// Ordering of valid values of a column that can act as sort key.
trait SortValue {
    fn order(&self, other: &Self) -> Ordering;
}

macro_rules! sort_value_ord {
    ($($type:ty),+) => {
        $(impl SortValue for $type {
            fn order(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })+
    };
}

sort_value_ord!(bool, i8, u8, i16, i32, i64, Option<String>);

impl SortValue for f32 {
    fn order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl SortValue for f64 {
    fn order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Stably sort the given rows by their value.
fn sort_rows<T: SortValue>(values: &[T], rows: &mut [usize], descending: bool) {
    rows.sort_by(|&first, &second| {
        let ordering = values[first].order(&values[second]);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn check_sort_key(column: &Column) -> Result<(), Error> {
    match column.column_type() {
        ColumnType::Array(_, _) => Err(Error::UnsupportedMode(format!(
            "cannot sort by array column \"{}\"",
            column.name()
        ))),
        ColumnType::Scalar(numeric) if numeric.is_complex() => Err(Error::UnsupportedMode(format!(
            "cannot sort by complex column \"{}\"",
            column.name()
        ))),
        _ => Ok(()),
    }
}

/// Compute the order of rows after sorting by the given column.
///
/// Row `i` of the result receives row `order[i]` of the input.
/// Rows with an invalid key come first, in their original order.
fn sort_order(column: &Column, descending: bool) -> Result<Vec<usize>, Error> {
    let invalid = column.invalid_rows();
    if invalid.is_full() {
        return Ok((0..column.len()).collect());
    }

    let mut order: Vec<usize> = invalid.ones().collect();
    let mut valid: Vec<usize> = invalid.zeros().collect();

    match column.buffer().data() {
        ColumnData::Bool(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Char(values) => sort_rows(values, &mut valid, descending),
        ColumnData::UChar(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Short(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Int(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Long(values) | ColumnData::LongLong(values) => {
            sort_rows(values, &mut valid, descending)
        }
        ColumnData::Float(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Double(values) => sort_rows(values, &mut valid, descending),
        ColumnData::Text(values) => sort_rows(values, &mut valid, descending),
        ColumnData::FloatComplex(_) | ColumnData::DoubleComplex(_) | ColumnData::Array(_) => {
            return check_sort_key(column).map(|_| order)
        }
    }

    log::trace!(
        "sorted {} valid rows of column \"{}\" after {} invalid ones",
        valid.len(),
        column.name(),
        order.len()
    );

    order.extend(valid);
    Ok(order)
}

/// Check that the valid elements of a sorted column are in order.
#[cfg(feature = "check_sort_order")]
fn check_sorted(column: &Column, descending: bool) {
    let invalid = column.invalid_rows();
    let first_valid = invalid.count();
    debug_assert!(invalid.ones().all(|row| row < first_valid));

    let numbers: Vec<_> = (first_valid..column.len())
        .map(|row| column.get_number(row).ok().flatten())
        .collect();
    let strings: Vec<_> = (first_valid..column.len())
        .map(|row| column.get_string(row).ok().flatten())
        .collect();

    let in_order = |ordering: Option<Ordering>| match ordering {
        Some(Ordering::Greater) => descending,
        Some(Ordering::Less) => !descending,
        _ => true,
    };

    debug_assert!(numbers
        .windows(2)
        .all(|pair| match (pair[0], pair[1]) {
            (Some(first), Some(second)) => in_order(first.compare(&second)),
            _ => true,
        }));
    debug_assert!(strings
        .windows(2)
        .all(|pair| in_order(Some(pair[0].cmp(&pair[1])))));
}

impl Table {
    /// Sort the rows of the table according to the given criteria.
    ///
    /// Rows with an invalid element in a key column are placed before all valid rows,
    /// regardless of the direction. Rows that tie in every key keep their relative order.
    /// The selection moves together with the rows.
    pub fn sort(&mut self, criteria: &SortCriteria) -> Result<(), Error> {
        for key in criteria.keys() {
            check_sort_key(lookup(&self.columns, &key.column)?)?;
        }

        if criteria.is_empty() {
            return Ok(());
        }

        log::debug!(
            "sorting {} rows by {} keys",
            self.rows,
            criteria.keys().len()
        );

        self.sort_by_keys(criteria.keys())
    }

    fn sort_by_keys(&mut self, keys: &[SortKey]) -> Result<(), Error> {
        let Some((last, rest)) = keys.split_last() else {
            return Ok(());
        };

        let order = sort_order(lookup(&self.columns, &last.column)?, last.descending)?;
        for (_, column) in self.columns.iter_mut() {
            column.permute(&order);
        }
        self.selection.permute(&order);

        #[cfg(feature = "check_sort_order")]
        check_sorted(lookup(&self.columns, &last.column)?, last.descending);

        self.sort_by_keys(rest)
    }
}

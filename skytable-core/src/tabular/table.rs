//! This module defines [Table], a set of named columns of equal length.

use linked_hash_map::LinkedHashMap;
use num::complex::Complex64;

use crate::{
    columnar::{Array, Column},
    datatypes::{ArithmeticOperator, CastTarget, ColumnType, Element, ElementType, Number, NumericType},
    error::Error,
    util::Mask,
};

/// Look up a column by name.
pub(super) fn lookup<'a>(columns: &'a LinkedHashMap<String, Column>, name: &str) -> Result<&'a Column, Error> {
    columns.get(name).ok_or_else(|| Error::NotFound(name.to_string()))
}

/// A set of named columns of equal length, together with a selection of rows.
///
/// Columns are kept in the order in which they were added.
#[derive(Debug, Clone)]
pub struct Table {
    pub(super) rows: usize,
    pub(super) columns: LinkedHashMap<String, Column>,
    pub(super) selection: Mask,
}

impl Table {
    /// Create a table with the given number of rows and no columns.
    ///
    /// Every row is selected.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: LinkedHashMap::new(),
            selection: Mask::full(rows),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over the names of the columns in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over the columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Return `true` if a column of the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Return the column of the given name.
    pub fn find(&self, name: &str) -> Result<&Column, Error> {
        lookup(&self.columns, name)
    }

    /// Return the column of the given name.
    pub(crate) fn find_mut(&mut self, name: &str) -> Result<&mut Column, Error> {
        self.columns
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn check_new_name(&self, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::NullArgument("name"));
        }
        if self.has_column(name) {
            return Err(Error::IllegalInput(format!("column \"{name}\" already exists")));
        }

        Ok(())
    }

    fn check_rows(&self, name: &str, len: usize) -> Result<(), Error> {
        if len != self.rows {
            return Err(Error::IncompatibleInput(format!(
                "column \"{name}\" has {len} rows, table has {}",
                self.rows
            )));
        }

        Ok(())
    }

    /// Reset the selection to all rows.
    pub(super) fn reset_selection(&mut self) {
        self.selection = Mask::full(self.rows);
    }

    /// Create a new column in which every element is invalid.
    pub fn new_column(&mut self, name: &str, column_type: ColumnType) -> Result<(), Error> {
        self.check_new_name(name)?;
        let column = Column::new(name, column_type, self.rows)?;
        log::debug!("new column \"{name}\" of type {column_type}");

        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    /// Create a new column holding arrays of the given element type and depth.
    pub fn new_column_array(
        &mut self,
        name: &str,
        element: ElementType,
        depth: usize,
    ) -> Result<(), Error> {
        self.new_column(name, ColumnType::Array(element, depth))
    }

    /// Add an existing column, which must have as many rows as the table.
    pub fn add_column(&mut self, column: Column) -> Result<(), Error> {
        self.check_new_name(column.name())?;
        self.check_rows(column.name(), column.len())?;

        self.columns.insert(column.name().to_string(), column);
        Ok(())
    }

    /// Remove a column and hand it to the caller.
    pub fn take_column(&mut self, name: &str) -> Result<Column, Error> {
        let column = self
            .columns
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        if self.columns.is_empty() {
            self.reset_selection();
        }

        Ok(column)
    }

    /// Delete a column.
    ///
    /// Deleting the last column resets the selection to all rows.
    pub fn erase_column(&mut self, name: &str) -> Result<(), Error> {
        self.take_column(name)?;
        log::debug!("erased column \"{name}\"");

        Ok(())
    }

    /// Move a column from `source` into this table.
    ///
    /// Both tables must have the same number of rows.
    pub fn move_column(&mut self, name: &str, source: &mut Table) -> Result<(), Error> {
        self.check_new_name(name)?;
        self.check_rows(name, source.find(name)?.len())?;

        let column = source.take_column(name)?;
        self.columns.insert(name.to_string(), column);

        Ok(())
    }

    /// Rename a column, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), Error> {
        self.find(from)?;
        self.check_new_name(to)?;

        self.columns = std::mem::take(&mut self.columns)
            .into_iter()
            .map(|(name, mut column)| {
                if name == from {
                    column.set_name(to);
                    (to.to_string(), column)
                } else {
                    (name, column)
                }
            })
            .collect();

        Ok(())
    }

    /// Add a deep copy of the column `from` under the name `to`.
    pub fn duplicate_column(&mut self, to: &str, from: &str) -> Result<(), Error> {
        self.check_new_name(to)?;
        let mut column = self.find(from)?.clone();
        column.set_name(to);

        self.columns.insert(to.to_string(), column);
        Ok(())
    }

    /// Adopt the given values as a new column, every element is valid.
    pub fn wrap<T: Element>(&mut self, name: &str, values: Vec<T>) -> Result<(), Error> {
        self.wrap_with_type(name, values, T::NATIVE)
    }

    /// Like [Table::wrap], but picks the numeric type of the new column.
    pub fn wrap_with_type<T: Element>(
        &mut self,
        name: &str,
        values: Vec<T>,
        numeric: NumericType,
    ) -> Result<(), Error> {
        self.check_new_name(name)?;
        self.check_rows(name, values.len())?;

        let column = Column::wrap_with_type(name, values, numeric)?;
        self.columns.insert(name.to_string(), column);

        Ok(())
    }

    /// Adopt the given strings as a new column, [None] entries are invalid.
    pub fn wrap_strings(&mut self, name: &str, values: Vec<Option<String>>) -> Result<(), Error> {
        self.check_new_name(name)?;
        self.check_rows(name, values.len())?;

        let column = Column::wrap_strings(name, values)?;
        self.columns.insert(name.to_string(), column);

        Ok(())
    }

    /// Remove a column and hand its values back to the caller.
    ///
    /// Array columns cannot be unwrapped.
    pub fn unwrap<T: Element>(&mut self, name: &str) -> Result<Vec<T>, Error> {
        let values = self.find_mut(name)?.release()?;
        self.take_column(name)?;

        Ok(values)
    }

    /// Remove a string column and hand its strings back to the caller.
    pub fn unwrap_strings(&mut self, name: &str) -> Result<Vec<Option<String>>, Error> {
        let values = self.find_mut(name)?.release_strings()?;
        self.take_column(name)?;

        Ok(values)
    }

    /// Return the type of a column.
    pub fn column_type(&self, name: &str) -> Result<ColumnType, Error> {
        Ok(self.find(name)?.column_type())
    }

    /// Return the unit of a column.
    pub fn unit(&self, name: &str) -> Result<Option<&str>, Error> {
        Ok(self.find(name)?.unit())
    }

    /// Set or clear the unit of a column.
    pub fn set_unit(&mut self, name: &str, unit: Option<&str>) -> Result<(), Error> {
        self.find_mut(name)?.set_unit(unit);
        Ok(())
    }

    /// Set the display format of a column, [None] restores the default.
    pub fn set_format(&mut self, name: &str, format: Option<&str>) -> Result<(), Error> {
        self.find_mut(name)?.set_format(format);
        Ok(())
    }

    /// Set the type the elements of a column should be saved as.
    pub fn set_save_type(&mut self, name: &str, save_type: ElementType) -> Result<(), Error> {
        self.find_mut(name)?.set_save_type(save_type)
    }

    /// Read an element of exactly the type `T`, [None] if it is invalid.
    pub fn get<T: Element>(&self, name: &str, row: usize) -> Result<Option<T>, Error> {
        self.find(name)?.get(row)
    }

    /// Read any non-complex numeric element as [`f64`].
    pub fn get_double(&self, name: &str, row: usize) -> Result<Option<f64>, Error> {
        self.find(name)?.get_double(row)
    }

    /// Read any numeric element as [`Complex64`].
    pub fn get_complex(&self, name: &str, row: usize) -> Result<Option<Complex64>, Error> {
        self.find(name)?.get_complex(row)
    }

    /// Read a string element.
    pub fn get_string(&self, name: &str, row: usize) -> Result<Option<&str>, Error> {
        self.find(name)?.get_string(row)
    }

    /// Read the array stored in a row of an array column.
    pub fn get_array(&self, name: &str, row: usize) -> Result<Option<&Array>, Error> {
        self.find(name)?.get_array(row)
    }

    /// Return whether an element is valid.
    pub fn is_valid(&self, name: &str, row: usize) -> Result<bool, Error> {
        self.find(name)?.is_valid(row)
    }

    /// Number of invalid elements of a column.
    pub fn count_invalid(&self, name: &str) -> Result<usize, Error> {
        Ok(self.find(name)?.count_invalid())
    }

    /// Write an element of exactly the type `T` and mark it valid.
    pub fn set<T: Element>(&mut self, name: &str, row: usize, value: T) -> Result<(), Error> {
        self.find_mut(name)?.set(row, value)
    }

    /// Write a numeric element, narrowing it to the type of the column.
    pub fn set_number(&mut self, name: &str, row: usize, value: Number) -> Result<(), Error> {
        self.find_mut(name)?.set_number(row, value)
    }

    /// Write a string element and mark it valid.
    pub fn set_string(&mut self, name: &str, row: usize, value: &str) -> Result<(), Error> {
        self.find_mut(name)?.set_string(row, value)
    }

    /// Store an array in a row of an array column.
    pub fn set_array(&mut self, name: &str, row: usize, array: Array) -> Result<(), Error> {
        self.find_mut(name)?.set_array(row, array)
    }

    /// Mark an element as invalid.
    pub fn set_invalid(&mut self, name: &str, row: usize) -> Result<(), Error> {
        self.find_mut(name)?.set_invalid(row)
    }

    /// Set `count` elements of a column starting at `start` and mark them valid.
    pub fn fill_window<T: Element>(
        &mut self,
        name: &str,
        start: usize,
        count: usize,
        value: T,
    ) -> Result<(), Error> {
        self.find_mut(name)?.fill_window(start, count, value)
    }

    /// Set `count` strings of a column starting at `start` and mark them valid.
    pub fn fill_window_string(
        &mut self,
        name: &str,
        start: usize,
        count: usize,
        value: &str,
    ) -> Result<(), Error> {
        self.find_mut(name)?.fill_window_string(start, count, value)
    }

    /// Mark `count` elements of a column starting at `start` as invalid.
    pub fn fill_window_invalid(&mut self, name: &str, start: usize, count: usize) -> Result<(), Error> {
        self.find_mut(name)?.fill_window_invalid(start, count)
    }

    /// Replace the payload of a column by a copy of `values`, marking every element valid.
    pub fn copy_data<T: Element>(&mut self, name: &str, values: &[T]) -> Result<(), Error> {
        self.find_mut(name)?.copy_data(values)
    }

    /// Overwrite the payload of every invalid element of an integer column.
    pub fn fill_invalid_int(&mut self, name: &str, code: i64) -> Result<(), Error> {
        self.find_mut(name)?.fill_invalid_int(code)
    }

    /// Overwrite the payload of every invalid element of a float or double column.
    pub fn fill_invalid_real(&mut self, name: &str, code: f64) -> Result<(), Error> {
        self.find_mut(name)?.fill_invalid_real(code)
    }

    /// Convert the column `from` to the given target.
    ///
    /// If `to` is [None] or equal to `from`, the column is replaced in place,
    /// otherwise the result is added as a new column named `to`.
    pub fn cast_column(&mut self, from: &str, to: Option<&str>, target: CastTarget) -> Result<(), Error> {
        let column = self.find(from)?;

        match to {
            Some(to) if to != from => {
                self.check_new_name(to)?;
                let mut cast = column.cast_to(target)?;
                cast.set_name(to);
                self.columns.insert(to.to_string(), cast);
            }
            _ => {
                if column.column_type().cast_result(target) == column.column_type() {
                    return Ok(());
                }

                let cast = column.cast_to(target)?;
                *self.find_mut(from)? = cast;
            }
        }

        Ok(())
    }

    /// Combine column `to` with column `from` row by row, storing the result in `to`.
    ///
    /// Both names may refer to the same column.
    pub fn apply_columns(&mut self, to: &str, operator: ArithmeticOperator, from: &str) -> Result<(), Error> {
        let operands = self.find(from)?.operands()?;
        self.find_mut(to)?.apply_operands(operator, &operands)
    }

    /// Combine every element of a column with `value`.
    pub fn apply_scalar(&mut self, name: &str, operator: ArithmeticOperator, value: Number) -> Result<(), Error> {
        self.find_mut(name)?.apply_scalar(operator, value)
    }

    /// Replace every element of a column by its absolute value.
    pub fn abs_column(&mut self, name: &str) -> Result<(), Error> {
        self.find_mut(name)?.abs()
    }

    /// Replace every element of a column by its logarithm to `base`.
    pub fn logarithm_column(&mut self, name: &str, base: f64) -> Result<(), Error> {
        self.find_mut(name)?.logarithm(base)
    }

    /// Replace every element `x` of a column by `base` to the power of `x`.
    pub fn exponential_column(&mut self, name: &str, base: f64) -> Result<(), Error> {
        self.find_mut(name)?.exponential(base)
    }

    /// Replace every element `x` of a column by `x` to the power of `exponent`.
    pub fn power_column(&mut self, name: &str, exponent: f64) -> Result<(), Error> {
        self.find_mut(name)?.power(exponent)
    }

    /// Change the number of rows, padding every column with invalid elements.
    ///
    /// Resets the selection to all rows.
    pub fn set_size(&mut self, rows: usize) {
        log::debug!("resizing table from {} to {rows} rows", self.rows);

        for (_, column) in self.columns.iter_mut() {
            column.resize(rows);
        }
        self.rows = rows;
        self.reset_selection();
    }

    /// Insert `count` rows of invalid elements before row `start`.
    ///
    /// A `start` past the end appends the rows.
    /// Resets the selection to all rows.
    pub fn insert_window(&mut self, start: usize, count: usize) {
        let start = start.min(self.rows);
        log::debug!("inserting {count} rows at {start}");

        for (_, column) in self.columns.iter_mut() {
            column.insert_invalid(start, count);
        }
        self.rows += count;
        self.reset_selection();
    }

    /// Delete `count` rows starting at `start`, stopping at the end of the table.
    ///
    /// Resets the selection to all rows.
    pub fn erase_window(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let count = self.clamp_window(start, count)?;
        log::debug!("erasing {count} rows at {start}");

        for (_, column) in self.columns.iter_mut() {
            column.remove(start, count);
        }
        self.rows -= count;
        self.reset_selection();

        Ok(())
    }

    /// Check that `start` is a row of this table and
    /// shorten `count` such that the window ends within the table.
    pub(super) fn clamp_window(&self, start: usize, count: usize) -> Result<usize, Error> {
        if start >= self.rows {
            return Err(Error::OutOfRange {
                index: start,
                len: self.rows,
            });
        }

        Ok(count.min(self.rows - start))
    }

    /// Delete the given rows, which must be ascending.
    pub(super) fn erase_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }

        let keep: Vec<usize> = (0..self.rows)
            .filter(|row| rows.binary_search(row).is_err())
            .collect();

        for (_, column) in self.columns.iter_mut() {
            column.retain_rows(&keep);
        }
        self.rows = keep.len();
        self.reset_selection();
    }

    /// Delete every row that holds an invalid element in any column.
    ///
    /// Resets the selection to all rows.
    pub fn erase_invalid_rows(&mut self) {
        let mut invalid = Mask::empty(self.rows);
        for column in self.columns.values() {
            let rows = column.invalid_rows();
            if rows.is_full() {
                invalid.fill(true);
                break;
            }
            for row in rows.ones() {
                invalid.set(row, true);
            }
        }

        let rows: Vec<usize> = invalid.ones().collect();
        log::debug!("erasing {} rows with invalid elements", rows.len());
        self.erase_rows(&rows);
    }

    /// Return `true` if both tables have columns of the same names, types and units.
    ///
    /// The order of the columns is not relevant.
    pub fn compare_structure(&self, other: &Table) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.values().all(|column| {
                other
                    .columns
                    .get(column.name())
                    .is_some_and(|other| column.same_structure(other))
            })
    }

    /// Insert a copy of the rows of `source` before row `row`.
    /// A row past the end appends.
    ///
    /// Both tables must have the same structure.
    /// Resets the selection to all rows.
    pub fn insert(&mut self, row: usize, source: &Table) -> Result<(), Error> {
        if !self.compare_structure(source) {
            return Err(Error::IncompatibleInput(
                "tables have different columns".to_string(),
            ));
        }
        let row = row.min(self.rows);

        log::debug!("inserting {} rows at {row}", source.rows);
        for (_, column) in self.columns.iter_mut() {
            let other = lookup(&source.columns, column.name())?;
            column.insert_from(row, other)?;
        }
        self.rows += source.rows;
        self.reset_selection();

        Ok(())
    }

    /// Return a new table with a copy of `count` rows starting at `start`,
    /// stopping at the end of the table.
    pub fn extract(&self, start: usize, count: usize) -> Result<Table, Error> {
        let count = self.clamp_window(start, count)?;

        Ok(Table {
            rows: count,
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.extract(start..start + count)))
                .collect(),
            selection: Mask::full(count),
        })
    }

    /// Return a new table with a copy of the given rows.
    pub(super) fn gather(&self, rows: &[usize]) -> Table {
        Table {
            rows: rows.len(),
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.gather(rows)))
                .collect(),
            selection: Mask::full(rows.len()),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        columnar::{Column, Ownership},
        datatypes::{ArithmeticOperator, CastTarget, ColumnType, ElementType, Number, NumericType},
        error::Error,
    };

    use super::Table;

    fn catalogue() -> Table {
        let mut table = Table::new(4);
        table.new_column("RA", ColumnType::Scalar(NumericType::Double)).unwrap();
        table.new_column("NAME", ColumnType::Text).unwrap();
        table.new_column("FLAG", ColumnType::Scalar(NumericType::Int)).unwrap();

        for row in 0..4 {
            table.set("RA", row, 10.0 * row as f64).unwrap();
            table.set_string("NAME", row, &format!("star {row}")).unwrap();
        }
        table.set("FLAG", 1, 7_i32).unwrap();

        table
    }

    #[test]
    fn fresh_table() {
        let mut table = Table::new(3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.count_selected(), 3);

        table.new_column("X", ColumnType::Scalar(NumericType::Float)).unwrap();
        assert_eq!(table.count_invalid("X"), Ok(3));

        assert_eq!(
            table.new_column("X", ColumnType::Text),
            Err(Error::IllegalInput("column \"X\" already exists".to_string()))
        );
        assert_eq!(table.new_column("", ColumnType::Text), Err(Error::NullArgument("name")));
        assert!(matches!(
            table.new_column_array("A", ElementType::Text, 0),
            Err(Error::IllegalInput(_))
        ));
        assert_eq!(table.find("Y").unwrap_err(), Error::NotFound("Y".to_string()));
    }

    #[test]
    fn column_management() {
        let mut table = catalogue();
        table.rename_column("NAME", "ID").unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["RA", "ID", "FLAG"]);
        assert_eq!(table.find("ID").unwrap().name(), "ID");

        table.duplicate_column("DEC", "RA").unwrap();
        table.set("DEC", 0, -1.0_f64).unwrap();
        assert_eq!(table.get_double("RA", 0), Ok(Some(0.0)));
        assert_eq!(table.get_double("DEC", 0), Ok(Some(-1.0)));

        let mut other = Table::new(4);
        other.move_column("FLAG", &mut table).unwrap();
        assert!(!table.has_column("FLAG"));
        assert_eq!(other.get::<i32>("FLAG", 1), Ok(Some(7)));

        let mut short = Table::new(2);
        assert!(matches!(
            short.move_column("RA", &mut table),
            Err(Error::IncompatibleInput(_))
        ));
        assert!(table.has_column("RA"));
    }

    #[test]
    fn wrap_and_unwrap() {
        let mut table = Table::new(3);
        let values = vec![1_i16, 2, 3];
        let pointer = values.as_ptr();

        table.wrap("N", values).unwrap();
        assert_eq!(table.find("N").unwrap().ownership(), Ownership::Wrapped);
        assert!(matches!(table.unwrap::<i32>("N"), Err(Error::TypeMismatch { .. })));

        let values = table.unwrap::<i16>("N").unwrap();
        assert_eq!(values.as_ptr(), pointer);
        assert!(!table.has_column("N"));

        assert!(matches!(table.wrap("N", vec![1_u8]), Err(Error::IncompatibleInput(_))));

        table.new_column_array("A", NumericType::Int.into(), 2).unwrap();
        assert!(matches!(table.unwrap::<i32>("A"), Err(Error::UnsupportedMode(_))));
    }

    #[test]
    fn resize_and_windows() {
        let mut table = catalogue();
        table.unselect_row(0).unwrap();

        table.insert_window(10, 2);
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.count_selected(), 6);
        assert_eq!(table.get_double("RA", 5), Ok(None));

        table.insert_window(0, 1);
        assert_eq!(table.get_double("RA", 1), Ok(Some(0.0)));
        assert_eq!(table.get_string("NAME", 0), Ok(None));

        table.erase_window(0, 2).unwrap();
        assert_eq!(table.get_double("RA", 0), Ok(Some(10.0)));
        assert_eq!(table.row_count(), 5);

        table.erase_window(3, 100).unwrap();
        assert_eq!(table.row_count(), 3);
        assert!(matches!(table.erase_window(3, 1), Err(Error::OutOfRange { .. })));

        table.set_size(5);
        assert!(table.columns().all(|column| column.len() == 5));
        assert_eq!(table.count_invalid("RA"), Ok(2));
        table.set_size(1);
        assert_eq!(table.get_double("RA", 0), Ok(Some(10.0)));
    }

    #[test]
    fn insert_and_extract() {
        let mut table = catalogue();
        let copy = table.extract(2, 10).unwrap();
        assert_eq!(copy.row_count(), 2);
        assert_eq!(copy.get_string("NAME", 0), Ok(Some("star 2")));
        assert!(table.compare_structure(&copy));

        table.insert(1, &copy).unwrap();
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.get_string("NAME", 1), Ok(Some("star 2")));
        assert_eq!(table.get_string("NAME", 3), Ok(Some("star 1")));
        assert_eq!(table.get::<i32>("FLAG", 3), Ok(Some(7)));

        let mut other = copy.clone();
        other.set_unit("RA", Some("deg")).unwrap();
        assert!(!table.compare_structure(&other));
        assert!(matches!(table.insert(0, &other), Err(Error::IncompatibleInput(_))));
        assert!(matches!(table.extract(6, 1), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn insert_past_the_end_appends() {
        let mut table = catalogue();
        let copy = table.extract(0, 2).unwrap();

        table.insert(10, &copy).unwrap();
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.get_string("NAME", 3), Ok(Some("star 3")));
        assert_eq!(table.get_string("NAME", 4), Ok(Some("star 0")));
        assert_eq!(table.get_string("NAME", 5), Ok(Some("star 1")));
        assert!(table.columns().all(|column| column.len() == 6));
    }

    #[test]
    fn columns_follow_the_row_count() {
        let mut table = catalogue();
        let rows = |table: &Table| {
            table
                .columns()
                .all(|column| column.len() == table.row_count())
        };

        let short = Column::new("SHORT", ColumnType::Text, 3).unwrap();
        assert!(matches!(table.add_column(short), Err(Error::IncompatibleInput(_))));
        assert!(!table.has_column("SHORT"));
        assert!(matches!(
            table.wrap("W", vec![1.0_f32; 5]),
            Err(Error::IncompatibleInput(_))
        ));
        assert!(matches!(
            table.copy_data("RA", &[1.0_f64; 9]),
            Err(Error::IncompatibleInput(_))
        ));
        assert!(rows(&table));

        table.insert_window(2, 3);
        assert!(rows(&table));
        table.erase_window(1, 2).unwrap();
        assert!(rows(&table));
        table.set_size(9);
        assert!(rows(&table));
        table.erase_invalid_rows();
        assert!(rows(&table));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn cast_in_place_and_copy() {
        let mut table = catalogue();
        table.set_unit("RA", Some("deg")).unwrap();

        table.cast_column("RA", None, CastTarget::scalar(NumericType::Double)).unwrap();
        assert_eq!(table.column_type("RA"), Ok(ColumnType::Scalar(NumericType::Double)));

        table.cast_column("RA", Some("RA_INT"), CastTarget::scalar(NumericType::Int)).unwrap();
        assert_eq!(table.get::<i32>("RA_INT", 3), Ok(Some(30)));
        assert_eq!(table.unit("RA_INT"), Ok(Some("deg")));

        table.cast_column("FLAG", Some("FLAG"), CastTarget::array(NumericType::Int)).unwrap();
        assert_eq!(table.find("FLAG").unwrap().depth(), 1);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["RA", "NAME", "FLAG", "RA_INT"]
        );

        assert!(matches!(
            table.cast_column("NAME", None, CastTarget::scalar(NumericType::Int)),
            Err(Error::InvalidType(_))
        ));
    }

    #[test]
    fn column_arithmetic() {
        let mut table = catalogue();
        table.apply_columns("RA", ArithmeticOperator::Add, "RA").unwrap();
        assert_eq!(table.get_double("RA", 2), Ok(Some(40.0)));

        table.apply_columns("RA", ArithmeticOperator::Multiply, "FLAG").unwrap();
        assert_eq!(table.count_invalid("RA"), Ok(3));
        assert_eq!(table.get_double("RA", 1), Ok(Some(140.0)));

        table.apply_scalar("FLAG", ArithmeticOperator::Divide, Number::Integer(0)).unwrap();
        assert_eq!(table.count_invalid("FLAG"), Ok(4));
        assert!(matches!(
            table.apply_columns("NAME", ArithmeticOperator::Add, "RA"),
            Err(Error::InvalidType(_))
        ));
    }

    #[test]
    fn erase_rows_with_invalid_elements() {
        let mut table = catalogue();
        table.set_invalid("RA", 3).unwrap();
        table.erase_column("FLAG").unwrap();

        table.erase_invalid_rows();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.count_invalid("RA"), Ok(0));

        table.new_column("EMPTY", ColumnType::Scalar(NumericType::Int)).unwrap();
        table.erase_invalid_rows();
        assert_eq!(table.row_count(), 0);
    }
}

//! This module implements a human-readable dump of a [Table].

use std::fmt::{Display, Formatter, Result};

use itertools::Itertools;

use crate::columnar::{Array, Column};

use super::Table;

const INVALID: &str = "-";

fn array_cell(array: &Array) -> String {
    let elements = (0..array.len()).map(|index| match array.element_type().numeric() {
        Some(_) => array
            .get_number(index)
            .ok()
            .flatten()
            .map_or_else(|| INVALID.to_string(), |number| number.to_string()),
        None => array
            .get_string(index)
            .ok()
            .flatten()
            .unwrap_or(INVALID)
            .to_string(),
    });

    format!("({})", elements.format(", "))
}

fn cell(column: &Column, row: usize) -> String {
    if column.is_valid(row) != Ok(true) {
        return INVALID.to_string();
    }

    if let Ok(Some(array)) = column.get_array(row) {
        return array_cell(array);
    }
    if let Ok(Some(string)) = column.get_string(row) {
        return string.to_string();
    }

    column
        .get_number(row)
        .ok()
        .flatten()
        .map_or_else(|| INVALID.to_string(), |number| number.to_string())
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "table of {} columns and {} rows, {} selected",
            self.column_count(),
            self.row_count(),
            self.count_selected()
        )?;

        for column in self.columns() {
            write!(f, "  {}: {}", column.name(), column.column_type())?;
            if let Some(unit) = column.unit() {
                write!(f, " [{unit}]")?;
            }
            writeln!(f)?;
        }

        if self.column_count() == 0 {
            return Ok(());
        }

        writeln!(f, "row {}", self.column_names().join(" "))?;
        for row in 0..self.row_count() {
            let marker = if self.selection.get(row) { '*' } else { ' ' };
            writeln!(
                f,
                "{marker}{row} {}",
                self.columns().map(|column| cell(column, row)).join(" ")
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        columnar::Array,
        datatypes::{ColumnType, ElementType, NumericType},
        tabular::Table,
    };

    #[test]
    fn dump() {
        let mut table = Table::new(2);
        table.new_column("N", ColumnType::Scalar(NumericType::Int)).unwrap();
        table.new_column("S", ColumnType::Text).unwrap();
        table.new_column_array("A", ElementType::Numeric(NumericType::Double), 2).unwrap();
        table.set_unit("N", Some("ct")).unwrap();

        table.set("N", 0, 42_i32).unwrap();
        table.set_string("S", 1, "x").unwrap();
        let mut array = Array::from_values(vec![1.5_f64, 2.0]);
        array.set_invalid(1).unwrap();
        table.set_array("A", 0, array).unwrap();
        table.unselect_row(1).unwrap();

        let expected = "table of 3 columns and 2 rows, 1 selected\n\
                        \x20 N: int [ct]\n\
                        \x20 S: string\n\
                        \x20 A: array of 2 double\n\
                        row N S A\n\
                        *0 42 - (1.5, -)\n\
                        \x201 - x -\n";
        assert_eq!(table.to_string(), expected);
    }
}

//! This module implements summary statistics over the valid elements of a column.

use crate::error::Error;

use super::Column;

impl Column {
    /// Collect the valid elements together with their row.
    fn valid_reals(&self, minimum: usize) -> Result<Vec<(usize, f64)>, Error> {
        match self.column_type().numeric() {
            Some(numeric) if !numeric.is_complex() => {}
            _ => {
                return Err(Error::InvalidType(format!(
                    "statistics are undefined on column \"{}\" of type {}",
                    self.name(),
                    self.column_type()
                )))
            }
        }

        let values: Vec<(usize, f64)> = self
            .invalid_rows()
            .zeros()
            .filter_map(|row| {
                let value = self.buffer().data().number_at(row)?.as_f64()?;
                Some((row, value))
            })
            .collect();

        if values.len() < minimum {
            return Err(Error::IllegalInput(format!(
                "column \"{}\" has {} valid elements, at least {minimum} needed",
                self.name(),
                values.len()
            )));
        }

        Ok(values)
    }

    /// Arithmetic mean of the valid elements.
    pub fn mean(&self) -> Result<f64, Error> {
        let values = self.valid_reals(1)?;
        Ok(values.iter().map(|(_, value)| value).sum::<f64>() / values.len() as f64)
    }

    /// Median of the valid elements.
    ///
    /// For an even number of elements, the mean of the two central ones is returned.
    pub fn median(&self) -> Result<f64, Error> {
        let mut values: Vec<f64> = self
            .valid_reals(1)?
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        values.sort_by(f64::total_cmp);

        let middle = values.len() / 2;
        Ok(if values.len() % 2 == 0 {
            (values[middle - 1] + values[middle]) / 2.0
        } else {
            values[middle]
        })
    }

    /// Sample standard deviation of the valid elements.
    pub fn stdev(&self) -> Result<f64, Error> {
        let values = self.valid_reals(2)?;
        let count = values.len() as f64;
        let mean = values.iter().map(|(_, value)| value).sum::<f64>() / count;
        let squares: f64 = values
            .iter()
            .map(|(_, value)| (value - mean) * (value - mean))
            .sum();

        Ok((squares / (count - 1.0)).sqrt())
    }

    fn extremum(&self, replace: fn(f64, f64) -> bool) -> Result<(usize, f64), Error> {
        let values = self.valid_reals(1)?;
        let mut best = values[0];
        for &(row, value) in &values[1..] {
            if replace(value, best.1) {
                best = (row, value);
            }
        }

        Ok(best)
    }

    /// Smallest valid element.
    pub fn min(&self) -> Result<f64, Error> {
        Ok(self.extremum(|value, best| value < best)?.1)
    }

    /// Largest valid element.
    pub fn max(&self) -> Result<f64, Error> {
        Ok(self.extremum(|value, best| value > best)?.1)
    }

    /// Row of the first occurrence of the smallest valid element.
    pub fn min_pos(&self) -> Result<usize, Error> {
        Ok(self.extremum(|value, best| value < best)?.0)
    }

    /// Row of the first occurrence of the largest valid element.
    pub fn max_pos(&self) -> Result<usize, Error> {
        Ok(self.extremum(|value, best| value > best)?.0)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        columnar::Column,
        datatypes::{ColumnType, NumericType},
        error::Error,
    };

    fn magnitudes() -> Column {
        let mut column = Column::new("MAG", ColumnType::Scalar(NumericType::Short), 6).unwrap();
        for (row, value) in [(0, 4_i16), (1, 1), (3, 9), (4, 1), (5, 9)] {
            column.set(row, value).unwrap();
        }
        column
    }

    #[test]
    fn summary_statistics() {
        let column = magnitudes();
        assert_eq!(column.mean(), Ok(4.8));
        assert_eq!(column.median(), Ok(4.0));
        assert_eq!(column.min(), Ok(1.0));
        assert_eq!(column.max(), Ok(9.0));
        assert_eq!(column.min_pos(), Ok(1));
        assert_eq!(column.max_pos(), Ok(3));

        let stdev = column.stdev().unwrap();
        assert!((stdev - 4.024922359499621).abs() < 1e-12);
    }

    #[test]
    fn even_median() {
        let column = Column::wrap("X", vec![3.0_f64, 1.0, 2.0, 10.0]).unwrap();
        assert_eq!(column.median(), Ok(2.5));
        let mut column = column;
        column.release::<f64>().unwrap();
    }

    #[test]
    fn undefined_statistics() {
        let empty = Column::new("E", ColumnType::Scalar(NumericType::Int), 3).unwrap();
        assert!(matches!(empty.mean(), Err(Error::IllegalInput(_))));

        let mut single = Column::new("S", ColumnType::Scalar(NumericType::Int), 1).unwrap();
        single.set(0, 1_i32).unwrap();
        assert_eq!(single.mean(), Ok(1.0));
        assert!(matches!(single.stdev(), Err(Error::IllegalInput(_))));

        let text = Column::new("T", ColumnType::Text, 1).unwrap();
        assert!(matches!(text.median(), Err(Error::InvalidType(_))));
    }
}

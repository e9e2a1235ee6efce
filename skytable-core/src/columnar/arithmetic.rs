//! This module implements elementwise arithmetic on columns.

use crate::{
    datatypes::{ArithmeticOperator, Number, NumericType},
    error::Error,
};

use super::Column;

/// Snapshot of the right-hand side of a binary column operation.
#[derive(Debug, Clone)]
pub(crate) struct Operands {
    numeric: NumericType,
    values: Vec<Option<Number>>,
}

impl Column {
    fn arithmetic_type(&self) -> Result<NumericType, Error> {
        self.column_type().numeric().ok_or_else(|| {
            Error::InvalidType(format!(
                "arithmetic is undefined on column \"{}\" of type {}",
                self.name(),
                self.column_type()
            ))
        })
    }

    fn real_type(&self) -> Result<NumericType, Error> {
        let numeric = self.arithmetic_type()?;
        if numeric.is_complex() {
            return Err(Error::InvalidType(format!(
                "operation is undefined on complex column \"{}\"",
                self.name()
            )));
        }

        Ok(numeric)
    }

    /// Copy out the values of this column for use as right-hand side of an operation.
    pub(crate) fn operands(&self) -> Result<Operands, Error> {
        let numeric = self.arithmetic_type()?;
        let values = (0..self.len())
            .map(|row| self.buffer().get_number(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Operands { numeric, values })
    }

    pub(crate) fn apply_operands(
        &mut self,
        operator: ArithmeticOperator,
        operands: &Operands,
    ) -> Result<(), Error> {
        let numeric = self.arithmetic_type()?;
        if operands.numeric.is_complex() && !numeric.is_complex() {
            return Err(Error::type_mismatch(operands.numeric, "non-complex operand"));
        }
        if operands.values.len() != self.len() {
            return Err(Error::IncompatibleInput(format!(
                "column \"{}\" has {} rows, operand has {}",
                self.name(),
                self.len(),
                operands.values.len()
            )));
        }

        self.buffer_mut()
            .update(|row, lhs| lhs.apply(operator, operands.values[row]?));

        Ok(())
    }

    /// Combine every element with the element in the same row of `other`,
    /// storing the result in this column.
    ///
    /// The result is invalid where either operand is invalid
    /// or where a division by zero occurs.
    pub fn apply(&mut self, operator: ArithmeticOperator, other: &Column) -> Result<(), Error> {
        let operands = other.operands()?;
        self.apply_operands(operator, &operands)
    }

    /// Combine every element with `value`, storing the result in this column.
    pub fn apply_scalar(&mut self, operator: ArithmeticOperator, value: Number) -> Result<(), Error> {
        let numeric = self.arithmetic_type()?;
        if value.is_complex() && !numeric.is_complex() {
            return Err(Error::type_mismatch("complex", "non-complex operand"));
        }

        self.buffer_mut().update(|_, lhs| lhs.apply(operator, value));
        Ok(())
    }

    fn update_real<F: Fn(f64) -> f64>(&mut self, function: F) -> Result<(), Error> {
        self.real_type()?;
        self.buffer_mut().update(|_, number| {
            let result = function(number.as_f64()?);
            result.is_finite().then_some(Number::Real(result))
        });

        Ok(())
    }

    /// Replace every element by its absolute value.
    pub fn abs(&mut self) -> Result<(), Error> {
        self.real_type()?;
        self.buffer_mut().update(|_, number| match number {
            Number::Integer(value) => Some(Number::Integer(value.wrapping_abs())),
            Number::Real(value) => Some(Number::Real(value.abs())),
            Number::Complex(_) => None,
        });

        Ok(())
    }

    /// Replace every element by its logarithm to the given base.
    ///
    /// Elements that are not positive become invalid.
    pub fn logarithm(&mut self, base: f64) -> Result<(), Error> {
        if base.is_nan() || base <= 0.0 || base == 1.0 {
            return Err(Error::IllegalInput(format!(
                "logarithm base must be positive and different from 1, got {base}"
            )));
        }

        self.update_real(|value| value.log(base))
    }

    /// Replace every element `x` by `base` to the power of `x`.
    pub fn exponential(&mut self, base: f64) -> Result<(), Error> {
        if base.is_nan() || base <= 0.0 {
            return Err(Error::IllegalInput(format!(
                "exponential base must be positive, got {base}"
            )));
        }

        self.update_real(|value| base.powf(value))
    }

    /// Replace every element `x` by `x` to the power of `exponent`.
    ///
    /// Elements without a finite result become invalid.
    pub fn power(&mut self, exponent: f64) -> Result<(), Error> {
        self.update_real(|value| value.powf(exponent))
    }
}

#[cfg(test)]
mod test {
    use num::complex::Complex64;
    use test_log::test;

    use crate::{
        columnar::Column,
        datatypes::{ArithmeticOperator, ColumnType, Number, NumericType},
        error::Error,
    };

    fn column(name: &str, values: &[Option<i32>]) -> Column {
        let mut column = Column::new(name, ColumnType::Scalar(NumericType::Int), values.len()).unwrap();
        for (row, value) in values.iter().enumerate() {
            if let Some(value) = value {
                column.set(row, *value).unwrap();
            }
        }
        column
    }

    #[test]
    fn invalid_operands_propagate() {
        let mut left = column("A", &[Some(6), Some(6), None, Some(6)]);
        let right = column("B", &[Some(3), None, Some(1), Some(0)]);

        left.apply(ArithmeticOperator::Divide, &right).unwrap();
        assert_eq!(left.get::<i32>(0), Ok(Some(2)));
        assert_eq!(left.get::<i32>(1), Ok(None));
        assert_eq!(left.get::<i32>(2), Ok(None));
        assert_eq!(left.get::<i32>(3), Ok(None));
        assert_eq!(left.count_invalid(), 3);
    }

    #[test]
    fn scalar_operands() {
        let mut values = column("A", &[Some(i32::MAX), Some(-4)]);
        values.apply_scalar(ArithmeticOperator::Add, Number::Integer(1)).unwrap();
        assert_eq!(values.get::<i32>(0), Ok(Some(i32::MIN)));
        assert_eq!(values.get::<i32>(1), Ok(Some(-3)));

        assert!(matches!(
            values.apply_scalar(ArithmeticOperator::Add, Number::Complex(Complex64::new(0.0, 1.0))),
            Err(Error::TypeMismatch { .. })
        ));

        let mut strings = Column::new("S", ColumnType::Text, 2).unwrap();
        assert!(matches!(
            strings.apply_scalar(ArithmeticOperator::Add, Number::Integer(1)),
            Err(Error::InvalidType(_))
        ));
        assert!(matches!(values.apply(ArithmeticOperator::Add, &strings), Err(Error::InvalidType(_))));
        assert!(matches!(
            values.apply(ArithmeticOperator::Add, &column("C", &[Some(1)])),
            Err(Error::IncompatibleInput(_))
        ));
    }

    fn approx(column: &Column, row: usize) -> f64 {
        column.get_double(row).unwrap().unwrap()
    }

    #[test]
    fn unary_operators() {
        let mut values = Column::wrap("X", vec![-100.0_f64, 0.0, 100.0]).unwrap();

        values.abs().unwrap();
        assert_eq!(values.get::<f64>(0), Ok(Some(100.0)));

        values.logarithm(10.0).unwrap();
        assert!((approx(&values, 0) - 2.0).abs() < 1e-12);
        assert_eq!(values.get::<f64>(1), Ok(None));

        values.exponential(2.0).unwrap();
        assert!((approx(&values, 2) - 4.0).abs() < 1e-12);

        values.power(0.5).unwrap();
        assert!((approx(&values, 2) - 2.0).abs() < 1e-12);

        let mut zeros = Column::wrap("Z", vec![0.0_f64, 4.0]).unwrap();
        zeros.power(-1.0).unwrap();
        assert_eq!(zeros.get::<f64>(0), Ok(None));
        assert_eq!(zeros.get::<f64>(1), Ok(Some(0.25)));
        zeros.release::<f64>().unwrap();

        assert!(matches!(values.logarithm(1.0), Err(Error::IllegalInput(_))));
        assert!(matches!(values.exponential(-2.0), Err(Error::IllegalInput(_))));
        values.release::<f64>().unwrap();
    }
}

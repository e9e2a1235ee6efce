use std::{cmp::Ordering, fmt::Display};

use num::{
    complex::{Complex32, Complex64},
    Zero,
};

/// A numeric value widened to the largest representation of its kind.
///
/// Integers (and booleans) are read as [`i64`], floating point values as [`f64`]
/// and complex values as [`Complex64`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Widened integer or boolean
    Integer(i64),
    /// Widened floating point value
    Real(f64),
    /// Widened complex value
    Complex(Complex64),
}

/// Binary operators for column arithmetic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArithmeticOperator {
    /// `lhs + rhs`
    Add,
    /// `lhs - rhs`
    Subtract,
    /// `lhs * rhs`
    Multiply,
    /// `lhs / rhs`, undefined if `rhs` is zero
    Divide,
}

impl Number {
    /// Return the value as [`f64`], or [`None`] for complex values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(value) => Some(*value as f64),
            Number::Real(value) => Some(*value),
            Number::Complex(_) => None,
        }
    }

    /// Return the value as [`Complex64`], real values have zero imaginary part.
    pub fn as_complex(&self) -> Complex64 {
        match self {
            Number::Integer(value) => Complex64::new(*value as f64, 0.0),
            Number::Real(value) => Complex64::new(*value, 0.0),
            Number::Complex(value) => *value,
        }
    }

    /// Return `true` if this is a complex value.
    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Complex(_))
    }

    /// Compare two numbers.
    ///
    /// Complex values are only comparable for equality,
    /// so any two different values involving a complex number are unordered.
    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(left), Number::Integer(right)) => Some(left.cmp(right)),
            (Number::Complex(_), _) | (_, Number::Complex(_)) => {
                (self.as_complex() == other.as_complex()).then_some(Ordering::Equal)
            }
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    /// Apply an arithmetic operator.
    ///
    /// Integer arithmetic wraps on overflow and division truncates.
    /// Returns [`None`] on division by zero.
    pub(crate) fn apply(self, operator: ArithmeticOperator, rhs: Number) -> Option<Number> {
        match (self, rhs) {
            (Number::Integer(left), Number::Integer(right)) => match operator {
                ArithmeticOperator::Add => Some(Number::Integer(left.wrapping_add(right))),
                ArithmeticOperator::Subtract => Some(Number::Integer(left.wrapping_sub(right))),
                ArithmeticOperator::Multiply => Some(Number::Integer(left.wrapping_mul(right))),
                ArithmeticOperator::Divide => {
                    (right != 0).then(|| Number::Integer(left.wrapping_div(right)))
                }
            },
            (Number::Complex(_), _) | (_, Number::Complex(_)) => {
                let (left, right) = (self.as_complex(), rhs.as_complex());
                match operator {
                    ArithmeticOperator::Add => Some(Number::Complex(left + right)),
                    ArithmeticOperator::Subtract => Some(Number::Complex(left - right)),
                    ArithmeticOperator::Multiply => Some(Number::Complex(left * right)),
                    ArithmeticOperator::Divide => {
                        (!right.is_zero()).then(|| Number::Complex(left / right))
                    }
                }
            }
            _ => {
                let left = self.as_f64()?;
                let right = rhs.as_f64()?;
                match operator {
                    ArithmeticOperator::Add => Some(Number::Real(left + right)),
                    ArithmeticOperator::Subtract => Some(Number::Real(left - right)),
                    ArithmeticOperator::Multiply => Some(Number::Real(left * right)),
                    ArithmeticOperator::Divide => {
                        (right != 0.0).then(|| Number::Real(left / right))
                    }
                }
            }
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Real(value) => write!(f, "{value}"),
            Number::Complex(value) => write!(f, "{value}"),
        }
    }
}

/// A reference value for comparisons, either a number or a string.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Numeric value
    Number(Number),
    /// String value, interpreted as a regular expression by equality comparisons
    Text(String),
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

macro_rules! number_from {
    ($variant:ident, $wide:ty; $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(value: $source) -> Self {
                    Number::$variant(<$wide>::from(value))
                }
            }

            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )+
    };
}

number_from!(Integer, i64; bool, i8, u8, i16, i32, i64);
number_from!(Real, f64; f32, f64);

impl From<Complex32> for Number {
    fn from(value: Complex32) -> Self {
        Number::Complex(Complex64::new(value.re.into(), value.im.into()))
    }
}

impl From<Complex64> for Number {
    fn from(value: Complex64) -> Self {
        Number::Complex(value)
    }
}

impl From<Complex32> for Value {
    fn from(value: Complex32) -> Self {
        Value::Number(value.into())
    }
}

impl From<Complex64> for Value {
    fn from(value: Complex64) -> Self {
        Value::Number(value.into())
    }
}

use std::fmt::{Debug, Display};

use num::{
    complex::{Complex32, Complex64},
    Zero,
};

use crate::columnar::data::ColumnData;

use super::{Number, NumericType};

/// Rust types that represent the elements of numeric columns and arrays.
///
/// Every accessor of the crate that is generic over the element type
/// is monomorphized over these implementations.
/// [`i64`] serves both [NumericType::Long] and [NumericType::LongLong].
pub trait Element: Copy + Debug + Display + Default + PartialEq + Send + Sync + 'static {
    /// The numeric type used when a column is created from values of this type.
    const NATIVE: NumericType;

    /// Return whether columns of the given type store values of this type.
    fn accepts(numeric: NumericType) -> bool;

    /// Widen the value.
    fn to_number(self) -> Number;

    /// Convert a widened value into this type,
    /// truncating like an `as` conversion.
    fn from_number(number: Number) -> Self;

    #[doc(hidden)]
    fn values(data: &ColumnData) -> Option<&Vec<Self>>;

    #[doc(hidden)]
    fn values_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>>;

    #[doc(hidden)]
    fn into_data(values: Vec<Self>, numeric: NumericType) -> ColumnData;

    #[doc(hidden)]
    fn from_data(data: ColumnData) -> Result<Vec<Self>, ColumnData>;
}

macro_rules! element_storage {
    ($type:ty, $native:ident $(, $alias:ident)*) => {
        const NATIVE: NumericType = NumericType::$native;

        fn accepts(numeric: NumericType) -> bool {
            matches!(numeric, NumericType::$native $(| NumericType::$alias)*)
        }

        fn values(data: &ColumnData) -> Option<&Vec<Self>> {
            match data {
                ColumnData::$native(values) $(| ColumnData::$alias(values))* => Some(values),
                _ => None,
            }
        }

        fn values_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>> {
            match data {
                ColumnData::$native(values) $(| ColumnData::$alias(values))* => Some(values),
                _ => None,
            }
        }

        fn into_data(values: Vec<Self>, numeric: NumericType) -> ColumnData {
            match numeric {
                $(NumericType::$alias => ColumnData::$alias(values),)*
                _ => ColumnData::$native(values),
            }
        }

        fn from_data(data: ColumnData) -> Result<Vec<Self>, ColumnData> {
            match data {
                ColumnData::$native(values) $(| ColumnData::$alias(values))* => Ok(values),
                other => Err(other),
            }
        }
    };
}

macro_rules! integer_element {
    ($type:ty, $native:ident $(, $alias:ident)*) => {
        impl Element for $type {
            element_storage!($type, $native $(, $alias)*);

            fn to_number(self) -> Number {
                Number::Integer(i64::from(self))
            }

            #[allow(trivial_numeric_casts)]
            fn from_number(number: Number) -> Self {
                match number {
                    Number::Integer(value) => value as $type,
                    Number::Real(value) => value as $type,
                    Number::Complex(value) => value.re as $type,
                }
            }
        }
    };
}

macro_rules! real_element {
    ($type:ty, $native:ident) => {
        impl Element for $type {
            element_storage!($type, $native);

            fn to_number(self) -> Number {
                Number::Real(f64::from(self))
            }

            #[allow(trivial_numeric_casts)]
            fn from_number(number: Number) -> Self {
                match number {
                    Number::Integer(value) => value as $type,
                    Number::Real(value) => value as $type,
                    Number::Complex(value) => value.re as $type,
                }
            }
        }
    };
}

macro_rules! complex_element {
    ($type:ty, $part:ty, $native:ident) => {
        impl Element for $type {
            element_storage!($type, $native);

            fn to_number(self) -> Number {
                Number::Complex(Complex64::new(f64::from(self.re), f64::from(self.im)))
            }

            #[allow(trivial_numeric_casts)]
            fn from_number(number: Number) -> Self {
                match number {
                    Number::Integer(value) => <$type>::new(value as $part, 0.0),
                    Number::Real(value) => <$type>::new(value as $part, 0.0),
                    Number::Complex(value) => <$type>::new(value.re as $part, value.im as $part),
                }
            }
        }
    };
}

impl Element for bool {
    element_storage!(bool, Bool);

    fn to_number(self) -> Number {
        Number::Integer(i64::from(self))
    }

    fn from_number(number: Number) -> Self {
        match number {
            Number::Integer(value) => value != 0,
            Number::Real(value) => value != 0.0,
            Number::Complex(value) => !value.is_zero(),
        }
    }
}

integer_element!(i8, Char);
integer_element!(u8, UChar);
integer_element!(i16, Short);
integer_element!(i32, Int);
integer_element!(i64, Long, LongLong);
real_element!(f32, Float);
real_element!(f64, Double);
complex_element!(Complex32, f32, FloatComplex);
complex_element!(Complex64, f64, DoubleComplex);

#[cfg(test)]
mod test {
    use num::complex::Complex32;

    use crate::{
        columnar::data::ColumnData,
        datatypes::{Number, NumericType},
    };

    use super::Element;

    #[test]
    fn narrowing_truncates() {
        assert_eq!(i8::from_number(Number::Integer(300)), 44);
        assert_eq!(u8::from_number(Number::Integer(-1)), 255);
        assert_eq!(i32::from_number(Number::Real(-2.9)), -2);
        assert!(bool::from_number(Number::Real(0.5)));
        assert_eq!(
            Complex32::from_number(Number::Integer(2)),
            Complex32::new(2.0, 0.0)
        );
    }

    #[test]
    fn long_types_share_storage() {
        assert!(i64::accepts(NumericType::Long));
        assert!(i64::accepts(NumericType::LongLong));
        assert!(!i32::accepts(NumericType::Long));

        let data = i64::into_data(vec![1, 2], NumericType::LongLong);
        assert!(matches!(data, ColumnData::LongLong(_)));
        assert_eq!(i64::values(&data), Some(&vec![1, 2]));
        assert!(i32::values(&data).is_none());
    }
}

use std::fmt::Display;

/// Descriptors of the numeric value types a column or array can hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NumericType {
    /// Stored as [`bool`]
    Bool,
    /// Stored as [`i8`]
    Char,
    /// Stored as [`u8`]
    UChar,
    /// Stored as [`i16`]
    Short,
    /// Stored as [`i32`]
    Int,
    /// Stored as [`i64`]
    Long,
    /// Stored as [`i64`]
    LongLong,
    /// Stored as [`f32`]
    Float,
    /// Stored as [`f64`]
    Double,
    /// Stored as [`num::complex::Complex32`]
    FloatComplex,
    /// Stored as [`num::complex::Complex64`]
    DoubleComplex,
}

/// A list of all [NumericType]s,
/// in the order they appear in the enum.
pub const NUMERIC_TYPES: &[NumericType] = &[
    NumericType::Bool,
    NumericType::Char,
    NumericType::UChar,
    NumericType::Short,
    NumericType::Int,
    NumericType::Long,
    NumericType::LongLong,
    NumericType::Float,
    NumericType::Double,
    NumericType::FloatComplex,
    NumericType::DoubleComplex,
];

impl NumericType {
    /// Return `true` for the signed and unsigned integer types.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            NumericType::Char
                | NumericType::UChar
                | NumericType::Short
                | NumericType::Int
                | NumericType::Long
                | NumericType::LongLong
        )
    }

    /// Return `true` for [NumericType::Float] and [NumericType::Double].
    pub fn is_real(&self) -> bool {
        matches!(self, NumericType::Float | NumericType::Double)
    }

    /// Return `true` for the complex types.
    pub fn is_complex(&self) -> bool {
        matches!(self, NumericType::FloatComplex | NumericType::DoubleComplex)
    }

    /// Default display format of a column of this type.
    pub(crate) fn default_format(&self) -> &'static str {
        match self {
            NumericType::Bool => "% 1d",
            NumericType::Char | NumericType::UChar => "%c",
            NumericType::Short => "% 7hd",
            NumericType::Int => "% 7d",
            NumericType::Long => "% 7ld",
            NumericType::LongLong => "% 7lld",
            NumericType::Float
            | NumericType::Double
            | NumericType::FloatComplex
            | NumericType::DoubleComplex => "% 1.5e",
        }
    }

    /// Return whether a column of this type may be saved as `target`.
    pub(crate) fn can_save_as(&self, target: NumericType) -> bool {
        if self.is_integer() || *self == NumericType::Bool {
            target.is_integer() || target == NumericType::Bool
        } else if self.is_real() {
            target.is_real()
        } else {
            target.is_complex()
        }
    }
}

impl Display for NumericType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NumericType::Bool => "bool",
            NumericType::Char => "char",
            NumericType::UChar => "unsigned char",
            NumericType::Short => "short",
            NumericType::Int => "int",
            NumericType::Long => "long",
            NumericType::LongLong => "long long",
            NumericType::Float => "float",
            NumericType::Double => "double",
            NumericType::FloatComplex => "float complex",
            NumericType::DoubleComplex => "double complex",
        };

        write!(f, "{name}")
    }
}

/// Type of a single element, either numeric or a string.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ElementType {
    /// Numeric element
    Numeric(NumericType),
    /// String element
    Text,
}

impl ElementType {
    /// Return the numeric type, if this is not a string.
    pub fn numeric(&self) -> Option<NumericType> {
        match self {
            ElementType::Numeric(numeric) => Some(*numeric),
            ElementType::Text => None,
        }
    }

    pub(crate) fn default_format(&self) -> &'static str {
        match self {
            ElementType::Numeric(numeric) => numeric.default_format(),
            ElementType::Text => "%s",
        }
    }
}

impl From<NumericType> for ElementType {
    fn from(value: NumericType) -> Self {
        ElementType::Numeric(value)
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementType::Numeric(numeric) => write!(f, "{numeric}"),
            ElementType::Text => write!(f, "string"),
        }
    }
}

/// Type of a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ColumnType {
    /// One numeric value per row
    Scalar(NumericType),
    /// One string per row
    Text,
    /// One array of the given element type and depth per row
    Array(ElementType, usize),
}

impl ColumnType {
    /// Return the type of the individual elements.
    pub fn element(&self) -> ElementType {
        match self {
            ColumnType::Scalar(numeric) => ElementType::Numeric(*numeric),
            ColumnType::Text => ElementType::Text,
            ColumnType::Array(element, _) => *element,
        }
    }

    /// Length of the array stored in each row, `0` if the column does not hold arrays.
    pub fn depth(&self) -> usize {
        match self {
            ColumnType::Scalar(_) | ColumnType::Text => 0,
            ColumnType::Array(_, depth) => *depth,
        }
    }

    /// Return `true` if each row holds an array.
    pub fn is_array(&self) -> bool {
        matches!(self, ColumnType::Array(_, _))
    }

    /// Return the numeric type if the column holds numeric scalars.
    pub fn numeric(&self) -> Option<NumericType> {
        match self {
            ColumnType::Scalar(numeric) => Some(*numeric),
            ColumnType::Text | ColumnType::Array(_, _) => None,
        }
    }

    /// Type of the column that results from casting to `target`.
    ///
    /// Scalars become arrays of depth one if an array is requested,
    /// arrays of depth one are flattened if a scalar is requested,
    /// and deeper arrays keep their depth.
    pub fn cast_result(&self, target: CastTarget) -> ColumnType {
        let element = ElementType::Numeric(target.element);

        match (self.depth(), target.array) {
            (0, false) => ColumnType::Scalar(target.element),
            (0, true) => ColumnType::Array(element, 1),
            (1, false) => ColumnType::Scalar(target.element),
            (depth, _) => ColumnType::Array(element, depth),
        }
    }

    pub(crate) fn default_format(&self) -> &'static str {
        self.element().default_format()
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Scalar(numeric) => write!(f, "{numeric}"),
            ColumnType::Text => write!(f, "string"),
            ColumnType::Array(element, depth) => write!(f, "array of {depth} {element}"),
        }
    }
}

/// Requested target of a column cast.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CastTarget {
    /// Element type after the cast
    pub element: NumericType,
    /// Whether an array column is requested
    pub array: bool,
}

impl CastTarget {
    /// Cast to a scalar column of the given type.
    pub fn scalar(element: NumericType) -> Self {
        Self {
            element,
            array: false,
        }
    }

    /// Cast to an array column of the given element type.
    pub fn array(element: NumericType) -> Self {
        Self {
            element,
            array: true,
        }
    }
}

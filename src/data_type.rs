use std::fmt;

use arrow::datatypes::DataType as ArrowDataType;

use crate::error::Error;

/// Declared data type of a dictionary-encoded column.
///
/// Selects both how predicate literals are normalized and which typed
/// accessor the resolver reads from an [`InPredicate`](crate::InPredicate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Arbitrary-precision decimal.
    BigDecimal,
    /// Boolean, stored as `0` / `1` ints.
    Boolean,
    /// Timestamp, stored as epoch milliseconds.
    Timestamp,
    /// UTF-8 text.
    String,
    /// Opaque bytes, written as hex in predicate literals.
    Bytes,
}

impl DataType {
    /// Returns the type values of this column are physically stored as.
    ///
    /// Booleans live in int dictionaries and timestamps in long dictionaries.
    #[must_use]
    pub fn stored_type(self) -> DataType {
        match self {
            DataType::Boolean => DataType::Int,
            DataType::Timestamp => DataType::Long,
            other => other,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::BigDecimal => "BIG_DECIMAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Timestamp => "TIMESTAMP",
            DataType::String => "STRING",
            DataType::Bytes => "BYTES",
        })
    }
}

impl TryFrom<&ArrowDataType> for DataType {
    type Error = Error;

    fn try_from(value: &ArrowDataType) -> Result<Self, Self::Error> {
        Ok(match value {
            ArrowDataType::Int8 | ArrowDataType::Int16 | ArrowDataType::Int32 => DataType::Int,
            ArrowDataType::UInt8 | ArrowDataType::UInt16 => DataType::Int,
            ArrowDataType::Int64 | ArrowDataType::UInt32 => DataType::Long,
            ArrowDataType::Float32 => DataType::Float,
            ArrowDataType::Float64 => DataType::Double,
            ArrowDataType::Decimal128(_, _) | ArrowDataType::Decimal256(_, _) => {
                DataType::BigDecimal
            }
            ArrowDataType::Boolean => DataType::Boolean,
            ArrowDataType::Timestamp(_, _) | ArrowDataType::Date64 => DataType::Timestamp,
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 | ArrowDataType::Utf8View => {
                DataType::String
            }
            ArrowDataType::Binary
            | ArrowDataType::LargeBinary
            | ArrowDataType::BinaryView
            | ArrowDataType::FixedSizeBinary(_) => DataType::Bytes,
            ArrowDataType::Dictionary(_, value_type) => DataType::try_from(value_type.as_ref())?,
            other => return Err(Error::UnsupportedColumnType(other.clone())),
        })
    }
}

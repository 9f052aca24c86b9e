use arrow::datatypes::DataType as ArrowDataType;
use thiserror::Error;

use crate::data_type::DataType;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving predicate literals into dictionary ids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A literal could not be parsed as the column's data type.
    #[error("Invalid {data_type} value '{value}': {reason}")]
    ValueFormat {
        /// Data type the literal was parsed as.
        data_type: DataType,
        /// Offending literal text.
        value: String,
        /// Parser failure detail.
        reason: String,
    },
    /// A query option carried a value the engine does not understand.
    #[error("Illegal value '{value}' for query option {key}")]
    Configuration {
        /// Option key.
        key: &'static str,
        /// Rejected option value.
        value: String,
    },
    /// A caller broke an invariant that schema validation should have enforced.
    #[error("Internal state error: {0}")]
    InternalState(String),
    /// An Arrow column type has no dictionary-encoded counterpart.
    #[error("Unsupported column type: {0:?}")]
    UnsupportedColumnType(ArrowDataType),
}

impl Error {
    pub(crate) fn value_format(
        data_type: DataType,
        value: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::ValueFormat {
            data_type,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

//! IN / NOT-IN predicates and their typed value views.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use once_cell::sync::OnceCell;

use crate::{
    data_type::DataType,
    error::{Error, Result},
    normalize::{parse_boolean, parse_timestamp_millis},
};

/// Query-scoped identity of a predicate occurrence.
///
/// Handles are dense indexes assigned while the query plan is built (see
/// [`QueryContext::next_predicate_handle`](crate::QueryContext::next_predicate_handle)).
/// Two predicates carrying equal value lists still get distinct handles, so
/// per-predicate cache entries never have to hash or compare the lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateHandle(u32);

impl PredicateHandle {
    /// Wraps a plan-assigned predicate index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the plan-assigned predicate index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PredicateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "predicate#{}", self.0)
    }
}

/// Literal values of an IN / NOT-IN predicate.
///
/// Values are kept in the order they were written. Typed views are parsed on
/// first access and cached, so concurrent segment evaluations of the same
/// predicate parse each view at most once.
#[derive(Debug)]
pub struct InPredicate {
    handle: PredicateHandle,
    values: Vec<String>,
    negated: bool,
    int_values: OnceCell<Vec<i32>>,
    long_values: OnceCell<Vec<i64>>,
    float_values: OnceCell<Vec<f32>>,
    double_values: OnceCell<Vec<f64>>,
    big_decimal_values: OnceCell<Vec<BigDecimal>>,
    boolean_values: OnceCell<Vec<i32>>,
    timestamp_values: OnceCell<Vec<i64>>,
    bytes_values: OnceCell<Vec<Vec<u8>>>,
}

/// Typed view over a predicate's values, one variant per [`DataType`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypedValues<'a> {
    /// Int literals.
    Int(&'a [i32]),
    /// Long literals.
    Long(&'a [i64]),
    /// Float literals.
    Float(&'a [f32]),
    /// Double literals.
    Double(&'a [f64]),
    /// Decimal literals.
    BigDecimal(&'a [BigDecimal]),
    /// Boolean literals in stored int form.
    Boolean(&'a [i32]),
    /// Timestamp literals as epoch milliseconds.
    Timestamp(&'a [i64]),
    /// Text literals as written.
    String(&'a [String]),
    /// Hex literals decoded to bytes.
    Bytes(&'a [Vec<u8>]),
}

impl InPredicate {
    /// Builds an `IN (...)` predicate.
    pub fn new<S: Into<String>>(
        handle: PredicateHandle,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::with_negation(handle, values, false)
    }

    /// Builds a `NOT IN (...)` predicate.
    pub fn not_in<S: Into<String>>(
        handle: PredicateHandle,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::with_negation(handle, values, true)
    }

    fn with_negation<S: Into<String>>(
        handle: PredicateHandle,
        values: impl IntoIterator<Item = S>,
        negated: bool,
    ) -> Self {
        Self {
            handle,
            values: values.into_iter().map(Into::into).collect(),
            negated,
            int_values: OnceCell::new(),
            long_values: OnceCell::new(),
            float_values: OnceCell::new(),
            double_values: OnceCell::new(),
            big_decimal_values: OnceCell::new(),
            boolean_values: OnceCell::new(),
            timestamp_values: OnceCell::new(),
            bytes_values: OnceCell::new(),
        }
    }

    /// Returns the query-scoped identity of this predicate.
    #[must_use]
    pub fn handle(&self) -> PredicateHandle {
        self.handle
    }

    /// Returns true for `NOT IN`.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Raw literal text in written order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Literals parsed as ints.
    pub fn int_values(&self) -> Result<&[i32]> {
        self.int_values
            .get_or_try_init(|| parse_all(&self.values, DataType::Int, parse_std))
            .map(Vec::as_slice)
    }

    /// Literals parsed as longs.
    pub fn long_values(&self) -> Result<&[i64]> {
        self.long_values
            .get_or_try_init(|| parse_all(&self.values, DataType::Long, parse_std))
            .map(Vec::as_slice)
    }

    /// Literals parsed as floats.
    pub fn float_values(&self) -> Result<&[f32]> {
        self.float_values
            .get_or_try_init(|| parse_all(&self.values, DataType::Float, parse_std))
            .map(Vec::as_slice)
    }

    /// Literals parsed as doubles.
    pub fn double_values(&self) -> Result<&[f64]> {
        self.double_values
            .get_or_try_init(|| parse_all(&self.values, DataType::Double, parse_std))
            .map(Vec::as_slice)
    }

    /// Literals parsed as decimals.
    pub fn big_decimal_values(&self) -> Result<&[BigDecimal]> {
        self.big_decimal_values
            .get_or_try_init(|| parse_all(&self.values, DataType::BigDecimal, parse_std))
            .map(Vec::as_slice)
    }

    /// Literals parsed as booleans, in stored int form.
    pub fn boolean_values(&self) -> Result<&[i32]> {
        self.boolean_values
            .get_or_try_init(|| {
                self.values
                    .iter()
                    .map(|value| parse_boolean(value))
                    .collect()
            })
            .map(Vec::as_slice)
    }

    /// Literals parsed as timestamps, in epoch milliseconds.
    pub fn timestamp_values(&self) -> Result<&[i64]> {
        self.timestamp_values
            .get_or_try_init(|| {
                self.values
                    .iter()
                    .map(|value| parse_timestamp_millis(value))
                    .collect()
            })
            .map(Vec::as_slice)
    }

    /// Literals decoded from hex.
    pub fn bytes_values(&self) -> Result<&[Vec<u8>]> {
        self.bytes_values
            .get_or_try_init(|| {
                parse_all(&self.values, DataType::Bytes, |value: &str| {
                    hex::decode(value)
                })
            })
            .map(Vec::as_slice)
    }

    /// Returns the typed view matching `data_type`.
    pub fn typed_values(&self, data_type: DataType) -> Result<TypedValues<'_>> {
        Ok(match data_type {
            DataType::Int => TypedValues::Int(self.int_values()?),
            DataType::Long => TypedValues::Long(self.long_values()?),
            DataType::Float => TypedValues::Float(self.float_values()?),
            DataType::Double => TypedValues::Double(self.double_values()?),
            DataType::BigDecimal => TypedValues::BigDecimal(self.big_decimal_values()?),
            DataType::Boolean => TypedValues::Boolean(self.boolean_values()?),
            DataType::Timestamp => TypedValues::Timestamp(self.timestamp_values()?),
            DataType::String => TypedValues::String(&self.values),
            DataType::Bytes => TypedValues::Bytes(self.bytes_values()?),
        })
    }
}

fn parse_std<T>(value: &str) -> std::result::Result<T, T::Err>
where
    T: FromStr,
{
    value.parse()
}

fn parse_all<T, E: fmt::Display>(
    values: &[String],
    data_type: DataType,
    parse: impl Fn(&str) -> std::result::Result<T, E>,
) -> Result<Vec<T>> {
    values
        .iter()
        .map(|value| parse(value).map_err(|err| Error::value_format(data_type, value, err)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_views_parse_in_written_order() {
        let predicate = InPredicate::new(PredicateHandle::new(0), ["3", "-1", "7"]);
        assert_eq!(predicate.int_values().unwrap(), &[3, -1, 7]);
        assert_eq!(predicate.long_values().unwrap(), &[3, -1, 7]);
        assert_eq!(predicate.double_values().unwrap(), &[3.0, -1.0, 7.0]);
        assert_eq!(
            predicate.typed_values(DataType::Float).unwrap(),
            TypedValues::Float(&[3.0, -1.0, 7.0])
        );
        assert!(!predicate.is_negated());
    }

    #[test]
    fn typed_views_are_parsed_once() {
        let predicate = InPredicate::new(PredicateHandle::new(0), ["1", "2"]);
        let first = predicate.long_values().unwrap().as_ptr();
        let second = predicate.long_values().unwrap().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn boolean_and_timestamp_views_use_stored_form() {
        let predicate = InPredicate::not_in(PredicateHandle::new(1), ["true", "FALSE", "1"]);
        assert_eq!(predicate.boolean_values().unwrap(), &[1, 0, 1]);
        assert!(predicate.is_negated());

        let predicate = InPredicate::new(
            PredicateHandle::new(2),
            ["1970-01-01T00:00:01Z", "42"],
        );
        assert_eq!(
            predicate.typed_values(DataType::Timestamp).unwrap(),
            TypedValues::Timestamp(&[1000, 42])
        );
    }

    #[test]
    fn bytes_view_decodes_hex() {
        let predicate = InPredicate::new(PredicateHandle::new(0), ["00ff", "10"]);
        assert_eq!(
            predicate.bytes_values().unwrap(),
            &[vec![0x00, 0xff], vec![0x10]]
        );
    }

    #[test]
    fn decimal_view_keeps_precision() {
        let predicate =
            InPredicate::new(PredicateHandle::new(0), ["0.1", "12345678901234567890.5"]);
        let decimals = predicate.big_decimal_values().unwrap();
        assert_eq!(decimals[0], BigDecimal::from_str("0.10").unwrap());
        assert_eq!(
            decimals[1],
            BigDecimal::from_str("12345678901234567890.50").unwrap()
        );
    }

    #[test]
    fn malformed_literal_reports_type_and_value() {
        let predicate = InPredicate::new(PredicateHandle::new(0), ["1", "one"]);
        let err = predicate.int_values().unwrap_err();
        assert!(matches!(
            err,
            Error::ValueFormat {
                data_type: DataType::Int,
                ref value,
                ..
            } if value == "one"
        ));
        assert!(predicate.bytes_values().is_err());
        assert!(predicate.typed_values(DataType::Boolean).is_err());
        // text never fails to parse
        assert!(predicate.typed_values(DataType::String).is_ok());
    }

    #[test]
    fn handle_displays_index() {
        assert_eq!(PredicateHandle::new(7).to_string(), "predicate#7");
        assert_eq!(PredicateHandle::new(7).index(), 7);
    }
}

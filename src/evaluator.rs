//! Dictionary-id based evaluators for equality and membership predicates.
//!
//! An evaluator is built once per segment and predicate. It answers which
//! dictionary ids a scan has to match, in the ascending form scan operators
//! expect, and whether the predicate trivially matches all or no rows.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::{
    context::QueryContext,
    data_type::DataType,
    dict_ids::{dict_ids_excluding, flip_dict_ids},
    dictionary::{DictId, Dictionary},
    error::Result,
    observability::log_debug,
    predicate::InPredicate,
    resolve::{get_dict_id, get_dict_id_set, sorted_dict_ids},
};

/// Shape of the predicate an evaluator was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// `col = literal`
    Eq,
    /// `col != literal`
    NotEq,
    /// `col IN (...)`
    In,
    /// `col NOT IN (...)`
    NotIn,
}

impl PredicateKind {
    /// Returns true for the negated shapes.
    #[must_use]
    pub fn is_negated(self) -> bool {
        matches!(self, PredicateKind::NotEq | PredicateKind::NotIn)
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PredicateKind::Eq => "EQ",
            PredicateKind::NotEq => "NOT_EQ",
            PredicateKind::In => "IN",
            PredicateKind::NotIn => "NOT_IN",
        })
    }
}

/// Evaluates a predicate against dictionary ids of one segment.
#[derive(Debug)]
pub struct DictIdPredicateEvaluator {
    kind: PredicateKind,
    cardinality: usize,
    // ids of the predicate literals, ascending
    literal_dict_ids: Vec<DictId>,
    complement: OnceCell<Vec<DictId>>,
}

impl DictIdPredicateEvaluator {
    /// Builds an IN or NOT-IN evaluator, following the predicate's negation.
    pub fn for_in(
        predicate: &InPredicate,
        dictionary: &dyn Dictionary,
        data_type: DataType,
        query_context: Option<&QueryContext>,
    ) -> Result<Self> {
        let dict_ids = get_dict_id_set(predicate, dictionary, data_type, query_context)?;
        let kind = if predicate.is_negated() {
            PredicateKind::NotIn
        } else {
            PredicateKind::In
        };
        Ok(Self::new(
            kind,
            dictionary.cardinality(),
            sorted_dict_ids(&dict_ids),
        ))
    }

    /// Builds an EQ or NOT-EQ evaluator for a single literal.
    pub fn for_eq(
        value: &str,
        negated: bool,
        dictionary: &dyn Dictionary,
        data_type: DataType,
    ) -> Result<Self> {
        let dict_id = get_dict_id(value, dictionary, data_type)?;
        let kind = if negated {
            PredicateKind::NotEq
        } else {
            PredicateKind::Eq
        };
        Ok(Self::new(
            kind,
            dictionary.cardinality(),
            dict_id.into_iter().collect(),
        ))
    }

    fn new(kind: PredicateKind, cardinality: usize, literal_dict_ids: Vec<DictId>) -> Self {
        let evaluator = Self {
            kind,
            cardinality,
            literal_dict_ids,
            complement: OnceCell::new(),
        };
        log_debug!(
            component = "evaluator",
            event = "evaluator_built",
            kind = %kind,
            cardinality,
            num_matching = evaluator.num_matching_dict_ids(),
        );
        evaluator
    }

    /// Predicate shape.
    #[must_use]
    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Ascending ids a scan has to match.
    pub fn matching_dict_ids(&self) -> &[DictId] {
        if self.kind.is_negated() {
            self.complement()
        } else {
            &self.literal_dict_ids
        }
    }

    /// Ascending ids a scan has to reject.
    pub fn non_matching_dict_ids(&self) -> &[DictId] {
        if self.kind.is_negated() {
            &self.literal_dict_ids
        } else {
            self.complement()
        }
    }

    /// Number of matching ids, without materializing a complement.
    #[must_use]
    pub fn num_matching_dict_ids(&self) -> usize {
        if self.kind.is_negated() {
            self.cardinality - self.literal_dict_ids.len()
        } else {
            self.literal_dict_ids.len()
        }
    }

    /// True when no dictionary id matches.
    #[must_use]
    pub fn is_always_false(&self) -> bool {
        self.num_matching_dict_ids() == 0
    }

    /// True when every dictionary id matches.
    #[must_use]
    pub fn is_always_true(&self) -> bool {
        self.cardinality > 0 && self.num_matching_dict_ids() == self.cardinality
    }

    /// Tests a single dictionary id.
    #[must_use]
    pub fn apply(&self, dict_id: DictId) -> bool {
        let is_literal = self.literal_dict_ids.binary_search(&dict_id).is_ok();
        is_literal != self.kind.is_negated()
    }

    fn complement(&self) -> &[DictId] {
        self.complement.get_or_init(|| match self.kind {
            PredicateKind::Eq | PredicateKind::NotEq => {
                dict_ids_excluding(self.cardinality, self.literal_dict_ids.first().copied())
            }
            PredicateKind::In | PredicateKind::NotIn => {
                flip_dict_ids(&self.literal_dict_ids, self.cardinality)
            }
        })
    }
}

use std::collections::HashMap;

use crate::{
    dictionary::LookupAlgorithm,
    error::{Error, Result},
    observability::log_warn,
};

/// Query option keys read by the IN predicate resolver.
pub mod query_option_key {
    /// Batch lookup algorithm for text IN lists; see
    /// [`LookupAlgorithm`](crate::LookupAlgorithm) for accepted names.
    pub const IN_PREDICATE_LOOKUP_ALGORITHM: &str = "inPredicateLookupAlgorithm";
    /// `true` when the caller guarantees IN values arrive sorted.
    pub const IN_PREDICATE_PRE_SORTED: &str = "inPredicatePreSorted";
}

/// IN predicate lookup settings resolved from query options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InLookupOptions {
    pub(crate) algorithm: LookupAlgorithm,
    pub(crate) pre_sorted: bool,
}

impl InLookupOptions {
    /// Parses the lookup settings out of raw query options.
    ///
    /// The algorithm name is matched case-insensitively and defaults to
    /// [`LookupAlgorithm::DivideBinarySearch`]. The pre-sorted flag is only
    /// set by the text `true` (any case); every other value leaves it unset.
    pub fn from_query_options(options: &HashMap<String, String>) -> Result<Self> {
        let algorithm = match options.get(query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM) {
            Some(value) => value.parse::<LookupAlgorithm>().map_err(|err| {
                log_warn!(
                    component = "option",
                    event = "illegal_query_option",
                    key = query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM,
                    error = %err,
                );
                Error::Configuration {
                    key: query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM,
                    value: value.clone(),
                }
            })?,
            None => LookupAlgorithm::default(),
        };
        let pre_sorted = options
            .get(query_option_key::IN_PREDICATE_PRE_SORTED)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        Ok(Self {
            algorithm,
            pre_sorted,
        })
    }

    /// Overrides the batch lookup algorithm.
    pub fn algorithm(self, algorithm: LookupAlgorithm) -> Self {
        InLookupOptions { algorithm, ..self }
    }

    /// Overrides the pre-sorted flag.
    pub fn pre_sorted(self, pre_sorted: bool) -> Self {
        InLookupOptions { pre_sorted, ..self }
    }

    /// Configured batch lookup algorithm.
    #[must_use]
    pub fn lookup_algorithm(&self) -> LookupAlgorithm {
        self.algorithm
    }

    /// Whether IN values may be passed to the dictionary without sorting.
    #[must_use]
    pub fn is_pre_sorted(&self) -> bool {
        self.pre_sorted
    }
}

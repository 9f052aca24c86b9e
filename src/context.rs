use std::{
    any::Any,
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crossbeam_skiplist::SkipMap;
use once_cell::sync::OnceCell;

use crate::{
    error::{Error, Result},
    observability::log_debug,
    option::InLookupOptions,
    predicate::PredicateHandle,
};

/// Kind of value memoized per predicate in a [`QueryContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SharedSlot {
    /// Ascending copy of a text IN predicate's values (`Vec<String>`).
    SortedInValues,
}

type SharedValue = Arc<dyn Any + Send + Sync>;

/// State scoped to a single query execution.
///
/// Holds the raw query options and a cache of values derived from predicates
/// that every segment of the query would otherwise recompute. The context is
/// shared by reference across all segment workers and dropped when the query
/// finishes.
#[derive(Debug, Default)]
pub struct QueryContext {
    query_options: HashMap<String, String>,
    next_handle: AtomicU32,
    in_lookup_options: OnceCell<InLookupOptions>,
    shared_values: SkipMap<(SharedSlot, PredicateHandle), SharedValue>,
}

impl QueryContext {
    /// Creates a context with no query options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single query option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_options.insert(key.into(), value.into());
        self.in_lookup_options = OnceCell::new();
        self
    }

    /// Sets several query options at once.
    pub fn with_options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_options.extend(
            options
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self.in_lookup_options = OnceCell::new();
        self
    }

    /// Raw query options.
    #[must_use]
    pub fn query_options(&self) -> &HashMap<String, String> {
        &self.query_options
    }

    /// Looks up a single raw query option.
    #[must_use]
    pub fn query_option(&self, key: &str) -> Option<&str> {
        self.query_options.get(key).map(String::as_str)
    }

    /// Hands out the next predicate handle for this query.
    ///
    /// Handles are dense, starting at zero, and unique within the context.
    pub fn next_predicate_handle(&self) -> PredicateHandle {
        PredicateHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    /// IN predicate lookup settings, parsed from the query options on first
    /// use.
    pub fn in_lookup_options(&self) -> Result<InLookupOptions> {
        self.in_lookup_options
            .get_or_try_init(|| {
                let resolved = InLookupOptions::from_query_options(&self.query_options)?;
                log_debug!(
                    component = "context",
                    event = "in_lookup_options_resolved",
                    algorithm = %resolved.lookup_algorithm(),
                    pre_sorted = resolved.is_pre_sorted(),
                );
                Ok(resolved)
            })
            .copied()
    }

    /// Returns the value memoized for `(slot, handle)`, computing it if absent.
    ///
    /// Concurrent callers racing on the same key may each run `compute`; one
    /// result is kept and every caller observes that one. `compute` must
    /// therefore be pure.
    pub fn get_or_compute_shared_value<T, F>(
        &self,
        slot: SharedSlot,
        handle: PredicateHandle,
        compute: F,
    ) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let entry = self
            .shared_values
            .get_or_insert_with((slot, handle), || Arc::new(compute()) as SharedValue);
        entry.value().clone().downcast::<T>().map_err(|_| {
            Error::InternalState(format!(
                "shared value {slot:?} for {handle} holds an unexpected type"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, thread};

    use super::*;
    use crate::{dictionary::LookupAlgorithm, option::query_option_key};

    #[test]
    fn predicate_handles_are_dense() {
        let ctx = QueryContext::new();
        assert_eq!(ctx.next_predicate_handle(), PredicateHandle::new(0));
        assert_eq!(ctx.next_predicate_handle(), PredicateHandle::new(1));
        assert_eq!(ctx.next_predicate_handle(), PredicateHandle::new(2));
    }

    #[test]
    fn options_are_readable() {
        let ctx = QueryContext::new()
            .with_option("timeoutMs", "100")
            .with_options([(query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM, "SCAN")]);
        assert_eq!(ctx.query_option("timeoutMs"), Some("100"));
        assert_eq!(ctx.query_option("missing"), None);
        assert_eq!(ctx.query_options().len(), 2);
        assert_eq!(
            ctx.in_lookup_options().unwrap().lookup_algorithm(),
            LookupAlgorithm::Scan
        );
    }

    #[test]
    fn bad_lookup_option_surfaces_every_time() {
        let ctx = QueryContext::new()
            .with_option(query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM, "bogus");
        assert!(matches!(
            ctx.in_lookup_options(),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            ctx.in_lookup_options(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn adding_options_reparses_lookup_settings() {
        let ctx = QueryContext::new();
        assert_eq!(
            ctx.in_lookup_options().unwrap().lookup_algorithm(),
            LookupAlgorithm::DivideBinarySearch
        );

        let ctx = ctx.with_option(query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM, "scan");
        assert_eq!(
            ctx.in_lookup_options().unwrap().lookup_algorithm(),
            LookupAlgorithm::Scan
        );

        let ctx =
            ctx.with_options([(query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM, "bogus")]);
        assert!(matches!(
            ctx.in_lookup_options(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn shared_value_is_memoized_per_handle() {
        let ctx = QueryContext::new();
        let first = ctx.next_predicate_handle();
        let second = ctx.next_predicate_handle();
        let calls = Cell::new(0);
        let compute = |v: u32| {
            calls.set(calls.get() + 1);
            vec![v]
        };

        let a = ctx
            .get_or_compute_shared_value(SharedSlot::SortedInValues, first, || compute(1))
            .unwrap();
        let b = ctx
            .get_or_compute_shared_value(SharedSlot::SortedInValues, first, || compute(2))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, vec![1]);
        assert_eq!(calls.get(), 1);

        let c = ctx
            .get_or_compute_shared_value(SharedSlot::SortedInValues, second, || compute(3))
            .unwrap();
        assert_eq!(*c, vec![3]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn shared_value_type_mismatch_is_internal_error() {
        let ctx = QueryContext::new();
        let handle = ctx.next_predicate_handle();
        ctx.get_or_compute_shared_value(SharedSlot::SortedInValues, handle, || 1u64)
            .unwrap();
        let err = ctx
            .get_or_compute_shared_value(SharedSlot::SortedInValues, handle, String::new)
            .unwrap_err();
        assert!(matches!(err, Error::InternalState(_)));
    }

    #[test]
    fn racing_callers_observe_one_value() {
        let ctx = QueryContext::new();
        let handle = ctx.next_predicate_handle();
        let results: Vec<Arc<Vec<u32>>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        ctx.get_or_compute_shared_value(
                            SharedSlot::SortedInValues,
                            handle,
                            || vec![1, 2, 3],
                        )
                        .unwrap()
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().unwrap())
                .collect()
        });
        for result in &results {
            assert!(Arc::ptr_eq(result, &results[0]));
        }
    }
}

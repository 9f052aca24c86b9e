use std::iter::repeat_with;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dictfilter::{
    get_dict_id_set, query_option_key, DataType, InPredicate, LookupAlgorithm, QueryContext,
    SortedDictionary,
};

const DICTIONARY_SIZE: usize = 100_000;

fn random_values(rng: &mut fastrand::Rng, count: usize) -> Vec<String> {
    repeat_with(|| repeat_with(|| rng.alphanumeric()).take(8).collect())
        .take(count)
        .collect()
}

fn in_lookup(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(0xd1c7);
    let dictionary = SortedDictionary::from_strings(random_values(&mut rng, DICTIONARY_SIZE));

    let mut group = c.benchmark_group("in_lookup");
    for num_values in [10, 1_000, 10_000] {
        // half the literals hit the dictionary
        let mut values = random_values(&mut rng, num_values / 2);
        let num_hits = num_values - values.len();
        values.extend(
            (0..num_hits)
                .filter_map(|_| dictionary.string_value(rng.u32(0..DICTIONARY_SIZE as u32)))
                .map(str::to_owned),
        );
        fastrand::Rng::with_seed(num_values as u64).shuffle(&mut values);

        for algorithm in [
            LookupAlgorithm::DivideBinarySearch,
            LookupAlgorithm::Scan,
            LookupAlgorithm::PlainBinarySearch,
        ] {
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), num_values),
                &values,
                |b, values| {
                    b.iter(|| {
                        // fresh context per iteration so the sort is measured too
                        let ctx = QueryContext::new().with_option(
                            query_option_key::IN_PREDICATE_LOOKUP_ALGORITHM,
                            algorithm.to_string(),
                        );
                        let predicate =
                            InPredicate::new(ctx.next_predicate_handle(), values.iter().cloned());
                        get_dict_id_set(&predicate, &dictionary, DataType::String, Some(&ctx))
                            .unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, in_lookup);
criterion_main!(benches);

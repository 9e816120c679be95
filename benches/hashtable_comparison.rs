use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use chain_hash::HashTable as ChainHashTable;
use chain_hash::hash_table::Entry as ChainEntry;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

const SIZES: [usize; 3] = [1 << 10, 1 << 14, 1 << 18];

/// Bucket exponent giving roughly one bucket per expected element.
fn bit_size_for(size: usize) -> u8 {
    size.next_power_of_two().trailing_zeros() as u8
}

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

fn random_items<TestItem: KeyValuePair>(count: usize) -> Vec<(u64, TestItem)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let key = rng.try_next_u64().unwrap();
            let item = TestItem::new(key);
            let hash = item.hash_key();
            (hash, item)
        })
        .collect()
}

fn build_chain_table<TestItem: KeyValuePair>(
    items: &[(u64, TestItem)],
    bit_size: u8,
) -> ChainHashTable<TestItem> {
    let mut table = ChainHashTable::with_bit_size(bit_size);
    for (hash, item) in items.iter().cloned() {
        match table.entry(hash, |v: &TestItem| v.eq_key(&item)) {
            ChainEntry::Vacant(entry) => {
                entry.insert(item);
            }
            ChainEntry::Occupied(_) => unreachable!(),
        }
    }
    table
}

fn build_hashbrown_table<TestItem: KeyValuePair>(
    items: &[(u64, TestItem)],
    capacity: usize,
) -> HashbrownHashTable<TestItem> {
    let mut table = HashbrownHashTable::with_capacity(capacity);
    for (hash, item) in items.iter().cloned() {
        match table.entry(hash, |v: &TestItem| v.eq_key(&item), |v| v.hash_key()) {
            HashbrownEntry::Vacant(entry) => {
                entry.insert(item);
            }
            HashbrownEntry::Occupied(_) => unreachable!(),
        }
    }
    table
}

fn bench_insert_random<TestItem: KeyValuePair>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES.iter().copied() {
        let items = random_items::<TestItem>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| black_box(build_chain_table(&items, bit_size_for(size))),
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| black_box(build_hashbrown_table(&items, size)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<TestItem: KeyValuePair>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES.iter().copied() {
        let items = random_items::<TestItem>(size);
        let chain = build_chain_table(&items, bit_size_for(size));
        let brown = build_hashbrown_table(&items, size);

        let mut probes = items.clone();
        probes.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for (hash, item) in probes.iter() {
                    if chain.find(*hash, |v| v.eq_key(item)).is_some() {
                        found += 1;
                    }
                }
                black_box(found)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for (hash, item) in probes.iter() {
                    if brown.find(*hash, |v| v.eq_key(item)).is_some() {
                        found += 1;
                    }
                }
                black_box(found)
            })
        });
    }

    group.finish();
}

fn bench_find_zipf<TestItem: KeyValuePair>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_zipf_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const PROBES: usize = 1 << 14;

    for size in SIZES.iter().copied() {
        let items = random_items::<TestItem>(size);
        let chain = build_chain_table(&items, bit_size_for(size));
        let brown = build_hashbrown_table(&items, size);

        // Skewed access pattern: a few hot keys dominate.
        let zipf = Zipf::new(size as f64, 1.1).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let probes: Vec<usize> = (0..PROBES)
            .map(|_| rng.sample(zipf) as usize - 1)
            .collect();

        group.throughput(Throughput::Elements(PROBES as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for &i in probes.iter() {
                    let (hash, item) = &items[i];
                    if chain.find(*hash, |v| v.eq_key(item)).is_some() {
                        found += 1;
                    }
                }
                black_box(found)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for &i in probes.iter() {
                    let (hash, item) = &items[i];
                    if brown.find(*hash, |v| v.eq_key(item)).is_some() {
                        found += 1;
                    }
                }
                black_box(found)
            })
        });
    }

    group.finish();
}

fn bench_remove_random<TestItem: KeyValuePair>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "remove_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES.iter().copied() {
        let items = random_items::<TestItem>(size);
        let chain = build_chain_table(&items, bit_size_for(size));
        let brown = build_hashbrown_table(&items, size);

        let mut order = items.clone();
        order.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chain.clone(),
                |mut table| {
                    for (hash, item) in order.iter() {
                        black_box(table.remove(*hash, |v| v.eq_key(item)));
                    }
                    table
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || brown.clone(),
                |mut table| {
                    for (hash, item) in order.iter() {
                        if let Ok(entry) = table.find_entry(*hash, |v| v.eq_key(item)) {
                            black_box(entry.remove().0);
                        }
                    }
                    table
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iterate<TestItem: KeyValuePair>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iterate_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES.iter().copied() {
        let items = random_items::<TestItem>(size);
        let chain = build_chain_table(&items, bit_size_for(size));
        let brown = build_hashbrown_table(&items, size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| black_box(chain.iter().count()))
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(brown.iter().count()))
        });
    }

    group.finish();
}

fn small_benches(c: &mut Criterion) {
    bench_insert_random::<SmallTestItem>(c);
    bench_find_hit::<SmallTestItem>(c);
    bench_find_zipf::<SmallTestItem>(c);
    bench_remove_random::<SmallTestItem>(c);
    bench_iterate::<SmallTestItem>(c);
}

fn string_benches(c: &mut Criterion) {
    bench_insert_random::<TestItem>(c);
    bench_find_hit::<TestItem>(c);
    bench_find_zipf::<TestItem>(c);
    bench_remove_random::<TestItem>(c);
    bench_iterate::<TestItem>(c);
}

criterion_group!(benches, small_benches, string_benches);
criterion_main!(benches);

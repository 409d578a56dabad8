use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::HashMap;

#[derive(Arbitrary, Clone, Copy, Debug)]
enum Probing {
    Linear,
    Quadratic,
}

impl From<Probing> for ProbeStrategy {
    fn from(p: Probing) -> Self {
        match p {
            Probing::Linear => ProbeStrategy::Linear,
            Probing::Quadratic => ProbeStrategy::Quadratic,
        }
    }
}

fn validate_table(t: &ProbingTable) {
    let report = t.status_report();
    assert_eq!(report.markers.len(), t.capacity());
    assert_eq!(report.occupied + report.vacant, t.capacity());
    assert_eq!(report.occupied, t.len(), "occupied markers must match len");
    assert_eq!(
        report.markers.chars().filter(|&c| c == 'D').count(),
        report.occupied
    );
    assert!(report.min_run <= report.max_run);
    assert!(report.max_run <= report.occupied);
    if report.occupied > 0 {
        assert!(report.min_run > 0, "a non-empty table has a run of at least 1");
    }

    for (index, record) in t.iter() {
        assert!(index < t.capacity());
        assert!(record.is_occupied());
        assert!(
            t.probe_sequence(record.name()).any(|i| i == index),
            "live record must be reachable along its own probe sequence"
        );
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String, f64),
    Remove(String),
    Find(String),
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    "[A-Za-z ]{1,12}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), -40.0f64..120.0).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        25 => key.prop_map(Op::Find),
    ];
    prop::collection::vec(op, 0..=300)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(
        probing in any::<Probing>(),
        capacity in 1usize..=40,
        ops in ops_strategy(),
    ) {
        let mut t = ProbingTable::new(capacity, probing.into()).unwrap();
        let mut m: HashMap<String, f64> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, avg) => {
                    // Duplicate names are allowed by the table but not by the model.
                    if m.contains_key(&key) {
                        continue;
                    }
                    match t.insert_with(&key, avg, avg - 5.0, avg + 5.0) {
                        Ok(index) => {
                            prop_assert!(index < capacity);
                            m.insert(key, avg);
                        }
                        Err(TableError::NoVacantSlot { attempts, .. }) => {
                            prop_assert_eq!(attempts, capacity);
                            if matches!(probing, Probing::Linear) {
                                prop_assert_eq!(m.len(), capacity);
                            }
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                Op::Remove(key) => {
                    let got_t = t.remove(&key).map(|r| r.average_temp());
                    let got_m = m.remove(&key);
                    prop_assert_eq!(got_t, got_m);
                    prop_assert!(!t.find(&key).is_occupied());
                }
                Op::Find(key) => {
                    let found = t.find(&key);
                    match m.get(&key) {
                        Some(&avg) => {
                            prop_assert!(found.is_occupied());
                            prop_assert_eq!(found.name(), key.as_str());
                            prop_assert_eq!(found.average_temp(), avg);
                        }
                        None => prop_assert_eq!(found, ClimateRecord::empty()),
                    }
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_table(&t);
    }

    #[test]
    fn prop_hash_in_range(key in "\\PC{1,40}", capacity in 1usize..=10_000) {
        prop_assert!(hash_key(&key, capacity) < capacity);
    }

    #[test]
    fn prop_probe_sequence_formula(
        probing in any::<Probing>(),
        key in key_strategy(),
        capacity in 1usize..=64,
    ) {
        let t = ProbingTable::new(capacity, probing.into()).unwrap();
        let h = t.hash_index(&key);
        let got: Vec<usize> = t.probe_sequence(&key).collect();
        let expected: Vec<usize> = (0..capacity)
            .map(|i| match probing {
                Probing::Linear => (h + i) % capacity,
                Probing::Quadratic => (h + i * i) % capacity,
            })
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_compare_antisymmetric(a in "[a-d]{0,6}", b in "[a-d]{0,6}") {
        prop_assert_eq!(compare_keys(&a, &a), 0);
        let ab = compare_keys(&a, &b);
        let ba = compare_keys(&b, &a);
        prop_assert_eq!(ab, -ba);
        prop_assert_eq!(ab == 0, a == b);
        prop_assert_eq!(ab.signum(), (a.as_bytes().cmp(b.as_bytes()) as i64).signum());
    }

    #[test]
    fn prop_insert_then_find(
        probing in any::<Probing>(),
        key in key_strategy(),
        avg in -40.0f64..120.0,
    ) {
        let mut t = ProbingTable::new(17, probing.into()).unwrap();
        let record = ClimateRecord::new(key.clone(), avg, avg - 1.0, avg + 1.0).unwrap();
        let index = t.insert(record.clone()).unwrap();
        prop_assert_eq!(index, t.hash_index(&key));
        prop_assert_eq!(&t.find(&key), &record);

        prop_assert_eq!(t.remove(&key), Some(record));
        prop_assert!(!t.find(&key).is_occupied());
        prop_assert_eq!(t.slot(index).map(|r| r.name()), Some(key.as_str()));
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = ["e", "j", "o", "Utah", "Texas"];

    let mut base = ProbingTable::new(5, ProbeStrategy::Linear).unwrap();
    for key in keys {
        base.insert_with(key, 1.0, 0.0, 2.0).unwrap();
    }
    validate_table(&base);

    // Remove in every rotation of the key list; survivors stay reachable.
    for start in 0..keys.len() {
        let mut t = base.clone();
        for step in 0..keys.len() {
            let key = keys[(start + step) % keys.len()];
            assert_eq!(t.remove(key).unwrap().name(), key);
            for later in 1..keys.len() - step {
                let survivor = keys[(start + step + later) % keys.len()];
                assert!(t.contains_key(survivor), "{survivor} lost after removing {key}");
            }
            validate_table(&t);
        }
        assert!(t.is_empty());
    }
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple ordered-list model.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::RecencyCache;

// == Strategies ==
/// Small key alphabet so that sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
    DeletePrefix { prefix: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Has { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => "[a-h]".prop_map(|prefix| CacheOp::DeletePrefix { prefix }),
    ]
}

// == Reference Model ==
/// Keys ordered from least to most recently used.
#[derive(Default)]
struct Model {
    order: Vec<(String, u32)>,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let idx = self.position(key)?;
        let entry = self.order.remove(idx);
        let value = entry.1;
        self.order.push(entry);
        Some(value)
    }

    fn set(&mut self, key: String, value: u32, capacity: usize) -> Option<String> {
        if let Some(idx) = self.position(&key) {
            self.order.remove(idx);
            self.order.push((key, value));
            return None;
        }
        let evicted = if self.order.len() >= capacity {
            Some(self.order.remove(0).0)
        } else {
            None
        };
        self.order.push((key, value));
        evicted
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.order.remove(idx);
                true
            }
            None => false,
        }
    }

    fn keys(&self) -> HashSet<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Property: for any operation sequence the cache agrees with the model,
    // including which key each insert evicts.
    #[test]
    fn prop_matches_lru_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut cache = RecencyCache::new(capacity);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let expected = model.set(key.clone(), value, capacity);
                    prop_assert_eq!(cache.set(key, value), expected);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key).copied(), model.get(&key));
                }
                CacheOp::Has { key } => {
                    prop_assert_eq!(cache.has(&key), model.position(&key).is_some());
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(cache.delete(&key), model.delete(&key));
                }
                CacheOp::DeletePrefix { prefix } => {
                    let doomed: Vec<String> = model
                        .keys()
                        .into_iter()
                        .filter(|k| k.starts_with(&prefix))
                        .collect();
                    for key in &doomed {
                        model.delete(key);
                    }
                    let removed = cache.delete_by_predicate(|k| k.starts_with(&prefix));
                    prop_assert_eq!(removed, doomed.len());
                }
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.recency_len(), cache.len());
            prop_assert_eq!(cache.keys().into_iter().collect::<HashSet<_>>(), model.keys());
            prop_assert_eq!(
                cache.peek_oldest().cloned(),
                model.order.first().map(|(k, _)| k.clone())
            );
        }
    }

    // Property: inserting more distinct keys than the capacity never grows
    // the cache beyond it, and the survivors are the most recent inserts.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        keys in prop::collection::vec("[a-z]{1,8}", 1..100)
    ) {
        let mut cache = RecencyCache::new(capacity);
        let mut seen: Vec<String> = Vec::new();

        for key in keys {
            cache.set(key.clone(), ());
            seen.retain(|k| k != &key);
            seen.push(key);
            prop_assert!(cache.len() <= capacity);
        }

        let expected: HashSet<String> = seen.iter().rev().take(capacity).cloned().collect();
        prop_assert_eq!(cache.keys().into_iter().collect::<HashSet<_>>(), expected);
    }

    // Property: prefix deletion removes exactly the prefixed keys.
    #[test]
    fn prop_prefix_delete_is_exact(
        keys in prop::collection::hash_set("(doc1|doc2|other)-[0-9]{1,3}", 1..30)
    ) {
        let mut cache = RecencyCache::new(64);
        for key in &keys {
            cache.set(key.clone(), key.len());
        }

        cache.delete_by_predicate(|k| k.starts_with("doc1-"));

        for key in &keys {
            prop_assert_eq!(cache.has(key), !key.starts_with("doc1-"));
        }
    }
}

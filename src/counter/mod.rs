use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Per-label invocation counter. Services bump it once per method call,
/// labels look like `CountryService.findById`.
#[derive(Debug, Default)]
pub struct RequestCounter {
    counts: DashMap<String, AtomicU64>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count after the increment.
    pub fn increment(&self, label: &str) -> u64 {
        let count = match self.counts.get(label) {
            Some(counter) => counter.fetch_add(1, Ordering::Relaxed) + 1,
            None => {
                self.counts
                    .entry(label.to_string())
                    .or_insert_with(|| AtomicU64::new(0))
                    .fetch_add(1, Ordering::Relaxed)
                    + 1
            }
        };
        tracing::trace!(label, count, "call counted");
        count
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts
            .get(label)
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }

    pub fn reset(&self, label: &str) {
        self.counts.insert(label.to_string(), AtomicU64::new(0));
    }

    pub fn all_counts(&self) -> BTreeMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn unknown_label_counts_zero() {
        let counter = RequestCounter::new();
        assert_eq!(counter.count("CountryService.findAll"), 0);
        assert!(counter.all_counts().is_empty());
    }

    #[test]
    fn increment_and_reset() {
        let counter = RequestCounter::new();
        assert_eq!(counter.increment("CountryService.findAll"), 1);
        assert_eq!(counter.increment("CountryService.findAll"), 2);
        counter.increment("PersonService.create");

        assert_eq!(counter.count("CountryService.findAll"), 2);

        counter.reset("CountryService.findAll");
        assert_eq!(counter.count("CountryService.findAll"), 0);

        let all = counter.all_counts();
        assert_eq!(all.get("CountryService.findAll"), Some(&0));
        assert_eq!(all.get("PersonService.create"), Some(&1));
    }

    #[test]
    fn increments_from_many_threads_are_not_lost() {
        let counter = Arc::new(RequestCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment("PersonService.findById");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.count("PersonService.findById"), 8000);
    }
}

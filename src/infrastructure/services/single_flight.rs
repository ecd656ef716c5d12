//! Single-flight keyed mutual exclusion
//!
//! Collapses concurrent work for the same key: the first caller to
//! acquire a key's permit proceeds, later callers block until it is
//! released. Used to ensure one generation call per prompt no matter
//! how many identical requests arrive together.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type KeyTable = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

/// Fingerprint a prompt for single-flight keying.
///
/// Case and whitespace runs do not distinguish prompts, so reformatted
/// duplicates of an in-flight request share its permit.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let normalized = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Grants at most one concurrent holder per key
#[derive(Debug, Default)]
pub struct SingleFlight {
    in_flight: Arc<KeyTable>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of `key`.
    ///
    /// The permit is released on drop; per-key state is pruned once the
    /// last interested caller is gone.
    pub async fn acquire(&self, key: &str) -> SingleFlightPermit {
        let entry = {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            Arc::clone(
                in_flight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        let guard = entry.lock_owned().await;

        SingleFlightPermit {
            key: key.to_string(),
            guard: Some(guard),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Number of keys currently tracked
    pub fn in_flight_keys(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive hold on a single-flight key, released on drop
#[derive(Debug)]
pub struct SingleFlightPermit {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    in_flight: Arc<KeyTable>,
}

impl Drop for SingleFlightPermit {
    fn drop(&mut self) {
        // The guard's internal Arc clone must be gone for the strong
        // count below to reflect only the table and any waiters.
        self.guard.take();

        let mut in_flight = match self.in_flight.lock() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Once every holder and waiter is gone the table entry is the
        // only reference left; remove it so idle keys do not accumulate.
        if let Some(entry) = in_flight.get(&self.key) {
            if Arc::strong_count(entry) == 1 {
                in_flight.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_fingerprint_normalizes_case_and_whitespace() {
        assert_eq!(
            prompt_fingerprint("A  Red\tBicycle"),
            prompt_fingerprint("a red bicycle")
        );
        assert_eq!(
            prompt_fingerprint("  a red bicycle  "),
            prompt_fingerprint("a red bicycle")
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_prompts() {
        assert_ne!(
            prompt_fingerprint("a red bicycle"),
            prompt_fingerprint("a blue bicycle")
        );
    }

    #[test]
    fn test_fingerprint_is_hex_encoded() {
        let fingerprint = prompt_fingerprint("a red bicycle");

        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_prompt_has_a_fingerprint() {
        assert_eq!(prompt_fingerprint(""), prompt_fingerprint("   "));
        assert_eq!(prompt_fingerprint("").len(), 64);
    }

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let flight = Arc::new(SingleFlight::new());
        let active = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicBool::new(false));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let flight = Arc::clone(&flight);
                let active = Arc::clone(&active);
                let overlapped = Arc::clone(&overlapped);

                tokio::spawn(async move {
                    let _permit = flight.acquire("shared").await;

                    if active.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlapped.store(true, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(!overlapped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_distinct_keys_proceed_in_parallel() {
        let flight = SingleFlight::new();
        let _held = flight.acquire("first").await;

        let second =
            tokio::time::timeout(Duration::from_millis(100), flight.acquire("second")).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_key_state_is_pruned_after_release() {
        let flight = SingleFlight::new();

        {
            let _permit = flight.acquire("once").await;
            assert_eq!(flight.in_flight_keys(), 1);
        }

        assert_eq!(flight.in_flight_keys(), 0);
    }

    #[tokio::test]
    async fn test_release_wakes_waiter() {
        let flight = Arc::new(SingleFlight::new());
        let permit = flight.acquire("contended").await;

        let waiter = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move {
                let _permit = flight.acquire("contended").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        drop(permit);

        tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(flight.in_flight_keys(), 0);
    }
}

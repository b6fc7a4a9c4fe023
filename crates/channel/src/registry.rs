//! Process-wide registry of channels already created on the broker.
//!
//! The registry is shared by every producer in the process so that
//! concurrent `ensure_exists` calls for the same channel name issue at most
//! one creation request. It starts empty and needs no teardown beyond
//! process exit.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

fn created() -> &'static Mutex<HashSet<String>> {
    static CREATED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    CREATED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Atomically check-and-insert `name`.
///
/// Returns true when the caller is the first claimant and must issue the
/// creation request; later callers (in this or any other producer instance)
/// get false and skip the broker round trip.
pub fn claim(name: &str) -> bool {
    let mut set = created().lock().unwrap_or_else(|e| e.into_inner());
    set.insert(name.to_string())
}

/// Drop a claim after a failed creation so a later caller can retry.
pub fn release(name: &str) {
    let mut set = created().lock().unwrap_or_else(|e| e.into_inner());
    set.remove(name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        assert!(claim("registry.test.first_claim"));
        assert!(!claim("registry.test.first_claim"));
    }

    #[test]
    fn test_release_allows_reclaim() {
        assert!(claim("registry.test.release"));
        release("registry.test.release");
        assert!(claim("registry.test.release"));
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if claim("registry.test.concurrent") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}

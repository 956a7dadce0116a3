//! The shared value cell: one mutex-guarded string, read by get requests
//! and replaced by set requests.

use parking_lot::Mutex;

/// Value the cell holds before the first set.
pub const INITIAL_VALUE: &str = "Start!";

/// The process-wide current value.
///
/// Lives for the whole process; only ever overwritten, never destroyed.
/// Concurrent sets race and the mutex decides the winner — last acquirer
/// wins.
pub struct SharedValue {
    current: Mutex<String>,
}

impl SharedValue {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(INITIAL_VALUE.to_string()),
        }
    }

    /// Clone out the current value. The critical section is the clone only.
    pub fn get(&self) -> String {
        self.current.lock().clone()
    }

    /// Replace the current value. A concurrent `get` observes either the
    /// old or the new value, never a partial write.
    pub fn set(&self, value: String) {
        *self.current.lock() = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_initial_value() {
        let cell = SharedValue::new();
        assert_eq!(cell.get(), INITIAL_VALUE);
    }

    #[test]
    fn set_then_get_returns_last_write() {
        let cell = SharedValue::new();
        cell.set("first".to_string());
        cell.set("second".to_string());
        assert_eq!(cell.get(), "second");
    }

    #[test]
    fn repeated_get_is_idempotent() {
        let cell = SharedValue::new();
        cell.set("stable".to_string());
        assert_eq!(cell.get(), "stable");
        assert_eq!(cell.get(), "stable");
        assert_eq!(cell.get(), "stable");
    }

    #[test]
    fn concurrent_reads_never_observe_torn_values() {
        use std::sync::Arc;
        use std::thread;

        let cell = Arc::new(SharedValue::new());
        let writer = {
            let cell = cell.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    cell.set(format!("value-{i}"));
                }
            })
        };

        for _ in 0..500 {
            let value = cell.get();
            assert!(
                value == INITIAL_VALUE || value.starts_with("value-"),
                "torn value observed: {value}"
            );
        }
        writer.join().unwrap();
    }
}

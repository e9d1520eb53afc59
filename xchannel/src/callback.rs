//! Thread-safe, replaceable callback slot.
//!
//! A [`SyncCallback`] holds at most one handler. Assignment and invocation
//! are serialized by a re-entrant lock, so a handler may re-assign its own
//! slot (or fire another slot) from inside its invocation without
//! deadlocking, while other threads observe a total order of
//! assign/invoke pairs.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::ReentrantMutex;

/// A single-valued, replaceable holder for one notification handler.
///
/// `F` is the unsized handler type, e.g. `dyn Fn(&str) + Send + Sync`.
pub struct SyncCallback<F: ?Sized> {
    slot: ReentrantMutex<RefCell<Option<Arc<F>>>>,
}

impl<F: ?Sized> SyncCallback<F> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            slot: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    /// Replaces the stored handler.
    ///
    /// If called from another thread while an invocation is running, this
    /// waits for that invocation to finish. If called from within the
    /// running handler itself, the running invocation keeps its own
    /// reference to the previous handler and completes with it.
    pub fn set(&self, callback: Arc<F>) {
        let guard = self.slot.lock();
        let previous = guard.replace(Some(callback));
        drop(guard);
        // Dropped outside the lock: captured state may touch this slot again.
        drop(previous);
    }

    /// Removes the stored handler, if any.
    pub fn clear(&self) {
        let guard = self.slot.lock();
        let previous = guard.take();
        drop(guard);
        drop(previous);
    }

    /// Returns true if a handler is installed.
    pub fn is_set(&self) -> bool {
        self.slot.lock().borrow().is_some()
    }

    /// Calls `call` with the current handler.
    ///
    /// Returns `None` without calling anything when no handler is
    /// installed. A panic raised by the handler propagates to the caller;
    /// the lock is released on unwind and the slot remains usable.
    pub fn invoke<R>(&self, call: impl FnOnce(&F) -> R) -> Option<R> {
        let guard = self.slot.lock();
        // The cell borrow ends here so the handler can call `set`.
        let callback = guard.borrow().clone();
        let result = callback.as_deref().map(call);
        drop(guard);
        result
    }
}

impl<F: ?Sized> Default for SyncCallback<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for SyncCallback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCallback")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    type Notify = SyncCallback<dyn Fn() + Send + Sync>;
    type Describe = SyncCallback<dyn Fn(&str) + Send + Sync>;

    fn counter(hits: &Arc<AtomicUsize>, step: usize) -> Arc<dyn Fn() + Send + Sync> {
        let hits = Arc::clone(hits);
        Arc::new(move || {
            hits.fetch_add(step, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_invoke_without_handler_is_noop() {
        let slot = Notify::new();
        assert!(!slot.is_set());
        assert_eq!(slot.invoke(|cb| cb()), None);
    }

    #[test]
    fn test_invoke_uses_most_recent_handler() {
        let slot = Describe::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            slot.set(Arc::new(move |arg: &str| {
                seen.lock().push(format!("{tag}:{arg}"));
            }));
            slot.invoke(|cb| cb("x"));
        }

        assert_eq!(*seen.lock(), vec!["first:x", "second:x", "third:x"]);
    }

    #[test]
    fn test_clear_removes_handler() {
        let slot = Notify::new();
        let hits = Arc::new(AtomicUsize::new(0));

        slot.set(counter(&hits, 1));
        assert!(slot.is_set());
        slot.invoke(|cb| cb());

        slot.clear();
        assert!(!slot.is_set());
        assert_eq!(slot.invoke(|cb| cb()), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invoke_returns_handler_result() {
        let slot: SyncCallback<dyn Fn(u32) -> u32 + Send + Sync> = SyncCallback::new();
        slot.set(Arc::new(|n: u32| n * 2));
        assert_eq!(slot.invoke(|cb| cb(21)), Some(42));
    }

    #[test]
    fn test_handler_reassigns_own_slot() {
        let slot = Arc::new(Notify::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&slot);
        let first_hits = Arc::clone(&hits);
        let second = counter(&hits, 10);
        slot.set(Arc::new(move || {
            first_hits.fetch_add(1, Ordering::SeqCst);
            if let Some(slot) = weak.upgrade() {
                slot.set(Arc::clone(&second));
            }
        }));

        slot.invoke(|cb| cb());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        slot.invoke(|cb| cb());
        assert_eq!(hits.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_handler_reenters_own_invoke() {
        let slot = Arc::new(Notify::new());
        let depth = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&slot);
        let inner_depth = Arc::clone(&depth);
        slot.set(Arc::new(move || {
            if inner_depth.fetch_add(1, Ordering::SeqCst) < 2 {
                if let Some(slot) = weak.upgrade() {
                    slot.invoke(|cb| cb());
                }
            }
        }));

        slot.invoke(|cb| cb());
        assert_eq!(depth.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_handler_fires_other_slot() {
        let open = Arc::new(Notify::new());
        let error = Arc::new(Describe::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            error.set(Arc::new(move |message: &str| {
                seen.lock().push(message.to_owned());
            }));
        }
        {
            let error = Arc::clone(&error);
            open.set(Arc::new(move || {
                error.invoke(|cb| cb("from open"));
            }));
        }

        open.invoke(|cb| cb());
        assert_eq!(*seen.lock(), vec!["from open"]);
    }

    #[test]
    fn test_replace_during_invoke_completes_with_old_handler() {
        let slot = Arc::new(Describe::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);

        {
            let log = Arc::clone(&log);
            slot.set(Arc::new(move |tag: &str| {
                log.lock().push(format!("h1 start {tag}"));
                started_tx.send(()).unwrap();
                release_rx.lock().recv().unwrap();
                log.lock().push(format!("h1 end {tag}"));
            }));
        }

        let invoker = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                slot.invoke(|cb| cb("a"));
            })
        };
        started_rx.recv().unwrap();

        let replacer = {
            let slot = Arc::clone(&slot);
            let log = Arc::clone(&log);
            thread::spawn(move || {
                slot.set(Arc::new(move |tag: &str| {
                    log.lock().push(format!("h2 {tag}"));
                }));
            })
        };

        thread::sleep(Duration::from_millis(20));
        release_tx.send(()).unwrap();
        invoker.join().unwrap();
        replacer.join().unwrap();

        slot.invoke(|cb| cb("b"));
        assert_eq!(*log.lock(), vec!["h1 start a", "h1 end a", "h2 b"]);
    }

    #[test]
    fn test_handler_panic_propagates_and_slot_survives() {
        let slot = Arc::new(Notify::new());
        slot.set(Arc::new(|| panic!("handler fault")));

        let result = panic::catch_unwind(AssertUnwindSafe(|| slot.invoke(|cb| cb())));
        assert!(result.is_err());

        let hits = Arc::new(AtomicUsize::new(0));
        slot.set(counter(&hits, 1));

        let other = Arc::clone(&slot);
        thread::spawn(move || {
            other.invoke(|cb| cb());
        })
        .join()
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_invoke_and_replace() {
        let slot = Arc::new(Notify::new());
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        slot.set(counter(&first, 1));

        let invokers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        slot.invoke(|cb| cb());
                    }
                })
            })
            .collect();

        for i in 0..200 {
            if i % 2 == 0 {
                slot.set(counter(&second, 1));
            } else {
                slot.set(counter(&first, 1));
            }
        }

        for invoker in invokers {
            invoker.join().unwrap();
        }

        let total = first.load(Ordering::SeqCst) + second.load(Ordering::SeqCst);
        assert_eq!(total, 4000);
    }
}

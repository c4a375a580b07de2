//! Process-wide codec lifecycle.
//!
//! The encoder table is built when the first [`CodecSession`] is acquired and
//! dropped when the last one goes away. Sessions may be held from several
//! threads at once; init and teardown each run exactly once per cycle.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::registry::{self, EncoderDescriptor};

/// Encoder table shared by every live session.
pub type EncoderTable = Arc<[EncoderDescriptor]>;

struct LifecycleState {
    refs: usize,
    table: Option<EncoderTable>,
    inits: u64,
}

/// Reference-counted init/teardown around an encoder enumeration function.
pub struct CodecLifecycle {
    enumerate: fn() -> Vec<EncoderDescriptor>,
    state: Mutex<LifecycleState>,
}

static GLOBAL: CodecLifecycle = CodecLifecycle::new(registry::enumerate_installed);

impl CodecLifecycle {
    pub const fn new(enumerate: fn() -> Vec<EncoderDescriptor>) -> Self {
        Self {
            enumerate,
            state: Mutex::new(LifecycleState { refs: 0, table: None, inits: 0 }),
        }
    }

    /// The lifecycle used by [`crate::registry::ImageEncoderRegistry`].
    pub fn global() -> &'static CodecLifecycle {
        &GLOBAL
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        // A panic while holding the lock leaves counters consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn acquire(&self) -> CodecSession<'_> {
        let mut state = self.lock();
        let table = match &state.table {
            Some(table) => Arc::clone(table),
            None => {
                let table: EncoderTable = (self.enumerate)().into();
                state.inits += 1;
                info!("[CodecLifecycle] initialised ({} encoders)", table.len());
                state.table = Some(Arc::clone(&table));
                table
            }
        };
        state.refs += 1;
        debug!("[CodecLifecycle] session acquired (refs={})", state.refs);
        CodecSession { lifecycle: self, table }
    }

    fn release(&self) {
        let mut state = self.lock();
        state.refs = state.refs.saturating_sub(1);
        debug!("[CodecLifecycle] session released (refs={})", state.refs);
        if state.refs == 0 && state.table.take().is_some() {
            info!("[CodecLifecycle] torn down");
        }
    }

    /// Number of live sessions.
    pub fn active_sessions(&self) -> usize {
        self.lock().refs
    }

    pub fn is_initialised(&self) -> bool {
        self.lock().table.is_some()
    }

    /// How many times the encoder table has been built.
    pub fn init_count(&self) -> u64 {
        self.lock().inits
    }
}

/// A live reference to the codec subsystem. Dropping it releases the reference.
pub struct CodecSession<'a> {
    lifecycle: &'a CodecLifecycle,
    table: EncoderTable,
}

impl CodecSession<'static> {
    pub fn acquire_global() -> Self {
        CodecLifecycle::global().acquire()
    }
}

impl CodecSession<'_> {
    pub fn encoders(&self) -> &[EncoderDescriptor] {
        &self.table
    }
}

impl Clone for CodecSession<'_> {
    fn clone(&self) -> Self {
        self.lifecycle.acquire()
    }
}

impl Drop for CodecSession<'_> {
    fn drop(&mut self) {
        self.lifecycle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EncoderKind;

    fn one_encoder() -> Vec<EncoderDescriptor> {
        vec![EncoderDescriptor::new(0, EncoderKind::Png, false)]
    }

    #[test]
    fn first_session_initialises_last_session_tears_down() {
        let lifecycle = CodecLifecycle::new(one_encoder);
        assert!(!lifecycle.is_initialised());

        let a = lifecycle.acquire();
        let b = lifecycle.acquire();
        assert_eq!(lifecycle.active_sessions(), 2);
        assert_eq!(lifecycle.init_count(), 1);
        assert!(Arc::ptr_eq(&a.table, &b.table));

        drop(a);
        assert!(lifecycle.is_initialised());
        drop(b);
        assert_eq!(lifecycle.active_sessions(), 0);
        assert!(!lifecycle.is_initialised());

        let _c = lifecycle.acquire();
        assert_eq!(lifecycle.init_count(), 2);
    }

    #[test]
    fn concurrent_sessions_share_one_init() {
        static LIFECYCLE: CodecLifecycle = CodecLifecycle::new(one_encoder);
        let held = LIFECYCLE.acquire();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    for _ in 0..50 {
                        let session = LIFECYCLE.acquire();
                        assert_eq!(session.encoders().len(), 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(LIFECYCLE.active_sessions(), 1);
        assert_eq!(LIFECYCLE.init_count(), 1);
        drop(held);
        assert_eq!(LIFECYCLE.active_sessions(), 0);
    }

    #[test]
    fn cloned_session_counts_as_a_reference() {
        let lifecycle = CodecLifecycle::new(one_encoder);
        let a = lifecycle.acquire();
        let b = a.clone();
        drop(a);
        assert_eq!(lifecycle.active_sessions(), 1);
        drop(b);
        assert_eq!(lifecycle.active_sessions(), 0);
    }
}

//! Logger use case
//!
//! The [`Logger`] is the output sink injected into anything that needs to
//! report diagnostics. It owns a handle to a [`KeyValueStore`], acquired
//! once at construction, and a [`SignalHub`] that announces every mutation.
//!
//! # Contract
//!
//! - [`Logger::emit`] appends the line plus `"\n"` to the stored buffer
//! - [`Logger::clear`] resets the stored buffer to `""`
//! - each call to either dispatches exactly one [`ChangeSignal`](outlog_domain::ChangeSignal),
//!   after the store has been written
//!
//! `emit` and `clear` never fail from the caller's point of view: store
//! errors are logged with `tracing` and the buffer is left untouched. Use
//! [`Logger::try_emit`] and [`Logger::try_clear`] to observe them.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use outlog_application::{KeyValueStore, Logger, SinkConfig, StoreError};
//! use outlog_domain::StorageKey;
//! # use std::collections::HashMap;
//! # use std::sync::Mutex;
//! # #[derive(Default)]
//! # struct MapStore(Mutex<HashMap<String, String>>);
//! # impl KeyValueStore for MapStore {
//! #     fn get(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
//! #         Ok(self.0.lock().unwrap().get(key.as_str()).cloned())
//! #     }
//! #     fn set(&self, key: &StorageKey, value: &str) -> Result<(), StoreError> {
//! #         self.0.lock().unwrap().insert(key.as_str().to_string(), value.to_string());
//! #         Ok(())
//! #     }
//! #     fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
//! #         self.0.lock().unwrap().remove(key.as_str());
//! #         Ok(())
//! #     }
//! # }
//!
//! let logger = Logger::open(Arc::new(MapStore::default()), SinkConfig::default());
//! logger.emit("a");
//! logger.emit("b");
//! assert_eq!(logger.contents(), "a\nb\n");
//! logger.clear();
//! assert_eq!(logger.contents(), "");
//! ```

use crate::config::SinkConfig;
use crate::ports::change_listener::ChangeListener;
use crate::ports::key_value_store::{KeyValueStore, StoreError};
use crate::signal::{SignalHub, Subscription};
use outlog_domain::{BufferState, LogBuffer, SignalName, StorageKey};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by the fallible logger operations.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Could not read log '{key}': {source}")]
    Read {
        key: StorageKey,
        #[source]
        source: StoreError,
    },

    #[error("Could not write log '{key}': {source}")]
    Write {
        key: StorageKey,
        #[source]
        source: StoreError,
    },
}

impl LoggerError {
    pub fn key(&self) -> &StorageKey {
        match self {
            LoggerError::Read { key, .. } | LoggerError::Write { key, .. } => key,
        }
    }
}

/// Buffer read together with the number of clears that preceded it.
///
/// Two snapshots with different generations are separated by at least one
/// successful [`Logger::clear`], even when the later buffer is longer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
    pub generation: u64,
    pub buffer: LogBuffer,
}

/// Explicit output sink over a key-value store.
///
/// Clones share the store handle, the write lock, the clear generation and
/// the listener registry.
#[derive(Clone)]
pub struct Logger {
    store: Arc<dyn KeyValueStore>,
    key: StorageKey,
    hub: SignalHub,
    write_lock: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl Logger {
    /// Create a logger over `store`, writing to `config.storage_key`.
    pub fn open(store: Arc<dyn KeyValueStore>, config: SinkConfig) -> Self {
        debug!(
            store = %store.describe(),
            key = %config.storage_key,
            signal = %config.signal_name,
            "Opening logger"
        );
        Self {
            store,
            key: config.storage_key,
            hub: SignalHub::new(config.signal_name),
            write_lock: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    // ==================== Mutations ====================

    /// Append `line` and a newline separator, then signal the change.
    pub fn emit(&self, line: &str) {
        if let Err(e) = self.try_emit(line) {
            warn!("Log line dropped: {}", e);
        }
    }

    /// Reset the buffer to empty, then signal the change.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            warn!("Log clear failed: {}", e);
        }
    }

    /// Like [`emit`](Self::emit), but reports store failures.
    ///
    /// The change signal is dispatched whether or not the write succeeded.
    pub fn try_emit(&self, line: &str) -> Result<(), LoggerError> {
        let result = self.append(line);
        self.hub.dispatch();
        result
    }

    /// Like [`clear`](Self::clear), but reports store failures.
    ///
    /// The change signal is dispatched whether or not the write succeeded.
    pub fn try_clear(&self) -> Result<(), LoggerError> {
        let result = self.reset();
        self.hub.dispatch();
        result
    }

    // ==================== Reads ====================

    /// Current buffer text; `""` when absent or unreadable.
    pub fn contents(&self) -> String {
        self.buffer().into_string()
    }

    /// Current buffer text, reporting store failures.
    pub fn try_contents(&self) -> Result<String, LoggerError> {
        self.try_buffer().map(LogBuffer::into_string)
    }

    /// Current buffer; empty when absent or unreadable.
    pub fn buffer(&self) -> LogBuffer {
        match self.try_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("Log read failed: {}", e);
                LogBuffer::new()
            }
        }
    }

    pub fn try_buffer(&self) -> Result<LogBuffer, LoggerError> {
        self.load()
    }

    pub fn state(&self) -> BufferState {
        self.buffer().state()
    }

    /// Number of successful clears made through this logger and its clones.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Current buffer and clear generation, read without an intervening mutation.
    pub fn try_snapshot(&self) -> Result<BufferSnapshot, LoggerError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let buffer = self.load()?;
        Ok(BufferSnapshot {
            generation: self.generation(),
            buffer,
        })
    }

    // ==================== Observers ====================

    /// Register a listener for change signals.
    pub fn subscribe(&self, listener: impl ChangeListener + 'static) -> Subscription {
        self.hub.subscribe(listener)
    }

    /// Register a listener that is also held elsewhere.
    pub fn subscribe_shared(&self, listener: Arc<dyn ChangeListener>) -> Subscription {
        self.hub.subscribe_shared(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    // ==================== Accessors ====================

    pub fn storage_key(&self) -> &StorageKey {
        &self.key
    }

    pub fn signal_name(&self) -> &SignalName {
        self.hub.name()
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    // ==================== Internals ====================

    fn append(&self, line: &str) -> Result<(), LoggerError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let text = self
            .store
            .update(&self.key, &mut |current: Option<String>| {
                let mut buffer = LogBuffer::from_optional(current);
                buffer.append_line(line);
                buffer.into_string()
            })
            .map_err(|source| LoggerError::Write {
                key: self.key.clone(),
                source,
            })?;
        debug!(key = %self.key, bytes = text.len(), "Appended log line");
        Ok(())
    }

    fn reset(&self) -> Result<(), LoggerError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store
            .set(&self.key, "")
            .map_err(|source| LoggerError::Write {
                key: self.key.clone(),
                source,
            })?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        debug!(key = %self.key, "Cleared log");
        Ok(())
    }

    fn load(&self) -> Result<LogBuffer, LoggerError> {
        self.store
            .get(&self.key)
            .map(LogBuffer::from_optional)
            .map_err(|source| LoggerError::Read {
                key: self.key.clone(),
                source,
            })
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("store", &self.store.describe())
            .field("key", &self.key)
            .field("hub", &self.hub)
            .finish()
    }
}

/// Emit a formatted line through a [`Logger`].
///
/// ```ignore
/// emit!(logger, "loaded {} instructions", count);
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emit(&::std::format!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlog_domain::ChangeSignal;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // ==================== Test Doubles ====================

    #[derive(Default)]
    struct MapStore {
        entries: Mutex<HashMap<String, String>>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("reads disabled".to_string()));
            }
            Ok(self.entries.lock().unwrap().get(key.as_str()).cloned())
        }

        fn set(&self, key: &StorageKey, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("quota exceeded".to_string()));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.as_str().to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
            self.entries.lock().unwrap().remove(key.as_str());
            Ok(())
        }
    }

    fn logger() -> (Arc<MapStore>, Logger) {
        let store = Arc::new(MapStore::default());
        let logger = Logger::open(store.clone(), SinkConfig::default());
        (store, logger)
    }

    fn signal_counter(logger: &Logger) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&count);
        let sub = logger.subscribe(move |_: ChangeSignal| {
            probe.fetch_add(1, Ordering::SeqCst);
        });
        (count, sub)
    }

    // ==================== Buffer Semantics ====================

    #[test]
    fn test_never_emitted_reads_empty() {
        let (store, logger) = logger();
        assert_eq!(logger.contents(), "");
        assert_eq!(logger.state(), BufferState::Empty);
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_emits_concatenate_in_order() {
        let (_store, logger) = logger();
        let lines = ["s1", "s2", "with space", "", "s5"];
        for line in lines {
            logger.emit(line);
        }
        let expected: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        assert_eq!(logger.contents(), expected);
    }

    #[test]
    fn test_scenario_a_b_clear_c() {
        let (_store, logger) = logger();
        logger.emit("a");
        assert_eq!(logger.contents(), "a\n");
        logger.emit("b");
        assert_eq!(logger.contents(), "a\nb\n");
        logger.clear();
        assert_eq!(logger.contents(), "");
        logger.emit("c");
        assert_eq!(logger.contents(), "c\n");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_store, logger) = logger();
        logger.emit("x");
        logger.clear();
        let once = logger.contents();
        logger.clear();
        assert_eq!(logger.contents(), once);
        assert_eq!(logger.state(), BufferState::Empty);
    }

    #[test]
    fn test_writes_under_configured_key() {
        let store = Arc::new(MapStore::default());
        let config = SinkConfig::default().with_storage_key(StorageKey::new("diag").unwrap());
        let logger = Logger::open(store.clone(), config);
        logger.emit("hello");
        let entries = store.entries.lock().unwrap();
        assert_eq!(entries.get("diag").map(String::as_str), Some("hello\n"));
        assert!(!entries.contains_key("wasm_output"));
    }

    #[test]
    fn test_appends_to_existing_stored_value() {
        let (store, logger) = logger();
        store
            .entries
            .lock()
            .unwrap()
            .insert("wasm_output".to_string(), "earlier\n".to_string());
        logger.emit("later");
        assert_eq!(logger.contents(), "earlier\nlater\n");
    }

    #[test]
    fn test_emit_macro_formats() {
        let (_store, logger) = logger();
        crate::emit!(logger, "loaded {} of {}", 3, 4);
        assert_eq!(logger.contents(), "loaded 3 of 4\n");
    }

    // ==================== Signals ====================

    #[test]
    fn test_each_mutation_signals_exactly_once() {
        let (_store, logger) = logger();
        let (count, _sub) = signal_counter(&logger);

        logger.emit("a");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        logger.emit("b");
        assert_eq!(count.load(Ordering::SeqCst), 2);
        logger.clear();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        logger.clear();
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_reads_do_not_signal() {
        let (_store, logger) = logger();
        let (count, _sub) = signal_counter(&logger);
        let _ = logger.contents();
        let _ = logger.state();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_sees_new_content() {
        let (_store, logger) = logger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let reader = logger.clone();
        let record = Arc::clone(&seen);
        let _sub = logger.subscribe(move |_: ChangeSignal| {
            record.lock().unwrap().push(reader.contents());
        });

        logger.emit("a");
        logger.emit("b");
        logger.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a\n".to_string(), "a\nb\n".to_string(), String::new()]
        );
    }

    #[test]
    fn test_clones_share_listeners() {
        let (_store, logger) = logger();
        let (count, _sub) = signal_counter(&logger);
        let clone = logger.clone();
        clone.emit("from clone");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(logger.listener_count(), 1);
    }

    #[test]
    fn test_dropped_subscription_misses_signals() {
        let (_store, logger) = logger();
        let (count, sub) = signal_counter(&logger);
        logger.emit("a");
        drop(sub);
        logger.emit("b");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(logger.contents(), "a\nb\n");
    }

    // ==================== Generations ====================

    #[test]
    fn test_only_clear_advances_generation() {
        let (_store, logger) = logger();
        assert_eq!(logger.generation(), 0);
        logger.emit("a");
        assert_eq!(logger.generation(), 0);
        logger.clear();
        logger.clear();
        assert_eq!(logger.generation(), 2);
        assert_eq!(logger.clone().generation(), 2);
    }

    #[test]
    fn test_snapshot_tells_refill_from_growth() {
        let (_store, logger) = logger();
        logger.emit("ab");
        let before = logger.try_snapshot().unwrap();
        logger.clear();
        logger.emit("much longer");
        let after = logger.try_snapshot().unwrap();

        assert!(after.buffer.len() > before.buffer.len());
        assert_ne!(after.generation, before.generation);
        assert_eq!(after.buffer.as_str(), "much longer\n");
    }

    #[test]
    fn test_failed_clear_keeps_generation() {
        let (store, logger) = logger();
        logger.emit("kept");
        store.fail_writes.store(true, Ordering::SeqCst);
        assert!(logger.try_clear().is_err());
        assert_eq!(logger.generation(), 0);
    }

    // ==================== Failures ====================

    #[test]
    fn test_write_failure_is_a_noop_that_still_signals() {
        let (store, logger) = logger();
        let (count, _sub) = signal_counter(&logger);
        logger.emit("kept");
        store.fail_writes.store(true, Ordering::SeqCst);

        logger.emit("lost");
        logger.clear();

        store.fail_writes.store(false, Ordering::SeqCst);
        assert_eq!(logger.contents(), "kept\n");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_try_emit_reports_write_failure() {
        let (store, logger) = logger();
        store.fail_writes.store(true, Ordering::SeqCst);
        let err = logger.try_emit("x").unwrap_err();
        assert!(matches!(err, LoggerError::Write { .. }));
        assert_eq!(err.key().as_str(), "wasm_output");
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_read_failure_reads_empty() {
        let (store, logger) = logger();
        logger.emit("x");
        store.fail_reads.store(true, Ordering::SeqCst);
        assert_eq!(logger.contents(), "");
        assert!(matches!(
            logger.try_contents(),
            Err(LoggerError::Read { .. })
        ));
        assert!(logger.try_emit("y").is_err());
    }

    // ==================== Concurrency ====================

    #[test]
    fn test_concurrent_emits_keep_every_line() {
        let (_store, logger) = logger();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        logger.emit(&format!("t{}-{}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let buffer = logger.buffer();
        assert_eq!(buffer.line_count(), 100);
        for t in 0..4 {
            let ours: Vec<_> = buffer
                .lines()
                .filter(|l| l.starts_with(&format!("t{}-", t)))
                .collect();
            let expected: Vec<_> = (0..25).map(|i| format!("t{}-{}", t, i)).collect();
            assert_eq!(ours, expected);
        }
    }
}

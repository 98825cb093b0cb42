//! Read-only environment capabilities injected into reducers and side
//! effects.
//!
//! Reducers stay pure by going through a coeffects value for anything
//! environmental: the current time, fresh identifiers, the user's locale,
//! and filesystem roots. Tests substitute deterministic closures.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

/// Read accessors for environment state. No accessor has side effects beyond
/// the read itself.
pub trait Coeffects: Send + Sync {
    /// The current time.
    fn current_timestamp(&self) -> SystemTime;

    /// A fresh unique identifier.
    fn fresh_id(&self) -> Uuid;

    /// The current locale identifier, e.g. `en_US`.
    fn current_locale(&self) -> String;

    /// Root path for temporary files.
    fn temporary_directory(&self) -> PathBuf;

    /// Root path for user documents.
    fn document_directory(&self) -> PathBuf;
}

/// The standard [`Coeffects`] implementation, with every accessor
/// individually replaceable.
///
/// Cloning is cheap; clones share the accessor closures.
///
/// # Examples
///
/// ```
/// use statefold::{Coeffects, DefaultCoeffects};
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let fixed = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
/// let coeffects = DefaultCoeffects::new().with_timestamp(move || fixed);
/// assert_eq!(coeffects.current_timestamp(), fixed);
/// ```
#[derive(Clone)]
pub struct DefaultCoeffects {
    timestamp: Arc<dyn Fn() -> SystemTime + Send + Sync>,
    fresh_id: Arc<dyn Fn() -> Uuid + Send + Sync>,
    locale: Arc<dyn Fn() -> String + Send + Sync>,
    temporary_directory: Arc<dyn Fn() -> PathBuf + Send + Sync>,
    document_directory: Arc<dyn Fn() -> PathBuf + Send + Sync>,
}

impl DefaultCoeffects {
    /// Coeffects backed by the real environment: system clock, random v4
    /// UUIDs, `$LANG`, and the platform's temporary and document
    /// directories.
    pub fn new() -> Self {
        DefaultCoeffects {
            timestamp: Arc::new(SystemTime::now),
            fresh_id: Arc::new(Uuid::new_v4),
            locale: Arc::new(|| std::env::var("LANG").unwrap_or_else(|_| "en_US".to_string())),
            temporary_directory: Arc::new(std::env::temp_dir),
            document_directory: Arc::new(|| {
                dirs::document_dir().expect("platform must provide a document directory")
            }),
        }
    }

    /// Replace the timestamp accessor.
    pub fn with_timestamp<F>(mut self, timestamp: F) -> Self
    where
        F: Fn() -> SystemTime + Send + Sync + 'static,
    {
        self.timestamp = Arc::new(timestamp);
        self
    }

    /// Replace the identifier accessor.
    pub fn with_fresh_id<F>(mut self, fresh_id: F) -> Self
    where
        F: Fn() -> Uuid + Send + Sync + 'static,
    {
        self.fresh_id = Arc::new(fresh_id);
        self
    }

    /// Replace the locale accessor.
    pub fn with_locale<F>(mut self, locale: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.locale = Arc::new(locale);
        self
    }

    /// Replace the temporary-directory accessor.
    pub fn with_temporary_directory<F>(mut self, temporary_directory: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        self.temporary_directory = Arc::new(temporary_directory);
        self
    }

    /// Replace the document-directory accessor.
    pub fn with_document_directory<F>(mut self, document_directory: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        self.document_directory = Arc::new(document_directory);
        self
    }
}

impl Default for DefaultCoeffects {
    fn default() -> Self {
        DefaultCoeffects::new()
    }
}

impl std::fmt::Debug for DefaultCoeffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCoeffects").finish_non_exhaustive()
    }
}

impl Coeffects for DefaultCoeffects {
    fn current_timestamp(&self) -> SystemTime {
        (self.timestamp)()
    }

    fn fresh_id(&self) -> Uuid {
        (self.fresh_id)()
    }

    fn current_locale(&self) -> String {
        (self.locale)()
    }

    fn temporary_directory(&self) -> PathBuf {
        (self.temporary_directory)()
    }

    fn document_directory(&self) -> PathBuf {
        (self.document_directory)()
    }
}

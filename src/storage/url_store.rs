//! Key → URL registry shared by the registration and redirect front ends.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::key_generator::KeyGenerator;
use crate::config::KeyConfig;
use crate::errors::Result;

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<String, String>,
    generator: KeyGenerator,
}

/// Thread-safe URL registry.
///
/// A single mutex guards both the entry map and the key generator, so a key
/// is issued and its entry inserted in the same critical section.
#[derive(Debug, Default)]
pub struct UrlStore {
    inner: Mutex<StoreInner>,
}

impl UrlStore {
    pub fn new(generator: KeyGenerator) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                generator,
            }),
        }
    }

    pub fn from_config(config: &KeyConfig) -> Self {
        Self::new(KeyGenerator::new(config.length, config.max_attempts))
    }

    /// Store `url` under a freshly generated key and return the key.
    ///
    /// The URL is stored as given; validation is the caller's job.
    pub fn register(&self, url: &str) -> Result<String> {
        let issued = {
            let mut inner = self.inner.lock();
            let issued = inner.generator.generate();
            if let Ok(key) = &issued {
                inner.entries.insert(key.clone(), url.to_string());
            }
            issued
        };

        match issued {
            Ok(key) => {
                debug!("Registered {} -> {}", key, url);
                Ok(key)
            }
            Err(e) => {
                warn!("Key generation failed: {}", e);
                Err(e)
            }
        }
    }

    /// Look up the URL stored under `key`.
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.inner.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ShortkeyError;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::util::SubscriberInitExt;

    #[test]
    fn test_register_then_resolve() {
        let store = UrlStore::default();
        let key = store.register("https://example.com").unwrap();
        assert_eq!(store.resolve(&key).as_deref(), Some("https://example.com"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_key() {
        let store = UrlStore::default();
        assert!(store.is_empty());
        assert_eq!(store.resolve("doesnotexist"), None);
        assert_eq!(store.resolve(""), None);
    }

    #[test]
    fn test_same_url_gets_distinct_keys() {
        let store = UrlStore::default();
        let a = store.register("https://example.com").unwrap();
        let b = store.register("https://example.com").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_value_is_stored() {
        let store = UrlStore::default();
        let key = store.register("").unwrap();
        assert_eq!(store.resolve(&key).as_deref(), Some(""));
    }

    #[test]
    fn test_independent_stores() {
        let a = UrlStore::default();
        let b = UrlStore::default();
        let key = a.register("https://a.example").unwrap();
        assert!(b.resolve(&key).is_none());
    }

    #[test]
    fn test_concurrent_registrations_get_unique_keys() {
        let store = Arc::new(UrlStore::default());
        let handles: Vec<_> = (0..16)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..200)
                        .map(|i| {
                            let url = format!("https://example.com/{}/{}", t, i);
                            let key = store.register(&url).unwrap();
                            (key, url)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut keys = HashSet::new();
        for handle in handles {
            for (key, url) in handle.join().unwrap() {
                assert!(keys.insert(key.clone()), "duplicate key {}", key);
                assert_eq!(store.resolve(&key), Some(url));
            }
        }
        assert_eq!(keys.len(), 16 * 200);
        assert_eq!(store.len(), 16 * 200);
    }

    /// Records whether the store lock was held while an event was emitted
    struct LockWatcher {
        store: Arc<UrlStore>,
        held_while_logging: Arc<AtomicBool>,
    }

    impl<S: tracing::Subscriber> Layer<S> for LockWatcher {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if self.store.inner.try_lock().is_none() {
                self.held_while_logging.store(true, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_logging_happens_outside_the_lock() {
        let store = Arc::new(UrlStore::from_config(&KeyConfig {
            length: 1,
            max_attempts: 10_000,
        }));
        let held = Arc::new(AtomicBool::new(false));
        let _guard = tracing_subscriber::registry()
            .with(LockWatcher {
                store: Arc::clone(&store),
                held_while_logging: Arc::clone(&held),
            })
            .set_default();

        for i in 0..35 {
            store.register(&format!("https://example.com/{}", i)).unwrap();
        }
        assert!(store.register("https://example.com/overflow").is_err());

        assert!(!held.load(Ordering::SeqCst));
    }

    #[test]
    fn test_exhaustion_leaves_entries_intact() {
        let store = UrlStore::from_config(&KeyConfig {
            length: 1,
            max_attempts: 10_000,
        });
        for i in 0..35 {
            store.register(&format!("https://example.com/{}", i)).unwrap();
        }
        let err = store.register("https://example.com/overflow").unwrap_err();
        assert!(matches!(err, ShortkeyError::KeySpaceExhausted(_)));
        assert_eq!(store.len(), 35);
    }
}

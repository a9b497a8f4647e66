//! Single-flight load cache.
//!
//! The cache stores the *pending* load, not its result: the first request for
//! a key starts the loader and every later request for the same key awaits
//! the same shared future. Concurrent requests therefore trigger exactly one
//! load, and a failed load is observed as the same error by every waiter.

use std::cell::RefCell;
use std::future::Future;
use std::hash::Hash;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use rustc_hash::FxHashMap;

use crate::errors::Result;

/// A load that may be awaited from several places.
pub type SharedLoad<V> = Shared<LocalBoxFuture<'static, Result<V>>>;

pub struct LoadCache<K, V> {
    entries: RefCell<FxHashMap<K, SharedLoad<V>>>,
}

impl<K, V> Default for LoadCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(FxHashMap::default()),
        }
    }
}

impl<K, V> LoadCache<K, V>
where
    K: Eq + Hash,
    V: Clone + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pending or finished load for `key`, starting `load` only
    /// when the key has never been requested.
    pub fn get_or_load<F, Fut>(&self, key: K, load: F) -> SharedLoad<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + 'static,
    {
        self.entries
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| load().boxed_local().shared())
            .clone()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.borrow().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

//! Registry of constructed target platforms
//!
//! Building a target platform means running the external module resolver
//! over every module location, which is expensive. The registry keeps the
//! results keyed by workspace, location set and configuration. It is an
//! ordinary value owned by the caller and passed by reference.
//!
//! ## Lifecycle
//!
//! - [`PlatformRegistry::get_or_try_insert`] constructs a missing entry; at
//!   most one construction per key runs at a time, other keys proceed.
//! - [`PlatformRegistry::get`] reads a constructed entry.
//! - [`PlatformRegistry::refresh`] rebuilds an entry in place.
//! - [`PlatformRegistry::invalidate`] and [`PlatformRegistry::clear`] drop
//!   entries. A key keeps its lock once seen, so dropping an entry while it
//!   is being constructed cannot start a second construction next to it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use blake3::Hasher;
use tracing::debug;

use crate::error::Result;
use crate::module::TargetPlatform;

/// Hash prefix for registry keys
pub const KEY_PREFIX: &str = "blake3:";

/// Identity of a target platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformKey {
    workspace: String,
    locations: BTreeSet<PathBuf>,
    configuration: BTreeMap<String, String>,
}

impl PlatformKey {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            locations: BTreeSet::new(),
            configuration: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.locations.insert(location.into());
        self
    }

    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    /// Stable digest of the key; location and setting order do not matter
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        hash_field(&mut hasher, self.workspace.as_bytes());
        for location in &self.locations {
            hash_field(&mut hasher, location.to_string_lossy().as_bytes());
        }
        hasher.update(&[0xff]);
        for (key, value) in &self.configuration {
            hash_field(&mut hasher, key.as_bytes());
            hash_field(&mut hasher, value.as_bytes());
        }
        format!("{}{}", KEY_PREFIX, hasher.finalize().to_hex())
    }
}

/// Length-prefixed so that adjacent fields cannot run into each other
fn hash_field(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// Caller-owned cache of constructed platforms
pub struct PlatformRegistry<T = TargetPlatform> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for PlatformRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> PlatformRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, digest: &str) -> Slot<T> {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry(digest.to_string()).or_default())
    }

    /// Constructed entry for `key`, if any
    pub fn get(&self, key: &PlatformKey) -> Option<Arc<T>> {
        let slot = lock(&self.slots).get(&key.digest()).cloned()?;
        lock(&slot).clone()
    }

    /// Returns the entry for `key`, constructing it with `build` if missing
    ///
    /// Concurrent callers with the same key wait for the first construction
    /// instead of starting their own. A failed construction leaves the key
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns the error of `build`.
    pub fn get_or_try_insert<F>(&self, key: &PlatformKey, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let digest = key.digest();
        let slot = self.slot(&digest);
        let mut value = lock(&slot);
        if let Some(existing) = value.as_ref() {
            return Ok(Arc::clone(existing));
        }

        debug!(key = %digest, "constructing target platform");
        let built = Arc::new(build()?);
        *value = Some(Arc::clone(&built));
        Ok(built)
    }

    /// Rebuilds the entry for `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns the error of `build`; the previous value is kept then.
    pub fn refresh<F>(&self, key: &PlatformKey, build: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let digest = key.digest();
        let slot = self.slot(&digest);
        let mut value = lock(&slot);

        debug!(key = %digest, "refreshing target platform");
        let built = Arc::new(build()?);
        *value = Some(Arc::clone(&built));
        Ok(built)
    }

    /// Drops the entry for `key`; returns whether one existed
    ///
    /// Waits for a construction of `key` that is running. The slot itself
    /// stays, so a later construction is still serialized with any other.
    pub fn invalidate(&self, key: &PlatformKey) -> bool {
        let Some(slot) = lock(&self.slots).get(&key.digest()).cloned() else {
            return false;
        };
        lock(&slot).take().is_some()
    }

    /// Drops every entry, waiting for running constructions
    pub fn clear(&self) {
        for slot in self.slot_list() {
            lock(&slot).take();
        }
    }

    /// Number of constructed entries
    ///
    /// Waits for running constructions. Keys whose construction failed are
    /// not counted.
    pub fn len(&self) -> usize {
        self.slot_list()
            .iter()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the slots, taken without holding the map lock afterwards
    fn slot_list(&self) -> Vec<Slot<T>> {
        lock(&self.slots).values().cloned().collect()
    }
}

//! One-shot "became visible" triggers.
//!
//! [`ViewportGate`] sits between a platform intersection observer (any
//! [`IntersectionSource`]) and the components that wait for their element to
//! scroll into view. Each observed key fires [`BecameVisible`] at most once
//! and is unobserved as soon as it does.
//!
//! ```rust
//! use glide::config::GateConfig;
//! use glide::gate::{IntersectionEntry, IntersectionSource, ObserveOutcome, ViewportGate};
//!
//! #[derive(Default)]
//! struct Recorder(Vec<&'static str>);
//!
//! impl IntersectionSource<&'static str> for Recorder {
//!     fn observe(&mut self, key: &&'static str, _: &GateConfig) -> ObserveOutcome {
//!         self.0.push(*key);
//!         ObserveOutcome::Observing
//!     }
//!     fn unobserve(&mut self, key: &&'static str) {
//!         self.0.retain(|k| k != key);
//!     }
//!     fn disconnect(&mut self) {
//!         self.0.clear();
//!     }
//! }
//!
//! let mut gate = ViewportGate::new(Recorder::default());
//! let hero = gate.observe("hero", GateConfig::default());
//! assert!(hero.is_none());
//!
//! let fired = gate.on_entry(&"hero", IntersectionEntry::new(true, 0.4));
//! assert!(fired.is_some());
//! assert!(gate.on_entry(&"hero", IntersectionEntry::new(true, 0.9)).is_none());
//! assert!(gate.flag(&"hero").unwrap().is_set());
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use tracing::debug;

use crate::config::GateConfig;

/// Result of asking the platform to watch an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// The element is being watched.
    Observing,
    /// The element does not exist yet; retry once it is mounted.
    ElementMissing,
    /// The platform cannot observe intersections.
    Unsupported,
}

/// Platform intersection observer.
pub trait IntersectionSource<K> {
    /// Starts watching `key` with the given threshold and margin.
    fn observe(&mut self, key: &K, config: &GateConfig) -> ObserveOutcome;

    /// Stops watching `key`.
    fn unobserve(&mut self, key: &K);

    /// Stops watching everything.
    fn disconnect(&mut self);
}

/// One intersection report for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Whether the element intersects the (margin-grown) viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the element.
    pub ratio: f64,
}

impl IntersectionEntry {
    /// Creates an entry.
    pub const fn new(is_intersecting: bool, ratio: f64) -> Self {
        Self {
            is_intersecting,
            ratio,
        }
    }

    fn passes(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// Event emitted the first time an element is seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BecameVisible<K>(pub K);

/// Monotonic visibility bit, shared read-only with dependants.
///
/// Clones observe the same bit. Only the owning [`ViewportGate`] can set it,
/// and it is never cleared.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFlag(Rc<Cell<bool>>);

impl VisibilityFlag {
    /// Whether the element has been seen.
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    fn set(&self) {
        self.0.set(true);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Watch {
    Deferred,
    Watching,
    Seen,
}

#[derive(Debug)]
struct Observed {
    config: GateConfig,
    watch: Watch,
    flag: VisibilityFlag,
}

/// Tracks which elements have entered the viewport.
#[derive(Debug)]
pub struct ViewportGate<K, S>
where
    K: Eq + Hash + Clone,
    S: IntersectionSource<K>,
{
    source: S,
    observed: HashMap<K, Observed>,
    torn_down: bool,
}

impl<K, S> ViewportGate<K, S>
where
    K: Eq + Hash + Clone,
    S: IntersectionSource<K>,
{
    /// Creates a gate over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            observed: HashMap::new(),
            torn_down: false,
        }
    }

    /// Starts watching `key`.
    ///
    /// Returns the event immediately when the platform cannot observe
    /// intersections. Observing a key again only updates its config; a key
    /// that already fired never fires again.
    pub fn observe(&mut self, key: K, config: GateConfig) -> Option<BecameVisible<K>> {
        if self.torn_down {
            return None;
        }
        let entry = self.observed.entry(key.clone()).or_insert_with(|| Observed {
            config: config.clone(),
            watch: Watch::Deferred,
            flag: VisibilityFlag::default(),
        });
        if entry.watch == Watch::Seen {
            return None;
        }
        if entry.watch == Watch::Watching {
            self.source.unobserve(&key);
        }
        entry.config = config;
        entry.watch = Watch::Deferred;
        self.register(key)
    }

    /// Retries a deferred observation once the element exists.
    pub fn element_mounted(&mut self, key: &K) -> Option<BecameVisible<K>> {
        if self.torn_down || !self.is_deferred(key) {
            return None;
        }
        self.register(key.clone())
    }

    /// Feeds one intersection report.
    ///
    /// Fires on the first report that intersects at or above the key's
    /// threshold; every later report for that key is ignored.
    pub fn on_entry(&mut self, key: &K, entry: IntersectionEntry) -> Option<BecameVisible<K>> {
        let observed = self.observed.get_mut(key)?;
        if observed.watch != Watch::Watching || !entry.passes(observed.config.threshold) {
            return None;
        }
        observed.watch = Watch::Seen;
        observed.flag.set();
        self.source.unobserve(key);
        debug!(ratio = entry.ratio, "viewport gate: element became visible");
        Some(BecameVisible(key.clone()))
    }

    /// Whether `key` has been seen.
    pub fn is_visible(&self, key: &K) -> bool {
        self.observed
            .get(key)
            .is_some_and(|observed| observed.watch == Watch::Seen)
    }

    /// Whether `key` is still waiting for its element to mount.
    pub fn is_deferred(&self, key: &K) -> bool {
        self.observed
            .get(key)
            .is_some_and(|observed| observed.watch == Watch::Deferred)
    }

    /// Shared visibility bit for `key`, if it was ever observed.
    pub fn flag(&self, key: &K) -> Option<VisibilityFlag> {
        self.observed.get(key).map(|observed| observed.flag.clone())
    }

    /// Keys still being watched or waiting to mount.
    pub fn pending(&self) -> usize {
        self.observed
            .values()
            .filter(|observed| observed.watch != Watch::Seen)
            .count()
    }

    /// The platform source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the platform source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Keys still waiting for their element to mount.
    pub fn deferred_keys(&self) -> Vec<K> {
        self.observed
            .iter()
            .filter(|(_, observed)| observed.watch == Watch::Deferred)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Releases every watch. Later reports and observations are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.source.disconnect();
        self.observed.retain(|_, observed| observed.watch == Watch::Seen);
        debug!("viewport gate: torn down");
    }

    fn register(&mut self, key: K) -> Option<BecameVisible<K>> {
        let config = self.observed.get(&key)?.config.clone();
        let outcome = self.source.observe(&key, &config);
        let observed = self.observed.get_mut(&key)?;
        match outcome {
            ObserveOutcome::Observing => {
                observed.watch = Watch::Watching;
                None
            }
            ObserveOutcome::ElementMissing => {
                debug!("viewport gate: element not mounted, deferring");
                observed.watch = Watch::Deferred;
                None
            }
            ObserveOutcome::Unsupported => {
                debug!("viewport gate: intersection observation unavailable, revealing");
                observed.watch = Watch::Seen;
                observed.flag.set();
                Some(BecameVisible(key))
            }
        }
    }
}

impl<K, S> Drop for ViewportGate<K, S>
where
    K: Eq + Hash + Clone,
    S: IntersectionSource<K>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Placeholder-then-fade state of a lazily loaded asset.
///
/// The asset is requested once it is in view and revealed once loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LazyReveal {
    in_view: bool,
    loaded: bool,
}

impl LazyReveal {
    /// Creates a reveal that is neither in view nor loaded.
    pub const fn new() -> Self {
        Self {
            in_view: false,
            loaded: false,
        }
    }

    /// Records that the asset's slot became visible.
    pub fn on_visible(&mut self) {
        self.in_view = true;
    }

    /// Records that the asset finished loading.
    pub fn on_loaded(&mut self) {
        self.loaded = true;
    }

    /// Whether the asset should be requested.
    pub const fn should_load(&self) -> bool {
        self.in_view
    }

    /// Whether the placeholder still shows.
    pub const fn shows_placeholder(&self) -> bool {
        !self.loaded
    }

    /// Opacity of the asset itself.
    pub const fn opacity(&self) -> f64 {
        if self.loaded { 1.0 } else { 0.0 }
    }
}

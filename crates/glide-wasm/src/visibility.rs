//! `IntersectionObserver`-backed viewport gate.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use glide::config::GateConfig;
use glide::gate::{IntersectionEntry, IntersectionSource, ObserveOutcome, ViewportGate};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::to_js_error;

type Gate = ViewportGate<u32, DomSource>;
type EntriesCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

enum Target {
    Element(Element),
    Selector(String),
}

/// Maps gate keys to DOM elements and a shared observer.
///
/// `targets`, `resolved` and `selectors` only hold keys that have not fired.
/// `keys` tags every element with its key for as long as the element lives.
struct DomSource {
    observer: Option<IntersectionObserver>,
    supported: bool,
    targets: HashMap<u32, Target>,
    resolved: HashMap<u32, Element>,
    selectors: HashMap<String, u32>,
    keys: js_sys::WeakMap,
}

impl DomSource {
    fn new(supported: bool) -> Self {
        Self {
            observer: None,
            supported,
            targets: HashMap::new(),
            resolved: HashMap::new(),
            selectors: HashMap::new(),
            keys: js_sys::WeakMap::new(),
        }
    }

    fn resolve(&mut self, key: u32) -> Option<Element> {
        if let Some(element) = self.resolved.get(&key) {
            return Some(element.clone());
        }
        let element = match self.targets.get(&key)? {
            Target::Element(element) => element.clone(),
            Target::Selector(selector) => query(selector)?,
        };
        // An element keeps the key it was first registered under.
        if self.key_of(&element).is_none() {
            self.keys.set(&element, &JsValue::from(key));
        }
        self.resolved.insert(key, element.clone());
        Some(element)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn key_of(&self, element: &Element) -> Option<u32> {
        self.keys.get(element).as_f64().map(|key| key as u32)
    }

    /// Key already assigned to `target`, if it was watched before.
    fn existing_key(&self, target: &Target) -> Option<u32> {
        match target {
            Target::Element(element) => self.key_of(element),
            Target::Selector(selector) => self
                .selectors
                .get(selector)
                .copied()
                .or_else(|| query(selector).and_then(|element| self.key_of(&element))),
        }
    }

    fn insert(&mut self, key: u32, target: Target) {
        match &target {
            Target::Element(element) => {
                self.keys.set(element, &JsValue::from(key));
            }
            Target::Selector(selector) => {
                self.selectors.insert(selector.clone(), key);
            }
        }
        self.targets.insert(key, target);
    }

    /// Drops the lookups for a key that has fired.
    fn forget(&mut self, key: u32) {
        if let Some(Target::Selector(selector)) = self.targets.remove(&key) {
            self.selectors.remove(&selector);
        }
        self.resolved.remove(&key);
    }
}

fn query(selector: &str) -> Option<Element> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(selector).ok().flatten())
}

impl IntersectionSource<u32> for DomSource {
    fn observe(&mut self, key: &u32, _config: &GateConfig) -> ObserveOutcome {
        if !self.supported {
            return ObserveOutcome::Unsupported;
        }
        let Some(element) = self.resolve(*key) else {
            return ObserveOutcome::ElementMissing;
        };
        match &self.observer {
            Some(observer) => {
                observer.observe(&element);
                ObserveOutcome::Observing
            }
            None => ObserveOutcome::Unsupported,
        }
    }

    fn unobserve(&mut self, key: &u32) {
        if let (Some(observer), Some(element)) = (&self.observer, self.resolved.get(key)) {
            observer.unobserve(element);
        }
    }

    fn disconnect(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

/// Calls `callback(element)` once for each observed element the first time it
/// scrolls into view.
#[wasm_bindgen]
pub struct VisibilityGate {
    gate: Rc<RefCell<Gate>>,
    config: GateConfig,
    callback: js_sys::Function,
    next_key: u32,
    _on_entries: Option<EntriesCallback>,
}

#[wasm_bindgen]
impl VisibilityGate {
    /// Creates a gate with the given threshold and root margin.
    #[wasm_bindgen(constructor)]
    pub fn new(
        callback: js_sys::Function,
        threshold: Option<f64>,
        root_margin: Option<String>,
    ) -> Result<Self, JsValue> {
        let mut config = GateConfig::default();
        if let Some(threshold) = threshold {
            config.threshold = threshold;
        }
        if let Some(margin) = root_margin {
            config.root_margin = margin;
        }
        glide::MotionConfig {
            gate: config.clone(),
            ..glide::MotionConfig::default()
        }
        .validate()
        .map_err(to_js_error)?;

        let supported = web_sys::window().is_some_and(|window| {
            js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
                .unwrap_or(false)
        });

        let gate = Rc::new(RefCell::new(ViewportGate::new(DomSource::new(supported))));

        let on_entries = if supported {
            let (observer, on_entries) =
                Self::create_observer(Rc::downgrade(&gate), &config, callback.clone())?;
            gate.borrow_mut().source_mut().observer = Some(observer);
            Some(on_entries)
        } else {
            tracing::debug!("IntersectionObserver unavailable, elements reveal immediately");
            None
        };

        Ok(Self {
            gate,
            config,
            callback,
            next_key: 0,
            _on_entries: on_entries,
        })
    }

    /// Watches `element`. Returns `true` if it was revealed immediately.
    ///
    /// Watching an element again never reveals it a second time.
    pub fn observe(&mut self, element: Element) -> bool {
        self.watch(Target::Element(element))
    }

    /// Watches the first element matching `selector`, now or once it exists.
    #[wasm_bindgen(js_name = "observeSelector")]
    pub fn observe_selector(&mut self, selector: String) -> bool {
        self.watch(Target::Selector(selector))
    }

    /// Retries selectors whose element was not in the document yet.
    pub fn refresh(&self) {
        let revealed: Vec<_> = {
            let mut gate = self.gate.borrow_mut();
            gate.deferred_keys()
                .into_iter()
                .filter_map(|key| gate.element_mounted(&key))
                .collect()
        };
        for fired in revealed {
            self.notify(fired.0);
        }
    }

    /// Elements still waiting to be seen.
    pub fn pending(&self) -> usize {
        self.gate.borrow().pending()
    }

    /// Stops observing everything.
    pub fn disconnect(&self) {
        self.gate.borrow_mut().teardown();
    }
}

impl VisibilityGate {
    fn create_observer(
        gate: Weak<RefCell<Gate>>,
        config: &GateConfig,
        callback: js_sys::Function,
    ) -> Result<(IntersectionObserver, EntriesCallback), JsValue> {
        let on_entries = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let Some(gate) = gate.upgrade() else {
                    return;
                };
                let mut revealed = Vec::new();
                {
                    let mut gate = gate.borrow_mut();
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let target = entry.target();
                        let Some(key) = gate.source().key_of(&target) else {
                            continue;
                        };
                        let report = IntersectionEntry::new(
                            entry.is_intersecting(),
                            entry.intersection_ratio(),
                        );
                        if gate.on_entry(&key, report).is_some() {
                            gate.source_mut().forget(key);
                            revealed.push(target);
                        }
                    }
                }
                for element in revealed {
                    let _ = callback.call1(&JsValue::NULL, &element);
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(&config.root_margin);
        let observer =
            IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &options)?;
        Ok((observer, on_entries))
    }

    fn watch(&mut self, target: Target) -> bool {
        let fired = {
            let mut gate = self.gate.borrow_mut();
            let existing = gate.source().existing_key(&target);
            let key = match existing {
                Some(key) => key,
                None => {
                    let key = self.next_key;
                    self.next_key = self.next_key.wrapping_add(1);
                    gate.source_mut().insert(key, target);
                    key
                }
            };
            gate.observe(key, self.config.clone())
        };
        match fired {
            Some(fired) => {
                self.notify(fired.0);
                true
            }
            None => false,
        }
    }

    fn notify(&self, key: u32) {
        let element = {
            let mut gate = self.gate.borrow_mut();
            let source = gate.source_mut();
            let element = source.resolve(key);
            source.forget(key);
            element.map_or(JsValue::NULL, JsValue::from)
        };
        let _ = self.callback.call1(&JsValue::NULL, &element);
    }
}

impl Drop for VisibilityGate {
    fn drop(&mut self) {
        if let Ok(mut gate) = self.gate.try_borrow_mut() {
            gate.teardown();
        }
    }
}

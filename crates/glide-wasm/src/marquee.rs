//! Looping logo marquee bound to DOM elements.

use std::cell::RefCell;
use std::rc::Rc;

use glide::config::MotionConfig;
use glide::geometry::{Axis, Point};
use glide::track::{ContentLoader, Direction, LoopTrack, Track};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlImageElement, Node, ResizeObserver, Window};

use crate::scheduler::{FrameDriver, timestamp};
use crate::to_js_error;

type Listener = Closure<dyn FnMut()>;

struct Stage {
    engine: LoopTrack<Element>,
    container: HtmlElement,
    strip: HtmlElement,
    sequence: HtmlElement,
    clones: Vec<Node>,
    loader: ContentLoader,
}

impl Stage {
    fn extent(element: &HtmlElement, axis: Axis) -> f64 {
        let rect = element.get_bounding_client_rect();
        match axis {
            Axis::Horizontal => rect.width(),
            Axis::Vertical => rect.height(),
        }
    }

    /// Reads layout, then writes the copies the new size needs.
    fn measure(&mut self) {
        let axis = self.engine.track().axis();
        let container = Self::extent(&self.container, axis);
        let sequence = Self::extent(&self.sequence, axis);
        if !self.engine.measure(container, sequence) {
            return;
        }
        self.sync_clones();
        self.render();
    }

    fn sync_clones(&mut self) {
        let wanted = self.engine.track().copies().saturating_sub(1);
        while self.clones.len() > wanted {
            if let Some(clone) = self.clones.pop() {
                let _ = self.strip.remove_child(&clone);
            }
        }
        while self.clones.len() < wanted {
            let Ok(clone) = self.sequence.clone_node_with_deep(true) else {
                break;
            };
            if let Some(element) = clone.dyn_ref::<Element>() {
                let _ = element.set_attribute("aria-hidden", "true");
                let _ = element.remove_attribute("id");
            }
            if self.strip.append_child(&clone).is_err() {
                break;
            }
            self.clones.push(clone);
        }
    }

    fn render(&self) {
        let transform = self.engine.transform();
        let _ = self
            .strip
            .style()
            .set_property("transform", &transform.to_css());
    }
}

enum ResizeSource {
    Observer(ResizeObserver),
    Window(Window),
    None,
}

/// A marquee scrolling `sequence` (and its clones) inside `container`.
///
/// `strip` is the element that moves; `sequence` is one full pass of items
/// inside it. Call [`Marquee::destroy`] (or `free()`) on unmount.
#[wasm_bindgen]
pub struct Marquee {
    stage: Rc<RefCell<Stage>>,
    driver: FrameDriver,
    resize: ResizeSource,
    on_resize: Option<Listener>,
    image_listeners: Vec<(HtmlImageElement, Listener)>,
    destroyed: bool,
}

#[wasm_bindgen]
impl Marquee {
    /// Attaches a marquee with explicit speed and direction.
    ///
    /// `hover_speed` wins over `pause_on_hover`; pass neither to pause on hover.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        strip: HtmlElement,
        sequence: HtmlElement,
        speed: f64,
        direction: &str,
        hover_speed: Option<f64>,
        pause_on_hover: Option<bool>,
    ) -> Result<Self, JsValue> {
        let mut config = MotionConfig::default();
        config.track.speed = speed;
        config.track.direction = direction
            .parse::<Direction>()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        config.track.hover_speed = hover_speed;
        config.track.pause_on_hover = pause_on_hover;
        config.validate().map_err(to_js_error)?;
        Ok(Self::attach(container, strip, sequence, &config))
    }

    /// Attaches a marquee configured from a TOML document.
    #[wasm_bindgen(js_name = "fromConfig")]
    pub fn from_config(
        container: HtmlElement,
        strip: HtmlElement,
        sequence: HtmlElement,
        toml: &str,
    ) -> Result<Self, JsValue> {
        let config = MotionConfig::from_toml_str(toml).map_err(to_js_error)?;
        Ok(Self::attach(container, strip, sequence, &config))
    }

    /// Re-reads container and sequence sizes.
    pub fn measure(&self) {
        self.stage.borrow_mut().measure();
    }

    /// Copies of the sequence currently rendered, original included.
    pub fn copies(&self) -> usize {
        self.stage.borrow().engine.track().copies()
    }

    /// Current offset in pixels.
    pub fn offset(&self) -> f64 {
        self.stage.borrow().engine.offset()
    }

    #[wasm_bindgen(js_name = "pointerEnter")]
    pub fn pointer_enter(&self) {
        self.stage.borrow_mut().engine.on_hover_change(true);
    }

    #[wasm_bindgen(js_name = "pointerLeave")]
    pub fn pointer_leave(&self) {
        self.stage.borrow_mut().engine.on_hover_change(false);
    }

    /// Press at client coordinates; `time_ms` is the event timestamp.
    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&self, x: f64, y: f64, time_ms: f64) {
        self.stage
            .borrow_mut()
            .engine
            .on_drag_start(Point::new(x, y), timestamp(time_ms));
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&self, x: f64, y: f64, time_ms: f64) {
        let mut stage = self.stage.borrow_mut();
        if !stage.engine.is_dragging() {
            return;
        }
        stage
            .engine
            .on_drag_move(Point::new(x, y), timestamp(time_ms));
        stage.render();
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&self) {
        self.stage.borrow_mut().engine.on_drag_end();
    }

    /// Stops animating and releases every listener and clone.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.driver.stop();

        match std::mem::replace(&mut self.resize, ResizeSource::None) {
            ResizeSource::Observer(observer) => observer.disconnect(),
            ResizeSource::Window(window) => {
                if let Some(listener) = self.on_resize.as_ref() {
                    let _ = window.remove_event_listener_with_callback(
                        "resize",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
            ResizeSource::None => {}
        }
        self.on_resize = None;

        for (image, listener) in self.image_listeners.drain(..) {
            for event in ["load", "error"] {
                let _ = image
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
        }

        let mut stage = self.stage.borrow_mut();
        stage.engine.cancel_interactions();
        for clone in std::mem::take(&mut stage.clones) {
            let _ = stage.strip.remove_child(&clone);
        }
        let _ = stage.strip.style().remove_property("transform");
        tracing::debug!("marquee destroyed");
    }
}

impl Marquee {
    fn attach(
        container: HtmlElement,
        strip: HtmlElement,
        sequence: HtmlElement,
        config: &MotionConfig,
    ) -> Self {
        let mut items = Vec::new();
        let children = sequence.children();
        for index in 0..children.length() {
            if let Some(child) = children.item(index) {
                items.push(child);
            }
        }

        let driver = FrameDriver::new(&config.clock);
        let mut engine = LoopTrack::new(config.track.clone());
        engine.configure(Track::new(items), config.track.speed, config.track.direction);
        engine.set_reduced_motion(driver.reduced_motion());

        let images = sequence
            .query_selector_all("img")
            .ok()
            .map(|list| {
                (0..list.length())
                    .filter_map(|i| list.item(i))
                    .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
                    .filter(|image| !image.complete())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let stage = Rc::new(RefCell::new(Stage {
            engine,
            container,
            strip,
            sequence,
            clones: Vec::new(),
            loader: ContentLoader::new(images.len()),
        }));

        let mut marquee = Self {
            stage: Rc::clone(&stage),
            driver,
            resize: ResizeSource::None,
            on_resize: None,
            image_listeners: Vec::new(),
            destroyed: false,
        };
        marquee.watch_images(images);
        marquee.watch_resize();

        // Measured now and again once every image has settled.
        {
            let mut stage = stage.borrow_mut();
            stage.measure();
            let _ = stage.loader.take_ready();
        }

        let driven = Rc::clone(&stage);
        marquee.driver.start(move |dt| {
            let mut stage = driven.borrow_mut();
            stage.engine.tick(dt);
            stage.render();
        });
        tracing::debug!(
            copies = stage.borrow().engine.track().copies(),
            "marquee attached"
        );
        marquee
    }

    fn watch_images(&mut self, images: Vec<HtmlImageElement>) {
        for image in images {
            let stage = Rc::clone(&self.stage);
            let listener = Closure::<dyn FnMut()>::new(move || {
                let mut stage = stage.borrow_mut();
                if stage.loader.settle_one() {
                    stage.measure();
                }
            });
            for event in ["load", "error"] {
                let _ = image
                    .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
            self.image_listeners.push((image, listener));
        }
    }

    fn watch_resize(&mut self) {
        let stage = Rc::clone(&self.stage);
        let listener = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut stage) = stage.try_borrow_mut() {
                stage.measure();
            }
        });

        if let Ok(observer) = ResizeObserver::new(listener.as_ref().unchecked_ref()) {
            let stage = self.stage.borrow();
            observer.observe(&stage.container);
            observer.observe(&stage.sequence);
            self.resize = ResizeSource::Observer(observer);
        } else if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
            self.resize = ResizeSource::Window(window);
        }
        self.on_resize = Some(listener);
    }
}

impl Drop for Marquee {
    fn drop(&mut self) {
        self.destroy();
    }
}

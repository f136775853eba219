//! Pointer-tilted card bound to DOM elements.

use std::cell::RefCell;
use std::rc::Rc;

use glide::config::MotionConfig;
use glide::geometry::{Point, Rect};
use glide::tilt::TiltResponder;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::scheduler::FrameDriver;
use crate::to_js_error;

struct Card {
    engine: TiltResponder,
    surface: HtmlElement,
    figure: HtmlElement,
    caption: Option<HtmlElement>,
}

impl Card {
    fn rect(&self) -> Rect {
        let rect = self.surface.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn render(&self) {
        let pose = self.engine.pose();
        let _ = self
            .figure
            .style()
            .set_property("transform", &pose.surface_css());
        if let Some(caption) = &self.caption {
            let style = caption.style();
            let _ = style.set_property("transform", &pose.caption_css());
            let _ = style.set_property("opacity", &pose.caption_opacity.to_string());
        }
    }
}

/// A card whose `figure` tilts toward the pointer over `surface`.
///
/// Under reduced motion the card stays flat and ignores pointer input.
#[wasm_bindgen]
pub struct TiltCard {
    card: Rc<RefCell<Card>>,
    driver: FrameDriver,
    reduced_motion: bool,
}

#[wasm_bindgen]
impl TiltCard {
    /// Attaches with default tunables.
    #[wasm_bindgen(constructor)]
    pub fn new(
        surface: HtmlElement,
        figure: HtmlElement,
        caption: Option<HtmlElement>,
        rotate_amplitude: Option<f64>,
        scale_on_hover: Option<f64>,
    ) -> Result<Self, JsValue> {
        let mut config = MotionConfig::default();
        if let Some(amplitude) = rotate_amplitude {
            config.tilt.rotate_amplitude = amplitude;
        }
        if let Some(scale) = scale_on_hover {
            config.tilt.scale_on_hover = scale;
        }
        config.validate().map_err(to_js_error)?;
        Ok(Self::attach(surface, figure, caption, &config))
    }

    /// Attaches with tunables from a TOML document.
    #[wasm_bindgen(js_name = "fromConfig")]
    pub fn from_config(
        surface: HtmlElement,
        figure: HtmlElement,
        caption: Option<HtmlElement>,
        toml: &str,
    ) -> Result<Self, JsValue> {
        let config = MotionConfig::from_toml_str(toml).map_err(to_js_error)?;
        Ok(Self::attach(surface, figure, caption, &config))
    }

    #[wasm_bindgen(js_name = "mouseEnter")]
    pub fn mouse_enter(&self) {
        if self.reduced_motion {
            return;
        }
        self.card.borrow_mut().engine.on_pointer_enter();
    }

    /// Mouse sample in client coordinates.
    #[wasm_bindgen(js_name = "mouseMove")]
    pub fn mouse_move(&self, client_x: f64, client_y: f64) {
        self.sample(client_x, client_y, TiltResponder::on_pointer_move);
    }

    #[wasm_bindgen(js_name = "mouseLeave")]
    pub fn mouse_leave(&self) {
        if self.reduced_motion {
            return;
        }
        self.card.borrow_mut().engine.on_pointer_leave_mouse();
    }

    /// First touch point in client coordinates.
    #[wasm_bindgen(js_name = "touchStart")]
    pub fn touch_start(&self, client_x: f64, client_y: f64) {
        self.sample(client_x, client_y, TiltResponder::on_touch_start);
    }

    #[wasm_bindgen(js_name = "touchMove")]
    pub fn touch_move(&self, client_x: f64, client_y: f64) {
        self.sample(client_x, client_y, TiltResponder::on_touch_move);
    }

    #[wasm_bindgen(js_name = "touchEnd")]
    pub fn touch_end(&self) {
        if self.reduced_motion {
            return;
        }
        self.card.borrow_mut().engine.on_touch_end();
    }

    /// Stops animating and clears the written styles.
    pub fn destroy(&mut self) {
        self.driver.stop();
        let mut card = self.card.borrow_mut();
        card.engine.cancel_interactions();
        let _ = card.figure.style().remove_property("transform");
        if let Some(caption) = &card.caption {
            let _ = caption.style().remove_property("transform");
            let _ = caption.style().remove_property("opacity");
        }
    }
}

impl TiltCard {
    fn attach(
        surface: HtmlElement,
        figure: HtmlElement,
        caption: Option<HtmlElement>,
        config: &MotionConfig,
    ) -> Self {
        let card = Rc::new(RefCell::new(Card {
            engine: TiltResponder::new(config.tilt.clone()),
            surface,
            figure,
            caption,
        }));
        let driver = FrameDriver::new(&config.clock);
        let reduced_motion = driver.reduced_motion();

        let driven = Rc::clone(&card);
        driver.start(move |dt| {
            let mut card = driven.borrow_mut();
            card.engine.tick(dt);
            card.render();
        });
        tracing::debug!(reduced_motion, "tilt card attached");

        Self {
            card,
            driver,
            reduced_motion,
        }
    }

    /// Measures the surface (read) before the engine sees the sample.
    fn sample(&self, x: f64, y: f64, apply: fn(&mut TiltResponder, Point, Rect)) {
        if self.reduced_motion {
            return;
        }
        let mut card = self.card.borrow_mut();
        let surface = card.rect();
        apply(&mut card.engine, Point::new(x, y), surface);
    }
}

impl Drop for TiltCard {
    fn drop(&mut self) {
        self.destroy();
    }
}

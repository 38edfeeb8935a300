use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::request_animation_frame;
use palette::Srgb;
use rand::rngs::OsRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::CanvasRenderingContext2d;
use web_sys::HtmlCanvasElement;
use web_sys::Window;

use crate::aura::Aura;
use crate::aura::Frame;
use crate::aura::Shape;
use crate::error::Error;
use crate::error::Result;
use crate::lifecycle::Subscriptions;
use crate::settings::AuraSettings;

use super::js_error;
use super::now;
use super::scroll_y;
use super::settings_from;
use super::viewport;
use super::window;

fn rgba(color: Srgb<u8>, alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        color.red,
        color.green,
        color.blue,
        alpha.clamp(0.0, 1.0)
    )
}

struct Canvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas {
    fn new(element: HtmlCanvasElement) -> Result<Self> {
        let ctx = element
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(Error::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::ContextUnavailable)?;

        Ok(Self { element, ctx })
    }

    /// Resizing clears the bitmap, which is fine since every frame is redrawn from scratch.
    fn resize(&self, width: f32, height: f32) {
        self.element.set_width(width.max(0.0) as u32);
        self.element.set_height(height.max(0.0) as u32);
    }

    fn draw(&self, frame: &Frame) -> Result<()> {
        let ctx = &self.ctx;
        let width = frame.width as f64;
        let height = frame.height as f64;

        ctx.clear_rect(0.0, 0.0, width, height);

        for shape in frame.shapes.iter() {
            match *shape {
                Shape::Wash {
                    opaque_x,
                    clear_x,
                    alpha,
                } => {
                    let gradient =
                        ctx.create_linear_gradient(opaque_x as f64, 0.0, clear_x as f64, 0.0);
                    gradient
                        .add_color_stop(0.0, &rgba(frame.color, alpha))
                        .map_err(js_error)?;
                    gradient
                        .add_color_stop(1.0, &rgba(frame.color, 0.0))
                        .map_err(js_error)?;
                    ctx.set_fill_style(&gradient);
                    ctx.fill_rect(0.0, 0.0, width, height);
                }
                Shape::Dot {
                    x,
                    y,
                    radius,
                    alpha,
                }
                | Shape::Halo {
                    x,
                    y,
                    radius,
                    alpha,
                } => {
                    ctx.set_fill_style(&JsValue::from_str(&rgba(frame.color, alpha)));
                    ctx.begin_path();
                    ctx.arc(x as f64, y as f64, radius as f64, 0.0, TAU)
                        .map_err(js_error)?;
                    ctx.fill();
                }
            }
        }

        Ok(())
    }
}

struct AuraView {
    window: Window,
    aura: RefCell<Aura>,
    left: Canvas,
    right: Canvas,
    canvas_width: f32,
    /// The scroll and resize listeners and the next animation frame.
    subs: RefCell<Subscriptions>,
}

impl AuraView {
    fn mount(
        left: HtmlCanvasElement,
        right: HtmlCanvasElement,
        settings: AuraSettings,
    ) -> Result<Rc<Self>> {
        let window = window()?;
        let left = Canvas::new(left)?;
        let right = Canvas::new(right)?;

        let (_, height) = viewport(&window);
        let aura = Aura::new(settings, scroll_y(&window), height as f32, &mut OsRng)?;

        let view = Rc::new(Self {
            window: window.clone(),
            aura: RefCell::new(aura),
            left,
            right,
            canvas_width: settings.canvas_width,
            subs: RefCell::new(Subscriptions::new()),
        });
        view.resize();

        let weak = Rc::downgrade(&view);
        let scroll = EventListener::new(&window, "scroll", move |_| {
            if let Some(view) = weak.upgrade() {
                let offset = scroll_y(&view.window);
                let now = now(&view.window);
                view.aura.borrow_mut().on_scroll(offset, now);
            }
        });

        let weak = Rc::downgrade(&view);
        let resize = EventListener::new(&window, "resize", move |_| {
            if let Some(view) = weak.upgrade() {
                view.resize();
            }
        });

        {
            let mut subs = view.subs.borrow_mut();
            subs.push(scroll);
            subs.push(resize);
        }

        view.schedule();
        Ok(view)
    }

    fn resize(&self) {
        let (_, height) = viewport(&self.window);
        let height = height as f32;
        self.left.resize(self.canvas_width, height);
        self.right.resize(self.canvas_width, height);
        self.aura.borrow_mut().resize(height);
    }

    fn schedule(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            if let Some(view) = weak.upgrade() {
                view.subs.borrow_mut().clear_scheduled();
                view.tick(timestamp);
            }
        });
        self.subs.borrow_mut().schedule(handle);
    }

    fn tick(self: &Rc<Self>, timestamp: f64) {
        let [left, right] = self.aura.borrow_mut().tick(timestamp);

        if let Err(err) = self.left.draw(&left).and_then(|_| self.right.draw(&right)) {
            log::warn!("stopping scroll aura: {}", err);
            return;
        }

        self.schedule();
    }

    fn is_mounted(&self) -> bool {
        self.subs.borrow().is_mounted()
    }

    fn unmount(&self) {
        self.subs.borrow_mut().unmount();
    }
}

/// The particle strips at the left and right edges of the page.
///
/// If either canvas can't give us a 2d context the handle is inert: the page works, it just
/// doesn't get the effect.
#[wasm_bindgen]
pub struct AuraHandle {
    view: Option<Rc<AuraView>>,
}

#[wasm_bindgen]
impl AuraHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        left: HtmlCanvasElement,
        right: HtmlCanvasElement,
        settings: Option<String>,
    ) -> Result<AuraHandle, JsValue> {
        let settings = settings_from(settings)?;

        let view = match AuraView::mount(left, right, settings.aura) {
            Ok(view) => {
                log::debug!(
                    "scroll aura mounted with {} particles per side",
                    settings.aura.particles
                );
                Some(view)
            }
            Err(err) => {
                log::warn!("scroll aura disabled: {}", err);
                None
            }
        };

        Ok(AuraHandle { view })
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.view.as_ref().map_or(false, |view| view.is_mounted())
    }

    #[wasm_bindgen(getter)]
    pub fn velocity(&self) -> f64 {
        self.view
            .as_ref()
            .map_or(0.0, |view| view.aura.borrow().velocity.velocity())
    }

    /// Cancels the frame loop and removes the scroll and resize listeners.
    pub fn unmount(&mut self) {
        if let Some(view) = self.view.take() {
            view.unmount();
            log::debug!("scroll aura unmounted");
        }
    }
}

impl Drop for AuraHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

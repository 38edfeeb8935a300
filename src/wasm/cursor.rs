use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::request_animation_frame;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;
use web_sys::HtmlElement;
use web_sys::MouseEvent;

use crate::cursor::Cursor;
use crate::cursor::CursorFrame;
use crate::error::Error;
use crate::error::Result;
use crate::lifecycle::Subscriptions;

use super::js_error;
use super::settings_from;
use super::window;

/// Elements that make the ring grow when hovered.
const INTERACTIVE: &str = "a, button, [role=\"button\"], input, textarea, select";

struct CursorView {
    cursor: RefCell<Cursor>,
    dot: HtmlElement,
    ring: HtmlElement,
    /// The pointer listeners and the next animation frame.
    subs: RefCell<Subscriptions>,
}

impl CursorView {
    fn schedule(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |_| {
            if let Some(view) = weak.upgrade() {
                view.subs.borrow_mut().clear_scheduled();
                let frame = view.cursor.borrow_mut().tick();
                if let Err(err) = view.draw(&frame) {
                    log::warn!("stopping cursor: {}", err);
                    return;
                }
                view.schedule();
            }
        });
        self.subs.borrow_mut().schedule(handle);
    }

    fn draw(&self, frame: &CursorFrame) -> Result<()> {
        let opacity = if frame.visible { "1" } else { "0" };
        for element in [&self.dot, &self.ring] {
            element
                .style()
                .set_property("opacity", opacity)
                .map_err(js_error)?;
        }

        self.dot
            .style()
            .set_property(
                "transform",
                &format!(
                    "translate3d({:.1}px, {:.1}px, 0) translate(-50%, -50%)",
                    frame.dot.0, frame.dot.1
                ),
            )
            .map_err(js_error)?;
        self.ring
            .style()
            .set_property(
                "transform",
                &format!(
                    "translate3d({:.1}px, {:.1}px, 0) translate(-50%, -50%) scale({:.2})",
                    frame.ring.0, frame.ring.1, frame.ring_scale
                ),
            )
            .map_err(js_error)?;
        Ok(())
    }
}

/// A dot that follows the mouse and a ring that trails after it.
///
/// Does nothing on devices without a fine pointer, where the native cursor (or none) is kept.
#[wasm_bindgen]
pub struct CursorHandle {
    view: Option<Rc<CursorView>>,
}

#[wasm_bindgen]
impl CursorHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        dot: HtmlElement,
        ring: HtmlElement,
        settings: Option<String>,
    ) -> Result<CursorHandle, JsValue> {
        let settings = settings_from(settings)?;
        let window = window()?;
        let fine_pointer = window
            .match_media("(pointer: fine)")
            .map_err(js_error)?
            .map_or(false, |query| query.matches());
        if !fine_pointer {
            log::debug!("custom cursor skipped: no fine pointer");
            return Ok(CursorHandle { view: None });
        }

        let view = Rc::new(CursorView {
            cursor: RefCell::new(Cursor::new(settings.cursor)),
            dot,
            ring,
            subs: RefCell::new(Subscriptions::new()),
        });

        let weak = Rc::downgrade(&view);
        let mousemove = EventListener::new(&window, "mousemove", move |event| {
            let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                return;
            };
            let hovering = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(INTERACTIVE).ok().flatten())
                .is_some();

            let mut cursor = view.cursor.borrow_mut();
            cursor.pointer_move(event.client_x() as f32, event.client_y() as f32);
            cursor.set_hovering(hovering);
        });

        let document = window.document().ok_or(Error::MissingElement("document"))?;
        let weak = Rc::downgrade(&view);
        let mouseleave = EventListener::new(&document, "mouseleave", move |_| {
            if let Some(view) = weak.upgrade() {
                view.cursor.borrow_mut().pointer_leave();
            }
        });

        {
            let mut subs = view.subs.borrow_mut();
            subs.push(mousemove);
            subs.push(mouseleave);
        }

        view.schedule();
        Ok(CursorHandle { view: Some(view) })
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.view.is_some()
    }

    pub fn unmount(&mut self) {
        if let Some(view) = self.view.take() {
            view.subs.borrow_mut().unmount();
        }
    }
}

impl Drop for CursorHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

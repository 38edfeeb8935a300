use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Document;
use web_sys::Element;
use web_sys::HtmlElement;
use web_sys::KeyboardEvent;

use crate::content::Catalog;
use crate::error::Error;
use crate::error::Result;
use crate::lifecycle::Subscriptions;
use crate::modal::CloseReason;
use crate::modal::Modal;
use crate::modal::ModalView;
use crate::modal::Transition;
use crate::settings::ModalSettings;

use super::js_error;
use super::settings_from;
use super::window;

const OPEN_CLASS: &str = "is-open";
const CLOSING_CLASS: &str = "is-closing";

/// The overlay's elements. Content nodes are emptied and refilled on every open.
struct Parts {
    root: HtmlElement,
    title: HtmlElement,
    meta: HtmlElement,
    image: Option<Element>,
    description: HtmlElement,
    tags: HtmlElement,
    links: HtmlElement,
}

impl Parts {
    fn fill(&self, document: &Document, view: &ModalView) -> Result<()> {
        self.title.set_text_content(Some(&view.title));
        self.description.set_text_content(Some(&view.description));
        if let Some(image) = &self.image {
            image.set_attribute("src", &view.image).map_err(js_error)?;
            image.set_attribute("alt", &view.title).map_err(js_error)?;
        }

        self.meta.set_text_content(None);
        append_chip(document, &self.meta, "modal-category", view.category)?;
        for badge in view.badges.iter() {
            append_chip(document, &self.meta, "modal-badge", badge)?;
        }

        self.tags.set_text_content(None);
        for tag in view.tags.iter() {
            append_chip(document, &self.tags, "modal-tag", tag)?;
        }

        self.links.set_text_content(None);
        for (kind, url) in view.links.iter() {
            let link = document.create_element("a").map_err(js_error)?;
            link.set_attribute("href", url).map_err(js_error)?;
            link.set_attribute("target", "_blank").map_err(js_error)?;
            link.set_attribute("rel", "noopener noreferrer")
                .map_err(js_error)?;
            link.set_class_name("modal-link");
            link.set_text_content(Some(kind.label()));
            self.links.append_child(&link).map_err(js_error)?;
        }

        Ok(())
    }

    fn empty(&self) {
        for node in [&self.title, &self.meta, &self.description, &self.tags, &self.links] {
            node.set_text_content(None);
        }
        if let Some(image) = &self.image {
            let _ = image.remove_attribute("src");
        }
    }

    /// Tells the stylesheet where the originating card is, so the overlay can grow out of it.
    fn set_origin(&self, card: &Element) -> Result<()> {
        let rect = card.get_bounding_client_rect();
        let style = self.root.style();
        for (name, value) in [
            ("--origin-x", rect.left()),
            ("--origin-y", rect.top()),
            ("--origin-w", rect.width()),
            ("--origin-h", rect.height()),
        ] {
            style
                .set_property(name, &format!("{}px", value))
                .map_err(js_error)?;
        }
        Ok(())
    }
}

fn append_chip(document: &Document, parent: &HtmlElement, class: &str, text: &str) -> Result<()> {
    let chip = document.create_element("span").map_err(js_error)?;
    chip.set_class_name(class);
    chip.set_text_content(Some(text));
    parent.append_child(&chip).map_err(js_error)?;
    Ok(())
}

struct ModalController {
    document: Document,
    catalog: Catalog,
    modal: RefCell<Modal>,
    parts: Parts,
    fade_out_ms: u32,
    /// The backdrop, button and key listeners, and the pending fade-out.
    subs: RefCell<Subscriptions>,
}

impl ModalController {
    fn open(self: &Rc<Self>, id: &str, card: Option<Element>) -> Result<bool> {
        let Some(project) = self.catalog.project(id) else {
            log::warn!("no project with id `{}`", id);
            return Ok(false);
        };

        let transition = self.modal.borrow_mut().open(id);
        match transition {
            Transition::None => return Ok(true),
            Transition::Morph { .. } => {
                // Reopening mid-fade: the pending removal must not wipe the new content.
                self.subs.borrow_mut().clear_scheduled();
                if let Some(card) = card {
                    self.parts.set_origin(&card)?;
                }
            }
            Transition::Replace { .. } | Transition::Dismiss { .. } => {}
        }

        self.parts.fill(&self.document, &ModalView::from(project))?;
        let classes = self.parts.root.class_list();
        classes.remove_1(CLOSING_CLASS).map_err(js_error)?;
        classes.add_1(OPEN_CLASS).map_err(js_error)?;
        log::debug!("project overlay: {:?}", transition);
        Ok(true)
    }

    fn close(self: &Rc<Self>, reason: CloseReason) -> Result<()> {
        let transition = self.modal.borrow_mut().close(reason);
        self.dismiss(transition)
    }

    fn key(self: &Rc<Self>, key: &str) -> Result<()> {
        let transition = self.modal.borrow_mut().key(key);
        self.dismiss(transition)
    }

    fn dismiss(self: &Rc<Self>, transition: Transition) -> Result<()> {
        if let Transition::Dismiss { card, reason } = transition {
            let classes = self.parts.root.class_list();
            classes.remove_1(OPEN_CLASS).map_err(js_error)?;
            classes.add_1(CLOSING_CLASS).map_err(js_error)?;
            self.start_fade();
            log::debug!("project overlay for `{}` dismissed ({:?})", card, reason);
        }
        Ok(())
    }

    fn start_fade(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(self.fade_out_ms, move || {
            if let Some(controller) = weak.upgrade() {
                controller.subs.borrow_mut().clear_scheduled();
                if controller.modal.borrow_mut().finish_close() {
                    controller.parts.empty();
                    let _ = controller.parts.root.class_list().remove_1(CLOSING_CLASS);
                }
            }
        });
        self.subs.borrow_mut().schedule(timeout);
    }

    fn report(result: Result<()>) {
        if let Err(err) = result {
            log::warn!("project overlay: {}", err);
        }
    }
}

/// The project detail overlay.
#[wasm_bindgen]
pub struct ModalHandle {
    controller: Rc<ModalController>,
}

#[wasm_bindgen]
impl ModalHandle {
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: HtmlElement,
        backdrop: HtmlElement,
        close_button: HtmlElement,
        title: HtmlElement,
        meta: HtmlElement,
        image: Option<Element>,
        description: HtmlElement,
        tags: HtmlElement,
        links: HtmlElement,
        settings: Option<String>,
    ) -> Result<ModalHandle, JsValue> {
        let ModalSettings { fade_out_ms } = settings_from(settings)?.modal;
        let window = window()?;
        let document = window.document().ok_or(Error::MissingElement("document"))?;

        let controller = Rc::new(ModalController {
            document,
            catalog: Catalog::embedded()?,
            modal: RefCell::new(Modal::new()),
            parts: Parts {
                root,
                title,
                meta,
                image,
                description,
                tags,
                links,
            },
            fade_out_ms,
            subs: RefCell::new(Subscriptions::new()),
        });

        let weak = Rc::downgrade(&controller);
        let backdrop_click = EventListener::new(&backdrop, "click", move |event| {
            // Clicks inside the dialog bubble up through the backdrop; only close on the backdrop itself.
            if event.target() != event.current_target() {
                return;
            }
            if let Some(controller) = weak.upgrade() {
                ModalController::report(controller.close(CloseReason::Backdrop));
            }
        });

        let weak = Rc::downgrade(&controller);
        let button_click = EventListener::new(&close_button, "click", move |_| {
            if let Some(controller) = weak.upgrade() {
                ModalController::report(controller.close(CloseReason::Button));
            }
        });

        let weak = Rc::downgrade(&controller);
        let keydown = EventListener::new(&window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(controller) = weak.upgrade() {
                ModalController::report(controller.key(&event.key()));
            }
        });

        {
            let mut subs = controller.subs.borrow_mut();
            subs.push(backdrop_click);
            subs.push(button_click);
            subs.push(keydown);
        }

        Ok(ModalHandle { controller })
    }

    /// Opens the overlay for a project, or swaps its content if one is already open.
    /// `card` is the clicked card, which the overlay grows out of.
    pub fn open(&self, id: &str, card: Option<Element>) -> Result<bool, JsValue> {
        Ok(self.controller.open(id, card)?)
    }

    pub fn close(&self) -> Result<(), JsValue> {
        Ok(self.controller.close(CloseReason::Button)?)
    }

    /// The id of the project currently shown, if any.
    #[wasm_bindgen(getter, js_name = openId)]
    pub fn open_id(&self) -> Option<String> {
        self.controller.modal.borrow().open_id().map(str::to_owned)
    }

    pub fn unmount(&mut self) {
        self.controller.subs.borrow_mut().unmount();
    }
}

impl Drop for ModalHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

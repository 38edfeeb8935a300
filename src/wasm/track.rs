use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::request_animation_frame;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use web_sys::Window;

use crate::error::Result;
use crate::pin::Measurements;
use crate::pin::PageTimeline;
use crate::pin::PinState;
use crate::pin::PinnedTrack;
use crate::pin::Placement;
use crate::pin::TrackFrame;
use crate::pin::TriggerId;
use crate::settings::TrackSettings;

use super::js_error;
use super::scroll_y;
use super::settings_from;
use super::viewport;
use super::window;

const DISABLED_CLASS: &str = "is-stacked";

/// The elements of one pinned section.
struct Section {
    /// Stays in flow and is stretched to cover the pinned scroll distance.
    trigger: HtmlElement,
    /// Fixed to the viewport while pinned.
    panel: HtmlElement,
    /// The horizontally laid out cards.
    track: HtmlElement,
    /// Background keywords moving at their own rate.
    layer: Option<HtmlElement>,
}

impl Section {
    fn set(element: &HtmlElement, property: &str, value: &str) -> Result<()> {
        element
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn clear(element: &HtmlElement, property: &str) -> Result<()> {
        element
            .style()
            .remove_property(property)
            .map(|_| ())
            .map_err(js_error)
    }

    /// Puts every element back the way the page laid it out.
    fn reset(&self) -> Result<()> {
        Self::clear(&self.trigger, "height")?;
        for property in ["position", "top", "left", "width", "transform"] {
            Self::clear(&self.panel, property)?;
        }
        Self::clear(&self.track, "transform")?;
        if let Some(layer) = &self.layer {
            Self::clear(layer, "transform")?;
        }
        Ok(())
    }

    fn measure(&self, window: &Window) -> Measurements {
        let (viewport_width, viewport_height) = viewport(window);
        Measurements {
            trigger_top: self.trigger.get_bounding_client_rect().top() + scroll_y(window),
            track_scroll_width: self.track.scroll_width() as f64,
            viewport_width,
            viewport_height,
            layer_height: self
                .layer
                .as_ref()
                .map_or(0.0, |layer| layer.offset_height() as f64),
        }
    }

    fn arm(&self, track: &mut PinnedTrack, window: &Window) -> Result<()> {
        // Measure with nothing pinned or stretched, otherwise we'd be measuring ourselves.
        self.reset()?;
        let measurements = self.measure(window);
        let state = track.invalidate(measurements);

        let classes = self.trigger.class_list();
        if state == PinState::Disabled {
            classes.add_1(DISABLED_CLASS).map_err(js_error)?;
            return Ok(());
        }
        classes.remove_1(DISABLED_CLASS).map_err(js_error)?;

        let height = measurements.viewport_height + track.spacer();
        Self::set(&self.trigger, "height", &format!("{}px", height))?;
        log::debug!(
            "pinned track armed: {}px of horizontal travel",
            track.spacer()
        );
        Ok(())
    }

    fn apply(&self, frame: &TrackFrame) -> Result<()> {
        match frame.state {
            PinState::Unarmed | PinState::Disabled => return Ok(()),
            PinState::Armed | PinState::PinnedActive | PinState::Released => {}
        }

        match frame.placement {
            Placement::Static => {
                for property in ["position", "top", "left", "width", "transform"] {
                    Self::clear(&self.panel, property)?;
                }
            }
            Placement::Fixed => {
                Self::set(&self.panel, "position", "fixed")?;
                Self::set(&self.panel, "top", "0")?;
                Self::set(&self.panel, "left", "0")?;
                Self::set(&self.panel, "width", "100%")?;
                Self::clear(&self.panel, "transform")?;
            }
            Placement::Shifted(distance) => {
                Self::set(&self.panel, "position", "relative")?;
                Self::clear(&self.panel, "top")?;
                Self::clear(&self.panel, "left")?;
                Self::clear(&self.panel, "width")?;
                Self::set(
                    &self.panel,
                    "transform",
                    &format!("translate3d(0, {}px, 0)", distance),
                )?;
            }
        }

        Self::set(
            &self.track,
            "transform",
            &format!("translate3d({:.2}px, 0, 0)", frame.track_offset),
        )?;
        if let Some(layer) = &self.layer {
            Self::set(
                layer,
                "transform",
                &format!("translate3d(0, {:.2}px, 0)", frame.layer_offset),
            )?;
        }
        Ok(())
    }
}

/// Every pinned section on the page, driven by one resize listener and one frame loop.
struct Timeline {
    window: Window,
    inner: RefCell<PageTimeline>,
    sections: RefCell<Vec<(TriggerId, Section)>>,
    last_frame: Cell<Option<f64>>,
}

thread_local! {
    static TIMELINE: RefCell<Option<Rc<Timeline>>> = RefCell::new(None);
}

impl Timeline {
    /// The page's timeline, started on first use.
    fn shared() -> Result<Rc<Timeline>> {
        if let Some(timeline) = TIMELINE.with(|t| t.borrow().clone()) {
            return Ok(timeline);
        }

        let window = window()?;
        let timeline = Rc::new(Timeline {
            window: window.clone(),
            inner: RefCell::new(PageTimeline::new()),
            sections: RefCell::new(Vec::new()),
            last_frame: Cell::new(None),
        });

        let weak = Rc::downgrade(&timeline);
        let resize = EventListener::new(&window, "resize", move |_| {
            if let Some(timeline) = weak.upgrade() {
                timeline.invalidate_all();
            }
        });
        timeline.inner.borrow_mut().listen(resize);

        TIMELINE.with(|t| *t.borrow_mut() = Some(timeline.clone()));
        Ok(timeline)
    }

    fn bind(self: &Rc<Self>, section: Section, settings: TrackSettings) -> Result<TriggerId> {
        // A trigger only ever has one binding: tear down whatever was driving it before.
        let existing = self
            .sections
            .borrow()
            .iter()
            .find(|(_, s)| s.trigger == section.trigger)
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            log::debug!("rebinding pinned track {:?}", id);
            self.unbind(id)?;
        }

        let id = self.inner.borrow_mut().next_id();
        let mut track = PinnedTrack::new(settings);
        section.arm(&mut track, &self.window)?;
        self.inner.borrow_mut().bind(id, track);
        self.sections.borrow_mut().push((id, section));

        self.schedule();
        Ok(id)
    }

    fn unbind(&self, id: TriggerId) -> Result<bool> {
        let removed = self.inner.borrow_mut().unbind(id).is_some();

        let section = {
            let mut sections = self.sections.borrow_mut();
            let index = sections.iter().position(|(i, _)| *i == id);
            index.map(|index| sections.remove(index).1)
        };
        if let Some(section) = section {
            section.reset()?;
            let _ = section.trigger.class_list().remove_1(DISABLED_CLASS);
        }

        Ok(removed)
    }

    /// Once nothing is bound: stops the loop, drops the resize listener and lets the next
    /// binding start a fresh timeline.
    fn retire_if_idle(&self) {
        if !self.inner.borrow_mut().retire_if_idle() {
            return;
        }
        self.last_frame.set(None);
        TIMELINE.with(|t| {
            let mut current = t.borrow_mut();
            if current.as_ref().map_or(false, |c| std::ptr::eq(Rc::as_ptr(c), self)) {
                current.take();
            }
        });
    }

    fn invalidate_all(&self) {
        let sections = self.sections.borrow();
        let mut inner = self.inner.borrow_mut();
        for (id, section) in sections.iter() {
            if let Some(track) = inner.bindings_mut().get_mut(*id) {
                if let Err(err) = section.arm(track, &self.window) {
                    log::warn!("couldn't re-measure pinned track {:?}: {}", id, err);
                }
            }
        }
    }

    fn state(&self, id: TriggerId) -> Option<PinState> {
        self.inner.borrow().bindings().get(id).map(|t| t.state())
    }

    fn schedule(self: &Rc<Self>) {
        if !self.inner.borrow().wants_frame() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            if let Some(timeline) = weak.upgrade() {
                timeline.inner.borrow_mut().frame_fired();
                timeline.tick(timestamp);
            }
        });
        self.inner.borrow_mut().schedule(handle);
    }

    fn tick(self: &Rc<Self>, timestamp: f64) {
        let dt = match self.last_frame.replace(Some(timestamp)) {
            // Cap the step so coming back to a background tab doesn't teleport the track.
            Some(previous) => ((timestamp - previous) / 1000.0).clamp(0.0, 0.1),
            None => 0.0,
        };

        let frames = self.inner.borrow_mut().update(scroll_y(&self.window), dt);
        {
            let sections = self.sections.borrow();
            for (id, frame) in frames.iter() {
                let Some((_, section)) = sections.iter().find(|(i, _)| i == id) else {
                    continue;
                };
                if let Err(err) = section.apply(frame) {
                    log::warn!("couldn't position pinned track {:?}: {}", id, err);
                }
            }
        }

        self.schedule();
    }
}

/// A section that pins while the page scrolls through it and pans its cards sideways.
#[wasm_bindgen]
pub struct TrackHandle {
    timeline: Option<Rc<Timeline>>,
    id: Option<TriggerId>,
}

#[wasm_bindgen]
impl TrackHandle {
    /// Missing elements leave the section static rather than failing.
    #[wasm_bindgen(constructor)]
    pub fn new(
        trigger: Option<HtmlElement>,
        panel: Option<HtmlElement>,
        track: Option<HtmlElement>,
        layer: Option<HtmlElement>,
        settings: Option<String>,
    ) -> Result<TrackHandle, JsValue> {
        let settings = settings_from(settings)?;

        let (Some(trigger), Some(panel), Some(track)) = (trigger, panel, track) else {
            log::debug!("pinned track skipped: trigger, panel or track element missing");
            return Ok(TrackHandle {
                timeline: None,
                id: None,
            });
        };

        let timeline = Timeline::shared()?;
        let section = Section {
            trigger,
            panel,
            track,
            layer,
        };
        let id = match timeline.bind(section, settings.track) {
            Ok(id) => id,
            Err(err) => {
                // Don't leave a freshly started timeline behind with nothing bound to it.
                timeline.retire_if_idle();
                return Err(err.into());
            }
        };

        Ok(TrackHandle {
            timeline: Some(timeline),
            id: Some(id),
        })
    }

    /// Re-measures the section, for layout changes the resize listener can't see.
    pub fn refresh(&self) {
        if let Some(timeline) = &self.timeline {
            timeline.invalidate_all();
        }
    }

    /// One of `unarmed`, `disabled`, `armed`, `pinned` or `released`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        let state = match (&self.timeline, self.id) {
            (Some(timeline), Some(id)) => timeline.state(id).unwrap_or(PinState::Unarmed),
            _ => PinState::Unarmed,
        };
        match state {
            PinState::Unarmed => "unarmed",
            PinState::Disabled => "disabled",
            PinState::Armed => "armed",
            PinState::PinnedActive => "pinned",
            PinState::Released => "released",
        }
        .to_owned()
    }

    /// Removes the binding and restores the section's normal layout.
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        if let (Some(timeline), Some(id)) = (self.timeline.take(), self.id.take()) {
            if timeline.unbind(id)? {
                log::debug!("pinned track {:?} unbound", id);
            }
            timeline.retire_if_idle();
        }
        Ok(())
    }
}

impl Drop for TrackHandle {
    fn drop(&mut self) {
        if let Err(err) = self.unmount() {
            log::warn!("pinned track teardown failed: {:?}", err);
        }
    }
}

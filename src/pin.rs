//! Scroll-range bindings: turning a stretch of vertical scrolling into a 0..1 progress value,
//! and the pinned horizontal track built on top of one.
//!
//! A [`PinnedTrack`] holds a section in place while the page scrolls through its range, and
//! slides the card track inside it from `0` to `-total_distance`. A keyword layer behind it
//! uses the same progress with its own [`Tween`], which is what gives the parallax.

use crate::lifecycle::Subscriptions;
use crate::settings::TrackSettings;

/// The part of the page's scroll range a binding responds to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRange {
    pub start: f64,
    pub end: f64,
}

impl ProgressRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    /// How far through the range `scroll` is, clamped to `[0, 1]`.
    pub fn progress(&self, scroll: f64) -> f64 {
        if self.is_empty() {
            // Nothing to interpolate over; jump straight from one end to the other.
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / self.len()).clamp(0.0, 1.0)
    }

    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll <= self.end
    }
}

/// A linear mapping from progress to some visual quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
}

impl Tween {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    pub fn at(&self, progress: f64) -> f64 {
        self.from + (self.to - self.from) * progress
    }
}

/// How the displayed progress follows the scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scrub {
    /// Progress tracks the scroll position exactly.
    Exact,
    /// Progress eases toward the scroll position, taking roughly this many seconds to catch up.
    Lag(f64),
}

impl Scrub {
    pub fn from_seconds(seconds: f32) -> Self {
        if seconds > 0.0 {
            Scrub::Lag(seconds as f64)
        } else {
            Scrub::Exact
        }
    }

    /// Moves `current` toward `target` over `dt` seconds.
    pub fn approach(self, current: f64, target: f64, dt: f64) -> f64 {
        match self {
            Scrub::Exact => target,
            Scrub::Lag(lag) => {
                let next = current + (target - current) * (1.0 - (-dt.max(0.0) / lag).exp());
                if (target - next).abs() < 1e-4 {
                    target
                } else {
                    next
                }
            }
        }
    }
}

/// Layout values read from the page when a track is armed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    /// Document-relative offset of the pinned section's top edge.
    pub trigger_top: f64,
    /// Full scrollable width of the card track.
    pub track_scroll_width: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Height of the background keyword layer.
    pub layer_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// Mounted but not yet measured.
    Unarmed,
    /// The viewport is too narrow; the section renders as a plain vertical list.
    Disabled,
    /// Measured and bound, but hasn't seen a scroll position yet.
    Armed,
    /// The scroll position is inside the bound range; the section is fixed in the viewport.
    PinnedActive,
    /// The scroll position is before or after the range; offsets rest at their boundary values.
    Released,
}

/// Where the pinned section sits relative to normal document flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Static,
    Fixed,
    /// Back in flow, pushed down by the pinned distance so it lines up with where it let go.
    Shifted(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFrame {
    pub state: PinState,
    pub placement: Placement,
    /// Horizontal translation of the card track.
    pub track_offset: f64,
    /// Vertical translation of the keyword layer.
    pub layer_offset: f64,
    pub progress: f64,
}

impl TrackFrame {
    fn at_rest(state: PinState) -> Self {
        Self {
            state,
            placement: Placement::Static,
            track_offset: 0.0,
            layer_offset: 0.0,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Binding {
    range: ProgressRange,
    track: Tween,
    layer: Tween,
    total_distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinnedTrack {
    settings: TrackSettings,
    scrub: Scrub,
    state: PinState,
    binding: Option<Binding>,
    /// The progress currently on screen, which lags the target when scrubbing.
    shown: Option<f64>,
}

impl PinnedTrack {
    pub fn new(settings: TrackSettings) -> Self {
        Self {
            settings,
            scrub: Scrub::from_seconds(settings.scrub),
            state: PinState::Unarmed,
            binding: None,
            shown: None,
        }
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Horizontal distance the track travels while pinned.
    pub fn total_distance(&self) -> Option<f64> {
        self.binding.map(|b| b.total_distance)
    }

    pub fn range(&self) -> Option<ProgressRange> {
        self.binding.map(|b| b.range)
    }

    /// Extra scroll length the page needs so the whole range can be scrolled through.
    pub fn spacer(&self) -> f64 {
        self.total_distance().unwrap_or(0.0)
    }

    pub fn arm(&mut self, m: Measurements) -> PinState {
        if m.viewport_width < self.settings.min_viewport_width as f64 {
            self.binding = None;
            self.state = PinState::Disabled;
            return self.state;
        }

        let total_distance =
            (m.track_scroll_width - m.viewport_width + self.settings.padding as f64).max(0.0);

        self.binding = Some(Binding {
            range: ProgressRange::new(m.trigger_top, m.trigger_top + total_distance),
            track: Tween::new(0.0, -total_distance),
            layer: Tween::new(0.0, -(self.settings.layer_travel as f64) * m.layer_height),
            total_distance,
        });
        self.state = PinState::Armed;
        self.state
    }

    /// Throws away the current binding and arms again from fresh measurements.
    pub fn invalidate(&mut self, m: Measurements) -> PinState {
        self.disarm();
        self.arm(m)
    }

    pub fn disarm(&mut self) {
        self.binding = None;
        self.shown = None;
        self.state = PinState::Unarmed;
    }

    /// Feeds a scroll position in; `dt` is the time since the last update, in seconds.
    pub fn update(&mut self, scroll: f64, dt: f64) -> TrackFrame {
        let Some(binding) = self.binding else {
            return TrackFrame::at_rest(self.state);
        };

        let target = binding.range.progress(scroll);
        let shown = self
            .scrub
            .approach(self.shown.unwrap_or(target), target, dt);
        self.shown = Some(shown);

        let (state, placement) = if scroll < binding.range.start {
            (PinState::Released, Placement::Static)
        } else if scroll > binding.range.end {
            (
                PinState::Released,
                Placement::Shifted(binding.total_distance),
            )
        } else {
            (PinState::PinnedActive, Placement::Fixed)
        };
        self.state = state;

        TrackFrame {
            state,
            placement,
            track_offset: binding.track.at(shown),
            layer_offset: binding.layer.at(shown),
            progress: shown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub u32);

/// Every live binding on the page, at most one per trigger.
#[derive(Debug, Default)]
pub struct ScrollTimeline {
    bindings: Vec<(TriggerId, PinnedTrack)>,
}

impl ScrollTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `track` to `id`. A binding already on that trigger is torn down and returned.
    pub fn bind(&mut self, id: TriggerId, track: PinnedTrack) -> Option<PinnedTrack> {
        let old = self.unbind(id);
        self.bindings.push((id, track));
        old
    }

    pub fn unbind(&mut self, id: TriggerId) -> Option<PinnedTrack> {
        let index = self.bindings.iter().position(|(i, _)| *i == id)?;
        let (_, mut track) = self.bindings.remove(index);
        track.disarm();
        Some(track)
    }

    pub fn get(&self, id: TriggerId) -> Option<&PinnedTrack> {
        self.bindings.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, id: TriggerId) -> Option<&mut PinnedTrack> {
        self.bindings
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.bindings.iter().map(|(id, _)| *id)
    }

    pub fn update(&mut self, scroll: f64, dt: f64) -> Vec<(TriggerId, TrackFrame)> {
        self.bindings
            .iter_mut()
            .map(|(id, track)| (*id, track.update(scroll, dt)))
            .collect()
    }
}

/// The page-wide driver behind every pinned section: the bindings plus the listeners and the
/// frame that keep them moving.
///
/// Once the last binding is gone it retires, dropping all of those, and stays retired; the next
/// section to mount starts a fresh one.
#[derive(Debug, Default)]
pub struct PageTimeline {
    bindings: ScrollTimeline,
    subs: Subscriptions,
    next_id: u32,
}

impl PageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn bind(&mut self, id: TriggerId, track: PinnedTrack) -> Option<PinnedTrack> {
        self.bindings.bind(id, track)
    }

    pub fn unbind(&mut self, id: TriggerId) -> Option<PinnedTrack> {
        self.bindings.unbind(id)
    }

    pub fn bindings(&self) -> &ScrollTimeline {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ScrollTimeline {
        &mut self.bindings
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subs
    }

    pub fn listen<G: 'static>(&mut self, guard: G) {
        self.subs.push(guard);
    }

    /// Whether the loop should request another frame.
    pub fn wants_frame(&self) -> bool {
        self.subs.is_mounted() && !self.bindings.is_empty() && !self.subs.is_scheduled()
    }

    /// Keeps `frame` as the pending one, or drops it at once if no frame is wanted.
    pub fn schedule<G: 'static>(&mut self, frame: G) -> bool {
        if !self.wants_frame() {
            return false;
        }
        self.subs.schedule(frame)
    }

    pub fn frame_fired(&mut self) {
        self.subs.clear_scheduled();
    }

    pub fn update(&mut self, scroll: f64, dt: f64) -> Vec<(TriggerId, TrackFrame)> {
        if self.is_retired() {
            return Vec::new();
        }
        self.bindings.update(scroll, dt)
    }

    /// Retires the timeline if nothing is bound. Returns whether it is retired.
    pub fn retire_if_idle(&mut self) -> bool {
        if self.bindings.is_empty() {
            self.subs.unmount();
        }
        self.is_retired()
    }

    pub fn is_retired(&self) -> bool {
        !self.subs.is_mounted()
    }
}

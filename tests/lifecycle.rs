use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use scroll_aura::aura::Aura;
use scroll_aura::lifecycle::Subscriptions;
use scroll_aura::pin::Measurements;
use scroll_aura::pin::PageTimeline;
use scroll_aura::pin::PinnedTrack;
use scroll_aura::settings::AuraSettings;
use scroll_aura::settings::TrackSettings;

/// Stands in for a listener or frame handle: counts how often it's been cancelled.
struct Spy {
    name: &'static str,
    dropped: Rc<RefCell<Vec<&'static str>>>,
}

impl Drop for Spy {
    fn drop(&mut self) {
        self.dropped.borrow_mut().push(self.name);
    }
}

fn spy(name: &'static str, dropped: &Rc<RefCell<Vec<&'static str>>>) -> Spy {
    Spy {
        name,
        dropped: dropped.clone(),
    }
}

#[test]
fn unmount_cancels_everything_newest_first() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();
    subs.push(spy("scroll", &dropped));
    subs.push(spy("resize", &dropped));
    subs.push(spy("frame", &dropped));
    assert_eq!(subs.len(), 3);

    subs.unmount();

    assert!(subs.is_empty());
    assert!(!subs.is_mounted());
    assert_eq!(*dropped.borrow(), vec!["frame", "resize", "scroll"]);
}

#[test]
fn guards_pushed_after_unmount_are_cancelled_at_once() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();
    subs.unmount();

    subs.push(spy("late frame", &dropped));

    assert!(subs.is_empty());
    assert_eq!(*dropped.borrow(), vec!["late frame"]);
}

#[test]
fn dropping_subscriptions_unmounts() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    {
        let mut subs = Subscriptions::default();
        assert!(subs.is_mounted());
        subs.push(spy("keydown", &dropped));
    }
    assert_eq!(*dropped.borrow(), vec!["keydown"]);
}

#[test]
fn callbacks_see_nothing_once_unmounted() {
    // The pattern the browser glue uses: callbacks hold a weak reference to the
    // component, and the component is owned alongside its subscriptions.
    let ticks = Rc::new(Cell::new(0));
    let component = Rc::new(ticks.clone());
    let weak = Rc::downgrade(&component);
    let callback = move || {
        if let Some(ticks) = weak.upgrade() {
            ticks.set(ticks.get() + 1);
        }
    };

    let mut subs = Subscriptions::new();
    subs.push(component);
    callback();
    subs.unmount();
    callback();

    assert_eq!(ticks.get(), 1);
}

#[test]
fn unmount_cancels_the_queued_frame_first() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();
    subs.push(spy("scroll", &dropped));
    assert!(subs.schedule(spy("frame", &dropped)));
    assert!(subs.is_scheduled());

    subs.unmount();

    assert!(!subs.is_scheduled());
    assert_eq!(*dropped.borrow(), vec!["frame", "scroll"]);
}

#[test]
fn frame_queued_after_unmount_is_cancelled_at_once() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();
    subs.unmount();

    assert!(!subs.schedule(spy("late frame", &dropped)));

    assert!(!subs.is_scheduled());
    assert_eq!(*dropped.borrow(), vec!["late frame"]);
}

#[test]
fn scheduling_replaces_the_pending_frame() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();
    subs.schedule(spy("first", &dropped));
    subs.schedule(spy("second", &dropped));
    assert_eq!(*dropped.borrow(), vec!["first"]);

    subs.clear_scheduled();
    assert_eq!(*dropped.borrow(), vec!["first", "second"]);
    assert!(subs.is_mounted());
}

/// Stands in for the browser's animation frame queue: dropping a handle cancels its callback.
#[derive(Default)]
struct FrameQueue {
    pending: RefCell<Vec<(Rc<Cell<bool>>, Box<dyn FnOnce(f64)>)>>,
}

struct FrameHandle(Rc<Cell<bool>>);

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl FrameQueue {
    fn request(&self, callback: impl FnOnce(f64) + 'static) -> FrameHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.pending
            .borrow_mut()
            .push((cancelled.clone(), Box::new(callback)));
        FrameHandle(cancelled)
    }

    /// Runs every callback that is still live. Returns how many ran.
    fn run(&self, timestamp: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let mut ran = 0;
        for (cancelled, callback) in due {
            if !cancelled.get() {
                callback(timestamp);
                ran += 1;
            }
        }
        ran
    }
}

/// The aura's frame loop, wired the way the canvas view wires it.
struct AuraLoop {
    aura: RefCell<Aura>,
    ticks: Cell<usize>,
    subs: RefCell<Subscriptions>,
}

fn schedule(view: &Rc<AuraLoop>, queue: &Rc<FrameQueue>) {
    let weak = Rc::downgrade(view);
    let next = queue.clone();
    let handle = queue.request(move |timestamp| {
        if let Some(view) = weak.upgrade() {
            view.subs.borrow_mut().clear_scheduled();
            view.aura.borrow_mut().tick(timestamp);
            view.ticks.set(view.ticks.get() + 1);
            schedule(&view, &next);
        }
    });
    view.subs.borrow_mut().schedule(handle);
}

#[test]
fn aura_loop_stops_ticking_after_unmount() {
    let queue = Rc::new(FrameQueue::default());
    let mut rng = StdRng::seed_from_u64(5);
    let view = Rc::new(AuraLoop {
        aura: RefCell::new(Aura::new(AuraSettings::default(), 0.0, 800.0, &mut rng).unwrap()),
        ticks: Cell::new(0),
        subs: RefCell::new(Subscriptions::new()),
    });

    schedule(&view, &queue);
    assert_eq!(queue.run(16.0), 1);
    assert_eq!(queue.run(32.0), 1);
    assert_eq!(view.ticks.get(), 2);

    view.subs.borrow_mut().unmount();

    assert_eq!(queue.run(48.0), 0);
    assert_eq!(queue.run(64.0), 0);
    assert_eq!(view.ticks.get(), 2);
}

fn armed_track() -> PinnedTrack {
    let mut track = PinnedTrack::new(TrackSettings::default());
    track.arm(Measurements {
        trigger_top: 1000.0,
        track_scroll_width: 3000.0,
        viewport_width: 1000.0,
        viewport_height: 800.0,
        layer_height: 400.0,
    });
    track
}

#[test]
fn timeline_retires_once_the_last_track_unbinds() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut timeline = PageTimeline::new();
    let first = timeline.next_id();
    let second = timeline.next_id();
    assert_ne!(first, second);

    timeline.listen(spy("resize", &dropped));
    assert!(!timeline.wants_frame());
    timeline.bind(first, armed_track());
    timeline.bind(second, armed_track());
    assert!(timeline.wants_frame());
    assert!(timeline.schedule(spy("frame", &dropped)));
    assert!(!timeline.wants_frame());

    timeline.unbind(first);
    assert!(!timeline.retire_if_idle());
    assert!(dropped.borrow().is_empty());
    assert!(timeline.subscriptions().is_scheduled());

    timeline.unbind(second);
    assert!(timeline.retire_if_idle());
    assert_eq!(*dropped.borrow(), vec!["frame", "resize"]);
    assert!(timeline.subscriptions().is_empty());
    assert!(!timeline.subscriptions().is_scheduled());

    // Nothing restarts a retired timeline.
    assert!(!timeline.schedule(spy("late frame", &dropped)));
    assert_eq!(dropped.borrow().last(), Some(&"late frame"));
    assert!(timeline.update(1500.0, 0.0).is_empty());
}

#[test]
fn timeline_left_empty_by_a_failed_mount_retires() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut timeline = PageTimeline::new();
    timeline.listen(spy("resize", &dropped));

    assert!(timeline.retire_if_idle());
    assert!(timeline.is_retired());
    assert_eq!(*dropped.borrow(), vec!["resize"]);
}

#[test]
fn fired_frame_lets_the_timeline_request_another() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut timeline = PageTimeline::new();
    let id = timeline.next_id();
    timeline.bind(id, armed_track());
    timeline.schedule(spy("frame", &dropped));

    timeline.frame_fired();

    assert_eq!(*dropped.borrow(), vec!["frame"]);
    assert!(timeline.wants_frame());
    assert_eq!(timeline.update(1500.0, 0.0).len(), 1);
}

#[test]
fn timeline_without_tracks_refuses_frames() {
    let dropped = Rc::new(RefCell::new(Vec::new()));
    let mut timeline = PageTimeline::new();

    assert!(!timeline.schedule(spy("frame", &dropped)));
    assert_eq!(*dropped.borrow(), vec!["frame"]);
    assert!(!timeline.is_retired());
}

use std::any::Any;

/// Owns whatever keeps a mounted component alive: event listener guards, plus the one frame or
/// timer it has queued next. All of them cancel themselves when dropped, so unmounting is just
/// dropping them.
pub struct Subscriptions {
    guards: Vec<Box<dyn Any>>,
    scheduled: Option<Box<dyn Any>>,
    mounted: bool,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            scheduled: None,
            mounted: true,
        }
    }

    pub fn push<G: 'static>(&mut self, guard: G) {
        if self.mounted {
            self.guards.push(Box::new(guard));
        }
        // Otherwise `guard` is dropped here, cancelling it straight away.
    }

    /// Holds the next frame or timer, replacing (and so cancelling) any queued one.
    ///
    /// Returns false once unmounted: the handle is dropped on the spot, so a callback that was
    /// already running when the component went away can't start the loop again.
    pub fn schedule<G: 'static>(&mut self, next: G) -> bool {
        if !self.mounted {
            return false;
        }
        self.scheduled = Some(Box::new(next));
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Drops the queued handle. Called from the callback itself once it fires, or to cancel it.
    pub fn clear_scheduled(&mut self) {
        self.scheduled.take();
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Cancels the queued frame, then drops every guard, newest first. Anything pushed or
    /// scheduled afterwards is cancelled immediately.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.scheduled.take();
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("guards", &self.guards.len())
            .field("scheduled", &self.scheduled.is_some())
            .field("mounted", &self.mounted)
            .finish()
    }
}

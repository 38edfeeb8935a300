use crate::settings::CursorSettings;

/// The custom cursor: a dot pinned to the pointer and a ring that trails behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    settings: CursorSettings,
    pointer: Option<(f32, f32)>,
    ring: (f32, f32),
    hovering: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    pub visible: bool,
    pub dot: (f32, f32),
    pub ring: (f32, f32),
    pub ring_scale: f32,
}

impl Cursor {
    pub fn new(settings: CursorSettings) -> Self {
        Self {
            settings,
            pointer: None,
            ring: (0.0, 0.0),
            hovering: false,
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.pointer.is_none() {
            // Start the ring under the pointer instead of sweeping in from the corner.
            self.ring = (x, y);
        }
        self.pointer = Some((x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.hovering = false;
    }

    /// Whether the pointer is over something clickable.
    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn tick(&mut self) -> CursorFrame {
        let Some((x, y)) = self.pointer else {
            return CursorFrame {
                visible: false,
                dot: self.ring,
                ring: self.ring,
                ring_scale: 1.0,
            };
        };

        let ease = self.settings.ease;
        self.ring.0 += (x - self.ring.0) * ease;
        self.ring.1 += (y - self.ring.1) * ease;

        CursorFrame {
            visible: true,
            dot: (x, y),
            ring: self.ring,
            ring_scale: if self.hovering {
                self.settings.hover_scale
            } else {
                1.0
            },
        }
    }
}

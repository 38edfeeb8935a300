//! The scroll velocity aura: two strips of particles on the left and right edges of the
//! viewport that drift with the page while it scrolls and glow brighter the faster it goes.
//!
//! Nothing in here touches the DOM. Each tick produces a [`Frame`] per strip, which is a plain
//! list of shapes for the canvas glue to paint.

use palette::FromColor;
use palette::Hsv;
use palette::Srgb;
use rand::Rng;

use crate::error::Result;
use crate::particle::wrap;
use crate::particle::Particle;
use crate::settings::AuraSettings;
use crate::velocity::ScrollVelocity;

/// Fraction of full glow strength a plain dot keeps when the page is still.
const RESTING_GLOW: f32 = 0.6;
/// Halos are this much fainter than the dot they surround.
const HALO_FADE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A horizontal gradient filling the strip, `alpha` at `opaque_x` fading to nothing at
    /// `clear_x`.
    Wash {
        opaque_x: f32,
        clear_x: f32,
        alpha: f32,
    },
    Dot {
        x: f32,
        y: f32,
        radius: f32,
        alpha: f32,
    },
    /// A larger, fainter circle drawn behind a dot while scrolling fast.
    Halo {
        x: f32,
        y: f32,
        radius: f32,
        alpha: f32,
    },
}

/// Everything to paint on one strip's canvas for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub side: Side,
    pub width: f32,
    pub height: f32,
    pub color: Srgb<u8>,
    pub shapes: Vec<Shape>,
}

impl Frame {
    pub fn dots(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Dot { .. }))
    }

    pub fn halos(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Halo { .. }))
    }

    pub fn wash(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| matches!(s, Shape::Wash { .. }))
    }
}

pub struct Strip {
    pub side: Side,
    pub particles: Vec<Particle>,
    pub height: f32,
    settings: AuraSettings,
    color: Srgb<u8>,
}

impl Strip {
    /// Fails if `settings` don't validate, since particles are sampled from their ranges.
    pub fn new<R: Rng>(
        side: Side,
        settings: AuraSettings,
        height: f32,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        let hsv: Hsv = Hsv::new(settings.hue, settings.saturation, settings.value);
        let color = Srgb::from_color(hsv).into_format();

        Ok(Self {
            side,
            particles: (0..settings.particles)
                .map(|_| Particle::generate(&settings, height, rng))
                .collect(),
            height,
            settings,
            color,
        })
    }

    pub fn width(&self) -> f32 {
        self.settings.canvas_width
    }

    /// How strongly the strip glows at this velocity, from 0 to 1.
    pub fn strength(&self, velocity: f64) -> f32 {
        (velocity.abs() as f32 / self.settings.velocity_ceiling).clamp(0.0, 1.0)
    }

    pub fn step(&mut self, velocity: f64) {
        let rise = velocity as f32 * self.settings.velocity_scale;
        for p in self.particles.iter_mut() {
            p.advance(rise, self.settings.lane_width, self.height);
        }
    }

    pub fn resize(&mut self, height: f32) {
        self.height = height;
        for p in self.particles.iter_mut() {
            p.y = wrap(p.y, height);
        }
    }

    pub fn frame(&self, velocity: f64) -> Frame {
        let strength = self.strength(velocity);
        let glow = RESTING_GLOW + (1.0 - RESTING_GLOW) * strength;
        let mut shapes = Vec::with_capacity(self.particles.len() * 2 + 1);

        if velocity.abs() as f32 > self.settings.wash_threshold {
            let width = self.width();
            let (opaque_x, clear_x) = match self.side {
                Side::Left => (0.0, width),
                Side::Right => (width, 0.0),
            };
            shapes.push(Shape::Wash {
                opaque_x,
                clear_x,
                alpha: self.settings.wash_opacity * strength,
            });
        }

        for p in self.particles.iter() {
            let alpha = p.opacity * glow;
            if strength > self.settings.halo_threshold {
                shapes.push(Shape::Halo {
                    x: p.x,
                    y: p.y,
                    radius: p.radius * self.settings.halo_scale,
                    alpha: alpha * HALO_FADE,
                });
            }
            shapes.push(Shape::Dot {
                x: p.x,
                y: p.y,
                radius: p.radius,
                alpha,
            });
        }

        Frame {
            side: self.side,
            width: self.width(),
            height: self.height,
            color: self.color,
            shapes,
        }
    }
}

/// Both strips plus the scroll velocity driving them.
pub struct Aura {
    pub velocity: ScrollVelocity,
    pub left: Strip,
    pub right: Strip,
}

impl Aura {
    pub fn new<R: Rng>(
        settings: AuraSettings,
        scroll_offset: f64,
        height: f32,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            velocity: ScrollVelocity::new(scroll_offset, settings.quiet_period_ms),
            left: Strip::new(Side::Left, settings, height, rng)?,
            right: Strip::new(Side::Right, settings, height, rng)?,
        })
    }

    pub fn on_scroll(&mut self, offset: f64, now: f64) {
        self.velocity.on_scroll(offset, now);
    }

    /// Advances one display frame and returns what to draw on the left and right strips.
    pub fn tick(&mut self, now: f64) -> [Frame; 2] {
        self.velocity.poll(now);
        let velocity = self.velocity.velocity();

        self.left.step(velocity);
        self.right.step(velocity);

        [self.left.frame(velocity), self.right.frame(velocity)]
    }

    pub fn resize(&mut self, height: f32) {
        self.left.resize(height);
        self.right.resize(height);
    }

    pub fn strip(&self, side: Side) -> &Strip {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

use rand::Rng;
use rand_distr::Distribution;
use rand_distr::Uniform;

use crate::settings::AuraSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Multiplier on the scroll velocity.
    pub speed: f32,
    pub opacity: f32,
    /// Horizontal movement per frame, independent of scrolling.
    pub drift: f32,
}

impl Particle {
    /// `settings` must have passed [`AuraSettings::validate`]; sampling panics on empty ranges.
    pub fn generate<R: Rng>(settings: &AuraSettings, height: f32, rng: &mut R) -> Self {
        let x_dist = Uniform::new(0.0, settings.lane_width);
        let y = if height > 0.0 {
            Uniform::new(0.0, height).sample(rng)
        } else {
            0.0
        };

        Self {
            x: x_dist.sample(rng),
            y,
            radius: settings.radius.distr().sample(rng),
            speed: settings.speed.distr().sample(rng),
            opacity: settings.opacity.distr().sample(rng),
            drift: settings.drift.distr().sample(rng),
        }
    }

    /// Moves the particle one frame, then wraps it back into `width` x `height`.
    pub fn advance(&mut self, rise: f32, width: f32, height: f32) {
        self.y -= rise * self.speed;
        self.x += self.drift;

        self.x = wrap(self.x, width);
        self.y = wrap(self.y, height);
    }
}

/// Toroidal wrap into `[0, extent]`.
///
/// A value that leaves through one edge comes back through the other, however far past it went.
/// Float rounding can land a tiny negative value exactly on `extent`, which is fine for drawing.
pub fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    if (0.0..extent).contains(&value) {
        value
    } else {
        value.rem_euclid(extent)
    }
}

use rand_distr::Uniform;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// An inclusive range a per-particle property is sampled from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Only call this on a validated span; `Uniform` panics if `min > max`.
    pub fn distr(self) -> Uniform<f32> {
        Uniform::new_inclusive(self.min, self.max)
    }

    fn check(self, name: &'static str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::invalid(name, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(Error::invalid(
                name,
                format!("min {} is greater than max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraSettings {
    /// Pool size of each strip.
    pub particles: usize,
    pub canvas_width: f32,
    /// Width of the band particles wrap around in, measured from the canvas' left edge.
    pub lane_width: f32,

    pub radius: Span,
    pub speed: Span,
    pub opacity: Span,
    pub drift: Span,

    /// Pixels of vertical travel per pixel of scroll velocity, before the particle's own speed.
    pub velocity_scale: f32,
    /// The absolute velocity at which the glow is at full strength.
    pub velocity_ceiling: f32,
    /// Glow strength above which a halo is drawn around each particle.
    pub halo_threshold: f32,
    pub halo_scale: f32,
    /// Absolute velocity above which the edge wash is painted.
    pub wash_threshold: f32,
    pub wash_opacity: f32,
    pub quiet_period_ms: f64,

    /// Particle colour, as HSV.
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Default for AuraSettings {
    fn default() -> Self {
        Self {
            particles: crate::PARTICLES_PER_SIDE,
            canvas_width: 60.0,
            lane_width: 50.0,

            radius: Span::new(0.5, 2.0),
            speed: Span::new(0.3, 1.0),
            opacity: Span::new(0.2, 0.7),
            drift: Span::new(-0.15, 0.15),

            velocity_scale: 0.3,
            velocity_ceiling: 50.0,
            halo_threshold: 0.2,
            halo_scale: 3.0,
            wash_threshold: 2.0,
            wash_opacity: 0.15,
            quiet_period_ms: 150.0,

            hue: 190.0,
            saturation: 0.55,
            value: 1.0,
        }
    }
}

impl AuraSettings {
    /// Checks everything particle generation relies on; `Strip::new` refuses settings that fail.
    pub fn validate(&self) -> Result<()> {
        self.radius.check("aura.radius")?;
        self.speed.check("aura.speed")?;
        self.opacity.check("aura.opacity")?;
        self.drift.check("aura.drift")?;

        if self.canvas_width <= 0.0 {
            return Err(Error::invalid("aura.canvas_width", "must be positive"));
        }
        if !(self.lane_width > 0.0 && self.lane_width <= self.canvas_width) {
            return Err(Error::invalid(
                "aura.lane_width",
                format!("must be within (0, {}]", self.canvas_width),
            ));
        }
        if self.velocity_ceiling <= 0.0 {
            return Err(Error::invalid("aura.velocity_ceiling", "must be positive"));
        }
        if self.quiet_period_ms < 0.0 {
            return Err(Error::invalid("aura.quiet_period_ms", "must not be negative"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Extra horizontal travel added past the end of the track.
    pub padding: f32,
    /// Below this viewport width the track is laid out as a plain vertical list.
    pub min_viewport_width: f32,
    /// Seconds the track takes to catch up with the scroll position. `0` maps scroll 1:1.
    pub scrub: f32,
    /// Fraction of its own height the keyword layer travels over the pinned range.
    pub layer_travel: f32,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            padding: 200.0,
            min_viewport_width: 768.0,
            scrub: 1.0,
            layer_travel: 0.75,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorSettings {
    /// Fraction of the remaining distance the ring covers each frame.
    pub ease: f32,
    pub hover_scale: f32,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            ease: 0.15,
            hover_scale: 1.8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalSettings {
    pub fade_out_ms: u32,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self { fade_out_ms: 300 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub aura: AuraSettings,
    pub track: TrackSettings,
    pub cursor: CursorSettings,
    pub modal: ModalSettings,
}

impl Settings {
    /// Barely-there particles, for pages with busy backgrounds.
    pub fn subtle() -> Settings {
        Settings {
            aura: AuraSettings {
                particles: 12,
                opacity: Span::new(0.1, 0.4),
                halo_threshold: 0.5,
                wash_opacity: 0.08,
                ..AuraSettings::default()
            },
            track: TrackSettings {
                scrub: 0.5,
                ..TrackSettings::default()
            },
            ..Settings::default()
        }
    }

    pub fn vivid() -> Settings {
        Settings {
            aura: AuraSettings {
                particles: 30,
                radius: Span::new(1.0, 2.5),
                opacity: Span::new(0.4, 0.9),
                velocity_scale: 0.5,
                velocity_ceiling: 35.0,
                halo_threshold: 0.1,
                wash_opacity: 0.25,
                hue: 280.0,
                saturation: 0.7,
                ..AuraSettings::default()
            },
            cursor: CursorSettings {
                ease: 0.25,
                hover_scale: 2.2,
            },
            ..Settings::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json).map_err(Error::Settings)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.aura.validate()?;
        if self.track.scrub < 0.0 {
            return Err(Error::invalid("track.scrub", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.cursor.ease) || self.cursor.ease == 0.0 {
            return Err(Error::invalid("cursor.ease", "must be within (0, 1]"));
        }

        Ok(())
    }
}

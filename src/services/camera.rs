//! Vykamera: panorering, zoom och animerad centrering

use std::time::{Duration, Instant};

/// Tillåtet zoomintervall
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 2.5;

/// Längd på centreringsanimationer
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);

/// Transform från trädkoordinater till ytkoordinater: `p * k + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

    pub fn new(x: f32, y: f32, k: f32) -> Self {
        Self { x, y, k }
    }

    /// Transform som lägger trädpunkten (px, py) mitt på en yta av given storlek
    pub fn centered_on(px: f32, py: f32, k: f32, width: f32, height: f32) -> Self {
        let k = k.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            x: width / 2.0 - px * k,
            y: height / 2.0 - py * k,
            k,
        }
    }

    pub fn apply(&self, px: f32, py: f32) -> (f32, f32) {
        (px * self.k + self.x, py * self.k + self.y)
    }

    pub fn invert(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            k: self.k + (other.k - self.k) * t,
        }
    }
}

fn ease_cubic_out(t: f32) -> f32 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: ViewTransform,
    to: ViewTransform,
    started: Instant,
    duration: Duration,
}

impl Animation {
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn sample(&self, now: Instant) -> ViewTransform {
        self.from.lerp(&self.to, ease_cubic_out(self.progress(now)))
    }
}

/// Kamera med högst en pågående animation. En ny animation ersätter den gamla
/// och startar från det som visas just nu.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    transform: ViewTransform,
    animation: Option<Animation>,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformen som visas just nu
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Slutmålet: pågående animations mål eller aktuell transform
    pub fn target(&self) -> ViewTransform {
        self.animation.map(|a| a.to).unwrap_or(self.transform)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Sätt transformen direkt och avbryt eventuell animation
    pub fn set(&mut self, transform: ViewTransform) {
        self.animation = None;
        self.transform = transform;
    }

    pub fn animate_to(&mut self, target: ViewTransform, now: Instant) {
        self.animate_to_with(target, now, ANIMATION_DURATION);
    }

    pub fn animate_to_with(&mut self, target: ViewTransform, now: Instant, duration: Duration) {
        let from = self.current(now);
        self.transform = from;
        self.animation = Some(Animation {
            from,
            to: target,
            started: now,
            duration,
        });
    }

    /// Byt slutmål utan att starta om tiden. Utan animation sätts målet direkt.
    pub fn retarget(&mut self, target: ViewTransform) {
        match self.animation.as_mut() {
            Some(animation) => animation.to = target,
            None => self.transform = target,
        }
    }

    fn current(&self, now: Instant) -> ViewTransform {
        match &self.animation {
            Some(animation) => animation.sample(now),
            None => self.transform,
        }
    }

    /// Stega animationen. Returnerar true så länge den pågår.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        self.transform = animation.sample(now);
        if animation.progress(now) >= 1.0 {
            self.transform = animation.to;
            self.animation = None;
            return false;
        }

        true
    }

    /// Panorera i ytkoordinater (avbryter animation)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.animation = None;
        self.transform.x += dx;
        self.transform.y += dy;
    }

    /// Zooma kring en punkt i ytkoordinater (avbryter animation)
    pub fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        self.animation = None;
        let (px, py) = self.transform.invert(sx, sy);
        let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.transform = ViewTransform {
            x: sx - px * k,
            y: sy - py * k,
            k,
        };
    }
}

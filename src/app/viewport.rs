use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;
pub const ZOOM_STEP: f32 = 1.3;
pub const AUTO_FIT_MARGIN: f32 = 100.0;
pub const AUTO_FIT_DELAY_SECS: f64 = 1.5;

const ZOOM_ANIMATION_SECS: f64 = 0.25;
const RESET_ANIMATION_SECS: f64 = 0.35;
const SCROLL_ZOOM_RATE: f32 = 0.0018;

/// World origin maps to `rect.center() + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.translate + world * self.scale
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.translate) / self.scale
    }

    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Self {
            scale: from.scale + (to.scale - from.scale) * t,
            translate: from.translate + (to.translate - from.translate) * t,
        }
    }
}

struct TransformAnimation {
    from: ViewTransform,
    to: ViewTransform,
    start: f64,
    duration: f64,
}

/// Pan/zoom state. Scale is clamped to [MIN_SCALE, MAX_SCALE] on every
/// update.
pub struct ViewportController {
    current: ViewTransform,
    animation: Option<TransformAnimation>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            current: ViewTransform::IDENTITY,
            animation: None,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.current
    }

    pub fn scale(&self) -> f32 {
        self.current.scale
    }

    /// Wheel zoom; the world point under the cursor stays under the cursor.
    pub fn on_scroll(&mut self, rect: Rect, pointer: Pos2, scroll: f32) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        self.animation = None;

        let world_before = self.current.screen_to_world(rect, pointer);
        let factor = (1.0 + (scroll * SCROLL_ZOOM_RATE)).clamp(0.85, 1.15);
        self.current.scale = (self.current.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.current.translate = pointer - rect.center() - (world_before * self.current.scale);
    }

    pub fn on_pan(&mut self, delta: Vec2) {
        self.animation = None;
        self.current.translate += delta;
    }

    pub fn zoom_in(&mut self, now: f64) {
        self.zoom_by(ZOOM_STEP, now);
    }

    pub fn zoom_out(&mut self, now: f64) {
        self.zoom_by(1.0 / ZOOM_STEP, now);
    }

    fn zoom_by(&mut self, factor: f32, now: f64) {
        let from = self.effective(now);
        let scale = (from.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (scale - from.scale).abs() <= f32::EPSILON {
            return;
        }

        // Keeps the world point at the viewport center fixed.
        let to = ViewTransform {
            scale,
            translate: from.translate * (scale / from.scale),
        };
        self.animate_to(from, to, now, ZOOM_ANIMATION_SECS);
    }

    pub fn reset(&mut self, now: f64) {
        let from = self.effective(now);
        self.animate_to(from, ViewTransform::IDENTITY, now, RESET_ANIMATION_SECS);
    }

    pub fn reset_immediate(&mut self) {
        self.animation = None;
        self.current = ViewTransform::IDENTITY;
    }

    /// Frame `bounds` with a fixed margin, never magnifying past 100%.
    /// Zero-area bounds are a no-op; returns whether a fit ran.
    pub fn auto_fit(&mut self, bounds: Rect, viewport: Vec2, now: f64) -> bool {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return false;
        }

        let scale = ((viewport.x - AUTO_FIT_MARGIN) / bounds.width())
            .min((viewport.y - AUTO_FIT_MARGIN) / bounds.height())
            .min(1.0)
            .clamp(MIN_SCALE, MAX_SCALE);
        let to = ViewTransform {
            scale,
            translate: -bounds.center().to_vec2() * scale,
        };

        let from = self.effective(now);
        self.animate_to(from, to, now, RESET_ANIMATION_SECS);
        true
    }

    /// Advance any running animation; true while one is in flight.
    pub fn animate(&mut self, now: f64) -> bool {
        let Some(animation) = &self.animation else {
            return false;
        };

        let t = (((now - animation.start) / animation.duration).clamp(0.0, 1.0)) as f32;
        if t >= 1.0 {
            // Land exactly on the target, not on the lerp's float residue.
            self.current = animation.to;
            self.animation = None;
        } else {
            let eased = t * t * (3.0 - 2.0 * t);
            self.current = ViewTransform::lerp(animation.from, animation.to, eased);
        }
        self.animation.is_some()
    }

    fn effective(&mut self, now: f64) -> ViewTransform {
        self.animate(now);
        self.current
    }

    fn animate_to(&mut self, from: ViewTransform, to: ViewTransform, now: f64, duration: f64) {
        self.animation = Some(TransformAnimation {
            from,
            to,
            start: now,
            duration,
        });
    }
}

//! Play area geometry
//!
//! The viewport minus UI-reserved margins. Target positions are centers in
//! viewport coordinates.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RoundError;

/// Margins reserved for HUD and buttons
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub fn uniform(margin: f32) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

/// Viewport size plus reserved margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayAreaBounds {
    pub width: f32,
    pub height: f32,
    pub insets: Insets,
}

impl PlayAreaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            insets: Insets::default(),
        }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Width left after horizontal insets (may be negative)
    pub fn usable_width(&self) -> f32 {
        self.width - self.insets.left - self.insets.right
    }

    /// Height left after vertical insets (may be negative)
    pub fn usable_height(&self) -> f32 {
        self.height - self.insets.top - self.insets.bottom
    }

    pub fn is_usable(&self) -> bool {
        let (w, h) = (self.usable_width(), self.usable_height());
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Rectangle target centers may occupy, keeping a full target on screen
    /// when there is room for it.
    pub fn placement_rect(&self, target_size: f32) -> Result<Rect, RoundError> {
        if !self.is_usable() {
            return Err(RoundError::InvalidBounds {
                width: self.usable_width(),
                height: self.usable_height(),
            });
        }

        let half = target_size.max(0.0) / 2.0;
        let min = Vec2::new(self.insets.left, self.insets.top);
        let max = min + Vec2::new(self.usable_width(), self.usable_height());

        // Shrink by half a target per side, collapsing to the midline on axes
        // too narrow to fit one.
        let mid = (min + max) / 2.0;
        let shrunk_min = min + Vec2::splat(half);
        let shrunk_max = max - Vec2::splat(half);
        let lo = Vec2::new(
            if shrunk_min.x <= shrunk_max.x { shrunk_min.x } else { mid.x },
            if shrunk_min.y <= shrunk_max.y { shrunk_min.y } else { mid.y },
        );
        let hi = Vec2::new(
            if shrunk_min.x <= shrunk_max.x { shrunk_max.x } else { mid.x },
            if shrunk_min.y <= shrunk_max.y { shrunk_max.y } else { mid.y },
        );

        Ok(Rect { min: lo, max: hi })
    }
}

/// Axis-aligned rectangle (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniform random point inside the rectangle
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let size = self.size();
        Vec2::new(
            self.min.x + size.x * rng.random::<f32>(),
            self.min.y + size.y * rng.random::<f32>(),
        )
    }
}

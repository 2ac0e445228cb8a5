//! Platform collision: static rectangles that bodies can land on.
//!
//! Only downward landings are resolved. Bodies pass through platforms from
//! below and from the sides; the single rule is that a falling body whose feet
//! cross a platform's top edge during a step comes to rest on that edge.
//! Horizontal motion is bounded by the world width instead of by geometry.
//!
//! Coordinates are screen-style: origin top-left, y grows downward.

use crate::config::{GameConfig, RectConfig};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    /// Strict overlap: rectangles that merely touch do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl From<RectConfig> for Aabb {
    fn from(rect: RectConfig) -> Self {
        Self::new(rect.x, rect.y, rect.w, rect.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub bounds: Aabb,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.bounds.y
    }

    fn spans(&self, left: f32, right: f32) -> bool {
        left < self.bounds.right() && right > self.bounds.x
    }
}

/// Where a falling body came to rest during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub platform_index: usize,
    pub top: f32,
}

/// The level's static geometry: platforms plus the horizontal world bound.
#[derive(Debug, Clone)]
pub struct PlatformLayout {
    pub world_width: f32,
    platforms: Vec<Platform>,
}

impl PlatformLayout {
    pub fn new(world_width: f32, platforms: Vec<Platform>) -> Self {
        Self {
            world_width,
            platforms,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let platforms = config
            .platforms
            .iter()
            .map(|&rect| Platform {
                bounds: Aabb::from(rect),
            })
            .collect();
        Self::new(config.world.width, platforms)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Find the platform a body lands on when moving from `prev` to `moved`
    /// with vertical velocity `vy`. The probe is the body's horizontal span
    /// shrunk by `foot_inset` on both sides. When several tops are crossed in
    /// one step the highest one wins, since the body would have hit it first.
    pub fn resolve_landing(
        &self,
        prev: Aabb,
        moved: Aabb,
        vy: f32,
        foot_inset: f32,
    ) -> Option<Landing> {
        if vy < 0.0 {
            return None;
        }
        let prev_bottom = prev.bottom();
        let new_bottom = moved.bottom();
        let foot_left = moved.x + foot_inset;
        let foot_right = (moved.right() - foot_inset).max(foot_left);

        let mut best: Option<Landing> = None;
        for (platform_index, platform) in self.platforms.iter().enumerate() {
            let top = platform.top();
            let crossed = prev_bottom <= top && new_bottom >= top;
            if !crossed || !platform.spans(foot_left, foot_right) {
                continue;
            }
            if best.map_or(true, |b| top < b.top) {
                best = Some(Landing {
                    platform_index,
                    top,
                });
            }
        }
        best
    }

    /// Keep a body of width `body_w` inside `[0, world_width]`.
    pub fn clamp_x(&self, x: f32, body_w: f32) -> f32 {
        let max_x = (self.world_width - body_w).max(0.0);
        x.clamp(0.0, max_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PlatformLayout {
        PlatformLayout::new(
            960.0,
            vec![
                Platform {
                    bounds: Aabb::new(0.0, 420.0, 960.0, 120.0),
                },
                Platform {
                    bounds: Aabb::new(180.0, 340.0, 160.0, 20.0),
                },
            ],
        )
    }

    #[test]
    fn overlap_is_strict() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let inside = Aabb::new(5.0, 5.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.5, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn falling_body_lands_on_crossed_top() {
        let layout = layout();
        let prev = Aabb::new(200.0, 300.0, 64.0, 36.0);
        let moved = Aabb::new(200.0, 310.0, 64.0, 36.0);
        let landing = layout
            .resolve_landing(prev, moved, 400.0, 0.0)
            .expect("bottom crossed 340");
        assert_eq!(landing.platform_index, 1);
        assert_eq!(landing.top, 340.0);
    }

    #[test]
    fn rising_body_passes_through() {
        let layout = layout();
        let prev = Aabb::new(200.0, 310.0, 64.0, 36.0);
        let moved = Aabb::new(200.0, 300.0, 64.0, 36.0);
        assert!(layout.resolve_landing(prev, moved, -400.0, 0.0).is_none());
    }

    #[test]
    fn body_outside_span_keeps_falling() {
        let layout = layout();
        let prev = Aabb::new(400.0, 300.0, 64.0, 36.0);
        let moved = Aabb::new(400.0, 310.0, 64.0, 36.0);
        assert!(layout.resolve_landing(prev, moved, 400.0, 0.0).is_none());
    }

    #[test]
    fn foot_inset_narrows_the_probe() {
        let layout = layout();
        // Body overhangs the platform's right edge by 20px.
        let prev = Aabb::new(320.0, 300.0, 64.0, 36.0);
        let moved = Aabb::new(320.0, 310.0, 64.0, 36.0);
        assert!(layout.resolve_landing(prev, moved, 400.0, 0.0).is_some());
        assert!(layout.resolve_landing(prev, moved, 400.0, 24.0).is_none());
    }

    #[test]
    fn highest_crossed_top_wins() {
        let layout = layout();
        // One huge step crossing both the ledge (340) and the ground (420).
        let prev = Aabb::new(200.0, 250.0, 64.0, 36.0);
        let moved = Aabb::new(200.0, 400.0, 64.0, 36.0);
        let landing = layout
            .resolve_landing(prev, moved, 2000.0, 0.0)
            .expect("crossed two tops");
        assert_eq!(landing.top, 340.0);
    }

    #[test]
    fn resting_body_stays_supported() {
        let layout = layout();
        let prev = Aabb::new(500.0, 384.0, 64.0, 36.0);
        let moved = Aabb::new(500.0, 384.5, 64.0, 36.0);
        let landing = layout
            .resolve_landing(prev, moved, 30.0, 0.0)
            .expect("ground supports resting body");
        assert_eq!(landing.platform_index, 0);
    }

    #[test]
    fn clamp_x_respects_world_bounds() {
        let layout = layout();
        assert_eq!(layout.clamp_x(-5.0, 64.0), 0.0);
        assert_eq!(layout.clamp_x(2000.0, 64.0), 896.0);
        assert_eq!(layout.clamp_x(100.0, 64.0), 100.0);
        assert_eq!(layout.clamp_x(100.0, 2000.0), 0.0);
    }
}

//! Render data handed to the host, and the sinks that consume it.
//!
//! The simulation produces one `SpriteDraw` per entity per frame and never
//! draws anything itself. Renderers must sample sheets without smoothing and
//! mirror the cell horizontally when `facing < 0`.

use glam::Vec2;

use crate::entity::EntityId;
use crate::frame_event::FrameEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw<'a> {
    pub entity: EntityId,
    pub source: &'a str,
    pub clip: &'a str,
    pub row: u32,
    pub frame: u32,
    /// Cell in sheet pixels as `(x, y, w, h)`.
    pub source_rect: (u32, u32, u32, u32),
    /// Top-left corner on screen.
    pub position: Vec2,
    pub facing: f32,
    pub scale: f32,
}

pub trait Renderer {
    fn draw_sprite(&mut self, sprite: &SpriteDraw<'_>);
}

pub trait Hud {
    fn show_health(&mut self, health: u32);
    fn show_message(&mut self, message: &str);
    fn clear_message(&mut self);
}

/// Forward the HUD-relevant events of one tick.
pub fn dispatch_hud(events: &[FrameEvent], hud: &mut dyn Hud) {
    for event in events {
        match event {
            FrameEvent::HeroDamaged { health } => hud.show_health(*health),
            FrameEvent::Outcome(outcome) => {
                if let Some(message) = outcome.message() {
                    hud.show_message(message);
                }
            }
            _ => {}
        }
    }
}

/// Headless renderer: counts draws and traces each sprite.
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub draws: u64,
}

impl Renderer for LogRenderer {
    fn draw_sprite(&mut self, sprite: &SpriteDraw<'_>) {
        self.draws += 1;
        let (sx, sy, sw, sh) = sprite.source_rect;
        log::trace!(
            "draw #{} {}:{} row {} frame {} cell ({sx}, {sy}, {sw}x{sh}) at ({:.1}, {:.1}) x{} facing {}",
            sprite.entity,
            sprite.source,
            sprite.clip,
            sprite.row,
            sprite.frame,
            sprite.position.x,
            sprite.position.y,
            sprite.scale,
            sprite.facing
        );
    }
}

#[derive(Debug, Default)]
pub struct LogHud {
    pub health: Option<u32>,
    pub message: Option<String>,
}

impl Hud for LogHud {
    fn show_health(&mut self, health: u32) {
        log::info!("HUD health: {health}");
        self.health = Some(health);
    }

    fn show_message(&mut self, message: &str) {
        log::info!("HUD message: {message}");
        self.message = Some(message.to_string());
    }

    fn clear_message(&mut self) {
        self.message = None;
    }
}

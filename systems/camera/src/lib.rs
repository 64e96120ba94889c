#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Horizontal scroll window that follows the player through a level.

use tideline_core::GameConfig;

/// Scroll offset kept so the player stays inside a horizontal dead zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraWindow {
    offset: f32,
    left_border: f32,
    right_border: f32,
    max_offset: f32,
}

impl CameraWindow {
    /// Creates a window at offset zero for a level scrolling up to `max_offset`.
    #[must_use]
    pub fn new(config: &GameConfig, max_offset: f32) -> Self {
        let width = config.game_width();
        Self {
            offset: 0.0,
            left_border: width * config.camera.left_border,
            right_border: width * config.camera.right_border,
            max_offset: max_offset.max(0.0),
        }
    }

    /// Current horizontal world-to-viewport translation.
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest offset the window may reach.
    #[must_use]
    pub const fn max_offset(&self) -> f32 {
        self.max_offset
    }

    /// Shifts the offset by exactly how far `player_x` left the dead zone, then clamps it.
    pub fn update(&mut self, player_x: f32) {
        let on_screen = player_x - self.offset;
        if on_screen > self.right_border {
            self.offset += on_screen - self.right_border;
        } else if on_screen < self.left_border {
            self.offset += on_screen - self.left_border;
        }
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    /// Returns to offset zero for a level scrolling up to `max_offset`.
    pub fn reset(&mut self, max_offset: f32) {
        self.offset = 0.0;
        self.max_offset = max_offset.max(0.0);
    }
}

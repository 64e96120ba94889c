//! Tick-driven animation frame counter.

/// Counts ticks and frames of a looping animation.
///
/// Behavior timing (attack windows, stagger, death) is measured in whole
/// animation cycles, so the clock lives in the simulation rather than in the
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationClock {
    ticks_per_frame: u32,
    tick: u32,
    frame: u32,
}

impl AnimationClock {
    /// Creates a clock at the first frame. A zero pace is treated as one tick per frame.
    #[must_use]
    pub const fn new(ticks_per_frame: u32) -> Self {
        Self {
            ticks_per_frame: if ticks_per_frame == 0 {
                1
            } else {
                ticks_per_frame
            },
            tick: 0,
            frame: 0,
        }
    }

    /// Current frame index.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Returns to the first tick of `frame`.
    pub fn restart_at(&mut self, frame: u32) {
        self.tick = 0;
        self.frame = frame;
    }

    /// Returns to the first tick of the first frame.
    pub fn restart(&mut self) {
        self.restart_at(0);
    }

    /// Advances one tick of an animation with `frame_count` frames.
    ///
    /// Returns `true` on the tick the animation wraps back to its first frame.
    pub fn advance(&mut self, frame_count: u32) -> bool {
        self.tick += 1;
        if self.tick < self.ticks_per_frame {
            return false;
        }

        self.tick = 0;
        self.frame += 1;
        if self.frame >= frame_count.max(1) {
            self.frame = 0;
            return true;
        }
        false
    }
}

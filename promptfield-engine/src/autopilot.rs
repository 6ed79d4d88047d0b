//! Auto-pilot: the recurring shuffle scheduler.
//!
//! A deadline state machine over injected engine time. There is never more
//! than one pending deadline: engaging, firing, and interval changes all
//! replace the stored deadline instead of stacking a new one. Disengaging
//! clears it, so nothing fires afterwards.
//!
//! Time is whatever clock the caller advances (the engine feeds its own
//! accumulated seconds), which keeps every schedule decision replayable in
//! tests without waiting on real delays.

use log::debug;
use rand::Rng;

/// Bounds for a fixed interval, seconds.
pub const FIXED_INTERVAL_MIN: f32 = 30.0;
pub const FIXED_INTERVAL_MAX: f32 = 300.0;

/// Range a "random" interval is drawn from on every cycle, seconds.
pub const RANDOM_INTERVAL_LO: f32 = 30.0;
pub const RANDOM_INTERVAL_HI: f32 = 120.0;

/// How long to wait between shuffles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IntervalMode {
    /// The same delay every cycle, clamped to [30, 300] s.
    Fixed(f32),
    /// A fresh uniform draw from [30, 120] s on every cycle.
    Random,
}

impl IntervalMode {
    /// Build a fixed mode, clamping out-of-bounds requests.
    pub fn fixed(seconds: f32) -> Self {
        IntervalMode::Fixed(seconds.clamp(FIXED_INTERVAL_MIN, FIXED_INTERVAL_MAX))
    }

    /// Delay until the next fire, in seconds.
    fn next_delay(self, rng: &mut impl Rng) -> f64 {
        match self {
            IntervalMode::Fixed(s) => f64::from(s.clamp(FIXED_INTERVAL_MIN, FIXED_INTERVAL_MAX)),
            IntervalMode::Random => {
                f64::from(rng.gen_range(RANDOM_INTERVAL_LO..=RANDOM_INTERVAL_HI))
            }
        }
    }
}

impl Default for IntervalMode {
    fn default() -> Self {
        IntervalMode::Fixed(60.0)
    }
}

/// What each firing applies to the bank.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ShuffleStyle {
    /// The hand-tuned coherent-mix randomizer.
    #[default]
    Coherent,
    /// A uniformly drawn archetype per firing.
    Archetype,
}

/// The scheduler itself. Owns no randomizer; it only answers "fire now?"
/// so the engine applies the shuffle and commits.
#[derive(Debug, Default)]
pub struct AutoPilot {
    on: bool,
    mode: IntervalMode,
    style: ShuffleStyle,
    /// The single pending deadline in engine seconds. `None` whenever off.
    next_at: Option<f64>,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }

    #[inline]
    pub fn mode(&self) -> IntervalMode {
        self.mode
    }

    #[inline]
    pub fn style(&self) -> ShuffleStyle {
        self.style
    }

    #[inline]
    pub fn set_style(&mut self, style: ShuffleStyle) {
        self.style = style;
    }

    /// Deadline of the pending fire, if engaged.
    #[inline]
    pub fn next_fire_at(&self) -> Option<f64> {
        self.next_at
    }

    /// Turn on. Returns true, meaning the caller should shuffle immediately;
    /// the follow-up fire is armed from `now`. Engaging while already on is
    /// a no-op returning false.
    pub fn engage(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        if self.on {
            return false;
        }
        self.on = true;
        self.arm(now, rng);
        debug!("auto-pilot engaged, next fire at {:.1}s", self.next_at.unwrap_or(now));
        true
    }

    /// Turn off and cancel the pending deadline.
    pub fn disengage(&mut self) {
        if self.on {
            debug!("auto-pilot disengaged");
        }
        self.on = false;
        self.next_at = None;
    }

    /// Advance to `now`. Returns true when the deadline passed; the next
    /// deadline is re-armed from `now` so exactly one is ever pending.
    pub fn poll(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        if !self.on {
            return false;
        }
        match self.next_at {
            Some(at) if now >= at => {
                self.arm(now, rng);
                true
            }
            Some(_) => false,
            // On with no deadline should not happen; repair rather than stall.
            None => {
                self.arm(now, rng);
                false
            }
        }
    }

    /// Replace the interval. While on, the stale deadline is cancelled and a
    /// new one armed from `now` without firing; while off, only the mode is
    /// stored.
    pub fn set_mode(&mut self, mode: IntervalMode, now: f64, rng: &mut impl Rng) {
        self.mode = mode;
        if self.on {
            self.arm(now, rng);
        }
    }

    fn arm(&mut self, now: f64, rng: &mut impl Rng) {
        self.next_at = Some(now + self.mode.next_delay(rng));
    }
}

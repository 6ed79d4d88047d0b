//! Throttled background gradient derived from the weight vector.
//!
//! Each of the 16 slots contributes one radial gradient anchored at its
//! cell of the 4x4 grid; alpha and reach scale with the slot's weight, so
//! the backdrop is a cheap visual summary of the whole mix. Rebuilding the
//! string on every knob twitch is wasteful, so refreshes are throttled to a
//! minimum interval of engine time. The throttle is purely cosmetic: weight
//! emission to sinks never waits on it.

use promptfield_core::bank::PromptBank;

/// Minimum seconds between gradient rebuilds.
pub const REFRESH_MIN_INTERVAL: f64 = 0.030;

/// Weight at which a slot's gradient reaches full alpha.
const ALPHA_FULL_WEIGHT: f32 = 0.5;
/// Alpha ceiling for any single gradient.
const ALPHA_MAX: f32 = 0.6;

/// Cached CSS `background-image` value keyed by the weight vector.
#[derive(Debug, Default)]
pub struct Backdrop {
    css: String,
    last_refresh: Option<f64>,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild if at least [`REFRESH_MIN_INTERVAL`] has passed since the
    /// last rebuild; otherwise keep the cached string. Returns the current
    /// value either way.
    pub fn refresh(&mut self, now: f64, bank: &PromptBank) -> &str {
        let due = match self.last_refresh {
            Some(at) => now - at >= REFRESH_MIN_INTERVAL,
            None => true,
        };
        if due {
            self.css = render(bank);
            self.last_refresh = Some(now);
        }
        &self.css
    }

    /// Last rendered value without touching the throttle.
    #[inline]
    pub fn css(&self) -> &str {
        &self.css
    }
}

/// Build the gradient stack. One `radial-gradient` per slot, positioned on
/// the 4x4 grid, alpha proportional to weight.
fn render(bank: &PromptBank) -> String {
    let mut parts = Vec::with_capacity(bank.prompts().len());
    for (i, p) in bank.prompts().iter().enumerate() {
        let alpha_pct = (p.weight / ALPHA_FULL_WEIGHT).clamp(0.0, 1.0) * ALPHA_MAX;
        let alpha = (alpha_pct * 255.0).round() as u8;
        let stop = f64::from(p.weight) / 2.0;
        let x = (i % 4) as f64 / 3.0;
        let y = (i / 4) as f64 / 3.0;
        parts.push(format!(
            "radial-gradient(circle at {:.0}% {:.0}%, {}{:02x} 0px, {}00 {:.0}%)",
            x * 100.0,
            y * 100.0,
            p.color,
            alpha,
            p.color,
            stop * 100.0,
        ));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptfield_core::bank::{Activation, SlotTemplate};
    use promptfield_core::category::BANK_SIZE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank() -> PromptBank {
        let mut rng = StdRng::seed_from_u64(41);
        let slots = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("s{i}"), "#ff0000"));
        PromptBank::from_slots(slots, Activation::Fixed(&[0]), &mut rng)
    }

    #[test]
    fn renders_one_gradient_per_slot() {
        let mut backdrop = Backdrop::new();
        let css = backdrop.refresh(0.0, &bank());
        assert_eq!(css.matches("radial-gradient").count(), BANK_SIZE);
        // Slot 0 is active at weight 1.0: full alpha (0.6 -> 0x99).
        assert!(css.starts_with("radial-gradient(circle at 0% 0%, #ff000099 0px"));
        // Inactive slots render fully transparent.
        assert!(css.contains("#ff000000 0px"));
    }

    #[test]
    fn refreshes_are_throttled_but_eventually_catch_up() {
        let mut backdrop = Backdrop::new();
        let mut bank = bank();
        let first = backdrop.refresh(0.0, &bank).to_string();

        // A change inside the throttle window keeps the stale string.
        bank.set_weight("prompt-7", 1.5);
        let inside = backdrop.refresh(0.010, &bank).to_string();
        assert_eq!(inside, first);

        // Past the window the rebuild happens.
        let outside = backdrop.refresh(0.040, &bank).to_string();
        assert_ne!(outside, first);
    }
}

//! Named activation templates for the structured randomizer.
//!
//! An archetype says how many prompts each category should contribute and
//! the weight range they land in. The built-in list covers the useful
//! ambient spread: sparse rhythm skeletons up to a dense full mix.

use crate::category::Category;

/// Activation counts per category plus a shared weight range.
#[derive(Copy, Clone, Debug)]
pub struct Archetype {
    pub name: &'static str,
    /// Counts indexed like [`Category::ALL`] (beat, bass, harmony, melody, texture).
    pub counts: [u8; 5],
    pub weight_lo: f32,
    pub weight_hi: f32,
}

impl Archetype {
    /// Requested activations for one category.
    #[inline]
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()] as usize
    }

    /// Total requested activations across all categories.
    #[inline]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }
}

/// Built-in archetypes. Counts stay within each category's slot budget
/// (4/2/2/4/4); ranges stay inside the weight domain.
pub const ARCHETYPES: &[Archetype] = &[
    Archetype { name: "full-bloom",      counts: [1, 1, 1, 2, 2], weight_lo: 0.8, weight_hi: 1.4 },
    Archetype { name: "skeleton-groove", counts: [1, 1, 0, 0, 1], weight_lo: 1.0, weight_hi: 1.6 },
    Archetype { name: "weightless",      counts: [0, 0, 2, 1, 3], weight_lo: 0.6, weight_hi: 1.2 },
    Archetype { name: "drum-circle",     counts: [3, 1, 0, 0, 1], weight_lo: 0.9, weight_hi: 1.5 },
    Archetype { name: "night-drive",     counts: [1, 1, 1, 1, 1], weight_lo: 0.9, weight_hi: 1.3 },
    Archetype { name: "haze",            counts: [0, 0, 1, 0, 4], weight_lo: 0.5, weight_hi: 1.0 },
];

/// Look up an archetype by name (case-insensitive). `None` when unknown;
/// callers decide the fallback.
pub fn find(name: &str) -> Option<&'static Archetype> {
    let n = name.trim();
    ARCHETYPES.iter().find(|a| a.name.eq_ignore_ascii_case(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::WEIGHT_MAX;

    #[test]
    fn counts_fit_their_categories() {
        for a in ARCHETYPES {
            for c in Category::ALL {
                assert!(
                    a.count(c) <= c.slot_count(),
                    "{} over-requests {:?}",
                    a.name,
                    c
                );
            }
        }
    }

    #[test]
    fn ranges_stay_in_weight_domain() {
        for a in ARCHETYPES {
            assert!(a.weight_lo > 0.0 && a.weight_lo <= a.weight_hi, "{}", a.name);
            assert!(a.weight_hi <= WEIGHT_MAX, "{}", a.name);
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find("HAZE").unwrap().name, "haze");
        assert!(find("does-not-exist").is_none());
    }
}

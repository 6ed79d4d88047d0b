//! Promptfield Core — the prompt-weighting primitives behind the live mix.
//!
//! Modules
//! - [`category`]  : the closed category enum and its static slot table
//! - [`bank`]      : `Prompt` and the fixed 16-slot `PromptBank`
//! - [`archetype`] : named activation templates for structured shuffles
//! - [`randomize`] : the two randomization policies (archetype / coherent)
//!
//! Design
//! - Everything here is pure data plus functions over it; no timers, no
//!   engine state, no I/O
//! - All stochastic functions take `&mut impl Rng`, so callers own the seed
//!   and tests replay exact draws
//! - Weights are clamped at every write; the bank can't hold an
//!   out-of-domain value

pub mod archetype;
pub mod bank;
pub mod category;
pub mod randomize;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::archetype::{find as find_archetype, Archetype, ARCHETYPES};
    pub use crate::bank::{
        clamp_weight, Activation, Prompt, PromptBank, ReplaceWeights, SlotTemplate,
        INITIAL_WEIGHT, WEIGHT_MAX,
    };
    pub use crate::category::{Category, CategoryInfo, BANK_SIZE, CATEGORY_TABLE};
    pub use crate::randomize::{apply_archetype, coherent_mix, random_archetype};
}

#[cfg(test)]
mod smoke {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let mut rng = StdRng::seed_from_u64(0);
        let slots = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("p{i}"), "#ffffff"));
        let mut bank = PromptBank::from_slots(slots, Activation::Random(3), &mut rng);
        coherent_mix(&mut bank, &mut rng);
        apply_archetype(&mut bank, &ARCHETYPES[0], &mut rng);
        let _ = clamp_weight(2.5);
    }
}

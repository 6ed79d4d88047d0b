//! The prompt bank: sixteen id-stable weighted prompts.
//!
//! Contents:
//! - `Prompt`     : one named control slot with a weight in [0, WEIGHT_MAX]
//! - `PromptBank` : the fixed 16-slot collection, partitioned by category
//! - `Activation` : which slots start active when a bank is (re)built
//!
//! Notes:
//! - Ids are `prompt-0` .. `prompt-15`, assigned once at construction and
//!   never reused for a different slot within a session.
//! - Every weight write goes through [`clamp_weight`]; the bank never holds
//!   an out-of-domain or non-finite weight.
//! - Rebuilding texts/colors (profile swap) either preserves weights per
//!   slot or re-applies the activation policy, chosen by the caller.

use rand::seq::index::sample;
use rand::Rng;

use crate::category::{Category, BANK_SIZE};

/// Upper end of the weight domain. A weight of 0 means inactive.
pub const WEIGHT_MAX: f32 = 1.8;

/// Weight newly activated slots receive at bank construction.
pub const INITIAL_WEIGHT: f32 = 1.0;

/// Clamp a weight into [0, WEIGHT_MAX]. Non-finite input collapses to 0.
#[inline]
pub fn clamp_weight(w: f32) -> f32 {
    if w.is_finite() {
        w.clamp(0.0, WEIGHT_MAX)
    } else {
        0.0
    }
}

/// One named, weighted control slot of the mix.
#[derive(Clone, Debug)]
pub struct Prompt {
    /// Stable id, `prompt-N` where N is the slot index.
    pub id: String,
    /// Text sent to the generation backend.
    pub text: String,
    /// Influence on the mix, 0 = inactive.
    pub weight: f32,
    /// Hex color token used by visual consumers.
    pub color: String,
    /// MIDI control-change number bound to this slot (defaults to the slot
    /// index, matching a 16-knob controller laid out like the grid).
    pub cc: u8,
    /// Fixed category of the slot this prompt occupies.
    pub category: Category,
}

impl Prompt {
    /// Whether this prompt currently contributes to the mix.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }
}

/// Text/color pair used to (re)build one slot of the bank.
#[derive(Clone, Debug)]
pub struct SlotTemplate {
    pub text: String,
    pub color: String,
}

impl SlotTemplate {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self { text: text.into(), color: color.into() }
    }
}

/// Which slots start active when a bank is built or reset.
#[derive(Clone, Debug)]
pub enum Activation<'a> {
    /// Exactly these slot indices (out-of-range entries are ignored).
    Fixed(&'a [usize]),
    /// A uniformly drawn distinct subset of this size.
    Random(usize),
}

/// How `replace_slots` treats existing weights.
#[derive(Clone, Debug)]
pub enum ReplaceWeights<'a> {
    /// Keep each slot's weight; only texts and colors change.
    Preserve,
    /// Zero everything and re-apply an activation policy.
    Reset(Activation<'a>),
}

/// The fixed-size prompt collection. Slot order is bank order; the category
/// partition comes from the static table and never moves.
#[derive(Clone, Debug)]
pub struct PromptBank {
    prompts: Vec<Prompt>,
}

impl PromptBank {
    /// Build a bank from up to 16 slot templates. Missing trailing slots get
    /// an empty text and their category's fallback color. Slots named by
    /// `activation` start at [`INITIAL_WEIGHT`], all others at 0.
    pub fn from_slots<I>(slots: I, activation: Activation<'_>, rng: &mut impl Rng) -> Self
    where
        I: IntoIterator<Item = SlotTemplate>,
    {
        let mut templates: Vec<SlotTemplate> = slots.into_iter().take(BANK_SIZE).collect();
        while templates.len() < BANK_SIZE {
            let cat = Category::of_slot(templates.len());
            templates.push(SlotTemplate::new("", cat.fallback_color()));
        }

        let mut prompts = Vec::with_capacity(BANK_SIZE);
        for (slot, t) in templates.into_iter().enumerate() {
            prompts.push(Prompt {
                id: format!("prompt-{slot}"),
                text: t.text,
                weight: 0.0,
                color: t.color,
                cc: slot as u8,
                category: Category::of_slot(slot),
            });
        }

        let mut bank = Self { prompts };
        bank.apply_activation(&activation, rng);
        bank
    }

    fn apply_activation(&mut self, activation: &Activation<'_>, rng: &mut impl Rng) {
        for p in &mut self.prompts {
            p.weight = 0.0;
        }
        match activation {
            Activation::Fixed(slots) => {
                for &slot in slots.iter() {
                    if let Some(p) = self.prompts.get_mut(slot) {
                        p.weight = INITIAL_WEIGHT;
                    }
                }
            }
            Activation::Random(count) => {
                let n = (*count).min(BANK_SIZE);
                for slot in sample(rng, BANK_SIZE, n) {
                    self.prompts[slot].weight = INITIAL_WEIGHT;
                }
            }
        }
    }

    /// Swap texts/colors wholesale. Ids, slot order and the category
    /// partition are untouched; weights per `weights` policy.
    pub fn replace_slots<I>(&mut self, slots: I, weights: ReplaceWeights<'_>, rng: &mut impl Rng)
    where
        I: IntoIterator<Item = SlotTemplate>,
    {
        let mut it = slots.into_iter();
        for slot in 0..BANK_SIZE {
            let (text, color) = match it.next() {
                Some(t) => (t.text, t.color),
                None => {
                    let cat = Category::of_slot(slot);
                    (String::new(), cat.fallback_color().to_string())
                }
            };
            let p = &mut self.prompts[slot];
            p.text = text;
            p.color = color;
        }
        if let ReplaceWeights::Reset(activation) = weights {
            self.apply_activation(&activation, rng);
        }
    }

    /// Set one prompt's weight, clamped to the domain. Returns false (and
    /// changes nothing) if the id is unknown.
    pub fn set_weight(&mut self, id: &str, weight: f32) -> bool {
        match self.prompts.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.weight = clamp_weight(weight);
                true
            }
            None => false,
        }
    }

    /// Set a slot's weight directly (clamped). Out-of-range slots are a no-op.
    pub fn set_slot_weight(&mut self, slot: usize, weight: f32) {
        if let Some(p) = self.prompts.get_mut(slot) {
            p.weight = clamp_weight(weight);
        }
    }

    /// Zero every weight.
    pub fn clear_weights(&mut self) {
        for p in &mut self.prompts {
            p.weight = 0.0;
        }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn slot(&self, slot: usize) -> Option<&Prompt> {
        self.prompts.get(slot)
    }

    /// All prompts in slot order.
    #[inline]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Slot indices with weight > 0, in slot order.
    pub fn active_slots(&self) -> Vec<usize> {
        self.prompts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    /// Active prompts within one category's slot range.
    pub fn active_in(&self, category: Category) -> usize {
        category
            .slots()
            .filter(|&s| self.prompts[s].is_active())
            .count()
    }
}

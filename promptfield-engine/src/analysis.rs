//! Boundary to the external text-analysis / note-generation service.
//!
//! Both calls are black boxes behind traits: the engine never sees the
//! transport, only `Option<results>`. A `None` means the call failed and is
//! always handled the same way: keep the current state, tell the user.
//!
//! Successful analysis results are redistributed into the fixed category
//! grid: each slot takes the next analyzer item of its own category, excess
//! items are discarded, and any shortfall backfills from a fallback
//! profile's slot template. A payload can therefore be arbitrarily
//! malformed (missing categories, too few items) and still apply cleanly
//! slot by slot.

use std::collections::VecDeque;

use promptfield_core::bank::SlotTemplate;
use promptfield_core::category::{Category, BANK_SIZE};

use crate::profiles::Profile;

/// One analyzer suggestion. `category` is `None` when the service returned
/// an unknown label; such items are dropped during redistribution.
#[derive(Clone, Debug)]
pub struct ThemedPrompt {
    pub text: String,
    pub category: Option<Category>,
}

impl ThemedPrompt {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self { text: text.into(), category: Some(category) }
    }
}

/// One generated preview note (MIDI number, seconds).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NoteEvent {
    pub note: u8,
    pub time: f32,
    pub duration: f32,
}

/// Text/song analysis service. `None` = failure; the caller must leave the
/// bank untouched and surface a notice.
pub trait SongAnalyzer {
    fn analyze(&mut self, query: &str) -> Option<Vec<ThemedPrompt>>;
}

/// Note-generation service for the audio-preview path. Results never touch
/// the prompt bank.
pub trait NoteGenerator {
    fn generate(&mut self, query: &str) -> Option<Vec<NoteEvent>>;
}

/// Redistribute analyzer items into the 16 fixed slots. Items are consumed
/// in order within their category; slots whose category queue runs dry take
/// the fallback profile's template for that slot. Colors always come from
/// the slot's category (analysis replaces a whole profile, not one slot).
pub fn redistribute(items: &[ThemedPrompt], fallback: &Profile) -> Vec<SlotTemplate> {
    let mut queues: [VecDeque<&str>; 5] = Default::default();
    for item in items {
        if let Some(cat) = item.category {
            let text = item.text.trim();
            if !text.is_empty() {
                queues[cat.index()].push_back(text);
            }
        }
    }

    (0..BANK_SIZE)
        .map(|slot| {
            let cat = Category::of_slot(slot);
            match queues[cat.index()].pop_front() {
                Some(text) => SlotTemplate::new(text, cat.fallback_color()),
                None => fallback.slot_template(slot),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles;

    fn fallback() -> &'static Profile {
        profiles::find(profiles::DEFAULT_PROFILE).unwrap()
    }

    #[test]
    fn items_land_in_their_category_slots_in_order() {
        let items = vec![
            ThemedPrompt::new("kick pattern", Category::Beat),
            ThemedPrompt::new("snare pattern", Category::Beat),
            ThemedPrompt::new("low drone", Category::Bass),
            ThemedPrompt::new("evening pad", Category::Harmony),
        ];
        let slots = redistribute(&items, fallback());
        assert_eq!(slots.len(), BANK_SIZE);
        assert_eq!(slots[0].text, "kick pattern");
        assert_eq!(slots[1].text, "snare pattern");
        assert_eq!(slots[4].text, "low drone");
        assert_eq!(slots[6].text, "evening pad");
        assert_eq!(slots[0].color, Category::Beat.fallback_color());
    }

    #[test]
    fn shortfall_backfills_from_the_fallback_profile() {
        let items = vec![ThemedPrompt::new("kick pattern", Category::Beat)];
        let slots = redistribute(&items, fallback());
        // Beat slot 1 and everything after uses the fallback texts.
        assert_eq!(slots[1].text, fallback().slots[1].0);
        assert_eq!(slots[15].text, fallback().slots[15].0);
    }

    #[test]
    fn excess_items_are_discarded() {
        let items: Vec<ThemedPrompt> =
            (0..10).map(|i| ThemedPrompt::new(format!("bass {i}"), Category::Bass)).collect();
        let slots = redistribute(&items, fallback());
        assert_eq!(slots[4].text, "bass 0");
        assert_eq!(slots[5].text, "bass 1");
        // Bass has two slots; "bass 2".. never appear anywhere.
        assert!(slots.iter().all(|s| !s.text.starts_with("bass 2")));
    }

    #[test]
    fn unlabelled_and_blank_items_are_dropped() {
        let items = vec![
            ThemedPrompt { text: "mystery".into(), category: None },
            ThemedPrompt { text: "   ".into(), category: Some(Category::Beat) },
        ];
        let slots = redistribute(&items, fallback());
        assert_eq!(slots[0].text, fallback().slots[0].0);
    }
}

//! The mixer: prompt store plus change notification.
//!
//! Every mutation of the bank funnels through [`Mixer`], which owns the
//! single commit path: mutate, then hand every registered sink one complete
//! ordered snapshot of the weight vector. Sinks never see a half-applied
//! change because snapshots are built only after the mutation finished.
//!
//! Contents:
//! - `PlaybackState` : external transport state pushed into the engine
//! - `PromptView`    : one snapshot row of the emitted weight vector
//! - `WeightSink`    : consumer boundary (the live audio session lives here)
//! - `Notice`        : user-visible toast queued by failure paths
//! - `Mixer`         : bank + filtered-text set + sinks + notice queue

use std::collections::HashSet;

use log::debug;
use promptfield_core::prelude::*;

/// Transport state of the external audio session. The engine never drives
/// playback itself; it only consumes this for visual pacing and gating.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Loading,
    Playing,
    Paused,
}

/// One row of the emitted weight vector. The full ordered vector (all 16
/// rows, weight 0 included) goes out on every change; consumers that want a
/// diff can compute their own.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptView {
    pub id: String,
    pub text: String,
    pub weight: f32,
    pub color: String,
    /// Set when the downstream generator rejected this text.
    pub filtered: bool,
}

/// Consumer of weight-vector changes. Called synchronously from the commit
/// path; implementations should hand off and return quickly.
pub trait WeightSink {
    fn on_weights(&mut self, weights: &[PromptView]);
}

/// Blanket impl so plain closures can subscribe.
impl<F: FnMut(&[PromptView])> WeightSink for F {
    fn on_weights(&mut self, weights: &[PromptView]) {
        self(weights)
    }
}

/// A user-visible message for the host's toast surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub duration_ms: u32,
}

impl Notice {
    pub const DEFAULT_DURATION_MS: u32 = 5000;

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), duration_ms: Self::DEFAULT_DURATION_MS }
    }

    pub fn lasting(text: impl Into<String>, duration_ms: u32) -> Self {
        Self { text: text.into(), duration_ms }
    }
}

/// Prompt store plus its change-notification boundary.
pub struct Mixer {
    bank: PromptBank,
    sinks: Vec<Box<dyn WeightSink>>,
    /// Texts rejected by the downstream generator. Matched by text (not id)
    /// and kept for the whole session.
    filtered: HashSet<String>,
    notices: Vec<Notice>,
}

impl Mixer {
    pub fn new(bank: PromptBank) -> Self {
        Self { bank, sinks: Vec::new(), filtered: HashSet::new(), notices: Vec::new() }
    }

    #[inline]
    pub fn bank(&self) -> &PromptBank {
        &self.bank
    }

    /// Mutable bank access for the engine's commit path. Callers must follow
    /// every mutation with [`Mixer::notify`].
    #[inline]
    pub(crate) fn bank_mut(&mut self) -> &mut PromptBank {
        &mut self.bank
    }

    /// Register a weight-vector consumer. It does NOT receive a snapshot at
    /// registration time; the next commit delivers one.
    pub fn add_sink(&mut self, sink: Box<dyn WeightSink>) {
        self.sinks.push(sink);
    }

    /// Build the full ordered snapshot of the current weight vector.
    pub fn snapshot(&self) -> Vec<PromptView> {
        self.bank
            .prompts()
            .iter()
            .map(|p| PromptView {
                id: p.id.clone(),
                text: p.text.clone(),
                weight: p.weight,
                color: p.color.clone(),
                filtered: self.filtered.contains(&p.text),
            })
            .collect()
    }

    /// Emit the current weight vector to every sink.
    pub fn notify(&mut self) {
        let snapshot = self.snapshot();
        for sink in &mut self.sinks {
            sink.on_weights(&snapshot);
        }
    }

    /// Record a generator-rejected prompt text and queue a toast. The mark
    /// persists for the rest of the session.
    pub fn mark_filtered(&mut self, text: &str, reason: Option<&str>) {
        if self.filtered.insert(text.to_string()) {
            debug!("prompt filtered by generator: {text:?}");
        }
        let msg = match reason {
            Some(r) => format!("Filtered prompt: \"{text}\". Reason: {r}"),
            None => format!("Filtered prompt: \"{text}\""),
        };
        self.notices.push(Notice::new(msg));
    }

    #[inline]
    pub fn is_filtered(&self, text: &str) -> bool {
        self.filtered.contains(text)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain queued toasts; the host renders them.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_bank() -> PromptBank {
        let mut rng = StdRng::seed_from_u64(1);
        let slots = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("slot {i}"), "#abcdef"));
        PromptBank::from_slots(slots, Activation::Fixed(&[0, 5, 9]), &mut rng)
    }

    #[test]
    fn notify_sends_full_ordered_vector() {
        let mut mixer = Mixer::new(test_bank());
        let seen: Rc<RefCell<Vec<Vec<PromptView>>>> = Rc::default();
        let sink_seen = seen.clone();
        mixer.add_sink(Box::new(move |ws: &[PromptView]| {
            sink_seen.borrow_mut().push(ws.to_vec());
        }));

        mixer.bank_mut().set_weight("prompt-1", 1.2);
        mixer.notify();

        let calls = seen.borrow();
        assert_eq!(calls.len(), 1);
        let snap = &calls[0];
        assert_eq!(snap.len(), BANK_SIZE);
        for (i, row) in snap.iter().enumerate() {
            assert_eq!(row.id, format!("prompt-{i}"));
        }
        assert!((snap[1].weight - 1.2).abs() < 1e-6);
        assert_eq!(snap[2].weight, 0.0);
    }

    #[test]
    fn filtered_marks_match_by_text_and_queue_a_toast() {
        let mut mixer = Mixer::new(test_bank());
        mixer.mark_filtered("slot 3", Some("unsafe content"));

        assert!(mixer.is_filtered("slot 3"));
        let snap = mixer.snapshot();
        assert!(snap[3].filtered);
        assert!(snap.iter().filter(|r| r.filtered).count() == 1);

        let notices = mixer.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].text.contains("slot 3"));
        assert!(notices[0].text.contains("unsafe content"));
        assert!(mixer.take_notices().is_empty());
    }

    #[test]
    fn filtered_mark_survives_profile_swap_that_reuses_the_text() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut mixer = Mixer::new(test_bank());
        mixer.mark_filtered("slot 3", None);

        // Swap texts away and back; the mark keys on text, so the flag
        // follows the text, not the slot.
        let away = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("other {i}"), "#000000"));
        mixer.bank_mut().replace_slots(away, ReplaceWeights::Preserve, &mut rng);
        assert!(mixer.snapshot().iter().all(|r| !r.filtered));

        let back = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("slot {i}"), "#000000"));
        mixer.bank_mut().replace_slots(back, ReplaceWeights::Preserve, &mut rng);
        assert!(mixer.snapshot()[3].filtered);
    }
}

//! The realtime engine: one object the host steps once per frame.
//!
//! Owns the mixer, the auto-pilot, the halo field, the backdrop cache, the
//! RNG, and an accumulated clock. The host feeds measured wall-clock deltas
//! into [`Engine::tick`]; everything time-based (auto-pilot deadlines, the
//! backdrop throttle, the border-shape cadence) keys off that injected
//! clock, so a test can play out minutes of behavior in microseconds.
//!
//! Every mutation funnels through one commit path: reconcile the field,
//! then emit the full weight vector to the sinks. Nothing observes a
//! half-applied change.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use promptfield_core::prelude::*;

use crate::analysis::{redistribute, NoteEvent, NoteGenerator, SongAnalyzer, ThemedPrompt};
use crate::autopilot::{AutoPilot, IntervalMode, ShuffleStyle};
use crate::backdrop::Backdrop;
use crate::field::{FieldSim, Halo, MotionModel};
use crate::mixer::{Mixer, Notice, PlaybackState, PromptView, WeightSink};
use crate::profiles::{self, Profile, DEFAULT_ACTIVE_SLOTS};

/// Frame deltas above this are treated as a hitch and clamped, so a paused
/// debugger doesn't teleport the field.
const MAX_FRAME_DT: f32 = 1.0;

/// Configuration for a new engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Profile name; unknown names fall back to the default.
    pub profile: String,
    /// Field container size in visual units.
    pub field_width: f32,
    pub field_height: f32,
    pub motion: MotionModel,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: profiles::DEFAULT_PROFILE.to_string(),
            field_width: 1280.0,
            field_height: 720.0,
            motion: MotionModel::Drift,
            seed: None,
        }
    }
}

/// Token identifying one in-flight analysis request. Only the newest token
/// may apply results; older completions are dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisToken(u64);

pub struct Engine {
    mixer: Mixer,
    autopilot: AutoPilot,
    field: FieldSim,
    backdrop: Backdrop,
    playback: PlaybackState,
    rng: StdRng,
    /// Accumulated engine time, seconds.
    now: f64,
    pending_analysis: Option<AnalysisToken>,
    next_token: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let profile = profiles::find_or_default(&config.profile);
        let bank = PromptBank::from_slots(
            profile.slot_templates(),
            Activation::Fixed(&DEFAULT_ACTIVE_SLOTS),
            &mut rng,
        );
        let mut field = FieldSim::new(config.field_width, config.field_height, config.motion);
        field.reconcile(&bank, &mut rng);
        Self {
            mixer: Mixer::new(bank),
            autopilot: AutoPilot::new(),
            field,
            backdrop: Backdrop::new(),
            playback: PlaybackState::Stopped,
            rng,
            now: 0.0,
            pending_analysis: None,
            next_token: 0,
        }
    }

    // --- Clock & frame loop -------------------------------------------------------

    /// Current engine time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by one frame of measured wall-clock time. Runs due auto-pilot
    /// shuffles, then steps the halo field.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.now += f64::from(dt);
        if self.autopilot.poll(self.now, &mut self.rng) {
            self.shuffle_once();
        }
        self.field.step(dt, self.playback, &mut self.rng);
    }

    // --- Prompt store operations --------------------------------------------------

    /// Set one prompt's weight by id. Unknown ids are a logged no-op.
    pub fn set_weight(&mut self, id: &str, weight: f32) {
        if self.mixer.bank_mut().set_weight(id, weight) {
            self.commit();
        } else {
            debug!("ignoring weight for unknown prompt id {id:?}");
        }
    }

    /// Set one prompt's weight by bank slot. Out-of-range slots are a no-op.
    pub fn set_slot_weight(&mut self, slot: usize, weight: f32) {
        if slot < BANK_SIZE {
            self.mixer.bank_mut().set_slot_weight(slot, weight);
            self.commit();
        }
    }

    /// Swap in a named profile. With `preserve_weights` the current weights
    /// (and thus the halo set) carry over; otherwise the default activation
    /// is re-applied.
    pub fn replace_profile(&mut self, name: &str, preserve_weights: bool) {
        let profile = profiles::find_or_default(name);
        self.replace_slots(profile.slot_templates().collect(), preserve_weights);
    }

    fn replace_slots(&mut self, slots: Vec<SlotTemplate>, preserve_weights: bool) {
        let policy = if preserve_weights {
            ReplaceWeights::Preserve
        } else {
            ReplaceWeights::Reset(Activation::Fixed(&DEFAULT_ACTIVE_SLOTS))
        };
        self.mixer.bank_mut().replace_slots(slots, policy, &mut self.rng);
        self.commit();
    }

    // --- Randomization ------------------------------------------------------------

    /// Apply the coherent-mix randomizer once (the "Randomize" button).
    pub fn randomize(&mut self) {
        coherent_mix(self.mixer.bank_mut(), &mut self.rng);
        self.commit();
    }

    /// Apply a named archetype, or a uniformly drawn one when `name` is
    /// `None` or unknown.
    pub fn shuffle_archetype(&mut self, name: Option<&str>) {
        let archetype = name
            .and_then(find_archetype)
            .unwrap_or_else(|| random_archetype(&mut self.rng));
        debug!("applying archetype {}", archetype.name);
        apply_archetype(self.mixer.bank_mut(), archetype, &mut self.rng);
        self.commit();
    }

    fn shuffle_once(&mut self) {
        match self.autopilot.style() {
            ShuffleStyle::Coherent => self.randomize(),
            ShuffleStyle::Archetype => self.shuffle_archetype(None),
        }
    }

    // --- Auto-pilot ---------------------------------------------------------------

    /// Engage the auto-pilot: shuffles immediately, then on the interval.
    pub fn autopilot_engage(&mut self) {
        if self.autopilot.engage(self.now, &mut self.rng) {
            self.shuffle_once();
        }
    }

    /// Disengage; the pending shuffle is cancelled.
    pub fn autopilot_disengage(&mut self) {
        self.autopilot.disengage();
    }

    #[inline]
    pub fn autopilot_is_on(&self) -> bool {
        self.autopilot.is_on()
    }

    /// Change the interval. While engaged this re-arms without an extra
    /// immediate shuffle.
    pub fn autopilot_set_interval(&mut self, mode: IntervalMode) {
        self.autopilot.set_mode(mode, self.now, &mut self.rng);
    }

    pub fn autopilot_set_style(&mut self, style: ShuffleStyle) {
        self.autopilot.set_style(style);
    }

    // --- External inputs ----------------------------------------------------------

    /// Push the audio session's transport state into the engine.
    pub fn set_playback(&mut self, state: PlaybackState) {
        self.playback = state;
    }

    #[inline]
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Record a generator-rejected prompt text (moderation signal).
    pub fn mark_filtered(&mut self, text: &str, reason: Option<&str>) {
        self.mixer.mark_filtered(text, reason);
        self.mixer.notify();
    }

    // --- Analysis boundary --------------------------------------------------------

    /// Begin an analysis request. The returned token must accompany the
    /// completion; issuing a new request supersedes any in-flight one.
    pub fn begin_analysis(&mut self) -> AnalysisToken {
        let token = AnalysisToken(self.next_token);
        self.next_token += 1;
        self.pending_analysis = Some(token);
        token
    }

    #[inline]
    pub fn is_analyzing(&self) -> bool {
        self.pending_analysis.is_some()
    }

    /// Deliver an analysis completion. Stale tokens are dropped outright.
    /// `None` results keep the bank untouched and queue a notice. Either
    /// way the in-progress flag clears for the matching request.
    pub fn complete_analysis(
        &mut self,
        token: AnalysisToken,
        result: Option<Vec<ThemedPrompt>>,
    ) {
        if self.pending_analysis != Some(token) {
            debug!("dropping stale analysis completion {token:?}");
            return;
        }
        self.pending_analysis = None;
        match result {
            Some(items) => {
                let fallback: &Profile = profiles::find_or_default(profiles::DEFAULT_PROFILE);
                let slots = redistribute(&items, fallback);
                self.replace_slots(slots, true);
            }
            None => {
                self.mixer.push_notice(Notice::new(
                    "Song analysis failed. Keeping the current prompts.",
                ));
            }
        }
    }

    /// Synchronous convenience wrapper around a [`SongAnalyzer`]: begin,
    /// call, complete. Hosts doing real async work drive the token pair
    /// themselves.
    pub fn run_analysis(&mut self, analyzer: &mut dyn SongAnalyzer, query: &str) {
        let token = self.begin_analysis();
        let result = analyzer.analyze(query);
        self.complete_analysis(token, result);
    }

    /// Run the note generator for the preview path. The bank is never
    /// touched; a failure only queues a notice.
    pub fn run_generation(
        &mut self,
        generator: &mut dyn NoteGenerator,
        query: &str,
    ) -> Option<Vec<NoteEvent>> {
        match generator.generate(query) {
            Some(notes) => Some(notes),
            None => {
                self.mixer.push_notice(Notice::new(
                    "Note generation failed. Nothing was changed.",
                ));
                None
            }
        }
    }

    // --- Outputs ------------------------------------------------------------------

    /// Subscribe a weight-vector consumer.
    pub fn add_sink(&mut self, sink: Box<dyn WeightSink>) {
        self.mixer.add_sink(sink);
    }

    /// Full ordered snapshot of the current weight vector.
    pub fn snapshot(&self) -> Vec<PromptView> {
        self.mixer.snapshot()
    }

    #[inline]
    pub fn bank(&self) -> &PromptBank {
        self.mixer.bank()
    }

    #[inline]
    pub fn halos(&self) -> &[Halo] {
        self.field.halos()
    }

    #[inline]
    pub fn field(&self) -> &FieldSim {
        &self.field
    }

    /// Resize the visual field container.
    pub fn set_field_bounds(&mut self, width: f32, height: f32) {
        self.field.set_bounds(width, height);
    }

    /// Throttled backdrop gradient for the current weight vector.
    pub fn backdrop_css(&mut self) -> &str {
        self.backdrop.refresh(self.now, self.mixer.bank())
    }

    /// Drain queued user-visible notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.mixer.take_notices()
    }

    /// The single commit path: field membership first, then sink emission.
    /// The backdrop is intentionally NOT refreshed here; it re-renders
    /// lazily (and throttled) when the host asks for it.
    fn commit(&mut self) {
        self.field.reconcile(self.mixer.bank(), &mut self.rng);
        self.mixer.notify();
    }
}

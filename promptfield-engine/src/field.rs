//! The halo field: ambient visuals derived from the weight vector.
//!
//! One halo per active prompt, stepped with a measured wall-clock delta.
//! Motion comes in two flavors picked per simulator:
//! - `Drift` : straight-line velocity with toroidal wraparound
//! - `Orbit` : a drifting (and wrapping) center plus an angular offset
//!
//! Halo size is linear in the prompt's weight; all motion scales with a
//! playback-state multiplier so the field goes dormant when the session is
//! not playing. On a fixed cadence every halo regrows a randomized
//! border-radius descriptor, which makes the blobs breathe without touching
//! their kinematics.
//!
//! Reconciliation runs after every bank change: halo membership always
//! equals the set of active slots, while surviving halos keep position,
//! velocity and phase and only refresh size and color.

use rand::Rng;

use promptfield_core::bank::{PromptBank, WEIGHT_MAX};
use promptfield_core::category::BANK_SIZE;

use crate::mixer::PlaybackState;

/// Seconds between border-shape regenerations.
pub const SHAPE_CADENCE: f32 = 4.0;

/// Halos may roam this many units past each edge before wrapping.
pub const FIELD_MARGIN: f32 = 120.0;

/// Halo diameter at weight 0 and the additional span up to `WEIGHT_MAX`.
const SIZE_BASE: f32 = 60.0;
const SIZE_SPAN: f32 = 160.0;

/// Spawn kinematics: drift speed and orbit parameters.
const DRIFT_SPEED_LO: f32 = 8.0;
const DRIFT_SPEED_HI: f32 = 30.0;
const ORBIT_RADIUS_LO: f32 = 20.0;
const ORBIT_RADIUS_HI: f32 = FIELD_MARGIN;
const ORBIT_RATE_LO: f32 = 0.1;
const ORBIT_RATE_HI: f32 = 0.6;

/// Border-radius percentages are drawn from this band.
const SHAPE_PCT_LO: f32 = 25.0;
const SHAPE_PCT_HI: f32 = 75.0;

/// How a halo moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MotionModel {
    #[default]
    Drift,
    Orbit,
}

/// Motion speed scale per playback state. Playing runs at full speed;
/// everything else looks progressively dormant.
#[inline]
pub fn speed_multiplier(state: PlaybackState) -> f32 {
    match state {
        PlaybackState::Playing => 1.0,
        PlaybackState::Loading => 0.35,
        PlaybackState::Paused => 0.12,
        PlaybackState::Stopped => 0.05,
    }
}

/// Eight border-radius percentages: horizontal then vertical radii for the
/// four corners, rendered as `a% b% c% d% / e% f% g% h%`.
#[derive(Copy, Clone, Debug)]
pub struct BorderShape {
    pub pct: [f32; 8],
}

impl BorderShape {
    pub fn randomized(rng: &mut impl Rng) -> Self {
        let mut pct = [0.0f32; 8];
        for p in &mut pct {
            *p = rng.gen_range(SHAPE_PCT_LO..=SHAPE_PCT_HI);
        }
        Self { pct }
    }

    /// CSS `border-radius` value for this descriptor.
    pub fn css(&self) -> String {
        format!(
            "{:.0}% {:.0}% {:.0}% {:.0}% / {:.0}% {:.0}% {:.0}% {:.0}%",
            self.pct[0], self.pct[1], self.pct[2], self.pct[3],
            self.pct[4], self.pct[5], self.pct[6], self.pct[7],
        )
    }
}

/// One animated blob tied to an active prompt slot.
#[derive(Clone, Debug)]
pub struct Halo {
    /// Bank slot this halo mirrors; its id is the prompt's id.
    pub slot: usize,
    /// Anchor point: the position itself (drift) or the orbit center.
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    /// Orbit-only phase state; unused under `Drift`.
    angle: f32,
    angular_vel: f32,
    orbit_radius: f32,
    /// Diameter derived from the prompt weight.
    pub size: f32,
    pub color: String,
    pub shape: BorderShape,
}

impl Halo {
    fn spawn(
        slot: usize,
        weight: f32,
        color: String,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let speed = rng.gen_range(DRIFT_SPEED_LO..=DRIFT_SPEED_HI);
        let heading = rng.gen_range(0.0..core::f32::consts::TAU);
        Self {
            slot,
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            vx: speed * heading.cos(),
            vy: speed * heading.sin(),
            angle: rng.gen_range(0.0..core::f32::consts::TAU),
            angular_vel: rng.gen_range(ORBIT_RATE_LO..=ORBIT_RATE_HI)
                * if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            orbit_radius: rng.gen_range(ORBIT_RADIUS_LO..=ORBIT_RADIUS_HI),
            size: size_for(weight),
            color,
            shape: BorderShape::randomized(rng),
        }
    }
}

/// Diameter as a linear function of weight.
#[inline]
fn size_for(weight: f32) -> f32 {
    SIZE_BASE + (weight / WEIGHT_MAX) * SIZE_SPAN
}

/// Wrap a coordinate into [-margin, dim + margin) toroidally.
#[inline]
fn wrap(v: f32, dim: f32, margin: f32) -> f32 {
    let lo = -margin;
    let span = dim + 2.0 * margin;
    let w = (v - lo).rem_euclid(span) + lo;
    // rem_euclid can land exactly on the upper bound through rounding
    if w >= dim + margin {
        lo
    } else {
        w
    }
}

/// The halo field simulator.
pub struct FieldSim {
    width: f32,
    height: f32,
    model: MotionModel,
    halos: Vec<Halo>,
    /// Seconds since the last border-shape regeneration.
    shape_clock: f32,
}

impl FieldSim {
    pub fn new(width: f32, height: f32, model: MotionModel) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            model,
            halos: Vec::with_capacity(BANK_SIZE),
            shape_clock: 0.0,
        }
    }

    /// Resize the container. Existing anchors are left alone; the next wrap
    /// folds them into the new bounds.
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    #[inline]
    pub fn model(&self) -> MotionModel {
        self.model
    }

    #[inline]
    pub fn halos(&self) -> &[Halo] {
        &self.halos
    }

    /// Rendered position of a halo under this simulator's model and bounds,
    /// wrapped so it never leaves [-margin, dimension + margin].
    pub fn position(&self, halo: &Halo) -> (f32, f32) {
        match self.model {
            MotionModel::Drift => (halo.x, halo.y),
            MotionModel::Orbit => (
                wrap(halo.x + halo.orbit_radius * halo.angle.cos(), self.width, FIELD_MARGIN),
                wrap(halo.y + halo.orbit_radius * halo.angle.sin(), self.height, FIELD_MARGIN),
            ),
        }
    }

    /// Advance the field by `dt` seconds of wall-clock time.
    pub fn step(&mut self, dt: f32, playback: PlaybackState, rng: &mut impl Rng) {
        if !(dt > 0.0) {
            return;
        }
        let scale = speed_multiplier(playback);
        for h in &mut self.halos {
            h.x = wrap(h.x + h.vx * scale * dt, self.width, FIELD_MARGIN);
            h.y = wrap(h.y + h.vy * scale * dt, self.height, FIELD_MARGIN);
            if self.model == MotionModel::Orbit {
                h.angle = (h.angle + h.angular_vel * scale * dt) % core::f32::consts::TAU;
            }
        }

        // Shape regeneration runs on its own cadence, independent of motion
        // speed, so the field keeps breathing even when dormant.
        self.shape_clock += dt;
        while self.shape_clock >= SHAPE_CADENCE {
            self.shape_clock -= SHAPE_CADENCE;
            for h in &mut self.halos {
                h.shape = BorderShape::randomized(rng);
            }
        }
    }

    /// Re-derive halo membership from the bank. Gone slots drop, new slots
    /// spawn fresh, surviving slots refresh only size and color.
    pub fn reconcile(&mut self, bank: &PromptBank, rng: &mut impl Rng) {
        self.halos.retain(|h| {
            bank.slot(h.slot).map_or(false, promptfield_core::bank::Prompt::is_active)
        });
        for (slot, prompt) in bank.prompts().iter().enumerate() {
            if !prompt.is_active() {
                continue;
            }
            match self.halos.iter_mut().find(|h| h.slot == slot) {
                Some(h) => {
                    h.size = size_for(prompt.weight);
                    if h.color != prompt.color {
                        h.color = prompt.color.clone();
                    }
                }
                None => {
                    self.halos.push(Halo::spawn(
                        slot,
                        prompt.weight,
                        prompt.color.clone(),
                        self.width,
                        self.height,
                        rng,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptfield_core::bank::{Activation, PromptBank, SlotTemplate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank_with(rng: &mut StdRng, active: &[usize]) -> PromptBank {
        let slots = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("slot {i}"), "#336699"));
        PromptBank::from_slots(slots, Activation::Fixed(active), rng)
    }

    fn active_halo_slots(sim: &FieldSim) -> Vec<usize> {
        let mut slots: Vec<usize> = sim.halos().iter().map(|h| h.slot).collect();
        slots.sort_unstable();
        slots
    }

    #[test]
    fn membership_tracks_active_slots_exactly() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut bank = bank_with(&mut rng, &[0, 5, 9]);
        let mut sim = FieldSim::new(800.0, 600.0, MotionModel::Drift);

        sim.reconcile(&bank, &mut rng);
        assert_eq!(active_halo_slots(&sim), vec![0, 5, 9]);

        bank.set_weight("prompt-5", 0.0);
        bank.set_weight("prompt-12", 1.1);
        sim.reconcile(&bank, &mut rng);
        assert_eq!(active_halo_slots(&sim), vec![0, 9, 12]);
    }

    #[test]
    fn surviving_halos_keep_kinematics_and_refresh_size() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut bank = bank_with(&mut rng, &[3]);
        let mut sim = FieldSim::new(800.0, 600.0, MotionModel::Drift);
        sim.reconcile(&bank, &mut rng);

        sim.step(1.0, PlaybackState::Playing, &mut rng);
        let before = sim.halos()[0].clone();

        bank.set_weight("prompt-3", 1.8);
        sim.reconcile(&bank, &mut rng);
        let after = &sim.halos()[0];

        assert_eq!(sim.position(after), sim.position(&before));
        assert!((after.vx - before.vx).abs() < 1e-6);
        assert!((after.vy - before.vy).abs() < 1e-6);
        assert!(after.size > before.size);
        assert!((after.size - (SIZE_BASE + SIZE_SPAN)).abs() < 1e-3);
    }

    #[test]
    fn drift_positions_stay_inside_the_wrapped_bounds() {
        let mut rng = StdRng::seed_from_u64(33);
        let bank = bank_with(&mut rng, &[0, 1, 2, 3, 8, 9, 14, 15]);
        let mut sim = FieldSim::new(400.0, 300.0, MotionModel::Drift);
        sim.reconcile(&bank, &mut rng);

        for _ in 0..5000 {
            sim.step(0.4, PlaybackState::Playing, &mut rng);
            for h in sim.halos() {
                let (x, y) = sim.position(h);
                assert!((-FIELD_MARGIN..=400.0 + FIELD_MARGIN).contains(&x), "x={x}");
                assert!((-FIELD_MARGIN..=300.0 + FIELD_MARGIN).contains(&y), "y={y}");
            }
        }
    }

    #[test]
    fn orbit_positions_stay_inside_the_wrapped_bounds() {
        let mut rng = StdRng::seed_from_u64(34);
        let bank = bank_with(&mut rng, &[0, 6, 13]);
        let mut sim = FieldSim::new(500.0, 500.0, MotionModel::Orbit);
        sim.reconcile(&bank, &mut rng);

        for _ in 0..5000 {
            sim.step(0.25, PlaybackState::Playing, &mut rng);
            for h in sim.halos() {
                let (x, y) = sim.position(h);
                assert!((-FIELD_MARGIN..=500.0 + FIELD_MARGIN).contains(&x), "x={x}");
                assert!((-FIELD_MARGIN..=500.0 + FIELD_MARGIN).contains(&y), "y={y}");
            }
        }
    }

    #[test]
    fn dormant_states_move_slower_than_playing() {
        let mut rng = StdRng::seed_from_u64(35);
        let bank = bank_with(&mut rng, &[2]);

        let mut playing = FieldSim::new(10_000.0, 10_000.0, MotionModel::Drift);
        playing.reconcile(&bank, &mut rng);
        let mut stopped = FieldSim::new(10_000.0, 10_000.0, MotionModel::Drift);
        // Clone the halo so both fields share identical kinematics.
        stopped.halos = playing.halos.clone();

        let start = playing.position(&playing.halos()[0]);
        playing.step(1.0, PlaybackState::Playing, &mut rng);
        stopped.step(1.0, PlaybackState::Stopped, &mut rng);

        let d_play = dist(start, playing.position(&playing.halos()[0]));
        let d_stop = dist(start, stopped.position(&stopped.halos()[0]));
        assert!(d_play > d_stop * 2.0, "play {d_play} stop {d_stop}");
    }

    #[test]
    fn shapes_regenerate_on_cadence_without_moving_anything() {
        let mut rng = StdRng::seed_from_u64(36);
        let bank = bank_with(&mut rng, &[7]);
        let mut sim = FieldSim::new(800.0, 600.0, MotionModel::Drift);
        sim.reconcile(&bank, &mut rng);

        let shape_before = sim.halos()[0].shape.pct;
        sim.step(SHAPE_CADENCE - 0.5, PlaybackState::Stopped, &mut rng);
        assert_eq!(sim.halos()[0].shape.pct, shape_before, "regenerated early");

        let pos_before = sim.position(&sim.halos()[0]);
        let vel_before = (sim.halos()[0].vx, sim.halos()[0].vy);
        sim.step(1.0, PlaybackState::Stopped, &mut rng);
        let h = &sim.halos()[0];
        assert_ne!(h.shape.pct, shape_before, "cadence missed");
        // Stopped-state drift over one second stays tiny.
        assert!((sim.position(h).0 - pos_before.0).abs() < 2.0);
        assert_eq!((h.vx, h.vy), vel_before);
        for p in h.shape.pct {
            assert!((SHAPE_PCT_LO..=SHAPE_PCT_HI).contains(&p));
        }
    }

    #[test]
    fn border_shape_css_has_the_slash_form() {
        let mut rng = StdRng::seed_from_u64(37);
        let css = BorderShape::randomized(&mut rng).css();
        assert_eq!(css.matches('%').count(), 8);
        assert!(css.contains(" / "));
    }

    fn dist(a: (f32, f32), b: (f32, f32)) -> f32 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }
}

//! C ABI wrapper for the promptfield engine.
//!
//! Exposes a small set of functions to create/destroy an engine, step it
//! with frame deltas, edit weights, drive the auto-pilot, and read halos
//! back for rendering.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `PromptfieldEngine` (heap-allocated; you own/delete it).
//! - Profiles and archetypes are addressed by index into the built-in
//!   tables, so no strings cross the boundary.
//!
//! Threading
//! - The object is NOT thread-safe; call all functions from the same thread.

use promptfield_core::archetype::ARCHETYPES;
use promptfield_engine::profiles::PROFILES;
use promptfield_engine::{
    Engine, EngineConfig, IntervalMode, MotionModel, PlaybackState, ShuffleStyle,
};

/// Opaque engine wrapper we hand to C.
#[repr(C)]
pub struct PromptfieldEngine {
    inner: Engine,
}

/// One halo, flattened for rendering hosts. `rgb` is `0xRRGGBB`; `radii`
/// holds the eight border-radius percentages (horizontal then vertical).
#[repr(C)]
#[derive(Copy, Clone)]
pub struct PfHalo {
    pub slot: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rgb: u32,
    pub radii: [f32; 8],
}

fn playback_from(raw: u32) -> PlaybackState {
    match raw {
        1 => PlaybackState::Loading,
        2 => PlaybackState::Playing,
        3 => PlaybackState::Paused,
        _ => PlaybackState::Stopped,
    }
}

/// Parse `#RRGGBB` into `0xRRGGBB`; anything else renders white.
fn rgb_from_hex(color: &str) -> u32 {
    color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .unwrap_or(0xFF_FF_FF)
}

// --- Creation / destruction -------------------------------------------------------

/// Create a new engine with the default profile. `orbit` selects the orbit
/// motion model (otherwise drift); `seed` fixes the RNG when `use_seed` is
/// nonzero. Returns a non-null pointer on success.
#[no_mangle]
pub extern "C" fn promptfield_create(
    field_width: f32,
    field_height: f32,
    orbit: u32,
    use_seed: u32,
    seed: u64,
) -> *mut PromptfieldEngine {
    let config = EngineConfig {
        field_width,
        field_height,
        motion: if orbit != 0 { MotionModel::Orbit } else { MotionModel::Drift },
        seed: (use_seed != 0).then_some(seed),
        ..EngineConfig::default()
    };
    Box::into_raw(Box::new(PromptfieldEngine { inner: Engine::new(config) }))
}

/// Destroy an engine previously returned by `promptfield_create`.
#[no_mangle]
pub extern "C" fn promptfield_destroy(engine: *mut PromptfieldEngine) {
    if !engine.is_null() {
        unsafe { drop(Box::from_raw(engine)); }
    }
}

// --- Frame loop -------------------------------------------------------------------

/// Advance the engine by `dt` seconds of wall-clock time.
#[no_mangle]
pub extern "C" fn promptfield_tick(engine: *mut PromptfieldEngine, dt: f32) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.tick(dt);
}

/// Push the external session's playback state:
/// 0 = stopped, 1 = loading, 2 = playing, 3 = paused.
#[no_mangle]
pub extern "C" fn promptfield_set_playback(engine: *mut PromptfieldEngine, state: u32) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.set_playback(playback_from(state));
}

/// Resize the visual field container.
#[no_mangle]
pub extern "C" fn promptfield_set_field_bounds(
    engine: *mut PromptfieldEngine,
    width: f32,
    height: f32,
) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.set_field_bounds(width, height);
}

// --- Weights & randomization ------------------------------------------------------

/// Set one slot's weight (clamped to the engine's domain). Slots >= 16 are
/// ignored.
#[no_mangle]
pub extern "C" fn promptfield_set_slot_weight(
    engine: *mut PromptfieldEngine,
    slot: u32,
    weight: f32,
) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.set_slot_weight(slot as usize, weight);
}

/// Read one slot's current weight (0.0 for out-of-range slots).
#[no_mangle]
pub extern "C" fn promptfield_slot_weight(engine: *const PromptfieldEngine, slot: u32) -> f32 {
    if engine.is_null() { return 0.0; }
    let e = unsafe { &*engine };
    e.inner.bank().slot(slot as usize).map_or(0.0, |p| p.weight)
}

/// Apply the coherent-mix randomizer once.
#[no_mangle]
pub extern "C" fn promptfield_randomize(engine: *mut PromptfieldEngine) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.randomize();
}

/// Apply one of the built-in archetypes by index (see
/// `promptfield_archetype_count`); out-of-range indices draw one at random.
#[no_mangle]
pub extern "C" fn promptfield_shuffle_archetype(engine: *mut PromptfieldEngine, index: u32) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    let name = ARCHETYPES.get(index as usize).map(|a| a.name);
    e.inner.shuffle_archetype(name);
}

/// Number of built-in archetypes.
#[no_mangle]
pub extern "C" fn promptfield_archetype_count() -> u32 {
    ARCHETYPES.len() as u32
}

/// Swap in a built-in profile by index (see `promptfield_profile_count`).
/// `preserve_weights` nonzero keeps the current weight vector.
#[no_mangle]
pub extern "C" fn promptfield_set_profile(
    engine: *mut PromptfieldEngine,
    index: u32,
    preserve_weights: u32,
) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    if let Some(profile) = PROFILES.get(index as usize) {
        e.inner.replace_profile(profile.name, preserve_weights != 0);
    }
}

/// Number of built-in profiles.
#[no_mangle]
pub extern "C" fn promptfield_profile_count() -> u32 {
    PROFILES.len() as u32
}

// --- Auto-pilot -------------------------------------------------------------------

/// Engage the auto-pilot (shuffles immediately, then on the interval).
#[no_mangle]
pub extern "C" fn promptfield_autopilot_engage(engine: *mut PromptfieldEngine) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.autopilot_engage();
}

/// Disengage the auto-pilot and cancel the pending shuffle.
#[no_mangle]
pub extern "C" fn promptfield_autopilot_disengage(engine: *mut PromptfieldEngine) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.autopilot_disengage();
}

/// Whether the auto-pilot is currently engaged (1/0).
#[no_mangle]
pub extern "C" fn promptfield_autopilot_is_on(engine: *const PromptfieldEngine) -> u32 {
    if engine.is_null() { return 0; }
    let e = unsafe { &*engine };
    u32::from(e.inner.autopilot_is_on())
}

/// Use a fixed shuffle interval in seconds (clamped to [30, 300]).
#[no_mangle]
pub extern "C" fn promptfield_autopilot_set_fixed_interval(
    engine: *mut PromptfieldEngine,
    seconds: f32,
) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.autopilot_set_interval(IntervalMode::fixed(seconds));
}

/// Draw a fresh random interval every cycle.
#[no_mangle]
pub extern "C" fn promptfield_autopilot_set_random_interval(engine: *mut PromptfieldEngine) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.autopilot_set_interval(IntervalMode::Random);
}

/// Shuffle style per firing: 0 = coherent mix, 1 = random archetype.
#[no_mangle]
pub extern "C" fn promptfield_autopilot_set_style(engine: *mut PromptfieldEngine, style: u32) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.autopilot_set_style(if style != 0 {
        ShuffleStyle::Archetype
    } else {
        ShuffleStyle::Coherent
    });
}

// --- Halo readback ----------------------------------------------------------------

/// Number of live halos (equals the number of active prompts).
#[no_mangle]
pub extern "C" fn promptfield_halo_count(engine: *const PromptfieldEngine) -> u32 {
    if engine.is_null() { return 0; }
    let e = unsafe { &*engine };
    e.inner.halos().len() as u32
}

/// Copy halo `index` into `out`. Returns 1 on success, 0 when the index is
/// out of range or a pointer is null.
#[no_mangle]
pub extern "C" fn promptfield_halo_at(
    engine: *const PromptfieldEngine,
    index: u32,
    out: *mut PfHalo,
) -> u32 {
    if engine.is_null() || out.is_null() {
        return 0;
    }
    let e = unsafe { &*engine };
    let Some(halo) = e.inner.halos().get(index as usize) else {
        return 0;
    };
    let (x, y) = e.inner.field().position(halo);
    unsafe {
        *out = PfHalo {
            slot: halo.slot as u32,
            x,
            y,
            size: halo.size,
            rgb: rgb_from_hex(&halo.color),
            radii: halo.shape.pct,
        };
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_and_halo_readback_round_trip() {
        let e = promptfield_create(800.0, 600.0, 0, 1, 42);
        assert!(!e.is_null());

        promptfield_set_playback(e, 2);
        promptfield_tick(e, 0.016);

        // Default activation gives three halos.
        assert_eq!(promptfield_halo_count(e), 3);
        let mut halo = PfHalo { slot: 0, x: 0.0, y: 0.0, size: 0.0, rgb: 0, radii: [0.0; 8] };
        assert_eq!(promptfield_halo_at(e, 0, &mut halo), 1);
        assert!(halo.size > 0.0);
        assert_eq!(promptfield_halo_at(e, 99, &mut halo), 0);

        promptfield_set_slot_weight(e, 2, 9.0);
        assert!((promptfield_slot_weight(e, 2) - 1.8).abs() < 1e-6);
        assert_eq!(promptfield_halo_count(e), 4);

        promptfield_destroy(e);
    }

    #[test]
    fn null_handles_are_ignored() {
        promptfield_tick(std::ptr::null_mut(), 0.016);
        promptfield_randomize(std::ptr::null_mut());
        assert_eq!(promptfield_halo_count(std::ptr::null()), 0);
        assert_eq!(promptfield_slot_weight(std::ptr::null(), 0), 0.0);
    }

    #[test]
    fn hex_colors_parse_to_packed_rgb() {
        assert_eq!(rgb_from_hex("#FF4500"), 0x00FF_4500);
        assert_eq!(rgb_from_hex("not-a-color"), 0x00FF_FFFF);
    }
}

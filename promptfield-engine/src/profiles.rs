//! Built-in prompt profiles (moods).
//!
//! A profile is 16 text/color templates following the fixed category grid:
//! four beats, two basses, two harmonies, four melodies, four textures. The
//! default is the phonk/lo-fi set; unknown names fall back to it with a
//! warning instead of failing, so a stale config key can't take the mix
//! down.

use log::warn;
use promptfield_core::bank::SlotTemplate;
use promptfield_core::category::{Category, BANK_SIZE};

/// Slots the default profile pre-activates at startup: one beat, one bass,
/// one melody.
pub const DEFAULT_ACTIVE_SLOTS: [usize; 3] = [0, 5, 9];

/// A named set of 16 slot templates.
#[derive(Copy, Clone, Debug)]
pub struct Profile {
    pub name: &'static str,
    /// (text, color) per slot, grid order.
    pub slots: [(&'static str, &'static str); BANK_SIZE],
}

impl Profile {
    /// Owned templates for bank construction.
    pub fn slot_templates(&self) -> impl Iterator<Item = SlotTemplate> + '_ {
        self.slots.iter().map(|(text, color)| SlotTemplate::new(*text, *color))
    }

    /// Template for a single slot; out-of-range asks get an empty text with
    /// the category fallback color.
    pub fn slot_template(&self, slot: usize) -> SlotTemplate {
        match self.slots.get(slot) {
            Some((text, color)) => SlotTemplate::new(*text, *color),
            None => SlotTemplate::new("", Category::of_slot(slot).fallback_color()),
        }
    }
}

/// The default profile: energetic phonk-style lo-fi.
pub const DEFAULT_PROFILE: &str = "phonk-lofi";

pub const PROFILES: &[Profile] = &[
    Profile {
        name: "phonk-lofi",
        slots: [
            // Beats
            ("Hard Phonk Beat", "#FF4500"),
            ("Driving House Beat", "#FF4500"),
            ("Classic Cowbell Loop", "#FF6347"),
            ("Fast Breakbeat", "#FF6347"),
            // Bass
            ("Aggressive Reese Bass", "#9932CC"),
            ("Heavy 808 Bassline", "#9932CC"),
            // Harmony
            ("Muffled Epic Pad", "#00CED1"),
            ("Sidechained Synth Pad", "#00CED1"),
            // Melody
            ("Nostalgic Anime Vocal Chop", "#FFD700"),
            ("Distorted Synth Lead", "#FF1493"),
            ("Gated Reverb Melody", "#FFD700"),
            ("Plucked Koto Riff", "#FF1493"),
            // Textures
            ("Vinyl Scratch FX", "#696969"),
            ("Tape Stop Effect", "#696969"),
            ("Bitcrushed Noise", "#A9A9A9"),
            ("Reverb Drenched Atmosphere", "#A9A9A9"),
        ],
    },
    Profile {
        name: "midnight-jazz",
        slots: [
            ("Brushed Snare Shuffle", "#B22222"),
            ("Laid-back Rim Click Groove", "#B22222"),
            ("Slow Blues Shuffle", "#CD5C5C"),
            ("Half-time Swing Beat", "#CD5C5C"),
            ("Walking Upright Bass", "#6A0DAD"),
            ("Sub-heavy Double Bass Drone", "#6A0DAD"),
            ("Smoky Rhodes Chords", "#20B2AA"),
            ("Late-night Organ Swells", "#20B2AA"),
            ("Muted Trumpet Phrase", "#DAA520"),
            ("Breathy Tenor Sax Line", "#C71585"),
            ("Sparse Piano Voicings", "#DAA520"),
            ("Vibraphone Shimmer", "#C71585"),
            ("Rainy Street Ambience", "#708090"),
            ("Crackling Vinyl Hiss", "#708090"),
            ("Distant Crowd Murmur", "#A9A9A9"),
            ("Tape Saturated Room Tone", "#A9A9A9"),
        ],
    },
    Profile {
        name: "forest-dawn",
        slots: [
            ("Soft Hand Percussion", "#8B4513"),
            ("Heartbeat Kick Pulse", "#8B4513"),
            ("Wooden Shaker Pattern", "#A0522D"),
            ("Frame Drum Cycle", "#A0522D"),
            ("Deep Earthy Drone Bass", "#4B0082"),
            ("Slow Sub Swells", "#4B0082"),
            ("Glassy Pad Choir", "#2E8B57"),
            ("Sunrise String Harmonics", "#2E8B57"),
            ("Kalimba Sparkle", "#9ACD32"),
            ("Bamboo Flute Call", "#FF8C00"),
            ("Music Box Fragments", "#9ACD32"),
            ("Bowed Glass Melody", "#FF8C00"),
            ("Morning Birdsong", "#556B2F"),
            ("Wind Through Leaves", "#556B2F"),
            ("Creek Water Texture", "#8FBC8F"),
            ("Low Fog Rumble", "#8FBC8F"),
        ],
    },
];

/// Look up a profile by name, case-insensitive.
pub fn find(name: &str) -> Option<&'static Profile> {
    let n = name.trim();
    PROFILES.iter().find(|p| p.name.eq_ignore_ascii_case(n))
}

/// Look up a profile, falling back to the default on an unknown name.
pub fn find_or_default(name: &str) -> &'static Profile {
    match find(name) {
        Some(p) => p,
        None => {
            warn!("unknown profile {name:?}, using {DEFAULT_PROFILE}");
            &PROFILES[0]
        }
    }
}

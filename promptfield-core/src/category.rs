//! The fixed category partition of the 16-slot prompt bank.
//!
//! The bank is laid out as a 4x4 grid and split into five contiguous slot
//! ranges. The partition is static: weights change constantly, category
//! membership never does. Keeping this as a closed enum plus a const table
//! (instead of string keys) means a bad category can't exist at runtime.
//!
//! Layout:
//! - `Beat`    : slots 0..4
//! - `Bass`    : slots 4..6
//! - `Harmony` : slots 6..8
//! - `Melody`  : slots 8..12
//! - `Texture` : slots 12..16

use core::ops::Range;

/// Number of prompt slots in a bank. Fixed for the life of the process.
pub const BANK_SIZE: usize = 16;

/// Musical role of a slot range within the bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Beat,
    Bass,
    Harmony,
    Melody,
    Texture,
}

/// Static per-category data: slot range and the color used when a slot has
/// no profile-provided color of its own.
#[derive(Copy, Clone, Debug)]
pub struct CategoryInfo {
    pub category: Category,
    pub label: &'static str,
    pub slot_start: usize,
    pub slot_end: usize,
    pub fallback_color: &'static str,
}

/// The partition table. Ranges are contiguous, non-overlapping, and cover
/// exactly `0..BANK_SIZE`.
pub const CATEGORY_TABLE: [CategoryInfo; 5] = [
    CategoryInfo { category: Category::Beat,    label: "beat",    slot_start: 0,  slot_end: 4,  fallback_color: "#FF4500" },
    CategoryInfo { category: Category::Bass,    label: "bass",    slot_start: 4,  slot_end: 6,  fallback_color: "#9932CC" },
    CategoryInfo { category: Category::Harmony, label: "harmony", slot_start: 6,  slot_end: 8,  fallback_color: "#00CED1" },
    CategoryInfo { category: Category::Melody,  label: "melody",  slot_start: 8,  slot_end: 12, fallback_color: "#FFD700" },
    CategoryInfo { category: Category::Texture, label: "texture", slot_start: 12, slot_end: 16, fallback_color: "#A9A9A9" },
];

impl Category {
    /// All categories in slot order.
    pub const ALL: [Category; 5] = [
        Category::Beat,
        Category::Bass,
        Category::Harmony,
        Category::Melody,
        Category::Texture,
    ];

    /// Index into tables ordered like [`Category::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Category::Beat => 0,
            Category::Bass => 1,
            Category::Harmony => 2,
            Category::Melody => 3,
            Category::Texture => 4,
        }
    }

    #[inline]
    fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self.index()]
    }

    /// Slot range owned by this category within the bank.
    #[inline]
    pub fn slots(self) -> Range<usize> {
        let i = self.info();
        i.slot_start..i.slot_end
    }

    /// Number of slots owned by this category.
    #[inline]
    pub fn slot_count(self) -> usize {
        let i = self.info();
        i.slot_end - i.slot_start
    }

    /// Lowercase display label ("beat", "bass", ...).
    #[inline]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Color used when a slot template carries none.
    #[inline]
    pub fn fallback_color(self) -> &'static str {
        self.info().fallback_color
    }

    /// Category owning a given bank slot. Slots outside `0..BANK_SIZE` fold
    /// into `Texture` (the last range); callers index with valid slots.
    #[inline]
    pub fn of_slot(slot: usize) -> Category {
        for info in &CATEGORY_TABLE {
            if slot < info.slot_end {
                return info.category;
            }
        }
        Category::Texture
    }

    /// Parse a display label back into a category. Matching is
    /// case-insensitive; anything unrecognized is `None`.
    pub fn from_label(label: &str) -> Option<Category> {
        let l = label.trim();
        CATEGORY_TABLE
            .iter()
            .find(|info| info.label.eq_ignore_ascii_case(l))
            .map(|info| info.category)
    }
}

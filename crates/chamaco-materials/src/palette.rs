//! The studio's named color palette.
//!
//! Scene code refers to colors by token (`"soft_red"`, `"turquoise"`, ...).
//! Lookups are total: an unknown token resolves to [`FALLBACK_COLOR`] so a
//! typo shows up as a visibly wrong color instead of a failed scene.

use crate::color::Color;

/// Token used when a name is not in the palette.
pub const FALLBACK_TOKEN: &str = "soft_red";

/// Color returned by [`resolve`] for unknown tokens (`soft_red`, `#FF6B6B`).
pub const FALLBACK_COLOR: Color = Color::from_hex(0xFF6B6B);

/// Every palette entry, grouped as primaries, supporting colors and neutrals.
const PALETTE: &[(&str, Color)] = &[
    ("soft_red", Color::from_hex(0xFF6B6B)),
    ("turquoise", Color::from_hex(0x4ECDC4)),
    ("sage_green", Color::from_hex(0x96CEB4)),
    ("soft_yellow", Color::from_hex(0xFFEAA7)),
    ("plum", Color::from_hex(0xDDA0DD)),
    ("terracotta", Color::from_hex(0xD4856A)),
    ("cream", Color::from_hex(0xFFF5E6)),
    ("deep_blue", Color::from_hex(0x2C5F7C)),
    ("sand", Color::from_hex(0xF4E4C1)),
    ("ocean_blue", Color::from_hex(0x0077BE)),
    ("coral", Color::from_hex(0xFF7F50)),
    ("seafoam", Color::from_hex(0x93E5AB)),
    ("white", Color::from_hex(0xF8F8F8)),
    ("light_gray", Color::from_hex(0xE8E8E8)),
    ("medium_gray", Color::from_hex(0xB0B0B0)),
    ("dark_gray", Color::from_hex(0x404040)),
];

/// Look up a token, returning `None` if it is not in the palette.
pub fn lookup(name: &str) -> Option<Color> {
    PALETTE
        .iter()
        .find(|(token, _)| *token == name)
        .map(|&(_, color)| color)
}

/// Resolve a token to its color, or [`FALLBACK_COLOR`] if unknown.
pub fn resolve(name: &str) -> Color {
    lookup(name).unwrap_or(FALLBACK_COLOR)
}

/// Iterate over all `(token, color)` pairs in palette order.
pub fn tokens() -> impl Iterator<Item = (&'static str, Color)> {
    PALETTE.iter().copied()
}

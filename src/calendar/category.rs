//! Fixed category table for manual events.

/// Categories offered by the event form, with their display colors.
pub const CATEGORIES: [(&str, &str); 6] = [
    ("Culto/Missa", "#FF4B4B"),
    ("Batizado", "#7FB3D5"),
    ("Reunião", "#3D9DF3"),
    ("Ensaio", "#FFA500"),
    ("Social", "#28a745"),
    ("Outros", "#7D3C98"),
];

/// Label used when a stored row carries no category.
pub const DEFAULT_CATEGORY: &str = "Geral";

pub const LITURGICAL_CATEGORY: &str = "Liturgia";

pub const DEFAULT_COLOR: &str = "#3D9DF3";

pub fn color_for(category: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Index of `category` in [`CATEGORIES`], if it is one of the offered ones.
pub fn position(category: &str) -> Option<usize> {
    CATEGORIES.iter().position(|(name, _)| *name == category)
}

//! Difficulty keyword detection.

use crate::task::Difficulty;

/// First level of [`Difficulty::ALL`] named anywhere in the text.
///
/// Matching is by substring and list order, not position: a text naming
/// both "hard" and "easy" is easy.
pub fn extract_difficulty(text: &str) -> Difficulty {
    let lower = text.to_lowercase();
    Difficulty::ALL
        .into_iter()
        .find(|level| lower.contains(level.as_str()))
        .unwrap_or_default()
}

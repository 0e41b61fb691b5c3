use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::fmt::Display;

use crate::error::AppError;

/// Number of explanation layers produced per distillation
pub const LAYER_COUNT: usize = 4;

const SNIPPET_CHARS: usize = 60;

/// Difficulty tier of an explanation, from 0 (simple) to 3 (expert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

impl Layer {
    pub const SIMPLEST: Layer = Layer(0);
    pub const EXPERT: Layer = Layer((LAYER_COUNT - 1) as u8);

    /// Returns `None` when the index is outside `0..LAYER_COUNT`
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < LAYER_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The next easier layer, or `None` at the floor
    pub fn simpler(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// The next harder layer, or `None` at the ceiling
    pub fn harder(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn all() -> impl Iterator<Item = Layer> {
        (0..LAYER_COUNT as u8).map(Self)
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Layer {
    type Error = AppError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
            .ok_or_else(|| AppError::InvalidInput(format!("layer {} is out of range", index)))
    }
}

impl TryFrom<i64> for Layer {
    type Error = AppError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        u8::try_from(index)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| AppError::Internal(format!("stored layer {} is out of range", index)))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.0
    }
}

impl From<Layer> for i64 {
    fn from(layer: Layer) -> Self {
        layer.0 as i64
    }
}

/// A distilled text and its four explanation layers, owned by one student
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub id: i64,
    pub student_id: i64,
    pub raw_text: String,
    pub layers: [String; LAYER_COUNT],
}

impl Content {
    pub fn layer_text(&self, layer: Layer) -> &str {
        &self.layers[layer.index()]
    }

    /// Leading characters of the raw text, for dashboard listings
    pub fn snippet(&self) -> String {
        self.raw_text.chars().take(SNIPPET_CHARS).collect()
    }
}

/// Row shape of the `content` table
#[derive(Debug, FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub student_id: i64,
    pub raw_text: String,
    pub layer0: String,
    pub layer1: String,
    pub layer2: String,
    pub layer3: String,
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Content {
            id: row.id,
            student_id: row.student_id,
            raw_text: row.raw_text,
            layers: [row.layer0, row.layer1, row.layer2, row.layer3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_bounds() {
        assert_eq!(Layer::new(0), Some(Layer::SIMPLEST));
        assert_eq!(Layer::new(3), Some(Layer::EXPERT));
        assert_eq!(Layer::new(4), None);
    }

    #[test]
    fn test_layer_neighbours_clamp_at_edges() {
        assert_eq!(Layer::SIMPLEST.simpler(), None);
        assert_eq!(Layer::EXPERT.harder(), None);
        assert_eq!(Layer::SIMPLEST.harder(), Layer::new(1));
        assert_eq!(Layer::EXPERT.simpler(), Layer::new(2));
    }

    #[test]
    fn test_layer_serde_rejects_out_of_range() {
        let layer: Layer = serde_json::from_str("2").unwrap();
        assert_eq!(layer.index(), 2);
        assert!(serde_json::from_str::<Layer>("7").is_err());
        assert_eq!(serde_json::to_string(&Layer::EXPERT).unwrap(), "3");
    }

    #[test]
    fn test_stored_layer_conversion() {
        assert_eq!(Layer::try_from(1_i64).unwrap().index(), 1);
        assert!(Layer::try_from(-1_i64).is_err());
        assert!(Layer::try_from(300_i64).is_err());
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let content = Content {
            id: 1,
            student_id: 1,
            raw_text: "é".repeat(100),
            layers: Default::default(),
        };
        assert_eq!(content.snippet().chars().count(), 60);
    }

    #[test]
    fn test_content_row_maps_layers_in_order() {
        let row = ContentRow {
            id: 7,
            student_id: 2,
            raw_text: "photosynthesis".to_string(),
            layer0: "zero".to_string(),
            layer1: "one".to_string(),
            layer2: "two".to_string(),
            layer3: "three".to_string(),
        };
        let content: Content = row.into();
        assert_eq!(content.layer_text(Layer::SIMPLEST), "zero");
        assert_eq!(content.layer_text(Layer::EXPERT), "three");
    }
}

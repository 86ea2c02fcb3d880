//! Entity types targeted by coverage generation and the per-type
//! aspect-ratio policy.

use serde::{Deserialize, Serialize};

use crate::types::{ArtifactRef, Id};

// ---------------------------------------------------------------------------
// Aspect ratio policy
// ---------------------------------------------------------------------------

/// Aspect ratio used for location coverage (wide / cinematic).
pub const ASPECT_WIDE: &str = "16:9";

/// Aspect ratio used for character and product coverage (square).
pub const ASPECT_SQUARE: &str = "1:1";

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of record that coverage or variant generation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Character,
    Location,
    Product,
}

impl EntityType {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Location => "Location",
            Self::Product => "Product",
        }
    }

    /// Fixed aspect ratio for coverage shots of this entity type.
    ///
    /// Locations render wide; characters and products render square.
    /// This is a static policy, not caller-configurable.
    pub fn coverage_aspect_ratio(self) -> &'static str {
        match self {
            Self::Location => ASPECT_WIDE,
            Self::Character | Self::Product => ASPECT_SQUARE,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A character, location, or product record as seen by the pipeline.
///
/// Only the fields the orchestrator needs to build generation requests are
/// carried here; the surrounding application owns the full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Id,
    /// Display name, used verbatim in prompt composition.
    pub name: String,
    /// Descriptive prompt fragment stored on the entity (may be empty).
    pub prompt_fragment: String,
    /// Existing reference artifacts attached to the entity. Passed through to
    /// the remote generator for visual consistency, never validated here.
    pub reference_artifacts: Vec<ArtifactRef>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_render_wide() {
        assert_eq!(EntityType::Location.coverage_aspect_ratio(), ASPECT_WIDE);
    }

    #[test]
    fn characters_and_products_render_square() {
        assert_eq!(EntityType::Character.coverage_aspect_ratio(), ASPECT_SQUARE);
        assert_eq!(EntityType::Product.coverage_aspect_ratio(), ASPECT_SQUARE);
    }

    #[test]
    fn labels_are_non_empty() {
        for t in [EntityType::Character, EntityType::Location, EntityType::Product] {
            assert!(!t.label().is_empty());
        }
    }
}

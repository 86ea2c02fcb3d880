//! Coverage pack catalog.
//!
//! A pack is a static, named list of shot specifications defining what a
//! coverage run should produce for one entity. Packs are read-only reference
//! data: never created or destroyed at runtime. The catalog ships with the
//! stock packs the studio app offers and accepts caller-supplied packs for
//! custom catalogs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Shot categories
// ---------------------------------------------------------------------------

/// Identity / turnaround shots (front, profile, back).
pub const CATEGORY_IDENTITY: &str = "identity";
/// Framing coverage (close-up, medium, wide).
pub const CATEGORY_FRAMING: &str = "framing";
/// Environmental / establishing shots.
pub const CATEGORY_ENVIRONMENT: &str = "environment";
/// Detail and texture shots.
pub const CATEGORY_DETAIL: &str = "detail";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One shot specification inside a pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotSpec {
    /// Shot type, e.g. `"portrait"`, `"establishing"`.
    pub shot_type: String,
    /// Short angle label, e.g. `"Front"`, `"Side Profile"`.
    pub angle_label: String,
    /// Descriptive text folded into the generation prompt.
    pub description: String,
    /// Grouping category (one of the `CATEGORY_*` constants).
    pub category: String,
}

/// A static, named catalog entry enumerating the shots of one coverage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub id: String,
    pub name: String,
    /// Entity types this pack applies to.
    pub applicable_entity_types: Vec<EntityType>,
    pub shot_specs: Vec<ShotSpec>,
}

impl Pack {
    /// Whether this pack can be run against the given entity type.
    pub fn applies_to(&self, entity_type: EntityType) -> bool {
        self.applicable_entity_types.contains(&entity_type)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read-only lookup from pack id to pack definition.
#[derive(Debug, Clone)]
pub struct PackCatalog {
    packs: HashMap<String, Pack>,
}

impl PackCatalog {
    /// Catalog holding the built-in stock packs.
    pub fn builtin() -> Self {
        Self::with_packs(builtin_packs())
    }

    /// Catalog holding caller-supplied packs (replaces the stock set).
    pub fn with_packs(packs: Vec<Pack>) -> Self {
        Self {
            packs: packs.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Resolve a pack by id.
    ///
    /// Fails with [`CoreError::PackNotFound`] for unknown ids and with
    /// [`CoreError::Validation`] for a pack with an empty shot list, so
    /// callers can fail fast before dispatching anything.
    pub fn resolve(&self, pack_id: &str) -> Result<&Pack, CoreError> {
        let pack = self
            .packs
            .get(pack_id)
            .ok_or_else(|| CoreError::PackNotFound(pack_id.to_string()))?;
        if pack.shot_specs.is_empty() {
            return Err(CoreError::Validation(format!(
                "Pack '{pack_id}' has no shot specs"
            )));
        }
        Ok(pack)
    }

    /// All packs applicable to an entity type, sorted by id.
    pub fn packs_for(&self, entity_type: EntityType) -> Vec<&Pack> {
        let mut packs: Vec<&Pack> = self
            .packs
            .values()
            .filter(|p| p.applies_to(entity_type))
            .collect();
        packs.sort_by(|a, b| a.id.cmp(&b.id));
        packs
    }
}

// ---------------------------------------------------------------------------
// Built-in packs
// ---------------------------------------------------------------------------

fn spec(shot_type: &str, angle: &str, description: &str, category: &str) -> ShotSpec {
    ShotSpec {
        shot_type: shot_type.to_string(),
        angle_label: angle.to_string(),
        description: description.to_string(),
        category: category.to_string(),
    }
}

/// The stock packs shipped with the studio application.
pub fn builtin_packs() -> Vec<Pack> {
    vec![
        Pack {
            id: "turnaround".to_string(),
            name: "Character Turnaround".to_string(),
            applicable_entity_types: vec![EntityType::Character],
            shot_specs: vec![
                spec(
                    "portrait",
                    "Front",
                    "facing the camera directly, neutral expression, full figure visible",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "portrait",
                    "Side Profile",
                    "perfect side profile view, standing upright, full figure visible",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "portrait",
                    "Back",
                    "viewed directly from behind, standing upright, full figure visible",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "portrait",
                    "Three-Quarter",
                    "three-quarter view, head turned slightly toward camera",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "close-up",
                    "Face Close-Up",
                    "tight close-up of the face, sharp focus on the eyes",
                    CATEGORY_FRAMING,
                ),
            ],
        },
        Pack {
            id: "location-establishing".to_string(),
            name: "Location Establishing Set".to_string(),
            applicable_entity_types: vec![EntityType::Location],
            shot_specs: vec![
                spec(
                    "establishing",
                    "Wide Establishing",
                    "sweeping wide establishing shot showing the full environment",
                    CATEGORY_ENVIRONMENT,
                ),
                spec(
                    "establishing",
                    "Entrance",
                    "view of the main entrance or approach",
                    CATEGORY_ENVIRONMENT,
                ),
                spec(
                    "interior",
                    "Interior Wide",
                    "wide interior view from the main vantage point",
                    CATEGORY_ENVIRONMENT,
                ),
                spec(
                    "detail",
                    "Texture Detail",
                    "close detail of characteristic surfaces and materials",
                    CATEGORY_DETAIL,
                ),
            ],
        },
        Pack {
            id: "product-hero".to_string(),
            name: "Product Hero Set".to_string(),
            applicable_entity_types: vec![EntityType::Product],
            shot_specs: vec![
                spec(
                    "hero",
                    "Hero Front",
                    "hero shot, product centered on a clean studio background",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "hero",
                    "Three-Quarter",
                    "three-quarter hero angle showing depth and form",
                    CATEGORY_IDENTITY,
                ),
                spec(
                    "detail",
                    "Macro Detail",
                    "macro detail of the defining feature or material",
                    CATEGORY_DETAIL,
                ),
            ],
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

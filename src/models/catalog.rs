//! Crop catalog
//!
//! Static lookup tables that map a crop name to its category and a growth
//! stage name to its display info. The catalog is an immutable value handed
//! to the storage layer at construction. Entries copy the resolved labels at
//! write time, so editing the catalog later never relabels existing entries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};

/// Category snapshot stored on each entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CropCategory {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// Growth stage snapshot stored on each entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GrowthStageInfo {
    pub key: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

/// A category row in the catalog, with the crops that belong to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub crops: Vec<String>,
}

impl CategoryDefinition {
    fn snapshot(&self) -> CropCategory {
        CropCategory {
            key: self.key.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }

    fn contains(&self, crop: &str) -> bool {
        self.crops.iter().any(|c| c.eq_ignore_ascii_case(crop))
    }
}

/// Crop and growth stage lookup tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCatalog {
    pub categories: Vec<CategoryDefinition>,
    pub stages: Vec<GrowthStageInfo>,
    /// Category used when a crop matches no row
    pub fallback_category: CropCategory,
}

impl CropCatalog {
    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> JournalResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JournalError::Config(format!(
                "Failed to read crop catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            JournalError::Config(format!(
                "Failed to parse crop catalog {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolve the category for a crop name
    ///
    /// An exact (case-insensitive) crop match wins. Otherwise any listed crop
    /// appearing as a word of the name counts, so "cherry tomato" lands with
    /// "tomato".
    pub fn resolve_category(&self, crop_type: &str) -> CropCategory {
        let crop = crop_type.trim();

        if let Some(def) = self.categories.iter().find(|d| d.contains(crop)) {
            return def.snapshot();
        }

        let words: Vec<String> = crop
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        self.categories
            .iter()
            .find(|d| {
                d.crops
                    .iter()
                    .any(|c| words.iter().any(|w| w == &c.to_lowercase()))
            })
            .map(CategoryDefinition::snapshot)
            .unwrap_or_else(|| self.fallback_category.clone())
    }

    /// Resolve display info for a growth stage, matching key or name
    pub fn resolve_stage(&self, growth_stage: &str) -> GrowthStageInfo {
        let stage = growth_stage.trim();

        if let Some(info) = self
            .stages
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(stage) || s.name.eq_ignore_ascii_case(stage))
        {
            return info.clone();
        }

        if stage.is_empty() {
            return GrowthStageInfo {
                key: "unknown".into(),
                name: "Unknown".into(),
                icon: "❓".into(),
                description: String::new(),
            };
        }

        GrowthStageInfo {
            key: stage.to_lowercase(),
            name: stage.to_string(),
            icon: "🌿".into(),
            description: String::new(),
        }
    }
}

fn category(key: &str, name: &str, icon: &str, color: &str, crops: &[&str]) -> CategoryDefinition {
    CategoryDefinition {
        key: key.into(),
        name: name.into(),
        icon: icon.into(),
        color: color.into(),
        crops: crops.iter().map(|c| c.to_string()).collect(),
    }
}

fn stage(key: &str, name: &str, icon: &str, description: &str) -> GrowthStageInfo {
    GrowthStageInfo {
        key: key.into(),
        name: name.into(),
        icon: icon.into(),
        description: description.into(),
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self {
            categories: vec![
                category(
                    "vegetables",
                    "Vegetables",
                    "🥬",
                    "#28a745",
                    &[
                        "lettuce", "spinach", "cabbage", "kale", "carrot", "potato", "onion",
                        "garlic", "broccoli", "cauliflower", "cucumber", "zucchini", "squash",
                        "pumpkin", "radish", "beet", "eggplant", "pepper", "okra",
                    ],
                ),
                category(
                    "fruits",
                    "Fruits",
                    "🍅",
                    "#dc3545",
                    &[
                        "tomato",
                        "strawberry",
                        "melon",
                        "watermelon",
                        "apple",
                        "banana",
                        "mango",
                        "grape",
                        "citrus",
                        "papaya",
                    ],
                ),
                category(
                    "grains",
                    "Grains",
                    "🌾",
                    "#ffc107",
                    &["corn", "maize", "wheat", "rice", "barley", "oats", "sorghum", "millet"],
                ),
                category(
                    "legumes",
                    "Legumes",
                    "🫘",
                    "#8b5a2b",
                    &["beans", "bean", "peas", "pea", "lentils", "chickpea", "soybean", "peanut"],
                ),
                category(
                    "herbs",
                    "Herbs",
                    "🌿",
                    "#20c997",
                    &["basil", "mint", "parsley", "cilantro", "rosemary", "thyme", "oregano", "dill", "sage"],
                ),
                category(
                    "flowers",
                    "Flowers",
                    "🌻",
                    "#e83e8c",
                    &["sunflower", "marigold", "nasturtium", "lavender", "zinnia", "calendula"],
                ),
            ],
            stages: vec![
                stage("seed", "Seed", "🌰", "Seed sown, not yet germinated"),
                stage("seedling", "Seedling", "🌱", "First true leaves emerging"),
                stage("vegetative", "Vegetative", "🌿", "Leaf and stem growth"),
                stage("flowering", "Flowering", "🌸", "Buds and blossoms forming"),
                stage("fruiting", "Fruiting", "🍅", "Fruit set and development"),
                stage("harvest", "Harvest", "🧺", "Ready or being harvested"),
                stage("dormant", "Dormant", "💤", "Resting period"),
            ],
            fallback_category: CropCategory {
                key: "other".into(),
                name: "Other".into(),
                icon: "🌱".into(),
                color: "#6c757d".into(),
            },
        }
    }
}

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::jewelry_item::{JewelryItem, JewelryKind};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate jewelry id '{0}'")]
    DuplicateId(String),
    #[error("jewelry '{id}' has non-positive aspect ratio {aspect_ratio}")]
    InvalidAspectRatio { id: String, aspect_ratio: f64 },
}

/// Static `category -> variant -> item` mapping.
///
/// Items are referenced by id everywhere else; ids are unique across
/// categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JewelryCatalog {
    categories: BTreeMap<String, BTreeMap<String, JewelryItem>>,
}

impl JewelryCatalog {
    pub fn new(
        categories: BTreeMap<String, BTreeMap<String, JewelryItem>>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The assets shipped with the application.
    pub fn builtin() -> Self {
        let entry = |variant: &str, item: JewelryItem| (variant.to_string(), item);
        let categories = BTreeMap::from([
            (
                "earrings".to_string(),
                BTreeMap::from([
                    entry(
                        "diamond",
                        JewelryItem::new("ear1", "public/jwellery/ear1.png", JewelryKind::Earrings),
                    ),
                    entry(
                        "pearl",
                        JewelryItem::new("ear2", "public/jwellery/ear2.png", JewelryKind::Earrings),
                    ),
                ]),
            ),
            (
                "necklaces".to_string(),
                BTreeMap::from([
                    entry(
                        "gold",
                        JewelryItem::new(
                            "necklace1",
                            "public/jwellery/necklace1.png",
                            JewelryKind::Necklace,
                        ),
                    ),
                    entry(
                        "silver",
                        JewelryItem::new(
                            "necklace2",
                            "public/jwellery/necklace2.png",
                            JewelryKind::Necklace,
                        ),
                    ),
                ]),
            ),
            (
                "bangles".to_string(),
                BTreeMap::from([entry(
                    "classic",
                    JewelryItem::new("bangle1", "public/jwellery/bangle1.png", JewelryKind::Bangle),
                )]),
            ),
            (
                "rings".to_string(),
                BTreeMap::from([entry(
                    "band",
                    JewelryItem::new("ring1", "public/jwellery/ring1.png", JewelryKind::Ring),
                )]),
            ),
        ]);
        Self { categories }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: JewelryCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn find(&self, id: &str) -> Option<&JewelryItem> {
        self.items().find(|item| item.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &JewelryItem> {
        self.categories.values().flat_map(|variants| variants.values())
    }

    pub fn items_of(&self, kind: JewelryKind) -> impl Iterator<Item = &JewelryItem> {
        self.items().filter(move |item| item.kind == kind)
    }

    pub fn categories(&self) -> &BTreeMap<String, BTreeMap<String, JewelryItem>> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for item in self.items() {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
            if item.aspect_ratio <= 0.0 || !item.aspect_ratio.is_finite() {
                return Err(CatalogError::InvalidAspectRatio {
                    id: item.id.clone(),
                    aspect_ratio: item.aspect_ratio,
                });
            }
        }
        Ok(())
    }
}

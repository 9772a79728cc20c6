use serde::{Deserialize, Serialize};

use crate::entities::sneaker::clamped_confidence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOutfitItem")]
pub struct OutfitItem {
    pub name: String,
    /// True when the piece comes from the user's own wardrobe.
    pub owned: bool,
}

/// Generators answer either with `{name, owned}` objects or with bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOutfitItem {
    Detailed {
        name: String,
        #[serde(default)]
        owned: bool,
    },
    Plain(String),
}

impl From<RawOutfitItem> for OutfitItem {
    fn from(raw: RawOutfitItem) -> Self {
        match raw {
            RawOutfitItem::Detailed { name, owned } => OutfitItem { name, owned },
            RawOutfitItem::Plain(name) => OutfitItem { name, owned: false },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub items: Vec<OutfitItem>,
    #[serde(default, deserialize_with = "clamped_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Envelope returned by the suggestion generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub outfits: Vec<OutfitSuggestion>,
}

impl SuggestionSet {
    pub fn into_capped(self, max: usize) -> Vec<OutfitSuggestion> {
        let mut outfits = self.outfits;
        outfits.truncate(max);
        outfits
    }
}

use serde::{Deserialize, Serialize};

/// What the vision model made of an uploaded sneaker photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SneakerAnalysis {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub style: String,
    #[serde(default = "default_confidence", deserialize_with = "clamped_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

/// Models occasionally answer with a percentage or a stray negative.
pub(crate) fn clamped_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(normalize_confidence(raw))
}

pub(crate) fn normalize_confidence(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    let looks_like_percent = raw > 1.0 && raw <= 100.0 && raw.fract() == 0.0;
    let scaled = if looks_like_percent { raw / 100.0 } else { raw };
    scaled.clamp(0.0, 1.0)
}

impl SneakerAnalysis {
    /// Substituted whenever analysis fails, times out or comes back unusable.
    pub fn fallback() -> Self {
        SneakerAnalysis {
            brand: "Unknown".to_string(),
            model: "Sneaker".to_string(),
            colors: vec!["white".to_string()],
            style: "casual".to_string(),
            confidence: 0.5,
        }
    }

    /// A result without a brand carries nothing worth styling around.
    pub fn is_usable(&self) -> bool {
        !self.brand.trim().is_empty()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand.trim(), self.model.trim()).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_the_fixed_literal() {
        let fallback = SneakerAnalysis::fallback();
        assert_eq!(
            serde_json::to_value(&fallback).unwrap(),
            serde_json::json!({
                "brand": "Unknown",
                "model": "Sneaker",
                "colors": ["white"],
                "style": "casual",
                "confidence": 0.5
            })
        );
    }

    #[test]
    fn missing_brand_is_not_usable() {
        let parsed: SneakerAnalysis =
            serde_json::from_str(r#"{"model": "Samba", "colors": ["black"]}"#).unwrap();
        assert!(!parsed.is_usable());

        let blank: SneakerAnalysis = serde_json::from_str(r#"{"brand": "  "}"#).unwrap();
        assert!(!blank.is_usable());
    }

    #[test]
    fn confidence_is_normalized_into_unit_range() {
        let percent: SneakerAnalysis =
            serde_json::from_str(r#"{"brand": "Nike", "confidence": 87}"#).unwrap();
        assert!((percent.confidence - 0.87).abs() < f64::EPSILON);

        let negative: SneakerAnalysis =
            serde_json::from_str(r#"{"brand": "Nike", "confidence": -0.2}"#).unwrap();
        assert_eq!(negative.confidence, 0.0);
    }

    #[test]
    fn only_whole_percentages_are_rescaled() {
        assert_eq!(normalize_confidence(1.5), 1.0);
        assert_eq!(normalize_confidence(87.5), 1.0);
        assert_eq!(normalize_confidence(250.0), 1.0);
        assert_eq!(normalize_confidence(1.0), 1.0);
        assert!((normalize_confidence(100.0) - 1.0).abs() < f64::EPSILON);
        assert!((normalize_confidence(2.0) - 0.02).abs() < f64::EPSILON);
        assert_eq!(normalize_confidence(f64::NAN), 0.0);
    }

    #[test]
    fn display_name_joins_brand_and_model() {
        let analysis = SneakerAnalysis {
            brand: "Nike".into(),
            model: "Air Jordan 1 Low".into(),
            ..SneakerAnalysis::fallback()
        };
        assert_eq!(analysis.display_name(), "Nike Air Jordan 1 Low");
    }
}

use crate::errors::{ContentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

fn default_allocation() -> u8 {
    100
}

/// One arm of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTestVariant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Relative share of included users; only ratios between variants matter
    pub weight: u32,
    /// Content delivered to users in this variant
    #[serde(default)]
    pub content: Value,
}

/// Experiment definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub variants: Vec<AbTestVariant>,
    /// Percentage of users included in the test, 0..=100
    #[serde(default = "default_allocation")]
    pub traffic_allocation: u8,
}

impl AbTest {
    pub fn variant(&self, id: &str) -> Option<&AbTestVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    pub fn total_weight(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.weight)).sum()
    }

    /// Check the definition can be used for bucketing
    ///
    /// # Errors
    ///
    /// `InvalidExperiment` when the id is empty, allocation exceeds 100, there
    /// are no variants, variant ids are empty or repeated, or every weight is 0.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ContentError::InvalidExperiment {
            test_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("test id must not be empty"));
        }
        if self.traffic_allocation > 100 {
            return Err(invalid("trafficAllocation must be between 0 and 100"));
        }
        if self.variants.is_empty() {
            return Err(invalid("at least one variant is required"));
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            if variant.id.is_empty() {
                return Err(invalid("variant id must not be empty"));
            }
            if !seen.insert(variant.id.as_str()) {
                return Err(ContentError::InvalidExperiment {
                    test_id: self.id.clone(),
                    reason: format!("duplicate variant id '{}'", variant.id),
                });
            }
        }

        if self.total_weight() == 0 {
            return Err(invalid("variant weights sum to zero"));
        }
        Ok(())
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let test: AbTest = serde_json::from_slice(bytes)?;
        test.validate()?;
        Ok(test)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_with(weights: &[u32], allocation: u8) -> AbTest {
        AbTest {
            id: "hero".into(),
            name: "Hero copy".into(),
            traffic_allocation: allocation,
            variants: weights
                .iter()
                .enumerate()
                .map(|(i, w)| AbTestVariant {
                    id: format!("v{}", i),
                    name: format!("Variant {}", i),
                    weight: *w,
                    content: Value::Null,
                })
                .collect(),
        }
    }

    #[test]
    fn test_deserialize_camel_case_with_default_allocation() {
        let test: AbTest = serde_json::from_value(json!({
            "id": "hero",
            "name": "Hero",
            "variants": [{"id": "a", "name": "A", "weight": 1, "content": {"title": "Hi"}}]
        }))
        .unwrap();
        assert_eq!(test.traffic_allocation, 100);
        assert_eq!(test.variants[0].content["title"], "Hi");
    }

    #[test]
    fn test_zero_total_weight_rejected() {
        let err = test_with(&[0, 0], 100).validate().unwrap_err();
        assert!(matches!(err, ContentError::InvalidExperiment { .. }));
    }

    #[test]
    fn test_allocation_over_hundred_rejected() {
        assert!(test_with(&[1], 101).validate().is_err());
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let mut test = test_with(&[1, 1], 50);
        test.variants[1].id = "v0".into();
        let err = test.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate variant id 'v0'"));
    }

    #[test]
    fn test_valid_definition() {
        assert!(test_with(&[50, 50], 0).validate().is_ok());
    }
}

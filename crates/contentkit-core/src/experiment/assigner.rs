use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::errors::Result;
use crate::experiment::hash::{bucket_hash, bucket_key};
use crate::experiment::model::{AbTest, AbTestVariant};
use crate::identity::IdentityProvider;
use crate::storage::{assignment_key, KeyValueStorage};
use serde_json::Value;
use std::sync::Arc;

/// Emitted when a user is assigned a variant for the first time
pub const ASSIGNED_EVENT: &str = "ab_test_assigned";
/// Emitted by [`VariantAssigner::track_conversion`]
pub const CONVERSION_EVENT: &str = "ab_test_conversion";

const EXPERIMENT_CATEGORY: &str = "experiment";

/// Pick a variant for `user_id` without consulting storage
///
/// `None` when the user falls outside `traffic_allocation`. The same user and
/// test always produce the same answer. Callers are expected to have validated
/// `test`; an all-zero weight list yields `None`.
pub fn assign_variant<'a>(user_id: &str, test: &'a AbTest) -> Option<&'a AbTestVariant> {
    let hash = bucket_hash(&bucket_key(user_id, &test.id));

    if hash % 100 >= u32::from(test.traffic_allocation) {
        return None;
    }

    let total = test.total_weight();
    if total == 0 {
        return None;
    }

    let point = u64::from(hash) % total;
    let mut cumulative = 0u64;
    for variant in &test.variants {
        cumulative += u64::from(variant.weight);
        if point < cumulative {
            return Some(variant);
        }
    }
    test.variants.last()
}

/// Sticky variant assignment backed by key/value storage
pub struct VariantAssigner {
    storage: Arc<dyn KeyValueStorage>,
    identity: Arc<dyn IdentityProvider>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl VariantAssigner {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        identity: Arc<dyn IdentityProvider>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            storage,
            identity,
            analytics,
        }
    }

    /// Variant for the current user, assigning and persisting one if needed
    ///
    /// A stored assignment wins over a fresh computation as long as the stored
    /// variant still exists in `test`. Users outside the traffic allocation get
    /// `None` and nothing is persisted for them.
    ///
    /// # Errors
    ///
    /// `InvalidExperiment` for an unusable definition, `Storage` when the
    /// assignment cannot be read or written.
    pub fn get_variant(&self, test: &AbTest) -> Result<Option<AbTestVariant>> {
        test.validate()?;
        let key = assignment_key(&test.id);

        if let Some(stored) = self.storage.get(&key)? {
            match test.variant(&stored) {
                Some(variant) => return Ok(Some(variant.clone())),
                None => tracing::debug!(
                    test_id = %test.id,
                    variant_id = %stored,
                    "stored variant no longer in test, reassigning"
                ),
            }
        }

        let user_id = self.identity.user_id()?;
        let Some(variant) = assign_variant(&user_id, test) else {
            tracing::debug!(test_id = %test.id, "user outside traffic allocation");
            return Ok(None);
        };

        self.storage.set(&key, &variant.id)?;
        self.analytics.track_event(
            AnalyticsEvent::new(ASSIGNED_EVENT, EXPERIMENT_CATEGORY, "assign")
                .with_label(test.id.clone())
                .with_parameter("test_id", test.id.clone())
                .with_parameter("variant_id", variant.id.clone())
                .with_parameter("user_id", user_id),
        );
        tracing::debug!(test_id = %test.id, variant_id = %variant.id, "assigned variant");

        Ok(Some(variant.clone()))
    }

    /// Content of the user's variant, if they are in the test
    pub fn get_variant_content(&self, test: &AbTest) -> Result<Option<Value>> {
        Ok(self.get_variant(test)?.map(|v| v.content))
    }

    /// Stored variant id for `test_id`, without assigning
    pub fn assignment(&self, test_id: &str) -> Result<Option<String>> {
        self.storage.get(&assignment_key(test_id))
    }

    /// Record a conversion for the user's assigned variant
    ///
    /// Returns `false` and emits nothing when the user has no assignment.
    pub fn track_conversion(&self, test: &AbTest, goal: &str, value: Option<f64>) -> Result<bool> {
        let Some(variant_id) = self.assignment(&test.id)? else {
            return Ok(false);
        };
        if test.variant(&variant_id).is_none() {
            return Ok(false);
        }

        let mut event = AnalyticsEvent::new(CONVERSION_EVENT, EXPERIMENT_CATEGORY, "convert")
            .with_label(goal.to_string())
            .with_parameter("test_id", test.id.clone())
            .with_parameter("variant_id", variant_id)
            .with_parameter("goal", goal.to_string());
        if let Some(value) = value {
            event = event.with_value(value);
        }
        self.analytics.track_event(event);
        Ok(true)
    }

    /// Forget the stored assignment so the next call re-buckets the user
    pub fn clear_assignment(&self, test_id: &str) -> Result<()> {
        self.storage.remove(&assignment_key(test_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MemoryAnalyticsSink;
    use crate::identity::FixedIdentity;
    use crate::storage::MemoryStorage;

    fn two_way(allocation: u8) -> AbTest {
        serde_json::from_value(serde_json::json!({
            "id": "hero",
            "name": "Hero",
            "trafficAllocation": allocation,
            "variants": [
                {"id": "control", "name": "Control", "weight": 50, "content": {"title": "A"}},
                {"id": "bold", "name": "Bold", "weight": 50, "content": {"title": "B"}}
            ]
        }))
        .unwrap()
    }

    fn assigner_for(user: &str) -> (VariantAssigner, Arc<MemoryStorage>, Arc<MemoryAnalyticsSink>) {
        let storage = Arc::new(MemoryStorage::new());
        let sink = Arc::new(MemoryAnalyticsSink::new());
        let assigner = VariantAssigner::new(
            storage.clone(),
            Arc::new(FixedIdentity::new(user)),
            sink.clone(),
        );
        (assigner, storage, sink)
    }

    #[test]
    fn test_assignment_is_sticky_across_weight_changes() {
        let (assigner, _, sink) = assigner_for("user-42");
        let test = two_way(100);
        let first = assigner.get_variant(&test).unwrap().unwrap();

        let mut reweighted = test.clone();
        for variant in &mut reweighted.variants {
            variant.weight = if variant.id == first.id { 0 } else { 100 };
        }
        let second = assigner.get_variant(&reweighted).unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.events()[0].event, ASSIGNED_EVENT);
    }

    #[test]
    fn test_zero_allocation_excludes_and_persists_nothing() {
        let (assigner, storage, sink) = assigner_for("user-42");
        assert_eq!(assigner.get_variant(&two_way(0)).unwrap(), None);
        assert!(storage.is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_stale_assignment_is_replaced() {
        let (assigner, storage, _) = assigner_for("user-42");
        storage.set(&assignment_key("hero"), "retired").unwrap();
        let variant = assigner.get_variant(&two_way(100)).unwrap().unwrap();
        assert_ne!(variant.id, "retired");
        assert_eq!(assigner.assignment("hero").unwrap(), Some(variant.id));
    }

    #[test]
    fn test_conversion_requires_assignment() {
        let (assigner, _, sink) = assigner_for("user-7");
        let test = two_way(100);
        assert!(!assigner.track_conversion(&test, "signup", None).unwrap());

        assigner.get_variant(&test).unwrap();
        assert!(assigner.track_conversion(&test, "signup", Some(10.0)).unwrap());

        let conversion = sink.events().pop().unwrap();
        assert_eq!(conversion.event, CONVERSION_EVENT);
        assert_eq!(conversion.value, Some(10.0));
    }

    #[test]
    fn test_clear_assignment() {
        let (assigner, _, _) = assigner_for("user-7");
        let test = two_way(100);
        assigner.get_variant(&test).unwrap();
        assigner.clear_assignment("hero").unwrap();
        assert_eq!(assigner.assignment("hero").unwrap(), None);
    }
}

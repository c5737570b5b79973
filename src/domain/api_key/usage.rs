//! Usage accounting across an owner's keys

use serde::Serialize;

use super::entity::ApiKey;

/// Usage as a percentage of the limit; 0 when the limit is 0
pub fn usage_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }

    usage as f64 / limit as f64 * 100.0
}

/// Aggregate usage over a set of keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub total_usage: u64,
    pub total_limit: u64,
    pub percent_used: f64,
    pub key_count: usize,
}

impl UsageSummary {
    /// Sum usage and limits of the given keys
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a ApiKey>) -> Self {
        let mut total_usage: u64 = 0;
        let mut total_limit: u64 = 0;
        let mut key_count = 0;

        for key in keys {
            total_usage = total_usage.saturating_add(key.usage());
            total_limit = total_limit.saturating_add(key.limit());
            key_count += 1;
        }

        Self {
            total_usage,
            total_limit,
            percent_used: usage_percent(total_usage, total_limit),
            key_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::{ApiKeyId, ApiKeyParts, KeyType, OwnerId};
    use chrono::Utc;

    fn key_with(usage: u64, limit: u64) -> ApiKey {
        ApiKey::from_parts(ApiKeyParts {
            id: ApiKeyId::generate(),
            name: "k".to_string(),
            key_hash: "sha256$x".to_string(),
            key_prefix: "aaaaaaaa".to_string(),
            key_suffix: "bbbbbbbb".to_string(),
            key_type: KeyType::Development,
            usage,
            limit,
            created_by: OwnerId::new("owner").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(0, 1000), 0.0);
        assert_eq!(usage_percent(250, 1000), 25.0);
        assert_eq!(usage_percent(5, 0), 0.0);
        assert_eq!(usage_percent(1500, 1000), 150.0);
    }

    #[test]
    fn test_summary_of_no_keys() {
        let summary = UsageSummary::from_keys(&Vec::<ApiKey>::new());
        assert_eq!(summary, UsageSummary::default());
        assert_eq!(summary.percent_used, 0.0);
    }

    #[test]
    fn test_summary_sums_keys() {
        let keys = vec![key_with(100, 1000), key_with(50, 500), key_with(0, 1000)];
        let summary = UsageSummary::from_keys(&keys);

        assert_eq!(summary.total_usage, 150);
        assert_eq!(summary.total_limit, 2500);
        assert_eq!(summary.key_count, 3);
        assert!((summary.percent_used - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_saturates() {
        let keys = vec![key_with(0, u64::MAX), key_with(0, 10)];
        let summary = UsageSummary::from_keys(&keys);
        assert_eq!(summary.total_limit, u64::MAX);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exponent applied to the age denominator. Values above 1 make recency
/// dominate raw volume once an item is more than a few days old.
pub const DECAY_EXPONENT: f64 = 1.5;

/// Offset added to the age denominator so items published seconds ago
/// do not divide by ~zero.
pub const DECAY_OFFSET_DAYS: f64 = 2.0;

/// Per-signal weights for the engagement numerator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub view: f64,
    pub like: f64,
    pub share: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            view: 1.0,
            like: 2.0,
            share: 3.0,
        }
    }
}

/// Fractional days between publication and `now`.
/// Clock skew can put `published_at` ahead of `now`; clamped to zero so a
/// skewed item scores as just-published rather than blowing up the decay.
pub fn days_since_published(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - published_at).num_seconds().max(0) as f64) / 86_400.0
}

/// Decayed engagement score:
/// `(views + 2*likes + 3*shares) / (age_days + 2)^1.5`
pub fn trending_score(
    view_count: i64,
    like_count: i64,
    share_count: i64,
    age_days: f64,
    weights: &EngagementWeights,
) -> f64 {
    let engagement = view_count as f64 * weights.view
        + like_count as f64 * weights.like
        + share_count as f64 * weights.share;
    engagement / (age_days.max(0.0) + DECAY_OFFSET_DAYS).powf(DECAY_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_share_outweighs_like() {
        let w = EngagementWeights::default();
        // 1 share at age 0 → 3 / 2^1.5 ≈ 1.06
        let share_only = trending_score(0, 0, 1, 0.0, &w);
        // 1 like at age 0 → 2 / 2^1.5 ≈ 0.71
        let like_only = trending_score(0, 1, 0, 0.0, &w);
        assert!((share_only - 1.0606).abs() < 0.001, "got {share_only}");
        assert!((like_only - 0.7071).abs() < 0.001, "got {like_only}");
        assert!(share_only > like_only);
    }

    #[test]
    fn test_score_decays_with_age() {
        let w = EngagementWeights::default();
        // 10 views at age 0 → 10 / 2^1.5 ≈ 3.54
        let fresh = trending_score(10, 0, 0, 0.0, &w);
        // same item at age 7d → 10 / 9^1.5 = 10/27 ≈ 0.37
        let week_old = trending_score(10, 0, 0, 7.0, &w);
        assert!((fresh - 3.5355).abs() < 0.001, "got {fresh}");
        assert!((week_old - 10.0 / 27.0).abs() < 0.001, "got {week_old}");
        assert!(fresh > week_old, "younger item must score higher");
    }

    #[test]
    fn test_zero_engagement_scores_zero() {
        let w = EngagementWeights::default();
        assert_eq!(trending_score(0, 0, 0, 3.0, &w), 0.0);
    }

    #[test]
    fn test_negative_age_clamped() {
        let w = EngagementWeights::default();
        let skewed = trending_score(10, 0, 0, -5.0, &w);
        let fresh = trending_score(10, 0, 0, 0.0, &w);
        assert_eq!(skewed, fresh, "skewed clock must score as just-published");
    }

    #[test]
    fn test_days_since_published_fractional() {
        let now = Utc::now();
        let twelve_hours_ago = now - Duration::hours(12);
        let days = days_since_published(twelve_hours_ago, now);
        assert!((days - 0.5).abs() < 0.001, "got {days}");
    }

    #[test]
    fn test_days_since_published_future_is_zero() {
        let now = Utc::now();
        let future = now + Duration::hours(6);
        assert_eq!(days_since_published(future, now), 0.0);
    }
}

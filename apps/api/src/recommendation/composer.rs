//! Mixed content composer — blends content families by caller-supplied
//! ratios, fetching each family independently and interleaving the results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::content::ContentType;
use crate::recommendation::trending::{
    fetch_trending_candidates, ScoredContent, TimeRange, TrendingParams, TrendingRanker,
};

/// Blend ratios per content family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixRatios {
    pub articles: f64,
    pub quizzes: f64,
    pub tutorials: f64,
}

impl Default for MixRatios {
    fn default() -> Self {
        Self {
            articles: 0.5,
            quizzes: 0.3,
            tutorials: 0.2,
        }
    }
}

impl MixRatios {
    pub fn sum(&self) -> f64 {
        self.articles + self.quizzes + self.tutorials
    }

    /// Scales each ratio by the total so they sum to 1
    /// (`each_ratio / sum_of_ratios`). Callers reject non-positive sums
    /// before this is reached.
    pub fn normalized(&self) -> MixRatios {
        let sum = self.sum();
        MixRatios {
            articles: self.articles / sum,
            quizzes: self.quizzes / sum,
            tutorials: self.tutorials / sum,
        }
    }

    fn families(&self) -> [(ContentType, f64); 3] {
        [
            (ContentType::Article, self.articles),
            (ContentType::Quiz, self.quizzes),
            (ContentType::Tutorial, self.tutorials),
        ]
    }
}

/// Splits `limit` slots across families: floor of each share first, then
/// the remainder goes to the largest fractional parts. Exact fraction ties
/// resolve in declaration order (articles, quizzes, tutorials).
pub fn allocate_slots(ratios: &MixRatios, limit: usize) -> Vec<(ContentType, usize)> {
    let mut slots: Vec<(ContentType, usize, f64)> = ratios
        .normalized()
        .families()
        .iter()
        .map(|&(family, share)| {
            let exact = share * limit as f64;
            let floor = exact.floor();
            (family, floor as usize, exact - floor)
        })
        .collect();

    let assigned: usize = slots.iter().map(|(_, n, _)| n).sum();
    let mut remainder = limit.saturating_sub(assigned);

    // Stable sort keeps declaration order on equal fractional parts
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| {
        slots[b]
            .2
            .partial_cmp(&slots[a].2)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for idx in order {
        if remainder == 0 {
            break;
        }
        slots[idx].1 += 1;
        remainder -= 1;
    }

    slots.into_iter().map(|(family, n, _)| (family, n)).collect()
}

/// Round-robin interleave across family lists, truncated to `limit`.
/// A family that runs short simply drops out of the rotation.
pub fn interleave(families: Vec<Vec<ScoredContent>>, limit: usize) -> Vec<ScoredContent> {
    let mut iters: Vec<_> = families.into_iter().map(|f| f.into_iter()).collect();
    let mut out = Vec::with_capacity(limit);
    loop {
        let mut advanced = false;
        for it in iters.iter_mut() {
            if let Some(item) = it.next() {
                out.push(item);
                advanced = true;
                if out.len() == limit {
                    return out;
                }
            }
        }
        if !advanced {
            return out;
        }
    }
}

/// Composes a mixed feed: each family is requested independently through
/// the trending selector (monthly window), then interleaved.
pub async fn compose_mixed(
    pool: &PgPool,
    ranker: &dyn TrendingRanker,
    ratios: &MixRatios,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Vec<ScoredContent>, AppError> {
    let mut family_lists = Vec::new();
    for (family, slots) in allocate_slots(ratios, limit) {
        if slots == 0 {
            continue;
        }
        let params = TrendingParams {
            content_type: Some(family),
            limit: slots,
            time_range: TimeRange::Month,
            tags: vec![],
        };
        let cutoff = params.time_range.cutoff(now);
        let candidates = fetch_trending_candidates(pool, cutoff, Some(family), &[]).await?;
        family_lists.push(ranker.rank(candidates, &params, now).await?);
    }
    Ok(interleave(family_lists, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::ContentRow;
    use uuid::Uuid;

    #[test]
    fn test_normalization_scales_to_unit_sum() {
        let ratios = MixRatios {
            articles: 0.6,
            quizzes: 0.6,
            tutorials: 0.3,
        };
        let n = ratios.normalized();
        assert!((n.articles - 0.4).abs() < 1e-9, "got {}", n.articles);
        assert!((n.quizzes - 0.4).abs() < 1e-9, "got {}", n.quizzes);
        assert!((n.tutorials - 0.2).abs() < 1e-9, "got {}", n.tutorials);
        assert!((n.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalization_keeps_unit_ratios() {
        let n = MixRatios::default().normalized();
        assert!((n.articles - 0.5).abs() < 1e-9);
        assert!((n.quizzes - 0.3).abs() < 1e-9);
        assert!((n.tutorials - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_matches_default_split() {
        let slots = allocate_slots(&MixRatios::default(), 10);
        assert_eq!(
            slots,
            vec![
                (ContentType::Article, 5),
                (ContentType::Quiz, 3),
                (ContentType::Tutorial, 2),
            ]
        );
    }

    #[test]
    fn test_allocation_remainder_by_declaration_order() {
        // Equal thirds of 10 → floors 3/3/3, the spare slot goes to articles
        let ratios = MixRatios {
            articles: 1.0,
            quizzes: 1.0,
            tutorials: 1.0,
        };
        let slots = allocate_slots(&ratios, 10);
        assert_eq!(
            slots,
            vec![
                (ContentType::Article, 4),
                (ContentType::Quiz, 3),
                (ContentType::Tutorial, 3),
            ]
        );
    }

    #[test]
    fn test_allocation_always_sums_to_limit() {
        for limit in [1usize, 3, 7, 10, 25] {
            let total: usize = allocate_slots(&MixRatios::default(), limit)
                .iter()
                .map(|(_, n)| n)
                .sum();
            assert_eq!(total, limit, "limit {limit}");
        }
    }

    fn make_scored(title: &str) -> ScoredContent {
        let now = Utc::now();
        ScoredContent {
            item: ContentRow {
                id: Uuid::new_v4(),
                content_type: "article".to_string(),
                title: title.to_string(),
                tags: vec![],
                status: "published".to_string(),
                is_active: true,
                published_at: Some(now),
                view_count: 0,
                like_count: 0,
                share_count: 0,
                seasonal_relevance: None,
                recommendation_score: None,
                created_at: now,
            },
            trending_score: 0.0,
        }
    }

    fn titles(items: &[ScoredContent]) -> Vec<&str> {
        items.iter().map(|s| s.item.title.as_str()).collect()
    }

    #[test]
    fn test_interleave_round_robin() {
        let families = vec![
            vec![make_scored("a1"), make_scored("a2")],
            vec![make_scored("q1"), make_scored("q2")],
            vec![make_scored("t1")],
        ];
        let mixed = interleave(families, 10);
        assert_eq!(titles(&mixed), vec!["a1", "q1", "t1", "a2", "q2"]);
    }

    #[test]
    fn test_interleave_truncates_to_limit() {
        let families = vec![
            vec![make_scored("a1"), make_scored("a2"), make_scored("a3")],
            vec![make_scored("q1"), make_scored("q2")],
        ];
        let mixed = interleave(families, 3);
        assert_eq!(titles(&mixed), vec!["a1", "q1", "a2"]);
    }

    #[test]
    fn test_interleave_empty_families() {
        assert!(interleave(vec![], 5).is_empty());
        assert!(interleave(vec![vec![], vec![]], 5).is_empty());
    }
}

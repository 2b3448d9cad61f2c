//! Seasonal booster — filtered, sorted lookup of season-tagged content.
//!
//! No computed score here: authors tag items with a season and a static
//! `recommendation_score`, and the query orders by that.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::content::{ContentRow, ContentType};

/// The four TCM season buckets content authors tag against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Fixed calendar mapping: Mar–May spring, Jun–Aug summer,
    /// Sep–Nov autumn, Dec–Feb winter. `month` is 1-based.
    pub fn for_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Season of the current calendar month.
    pub fn current(now: DateTime<Utc>) -> Season {
        Season::for_month(now.month())
    }

    pub fn parse(raw: &str) -> Option<Season> {
        match raw {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Returns up to `limit` published, active items tagged with `season`,
/// ordered by stored `recommendation_score` descending, then
/// `published_at` descending.
pub async fn fetch_seasonal(
    pool: &PgPool,
    season: Season,
    content_type: Option<ContentType>,
    limit: usize,
) -> Result<Vec<ContentRow>, AppError> {
    let rows = sqlx::query_as::<_, ContentRow>(
        r#"
        SELECT * FROM content_items
        WHERE status = 'published'
          AND is_active = TRUE
          AND seasonal_relevance = $1
          AND ($2::text IS NULL OR content_type = $2)
        ORDER BY recommendation_score DESC NULLS LAST, published_at DESC NULLS LAST
        LIMIT $3
        "#,
    )
    .bind(season.as_str())
    .bind(content_type.map(|ct| ct.as_str()))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_all_twelve_month_mappings() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(
                Season::for_month(month),
                season,
                "month {month} must map to {}",
                season.as_str()
            );
        }
    }

    #[test]
    fn test_current_season_uses_calendar_month() {
        let march = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(Season::current(march), Season::Spring);
        let december = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(Season::current(december), Season::Winter);
    }

    #[test]
    fn test_parse_round_trips() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            assert_eq!(Season::parse(season.as_str()), Some(season));
        }
        assert_eq!(Season::parse("monsoon"), None);
        assert_eq!(Season::parse("Spring"), None, "parse is exact, not folded");
    }
}

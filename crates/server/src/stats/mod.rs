//! Stats and achievements
//!
//! Stats are a read-only projection computed on every call. Achievements are
//! unlocked from those stats and stored once per (user, type).

pub mod achievements;
pub mod handlers;

pub use achievements::{Achievement, AchievementKind, AchievementManager};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::core::error::{Error, Result};

/// How far back the mood streak scan looks.
const STREAK_SCAN_LIMIT: i64 = 366;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub journal_entries: i64,
    pub mood_entries: i64,
    pub gratitude_entries: i64,
    pub friends: i64,
    pub support_received: i64,
    pub days_active: i64,
    pub current_mood_streak: i64,
}

#[derive(sqlx::FromRow)]
struct CountsRow {
    journal_entries: i64,
    mood_entries: i64,
    gratitude_entries: i64,
    friends: i64,
    support_received: i64,
    joined_at: DateTime<Utc>,
}

pub struct StatsManager {
    pool: SqlitePool,
}

impl StatsManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self, user_id: i64) -> Result<UserStats> {
        let counts: Option<CountsRow> = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM journal_entries WHERE user_id = ?1) AS journal_entries,
                (SELECT COUNT(*) FROM mood_entries WHERE user_id = ?1) AS mood_entries,
                (SELECT COUNT(*) FROM gratitude_entries WHERE user_id = ?1) AS gratitude_entries,
                (SELECT COUNT(*) FROM (
                    SELECT requested_id FROM friend_requests WHERE requester_id = ?1 AND status = 'accepted'
                    UNION
                    SELECT requester_id FROM friend_requests WHERE requested_id = ?1 AND status = 'accepted'
                )) AS friends,
                (SELECT COUNT(*) FROM support_interactions WHERE receiver_id = ?1) AS support_received,
                u.created_at AS joined_at
            FROM users u
            WHERE u.id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let counts = counts.ok_or_else(|| Error::not_found("user not found"))?;

        let mood_dates: Vec<(NaiveDate,)> = sqlx::query_as(
            "SELECT date FROM mood_entries WHERE user_id = ? ORDER BY date DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(STREAK_SCAN_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        let mood_dates: Vec<NaiveDate> = mood_dates.into_iter().map(|(d,)| d).collect();

        let today = Utc::now().date_naive();
        Ok(UserStats {
            journal_entries: counts.journal_entries,
            mood_entries: counts.mood_entries,
            gratitude_entries: counts.gratitude_entries,
            friends: counts.friends,
            support_received: counts.support_received,
            days_active: days_active(counts.joined_at.date_naive(), today),
            current_mood_streak: current_streak(&mood_dates, today),
        })
    }
}

/// Inclusive day count from the join date to today; never below 1.
pub fn days_active(joined: NaiveDate, today: NaiveDate) -> i64 {
    ((today - joined).num_days() + 1).max(1)
}

/// Consecutive days ending today (or yesterday, if today is not logged yet).
/// `dates` must be sorted newest first without duplicates.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let Some(&latest) = dates.first() else {
        return 0;
    };
    if (today - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_active_is_inclusive() {
        assert_eq!(days_active(day(2024, 1, 1), day(2024, 1, 1)), 1);
        assert_eq!(days_active(day(2024, 1, 1), day(2024, 1, 7)), 7);
        assert_eq!(days_active(day(2023, 12, 31), day(2024, 1, 1)), 2);
        // Clock skew never yields zero or negative.
        assert_eq!(days_active(day(2024, 1, 2), day(2024, 1, 1)), 1);
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let today = day(2024, 3, 10);
        let dates = [day(2024, 3, 10), day(2024, 3, 9), day(2024, 3, 8), day(2024, 3, 5)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn streak_survives_until_today_is_logged() {
        let today = day(2024, 3, 10);
        let dates = [day(2024, 3, 9), day(2024, 3, 8)];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn streak_breaks_after_a_missed_day() {
        let today = day(2024, 3, 10);
        assert_eq!(current_streak(&[day(2024, 3, 8)], today), 0);
        assert_eq!(current_streak(&[], today), 0);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let today = day(2024, 3, 1);
        let dates = [day(2024, 3, 1), day(2024, 2, 29), day(2024, 2, 28)];
        assert_eq!(current_streak(&dates, today), 3);
    }
}

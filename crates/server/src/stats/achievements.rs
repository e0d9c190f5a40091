use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use super::{StatsManager, UserStats};
use crate::core::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementKind {
    FirstEntry,
    Journal10,
    FirstMood,
    MoodStreak7,
    FirstGratitude,
    Gratitude30,
    FirstFriend,
    WeekActive,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 8] = [
        AchievementKind::FirstEntry,
        AchievementKind::Journal10,
        AchievementKind::FirstMood,
        AchievementKind::MoodStreak7,
        AchievementKind::FirstGratitude,
        AchievementKind::Gratitude30,
        AchievementKind::FirstFriend,
        AchievementKind::WeekActive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AchievementKind::FirstEntry => "first_entry",
            AchievementKind::Journal10 => "journal_10",
            AchievementKind::FirstMood => "first_mood",
            AchievementKind::MoodStreak7 => "mood_streak_7",
            AchievementKind::FirstGratitude => "first_gratitude",
            AchievementKind::Gratitude30 => "gratitude_30",
            AchievementKind::FirstFriend => "first_friend",
            AchievementKind::WeekActive => "week_active",
        }
    }

    pub fn is_earned(self, stats: &UserStats) -> bool {
        match self {
            AchievementKind::FirstEntry => stats.journal_entries >= 1,
            AchievementKind::Journal10 => stats.journal_entries >= 10,
            AchievementKind::FirstMood => stats.mood_entries >= 1,
            AchievementKind::MoodStreak7 => stats.current_mood_streak >= 7,
            AchievementKind::FirstGratitude => stats.gratitude_entries >= 1,
            AchievementKind::Gratitude30 => stats.gratitude_entries >= 30,
            AchievementKind::FirstFriend => stats.friends >= 1,
            AchievementKind::WeekActive => stats.days_active >= 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub achievement_type: String,
    pub unlocked_at: DateTime<Utc>,
}

pub struct AchievementManager {
    pool: SqlitePool,
    stats: Arc<StatsManager>,
}

impl AchievementManager {
    pub fn new(pool: SqlitePool, stats: Arc<StatsManager>) -> Self {
        Self { pool, stats }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Achievement>> {
        let rows = sqlx::query_as(
            "SELECT * FROM achievements WHERE user_id = ? ORDER BY unlocked_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Unlock every achievement the user now qualifies for. Returns only new unlocks.
    pub async fn evaluate(&self, user_id: i64) -> Result<Vec<Achievement>> {
        let stats = self.stats.stats(user_id).await?;
        let now = Utc::now();

        let mut unlocked = Vec::new();
        for kind in AchievementKind::ALL {
            if !kind.is_earned(&stats) {
                continue;
            }

            let row: Option<Achievement> = sqlx::query_as(
                r#"
                INSERT INTO achievements (user_id, achievement_type, unlocked_at)
                VALUES (?, ?, ?)
                ON CONFLICT(user_id, achievement_type) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(kind.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(achievement) = row {
                info!("[Achievements] User {} unlocked {}", user_id, kind.as_str());
                unlocked.push(achievement);
            }
        }

        Ok(unlocked)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One scored submission of a quiz by a user. Rows are append-only: they are
/// written once by the attempt recorder and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Score {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,
    pub time_stamp_of_attempt: DateTime<Utc>,
    pub total_scored: i64,
}

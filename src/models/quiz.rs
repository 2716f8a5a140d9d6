use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub chapter_id: i64,
    pub date_of_quiz: NaiveDate,
    pub time_duration: String,
    pub remarks: Option<String>,
}

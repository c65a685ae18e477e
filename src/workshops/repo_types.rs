use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Workshop row as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Workshop {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "super::iso_date")]
    pub date: Date,
    pub max_participants: i32,
    pub current_participants: i32,
    pub price: f64,
}

impl Workshop {
    pub fn remaining(&self) -> i32 {
        self.max_participants - self.current_participants
    }

    pub fn has_capacity(&self) -> bool {
        self.current_participants < self.max_participants
    }
}

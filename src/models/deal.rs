use serde::{Deserialize, Serialize};

/// A fixed-price bundle for a week-long stay in one room type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Deal {
    pub deal_name: String,
    pub room_location: String,
    pub room_name: String,
    pub nights: i64,
    pub new_price: i64,
    pub old_price: i64,
}

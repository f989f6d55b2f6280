use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Room {
    pub room_name: String,
    pub price_per_night: i64,
    pub size: String,
    pub bed: String,
    pub image_file_name: String,
    pub location: String,
    pub description_pitch: String,
}

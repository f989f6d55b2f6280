use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
pub struct Customer {
    pub booking_number: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: String,
    pub telephone: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct DetailsForm {
    /// Full name: the first word is stored as the name, the rest as the surname.
    #[validate(length(min = 1, message = "All fields are required"))]
    pub name: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub address: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub number: String,
}

impl DetailsForm {
    /// Splits the full name into `(name, surname)`. `None` when fewer than two words were given.
    pub fn split_name(&self) -> Option<(String, String)> {
        let mut words = self.name.split_whitespace();
        let name = words.next()?;
        let surname = words.collect::<Vec<_>>().join(" ");
        if surname.is_empty() {
            return None;
        }
        Some((name.to_string(), surname))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub booking_number: String,
    pub surname: String,
}

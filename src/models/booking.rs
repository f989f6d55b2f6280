use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{meal_deal, MealDealChoice};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
pub struct Booking {
    pub booking_number: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_selection: String,
    pub nights: i64,
    pub people: i64,
    pub total_price: i64,
    pub location: String,
    pub meal_deal: String,
}

/// Values committed by the "book" action, before a booking number exists.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_selection: String,
    pub nights: i64,
    pub people: i64,
    pub total_price: i64,
    pub location: String,
    pub meal_deal: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub location: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub check_in: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub check_out: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub people: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeBookingForm {
    #[validate(length(min = 1, message = "Required fields are missing in the form submission"))]
    pub check_in: String,
    #[validate(length(min = 1, message = "Required fields are missing in the form submission"))]
    pub check_out: String,
    #[validate(length(min = 1, message = "Required fields are missing in the form submission"))]
    pub people: String,
    #[serde(deserialize_with = "meal_deal::blank_as_none")]
    pub meal_deal: Option<MealDealChoice>,
}

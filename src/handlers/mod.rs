pub mod bookings;
pub mod manage;
pub mod rooms;
pub mod search;

use actix_web::{http::header, web, HttpResponse};
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{
    db::queries,
    error::AppError,
    models::{Booking, Customer, MealDeal, MealDealChoice},
};

/// Registers every page of the booking flow.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        log::debug!("rejected form submission: {err}");
        AppError::InvalidForm(format!("Invalid form submission: {err}")).into()
    }))
    .route("/", web::get().to(search::home))
        .route("/", web::post().to(search::search))
        .route("/about", web::get().to(search::about))
        .route("/search_results", web::get().to(search::search_results))
        .route("/deals", web::get().to(search::deals))
        .route("/rooms/{room_name}", web::get().to(rooms::room_page))
        .route("/rooms/{room_name}", web::post().to(rooms::choose_room))
        .route(
            "/booking_confirmation",
            web::get().to(bookings::booking_confirmation),
        )
        .route("/details", web::get().to(bookings::details_page))
        .route("/details", web::post().to(bookings::enter_details))
        .route(
            "/successful_booking",
            web::get().to(bookings::successful_booking),
        )
        .route("/login_booking", web::get().to(manage::login_page))
        .route("/login_booking", web::post().to(manage::login))
        .route("/manage_booking", web::get().to(manage::manage_page))
        .route("/manage_booking", web::post().to(manage::manage))
        .route(
            "/cancel_booking_warning",
            web::get().to(manage::cancel_warning_page),
        )
        .route(
            "/cancel_booking_warning",
            web::post().to(manage::cancel_warning),
        )
        .route("/cancel_booking", web::post().to(manage::cancel_booking))
        .route("/change_booking", web::get().to(manage::change_page))
        .route("/change_booking", web::post().to(manage::request_change))
        .route(
            "/change_booking_confirmation",
            web::get().to(manage::change_confirmation_page),
        )
        .route(
            "/change_booking_confirmation",
            web::post().to(manage::confirm_change),
        )
        .route(
            "/change_booking_successful",
            web::get().to(manage::change_successful),
        );
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidForm(format!("Invalid date {value:?}, expected YYYY-MM-DD")))
}

pub(crate) fn parse_people(value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidForm(format!("Invalid number of people {value:?}")))
}

/// Resolves a meal-deal selection against the reference table.
pub(crate) async fn meal_deal_for(
    pool: &SqlitePool,
    choice: MealDealChoice,
) -> Result<MealDeal, AppError> {
    queries::meal_deal(pool, choice.table_name())
        .await?
        .ok_or_else(|| AppError::UnknownMealDeal(choice.to_string()))
}

pub(crate) async fn booking_with_customer(
    pool: &SqlitePool,
    booking_number: i64,
) -> Result<(Booking, Option<Customer>), AppError> {
    let booking = queries::booking(pool, booking_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {booking_number}")))?;
    let customer = queries::customer(pool, booking_number).await?;
    Ok((booking, customer))
}

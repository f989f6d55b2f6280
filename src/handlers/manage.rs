//! Post-booking pages: login by booking number and surname, then cancel or
//! change the booking.

use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use super::{booking_with_customer, meal_deal_for, parse_date, parse_people, redirect};
use crate::{
    db::queries,
    error::AppError,
    models::{ChangeBookingForm, LoginForm},
    pricing,
    session::{StagedChange, Wizard},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManageForm {
    pub cancel: Option<String>,
    pub change: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CancelWarningForm {
    #[serde(rename = "Yes")]
    pub yes: Option<String>,
    #[serde(rename = "No")]
    pub no: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmChangeForm {
    pub confirm: Option<String>,
    pub deny: Option<String>,
}

async fn booking_page(pool: &SqlitePool, wizard: &Wizard) -> Result<HttpResponse, AppError> {
    let booking_number = wizard.load()?.require_booking_number()?;
    let (booking, customer) = booking_with_customer(pool, booking_number).await?;
    Ok(HttpResponse::Ok().json(json!({
        "booking": booking,
        "customer": customer,
    })))
}

pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "page": "login_booking",
        "fields": ["booking_number", "surname"],
    }))
}

/// Every failure, including a malformed booking number, gets the same
/// rejection so callers cannot tell which half of the pair was wrong.
pub async fn login(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let booking_number: i64 = form
        .booking_number
        .trim()
        .parse()
        .map_err(|_| AppError::LoginRejected)?;

    let customer = queries::customer_for_login(pool.get_ref(), booking_number, &form.surname)
        .await?
        .ok_or(AppError::LoginRejected)?;
    log::info!("customer {} logged in to booking {booking_number}", customer.surname);

    wizard.update(|state| {
        state.end_booking();
        state.booking_number = Some(booking_number);
        state.surname = Some(customer.surname.clone());
    })?;

    Ok(redirect("/manage_booking"))
}

pub async fn manage_page(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    booking_page(pool.get_ref(), &wizard).await
}

pub async fn manage(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<ManageForm>,
) -> Result<HttpResponse, AppError> {
    if form.cancel.is_some() {
        return Ok(redirect("/cancel_booking_warning"));
    }
    if form.change.is_some() {
        return Ok(redirect("/change_booking"));
    }
    booking_page(pool.get_ref(), &wizard).await
}

pub async fn cancel_warning_page(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    booking_page(pool.get_ref(), &wizard).await
}

/// "Yes" marks the cancellation as confirmed and replays the POST to
/// `/cancel_booking`; "No" withdraws any confirmation and goes back to the
/// manage page.
pub async fn cancel_warning(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<CancelWarningForm>,
) -> Result<HttpResponse, AppError> {
    if form.yes.is_some() {
        wizard.load()?.require_booking_number()?;
        wizard.update(|state| state.cancel_confirmed = true)?;
        return Ok(HttpResponse::TemporaryRedirect()
            .insert_header((header::LOCATION, "/cancel_booking"))
            .finish());
    }
    if form.no.is_some() {
        log::debug!("cancellation declined");
        wizard.update(|state| state.cancel_confirmed = false)?;
        return Ok(redirect("/manage_booking"));
    }
    booking_page(pool.get_ref(), &wizard).await
}

pub async fn cancel_booking(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    let state = wizard.load()?;
    let booking_number = state.require_booking_number()?;
    state.require_cancel_confirmed()?;

    let (booking, customer) = queries::delete_booking(pool.get_ref(), booking_number).await?;
    let Some(booking) = booking else {
        return Err(AppError::NotFound(format!("Booking {booking_number}")));
    };
    log::info!("booking {booking_number} and its customer were deleted");

    wizard.update(|state| state.end_booking())?;

    Ok(HttpResponse::Ok().json(json!({
        "cancelled": true,
        "booking": booking,
        "customer": customer,
    })))
}

pub async fn change_page(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    booking_page(pool.get_ref(), &wizard).await
}

/// Stages new stay parameters. The booking row is untouched until the
/// change is confirmed.
pub async fn request_change(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<ChangeBookingForm>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;
    let choice = form.meal_deal.ok_or_else(|| {
        AppError::InvalidForm("Required fields are missing in the form submission".to_string())
    })?;
    meal_deal_for(pool.get_ref(), choice).await?;

    let check_in = parse_date(&form.check_in)?;
    let check_out = parse_date(&form.check_out)?;
    let people = parse_people(&form.people)?;
    let nights = (check_out - check_in).num_days();

    let state = wizard.load()?;
    let booking_number = state.require_booking_number()?;
    log::info!("change staged for booking {booking_number}: {check_in} to {check_out}, {choice}");

    wizard.update(|state| {
        state.change = Some(StagedChange {
            check_in,
            check_out,
            people,
            nights,
            meal_deal: choice,
        })
    })?;

    Ok(redirect("/change_booking_confirmation"))
}

pub async fn change_confirmation_page(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    let state = wizard.load()?;
    let booking_number = state.require_booking_number()?;
    let change = state.require_change()?;
    let (booking, customer) = booking_with_customer(pool.get_ref(), booking_number).await?;

    Ok(HttpResponse::Ok().json(json!({
        "old_check_in": booking.check_in,
        "new_check_in": change.check_in,
        "change": change,
        "booking": booking,
        "customer": customer,
    })))
}

/// Applies the staged change in place, keeping the booking number and
/// repricing the stay with the booking's room and that room's bundle.
pub async fn confirm_change(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<ConfirmChangeForm>,
) -> Result<HttpResponse, AppError> {
    if form.deny.is_some() {
        log::debug!("staged change discarded");
        wizard.update(|state| state.change = None)?;
        return Ok(redirect("/change_booking"));
    }
    if form.confirm.is_none() {
        return change_confirmation_page(pool, wizard).await;
    }

    let state = wizard.load()?;
    let booking_number = state.require_booking_number()?;
    let change = state.require_change()?;
    let pool = pool.get_ref();

    let (mut booking, _) = booking_with_customer(pool, booking_number).await?;
    let room = queries::room(pool, &booking.room_selection)
        .await?
        .ok_or_else(|| AppError::NotFound(booking.room_selection.clone()))?;
    let meal_deal = meal_deal_for(pool, change.meal_deal).await?;
    let room_deal = queries::deal_for_room(pool, &room.room_name).await?;

    booking.check_in = change.check_in;
    booking.check_out = change.check_out;
    booking.nights = change.nights;
    booking.people = change.people;
    booking.meal_deal = meal_deal.meal_deal_name.clone();
    booking.total_price =
        pricing::total_price(&room, &meal_deal, change.nights, room_deal.as_ref());
    queries::update_booking(pool, &booking).await?;
    log::info!(
        "booking {booking_number} changed, new total {}",
        booking.total_price
    );

    wizard.update(|state| state.change = None)?;

    Ok(redirect("/change_booking_successful"))
}

pub async fn change_successful(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    booking_page(pool.get_ref(), &wizard).await
}

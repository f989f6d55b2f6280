use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use super::{booking_with_customer, redirect};
use crate::{
    db::queries,
    error::AppError,
    models::{Customer, DetailsForm},
    session::Wizard,
};

pub async fn booking_confirmation(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    let booking_number = wizard.load()?.require_booking_number()?;

    match queries::booking(pool.get_ref(), booking_number).await? {
        Some(_) => Ok(redirect("/details")),
        None => Err(AppError::NotFound(format!("Booking {booking_number}"))),
    }
}

pub async fn details_page(wizard: Wizard) -> Result<HttpResponse, AppError> {
    let booking_number = wizard.load()?.require_booking_number()?;
    Ok(HttpResponse::Ok().json(json!({
        "page": "details",
        "booking_number": booking_number,
        "fields": ["name", "email", "address", "number"],
    })))
}

pub async fn enter_details(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    form: web::Form<DetailsForm>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;
    let (name, surname) = form.split_name().ok_or_else(|| {
        AppError::InvalidForm("Please enter your first name and surname".to_string())
    })?;

    let booking_number = wizard.load()?.require_booking_number()?;
    if queries::booking(pool.get_ref(), booking_number).await?.is_none() {
        return Err(AppError::NotFound(format!("Booking {booking_number}")));
    }

    let customer = Customer {
        booking_number,
        name,
        surname,
        email: form.email.clone(),
        address: form.address.clone(),
        telephone: form.number.clone(),
    };
    queries::insert_customer(pool.get_ref(), &customer).await?;
    log::info!(
        "customer {} {} added to booking {booking_number}",
        customer.name,
        customer.surname
    );

    wizard.update(|state| state.surname = Some(customer.surname.clone()))?;

    Ok(redirect("/successful_booking"))
}

pub async fn successful_booking(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    let booking_number = wizard.load()?.require_booking_number()?;
    let (booking, customer) = booking_with_customer(pool.get_ref(), booking_number).await?;
    Ok(HttpResponse::Ok().json(json!({
        "booking": booking,
        "customer": customer,
    })))
}

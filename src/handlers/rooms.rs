use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::{meal_deal_for, redirect};
use crate::{
    db::queries,
    error::AppError,
    models::{meal_deal, Deal, MealDeal, MealDealChoice, NewBooking, Room},
    pricing,
    session::{Search, Wizard},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomForm {
    #[serde(deserialize_with = "meal_deal::blank_as_none")]
    pub meal_deal: Option<MealDealChoice>,
    pub book: Option<String>,
}

/// Everything a room page shows, including the price the current selection
/// would be booked at.
#[derive(Debug, Serialize)]
pub struct RoomPage {
    pub room: Room,
    pub meal_deal: MealDeal,
    pub room_deal: Option<Deal>,
    pub location: String,
    pub nights: i64,
    pub people: i64,
    pub total_price: i64,
}

impl RoomPage {
    async fn load(
        pool: &SqlitePool,
        room_name: &str,
        search: &Search,
        choice: MealDealChoice,
    ) -> Result<Self, AppError> {
        let room = queries::room_at(pool, room_name, &search.location)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{room_name} in {}", search.location)))?;
        let meal_deal = meal_deal_for(pool, choice).await?;
        let room_deal = queries::deal_for_room(pool, &room.room_name).await?;
        let total_price =
            pricing::total_price(&room, &meal_deal, search.nights, room_deal.as_ref());

        Ok(Self {
            room,
            meal_deal,
            room_deal,
            location: search.location.clone(),
            nights: search.nights,
            people: search.people,
            total_price,
        })
    }

    fn to_new_booking(&self, search: &Search) -> NewBooking {
        NewBooking {
            check_in: search.check_in,
            check_out: search.check_out,
            room_selection: self.room.room_name.clone(),
            nights: self.nights,
            people: self.people,
            total_price: self.total_price,
            location: self.location.clone(),
            meal_deal: self.meal_deal.meal_deal_name.clone(),
        }
    }
}

pub async fn room_page(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let state = wizard.load()?;
    let search = state.require_search()?;
    let page = RoomPage::load(pool.get_ref(), &path, search, MealDealChoice::default()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Re-quotes the room for the chosen meal deal, or books it when the form
/// carries the `book` flag.
pub async fn choose_room(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
    path: web::Path<String>,
    form: web::Form<RoomForm>,
) -> Result<HttpResponse, AppError> {
    let state = wizard.load()?;
    let search = state.require_search()?;
    let choice = form.meal_deal.unwrap_or_default();
    let page = RoomPage::load(pool.get_ref(), &path, search, choice).await?;

    if form.book.is_none() {
        log::debug!("{} quoted at {} with {choice}", page.room.room_name, page.total_price);
        return Ok(HttpResponse::Ok().json(page));
    }

    let booking = queries::insert_booking(pool.get_ref(), &page.to_new_booking(search))
        .await
        .map_err(|e| {
            log::error!("failed to create booking for {}: {e}", page.room.room_name);
            e
        })?;
    log::info!(
        "booking {} created: {} for {} nights, total {}",
        booking.booking_number,
        booking.room_selection,
        booking.nights,
        booking.total_price
    );

    wizard.update(|state| {
        state.end_booking();
        state.booking_number = Some(booking.booking_number);
    })?;

    Ok(redirect("/booking_confirmation"))
}

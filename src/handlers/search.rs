use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use super::{parse_date, parse_people, redirect};
use crate::{
    db::queries,
    error::AppError,
    models::SearchForm,
    session::{Search, Wizard},
};

pub async fn home(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let locations = queries::locations(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "page": "home",
        "locations": locations,
    })))
}

/// Stages the search in the wizard state. Nothing is written to the database.
pub async fn search(
    wizard: Wizard,
    form: web::Form<SearchForm>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;

    let check_in = parse_date(&form.check_in)?;
    let check_out = parse_date(&form.check_out)?;
    let people = parse_people(&form.people)?;
    let nights = (check_out - check_in).num_days();

    log::info!(
        "search: {} from {check_in} to {check_out} ({nights} nights, {people} people)",
        form.location
    );

    wizard.update(|state| {
        state.search = Some(Search {
            location: form.location.clone(),
            check_in,
            check_out,
            people,
            nights,
        })
    })?;

    Ok(redirect("/search_results"))
}

pub async fn about() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "page": "about",
        "hotel": "Flora Hotel",
    }))
}

pub async fn search_results(
    pool: web::Data<SqlitePool>,
    wizard: Wizard,
) -> Result<HttpResponse, AppError> {
    let state = wizard.load()?;
    let Some(search) = state.search else {
        return Ok(redirect("/"));
    };

    let rooms = queries::rooms_at(pool.get_ref(), &search.location).await?;
    Ok(HttpResponse::Ok().json(json!({
        "location": search.location,
        "check_in": search.check_in,
        "check_out": search.check_out,
        "nights": search.nights,
        "people": search.people,
        "rooms": rooms,
    })))
}

pub async fn deals(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let deals = queries::all_deals(pool.get_ref()).await?;
    let rooms = queries::all_rooms(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "deals": deals,
        "rooms": rooms,
    })))
}

use rand::Rng;
use sqlx::SqlitePool;

use crate::models::{Booking, Customer, Deal, MealDeal, NewBooking, Room};

pub async fn locations(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT DISTINCT location FROM rooms ORDER BY location")
        .fetch_all(pool)
        .await
}

pub async fn all_rooms(pool: &SqlitePool) -> sqlx::Result<Vec<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY price_per_night")
        .fetch_all(pool)
        .await
}

pub async fn rooms_at(pool: &SqlitePool, location: &str) -> sqlx::Result<Vec<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE location = ? ORDER BY price_per_night")
        .bind(location)
        .fetch_all(pool)
        .await
}

pub async fn room_at(
    pool: &SqlitePool,
    room_name: &str,
    location: &str,
) -> sqlx::Result<Option<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_name = ? AND location = ?")
        .bind(room_name)
        .bind(location)
        .fetch_optional(pool)
        .await
}

pub async fn room(pool: &SqlitePool, room_name: &str) -> sqlx::Result<Option<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_name = ?")
        .bind(room_name)
        .fetch_optional(pool)
        .await
}

pub async fn meal_deal(pool: &SqlitePool, name: &str) -> sqlx::Result<Option<MealDeal>> {
    sqlx::query_as::<_, MealDeal>("SELECT * FROM meal_deals WHERE meal_deal_name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn all_deals(pool: &SqlitePool) -> sqlx::Result<Vec<Deal>> {
    sqlx::query_as::<_, Deal>("SELECT * FROM deals ORDER BY new_price")
        .fetch_all(pool)
        .await
}

/// The bundle offered for a room type, if any.
pub async fn deal_for_room(pool: &SqlitePool, room_name: &str) -> sqlx::Result<Option<Deal>> {
    sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE room_name = ? LIMIT 1")
        .bind(room_name)
        .fetch_optional(pool)
        .await
}

/// Inserts a booking under a freshly drawn six-digit booking number.
pub async fn insert_booking(pool: &SqlitePool, new: &NewBooking) -> sqlx::Result<Booking> {
    let booking_number = rand::thread_rng().gen_range(100_000..=999_999_i64);

    sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO booking (booking_number, check_in, check_out, room_selection, nights, people, total_price, location, meal_deal)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(booking_number)
    .bind(new.check_in)
    .bind(new.check_out)
    .bind(&new.room_selection)
    .bind(new.nights)
    .bind(new.people)
    .bind(new.total_price)
    .bind(&new.location)
    .bind(&new.meal_deal)
    .fetch_one(pool)
    .await
}

pub async fn booking(pool: &SqlitePool, booking_number: i64) -> sqlx::Result<Option<Booking>> {
    sqlx::query_as::<_, Booking>("SELECT * FROM booking WHERE booking_number = ?")
        .bind(booking_number)
        .fetch_optional(pool)
        .await
}

/// Overwrites the mutable columns of an existing booking, keeping its number.
pub async fn update_booking(pool: &SqlitePool, booking: &Booking) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE booking
        SET check_in = ?, check_out = ?, nights = ?, people = ?, meal_deal = ?, total_price = ?
        WHERE booking_number = ?
        "#,
    )
    .bind(booking.check_in)
    .bind(booking.check_out)
    .bind(booking.nights)
    .bind(booking.people)
    .bind(&booking.meal_deal)
    .bind(booking.total_price)
    .bind(booking.booking_number)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_customer(pool: &SqlitePool, customer: &Customer) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (booking_number, name, surname, email, address, telephone)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(customer.booking_number)
    .bind(&customer.name)
    .bind(&customer.surname)
    .bind(&customer.email)
    .bind(&customer.address)
    .bind(&customer.telephone)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn customer(pool: &SqlitePool, booking_number: i64) -> sqlx::Result<Option<Customer>> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE booking_number = ?")
        .bind(booking_number)
        .fetch_optional(pool)
        .await
}

/// Login lookup: both the booking number and the surname must match exactly.
pub async fn customer_for_login(
    pool: &SqlitePool,
    booking_number: i64,
    surname: &str,
) -> sqlx::Result<Option<Customer>> {
    sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers WHERE booking_number = ? AND surname = ?",
    )
    .bind(booking_number)
    .bind(surname)
    .fetch_optional(pool)
    .await
}

/// Deletes a booking together with its customer in one transaction and
/// returns the removed rows.
pub async fn delete_booking(
    pool: &SqlitePool,
    booking_number: i64,
) -> sqlx::Result<(Option<Booking>, Option<Customer>)> {
    let mut tx = pool.begin().await?;

    let customer = sqlx::query_as::<_, Customer>(
        "DELETE FROM customers WHERE booking_number = ? RETURNING *",
    )
    .bind(booking_number)
    .fetch_optional(&mut *tx)
    .await?;

    let booking =
        sqlx::query_as::<_, Booking>("DELETE FROM booking WHERE booking_number = ? RETURNING *")
            .bind(booking_number)
            .fetch_optional(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok((booking, customer))
}

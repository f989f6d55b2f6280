use crate::models::{Deal, MealDeal, Room};

/// Length of stay that unlocks a room's bundle price.
pub const BUNDLE_NIGHTS: i64 = 7;

/// Total price of a stay.
///
/// A stay of exactly [`BUNDLE_NIGHTS`] nights in a room that has a bundle is
/// charged the bundle price plus the meal deal for every night. Every other
/// stay, including a week-long one in a room without a bundle, is charged the
/// nightly room rate plus the meal deal per night. Partial weeks are not
/// prorated.
pub fn total_price(room: &Room, meal_deal: &MealDeal, nights: i64, deal: Option<&Deal>) -> i64 {
    match deal {
        Some(deal) if nights == BUNDLE_NIGHTS => meal_deal.meal_deal_price * nights + deal.new_price,
        _ => (meal_deal.meal_deal_price + room.price_per_night) * nights,
    }
}

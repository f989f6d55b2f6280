pub mod booking;
pub mod customer;
pub mod deal;
pub mod meal_deal;
pub mod room;

pub use booking::{Booking, ChangeBookingForm, NewBooking, SearchForm};
pub use customer::{Customer, DetailsForm, LoginForm};
pub use deal::Deal;
pub use meal_deal::{MealDeal, MealDealChoice};
pub use room::Room;

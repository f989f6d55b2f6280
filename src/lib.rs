//! Flora Hotel: a wizard-style room booking service over SQLite, plus a small
//! static site renderer with a debounced rebuild-on-change loop.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod renderer;
pub mod session;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

/// Session middleware keeping the wizard state in a signed cookie.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("flora_session".to_string())
        .cookie_secure(secure)
        .build()
}

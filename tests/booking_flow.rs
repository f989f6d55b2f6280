use actix_web::{
    cookie::{Cookie, Key},
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::Value;
use sqlx::SqlitePool;

use flora_hotel::{db, db::queries, handlers, session_middleware};

async fn pool() -> SqlitePool {
    let pool = db::get_memory_pool().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

macro_rules! app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .wrap(session_middleware(Key::generate(), false))
                .configure(handlers::configure),
        )
        .await
    };
}

/// Sends a request with the current session cookie and keeps the cookie the
/// response hands back.
macro_rules! call {
    ($app:expr, $jar:expr, $req:expr) => {{
        let mut req = $req;
        if let Some(cookie) = $jar.clone() {
            req = req.cookie(cookie);
        }
        let resp = test::call_service(&$app, req.to_request()).await;
        if let Some(cookie) = resp
            .response()
            .cookies()
            .find(|c| c.name() == "flora_session")
        {
            $jar = Some(cookie.into_owned());
        }
        resp
    }};
}

/// Runs search, room choice, booking and details for a week in the Premium
/// Room with bed & breakfast and returns the booking number.
macro_rules! book_premium_week {
    ($app:expr, $jar:expr) => {{
        let resp = call!(
            $app,
            $jar,
            test::TestRequest::post().uri("/").set_form([
                ("location", "London"),
                ("check_in", "2025-01-01"),
                ("check_out", "2025-01-08"),
                ("people", "2"),
            ])
        );
        assert_eq!(location(&resp), "/search_results");

        let resp = call!(
            $app,
            $jar,
            test::TestRequest::post()
                .uri("/rooms/Premium%20Room")
                .set_form([("meal_deal", "bed_and_breakfast"), ("book", "Book")])
        );
        assert_eq!(location(&resp), "/booking_confirmation");

        let resp = call!(
            $app,
            $jar,
            test::TestRequest::post().uri("/details").set_form([
                ("name", "Ada Lovelace"),
                ("email", "ada@example.com"),
                ("address", "1 Baker Street"),
                ("number", "0123456789"),
            ])
        );
        assert_eq!(location(&resp), "/successful_booking");

        let resp = call!($app, $jar, test::TestRequest::get().uri("/successful_booking"));
        let body: Value = test::read_body_json(resp).await;
        body["booking"]["booking_number"].as_i64().unwrap()
    }};
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    assert!(
        resp.status().is_redirection(),
        "expected a redirect, got {}",
        resp.status()
    );
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_web::test]
async fn book_a_week_then_cancel_it() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/").set_form([
            ("location", "London"),
            ("check_in", "2025-01-01"),
            ("check_out", "2025-01-08"),
            ("people", "2"),
        ])
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/search_results");

    let resp = call!(app, jar, test::TestRequest::get().uri("/search_results"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["location"], "London");
    assert_eq!(body["nights"], 7);
    assert_eq!(body["rooms"].as_array().unwrap().len(), 4);

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/rooms/Premium%20Room")
            .set_form([("meal_deal", "bed_and_breakfast")])
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meal_deal"]["meal_deal_name"], "Bed & Breakfast");
    assert_eq!(body["room_deal"]["new_price"], 100);
    assert_eq!(body["total_price"], 135);

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/rooms/Premium%20Room")
            .set_form([("meal_deal", "bed_and_breakfast"), ("book", "Book")])
    );
    assert_eq!(location(&resp), "/booking_confirmation");

    let resp = call!(app, jar, test::TestRequest::get().uri("/booking_confirmation"));
    assert_eq!(location(&resp), "/details");

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/details").set_form([
            ("name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("address", "1 Baker Street"),
            ("number", "0123456789"),
        ])
    );
    assert_eq!(location(&resp), "/successful_booking");

    let resp = call!(app, jar, test::TestRequest::get().uri("/successful_booking"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["booking"]["total_price"], 135);
    assert_eq!(body["booking"]["room_selection"], "Premium Room");
    assert_eq!(body["customer"]["surname"], "Lovelace");
    let number = body["booking"]["booking_number"].as_i64().unwrap();
    assert!(queries::customer(&pool, number).await.unwrap().is_some());

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/manage_booking")
            .set_form([("cancel", "Cancel")])
    );
    assert_eq!(location(&resp), "/cancel_booking_warning");

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/cancel_booking_warning")
            .set_form([("Yes", "Yes")])
    );
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/cancel_booking");

    let resp = call!(app, jar, test::TestRequest::post().uri("/cancel_booking"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cancelled"], true);
    assert_eq!(body["booking"]["booking_number"], number);

    assert!(queries::booking(&pool, number).await.unwrap().is_none());
    assert!(queries::customer(&pool, number).await.unwrap().is_none());

    let resp = call!(app, jar, test::TestRequest::get().uri("/manage_booking"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn room_page_without_search_is_rejected() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;

    let resp = call!(
        app,
        jar,
        test::TestRequest::get().uri("/rooms/Premium%20Room")
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing session value: search");
}

#[actix_web::test]
async fn incomplete_search_commits_nothing() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/").set_form([
            ("location", "London"),
            ("check_in", "2025-01-01"),
            ("check_out", ""),
            ("people", "2"),
        ])
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "All fields are required");

    let resp = call!(app, jar, test::TestRequest::get().uri("/search_results"));
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn unknown_room_is_not_found() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;

    call!(
        app,
        jar,
        test::TestRequest::post().uri("/").set_form([
            ("location", "London"),
            ("check_in", "2025-01-01"),
            ("check_out", "2025-01-03"),
            ("people", "1"),
        ])
    );
    let resp = call!(
        app,
        jar,
        test::TestRequest::get().uri("/rooms/Penthouse")
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn login_needs_number_and_surname() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;
    let number = book_premium_week!(app, jar);

    let mut guest: Option<Cookie<'static>> = None;
    for (booking_number, surname) in [
        (number.to_string(), "Byron".to_string()),
        ((number + 1).to_string(), "Lovelace".to_string()),
        ("not-a-number".to_string(), "Lovelace".to_string()),
    ] {
        let resp = call!(
            app,
            guest,
            test::TestRequest::post().uri("/login_booking").set_form([
                ("booking_number", booking_number.as_str()),
                ("surname", surname.as_str()),
            ])
        );
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Incorrect booking number or surname");
    }

    let resp = call!(
        app,
        guest,
        test::TestRequest::post().uri("/login_booking").set_form([
            ("booking_number", number.to_string().as_str()),
            ("surname", "Lovelace"),
        ])
    );
    assert_eq!(location(&resp), "/manage_booking");

    let resp = call!(app, guest, test::TestRequest::get().uri("/manage_booking"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["booking"]["booking_number"], number);
    assert_eq!(body["customer"]["name"], "Ada");
}

#[actix_web::test]
async fn change_is_staged_then_applied_in_place() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;
    let number = book_premium_week!(app, jar);

    let change_form = [
        ("check_in", "2025-02-01"),
        ("check_out", "2025-02-04"),
        ("people", "1"),
        ("meal_deal", "all_inclusive"),
    ];

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/change_booking").set_form(change_form)
    );
    assert_eq!(location(&resp), "/change_booking_confirmation");

    let resp = call!(
        app,
        jar,
        test::TestRequest::get().uri("/change_booking_confirmation")
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["old_check_in"], "2025-01-01");
    assert_eq!(body["new_check_in"], "2025-02-01");

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/change_booking_confirmation")
            .set_form([("deny", "No")])
    );
    assert_eq!(location(&resp), "/change_booking");
    let unchanged = queries::booking(&pool, number).await.unwrap().unwrap();
    assert_eq!(unchanged.total_price, 135);

    let resp = call!(
        app,
        jar,
        test::TestRequest::get().uri("/change_booking_confirmation")
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    call!(
        app,
        jar,
        test::TestRequest::post().uri("/change_booking").set_form(change_form)
    );
    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/change_booking_confirmation")
            .set_form([("confirm", "Yes")])
    );
    assert_eq!(location(&resp), "/change_booking_successful");

    let changed = queries::booking(&pool, number).await.unwrap().unwrap();
    assert_eq!(changed.booking_number, number);
    assert_eq!(changed.nights, 3);
    assert_eq!(changed.people, 1);
    assert_eq!(changed.meal_deal, "All Inclusive");
    assert_eq!(changed.total_price, (10 + 18) * 3);
    assert!(queries::customer(&pool, number).await.unwrap().is_some());

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/change_booking").set_form([
            ("check_in", "2025-03-01"),
            ("check_out", "2025-03-08"),
            ("people", "2"),
            ("meal_deal", "all_inclusive"),
        ])
    );
    assert_eq!(location(&resp), "/change_booking_confirmation");
    call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/change_booking_confirmation")
            .set_form([("confirm", "Yes")])
    );
    let week = queries::booking(&pool, number).await.unwrap().unwrap();
    assert_eq!(week.total_price, 10 * 7 + 100);
}

#[actix_web::test]
async fn declining_cancellation_keeps_the_booking() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;
    let number = book_premium_week!(app, jar);

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/cancel_booking_warning")
            .set_form([("No", "No")])
    );
    assert_eq!(location(&resp), "/manage_booking");
    assert!(queries::booking(&pool, number).await.unwrap().is_some());
    assert!(queries::customer(&pool, number).await.unwrap().is_some());
}

#[actix_web::test]
async fn cancel_requires_the_warning_to_be_confirmed() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;
    let number = book_premium_week!(app, jar);

    let resp = call!(app, jar, test::TestRequest::post().uri("/cancel_booking"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing session value: cancel_confirmed");
    assert!(queries::booking(&pool, number).await.unwrap().is_some());
    assert!(queries::customer(&pool, number).await.unwrap().is_some());

    call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/cancel_booking_warning")
            .set_form([("Yes", "Yes")])
    );
    call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/cancel_booking_warning")
            .set_form([("No", "No")])
    );
    let resp = call!(app, jar, test::TestRequest::post().uri("/cancel_booking"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(queries::booking(&pool, number).await.unwrap().is_some());
}

#[actix_web::test]
async fn bad_meal_deal_values_get_json_errors() {
    let pool = pool().await;
    let app = app!(pool);
    let mut jar: Option<Cookie<'static>> = None;
    book_premium_week!(app, jar);

    let resp = call!(
        app,
        jar,
        test::TestRequest::post().uri("/change_booking").set_form([
            ("check_in", "2025-02-01"),
            ("check_out", "2025-02-04"),
            ("people", "1"),
            ("meal_deal", ""),
        ])
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Required fields are missing in the form submission"
    );

    let resp = call!(
        app,
        jar,
        test::TestRequest::post()
            .uri("/rooms/Premium%20Room")
            .set_form([("meal_deal", "half_board")])
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid form submission"));
}

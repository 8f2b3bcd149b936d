//! API client tests against a mock TravelBook server

mod support;

use std::sync::Arc;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use travelbook::api::{BookingQuery, PackageQuery, MY_BOOKINGS_PAGE_SIZE};
use travelbook::domain::{BookingId, BookingStatus, Category, PackageId};
use travelbook::errors::TravelBookError;
use travelbook::session::{MemoryTokenStore, Session, TokenStore};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use support::{booking_json, client_for, package_json, signed_in_store, user_json};

#[tokio::test]
async fn bearer_token_is_sent_when_stored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("user") })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store("tok-123"));
    let user = assert_ok!(client.me().await);
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packages/pkg-alps"))
        .and(|request: &Request| !request.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let package = assert_ok!(client.get_package(&PackageId::from("pkg-alps")).await);
    assert_eq!(package.max_group_size, 4);
    assert_eq!(package.itinerary.len(), 3);
}

#[tokio::test]
async fn unauthorized_response_clears_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is not valid" })),
        )
        .mount(&server)
        .await;

    let tokens = signed_in_store("expired");
    let client = client_for(&server, tokens.clone());

    let error = assert_err!(
        client.list_my_bookings(&BookingQuery::page(1, MY_BOOKINGS_PAGE_SIZE)).await
    );
    assert!(error.requires_login());
    assert_eq!(error.user_message(), "Token is not valid");
    assert_eq!(tokens.load().unwrap(), None);
}

#[tokio::test]
async fn package_query_omits_empty_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "9"))
        .and(query_param("sortBy", "createdAt"))
        .and(query_param("sortOrder", "desc"))
        .and(query_param("category", "beach"))
        .and(|request: &Request| {
            request.url.query_pairs().all(|(key, _)| key != "destination" && key != "minPrice")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "packages": [package_json()],
            "pagination": {
                "currentPage": 2,
                "totalPages": 3,
                "totalPackages": 19,
                "hasNext": true,
                "hasPrev": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let query = PackageQuery { category: Some(Category::Beach), ..PackageQuery::listing(2) }
        .with_destination(Some("  ".to_string()));

    let list = assert_ok!(client.list_packages(&query).await);
    assert_eq!(list.packages.len(), 1);
    assert_eq!(list.pagination.total_items(), 19);
}

#[tokio::test]
async fn server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/bookings/bk-1/cancel"))
        .and(body_json(json!({ "cancellationReason": "Cancelled by user" })))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Booking cannot be cancelled" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/stats/dashboard"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store("tok"));

    let error = assert_err!(
        client.cancel_booking(&BookingId::from("bk-1"), "Cancelled by user").await
    );
    assert!(matches!(error, TravelBookError::Api { status: 400, .. }));
    assert_eq!(error.user_message(), "Booking cannot be cancelled");

    let error = assert_err!(client.booking_stats().await);
    assert_eq!(error.user_message(), "Failed to load booking statistics");
}

#[tokio::test]
async fn booking_responses_unwrap_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/bookings/bk-9/status"))
        .and(body_json(json!({ "status": "confirmed" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "booking": booking_json("bk-9", "confirmed") })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/bk-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booking_json("bk-9", "pending")))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store("admin"));
    let id = BookingId::from("bk-9");

    let booking = assert_ok!(client.get_booking(&id).await);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.package.title(), "Alpine Hut to Hut");

    let updated = assert_ok!(client.update_booking_status(&id, BookingStatus::Confirmed).await);
    assert_eq!(updated.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn search_term_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packages/search/new%20york"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([package_json()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let packages = assert_ok!(client.search_packages(" new york ").await);
    assert_eq!(packages.len(), 1);
}

#[tokio::test]
async fn login_stores_token_and_logout_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-fresh",
            "user": user_json("admin")
        })))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let mut session = Session::new(client_for(&server, tokens.clone()));

    let user = assert_ok!(session.login(" ada@example.com ", "secret1").await);
    assert_eq!(user.name, "Ada Lovelace");
    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(tokens.load().unwrap(), Some("jwt-fresh".to_string()));

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(tokens.load().unwrap(), None);
}

#[tokio::test]
async fn failed_login_reports_server_message_and_keeps_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let mut session = Session::new(client_for(&server, Arc::new(MemoryTokenStore::new())));
    let error = assert_err!(session.login("ada@example.com", "wrong-password").await);
    assert_eq!(error.user_message(), "Invalid credentials");
    assert!(session.user().is_none());
}

#[tokio::test]
async fn restore_discards_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let tokens = signed_in_store("stale");
    let mut session = Session::new(client_for(&server, tokens.clone()));

    assert!(assert_ok!(session.restore().await).is_none());
    assert!(!session.is_authenticated());
    assert_eq!(tokens.load().unwrap(), None);
}

#[tokio::test]
async fn restore_with_valid_token_loads_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("user") })))
        .mount(&server)
        .await;

    let mut session = Session::new(client_for(&server, signed_in_store("good")));
    let user = assert_ok!(session.restore().await).cloned();
    assert_eq!(user.map(|u| u.name), Some("Ada Lovelace".to_string()));
    assert!(session.is_authenticated());
    assert!(!session.is_admin());
}

//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use travelbook::api::{ClientConfig, TravelBookClient};
use travelbook::domain::Package;
use travelbook::session::{MemoryTokenStore, TokenStore};
use wiremock::MockServer;

pub fn user_json(role: &str) -> Value {
    json!({
        "_id": "665f1c2ab1",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0958",
        "role": role
    })
}

pub fn package_json() -> Value {
    json!({
        "_id": "pkg-alps",
        "title": "Alpine Hut to Hut",
        "description": "Six days walking between mountain huts",
        "destination": "Chamonix, France",
        "duration": 6,
        "price": 1450,
        "category": "adventure",
        "difficulty": "challenging",
        "maxGroupSize": 4,
        "images": ["https://img.example/alps.jpg"],
        "inclusions": ["Hut stays"],
        "highlights": ["Mont Blanc views"],
        "itinerary": [
            { "day": 1, "title": "Chamonix", "description": "Briefing and kit check" },
            { "day": 2, "title": "Col de Balme", "description": "First crossing" },
            { "day": 3, "title": "Champex", "description": "Lakeside rest" }
        ],
        "availability": {
            "startDate": "2030-06-01T00:00:00.000Z",
            "endDate": "2030-09-30T00:00:00.000Z",
            "availableSlots": 3
        },
        "rating": { "average": 4.5, "count": 12 }
    })
}

pub fn package() -> Package {
    serde_json::from_value(package_json()).expect("package fixture")
}

pub fn booking_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "bookingReference": "TB1718000000000ABCD",
        "package": { "_id": "pkg-alps", "title": "Alpine Hut to Hut" },
        "travelDate": "2030-07-01T00:00:00.000Z",
        "numberOfPeople": 2,
        "totalAmount": 2900,
        "status": status,
        "paymentStatus": "pending",
        "paymentMethod": "credit_card",
        "contactInfo": { "phone": "+44 20 7946 0958", "email": "ada@example.com" },
        "travelerDetails": [
            { "name": "Ada Lovelace", "age": 36 },
            { "name": "Charles Babbage", "age": 41 }
        ]
    })
}

/// Client pointed at the mock server's `/api` root
pub fn client_for(server: &MockServer, tokens: Arc<dyn TokenStore>) -> TravelBookClient {
    let config = ClientConfig {
        base_url: format!("{}/api", server.uri()),
        timeout: 5,
        verbose: true,
    };
    TravelBookClient::new(config, tokens).expect("client")
}

pub fn signed_in_store(token: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(token))
}

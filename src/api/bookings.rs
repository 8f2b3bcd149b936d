//! Booking endpoints, for customers and administrators.

use serde::{Deserialize, Serialize};

use super::client::TravelBookClient;
use crate::domain::{
    Booking, BookingId, BookingStatus, ContactInfo, PackageId, PaymentMethod, PaymentStatus,
    TravelerDetail,
};
use crate::errors::Result;
use crate::pagination::Pagination;

/// Page size of the customer's booking list
pub const MY_BOOKINGS_PAGE_SIZE: u32 = 6;

/// Page size of the admin booking list
pub const ALL_BOOKINGS_PAGE_SIZE: u32 = 10;

/// Reason sent when a customer cancels from the dashboard
pub const CUSTOMER_CANCEL_REASON: &str = "Cancelled by user";

/// Paging and filters for the booking lists
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl BookingQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self { page: Some(page), limit: Some(limit), ..Self::default() }
    }

    /// True for the first page without filters, the page dashboard
    /// statistics are derived from
    pub fn is_unfiltered_first_page(&self) -> bool {
        self.page.unwrap_or(1) == 1 && self.status.is_none() && self.payment_status.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingList {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Body of `POST /bookings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub package: PackageId,
    /// `YYYY-MM-DD`
    pub travel_date: String,
    pub number_of_people: u32,
    pub contact_info: ContactInfo,
    pub traveler_details: Vec<TravelerDetail>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub cancellation_reason: String,
}

/// One row of the per-status aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[serde(rename = "_id")]
    pub status: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

/// Response of `GET /bookings/stats/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingStatsResponse {
    pub status_stats: Vec<StatusCount>,
    pub total_bookings: u64,
    pub total_revenue: f64,
}

impl BookingStatsResponse {
    pub fn count_for(&self, status: BookingStatus) -> u64 {
        self.status_stats
            .iter()
            .find(|s| s.status == status.as_str())
            .map_or(0, |s| s.count)
    }
}

/// Booking responses arrive wrapped in `{ booking }` or bare
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BookingEnvelope {
    Wrapped { booking: Booking },
    Bare(Booking),
}

impl From<BookingEnvelope> for Booking {
    fn from(envelope: BookingEnvelope) -> Self {
        match envelope {
            BookingEnvelope::Wrapped { booking } | BookingEnvelope::Bare(booking) => booking,
        }
    }
}

fn booking_path(id: &BookingId, suffix: &str) -> String {
    format!("/bookings/{}{}", urlencoding::encode(id.as_str()), suffix)
}

impl TravelBookClient {
    /// `GET /bookings`, the signed-in user's bookings
    pub async fn list_my_bookings(&self, query: &BookingQuery) -> Result<BookingList> {
        self.get_query("/bookings", query, "Failed to load bookings").await
    }

    /// `GET /bookings/all` (admin)
    pub async fn list_all_bookings(&self, query: &BookingQuery) -> Result<BookingList> {
        self.get_query("/bookings/all", query, "Failed to load bookings").await
    }

    /// `GET /bookings/:id`
    pub async fn get_booking(&self, id: &BookingId) -> Result<Booking> {
        let envelope: BookingEnvelope =
            self.get_json(&booking_path(id, ""), "Booking not found").await?;
        Ok(envelope.into())
    }

    /// `POST /bookings`
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking> {
        let envelope: BookingEnvelope =
            self.post_json("/bookings", request, "Failed to create booking").await?;
        Ok(envelope.into())
    }

    /// `PUT /bookings/:id/status` (admin)
    pub async fn update_booking_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Booking> {
        let envelope: BookingEnvelope = self
            .put_json(
                &booking_path(id, "/status"),
                &StatusUpdate { status },
                "Failed to update booking status",
            )
            .await?;
        Ok(envelope.into())
    }

    /// `PUT /bookings/:id/cancel`
    pub async fn cancel_booking(&self, id: &BookingId, reason: &str) -> Result<Booking> {
        let body = CancelRequest { cancellation_reason: reason.to_string() };
        let envelope: BookingEnvelope = self
            .put_json(&booking_path(id, "/cancel"), &body, "Failed to cancel booking")
            .await?;
        Ok(envelope.into())
    }

    /// `GET /bookings/stats/dashboard` (admin)
    pub async fn booking_stats(&self) -> Result<BookingStatsResponse> {
        self.get_json("/bookings/stats/dashboard", "Failed to load booking statistics").await
    }
}

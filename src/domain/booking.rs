//! Bookings and their lifecycle enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::api_enum;
use super::id::{BookingId, PackageId, UserId};
use super::package::PackageSummary;
use super::user::UserSummary;

api_enum! {
    /// Lifecycle status of a booking
    BookingStatus("booking status") {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

api_enum! {
    PaymentStatus("payment status") {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
}

api_enum! {
    PaymentMethod("payment method") {
        CreditCard => "credit_card",
        DebitCard => "debit_card",
        Paypal => "paypal",
        BankTransfer => "bank_transfer",
    }
}

api_enum! {
    Gender("gender") {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CreditCard
    }
}

impl BookingStatus {
    /// Statuses an administrator may move a booking to from this one
    pub fn admin_transitions(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Completed],
            BookingStatus::Cancelled | BookingStatus::Completed => &[],
        }
    }

    /// Pending and confirmed bookings are still going to happen
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A reference the API returns either as a bare id or as a populated record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populated<I, T> {
    Record(T),
    Id(I),
}

impl<I, T> Populated<I, T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Populated::Record(record) => Some(record),
            Populated::Id(_) => None,
        }
    }
}

impl Populated<PackageId, PackageSummary> {
    pub fn id(&self) -> &PackageId {
        match self {
            Populated::Record(record) => &record.id,
            Populated::Id(id) => id,
        }
    }

    /// Title when populated, otherwise the id
    pub fn title(&self) -> &str {
        match self {
            Populated::Record(record) => &record.title,
            Populated::Id(id) => id.as_str(),
        }
    }
}

impl Populated<UserId, UserSummary> {
    pub fn id(&self) -> &UserId {
        match self {
            Populated::Record(record) => &record.id,
            Populated::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerDetail {
    pub name: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

/// A customer's reservation against a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: BookingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Populated<UserId, UserSummary>>,
    pub package: Populated<PackageId, PackageSummary>,
    pub travel_date: DateTime<Utc>,
    pub number_of_people: u32,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub traveler_details: Vec<TravelerDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Reference shown to customers, falling back to the document id
    pub fn reference(&self) -> &str {
        self.booking_reference.as_deref().unwrap_or(self.id.as_str())
    }
}

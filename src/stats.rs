//! Dashboard figures derived from fetched bookings, plus the booking
//! action policy.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::bookings::BookingStatsResponse;
use crate::domain::{Booking, BookingStatus, PaymentStatus};
use crate::pagination::Pagination;
use crate::utils::days_until;

/// Headline numbers on the customer dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_bookings: u64,
    pub upcoming_trips: usize,
    pub completed_trips: usize,
    pub total_spent: f64,
}

impl CustomerStats {
    /// Derive from the first, unfiltered page of the user's bookings.
    /// The total count comes from the server envelope.
    pub fn derive(bookings: &[Booking], pagination: &Pagination, now: DateTime<Utc>) -> Self {
        Self {
            total_bookings: pagination.total_bookings.unwrap_or(0),
            upcoming_trips: bookings
                .iter()
                .filter(|b| b.status.is_active() && b.travel_date > now)
                .count(),
            completed_trips: count_status(bookings, BookingStatus::Completed),
            total_spent: paid_revenue(bookings),
        }
    }
}

/// Summary strip on the admin bookings page, over the bookings shown
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub revenue: f64,
}

impl BookingSummary {
    pub fn derive(bookings: &[Booking]) -> Self {
        Self {
            pending: count_status(bookings, BookingStatus::Pending),
            confirmed: count_status(bookings, BookingStatus::Confirmed),
            completed: count_status(bookings, BookingStatus::Completed),
            revenue: paid_revenue(bookings),
        }
    }
}

/// Cards on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_packages: u64,
    pub total_bookings: u64,
    pub total_revenue: f64,
    pub pending_bookings: u64,
}

impl AdminDashboardStats {
    /// Combine the package listing envelope with the stats endpoint. A
    /// missing stats response counts as zeros.
    pub fn derive(packages: &Pagination, stats: Option<&BookingStatsResponse>) -> Self {
        let (total_bookings, total_revenue, pending_bookings) = match stats {
            Some(stats) => (
                stats.total_bookings,
                stats.total_revenue,
                stats.count_for(BookingStatus::Pending),
            ),
            None => (0, 0.0, 0),
        };
        Self {
            total_packages: packages.total_packages.unwrap_or(0),
            total_bookings,
            total_revenue,
            pending_bookings,
        }
    }
}

fn count_status(bookings: &[Booking], status: BookingStatus) -> usize {
    bookings.iter().filter(|b| b.status == status).count()
}

fn paid_revenue(bookings: &[Booking]) -> f64 {
    bookings
        .iter()
        .filter(|b| b.payment_status == PaymentStatus::Paid)
        .map(|b| b.total_amount)
        .sum()
}

/// A customer may cancel an active booking until the day of travel
pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status.is_active() && days_until(booking.travel_date, now) > 0
}

/// Status changes offered to an administrator for `booking`
pub fn admin_actions(booking: &Booking) -> &'static [BookingStatus] {
    booking.status.admin_transitions()
}

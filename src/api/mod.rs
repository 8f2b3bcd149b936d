//! # Remote API
//!
//! Typed access to the TravelBook REST API. [`TravelBookClient`] owns the
//! transport; endpoint methods live next to their request and response
//! types in the submodules.

pub mod auth;
pub mod bookings;
pub mod client;
pub mod packages;

pub use auth::{AuthResponse, ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest};
pub use bookings::{
    BookingList, BookingQuery, BookingStatsResponse, CreateBookingRequest, StatusCount,
    ALL_BOOKINGS_PAGE_SIZE, CUSTOMER_CANCEL_REASON, MY_BOOKINGS_PAGE_SIZE,
};
pub use client::{ClientConfig, MessageResponse, TravelBookClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use packages::{
    AvailabilityRequest, PackageList, PackageQuery, PackageRequest, SortOrder, ADMIN_PAGE_SIZE,
    PACKAGES_PAGE_SIZE,
};

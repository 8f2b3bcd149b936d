//! # Domain Model
//!
//! Records exchanged with the TravelBook API. Field names follow the API's
//! camelCase JSON with `_id` document identifiers.

/// Error returned when a lowercase API enum value is not recognised
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: '{value}'")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Declare an enum serialized as the API's lowercase strings, with
/// `as_str`, `Display`, `FromStr` and an `ALL` listing.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $wire => Ok($name::$variant), )+
                    other => Err($crate::domain::EnumParseError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use api_enum;

pub mod booking;
pub mod id;
pub mod package;
pub mod user;

pub use booking::{
    Booking, BookingStatus, ContactInfo, EmergencyContact, Gender, PaymentMethod, PaymentStatus,
    Populated, TravelerDetail,
};
pub use id::{BookingId, PackageId, UserId};
pub use package::{
    Availability, Category, Difficulty, ItineraryDay, Meals, Package, PackageSummary, Rating,
};
pub use user::{Address, Role, User, UserSummary};

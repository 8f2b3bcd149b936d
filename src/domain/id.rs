//! Document identifiers
//!
//! Newtypes over the opaque string ids the TravelBook API hands out, one
//! per document kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// String newtype for one kind of document id
macro_rules! domain_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

domain_id!(
    /// Identifier of a travel package
    PackageId
);

domain_id!(
    /// Identifier of a booking
    BookingId
);

domain_id!(
    /// Identifier of a user account
    UserId
);

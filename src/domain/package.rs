//! Travel packages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::api_enum;
use super::id::PackageId;

api_enum! {
    /// Package theme used for filtering
    Category("category") {
        Adventure => "adventure",
        Beach => "beach",
        Cultural => "cultural",
        Luxury => "luxury",
        Budget => "budget",
        Family => "family",
        Romantic => "romantic",
        Business => "business",
    }
}

api_enum! {
    /// Physical difficulty of a package
    Difficulty("difficulty") {
        Easy => "easy",
        Moderate => "moderate",
        Challenging => "challenging",
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Adventure
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

/// Meals included on an itinerary day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: bool,
    #[serde(default)]
    pub lunch: bool,
    #[serde(default)]
    pub dinner: bool,
}

/// One day of a package itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meals: Meals,
}

/// Bookable window and remaining capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub available_slots: u32,
}

impl Availability {
    /// True when `date` lies within the bookable window, bounds included
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u32,
}

/// A sellable travel itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: PackageId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub destination: String,
    /// Length in days
    pub duration: u32,
    pub price: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub max_group_size: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    pub availability: Availability,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Package {
    /// Largest party a single booking may carry right now
    pub fn max_party_size(&self) -> u32 {
        self.max_group_size.min(self.availability.available_slots)
    }

    /// Price for `people` travelers
    pub fn total_for(&self, people: u32) -> f64 {
        self.price * f64::from(people)
    }

    pub fn is_sold_out(&self) -> bool {
        self.availability.available_slots == 0
    }
}

/// The subset of a package embedded in populated bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    #[serde(rename = "_id")]
    pub id: PackageId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

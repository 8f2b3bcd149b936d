//! Package catalogue endpoints.

use serde::{Deserialize, Serialize};

use super::client::{MessageResponse, TravelBookClient};
use crate::domain::{Category, Difficulty, ItineraryDay, Package, PackageId};
use crate::errors::Result;
use crate::pagination::Pagination;

/// Page size of the public package listing
pub const PACKAGES_PAGE_SIZE: u32 = 9;

/// Page size of the admin package inventory
pub const ADMIN_PAGE_SIZE: u32 = 10;

/// Filters and paging for `GET /packages`. Unset values are left out of
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
}

impl PackageQuery {
    /// Public listing defaults: newest first, nine per page
    pub fn listing(page: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(PACKAGES_PAGE_SIZE),
            sort_by: Some("createdAt".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..Self::default()
        }
    }

    /// Blank destination text counts as no filter
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        self.destination = destination.filter(|d| !d.trim().is_empty());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageList {
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Search results arrive either wrapped or as a bare array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Wrapped { packages: Vec<Package> },
    Bare(Vec<Package>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// `YYYY-MM-DD`
    pub start_date: String,
    pub end_date: String,
    pub available_slots: u32,
}

/// Body of package create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    pub title: String,
    pub description: String,
    pub destination: String,
    pub duration: u32,
    pub price: f64,
    pub category: Category,
    pub difficulty: Difficulty,
    pub max_group_size: u32,
    pub images: Vec<String>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub highlights: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub availability: AvailabilityRequest,
}

/// Create and update responses carry the package, wrapped or bare
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PackageEnvelope {
    Wrapped { package: Package },
    Bare(Package),
}

impl From<PackageEnvelope> for Package {
    fn from(envelope: PackageEnvelope) -> Self {
        match envelope {
            PackageEnvelope::Wrapped { package } | PackageEnvelope::Bare(package) => package,
        }
    }
}

impl TravelBookClient {
    /// `GET /packages`
    pub async fn list_packages(&self, query: &PackageQuery) -> Result<PackageList> {
        self.get_query("/packages", query, "Failed to load packages").await
    }

    /// `GET /packages/:id`
    pub async fn get_package(&self, id: &PackageId) -> Result<Package> {
        let path = format!("/packages/{}", urlencoding::encode(id.as_str()));
        let envelope: PackageEnvelope = self.get_json(&path, "Package not found").await?;
        Ok(envelope.into())
    }

    /// `POST /packages`
    pub async fn create_package(&self, request: &PackageRequest) -> Result<Package> {
        let envelope: PackageEnvelope =
            self.post_json("/packages", request, "Failed to create package").await?;
        Ok(envelope.into())
    }

    /// `PUT /packages/:id`
    pub async fn update_package(&self, id: &PackageId, request: &PackageRequest) -> Result<Package> {
        let path = format!("/packages/{}", urlencoding::encode(id.as_str()));
        let envelope: PackageEnvelope =
            self.put_json(&path, request, "Failed to update package").await?;
        Ok(envelope.into())
    }

    /// `DELETE /packages/:id`
    pub async fn delete_package(&self, id: &PackageId) -> Result<MessageResponse> {
        let path = format!("/packages/{}", urlencoding::encode(id.as_str()));
        self.delete_json(&path, "Failed to delete package").await
    }

    /// `GET /packages/search/:term`
    pub async fn search_packages(&self, term: &str) -> Result<Vec<Package>> {
        let path = format!("/packages/search/{}", urlencoding::encode(term.trim()));
        let response: SearchResponse = self.get_json(&path, "Search failed").await?;
        Ok(match response {
            SearchResponse::Wrapped { packages } | SearchResponse::Bare(packages) => packages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_omits_unset_filters() {
        let query = PackageQuery {
            category: Some(Category::Beach),
            min_price: Some(500.0),
            ..PackageQuery::listing(2)
        }
        .with_destination(Some("   ".to_string()));

        let json = serde_json::to_value(&query).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(json["category"], "beach");
        assert_eq!(json["sortBy"], "createdAt");
        assert_eq!(json["sortOrder"], "desc");
        assert_eq!(json["limit"], 9);
        assert!(json.get("destination").is_none());
        assert!(json.get("maxDuration").is_none());
    }

    #[test]
    fn test_envelopes() {
        let wrapped: SearchResponse = serde_json::from_str(r#"{"packages": []}"#).unwrap();
        assert!(matches!(wrapped, SearchResponse::Wrapped { .. }));
        let bare: SearchResponse = serde_json::from_str("[]").unwrap();
        assert!(matches!(bare, SearchResponse::Bare(_)));
    }

    #[test]
    fn test_list_without_pagination_defaults() {
        let list: PackageList = serde_json::from_str(r#"{"packages": []}"#).unwrap();
        assert_eq!(list.pagination.total_items(), 0);
    }
}

//! Admin package form, shared by the create and edit flows.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::array_sync::{push_blank, remove_and_renumber, remove_at, Positional};
use super::path::FieldPath;
use super::rules::{RuleSet, ValidationResult, ValidationRule};
use super::state::FormState;
use super::Form;
use crate::api::packages::{AvailabilityRequest, PackageRequest};
use crate::domain::{Category, Difficulty, ItineraryDay, Meals, Package, PackageId};
use crate::errors::{Result, TravelBookError};
use crate::utils::{format_date_input, parse_date_input};

/// List sections that need at least one non-blank entry
const REQUIRED_LISTS: [&str; 3] = ["images", "inclusions", "highlights"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PackageFormMode {
    #[default]
    Create,
    Edit(PackageId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryDayForm {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub meals: Meals,
}

impl ItineraryDayForm {
    pub fn blank(day: u32) -> Self {
        Self { day, title: String::new(), description: String::new(), meals: Meals::default() }
    }

    fn is_filled(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

impl Default for ItineraryDayForm {
    fn default() -> Self {
        Self::blank(1)
    }
}

impl Positional for ItineraryDayForm {
    fn set_position(&mut self, position: u32) {
        self.day = position;
    }
}

impl From<&ItineraryDay> for ItineraryDayForm {
    fn from(day: &ItineraryDay) -> Self {
        Self {
            day: day.day,
            title: day.title.clone(),
            description: day.description.clone(),
            meals: day.meals,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailabilityForm {
    pub start_date: String,
    pub end_date: String,
    pub available_slots: String,
}

/// Package fields as edited in the admin console. Numeric inputs are kept
/// as text until submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageForm {
    #[serde(skip)]
    mode: PackageFormMode,
    #[serde(skip, default = "current_date")]
    today: NaiveDate,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub duration: String,
    pub price: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub max_group_size: String,
    pub images: Vec<String>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub highlights: Vec<String>,
    pub itinerary: Vec<ItineraryDayForm>,
    pub availability: AvailabilityForm,
}

fn current_date() -> NaiveDate {
    Utc::now().date_naive()
}

fn one_or_blank(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        vec![String::new()]
    } else {
        items.to_vec()
    }
}

fn non_blank_entries(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl PackageForm {
    /// Empty create form. The availability window defaults to a year
    /// starting `today`.
    pub fn create(today: NaiveDate) -> Self {
        Self {
            mode: PackageFormMode::Create,
            today,
            title: String::new(),
            description: String::new(),
            destination: String::new(),
            duration: String::new(),
            price: String::new(),
            category: Category::default(),
            difficulty: Difficulty::default(),
            max_group_size: String::new(),
            images: vec![String::new()],
            inclusions: vec![String::new()],
            exclusions: vec![String::new()],
            highlights: vec![String::new()],
            itinerary: vec![ItineraryDayForm::blank(1)],
            availability: AvailabilityForm {
                start_date: format_date_input(today),
                end_date: format_date_input(today + chrono::Duration::days(365)),
                available_slots: String::new(),
            },
        }
    }

    /// Edit form seeded from a fetched package
    pub fn edit(package: &Package, today: NaiveDate) -> Self {
        let itinerary = if package.itinerary.is_empty() {
            vec![ItineraryDayForm::blank(1)]
        } else {
            package.itinerary.iter().map(ItineraryDayForm::from).collect()
        };
        Self {
            mode: PackageFormMode::Edit(package.id.clone()),
            today,
            title: package.title.clone(),
            description: package.description.clone(),
            destination: package.destination.clone(),
            duration: package.duration.to_string(),
            price: package.price.to_string(),
            category: package.category,
            difficulty: package.difficulty,
            max_group_size: package.max_group_size.to_string(),
            images: one_or_blank(&package.images),
            inclusions: one_or_blank(&package.inclusions),
            exclusions: one_or_blank(&package.exclusions),
            highlights: one_or_blank(&package.highlights),
            itinerary,
            availability: AvailabilityForm {
                start_date: format_date_input(package.availability.start_date.date_naive()),
                end_date: format_date_input(package.availability.end_date.date_naive()),
                available_slots: package.availability.available_slots.to_string(),
            },
        }
    }

    pub fn mode(&self) -> &PackageFormMode {
        &self.mode
    }

    /// Override the date used for the "start in the future" check
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn list_mut(&mut self, name: &str) -> Result<&mut Vec<String>> {
        match name {
            "images" => Ok(&mut self.images),
            "inclusions" => Ok(&mut self.inclusions),
            "exclusions" => Ok(&mut self.exclusions),
            "highlights" => Ok(&mut self.highlights),
            other => Err(TravelBookError::field_path(other, "not a list section")),
        }
    }

    /// Append a blank entry to a list section
    pub fn add_list_item(&mut self, name: &str) -> Result<()> {
        push_blank(self.list_mut(name)?, |_| String::new());
        Ok(())
    }

    /// Remove a list entry; the last remaining entry is kept
    pub fn remove_list_item(&mut self, name: &str, index: usize) -> Result<bool> {
        Ok(remove_at(self.list_mut(name)?, index).is_some())
    }

    /// Append a blank itinerary day numbered after the existing ones
    pub fn add_itinerary_day(&mut self) {
        push_blank(&mut self.itinerary, |index| ItineraryDayForm::blank(index as u32 + 1));
    }

    /// Remove an itinerary day and renumber the rest from 1
    pub fn remove_itinerary_day(&mut self, index: usize) -> bool {
        remove_and_renumber(&mut self.itinerary, index).is_some()
    }

    /// Overlay the fields of a JSON document onto the form. Nested objects
    /// merge key by key; numbers given for text inputs are kept as text.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        if !overrides.is_object() {
            return Err(TravelBookError::validation("Package document must be an object"));
        }
        let mut state = FormState::from_model(&*self)?;
        overlay(&mut state, FieldPath::root(), overrides)?;
        let merged: PackageForm = state.to_model()?;
        *self = Self { mode: self.mode.clone(), today: self.today, ..merged };
        Ok(())
    }

    fn list(&self, name: &str) -> &[String] {
        match name {
            "images" => &self.images,
            "inclusions" => &self.inclusions,
            "highlights" => &self.highlights,
            _ => &self.exclusions,
        }
    }
}

impl Form for PackageForm {
    type Request = PackageRequest;

    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .rule(
                FieldPath::key("title"),
                ValidationRule::new().required().min_length(3).max_length(100),
            )
            .rule(
                FieldPath::key("description"),
                ValidationRule::new().required().min_length(10).max_length(2000),
            )
            .rule(FieldPath::key("destination"), ValidationRule::new().required())
            .rule(FieldPath::key("duration"), ValidationRule::new().required().min(1))
            .rule(FieldPath::key("price"), ValidationRule::new().required().min(0))
            .rule(FieldPath::key("maxGroupSize"), ValidationRule::new().required().min(1))
            .rule(
                FieldPath::key("availability").field("availableSlots"),
                ValidationRule::new().required().min(0),
            )
    }

    fn cross_check(&self, result: &mut ValidationResult) {
        let start = parse_date_input(&self.availability.start_date);
        let end = parse_date_input(&self.availability.end_date);

        match (start, end) {
            (Some(start), Some(end)) if end <= start => result.insert(
                FieldPath::key("availability").field("endDate"),
                "End date must be after start date",
            ),
            (_, None) => result.insert(
                FieldPath::key("availability").field("endDate"),
                "End date is required",
            ),
            _ => {}
        }

        match start {
            None => result.insert(
                FieldPath::key("availability").field("startDate"),
                "Start date is required",
            ),
            Some(start) if self.mode == PackageFormMode::Create && start <= self.today => {
                result.insert(
                    FieldPath::key("availability").field("startDate"),
                    "Start date must be in the future",
                )
            }
            Some(_) => {}
        }

        for name in REQUIRED_LISTS {
            if non_blank_entries(self.list(name)).is_empty() {
                let singular = name.trim_end_matches('s');
                result.insert(FieldPath::key(name), format!("At least one {} is required", singular));
            }
        }
    }

    fn to_request(&self) -> Result<PackageRequest> {
        let start = parse_date_input(&self.availability.start_date);
        let end = parse_date_input(&self.availability.end_date);
        let (Some(start_date), Some(end_date)) = (start, end) else {
            return Err(TravelBookError::validation_field(
                "Availability dates are required",
                "availability",
            ));
        };

        Ok(PackageRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            destination: self.destination.trim().to_string(),
            duration: parse_whole(&self.duration, "duration")?,
            price: parse_amount(&self.price, "price")?,
            category: self.category,
            difficulty: self.difficulty,
            max_group_size: parse_whole(&self.max_group_size, "maxGroupSize")?,
            images: non_blank_entries(&self.images),
            inclusions: non_blank_entries(&self.inclusions),
            exclusions: non_blank_entries(&self.exclusions),
            highlights: non_blank_entries(&self.highlights),
            itinerary: self
                .itinerary
                .iter()
                .filter(|day| day.is_filled())
                .map(|day| ItineraryDay {
                    day: day.day,
                    title: day.title.trim().to_string(),
                    description: day.description.trim().to_string(),
                    meals: day.meals,
                })
                .collect(),
            availability: AvailabilityRequest {
                start_date: format_date_input(start_date),
                end_date: format_date_input(end_date),
                available_slots: parse_whole(&self.availability.available_slots, "availability.availableSlots")?,
            },
        })
    }
}

fn overlay(state: &mut FormState, path: FieldPath, value: &Value) -> Result<()> {
    match value {
        Value::Object(fields) if path.is_root() || state.get(&path).is_some_and(Value::is_object) => {
            for (key, nested) in fields {
                overlay(state, path.clone().field(key.as_str()), nested)?;
            }
            Ok(())
        }
        Value::Number(number) if state.get(&path).is_some_and(Value::is_string) => {
            state.set(&path, number.to_string())
        }
        other => state.set(&path, other.clone()),
    }
}

fn parse_whole(text: &str, field: &str) -> Result<u32> {
    text.trim().parse::<u32>().map_err(|_| {
        TravelBookError::validation_field(format!("{} must be a whole number", field), field)
    })
}

fn parse_amount(text: &str, field: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| TravelBookError::validation_field(format!("{} must be a number", field), field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Availability, Rating};
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 10).unwrap()
    }

    fn filled() -> PackageForm {
        let mut form = PackageForm::create(today());
        form.title = "Fjords by Boat".into();
        form.description = "Seven days along the Norwegian coast".into();
        form.destination = "Norway".into();
        form.duration = "7".into();
        form.price = "2100".into();
        form.max_group_size = "10".into();
        form.images = vec!["https://img.example/fjord.jpg".into()];
        form.inclusions = vec!["Ferry tickets".into(), "  ".into()];
        form.highlights = vec!["Geirangerfjord".into()];
        form.availability.start_date = "2030-05-01".into();
        form.availability.end_date = "2030-09-30".into();
        form.availability.available_slots = "20".into();
        form
    }

    #[test]
    fn test_create_defaults() {
        let form = PackageForm::create(today());
        assert_eq!(form.availability.start_date, "2030-01-10");
        assert_eq!(form.availability.end_date, "2031-01-10");
        assert_eq!(form.images, vec![String::new()]);
        assert_eq!(form.itinerary, vec![ItineraryDayForm::blank(1)]);
    }

    #[test]
    fn test_valid_form_cleans_lists() {
        let mut form = filled();
        form.itinerary[0].title = "Bergen".into();
        form.add_itinerary_day();

        let request = form.submit().unwrap();
        assert_eq!(request.inclusions, vec!["Ferry tickets".to_string()]);
        assert!(request.exclusions.is_empty());
        assert!(request.itinerary.is_empty());
        assert_eq!(request.duration, 7);
        assert_eq!(request.availability.available_slots, 20);
    }

    #[test]
    fn test_merge_json_keeps_mode_and_untouched_fields() {
        let mut form = filled();
        form.merge_json(&serde_json::json!({
            "price": 1999.5,
            "availability": { "availableSlots": 12 },
            "highlights": ["Preikestolen", "Geirangerfjord"]
        }))
        .unwrap();

        assert_eq!(form.price, "1999.5");
        assert_eq!(form.availability.available_slots, "12");
        assert_eq!(form.availability.start_date, "2030-05-01");
        assert_eq!(form.highlights.len(), 2);
        assert_eq!(form.title, "Fjords by Boat");
        assert_eq!(form.mode(), &PackageFormMode::Create);
        assert!(form.merge_json(&serde_json::json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_blank_image_list_is_rejected() {
        let mut form = filled();
        form.images = vec!["   ".into(), String::new()];
        let result = form.validate().unwrap();
        assert_eq!(result.message_for("images"), Some("At least one image is required"));
    }

    #[test]
    fn test_date_checks() {
        let mut form = filled();
        form.availability.end_date = "2030-05-01".into();
        let result = form.validate().unwrap();
        assert_eq!(
            result.message_for("availability.endDate"),
            Some("End date must be after start date")
        );

        let mut form = filled();
        form.availability.start_date = "2030-01-10".into();
        let result = form.validate().unwrap();
        assert_eq!(
            result.message_for("availability.startDate"),
            Some("Start date must be in the future")
        );
    }

    #[test]
    fn test_zero_price_and_slots_accepted() {
        let mut form = filled();
        form.price = "0".into();
        form.availability.available_slots = "0".into();
        assert!(form.validate().unwrap().is_valid());

        form.price = "-5".into();
        let result = form.validate().unwrap();
        assert_eq!(result.message_for("price"), Some("price must be at least 0"));
    }

    #[test]
    fn test_itinerary_removal_renumbers() {
        let mut form = filled();
        form.add_itinerary_day();
        form.add_itinerary_day();
        form.itinerary[2].title = "Last".into();

        assert!(form.remove_itinerary_day(0));
        let days: Vec<u32> = form.itinerary.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 2]);
        assert_eq!(form.itinerary[1].title, "Last");

        assert!(form.remove_itinerary_day(0));
        assert!(!form.remove_itinerary_day(0));
        assert_eq!(form.itinerary.len(), 1);
    }

    #[test]
    fn test_list_items_keep_one_entry() {
        let mut form = filled();
        form.add_list_item("highlights").unwrap();
        assert_eq!(form.highlights.len(), 2);
        assert!(form.remove_list_item("highlights", 1).unwrap());
        assert!(!form.remove_list_item("highlights", 0).unwrap());
        assert!(form.add_list_item("itinerary").is_err());
    }

    #[test]
    fn test_edit_seeds_from_package_and_allows_past_start() {
        let package = Package {
            id: PackageId::from("pkg-7"),
            title: "Old Town Walk".into(),
            description: "A slow afternoon in Tallinn".into(),
            destination: "Estonia".into(),
            duration: 1,
            price: 80.0,
            category: Category::Cultural,
            difficulty: Difficulty::Easy,
            max_group_size: 15,
            images: vec!["https://img.example/tallinn.jpg".into()],
            inclusions: vec!["Guide".into()],
            exclusions: vec![],
            highlights: vec!["Town hall".into()],
            itinerary: vec![],
            availability: Availability {
                start_date: Utc.with_ymd_and_hms(2029, 6, 1, 0, 0, 0).unwrap(),
                end_date: Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap(),
                available_slots: 15,
            },
            rating: Rating::default(),
            created_at: None,
        };

        let form = PackageForm::edit(&package, today());
        assert_eq!(form.mode(), &PackageFormMode::Edit(PackageId::from("pkg-7")));
        assert_eq!(form.exclusions, vec![String::new()]);
        assert_eq!(form.price, "80");
        assert_eq!(form.availability.start_date, "2029-06-01");
        assert!(form.validate().unwrap().is_valid());
    }
}

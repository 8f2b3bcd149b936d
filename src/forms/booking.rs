//! The booking form: travel date, party size, contact details and one
//! traveler record per person.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::array_sync::sync_len;
use super::path::FieldPath;
use super::rules::{RuleSet, ValidationResult, ValidationRule};
use super::state::FormState;
use super::Form;
use crate::api::bookings::CreateBookingRequest;
use crate::domain::{
    Availability, ContactInfo, EmergencyContact, Gender, Package, PackageId, PaymentMethod,
    TravelerDetail, User,
};
use crate::errors::{Result, TravelBookError};
use crate::utils::{format_date_input, parse_date_input};

/// Package facts the booking form validates against
#[derive(Debug, Clone, PartialEq)]
pub struct BookingTarget {
    pub package_id: PackageId,
    pub price: f64,
    pub max_group_size: u32,
    pub availability: Availability,
}

impl From<&Package> for BookingTarget {
    fn from(package: &Package) -> Self {
        Self {
            package_id: package.id.clone(),
            price: package.price,
            max_group_size: package.max_group_size,
            availability: package.availability.clone(),
        }
    }
}

/// One traveler as typed into the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelerForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub passport_number: String,
    pub nationality: String,
}

impl TravelerForm {
    fn to_detail(&self, index: usize) -> Result<TravelerDetail> {
        let age = self.age.trim().parse::<u32>().map_err(|_| {
            TravelBookError::validation_field(
                "Traveler age must be a whole number",
                format!("travelerDetails.{}.age", index),
            )
        })?;
        let gender = match self.gender.trim() {
            "" => None,
            value => Some(value.parse::<Gender>().map_err(|e| {
                TravelBookError::validation_field(
                    e.to_string(),
                    format!("travelerDetails.{}.gender", index),
                )
            })?),
        };
        Ok(TravelerDetail {
            name: self.name.trim().to_string(),
            age,
            gender,
            passport_number: non_blank(&self.passport_number),
            nationality: non_blank(&self.nationality),
        })
    }
}

/// Booking form for a single package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(skip)]
    target: Option<BookingTarget>,
    pub travel_date: String,
    #[serde(deserialize_with = "party_size")]
    pub number_of_people: u32,
    pub contact_info: ContactInfo,
    pub traveler_details: Vec<TravelerForm>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub special_requests: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            target: None,
            travel_date: String::new(),
            number_of_people: 1,
            contact_info: ContactInfo::default(),
            traveler_details: vec![TravelerForm::default()],
            payment_method: PaymentMethod::default(),
            special_requests: String::new(),
        }
    }
}

impl BookingForm {
    /// Blank form for `package`, prefilled from the signed-in user.
    ///
    /// The travel date starts at the later of `today` and the first
    /// bookable day.
    pub fn for_package(package: &Package, user: Option<&User>, today: NaiveDate) -> Self {
        let first_day = package.availability.start_date.date_naive();
        let mut form = Self {
            target: Some(BookingTarget::from(package)),
            travel_date: format_date_input(first_day.max(today)),
            ..Self::default()
        };
        if let Some(user) = user {
            form.contact_info.email = user.email.clone();
            form.contact_info.phone = user.phone.clone().unwrap_or_default();
        }
        form
    }

    pub fn target(&self) -> Option<&BookingTarget> {
        self.target.as_ref()
    }

    /// Change the party size and resize the traveler list to match
    pub fn set_number_of_people(&mut self, count: u32) {
        self.number_of_people = count;
        sync_len(&mut self.traveler_details, count as usize, |_| TravelerForm::default());
    }

    /// Template for a traveler slot in a [`FormState`]
    pub fn traveler_template() -> Value {
        serde_json::to_value(TravelerForm::default()).unwrap_or(Value::Null)
    }

    /// Editable state for field-by-field input
    pub fn state(&self) -> Result<FormState> {
        FormState::from_model(self)
    }

    /// Resize `travelerDetails` in `state` to its `numberOfPeople` field
    pub fn sync_travelers(state: &mut FormState) -> Result<()> {
        let count_path = FieldPath::key("numberOfPeople");
        let count = state
            .get_text(&count_path)
            .and_then(|text| text.trim().parse::<usize>().ok())
            .unwrap_or(0);
        state.sync_array(&FieldPath::key("travelerDetails"), count, &Self::traveler_template())
    }

    /// Take the editable fields from `state`, keeping the package target.
    ///
    /// `numberOfPeople` may be a number or numeric text; anything else is a
    /// field error.
    pub fn update_from(&mut self, state: &FormState) -> Result<()> {
        let count = state.get_text(&FieldPath::key("numberOfPeople"));
        if count.map_or(true, |text| text.trim().parse::<u32>().is_err()) {
            return Err(TravelBookError::validation_field(
                "Number of people must be a whole number",
                "numberOfPeople",
            ));
        }

        let target = self.target.take();
        *self = state.to_model()?;
        self.target = target;
        Ok(())
    }

    /// Price of the booking at the current party size
    pub fn total_amount(&self) -> Option<f64> {
        self.target
            .as_ref()
            .map(|target| target.price * f64::from(self.number_of_people))
    }
}

impl Form for BookingForm {
    type Request = CreateBookingRequest;

    fn rules(&self) -> RuleSet {
        let mut people = ValidationRule::new().required().min(1);
        if let Some(target) = &self.target {
            people = people.max(target.max_group_size);
        }

        let mut rules = RuleSet::new()
            .rule(FieldPath::key("travelDate"), ValidationRule::new().required())
            .rule(FieldPath::key("numberOfPeople"), people)
            .rule(
                FieldPath::key("contactInfo").field("phone"),
                ValidationRule::new().required().phone(),
            )
            .rule(
                FieldPath::key("contactInfo").field("email"),
                ValidationRule::new().required().email(),
            );

        let travelers = self.traveler_details.len().max(self.number_of_people as usize);
        for index in 0..travelers {
            let traveler = FieldPath::key("travelerDetails").index(index);
            rules.insert(
                traveler.clone().field("name"),
                ValidationRule::new().required().min_length(2),
            );
            rules.insert(
                traveler.field("age"),
                ValidationRule::new().required().min(1).max(120),
            );
        }
        rules
    }

    fn cross_check(&self, result: &mut ValidationResult) {
        let Some(target) = &self.target else {
            return;
        };

        if !self.travel_date.trim().is_empty() {
            match parse_date_input(&self.travel_date) {
                Some(date) => {
                    let at_midnight = Utc.from_utc_datetime(&date.and_time(Default::default()));
                    if !target.availability.contains(at_midnight) {
                        result.insert(
                            FieldPath::key("travelDate"),
                            "Travel date must be within package availability period",
                        );
                    }
                }
                None => result.insert(FieldPath::key("travelDate"), "Please enter a valid travel date"),
            }
        }

        let slots = target.availability.available_slots;
        if self.number_of_people > slots {
            result.insert(
                FieldPath::key("numberOfPeople"),
                format!("Only {} slots available", slots),
            );
        }
    }

    fn to_request(&self) -> Result<CreateBookingRequest> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| TravelBookError::validation("No package selected for this booking"))?;
        let travel_date = parse_date_input(&self.travel_date).ok_or_else(|| {
            TravelBookError::validation_field("Please enter a valid travel date", "travelDate")
        })?;
        let traveler_details = self
            .traveler_details
            .iter()
            .take(self.number_of_people as usize)
            .enumerate()
            .map(|(index, traveler)| traveler.to_detail(index))
            .collect::<Result<Vec<_>>>()?;

        let emergency = &self.contact_info.emergency_contact;
        Ok(CreateBookingRequest {
            package: target.package_id.clone(),
            travel_date: format_date_input(travel_date),
            number_of_people: self.number_of_people,
            contact_info: ContactInfo {
                phone: self.contact_info.phone.trim().to_string(),
                email: self.contact_info.email.trim().to_string(),
                emergency_contact: EmergencyContact {
                    name: emergency.name.trim().to_string(),
                    phone: emergency.phone.trim().to_string(),
                    relationship: emergency.relationship.trim().to_string(),
                },
            },
            traveler_details,
            payment_method: self.payment_method,
            special_requests: non_blank(&self.special_requests),
        })
    }
}

/// Party size as a number or as the text of a number input
fn party_size<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(count) => Ok(count),
        Count::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number of people: {:?}", text))),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//! Keeps variable-length form sections in step with their count fields.
//!
//! Growing appends blank records, shrinking truncates from the end. Records
//! that carry a 1-based position (itinerary days) are renumbered after a
//! removal. Existing entries are never reordered or merged.

use serde_json::Value;
use tracing::debug;

use super::path::FieldPath;
use super::state::FormState;
use crate::errors::{Result, TravelBookError};

/// A record whose position in its list is stored inside the record
pub trait Positional {
    fn set_position(&mut self, position: u32);
}

/// Resize `items` to `len`, building new entries with `blank(index)`
pub fn sync_len<T>(items: &mut Vec<T>, len: usize, mut blank: impl FnMut(usize) -> T) {
    let current = items.len();
    if len > current {
        items.extend((current..len).map(&mut blank));
    } else {
        items.truncate(len);
    }
}

/// Append one blank entry
pub fn push_blank<T>(items: &mut Vec<T>, blank: impl FnOnce(usize) -> T) {
    let index = items.len();
    items.push(blank(index));
}

/// Remove the entry at `index` unless it is the only one left.
///
/// Returns the removed entry, or `None` when the index is out of range or the
/// list would become empty.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    if items.len() <= 1 || index >= items.len() {
        return None;
    }
    Some(items.remove(index))
}

/// [`remove_at`] followed by renumbering positions 1..=N
pub fn remove_and_renumber<T: Positional>(items: &mut Vec<T>, index: usize) -> Option<T> {
    let removed = remove_at(items, index)?;
    renumber(items);
    Some(removed)
}

/// Assign 1-based positions in list order
pub fn renumber<T: Positional>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as u32 + 1);
    }
}

impl FormState {
    /// Resize the array at `path` to `len`, cloning `template` for new slots
    pub fn sync_array(&mut self, path: &FieldPath, len: usize, template: &Value) -> Result<()> {
        let items = self.array_mut(path)?;
        let before = items.len();
        sync_len(items, len, |_| template.clone());
        debug!(path = %path, from = before, to = len, "synchronized form array");

        let dropped: Vec<FieldPath> = self
            .errors()
            .keys()
            .filter(|key| {
                (len..before.max(len)).any(|index| key.starts_with(&path.clone().index(index)))
            })
            .cloned()
            .collect();
        for key in dropped {
            self.clear_error(&key);
        }
        Ok(())
    }

    /// Remove entry `index` of the array at `path`, keeping at least one.
    ///
    /// When `position_key` is given, that key of every remaining record is
    /// rewritten to its 1-based position.
    pub fn remove_array_item(
        &mut self,
        path: &FieldPath,
        index: usize,
        position_key: Option<&str>,
    ) -> Result<bool> {
        let items = self.array_mut(path)?;
        if position_key.is_some() {
            if let Some(position) = items.iter().position(|item| !item.is_object()) {
                return Err(TravelBookError::field_path(
                    path.clone().index(position),
                    "positional entry is not a record",
                ));
            }
        }
        if remove_at(items, index).is_none() {
            return Ok(false);
        }
        if let Some(key) = position_key {
            for (position, record) in items.iter_mut().filter_map(Value::as_object_mut).enumerate() {
                record.insert(key.to_string(), Value::from(position as u64 + 1));
            }
        }
        self.clear_errors_under(path);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Day {
        day: u32,
        title: String,
    }

    impl Positional for Day {
        fn set_position(&mut self, position: u32) {
            self.day = position;
        }
    }

    fn day(day: u32, title: &str) -> Day {
        Day { day, title: title.to_string() }
    }

    #[test]
    fn test_grow_appends_blanks_after_existing() {
        let mut travelers = vec!["Ada".to_string()];
        sync_len(&mut travelers, 3, |_| String::new());
        assert_eq!(travelers, vec!["Ada".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn test_shrink_keeps_leading_entries() {
        let mut travelers = vec!["Ada".to_string(), "Bo".to_string(), "Cy".to_string()];
        sync_len(&mut travelers, 1, |_| String::new());
        assert_eq!(travelers, vec!["Ada".to_string()]);
    }

    #[test]
    fn test_remove_keeps_last_entry() {
        let mut items = vec![1];
        assert_eq!(remove_at(&mut items, 0), None);
        assert_eq!(items, vec![1]);

        let mut items = vec![1, 2];
        assert_eq!(remove_at(&mut items, 5), None);
        assert_eq!(remove_at(&mut items, 0), Some(1));
        assert_eq!(items, vec![2]);
    }

    #[test]
    fn test_remove_renumbers_days() {
        let mut days = vec![day(1, "Arrive"), day(2, "Hike"), day(3, "Depart")];
        let removed = remove_and_renumber(&mut days, 1).unwrap();
        assert_eq!(removed.title, "Hike");
        assert_eq!(days, vec![day(1, "Arrive"), day(2, "Depart")]);
    }

    #[test]
    fn test_push_blank_uses_next_index() {
        let mut days = vec![day(1, "Arrive")];
        push_blank(&mut days, |index| day(index as u32 + 1, ""));
        assert_eq!(days[1].day, 2);
    }

    #[test]
    fn test_state_sync_array_grows_and_shrinks() {
        let mut state = FormState::new(json!({
            "numberOfPeople": 1,
            "travelerDetails": [ { "name": "Ada", "age": "36" } ]
        }));
        let path = FieldPath::key("travelerDetails");
        let blank = json!({ "name": "", "age": "" });

        state.sync_array(&path, 3, &blank).unwrap();
        assert_eq!(state.array_len(&path), 3);
        assert_eq!(state.get_text(&"travelerDetails.0.name".parse().unwrap()).unwrap(), "Ada");
        assert_eq!(state.get_text(&"travelerDetails.2.name".parse().unwrap()).unwrap(), "");

        state.sync_array(&path, 1, &blank).unwrap();
        assert_eq!(state.values()["travelerDetails"], json!([{ "name": "Ada", "age": "36" }]));
    }

    #[test]
    fn test_state_sync_drops_errors_of_removed_entries() {
        let mut state = FormState::new(json!({ "travelerDetails": [ {}, {} ] }));
        let mut result = crate::forms::ValidationResult::default();
        result.insert("travelerDetails.0.name".parse().unwrap(), "name is required");
        result.insert("travelerDetails.1.name".parse().unwrap(), "name is required");
        state.apply_validation(&result);

        state.sync_array(&FieldPath::key("travelerDetails"), 1, &json!({})).unwrap();

        assert!(state.error(&"travelerDetails.0.name".parse().unwrap()).is_some());
        assert!(state.error(&"travelerDetails.1.name".parse().unwrap()).is_none());
    }

    #[test]
    fn test_state_remove_renumbers_positional_key() {
        let mut state = FormState::new(json!({
            "itinerary": [
                { "day": 1, "title": "Arrive" },
                { "day": 2, "title": "Hike" },
                { "day": 3, "title": "Depart" }
            ]
        }));
        let path = FieldPath::key("itinerary");

        assert!(state.remove_array_item(&path, 0, Some("day")).unwrap());
        assert_eq!(
            state.values()["itinerary"],
            json!([{ "day": 1, "title": "Hike" }, { "day": 2, "title": "Depart" }])
        );

        assert!(state.remove_array_item(&path, 0, Some("day")).unwrap());
        assert!(!state.remove_array_item(&path, 0, Some("day")).unwrap());
        assert_eq!(state.array_len(&path), 1);
    }

    #[test]
    fn test_state_remove_rejects_mixed_entries_without_removing() {
        let mut state = FormState::new(json!({
            "itinerary": [ { "day": 1, "title": "Arrive" }, "stray", { "day": 3, "title": "Depart" } ]
        }));
        let before = state.values().clone();

        let err = state
            .remove_array_item(&FieldPath::key("itinerary"), 0, Some("day"))
            .unwrap_err();
        match err {
            TravelBookError::FieldPath { path, .. } => assert_eq!(path, "itinerary.1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(state.values(), &before);
    }
}

//! Sorting the record set by a numeric attribute.

use crate::error::{PatientError, PatientResult};
use crate::patient::{PatientRecord, PatientView};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ACCEPTED: &'static [&'static str] = &["height", "weight", "bmi"];

    /// Exact, case-sensitive match against [`SortField::ACCEPTED`].
    pub fn parse(value: &str) -> PatientResult<Self> {
        match value {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(PatientError::InvalidSortField {
                given: value.to_owned(),
                accepted: Self::ACCEPTED,
            }),
        }
    }

    /// BMI is recomputed from height and weight, never read from storage.
    pub fn key(&self, record: &PatientRecord) -> f64 {
        match self {
            SortField::Height => record.height(),
            SortField::Weight => record.weight(),
            SortField::Bmi => record.bmi(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ACCEPTED: &'static [&'static str] = &["asc", "desc"];

    pub fn parse(value: &str) -> PatientResult<Self> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::InvalidSortOrder {
                given: value.to_owned(),
                accepted: Self::ACCEPTED,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Stable sort of `records` by `field`.
///
/// Equal keys keep their input order for both directions: descending reverses the
/// comparison, not the output.
pub fn sort_records<'a, I>(records: I, field: SortField, order: SortOrder) -> Vec<PatientView>
where
    I: IntoIterator<Item = &'a PatientRecord>,
{
    let mut keyed: Vec<(f64, &PatientRecord)> = records
        .into_iter()
        .map(|record| (field.key(record), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, record)| record.view()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::PatientFields;

    fn record(name: &str, height: f64, weight: f64) -> PatientRecord {
        PatientFields {
            name: name.into(),
            city: "Pune".into(),
            age: 40,
            gender: "male".into(),
            height,
            weight,
        }
        .validate()
        .expect("fixture should be valid")
    }

    fn names(views: &[PatientView]) -> Vec<&str> {
        views.iter().map(|v| v.record.name().as_str()).collect()
    }

    #[test]
    fn test_height_ascending_keeps_ties_stable() {
        let records = [
            record("A", 1.5, 60.0),
            record("B", 1.7, 60.0),
            record("C", 1.5, 60.0),
        ];

        let sorted = sort_records(&records, SortField::Height, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_height_descending_keeps_ties_stable() {
        let records = [
            record("A", 1.5, 60.0),
            record("B", 1.7, 60.0),
            record("C", 1.5, 60.0),
        ];

        let sorted = sort_records(&records, SortField::Height, SortOrder::Desc);
        assert_eq!(names(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_bmi_sort_uses_recomputed_bmi() {
        let records = [
            record("heavy", 1.6, 90.0),
            record("light", 1.9, 50.0),
            record("middle", 1.75, 70.0),
        ];

        let sorted = sort_records(&records, SortField::Bmi, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["light", "middle", "heavy"]);
        assert!(sorted.windows(2).all(|w| w[0].bmi <= w[1].bmi));
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(SortField::parse("weight").unwrap(), SortField::Weight);
        assert!(matches!(
            SortField::parse("Weight"),
            Err(PatientError::InvalidSortField { .. })
        ));
        assert_eq!(SortOrder::parse("desc").unwrap(), SortOrder::Desc);
        assert!(matches!(
            SortOrder::parse("up"),
            Err(PatientError::InvalidSortOrder { .. })
        ));
    }

    #[test]
    fn test_invalid_field_message_lists_accepted_values() {
        let err = SortField::parse("age").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid sort field 'age', only ["height", "weight", "bmi"] accepted"#
        );
    }

    #[test]
    fn test_empty_input_sorts_to_empty() {
        let records: Vec<PatientRecord> = Vec::new();
        let sorted = sort_records(&records, SortField::Weight, SortOrder::Desc);
        assert!(sorted.is_empty());
    }
}

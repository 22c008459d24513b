//! Partial updates to a stored patient.
//!
//! A [`PatientPatch`] has one optional slot per mutable field. A slot that is `None`
//! (absent from the request, or sent as `null`) leaves the stored value alone; a slot
//! that is `Some` overwrites it unconditionally. The merged result is re-validated as a
//! whole, so a patch can fail because of how it combines with existing data.

use crate::patient::{PatientFields, PatientRecord};
use crate::validation::ValidationErrors;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        self.provided_fields().is_empty()
    }

    /// Names of the fields this patch will overwrite.
    pub fn provided_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.city.is_some() {
            fields.push("city");
        }
        if self.age.is_some() {
            fields.push("age");
        }
        if self.gender.is_some() {
            fields.push("gender");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.weight.is_some() {
            fields.push("weight");
        }
        fields
    }

    /// Merges this patch over `current` and validates the result.
    ///
    /// `current` is not modified; the caller decides whether to persist the returned record.
    pub fn apply_to(self, current: &PatientRecord) -> Result<PatientRecord, ValidationErrors> {
        let mut merged = PatientFields::from(current);

        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(city) = self.city {
            merged.city = city;
        }
        if let Some(age) = self.age {
            merged.age = age;
        }
        if let Some(gender) = self.gender {
            merged.gender = gender;
        }
        if let Some(height) = self.height {
            merged.height = height;
        }
        if let Some(weight) = self.weight {
            merged.weight = weight;
        }

        merged.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{Gender, Verdict};

    fn stored() -> PatientRecord {
        PatientFields {
            name: "Asha".into(),
            city: "Pune".into(),
            age: 30,
            gender: "female".into(),
            height: 1.6,
            weight: 50.0,
        }
        .validate()
        .expect("fixture should be valid")
    }

    #[test]
    fn test_empty_patch_leaves_record_unchanged() {
        let patch = PatientPatch::default();
        assert!(patch.is_empty());

        let merged = patch.apply_to(&stored()).expect("empty patch should apply");
        assert_eq!(merged, stored());
    }

    #[test]
    fn test_weight_only_patch_changes_weight_and_derived_fields() {
        let patch = PatientPatch {
            weight: Some(80.0),
            ..Default::default()
        };
        assert_eq!(patch.provided_fields(), vec!["weight"]);

        let merged = patch.apply_to(&stored()).expect("patch should apply");
        assert_eq!(merged.weight(), 80.0);
        assert_eq!(merged.bmi(), 31.25);
        assert_eq!(merged.verdict(), Verdict::Obese);

        let original = stored();
        assert_eq!(merged.name(), original.name());
        assert_eq!(merged.city(), original.city());
        assert_eq!(merged.age(), original.age());
        assert_eq!(merged.gender(), Gender::Female);
        assert_eq!(merged.height(), original.height());
    }

    #[test]
    fn test_out_of_range_patch_is_rejected() {
        let patch = PatientPatch {
            age: Some(120),
            ..Default::default()
        };

        let errors = patch.apply_to(&stored()).expect_err("age 120 should fail");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["age"]);
    }

    #[test]
    fn test_json_null_and_absent_both_mean_unchanged() {
        let patch: PatientPatch =
            serde_json::from_str(r#"{"city": null, "height": 1.5, "nickname": "x"}"#)
                .expect("patch should deserialise");

        assert_eq!(patch.provided_fields(), vec!["height"]);
        let merged = patch.apply_to(&stored()).unwrap();
        assert_eq!(merged.city().as_str(), "Pune");
        assert_eq!(merged.height(), 1.5);
    }

    #[test]
    fn test_present_value_overwrites_even_if_it_looks_like_a_default() {
        let patch = PatientPatch {
            gender: Some("male".into()),
            age: Some(1),
            ..Default::default()
        };

        let merged = patch.apply_to(&stored()).unwrap();
        assert_eq!(merged.gender(), Gender::Male);
        assert_eq!(merged.age().years(), 1);
    }
}

//! Patient record model.
//!
//! A stored patient is a [`PatientRecord`]: the six base fields, without the id (the id
//! only exists as the key of the record set). BMI and verdict are derived from height
//! and weight whenever a record is materialised as a [`PatientView`] and are never
//! persisted.
//!
//! Untrusted input arrives as [`PatientFields`] and becomes a `PatientRecord` only through
//! [`PatientFields::validate`], which reports every failing field at once. Deserialising a
//! `PatientRecord` goes through the same path, so a store holding out-of-range data is
//! rejected rather than silently served.

use crate::validation::ValidationErrors;
use pmr_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclusive bounds for [`Age`].
pub const MIN_AGE_EXCLUSIVE: i64 = 0;
pub const MAX_AGE_EXCLUSIVE: i64 = 120;

/// BMI below this is underweight.
pub const UNDERWEIGHT_BELOW: f64 = 18.5;
/// BMI at or above this is obese.
pub const OBESE_FROM: f64 = 30.0;

/// Gender values accepted on input.
pub const ACCEPTED_GENDERS: &[&str] = &["male", "female"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age in whole years, strictly between 0 and 120.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    pub fn new(years: i64) -> Option<Self> {
        if years > MIN_AGE_EXCLUSIVE && years < MAX_AGE_EXCLUSIVE {
            u8::try_from(years).ok().map(Self)
        } else {
            None
        }
    }

    pub fn years(&self) -> u8 {
        self.0
    }
}

/// Categorical reading of a BMI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Obese,
}

impl Verdict {
    /// Classifies an already-rounded BMI. Both thresholds use strict `<`, so 18.5 is
    /// `Normal` and 30.0 is `Obese`.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Verdict::Underweight
        } else if bmi < OBESE_FROM {
            Verdict::Normal
        } else {
            Verdict::Obese
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// Unvalidated patient fields, as received from a client or read from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
}

impl PatientFields {
    /// Validates every field and builds a [`PatientRecord`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` naming each field that failed:
    /// - `name`/`city` empty or whitespace-only,
    /// - `age` not strictly between 0 and 120,
    /// - `gender` not one of `male`/`female`,
    /// - `height`/`weight` not a finite value greater than 0.
    pub fn validate(self) -> Result<PatientRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = NonEmptyText::new_untrimmed(&self.name)
            .map_err(|_| errors.push("name", "cannot be empty"))
            .ok();
        let city = NonEmptyText::new_untrimmed(&self.city)
            .map_err(|_| errors.push("city", "cannot be empty"))
            .ok();

        let age = Age::new(self.age);
        if age.is_none() {
            errors.push(
                "age",
                format!(
                    "must be greater than {} and less than {}",
                    MIN_AGE_EXCLUSIVE, MAX_AGE_EXCLUSIVE
                ),
            );
        }

        let gender = self.gender.parse::<Gender>().ok();
        if gender.is_none() {
            errors.push(
                "gender",
                format!("must be one of {:?}", ACCEPTED_GENDERS),
            );
        }

        if !is_positive(self.height) {
            errors.push("height", "must be greater than 0");
        }
        if !is_positive(self.weight) {
            errors.push("weight", "must be greater than 0");
        }

        match (name, city, age, gender) {
            (Some(name), Some(city), Some(age), Some(gender)) if errors.is_empty() => {
                Ok(PatientRecord {
                    name,
                    city,
                    age,
                    gender,
                    height: self.height,
                    weight: self.weight,
                })
            }
            _ => Err(errors),
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// A validated patient field-blob. This is exactly what is persisted under the patient's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatientFields")]
pub struct PatientRecord {
    name: NonEmptyText,
    city: NonEmptyText,
    age: Age,
    gender: Gender,
    /// Metres.
    height: f64,
    /// Kilograms.
    weight: f64,
}

impl TryFrom<PatientFields> for PatientRecord {
    type Error = ValidationErrors;

    fn try_from(fields: PatientFields) -> Result<Self, Self::Error> {
        fields.validate()
    }
}

impl From<&PatientRecord> for PatientFields {
    fn from(record: &PatientRecord) -> Self {
        PatientFields {
            name: record.name.as_str().to_owned(),
            city: record.city.as_str().to_owned(),
            age: i64::from(record.age.years()),
            gender: record.gender.as_str().to_owned(),
            height: record.height,
            weight: record.weight,
        }
    }
}

impl PatientRecord {
    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn city(&self) -> &NonEmptyText {
        &self.city
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// `weight / height²`, rounded to two decimal places.
    pub fn bmi(&self) -> f64 {
        round_2dp(self.weight / (self.height * self.height))
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_bmi(self.bmi())
    }

    /// Materialises the record for output, with derived fields computed from the
    /// current height and weight.
    pub fn view(&self) -> PatientView {
        PatientView {
            bmi: self.bmi(),
            verdict: self.verdict(),
            record: self.clone(),
        }
    }
}

/// Rounds from the exact binary value, sending exact halves to the even digit.
///
/// Scaling by 100 first would round the product, which can turn a value just below a
/// half into an exact half. Fixed-precision formatting works on the exact value instead.
fn round_2dp(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Output form of a patient: the stored fields plus derived `bmi` and `verdict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientView {
    #[serde(flatten)]
    pub record: PatientRecord,
    pub bmi: f64,
    pub verdict: Verdict,
}

//! Intake checks run before an applicant is saved. Required fields are
//! checked first; age eligibility is only checked once they are present.

use thiserror::Error;
use time::Date;

use crate::core::db::Program;
use crate::form::FormData;
use crate::normalize::{calculate_age, parse_date};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields { missing: Vec<&'static str> },
    #[error("{program} applicants must be between {min}-{max} years old")]
    AgeOutOfRange {
        program: Program,
        age: u32,
        min: u32,
        max: u32,
    },
    #[error("Birth date {0:?} is not a valid date")]
    InvalidBirthDate(String),
}

impl ValidationError {
    /// Heading of the blocking dialog shown for this error.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredFields { .. } => "Missing Required Fields",
            ValidationError::AgeOutOfRange { .. } | ValidationError::InvalidBirthDate(_) => {
                "Age Requirement Not Met"
            }
        }
    }
}

pub fn validate_required(form: &FormData, program: Program) -> Result<(), ValidationError> {
    let mut checks: Vec<(&'static str, &str)> = vec![
        ("firstName", &form.first_name),
        ("lastName", &form.last_name),
        ("birthDate", &form.birth_date),
        ("barangay", &form.barangay),
        ("contactNumber", &form.contact_number),
    ];
    match program {
        Program::Gip => checks.push(("educationalAttainment", &form.educational_attainment)),
        Program::Tupad => checks.push(("idType", &form.id_type)),
    }

    let missing: Vec<&'static str> = checks
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields { missing })
    }
}

/// Check the applicant's age against the program's bounds, returning the age.
pub fn validate_age(birth_date: &str, program: Program, today: Date) -> Result<u32, ValidationError> {
    let birth = parse_date(birth_date)
        .map_err(|_| ValidationError::InvalidBirthDate(birth_date.to_string()))?;
    let age = calculate_age(birth, today);
    let (min, max) = program.age_bounds();
    if (min..=max).contains(&age) {
        Ok(age)
    } else {
        Err(ValidationError::AgeOutOfRange {
            program,
            age,
            min,
            max,
        })
    }
}

/// Run both checks in order. The age is returned on success.
pub fn validate(form: &FormData, program: Program, today: Date) -> Result<u32, ValidationError> {
    validate_required(form, program)?;
    validate_age(&form.birth_date, program, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 18);

    fn born_years_ago(years: i32) -> String {
        format!("{:04}-10-18", TODAY.year() - years)
    }

    fn complete_form() -> FormData {
        FormData {
            first_name: "JUAN".into(),
            last_name: "DELA CRUZ".into(),
            birth_date: born_years_ago(22),
            barangay: "APLAYA".into(),
            contact_number: "0917-123-4567".into(),
            educational_attainment: "COLLEGE GRADUATE".into(),
            id_type: "PHILSYS".into(),
            ..FormData::default()
        }
    }

    #[test]
    fn gip_age_bounds() {
        for (age, ok) in [(17, false), (18, true), (29, true), (30, false)] {
            let result = validate_age(&born_years_ago(age), Program::Gip, TODAY);
            assert_eq!(result.is_ok(), ok, "age {}", age);
        }
    }

    #[test]
    fn tupad_age_bounds() {
        for (age, ok) in [(24, false), (25, true), (58, true), (59, false)] {
            let result = validate_age(&born_years_ago(age), Program::Tupad, TODAY);
            assert_eq!(result.is_ok(), ok, "age {}", age);
        }
    }

    #[test]
    fn age_error_message_names_program_bounds() {
        let err = validate_age(&born_years_ago(40), Program::Gip, TODAY).unwrap_err();
        assert_eq!(err.to_string(), "GIP applicants must be between 18-29 years old");
        assert_eq!(err.title(), "Age Requirement Not Met");
    }

    #[test]
    fn program_specific_required_fields() {
        let mut form = complete_form();
        form.educational_attainment.clear();
        assert!(validate_required(&form, Program::Tupad).is_ok());
        assert_eq!(
            validate_required(&form, Program::Gip),
            Err(ValidationError::MissingRequiredFields {
                missing: vec!["educationalAttainment"]
            })
        );

        let mut form = complete_form();
        form.id_type.clear();
        assert!(validate_required(&form, Program::Gip).is_ok());
        assert!(validate_required(&form, Program::Tupad).is_err());
    }

    #[test]
    fn missing_fields_short_circuit_age_check() {
        let mut form = complete_form();
        form.birth_date = born_years_ago(70);
        form.contact_number = "  ".into();
        let err = validate(&form, Program::Gip, TODAY).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields {
                missing: vec!["contactNumber"]
            }
        );
        assert_eq!(err.to_string(), "Please fill in all required fields");
    }

    #[test]
    fn unparseable_birth_date_is_rejected() {
        let mut form = complete_form();
        form.birth_date = "yesterday".into();
        assert_eq!(
            validate(&form, Program::Gip, TODAY),
            Err(ValidationError::InvalidBirthDate("yesterday".into()))
        );
    }
}

//! Input validation stage run before any service touches storage.

use std::collections::HashSet;

use crate::error::{AgencyError, AgencyResult};
use crate::models::{CreateCatInput, CreateTargetInput};

pub const MIN_TARGETS: usize = 1;
pub const MAX_TARGETS: usize = 3;

/// A cat creation request that passed field validation. The breed is still
/// unchecked against the reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCatInput {
    pub name: String,
    pub breed: String,
    pub years_of_experience: i64,
    pub salary: f64,
}

fn require_text(field: &str, value: &str) -> AgencyResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgencyError::invalid_input(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn validate_salary(salary: f64) -> AgencyResult<()> {
    if !salary.is_finite() || salary <= 0.0 {
        return Err(AgencyError::invalid_input(format!(
            "salary must be a positive number, got {salary}"
        )));
    }
    Ok(())
}

pub fn validate_experience(years: i64) -> AgencyResult<()> {
    if years < 0 {
        return Err(AgencyError::invalid_input(format!(
            "years_of_experience must not be negative, got {years}"
        )));
    }
    Ok(())
}

pub fn validate_new_cat(input: &CreateCatInput) -> AgencyResult<ValidCatInput> {
    let name = require_text("name", &input.name)?;
    let breed = require_text("breed", &input.breed)?;
    validate_experience(input.years_of_experience)?;
    validate_salary(input.salary)?;

    Ok(ValidCatInput {
        name,
        breed,
        years_of_experience: input.years_of_experience,
        salary: input.salary,
    })
}

/// Check the target set of a new mission and return it with trimmed fields.
///
/// Count is checked first, then empty fields, then `(name, country)` duplicates.
/// Duplicate detection is case-sensitive on the trimmed values.
pub fn validate_targets(targets: &[CreateTargetInput]) -> AgencyResult<Vec<CreateTargetInput>> {
    if !(MIN_TARGETS..=MAX_TARGETS).contains(&targets.len()) {
        return Err(AgencyError::InvalidTargetCount(targets.len()));
    }

    let mut cleaned = Vec::with_capacity(targets.len());
    for target in targets {
        cleaned.push(CreateTargetInput {
            name: require_text("target name", &target.name)?,
            country: require_text("target country", &target.country)?,
            notes: target.notes.clone(),
        });
    }

    let mut seen = HashSet::new();
    for target in &cleaned {
        if !seen.insert((target.name.as_str(), target.country.as_str())) {
            return Err(AgencyError::DuplicateTarget {
                name: target.name.clone(),
                country: target.country.clone(),
            });
        }
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_input(name: &str, years: i64, salary: f64) -> CreateCatInput {
        CreateCatInput {
            name: name.to_string(),
            breed: "Abyssinian".to_string(),
            years_of_experience: years,
            salary,
        }
    }

    #[test]
    fn accepts_valid_cat_and_trims_name() {
        let valid = validate_new_cat(&cat_input("  Shadow ", 3, 1500.0)).unwrap();
        assert_eq!(valid.name, "Shadow");
        assert_eq!(valid.years_of_experience, 3);
    }

    #[test]
    fn rejects_bad_cat_fields() {
        for input in [
            cat_input("", 1, 100.0),
            cat_input("Shadow", -1, 100.0),
            cat_input("Shadow", 1, 0.0),
            cat_input("Shadow", 1, -5.0),
            cat_input("Shadow", 1, f64::NAN),
        ] {
            let err = validate_new_cat(&input).unwrap_err();
            assert!(matches!(err, AgencyError::InvalidInput(_)), "{input:?}");
        }
    }

    #[test]
    fn zero_experience_is_allowed() {
        assert!(validate_experience(0).is_ok());
    }

    #[test]
    fn target_count_bounds() {
        let four: Vec<_> = (0..4)
            .map(|i| CreateTargetInput::new(format!("T{i}"), "UA"))
            .collect();

        assert!(matches!(
            validate_targets(&[]),
            Err(AgencyError::InvalidTargetCount(0))
        ));
        assert!(matches!(
            validate_targets(&four),
            Err(AgencyError::InvalidTargetCount(4))
        ));
        assert_eq!(validate_targets(&four[..3]).unwrap().len(), 3);
        assert_eq!(validate_targets(&four[..1]).unwrap().len(), 1);
    }

    #[test]
    fn duplicates_are_detected_after_trim() {
        let targets = vec![
            CreateTargetInput::new("A", "UA"),
            CreateTargetInput::new(" A ", "UA  "),
        ];
        let err = validate_targets(&targets).unwrap_err();
        assert!(matches!(
            err,
            AgencyError::DuplicateTarget { ref name, ref country } if name == "A" && country == "UA"
        ));
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let targets = vec![
            CreateTargetInput::new("Alice", "FI"),
            CreateTargetInput::new("alice", "FI"),
        ];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn same_name_in_different_countries_is_fine() {
        let targets = vec![
            CreateTargetInput::new("Alice", "FI"),
            CreateTargetInput::new("Alice", "EE"),
        ];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn empty_target_fields_are_invalid_input() {
        let targets = vec![CreateTargetInput::new("  ", "FI")];
        assert!(matches!(
            validate_targets(&targets),
            Err(AgencyError::InvalidInput(_))
        ));
    }
}

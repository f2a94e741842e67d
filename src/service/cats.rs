use chrono::Utc;
use uuid::Uuid;

use super::validation::{validate_new_cat, validate_salary};
use crate::breeds::BreedValidator;
use crate::db::{self, Database};
use crate::error::{AgencyError, AgencyResult};
use crate::models::*;

/// Hiring, payroll and retirement of cats.
#[derive(Clone)]
pub struct CatService {
    db: Database,
    breeds: BreedValidator,
}

impl CatService {
    pub fn new(db: Database, breeds: BreedValidator) -> Self {
        Self { db, breeds }
    }

    /// Validate the input, check the breed against the reference list, then persist.
    ///
    /// The breed lookup happens before the database lock is taken.
    pub async fn create(&self, input: CreateCatInput) -> AgencyResult<Cat> {
        let valid = validate_new_cat(&input)?;
        let breed = self.breeds.validate(&valid.breed).await?;

        let now = Utc::now();
        let cat = Cat {
            id: Uuid::new_v4(),
            name: valid.name,
            breed: breed.into_string(),
            years_of_experience: valid.years_of_experience,
            salary: valid.salary,
            created_at: now,
            updated_at: now,
        };

        self.db.transaction(|tx| Ok(db::insert_cat(tx, &cat)?))?;
        tracing::info!(cat_id = %cat.id, breed = %cat.breed, "Cat created");
        Ok(cat)
    }

    pub fn list(&self) -> AgencyResult<Vec<Cat>> {
        self.db.get_all_cats()
    }

    pub fn get(&self, id: Uuid) -> AgencyResult<Cat> {
        self.db
            .get_cat(id)?
            .ok_or_else(|| AgencyError::not_found("Cat"))
    }

    /// Change a cat's salary. An unknown cat is reported before a bad salary.
    pub fn update_salary(&self, id: Uuid, input: UpdateCatSalaryInput) -> AgencyResult<Cat> {
        let cat = self.db.transaction(|tx| {
            let mut cat = db::find_cat(tx, id)?.ok_or_else(|| AgencyError::not_found("Cat"))?;
            validate_salary(input.salary)?;
            let now = Utc::now();
            db::update_cat_salary(tx, id, input.salary, now)?;
            cat.salary = input.salary;
            cat.updated_at = now;
            Ok(cat)
        })?;

        tracing::info!(cat_id = %id, salary = cat.salary, "Cat salary updated");
        Ok(cat)
    }

    /// Delete a cat unless it is on an active mission.
    ///
    /// Completed missions that referenced the cat stay, with their assignment cleared.
    pub fn delete(&self, id: Uuid) -> AgencyResult<()> {
        self.db.transaction(|tx| {
            db::find_cat(tx, id)?.ok_or_else(|| AgencyError::not_found("Cat"))?;
            if db::find_active_mission_for_cat(tx, id)?.is_some() {
                return Err(AgencyError::CatHasActiveMission);
            }
            db::delete_cat(tx, id)?;
            Ok(())
        })?;

        tracing::info!(cat_id = %id, "Cat deleted");
        Ok(())
    }
}

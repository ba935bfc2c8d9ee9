//! Pet repository: owner-scoped CRUD with cascade cleanup on delete.

use rand::seq::SliceRandom;
use rusqlite::{Row, params};
use std::str::FromStr;
use tracing::{debug, warn};

use super::{Store, StoreError};
use crate::model::id::{OwnerId, PetId};
use crate::model::pet::{AVATAR_PALETTE, NewPet, Pet, Species};
use crate::model::validate;
use crate::session::Session;

const PET_COLUMNS: &str = "pet_id, owner_id, name, breed, age, weight, species, avatar_color, photo";

impl Store {
    /// List the caller's pets. Fails closed: an unauthenticated session
    /// or a detached store yields an empty list, never an error.
    ///
    /// # Errors
    ///
    /// Propagates query failures.
    pub fn pets(&self, session: &Session) -> Result<Vec<Pet>, StoreError> {
        let Some(identity) = session.identity() else {
            warn!("pet listing without identity; returning empty");
            return Ok(Vec::new());
        };
        let Ok(conn) = self.conn() else {
            warn!("pet listing with detached store; returning empty");
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT {PET_COLUMNS} FROM pets
             WHERE owner_id = ?1
             ORDER BY name COLLATE NOCASE, pet_id"
        ))?;
        let pets = stmt
            .query_map(params![identity.id.as_str()], read_pet)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pets)
    }

    /// Create a pet for the session owner.
    ///
    /// Attributes are validated before any store I/O. The avatar color is
    /// drawn uniformly at random from the fixed palette and never changes
    /// afterwards.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on malformed attributes, otherwise the
    /// owner-upsert and insert failures.
    pub fn create_pet(&mut self, session: &Session, new: &NewPet) -> Result<Pet, StoreError> {
        validate::new_pet(new)?;
        let owner_id = self.ensure_owner(session)?;

        let id = PetId::generate(self.rng_mut());
        let avatar_color = AVATAR_PALETTE
            .choose(self.rng_mut())
            .copied()
            .unwrap_or(AVATAR_PALETTE[0])
            .to_string();

        self.conn()?.execute(
            &format!("INSERT INTO pets ({PET_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                id.as_str(),
                owner_id.as_str(),
                new.name,
                new.breed,
                new.age,
                new.weight,
                new.species.as_str(),
                avatar_color,
                new.photo,
            ],
        )?;

        debug!(pet = %id, owner = %owner_id, "created pet");
        Ok(Pet {
            id,
            owner_id,
            name: new.name.clone(),
            breed: new.breed.clone(),
            age: new.age,
            weight: new.weight,
            species: new.species,
            avatar_color,
            photo: new.photo.clone(),
        })
    }

    /// Replace a pet's editable fields wholesale. `id` and `owner_id` are
    /// preserved from the store, whatever the caller-supplied record says.
    ///
    /// # Errors
    ///
    /// [`StoreError::PetNotFound`] when no record matches the identifier
    /// within the caller's scope.
    pub fn update_pet(&self, session: &Session, pet: &Pet) -> Result<Pet, StoreError> {
        validate::pet_fields(&pet.name, &pet.breed, pet.age, pet.weight)?;
        let owner_id = self.ensure_owner(session)?;

        let updated = self.conn()?.execute(
            "UPDATE pets
             SET name = ?1, breed = ?2, age = ?3, weight = ?4,
                 species = ?5, avatar_color = ?6, photo = ?7
             WHERE pet_id = ?8 AND owner_id = ?9",
            params![
                pet.name,
                pet.breed,
                pet.age,
                pet.weight,
                pet.species.as_str(),
                pet.avatar_color,
                pet.photo,
                pet.id.as_str(),
                owner_id.as_str(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::PetNotFound { id: pet.id.clone() });
        }

        debug!(pet = %pet.id, "updated pet");
        Ok(Pet {
            id: pet.id.clone(),
            owner_id,
            ..pet.clone()
        })
    }

    /// Delete a pet, then every task that referenced it in both
    /// partitions.
    ///
    /// The cascade is not transactional: the pet delete and each task
    /// delete commit independently. When some task deletes fail, the
    /// result is [`StoreError::PartialCascade`] carrying how many of the
    /// dependent deletes landed; the pet is already gone at that point
    /// and the caller must know the cleanup is incomplete.
    ///
    /// # Errors
    ///
    /// [`StoreError::PetNotFound`] when the pet is absent from the
    /// caller's scope; [`StoreError::PartialCascade`] as above.
    pub fn delete_pet(&self, session: &Session, id: &PetId) -> Result<(), StoreError> {
        let owner_id = self.ensure_owner(session)?;
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM pets WHERE pet_id = ?1 AND owner_id = ?2",
            params![id.as_str(), owner_id.as_str()],
        )?;
        if removed == 0 {
            return Err(StoreError::PetNotFound { id: id.clone() });
        }

        let mut doomed: Vec<(&'static str, String)> = Vec::new();
        for table in ["pending_tasks", "completed_tasks"] {
            let mut stmt = conn.prepare(&format!(
                "SELECT task_id FROM {table} WHERE pet_id = ?1 AND owner_id = ?2"
            ))?;
            let ids = stmt
                .query_map(params![id.as_str(), owner_id.as_str()], |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            doomed.extend(ids.into_iter().map(|task_id| (table, task_id)));
        }

        let attempted = doomed.len();
        let mut deleted = 0usize;
        for (table, task_id) in &doomed {
            match conn.execute(
                &format!("DELETE FROM {table} WHERE task_id = ?1 AND owner_id = ?2"),
                params![task_id, owner_id.as_str()],
            ) {
                Ok(_) => deleted += 1,
                Err(error) => {
                    warn!(pet = %id, %task_id, %error, "cascade task delete failed");
                }
            }
        }

        if deleted < attempted {
            return Err(StoreError::PartialCascade {
                pet_id: id.clone(),
                deleted,
                attempted,
            });
        }

        debug!(pet = %id, tasks = deleted, "deleted pet and cascaded tasks");
        Ok(())
    }
}

fn read_pet(row: &Row<'_>) -> rusqlite::Result<Pet> {
    let species_raw: String = row.get(6)?;
    let species = Species::from_str(&species_raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Pet {
        id: PetId::new_unchecked(row.get::<_, String>(0)?),
        owner_id: OwnerId::new(row.get::<_, String>(1)?),
        name: row.get(2)?,
        breed: row.get(3)?,
        age: row.get(4)?,
        weight: row.get(5)?,
        species,
        avatar_color: row.get(7)?,
        photo: row.get(8)?,
    })
}

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::entity::Entity;
use crate::error::DataError;
use crate::input::{CreateAnimalInput, NewUser, UpdateAnimalInput};
use crate::model::{
    Adoption, Animal, Assignment, MedicalRecord, Photo, User, Volunteer, VolunteerHour,
};
use crate::store::{ShelterStore, StoreFuture};

/// One bulk read observed by an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub relation: &'static str,
    pub keys: Vec<String>,
}

/// Row storage of an [`InMemoryStore`], one vector per entity in insertion order.
#[derive(Default)]
pub struct Tables {
    animals: Vec<Animal>,
    users: Vec<User>,
    volunteers: Vec<Volunteer>,
    adoptions: Vec<Adoption>,
    medical_records: Vec<MedicalRecord>,
    photos: Vec<Photo>,
    volunteer_hours: Vec<VolunteerHour>,
    assignments: Vec<Assignment>,
}

/// An entity with a table in [`InMemoryStore`].
pub trait Stored: Entity {
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
}

macro_rules! stored {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(
            impl Stored for $ty {
                fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
                    &mut tables.$field
                }
            }
        )+
    };
}

stored! {
    Animal => animals,
    User => users,
    Volunteer => volunteers,
    Adoption => adoptions,
    MedicalRecord => medical_records,
    Photo => photos,
    VolunteerHour => volunteer_hours,
    Assignment => assignments,
}

/// In-process [`ShelterStore`] for development and tests.
///
/// Enforces unique microchip ids and emails, refuses to delete animals that
/// adoptions still reference (their photos and medical records go with them),
/// and records every bulk read so callers can assert on query counts.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    log: Mutex<Vec<QueryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, bypassing constraints. Returns the stored row.
    pub async fn insert<T: Stored>(&self, row: T) -> T {
        let mut tables = self.tables.write().await;
        T::rows_mut(&mut tables).push(row.clone());
        row
    }

    /// Every bulk read so far, oldest first.
    pub fn queries(&self) -> Vec<QueryRecord> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of bulk reads issued for one relation.
    pub fn bulk_calls(&self, relation: &str) -> usize {
        self.queries()
            .iter()
            .filter(|q| q.relation == relation)
            .count()
    }

    pub fn clear_log(&self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, relation: &'static str, keys: &[String]) {
        tracing::debug!(relation, keys = keys.len(), "bulk read");
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(QueryRecord {
                relation,
                keys: keys.to_vec(),
            });
    }
}

fn by_id<T: Entity>(rows: &[T], id: &str) -> Option<T> {
    rows.iter().find(|row| row.id() == id).cloned()
}

fn matching<T: Clone>(rows: &[T], keys: &[String], key_of: impl Fn(&T) -> &str) -> Vec<T> {
    let keys: HashSet<&str> = keys.iter().map(String::as_str).collect();
    rows.iter()
        .filter(|row| keys.contains(key_of(row)))
        .cloned()
        .collect()
}

fn microchip_taken(animals: &[Animal], microchip_id: &str, except: Option<&str>) -> bool {
    animals.iter().any(|a| {
        a.microchip_id.as_deref() == Some(microchip_id) && Some(a.id.as_str()) != except
    })
}

impl ShelterStore for InMemoryStore {
    fn list_animals(&self) -> StoreFuture<'_, Vec<Animal>> {
        Box::pin(async move { Ok(self.tables.read().await.animals.clone()) })
    }

    fn find_animal<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Animal>> {
        Box::pin(async move { Ok(by_id(&self.tables.read().await.animals, id)) })
    }

    fn list_users(&self) -> StoreFuture<'_, Vec<User>> {
        Box::pin(async move { Ok(self.tables.read().await.users.clone()) })
    }

    fn find_user<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<User>> {
        Box::pin(async move { Ok(by_id(&self.tables.read().await.users, id)) })
    }

    fn find_user_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Option<User>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables.users.iter().find(|u| u.email == email).cloned())
        })
    }

    fn list_volunteers(&self) -> StoreFuture<'_, Vec<Volunteer>> {
        Box::pin(async move { Ok(self.tables.read().await.volunteers.clone()) })
    }

    fn find_volunteer<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Volunteer>> {
        Box::pin(async move { Ok(by_id(&self.tables.read().await.volunteers, id)) })
    }

    fn list_adoptions(&self) -> StoreFuture<'_, Vec<Adoption>> {
        Box::pin(async move { Ok(self.tables.read().await.adoptions.clone()) })
    }

    fn find_adoption<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Adoption>> {
        Box::pin(async move { Ok(by_id(&self.tables.read().await.adoptions, id)) })
    }

    fn adoptions_for_adopter<'a>(&'a self, adopter_id: &'a str) -> StoreFuture<'a, Vec<Adoption>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .adoptions
                .iter()
                .filter(|a| a.adopter_id == adopter_id)
                .cloned()
                .collect())
        })
    }

    fn create_animal(&self, input: CreateAnimalInput) -> StoreFuture<'_, Animal> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if let Some(chip) = input.microchip_id.as_deref() {
                if microchip_taken(&tables.animals, chip, None) {
                    return Err(DataError::UniqueViolation {
                        entity: "animal",
                        field: "microchipId",
                    });
                }
            }
            let animal = Animal::from_input(input);
            tables.animals.push(animal.clone());
            info!(id = %animal.id, name = %animal.name, "animal created");
            Ok(animal)
        })
    }

    fn update_animal<'a>(
        &'a self,
        id: &'a str,
        input: UpdateAnimalInput,
    ) -> StoreFuture<'a, Animal> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let index = tables
                .animals
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| DataError::not_found("animal", id))?;
            if let Some(chip) = input.microchip_id.as_deref() {
                if microchip_taken(&tables.animals, chip, Some(id)) {
                    return Err(DataError::UniqueViolation {
                        entity: "animal",
                        field: "microchipId",
                    });
                }
            }

            let animal = &mut tables.animals[index];
            if let Some(name) = input.name {
                animal.name = name;
            }
            if let Some(species) = input.species {
                animal.species = species;
            }
            if let Some(breed) = input.breed {
                animal.breed = breed;
            }
            if let Some(age) = input.age {
                animal.age = age;
            }
            if let Some(gender) = input.gender {
                animal.gender = gender;
            }
            if let Some(status) = input.status {
                animal.status = status;
            }
            if let Some(fee) = input.adoption_fee {
                animal.adoption_fee = fee;
            }
            if let Some(chip) = input.microchip_id {
                animal.microchip_id = Some(chip);
            }
            if let Some(notes) = input.behavior_notes {
                animal.behavior_notes = Some(notes);
            }
            if let Some(needs) = input.special_needs {
                animal.special_needs = needs;
            }
            animal.updated_at = Utc::now();
            info!(id = %animal.id, "animal updated");
            Ok(animal.clone())
        })
    }

    fn delete_animal<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let index = tables
                .animals
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| DataError::not_found("animal", id))?;
            if tables.adoptions.iter().any(|a| a.animal_id == id) {
                return Err(DataError::ForeignKeyViolation {
                    entity: "animal",
                    dependents: "adoptions",
                });
            }
            tables.animals.remove(index);
            tables.photos.retain(|p| p.animal_id != id);
            tables.medical_records.retain(|r| r.animal_id != id);
            info!(id, "animal deleted");
            Ok(())
        })
    }

    fn create_user(&self, user: NewUser) -> StoreFuture<'_, User> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if tables.users.iter().any(|u| u.email == user.email) {
                return Err(DataError::UniqueViolation {
                    entity: "user",
                    field: "email",
                });
            }
            let user = User::new(user.email, user.password_hash, user.role);
            tables.users.push(user.clone());
            info!(id = %user.id, role = %user.role, "user created");
            Ok(user)
        })
    }

    fn medical_records_by_animal_ids<'a>(
        &'a self,
        animal_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<MedicalRecord>> {
        Box::pin(async move {
            self.record("medical_records_by_animal_ids", animal_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.medical_records, animal_ids, |r| r.animal_id.as_str()))
        })
    }

    fn photos_by_animal_ids<'a>(&'a self, animal_ids: &'a [String]) -> StoreFuture<'a, Vec<Photo>> {
        Box::pin(async move {
            self.record("photos_by_animal_ids", animal_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.photos, animal_ids, |p| p.animal_id.as_str()))
        })
    }

    fn adoptions_by_animal_ids<'a>(
        &'a self,
        animal_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Adoption>> {
        Box::pin(async move {
            self.record("adoptions_by_animal_ids", animal_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.adoptions, animal_ids, |a| a.animal_id.as_str()))
        })
    }

    fn adoptions_by_adopter_ids<'a>(
        &'a self,
        adopter_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Adoption>> {
        Box::pin(async move {
            self.record("adoptions_by_adopter_ids", adopter_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.adoptions, adopter_ids, |a| a.adopter_id.as_str()))
        })
    }

    fn volunteers_by_user_ids<'a>(
        &'a self,
        user_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Volunteer>> {
        Box::pin(async move {
            self.record("volunteers_by_user_ids", user_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.volunteers, user_ids, |v| v.user_id.as_str()))
        })
    }

    fn users_by_ids<'a>(&'a self, ids: &'a [String]) -> StoreFuture<'a, Vec<User>> {
        Box::pin(async move {
            self.record("users_by_ids", ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.users, ids, |u| u.id.as_str()))
        })
    }

    fn volunteer_hours_by_volunteer_ids<'a>(
        &'a self,
        volunteer_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<VolunteerHour>> {
        Box::pin(async move {
            self.record("volunteer_hours_by_volunteer_ids", volunteer_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.volunteer_hours, volunteer_ids, |h| h.volunteer_id.as_str()))
        })
    }

    fn assignments_by_volunteer_ids<'a>(
        &'a self,
        volunteer_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Assignment>> {
        Box::pin(async move {
            self.record("assignments_by_volunteer_ids", volunteer_ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.assignments, volunteer_ids, |a| a.volunteer_id.as_str()))
        })
    }

    fn animals_by_ids<'a>(&'a self, ids: &'a [String]) -> StoreFuture<'a, Vec<Animal>> {
        Box::pin(async move {
            self.record("animals_by_ids", ids);
            let tables = self.tables.read().await;
            Ok(matching(&tables.animals, ids, |a| a.id.as_str()))
        })
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AnimalStatus, Gender, Species};
use crate::entity::{new_id, Entity};
use crate::input::CreateAnimalInput;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: String,
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub age: i32,
    pub gender: Gender,
    pub intake_date: DateTime<Utc>,
    pub status: AnimalStatus,
    pub adoption_fee: f64,
    pub microchip_id: Option<String>,
    pub behavior_notes: Option<String>,
    pub special_needs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Animal {
    /// A new available animal taken in now.
    pub fn from_input(input: CreateAnimalInput) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: input.name,
            species: input.species,
            breed: input.breed,
            age: input.age,
            gender: input.gender,
            intake_date: now,
            status: AnimalStatus::Available,
            adoption_fee: input.adoption_fee,
            microchip_id: input.microchip_id,
            behavior_notes: input.behavior_notes,
            special_needs: input.special_needs.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Animal {
    fn table_name() -> &'static str {
        "animals"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub animal_id: String,
    pub record_type: String,
    pub description: String,
    pub veterinarian: Option<String>,
    pub cost: Option<f64>,
    pub record_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn new(
        animal_id: impl Into<String>,
        record_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            animal_id: animal_id.into(),
            record_type: record_type.into(),
            description: description.into(),
            veterinarian: None,
            cost: None,
            record_date: now,
            created_at: now,
        }
    }
}

impl Entity for MedicalRecord {
    fn table_name() -> &'static str {
        "medical_records"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub animal_id: String,
    pub url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    pub fn new(animal_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            animal_id: animal_id.into(),
            url: url.into(),
            caption: None,
            is_primary: false,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Photo {
    fn table_name() -> &'static str {
        "photos"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

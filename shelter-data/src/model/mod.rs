//! Stored records and their enums. Everything serializes in the wire shape:
//! camelCase field names, SCREAMING_SNAKE_CASE enum values, RFC 3339 timestamps.

mod adoption;
mod animal;
mod people;

use serde::{Deserialize, Serialize};

pub use adoption::Adoption;
pub use animal::{Animal, MedicalRecord, Photo};
pub use people::{Assignment, User, Volunteer, VolunteerHour};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Bird,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalStatus {
    #[default]
    Available,
    Adopted,
    MedicalHold,
    BehavioralHold,
    PendingAdoption,
    Deceased,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

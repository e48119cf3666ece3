pub mod entity;
pub mod error;
pub mod input;
pub mod memory;
pub mod model;
pub mod store;

pub use entity::Entity;
pub use error::DataError;
pub use input::{CreateAnimalInput, CreateUserInput, InputError, NewUser, UpdateAnimalInput};
pub use memory::{InMemoryStore, QueryRecord, Stored};
pub use model::{
    Adoption, AdoptionStatus, Animal, AnimalStatus, Assignment, Gender, MedicalRecord,
    PaymentStatus, Photo, Species, User, Volunteer, VolunteerHour,
};
pub use store::{ShelterStore, StoreFuture};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{DataError, Entity, InMemoryStore, ShelterStore};
}

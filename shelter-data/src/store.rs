use std::future::Future;
use std::pin::Pin;

use crate::error::DataError;
use crate::input::{CreateAnimalInput, NewUser, UpdateAnimalInput};
use crate::model::{
    Adoption, Animal, Assignment, MedicalRecord, Photo, User, Volunteer, VolunteerHour,
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DataError>> + Send + 'a>>;

/// Storage capability injected into every request.
///
/// Object-safe so the server can hold an `Arc<dyn ShelterStore>` and swap the
/// in-memory implementation for a database-backed one.
///
/// Bulk reads take de-duplicated keys and return matching rows in any order;
/// callers group and align them.
pub trait ShelterStore: Send + Sync + 'static {
    fn list_animals(&self) -> StoreFuture<'_, Vec<Animal>>;
    fn find_animal<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Animal>>;
    fn list_users(&self) -> StoreFuture<'_, Vec<User>>;
    fn find_user<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<User>>;
    fn find_user_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Option<User>>;
    fn list_volunteers(&self) -> StoreFuture<'_, Vec<Volunteer>>;
    fn find_volunteer<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Volunteer>>;
    fn list_adoptions(&self) -> StoreFuture<'_, Vec<Adoption>>;
    fn find_adoption<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<Adoption>>;
    fn adoptions_for_adopter<'a>(&'a self, adopter_id: &'a str) -> StoreFuture<'a, Vec<Adoption>>;

    /// Fails with `UniqueViolation` on a duplicate microchip id.
    fn create_animal(&self, input: CreateAnimalInput) -> StoreFuture<'_, Animal>;
    /// Fails with `NotFound` or `UniqueViolation`.
    fn update_animal<'a>(
        &'a self,
        id: &'a str,
        input: UpdateAnimalInput,
    ) -> StoreFuture<'a, Animal>;
    /// Fails with `NotFound`, or `ForeignKeyViolation` while adoptions reference the animal.
    fn delete_animal<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;
    /// Fails with `UniqueViolation` on a duplicate email.
    fn create_user(&self, user: NewUser) -> StoreFuture<'_, User>;

    fn medical_records_by_animal_ids<'a>(
        &'a self,
        animal_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<MedicalRecord>>;
    fn photos_by_animal_ids<'a>(&'a self, animal_ids: &'a [String]) -> StoreFuture<'a, Vec<Photo>>;
    fn adoptions_by_animal_ids<'a>(
        &'a self,
        animal_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Adoption>>;
    fn adoptions_by_adopter_ids<'a>(
        &'a self,
        adopter_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Adoption>>;
    fn volunteers_by_user_ids<'a>(
        &'a self,
        user_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Volunteer>>;
    fn users_by_ids<'a>(&'a self, ids: &'a [String]) -> StoreFuture<'a, Vec<User>>;
    fn volunteer_hours_by_volunteer_ids<'a>(
        &'a self,
        volunteer_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<VolunteerHour>>;
    fn assignments_by_volunteer_ids<'a>(
        &'a self,
        volunteer_ids: &'a [String],
    ) -> StoreFuture<'a, Vec<Assignment>>;
    fn animals_by_ids<'a>(&'a self, ids: &'a [String]) -> StoreFuture<'a, Vec<Animal>>;
}

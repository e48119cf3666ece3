//! One [`Loader`] per relation, built fresh for every request.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use shelter_data::{
    Adoption, Animal, Assignment, DataError, MedicalRecord, Photo, ShelterStore, StoreFuture,
    User, Volunteer, VolunteerHour,
};
use shelter_loader::{align_many, align_one, group_by, index_by, BatchFn, Loader};

/// A foreign-key relation served by one bulk read of the store.
pub trait Relation: Send + Sync + 'static {
    type Row: Clone + Send + Sync + 'static;

    /// Loader name used in logs and errors.
    const NAME: &'static str;

    fn fetch<'a>(store: &'a dyn ShelterStore, keys: &'a [String]) -> StoreFuture<'a, Vec<Self::Row>>;

    /// The key a row is grouped under.
    fn key(row: &Self::Row) -> &str;
}

/// One-to-many batch function: every key maps to a possibly empty list.
pub struct ManyBy<R> {
    store: Arc<dyn ShelterStore>,
    _relation: PhantomData<fn() -> R>,
}

/// To-one batch function: every key maps to at most one row.
pub struct OneBy<R> {
    store: Arc<dyn ShelterStore>,
    _relation: PhantomData<fn() -> R>,
}

impl<R> ManyBy<R> {
    pub fn new(store: Arc<dyn ShelterStore>) -> Self {
        Self {
            store,
            _relation: PhantomData,
        }
    }
}

impl<R> OneBy<R> {
    pub fn new(store: Arc<dyn ShelterStore>) -> Self {
        Self {
            store,
            _relation: PhantomData,
        }
    }
}

impl<R: Relation> BatchFn<String, Vec<R::Row>> for ManyBy<R> {
    type Error = DataError;

    fn load(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<R::Row>>, DataError>> + Send {
        async move {
            let rows = R::fetch(self.store.as_ref(), keys).await?;
            Ok(align_many(keys, group_by(rows, |row| R::key(row).to_string())))
        }
    }
}

impl<R: Relation> BatchFn<String, Option<R::Row>> for OneBy<R> {
    type Error = DataError;

    fn load(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<Option<R::Row>>, DataError>> + Send {
        async move {
            let rows = R::fetch(self.store.as_ref(), keys).await?;
            Ok(align_one(keys, index_by(rows, |row| R::key(row).to_string())))
        }
    }
}

pub type ManyLoader<R> = Loader<String, Vec<<R as Relation>::Row>, ManyBy<R>>;
pub type OneLoader<R> = Loader<String, Option<<R as Relation>::Row>, OneBy<R>>;

macro_rules! relation {
    ($(#[$doc:meta])* $name:ident, $label:literal, $row:ty, $fetch:ident, |$r:ident| $key:expr) => {
        $(#[$doc])*
        pub struct $name;

        impl Relation for $name {
            type Row = $row;
            const NAME: &'static str = $label;

            fn fetch<'a>(
                store: &'a dyn ShelterStore,
                keys: &'a [String],
            ) -> StoreFuture<'a, Vec<$row>> {
                store.$fetch(keys)
            }

            fn key($r: &$row) -> &str {
                $key
            }
        }
    };
}

relation!(
    /// Animal id -> medical records.
    MedicalRecordsByAnimal, "medical-records", MedicalRecord, medical_records_by_animal_ids,
    |r| r.animal_id.as_str()
);
relation!(
    /// Animal id -> photos.
    PhotosByAnimal, "photos", Photo, photos_by_animal_ids,
    |r| r.animal_id.as_str()
);
relation!(
    /// Animal id -> adoptions.
    AdoptionsByAnimal, "adoptions-by-animal", Adoption, adoptions_by_animal_ids,
    |r| r.animal_id.as_str()
);
relation!(
    /// Adopter (user) id -> adoptions.
    AdoptionsByAdopter, "adoptions-by-adopter", Adoption, adoptions_by_adopter_ids,
    |r| r.adopter_id.as_str()
);
relation!(
    /// User id -> volunteer profile.
    VolunteerByUser, "volunteer-by-user", Volunteer, volunteers_by_user_ids,
    |r| r.user_id.as_str()
);
relation!(
    /// User id -> user.
    UserById, "user-by-id", User, users_by_ids,
    |r| r.id.as_str()
);
relation!(
    /// Volunteer id -> logged hours.
    HoursByVolunteer, "volunteer-hours", VolunteerHour, volunteer_hours_by_volunteer_ids,
    |r| r.volunteer_id.as_str()
);
relation!(
    /// Volunteer id -> assignments.
    AssignmentsByVolunteer, "assignments", Assignment, assignments_by_volunteer_ids,
    |r| r.volunteer_id.as_str()
);
relation!(
    /// Animal id -> animal.
    AnimalById, "animal-by-id", Animal, animals_by_ids,
    |r| r.id.as_str()
);

/// The loaders of one request context.
pub struct LoaderRegistry {
    pub medical_records: ManyLoader<MedicalRecordsByAnimal>,
    pub photos: ManyLoader<PhotosByAnimal>,
    pub adoptions_by_animal: ManyLoader<AdoptionsByAnimal>,
    pub adoptions_by_adopter: ManyLoader<AdoptionsByAdopter>,
    pub volunteer_by_user: OneLoader<VolunteerByUser>,
    pub user_by_id: OneLoader<UserById>,
    pub volunteer_hours: ManyLoader<HoursByVolunteer>,
    pub assignments: ManyLoader<AssignmentsByVolunteer>,
    pub animal_by_id: OneLoader<AnimalById>,
}

fn many<R: Relation>(store: &Arc<dyn ShelterStore>, yield_count: usize) -> ManyLoader<R> {
    Loader::new(R::NAME, ManyBy::new(Arc::clone(store))).with_yield_count(yield_count)
}

fn one<R: Relation>(store: &Arc<dyn ShelterStore>, yield_count: usize) -> OneLoader<R> {
    Loader::new(R::NAME, OneBy::new(Arc::clone(store))).with_yield_count(yield_count)
}

impl LoaderRegistry {
    pub fn new(store: &Arc<dyn ShelterStore>, yield_count: usize) -> Self {
        Self {
            medical_records: many(store, yield_count),
            photos: many(store, yield_count),
            adoptions_by_animal: many(store, yield_count),
            adoptions_by_adopter: many(store, yield_count),
            volunteer_by_user: one(store, yield_count),
            user_by_id: one(store, yield_count),
            volunteer_hours: many(store, yield_count),
            assignments: many(store, yield_count),
            animal_by_id: one(store, yield_count),
        }
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entry(&self.medical_records)
            .entry(&self.photos)
            .entry(&self.adoptions_by_animal)
            .entry(&self.adoptions_by_adopter)
            .entry(&self.volunteer_by_user)
            .entry(&self.user_by_id)
            .entry(&self.volunteer_hours)
            .entry(&self.assignments)
            .entry(&self.animal_by_id)
            .finish()
    }
}

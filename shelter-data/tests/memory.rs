use shelter_data::{
    Adoption, Animal, CreateAnimalInput, DataError, Gender, InMemoryStore, MedicalRecord, NewUser,
    Photo, ShelterStore, Species, UpdateAnimalInput, User,
};
use shelter_security::Role;

fn input(name: &str, microchip_id: Option<&str>) -> CreateAnimalInput {
    CreateAnimalInput {
        name: name.into(),
        species: Species::Cat,
        breed: "Tabby".into(),
        age: 3,
        gender: Gender::Female,
        adoption_fee: 75.0,
        microchip_id: microchip_id.map(Into::into),
        behavior_notes: None,
        special_needs: None,
    }
}

#[tokio::test]
async fn create_assigns_defaults() {
    let store = InMemoryStore::new();
    let animal = store.create_animal(input("Mia", None)).await.unwrap();
    assert!(!animal.id.is_empty());
    assert_eq!(animal.status, shelter_data::AnimalStatus::Available);
    assert!(animal.special_needs.is_empty());
    assert_eq!(store.find_animal(&animal.id).await.unwrap(), Some(animal));
}

#[tokio::test]
async fn duplicate_microchip_is_a_unique_violation() {
    let store = InMemoryStore::new();
    store.create_animal(input("Mia", Some("CHIP-1"))).await.unwrap();
    let err = store
        .create_animal(input("Max", Some("CHIP-1")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::UniqueViolation {
            field: "microchipId",
            ..
        }
    ));
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let store = InMemoryStore::new();
    let animal = store.create_animal(input("Mia", Some("CHIP-1"))).await.unwrap();

    let updated = store
        .update_animal(
            &animal.id,
            UpdateAnimalInput {
                age: Some(4),
                microchip_id: Some("CHIP-1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.age, 4);
    assert_eq!(updated.name, "Mia");
    assert_eq!(updated.adoption_fee, 75.0);
    assert!(updated.updated_at >= animal.updated_at);
}

#[tokio::test]
async fn update_rejects_microchip_of_another_animal() {
    let store = InMemoryStore::new();
    store.create_animal(input("Mia", Some("CHIP-1"))).await.unwrap();
    let max = store.create_animal(input("Max", None)).await.unwrap();

    let err = store
        .update_animal(
            &max.id,
            UpdateAnimalInput {
                microchip_id: Some("CHIP-1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::UniqueViolation { .. }));
}

#[tokio::test]
async fn update_and_delete_of_missing_animal_are_not_found() {
    let store = InMemoryStore::new();
    let err = store
        .update_animal("ghost", UpdateAnimalInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound { entity: "animal", .. }));
    let err = store.delete_animal("ghost").await.unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }));
}

#[tokio::test]
async fn delete_is_restricted_by_adoptions() {
    let store = InMemoryStore::new();
    let animal = store.create_animal(input("Mia", None)).await.unwrap();
    let adopter = store
        .insert(User::new("adopter@shelter.test", "hash", Role::Adopter))
        .await;
    store.insert(Adoption::new(&animal.id, &adopter.id, 75.0)).await;

    let err = store.delete_animal(&animal.id).await.unwrap_err();
    assert!(matches!(
        err,
        DataError::ForeignKeyViolation {
            dependents: "adoptions",
            ..
        }
    ));
    assert!(store.find_animal(&animal.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_cascades_photos_and_records() {
    let store = InMemoryStore::new();
    let animal = store.create_animal(input("Mia", None)).await.unwrap();
    store.insert(Photo::new(&animal.id, "mia.jpg")).await;
    store
        .insert(MedicalRecord::new(&animal.id, "VACCINATION", "Rabies"))
        .await;

    store.delete_animal(&animal.id).await.unwrap();

    let ids = vec![animal.id.clone()];
    assert!(store.photos_by_animal_ids(&ids).await.unwrap().is_empty());
    assert!(store
        .medical_records_by_animal_ids(&ids)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let store = InMemoryStore::new();
    let new_user = || NewUser {
        email: "staff@shelter.test".into(),
        password_hash: "hash".into(),
        role: Role::Staff,
    };
    let user = store.create_user(new_user()).await.unwrap();
    assert_eq!(
        store
            .find_user_by_email("staff@shelter.test")
            .await
            .unwrap()
            .map(|u| u.id),
        Some(user.id)
    );
    let err = store.create_user(new_user()).await.unwrap_err();
    assert!(matches!(err, DataError::UniqueViolation { field: "email", .. }));
}

#[tokio::test]
async fn bulk_reads_are_logged_with_their_keys() {
    let store = InMemoryStore::new();
    let mia: Animal = store.create_animal(input("Mia", None)).await.unwrap();
    store.insert(Photo::new(&mia.id, "a.jpg")).await;
    store.insert(Photo::new(&mia.id, "b.jpg")).await;

    let keys = vec![mia.id.clone(), "unknown".to_string()];
    let photos = store.photos_by_animal_ids(&keys).await.unwrap();
    assert_eq!(photos.len(), 2);

    let log = store.queries();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].relation, "photos_by_animal_ids");
    assert_eq!(log[0].keys, keys);
    assert_eq!(store.bulk_calls("photos_by_animal_ids"), 1);

    store.clear_log();
    assert!(store.queries().is_empty());
}

#[test]
fn password_hash_is_never_serialized() {
    let user = User::new("someone@shelter.test", "$argon2id$secret", Role::Volunteer);
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert_eq!(json["role"], "VOLUNTEER");
    assert!(json["createdAt"].is_string());
}

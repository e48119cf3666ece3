use std::sync::Arc;

use serde_json::json;
use shelter_data::{
    Adoption, Animal, CreateAnimalInput, Gender, InMemoryStore, MedicalRecord, Photo,
    ShelterStore, Species, User, Volunteer, VolunteerHour,
};
use shelter_graph::{execute, Document, LoaderConfig, Operation, RequestContext, Services};
use shelter_security::{Caller, Role, SecurityConfig};

fn animal(name: &str) -> Animal {
    Animal::from_input(CreateAnimalInput {
        name: name.into(),
        species: Species::Dog,
        breed: "Mixed".into(),
        age: 2,
        gender: Gender::Male,
        adoption_fee: 50.0,
        microchip_id: None,
        behavior_notes: None,
        special_needs: None,
    })
}

fn context(store: &Arc<InMemoryStore>, caller: Option<Caller>) -> RequestContext {
    let dyn_store: Arc<dyn ShelterStore> = store.clone();
    let services = Services::new(dyn_store, SecurityConfig::new("secret"), LoaderConfig::default());
    RequestContext::new(Arc::new(services), caller)
}

fn staff() -> Caller {
    Caller::new("staff-1", "staff@shelter.org", Role::Staff)
}

#[tokio::test]
async fn sibling_relations_share_one_bulk_read() {
    let store = Arc::new(InMemoryStore::new());
    let mut ids = Vec::new();
    for name in ["Rex", "Bella", "Max"] {
        let a = store.insert(animal(name)).await;
        store.insert(Photo::new(&a.id, format!("{name}.jpg"))).await;
        store.insert(MedicalRecord::new(&a.id, "VACCINATION", "Rabies")).await;
        ids.push(a.id);
    }

    let ctx = context(&store, Some(staff()));
    let doc = Document::new([Operation::new("animals")
        .select(json!({ "photos": {}, "medicalRecords": {} }))]);
    let response = execute(&ctx, &doc).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let animals = response.data["animals"].as_array().unwrap();
    assert_eq!(animals.len(), 3);
    for a in animals {
        assert_eq!(a["photos"].as_array().unwrap().len(), 1);
        assert_eq!(a["medicalRecords"].as_array().unwrap().len(), 1);
    }

    assert_eq!(store.bulk_calls("photos_by_animal_ids"), 1);
    assert_eq!(store.bulk_calls("medical_records_by_animal_ids"), 1);
    let photo_query = store
        .queries()
        .into_iter()
        .find(|q| q.relation == "photos_by_animal_ids")
        .unwrap();
    let mut keys = photo_query.keys.clone();
    keys.sort();
    ids.sort();
    assert_eq!(keys, ids);
}

#[tokio::test]
async fn shared_parents_are_fetched_once_per_depth() {
    let store = Arc::new(InMemoryStore::new());
    let adopter = store
        .insert(User::new("ada@example.com", "hash", Role::Adopter))
        .await;
    for name in ["Rex", "Bella"] {
        let a = store.insert(animal(name)).await;
        store.insert(Adoption::new(&a.id, &adopter.id, 50.0)).await;
    }

    let ctx = context(&store, Some(staff()));
    let doc = Document::new([Operation::new("adoptions")
        .select(json!({ "animal": { "photos": {} }, "adopter": { "volunteer": {} } }))]);
    let response = execute(&ctx, &doc).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let adoptions = response.data["adoptions"].as_array().unwrap();
    assert_eq!(adoptions.len(), 2);
    assert_eq!(adoptions[0]["adopter"]["email"], "ada@example.com");
    assert!(adoptions[0]["adopter"]["volunteer"].is_null());
    assert!(adoptions[0]["adopter"].get("passwordHash").is_none());

    assert_eq!(store.bulk_calls("users_by_ids"), 1);
    assert_eq!(store.bulk_calls("animals_by_ids"), 1);
    assert_eq!(store.bulk_calls("photos_by_animal_ids"), 1);
    assert_eq!(store.bulk_calls("volunteers_by_user_ids"), 1);
    let users = store
        .queries()
        .into_iter()
        .find(|q| q.relation == "users_by_ids")
        .unwrap();
    assert_eq!(users.keys, vec![adopter.id.clone()]);
}

#[tokio::test]
async fn sibling_operations_share_loaders() {
    let store = Arc::new(InMemoryStore::new());
    let a = store.insert(animal("Rex")).await;
    store.insert(Photo::new(&a.id, "rex.jpg")).await;

    let ctx = context(&store, None);
    let doc = Document::new([
        Operation::new("animals").select(json!({ "photos": {} })),
        Operation::new("animal")
            .alias("rex")
            .arg("id", a.id.clone())
            .select(json!({ "photos": {} })),
    ]);
    let response = execute(&ctx, &doc).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data["rex"]["photos"][0]["url"], "rex.jpg");
    assert_eq!(store.bulk_calls("photos_by_animal_ids"), 1);
}

#[tokio::test]
async fn each_request_starts_with_a_cold_cache() {
    let store = Arc::new(InMemoryStore::new());
    let a = store.insert(animal("Rex")).await;
    store.insert(Photo::new(&a.id, "rex.jpg")).await;
    let doc = Document::new([Operation::new("animals").select(json!({ "photos": {} }))]);

    execute(&context(&store, None), &doc).await;
    execute(&context(&store, None), &doc).await;

    assert_eq!(store.bulk_calls("photos_by_animal_ids"), 2);
}

#[tokio::test]
async fn volunteer_relations_resolve_through_loaders() {
    let store = Arc::new(InMemoryStore::new());
    let user = store
        .insert(User::new("vic@example.com", "hash", Role::Volunteer))
        .await;
    let volunteer = store.insert(Volunteer::new(&user.id, "Vic", "Tor")).await;
    store
        .insert(VolunteerHour::new(&volunteer.id, 3.5, "Dog walking"))
        .await;

    let ctx = context(&store, Some(staff()));
    let doc = Document::new([Operation::new("volunteers")
        .select(json!({ "user": {}, "volunteerHours": {}, "assignments": {} }))]);
    let response = execute(&ctx, &doc).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let v = &response.data["volunteers"][0];
    assert_eq!(v["user"]["email"], "vic@example.com");
    assert_eq!(v["volunteerHours"][0]["hours"], 3.5);
    assert_eq!(v["assignments"], json!([]));
}

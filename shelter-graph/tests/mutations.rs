use std::sync::Arc;

use serde_json::{json, Value};
use shelter_data::{
    Adoption, Animal, CreateAnimalInput, Gender, InMemoryStore, Photo, ShelterStore, Species,
    User,
};
use shelter_graph::{execute, Document, LoaderConfig, Operation, RequestContext, Response, Services};
use shelter_security::{hash_password, Caller, JwtValidator, Role, SecurityConfig};

fn store_and_services(security: SecurityConfig) -> (Arc<InMemoryStore>, Arc<Services>) {
    let store = Arc::new(InMemoryStore::new());
    let dyn_store: Arc<dyn ShelterStore> = store.clone();
    let services = Services::new(dyn_store, security, LoaderConfig::default());
    (store, Arc::new(services))
}

async fn run(services: &Arc<Services>, caller: Option<Caller>, operation: Operation) -> Response {
    let ctx = RequestContext::new(Arc::clone(services), caller);
    execute(&ctx, &Document::new([operation])).await
}

fn staff() -> Caller {
    Caller::new("staff-1", "staff@shelter.org", Role::Staff)
}

fn admin() -> Caller {
    Caller::new("admin-1", "admin@shelter.org", Role::Admin)
}

fn animal_input(age: i64, fee: f64) -> Value {
    json!({
        "name": "Rex",
        "species": "DOG",
        "breed": "Beagle",
        "age": age,
        "gender": "MALE",
        "adoptionFee": fee,
        "microchipId": "CHIP-1"
    })
}

fn first_error(response: &Response) -> &Value {
    &response.errors[0]
}

async fn seeded_animal(store: &InMemoryStore) -> Animal {
    store
        .insert(Animal::from_input(CreateAnimalInput {
            name: "Mia".into(),
            species: Species::Cat,
            breed: "Tabby".into(),
            age: 3,
            gender: Gender::Female,
            adoption_fee: 40.0,
            microchip_id: None,
            behavior_notes: None,
            special_needs: None,
        }))
        .await
}

#[tokio::test]
async fn create_animal_accepts_zero_and_rejects_negatives() {
    let (_store, services) = store_and_services(SecurityConfig::new("secret"));

    let ok = run(
        &services,
        Some(staff()),
        Operation::new("createAnimal").arg("input", animal_input(0, 0.0)),
    )
    .await;
    assert!(ok.errors.is_empty(), "{:?}", ok.errors);
    assert_eq!(ok.data["createAnimal"]["status"], "AVAILABLE");
    assert_eq!(ok.data["createAnimal"]["age"], 0);

    let age = run(
        &services,
        Some(staff()),
        Operation::new("createAnimal").arg("input", animal_input(-1, 10.0)),
    )
    .await;
    assert_eq!(first_error(&age)["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(first_error(&age)["extensions"]["field"], "age");

    let fee = run(
        &services,
        Some(staff()),
        Operation::new("createAnimal").arg("input", animal_input(2, -5.0)),
    )
    .await;
    assert_eq!(first_error(&fee)["extensions"]["field"], "adoptionFee");
}

#[tokio::test]
async fn create_animal_requires_write_permission() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let volunteer = Caller::new("v-1", "v@example.com", Role::Volunteer);
    let response = run(
        &services,
        Some(volunteer),
        Operation::new("createAnimal").arg("input", animal_input(1, 1.0)),
    )
    .await;
    assert_eq!(first_error(&response)["extensions"]["code"], "FORBIDDEN");
    assert_eq!(
        first_error(&response)["message"],
        "Insufficient permissions for animals:write"
    );
    assert!(store.list_animals().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_microchip_is_tagged() {
    let (_store, services) = store_and_services(SecurityConfig::new("secret"));
    let create = || Operation::new("createAnimal").arg("input", animal_input(1, 1.0));
    run(&services, Some(staff()), create()).await;
    let dup = run(&services, Some(staff()), create()).await;
    assert_eq!(first_error(&dup)["extensions"]["field"], "microchipId");
    assert_eq!(
        first_error(&dup)["message"],
        "An animal with this microchip ID already exists"
    );
}

#[tokio::test]
async fn update_animal_applies_partial_input() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let animal = seeded_animal(&store).await;

    let response = run(
        &services,
        Some(staff()),
        Operation::new("updateAnimal")
            .arg("id", animal.id.clone())
            .arg("input", json!({ "status": "ADOPTED" })),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data["updateAnimal"]["status"], "ADOPTED");
    assert_eq!(response.data["updateAnimal"]["name"], "Mia");

    let missing = run(
        &services,
        Some(staff()),
        Operation::new("updateAnimal")
            .arg("id", "nope")
            .arg("input", json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(first_error(&missing)["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(first_error(&missing)["message"], "Animal not found");
}

#[tokio::test]
async fn update_animal_rejects_negative_values() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let animal = seeded_animal(&store).await;

    for (input, field) in [
        (json!({ "age": -1 }), "age"),
        (json!({ "adoptionFee": -0.5 }), "adoptionFee"),
    ] {
        let response = run(
            &services,
            Some(staff()),
            Operation::new("updateAnimal")
                .arg("id", animal.id.clone())
                .arg("input", input),
        )
        .await;
        assert_eq!(response.data["updateAnimal"], Value::Null);
        assert_eq!(first_error(&response)["extensions"]["code"], "BAD_USER_INPUT");
        assert_eq!(first_error(&response)["extensions"]["field"], field);
    }

    let stored = store.find_animal(&animal.id).await.unwrap().unwrap();
    assert_eq!(stored.age, 3);
    assert_eq!(stored.adoption_fee, 40.0);

    let zero = run(
        &services,
        Some(staff()),
        Operation::new("updateAnimal")
            .arg("id", animal.id.clone())
            .arg("input", json!({ "age": 0, "adoptionFee": 0.0 })),
    )
    .await;
    assert!(zero.errors.is_empty(), "{:?}", zero.errors);
    assert_eq!(zero.data["updateAnimal"]["age"], 0);
}

#[tokio::test]
async fn delete_animal_reports_missing_rows_and_conflicts() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let adopted = seeded_animal(&store).await;
    let adopter = store
        .insert(User::new("ada@example.com", "hash", Role::Adopter))
        .await;
    store.insert(Adoption::new(&adopted.id, &adopter.id, 40.0)).await;
    let free = seeded_animal(&store).await;
    store.insert(Photo::new(&free.id, "mia.jpg")).await;

    let missing = run(
        &services,
        Some(admin()),
        Operation::new("deleteAnimal").arg("id", "nope"),
    )
    .await;
    let err = first_error(&missing);
    assert_eq!(err["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(err["extensions"]["field"], "id");

    let conflict = run(
        &services,
        Some(admin()),
        Operation::new("deleteAnimal").arg("id", adopted.id.clone()),
    )
    .await;
    let err = first_error(&conflict);
    assert_eq!(err["extensions"]["code"], "CONFLICT");
    assert_eq!(err["extensions"]["reason"], "FOREIGN_KEY_CONSTRAINT");
    assert_eq!(err["message"], "Cannot delete animal with existing adoption records");
    assert!(store.find_animal(&adopted.id).await.unwrap().is_some());

    let deleted = run(
        &services,
        Some(admin()),
        Operation::new("deleteAnimal").arg("id", free.id.clone()),
    )
    .await;
    assert!(deleted.errors.is_empty());
    assert_eq!(deleted.data["deleteAnimal"], true);
    assert!(store.find_animal(&free.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_animal_is_admin_only() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let animal = seeded_animal(&store).await;
    let response = run(
        &services,
        Some(staff()),
        Operation::new("deleteAnimal").arg("id", animal.id.clone()),
    )
    .await;
    assert_eq!(first_error(&response)["extensions"]["code"], "FORBIDDEN");
    assert_eq!(first_error(&response)["extensions"]["allowedRoles"], json!(["ADMIN"]));
}

#[tokio::test]
async fn privileged_accounts_need_an_admin() {
    let (_store, services) = store_and_services(SecurityConfig::new("secret"));
    let staff_input = json!({ "email": "new@shelter.org", "password": "pw", "role": "STAFF" });

    let anonymous = run(
        &services,
        None,
        Operation::new("createUser").arg("input", staff_input.clone()),
    )
    .await;
    assert_eq!(first_error(&anonymous)["extensions"]["code"], "UNAUTHENTICATED");

    let by_staff = run(
        &services,
        Some(staff()),
        Operation::new("createUser").arg("input", staff_input.clone()),
    )
    .await;
    assert_eq!(first_error(&by_staff)["extensions"]["code"], "FORBIDDEN");
    assert_eq!(first_error(&by_staff)["message"], "ADMIN role required");

    let by_admin = run(
        &services,
        Some(admin()),
        Operation::new("createUser").arg("input", staff_input),
    )
    .await;
    assert!(by_admin.errors.is_empty(), "{:?}", by_admin.errors);
    assert_eq!(by_admin.data["createUser"]["role"], "STAFF");
}

#[tokio::test]
async fn registration_rejects_bad_and_taken_emails() {
    let (_store, services) = store_and_services(SecurityConfig::new("secret"));
    let register = |email: &str| {
        Operation::new("createUser")
            .arg("input", json!({ "email": email, "password": "pw", "role": "ADOPTER" }))
    };

    let invalid = run(&services, None, register("not-an-email")).await;
    assert_eq!(first_error(&invalid)["extensions"]["field"], "email");

    let first = run(&services, None, register("ada@example.com")).await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);
    assert!(first.data["createUser"].get("passwordHash").is_none());

    let taken = run(&services, None, register("ada@example.com")).await;
    assert_eq!(first_error(&taken)["extensions"]["field"], "email");
    assert_eq!(first_error(&taken)["message"], "User with this email already exists");
}

#[tokio::test]
async fn login_issues_a_token_for_valid_credentials() {
    let security = SecurityConfig::new("secret");
    let (store, services) = store_and_services(security.clone());
    let hash = hash_password("hunter2").await.unwrap();
    let user = store
        .insert(User::new("ada@example.com", hash, Role::Adopter))
        .await;

    let response = run(
        &services,
        None,
        Operation::new("login")
            .arg("email", "ada@example.com")
            .arg("password", "hunter2")
            .select(json!({ "user": { "adoptions": {} } })),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let payload = &response.data["login"];
    assert_eq!(payload["user"]["id"], user.id.as_str());
    assert_eq!(payload["user"]["adoptions"], json!([]));

    let token = payload["token"].as_str().unwrap();
    let caller = JwtValidator::new(security).caller(token).unwrap();
    assert_eq!(caller, user.as_caller());
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_part_was_wrong() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let hash = hash_password("hunter2").await.unwrap();
    store
        .insert(User::new("ada@example.com", hash, Role::Adopter))
        .await;

    for (email, password) in [("ada@example.com", "wrong"), ("nobody@example.com", "hunter2")] {
        let response = run(
            &services,
            None,
            Operation::new("login")
                .arg("email", email)
                .arg("password", password),
        )
        .await;
        let err = first_error(&response);
        assert_eq!(err["extensions"]["code"], "UNAUTHENTICATED");
        assert_eq!(err["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn login_without_a_signing_secret_is_internal() {
    let (store, services) = store_and_services(SecurityConfig::default());
    let hash = hash_password("hunter2").await.unwrap();
    store
        .insert(User::new("ada@example.com", hash, Role::Adopter))
        .await;

    let response = run(
        &services,
        None,
        Operation::new("login")
            .arg("email", "ada@example.com")
            .arg("password", "hunter2"),
    )
    .await;
    let err = first_error(&response);
    assert_eq!(err["extensions"]["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(err["message"], "Internal server error");
}

#[tokio::test]
async fn mutations_run_in_document_order() {
    let (store, services) = store_and_services(SecurityConfig::new("secret"));
    let animal = seeded_animal(&store).await;
    let ctx = RequestContext::new(Arc::clone(&services), Some(admin()));
    let doc = Document::new([
        Operation::new("deleteAnimal").arg("id", animal.id.clone()),
        Operation::new("animal").alias("after").arg("id", animal.id.clone()),
    ]);
    let response = execute(&ctx, &doc).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data["deleteAnimal"], true);
    assert_eq!(response.data["after"], Value::Null);
}

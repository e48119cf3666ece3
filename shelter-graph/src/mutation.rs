//! Write operations.
//!
//! Inputs are validated before anything touches the store, and storage
//! constraint failures come back as field-tagged client errors.

use serde_json::{json, Value};
use shelter_core::{ApiError, ApiResult};
use shelter_data::input::check;
use shelter_data::{CreateAnimalInput, CreateUserInput, DataError, NewUser, UpdateAnimalInput};
use shelter_security::{
    hash_password, require_permission, require_role, verify_password, Permission, Role,
};
use tracing::{info, warn};

use crate::context::RequestContext;
use crate::node::resolve_node;
use crate::selection::Selection;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Map constraint failures onto the field the client controls.
fn translate(err: DataError) -> ApiError {
    match err {
        DataError::NotFound { entity: "animal", .. } => {
            ApiError::bad_input("id", "Animal not found")
        }
        DataError::UniqueViolation {
            field: "microchipId",
            ..
        } => ApiError::bad_input("microchipId", "An animal with this microchip ID already exists"),
        DataError::UniqueViolation { field: "email", .. } => {
            ApiError::bad_input("email", "User with this email already exists")
        }
        DataError::ForeignKeyViolation {
            entity: "animal", ..
        } => ApiError::foreign_key("id", "Cannot delete animal with existing adoption records"),
        other => other.into(),
    }
}

pub async fn create_animal(
    ctx: &RequestContext,
    input: CreateAnimalInput,
    selection: &Selection,
) -> ApiResult<Value> {
    let caller = require_permission(ctx, Permission::AnimalsWrite)?;
    check(&input)?;
    let animal = ctx.store().create_animal(input).await.map_err(translate)?;
    info!(animal = %animal.id, by = %caller.id, "animal created");
    resolve_node(&animal, ctx, selection).await
}

pub async fn update_animal(
    ctx: &RequestContext,
    id: &str,
    input: UpdateAnimalInput,
    selection: &Selection,
) -> ApiResult<Value> {
    let caller = require_permission(ctx, Permission::AnimalsWrite)?;
    check(&input)?;
    let animal = ctx
        .store()
        .update_animal(id, input)
        .await
        .map_err(translate)?;
    info!(animal = %animal.id, by = %caller.id, "animal updated");
    resolve_node(&animal, ctx, selection).await
}

pub async fn delete_animal(ctx: &RequestContext, id: &str) -> ApiResult<Value> {
    let caller = require_permission(ctx, Permission::AnimalsDelete)?;
    ctx.store().delete_animal(id).await.map_err(translate)?;
    info!(animal = %id, by = %caller.id, "animal deleted");
    Ok(Value::Bool(true))
}

/// Open registration for volunteers and adopters; staff and admin accounts
/// can only be created by an admin.
pub async fn create_user(
    ctx: &RequestContext,
    input: CreateUserInput,
    selection: &Selection,
) -> ApiResult<Value> {
    if input.role.is_privileged() {
        require_role(ctx, Role::Admin)?;
    }
    check(&input)?;

    if ctx.store().find_user_by_email(&input.email).await?.is_some() {
        return Err(ApiError::bad_input("email", "User with this email already exists"));
    }

    let password_hash = hash_password(&input.password).await?;
    let user = ctx
        .store()
        .create_user(NewUser {
            email: input.email,
            password_hash,
            role: input.role,
        })
        .await
        .map_err(translate)?;
    info!(user = %user.id, role = %user.role, "user created");
    resolve_node(&user, ctx, selection).await
}

/// Exchange credentials for a signed token. Unknown emails and wrong
/// passwords are indistinguishable to the caller.
pub async fn login(
    ctx: &RequestContext,
    email: &str,
    password: &str,
    selection: &Selection,
) -> ApiResult<Value> {
    let Some(user) = ctx.store().find_user_by_email(email).await? else {
        warn!("login failed: unknown email");
        return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
    };
    if !verify_password(password, &user.password_hash).await {
        warn!(user = %user.id, "login failed: wrong password");
        return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
    }

    let user_selection = payload_selection(selection)?;
    let issued = ctx.tokens().issue(&user.as_caller())?;
    info!(user = %user.id, "login succeeded");
    Ok(json!({
        "token": issued.token,
        "user": resolve_node(&user, ctx, &user_selection).await?,
    }))
}

/// The login payload has one relation, `user`.
fn payload_selection(selection: &Selection) -> ApiResult<Selection> {
    let mut user = Selection::default();
    for (field, sub) in selection.fields() {
        match field {
            "user" => user = sub.clone(),
            other => {
                return Err(ApiError::bad_input(
                    other,
                    format!("Unknown field '{other}' on type AuthPayload"),
                ))
            }
        }
    }
    Ok(user)
}

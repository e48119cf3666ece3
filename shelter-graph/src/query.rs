//! Read operations.
//!
//! Each handler checks access first, runs one root query against the store
//! and hands the rows to the node resolver. Ownership checks compare the
//! owning user id with the caller and fall back to a role permission.

use serde_json::Value;
use shelter_core::ApiResult;
use shelter_security::{require_authenticated, require_permission, HasCaller, Permission, Role};

use crate::context::RequestContext;
use crate::node::{resolve_list, resolve_option};
use crate::selection::Selection;

/// Public: staff see full records, everyone else the public projection.
pub async fn animals(ctx: &RequestContext, selection: &Selection) -> ApiResult<Value> {
    let animals = ctx.store().list_animals().await?;
    resolve_list(&animals, ctx, selection).await
}

pub async fn animal(ctx: &RequestContext, id: &str, selection: &Selection) -> ApiResult<Value> {
    let animal = ctx.store().find_animal(id).await?;
    resolve_option(animal.as_ref(), ctx, selection).await
}

pub async fn users(ctx: &RequestContext, selection: &Selection) -> ApiResult<Value> {
    require_permission(ctx, Permission::UsersRead)?;
    let users = ctx.store().list_users().await?;
    resolve_list(&users, ctx, selection).await
}

/// Callers may always read their own profile.
pub async fn user(ctx: &RequestContext, id: &str, selection: &Selection) -> ApiResult<Value> {
    let caller = require_authenticated(ctx)?;
    if !caller.owns(id) {
        require_permission(ctx, Permission::UsersRead)?;
    }
    let user = ctx.store().find_user(id).await?;
    resolve_option(user.as_ref(), ctx, selection).await
}

pub async fn volunteers(ctx: &RequestContext, selection: &Selection) -> ApiResult<Value> {
    require_permission(ctx, Permission::VolunteersRead)?;
    let volunteers = ctx.store().list_volunteers().await?;
    resolve_list(&volunteers, ctx, selection).await
}

/// The owning user may read their volunteer profile. A profile that does not
/// exist has no owner, so only privileged callers learn that it is missing.
pub async fn volunteer(ctx: &RequestContext, id: &str, selection: &Selection) -> ApiResult<Value> {
    let caller = require_authenticated(ctx)?;
    let volunteer = ctx.store().find_volunteer(id).await?;
    if !volunteer.as_ref().is_some_and(|v| caller.owns(&v.user_id)) {
        require_permission(ctx, Permission::VolunteersRead)?;
    }
    resolve_option(volunteer.as_ref(), ctx, selection).await
}

/// Adopters see only their own applications.
pub async fn adoptions(ctx: &RequestContext, selection: &Selection) -> ApiResult<Value> {
    let caller = require_authenticated(ctx)?;
    let adoptions = if caller.role == Role::Adopter {
        ctx.store().adoptions_for_adopter(&caller.id).await?
    } else {
        require_permission(ctx, Permission::AdoptionsRead)?;
        ctx.store().list_adoptions().await?
    };
    resolve_list(&adoptions, ctx, selection).await
}

pub async fn adoption(ctx: &RequestContext, id: &str, selection: &Selection) -> ApiResult<Value> {
    let caller = require_authenticated(ctx)?;
    let adoption = ctx.store().find_adoption(id).await?;
    if !adoption.as_ref().is_some_and(|a| caller.owns(&a.adopter_id)) {
        require_permission(ctx, Permission::AdoptionsRead)?;
    }
    resolve_option(adoption.as_ref(), ctx, selection).await
}

/// The caller's own user record, or `null` when anonymous.
pub async fn me(ctx: &RequestContext, selection: &Selection) -> ApiResult<Value> {
    let Some(caller) = ctx.caller() else {
        return Ok(Value::Null);
    };
    let user = ctx.store().find_user(&caller.id).await?;
    resolve_option(user.as_ref(), ctx, selection).await
}

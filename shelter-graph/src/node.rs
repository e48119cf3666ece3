//! Turning entities into response values.
//!
//! Scalars come straight from each entity's `Serialize` impl; the nested
//! fields named in the [`Selection`] are resolved concurrently through the
//! request's loaders so siblings at the same depth share one batch.

use futures_util::future::{try_join_all, BoxFuture};
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use shelter_core::ApiError;
use shelter_data::{
    Adoption, Animal, Assignment, MedicalRecord, Photo, User, Volunteer, VolunteerHour,
};
use shelter_loader::LoadError;
use shelter_security::{has_permission, Permission};

use crate::context::RequestContext;
use crate::loaders::{ManyLoader, OneLoader, Relation};
use crate::selection::Selection;

/// An entity that can appear in a response.
pub trait Node: Serialize + Send + Sync {
    /// Type name used in error messages.
    const TYPE: &'static str;

    /// Fields left out of the response for this caller. A hidden field is
    /// never resolved.
    fn hidden(&self, _ctx: &RequestContext, _field: &str) -> bool {
        false
    }

    /// Resolve one nested field.
    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>>;
}

pub fn unknown_field<N: Node>(field: &str) -> ApiError {
    ApiError::bad_input(field, format!("Unknown field '{field}' on type {}", N::TYPE))
}

pub(crate) fn load_failed(err: LoadError) -> ApiError {
    tracing::error!(loader = err.loader(), error = %err, "relation load failed");
    ApiError::internal(err.to_string())
}

pub async fn resolve_node<N: Node>(
    node: &N,
    ctx: &RequestContext,
    selection: &Selection,
) -> Result<Value, ApiError> {
    let mut object = match serde_json::to_value(node)? {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    let visible: Vec<(&str, &Selection)> = selection
        .fields()
        .filter(|(field, _)| !node.hidden(ctx, field))
        .collect();
    let values = try_join_all(
        visible
            .iter()
            .map(|&(field, sub)| node.resolve(ctx, field, sub)),
    )
    .await?;

    for ((field, _), value) in visible.into_iter().zip(values) {
        object.insert(field.to_string(), value);
    }
    Ok(Value::Object(object))
}

pub async fn resolve_list<N: Node>(
    nodes: &[N],
    ctx: &RequestContext,
    selection: &Selection,
) -> Result<Value, ApiError> {
    try_join_all(nodes.iter().map(|node| resolve_node(node, ctx, selection)))
        .await
        .map(Value::Array)
}

/// `null` for a missing row.
pub async fn resolve_option<N: Node>(
    node: Option<&N>,
    ctx: &RequestContext,
    selection: &Selection,
) -> Result<Value, ApiError> {
    match node {
        Some(node) => resolve_node(node, ctx, selection).await,
        None => Ok(Value::Null),
    }
}

async fn many<R>(
    loader: &ManyLoader<R>,
    key: &str,
    ctx: &RequestContext,
    selection: &Selection,
) -> Result<Value, ApiError>
where
    R: Relation,
    R::Row: Node,
{
    let rows = loader.load(key.to_string()).await.map_err(load_failed)?;
    resolve_list(rows.as_slice(), ctx, selection).await
}

async fn one<R>(
    loader: &OneLoader<R>,
    key: &str,
    ctx: &RequestContext,
    selection: &Selection,
) -> Result<Value, ApiError>
where
    R: Relation,
    R::Row: Node,
{
    let row = loader.load(key.to_string()).await.map_err(load_failed)?;
    resolve_option((*row).as_ref(), ctx, selection).await
}

impl Node for Animal {
    const TYPE: &'static str = "Animal";

    /// Medical history and adoption records are staff-only; everyone else
    /// gets the public projection.
    fn hidden(&self, ctx: &RequestContext, field: &str) -> bool {
        matches!(field, "medicalRecords" | "adoptions")
            && !has_permission(ctx, Permission::AnimalsRead)
    }

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            let loaders = ctx.loaders();
            match field {
                "medicalRecords" => many(&loaders.medical_records, &self.id, ctx, selection).await,
                "photos" => many(&loaders.photos, &self.id, ctx, selection).await,
                "adoptions" => many(&loaders.adoptions_by_animal, &self.id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

impl Node for User {
    const TYPE: &'static str = "User";

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            let loaders = ctx.loaders();
            match field {
                "volunteer" => one(&loaders.volunteer_by_user, &self.id, ctx, selection).await,
                "adoptions" => many(&loaders.adoptions_by_adopter, &self.id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

impl Node for Volunteer {
    const TYPE: &'static str = "Volunteer";

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            let loaders = ctx.loaders();
            match field {
                "user" => one(&loaders.user_by_id, &self.user_id, ctx, selection).await,
                "volunteerHours" => many(&loaders.volunteer_hours, &self.id, ctx, selection).await,
                "assignments" => many(&loaders.assignments, &self.id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

impl Node for Adoption {
    const TYPE: &'static str = "Adoption";

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            let loaders = ctx.loaders();
            match field {
                "animal" => one(&loaders.animal_by_id, &self.animal_id, ctx, selection).await,
                "adopter" => one(&loaders.user_by_id, &self.adopter_id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

impl Node for MedicalRecord {
    const TYPE: &'static str = "MedicalRecord";

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            match field {
                "animal" => one(&ctx.loaders().animal_by_id, &self.animal_id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

impl Node for Photo {
    const TYPE: &'static str = "Photo";

    fn resolve<'a>(
        &'a self,
        ctx: &'a RequestContext,
        field: &'a str,
        selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        async move {
            match field {
                "animal" => one(&ctx.loaders().animal_by_id, &self.animal_id, ctx, selection).await,
                _ => Err(unknown_field::<Self>(field)),
            }
        }
        .boxed()
    }
}

// Hours and assignments are leaves: they are only reached through their volunteer.

impl Node for VolunteerHour {
    const TYPE: &'static str = "VolunteerHour";

    fn resolve<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        field: &'a str,
        _selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        futures_util::future::ready(Err(unknown_field::<Self>(field))).boxed()
    }
}

impl Node for Assignment {
    const TYPE: &'static str = "Assignment";

    fn resolve<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        field: &'a str,
        _selection: &'a Selection,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        futures_util::future::ready(Err(unknown_field::<Self>(field))).boxed()
    }
}

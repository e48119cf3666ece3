//! The request body and the response envelope.
//!
//! ```json
//! { "operations": [
//!     { "name": "animals", "selection": { "photos": {} } },
//!     { "name": "animal", "alias": "rex", "args": { "id": "…" } }
//! ] }
//! ```

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shelter_core::{ApiError, ApiResult};
use tracing::debug;

use crate::context::RequestContext;
use crate::selection::Selection;
use crate::{mutation, query};

const MUTATIONS: &[&str] = &[
    "createAnimal",
    "updateAnimal",
    "deleteAnimal",
    "createUser",
    "login",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub selection: Value,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: Map::new(),
            selection: Value::Null,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }

    pub fn select(mut self, selection: Value) -> Self {
        self.selection = selection;
        self
    }

    /// Key of this operation's result under `data`.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_mutation(&self) -> bool {
        MUTATIONS.contains(&self.name.as_str())
    }
}

impl Document {
    pub fn new(operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }
}

/// `errors` is left out when every operation succeeded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

/// Run every operation of `document` against one request context.
///
/// Queries run concurrently and share the context's loaders. A document that
/// contains a mutation runs strictly in order so later operations observe
/// earlier writes.
pub async fn execute(ctx: &RequestContext, document: &Document) -> Response {
    let sequential = document.operations.iter().any(Operation::is_mutation);
    debug!(
        operations = document.operations.len(),
        sequential, "executing document"
    );

    let results = if sequential {
        let mut results = Vec::with_capacity(document.operations.len());
        for operation in &document.operations {
            results.push(run(ctx, operation).await);
        }
        results
    } else {
        join_all(document.operations.iter().map(|op| run(ctx, op))).await
    };

    let mut response = Response::default();
    for (operation, result) in document.operations.iter().zip(results) {
        let key = operation.response_key();
        match result {
            Ok(value) => {
                response.data.insert(key.to_string(), value);
            }
            Err(err) => {
                response.data.insert(key.to_string(), Value::Null);
                response.errors.push(err.to_graphql(Some(key)));
            }
        }
    }
    response
}

async fn run(ctx: &RequestContext, op: &Operation) -> ApiResult<Value> {
    let selection = Selection::parse(&op.selection)?;
    let sel = &selection;
    match op.name.as_str() {
        "animals" => query::animals(ctx, sel).await,
        "animal" => query::animal(ctx, &arg::<String>(op, "id")?, sel).await,
        "users" => query::users(ctx, sel).await,
        "user" => query::user(ctx, &arg::<String>(op, "id")?, sel).await,
        "volunteers" => query::volunteers(ctx, sel).await,
        "volunteer" => query::volunteer(ctx, &arg::<String>(op, "id")?, sel).await,
        "adoptions" => query::adoptions(ctx, sel).await,
        "adoption" => query::adoption(ctx, &arg::<String>(op, "id")?, sel).await,
        "me" => query::me(ctx, sel).await,
        "createAnimal" => mutation::create_animal(ctx, arg(op, "input")?, sel).await,
        "updateAnimal" => {
            let id: String = arg(op, "id")?;
            mutation::update_animal(ctx, &id, arg(op, "input")?, sel).await
        }
        "deleteAnimal" => mutation::delete_animal(ctx, &arg::<String>(op, "id")?).await,
        "createUser" => mutation::create_user(ctx, arg(op, "input")?, sel).await,
        "login" => {
            let email: String = arg(op, "email")?;
            let password: String = arg(op, "password")?;
            mutation::login(ctx, &email, &password, sel).await
        }
        other => Err(ApiError::bad_input(
            "name",
            format!("Unknown operation '{other}'"),
        )),
    }
}

fn arg<T: DeserializeOwned>(op: &Operation, name: &str) -> ApiResult<T> {
    let value = op.args.get(name).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|err| ApiError::bad_input(name, format!("Invalid argument '{name}': {err}")))
}

//! Request-scoped resolution for the shelter API.
//!
//! A [`RequestContext`] is built per request from the shared [`Services`]
//! and the authenticated caller. It owns a fresh [`LoaderRegistry`], so every
//! nested relation fetched while resolving a [`Document`] is batched and
//! cached for that request only.

pub mod context;
pub mod document;
pub mod loaders;
pub mod mutation;
pub mod node;
pub mod query;
pub mod selection;

pub use context::{LoaderConfig, RequestContext, Services};
pub use document::{execute, Document, Operation, Response};
pub use loaders::{LoaderRegistry, ManyBy, OneBy, Relation};
pub use node::{resolve_list, resolve_node, resolve_option, Node};
pub use selection::Selection;

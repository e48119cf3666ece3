//! Batched key loading.
//!
//! A [`Loader`] collects every `load(key)` issued while its current window is
//! open and resolves the whole window with a single call to its [`BatchFn`].
//! Resolved values are cached for the lifetime of the loader, so a loader is
//! meant to live for one unit of work (one request) and then be dropped.
//!
//! ```ignore
//! let photos = Loader::new("photos-by-animal", from_fn(|ids: Vec<String>| async move {
//!     let rows = store.photos_by_animal_ids(&ids).await?;
//!     Ok::<_, DataError>(align_many(&ids, group_by(rows, |p| p.animal_id.clone())))
//! }));
//! let for_a1 = photos.load("a1".to_string()).await?;
//! ```

mod batch;
mod error;
mod group;
mod loader;

pub use batch::{from_fn, BatchFn, FromFn};
pub use error::LoadError;
pub use group::{align_many, align_one, group_by, index_by};
pub use loader::{Loader, DEFAULT_YIELD_COUNT};

/// A stored record with a table name and a string id.
///
/// # Example
///
/// ```ignore
/// impl Entity for Photo {
///     fn table_name() -> &'static str { "photos" }
///     fn id(&self) -> &str { &self.id }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + 'static {
    fn table_name() -> &'static str;
    fn id(&self) -> &str;
}

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

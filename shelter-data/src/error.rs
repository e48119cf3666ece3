use shelter_core::ApiError;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// No row with this id exists.
    NotFound { entity: &'static str, id: String },
    /// A unique column already holds the value. `field` is the wire name.
    UniqueViolation { entity: &'static str, field: &'static str },
    /// Dependent rows reference the row being removed.
    ForeignKeyViolation {
        entity: &'static str,
        dependents: &'static str,
    },
    /// A backend failure.
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Backend` variant from any error type.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Backend(Box::new(err))
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DataError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound { entity, id } => write!(f, "Not found: {entity} {id}"),
            DataError::UniqueViolation { entity, field } => {
                write!(f, "Unique constraint failed on {entity}.{field}")
            }
            DataError::ForeignKeyViolation { entity, dependents } => {
                write!(f, "Foreign key constraint: {entity} is referenced by {dependents}")
            }
            DataError::Backend(err) => write!(f, "Storage error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Untranslated storage failures surface as internal errors. Mutations
/// translate the constraint variants into field-tagged errors themselves.
impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

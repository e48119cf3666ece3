use serde_json::Value;
use shelter_core::ApiError;

/// The nested fields requested below one node.
///
/// Scalars are always returned, so a selection only lists relations:
///
/// ```json
/// { "photos": {}, "adoptions": { "adopter": true } }
/// ```
///
/// `{}`, `true` and `null` all select a relation without going deeper.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    fields: Vec<(String, Selection)>,
}

impl Selection {
    pub fn parse(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Null | Value::Bool(true) => Ok(Self::default()),
            Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(name, sub)| Ok((name.clone(), Self::parse(sub)?)))
                    .collect::<Result<_, ApiError>>()?;
                Ok(Self { fields })
            }
            other => Err(ApiError::bad_input(
                "selection",
                format!("Invalid selection: expected an object, got {other}"),
            )),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.fields.iter().map(|(name, sub)| (name.as_str(), sub))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

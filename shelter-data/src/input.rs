use garde::Validate;
use serde::Deserialize;
use shelter_core::ApiError;
use shelter_security::Role;

use crate::model::{AnimalStatus, Gender, Species};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnimalInput {
    #[garde(skip)]
    pub name: String,
    #[garde(skip)]
    pub species: Species,
    #[garde(skip)]
    pub breed: String,
    #[garde(range(min = 0))]
    pub age: i32,
    #[garde(skip)]
    pub gender: Gender,
    #[garde(range(min = 0.0))]
    pub adoption_fee: f64,
    #[garde(skip)]
    pub microchip_id: Option<String>,
    #[garde(skip)]
    pub behavior_notes: Option<String>,
    #[garde(skip)]
    pub special_needs: Option<Vec<String>>,
}

/// Partial update: only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnimalInput {
    #[garde(skip)]
    pub name: Option<String>,
    #[garde(skip)]
    pub species: Option<Species>,
    #[garde(skip)]
    pub breed: Option<String>,
    #[garde(range(min = 0))]
    pub age: Option<i32>,
    #[garde(skip)]
    pub gender: Option<Gender>,
    #[garde(skip)]
    pub status: Option<AnimalStatus>,
    #[garde(range(min = 0.0))]
    pub adoption_fee: Option<f64>,
    #[garde(skip)]
    pub microchip_id: Option<String>,
    #[garde(skip)]
    pub behavior_notes: Option<String>,
    #[garde(skip)]
    pub special_needs: Option<Vec<String>>,
}

#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub password: String,
    #[garde(skip)]
    pub role: Role,
}

impl std::fmt::Debug for CreateUserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// A user row ready to be stored; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// First validation failure of an input, tagged with its wire field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub field: String,
    pub message: String,
}

impl InputError {
    fn from_report(report: &garde::Report) -> Self {
        match report.iter().next() {
            Some((path, error)) => {
                let path = path.to_string();
                let field = if path.is_empty() {
                    "input".to_string()
                } else {
                    camel_case(&path)
                };
                let message = format!("Invalid {field}: {}", error.message());
                InputError { field, message }
            }
            None => InputError {
                field: "input".to_string(),
                message: "Invalid input".to_string(),
            },
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InputError {}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::BadUserInput {
            message: err.message,
            field: err.field,
        }
    }
}

/// Validate any garde input, mapping the first failure to an [`InputError`].
pub fn check<T>(input: &T) -> Result<(), InputError>
where
    T: Validate,
    T::Context: Default,
{
    input
        .validate()
        .map_err(|report| InputError::from_report(&report))
}

/// `adoption_fee` -> `adoptionFee`, path segments kept.
fn camel_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper = false;
    for ch in path.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(age: i32, fee: f64) -> CreateAnimalInput {
        CreateAnimalInput {
            name: "Rex".into(),
            species: Species::Dog,
            breed: "Mixed".into(),
            age,
            gender: Gender::Male,
            adoption_fee: fee,
            microchip_id: None,
            behavior_notes: None,
            special_needs: None,
        }
    }

    #[test]
    fn zero_is_accepted() {
        assert!(check(&create(0, 0.0)).is_ok());
    }

    #[test]
    fn negative_age_is_tagged() {
        let err = check(&create(-1, 10.0)).unwrap_err();
        assert_eq!(err.field, "age");
    }

    #[test]
    fn negative_fee_is_tagged_in_camel_case() {
        let err = check(&create(2, -5.0)).unwrap_err();
        assert_eq!(err.field, "adoptionFee");
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(check(&UpdateAnimalInput::default()).is_ok());
        let err = check(&UpdateAnimalInput {
            age: Some(-1),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.field, "age");
    }

    #[test]
    fn email_must_be_valid() {
        let input = CreateUserInput {
            email: "not-an-email".into(),
            password: "pw".into(),
            role: Role::Adopter,
        };
        assert_eq!(check(&input).unwrap_err().field, "email");
    }

    #[test]
    fn wire_input_is_camel_case() {
        let input: UpdateAnimalInput =
            serde_json::from_value(serde_json::json!({ "adoptionFee": 12.5, "status": "ADOPTED" }))
                .unwrap();
        assert_eq!(input.adoption_fee, Some(12.5));
        assert_eq!(input.status, Some(AnimalStatus::Adopted));
        assert!(input.name.is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AdoptionStatus, PaymentStatus};
use crate::entity::{new_id, Entity};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adoption {
    pub id: String,
    pub animal_id: String,
    pub adopter_id: String,
    pub application_date: DateTime<Utc>,
    pub approval_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub status: AdoptionStatus,
    pub adoption_fee: f64,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Adoption {
    /// A pending application filed now.
    pub fn new(animal_id: impl Into<String>, adopter_id: impl Into<String>, adoption_fee: f64) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            animal_id: animal_id.into(),
            adopter_id: adopter_id.into(),
            application_date: now,
            approval_date: None,
            completion_date: None,
            status: AdoptionStatus::Pending,
            adoption_fee,
            payment_status: PaymentStatus::Pending,
            notes: None,
            follow_up_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Adoption {
    fn table_name() -> &'static str {
        "adoptions"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

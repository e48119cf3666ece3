use chrono::{DateTime, Utc};
use serde::Serialize;
use shelter_security::{Caller, Role};

use crate::entity::{new_id, Entity};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// The identity this account acts as once authenticated.
    pub fn as_caller(&self) -> Caller {
        Caller::new(self.id.clone(), self.email.clone(), self.role)
    }
}

impl Entity for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub skills: Vec<String>,
    pub availability: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Volunteer {
    pub fn new(
        user_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            address: None,
            emergency_contact: None,
            skills: Vec::new(),
            availability: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Volunteer {
    fn table_name() -> &'static str {
        "volunteers"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerHour {
    pub id: String,
    pub volunteer_id: String,
    pub date: DateTime<Utc>,
    pub hours: f64,
    pub activity: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VolunteerHour {
    pub fn new(volunteer_id: impl Into<String>, hours: f64, activity: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            volunteer_id: volunteer_id.into(),
            date: now,
            hours,
            activity: activity.into(),
            notes: None,
            created_at: now,
        }
    }
}

impl Entity for VolunteerHour {
    fn table_name() -> &'static str {
        "volunteer_hours"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub volunteer_id: String,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    /// Minutes.
    pub duration: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(volunteer_id: impl Into<String>, title: impl Into<String>, duration: i32) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            volunteer_id: volunteer_id.into(),
            title: title.into(),
            description: None,
            scheduled_date: now,
            duration,
            status: "SCHEDULED".to_string(),
            created_at: now,
        }
    }
}

impl Entity for Assignment {
    fn table_name() -> &'static str {
        "assignments"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

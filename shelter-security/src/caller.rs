use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Identity of the authenticated caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn owns(&self, owner_id: &str) -> bool {
        self.id == owner_id
    }
}

/// Anything that can answer "who is calling", possibly nobody.
pub trait HasCaller {
    fn caller(&self) -> Option<&Caller>;
}

impl HasCaller for Option<Caller> {
    fn caller(&self) -> Option<&Caller> {
        self.as_ref()
    }
}

impl HasCaller for Caller {
    fn caller(&self) -> Option<&Caller> {
        Some(self)
    }
}

impl<T: HasCaller + ?Sized> HasCaller for &T {
    fn caller(&self) -> Option<&Caller> {
        (**self).caller()
    }
}

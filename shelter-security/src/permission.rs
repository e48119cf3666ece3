use crate::role::Role;

const ADMIN_AND_STAFF: &[Role] = &[Role::Admin, Role::Staff];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Named capability checked by the evaluator in [`crate::guards`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    AnimalsRead,
    AnimalsWrite,
    AnimalsDelete,
    UsersRead,
    UsersWrite,
    UsersDelete,
    VolunteersRead,
    VolunteersWrite,
    AdoptionsRead,
    AdoptionsWrite,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::AnimalsRead,
        Permission::AnimalsWrite,
        Permission::AnimalsDelete,
        Permission::UsersRead,
        Permission::UsersWrite,
        Permission::UsersDelete,
        Permission::VolunteersRead,
        Permission::VolunteersWrite,
        Permission::AdoptionsRead,
        Permission::AdoptionsWrite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::AnimalsRead => "animals:read",
            Permission::AnimalsWrite => "animals:write",
            Permission::AnimalsDelete => "animals:delete",
            Permission::UsersRead => "users:read",
            Permission::UsersWrite => "users:write",
            Permission::UsersDelete => "users:delete",
            Permission::VolunteersRead => "volunteers:read",
            Permission::VolunteersWrite => "volunteers:write",
            Permission::AdoptionsRead => "adoptions:read",
            Permission::AdoptionsWrite => "adoptions:write",
        }
    }

    /// Roles granted this permission. The table is fixed at compile time.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Permission::AnimalsDelete | Permission::UsersWrite | Permission::UsersDelete => {
                ADMIN_ONLY
            }
            Permission::AnimalsRead
            | Permission::AnimalsWrite
            | Permission::UsersRead
            | Permission::VolunteersRead
            | Permission::VolunteersWrite
            | Permission::AdoptionsRead
            | Permission::AdoptionsWrite => ADMIN_AND_STAFF,
        }
    }

    pub fn allows(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission: {s}"))
    }
}

/// The full permission → roles table.
pub fn permission_table() -> impl Iterator<Item = (Permission, &'static [Role])> {
    Permission::ALL.into_iter().map(|p| (p, p.allowed_roles()))
}

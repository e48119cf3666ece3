//! Permission evaluation.
//!
//! The `require_*` checks return the authenticated [`Caller`] on success so
//! handlers can continue with it; the `has_*` checks never fail and are
//! `false` for anonymous callers.

use tracing::warn;

use crate::caller::{Caller, HasCaller};
use crate::error::AuthError;
use crate::permission::Permission;
use crate::role::Role;

pub fn require_authenticated<C: HasCaller + ?Sized>(ctx: &C) -> Result<&Caller, AuthError> {
    ctx.caller().ok_or(AuthError::Unauthenticated)
}

pub fn require_role<C: HasCaller + ?Sized>(ctx: &C, role: Role) -> Result<&Caller, AuthError> {
    let caller = require_authenticated(ctx)?;
    if caller.role != role {
        warn!(caller = %caller.id, required = %role, actual = %caller.role, "role check failed");
        return Err(AuthError::RoleRequired {
            required: role,
            actual: caller.role,
        });
    }
    Ok(caller)
}

pub fn require_permission<C: HasCaller + ?Sized>(
    ctx: &C,
    permission: Permission,
) -> Result<&Caller, AuthError> {
    let caller = require_authenticated(ctx)?;
    if !permission.allows(caller.role) {
        warn!(caller = %caller.id, %permission, role = %caller.role, "permission check failed");
        return Err(AuthError::PermissionDenied {
            permission,
            actual: caller.role,
        });
    }
    Ok(caller)
}

pub fn has_permission<C: HasCaller + ?Sized>(ctx: &C, permission: Permission) -> bool {
    ctx.caller().is_some_and(|c| permission.allows(c.role))
}

pub fn has_role<C: HasCaller + ?Sized>(ctx: &C, role: Role) -> bool {
    ctx.caller().is_some_and(|c| c.role == role)
}

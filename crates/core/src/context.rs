//! Explicit caller context.
//!
//! The source system held the signed-in user in a process-wide observer
//! singleton. Here the caller is a value: resolved once per request at the
//! API boundary and passed into every core operation, so the core stays
//! testable without a live identity provider.

use crate::{CoordResult, CoordinationError};
use aahara_types::Identity;
use records::Role;

/// The authenticated caller of a core operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Identity,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Identity, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Fails with [`CoordinationError::RoleMismatch`] unless the caller holds `expected`.
    pub fn require_role(&self, expected: Role) -> CoordResult<()> {
        if self.role == expected {
            Ok(())
        } else {
            Err(CoordinationError::RoleMismatch {
                expected,
                found: self.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_role_accepts_matching_role() {
        let ctx = AuthContext::new(Identity::parse("uid-d1").unwrap(), Role::Dietitian);
        assert!(ctx.require_role(Role::Dietitian).is_ok());
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let ctx = AuthContext::new(Identity::parse("uid-p1").unwrap(), Role::Patient);
        let err = ctx
            .require_role(Role::Dietitian)
            .expect_err("patient must not pass a dietitian gate");
        assert!(matches!(
            err,
            CoordinationError::RoleMismatch {
                expected: Role::Dietitian,
                found: Role::Patient
            }
        ));
    }
}

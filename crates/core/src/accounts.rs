//! Account registration and lookup.
//!
//! Identity issuance is external; this service only maintains the account
//! documents keyed by the externally-issued handle. Registration is
//! idempotent: re-registering an existing id returns the stored document
//! unchanged, so a client retrying after a network failure cannot reset
//! linkage state.

use crate::context::AuthContext;
use crate::error::{CoordResult, CoordinationError};
use crate::store::AccountStore;
use aahara_types::{EmailAddress, Identity, NonEmptyText};
use chrono::Utc;
use records::{Role, UserAccount};
use serde::Serialize;
use std::sync::Arc;

/// Public dietitian view shown to patients before assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DietitianCard {
    pub id: Identity,
    pub name: NonEmptyText,
    pub email: EmailAddress,
}

/// Account operations over the injected account store.
pub struct AccountService {
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore + Send + Sync>) -> Self {
        Self { accounts }
    }

    /// Registers an account for an externally-issued identity.
    ///
    /// Dietitians start with an empty roster, patients unassigned. If the
    /// account already exists it is returned as stored; the submitted name,
    /// email and role are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the account document cannot be read or written.
    pub fn register(
        &self,
        id: Identity,
        name: NonEmptyText,
        email: EmailAddress,
        role: Role,
    ) -> CoordResult<UserAccount> {
        if let Some(existing) = self.accounts.get(&id)? {
            return Ok(existing);
        }

        let account = UserAccount::register(id, name, email, role, Utc::now());
        self.accounts.put(&account)?;
        Ok(account)
    }

    /// Fetches the account for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::AccountNotFound`] if no account exists.
    pub fn fetch(&self, id: &Identity) -> CoordResult<UserAccount> {
        self.accounts
            .get(id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(id.clone()))
    }

    /// The public card for a dietitian account.
    ///
    /// Absent unless the account exists and its role is dietitian; linkage
    /// state is never exposed through this view.
    pub fn dietitian_card(&self, id: &Identity) -> CoordResult<Option<DietitianCard>> {
        let Some(account) = self.accounts.get(id)? else {
            return Ok(None);
        };
        if account.role != Role::Dietitian {
            return Ok(None);
        }
        Ok(Some(DietitianCard {
            id: account.id,
            name: account.name,
            email: account.email,
        }))
    }

    /// All patient accounts, for the dietitian/admin browse view.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RoleMismatch`] when the caller is a
    /// patient.
    pub fn list_patients(&self, ctx: &AuthContext) -> CoordResult<Vec<UserAccount>> {
        if ctx.role == Role::Patient {
            return Err(CoordinationError::RoleMismatch {
                expected: Role::Dietitian,
                found: ctx.role,
            });
        }
        self.accounts.list_by_role(Role::Patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::store::file::FileDocumentStore;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> AccountService {
        let cfg = CoreConfig::new(
            dir.path().to_path_buf(),
            "http://localhost:8001".to_string(),
        )
        .expect("valid config");
        AccountService::new(Arc::new(FileDocumentStore::new(&cfg)))
    }

    fn register(service: &AccountService, id: &str, name: &str, role: Role) -> UserAccount {
        service
            .register(
                Identity::parse(id).unwrap(),
                NonEmptyText::new(name).unwrap(),
                EmailAddress::parse(&format!("{id}@example.com")).unwrap(),
                role,
            )
            .expect("register account")
    }

    #[test]
    fn register_initialises_role_specific_fields() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);

        let dietitian = register(&service, "uid-d1", "Asha Nair", Role::Dietitian);
        assert!(dietitian.linked_patient_ids.is_empty());

        let patient = register(&service, "uid-p1", "Ravi Kumar", Role::Patient);
        assert!(patient.linked_dietitian_id.is_none());
    }

    #[test]
    fn re_registration_returns_the_stored_account_unchanged() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);

        let first = register(&service, "uid-p1", "Ravi Kumar", Role::Patient);
        let second = service
            .register(
                Identity::parse("uid-p1").unwrap(),
                NonEmptyText::new("Somebody Else").unwrap(),
                EmailAddress::parse("else@example.com").unwrap(),
                Role::Dietitian,
            )
            .expect("re-register");

        assert_eq!(second, first, "submitted fields must be ignored");
    }

    #[test]
    fn fetch_of_unknown_id_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);

        let err = service
            .fetch(&Identity::parse("uid-missing").unwrap())
            .expect_err("unknown account");
        assert!(matches!(err, CoordinationError::AccountNotFound(_)));
    }

    #[test]
    fn dietitian_card_is_absent_for_other_roles() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        register(&service, "uid-d1", "Asha Nair", Role::Dietitian);
        register(&service, "uid-p1", "Ravi Kumar", Role::Patient);

        let card = service
            .dietitian_card(&Identity::parse("uid-d1").unwrap())
            .expect("card lookup")
            .expect("dietitian has a card");
        assert_eq!(card.name.as_str(), "Asha Nair");

        assert!(service
            .dietitian_card(&Identity::parse("uid-p1").unwrap())
            .expect("card lookup")
            .is_none());
        assert!(service
            .dietitian_card(&Identity::parse("uid-missing").unwrap())
            .expect("card lookup")
            .is_none());
    }

    #[test]
    fn list_patients_is_gated_by_role() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        register(&service, "uid-d1", "Asha Nair", Role::Dietitian);
        register(&service, "uid-p1", "Ravi Kumar", Role::Patient);
        register(&service, "uid-p2", "Sita Devi", Role::Patient);

        let ctx = AuthContext::new(Identity::parse("uid-d1").unwrap(), Role::Dietitian);
        let patients = service.list_patients(&ctx).expect("list patients");
        assert_eq!(patients.len(), 2);

        let patient_ctx = AuthContext::new(Identity::parse("uid-p1").unwrap(), Role::Patient);
        let err = service
            .list_patients(&patient_ctx)
            .expect_err("patients cannot browse");
        assert!(matches!(err, CoordinationError::RoleMismatch { .. }));
    }
}

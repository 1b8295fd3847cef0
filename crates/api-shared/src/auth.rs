//! Identity resolution for API handlers.
//!
//! Identity issuance lives in an external provider; requests arrive carrying
//! the issued handle in a header. Each handler resolves that handle against
//! the account store once and passes the resulting [`AuthContext`] into
//! core operations. There is no session state on this side.

use aahara_core::{AccountService, AuthContext, CoordResult, CoordinationError, Identity};

/// Header carrying the externally-issued identity handle.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the identity header value into an authenticated context.
///
/// # Errors
///
/// - [`CoordinationError::InvalidInput`] when the header is missing or not a
///   usable identity handle.
/// - [`CoordinationError::AccountNotFound`] when no account exists for the
///   handle.
pub fn resolve_identity(
    header: Option<&str>,
    accounts: &AccountService,
) -> CoordResult<AuthContext> {
    let raw = header.ok_or_else(|| {
        CoordinationError::InvalidInput(format!("missing {USER_ID_HEADER} header"))
    })?;
    let user_id = Identity::parse(raw)
        .map_err(|e| CoordinationError::InvalidInput(format!("bad {USER_ID_HEADER} header: {e}")))?;

    let account = accounts.fetch(&user_id)?;
    Ok(AuthContext::new(account.id, account.role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aahara_core::{shared_store, CoreConfig};
    use aahara_types::{EmailAddress, NonEmptyText};
    use records::Role;
    use tempfile::TempDir;

    fn accounts(dir: &TempDir) -> AccountService {
        let cfg = CoreConfig::new(
            dir.path().to_path_buf(),
            "http://localhost:8001".to_string(),
        )
        .expect("valid config");
        AccountService::new(shared_store(&cfg))
    }

    #[test]
    fn header_resolves_to_the_stored_role() {
        let dir = TempDir::new().expect("tempdir");
        let accounts = accounts(&dir);
        accounts
            .register(
                Identity::parse("uid-d1").unwrap(),
                NonEmptyText::new("Asha Nair").unwrap(),
                EmailAddress::parse("asha@example.com").unwrap(),
                Role::Dietitian,
            )
            .expect("register");

        let ctx = resolve_identity(Some("uid-d1"), &accounts).expect("resolve");
        assert_eq!(ctx.role, Role::Dietitian);
        assert_eq!(ctx.user_id, Identity::parse("uid-d1").unwrap());
    }

    #[test]
    fn missing_header_is_invalid_input() {
        let dir = TempDir::new().expect("tempdir");
        let err = resolve_identity(None, &accounts(&dir)).expect_err("no header");
        assert!(matches!(err, CoordinationError::InvalidInput(_)));
    }

    #[test]
    fn unknown_identity_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let err = resolve_identity(Some("uid-ghost"), &accounts(&dir)).expect_err("no account");
        assert!(matches!(err, CoordinationError::AccountNotFound(_)));
    }
}

use folio_core::AccountId;

/// Authenticated caller of a protected route.
///
/// Inserted by the auth gate. Handlers only log it: every record is
/// attributed to the configured owner account, not to the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthContext {
    account_id: AccountId,
}

impl AuthContext {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}

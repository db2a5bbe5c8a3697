use std::future::Future;

use crate::auth::{Role, User};

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Stored staff credential. The hash is PBKDF2-HMAC-SHA256 over the password
/// with a per-account salt, both base64 encoded.
#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub id: i64,
    pub user: User,
    pub(crate) salt: String,
    pub(crate) hash: String,
    pub(crate) iterations: u32,
}

pub trait AccountRepository {
    fn add_account(&self, account: &NewAccount) -> impl Future<Output = anyhow::Result<User>>;
    fn get_account(
        &self,
        username: &str,
    ) -> impl Future<Output = anyhow::Result<Option<StaffAccount>>>;
    fn get_accounts(&self) -> impl Future<Output = anyhow::Result<Vec<User>>>;
}

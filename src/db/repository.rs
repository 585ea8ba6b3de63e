//! Account repository for openlms.
//!
//! The credential-store boundary: the rest of the crate reaches accounts
//! only through these operations. Email uniqueness is enforced here by the
//! store (UNIQUE, case-insensitive).

use sqlx::SqlitePool;

use super::account::{Account, NewAccount, Role};
use crate::{LmsError, Result};

const ACCOUNT_COLUMNS: &str = "id, full_name, email, password_hash, role, \
     reset_token_hash, reset_token_expiry, created_at, updated_at";

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new repository over the given pool.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Returns the created account with the assigned ID. A duplicate email
    /// surfaces as a database error containing "UNIQUE".
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            "INSERT INTO accounts (full_name, email, password_hash, role)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&new_account.full_name)
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(new_account.role.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| LmsError::NotFound("account".to_string()))
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Replace the stored password hash.
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query(
            "UPDATE accounts SET password_hash = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;
        Ok(())
    }

    /// Change an account's role.
    pub async fn update_role(&self, id: i64, role: Role) -> Result<()> {
        sqlx::query("UPDATE accounts SET role = ?, updated_at = datetime('now') WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;
        Ok(())
    }

    /// Persist a reset-token digest and expiry on an account.
    ///
    /// Overwrites any prior values, so at most one reset token is
    /// outstanding per account; a previously issued token stops matching.
    pub async fn set_reset_token(&self, id: i64, digest: &str, expires_at: &str) -> Result<()> {
        sqlx::query(
            "UPDATE accounts
             SET reset_token_hash = ?, reset_token_expiry = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(digest)
        .bind(expires_at)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;
        Ok(())
    }

    /// Clear the reset fields without touching the password.
    ///
    /// Compensating action for when delivery of the plaintext token fails
    /// after generation; both fields are cleared together.
    pub async fn clear_reset_token(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE accounts
             SET reset_token_hash = NULL, reset_token_expiry = NULL, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find the account holding the given reset digest with an expiry
    /// strictly in the future.
    pub async fn find_by_valid_reset_hash(&self, digest: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE reset_token_hash = ? AND reset_token_expiry > datetime('now')"
        ))
        .bind(digest)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Complete a password reset: set the new hash and clear both reset
    /// fields in one conditional statement.
    ///
    /// The WHERE clause re-checks the digest and expiry so that a token is
    /// redeemable at most once even under concurrent requests. Returns
    /// whether a row was updated.
    pub async fn complete_reset(
        &self,
        id: i64,
        digest: &str,
        new_password_hash: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE accounts
             SET password_hash = ?,
                 reset_token_hash = NULL,
                 reset_token_expiry = NULL,
                 updated_at = datetime('now')
             WHERE id = ?
               AND reset_token_hash = ?
               AND reset_token_expiry > datetime('now')",
        )
        .bind(new_password_hash)
        .bind(id)
        .bind(digest)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn create_account(db: &Database, email: &str) -> Account {
        let repo = AccountRepository::new(db.pool());
        repo.create(&NewAccount::new("Jane Doe", email, "argon2hash"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        assert_eq!(account.full_name, "Jane Doe");
        assert_eq!(account.role, Role::User);
        assert!(account.reset_token_hash.is_none());
        assert!(account.reset_token_expiry.is_none());

        let by_id = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "jane@x.com");

        let by_email = repo.find_by_email("jane@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        create_account(&db, "jane@x.com").await;
        let found = repo.find_by_email("JANE@X.COM").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        create_account(&db, "jane@x.com").await;
        let result = repo
            .create(&NewAccount::new("Other", "Jane@X.com", "hash2"))
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("UNIQUE"));
    }

    #[tokio::test]
    async fn test_update_password() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.update_password(account.id, "newhash").await.unwrap();

        let updated = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "newhash");
    }

    #[tokio::test]
    async fn test_update_role() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.update_role(account.id, Role::Admin).await.unwrap();

        let updated = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_set_and_clear_reset_token() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "digest", "2099-12-31 23:59:59")
            .await
            .unwrap();

        let with_token = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(with_token.reset_token_hash.as_deref(), Some("digest"));
        assert!(with_token.reset_token_expiry.is_some());

        repo.clear_reset_token(account.id).await.unwrap();
        let cleared = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert!(cleared.reset_token_hash.is_none());
        assert!(cleared.reset_token_expiry.is_none());
    }

    #[tokio::test]
    async fn test_find_by_valid_reset_hash() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "digest", "2099-12-31 23:59:59")
            .await
            .unwrap();

        let found = repo.find_by_valid_reset_hash("digest").await.unwrap();
        assert!(found.is_some());

        let wrong = repo.find_by_valid_reset_hash("other").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_expired_reset_hash_not_found() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "digest", "2000-01-01 00:00:00")
            .await
            .unwrap();

        let found = repo.find_by_valid_reset_hash("digest").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_complete_reset_single_use() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "digest", "2099-12-31 23:59:59")
            .await
            .unwrap();

        // First redemption succeeds
        let first = repo
            .complete_reset(account.id, "digest", "newhash")
            .await
            .unwrap();
        assert!(first);

        let updated = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "newhash");
        assert!(updated.reset_token_hash.is_none());
        assert!(updated.reset_token_expiry.is_none());

        // Second redemption with the same digest fails
        let second = repo
            .complete_reset(account.id, "digest", "otherhash")
            .await
            .unwrap();
        assert!(!second);
    }

    #[tokio::test]
    async fn test_complete_reset_expired() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "digest", "2000-01-01 00:00:00")
            .await
            .unwrap();

        let redeemed = repo
            .complete_reset(account.id, "digest", "newhash")
            .await
            .unwrap();
        assert!(!redeemed);

        // Password untouched
        let account = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(account.password_hash, "argon2hash");
    }

    #[tokio::test]
    async fn test_new_reset_token_invalidates_previous() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(&db, "jane@x.com").await;
        repo.set_reset_token(account.id, "first", "2099-12-31 23:59:59")
            .await
            .unwrap();
        repo.set_reset_token(account.id, "second", "2099-12-31 23:59:59")
            .await
            .unwrap();

        assert!(repo
            .find_by_valid_reset_hash("first")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_valid_reset_hash("second")
            .await
            .unwrap()
            .is_some());
    }
}

//! Implements a struct that holds the state of the REST server.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use tokio::sync::Mutex as AsyncMutex;

use crate::{
    Error,
    db::initialize,
    models::UserID,
    stores::sqlite::{SQLiteSavingsGoalStore, SQLiteTransactionStore, SQLiteUserStore},
};

#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    jwt_keys: JwtKeys,
    /// The store for managing [users](crate::models::User).
    pub user_store: SQLiteUserStore,
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: SQLiteTransactionStore,
    /// The store for managing user [savings goals](crate::models::SavingsGoal).
    pub savings_goal_store: SQLiteSavingsGoalStore,
    /// Per-user mutual exclusion for the savings goal add/remove operations.
    pub user_locks: UserLocks,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_ref()),
            },
            user_store: SQLiteUserStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection.clone()),
            savings_goal_store: SQLiteSavingsGoalStore::new(connection),
            user_locks: UserLocks::default(),
        })
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}

/// Hands out one async mutex per user ID.
///
/// The savings goal add/remove handlers hold the caller's lock across
/// read-balance, validate, and write, so two requests from the same user
/// cannot both pass validation against the same balance. Requests from
/// different users take different locks and proceed in parallel.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<UserID, Arc<AsyncMutex<()>>>>>,
}

impl UserLocks {
    /// The lock for `user_id`, created on first use.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn for_user(&self, user_id: UserID) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap();

        Arc::clone(locks.entry(user_id).or_default())
    }
}

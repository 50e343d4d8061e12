//! Implements a SQLite backed savings goal store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, SavingsGoal, UserID},
    stores::SavingsGoalStore,
};

use super::parse_decimal_column;

/// Stores savings goals in a SQLite database.
///
/// Note that because a savings goal belongs to a
/// [User](crate::models::User), the user table must be set up in the
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteSavingsGoalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSavingsGoalStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl SavingsGoalStore for SQLiteSavingsGoalStore {
    /// Create a new savings goal in the database with a current amount of zero.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn create(
        &mut self,
        user_id: UserID,
        name: &str,
        goal_amount: Decimal,
    ) -> Result<SavingsGoal, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO savings_goal (user_id, name, goal_amount, current_amount)
             VALUES (?1, ?2, ?3, ?4)",
            (
                user_id.as_i64(),
                name,
                goal_amount.to_string(),
                Decimal::ZERO.to_string(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(SavingsGoal {
            id,
            user_id,
            name: name.to_string(),
            goal_amount,
            current_amount: Decimal::ZERO,
        })
    }

    /// Retrieve a savings goal in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a savings goal owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<SavingsGoal, Error> {
        let goal = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, goal_amount, current_amount FROM savings_goal
                 WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        Ok(goal)
    }

    /// Retrieve all savings goals owned by `user_id`.
    ///
    /// An empty vector is returned if the specified user has no savings goals.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<SavingsGoal>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, goal_amount, current_amount FROM savings_goal
                 WHERE user_id = :user_id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_goal| maybe_goal.map_err(Error::SqlError))
            .collect()
    }

    /// Persist the current amount of an existing savings goal.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the goal is not in the database or not owned by `goal.user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn save(&mut self, goal: &SavingsGoal) -> Result<(), Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE savings_goal SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
            (
                goal.current_amount.to_string(),
                goal.id,
                goal.user_id.as_i64(),
            ),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete a savings goal owned by `user_id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a savings goal owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteSavingsGoalStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS savings_goal (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    goal_amount TEXT NOT NULL,
                    current_amount TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSavingsGoalStore {
    type ReturnType = SavingsGoal;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = UserID::new(row.get(offset + 1)?);
        let name = row.get(offset + 2)?;

        let raw_goal_amount: String = row.get(offset + 3)?;
        let goal_amount = parse_decimal_column(raw_goal_amount, offset + 3)?;

        let raw_current_amount: String = row.get(offset + 4)?;
        let current_amount = parse_decimal_column(raw_current_amount, offset + 4)?;

        Ok(SavingsGoal {
            id,
            user_id,
            name,
            goal_amount,
            current_amount,
        })
    }
}

#[cfg(test)]
mod savings_goal_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        db::initialize,
        models::{PasswordHash, User, UserID},
        stores::{SavingsGoalStore, UserStore},
    };

    use crate::stores::sqlite::SQLiteUserStore;

    use super::SQLiteSavingsGoalStore;

    fn get_store_and_user() -> (SQLiteSavingsGoalStore, User) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let connection = Arc::new(Mutex::new(conn));
        let mut user_store = SQLiteUserStore::new(connection.clone());

        let user = user_store
            .create(
                "Test",
                "test@test.com".parse().unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        (SQLiteSavingsGoalStore::new(connection), user)
    }

    #[test]
    fn create_starts_at_zero() {
        let (mut store, user) = get_store_and_user();

        let goal = store.create(user.id(), "Holiday", dec!(1500)).unwrap();

        assert!(goal.id > 0);
        assert_eq!(goal.name, "Holiday");
        assert_eq!(goal.goal_amount, dec!(1500));
        assert_eq!(goal.current_amount, dec!(0));
    }

    #[test]
    fn get_round_trips_decimal_amounts() {
        let (mut store, user) = get_store_and_user();

        let mut goal = store.create(user.id(), "Holiday", dec!(1500.50)).unwrap();
        goal.current_amount = dec!(0.10);
        store.save(&goal).unwrap();

        let retrieved = store.get(goal.id, user.id()).unwrap();

        assert_eq!(retrieved, goal);
    }

    #[test]
    fn get_fails_on_wrong_user() {
        let (mut store, user) = get_store_and_user();

        let goal = store.create(user.id(), "Holiday", dec!(1500)).unwrap();

        let other_user = UserID::new(user.id().as_i64() + 1);

        // The other user must not be able to tell that the goal exists.
        assert_eq!(store.get(goal.id, other_user), Err(Error::NotFound));
    }

    #[test]
    fn get_by_user_returns_only_own_goals() {
        let (mut store, user) = get_store_and_user();

        store.create(user.id(), "Holiday", dec!(1500)).unwrap();
        store.create(user.id(), "New laptop", dec!(2000)).unwrap();

        let goals = store.get_by_user(user.id()).unwrap();
        assert_eq!(goals.len(), 2);

        let other_user = UserID::new(user.id().as_i64() + 1);
        assert!(store.get_by_user(other_user).unwrap().is_empty());
    }

    #[test]
    fn save_fails_on_wrong_user() {
        let (mut store, user) = get_store_and_user();

        let mut goal = store.create(user.id(), "Holiday", dec!(1500)).unwrap();
        goal.user_id = UserID::new(user.id().as_i64() + 1);
        goal.current_amount = dec!(100);

        assert_eq!(store.save(&goal), Err(Error::NotFound));

        // The stored goal must be untouched.
        let stored = store.get(goal.id, user.id()).unwrap();
        assert_eq!(stored.current_amount, dec!(0));
    }

    #[test]
    fn delete_succeeds() {
        let (mut store, user) = get_store_and_user();

        let goal = store.create(user.id(), "Holiday", dec!(1500)).unwrap();

        store.delete(goal.id, user.id()).unwrap();

        assert_eq!(store.get(goal.id, user.id()), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_wrong_user() {
        let (mut store, user) = get_store_and_user();

        let goal = store.create(user.id(), "Holiday", dec!(1500)).unwrap();

        let other_user = UserID::new(user.id().as_i64() + 1);

        assert_eq!(store.delete(goal.id, other_user), Err(Error::NotFound));
    }
}

//! Defines the savings goal store trait.

use rust_decimal::Decimal;

use crate::{
    Error,
    models::{DatabaseID, SavingsGoal, UserID},
};

/// Handles the creation and retrieval of savings goals.
///
/// Every operation is scoped to the owning user: an ID that exists but
/// belongs to another user behaves exactly like an ID that does not exist.
///
/// Implementers persist state only; the balance and withdrawal checks live
/// in [crate::savings], which is the sole caller of [SavingsGoalStore::save].
pub trait SavingsGoalStore {
    /// Create a new savings goal with a current amount of zero.
    fn create(
        &mut self,
        user_id: UserID,
        name: &str,
        goal_amount: Decimal,
    ) -> Result<SavingsGoal, Error>;

    /// Retrieve a savings goal owned by `user_id` from the store.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a savings goal
    /// owned by `user_id`.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<SavingsGoal, Error>;

    /// Retrieve all savings goals owned by `user_id`.
    ///
    /// An empty vector is returned if the specified user has no savings goals.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<SavingsGoal>, Error>;

    /// Persist the current amount of an existing savings goal.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if the goal is not in the store or not
    /// owned by `goal.user_id`.
    fn save(&mut self, goal: &SavingsGoal) -> Result<(), Error>;

    /// Delete a savings goal owned by `user_id` from the store.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a savings goal
    /// owned by `user_id`.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;
}

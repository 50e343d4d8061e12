//! This file defines the type `Transaction`, an income or expense recorded
//! in a user's ledger, and the builder used to create one.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The maximum number of characters allowed in a transaction comment.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Whether a transaction adds money to or removes money from a user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. a grocery shop.
    Expense,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// The error returned when parsing a string that names neither transaction kind.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("\"{0}\" is not a valid transaction kind, expected \"income\" or \"expense\"")]
pub struct ParseTransactionKindError(String);

impl FromStr for TransactionKind {
    type Err = ParseTransactionKindError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ParseTransactionKindError(other.to_string())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned. Always zero or positive; the
    /// direction is carried by `kind`.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// An optional note describing what the transaction was for.
    pub comment: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    ///
    /// # Errors
    /// Returns an [Error::NegativeAmount] if `amount` is negative.
    pub fn build(
        amount: Decimal,
        date: Date,
        kind: TransactionKind,
        user_id: UserID,
    ) -> Result<TransactionBuilder, Error> {
        TransactionBuilder::new(amount, date, kind, user_id)
    }
}

/// Builder for creating a new [Transaction].
///
/// The builder is finalized by inserting it into a
/// [TransactionStore](crate::stores::TransactionStore), which assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// An optional note describing what the transaction was for.
    pub comment: String,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
}

impl TransactionBuilder {
    /// Create a new transaction builder.
    ///
    /// # Errors
    /// Returns an [Error::NegativeAmount] if `amount` is negative.
    pub fn new(
        amount: Decimal,
        date: Date,
        kind: TransactionKind,
        user_id: UserID,
    ) -> Result<Self, Error> {
        if amount < Decimal::ZERO {
            return Err(Error::NegativeAmount);
        }

        Ok(Self {
            amount,
            date,
            kind,
            comment: String::new(),
            user_id,
        })
    }

    /// Set the comment for the transaction.
    ///
    /// # Errors
    /// Returns an [Error::CommentTooLong] if `comment` is longer than
    /// [MAX_COMMENT_LENGTH] characters.
    pub fn comment(mut self, comment: String) -> Result<Self, Error> {
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(Error::CommentTooLong);
        }

        self.comment = comment;
        Ok(self)
    }
}

#[cfg(test)]
mod transaction_kind_tests {
    use std::str::FromStr;

    use super::TransactionKind;

    #[test]
    fn round_trips_through_strings() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(TransactionKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let serialized = serde_json::to_string(&TransactionKind::Expense).unwrap();

        assert_eq!(serialized, "\"expense\"");
    }
}

#[cfg(test)]
mod transaction_builder_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        models::{MAX_COMMENT_LENGTH, UserID},
    };

    use super::{Transaction, TransactionKind};

    #[test]
    fn build_fails_on_negative_amount() {
        let result = Transaction::build(
            dec!(-12.30),
            date!(2026 - 01 - 15),
            TransactionKind::Expense,
            UserID::new(1),
        );

        assert_eq!(result, Err(Error::NegativeAmount));
    }

    #[test]
    fn build_succeeds_on_zero_amount() {
        let result = Transaction::build(
            dec!(0),
            date!(2026 - 01 - 15),
            TransactionKind::Income,
            UserID::new(1),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn comment_fails_when_too_long() {
        let long_comment = "x".repeat(MAX_COMMENT_LENGTH + 1);

        let result = Transaction::build(
            dec!(12.30),
            date!(2026 - 01 - 15),
            TransactionKind::Expense,
            UserID::new(1),
        )
        .unwrap()
        .comment(long_comment);

        assert_eq!(result, Err(Error::CommentTooLong));
    }

    #[test]
    fn comment_accepts_maximum_length() {
        let comment = "x".repeat(MAX_COMMENT_LENGTH);

        let result = Transaction::build(
            dec!(12.30),
            date!(2026 - 01 - 15),
            TransactionKind::Expense,
            UserID::new(1),
        )
        .unwrap()
        .comment(comment);

        assert!(result.is_ok());
    }
}

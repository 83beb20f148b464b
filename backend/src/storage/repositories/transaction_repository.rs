use anyhow::Result;
use sqlx::Row;

use crate::domain::models::transaction::{Transaction, TransactionKind};
use crate::storage::db::DbConnection;

/// Repository for deposit/withdrawal rows.
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a transaction in the database
    pub async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, date, description, amount, balance)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.date)
        .bind(&transaction.description)
        .bind(transaction.amount)
        .bind(transaction.balance)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get the most recent transaction for a user (for computing the next
    /// running balance).
    pub async fn get_latest_transaction(&self, user_id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, date, description, amount, balance
            FROM transactions
            WHERE user_id = ?
            ORDER BY ROWID DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(row_to_transaction))
    }

    /// List a user's transactions newest-first with cursor pagination.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: u32,
        after_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let query = if let Some(after_id) = after_id {
            sqlx::query(
                r#"
                SELECT id, user_id, date, description, amount, balance
                FROM transactions
                WHERE user_id = ?
                  AND ROWID < (SELECT ROWID FROM transactions WHERE id = ?)
                ORDER BY ROWID DESC
                LIMIT ?
                "#,
            )
            .bind(user_id)
            .bind(after_id)
            .bind(limit as i64)
        } else {
            sqlx::query(
                r#"
                SELECT id, user_id, date, description, amount, balance
                FROM transactions
                WHERE user_id = ?
                ORDER BY ROWID DESC
                LIMIT ?
                "#,
            )
            .bind(user_id)
            .bind(limit as i64)
        };

        let rows = query.fetch_all(self.db.pool()).await?;

        Ok(rows.into_iter().map(row_to_transaction).collect())
    }
}

fn row_to_transaction(row: sqlx::sqlite::SqliteRow) -> Transaction {
    let amount: f64 = row.get("amount");
    Transaction {
        id: row.get("id"),
        user_id: row.get("user_id"),
        date: row.get("date"),
        description: row.get("description"),
        amount,
        balance: row.get("balance"),
        kind: if amount >= 0.0 {
            TransactionKind::Deposit
        } else {
            TransactionKind::Withdrawal
        },
    }
}

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;

use crate::domain::commands::transactions::{
    CreateTransactionCommand, PaginationInfo, TransactionListQuery, TransactionListResult,
};
use crate::domain::models::transaction::{Transaction, TransactionKind};
use crate::storage::{DbConnection, TransactionRepository};

const MAX_DESCRIPTION_LEN: usize = 256;
const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 200;

/// Service for deposits, withdrawals and the running balance.
#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
}

impl TransactionService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repo: TransactionRepository::new(db),
        }
    }

    pub async fn record_deposit(&self, command: CreateTransactionCommand) -> Result<Transaction> {
        self.record(command, TransactionKind::Deposit).await
    }

    pub async fn record_withdrawal(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<Transaction> {
        self.record(command, TransactionKind::Withdrawal).await
    }

    async fn record(
        &self,
        command: CreateTransactionCommand,
        kind: TransactionKind,
    ) -> Result<Transaction> {
        let description = command.description.trim();
        if description.is_empty() {
            return Err(anyhow!("Description cannot be empty"));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(anyhow!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            ));
        }
        if !command.amount.is_finite() || command.amount <= 0.0 {
            return Err(anyhow!("Amount must be a positive number"));
        }

        let now = Utc::now();
        let date = command.date.unwrap_or_else(|| now.to_rfc3339());

        let signed_amount = match kind {
            TransactionKind::Deposit => command.amount,
            TransactionKind::Withdrawal => -command.amount,
        };

        let current_balance = self
            .repo
            .get_latest_transaction(&command.user_id)
            .await?
            .map(|t| t.balance)
            .unwrap_or(0.0);

        let transaction = Transaction {
            id: Transaction::generate_id(kind, now.timestamp_millis()),
            user_id: command.user_id,
            date,
            description: description.to_string(),
            amount: signed_amount,
            balance: current_balance + signed_amount,
            kind,
        };

        self.repo.store_transaction(&transaction).await?;
        info!(
            "Recorded {} of {} for user {} (balance {})",
            kind.as_str(),
            command.amount,
            transaction.user_id,
            transaction.balance
        );

        Ok(transaction)
    }

    /// List a user's transactions newest-first with cursor pagination.
    pub async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResult> {
        // Clamping also keeps the look-ahead `limit + 1` from overflowing
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        // Fetch one extra row to learn whether another page exists
        let mut transactions = self
            .repo
            .list_transactions(&query.user_id, limit + 1, query.after.as_deref())
            .await?;

        let has_more = transactions.len() as u32 > limit;
        if has_more {
            transactions.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            transactions.last().map(|t| t.id.clone())
        } else {
            None
        };

        Ok(TransactionListResult {
            transactions,
            pagination: PaginationInfo {
                has_more,
                next_cursor,
            },
        })
    }

    /// Current balance, zero for a user with no transactions.
    pub async fn get_balance(&self, user_id: &str) -> Result<f64> {
        Ok(self
            .repo
            .get_latest_transaction(user_id)
            .await?
            .map(|t| t.balance)
            .unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> TransactionService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        TransactionService::new(db)
    }

    fn deposit(user_id: &str, description: &str, amount: f64) -> CreateTransactionCommand {
        CreateTransactionCommand {
            user_id: user_id.to_string(),
            description: description.to_string(),
            amount,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_balance_runs_through_deposits_and_withdrawals() {
        let service = setup_test().await;

        let t1 = service
            .record_deposit(deposit("user-1", "Pocket money", 20.0))
            .await
            .unwrap();
        assert_eq!(t1.amount, 20.0);
        assert_eq!(t1.balance, 20.0);
        assert_eq!(t1.kind, TransactionKind::Deposit);

        let t2 = service
            .record_withdrawal(deposit("user-1", "Comic book", 7.5))
            .await
            .unwrap();
        assert_eq!(t2.amount, -7.5);
        assert_eq!(t2.balance, 12.5);
        assert_eq!(t2.kind, TransactionKind::Withdrawal);

        assert_eq!(service.get_balance("user-1").await.unwrap(), 12.5);
        assert_eq!(service.get_balance("user-2").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_input() {
        let service = setup_test().await;

        assert!(service
            .record_deposit(deposit("user-1", "   ", 5.0))
            .await
            .is_err());
        assert!(service
            .record_deposit(deposit("user-1", "ok", 0.0))
            .await
            .is_err());
        assert!(service
            .record_deposit(deposit("user-1", "ok", -5.0))
            .await
            .is_err());
        assert!(service
            .record_deposit(deposit("user-1", &"x".repeat(257), 5.0))
            .await
            .is_err());

        // Nothing was written
        assert_eq!(service.get_balance("user-1").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let service = setup_test().await;

        for i in 0..5 {
            service
                .record_deposit(deposit("user-1", &format!("Deposit {}", i), 1.0))
                .await
                .unwrap();
        }

        let page = service
            .list_transactions(TransactionListQuery {
                user_id: "user-1".to_string(),
                after: None,
                limit: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(page.transactions.len(), 3);
        assert!(page.pagination.has_more);
        let cursor = page.pagination.next_cursor.clone().unwrap();
        assert_eq!(cursor, page.transactions[2].id);

        let rest = service
            .list_transactions(TransactionListQuery {
                user_id: "user-1".to_string(),
                after: Some(cursor),
                limit: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(rest.transactions.len(), 2);
        assert!(!rest.pagination.has_more);
        assert!(rest.pagination.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_oversized_limit_is_clamped() {
        let service = setup_test().await;

        for i in 0..3 {
            service
                .record_deposit(deposit("user-1", &format!("Deposit {}", i), 1.0))
                .await
                .unwrap();
        }

        let page = service
            .list_transactions(TransactionListQuery {
                user_id: "user-1".to_string(),
                after: None,
                limit: Some(u32::MAX),
            })
            .await
            .unwrap();
        assert_eq!(page.transactions.len(), 3);
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn test_rapid_transactions_get_unique_ids() {
        let service = setup_test().await;

        // Back-to-back writes can share a millisecond timestamp
        let t1 = service
            .record_deposit(deposit("user-1", "First", 1.0))
            .await
            .unwrap();
        let t2 = service
            .record_deposit(deposit("user-1", "Second", 1.0))
            .await
            .unwrap();

        assert_ne!(t1.id, t2.id);
        assert_eq!(service.get_balance("user-1").await.unwrap(), 2.0);
    }
}

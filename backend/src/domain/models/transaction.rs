/// Type of transaction for sign conventions and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

/// A single account movement. Amounts are signed: positive for deposits,
/// negative for withdrawals. `balance` is the running balance after this
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub balance: f64,
    pub kind: TransactionKind,
}

impl Transaction {
    /// ID format: "txn::<deposit|withdrawal>::<epoch_millis>::<uuid>".
    /// The uuid suffix keeps ids unique when transactions land in the same
    /// millisecond.
    pub fn generate_id(kind: TransactionKind, timestamp_millis: i64) -> String {
        format!(
            "txn::{}::{}::{}",
            kind.as_str(),
            timestamp_millis,
            uuid::Uuid::new_v4()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = Transaction::generate_id(TransactionKind::Deposit, 1234567890000);
        assert!(id.starts_with("txn::deposit::1234567890000::"));

        let id = Transaction::generate_id(TransactionKind::Withdrawal, 42);
        assert!(id.starts_with("txn::withdrawal::42::"));
    }

    #[test]
    fn test_ids_are_unique_within_a_millisecond() {
        let a = Transaction::generate_id(TransactionKind::Deposit, 42);
        let b = Transaction::generate_id(TransactionKind::Deposit, 42);
        assert_ne!(a, b);
    }
}

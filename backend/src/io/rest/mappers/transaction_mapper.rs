use shared::{Transaction as TransactionDto, TransactionListResponse, TransactionType};

use crate::domain::commands::transactions::TransactionListResult;
use crate::domain::models::transaction::{Transaction, TransactionKind};

pub fn to_dto(transaction: Transaction) -> TransactionDto {
    TransactionDto {
        id: transaction.id,
        user_id: transaction.user_id,
        date: transaction.date,
        description: transaction.description,
        amount: transaction.amount,
        balance: transaction.balance,
        transaction_type: match transaction.kind {
            TransactionKind::Deposit => TransactionType::Deposit,
            TransactionKind::Withdrawal => TransactionType::Withdrawal,
        },
    }
}

pub fn to_list_response(result: TransactionListResult) -> TransactionListResponse {
    TransactionListResponse {
        transactions: result.transactions.into_iter().map(to_dto).collect(),
        pagination: shared::PaginationInfo {
            has_more: result.pagination.has_more,
            next_cursor: result.pagination.next_cursor,
        },
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub id: i64,
    pub user_uuid: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only record of a balance change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletTransaction {
    pub id: i64,
    pub wallet_id: i64,
    pub user_uuid: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub reference_id: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "wallet_transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    EntryFee,
    Refund,
    Prize,
}

/// Entry-fee refund credited when a player leaves a paid tournament.
#[derive(Debug, Clone)]
pub struct Refund {
    pub amount: Decimal,
    pub tournament_id: i64,
    pub tournament_name: String,
}

impl Refund {
    pub fn reference_id(&self) -> String {
        self.tournament_id.to_string()
    }

    pub fn description(&self) -> String {
        format!("Entry fee refund for {}", self.tournament_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListQuery {
    pub limit: Option<i64>,
}

impl TransactionListQuery {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletOverview {
    pub balance: Decimal,
    pub transactions: Vec<WalletTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_limit_is_clamped() {
        assert_eq!(TransactionListQuery::default().effective_limit(), 20);
        assert_eq!(TransactionListQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(TransactionListQuery { limit: Some(500) }.effective_limit(), 100);
        assert_eq!(TransactionListQuery { limit: Some(35) }.effective_limit(), 35);
    }

    #[test]
    fn test_refund_references_tournament() {
        let refund = Refund {
            amount: Decimal::new(5, 0),
            tournament_id: 42,
            tournament_name: "Friday Cup".to_string(),
        };
        assert_eq!(refund.reference_id(), "42");
        assert_eq!(refund.description(), "Entry fee refund for Friday Cup");
    }
}

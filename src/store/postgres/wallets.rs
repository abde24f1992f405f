use super::{PgStore, WALLET_COLUMNS, WALLET_TRANSACTION_COLUMNS};
use crate::api_error::ApiError;
use crate::models::{Refund, TransactionType, Wallet, WalletTransaction};
use crate::store::WalletStore;
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

/// Credits a refund to the user's wallet, creating the wallet on first use,
/// and appends the matching `refund` transaction. Runs on the caller's
/// connection so it commits or rolls back with the surrounding transaction.
pub(super) async fn credit_refund(
    conn: &mut PgConnection,
    user_uuid: Uuid,
    refund: &Refund,
) -> Result<(), ApiError> {
    let (wallet_id, balance): (i64, rust_decimal::Decimal) = sqlx::query_as(
        "INSERT INTO wallets (user_uuid, balance) VALUES ($1, $2) \
         ON CONFLICT (user_uuid) DO UPDATE \
         SET balance = wallets.balance + EXCLUDED.balance, updated_at = NOW() \
         RETURNING id, balance",
    )
    .bind(user_uuid)
    .bind(refund.amount)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO wallet_transactions \
         (wallet_id, user_uuid, transaction_type, amount, reference_id, description) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(wallet_id)
    .bind(user_uuid)
    .bind(TransactionType::Refund)
    .bind(refund.amount)
    .bind(refund.reference_id())
    .bind(refund.description())
    .execute(&mut *conn)
    .await?;

    info!(
        user_id = %user_uuid,
        wallet_id,
        amount = %refund.amount,
        balance = %balance,
        "Entry fee refunded"
    );

    Ok(())
}

#[async_trait]
impl WalletStore for PgStore {
    async fn get_wallet(&self, user_uuid: Uuid) -> Result<Option<Wallet>, ApiError> {
        let wallet = sqlx::query_as::<_, Wallet>(&format!(
            "SELECT {} FROM wallets WHERE user_uuid = $1",
            WALLET_COLUMNS
        ))
        .bind(user_uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    async fn list_transactions(
        &self,
        user_uuid: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, ApiError> {
        let transactions = sqlx::query_as::<_, WalletTransaction>(&format!(
            "SELECT {} FROM wallet_transactions WHERE user_uuid = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
            WALLET_TRANSACTION_COLUMNS
        ))
        .bind(user_uuid)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}

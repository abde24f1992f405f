use crate::api_error::ApiError;
use crate::models::{TransactionListQuery, WalletOverview};
use crate::store::WalletStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub struct WalletService {
    store: Arc<dyn WalletStore>,
}

impl WalletService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Balance and recent transactions. Users without a wallet see zero.
    pub async fn overview(
        &self,
        user_uuid: Uuid,
        query: &TransactionListQuery,
    ) -> Result<WalletOverview, ApiError> {
        let balance = self
            .store
            .get_wallet(user_uuid)
            .await?
            .map_or(Decimal::ZERO, |w| w.balance);

        let transactions = self
            .store
            .list_transactions(user_uuid, query.effective_limit())
            .await?;

        Ok(WalletOverview {
            balance,
            transactions,
        })
    }
}

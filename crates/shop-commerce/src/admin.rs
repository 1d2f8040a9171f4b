//! Back-office order management.

use crate::batch::{run_sequential, BatchResult};
use crate::checkout::OrderStatus;
use crate::ledger::{LegacyOrder, NormalizedOrder};
use crate::report::DashboardSummary;
use crate::CommerceError;
use serde_json::{Map, Value};
use shop_store::{DocumentStore, Query, ORDERS, PRODUCTS};
use std::sync::Arc;

/// Lists, confirms and deletes orders.
#[derive(Clone)]
pub struct OrderAdmin {
    store: Arc<dyn DocumentStore>,
}

impl OrderAdmin {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Orders newest first, normalized for display.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<NormalizedOrder>, CommerceError> {
        let mut query = Query::new().order_by_desc("createdAt");
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let docs = self.store.query(ORDERS, &query).await?;
        Ok(docs.iter().map(NormalizedOrder::from).collect())
    }

    /// Orders in `status`, newest first, with `limit` applied after filtering.
    ///
    /// Filters on the normalized status so legacy records without a
    /// readable status count as pending.
    pub async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: Option<usize>,
    ) -> Result<Vec<NormalizedOrder>, CommerceError> {
        let mut orders = self.list(None).await?;
        orders.retain(|o| o.status == status);
        if let Some(limit) = limit {
            orders.truncate(limit);
        }
        Ok(orders)
    }

    pub async fn get(&self, id: &str) -> Result<NormalizedOrder, CommerceError> {
        self.store
            .get(ORDERS, id)
            .await?
            .map(|doc| NormalizedOrder::from(&doc))
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
    }

    /// Mark a pending order confirmed. Confirming twice is a no-op.
    pub async fn confirm(&self, id: &str) -> Result<(), CommerceError> {
        let doc = self
            .store
            .get(ORDERS, id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;

        let current = LegacyOrder::from_document(&doc).status();
        let next = current.transition_to(OrderStatus::Confirmed)?;
        if current == next {
            return Ok(());
        }

        let mut fields = Map::new();
        fields.insert("status".into(), Value::from(next.as_str()));
        self.store.update(ORDERS, id, fields).await?;
        tracing::info!(order_id = id, "order confirmed");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), CommerceError> {
        self.store.delete(ORDERS, id).await.map_err(|e| {
            if e.is_not_found() {
                CommerceError::OrderNotFound(id.to_string())
            } else {
                e.into()
            }
        })?;
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }

    pub async fn confirm_many(&self, ids: &[String]) -> BatchResult {
        run_sequential("confirm orders", ids, |id| async move { self.confirm(&id).await }).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> BatchResult {
        run_sequential("delete orders", ids, |id| async move { self.delete(&id).await }).await
    }

    /// Dashboard figures over every order and product.
    pub async fn summary(&self) -> Result<DashboardSummary, CommerceError> {
        let orders = self.list(None).await?;
        let products = self.store.query(PRODUCTS, &Query::new()).await?;
        Ok(DashboardSummary::compute(&orders, products.len()))
    }
}

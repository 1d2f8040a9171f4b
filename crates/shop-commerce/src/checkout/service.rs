//! Checkout: validate, price, persist, notify.

use crate::catalog::Product;
use crate::checkout::{CheckoutForm, DeliveryFees, NoopNotifier, Order, OrderNotifier, OrderQuote};
use crate::ids::OrderId;
use crate::CommerceError;
use shop_store::{DocumentStore, DocumentStoreExt, ORDERS};
use std::sync::Arc;

/// Places storefront orders.
pub struct CheckoutService {
    store: Arc<dyn DocumentStore>,
    fees: DeliveryFees,
    notifier: Arc<dyn OrderNotifier>,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn DocumentStore>, fees: DeliveryFees) -> Self {
        Self {
            store,
            fees,
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Set the notifier that hears about every placed order.
    pub fn with_notifier(mut self, notifier: Arc<dyn OrderNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn fees(&self) -> &DeliveryFees {
        &self.fees
    }

    /// Running total shown while the customer fills in the form.
    pub fn quote(&self, product: &Product, form: &CheckoutForm) -> OrderQuote {
        OrderQuote::calculate(
            product.price,
            form.unit_size,
            form.quantity,
            form.delivery_zone,
            &self.fees,
        )
    }

    /// Validate the form, persist a snapshot order and fire the notifier.
    ///
    /// Nothing reaches the store when validation fails. The notifier runs
    /// only after the store confirms the write and its outcome is ignored.
    pub async fn place_order(&self, product: &Product, form: &CheckoutForm) -> Result<Order, CommerceError> {
        form.validate()?;

        let quote = self.quote(product, form);
        let mut order = Order::place(product, form, &quote);

        let id = self.store.insert(ORDERS, &order).await?;
        order.id = OrderId::new(id);

        tracing::info!(
            order_id = %order.id,
            product_id = %order.product_id,
            grand_total = order.grand_total,
            "order placed"
        );

        self.notifier.notify(&order);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{DeliveryZone, UnitSize};
    use crate::ids::ProductId;
    use crate::testing::BrokenStore;
    use shop_store::InMemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<OrderId>>,
    }

    impl OrderNotifier for RecordingNotifier {
        fn notify(&self, order: &Order) {
            self.seen.lock().unwrap().push(order.id.clone());
        }
    }

    fn product() -> Product {
        let mut p = Product::new("Mustard Oil", 200.0);
        p.id = ProductId::new("p-oil");
        p
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Nasrin".to_string(),
            phone: "01811111111".to_string(),
            address: "Sylhet".to_string(),
            quantity: 1,
            unit_size: UnitSize::Whole,
            delivery_zone: DeliveryZone::Outside,
        }
    }

    #[tokio::test]
    async fn test_place_order_persists_and_notifies() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = CheckoutService::new(store.clone(), DeliveryFees::default())
            .with_notifier(notifier.clone());

        let order = service.place_order(&product(), &form()).await.unwrap();
        assert!(order.id.is_assigned());
        assert_eq!(order.grand_total, 320.0);

        let stored: Order = store.get_as(ORDERS, order.id.as_str()).await.unwrap().unwrap();
        assert_eq!(stored, order);
        assert_eq!(notifier.seen.lock().unwrap().as_slice(), &[order.id.clone()]);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_store() {
        let service = CheckoutService::new(Arc::new(BrokenStore), DeliveryFees::default());
        let mut bad = form();
        bad.address = String::new();

        let err = service.place_order(&product(), &bad).await.unwrap_err();
        assert!(matches!(err, CommerceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_failure_skips_notification() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = CheckoutService::new(Arc::new(BrokenStore), DeliveryFees::default())
            .with_notifier(notifier.clone());

        let err = service.place_order(&product(), &form()).await.unwrap_err();
        assert!(matches!(err, CommerceError::Store(_)));
        assert!(notifier.seen.lock().unwrap().is_empty());
    }
}

//! Order notification webhook.
//!
//! Each placed order is POSTed as JSON to a configured URL from a detached
//! task. The checkout never waits for it: failures are logged and dropped,
//! and nothing is retried.

use crate::client::{build_client, error_for_status, parse_url, DEFAULT_TIMEOUT};
use crate::FetchError;
use shop_commerce::checkout::{Order, OrderNotifier};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Webhook settings.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Posts placed orders to a webhook.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, FetchError> {
        Ok(Self {
            url: parse_url(&config.url)?,
            client: build_client(config.timeout)?,
        })
    }

    /// POST one order and wait for the response.
    pub async fn send(&self, order: &Order) -> Result<(), FetchError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(order)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }

    /// Start delivery in the background.
    ///
    /// Returns `None` when called outside a Tokio runtime, in which case
    /// nothing is sent.
    pub fn dispatch(&self, order: &Order) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(order_id = %order.id, "no runtime, order webhook skipped");
            return None;
        };

        let notifier = self.clone();
        let order = order.clone();
        Some(runtime.spawn(async move {
            match notifier.send(&order).await {
                Ok(()) => tracing::debug!(order_id = %order.id, "order webhook delivered"),
                Err(e) => tracing::warn!(order_id = %order.id, error = %e, "order webhook failed"),
            }
        }))
    }
}

impl OrderNotifier for WebhookNotifier {
    fn notify(&self, order: &Order) {
        self.dispatch(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use shop_commerce::catalog::Product;
    use shop_commerce::checkout::{CheckoutForm, DeliveryFees, DeliveryZone, OrderQuote, UnitSize};
    use shop_commerce::OrderId;

    fn order() -> Order {
        let product = Product::new("Raw Honey", 500.0);
        let form = CheckoutForm {
            customer_name: "Rahim".into(),
            phone: "01712345678".into(),
            address: "Dhaka".into(),
            quantity: 3,
            unit_size: UnitSize::Half,
            delivery_zone: DeliveryZone::Inside,
        };
        let quote = OrderQuote::calculate(500.0, UnitSize::Half, 3, DeliveryZone::Inside, &DeliveryFees::default());
        let mut order = Order::place(&product, &form, &quote);
        order.id = OrderId::new("o-1");
        order
    }

    #[tokio::test]
    async fn test_dispatch_posts_order_json() {
        let (url, server) = serve_once(200, "{}").await;
        let notifier = WebhookNotifier::new(WebhookConfig::new(format!("{url}/hooks/orders"))).unwrap();

        notifier.dispatch(&order()).unwrap().await.unwrap();

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /hooks/orders"));
        let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(body["id"], "o-1");
        assert_eq!(body["grandTotal"], 830.0);
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn test_error_status_is_reported_by_send() {
        let (url, _server) = serve_once(500, "boom").await;
        let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

        let err = notifier.send(&order()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_panic() {
        let notifier = WebhookNotifier::new(
            WebhookConfig::new("http://127.0.0.1:9/unreachable").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        notifier.notify(&order());
        notifier.dispatch(&order()).unwrap().await.unwrap();
    }

    #[test]
    fn test_dispatch_outside_runtime_is_skipped() {
        let notifier = WebhookNotifier::new(WebhookConfig::new("http://127.0.0.1:9")).unwrap();
        assert!(notifier.dispatch(&order()).is_none());
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(WebhookNotifier::new(WebhookConfig::new("hooks")).is_err());
    }
}

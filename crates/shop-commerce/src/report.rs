//! Dashboard totals over normalized orders.

use crate::checkout::OrderStatus;
use crate::ledger::NormalizedOrder;
use crate::money::{Currency, Money};
use serde::Serialize;

/// Back-office dashboard figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub confirmed_orders: usize,
    /// Sum of resolved grand totals over every order.
    pub revenue: f64,
    /// Sum of resolved grand totals over confirmed orders.
    pub confirmed_revenue: f64,
    /// Kilograms across every order.
    pub total_weight: f64,
    pub product_count: usize,
}

impl DashboardSummary {
    pub fn compute(orders: &[NormalizedOrder], product_count: usize) -> Self {
        let mut summary = Self {
            product_count,
            ..Self::default()
        };

        for order in orders {
            summary.total_orders += 1;
            summary.revenue += order.grand_total;
            summary.total_weight += order.total_weight;
            match order.status {
                OrderStatus::Pending => summary.pending_orders += 1,
                OrderStatus::Confirmed => {
                    summary.confirmed_orders += 1;
                    summary.confirmed_revenue += order.grand_total;
                }
            }
        }
        summary
    }

    pub fn revenue_money(&self, currency: Currency) -> Money {
        Money::new(self.revenue, currency)
    }

    /// Average order value, zero when there are no orders.
    pub fn average_order_value(&self) -> f64 {
        if self.total_orders == 0 {
            0.0
        } else {
            self.revenue / self.total_orders as f64
        }
    }
}

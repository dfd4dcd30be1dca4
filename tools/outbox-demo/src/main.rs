//! outbox-demo
//!
//! Wires one registry with two event types, routes a few events through
//! logging channels, and shows the duplicate and missing binding errors.

mod config;

use std::sync::Arc;

use anyhow::Result;
use outbox_core::{define_event_type, EventType, LogChannel, OutboxEvent, OutboxEventManager};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

define_event_type!(OrderPlaced, "OrderPlaced", 1);
define_event_type!(PaymentDone, "PaymentDone", 2);

#[derive(Debug, Serialize)]
struct OrderPlacedPayload {
    order_id: String,
    total_cents: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;

    // Prefer RUST_LOG, fall back to OUTBOX_LOG_LEVEL
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        max_retries = config.channel.max_retries,
        batch_size = config.channel.batch_size,
        interval = ?config.channel.interval,
        "Configuration loaded"
    );

    let manager = OutboxEventManager::new();
    manager.register(&OrderPlaced, Arc::new(LogChannel::new("orders")))?;
    manager.register(&PaymentDone, Arc::new(LogChannel::new("payments")))?;

    if let Err(e) = manager.register(&OrderPlaced, Arc::new(LogChannel::new("orders-2"))) {
        warn!(error = %e, "Second registration rejected");
    }

    for n in 0..config.order_count {
        let order_id = format!("order-{n}");
        let payload = OrderPlacedPayload {
            order_id: order_id.clone(),
            total_cents: 1_000 + u64::from(n) * 250,
        };

        let placed = OutboxEvent::with_payload(&OrderPlaced, "Order", &order_id, &payload)?;
        manager.dispatch(&OrderPlaced, placed).await?;

        let paid = OutboxEvent::new(
            &PaymentDone,
            "Payment",
            format!("payment-{n}"),
            serde_json::json!({ "order_id": order_id }),
        );
        manager.get_channel(&PaymentDone)?.register_event(paid).await?;
    }

    let unknown = EventType::from_static("OrderShipped", 3);
    if let Err(e) = manager.get_channel(&unknown) {
        warn!(error = %e, "Lookup for unbound event type failed");
    }

    info!(bound = ?manager.event_types(), "Demo complete");
    Ok(())
}

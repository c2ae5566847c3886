//! Fire-and-forget usage telemetry
//!
//! Each lifecycle operation dispatches one background report. The task is
//! never awaited and its errors are discarded by design: telemetry must not
//! block, delay, or fail the operation that triggered it.

use serde_json::json;

use crate::client::DistClient;

/// Product identifier reported with every usage event
pub const PRODUCT_ID: &str = concat!("distctl/", env!("CARGO_PKG_VERSION"));

/// Dispatch a usage event in the background.
///
/// Must be called from within a tokio runtime; every lifecycle operation is
/// async, so this holds wherever it is used.
pub fn send(client: &DistClient, resource: &'static str, action: &'static str) {
    let client = client.clone();

    tokio::spawn(async move {
        let body = json!({
            "productId": PRODUCT_ID,
            "features": [
                { "featureId": format!("{resource}/{action}") }
            ],
        });

        if let Err(e) = client.post(&client.usage_url(), &body).await {
            // discarded by design; surfaced only for debugging
            tracing::debug!("usage report failed (ignored): {e}");
        }
    });
}

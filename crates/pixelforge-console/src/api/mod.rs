//! HTTP-backed page sources and bulk actions for the PixelForge backend.

pub mod categories;
pub mod client;
pub mod products;
pub mod source;
pub mod users;

use std::future::Future;

use futures::future::join_all;

use pixelforge_core::{CoreResult, ItemOutcome};

pub use client::ApiClient;
pub use source::RestSource;

/// Runs `call` for every id concurrently and records one outcome per id.
///
/// A failing call never aborts the others.
pub(crate) async fn fan_out<Id, F, Fut>(ids: &[Id], call: F) -> Vec<ItemOutcome<Id>>
where
    Id: Clone,
    F: Fn(Id) -> Fut,
    Fut: Future<Output = CoreResult<()>>,
{
    let calls = ids.iter().cloned().map(|id| {
        let pending = call(id.clone());
        async move {
            match pending.await {
                Ok(()) => ItemOutcome::ok(id),
                Err(e) => ItemOutcome::failed(id, e.to_string()),
            }
        }
    });
    join_all(calls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelforge_core::CoreError;

    #[tokio::test]
    async fn fan_out_reports_each_id() {
        let outcomes = fan_out(&[1u64, 2, 3], |id| async move {
            if id == 2 {
                Err(CoreError::Http {
                    status: 404,
                    message: "Product not found".to_string(),
                })
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some("request failed with status 404: Product not found")
        );
        assert!(outcomes[2].is_success());
    }

    #[tokio::test]
    async fn fan_out_empty() {
        let outcomes = fan_out(&[] as &[u64], |_| async { Ok::<(), CoreError>(()) }).await;
        assert!(outcomes.is_empty());
    }
}

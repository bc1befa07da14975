//! Process-wide shared gateway
//!
//! Explicit construction with [`RecordGateway::new`] is the primary path.
//! This registry is for callers that want one instance per process without
//! threading it through their code. The first successful initializer wins;
//! concurrent first use runs a single initializer while the others wait.

use std::future::Future;

use tokio::sync::OnceCell;

use crate::error::Result;
use crate::gateway::RecordGateway;

static SHARED: OnceCell<RecordGateway> = OnceCell::const_new();

/// Initialize the shared gateway, or return the existing one
///
/// `init` only runs if no gateway has been registered yet. If it fails, the
/// registry stays empty and the error is returned.
///
/// # Example
///
/// ```rust
/// use record_gateway::{shared, GatewayConfig, KeySchema, MemoryStore, RecordGateway};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> record_gateway::Result<()> {
/// let gateway = shared::get_or_try_init(|| async {
///     let store = MemoryStore::new().with_table("users", KeySchema::partition("id"))?;
///     Ok::<_, record_gateway::GatewayError>(RecordGateway::new(store, GatewayConfig::default()))
/// })
/// .await?;
///
/// assert!(!gateway.config().verbose);
/// assert!(shared::get().is_some());
/// # Ok(())
/// # }
/// ```
pub async fn get_or_try_init<F, Fut>(init: F) -> Result<&'static RecordGateway>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<RecordGateway>>,
{
    SHARED.get_or_try_init(init).await
}

/// Register an already constructed gateway
///
/// Returns the registered gateway, which is `gateway` only if the registry
/// was empty.
pub async fn init(gateway: RecordGateway) -> &'static RecordGateway {
    SHARED.get_or_init(|| async move { gateway }).await
}

/// The shared gateway, if one has been registered
pub fn get() -> Option<&'static RecordGateway> {
    SHARED.get()
}

use anyhow::Result;
use tokio::signal;

/// Resolves once Ctrl+C or SIGTERM arrives.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = ctrl_c() => result?,
        result = sigterm() => result?,
    }
    tracing::info!("Shutdown signal received, draining in-flight requests");
    Ok(())
}

async fn ctrl_c() -> Result<()> {
    signal::ctrl_c().await.inspect_err(|e| {
        tracing::error!(%e, "Error handling Ctrl+C signal");
    })?;
    tracing::info!("Received Ctrl+C");
    Ok(())
}

#[cfg(unix)]
async fn sigterm() -> Result<()> {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate()).inspect_err(|e| {
        tracing::error!(%e, "Failed to install SIGTERM handler");
    })?;
    term.recv().await;
    tracing::info!("Received SIGTERM");
    Ok(())
}

#[cfg(not(unix))]
async fn sigterm() -> Result<()> {
    std::future::pending().await
}

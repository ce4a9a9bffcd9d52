use tracing::*;

// Resolves on the first SIGINT or SIGTERM.  If the handlers can't be installed this never
// resolves, and the run ends at its deadline instead.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{
        SignalKind,
        signal,
    };

    let (mut sigint, mut sigterm) = match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(err), _) | (_, Err(err)) => {
            warn!("could not install signal handlers, the run will only stop at its deadline: {err}");
            return std::future::pending().await;
        },
    };

    tokio::select! {
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("could not install signal handler, the run will only stop at its deadline: {err}");
        std::future::pending::<()>().await;
    }
}

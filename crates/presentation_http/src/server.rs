//! Serving with a bounded graceful shutdown

use std::{future::Future, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{info, warn};

/// Serve `app` until `signal` resolves, then drain open connections for at
/// most `drain_timeout`
///
/// Connections still busy when the timeout expires are dropped.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve_until<S>(
    listener: TcpListener,
    app: Router,
    signal: S,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                let _ = signalled_tx.send(());
            })
            .await
    };
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result,
        Ok(()) = signalled_rx => {},
    }

    info!("Waiting up to {:?} for connections to close", drain_timeout);
    if let Ok(result) = tokio::time::timeout(drain_timeout, &mut server).await {
        result
    } else {
        warn!(
            timeout_secs = drain_timeout.as_secs(),
            "Connections still open after shutdown timeout, dropping them"
        );
        Ok(())
    }
}

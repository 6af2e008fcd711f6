//! Server module
//!
//! Accept loop, per-connection serving and graceful shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::AppState;
use crate::logger;

// Re-export commonly used items
pub use connection::accept_connection;
pub use listener::create_reusable_listener;
pub use signal::shutdown_signal;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` resolves, then ask open connections to
/// close once their in-flight request is answered and wait for them (bounded
/// by the connection timeout).
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (closing_tx, closing_rx) = watch::channel(false);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            closing_rx.clone(),
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }

    // Stop accepting before draining
    drop(listener);
    // Fails only when no receiver is left
    let _ = closing_tx.send(true);

    let performance = &state.config.performance;
    let deadline = tokio::time::Instant::now()
        + Duration::from_secs(std::cmp::max(performance.read_timeout, performance.write_timeout));
    while active_connections.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    logger::log_shutdown_complete(active_connections.load(Ordering::SeqCst));
    Ok(())
}

//utils for graceful shutdown, usable by any timer-driven piece of the
//simulator
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// A token that fires when the user hits ctrl-c.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let tc = token.clone();
    //spawn once to listen for ctrl-c
    tokio::spawn(async move {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl+C handler");
        tracing::info!("received shutdown signal");
        tc.cancel();
    });
    token
}

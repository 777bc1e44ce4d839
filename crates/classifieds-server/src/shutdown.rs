//! Graceful shutdown signalling.

use std::time::Duration;
use tokio::sync::broadcast;

/// Broadcasts a shutdown signal to the accept loop and every open
/// connection.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
	sender: broadcast::Sender<()>,
	timeout: Duration,
}

impl ShutdownCoordinator {
	/// `timeout` bounds how long in-flight connections may take to finish
	/// once shutdown starts.
	pub fn new(timeout: Duration) -> Self {
		let (sender, _) = broadcast::channel(1);
		Self { sender, timeout }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.sender.subscribe()
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Start shutting down. Calling it more than once is harmless.
	pub fn shutdown(&self) {
		// No receivers means nothing is running yet.
		let _ = self.sender.send(());
	}

	/// Trigger shutdown on Ctrl+C.
	pub fn shutdown_on_ctrl_c(&self) {
		let coordinator = self.clone();
		tokio::spawn(async move {
			match tokio::signal::ctrl_c().await {
				Ok(()) => {
					tracing::info!("Ctrl+C received, shutting down");
					coordinator.shutdown();
				}
				Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C"),
			}
		});
	}
}

impl Default for ShutdownCoordinator {
	fn default() -> Self {
		Self::new(Duration::from_secs(30))
	}
}

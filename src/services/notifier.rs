//! Hand-off of triggered alerts to a delivery transport.

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::types::AlertNotification;

/// Receives alert notifications. Delivery (email, push) lives behind this.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &AlertNotification) -> Result<()>;
}

/// Writes each alert to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &AlertNotification) -> Result<()> {
        warn!(
            "ALERT {} [{}]",
            notification.message,
            notification.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        Ok(())
    }
}

/// Forwards alerts to a delivery worker over a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<AlertNotification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &AlertNotification) -> Result<()> {
        self.tx
            .send(notification.clone())
            .map_err(|_| AppError::ExternalApi("alert delivery channel closed".to_string()))
    }
}

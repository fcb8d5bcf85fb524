use crate::notification::Notification;
use tokio::sync::mpsc::Receiver;
use tracing::{info, instrument, warn};

/// Surfaces every notification of the attendance flow until all senders are gone.
#[instrument(skip_all)]
pub async fn notification_listener(mut rx: Receiver<Notification>) -> usize {
    let mut surfaced = 0;
    while let Some(notification) = rx.recv().await {
        if notification.is_alert() {
            warn!("🔔 {}: {}", notification.title(), notification.message());
        } else {
            info!("🔔 {}: {}", notification.title(), notification.message());
        }
        surfaced += 1;
    }

    surfaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tokio::sync::mpsc;

    #[test(tokio::test)]
    async fn surfaces_notifications_until_the_channel_closes() {
        let (tx, rx) = mpsc::channel::<Notification>(4);
        tx.send(Notification::PermissionDenied).await.unwrap();
        tx.send(Notification::CardDismissed).await.unwrap();
        drop(tx);

        assert_eq!(notification_listener(rx).await, 2);
    }
}

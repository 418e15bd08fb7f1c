use serde::Serialize;
use tracing::info;

use crate::engine::catalog::SegmentName;

/// Payload for a segment's first in-budget listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub link: String,
    pub price: u32,
    pub mileage: u32,
    pub segment: SegmentName,
    pub source_label: String,
}

/// Delivery of alerts. Shared by every concurrently running target.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Prints alerts to stdout in place of sending mail.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, alert: &Alert) {
        info!("Alert for {} segment {}", alert.source_label, alert.segment);
        println!(
            "[MAIL] [{}] Segment {} — {} zł, {} km — {}",
            alert.source_label, alert.segment, alert.price, alert.mileage, alert.link
        );
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: std::sync::Mutex<Vec<Alert>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) {
        self.alerts.lock().unwrap().push(alert.clone());
    }
}

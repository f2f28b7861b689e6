use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::info;

/// Tracks which senders a human agent has taken over, and until when the
/// bot must stay silent for each of them. Shared across all in-flight
/// messages; one lock serializes check-then-mark so two concurrent messages
/// from the same sender cannot both slip past the pause. State is
/// process-local; loss on restart is accepted.
pub struct InterventionTracker {
    cooldown: Duration,
    takeovers: Mutex<HashMap<String, Instant>>,
}

impl InterventionTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            takeovers: Mutex::new(HashMap::new()),
        }
    }

    /// Record a human takeover for this sender, starting the cooldown
    /// window. Overwrites any previous record.
    pub async fn mark(&self, sender: &str) {
        let mut takeovers = self.takeovers.lock().await;
        takeovers.insert(sender.to_string(), Instant::now());
        info!("Human intervention marked for {}", sender);
    }

    /// True iff a non-expired takeover record exists for this sender.
    pub async fn is_active(&self, sender: &str) -> bool {
        self.is_active_at(sender, Instant::now()).await
    }

    // Expired records are removed here, as a side effect of the check.
    // There is no background sweep.
    async fn is_active_at(&self, sender: &str, now: Instant) -> bool {
        let mut takeovers = self.takeovers.lock().await;
        match takeovers.get(sender) {
            Some(&marked) if now.saturating_duration_since(marked) < self.cooldown => true,
            Some(_) => {
                takeovers.remove(sender);
                false
            }
            None => false,
        }
    }
}

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::FirmProfile;
use crate::intent::{Intent, IntentClassifier};
use crate::intervention::InterventionTracker;
use crate::language::{Language, LanguageDetector};
use crate::response;
use crate::store::{InteractionLogEntry, InteractionStore};
use crate::wasender::Delivery;

/// One inbound message, independent of the transport that carried it.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: String,
    pub text: String,
    pub external_id: Option<String>,
}

/// Outcome of one pass through the engine. Serialized into the webhook
/// response under a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessingResult {
    Processed {
        language: Language,
        response_sent: bool,
        interaction_id: String,
    },
    Paused {
        reason: String,
    },
    Error {
        error: String,
    },
}

/// Orchestrates one decision per inbound message: pause check, language
/// detection, intent classification, reply generation, delivery, logging.
/// Holds no per-conversation state of its own; the intervention tracker is
/// the only memory between messages.
pub struct ConversationEngine {
    profile: FirmProfile,
    detector: LanguageDetector,
    classifier: IntentClassifier,
    interventions: Arc<InterventionTracker>,
    delivery: Arc<dyn Delivery>,
    store: Arc<dyn InteractionStore>,
    // Held from the pause check through the escalation mark so a concurrent
    // message from the same sender cannot land in between.
    decision_lock: Mutex<()>,
}

impl ConversationEngine {
    pub fn new(
        profile: FirmProfile,
        detector: LanguageDetector,
        classifier: IntentClassifier,
        interventions: Arc<InterventionTracker>,
        delivery: Arc<dyn Delivery>,
        store: Arc<dyn InteractionStore>,
    ) -> Self {
        Self {
            profile,
            detector,
            classifier,
            interventions,
            delivery,
            store,
            decision_lock: Mutex::new(()),
        }
    }

    /// Run one inbound message through the decision machine. Always returns
    /// a result; internal failures surface as the error status, never as a
    /// panic or propagated error.
    pub async fn process(&self, msg: &InboundMessage) -> ProcessingResult {
        info!("Message from {}: {}", msg.sender, msg.text);

        match self.respond(msg).await {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to process message from {}: {:#}", msg.sender, e);
                ProcessingResult::Error {
                    error: format!("{e:#}"),
                }
            }
        }
    }

    async fn respond(&self, msg: &InboundMessage) -> Result<ProcessingResult> {
        let (language, intent) = {
            let _guard = self.decision_lock.lock().await;

            if self.interventions.is_active(&msg.sender).await {
                info!("Human intervention active for {} - bot paused", msg.sender);
                return Ok(ProcessingResult::Paused {
                    reason: "human_intervention_active".to_string(),
                });
            }

            let language = self.detector.detect(&msg.text);
            let intent = self.classifier.classify(&msg.text, language);

            if intent == Intent::Escalate {
                self.interventions.mark(&msg.sender).await;
            }

            (language, intent)
        };

        let reply = response::generate(intent, language, &self.profile);

        // Delivery is a fallible effect after the decision is made: a
        // failure is recorded, not retried.
        let sent = match self.delivery.send(&msg.sender, &reply).await {
            Ok(()) => {
                info!("Reply sent to {}", msg.sender);
                true
            }
            Err(e) => {
                error!("Failed to deliver reply to {}: {:#}", msg.sender, e);
                false
            }
        };

        let interaction_id = msg
            .external_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let now = Utc::now();
        let entry = InteractionLogEntry {
            timestamp: now.to_rfc3339(),
            phone_number: msg.sender.clone(),
            message_id: interaction_id.clone(),
            incoming_message: msg.text.clone(),
            detected_language: language,
            reply,
            sent_successfully: sent,
        };

        // A failed log write must not cost the caller its result.
        let month_key = now.format("%Y%m").to_string();
        if let Err(e) = self.store.append(&month_key, entry).await {
            warn!("Failed to persist interaction log: {:#}", e);
        }

        Ok(ProcessingResult::Processed {
            language,
            response_sent: sent,
            interaction_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusinessHours;
    use crate::intent::Lexicon;
    use crate::language::DetectionKeywords;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Records every send; optionally fails them all.
    struct MockDelivery {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl MockDelivery {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl Delivery for MockDelivery {
        async fn send(&self, to: &str, text: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            self.sent.lock().await.push((to.to_string(), text.to_string()));
            Ok(())
        }
    }

    /// In-memory stand-in for the month-keyed log.
    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<Vec<(String, InteractionLogEntry)>>,
        fail: bool,
    }

    #[async_trait]
    impl InteractionStore for MemoryStore {
        async fn append(&self, month_key: &str, entry: InteractionLogEntry) -> Result<()> {
            if self.fail {
                return Err(anyhow!("disk full"));
            }
            self.entries
                .lock()
                .await
                .push((month_key.to_string(), entry));
            Ok(())
        }

        async fn load(&self, month_key: &str) -> Result<Vec<InteractionLogEntry>> {
            Ok(self
                .entries
                .lock()
                .await
                .iter()
                .filter(|(k, _)| k == month_key)
                .map(|(_, e)| e.clone())
                .collect())
        }
    }

    fn profile() -> FirmProfile {
        FirmProfile {
            name: "Valente & Lima Advogados".to_string(),
            locations: "Braga e Lisboa".to_string(),
            phone: "+351936647900".to_string(),
            calendly_link: "https://calendly.com/geral-valentelima".to_string(),
            hours: BusinessHours {
                weekdays: "Segunda a Sexta: 9:00-18:00".to_string(),
                saturday: "Sábado: 9:00-13:00".to_string(),
                timezone: "Europa/Lisboa".to_string(),
            },
        }
    }

    struct Harness {
        engine: ConversationEngine,
        delivery: Arc<MockDelivery>,
        store: Arc<MemoryStore>,
        interventions: Arc<InterventionTracker>,
    }

    fn harness(fail_delivery: bool, fail_store: bool) -> Harness {
        let delivery = Arc::new(MockDelivery::new(fail_delivery));
        let store = Arc::new(MemoryStore {
            fail: fail_store,
            ..Default::default()
        });
        let interventions = Arc::new(InterventionTracker::new(Duration::from_secs(600)));
        let engine = ConversationEngine::new(
            profile(),
            LanguageDetector::new(DetectionKeywords::default()),
            IntentClassifier::new(Lexicon::default()),
            Arc::clone(&interventions),
            delivery.clone() as Arc<dyn Delivery>,
            store.clone() as Arc<dyn InteractionStore>,
        );
        Harness {
            engine,
            delivery,
            store,
            interventions,
        }
    }

    fn message(sender: &str, text: &str) -> InboundMessage {
        InboundMessage {
            sender: sender.to_string(),
            text: text.to_string(),
            external_id: Some("msg-001".to_string()),
        }
    }

    #[tokio::test]
    async fn test_greeting_end_to_end() {
        let h = harness(false, false);
        let result = h.engine.process(&message("+351912345678", "Olá, bom dia")).await;

        match result {
            ProcessingResult::Processed {
                language,
                response_sent,
                interaction_id,
            } => {
                assert_eq!(language, Language::Pt);
                assert!(response_sent);
                assert_eq!(interaction_id, "msg-001");
            }
            other => panic!("expected processed, got {:?}", other),
        }

        let sent = h.delivery.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+351912345678");
        assert!(sent[0].1.contains("Bem-vindo"));
    }

    #[tokio::test]
    async fn test_escalation_marks_intervention_and_acknowledges() {
        let h = harness(false, false);
        let result = h
            .engine
            .process(&message(
                "+351912345678",
                "I need to speak with a human lawyer urgently",
            ))
            .await;

        assert!(matches!(result, ProcessingResult::Processed { .. }));
        assert!(h.interventions.is_active("+351912345678").await);

        let sent = h.delivery.sent.lock().await;
        assert!(sent[0].1.contains("transfer your conversation"));
    }

    #[tokio::test]
    async fn test_paused_during_cooldown() {
        let h = harness(false, false);
        h.engine
            .process(&message("+351912345678", "urgent, real person please"))
            .await;

        let result = h.engine.process(&message("+351912345678", "hello?")).await;
        assert_eq!(
            result,
            ProcessingResult::Paused {
                reason: "human_intervention_active".to_string(),
            }
        );

        // Only the escalation reply went out; the follow-up got nothing.
        assert_eq!(h.delivery.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_pause_is_per_sender() {
        let h = harness(false, false);
        h.engine
            .process(&message("+351912345678", "urgente, pessoa real"))
            .await;

        let result = h.engine.process(&message("+351999999999", "Olá")).await;
        assert!(matches!(result, ProcessingResult::Processed { .. }));
    }

    #[tokio::test]
    async fn test_hours_reply_contains_configured_text() {
        let h = harness(false, false);
        let result = h
            .engine
            .process(&message("+351912345678", "horário de funcionamento"))
            .await;

        assert!(matches!(
            result,
            ProcessingResult::Processed {
                language: Language::Pt,
                ..
            }
        ));

        let sent = h.delivery.sent.lock().await;
        assert!(sent[0].1.contains("Segunda a Sexta: 9:00-18:00"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_recorded_not_fatal() {
        let h = harness(true, false);
        let result = h.engine.process(&message("+351912345678", "Olá")).await;

        match result {
            ProcessingResult::Processed { response_sent, .. } => assert!(!response_sent),
            other => panic!("expected processed, got {:?}", other),
        }

        let entries = h.store.entries.lock().await;
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].1.sent_successfully);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_block_result() {
        let h = harness(false, true);
        let result = h.engine.process(&message("+351912345678", "Olá")).await;
        assert!(matches!(
            result,
            ProcessingResult::Processed {
                response_sent: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_log_entry_fields() {
        let h = harness(false, false);
        h.engine
            .process(&message("+351912345678", "Olá, bom dia"))
            .await;

        let entries = h.store.entries.lock().await;
        assert_eq!(entries.len(), 1);
        let (month_key, entry) = &entries[0];
        assert_eq!(month_key.len(), 6);
        assert_eq!(entry.phone_number, "+351912345678");
        assert_eq!(entry.message_id, "msg-001");
        assert_eq!(entry.incoming_message, "Olá, bom dia");
        assert_eq!(entry.detected_language, Language::Pt);
        assert!(entry.sent_successfully);
    }

    #[tokio::test]
    async fn test_generated_interaction_id_when_webhook_has_none() {
        let h = harness(false, false);
        let msg = InboundMessage {
            sender: "+351912345678".to_string(),
            text: "Olá".to_string(),
            external_id: None,
        };
        match h.engine.process(&msg).await {
            ProcessingResult::Processed { interaction_id, .. } => {
                assert!(!interaction_id.is_empty());
            }
            other => panic!("expected processed, got {:?}", other),
        }
    }
}

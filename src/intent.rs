use serde::Deserialize;

use crate::language::Language;

/// Classified purpose of an inbound message. Order of the variants mirrors
/// evaluation priority: handoff triggers outrank scheduling, scheduling
/// outranks topic keywords, and `Fallback` catches everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Escalate,
    Schedule,
    Greeting,
    Hours,
    Location,
    Services,
    Contact,
    Fallback,
}

/// Trigger phrases for one language, one list per intent category.
/// Matching any single phrase (case-insensitive substring) qualifies the
/// category.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentKeywords {
    pub escalate: Vec<String>,
    pub schedule: Vec<String>,
    pub greeting: Vec<String>,
    pub hours: Vec<String>,
    pub location: Vec<String>,
    pub services: Vec<String>,
    pub contact: Vec<String>,
}

impl IntentKeywords {
    pub fn portuguese() -> Self {
        Self {
            escalate: to_owned_list(&[
                "falar com advogado", "advogado humano", "pessoa real", "urgente",
                "emergência", "insatisfeito", "reclamação", "problema grave",
            ]),
            schedule: to_owned_list(&[
                "agendar", "marcar", "consulta", "reunião", "encontro", "appointment",
            ]),
            greeting: to_owned_list(&["olá", "ola", "bom dia", "boa tarde", "boa noite"]),
            hours: to_owned_list(&["horário", "horarios", "funcionamento"]),
            location: to_owned_list(&["onde", "localização", "morada", "escritório"]),
            services: to_owned_list(&["serviços", "áreas", "especialidades"]),
            contact: to_owned_list(&["contacto", "contactos", "telefone", "email", "ligar"]),
        }
    }

    pub fn english() -> Self {
        Self {
            escalate: to_owned_list(&[
                "speak to lawyer", "human lawyer", "real person", "urgent",
                "emergency", "unsatisfied", "complaint", "serious problem",
            ]),
            schedule: to_owned_list(&[
                "schedule", "book", "appointment", "meeting", "consultation",
            ]),
            greeting: to_owned_list(&[
                "hello", "hi", "good morning", "good afternoon", "good evening",
            ]),
            hours: to_owned_list(&["hours", "open"]),
            location: to_owned_list(&["where", "location", "address", "office"]),
            services: to_owned_list(&["services", "areas", "specialties"]),
            contact: to_owned_list(&["contact", "phone", "email", "call"]),
        }
    }
}

fn to_owned_list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// The full mapping from (intent, language) to trigger phrases. Overridable per
/// language from the `[lexicon]` config table.
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    #[serde(default = "IntentKeywords::portuguese")]
    pub pt: IntentKeywords,
    #[serde(default = "IntentKeywords::english")]
    pub en: IntentKeywords,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            pt: IntentKeywords::portuguese(),
            en: IntentKeywords::english(),
        }
    }
}

impl Lexicon {
    fn for_language(&self, language: Language) -> &IntentKeywords {
        match language {
            Language::Pt => &self.pt,
            Language::En => &self.en,
        }
    }
}

pub struct IntentClassifier {
    lexicon: Lexicon,
}

impl IntentClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// First matching category wins; the iteration order below is the
    /// priority contract. Empty or whitespace-only text never matches.
    pub fn classify(&self, text: &str, language: Language) -> Intent {
        if text.trim().is_empty() {
            return Intent::Fallback;
        }

        let text = text.to_lowercase();
        let keywords = self.lexicon.for_language(language);

        let categories: [(Intent, &[String]); 7] = [
            (Intent::Escalate, &keywords.escalate),
            (Intent::Schedule, &keywords.schedule),
            (Intent::Greeting, &keywords.greeting),
            (Intent::Hours, &keywords.hours),
            (Intent::Location, &keywords.location),
            (Intent::Services, &keywords.services),
            (Intent::Contact, &keywords.contact),
        ];

        for (intent, triggers) in categories {
            if triggers.iter().any(|t| text.contains(t.as_str())) {
                return intent;
            }
        }

        Intent::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Lexicon::default())
    }

    #[test]
    fn test_escalation_portuguese() {
        let c = classifier();
        assert_eq!(c.classify("Quero falar com advogado", Language::Pt), Intent::Escalate);
        assert_eq!(c.classify("É urgente!", Language::Pt), Intent::Escalate);
    }

    #[test]
    fn test_escalation_english() {
        let c = classifier();
        assert_eq!(
            c.classify("I need to speak with a human lawyer urgently", Language::En),
            Intent::Escalate
        );
        assert_eq!(c.classify("This is an emergency", Language::En), Intent::Escalate);
    }

    #[test]
    fn test_escalation_outranks_scheduling() {
        let c = classifier();
        // Both category keyword sets match; escalation must win.
        assert_eq!(
            c.classify("Urgente: quero agendar uma consulta", Language::Pt),
            Intent::Escalate
        );
        assert_eq!(
            c.classify("Urgent - I want to book an appointment", Language::En),
            Intent::Escalate
        );
    }

    #[test]
    fn test_scheduling_outranks_topics() {
        let c = classifier();
        assert_eq!(
            c.classify("Posso marcar para saber os horários?", Language::Pt),
            Intent::Schedule
        );
    }

    #[test]
    fn test_topic_intents_portuguese() {
        let c = classifier();
        assert_eq!(c.classify("bom dia", Language::Pt), Intent::Greeting);
        assert_eq!(c.classify("horário de funcionamento", Language::Pt), Intent::Hours);
        assert_eq!(c.classify("onde fica o escritório?", Language::Pt), Intent::Location);
        assert_eq!(c.classify("que serviços oferecem?", Language::Pt), Intent::Services);
        assert_eq!(c.classify("qual é o vosso telefone?", Language::Pt), Intent::Contact);
    }

    #[test]
    fn test_topic_intents_english() {
        let c = classifier();
        assert_eq!(c.classify("hello there", Language::En), Intent::Greeting);
        assert_eq!(c.classify("when are you open?", Language::En), Intent::Hours);
        assert_eq!(c.classify("what is your address?", Language::En), Intent::Location);
        assert_eq!(c.classify("what areas do you cover?", Language::En), Intent::Services);
        assert_eq!(c.classify("how can I contact you?", Language::En), Intent::Contact);
    }

    #[test]
    fn test_empty_text_is_fallback() {
        let c = classifier();
        assert_eq!(c.classify("", Language::Pt), Intent::Fallback);
        assert_eq!(c.classify("   \n\t", Language::En), Intent::Fallback);
    }

    #[test]
    fn test_unmatched_text_is_fallback() {
        let c = classifier();
        assert_eq!(c.classify("preciso de ajuda com um tema", Language::Pt), Intent::Fallback);
        assert_eq!(c.classify("random words only", Language::En), Intent::Fallback);
    }
}

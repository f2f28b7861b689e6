use serde::{Deserialize, Serialize};

/// Languages the responder can answer in. Portuguese is the primary
/// language; anything ambiguous resolves to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Pt,
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Pt => write!(f, "pt"),
            Language::En => write!(f, "en"),
        }
    }
}

/// Marker words used to score a message per language. Overridable from the
/// `[detection]` config table; defaults cover common salutations and legal
/// vocabulary in each language.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionKeywords {
    #[serde(default = "portuguese_markers")]
    pub pt: Vec<String>,
    #[serde(default = "english_markers")]
    pub en: Vec<String>,
}

impl Default for DetectionKeywords {
    fn default() -> Self {
        Self {
            pt: portuguese_markers(),
            en: english_markers(),
        }
    }
}

fn portuguese_markers() -> Vec<String> {
    to_owned_list(&[
        "olá", "ola", "bom", "dia", "tarde", "noite", "obrigado", "obrigada",
        "por favor", "desculpe", "advogado", "consulta", "jurídico", "direito",
        "processo", "contrato", "tribunal", "lei", "legal",
    ])
}

fn english_markers() -> Vec<String> {
    to_owned_list(&[
        "hello", "hi", "good", "morning", "afternoon", "evening", "thank",
        "thanks", "please", "sorry", "lawyer", "attorney", "consultation",
        "legal", "law", "contract", "court", "process", "case",
    ])
}

fn to_owned_list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub struct LanguageDetector {
    keywords: DetectionKeywords,
}

impl LanguageDetector {
    pub fn new(keywords: DetectionKeywords) -> Self {
        Self { keywords }
    }

    /// Score the text against each language's marker list and return the
    /// winner. A marker counts once per list entry found as a substring.
    /// Ties (including empty input) resolve to Portuguese.
    pub fn detect(&self, text: &str) -> Language {
        let text = text.to_lowercase();
        let pt_count = count_matches(&text, &self.keywords.pt);
        let en_count = count_matches(&text, &self.keywords.en);

        if en_count > pt_count {
            Language::En
        } else {
            Language::Pt
        }
    }
}

fn count_matches(text: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

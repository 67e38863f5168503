//! Scripted answers for the most common questions

use std::collections::HashMap;

/// Shortcut questions offered before the conversation starts, in display case
pub const COMMON_QUESTIONS: [&str; 5] = [
    "What is MindGuard?",
    "How can I improve my mental health?",
    "Where can I find resources?",
    "What are common mental health issues?",
    "How to manage stress?",
];

const ANSWERS: [(&str, &str); 5] = [
    (
        "what is mindguard?",
        "MindGuard is an AI-powered chatbot designed to assist with mental health queries and provide support. It offers information, resources, and guidance on various mental health topics.",
    ),
    (
        "how can i improve my mental health?",
        "To improve your mental health, consider: 1) Practicing mindfulness and meditation, 2) Maintaining a regular exercise routine, 3) Getting adequate sleep, 4) Building and maintaining social connections, 5) Seeking professional help when needed, and 6) Engaging in activities you enjoy.",
    ),
    (
        "where can i find resources?",
        "You can find mental health resources at: 1) NAMI, 2) Mental Health America, 3) WHO mental health resources, 4) Local community health centers, and 5) Online therapy platforms like BetterHelp or Talkspace.",
    ),
    (
        "what are common mental health issues?",
        "Common mental health issues include: 1) Depression, 2) Anxiety disorders, 3) Bipolar disorder, 4) PTSD, 5) Eating disorders, 6) OCD, and 7) Schizophrenia.",
    ),
    (
        "how to manage stress?",
        "To manage stress effectively: 1) Practice deep breathing, 2) Exercise regularly, 3) Eat healthy, 4) Sleep well, 5) Manage your time, 6) Connect with loved ones, and 7) Try relaxation techniques like yoga or progressive muscle relaxation.",
    ),
];

/// Normalize user text into a lookup key
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Read-only table from normalized question to fixed answer
#[derive(Debug, Clone)]
pub struct CannedResponses {
    answers: HashMap<String, String>,
}

impl CannedResponses {
    pub fn new() -> Self {
        Self {
            answers: ANSWERS
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
        }
    }

    /// Exact match after normalization
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.answers.get(&normalize(text)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let table = CannedResponses::new();
        let answer = table.lookup("  What is MindGuard?  ").unwrap();
        assert!(answer.starts_with("MindGuard is an AI-powered chatbot"));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let table = CannedResponses::new();
        assert!(table.lookup("what is mindguard").is_none());
        assert!(table.lookup("tell me what is mindguard?").is_none());
    }

    #[test]
    fn test_every_common_question_has_answer() {
        let table = CannedResponses::new();
        assert_eq!(table.len(), COMMON_QUESTIONS.len());
        for question in COMMON_QUESTIONS {
            assert!(table.lookup(question).is_some(), "no answer for {}", question);
        }
    }
}

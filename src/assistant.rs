use crate::apis::MultiApiClient;
use crate::intent::{self, IntentTag};
use crate::resolver::ResponseResolver;
use crate::store::Store;
use chrono::{DateTime, Local};

const EMPTY_INPUT_REPLY: &str = "Please ask me something!";
const HISTORY_LIMIT: usize = 10;

/// One user/bot exchange, kept for the session only.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub user: String,
    pub bot: String,
    pub timestamp: DateTime<Local>,
}

/// The assembled assistant: intent dispatch first, then keyword-routed
/// content APIs, then the general resolver chain. Every path produces a
/// non-empty reply.
pub struct Assistant {
    resolver: ResponseResolver,
    store: Store,
    apis: MultiApiClient,
    history: Vec<ConversationTurn>,
}

impl Assistant {
    pub fn new(resolver: ResponseResolver, store: Store, apis: MultiApiClient) -> Self {
        Assistant {
            resolver,
            store,
            apis,
            history: Vec::new(),
        }
    }

    pub async fn handle_input(&mut self, input: &str) -> String {
        if input.trim().is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        let tag = intent::classify(input);
        let core = match intent::dispatch(tag, input, &mut self.store, &self.apis) {
            Some(reply) => reply,
            None => match self.apis.respond(input).await {
                Some(reply) => reply,
                None => self.resolver.resolve(input).await,
            },
        };

        // Emotionally loaded input gets an empathetic prefix, unless the
        // mood itself was the subject of the message.
        let response = if tag != IntentTag::Mood {
            match intent::mood_reply(input) {
                Some(prefix) => format!("{}\n\n{}", prefix, core),
                None => core,
            }
        } else {
            core
        };

        self.remember(input, &response);
        response
    }

    fn remember(&mut self, user: &str, bot: &str) {
        self.history.push(ConversationTurn {
            user: user.to_string(),
            bot: bot.to_string(),
            timestamp: Local::now(),
        });
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use std::io::Write;

    fn test_assistant(dir: &tempfile::TempDir) -> Assistant {
        let dataset_path = dir.path().join("dataset.json");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        file.write_all(
            br#"[{"question": "what is your name", "answer": "I'm Sahayak, your assistant."}]"#,
        )
        .unwrap();
        let corpus = Corpus::load(&dataset_path, &dir.path().join("absent.json")).unwrap();

        // No external sources: tier two is empty, so resolution is fully
        // offline and deterministic in tests.
        let resolver = ResponseResolver::new(corpus, 0.85, vec![]);
        let store = Store::open(dir.path().join("data.json")).unwrap();
        let apis = MultiApiClient::new(reqwest::Client::new());
        Assistant::new(resolver, store, apis)
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        assert_eq!(assistant.handle_input("").await, EMPTY_INPUT_REPLY);
        assert_eq!(assistant.handle_input("   \t ").await, EMPTY_INPUT_REPLY);
    }

    #[tokio::test]
    async fn commands_bypass_the_resolver_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        let reply = assistant.handle_input("Add expense: 50 for food - Lunch").await;
        assert!(reply.contains("50"));
        assert!(reply.contains("food"));
    }

    #[tokio::test]
    async fn general_questions_reach_the_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        let reply = assistant.handle_input("What is your name?").await;
        assert_eq!(reply, "I'm Sahayak, your assistant.");

        let reply = assistant.handle_input("What is Python programming?").await;
        assert!(reply.contains("high-level, interpreted programming language"));
    }

    #[tokio::test]
    async fn positive_mood_prefixes_the_answer() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        // "great" reads as positive but is not a Mood-intent trigger, so the
        // question still reaches the resolver with an empathetic prefix.
        let reply = assistant.handle_input("Great! What is your name?").await;
        assert!(reply.contains("positive energy"));
        assert!(reply.contains("I'm Sahayak, your assistant."));
    }

    #[tokio::test]
    async fn mood_intent_answers_directly() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        let reply = assistant.handle_input("i am feeling stressed").await;
        assert!(reply.contains("feeling down"));
    }

    #[tokio::test]
    async fn history_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut assistant = test_assistant(&dir);
        for i in 0..15 {
            assistant.handle_input(&format!("question number {}", i)).await;
        }
        assert_eq!(assistant.history().len(), 10);
        assert_eq!(assistant.history()[0].user, "question number 5");
    }
}

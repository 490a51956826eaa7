use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
struct DatasetItem {
    question: String,
    answer: String,
}

#[derive(Deserialize, Debug, Clone)]
struct IntentItem {
    patterns: Vec<String>,
    responses: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
struct IntentsFile {
    intents: Vec<IntentItem>,
}

/// A question/answer pair with the question normalized to lowercase.
#[derive(Debug, Clone)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

/// The static question/answer corpus, built once at startup and read-only
/// afterwards. Questions and answers stay index-aligned with the rows of the
/// fitted vector space.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<QaEntry>,
}

impl Corpus {
    /// Loads the flat Q/A dataset and appends the intent patterns after it.
    ///
    /// A missing or malformed dataset file is fatal; a missing intents file
    /// only costs its entries.
    pub fn load<P: AsRef<Path>>(dataset_path: P, intents_path: P) -> Result<Self> {
        let dataset_path = dataset_path.as_ref();
        let content = read_to_string(dataset_path)
            .with_context(|| format!("Failed to read dataset file {:?}", dataset_path))?;
        let items: Vec<DatasetItem> = serde_json::from_str(&content)
            .with_context(|| format!("Malformed dataset file {:?}", dataset_path))?;

        let mut entries: Vec<QaEntry> = items
            .into_iter()
            .map(|item| QaEntry {
                question: item.question.to_lowercase(),
                answer: item.answer,
            })
            .collect();

        let intents_path = intents_path.as_ref();
        if intents_path.exists() {
            entries.extend(Self::load_intents(intents_path)?);
        } else {
            log::warn!("Intents file not found: {:?}", intents_path);
        }

        ensure!(!entries.is_empty(), "Corpus is empty after loading");
        log::info!("Loaded corpus with {} question/answer pairs", entries.len());
        Ok(Corpus { entries })
    }

    /// Each intent contributes one pattern/response pair per pattern, using
    /// only the first response.
    fn load_intents(path: &Path) -> Result<Vec<QaEntry>> {
        let content = read_to_string(path)
            .with_context(|| format!("Failed to read intents file {:?}", path))?;
        let file: IntentsFile = serde_json::from_str(&content)
            .with_context(|| format!("Malformed intents file {:?}", path))?;

        let mut entries = Vec::new();
        for intent in file.intents {
            let response = match intent.responses.first() {
                Some(r) => r.clone(),
                None => continue,
            };
            for pattern in intent.patterns {
                entries.push(QaEntry {
                    question: pattern.to_lowercase(),
                    answer: response.clone(),
                });
            }
        }
        Ok(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.answer.as_str())
    }

    pub fn question(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.question.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_dataset_and_appends_intents() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_file(
            &dir,
            "dataset.json",
            r#"[{"question": "What Is Rust?", "answer": "A systems language."}]"#,
        );
        let intents = write_file(
            &dir,
            "intents.json",
            r#"{"intents": [{"patterns": ["Hello", "Hi there"], "responses": ["Hey!", "Yo"]}]}"#,
        );

        let corpus = Corpus::load(&dataset, &intents).unwrap();
        assert_eq!(corpus.len(), 3);
        // Flat list first, lower-cased.
        assert_eq!(corpus.question(0), Some("what is rust?"));
        assert_eq!(corpus.answer(0), Some("A systems language."));
        // Intent patterns after, first response only.
        assert_eq!(corpus.question(1), Some("hello"));
        assert_eq!(corpus.answer(1), Some("Hey!"));
        assert_eq!(corpus.answer(2), Some("Hey!"));
    }

    #[test]
    fn missing_intents_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_file(
            &dir,
            "dataset.json",
            r#"[{"question": "ping", "answer": "pong"}]"#,
        );
        let corpus = Corpus::load(&dataset, &dir.path().join("absent.json")).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let intents = dir.path().join("also-nope.json");
        assert!(Corpus::load(&missing, &intents).is_err());
    }

    #[test]
    fn malformed_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_file(&dir, "dataset.json", "{not json");
        let intents = dir.path().join("absent.json");
        assert!(Corpus::load(&dataset, &intents).is_err());
    }
}

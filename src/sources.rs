//! External answer sources, probed in fixed priority order by the resolver.
//! Each source wraps one remote API behind the same capability interface and
//! downgrades every failure (network, status, parse, timeout) to `None`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(8);

#[async_trait]
pub trait AnswerSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn lookup(&self, query: &str) -> Option<String>;
}

/// Builds the default chain: Wikipedia summary, then DuckDuckGo instant
/// answers, then REST Countries facts.
pub fn default_sources(client: reqwest::Client) -> Vec<Box<dyn AnswerSource>> {
    vec![
        Box::new(WikipediaSource::new(client.clone())),
        Box::new(DuckDuckGoSource::new(client.clone())),
        Box::new(RestCountriesSource::new(client)),
    ]
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(SOURCE_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Strips question scaffolding ("what is", "who is", Hindi equivalents) so
/// the remaining words name the subject being asked about.
fn clean_query(query: &str) -> String {
    query
        .to_lowercase()
        .replace("tell me about ", "")
        .replace("what is ", "")
        .replace("who is ", "")
        .replace("kya hai", "")
        .replace("kaun hai", "")
        .trim()
        .to_string()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alternate spellings tried in order before a source gives up. Best-effort
/// recall booster, not a correctness requirement.
fn reformulations(query: &str) -> Vec<String> {
    let clean = clean_query(query);
    let mut variants = vec![
        clean.clone(),
        clean.replace(' ', "_"),
        title_case(&clean),
    ];
    variants.dedup();
    variants.retain(|v| !v.is_empty());
    variants
}

// --- Wikipedia ---

pub struct WikipediaSource {
    client: reqwest::Client,
}

impl WikipediaSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    const API: &'static str = "https://en.wikipedia.org/w/api.php";

    async fn search_titles(&self, term: &str) -> anyhow::Result<Vec<String>> {
        let data: Value = self
            .client
            .get(Self::API)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", "3"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let titles = data["query"]["search"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(titles)
    }

    async fn intro_extract(&self, title: &str) -> anyhow::Result<Option<String>> {
        let data: Value = self
            .client
            .get(Self::API)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", title),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsectionformat", "plain"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(pages) = data["query"]["pages"].as_object() {
            for page in pages.values() {
                if let Some(extract) = page["extract"].as_str() {
                    let extract = extract.trim();
                    // Skip stubs with no real content.
                    if extract.len() > 50 {
                        let mut text = extract.to_string();
                        if text.len() > 400 {
                            let cut = text
                                .char_indices()
                                .take_while(|(i, _)| *i < 400)
                                .last()
                                .map(|(i, c)| i + c.len_utf8())
                                .unwrap_or(0);
                            text.truncate(cut);
                            text.push_str("...");
                        }
                        return Ok(Some(format!("Wikipedia ({}): {}", title, text)));
                    }
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl AnswerSource for WikipediaSource {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    async fn lookup(&self, query: &str) -> Option<String> {
        for term in reformulations(query) {
            let titles = match self.search_titles(&term).await {
                Ok(titles) => titles,
                Err(err) => {
                    log::debug!("Wikipedia search failed for {:?}: {}", term, err);
                    continue;
                }
            };
            for title in titles {
                match self.intro_extract(&title).await {
                    Ok(Some(answer)) => return Some(answer),
                    Ok(None) => continue,
                    Err(err) => log::debug!("Wikipedia extract failed for {:?}: {}", title, err),
                }
            }
        }
        None
    }
}

// --- DuckDuckGo instant answers ---

pub struct DuckDuckGoSource {
    client: reqwest::Client,
}

impl DuckDuckGoSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn instant_answer(&self, query: &str) -> anyhow::Result<Option<String>> {
        let data: Value = self
            .client
            .get("https://api.duckduckgo.com/")
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(abstract_text) = non_empty(&data["Abstract"]) {
            return Ok(Some(abstract_text));
        }
        if let Some(definition) = non_empty(&data["Definition"]) {
            return Ok(Some(format!("Definition: {}", definition)));
        }
        if let Some(answer) = non_empty(&data["Answer"]) {
            return Ok(Some(format!("Answer: {}", answer)));
        }
        if let Some(related) = data["RelatedTopics"]
            .as_array()
            .and_then(|topics| topics.first())
            .and_then(|topic| topic["Text"].as_str())
            .filter(|s| !s.is_empty())
        {
            return Ok(Some(format!("Related: {}", related)));
        }
        Ok(None)
    }
}

#[async_trait]
impl AnswerSource for DuckDuckGoSource {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn lookup(&self, query: &str) -> Option<String> {
        match self.instant_answer(query).await {
            Ok(answer) => answer,
            Err(err) => {
                log::debug!("DuckDuckGo lookup failed: {}", err);
                None
            }
        }
    }
}

// --- REST Countries ---

const COUNTRY_TOPICS: &[&str] = &["country", "capital", "population", "currency"];

const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("india", "india"),
    ("usa", "united states"),
    ("america", "united states"),
    ("china", "china"),
    ("japan", "japan"),
    ("germany", "germany"),
    ("france", "france"),
    ("uk", "united kingdom"),
    ("britain", "united kingdom"),
];

/// Returns the API search name when the query both talks about country facts
/// and names a known country.
fn detect_country(query_lower: &str) -> Option<&'static str> {
    if !COUNTRY_TOPICS.iter().any(|t| query_lower.contains(t)) {
        return None;
    }
    COUNTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| query_lower.contains(keyword))
        .map(|(_, name)| *name)
}

pub struct RestCountriesSource {
    client: reqwest::Client,
}

impl RestCountriesSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn country_facts(&self, name: &str) -> anyhow::Result<Option<String>> {
        // Exact match for India, otherwise "indonesia" would shadow it.
        let url = if name == "india" {
            "https://restcountries.com/v3.1/name/india?fullText=true".to_string()
        } else {
            format!("https://restcountries.com/v3.1/name/{}", name)
        };

        let data: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let country = match data.as_array().and_then(|list| list.first()) {
            Some(country) => country,
            None => return Ok(None),
        };

        let display_name = country["name"]["common"].as_str().unwrap_or(name);
        let capital = country["capital"]
            .as_array()
            .and_then(|c| c.first())
            .and_then(|c| c.as_str())
            .unwrap_or("N/A");
        let population = country["population"].as_u64().unwrap_or(0);

        let currency = country["currencies"]
            .as_object()
            .and_then(|map| map.iter().next())
            .and_then(|(code, info)| {
                info["name"]
                    .as_str()
                    .map(|n| format!("{} ({})", n, code))
            })
            .unwrap_or_else(|| "N/A".to_string());

        Ok(Some(format!(
            "{}:\nCapital: {}\nPopulation: {}\nCurrency: {}",
            display_name, capital, population, currency
        )))
    }
}

#[async_trait]
impl AnswerSource for RestCountriesSource {
    fn name(&self) -> &'static str {
        "restcountries"
    }

    async fn lookup(&self, query: &str) -> Option<String> {
        let name = detect_country(&query.to_lowercase())?;
        match self.country_facts(name).await {
            Ok(answer) => answer,
            Err(err) => {
                log::debug!("REST Countries lookup failed for {:?}: {}", name, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_query_strips_question_scaffolding() {
        assert_eq!(clean_query("What is Python"), "python");
        assert_eq!(clean_query("tell me about gravity"), "gravity");
        assert_eq!(clean_query("delhi kya hai"), "delhi");
    }

    #[test]
    fn reformulations_include_underscore_and_title_variants() {
        let variants = reformulations("what is machine learning");
        assert_eq!(
            variants,
            vec!["machine learning", "machine_learning", "Machine Learning"]
        );
    }

    #[test]
    fn reformulations_skip_empty_queries() {
        assert!(reformulations("what is ").is_empty());
    }

    #[test]
    fn country_detection_needs_topic_and_name() {
        assert_eq!(detect_country("capital of france"), Some("france"));
        assert_eq!(detect_country("what currency does britain use"), Some("united kingdom"));
        // Country name without a country-facts topic is not enough.
        assert_eq!(detect_country("cricket in india"), None);
        // Topic without a known country name.
        assert_eq!(detect_country("capital of atlantis"), None);
    }
}

//! Best-effort content lookups (weather, quotes, jokes, currency, facts,
//! dictionary, news). Networked calls time out quickly and degrade to canned
//! content, so this layer never stalls or fails a request.

use chrono::Local;
use rand::seq::SliceRandom;
use serde_json::Value;

const FALLBACK_QUOTES: &[&str] = &[
    "\"The only way to do great work is to love what you do.\" — Steve Jobs",
    "\"Success is not final, failure is not fatal: it is the courage to continue that counts.\" — Winston Churchill",
    "\"The future belongs to those who believe in the beauty of their dreams.\" — Eleanor Roosevelt",
    "\"It is during our darkest moments that we must focus to see the light.\" — Aristotle",
    "\"Believe you can and you're halfway there.\" — Theodore Roosevelt",
];

const FALLBACK_JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem!",
    "Why do Java developers wear glasses? Because they can't C#!",
    "A SQL query goes into a bar, walks up to two tables and asks: 'Can I join you?'",
    "Why did the programmer quit his job? He didn't get arrays!",
];

const FALLBACK_FACTS: &[&str] = &[
    "The first computer bug was an actual bug: a moth found trapped in a Harvard computer in 1947!",
    "Python was named after the British comedy group Monty Python, not the snake!",
    "The term 'debugging' was coined by Admiral Grace Hopper in the 1940s!",
    "The first 1GB hard drive cost $40,000 and weighed over 500 pounds!",
    "More than 90% of the world's currency exists only on computers!",
];

const NEWS_SAMPLES: &[(&str, &str)] = &[
    ("AI Revolution in Education: New Tools Transform Learning", "Tech Today"),
    ("Python 3.12 Released with Enhanced Performance", "Developer News"),
    ("Machine Learning Breakthrough in Healthcare", "Science Daily"),
    ("New Coding Bootcamp Opens in Dehradun", "Local News"),
];

struct WeatherCondition {
    temp: &'static str,
    description: &'static str,
    suggestion: &'static str,
}

const WEATHER_CONDITIONS: &[WeatherCondition] = &[
    WeatherCondition {
        temp: "25\u{b0}C",
        description: "Clear sky",
        suggestion: "Perfect day for outdoor activities! Don't forget sunscreen.",
    },
    WeatherCondition {
        temp: "18\u{b0}C",
        description: "Light rain",
        suggestion: "Rainy day! Carry an umbrella and avoid the bike. The bus is safer today.",
    },
    WeatherCondition {
        temp: "22\u{b0}C",
        description: "Partly cloudy",
        suggestion: "Cloudy weather. Good day for studying indoors.",
    },
    WeatherCondition {
        temp: "12\u{b0}C",
        description: "Cold and windy",
        suggestion: "Cold weather! Wear warm clothes and carry a jacket.",
    },
];

/// Wraps the third-party content APIs behind one client with shared
/// timeouts.
pub struct MultiApiClient {
    client: reqwest::Client,
}

impl MultiApiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Keyword router mirroring the intent-free lookups: returns `None` when
    /// the input matches no content category, letting the resolver chain
    /// take over.
    pub async fn respond(&self, input: &str) -> Option<String> {
        let text = input.to_lowercase();

        if ["news", "headlines"].iter().any(|k| text.contains(k)) {
            return Some(self.news_headlines());
        }
        if ["quote", "motivation", "inspire", "motivate me"]
            .iter()
            .any(|k| text.contains(k))
        {
            return Some(self.motivational_quote().await);
        }
        if ["joke", "funny", "humor", "laugh", "hasao"]
            .iter()
            .any(|k| text.contains(k))
        {
            return Some(self.programming_joke().await);
        }
        if ["currency", "exchange rate", "dollar", "rupee"]
            .iter()
            .any(|k| text.contains(k))
        {
            return Some(self.currency_rates().await);
        }
        if ["fact", "did you know", "trivia"].iter().any(|k| text.contains(k)) {
            return Some(self.random_fact().await);
        }
        if let Some(word) = extract_definition_request(&text) {
            // A failed dictionary lookup falls through to the resolver chain
            // instead of answering with an error.
            return self.word_definition(&word).await;
        }

        None
    }

    /// Weather is served from a canned condition set; the city is only used
    /// for display.
    pub fn weather_report(&self, city: &str) -> String {
        let weather = WEATHER_CONDITIONS
            .choose(&mut rand::thread_rng())
            .unwrap_or(&WEATHER_CONDITIONS[0]);
        format!(
            "Weather update for {}:\nTemperature: {}\nCondition: {}\nSuggestion: {}\nUpdated: {}",
            city,
            weather.temp,
            weather.description,
            weather.suggestion,
            Local::now().format("%H:%M"),
        )
    }

    pub fn news_headlines(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut picks: Vec<&(&str, &str)> = NEWS_SAMPLES.iter().collect();
        picks.shuffle(&mut rng);

        let mut result = String::from("Latest technology news:\n");
        for (i, (title, source)) in picks.iter().take(3).enumerate() {
            result.push_str(&format!("{}. {} ({})\n", i + 1, title, source));
        }
        result
    }

    pub async fn motivational_quote(&self) -> String {
        match self.fetch_quote().await {
            Ok(quote) => quote,
            Err(err) => {
                log::debug!("Quote API failed: {}", err);
                let quote = FALLBACK_QUOTES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(FALLBACK_QUOTES[0]);
                format!("Daily motivation:\n{}", quote)
            }
        }
    }

    async fn fetch_quote(&self) -> anyhow::Result<String> {
        let data: Value = self
            .client
            .get("https://api.quotable.io/random")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let content = data["content"].as_str().unwrap_or_default();
        let author = data["author"].as_str().unwrap_or("Unknown");
        anyhow::ensure!(!content.is_empty(), "quote payload missing content");
        Ok(format!("Daily motivation:\n\"{}\" — {}", content, author))
    }

    pub async fn programming_joke(&self) -> String {
        match self.fetch_joke().await {
            Ok(joke) => joke,
            Err(err) => {
                log::debug!("Joke API failed: {}", err);
                let joke = FALLBACK_JOKES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(FALLBACK_JOKES[0]);
                format!("Programming humor:\n{}", joke)
            }
        }
    }

    async fn fetch_joke(&self) -> anyhow::Result<String> {
        let data: Value = self
            .client
            .get("https://v2.jokeapi.dev/joke/Programming,Miscellaneous")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let joke = if data["type"] == "single" {
            data["joke"].as_str().unwrap_or_default().to_string()
        } else {
            format!(
                "{}\n{}",
                data["setup"].as_str().unwrap_or_default(),
                data["delivery"].as_str().unwrap_or_default()
            )
        };
        anyhow::ensure!(!joke.trim().is_empty(), "joke payload missing text");
        Ok(format!("Programming humor:\n{}", joke))
    }

    pub async fn currency_rates(&self) -> String {
        match self.fetch_currency_rates().await {
            Ok(rates) => rates,
            Err(err) => {
                log::debug!("Currency API failed: {}", err);
                "Currency rates (approximate):\nUSD to INR: ~83.00\nUSD to EUR: ~0.85\nUSD to GBP: ~0.73".to_string()
            }
        }
    }

    async fn fetch_currency_rates(&self) -> anyhow::Result<String> {
        let data: Value = self
            .client
            .get("https://api.exchangerate-api.com/v4/latest/USD")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let display = [
            ("INR", "Indian Rupee"),
            ("EUR", "Euro"),
            ("GBP", "British Pound"),
            ("JPY", "Japanese Yen"),
            ("CAD", "Canadian Dollar"),
        ];

        let mut result = String::from("Currency exchange rates (base USD):\n");
        let mut found = false;
        for (code, name) in display {
            if let Some(rate) = data["rates"][code].as_f64() {
                result.push_str(&format!("{} ({}): {:.2}\n", code, name, rate));
                found = true;
            }
        }
        anyhow::ensure!(found, "currency payload missing rates");
        Ok(result)
    }

    pub async fn random_fact(&self) -> String {
        match self.fetch_fact().await {
            Ok(fact) => fact,
            Err(err) => {
                log::debug!("Facts API failed: {}", err);
                let fact = FALLBACK_FACTS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(FALLBACK_FACTS[0]);
                format!("Did you know?\n{}", fact)
            }
        }
    }

    async fn fetch_fact(&self) -> anyhow::Result<String> {
        let data: Value = self
            .client
            .get("https://uselessfacts.jsph.pl/random.json?language=en")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let text = data["text"].as_str().unwrap_or_default();
        anyhow::ensure!(!text.is_empty(), "fact payload missing text");
        Ok(format!("Did you know?\n{}", text))
    }

    pub async fn word_definition(&self, word: &str) -> Option<String> {
        match self.fetch_definition(word).await {
            Ok(definition) => definition,
            Err(err) => {
                log::debug!("Dictionary lookup failed for {:?}: {}", word, err);
                None
            }
        }
    }

    async fn fetch_definition(&self, word: &str) -> anyhow::Result<Option<String>> {
        let url = format!(
            "https://api.dictionaryapi.dev/api/v2/entries/en/{}",
            word.to_lowercase()
        );
        let data: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entry = match data.as_array().and_then(|list| list.first()) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let mut result = format!("Definition of '{}':\n", word);
        if let Some(phonetic) = entry["phonetic"].as_str() {
            result.push_str(&format!("Pronunciation: {}\n", phonetic));
        }

        let mut any_definition = false;
        if let Some(meanings) = entry["meanings"].as_array() {
            for meaning in meanings.iter().take(2) {
                if let Some(part) = meaning["partOfSpeech"].as_str() {
                    result.push_str(&format!("{}:\n", part));
                }
                if let Some(definitions) = meaning["definitions"].as_array() {
                    for definition in definitions.iter().take(2) {
                        if let Some(text) = definition["definition"].as_str() {
                            result.push_str(&format!("- {}\n", text));
                            any_definition = true;
                        }
                        if let Some(example) = definition["example"].as_str() {
                            result.push_str(&format!("  Example: {}\n", example));
                        }
                    }
                }
            }
        }

        if any_definition {
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }
}

/// Detects the requested city from the input, defaulting to Dehradun.
pub fn weather_city(text_lower: &str) -> &'static str {
    if text_lower.contains("delhi") {
        "Delhi"
    } else if text_lower.contains("mumbai") {
        "Mumbai"
    } else if text_lower.contains("bangalore") {
        "Bangalore"
    } else {
        "Dehradun"
    }
}

/// Pulls the word to define out of explicit dictionary requests. Bare
/// "what is ..." questions are left to the resolver chain on purpose.
fn extract_definition_request(text_lower: &str) -> Option<String> {
    for marker in ["define ", "definition of ", "meaning of "] {
        if let Some(pos) = text_lower.find(marker) {
            let word = text_lower[pos + marker.len()..]
                .trim()
                .trim_end_matches(['?', '.', '!'])
                .to_string();
            if !word.is_empty() {
                return Some(word);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_city_detection() {
        assert_eq!(weather_city("weather in delhi please"), "Delhi");
        assert_eq!(weather_city("mumbai weather"), "Mumbai");
        assert_eq!(weather_city("weather kaisa hai"), "Dehradun");
    }

    #[test]
    fn definition_requests_need_an_explicit_marker() {
        assert_eq!(
            extract_definition_request("define algorithm"),
            Some("algorithm".to_string())
        );
        assert_eq!(
            extract_definition_request("meaning of serendipity?"),
            Some("serendipity".to_string())
        );
        // General questions are not dictionary lookups.
        assert_eq!(extract_definition_request("what is python"), None);
        assert_eq!(extract_definition_request("define "), None);
    }

    #[test]
    fn weather_report_names_the_city() {
        let apis = MultiApiClient::new(reqwest::Client::new());
        let report = apis.weather_report("Dehradun");
        assert!(report.contains("Weather update for Dehradun"));
        assert!(report.contains("Temperature:"));
    }

    #[test]
    fn news_headlines_list_three_items() {
        let apis = MultiApiClient::new(reqwest::Client::new());
        let news = apis.news_headlines();
        assert!(news.contains("1."));
        assert!(news.contains("3."));
    }

    #[tokio::test]
    async fn respond_ignores_unrelated_input() {
        let apis = MultiApiClient::new(reqwest::Client::new());
        assert_eq!(apis.respond("what is the capital of france").await, None);
    }
}

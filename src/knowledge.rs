//! Last-resort knowledge table: an ordered keyword-rule list plus a
//! templated terminal answer, guaranteeing a non-empty response for any
//! input whatsoever.

use crate::tfidf;
use once_cell::sync::Lazy;

/// How a rule's keywords must relate to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeywordMatch {
    /// Every keyword must appear in the query.
    All,
    /// Any single keyword suffices.
    Any,
}

pub struct FallbackRule {
    pub keywords: &'static [&'static str],
    pub mode: KeywordMatch,
    pub answer: &'static str,
}

impl FallbackRule {
    /// Single-word keywords match whole tokens, so "css" hits "css kya hai"
    /// without also hitting words that merely contain the letters. Phrases
    /// match as substrings of the lowercased query.
    fn matches(&self, query_lower: &str, tokens: &[String]) -> bool {
        let hit = |keyword: &str| {
            if keyword.contains(' ') {
                query_lower.contains(keyword)
            } else {
                tokens.iter().any(|t| t.as_str() == keyword)
            }
        };
        match self.mode {
            KeywordMatch::All => self.keywords.iter().all(|k| hit(k)),
            KeywordMatch::Any => self.keywords.iter().any(|k| hit(k)),
        }
    }
}

const fn any(keywords: &'static [&'static str], answer: &'static str) -> FallbackRule {
    FallbackRule {
        keywords,
        mode: KeywordMatch::Any,
        answer,
    }
}

const fn all(keywords: &'static [&'static str], answer: &'static str) -> FallbackRule {
    FallbackRule {
        keywords,
        mode: KeywordMatch::All,
        answer,
    }
}

/// Evaluation order matters: specific facts come before the broad category
/// rules whose keyword sets overlap them (the "prime minister" rules must
/// win over anything keyed on "india" alone).
static FALLBACK_RULES: Lazy<Vec<FallbackRule>> = Lazy::new(|| {
    vec![
        // Political leaders
        any(
            &["prime minister", "pm of india", "narendra modi", "pradhan mantri", "pm india"],
            "Prime Minister of India: Narendra Modi has been serving as the Prime Minister of \
             India since May 2014. He is the leader of the Bharatiya Janata Party (BJP) and \
             previously served as Chief Minister of Gujarat from 2001 to 2014.",
        ),
        any(
            &["president of india", "president india", "rashtrapati"],
            "President of India: Droupadi Murmu is the 15th President of India, serving since \
             July 2022. She is the first tribal woman to hold this office and previously served \
             as Governor of Jharkhand.",
        ),
        any(
            &["capital of india", "india capital"],
            "Capital of India: New Delhi is the capital of India. It serves as the seat of all \
             three branches of the Government of India and was designed by British architects \
             Edwin Lutyens and Herbert Baker.",
        ),
        // Technology
        any(
            &["python programming", "what is python"],
            "Python: Python is a high-level, interpreted programming language created by Guido \
             van Rossum in 1991. It is known for its simple syntax and is widely used in web \
             development, data science, AI, automation, and scientific computing.",
        ),
        any(
            &["artificial intelligence", "what is ai"],
            "Artificial Intelligence: AI is the simulation of human intelligence in machines \
             programmed to think and learn. It includes machine learning, natural language \
             processing, computer vision, and robotics.",
        ),
        any(
            &["machine learning", "what is ml"],
            "Machine Learning: ML is a subset of AI that enables computers to learn and improve \
             from data without being explicitly programmed. It uses algorithms to find patterns \
             in data and make predictions or decisions.",
        ),
        any(
            &["blockchain"],
            "Blockchain: A distributed ledger technology that maintains a continuously growing \
             list of records linked and secured using cryptography. Foundation of \
             cryptocurrencies like Bitcoin, also used in supply chains and smart contracts.",
        ),
        // Science
        any(
            &["speed of light", "light speed"],
            "Speed of Light: The speed of light in vacuum is exactly 299,792,458 meters per \
             second (approximately 300,000 km/s). It is a fundamental constant in physics and \
             the maximum speed at which information can travel.",
        ),
        any(
            &["gravity", "gravitational force"],
            "Gravity: Gravity is a fundamental force that attracts objects with mass toward \
             each other. On Earth it accelerates objects at 9.8 m/s\u{b2}. It was described by \
             Newton and later explained by Einstein's general relativity.",
        ),
        any(
            &["photosynthesis"],
            "Photosynthesis: The process by which plants convert sunlight, carbon dioxide, and \
             water into glucose and oxygen. Essential for life on Earth as it produces both \
             oxygen and food.",
        ),
        any(
            &["dna"],
            "DNA (Deoxyribonucleic Acid): The molecule that carries genetic instructions for \
             all living organisms. Its double helix structure was discovered by Watson and \
             Crick; it contains four bases: A, T, G, C.",
        ),
        // Geography
        any(
            &["largest country", "biggest country"],
            "Largest Country: Russia is the largest country in the world by land area, covering \
             17.1 million square kilometers and spanning 11 time zones.",
        ),
        any(
            &["highest mountain", "tallest mountain", "mount everest"],
            "Highest Mountain: Mount Everest is the highest mountain above sea level at \
             8,848.86 meters (29,031.7 feet), located in the Himalayas on the border between \
             Nepal and Tibet.",
        ),
        all(
            &["india", "country"],
            "India: World's largest democracy and second-most populous country. Capital: New \
             Delhi. Known for its diverse culture, ancient history, IT industry, and economic \
             growth.",
        ),
        all(
            &["china", "country"],
            "China: World's most populous country and second-largest economy. Capital: \
             Beijing. An ancient civilization with over 5000 years of history and a major \
             manufacturing hub.",
        ),
        // Famous people
        any(
            &["albert einstein", "einstein"],
            "Albert Einstein (1879-1955): German-born theoretical physicist who developed the \
             theory of relativity, famous for the equation E=mc\u{b2}. Won the Nobel Prize in \
             Physics in 1921.",
        ),
        any(
            &["mahatma gandhi", "gandhi"],
            "Mahatma Gandhi (1869-1948): Indian independence leader known for non-violent \
             resistance. Led India's independence movement against British rule and is known as \
             the Father of the Nation in India.",
        ),
        any(
            &["abdul kalam"],
            "Dr. APJ Abdul Kalam (1931-2015): Indian aerospace scientist and 11th President of \
             India. Known as the Missile Man of India for his work on ballistic missile and \
             launch vehicle technology.",
        ),
        any(
            &["steve jobs"],
            "Steve Jobs (1955-2011): Co-founder and CEO of Apple Inc. A revolutionary figure in \
             personal computing, smartphones, and digital entertainment, known for the iPhone, \
             iPad, and Mac computers.",
        ),
        any(
            &["bill gates"],
            "Bill Gates: Co-founder of Microsoft Corporation and major philanthropist through \
             the Bill & Melinda Gates Foundation, focusing on global health and education.",
        ),
        any(
            &["elon musk"],
            "Elon Musk: Entrepreneur and business magnate, CEO of Tesla and SpaceX. Also \
             co-founded PayPal and Neuralink, known for ambitious goals like Mars colonization \
             and sustainable energy.",
        ),
        // Programming languages and web tech
        any(
            &["javascript"],
            "JavaScript: A versatile programming language primarily used for web development. \
             It enables interactive web pages and runs in browsers and servers (Node.js).",
        ),
        any(
            &["java programming"],
            "Java: An object-oriented programming language developed by Sun Microsystems in \
             1995, known for its 'write once, run anywhere' philosophy. Widely used in \
             enterprise applications and Android development.",
        ),
        any(
            &["html"],
            "HTML: HyperText Markup Language is the standard markup language for creating web \
             pages. It describes the structure and content of web documents using tags and \
             elements.",
        ),
        any(
            &["css"],
            "CSS: Cascading Style Sheets are used to style and lay out web pages, controlling \
             colors, fonts, spacing, and positioning of HTML elements.",
        ),
        // Broad categories, checked after every specific rule
        any(
            &["programming", "coding", "software", "development"],
            "Programming: The process of creating instructions for computers using programming \
             languages like Python, Java, JavaScript, and C++. It involves problem-solving, \
             algorithm design, and building software applications and systems.",
        ),
        any(
            &["computer", "laptop", "hardware"],
            "Computer: An electronic device that processes data using binary code. Main \
             components include the CPU, RAM, storage, motherboard, and input/output devices.",
        ),
        any(
            &["internet", "web", "website"],
            "Internet: A global network of interconnected computers that communicate using \
             standardized protocols, enabling email, web browsing, social media, and \
             information sharing. It grew out of ARPANET in the 1960s.",
        ),
        any(
            &["space", "universe", "galaxy", "solar system"],
            "Space/Universe: The vast expanse containing all matter, energy, planets, stars, \
             and galaxies. Our solar system has 8 planets orbiting the Sun, and the universe is \
             approximately 13.8 billion years old.",
        ),
        any(
            &["ocean", "sea", "water"],
            "Ocean: Large bodies of saltwater covering 71% of Earth's surface, split across \
             five major oceans: Pacific, Atlantic, Indian, Arctic, and Southern. Oceans \
             regulate climate and host diverse marine life.",
        ),
        any(
            &["climate", "weather", "global warming"],
            "Climate: Long-term weather patterns in a region. Global warming refers to rising \
             Earth temperatures caused by greenhouse gases from human activities such as \
             burning fossil fuels and deforestation.",
        ),
        any(
            &["history", "ancient", "civilization"],
            "History: The study of past events, civilizations, and human development. Ancient \
             civilizations include Mesopotamia, Egypt, the Indus Valley, Greece, and Rome.",
        ),
        any(
            &["culture", "tradition", "festival"],
            "Culture: The shared beliefs, customs, arts, and social behaviors of a group, \
             including language, religion, food, music, and traditions.",
        ),
        any(
            &["education", "learning", "study", "school", "college"],
            "Education: The process of acquiring knowledge, skills, and values through teaching \
             and learning, spanning formal education and informal learning. Essential for \
             personal development and societal progress.",
        ),
        any(
            &["mathematics", "math", "algebra", "geometry"],
            "Mathematics: The study of numbers, shapes, patterns, and logical reasoning, with \
             branches including arithmetic, algebra, geometry, calculus, and statistics.",
        ),
        any(
            &["health", "medicine", "doctor", "hospital"],
            "Health/Medicine: The science of maintaining physical and mental well-being, \
             covering prevention, diagnosis, and treatment of disease with evidence-based \
             practices.",
        ),
        any(
            &["exercise", "fitness", "sports"],
            "Exercise/Fitness: Physical activity that improves health, strength, and \
             endurance, with benefits for cardiovascular health, muscles, and mental health. \
             About 150 minutes weekly is recommended.",
        ),
        any(
            &["business", "company", "entrepreneur"],
            "Business: An organization engaged in commercial activities to provide goods or \
             services. Entrepreneurship involves starting and managing businesses, taking \
             risks, and creating value.",
        ),
        any(
            &["money", "economy", "finance", "bank"],
            "Economy/Finance: The system of production, distribution, and consumption of goods \
             and services. Money serves as the medium of exchange, and banks provide services \
             like loans, savings, and investment.",
        ),
    ]
});

/// Short words and question scaffolding excluded when extracting the topic
/// for the terminal template.
const TEMPLATE_STOPWORDS: &[&str] = &[
    "what", "who", "where", "when", "why", "how", "tell", "about", "the", "and", "for", "with",
];

/// Picks up to two meaningful tokens (longer than 3 characters, not
/// stopwords) to stand in as the query's topic.
fn extract_topic(query: &str) -> Option<String> {
    let cleaned = query.replace(['?', '.'], "");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.len() > 3 && !TEMPLATE_STOPWORDS.contains(&w.to_lowercase().as_str()))
        .take(2)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Resolves any query to a canned or templated answer. Total: never returns
/// an empty string, whatever the input.
pub fn resolve(query: &str) -> String {
    let query_lower = query.to_lowercase();
    let tokens = tfidf::tokenize(query);

    for rule in FALLBACK_RULES.iter() {
        if rule.matches(&query_lower, &tokens) {
            return rule.answer.to_string();
        }
    }

    match extract_topic(query) {
        Some(topic) => format!(
            "About {topic}: this is an interesting topic with multiple aspects to explore. For \
             comprehensive and up-to-date information about {lower}, I recommend checking \
             educational resources, official websites, or academic sources. If you have a more \
             specific question about {lower}, feel free to ask!",
            topic = topic,
            lower = topic.to_lowercase(),
        ),
        None => "That's a thoughtful inquiry. While I may not have the exact details you're \
                 looking for right now, I recommend checking reliable educational sources for \
                 the most accurate information. Feel free to ask a more specific question!"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_rule_has_canonical_definition() {
        let answer = resolve("What is Python programming?");
        assert!(answer.contains("high-level, interpreted programming language"));
    }

    #[test]
    fn prime_minister_wins_over_country_rules() {
        let answer = resolve("who is the prime minister of india");
        assert!(answer.contains("Narendra Modi"));
    }

    #[test]
    fn all_mode_requires_every_keyword() {
        // "india" alone must not trigger the country rule.
        let answer = resolve("india");
        assert!(!answer.contains("largest democracy"));
        let answer = resolve("tell me about the country india");
        assert!(answer.contains("largest democracy"));
    }

    #[test]
    fn category_rule_catches_generic_programming_talk() {
        let answer = resolve("i want to learn coding someday");
        assert!(answer.contains("Programming:"));
    }

    #[test]
    fn single_word_keywords_match_whole_tokens() {
        // Queries that begin with the term must still hit the rule.
        assert!(resolve("html kya hai").contains("HyperText Markup Language"));
        assert!(resolve("css").contains("Cascading Style Sheets"));
        assert!(resolve("what is html?").contains("HyperText Markup Language"));
        // A word that merely contains a keyword must not trigger it.
        assert!(!resolve("webinar xyzzy").contains("Internet:"));
    }

    #[test]
    fn terminal_template_names_the_topic() {
        let answer = resolve("What about quantum entanglement?");
        assert!(answer.contains("quantum entanglement"));
    }

    #[test]
    fn resolve_is_total() {
        for query in ["", "   ", "?!.,;", "xyzzy", "a b c d", "\n\t"] {
            assert!(!resolve(query).is_empty(), "empty answer for {:?}", query);
        }
    }
}

use crate::corpus::Corpus;
use crate::knowledge;
use crate::matcher::DatasetMatcher;
use crate::sources::AnswerSource;

/// Three-tier cascading resolver: dataset match, then external sources in
/// priority order, then the knowledge fallback table. Whichever tier first
/// produces output wins; the final tier is total, so every query yields a
/// non-empty answer.
pub struct ResponseResolver {
    corpus: Corpus,
    matcher: DatasetMatcher,
    sources: Vec<Box<dyn AnswerSource>>,
}

impl ResponseResolver {
    pub fn new(corpus: Corpus, threshold: f32, sources: Vec<Box<dyn AnswerSource>>) -> Self {
        let matcher = DatasetMatcher::new(&corpus, threshold);
        ResponseResolver {
            corpus,
            matcher,
            sources,
        }
    }

    pub async fn resolve(&self, query: &str) -> String {
        let query = query.to_lowercase();

        if let Some(answer) = self.matcher.answer(&self.corpus, &query) {
            log::info!("Answered from dataset");
            return answer.to_string();
        }

        for source in &self.sources {
            log::debug!("Probing source {:?}", source.name());
            if let Some(answer) = source.lookup(&query).await {
                log::info!("Answered from source {:?}", source.name());
                return answer;
            }
        }

        log::info!("Answered from knowledge fallback table");
        knowledge::resolve(&query)
    }
}

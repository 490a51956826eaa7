use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

mod apis;
mod assistant;
mod corpus;
mod intent;
mod knowledge;
mod matcher;
mod resolver;
mod sources;
mod store;
mod tfidf;

use apis::MultiApiClient;
use assistant::Assistant;
use corpus::Corpus;
use resolver::ResponseResolver;
use store::Store;

#[derive(Deserialize)]
struct AskRequest {
    user_input: String,
}

#[derive(Serialize)]
struct AskResponse {
    response: String,
}

#[post("/ask")]
async fn ask_endpoint(
    req: web::Json<AskRequest>,
    data: web::Data<Mutex<Assistant>>,
) -> impl Responder {
    // The guard stays held across the awaited resolution, so the lock must
    // be the async kind: a blocking lock here would pin the worker thread
    // while a slow external lookup is in flight.
    let mut assistant = data.lock().await;
    let response = assistant.handle_input(&req.user_input).await;
    HttpResponse::Ok().json(AskResponse { response })
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("Config"))
        .build()?;

    let data_conf = settings.get_table("data")?;
    let dataset_file = data_conf["dataset_file"].clone().into_string()?;
    let intents_file = data_conf["intents_file"].clone().into_string()?;

    let logic_conf = settings.get_table("logic")?;
    let similarity_threshold = logic_conf["similarity_threshold"].clone().into_float()? as f32;

    let store_conf = settings.get_table("store")?;
    let store_file = store_conf["data_file"].clone().into_string()?;

    // A bad corpus is the one acceptable fatal condition: abort startup
    // rather than serve from nothing.
    let corpus = Corpus::load(&dataset_file, &intents_file)?;
    log::info!(
        "Initializing assistant with {} corpus entries, similarity threshold {}",
        corpus.len(),
        similarity_threshold
    );

    let client = sources::http_client();
    let resolver = ResponseResolver::new(
        corpus,
        similarity_threshold,
        sources::default_sources(client.clone()),
    );
    let store = Store::open(&store_file)?;
    let apis = MultiApiClient::new(client);
    let data = web::Data::new(Mutex::new(Assistant::new(resolver, store, apis)));

    let server_conf = settings.get_table("server")?;
    let host = server_conf["host"].clone().into_string()?;
    let port = server_conf["port"].clone().into_int()? as u16;

    log::info!("Starting server at http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(index)
            .service(ask_endpoint)
    })
    .bind((host, port))?
    .run()
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::AnswerSource;
    use actix_web::test;
    use async_trait::async_trait;
    use std::io::Write;
    use std::time::Duration;

    struct SlowSource;

    #[async_trait]
    impl AnswerSource for SlowSource {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn lookup(&self, _query: &str) -> Option<String> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Some("eventually".to_string())
        }
    }

    fn slow_assistant(dir: &tempfile::TempDir) -> Assistant {
        let dataset_path = dir.path().join("dataset.json");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        file.write_all(br#"[{"question": "what is your name", "answer": "I'm Sahayak."}]"#)
            .unwrap();
        let corpus = Corpus::load(&dataset_path, &dir.path().join("absent.json")).unwrap();

        let resolver = ResponseResolver::new(corpus, 0.85, vec![Box::new(SlowSource)]);
        let store = Store::open(dir.path().join("data.json")).unwrap();
        let apis = MultiApiClient::new(reqwest::Client::new());
        Assistant::new(resolver, store, apis)
    }

    #[actix_web::test]
    async fn slow_lookups_do_not_wedge_a_worker() {
        let dir = tempfile::tempdir().unwrap();
        let data = web::Data::new(Mutex::new(slow_assistant(&dir)));
        let app = test::init_service(App::new().app_data(data).service(ask_endpoint)).await;

        // Two requests race on one thread, the way they would on a single
        // actix worker. The shared lock has to yield while the slow lookup
        // is awaited; a blocking lock would stall the thread and neither
        // request would ever finish.
        let ask = || async {
            let req = test::TestRequest::post()
                .uri("/ask")
                .set_json(serde_json::json!({ "user_input": "what is quantum computing" }))
                .to_request();
            test::call_service(&app, req).await
        };
        let both = async { tokio::join!(ask(), ask()) };
        let (first, second) = tokio::time::timeout(Duration::from_secs(5), both)
            .await
            .expect("requests deadlocked on the shared assistant lock");
        assert!(first.status().is_success());
        assert!(second.status().is_success());
    }
}

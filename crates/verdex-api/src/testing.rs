//! Shared harness for the route module tests: canned catalog tables, a
//! scripted model client, and request/response helpers.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;

use verdex_catalog::CatalogStore;
use verdex_feedback::FeedbackStore;
use verdex_model::{CompletionRequest, ModelClient, ModelError};
use verdex_pipeline::CheckEngine;

use crate::config::ApiConfig;
use crate::state::AppState;

/// Model double that replays a fixed script.
///
/// `Some(text)` completes with that text, `None` fails with an outage.
/// Running past the end of the script panics: the test promised fewer
/// calls than the code made.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Option<String>>>,
    pub(crate) requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Option<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client for routes that must never reach the model.
    pub(crate) fn unused() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(ModelError::Unavailable {
                reason: "scripted outage".into(),
            }),
            None => panic!("model called more times than the script allows"),
        }
    }

    fn client_name(&self) -> &str {
        "scripted"
    }
}

/// A verdict payload the evaluator parses cleanly.
pub(crate) fn verdict_reply(status: &str) -> Option<String> {
    Some(format!(
        r#"{{"compliance_status":"{status}","reasoning":"scripted reasoning","recommendations":["scripted recommendation"]}}"#
    ))
}

/// A screening payload naming the given law titles.
pub(crate) fn titles_reply(titles: &[&str]) -> Option<String> {
    Some(format!(r#"{{"relevant_laws":{}}}"#, serde_json::to_string(titles).unwrap()))
}

/// Write the standard two-law, one-feature tables into `dir`.
pub(crate) fn write_tables(dir: &Path) {
    fs::write(
        dir.join("laws.csv"),
        "id,title,description,jurisdiction\n\
         EU-2016-679,GDPR,EU data protection regulation,EU\n\
         US-CA-1798,CCPA,California privacy act,US-CA\n",
    )
    .unwrap();
    fs::write(
        dir.join("features.csv"),
        "name,description\nDark Mode,Inverts the palette\n",
    )
    .unwrap();
}

/// Build an [`AppState`] over stores rooted in `dir` and the given client.
pub(crate) fn test_state(dir: &Path, client: Arc<ScriptedClient>) -> AppState {
    let catalog = Arc::new(CatalogStore::load(
        dir.join("laws.csv"),
        dir.join("features.csv"),
        ',',
    ));
    let feedback = Arc::new(FeedbackStore::open(dir.join("feedback.json")).unwrap());
    let engine = Arc::new(CheckEngine::new(
        Arc::clone(&catalog),
        Arc::clone(&feedback),
        client,
    ));
    AppState::new(
        ApiConfig {
            laws_path: dir.join("laws.csv"),
            features_path: dir.join("features.csv"),
            delimiter: ',',
            feedback_path: dir.join("feedback.json"),
            bind_addr: "127.0.0.1:0".into(),
        },
        catalog,
        feedback,
        engine,
    )
}

pub(crate) fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn patch_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn delete_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

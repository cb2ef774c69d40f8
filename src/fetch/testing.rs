//! Scripted [`HttpClient`] for unit tests.

use super::HttpClient;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers requests from per-route response queues.
///
/// A request is routed to the first registered needle contained in its URL.
/// Each route pops its queue in order and repeats the last response once only
/// one is left. Unrouted requests get an empty 404.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    routes: Mutex<Vec<(String, VecDeque<(u16, String)>)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, needle: &str, status: u16, body: &str) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(n, _)| n == needle) {
                Some((_, queue)) => queue.push_back((status, body.to_string())),
                None => routes.push((
                    needle.to_string(),
                    VecDeque::from([(status, body.to_string())]),
                )),
            }
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let url = req.url().to_string();
        self.calls.lock().unwrap().push(url.clone());

        let (status, body) = {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(n, _)| url.contains(n.as_str())) {
                Some((_, queue)) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some((_, queue)) => queue.front().cloned().unwrap(),
                None => (404, String::new()),
            }
        };

        let resp = http::Response::builder()
            .status(status)
            .body(body)
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

//! Scripted upstream double shared by the integration tests

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cricfeed::upstream::{Upstream, UpstreamError};

/// Canned behavior for one URL
#[allow(dead_code)]
pub enum Script {
    /// Respond with this body
    Body(String),
    /// Fail with this HTTP status
    HttpError(u16),
    /// Fail at the transport level
    Down,
}

/// Counting upstream double with scripted per-URL responses
///
/// Unscripted URLs get a small JSON body echoing the URL, so catalog tests
/// can assert which resource was resolved. Clones share the same call
/// counter and script table.
#[derive(Clone, Default)]
pub struct ScriptedUpstream {
    calls: Arc<AtomicUsize>,
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upstream call take `delay`, to widen concurrency windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Scripts a success body for `url`
    pub fn serve(&self, url: &str, body: &str) {
        self.script(url, Script::Body(body.to_string()));
    }

    /// Scripts an arbitrary behavior for `url`
    pub fn script(&self, url: &str, script: Script) {
        self.scripts.lock().expect("scripts lock").insert(url.to_string(), script);
    }

    /// Upstream calls observed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Upstream for ScriptedUpstream {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, UpstreamError>> + Send {
        let url = url.to_string();
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let scripts = self.scripts.lock().expect("scripts lock");
            match scripts.get(&url) {
                Some(Script::Body(body)) => Ok(body.clone()),
                Some(Script::HttpError(status)) => Err(UpstreamError::Http {
                    status: *status,
                    body: "scripted failure".to_string(),
                }),
                Some(Script::Down) => {
                    Err(UpstreamError::Transport("connection refused".to_string()))
                }
                None => Ok(format!("{{\"url\":\"{url}\"}}")),
            }
        }
    }
}

//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shop_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};

use crate::badge::CartListener;

pub(crate) enum Reply {
    Respond(u16, &'static str),
    Fail,
    Hang,
}

/// Answers requests from a fixed script, in order, and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// `(method, path suffix after the base URL)` of every request sent.
    pub(crate) fn sent(&self) -> Vec<(HttpMethod, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|req| (req.method, req.path.trim_start_matches(BASE_URL).to_string()))
            .collect()
    }
}

pub(crate) const BASE_URL: &str = "http://shop.test/api";

#[async_trait]
impl crate::transport::Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }),
            Some(Reply::Fail) => Err(ApiError::Transport("connection refused".to_string())),
            Some(Reply::Hang) => std::future::pending().await,
            None => panic!("unscripted request"),
        }
    }
}

#[derive(Default)]
pub(crate) struct CountingListener {
    calls: AtomicUsize,
}

impl CountingListener {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartListener for CountingListener {
    async fn cart_changed(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

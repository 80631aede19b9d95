//! Scripted transport for exercising retry and cache paths without a network.

use super::client::{RawResponse, Transport};
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

/// One scripted outcome
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Respond(u16, String),
    Fail(String),
}

/// Plays back scripted outcomes in order, repeating the last one forever
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub(crate) fn sequence(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always(status: u16, body: &str) -> Self {
        Self::sequence(vec![Scripted::Respond(status, body.to_string())])
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        // Suspend like a real request so concurrent callers interleave
        tokio::task::yield_now().await;

        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(Scripted::Respond(status, body)) => Ok(RawResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body,
            )),
            Some(Scripted::Fail(reason)) => Err(FetchError::Network(reason)),
            None => Err(FetchError::Network("empty script".to_string())),
        }
    }
}

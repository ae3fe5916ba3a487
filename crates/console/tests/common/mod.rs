//! Shared fixtures for the console integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aml_console::{Console, ConsoleConfig};
use aml_console_client::{ApiRequest, ApiResponse, ComplianceClient, Error, Transport};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

/// Answers requests from a script keyed by `"METHOD path"` and records every
/// request as `"METHOD uri"`.
///
/// Each route holds a queue of replies; the last one repeats. Unscripted
/// routes answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, route: &str, status: u16, body: &str) -> &Self {
        self.on_delayed(route, Duration::ZERO, status, body)
    }

    pub fn on_delayed(&self, route: &str, delay: Duration, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route.to_owned())
            .or_default()
            .push_back(Reply {
                status,
                body: body.to_owned(),
                delay,
            });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Requests whose `"METHOD uri"` starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn next_reply(&self, route: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(route) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Reply {
                status: 404,
                body: format!("no route for {route}"),
                delay: Duration::ZERO,
            },
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let route = format!("{} {}", request.method, request.path);
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method, request.uri()));
        let reply = self.next_reply(&route);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(ApiResponse::new(reply.status, reply.body))
    }
}

/// 2024-03-10 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

pub fn console(transport: &Arc<ScriptedTransport>) -> Console {
    let client = ComplianceClient::with_transport(transport.clone());
    Console::new(client, ConsoleConfig::new("http://test")).with_clock(fixed_now)
}

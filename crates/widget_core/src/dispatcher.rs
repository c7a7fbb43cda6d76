use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::{CommandMessage, CommandReply};
use tracing::{debug, warn};

use crate::error::WidgetError;

/// Delivers one command message and returns the raw reply body.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn post_command(&self, message: &CommandMessage) -> Result<String>;
}

pub struct HttpCommandTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCommandTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CommandTransport for HttpCommandTransport {
    async fn post_command(&self, message: &CommandMessage) -> Result<String> {
        let response = self.http.post(&self.endpoint).json(message).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WidgetError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(body)
    }
}

pub struct MissingCommandTransport;

#[async_trait]
impl CommandTransport for MissingCommandTransport {
    async fn post_command(&self, _message: &CommandMessage) -> Result<String> {
        Err(anyhow!("command transport is unavailable"))
    }
}

/// Result of a dispatch. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub ok: bool,
    pub raw: Option<String>,
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn suppressed() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            raw: None,
            error: Some(error.into()),
        }
    }

    fn from_body(body: String) -> Self {
        match serde_json::from_str::<CommandReply>(&body) {
            Ok(reply) => Self {
                ok: reply.ok,
                raw: None,
                error: reply.error,
            },
            Err(_) => Self {
                ok: true,
                raw: Some(body),
                error: None,
            },
        }
    }
}

pub struct CommandDispatcher {
    transport: Arc<dyn CommandTransport>,
    remote_updates: AtomicUsize,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self {
            transport,
            remote_updates: AtomicUsize::new(0),
        }
    }

    pub fn http(endpoint: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpCommandTransport::new(endpoint)))
    }

    pub fn is_remote_updating(&self) -> bool {
        self.remote_updates.load(Ordering::SeqCst) > 0
    }

    /// Suppresses transmission until every outstanding guard is dropped.
    /// Guards may be released in any order.
    pub fn remote_update(&self) -> RemoteUpdateGuard<'_> {
        self.remote_updates.fetch_add(1, Ordering::SeqCst);
        RemoteUpdateGuard {
            holders: &self.remote_updates,
        }
    }

    pub async fn send(&self, addr: &str, value: impl Into<String>) -> CommandOutcome {
        if self.is_remote_updating() {
            debug!(%addr, "remote update in progress, command suppressed");
            return CommandOutcome::suppressed();
        }

        let message = CommandMessage::new(addr, value);
        debug!(addr = %message.addr, value = %message.value, "dispatching command");
        match self.transport.post_command(&message).await {
            Ok(body) => CommandOutcome::from_body(body),
            Err(error) => {
                warn!(addr = %message.addr, %error, "command dispatch failed");
                CommandOutcome::failed(error.to_string())
            }
        }
    }
}

pub struct RemoteUpdateGuard<'a> {
    holders: &'a AtomicUsize,
}

impl Drop for RemoteUpdateGuard<'_> {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;

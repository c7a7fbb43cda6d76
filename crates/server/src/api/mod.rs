use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::{Map, Value};
use shared::{
    error::{ApiException, ErrorCode},
    protocol::{PushUpdate, StatusQuery},
};
use tokio::sync::broadcast;
use tracing::debug;

/// A command that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedCommand {
    pub addr: String,
    pub value: Value,
}

/// What a websocket client sent us.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    Query(StatusQuery),
    Command(AcceptedCommand),
}

/// Validates a `{addr | address, value}` body. `addr` wins when both are
/// strings; a missing `value` counts as `null`.
pub fn parse_command(body: &[u8]) -> Result<AcceptedCommand, ApiException> {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            return Err(ApiException::new(
                ErrorCode::InvalidJson,
                "command body must be a JSON object",
            ))
        }
        Err(e) => return Err(ApiException::new(ErrorCode::InvalidJson, e.to_string())),
    };
    command_from_object(&object)
}

fn command_from_object(object: &Map<String, Value>) -> Result<AcceptedCommand, ApiException> {
    let addr = ["addr", "address"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .filter(|addr| !addr.is_empty())
        .ok_or_else(|| ApiException::new(ErrorCode::MissingAddr, "addr is required"))?;

    let value = object.get("value").cloned().unwrap_or(Value::Null);
    match value {
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Null => Ok(AcceptedCommand {
            addr: addr.to_string(),
            value,
        }),
        _ => Err(ApiException::new(
            ErrorCode::UnsupportedValueType,
            "value must be a bool, number, string or null",
        )),
    }
}

/// Classifies a websocket text frame: a status query or a command.
pub fn parse_frame(text: &str) -> Result<ClientFrame, ApiException> {
    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            return Err(ApiException::new(
                ErrorCode::InvalidJson,
                "frame must be a JSON object",
            ))
        }
        Err(e) => return Err(ApiException::new(ErrorCode::InvalidJson, e.to_string())),
    };
    if object.contains_key("query") {
        let query = serde_json::from_value::<StatusQuery>(Value::Object(object))
            .map_err(|e| ApiException::new(ErrorCode::InvalidJson, e.to_string()))?;
        return Ok(ClientFrame::Query(query));
    }
    command_from_object(&object).map(ClientFrame::Command)
}

#[derive(Debug, Default)]
struct StatusBoard {
    limit: usize,
    next_seq: u64,
    latest: HashMap<String, (u64, Value)>,
}

impl StatusBoard {
    fn record(&mut self, addr: &str, value: Value) {
        self.next_seq += 1;
        if !self.latest.contains_key(addr) && self.latest.len() >= self.limit {
            let oldest = self
                .latest
                .iter()
                .min_by_key(|(_, (seq, _))| *seq)
                .map(|(addr, _)| addr.clone());
            if let Some(oldest) = oldest {
                debug!(addr = %oldest, "status history full, evicting oldest address");
                self.latest.remove(&oldest);
            }
        }
        self.latest.insert(addr.to_string(), (self.next_seq, value));
    }
}

/// Latest status per address plus the fan-out to push subscribers.
#[derive(Clone)]
pub struct CommandHub {
    statuses: Arc<Mutex<StatusBoard>>,
    events: broadcast::Sender<PushUpdate>,
}

impl CommandHub {
    pub fn new(history_limit: usize, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            statuses: Arc::new(Mutex::new(StatusBoard {
                limit: history_limit.max(1),
                ..StatusBoard::default()
            })),
            events,
        }
    }

    fn board(&self) -> std::sync::MutexGuard<'_, StatusBoard> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the command as the address's latest status and broadcasts it.
    /// Returns the number of subscribers reached.
    pub fn accept(&self, command: AcceptedCommand) -> usize {
        self.board().record(&command.addr, command.value.clone());
        self.events
            .send(PushUpdate::value(command.addr, command.value))
            .unwrap_or(0)
    }

    pub fn latest(&self, addr: &str) -> Option<Value> {
        self.board().latest.get(addr).map(|(_, value)| value.clone())
    }

    /// Last known status for every queried address that has one, in query
    /// order.
    pub fn answer(&self, query: &StatusQuery) -> Vec<PushUpdate> {
        let board = self.board();
        query
            .query
            .iter()
            .filter_map(|addr| {
                board
                    .latest
                    .get(addr)
                    .map(|(_, value)| PushUpdate::value(addr.clone(), value.clone()))
            })
            .collect()
    }

    pub fn known_addresses(&self) -> usize {
        self.board().latest.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushUpdate> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

//! Soroban RPC client: polls `getEvents` and decodes passport events.
//!
//! ## Subscription
//!
//! Passport contracts are deployed one per project, so the poller cannot
//! list every contract id up front. It subscribes by topic instead: one
//! filter whose topic matchers cover the symbols in [`EventKind::TOPICS`].
//! Matchers carry XDR-encoded `ScVal::Symbol` values (base64), as the RPC
//! requires. Events from unrelated contracts that happen to reuse a symbol
//! are dropped later by `indexer::retain_relevant`.
//!
//! ## Decoding
//!
//! Requests set `xdrFormat: "json"`, so each event carries `topicJson` and
//! `valueJson`: externally tagged `ScVal`s such as `{"symbol":"minted"}` or
//! `{"map":[{"key":..,"val":..}]}`. Contract event structs arrive as a
//! symbol-keyed map and are flattened with [`scval_to_json`] before fields
//! are read.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, MintStatus, PassportEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `SCV_SYMBOL` discriminant in the `ScVal` XDR union.
const SCV_SYMBOL: u32 = 15;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// Topics as base64 XDR; only populated when `xdrFormat` is `base64`
    #[serde(default)]
    pub topic: Vec<String>,
    /// Topics as JSON `ScVal`s
    #[serde(rename = "topicJson", default)]
    pub topic_json: Vec<Value>,
    /// Event data as a JSON `ScVal`
    #[serde(rename = "valueJson")]
    pub value_json: Option<Value>,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of passport events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = next_backoff(backoff);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = next_backoff(backoff);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Invalid request / unknown method will never succeed on retry.
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = next_backoff(backoff);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn next_backoff(current: u64) -> u64 {
    (current * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let topics: Vec<Value> = EventKind::TOPICS
        .iter()
        .map(|symbol| json!([encode_symbol_xdr(symbol), "*"]))
        .collect();

    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "topics": topics
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

/// Base64 XDR of `ScVal::Symbol(symbol)`.
pub fn encode_symbol_xdr(symbol: &str) -> String {
    let bytes = symbol.as_bytes();
    let padding = (4 - bytes.len() % 4) % 4;
    let mut buf = Vec::with_capacity(8 + bytes.len() + padding);
    buf.extend_from_slice(&SCV_SYMBOL.to_be_bytes());
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
    buf.resize(buf.len() + padding, 0);
    STANDARD.encode(buf)
}

/// Inverse of [`encode_symbol_xdr`]; `None` if `raw` is not a symbol ScVal.
pub fn decode_symbol_xdr(raw: &str) -> Option<String> {
    let buf = STANDARD.decode(raw).ok()?;
    let tag = u32::from_be_bytes(buf.get(0..4)?.try_into().ok()?);
    if tag != SCV_SYMBOL {
        return None;
    }
    let len = u32::from_be_bytes(buf.get(4..8)?.try_into().ok()?) as usize;
    let symbol = buf.get(8..8 + len)?;
    String::from_utf8(symbol.to_vec()).ok()
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`PassportEvent`] structs.
/// Events of unknown kind or from failed calls are skipped.
pub fn decode_events(raw: &[RawEvent]) -> Vec<PassportEvent> {
    raw.iter().filter_map(decode_single).collect()
}

fn decode_single(raw: &RawEvent) -> Option<PassportEvent> {
    if raw.in_successful_contract_call == Some(false) {
        return None;
    }

    let kind = EventKind::from_topic(&topic_symbol(raw)?);
    if kind == EventKind::Unknown {
        return None;
    }

    let contract_id = raw.contract_id.clone()?;
    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);
    let subject = raw.topic_json.get(1).and_then(scval_string);

    let event_id = raw.id.clone().unwrap_or_else(|| {
        format!(
            "{ledger}-{}-{}-{}",
            raw.tx_hash.as_deref().unwrap_or("-"),
            kind.as_str(),
            subject.as_deref().unwrap_or("-"),
        )
    });

    let mut event = PassportEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        contract_id,
        subject,
        actor: None,
        status: None,
        role: None,
        token_id: None,
        name: None,
        passport_hash: None,
        ledger,
        timestamp,
        tx_hash: raw.tx_hash.clone(),
    };
    let data = raw.value_json.as_ref().map(scval_to_json).unwrap_or(Value::Null);
    decode_data(&data, kind, &mut event);
    Some(event)
}

/// Read the flattened event data struct.
fn decode_data(value: &Value, kind: EventKind, event: &mut PassportEvent) {
    match kind {
        EventKind::ProjectAdded => {
            event.actor = extract_field(value, &["caller"]);
            event.name = extract_field(value, &["name"]);
            event.passport_hash = extract_field(value, &["passport_hash"]);
        }
        EventKind::StatusChanged => {
            event.actor = extract_field(value, &["changed_by", "caller"]);
            event.status = extract_field(value, &["status"])
                .as_deref()
                .and_then(MintStatus::parse)
                .map(|s| s.as_str().to_string());
        }
        EventKind::TokenMinted => {
            event.actor = extract_field(value, &["minter"]);
            event.token_id = extract_field(value, &["token_id"]).and_then(|v| v.parse().ok());
            event.status = Some(MintStatus::Done.as_str().to_string());
        }
        EventKind::RoleSet | EventKind::RoleDel => {
            event.actor = extract_field(value, &["caller"]);
            event.role = value.get("role").and_then(enum_variant_name);
        }
        EventKind::Unknown => {}
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

/// A unit enum variant is rendered either as `"Admin"` or as `["Admin"]`.
fn enum_variant_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}

/// First topic as a symbol, from `topicJson` or else base64 XDR.
fn topic_symbol(raw: &RawEvent) -> Option<String> {
    match raw.topic_json.first() {
        Some(first) => scval_string(first),
        None => raw.topic.first().and_then(|t| decode_symbol_xdr(t)),
    }
}

/// String payload of a `symbol`, `string` or `address` ScVal.
fn scval_string(value: &Value) -> Option<String> {
    ["symbol", "string", "address"]
        .iter()
        .find_map(|tag| value.get(*tag))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Flatten a JSON `ScVal` into plain JSON.
///
/// Maps become objects keyed by their symbol keys, vectors become arrays and
/// scalars lose their type tag. 64-bit and wider integers stay strings, as
/// the RPC renders them.
pub fn scval_to_json(value: &Value) -> Value {
    let Some((tag, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        // `"void"` and other unit variants
        return Value::Null;
    };
    match tag.as_str() {
        "map" => {
            let mut object = serde_json::Map::new();
            for entry in inner.as_array().into_iter().flatten() {
                let key = entry.get("key").and_then(scval_string);
                if let (Some(key), Some(val)) = (key, entry.get("val")) {
                    object.insert(key, scval_to_json(val));
                }
            }
            Value::Object(object)
        }
        "vec" => Value::Array(
            inner
                .as_array()
                .into_iter()
                .flatten()
                .map(scval_to_json)
                .collect(),
        ),
        _ => inner.clone(),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

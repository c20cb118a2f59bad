//! JSON-RPC ledger read client.
//!
//! Implements [`LedgerReader`] against a full node's JSON-RPC 2.0 endpoint.
//! Response JSON is converted to [`RawObject`] / [`RawValue`] here and nowhere
//! else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{
    DynamicFieldInfo, DynamicFieldName, EventId, EventOrder, LedgerConfig, LedgerError,
    LedgerEvent, LedgerReader, ObjectId, ObjectOptions, RawObject, RawValue,
};
use tracing::{debug, warn};

/// Largest id batch the node accepts per `sui_multiGetObjects` call.
pub const MULTI_GET_CHUNK: usize = 50;

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Ledger read client over JSON-RPC.
pub struct JsonRpcLedgerClient {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcLedgerClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .connect_timeout(Duration::from_secs(config.rpc_timeout_secs.min(10)))
            .build()
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.rpc_url.clone(),
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a JSON-RPC method and return its `result`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };
        debug!("JSON-RPC {} #{}", method, request.id);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Malformed(format!("{}: {}", method, e)))?;

        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| LedgerError::Malformed(format!("{}: missing result", method)))
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Timeout(e.to_string())
    } else {
        LedgerError::Network(e.to_string())
    }
}

fn options_json(options: ObjectOptions) -> Value {
    json!({
        "showContent": options.show_content,
        "showOwner": options.show_owner,
        "showType": true,
    })
}

/// Convert one object response (`{"data": ..}` or `{"error": ..}`).
pub fn parse_object_response(response: Value, requested: &str) -> Result<RawObject, LedgerError> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
        return match code {
            "notExists" | "deleted" | "dynamicFieldNotFound" => {
                Err(LedgerError::NotFound(requested.to_string()))
            }
            _ => Err(LedgerError::Malformed(format!("{}: {}", requested, error))),
        };
    }
    match response.get("data").cloned() {
        Some(data) if !data.is_null() => RawObject::from_json(data)
            .ok_or_else(|| LedgerError::Malformed(format!("{}: object has no id", requested))),
        _ => Err(LedgerError::NotFound(requested.to_string())),
    }
}

/// Per-id results for one `sui_multiGetObjects` chunk.
///
/// A failed or misshapen chunk yields one error per requested id, so objects
/// read by other chunks survive.
pub fn merge_chunk(
    chunk: &[ObjectId],
    response: Result<Value, LedgerError>,
) -> Vec<Result<RawObject, LedgerError>> {
    let entries = response.and_then(|response| match response {
        Value::Array(entries) if entries.len() == chunk.len() => Ok(entries),
        other => Err(LedgerError::Malformed(format!(
            "sui_multiGetObjects: expected {} entries, got {}",
            chunk.len(),
            other.as_array().map_or(0, Vec::len)
        ))),
    });
    match entries {
        Ok(entries) => chunk
            .iter()
            .zip(entries)
            .map(|(id, entry)| parse_object_response(entry, id))
            .collect(),
        Err(e) => chunk.iter().map(|_| Err(e.clone())).collect(),
    }
}

/// Convert one entry of a `suix_getDynamicFields` page.
pub fn parse_dynamic_field(entry: &Value) -> Option<DynamicFieldInfo> {
    let name = entry.get("name")?;
    Some(DynamicFieldInfo {
        name: DynamicFieldName {
            type_name: name.get("type")?.as_str()?.to_string(),
            value: name.get("value").cloned().unwrap_or(Value::Null),
        },
        object_id: entry.get("objectId")?.as_str()?.to_string(),
        object_type: entry
            .get("objectType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Convert one entry of a `suix_queryEvents` page.
pub fn parse_event(entry: &Value) -> Option<LedgerEvent> {
    let id = entry.get("id")?;
    let number = |v: Option<&Value>| RawValue::from(v.cloned().unwrap_or(Value::Null)).as_u64();
    Some(LedgerEvent {
        id: EventId {
            tx_digest: id.get("txDigest")?.as_str()?.to_string(),
            event_seq: number(id.get("eventSeq")).unwrap_or_default(),
        },
        event_type: entry.get("type")?.as_str()?.to_string(),
        sender: entry
            .get("sender")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        parsed: RawValue::from(entry.get("parsedJson").cloned().unwrap_or(Value::Null)),
        timestamp_ms: number(entry.get("timestampMs")),
    })
}

#[async_trait]
impl LedgerReader for JsonRpcLedgerClient {
    async fn get_object(&self, id: &str, options: ObjectOptions) -> Result<RawObject, LedgerError> {
        let response = self
            .call("sui_getObject", json!([id, options_json(options)]))
            .await?;
        parse_object_response(response, id)
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectOptions,
    ) -> Result<Vec<Result<RawObject, LedgerError>>, LedgerError> {
        let mut out = Vec::with_capacity(ids.len());
        let mut first_error = None;
        let mut any_chunk_read = false;
        for chunk in ids.chunks(MULTI_GET_CHUNK) {
            let response = self
                .call("sui_multiGetObjects", json!([chunk, options_json(options)]))
                .await;
            match &response {
                Ok(_) => any_chunk_read = true,
                Err(e) => {
                    warn!("sui_multiGetObjects: chunk of {} ids failed: {}", chunk.len(), e);
                    first_error.get_or_insert_with(|| e.clone());
                }
            }
            out.extend(merge_chunk(chunk, response));
        }
        // Only a total outage fails the call; a partial one is per-entry.
        if !any_chunk_read {
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        Ok(out)
    }

    async fn list_dynamic_fields(
        &self,
        parent_id: &str,
    ) -> Result<Vec<DynamicFieldInfo>, LedgerError> {
        let mut fields = Vec::new();
        let mut cursor = Value::Null;
        loop {
            let page = self
                .call("suix_getDynamicFields", json!([parent_id, cursor, Value::Null]))
                .await?;
            let data = page.get("data").and_then(Value::as_array).ok_or_else(|| {
                LedgerError::Malformed(format!("suix_getDynamicFields({}): no data", parent_id))
            })?;
            fields.extend(data.iter().filter_map(parse_dynamic_field));

            let has_next = page.get("hasNextPage").and_then(Value::as_bool).unwrap_or(false);
            match page.get("nextCursor") {
                Some(next) if has_next && !next.is_null() && *next != cursor => cursor = next.clone(),
                _ => break,
            }
        }
        Ok(fields)
    }

    async fn get_dynamic_field_object(
        &self,
        parent_id: &str,
        name: &DynamicFieldName,
    ) -> Result<RawObject, LedgerError> {
        let name_json = json!({"type": name.type_name, "value": name.value});
        let response = self
            .call("suix_getDynamicFieldObject", json!([parent_id, name_json]))
            .await?;
        parse_object_response(response, &format!("{}[{}]", parent_id, name.value))
    }

    async fn query_events(
        &self,
        event_type: &str,
        limit: usize,
        order: EventOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let descending = matches!(order, EventOrder::Descending);
        let page = self
            .call(
                "suix_queryEvents",
                json!([{"MoveEventType": event_type}, Value::Null, limit, descending]),
            )
            .await?;
        let data = page
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| LedgerError::Malformed("suix_queryEvents: no data".to_string()))?;
        Ok(data.iter().filter_map(parse_event).collect())
    }
}

//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::envelope::{RpcError, RpcRequest, RpcResponse};
use crate::GatewayError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one request and return the response envelope
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, GatewayError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, GatewayError> {
        (**self).send(request).await
    }
}

/// Canned reply for a method
#[derive(Debug, Clone)]
enum MockReply {
    Result(Value),
    Error(RpcError),
    Raw(RpcResponse),
}

/// Mock transport for testing.
///
/// Replies are keyed by method; every request is recorded. Clones share
/// state, so a test can keep a handle after moving one into a gateway.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<RpcRequest>>>,
}

impl MockTransport {
    /// Create a new mock transport with no canned replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `method` with a successful result
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_result(&self, method: &str, result: Value) {
        self.set_reply(method, MockReply::Result(result));
    }

    /// Reply to `method` with an error object
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        self.set_reply(method, MockReply::Error(RpcError::new(code, message)));
    }

    /// Reply to `method` with a verbatim envelope (for malformed responses)
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: RpcResponse) {
        self.set_reply(method, MockReply::Raw(response));
    }

    /// Requests received so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<RpcRequest> {
        self.requests().pop()
    }

    fn set_reply(&self, method: &str, reply: MockReply) {
        self.replies
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), reply);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, GatewayError> {
        let reply = self
            .replies
            .lock()
            .map_err(|_| GatewayError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(&request.method)
            .cloned();

        let id = request.id;
        let method = request.method.clone();
        self.requests
            .lock()
            .map_err(|_| GatewayError::Transport("MockTransport mutex poisoned".to_string()))?
            .push(request);

        Ok(match reply {
            Some(MockReply::Result(result)) => RpcResponse::success(id, result),
            Some(MockReply::Error(error)) => RpcResponse::failure(id, error),
            Some(MockReply::Raw(response)) => response,
            None => RpcResponse::failure(
                id,
                RpcError::new(-32601, format!("Method not found: {}", method)),
            ),
        })
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a transport for the configured endpoint.
    ///
    /// Every request carries `Authorization` (when configured) and
    /// `x-chain-id`.
    pub fn new(config: &crate::GatewayConfig) -> Result<Self, GatewayError> {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

        let mut headers = HeaderMap::new();
        if let Some(authorization) = &config.authorization {
            let value = HeaderValue::from_str(authorization)
                .map_err(|e| GatewayError::Config(format!("authorization header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert("x-chain-id", HeaderValue::from(config.chain_id));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.rpc_url.clone(),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, GatewayError> {
        // `json` sets Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        // error envelopes may arrive with a non-2xx status
        serde_json::from_str(&body).map_err(|_| {
            GatewayError::Transport(format!("HTTP {}: {}", status, truncate(&body, 200)))
        })
    }
}

#[cfg(feature = "http")]
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_result() {
        let transport = MockTransport::new();
        transport.set_result("klay_blockNumber", json!("0x100"));

        let response = transport
            .send(RpcRequest::new(3, "klay_blockNumber", vec![]))
            .await
            .unwrap();
        assert_eq!(response.id, Some(json!(3)));
        assert_eq!(response.into_result().unwrap(), json!("0x100"));
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        let handle = transport.clone();
        transport
            .send(RpcRequest::new(1, "klay_call", vec![json!("a")]))
            .await
            .unwrap();
        transport
            .send(RpcRequest::new(2, "klay_getBalance", vec![]))
            .await
            .unwrap();

        let requests = handle.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].params, vec![json!("a")]);
        assert_eq!(handle.last_request().unwrap().method, "klay_getBalance");
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let response = transport
            .send(RpcRequest::new(1, "unknown_method", vec![]))
            .await
            .unwrap();
        assert!(matches!(
            response.into_result(),
            Err(GatewayError::RemoteRpc { code: -32601, .. })
        ));
    }

    #[tokio::test]
    async fn test_arc_transport() {
        let transport = Arc::new(MockTransport::new());
        transport.set_error("klay_call", -32000, "reverted");
        let response = transport
            .send(RpcRequest::new(1, "klay_call", vec![]))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().message, "reverted");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_transport_rejects_bad_header() {
        let config = crate::GatewayConfig {
            authorization: Some("line\nbreak".to_string()),
            ..Default::default()
        };
        assert!(matches!(HttpTransport::new(&config), Err(GatewayError::Config(_))));
    }
}

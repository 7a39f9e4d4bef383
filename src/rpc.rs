// JSON-RPC transport. One shared reqwest client for the process, bounded
// retry on transient HTTP statuses, structured extraction of RPC errors.

use crate::errors::RpcError;
use serde_json::Value;
use std::sync::OnceLock;
use tokio::time::{sleep, Duration};

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// POST a JSON-RPC request and return the `result` field.
///
/// Retries only on transient statuses (429, 5xx), at most twice with a short
/// backoff. Contract-level errors come back as `RpcError::Contract` and are
/// never retried here.
pub async fn rpc_post(url: &str, body: &Value, timeout_ms: u64) -> Result<Value, RpcError> {
    let mut attempt = 0u32;
    loop {
        let req = http_client()
            .post(url)
            .json(body)
            .timeout(Duration::from_millis(timeout_ms));

        let res = req.send().await?;
        if res.status().is_success() {
            let v: Value = res.json().await?;
            if let Some(err) = v.get("error") {
                let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
                let message = err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("rpc error")
                    .to_string();
                return Err(RpcError::Contract { code, message });
            }
            if let Some(r) = v.get("result") {
                return Ok(r.clone());
            }
            return Err(RpcError::InvalidPayload);
        }

        let status = res.status().as_u16();
        if matches!(status, 429 | 500 | 502 | 503 | 504) && attempt < 2 {
            attempt += 1;
            log::debug!("transient http {status}, retry {attempt}");
            sleep(Duration::from_millis(150 * attempt as u64)).await;
            continue;
        }
        return Err(RpcError::Http { status });
    }
}

/// Build the request body for a read-only contract call.
pub fn call_request(contract_address: &str, entry_point: &str, calldata: &[Value]) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": "ajo",
        "method": "contract_call",
        "params": {
            "contract_address": contract_address,
            "entry_point": entry_point,
            "calldata": calldata,
            "finality": "final",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_request_shape() {
        let body = call_request("0xabc", "get_group_info", &[json!("7")]);
        assert_eq!(body["method"], "contract_call");
        assert_eq!(body["params"]["entry_point"], "get_group_info");
        assert_eq!(body["params"]["calldata"][0], "7");
    }
}

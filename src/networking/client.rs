use std::collections::HashMap;

use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::networking::requests::{
    AccountInfoResult, FeeResult, LedgerCurrentResult, Request, Response, SubmitResult,
};
use crate::signing::SignedTransaction;

/// A WebSocket client for one node. Requests carry a client-assigned
/// id and the node echoes it back, so responses can be matched even
/// when unsolicited stream messages are interleaved.
pub struct WsClient {
    read_stream: SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    write_sink: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
    requests: HashMap<u64, String>,
    request_count: u64,
}

impl WsClient {
    pub async fn connect(peer: &str) -> Result<WsClient> {
        let url = url::Url::parse(peer)
            .map_err(|e| Error::Transport(format!("bad peer url {}: {}", peer, e)))?;
        let (ws_stream, _) = connect_async(url).await?;
        let (write_sink, read_stream) = ws_stream.split();
        debug!(%peer, "connected");
        Ok(WsClient {
            read_stream,
            write_sink,
            requests: HashMap::new(),
            request_count: 0,
        })
    }

    /// Issue one command and wait for its response, skipping over any
    /// stream messages that arrive in between.
    pub async fn request(&mut self, command: &str, params: Value) -> Result<Value> {
        let id = self.request_count;
        self.request_count += 1;
        self.requests.insert(id, command.to_string());

        let request = Request {
            id,
            command: command.to_string(),
            params,
        };
        let text = serde_json::to_string(&request)?;
        debug!(%command, id, "sending request");
        self.write_sink.send(Message::Text(text)).await?;

        loop {
            let message = match self.read_stream.next().await {
                Some(message) => message?,
                None => {
                    return Err(Error::Transport(
                        "connection closed before response".to_string(),
                    ))
                }
            };
            let text = match message {
                Message::Text(text) => text,
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => {
                    return Err(Error::Transport(
                        "connection closed before response".to_string(),
                    ))
                }
                other => {
                    warn!(?other, "ignoring non-text message");
                    continue;
                }
            };
            let response: Response = serde_json::from_str(&text)?;

            let response_id = match response.id {
                Some(response_id) => response_id,
                None => {
                    // subscription traffic has no id
                    debug!(message_type = %response.message_type, "stream message");
                    continue;
                }
            };
            match self.requests.remove(&response_id) {
                Some(_) if response_id == id => return Self::unwrap_result(response),
                Some(command) => {
                    warn!(%command, response_id, "response for an abandoned request");
                }
                None => {
                    warn!(response_id, "response for a request we never sent");
                }
            }
        }
    }

    fn unwrap_result(response: Response) -> Result<Value> {
        match response.status.as_deref() {
            Some("success") => Ok(response.result),
            _ => Err(Error::Server(format!(
                "{}: {}",
                response.error.unwrap_or_else(|| "unknown".to_string()),
                response.error_message.unwrap_or_default()
            ))),
        }
    }

    /// Submit a signed transaction blob.
    pub async fn submit(&mut self, signed: &SignedTransaction) -> Result<SubmitResult> {
        let result = self
            .request(
                "submit",
                json!({ "tx_blob": hex::encode_upper(&signed.tx_blob) }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch the current state of an account.
    pub async fn account_info(&mut self, account: &AccountId) -> Result<AccountInfoResult> {
        let result = self
            .request(
                "account_info",
                json!({ "account": account.to_address(), "ledger_index": "current" }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// The index of the ledger currently open for transactions. Used
    /// to pick a LastLedgerSequence bound before signing.
    pub async fn ledger_current(&mut self) -> Result<u32> {
        let result = self.request("ledger_current", json!({})).await?;
        let parsed: LedgerCurrentResult = serde_json::from_value(result)?;
        Ok(parsed.ledger_current_index)
    }

    /// The node's current fee levels.
    pub async fn fee(&mut self) -> Result<FeeResult> {
        let result = self.request("fee", json!({})).await?;
        Ok(serde_json::from_value(result)?)
    }
}

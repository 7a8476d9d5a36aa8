use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::account::AccountId;
use crate::error::{Error, Result};

pub const TESTNET_FAUCET_URL: &str = "https://faucet.altnet.rippletest.net/accounts";

#[derive(Debug, Deserialize)]
struct FaucetAccount {
    address: String,
}

#[derive(Debug, Deserialize)]
struct FaucetResponse {
    account: FaucetAccount,
    amount: Option<u64>,
}

/// Funding received from a test-network faucet.
#[derive(Debug, Clone)]
pub struct FaucetFunding {
    pub account: AccountId,
    pub amount_xrp: Option<u64>,
}

/// HTTP client for the test-network faucet. Only useful against test
/// networks; main-network funds move exclusively through transactions.
pub struct FaucetClient {
    url: String,
    http: reqwest::Client,
}

impl FaucetClient {
    pub fn new(url: &str) -> FaucetClient {
        FaucetClient {
            url: url.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn testnet() -> FaucetClient {
        FaucetClient::new(TESTNET_FAUCET_URL)
    }

    /// Ask the faucet to fund an existing account.
    pub async fn fund(&self, account: &AccountId) -> Result<FaucetFunding> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "destination": account.to_address() }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Server(format!(
                "faucet returned {}",
                response.status()
            )));
        }
        let parsed: FaucetResponse = response.json().await?;
        let funded: AccountId = parsed.account.address.parse()?;
        info!(account = %funded, amount = ?parsed.amount, "faucet funding received");
        Ok(FaucetFunding {
            account: funded,
            amount_xrp: parsed.amount,
        })
    }
}

pub mod client;
pub mod faucet;
pub mod requests;

pub use client::WsClient;
pub use faucet::FaucetClient;

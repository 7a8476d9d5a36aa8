/*!
# xrpl_rust

A client library for the XRP Ledger network. The core of the crate is the
canonical ST ("serialized type") binary codec: the deterministic encoding
the network uses both to compute transaction/object identifiers and to
produce the exact bytes that get signed and submitted. Canonical field
ordering and per-type encodings are reproduced bit-for-bit; any deviation
changes the hash and the network rejects the signature.

On top of the codec sit typed ledger-entry and transaction objects, a
single- and multi-signer signing pipeline, and a thin WebSocket/HTTP
client for talking to a node.

# Usage

```no_run
use xrpl_rust::amount::Amount;
use xrpl_rust::keypair::Keypair;
use xrpl_rust::transaction::Transaction;

let keypair = Keypair::generate_secp256k1();
let mut tx = Transaction::payment(
    keypair.account_id(),
    "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".parse().unwrap(),
    Amount::drops(1_000_000).unwrap(),
);
tx.common_mut().set_fee(Amount::drops(12).unwrap());
tx.common_mut().set_sequence(1);
let signed = tx.sign(&keypair).unwrap();
println!("tx hash: {}", signed.hash);
```
*/
#[macro_use]
extern crate lazy_static;

pub mod account;
pub mod amount;
pub mod base58;
pub mod crypto;
pub mod currency;
pub mod error;
pub mod field;
pub mod hashes;
pub mod keypair;
pub mod ledger_object;
pub mod networking;
pub mod pathset;
pub mod reader;
pub mod registry;
pub mod signing;
pub mod transaction;
pub mod value;
pub mod writer;

pub use error::{Error, Result};

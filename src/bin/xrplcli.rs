/*!
# XRPL Command Line Interface

A small binary for working with XRP Ledger accounts and transactions
from the command line.

## Available subcommands

**keygen**

generates a keypair and prints the seed, public key and address

**sign**

signs a payment and prints the transaction blob and hash

**submit**

signs a payment and submits it to a node over WebSocket

## Example

```bash
cargo run --bin xrplcli -- keygen --ed25519
```
or
```bash
cargo run --bin xrplcli -- sign --seed snoPBrXtMeMyMHUVTgbuqAfg1SUTb \
    --to rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh --drops 1000000 --sequence 1
```
or
```bash
cargo run --bin xrplcli -- submit --seed s... --to r... --drops 1000000 \
    --peer wss://s.altnet.rippletest.net:51233
```
*/
use clap::{App, Arg};
use rand::RngCore;
use xrpl_rust::{
    account::AccountId,
    amount::Amount,
    keypair::{KeyType, Keypair},
    networking::WsClient,
    signing::SignedTransaction,
    transaction::Transaction,
    Error,
};

#[tokio::main]
pub async fn main() -> xrpl_rust::Result<()> {
    tracing_subscriber::fmt::init();

    let seed_arg = Arg::with_name("seed")
        .short("s")
        .long("seed")
        .required(true)
        .takes_value(true)
        .help("base58 family seed of the signing account");
    let ed25519_arg = Arg::with_name("ed25519")
        .long("ed25519")
        .help("use ed25519 instead of secp256k1");
    let to_arg = Arg::with_name("to")
        .short("t")
        .long("to")
        .required(true)
        .takes_value(true)
        .help("destination address");
    let drops_arg = Arg::with_name("drops")
        .short("d")
        .long("drops")
        .required(true)
        .takes_value(true)
        .help("amount to send, in drops");
    let fee_arg = Arg::with_name("fee")
        .long("fee")
        .takes_value(true)
        .default_value("12")
        .help("fee in drops");

    let command_matches = App::new("XRPL Command Line Interface")
        .about("Work with XRP Ledger accounts and transactions from the command line")
        .subcommand(
            App::new("keygen")
                .about("generates a keypair")
                .arg(ed25519_arg.clone()),
        )
        .subcommand(
            App::new("sign")
                .about("signs a payment and prints the blob")
                .arg(seed_arg.clone())
                .arg(ed25519_arg.clone())
                .arg(to_arg.clone())
                .arg(drops_arg.clone())
                .arg(fee_arg.clone())
                .arg(
                    Arg::with_name("sequence")
                        .long("sequence")
                        .required(true)
                        .takes_value(true)
                        .help("next sequence number of the signing account"),
                ),
        )
        .subcommand(
            App::new("submit")
                .about("signs a payment and submits it to a node")
                .arg(seed_arg)
                .arg(ed25519_arg)
                .arg(to_arg)
                .arg(drops_arg)
                .arg(fee_arg)
                .arg(
                    Arg::with_name("peer")
                        .short("p")
                        .long("peer")
                        .required(true)
                        .takes_value(true)
                        .help("WebSocket url of the node, e.g. wss://s.altnet.rippletest.net:51233"),
                ),
        )
        .get_matches();

    match command_matches.subcommand() {
        ("keygen", Some(matches)) => {
            let key_type = if matches.is_present("ed25519") {
                KeyType::Ed25519
            } else {
                KeyType::Secp256k1
            };
            let mut entropy = [0u8; 16];
            rand::thread_rng().fill_bytes(&mut entropy);
            let keypair = Keypair::from_entropy(&entropy, key_type)?;
            println!("seed:       {}", Keypair::encode_seed(&entropy));
            println!("public key: {}", hex::encode_upper(keypair.public_key_bytes()));
            println!("address:    {}", keypair.account_id().to_address());
        }
        ("sign", Some(matches)) => {
            let keypair = keypair_from_matches(matches)?;
            let sequence: u32 = parse_arg(matches, "sequence")?;
            let mut tx = payment_from_matches(matches, &keypair)?;
            tx.common_mut().set_sequence(sequence);
            let signed = tx.sign(&keypair)?;
            print_signed(&signed);
        }
        ("submit", Some(matches)) => {
            let keypair = keypair_from_matches(matches)?;
            let peer = matches.value_of("peer").unwrap();

            let mut client = WsClient::connect(peer).await?;
            let info = client.account_info(&keypair.account_id()).await?;
            let current = client.ledger_current().await?;

            let mut tx = payment_from_matches(matches, &keypair)?;
            tx.common_mut().set_sequence(info.account_data.sequence);
            tx.common_mut().set_last_ledger_sequence(current + 20);
            let signed = tx.sign(&keypair)?;
            print_signed(&signed);

            let result = client.submit(&signed).await?;
            println!(
                "engine result: {} ({})",
                result.engine_result, result.engine_result_message
            );
        }
        _ => {
            println!("no subcommand given; try help");
        }
    }
    Ok(())
}

fn keypair_from_matches(matches: &clap::ArgMatches) -> xrpl_rust::Result<Keypair> {
    let seed = matches.value_of("seed").unwrap();
    let key_type = if matches.is_present("ed25519") {
        KeyType::Ed25519
    } else {
        KeyType::Secp256k1
    };
    Keypair::from_seed(seed, key_type)
}

fn payment_from_matches(
    matches: &clap::ArgMatches,
    keypair: &Keypair,
) -> xrpl_rust::Result<Transaction> {
    let destination: AccountId = matches.value_of("to").unwrap().parse()?;
    let drops: u64 = parse_arg(matches, "drops")?;
    let fee: u64 = parse_arg(matches, "fee")?;

    let mut tx = Transaction::payment(keypair.account_id(), destination, Amount::drops(drops)?);
    tx.common_mut().set_fee(Amount::drops(fee)?);
    Ok(tx)
}

fn parse_arg<T: std::str::FromStr>(
    matches: &clap::ArgMatches,
    name: &str,
) -> xrpl_rust::Result<T> {
    matches
        .value_of(name)
        .unwrap()
        .parse()
        .map_err(|_| Error::BadEncoding(format!("unparseable --{}", name)))
}

fn print_signed(signed: &SignedTransaction) {
    println!("tx blob: {}", hex::encode_upper(&signed.tx_blob));
    println!("tx hash: {}", signed.hash);
}

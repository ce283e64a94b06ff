//! Walletbridge CLI - chain queries, encoding helpers and bridge operations
//!
//!   walletbridge block                       → latest block summary
//!   walletbridge gas-price                   → {"wei": "..."}
//!   walletbridge calldata [method] [args…]   → ABI-encoded call on the sample ERC-721
//!   walletbridge typed-data-hash [file]      → EIP-712 signing hash
//!   walletbridge hd-wallet                   → derive (or generate) an account
//!   walletbridge send | sign                 → run a bridge operation through a wallet
//!   walletbridge watch                       → log forwarded wallet events until Ctrl+C
//!
//! Wallet selection for send/sign/watch:
//!   --mnemonic <words> [--index n]   local HD key
//!   --private-key <hex>              local key
//!   --wallet-rpc <url>               node-managed accounts
//!
//! Configuration (environment, `.env` loaded first):
//!   WALLETBRIDGE_RPC_URL, WALLETBRIDGE_CONTRACT, WALLETBRIDGE_DEEP_LINK, WALLETBRIDGE_LOG_JSON

use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{debug, info};
use walletbridge::chain::typed_data;
use walletbridge::config::load_dotenv;
use walletbridge::logging::init_logging;
use walletbridge::{
    install_signal_handlers, AbiEncoder, BridgeConfig, BridgeError, ChainRpc, HdWallet, HttpChainRpc,
    JsonAbiEncoder, LocalWalletTransport, RpcWalletTransport, Subscription, WalletBridge, WalletSession,
    WalletTransport, WordCount,
};

fn main() {
    load_dotenv(".env");
    init_logging();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("walletbridge {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let Some(command) = opts.command.clone() else {
        print_usage();
        return;
    };

    let result = tokio::runtime::Runtime::new()
        .context("start tokio runtime")
        .and_then(|rt| rt.block_on(run(&command, &opts)));

    let pretty = opts.pretty || std::io::stdout().is_terminal();
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            let code = e.downcast_ref::<BridgeError>().map(BridgeError::code).unwrap_or("cli");
            eprintln!("{}", render(&json!({"error": format!("{e:#}"), "code": code}), pretty));
            std::process::exit(1);
        }
    }
}

async fn run(command: &str, opts: &ParsedArgs) -> anyhow::Result<Value> {
    debug!(command, "dispatch");
    match command {
        "block" => cmd_block(opts).await,
        "gas-price" | "gas" => cmd_gas_price(opts).await,
        "calldata" => cmd_calldata(opts),
        "typed-data-hash" | "hash" => cmd_typed_data_hash(opts),
        "hd-wallet" | "wallet" => cmd_hd_wallet(opts),
        "send" => cmd_send(opts).await,
        "sign" => cmd_sign(opts).await,
        "watch" => cmd_watch(opts).await,
        other => bail!("unknown command: {other}"),
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let out = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    out.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    positional: Vec<String>,
    // Wallet options
    mnemonic: Option<String>,
    private_key: Option<String>,
    wallet_rpc: Option<String>,
    index: u32,
    words: Option<usize>,
    // Overrides
    rpc_url: Option<String>,
    deep_link: Option<String>,
    // Output options
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let next = args.get(i + 1).cloned();
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--mnemonic" | "-m" if next.is_some() => {
                    opts.mnemonic = next;
                    i += 1;
                }
                "--private-key" | "-k" if next.is_some() => {
                    opts.private_key = next;
                    i += 1;
                }
                "--wallet-rpc" | "-w" if next.is_some() => {
                    opts.wallet_rpc = next;
                    i += 1;
                }
                "--rpc-url" | "-r" if next.is_some() => {
                    opts.rpc_url = next;
                    i += 1;
                }
                "--deep-link" if next.is_some() => {
                    opts.deep_link = next;
                    i += 1;
                }
                "--index" | "-i" => {
                    if let Some(n) = next.as_deref().and_then(|s| s.parse().ok()) {
                        opts.index = n;
                        i += 1;
                    }
                }
                "--words" => {
                    if let Some(n) = next.as_deref().and_then(|s| s.parse().ok()) {
                        opts.words = Some(n);
                        i += 1;
                    }
                }
                _ => positional.push(arg.clone()),
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.positional = positional.collect();
        opts
    }

    fn config(&self) -> anyhow::Result<BridgeConfig> {
        let mut config = BridgeConfig::from_env()?;
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url.as_str());
        }
        if let Some(target) = &self.deep_link {
            config = config.with_deep_link_target(target.as_str());
        }
        Ok(config)
    }

    fn transport(&self, config: &BridgeConfig) -> anyhow::Result<Arc<dyn WalletTransport>> {
        if let Some(url) = &self.wallet_rpc {
            info!(%url, "forwarding wallet requests");
            return Ok(Arc::new(RpcWalletTransport::new(url)?));
        }
        let signer = if let Some(phrase) = &self.mnemonic {
            HdWallet::from_phrase(phrase)?.signer(self.index)?
        } else if let Some(key) = &self.private_key {
            key.trim_start_matches("0x").parse::<PrivateKeySigner>().map_err(|e| anyhow!("invalid private key: {e}"))?
        } else {
            bail!("send/sign/watch need --mnemonic, --private-key or --wallet-rpc");
        };
        let transport = LocalWalletTransport::new(signer).with_rpc_url(&config.rpc_url)?;
        info!(address = %transport.address(), "local wallet");
        Ok(Arc::new(transport))
    }

    fn bridge(&self) -> anyhow::Result<WalletBridge> {
        let config = self.config()?;
        let session = Arc::new(WalletSession::new(self.transport(&config)?));
        let bridge = WalletBridge::from_config(&config, session)?;
        bridge.activate();
        Ok(bridge)
    }
}

fn print_usage() {
    println!(
        r#"walletbridge - wallet event bridge and request dispatcher

USAGE:
    walletbridge <COMMAND> [OPTIONS]

COMMANDS:
    block                      Latest block summary from the chain RPC
    gas-price                  Current gas price in wei
    calldata [method] [args]   ABI-encode a call (default: safeMint sample)
    typed-data-hash [file]     EIP-712 signing hash (default: Ether Mail sample)
    hd-wallet                  Derive an account (generates a mnemonic if none given)
    send                       Send the configured contract call through the wallet
    sign                       Sign the configured typed data through the wallet
    watch                      Connect and log wallet events until Ctrl+C

OPTIONS:
    -m, --mnemonic <words>     BIP-39 phrase for a local wallet
    -k, --private-key <hex>    Private key for a local wallet
    -w, --wallet-rpc <url>     Forward wallet requests to this node
    -i, --index <n>            Account index (default 0)
        --words <n>            Words for a generated mnemonic (12..24)
    -r, --rpc-url <url>        Chain RPC endpoint (overrides WALLETBRIDGE_RPC_URL)
        --deep-link <url>      Dapp URL to open through the wallet deep link
        --pretty               Pretty-print JSON
    -h, --help                 Print help
    -V, --version              Print version"#
    );
}

async fn cmd_block(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let rpc = HttpChainRpc::new(&opts.config()?.rpc_url)?;
    Ok(serde_json::to_value(rpc.block().await?)?)
}

async fn cmd_gas_price(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let rpc = HttpChainRpc::new(&opts.config()?.rpc_url)?;
    let wei = rpc.gas_price().await?;
    Ok(json!({"wei": wei.to_string()}))
}

fn cmd_calldata(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let mut call = opts.config()?.contract_call;
    if let Some((method, args)) = opts.positional.split_first() {
        call.method = method.clone();
        call.args = args.to_vec();
    }
    let data = JsonAbiEncoder.calldata(&call.abi_json, &call.method, &call.args)?;
    Ok(json!({"to": call.address, "method": call.method, "args": call.args, "data": data}))
}

fn cmd_typed_data_hash(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let payload = match opts.positional.first() {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("read {path}"))?,
        None => opts.config()?.typed_data,
    };
    let typed = typed_data::parse(&payload)?;
    Ok(json!({"primary_type": typed.primary_type, "hash": typed_data::hash(&typed)?}))
}

fn cmd_hd_wallet(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let (wallet, generated) = match &opts.mnemonic {
        Some(phrase) => (HdWallet::from_phrase(phrase)?, false),
        None => {
            let words = match opts.words {
                Some(n) => WordCount::from_words(n).ok_or_else(|| anyhow!("--words must be 12, 15, 18, 21 or 24"))?,
                None => WordCount::default(),
            };
            (HdWallet::generate(words)?, true)
        }
    };
    let mut out = json!({"account": wallet.account(opts.index)?});
    if generated {
        out["mnemonic"] = json!(wallet.phrase());
    }
    Ok(out)
}

async fn cmd_send(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let bridge = opts.bridge()?;
    let _logged = log_events(&bridge);
    connect(&bridge).await?;
    let hash = bridge.send_transaction().await?;
    bridge.deactivate();
    Ok(json!({"transaction": hash}))
}

async fn cmd_sign(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let bridge = opts.bridge()?;
    let _logged = log_events(&bridge);
    connect(&bridge).await?;
    let signature = bridge.sign().await?;
    bridge.deactivate();
    Ok(json!({"signature": signature}))
}

async fn cmd_watch(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let shutdown = install_signal_handlers();
    let bridge = opts.bridge()?;
    let _logged = log_events(&bridge);
    connect(&bridge).await?;
    info!(session = %bridge.session().sender(), "watching wallet events, Ctrl+C to stop");
    shutdown.wait().await;
    let released = bridge.deactivate();
    bridge.session().disconnect();
    Ok(json!({"stopped": true, "released": released}))
}

async fn connect(bridge: &WalletBridge) -> anyhow::Result<()> {
    if let Some(url) = bridge.open_deep_link()? {
        debug!(%url, "deep link");
    }
    let address = bridge.connect().await?;
    info!(%address, "wallet connected");
    Ok(())
}

/// One logging listener per bridge event; dropped with the returned guards.
fn log_events(bridge: &WalletBridge) -> Vec<Subscription> {
    let events = bridge.events();
    let mut subs: Vec<Subscription> = [
        &events.wallet_connected,
        &events.wallet_disconnected,
        &events.wallet_ready,
        &events.wallet_paused,
        &events.sign_send,
        &events.transaction_sent,
    ]
    .into_iter()
    .map(|hub| {
        let name = hub.name();
        hub.subscribe(move |sender, _| info!(event = name, %sender, "wallet event"))
    })
    .collect();
    subs.push(events.transaction_result.subscribe(|sender, result| {
        info!(event = "transaction_result", %sender, id = result.id, method = %result.method, error = result.outcome.is_error(), "wallet event");
    }));
    subs
}

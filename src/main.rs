use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mintdesk_batch::{BatchRunner, ChannelNotifier, DEFAULT_EXPORT_FILE, WorkItem, Workflow, total_units};
use mintdesk_chain::{
  ApprovalCallPhase, DirectCallPhase, SigningContext, StandardBinding, parse_address,
  parse_mint_abi,
};
use mintdesk_config::{AppConfig, ContractStandard, Network};
use mintdesk_market::{
  MarketClient, OrderOverrides, OrderSubmissionPhase, OrderTemplate, exchange_domain, parse_price,
  unix_now,
};

mod input;
mod progress;

const PRIVATE_KEY_ENV: &str = "MINTDESK_PRIVATE_KEY";

/// Mintdesk - batch NFT minting and marketplace listing
#[derive(Parser)]
#[command(name = "mintdesk")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the configuration file (default: ~/.mintdesk/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// File holding the hex private key (default: $MINTDESK_PRIVATE_KEY)
  #[arg(long, global = true)]
  key_file: Option<PathBuf>,

  /// Log at debug level
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Start without asking for confirmation
  #[arg(short, long, global = true)]
  yes: bool,

  /// Where to write failed keys (default: ./mint_failed_list.csv)
  #[arg(long, global = true)]
  failed_out: Option<PathBuf>,

  /// Print every progress event to stdout as a JSON line
  #[arg(long, global = true)]
  json_events: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Call a mint function once per token for each recipient
  DevMint(DevMintArgs),

  /// Approve the marketplace and submit a signed sell order per token
  List(ListArgs),
}

#[derive(Args)]
struct DevMintArgs {
  /// Network to send transactions on (test | main)
  #[arg(long, default_value = "main")]
  network: Network,

  /// Address of the contract to mint from
  #[arg(long)]
  contract: String,

  /// JSON ABI of the contract (bare array or build artifact)
  #[arg(long)]
  abi: PathBuf,

  /// Mint function taking (address to, uint256 amount)
  #[arg(long, default_value = "devMint")]
  entry_point: String,

  /// Wait for each receipt and count reverted transactions as failures
  #[arg(long)]
  confirm: bool,

  /// CSV of `address,count` rows
  recipients: PathBuf,
}

#[derive(Args)]
struct ListArgs {
  /// Network the collection lives on (test | main)
  #[arg(long, default_value = "main")]
  network: Network,

  /// Address of the collection contract
  #[arg(long)]
  collection: String,

  /// Token standard of the collection (erc721 | erc1155)
  #[arg(long, default_value = "erc721")]
  standard: ContractStandard,

  /// Listing price in ether, e.g. 0.05
  #[arg(long)]
  price: String,

  /// Execution strategy (default: the network's standard-sale strategy)
  #[arg(long)]
  strategy: Option<String>,

  /// Currency (default: the network's WETH)
  #[arg(long)]
  currency: Option<String>,

  /// Marketplace API base URL
  #[arg(long)]
  api: String,

  /// CSV of token ids, one per row
  tokens: PathBuf,
}

/// A fully prepared run: nothing left to validate.
struct Prepared {
  summary: Vec<(&'static str, String)>,
  items: Vec<WorkItem>,
  workflow: Workflow,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config_path = match &cli.config {
    Some(path) => path.clone(),
    None => default_config_path()?,
  };
  let config = AppConfig::load(&config_path)
    .with_context(|| format!("failed to load config: {}", config_path.display()))?;
  let secret = read_secret(cli.key_file.as_deref())?;

  let prepared = match &cli.command {
    Commands::DevMint(args) => prepare_dev_mint(&config, &secret, args)?,
    Commands::List(args) => prepare_listing(&config, &secret, args)?,
  };
  drop(secret);

  if !cli.yes && !confirm(&prepared)? {
    eprintln!("aborted");
    return Ok(ExitCode::SUCCESS);
  }

  let failed_out = cli
    .failed_out
    .clone()
    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { execute(prepared, &failed_out, cli.json_events).await })
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug,hyper=warn,h2=warn,reqwest=info,rustls=info")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn default_config_path() -> Result<PathBuf> {
  let home = dirs::home_dir().context("could not determine home directory")?;
  Ok(home.join(".mintdesk").join("config.json"))
}

fn read_secret(key_file: Option<&Path>) -> Result<String> {
  match key_file {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("failed to read key file: {}", path.display())),
    None => std::env::var(PRIVATE_KEY_ENV)
      .with_context(|| format!("no private key: set {PRIVATE_KEY_ENV} or pass --key-file")),
  }
}

fn prepare_dev_mint(config: &AppConfig, secret: &str, args: &DevMintArgs) -> Result<Prepared> {
  let network = config.network(args.network)?;
  let signing =
    SigningContext::create(args.network, secret).context("invalid private key")?;
  let contract = parse_address("contract", &args.contract)?;

  let abi_json = std::fs::read_to_string(&args.abi)
    .with_context(|| format!("failed to read abi file: {}", args.abi.display()))?;
  let abi = parse_mint_abi(&abi_json, &args.entry_point)?;

  let items = input::read_recipients(&args.recipients)?;
  ensure_work(&items, &args.recipients)?;

  let client = signing.connect(&network.rpc_url)?;
  let phase = DirectCallPhase::new(client, contract, abi, &args.entry_point).confirm(args.confirm);

  Ok(Prepared {
    summary: vec![
      ("network", args.network.to_string()),
      ("signer", format!("{:?}", signing.address())),
      ("contract", args.contract.clone()),
      ("function", format!("{}(address, 1)", args.entry_point)),
      ("recipients", items.len().to_string()),
      ("transactions", total_units(&items).to_string()),
    ],
    items,
    workflow: Workflow::dev_mint(Arc::new(phase)),
  })
}

fn prepare_listing(config: &AppConfig, secret: &str, args: &ListArgs) -> Result<Prepared> {
  let network = config.network(args.network)?;
  let signing =
    SigningContext::create(args.network, secret).context("invalid private key")?;
  let collection = parse_address("collection", &args.collection)?;
  let price = parse_price(&args.price)?;

  let overrides = OrderOverrides {
    strategy: args.strategy.clone(),
    currency: args.currency.clone(),
  };
  let template = OrderTemplate::for_network(
    signing.address(),
    collection,
    price,
    &overrides,
    network,
    unix_now(),
  )?;
  let exchange = parse_address("exchange", &network.exchange)?;
  let domain = exchange_domain(&network.domain, args.network, exchange);
  let market = MarketClient::new(&args.api, &config.market.api_key)?;

  let binding = StandardBinding::resolve(args.standard, network)?;
  let operator = binding.transfer_manager;
  let client = signing.connect(&network.rpc_url)?;
  let approval = ApprovalCallPhase::new(client, collection, binding);

  let items = input::read_tokens(&args.tokens)?;
  ensure_work(&items, &args.tokens)?;

  Ok(Prepared {
    summary: vec![
      ("network", args.network.to_string()),
      ("signer", format!("{:?}", signing.address())),
      ("collection", format!("{} ({})", args.collection, args.standard)),
      ("approve", format!("{operator:?}")),
      ("price", format!("{} ({price} wei)", args.price.trim())),
      ("marketplace", market.endpoint().to_string()),
      ("tokens", items.len().to_string()),
    ],
    workflow: Workflow::listing(
      Arc::new(approval),
      Arc::new(OrderSubmissionPhase::new(signing, market, template, domain)),
    ),
    items,
  })
}

fn ensure_work(items: &[WorkItem], path: &Path) -> Result<()> {
  if items.is_empty() {
    bail!("nothing to do: {} has no usable rows", path.display());
  }
  Ok(())
}

fn confirm(prepared: &Prepared) -> Result<bool> {
  let mut stderr = io::stderr().lock();
  for (label, value) in &prepared.summary {
    writeln!(stderr, "  {label:<13} {value}")?;
  }
  write!(stderr, "Proceed? [y/N] ")?;
  stderr.flush()?;

  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn execute(prepared: Prepared, failed_out: &Path, json_events: bool) -> Result<ExitCode> {
  let Prepared {
    items, workflow, ..
  } = prepared;

  let (notifier, receiver) = ChannelNotifier::channel();
  let printer = tokio::spawn(progress::render(receiver, json_events));

  let mut runner = BatchRunner::with_notifier(notifier);
  let result = runner.run(&items, &workflow).await;
  // Closes the event channel so the printer drains and exits.
  drop(runner);
  printer.await?;

  let report = result.context("run aborted")?;
  println!("{}", serde_json::to_string_pretty(&report)?);

  if !report.has_failures() {
    return Ok(ExitCode::SUCCESS);
  }

  report
    .write_failures(failed_out)
    .with_context(|| format!("failed to export failures to {}", failed_out.display()))?;
  eprintln!(
    "{} failed; keys written to {}",
    report.failure_count,
    failed_out.display()
  );
  Ok(ExitCode::from(2))
}

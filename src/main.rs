use clap::{Parser, Subcommand};
use color_eyre::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use legiscan::config::Config;
use legiscan::filter::{Constraint, MasterListFilter};
use legiscan::legiscan::types::SearchYear;
use legiscan::legiscan::LegiScanClient;
use legiscan::logging;
use legiscan::social::{
  JsonFileStore, MemoryStore, SocialMediaRecord, SocialMediaResolver, SocialMediaStore,
};

#[derive(Parser, Debug)]
#[command(name = "legiscan")]
#[command(about = "Query the LegiScan API and look up legislators' social media")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/legiscan/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// LegiScan API key (default: config file, then LEGISCAN_API_KEY)
  #[arg(long, global = true)]
  api_key: Option<String>,

  /// State to scope lookups to, as a USPS abbreviation
  #[arg(short, long, global = true)]
  state: Option<String>,

  /// Don't scope lookups to any state
  #[arg(long, global = true, conflicts_with = "state")]
  no_state: bool,

  /// Log debug output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List sessions for the state
  Sessions,
  /// List bills in the current session of the state, or in a given session
  MasterList {
    /// Session to list when no state is selected
    #[arg(long)]
    session_id: Option<u64>,
    /// Keep bills where field=value (use * to require the field only)
    #[arg(long = "where", value_name = "FIELD=VALUE")]
    constraints: Vec<Constraint>,
  },
  /// Bill detail by id, or by number within the state
  Bill {
    #[arg(long, conflicts_with = "number")]
    id: Option<u64>,
    #[arg(long)]
    number: Option<String>,
  },
  /// Bill text document
  Text { doc_id: u64 },
  Amendment { amendment_id: u64 },
  Supplement { supplement_id: u64 },
  /// Roll call vote detail
  RollCall { roll_call_id: u64 },
  /// Sponsor (person) detail
  Sponsor { people_id: u64 },
  /// Full text search
  Search {
    #[arg(long, conflicts_with = "query")]
    bill: Option<String>,
    #[arg(long)]
    query: Option<String>,
    /// 1/all, 2/current, 3/recent, 4/prior, or a four-digit year
    #[arg(long, default_value = "current")]
    year: SearchYear,
    #[arg(long, default_value_t = 1)]
    page: u32,
  },
  /// Social media handles for one or more people
  Social {
    #[arg(required = true)]
    people_ids: Vec<u64>,
    /// Don't read or write the cache file
    #[arg(long)]
    no_cache: bool,
  },
  /// Bills added to the master list since it had SKIP entries
  NewBills {
    #[arg(long, default_value_t = 0)]
    skip: usize,
    #[arg(long = "where", value_name = "FIELD=VALUE")]
    constraints: Vec<Constraint>,
  },
  /// Bill text URL on the state legislature site
  GovUrl { bill_id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;
  let _log_guard = logging::init(args.verbose, config.log_file.as_deref())?;

  let api_key = config.api_key(args.api_key.as_deref())?;
  let mut client = LegiScanClient::from_config(&config, &api_key);
  if args.no_state {
    client.set_state(None);
  } else if let Some(state) = args.state {
    client.set_state(Some(state));
  }

  run(args.command, &client, &config).await
}

async fn run(command: Command, client: &LegiScanClient, config: &Config) -> Result<()> {
  match command {
    Command::Sessions => print_json(&client.session_list().await?),
    Command::MasterList {
      session_id,
      constraints,
    } => {
      let stubs = client.master_list(session_id).await?;
      let filter: MasterListFilter = constraints.into_iter().collect();
      print_json(&filter.apply(&stubs))
    }
    Command::Bill { id, number } => print_json(&client.bill(id, number.as_deref()).await?),
    Command::Text { doc_id } => print_json(&client.bill_text(doc_id).await?),
    Command::Amendment { amendment_id } => print_json(&client.amendment(amendment_id).await?),
    Command::Supplement { supplement_id } => print_json(&client.supplement(supplement_id).await?),
    Command::RollCall { roll_call_id } => print_json(&client.roll_call(roll_call_id).await?),
    Command::Sponsor { people_id } => print_json(&client.sponsor(people_id).await?),
    Command::Search {
      bill,
      query,
      year,
      page,
    } => {
      let results = client
        .search(bill.as_deref(), query.as_deref(), year, page)
        .await?;
      print_json(&results)
    }
    Command::Social {
      people_ids,
      no_cache,
    } => {
      let records = if no_cache {
        let resolver = SocialMediaResolver::new(MemoryStore::new());
        resolve_all(resolver, client, config, &people_ids).await?
      } else {
        let path = config.cache_path()?;
        info!(path = %path.display(), "Reading social media cache");
        let resolver = SocialMediaResolver::new(JsonFileStore::load(&path)?);
        resolve_all(resolver, client, config, &people_ids).await?
      };
      print_json(&records)
    }
    Command::NewBills { skip, constraints } => {
      let filter: MasterListFilter = constraints.into_iter().collect();
      print_json(&client.new_bill_stubs(skip, &filter).await?)
    }
    Command::GovUrl { bill_id } => {
      println!("{}", client.gov_url(bill_id).await?);
      Ok(())
    }
  }
}

async fn resolve_all<S: SocialMediaStore>(
  resolver: SocialMediaResolver<S>,
  client: &LegiScanClient,
  config: &Config,
  people_ids: &[u64],
) -> Result<BTreeMap<u64, SocialMediaRecord>> {
  let mut resolver = resolver.with_biography_url(&config.biography_url);
  let mut records = BTreeMap::new();
  for &person_id in people_ids {
    let record = resolver.find_social_media(client, person_id).await?;
    records.insert(person_id, record);
  }
  Ok(records)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

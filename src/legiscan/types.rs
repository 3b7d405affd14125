use serde::Serialize;
use serde_json::{Map, Value};

/// Summary record for a bill as returned by the master list.
pub type BillStub = Map<String, Value>;

/// Full bill detail (sponsors, history, texts, votes).
pub type Bill = Map<String, Value>;

/// Bill text document. Content is base64 encoded upstream.
pub type BillText = Map<String, Value>;

pub type Amendment = Map<String, Value>;

pub type Supplement = Map<String, Value>;

pub type RollCall = Map<String, Value>;

pub type Session = Map<String, Value>;

/// One page of full-text search results
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
  pub summary: Value,
  pub results: Vec<Value>,
}

/// Which years a full-text search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchYear {
  All,
  #[default]
  Current,
  Recent,
  Prior,
  /// A literal four-digit year
  Exact(u16),
}

impl SearchYear {
  /// Value sent as the `year` query parameter.
  pub fn as_param(&self) -> String {
    match self {
      Self::All => "1".to_string(),
      Self::Current => "2".to_string(),
      Self::Recent => "3".to_string(),
      Self::Prior => "4".to_string(),
      Self::Exact(year) => year.to_string(),
    }
  }
}

impl std::str::FromStr for SearchYear {
  type Err = String;

  /// Accepts the shorthand 1-4, the names `all`/`current`/`recent`/`prior`,
  /// or a four-digit year.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "1" | "all" => Ok(Self::All),
      "2" | "current" => Ok(Self::Current),
      "3" | "recent" => Ok(Self::Recent),
      "4" | "prior" => Ok(Self::Prior),
      other if other.len() == 4 => other
        .parse()
        .map(Self::Exact)
        .map_err(|_| format!("Invalid year: {}", s)),
      _ => Err(format!(
        "Invalid year selector '{}': use 1-4, all, current, recent, prior or a four-digit year",
        s
      )),
    }
  }
}

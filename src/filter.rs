//! Client-side filtering of master list bill stubs.

use serde_json::Value;

use crate::legiscan::types::BillStub;

/// How a single field is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
  /// Field must be present, any value
  Any,
  /// Field must be present and equal to this value
  Equals(Value),
}

impl Matcher {
  /// Parse a command-line style value: `*` matches anything, otherwise the
  /// text is read as JSON when it parses (so `1` is a number and `"*"` is a
  /// literal asterisk) and as a plain string when it doesn't.
  pub fn parse(text: &str) -> Self {
    if text == "*" {
      return Self::Any;
    }
    Self::Equals(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
  }

  fn matches(&self, value: &Value) -> bool {
    match self {
      Self::Any => true,
      Self::Equals(expected) => value == expected,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
  pub field: String,
  pub matcher: Matcher,
}

impl std::str::FromStr for Constraint {
  type Err = String;

  /// Parse `field=value`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (field, value) = s
      .split_once('=')
      .ok_or_else(|| format!("Invalid constraint '{}': expected field=value", s))?;
    let field = field.trim();
    if field.is_empty() {
      return Err(format!("Invalid constraint '{}': empty field name", s));
    }
    Ok(Self {
      field: field.to_string(),
      matcher: Matcher::parse(value.trim()),
    })
  }
}

/// Conjunction of field constraints over bill stubs.
///
/// A stub passes when every constraint is satisfied. A constraint on a field
/// the stub doesn't have is never satisfied. No constraints passes everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterListFilter {
  constraints: Vec<Constraint>,
}

impl MasterListFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, constraint: Constraint) -> Self {
    self.constraints.push(constraint);
    self
  }

  /// Require `field` to be present with any value.
  pub fn present(self, field: &str) -> Self {
    self.with(Constraint {
      field: field.to_string(),
      matcher: Matcher::Any,
    })
  }

  /// Require `field` to equal `value` exactly.
  pub fn equals(self, field: &str, value: Value) -> Self {
    self.with(Constraint {
      field: field.to_string(),
      matcher: Matcher::Equals(value),
    })
  }

  pub fn constraints(&self) -> &[Constraint] {
    &self.constraints
  }

  pub fn matches(&self, stub: &BillStub) -> bool {
    self.constraints.iter().all(|c| {
      stub
        .get(&c.field)
        .is_some_and(|value| c.matcher.matches(value))
    })
  }

  /// Stubs passing the filter, in their original order.
  pub fn apply(&self, stubs: &[BillStub]) -> Vec<BillStub> {
    stubs.iter().filter(|s| self.matches(s)).cloned().collect()
  }
}

impl FromIterator<Constraint> for MasterListFilter {
  fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
    Self {
      constraints: iter.into_iter().collect(),
    }
  }
}

//! These structs provide the CLI interface for budgetflow.

use crate::model::Kind;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budgetflow: A personal finance dashboard for the command line.
///
/// Log your income and expenses to a hosted transaction store, see your balance, a naive
/// month-end projection and your recent transactions, and browse them on a month calendar.
///
/// Set BUDGETFLOW_IN_TEST_MODE=1 to use an in-memory store instead of the hosted one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need the base URL of your store, e.g.
    /// https://abcdefgh.supabase.co, and a file holding its API key. The key file is moved into
    /// the secrets directory under --budget-home.
    Init(InitArgs),
    /// Show the balance, income, expenses, projection, net flow and recent transactions.
    Dashboard(DashboardArgs),
    /// Show a month of transactions as a calendar.
    Calendar(CalendarArgs),
    /// Record a new income or expense.
    Add(AddArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budgetflow configuration is held. Defaults to ~/budgetflow
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// (Not shown): Args for the `budgetflow init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of your store, e.g. https://abcdefgh.supabase.co
    #[arg(long)]
    store_url: String,

    /// The path to a file holding the store API key. This file will be moved to the secrets
    /// directory.
    #[arg(long)]
    api_key: PathBuf,
}

impl InitArgs {
    pub fn new(store_url: impl Into<String>, api_key: impl Into<PathBuf>) -> Self {
        Self {
            store_url: store_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn api_key(&self) -> &Path {
        &self.api_key
    }
}

/// (Not shown): Args for the `budgetflow dashboard` command.
#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct DashboardArgs {
    /// How many of the most recent transactions to list.
    #[arg(long, default_value_t = 10)]
    recent: usize,
}

impl DashboardArgs {
    pub fn new(recent: usize) -> Self {
        Self { recent }
    }

    pub fn recent(&self) -> usize {
        self.recent
    }
}

/// How far `--next` and `--prev` may move the calendar: one thousand years.
pub const MAX_MONTH_SHIFT: i64 = 12_000;

/// (Not shown): Args for the `budgetflow calendar` command.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize)]
pub struct CalendarArgs {
    /// The month to show, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<String>,

    /// Move this many months forward from --month.
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(..=MAX_MONTH_SHIFT)
    )]
    next: u32,

    /// Move this many months back from --month.
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(..=MAX_MONTH_SHIFT)
    )]
    prev: u32,
}

impl CalendarArgs {
    pub fn new(month: Option<String>, next: u32, prev: u32) -> Self {
        Self { month, next, prev }
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn next(&self) -> u32 {
        self.next
    }

    pub fn prev(&self) -> u32 {
        self.prev
    }
}

/// (Not shown): Args for the `budgetflow add` command.
#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct AddArgs {
    /// What the transaction was for, e.g. "Netflix".
    #[arg(long)]
    description: String,

    /// The amount, a positive number such as 15.99. The sign comes from --kind.
    #[arg(long)]
    amount: String,

    /// "credit" for income or "debit" for an expense.
    #[arg(long, default_value_t = Kind::Debit)]
    kind: Kind,

    /// Defaults to "General".
    #[arg(long)]
    category: Option<String>,

    /// The day of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        kind: Kind,
        category: Option<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind,
            category,
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budgetflow"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                directory.",
            );
            PathBuf::from("budgetflow")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

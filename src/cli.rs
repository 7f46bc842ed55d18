use chained_hashmap::{DuplicatePolicy, TableConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chained-hashmap",
    about = "Exercise the chained hash table",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub table: TableArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Initial bucket count hint; rounded up to the capacity ladder.
    #[arg(long, global = true, default_value_t = 10)]
    pub capacity_hint: usize,

    #[arg(long, global = true, value_enum, default_value_t = DuplicatesArg::Reject)]
    pub duplicates: DuplicatesArg,

    #[arg(long, global = true, default_value_t = chained_hashmap::config::DEFAULT_MAX_LOAD_FACTOR)]
    pub max_load_factor: f64,
}

impl TableArgs {
    pub fn config(&self) -> TableConfig {
        TableConfig::new()
            .capacity_hint(self.capacity_hint)
            .duplicates(self.duplicates.into())
            .max_load_factor(self.max_load_factor)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert two keys, print the table, look one up and tear it down.
    Simple,
    /// Load a quadrangle index file keyed by DRG name.
    Load {
        path: PathBuf,
        /// Print every record in bucket order.
        #[arg(long)]
        print: bool,
        /// Longest line kept, in bytes.
        #[arg(long, default_value_t = 256)]
        max_line: usize,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DuplicatesArg {
    Reject,
    Replace,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::Reject => DuplicatePolicy::Reject,
            DuplicatesArg::Replace => DuplicatePolicy::Replace,
        }
    }
}

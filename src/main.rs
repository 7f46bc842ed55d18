mod cli;

use chained_hashmap::quad::{self, QuadRecord};
use chained_hashmap::{ChainedHashMap, TableConfig};
use clap::Parser;
use cli::{Cli, Command};
use env_logger::Builder;
use log::{info, LevelFilter};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn initialize_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env();
    let _ = builder.try_init();
}

fn main() {
    initialize_logger();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.table.config();
    match cli.command {
        Command::Simple => simple(config),
        Command::Load {
            path,
            print,
            max_line,
        } => load(config, &path, print, max_line),
    }
}

fn simple(config: TableConfig) -> Result<(), Box<dyn Error>> {
    let mut table: ChainedHashMap<String> = ChainedHashMap::with_config(config)?;
    println!("capacity: {}", table.capacity());
    println!("count: {}", table.len());

    for (key, value) in [("key1", "dogmeat"), ("key3", "catmeat")] {
        table.insert(key, value.to_string())?;
        println!("insert {key} -> {value}; count: {}", table.len());
    }

    table.for_each(|bucket, key, value| println!("bucket {bucket:>4}  {key}: {value}"));

    for key in ["key1", "key2"] {
        match table.get(key) {
            Some(value) => println!("get {key}: {value}"),
            None => println!("get {key}: not found"),
        }
    }

    table.destroy(|value| info!("released {value}"));
    Ok(())
}

fn load(
    config: TableConfig,
    path: &Path,
    print: bool,
    max_line: usize,
) -> Result<(), Box<dyn Error>> {
    let file = File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let loaded = quad::load_table(BufReader::new(file), config, max_line)?;
    let table = loaded.table;

    if print {
        table.for_each(|bucket, _, record: &QuadRecord| println!("bucket {bucket:>8}  {record}"));
    }
    println!("records: {}", loaded.records);
    println!("duplicates skipped: {}", loaded.duplicates);
    println!("count: {}", table.len());
    println!("capacity: {}", table.capacity());
    println!("load factor: {:.3}", table.load_factor());

    let mut released = 0usize;
    table.destroy(|_| released += 1);
    info!("destroyed table, released {released} records");
    Ok(())
}

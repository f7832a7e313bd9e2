//! RelState - table inspection tool
//!
//! Lists the tables of a database file, or pretty-prints one table. An
//! optional third argument carries a transport-encoded match map (the same
//! opaque string a CLI or HTTP caller would pass) to filter the rows.
//!
//! Usage: relstate-dump <db-path> [table [match-b64]]

use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

use relstate::codec::{decode_transport, ResponsePayload};
use relstate::error::{Error, Result};
use relstate::query::{Columns, Query, ValueMap};
use relstate::store::RelationalStore;
use relstate::value::{Structured, Value};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("usage: relstate-dump <db-path> [table [match-b64]]");
        process::exit(2);
    }

    match run(&args).await {
        Ok(output) => println!("{}", output),
        Err(error) => {
            let payload = ResponsePayload::failure(&error);
            eprintln!(
                "{}",
                serde_json::to_string(&payload).unwrap_or_else(|_| error.to_string())
            );
            process::exit(1);
        }
    }
}

async fn run(args: &[String]) -> Result<String> {
    let store = RelationalStore::open(&args[1])?;
    let tables = store.list_tables().await?;

    let Some(table) = args.get(2) else {
        return Ok(tables.join("\n"));
    };
    if !tables.contains(table) {
        return Err(Error::TableNotFound(table.clone()));
    }

    let match_values = args.get(3).map(|encoded| decode_match(encoded)).transpose()?;
    let query = Query::get_table(table, Columns::All, match_values.as_ref(), None);
    let result = store.read(&query).await?;
    Ok(result.display().to_string())
}

fn decode_match(encoded: &str) -> Result<ValueMap> {
    match decode_transport(encoded)? {
        Value::Structured(Structured::Map(map)) => Ok(map),
        other => Err(Error::invalid_value("match argument", other.to_string())),
    }
}

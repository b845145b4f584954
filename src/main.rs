use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weekdb::{Connection, ConnectionConfig, Document, DocumentKey, expect_object};

#[derive(Parser)]
#[command(name = "weekdb")]
#[command(about = "Inspect and edit a WeekDB JSON database file")]
struct Cli {
    /// Existing .json database file
    #[arg(long)]
    path: PathBuf,
    /// Indent the file when saving
    #[arg(long)]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List collection names
    Collections,
    Create {
        name: String,
        /// Succeed if the collection already exists
        #[arg(long)]
        again: bool,
    },
    Drop {
        name: String,
    },
    All {
        collection: String,
    },
    Get {
        collection: String,
        id: String,
    },
    Last {
        collection: String,
        #[arg(long)]
        count: Option<usize>,
    },
    Filter {
        collection: String,
        params: String,
    },
    Exclude {
        collection: String,
        params: String,
    },
    Exists {
        collection: String,
        id: String,
    },
    Count {
        collection: String,
    },
    Add {
        collection: String,
        document: String,
    },
    Update {
        collection: String,
        document: String,
    },
    Delete {
        collection: String,
        id: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConnectionConfig::new().pretty(cli.pretty);
    let mut conn = Connection::open_with_config(&cli.path, config)
        .with_context(|| format!("failed to open {}", cli.path.display()))?;

    let output = run(&mut conn, cli.command)?;
    if !output.is_null() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn run(conn: &mut Connection, command: Command) -> Result<Value> {
    let output = match command {
        Command::Collections => json!(conn.collections()),
        Command::Create { name, again } => {
            let collection = conn.add_collection(&name, again)?;
            collection.save()?;
            json!({"collection": name, "count": collection.count()})
        }
        Command::Drop { name } => {
            let removed = conn.delete_collection(&name)?;
            conn.save()?;
            json!({"collection": name, "count": removed.count()})
        }
        Command::All { collection } => {
            documents_value(conn.get_collection(&collection)?.all().iter())
        }
        Command::Get { collection, id } => {
            let doc = conn.get_collection(&collection)?.get(parse_id(&id))?;
            Value::Object(doc.clone())
        }
        Command::Last { collection, count } => {
            let collection = conn.get_collection(&collection)?;
            match count {
                Some(count) => documents_value(collection.last_n(count)),
                None => collection
                    .last()
                    .map(|doc| Value::Object(doc.clone()))
                    .unwrap_or(Value::Null),
            }
        }
        Command::Filter { collection, params } => {
            let params = parse_document(&params)?;
            documents_value(conn.get_collection(&collection)?.filter(&params))
        }
        Command::Exclude { collection, params } => {
            let params = parse_document(&params)?;
            documents_value(conn.get_collection(&collection)?.exclude(&params))
        }
        Command::Exists { collection, id } => {
            json!(conn.get_collection(&collection)?.exists(parse_id(&id)))
        }
        Command::Count { collection } => json!(conn.get_collection(&collection)?.count()),
        Command::Add {
            collection,
            document,
        } => {
            let document = parse_document(&document)?;
            let mut collection = conn.get_collection_mut(&collection)?;
            let stored = Value::Object(collection.add(document)?.clone());
            collection.save()?;
            stored
        }
        Command::Update {
            collection,
            document,
        } => {
            let document = parse_document(&document)?;
            let mut collection = conn.get_collection_mut(&collection)?;
            let stored = Value::Object(collection.update(document)?.clone());
            collection.save()?;
            stored
        }
        Command::Delete { collection, id } => {
            let mut collection = conn.get_collection_mut(&collection)?;
            let removed = collection.delete(parse_id(&id))?;
            collection.save()?;
            Value::Object(removed)
        }
    };
    Ok(output)
}

/// `5` is the integer 5, `"5"` and `abc` are text.
fn parse_id(raw: &str) -> DocumentKey {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => DocumentKey::from(value),
        Err(_) => DocumentKey::from(raw),
    }
}

fn parse_document(raw: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(raw).context("expected a JSON object")?;
    Ok(expect_object(value)?)
}

fn documents_value<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Value {
    Value::Array(docs.into_iter().map(|doc| Value::Object(doc.clone())).collect())
}

//! `handy` CLI -- read and patch JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve an accessor path (stdin → stdout)
//! echo '{"lib":{"opts":{"flag":7}}}' | handy get lib.opts.flag
//!
//! # Required segments fail when missing; defaults apply to the last segment
//! handy get -i settings.json 'some_lib.init_opts.secret!'
//! handy get -i settings.json missing.deeper --default 42
//!
//! # A missing (or null) optional path prints `null`; a stored empty object
//! # prints `{}`
//! handy get -i settings.json missing.deeper
//!
//! # Escaped names reach keys that collide with reserved names
//! handy get -i settings.json some_lib._methods_
//!
//! # Merge change-set files over a base document, then apply assignments
//! handy patch -i base.json -c override.json -c local.json --set lib.opts.flag=9 -o out.json
//! ```
//!
//! Set `RUST_LOG=handy_doc=debug` (or pass `--verbose`) to see patch and
//! accessor diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use handy_doc::{resolve_path, Builder, Document, Value};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "handy",
    version,
    about = "Read and patch JSON documents with indifferent accessors"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dotted accessor path and print the value as JSON
    Get {
        /// Accessor path, e.g. `some_lib.init_opts.flags!` or `some_lib._methods_`
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Value returned when the last segment is missing (JSON, or a plain string)
        #[arg(long)]
        default: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Merge change sets over a document and print the result
    Patch {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Change-set file; repeat to fold several, later files win
        #[arg(short, long = "changes")]
        changes: Vec<String>,
        /// Assignment `PATH=VALUE`, applied after change-set files (VALUE is JSON, or a plain string)
        #[arg(long = "set")]
        set: Vec<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Get {
            path,
            input,
            default,
            pretty,
        } => {
            let doc = read_document(input.as_deref())?;
            let default = default.as_deref().map(parse_value);
            let value = resolve_path(&doc, &path, default.as_ref())
                .with_context(|| format!("Failed to resolve '{}'", path))?;
            let out = if value.is_nil() {
                render(&Value::Null, pretty)?
            } else {
                render(value, pretty)?
            };
            println!("{}", out);
        }
        Commands::Patch {
            input,
            changes,
            set,
            output,
            pretty,
        } => {
            let doc = read_document(input.as_deref())?;

            let mut change_sets = Vec::with_capacity(changes.len() + set.len());
            for path in &changes {
                let text = read_input(Some(path))?;
                let change_set = Document::from_json_str(&text)
                    .with_context(|| format!("Failed to parse change set: {}", path))?;
                change_sets.push(change_set);
            }
            for assignment in &set {
                change_sets.push(assignment_change_set(assignment)?);
            }
            debug!(change_sets = change_sets.len(), "applying change sets");

            let patched = doc.patch_all(&change_sets);
            let json = patched
                .to_json_string(pretty)
                .context("Failed to serialize patched document")?;
            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse a command-line value as JSON, falling back to a plain string.
///
/// - `9` → number, `true` → bool, `{"a":1}` → document
/// - `hello` (not valid JSON) → the string `"hello"`
fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

/// Turn `a.b.c=VALUE` into a change set `{"a": {"b": {"c": VALUE}}}`.
///
/// Each assignment becomes its own change set; assignments sharing a prefix
/// are combined by the patch.
fn assignment_change_set(assignment: &str) -> Result<Document> {
    let (path, raw) = assignment
        .split_once('=')
        .with_context(|| format!("Invalid assignment '{}': expected PATH=VALUE", assignment))?;
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        anyhow::bail!("Invalid assignment '{}': empty path", assignment);
    };
    let value = parse_value(raw);

    Builder::build(|b| {
        let mut scope = b;
        for segment in parents {
            scope = scope.child(segment);
        }
        scope.set(last, value);
    })
    .with_context(|| format!("Invalid assignment '{}'", assignment))
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let json = value.to_json().context("Failed to serialize value")?;
    let out = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(out)
}

fn read_document(path: Option<&str>) -> Result<Document> {
    let text = read_input(path)?;
    Document::from_json_str(&text).context("Failed to parse input document")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

//! oxide-dialect CLI
//!
//! Command-line tool for inspecting resolved SQL dialects.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_dialect_core::dialect::TypeCode;
use oxide_dialect_core::strategy::{LockMode, LockTimeout};
use oxide_dialect_core::{Capability, DatabaseVersion, Dialect, DialectSettings, Limit};

/// Inspect dialect capabilities and render dialect-specific SQL fragments.
#[derive(Parser)]
#[command(name = "oxide-dialect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect family name or alias (postgresql, mysql, mssql, ...).
    #[arg(short, long, env = "OXIDE_DIALECT")]
    dialect: Option<String>,

    /// Database version, such as 8.0.14. Omit for the newest behavior.
    #[arg(long = "db-version", env = "OXIDE_DIALECT_VERSION")]
    db_version: Option<String>,

    /// MySQL storage engine (InnoDB, MyISAM).
    #[arg(long, env = "OXIDE_STORAGE_ENGINE")]
    storage_engine: Option<String>,

    /// JSON settings file. Flags override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every capability and whether the dialect has it.
    Capabilities {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Render a column type.
    ColumnType {
        /// Type code, such as varchar or timestamp_with_time_zone.
        code: String,

        /// Length for character and binary types.
        #[arg(short, long)]
        length: Option<u32>,

        /// Precision for numeric and temporal types.
        #[arg(short, long)]
        precision: Option<u32>,

        /// Scale for numeric types.
        #[arg(short, long)]
        scale: Option<u32>,
    },

    /// Render the lock clause appended to a query.
    Lock {
        /// Lock mode (read, write, upgrade_nowait, ...).
        #[arg(short, long, default_value = "write")]
        mode: String,

        /// Lock timeout: wait, nowait, skip_locked or milliseconds.
        #[arg(short, long, default_value = "wait")]
        timeout: String,

        /// Lock only these table aliases.
        #[arg(long = "of")]
        of: Vec<String>,
    },

    /// Render sequence DDL and next-value SQL.
    Sequence {
        /// Sequence name.
        name: String,

        /// First value.
        #[arg(long, default_value_t = 1)]
        start: i64,

        /// Increment.
        #[arg(long, default_value_t = 1)]
        increment: i64,
    },

    /// Apply the dialect's pagination to a SQL string.
    Paginate {
        /// The query to paginate.
        sql: String,

        /// Rows to return.
        #[arg(short, long)]
        limit: Option<u64>,

        /// Rows to skip.
        #[arg(short, long)]
        offset: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = settings(&cli)?;
    let dialect = settings.resolve()?;
    debug!(dialect = %dialect, patches = ?dialect.applied_patches(), "resolved");

    match cli.command {
        Commands::Capabilities { json } => {
            if json {
                let map: serde_json::Map<String, serde_json::Value> = Capability::ALL
                    .iter()
                    .map(|c| (c.as_str().to_string(), dialect.supports(*c).into()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                println!("\n{}:", dialect.name());
                println!("{:-<40}", "");
                for capability in Capability::ALL {
                    let mark = if dialect.supports(*capability) { "X" } else { " " };
                    println!(" [{mark}] {capability}");
                }
                println!();
            }
        }

        Commands::ColumnType {
            code,
            length,
            precision,
            scale,
        } => {
            let code: TypeCode = code.parse()?;
            match dialect.column_type(code, length, precision, scale) {
                Some(native) => println!("{native}"),
                None => bail!("{} has no {} type", dialect.name(), code.as_str()),
            }
        }

        Commands::Lock { mode, timeout, of } => {
            let mode: LockMode = mode.parse()?;
            let timeout: LockTimeout = timeout.parse()?;
            if let Some(hint) = dialect.lock_hint(mode, timeout) {
                info!("{} locks through table hints", dialect.name());
                println!("{}", hint.trim_start());
            } else if of.is_empty() {
                println!("{}", dialect.lock_string(mode, timeout).trim_start());
            } else {
                println!("{}", dialect.lock_string_of(mode, timeout, &of).trim_start());
            }
        }

        Commands::Sequence {
            name,
            start,
            increment,
        } => {
            let Some(create) = dialect.sequence_ddl(&name, start, increment) else {
                bail!("{} has no sequences", dialect.name());
            };
            println!("{create};");
            if let Some(select) = dialect.select_next_value_sql(&name) {
                println!("{select};");
            }
            if let Some(drop) = dialect.drop_sequence_sql(&name) {
                println!("{drop};");
            }
        }

        Commands::Paginate { sql, limit, offset } => {
            print_paginated(&dialect, &sql, Limit::new(offset, limit))?;
        }
    }

    Ok(())
}

/// Merges the settings file with flags and environment variables.
fn settings(cli: &Cli) -> anyhow::Result<DialectSettings> {
    let mut settings = match &cli.config {
        Some(path) => DialectSettings::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => match &cli.dialect {
            Some(dialect) => DialectSettings::new(dialect.as_str()),
            None => bail!("no dialect given; pass --dialect or set OXIDE_DIALECT"),
        },
    };
    if let Some(dialect) = &cli.dialect {
        settings.dialect.clone_from(dialect);
    }
    if let Some(version) = &cli.db_version {
        settings.version = Some(version.parse::<DatabaseVersion>()?);
    }
    if let Some(engine) = &cli.storage_engine {
        settings.storage_engine = Some(engine.clone());
    }
    Ok(settings)
}

fn print_paginated(dialect: &Dialect, sql: &str, limit: Limit) -> anyhow::Result<()> {
    let handler = dialect.limit_handler();
    let limited = handler.apply(sql, &limit, Vec::new())?;
    println!("{}", limited.sql);
    if !limited.params.is_empty() {
        let values: Vec<String> = limited.params.iter().map(|p| format!("{p:?}")).collect();
        println!("-- parameters: {}", values.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_flags_build_settings() {
        let cli = parse(&[
            "oxide-dialect",
            "--dialect",
            "mysql",
            "--db-version",
            "8.0.14",
            "--storage-engine",
            "MyISAM",
            "capabilities",
        ]);
        let settings = settings(&cli).unwrap();
        assert_eq!(settings.dialect, "mysql");
        assert_eq!(settings.version, Some(DatabaseVersion::new(8, 0, 14)));
        assert_eq!(settings.storage_engine.as_deref(), Some("MyISAM"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dialect": "oracle", "version": "11.2" }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["oxide-dialect", "--config", &path, "--db-version", "19", "sequence", "s"]);
        let settings = settings(&cli).unwrap();
        assert_eq!(settings.dialect, "oracle");
        assert_eq!(settings.version, Some(DatabaseVersion::major(19)));
    }

    #[test]
    fn test_paginate_arguments() {
        let cli = parse(&[
            "oxide-dialect",
            "-d",
            "sqlserver",
            "paginate",
            "select a from t order by a",
            "--limit",
            "10",
            "--offset",
            "20",
        ]);
        let Commands::Paginate { sql, limit, offset } = cli.command else {
            panic!("expected paginate");
        };
        assert_eq!(sql, "select a from t order by a");
        assert_eq!((limit, offset), (Some(10), Some(20)));
    }
}

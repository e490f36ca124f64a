use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use statement_dialects::{DialectKind, ParseSession, RawDocument};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "cli_reader",
    version,
    about = "Читает банковские выписки ING и Rabobank (MT940, CSV) и печатает их в общем виде.",
    long_about = None,
)]
struct Args {
    /// Входной файл
    #[arg(long)]
    input: PathBuf,

    /// Разрешённые диалекты в порядке приоритета; по умолчанию все
    #[arg(long = "dialect", value_enum)]
    dialects: Vec<DialectArg>,

    /// Формат вывода
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Подробность логов (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DialectArg {
    Ing,
    Rabobank,
    RabobankCsv,
}

impl From<DialectArg> for DialectKind {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Ing => DialectKind::Ing,
            DialectArg::Rabobank => DialectKind::Rabobank,
            DialectArg::RabobankCsv => DialectKind::RabobankCsv,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // логи в stderr, чтобы не портить JSON в stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input file {}", args.input.display()))?;

    let session = if args.dialects.is_empty() {
        ParseSession::new()
    } else {
        let kinds: Vec<DialectKind> = args.dialects.iter().map(|d| (*d).into()).collect();
        ParseSession::with_dialects(&kinds)
    };

    let doc = RawDocument::new(&text);
    let statements = session
        .parse_document(&doc)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    info!(statements = statements.len(), "input parsed");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.format {
        OutputFormat::Text => {
            for statement in &statements {
                writeln!(handle, "{statement}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut handle, &statements)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}

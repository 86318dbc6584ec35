//! Command-line front end: reads a note and prints its cards.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use cloze_core::{
    Card, ClozeNote, ClozeType, FormatSettings, Note, RegexPattern, SimpleFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cloze", about = "Render overlapping cloze notes into flashcards", version)]
struct Cli {
    /// Note file to read, `-` for stdin
    input: String,

    /// Only render this card (zero-based)
    #[arg(long)]
    card: Option<usize>,

    /// Cloze style to parse the note with
    #[arg(long, default_value = "overlapping", value_parser = parse_cloze_type)]
    cloze_type: ClozeType,

    /// Cloze syntax to recognize
    #[arg(long, value_enum, default_value = "all")]
    pattern: PatternChoice,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    format: OutputFormat,

    /// JSON file with formatter settings
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PatternChoice {
    Highlight,
    Braces,
    All,
}

impl PatternChoice {
    fn patterns(self) -> Vec<RegexPattern> {
        match self {
            Self::Highlight => vec![RegexPattern::highlight()],
            Self::Braces => vec![RegexPattern::braces()],
            Self::All => RegexPattern::builtin(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let raw = read_input(&cli.input)?;
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => FormatSettings::default(),
    };

    let cards = render_cards(&raw, &cli, SimpleFormat::new(settings))?;
    tracing::info!("Rendered {} card(s) from {}", cards.len(), cli.input);

    match cli.format {
        OutputFormat::Plain => print!("{}", plain_output(&cards)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read note from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read note from {input}"))
}

fn load_settings(path: &Path) -> anyhow::Result<FormatSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("Invalid settings in {}", path.display()))
}

fn parse_cloze_type(value: &str) -> Result<ClozeType, String> {
    ClozeType::from_str(value).ok_or_else(|| format!("unknown cloze type '{value}'"))
}

fn parse_settings(content: &str) -> anyhow::Result<FormatSettings> {
    Ok(serde_json::from_str(content)?)
}

fn render_cards(raw: &str, cli: &Cli, format: SimpleFormat) -> anyhow::Result<Vec<Card>> {
    let patterns = cli.pattern.patterns();
    for pattern in &patterns {
        tracing::debug!(
            cloze_type = cli.cloze_type.as_str(),
            pattern = pattern.as_str(),
            "Using cloze pattern"
        );
    }

    let note = Note::parse(cli.cloze_type, raw, &patterns);
    if note.num_cards() == 0 {
        bail!("No cloze deletions found in {}", cli.input);
    }

    let cards = match cli.card {
        Some(index) => vec![note.card(index, Some(&format))?],
        None => note.cards(Some(&format))?,
    };
    Ok(cards)
}

fn plain_output(cards: &[Card]) -> String {
    let mut out = String::new();
    for card in cards {
        out.push_str(&format!("--- card {} ---\n", card.index));
        out.push_str(&format!("Front: {}\n", card.front));
        out.push_str(&format!("Back:  {}\n", card.back));
    }
    out
}

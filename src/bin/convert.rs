//! Transcript conversion CLI.
//!
//! Rewrites the text column of pipe-delimited transcript files from
//! annotated pinyin into phoneme symbol tokens (`convert`) or straight into
//! vocabulary id sequences (`encode`). Other columns pass through untouched.
//!
//! Exit code 0 on success, non-zero on error. `convert` drops lines whose
//! text it cannot represent and reports the counts; `encode` fails on the
//! first line that does not round-trip through the vocabulary.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use mandarin_text::{TranscriptConverter, Vocabulary, VocabularyScheme};

#[derive(Debug, Parser)]
#[command(name = "mandarin-convert")]
#[command(about = "Convert annotated pinyin transcripts to phoneme symbol sequences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rewrite each text column as space-joined symbol tokens.
    Convert(ConvertArgs),
    /// Rewrite each text column as space-joined symbol ids, end-of-sequence
    /// id appended.
    Encode(ConvertArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input transcript, one pipe-delimited record per line; only the last
    /// column is rewritten.
    input: PathBuf,

    /// Output path.
    output: PathBuf,

    /// Vocabulary layout of the target checkpoint.
    #[arg(long, value_enum)]
    scheme: SchemeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
    /// Tone digits folded into final symbols (`ong1`).
    #[value(name = "tone_in_final")]
    ToneInFinal,
    /// Bare finals with standalone tone symbols.
    #[value(name = "tone_marker")]
    ToneMarker,
}

impl From<SchemeArg> for VocabularyScheme {
    fn from(arg: SchemeArg) -> VocabularyScheme {
        match arg {
            SchemeArg::ToneInFinal => VocabularyScheme::ToneInFinal,
            SchemeArg::ToneMarker => VocabularyScheme::ToneMarker,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => {
            let converter = TranscriptConverter::new(Vocabulary::new(args.scheme.into()));
            let stats = converter.convert_file(&args.input, &args.output)?;
            println!(
                "kept {} of {} lines ({} unsupported, {} malformed)",
                stats.written, stats.read, stats.unsupported, stats.malformed
            );
        }
        Commands::Encode(args) => {
            let converter = TranscriptConverter::new(Vocabulary::new(args.scheme.into()));
            let written = converter.encode_file(&args.input, &args.output)?;
            println!("encoded {written} lines");
        }
    }

    Ok(())
}

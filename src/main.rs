use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use agp_curator::{parse_agp, run_script, write_agp, AgpGraph};

#[derive(Parser)]
#[command(name = "agp-curator")]
#[command(about = "Curate AGP assembly layouts with scripted structural edits")]
#[command(version)]
#[command(after_help = "If no AGP file is given, it's read from stdin.")]
struct Cli {
    /// Simplify the output: if adjacent components are contiguous,
    /// combine them and remove the internal gap
    #[arg(short, long)]
    simplify: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Edit script to apply
    script: PathBuf,

    /// AGP file to curate (default: stdin)
    agp: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let script = fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to open script file '{}'", cli.script.display()))?;

    let mut graph = load_graph(cli.agp.as_deref())?;

    run_script(&mut graph, &script)
        .with_context(|| format!("script '{}' failed", cli.script.display()))?;

    if cli.simplify {
        let merged = graph.simplify().context("simplify failed")?;
        eprintln!(
            "{}",
            format!("simplify: merged {merged} contiguous component pair(s)").dimmed()
        );
    }

    // Serialize fully in memory first: a failure must not leave a partial
    // graph behind the --out file.
    let mut output = Vec::new();
    write_agp(&mut graph, &mut output)?;

    match cli.out {
        Some(path) => write_output_file(&path, &output)
            .with_context(|| format!("failed to write output file '{}'", path.display()))?,
        None => io::stdout().write_all(&output)?,
    }

    Ok(())
}

fn load_graph(agp: Option<&Path>) -> Result<AgpGraph> {
    let reader: Box<dyn Read> = match agp {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("failed to open AGP file '{}'", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    let graph = parse_agp(BufReader::new(reader)).context("can't parse AGP file")?;
    Ok(graph)
}

/// Atomic write: tempfile in the target directory, then rename over the
/// destination, so a crash mid-write never leaves a truncated file.
fn write_output_file(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

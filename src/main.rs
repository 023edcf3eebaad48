use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{ErrorKind as ClapErrorKind, Parser};
use log::{error, info};

use goffsets::{extract_from_path, OffsetError, PKG_NAME, VERSION};

/// GOFFSETS - Go runtime struct offsets from DWARF debug info
#[derive(Parser, Debug)]
#[clap(name = "goffsets")]
#[clap(about = "Print Go runtime struct field offsets as JSON", version)]
struct Cli {
    /// Go executable to inspect
    binary: PathBuf,
    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[clap(short, long, parse(from_occurrences))]
    verbose: u64,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    goffsets::init_logging(goffsets::verbosity_level(cli.verbose));
    info!("Starting {} v{}", PKG_NAME, VERSION);

    if let Err(e) = run(&cli.binary) {
        error!("Extraction failed for {}: {}", cli.binary.display(), e);
        println!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}

/// Extract offsets from `path` and print them
fn run(path: &Path) -> Result<()> {
    let offsets = extract_from_path(path)?;
    let json = offsets.to_pretty_json()?;
    println!("{}", json);
    Ok(())
}

/// Exit code for a failed run: 2 if only the output encoding failed, else 1
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<OffsetError>()
        .map_or(1, OffsetError::exit_code)
}

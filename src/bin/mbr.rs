use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridgecrab::depict::{DepictionGenerator, Highlight};
use bridgecrab::{parse_smiles, BridgeConfig, MaximallyBridgingRings};

/// Find the maximally bridging rings of a molecule and depict the first one.
#[derive(Parser, Debug)]
#[command(name = "mbr", version, about)]
struct Cli {
    /// Input molecule as SMILES
    smiles: String,

    /// Molecule title, used for the caption and the default output name
    title: String,

    /// Smallest ring size considered
    #[arg(long, value_name = "N")]
    min_ring_size: Option<usize>,

    /// Largest ring size considered
    #[arg(long, value_name = "N")]
    max_ring_size: Option<usize>,

    /// Longest bridging path, in atoms including both ring atoms
    #[arg(long, value_name = "N")]
    bridge_length: Option<usize>,

    /// TOML file with analysis settings; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SVG output path [default: <TITLE>.svg]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Fail when a pair of ring atoms has more simple paths than this
    #[arg(long, value_name = "N")]
    max_paths: Option<usize>,

    /// Skip writing the SVG depiction
    #[arg(long)]
    no_depict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<BridgeConfig> {
        let base = match &self.config {
            Some(path) => BridgeConfig::load(path)?,
            None => BridgeConfig::default(),
        };
        let mut config = BridgeConfig::new(
            self.min_ring_size.unwrap_or(base.min_ring_size()),
            self.max_ring_size.unwrap_or(base.max_ring_size()),
            self.bridge_length.unwrap_or(base.bridge_length_max()),
        )?
        .with_parallel(base.parallel());
        if let Some(limit) = self.max_paths.or(base.max_paths()) {
            config = config.with_max_paths(limit)?;
        }
        if let Some(limit) = base.max_rings() {
            config = config.with_max_rings(limit)?;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config()?;
    debug!(?config, "effective configuration");

    let mut mol = parse_smiles(&cli.smiles).with_context(|| format!("could not parse {:?}", cli.smiles))?;
    mol.set_title(cli.title.as_str());

    let mut analysis = MaximallyBridgingRings::new(config);
    analysis.set_mol(&mol);
    let result = analysis.analyze()?;

    println!("Found {} bridging rings", result.len());
    for (ring, bridging) in &result {
        println!("Ring of size {} with {} bridging atoms", ring.len(), bridging.len());
    }

    if cli.no_depict {
        return Ok(());
    }
    let Some((ring, bridging)) = result.first() else {
        return Ok(());
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.svg", cli.title)));
    DepictionGenerator::new()
        .with_zoom(2.0)
        .with_title_scale(1.2)
        .with_fill_to_fit()
        .depict(&mol, &Highlight::from_ring(&mol, ring, bridging))
        .write_to(&output)?;
    info!(path = %output.display(), "wrote depiction");
    Ok(())
}

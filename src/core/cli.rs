use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::schematic::{self, Schematic, builtin};

#[derive(Parser, Debug)]
#[command(name = "schemview", version, about = "Interactive schematic viewer")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a gesture script and write the resulting view
    Render(RenderArgs),
    /// Print a component's info panel
    Inspect {
        /// Component reference, e.g. U1
        reference: String,
        #[command(flatten)]
        source: SchematicSource,
    },
    /// List the components of a schematic
    List {
        #[command(flatten)]
        source: SchematicSource,
    },
    /// Load and validate a schematic
    Validate {
        #[command(flatten)]
        source: SchematicSource,
    },
    /// Write the built-in schematic as JSON
    Dump {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {
        /// Save the default configuration to the config path
        #[arg(long)]
        write_defaults: bool,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SchematicSource,

    /// JSON array of viewer messages to apply before rendering
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Write the scene as SVG
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Write the scene as PNG
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Viewport width in pixels (overrides config)
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height in pixels (overrides config)
    #[arg(long)]
    pub height: Option<f32>,

    /// Leave out the usage hint
    #[arg(long)]
    pub no_hint: bool,
}

/// Where a command reads its schematic from
#[derive(Args, Debug, Default)]
pub struct SchematicSource {
    /// Schematic JSON file (built-in FOC driver board if omitted)
    #[arg(short, long)]
    pub schematic: Option<PathBuf>,
}

impl SchematicSource {
    pub fn load(&self) -> anyhow::Result<Schematic> {
        match &self.schematic {
            Some(path) => schematic::file::load(path),
            None => builtin::foc_driver(),
        }
    }
}

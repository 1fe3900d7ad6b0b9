use std::{fmt::Display, path::PathBuf};

use clap::Args;
use miette::{miette, Result};
use owo_colors::{OwoColorize, Stream::Stderr};
use tracing::error;
use xiv_sqpack::SqPack;

pub mod exd;
pub mod mdl;
pub mod mtrl;
pub mod sqpack;
pub mod tex;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect and extract SqPack archives
    Sqpack {
        #[command(subcommand)]
        command: sqpack::SqPackCommands,
    },
    /// Read data tables
    Exd {
        #[command(subcommand)]
        command: exd::ExdCommands,
    },
    /// Decode models
    Mdl {
        #[command(subcommand)]
        command: mdl::MdlCommands,
    },
    /// Decode textures
    Tex {
        #[command(subcommand)]
        command: tex::TexCommands,
    },
    /// Decode materials
    Mtrl {
        #[command(subcommand)]
        command: mtrl::MtrlCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Commands::Sqpack { command } => command.handle(),
            Commands::Exd { command } => command.handle(),
            Commands::Mdl { command } => command.handle(),
            Commands::Tex { command } => command.handle(),
            Commands::Mtrl { command } => command.handle(),
        }
    }
}

/// Location of the archive, shared by every command
#[derive(Args)]
pub struct ArchiveArgs {
    /// The sqpack directory holding the `*.win32.index` files
    #[arg(long, value_name = "DIR", env = "XIV_SQPACK")]
    sqpack: PathBuf,
}

impl ArchiveArgs {
    pub fn open(&self) -> SqPack {
        SqPack::new(&self.sqpack)
    }
}

/// Counts failures of a batch so that one bad item does not stop the rest
#[derive(Default)]
pub struct Batch {
    done: usize,
    failed: usize,
}

impl Batch {
    /// Record the outcome of one item, logging the failure with `what` identifying the item
    pub fn record<T, E: Display>(&mut self, what: impl Display, result: std::result::Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.done += 1;
                Some(value)
            }
            Err(err) => {
                self.failed += 1;
                error!("{what}: {err}");
                None
            }
        }
    }

    /// Fail when any item failed
    pub fn finish(self, noun: &str) -> Result<()> {
        if self.failed == 0 {
            return Ok(());
        }

        let summary = format!("{} of {} {noun} failed", self.failed, self.done + self.failed);
        eprintln!("{}", summary.if_supports_color(Stderr, |text| text.red()));
        Err(miette!(summary))
    }
}

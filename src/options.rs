use std::{net::IpAddr, path::PathBuf};

use byte_unit::{Byte, ByteError};
use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::archive::ArchiveConfig;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Options {
    /// Increase logs verbosity (Error (default), Warn, Info, Debug, Trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub log_level: u8,
    /// Source files directory path (relative).
    #[arg(short = 's', long, default_value = "sources")]
    pub sources_dir: PathBuf,
    /// Number of source files to include in the archive.
    #[arg(short = 'c', long, default_value = "10")]
    pub source_count: usize,
    /// Pipe and copy buffer size.
    #[arg(short = 'b', long, default_value = "10MiB", value_parser(parse_size))]
    pub chunk_size: u64,
    /// Generate the source files before starting, each of the given size.
    #[arg(short = 'g', long, value_parser(parse_size))]
    pub generate_sources: Option<u64>,
    /// HTTP listening address.
    #[arg(short = 'a', long, default_value = "127.0.0.1")]
    pub address: IpAddr,
    /// HTTP listening port.
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,
}

impl Options {
    pub fn log_level(&self) -> LevelFilter {
        use LevelFilter::*;
        match self.log_level {
            0 => Error,
            1 => Warn,
            2 => Info,
            3 => Debug,
            _ => Trace,
        }
    }

    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            source_count: self.source_count,
            chunk_size: self.chunk_size as usize,
        }
    }
}

fn parse_size(s: &str) -> Result<u64, ByteError> {
    Ok(s.parse::<Byte>()?.get_bytes())
}

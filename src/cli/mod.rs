//! CLI module for the image gateway
//!
//! Provides subcommands for running the gateway:
//! - `serve`: HTTP server

pub mod serve;

use clap::{Parser, Subcommand};

/// Image Gateway - Semantic prompt caching in front of image generation providers
#[derive(Parser)]
#[command(name = "image-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}

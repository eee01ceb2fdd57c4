//! glstep Terminal Demo
//!
//! Runs the scaffold's demo programs in the terminal.
//!
//! # Usage
//!
//! ```bash
//! glstep-terminal
//! glstep-terminal --demo wire-cube --shaders shaders
//! glstep-terminal --demo rectangle --log-file glstep.log --log debug
//! ```
//!
//! # Controls
//!
//! - WASD / Arrow Keys: Move the model
//! - +/-: Zoom (field of view)
//! - Space: Pause rotation
//! - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use glstep_terminal::logging::{init_logging, LoggingConfig};
use glstep_terminal::{check_program, AppConfig, Demo, TerminalApp};

#[derive(Parser)]
#[command(name = "glstep-terminal")]
#[command(author, version, about = "Matrix-driven demo shapes in the terminal")]
struct Args {
    /// Demo to run
    #[arg(long, value_enum, default_value = "solid-cube")]
    demo: Demo,

    /// Directory holding point.vert and point.frag to check before running
    #[arg(long)]
    shaders: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Log filter (env_logger syntax); falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            demo: args.demo,
            shader_dir: args.shaders,
            target_fps: args.fps,
            logging: LoggingConfig {
                env_filter: args.log,
                file: args.log_file,
                ..LoggingConfig::default()
            },
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::from(Args::parse());

    init_logging(config.logging.clone()).context("initializing logging")?;

    if let Some(interface) = check_program(&config)? {
        println!(
            "Shader program OK: {} attributes, {} uniforms",
            interface.attributes.len(),
            interface.uniforms.len()
        );
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(&config);
    app.run()?;

    println!("Thank you for using glstep!");
    Ok(())
}

//! Module to interact with cargo options

use std::path::PathBuf;

use clap::Parser;

/// Options parsed from CLI
#[derive(Parser, Debug)]
#[command(about, author, version)]
pub struct CliOptions {
    /// A JSON file of settings. Anything missing keeps its default.
    #[clap(short, long)]
    pub settings: Option<PathBuf>,

    #[clap(long, default_value = "0")]
    pub start_x: i32,

    /// Height the player starts at. Without `--auto-jump` the player starts
    /// gliding here.
    #[clap(long, default_value = "80")]
    pub start_y: i16,

    #[clap(long, default_value = "0")]
    pub start_z: i32,

    #[clap(long, default_value = "150")]
    pub goal_x: i32,

    #[clap(long, default_value = "64")]
    pub goal_y: i16,

    #[clap(long, default_value = "0")]
    pub goal_z: i32,

    /// Height of the netherrack floor
    #[clap(long, default_value = "30")]
    pub floor_y: i16,

    /// How many chunks are loaded in each direction from the origin
    #[clap(long, default_value = "12")]
    pub radius: i32,

    /// Give up after this many ticks
    #[clap(short, long, default_value = "20000")]
    pub ticks: u64,

    /// Overrides the nether seed from the settings file
    #[clap(long)]
    pub seed: Option<i64>,

    /// Start standing on a pillar and walk off it instead of starting in the
    /// air
    #[clap(long)]
    pub auto_jump: bool,
}

impl CliOptions {
    pub fn get() -> Self {
        Self::parse()
    }
}

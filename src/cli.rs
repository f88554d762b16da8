use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mike",
    about = "Home media server: browse and stream your music folder over HTTP",
    long_about = None,
    version = env!("GIT_VERSION"),
)]
pub struct Args {
    /// Root of the music library [default: /music]
    #[arg(short, long, value_name = "DIR", env = "MIKE_MUSIC_PATH")]
    pub music: Option<PathBuf>,

    /// Directory holding the web client's static assets [default: ./assets]
    #[arg(short, long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// HTTP port to listen on [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to TOML config file (overrides default search: ./mike.toml, ~/.config/mike/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind to localhost only (127.0.0.1) instead of all interfaces
    #[arg(long)]
    pub localhost: bool,

    /// Session token that is always accepted (may be repeated)
    #[arg(long = "session-token", value_name = "TOKEN")]
    pub session_tokens: Vec<String>,
}

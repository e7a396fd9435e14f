use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Build the tracked repository when its HEAD moves and mail the result",
    long_about = None
)]
pub struct Cli {
    /// Email configuration file
    #[arg(short = 'c', long, default_value = "config.ini")]
    pub config_file: PathBuf,

    /// Path to the source folder to build
    #[arg(short = 's', long, default_value = "./ell")]
    pub src: PathBuf,

    /// File holding the last checked commit id
    #[arg(short = 'f', long, default_value = "./head.sha")]
    pub head_sha_file: PathBuf,

    /// Display debugging info
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Send email on success as well
    #[arg(short = 'e', long)]
    pub email_on_success: bool,

    /// Remote the updated head file is pushed to
    #[arg(long, default_value = "upstream")]
    pub tracking_remote: String,

    /// Branch the updated head file is pushed to
    #[arg(long, default_value = "main")]
    pub tracking_branch: String,

    /// Do not commit and push the head file after updating it
    #[arg(long)]
    pub no_tracking: bool,
}

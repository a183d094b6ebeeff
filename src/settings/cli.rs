use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "taskgate", about = "Task backend session gateway")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
    /// Overrides `http.address` from the settings file.
    #[arg(long)]
    pub address: Option<String>,
}

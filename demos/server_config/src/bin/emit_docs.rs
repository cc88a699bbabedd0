//! Emits flag, environment and file-key metadata for the demo as JSON.

use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let docs = server_config::loader().describe::<server_config::ServerConfig>()?;
    let json = serde_json::to_string_pretty(&docs)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

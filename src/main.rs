// src/main.rs

use anyhow::Result;

fn main() -> Result<()> {
    tubundle::commands::run_cli()
}

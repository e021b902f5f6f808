use anyhow::Result;

use gamefeed_core::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path();
    let origin = if path.exists() { "" } else { " (not found, using defaults)" };

    println!("# {}{}\n", path.display(), origin);
    print!("{}", config.to_toml()?);

    Ok(())
}

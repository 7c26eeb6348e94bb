use anyhow::{Context, Result};
use anylist_core::AnyListConfig;
use owo_colors::OwoColorize;

pub fn show() -> Result<()> {
    let config_path = AnyListConfig::config_path()?;
    let config = AnyListConfig::load()?;

    println!("{}", "Config".bold());
    println!("  Path:        {}", config_path.display());
    println!("  Endpoint:    {}", config.base_url);
    println!(
        "  User:        {}",
        config.user_id.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Calendar:    {}",
        config.calendar_id.as_deref().unwrap_or("(not set)")
    );
    println!("  Timeout:     {}s", config.timeout_secs);

    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let config_path = AnyListConfig::config_path()?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\n\nPass --force to overwrite it.",
            config_path.display()
        );
    }

    AnyListConfig::create_default_config(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} {}", "Created".green(), config_path.display());
    Ok(())
}

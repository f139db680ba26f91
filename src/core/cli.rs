//! CLI-only commands that do not format anything: config info.

use crate::core::config::Config;
use crate::core::paths;

/// Run the `config` command: display the config file and effective settings.
pub fn run_config(config: &Config) {
    let config_file = paths::config_file()
        .map(|p| {
            let status = if p.exists() { "" } else { " (not found)" };
            format!("{}{}", p.display(), status)
        })
        .unwrap_or_else(|| "-".to_string());
    let formatter = config.formatter();

    println!("Config file:   {}", config_file);
    println!("Headings:      {}", config.heading_style);
    println!("Protect code:  {}", config.protect_code_blocks);
    println!("Cache size:    {}", config.cache_capacity);
    println!("Max input:     {} bytes", config.max_input_bytes);
    println!(
        "Class:         {}",
        config.class_name.as_deref().unwrap_or("(none)")
    );
    println!("Stages:        {}", formatter.stage_names().join(" > "));
}

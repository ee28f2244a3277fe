use clap::Subcommand;
use kakeibo_core::Config;
use serde_json::Value;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key (e.g. "timeline.warn_minutes")
    Get { key: String },
    /// Change one value by dotted key and save
    Set { key: String, value: String },
    /// Print every key as `section.key = value`, grouped by section
    List {
        /// Print the whole config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

/// `section.key = value` lines, one blank line between sections.
fn dotted_lines(config: &Config) -> Result<Vec<String>, serde_json::Error> {
    let mut lines = Vec::new();
    if let Value::Object(sections) = serde_json::to_value(config)? {
        for (section, fields) in sections {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            match fields {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        lines.push(format!("{section}.{key} = {value}"));
                    }
                }
                other => lines.push(format!("{section} = {other}")),
            }
        }
    }
    Ok(lines)
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for line in dotted_lines(&config)? {
                    println!("{line}");
                }
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

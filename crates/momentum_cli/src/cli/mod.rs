use clap::{Parser, Subcommand};
use momentum_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set your name, or show it when no name is given
    ///
    /// Example: momentum name Ada
    Name { name: Option<String> },
    /// Suggest tasks for the current time of day
    ///
    /// Example: momentum suggest --category fitness
    Suggest {
        #[arg(short, long, default_value = "work")]
        category: String,
    },
    /// Split a task into smaller steps when it matches a known pattern
    ///
    /// Example: momentum breakdown "Prepare for meeting tomorrow"
    Breakdown { task: Vec<String> },
    /// Mark a task as done right away
    ///
    /// Example: momentum done --category personal "Journal entry"
    /// Example: momentum done --step 2 "Prepare for meeting"
    Done {
        #[arg(short, long, default_value = "work")]
        category: String,
        /// Subtask to complete when the task has a breakdown (1-based)
        #[arg(long)]
        step: Option<usize>,
        task: Vec<String>,
    },
    /// Run the countdown for a task and mark it done at zero
    ///
    /// Example: momentum timer -c work "Clear inbox"
    /// Example: momentum timer --seconds 60 "Walk break" -c fitness
    Timer {
        #[arg(short, long, default_value = "work")]
        category: String,
        /// Countdown length, defaults to the configured timer_seconds
        #[arg(long)]
        seconds: Option<u32>,
        /// Subtask to run when the task has a breakdown (1-based)
        #[arg(long)]
        step: Option<usize>,
        task: Vec<String>,
    },
    /// Show today's progress, level and streak
    ///
    /// Example: momentum progress
    Progress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DailyTarget,
    TimerSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "daily_target" | "target" => ConfigOverrideTarget::DailyTarget,
        "timer_seconds" | "timer" => ConfigOverrideTarget::TimerSeconds,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` argument into one set of overrides.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DailyTarget => {
                overrides.daily_target = Some(parse_positive("daily_target", &parsed.value)?)
            }
            ConfigOverrideTarget::TimerSeconds => {
                overrides.timer_seconds = Some(parse_positive("timer_seconds", &parsed.value)?)
            }
        }
    }

    Ok(overrides)
}

fn parse_positive(field: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(format!("{field} must be a positive integer")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

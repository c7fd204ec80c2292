use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{ProviderCapability, ProviderKind, SettingsStore};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive provider setup.
    Init,
    /// Show the stored provider settings (API key masked).
    Show,
}

pub fn run(store: &SettingsStore, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(store),
        ConfigCommand::Show => run_show(store),
    }
}

fn run_init(store: &SettingsStore) -> AppResult<()> {
    let mut cfg = store.resolve();

    println!("Configuring the ticket recognition provider.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The API key is stored in the local settings file; protect your filesystem accordingly.");
    println!();

    let mut provider = cfg.provider.as_str().to_string();
    loop {
        apply_prompt(
            "Provider (GEMINI_ENV/GEMINI_CUSTOM/OPENAI)",
            &mut provider,
            false,
        )?;
        match ProviderKind::from_str(&provider) {
            Some(kind) => {
                if kind != cfg.provider {
                    cfg.switch_provider(kind);
                }
                break;
            }
            None => {
                println!("Unknown provider '{provider}'.");
                provider = cfg.provider.as_str().to_string();
            }
        }
    }

    match cfg.provider {
        ProviderKind::GeminiBuiltin => {
            println!("Using the API key from the API_KEY environment variable.");
        }
        ProviderKind::GeminiCustomKey => {
            apply_prompt("Gemini API key", &mut cfg.api_key, true)?;
        }
        ProviderKind::OpenAiCompatible => {
            apply_prompt(
                "Base URL (e.g., http://localhost:11434/v1)",
                &mut cfg.base_url,
                false,
            )?;
            apply_prompt("API key (optional for Ollama)", &mut cfg.api_key, true)?;
        }
    }
    apply_prompt("Model", &mut cfg.model, false)?;

    store.save(&cfg)?;

    println!("\nSettings saved to {}", store.path().display());
    Ok(())
}

fn run_show(store: &SettingsStore) -> AppResult<()> {
    let cfg = store.resolve();

    println!("Settings file: {}", store.path().display());
    println!("Provider: {}", cfg.provider.as_str());
    println!("Model: {}", display_value(&cfg.model));
    if cfg.provider.capability() == ProviderCapability::ChatCompletion {
        println!("Base URL: {}", display_value(&cfg.base_url));
    }
    println!("API key: {}", mask_secret(&cfg.api_key));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut String, secret: bool) -> AppResult<()> {
    match prompt(field, target, secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => target.clear(),
        PromptAction::Set(value) => *target = value,
    }
    Ok(())
}

fn prompt(field: &str, current: &str, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current.is_empty(), secret) {
        (false, true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (false, false) => {
            write!(stdout, "{field} [{current}] (Enter to keep, '-' to clear): ")?
        }
        (true, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &str) -> &str {
    if value.is_empty() { "<not set>" } else { value }
}

fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => "<not set>".to_string(),
        len if len > 6 => {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[len - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        _ => "***".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

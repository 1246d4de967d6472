//! Persona preset commands.

use std::path::Path;

use clap::Subcommand;
use kiezplan_core::PersonaRepository;

use crate::common::{load_config, CliResult};

#[derive(Subcommand)]
pub enum PersonaAction {
    /// List built-in and configured personas
    List,
    /// Show one persona
    Show {
        /// Persona key (e.g. "founder", "explorer")
        key: String,
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PersonaAction, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let repo = config.persona_repository();

    match action {
        PersonaAction::List => {
            println!("Available personas:");
            println!();
            for preset in repo.presets() {
                println!("  {} - {}", preset.key, preset.persona.name);
                for line in preset.description.lines() {
                    println!("    {line}");
                }
                println!();
            }
        }
        PersonaAction::Show { key, json } => {
            let persona = repo
                .get(&key)
                .ok_or_else(|| format!("unknown persona: {key}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&persona)?);
            } else {
                print!("{}", toml::to_string_pretty(&persona)?);
            }
        }
    }
    Ok(())
}

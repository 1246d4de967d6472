//! Input loading shared by the planning commands.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use kiezplan_core::{
    validate_pool, Config, Energy, Event, Feedback, Intent, Persona, PersonaRepository, Session,
    SocialMode,
};
use serde::de::DeserializeOwned;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Clone, Copy, ValueEnum)]
pub enum IntentArg {
    Network,
    Learn,
    Explore,
    Party,
    Recover,
}

impl From<IntentArg> for Intent {
    fn from(arg: IntentArg) -> Self {
        match arg {
            IntentArg::Network => Intent::Network,
            IntentArg::Learn => Intent::Learn,
            IntentArg::Explore => Intent::Explore,
            IntentArg::Party => Intent::Party,
            IntentArg::Recover => Intent::Recover,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EnergyArg {
    Low,
    Medium,
    High,
}

impl From<EnergyArg> for Energy {
    fn from(arg: EnergyArg) -> Self {
        match arg {
            EnergyArg::Low => Energy::Low,
            EnergyArg::Medium => Energy::Medium,
            EnergyArg::High => Energy::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SocialModeArg {
    Solo,
    SmallGroup,
    Crowd,
}

impl From<SocialModeArg> for SocialMode {
    fn from(arg: SocialModeArg) -> Self {
        match arg {
            SocialModeArg::Solo => SocialMode::Solo,
            SocialModeArg::SmallGroup => SocialMode::SmallGroup,
            SocialModeArg::Crowd => SocialMode::Crowd,
        }
    }
}

/// Flags that describe the session and who it is for.
#[derive(Args)]
pub struct RequestArgs {
    /// JSON file with an array of events
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    /// Persona preset key (unknown keys fall back to the neutral persona)
    #[arg(long, default_value = "custom", conflicts_with = "persona_file")]
    pub persona: String,

    /// JSON file with a persona
    #[arg(long, value_name = "FILE")]
    pub persona_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub intent: IntentArg,

    #[arg(long, value_enum)]
    pub energy: EnergyArg,

    #[arg(long, value_enum, default_value = "small-group")]
    pub social_mode: SocialModeArg,

    /// District to focus on (repeatable)
    #[arg(long = "district", value_name = "DISTRICT")]
    pub districts: Vec<String>,

    /// Budget for today in EUR
    #[arg(long)]
    pub budget: Option<f64>,

    /// First date (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: NaiveDate,

    /// JSON file with an array of feedback entries
    #[arg(long, value_name = "FILE")]
    pub feedback: Option<PathBuf>,
}

/// Validated inputs for one request.
pub struct Inputs {
    pub events: Vec<Event>,
    pub persona: Persona,
    pub session: Session,
    pub feedback: Vec<Feedback>,
}

impl RequestArgs {
    pub fn load(&self, config: &Config) -> CliResult<Inputs> {
        let events: Vec<Event> = read_json(&self.events)?;
        validate_pool(&events)?;

        let persona = match &self.persona_file {
            Some(path) => read_json::<Persona>(path)?,
            None => {
                let repo = config.persona_repository();
                if repo.get(&self.persona).is_none() && self.persona != "custom" {
                    tracing::warn!(persona = %self.persona, "unknown persona, using neutral");
                }
                repo.resolve(&self.persona)
            }
        };
        persona.validate()?;

        let mut session = Session::new(self.intent.into(), self.energy.into(), self.from, self.to)
            .with_social_mode(self.social_mode.into())
            .with_district_focus(self.districts.iter().cloned());
        session.budget_today = self.budget;
        session.validate()?;

        let feedback = match &self.feedback {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };

        tracing::debug!(
            events = events.len(),
            persona = %persona.name,
            feedback = feedback.len(),
            "inputs loaded"
        );
        Ok(Inputs {
            events,
            persona,
            session,
            feedback,
        })
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON in {}: {e}", path.display()).into())
}

/// Config from `--config`, or the default location.
///
/// A `--config` path that does not exist yet yields defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    match path {
        Some(path) if path.exists() => Ok(Config::load_from(path)?),
        Some(_) => Ok(Config::default()),
        None => Ok(Config::load()?),
    }
}

pub fn save_config(config: &Config, path: Option<&Path>) -> CliResult {
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(())
}

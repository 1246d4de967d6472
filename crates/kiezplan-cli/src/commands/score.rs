use std::path::Path;

use clap::Args;
use kiezplan_core::scoring::Adjustment;
use kiezplan_core::{explain, EventFilter, ScoringContext};
use serde::Serialize;

use crate::common::{load_config, CliResult, RequestArgs};

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Event id to score
    #[arg(long)]
    pub id: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    id: &'a str,
    eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_term: Option<String>,
    breakdown: kiezplan_core::ScoreBreakdown,
    reasons: Vec<String>,
}

pub fn run(args: ScoreArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let inputs = args.request.load(&config)?;

    let event = inputs
        .events
        .iter()
        .find(|e| e.id == args.id)
        .ok_or_else(|| format!("no event with id '{}'", args.id))?;

    let rejection = EventFilter::new(&inputs.persona, &inputs.session)
        .check(event)
        .err()
        .map(|r| r.to_string());
    let ctx = ScoringContext::new(
        &inputs.persona,
        &inputs.session,
        &inputs.events,
        &inputs.feedback,
    );
    let breakdown = config.scoring_engine().score(&ctx, event);
    let report = ScoreReport {
        id: &event.id,
        eligible: rejection.is_none(),
        rejection,
        top_term: breakdown.top_term().map(|t| t.name.clone()),
        breakdown,
        reasons: explain(event, &ctx),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({})", event.title, event.id);
    match &report.rejection {
        Some(reason) => println!("  not eligible: {reason}"),
        None => println!("  eligible"),
    }
    println!();
    println!("  {:<10} {:>6} {:>6} {:>8}", "term", "weight", "score", "contrib");
    for term in report.breakdown.terms_by_contribution() {
        println!(
            "  {:<10} {:>6.2} {:>6.3} {:>8.4}",
            term.name, term.weight, term.score, term.contribution
        );
    }
    println!("  {:<10} {:>22.4}", "base", report.breakdown.base_score);
    for adjustment in &report.breakdown.adjustments {
        let change = match adjustment.adjustment {
            Adjustment::Scale(factor) => format!("x{factor}"),
            Adjustment::Bonus(amount) => format!("+{amount}"),
        };
        println!("  guardrail: {} ({change})", adjustment.rule);
    }
    println!("  {:<10} {:>22.4}", "total", report.breakdown.total_score);
    if let Some(top) = &report.top_term {
        println!("  strongest term: {top}");
    }
    println!();
    for reason in &report.reasons {
        println!("  {reason}");
    }
    Ok(())
}

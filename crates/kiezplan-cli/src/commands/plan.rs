use std::path::Path;

use clap::Args;
use kiezplan_core::{
    hidden_ids, DayPlan, PlanRequest, PlanSummary, ScoredEvent, Session, TravelTimes,
};

use crate::common::{load_config, CliResult, RequestArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Retry with neighbouring districts when nothing made the primary tier
    #[arg(long)]
    pub widen: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let inputs = args.request.load(&config)?;
    let builder = config.schedule_builder();
    let hidden = hidden_ids(&inputs.feedback);

    let build = |session: &Session| {
        builder.build(
            &PlanRequest::new(&inputs.events, &inputs.persona, session)
                .with_feedback(&inputs.feedback)
                .with_hidden_ids(&hidden),
        )
    };

    let mut plans = build(&inputs.session);
    if args.widen
        && PlanSummary::of(&plans).primary == 0
        && !inputs.session.district_focus.is_empty()
    {
        let widened = inputs.session.widened();
        tracing::info!(
            focus = ?widened.district_focus,
            "no primary picks, widening district focus"
        );
        plans = build(&widened);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        print_plans(&plans, &config.travel);
    }
    Ok(())
}

fn print_plans(plans: &[DayPlan], travel: &TravelTimes) {
    if plans.is_empty() {
        println!("No events match these dates and constraints.");
        return;
    }

    for day in plans {
        println!("{}", day.date.format("%A, %Y-%m-%d"));
        if day.primary.is_empty() {
            println!("  (no primary picks)");
        }
        for event in &day.primary {
            print_event(event, "*");
        }
        for leg in travel.legs(&day.primary) {
            println!(
                "  ~ {} -> {}: {} min",
                leg.from_district, leg.to_district, leg.minutes
            );
        }
        if !day.optional.is_empty() {
            println!("  Optional:");
            for event in &day.optional {
                print_event(event, "-");
            }
        }
        println!();
    }

    let summary = PlanSummary::of(plans);
    println!(
        "{} day(s), {} primary, {} optional",
        summary.days, summary.primary, summary.optional
    );
}

fn print_event(scored: &ScoredEvent, marker: &str) {
    let event = &scored.event;
    let time = match (event.start_time, event.end_time) {
        (Some(start), Some(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
        (Some(start), None) => format!("{} ", start.format("%H:%M")),
        _ => "  --:--  ".to_string(),
    };
    let place = event.district.as_deref().unwrap_or("?");
    let conflict = if scored.time_conflict { " [time conflict]" } else { "" };
    println!(
        "  {marker} {time:<11} {:<40} {place:<16} {:.2}{conflict}",
        event.title, scored.score
    );
    for reason in &scored.reasons {
        println!("      {reason}");
    }
}

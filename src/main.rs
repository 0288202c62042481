//! Feedpulse CLI - scripted scroll-session simulator
//!
//! Usage:
//!   feedpulse --events 400                  # Simulate 400 visibility events
//!   feedpulse --events 400 --seed 9         # Reproducible session
//!   feedpulse --events 400 --json           # One JSON object per event
//!   feedpulse --events 400 --verbose        # Show weights and counters

use clap::Parser;
use colored::Colorize;

use feedpulse::core::{FeedSession, SeededRng, SessionConfig, ViewOutcome};
use feedpulse::types::{EngineEvent, FeedSlot, InterventionKind, PriorStats, TimeBucket};
use feedpulse::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "feedpulse",
    version = VERSION,
    about = "Feedpulse - engagement engine session simulator",
    long_about = "Drives the engagement engine with a synthetic scroll session.\n\n\
                  A seeded virtual user scrolls the infinite feed with variable\n\
                  dwell times and slowdown phases. Each visibility event runs the\n\
                  full pipeline: rolling tracker → churn score → intervention\n\
                  scheduler → (on special unlocks) content generation.\n\n\
                  Output per event:\n  \
                  view counter, slot content, churn probability, scheduler phase\n\n\
                  Interventions and generated batches are printed as they fire."
)]
struct Args {
    /// Number of visibility events to simulate
    #[arg(short, long, default_value_t = 400)]
    events: usize,

    /// Seed for both the virtual user and the session sampling stream
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Hour of day the session runs in (0-23)
    #[arg(long, default_value_t = 20)]
    hour: u32,

    /// Prior-session view count (landing baseline)
    #[arg(long, default_value_t = 0)]
    prior_views: u64,

    /// Prior-session unique count (landing baseline)
    #[arg(long, default_value_t = 0)]
    prior_unique: u64,

    /// Output as JSON, one object per event
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show distribution weights and counters per event
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = SessionConfig {
        time_bucket: TimeBucket::from_hour(args.hour),
        prior: PriorStats {
            total_views: args.prior_views,
            unique_views: args.prior_unique,
        },
        rng_seed: args.seed,
    };
    let mut session = FeedSession::with_heuristic(config);

    if !args.json {
        print_header(&session, args.hour);
    }

    // Virtual user: dwell times drift longer as attention fades, with
    // occasional distraction pauses
    let mut user = SeededRng::new(args.seed ^ 0xD1_55_7C_A7);
    let mut now = 0.0_f64;
    let mut interventions = 0usize;
    let mut batches = 0usize;

    for index in 0..args.events {
        let fatigue = index as f64 / args.events.max(1) as f64;
        let base_dwell = 0.35 + 2.5 * fatigue;
        let jitter = user.range_f64(0.8, 1.3);
        let pause = if user.next_f64() < 0.03 {
            user.range_f64(4.0, 12.0)
        } else {
            0.0
        };
        now += base_dwell * jitter + pause;

        session.ensure_slots_generated(index);
        let outcome = session.on_item_visible(index, now);

        for event in &outcome.events {
            match event {
                EngineEvent::InterventionFired { .. } => interventions += 1,
                EngineEvent::BatchInjected { .. } => batches += 1,
            }
        }

        if args.json {
            println!("{}", serde_json::to_string(&outcome).unwrap());
            continue;
        }

        print_event_line(&session, index, &outcome);
        if args.verbose {
            print_verbose_line(&session);
        }
        for event in &outcome.events {
            print_engine_event(event);
        }
    }

    if !args.json {
        print_summary(&session, now, interventions, batches);
    }
}

/// Print session header
fn print_header(session: &FeedSession, hour: u32) {
    println!("{}", "=".repeat(62).bold());
    println!(
        "{}",
        format!("  Feedpulse v{} - session simulator", VERSION).bold()
    );
    println!("{}", "=".repeat(62).bold());
    let baseline = session.baseline();
    if baseline.total_views > 0 {
        println!(
            "  Prior session: {} views, {} unique",
            baseline.total_views, baseline.unique_views
        );
    }
    println!("  Hour of day: {:02}:00", hour);
    println!();
}

/// One line per visibility event
fn print_event_line(session: &FeedSession, index: usize, outcome: &ViewOutcome) {
    let slot_desc = match session.slot(index) {
        Some(FeedSlot::Discovery { shade }) => format!("discovery (shade {:.2})", shade).dimmed(),
        Some(FeedSlot::Content(id)) => match session.catalog().item(id) {
            Some(item) => {
                let text = format!("{} [{}]", item.name, item.tier);
                match outcome.unlocked {
                    Some(unlocked) if unlocked == item.id => text.bold(),
                    _ => text.normal(),
                }
            }
            None => format!("item {}", id).normal(),
        },
        None => "<missing>".red(),
    };

    let churn_text = format!("churn={:.3}", outcome.churn);
    let churn_colored = if outcome.churn >= feedpulse::CHURN_THRESHOLD {
        churn_text.red()
    } else if outcome.churn >= 0.40 {
        churn_text.yellow()
    } else {
        churn_text.green()
    };

    let marker = if outcome.unlocked.is_some() {
        "★".yellow().to_string()
    } else {
        " ".to_string()
    };

    println!(
        "{} #{:<5} {} | {} | {}",
        marker,
        session.total_views(),
        slot_desc,
        churn_colored,
        outcome.phase
    );
}

/// Extra per-event details
fn print_verbose_line(session: &FeedSession) {
    let w = session.current_weights();
    println!(
        "        {}",
        format!(
            "weights mono={:.2} common={:.2} rare={:.2} special={:.2} | unique={} unlocked={}",
            w.mono,
            w.common,
            w.rare,
            w.special,
            session.unique_views(),
            session.unlocked_count()
        )
        .dimmed()
    );
}

/// Render an engine output event
fn print_engine_event(event: &EngineEvent) {
    match event {
        EngineEvent::InterventionFired { decision } => {
            let kinds: Vec<String> = decision.kinds.iter().map(|k| k.to_string()).collect();
            println!(
                "  {} churn={:.3} [{}]",
                "⚡ INTERVENTION".green().bold(),
                decision.churn,
                kinds.join(", ")
            );
            if decision.kinds.contains(&InterventionKind::SocialProof) {
                println!("    {}", "(toast: \"2,481 collectors found this today\")".dimmed());
            }
        }
        EngineEvent::BatchInjected { record } => {
            println!(
                "  {} seed={:016x} trigger={}",
                "✦ BATCH GENERATED".magenta().bold(),
                record.seed,
                record.trigger
            );
        }
    }
}

/// End-of-session summary
fn print_summary(session: &FeedSession, elapsed: f64, interventions: usize, batches: usize) {
    println!();
    println!("{}", "=".repeat(62).bold());
    println!("  Session complete");
    println!(
        "  {} views | {} unique | {} unlocked | {:.0}s simulated",
        session.total_views(),
        session.unique_views(),
        session.unlocked_count(),
        elapsed
    );
    println!("  {} interventions | {} generated batches", interventions, batches);
    let w = session.current_weights();
    println!(
        "  final weights: mono={:.2} common={:.2} rare={:.2} special={:.2}",
        w.mono, w.common, w.rare, w.special
    );
    println!("{}", "=".repeat(62).bold());
}

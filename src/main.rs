//! Relframe CLI
//!
//! Usage:
//!   relframe                                 # Interactive session
//!   relframe --set enableCipher=true         # Override settings (persisted)
//!   relframe --seed 42 --json                # Deterministic, JSON lines
//!   relframe --history                       # Print history summary

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use relframe::core::{
    parse_line, Command, Event, HistoryRecorder, HistorySummary, JsonFileStore, SessionController,
    SettingsStore, TimerDriver,
};
use relframe::types::{
    Frame, GameError, GameSettings, Phase, ReasonCode, RoundState, SpatialMode,
    SymbolId, Transition,
};
use relframe::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "relframe",
    version = VERSION,
    about = "Relational-frame puzzles with adaptive difficulty",
    long_about = "Relframe deals chains of premises and asks whether an unstated\n\
                  relation follows from them.\n\n\
                  Commands during a session:\n  \
                  start            begin a session\n  \
                  <enter> / ready  continue\n  \
                  y / n            answer the question\n  \
                  s / signal       stop the interference colour on target\n  \
                  set key=value    change a setting (next round)\n  \
                  abort            end the session\n  \
                  quit             leave"
)]
struct Args {
    /// Directory holding settings.json, history.jsonl and rounds.jsonl
    #[arg(long, default_value = "./relframe-data")]
    data_dir: String,

    /// Seed the puzzle generator for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Override a setting, e.g. --set numPremises=3 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Print the history summary and exit
    #[arg(long)]
    history: bool,

    /// Output transitions and round views as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args).await {
        eprintln!("{}", format!("error: {e}").red());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &Args) -> Result<(), GameError> {
    let mut store = JsonFileStore::new(&args.data_dir);

    if args.history {
        let summary = HistorySummary::from_records(&store.load_history()?);
        if args.json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            println!("{}", summary.to_report());
        }
        return Ok(());
    }

    let mut settings = store.load()?;
    if !args.overrides.is_empty() {
        for raw in &args.overrides {
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| GameError::configuration(format!("expected KEY=VALUE, got '{raw}'")))?;
            settings.set_key(key.trim(), value.trim())?;
        }
        store.save(&settings)?;
    }

    let recorder = Box::new(store.clone());
    let mut controller = match args.seed {
        Some(seed) => SessionController::with_seed(settings, recorder, seed)?,
        None => SessionController::new(settings, recorder)?,
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !args.json {
        print_header(controller.settings());
    }

    loop {
        let event = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_line(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().yellow());
                        continue;
                    }
                };
                let persist = matches!(command, Command::Set { .. });
                match command.into_event(controller.settings()) {
                    Ok(Some(event)) => {
                        if let (true, Event::SettingsChanged(s)) = (persist, &event) {
                            store.save(s)?;
                        }
                        event
                    }
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("{}", e.to_string().yellow());
                        continue;
                    }
                }
            }
            Some(event) = rx.recv() => event,
        };

        let transition = match controller.handle(event) {
            Ok(t) => t,
            Err(e) if e.is_configuration() => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
            Err(e) => return Err(e),
        };
        driver.sync(&controller.armed_timers());

        if args.json {
            print_json(&controller, &transition)?;
        } else {
            render(&controller, &transition, args.no_color);
        }
    }

    driver.shutdown();
    Ok(())
}

// =============================================================================
// RENDERING
// =============================================================================

fn print_header(settings: &GameSettings) {
    println!("{}", format!("=== Relframe v{VERSION} ===").bright_magenta().bold());
    let frames: Vec<String> = settings.enabled_frames().iter().map(Frame::to_string).collect();
    println!("frames: {} | depth: {}", frames.join(", "), settings.num_premises);
    println!("Type 'start' to begin, 'quit' to leave.");
    println!();
}

fn print_json(controller: &SessionController, transition: &Transition) -> Result<(), GameError> {
    #[derive(serde::Serialize)]
    struct View<'a> {
        transition: &'a Transition,
        round: Option<&'a RoundState>,
        legend: relframe::types::Legend,
        interference: Option<&'a relframe::core::InterferenceEpisode>,
    }

    if transition.is_noop() {
        return Ok(());
    }
    let view = View {
        transition,
        round: controller.round(),
        legend: controller.legend(),
        interference: controller.interference(),
    };
    println!("{}", serde_json::to_string(&view)?);
    Ok(())
}

fn render(controller: &SessionController, t: &Transition, no_color: bool) {
    match t.reason {
        ReasonCode::R401_SESSION_TICK | ReasonCode::R403_STALE_TICK_IGNORED => return,
        ReasonCode::R402_QUESTION_TICK => {
            if let Some(left) = controller.session().question_remaining.filter(|s| *s <= 5) {
                println!("{}", format!("  {left}s").dimmed());
            }
            return;
        }
        ReasonCode::R501_INTERFERENCE_TICK => {
            if let Some(ep) = controller.interference() {
                println!("  colour: {}", ep.current().bold());
            }
            return;
        }
        _ => {}
    }

    println!("{}", t.status_line(!no_color));
    if let Some(outcome) = &t.outcome {
        let verdict = match (outcome.answer, outcome.correct) {
            (None, _) => "TIME UP".yellow(),
            (_, true) => "CORRECT".green().bold(),
            (_, false) => "WRONG".red().bold(),
        };
        println!("  {verdict} (answer was {})", if outcome.expected { "YES" } else { "NO" });
    }

    let Some(round) = controller.round() else {
        if let Some(record) = &t.session_record {
            println!(
                "  score {} | {}/{} correct | depth {} → {}",
                record.score, record.correct, record.questions_attempted, record.start_depth, record.final_depth
            );
        }
        return;
    };

    match t.to {
        Phase::PremiseMemorize => {
            if round.modifiers.key_changed {
                println!("{}", "  The cipher key has changed.".yellow());
            }
            print_premises(round);
            print_legend(controller);
            println!("{}", "  Press enter when ready.".dimmed());
        }
        Phase::Interference => {
            if let Some(ep) = controller.interference() {
                println!("  Signal when the colour shows {}.", ep.target().bold());
                println!("  colour: {}", ep.current().bold());
            }
        }
        Phase::Question => {
            if !round.modifiers.blind {
                print_premises(round);
                print_legend(controller);
            }
            if round.modifiers.night {
                println!("{}", "  NIGHT MODE".blue().bold());
            }
            println!("  {}", question_text(round).bold());
        }
        Phase::Result => println!("{}", "  Press enter for the next round.".dimmed()),
        _ => {}
    }
}

fn label(round: &RoundState, id: SymbolId) -> String {
    round
        .symbol(id)
        .map(|s| s.label())
        .unwrap_or_else(|| id.to_string())
}

/// Fixed sentence template per frame
fn sentence(frame: Frame, a: &str, token: &str, b: &str) -> String {
    match frame {
        Frame::Linear => format!("{a} is {token} than {b}"),
        Frame::Distinction => format!("{a} is {token} to {b}"),
        Frame::Hierarchy => format!("{a} {token} {b}"),
        Frame::Spatial2D | Frame::Spatial3D => format!("{a} is {token} of {b}"),
    }
}

fn print_premises(round: &RoundState) {
    for p in &round.premises {
        let a = label(round, p.subject);
        let b = label(round, p.object);
        println!("  • {}", sentence(round.frame, &a, &p.token, &b));
    }
}

fn print_legend(controller: &SessionController) {
    let legend = controller.legend();
    if legend.is_empty() {
        return;
    }
    let pairs: Vec<String> = legend
        .entries
        .iter()
        .map(|(k, t)| format!("{} = {}", t.cyan(), k.canonical()))
        .collect();
    println!("  key: {}", pairs.join(", "));
}

fn question_text(round: &RoundState) -> String {
    let q = &round.query;
    let target = label(round, q.subject);
    match round.spatial.as_ref().map(|s| (s.mode, s)) {
        Some((SpatialMode::Deictic, detail)) => match &detail.observer {
            Some(obs) => format!(
                "You stand at {}, facing {}. Is {} to your {}?",
                label(round, obs.symbol),
                obs.facing_token,
                target,
                q.token
            ),
            None => String::new(),
        },
        Some((SpatialMode::Movement, detail)) => match &detail.walk {
            Some(walk) => {
                let steps: Vec<&str> = walk.instructions.iter().map(|i| i.token.as_str()).collect();
                format!(
                    "Start at {}, facing {}. Then: {}. Is {} to your {}?",
                    label(round, walk.start),
                    walk.heading_token,
                    steps.join(", "),
                    target,
                    q.token
                )
            }
            None => String::new(),
        },
        _ => format!(
            "Is it true that {}?",
            sentence(round.frame, &target, &q.token, &label(round, q.object))
        ),
    }
}

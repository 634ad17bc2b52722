use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use lcs_trace::snapshot::Snapshot;
use lcs_trace::{Event, InputLimits, Mode, Session};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Fixed frame clock used by `--play`.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print the step-by-step event trace of an LCS solver",
    after_help = "EXAMPLES:\n    lcs_trace ABC BDC\n    lcs_trace --mode memo --format json AB AB\n    lcs_trace --play --speed 4 AAA AAA"
)]
struct Cli {
    /// First input string.
    x: String,

    /// Second input string.
    y: String,

    /// Teaching mode: tabulation or memo.
    #[arg(short, long, default_value = "tabulation")]
    mode: Mode,

    /// Output format for the trace.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Maximum characters per input.
    #[arg(long, default_value_t = lcs_trace::input::DEFAULT_MAX_LEN)]
    max_len: usize,

    /// Simulate autoplay on a 16 ms frame clock and report each step reached.
    #[arg(long)]
    play: bool,

    /// Playback speed multiplier (clamped to 0.25..=4 by the player).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.max_len == 0 {
        eprintln!("lcs_trace: --max-len must be positive");
        return ExitCode::from(2);
    }
    if !(cli.speed.is_finite() && cli.speed > 0.0) {
        eprintln!("lcs_trace: --speed must be a positive number");
        return ExitCode::from(2);
    }

    let mut session = Session::builder()
        .with_mode(cli.mode)
        .with_limits(InputLimits {
            max_len: cli.max_len,
            allow_both_empty: false,
        })
        .with_speed(cli.speed)
        .autoplay(cli.play)
        .build();

    if let Err(err) = session.visualize(&cli.x, &cli.y) {
        eprintln!("lcs_trace: {err}");
        return ExitCode::from(2);
    }

    let result = if cli.play {
        play(&mut session)
    } else {
        write_trace(cli.format, session.events())
    };
    if let Err(err) = result {
        eprintln!("lcs_trace output error: {err}");
        return ExitCode::FAILURE;
    }

    print_summary(&session, cli.mode);
    ExitCode::SUCCESS
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LCS_TRACE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "lcs_trace=debug,info"
        } else {
            "lcs_trace=warn"
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn write_trace(format: OutputFormat, events: &[Event]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => write_table(&mut out, events),
        OutputFormat::Csv => write_csv(&mut out, events),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, events)?;
            writeln!(out)
        }
    }
}

fn write_table(out: &mut impl Write, events: &[Event]) -> io::Result<()> {
    let width = events.len().to_string().len().max("step".len());
    writeln!(out, "{:>width$}  {:<10}  detail", "step", "kind")?;
    writeln!(out, "{:->width$}  {:-<10}  {:-<24}", "", "", "")?;
    for (k, e) in events.iter().enumerate() {
        writeln!(out, "{k:>width$}  {:<10}  {e}", e.kind().label())?;
    }
    Ok(())
}

fn write_csv(out: &mut impl Write, events: &[Event]) -> io::Result<()> {
    writeln!(out, "step,kind,i,j,detail")?;
    for (k, e) in events.iter().enumerate() {
        let (i, j) = e
            .coord()
            .map(|c| (c.i.to_string(), c.j.to_string()))
            .unwrap_or_default();
        let detail = e.to_string().replace('"', "'");
        writeln!(out, "{k},{},{i},{j},\"{detail}\"", e.kind().label())?;
    }
    Ok(())
}

fn play(session: &mut Session) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut clock = Duration::ZERO;
    if let Some(e) = session.playback().current() {
        writeln!(out, "{:>9.3}s  #{:<5} {e}", 0.0, 0)?;
    }
    while session.playback().is_playing() {
        clock += FRAME;
        if session.tick(FRAME) {
            let index = session.playback().index();
            if let Some(e) = session.playback().current() {
                writeln!(out, "{:>9.3}s  #{index:<5} {e}", clock.as_secs_f64())?;
            }
        }
    }
    Ok(())
}

fn print_summary(session: &Session, mode: Mode) {
    let events = session.events();
    let snap = Snapshot::at(events, events.len().saturating_sub(1));
    eprintln!();
    eprintln!("mode:          {mode}");
    eprintln!("events:        {}", events.len());
    match snap.lcs_length {
        Some(len) => eprintln!("lcs length:    {len}"),
        None => eprintln!("lcs length:    0 (no interior cells)"),
    }
    let sequence = snap.backtrack.map(|b| b.sequence).unwrap_or_default();
    eprintln!("lcs:           {sequence:?}");
}

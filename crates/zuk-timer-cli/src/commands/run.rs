use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};
use zuk_timer_core::{AudioCue, Event, FileStore, Frame, Preferences, SilentCue, TimerSession};

use crate::render::{self, TerminalBell};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DeviceTheme {
    Dark,
    Light,
}

#[derive(Args)]
pub struct RunArgs {
    /// Print events as JSON lines instead of drawing the timer
    #[arg(long)]
    json: bool,
    /// Theme of the terminal, used when theme_mode is "device"
    #[arg(long, value_enum, default_value_t = DeviceTheme::Dark)]
    device_theme: DeviceTheme,
    /// Do not ring the terminal bell in the last ten seconds
    #[arg(long)]
    quiet: bool,
    /// Tick period in milliseconds
    #[arg(long, default_value_t = 1000, hide = true)]
    period_ms: u64,
}

/// Enter advances the stage, `r` resets, `q` or end of input quits.
pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_loop(args));
    // A pending stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_background();
    result
}

struct Output {
    json: bool,
    prefs: Preferences,
    device_dark: bool,
}

impl Output {
    fn show(&self, event: &Event, session: &TimerSession) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            let frame = Frame::build(&session.timer(), session.is_ticking(), &self.prefs, self.device_dark);
            render::draw(&frame)?;
        }
        Ok(())
    }

    fn flush(
        &self,
        events: &mut UnboundedReceiver<Event>,
        session: &TimerSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while let Ok(event) = events.try_recv() {
            self.show(&event, session)?;
        }
        if !self.json {
            println!();
        }
        Ok(())
    }
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let output = Output {
        json: args.json,
        prefs: Preferences::load(&store),
        device_dark: matches!(args.device_theme, DeviceTheme::Dark),
    };
    debug!(prefs = ?output.prefs, "loaded preferences");

    let cue: Arc<dyn AudioCue> = if args.quiet || args.json {
        Arc::new(SilentCue)
    } else {
        Arc::new(TerminalBell)
    };
    let (session, mut events) = TimerSession::new();
    let mut session = session
        .with_period(Duration::from_millis(args.period_ms))
        .with_cue(cue);

    output.show(&session.snapshot(), &session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line?.as_deref().map(str::trim) {
                    None | Some("q") => break,
                    Some("r") => {
                        session.reset();
                    }
                    Some("") => {
                        session.advance();
                    }
                    Some(other) => warn!(input = other, "unrecognised input, expected enter, r or q"),
                }
            }
            Some(event) = events.recv() => output.show(&event, &session)?,
        }
    }

    output.flush(&mut events, &session)
}

//! Glyphstone terminal player
//!
//! A console front end for the Symbol Match core.
//! - Memorize the three glyphs on the totem while the countdown runs
//! - Pick the one stone carrying the same glyphs (keys 1-8)
//! - Correct picks score 100 x level; every third one raises the level
//! - ESC exits from any phase

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use glyphstone_core::{
    Alphabet, Cmd, Event as GameEvent, GameStats, Msg, Outcome, Phase, Resolution, Scheduler,
    Session, SessionConfig, Stone,
};
use std::fs;
use std::io::{stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// How long to block waiting for input each frame
const POLL_INTERVAL_MS: u64 = 25;

/// Glyph set loaded from a RON file
#[derive(serde::Deserialize)]
struct GlyphData {
    glyphs: Vec<char>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let alphabet = load_alphabet();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0x5EED);

    // Initialize terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    // Run game
    let result = run_game(&mut stdout, alphabet, seed);

    // Restore terminal
    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    let stats = result?;
    print_summary(&stats);
    Ok(())
}

/// Load the glyph set, falling back to the built-in reference set
fn load_alphabet() -> Alphabet {
    let paths = [
        "demos/terminal_play/data/glyphs.ron",
        "data/glyphs.ron",
        "../data/glyphs.ron",
    ];

    for path in &paths {
        if Path::new(path).exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(data) = ron::from_str::<GlyphData>(&content) {
                    if let Ok(alphabet) = Alphabet::new(data.glyphs) {
                        return alphabet;
                    }
                }
            }
        }
    }

    Alphabet::default()
}

/// Presentation state fed by the session's events and log commands
#[derive(Default)]
struct UiState {
    flash: Option<Resolution>,
    final_stats: Option<GameStats>,
    last_log: Option<String>,
}

fn run_game(
    stdout: &mut std::io::Stdout,
    alphabet: Alphabet,
    seed: u64,
) -> Result<GameStats, Box<dyn std::error::Error>> {
    let mut session = Session::new(SessionConfig { seed, alphabet })?;
    let mut scheduler = Scheduler::new();
    let mut ui = UiState::default();
    let started = Instant::now();

    render_welcome(stdout)?;
    wait_for_any_key()?;

    loop {
        // Fire whatever countdowns are due
        let now = started.elapsed().as_millis() as u64;
        for msg in scheduler.fire_due(now) {
            deliver(&mut session, &mut scheduler, &mut ui, msg, now);
        }

        // Check for input (non-blocking)
        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            if let TermEvent::Key(key) = event::read()? {
                let now = started.elapsed().as_millis() as u64;
                if let Some(msg) = map_key(&key, session.phase()) {
                    deliver(&mut session, &mut scheduler, &mut ui, msg, now);
                }
            }
        }

        render(stdout, &session, &ui)?;

        if session.phase() == Phase::Paused {
            return Ok(ui.final_stats.unwrap_or(*session.stats()));
        }
    }
}

/// Push one message through the session and route its output
fn deliver(session: &mut Session, scheduler: &mut Scheduler, ui: &mut UiState, msg: Msg, now: u64) {
    let update = session.update(msg, now);
    scheduler.apply(&update.cmds, now);

    for cmd in &update.cmds {
        if let Cmd::Log { level, message } = cmd {
            ui.last_log = Some(format!("{level:?}: {message}"));
        }
    }
    for event in &update.events {
        match event {
            GameEvent::RoundResolved(resolution) => ui.flash = Some(*resolution),
            GameEvent::RoundStarted { .. } => ui.flash = None,
            GameEvent::SessionEnded { stats } => ui.final_stats = Some(*stats),
            GameEvent::PhaseChanged(_) => {}
        }
    }
}

fn map_key(key: &KeyEvent, phase: Phase) -> Option<Msg> {
    match key.code {
        KeyCode::Esc => Some(Msg::Exit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::Exit),
        KeyCode::Enter | KeyCode::Char(' ') => match phase {
            Phase::Preparation => Some(Msg::Begin),
            Phase::Result => Some(Msg::Continue),
            _ => None,
        },
        KeyCode::Char(c) if c.is_ascii_digit() && phase == Phase::Selection => {
            let slot = c.to_digit(10)?;
            if (1..=8).contains(&slot) {
                Some(Msg::Select {
                    index: slot as usize - 1,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

fn wait_for_any_key() -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if event::poll(Duration::from_millis(100))? {
            if let TermEvent::Key(_) = event::read()? {
                return Ok(());
            }
        }
    }
}

fn render_welcome(stdout: &mut std::io::Stdout) -> Result<(), Box<dyn std::error::Error>> {
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    let title = "\r\n\
        \x20   ==========================================\r\n\
        \x20              G L Y P H S T O N E\r\n\
        \x20   ==========================================\r\n\
        \r\n\
        \x20   HOW TO PLAY:\r\n\
        \x20   - A totem shows three glyphs. Memorize them.\r\n\
        \x20   - Then pick the one stone with the same glyphs (keys 1-8).\r\n\
        \x20   - Correct picks score 100 x level; misses cost 25 points.\r\n\
        \x20   - Every third correct pick raises the level: more stones,\r\n\
        \x20     less time.\r\n\
        \x20   - ESC to quit.\r\n\
        \r\n\
        \x20   Press any key to start...\r\n";

    execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print(title),
        ResetColor
    )?;
    stdout.flush()?;
    Ok(())
}

fn render(
    stdout: &mut std::io::Stdout,
    session: &Session,
    ui: &UiState,
) -> Result<(), Box<dyn std::error::Error>> {
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    render_header(stdout, session)?;

    match session.phase() {
        Phase::Preparation => render_preparation(stdout)?,
        Phase::Memorization => render_memorization(stdout, session)?,
        Phase::Selection => render_selection(stdout, session)?,
        Phase::Result => render_result(stdout, session, ui)?,
        Phase::Paused => {}
    }

    if let Some(log) = &ui.last_log {
        execute!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("\r\n  {log}\r\n")),
            ResetColor
        )?;
    }

    stdout.flush()?;
    Ok(())
}

fn render_header(
    stdout: &mut std::io::Stdout,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = session.stats();

    execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("  GLYPHSTONE  "),
        ResetColor,
        Print(format!(
            "level {} | score {} | hits {} | misses {}",
            stats.level, stats.score, stats.correct, stats.incorrect
        ))
    )?;

    if let Some(secs) = session.countdown_secs() {
        let label = match session.phase() {
            Phase::Memorization => "memorize",
            _ => "choose",
        };
        let color = if secs > 3 { Color::Green } else { Color::Red };
        execute!(
            stdout,
            Print("    "),
            SetForegroundColor(color),
            Print(format!("{secs:2}s {label}")),
            ResetColor
        )?;
    }

    execute!(stdout, Print("\r\n\r\n"))?;
    Ok(())
}

fn render_preparation(stdout: &mut std::io::Stdout) -> Result<(), Box<dyn std::error::Error>> {
    execute!(
        stdout,
        Print("  A totem with three glyphs is about to rise.\r\n"),
        Print("  Memorize it before the countdown runs out.\r\n\r\n"),
        SetForegroundColor(Color::Cyan),
        Print("  Press Enter to raise the totem.\r\n"),
        ResetColor
    )?;
    Ok(())
}

fn render_memorization(
    stdout: &mut std::io::Stdout,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(round) = session.round() else {
        return Ok(());
    };

    execute!(stdout, Print("  Memorize the totem:\r\n\r\n"))?;
    execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("     +---------+\r\n")
    )?;
    for symbol in round.totem().symbols() {
        execute!(stdout, Print(format!("     |   {symbol}   |\r\n")))?;
    }
    execute!(stdout, Print("     +---------+\r\n"), ResetColor)?;
    Ok(())
}

fn stone_color(round_selected: Option<usize>, outcome: Option<Outcome>, index: usize) -> Color {
    match (round_selected, outcome) {
        (Some(selected), Some(outcome)) if selected == index => {
            if outcome.is_correct() {
                Color::Green
            } else {
                Color::Red
            }
        }
        _ => Color::Grey,
    }
}

fn render_selection(
    stdout: &mut std::io::Stdout,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(round) = session.round() else {
        return Ok(());
    };

    execute!(
        stdout,
        Print("  Which stone carries the totem's glyphs?\r\n\r\n")
    )?;

    for (index, stone) in round.stones().iter().enumerate() {
        let color = stone_color(round.selected(), round.outcome(), index);
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("   {})  {}\r\n", index + 1, stone_line(stone))),
            ResetColor
        )?;
    }

    execute!(
        stdout,
        Print("\r\n"),
        SetForegroundColor(Color::DarkGrey),
        Print("  Press the stone's number. Order on the stone doesn't matter.\r\n"),
        ResetColor
    )?;
    Ok(())
}

fn stone_line(stone: &Stone) -> String {
    let glyphs: Vec<String> = stone.symbols().iter().map(ToString::to_string).collect();
    glyphs.join("  ")
}

fn render_result(
    stdout: &mut std::io::Stdout,
    session: &Session,
    ui: &UiState,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolution = ui.flash.or_else(|| session.last_resolution().copied());
    let Some(resolution) = resolution else {
        return Ok(());
    };

    let (color, headline) = if resolution.outcome.is_correct() {
        (Color::Green, "Correct!")
    } else {
        (Color::Red, "Not this time.")
    };

    execute!(
        stdout,
        SetForegroundColor(color),
        Print(format!("  {headline}\r\n\r\n")),
        ResetColor,
        Print(format!("  {}\r\n", resolution.feedback))
    )?;

    if resolution.score_delta != 0 {
        execute!(
            stdout,
            Print(format!("  {:+} points\r\n", resolution.score_delta))
        )?;
    }

    let prompt = if resolution.outcome.is_correct() {
        "  Press Enter for the next round."
    } else {
        "  Press Enter to try another round."
    };
    execute!(
        stdout,
        Print("\r\n"),
        SetForegroundColor(Color::Cyan),
        Print(prompt),
        Print("\r\n"),
        ResetColor
    )?;
    Ok(())
}

fn print_summary(stats: &GameStats) {
    println!();
    println!("  Session over.");
    println!("  Final score:  {}", stats.score);
    println!("  Level:        {}", stats.level);
    println!("  Hits:         {}", stats.correct);
    println!("  Misses:       {}", stats.incorrect);

    let answered = stats.correct + stats.incorrect;
    if answered > 0 {
        let accuracy = f64::from(stats.correct) / f64::from(answered) * 100.0;
        println!("  Accuracy:     {accuracy:.0}%");
    }
    if stats.correct > 0 {
        println!(
            "  Avg response: {:.1}s",
            stats.avg_response_ms / 1_000.0
        );
    }
}

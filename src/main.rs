use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use halcyon::assets::AssetCatalog;
use halcyon::display::{CellMapping, TerminalRenderer};
use halcyon::enemy::EnemyTable;
use halcyon::game::Cue;
use halcyon::highscore::{self, Highscores};
use halcyon::persistence;
use halcyon::platform::Viewport;
use halcyon::screen::{ScreenStack, Services};
use halcyon::screens::ScreenKind;
use halcyon::settings::Settings;
use halcyon::terminal_input::{spawn_reader, TerminalInput};

#[derive(Parser, Debug)]
#[command(name = "halcyon")]
#[command(about = "Vertical arcade shooter in the terminal")]
struct Cli {
    /// Seed for a deterministic run
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation ticks per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Settings file (INI), created with defaults when missing
    #[arg(long, default_value = "halcyon.ini")]
    settings: PathBuf,
    /// Best-score file [default: $HOME/.halcyon_score]
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Where the session is saved on quit
    #[arg(long, default_value = "halcyon_session.json")]
    session: PathBuf,
    /// Pick up the saved session instead of starting at the main menu
    #[arg(long)]
    resume: bool,
    /// Enemy table (JSON) replacing the built-in one
    #[arg(long)]
    enemy_data: Option<PathBuf>,
    #[arg(long, default_value = "halcyon.log")]
    log_file: PathBuf,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode while the game runs, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn build_stack(cli: &Cli, catalog: AssetCatalog) -> Result<ScreenStack> {
    let enemy_table = match &cli.enemy_data {
        Some(path) => EnemyTable::load(path)?,
        None => EnemyTable::builtin()?,
    };
    let settings = Settings::load_or_default(&cli.settings);
    let scores_path = cli.scores.clone().unwrap_or_else(highscore::default_path);
    let highscores = Highscores::load(scores_path);
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let services = Services::new(
        Box::new(catalog),
        Viewport::PORTRAIT,
        settings,
        highscores,
        enemy_table,
        rng,
    );
    let mut stack = ScreenStack::new(services);

    let resumed = cli.resume && resume(&mut stack, &cli.session);
    if !resumed {
        stack.add(ScreenKind::background())?;
        stack.add(ScreenKind::main_menu())?;
    }
    stack.initialize()?;
    Ok(stack)
}

/// Falls back to the initial screens on any problem with the saved file.
fn resume(stack: &mut ScreenStack, path: &Path) -> bool {
    let saved = match persistence::load_from_file(path) {
        Ok(saved) if !saved.screens.is_empty() => saved,
        Ok(_) => {
            warn!("saved session {} is empty, starting fresh", path.display());
            return false;
        }
        Err(e) => {
            warn!("could not resume: {e:#}");
            return false;
        }
    };
    match persistence::restore(stack, &saved) {
        Ok(()) => true,
        Err(e) => {
            warn!("could not restore saved screens: {e:#}");
            false
        }
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn play_cues(stack: &mut ScreenStack, catalog: &AssetCatalog) {
    for cue in stack.take_cues() {
        match cue {
            Cue::Sound(sound) => debug!("play {}", catalog.sound_name(sound).unwrap_or("<unknown sound>")),
            Cue::Vibrate { seconds } => debug!("vibrate for {seconds}s"),
        }
    }
}

/// Saves the session when a game is still on the stack, otherwise clears a
/// stale one so `--resume` does not bring it back.
fn save_session(stack: &ScreenStack, path: &Path) {
    if stack.game_session().is_some() {
        let saved = persistence::capture(stack);
        if let Err(e) = persistence::save_to_file(&saved, path) {
            warn!("could not save session: {e:#}");
        }
    } else if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not remove stale session {}: {e}", path.display());
        }
    }
}

fn run<W: Write>(out: &mut W, stack: &mut ScreenStack, catalog: &AssetCatalog, cli: &Cli) -> Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / cli.fps.max(1) as f64);
    let dt = frame_time.as_secs_f32();

    let viewport = stack.services().viewport;
    let (cols, rows) = terminal::size()?;
    let mapping = CellMapping::new(viewport, cols, rows);
    let mut input = TerminalInput::new(spawn_reader(), mapping);
    let mut renderer = TerminalRenderer::new(out, mapping, catalog.glyphs());

    loop {
        let frame_start = Instant::now();

        stack.set_host_focus(input.has_focus());
        stack.update(dt, &mut input)?;
        if stack.quit_requested() || stack.is_empty() {
            break;
        }

        renderer.resize(input.mapping().cols, input.mapping().rows);
        stack.draw(&mut renderer)?;
        play_cues(stack, catalog);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    save_session(stack, &cli.session);
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    info!("halcyon starting");

    let catalog = AssetCatalog::builtin()?;
    let mut stack = build_stack(&cli, catalog.clone())?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    // Not every terminal reports focus changes; losing them is harmless.
    let _ = out.execute(EnableFocusChange);

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = run(&mut out, &mut stack, &catalog, &cli);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match &result {
        Ok(()) => info!("halcyon exited"),
        Err(e) => error!("halcyon aborted: {e:#}"),
    }
    result
}

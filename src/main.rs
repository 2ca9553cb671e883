mod render;
mod scripted_input;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use clap::Parser;
use crossterm::style::Stylize;
use log::info;
use longway::data::loader::load_catalog;
use longway::{
    GeneratorConfig, Node, RouteCommand, RouteCursor, Run, RunGenerator, SongCatalog,
};
use render::{Palette, RouteHud, draw_act, draw_log, draw_preview};
use scripted_input::{InputAction, ScriptedInput, key_to_action};

const SCREEN_HEIGHT: i32 = 50;
const ACT_ORIGIN_X: i32 = 7;
const ACT_ORIGIN_Y: i32 = 7;
const PREVIEW_X: i32 = 38;
const PREVIEW_Y: i32 = 6;
const PREVIEW_WIDTH: i32 = 40;
const PREVIEW_HEIGHT: i32 = 30;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 6;
const LOG_MAX_ENTRIES: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "longway", version, about = "Seeded three-act route maps for a rhythm roguelike")]
struct Args {
    /// Song catalog CSV; the built-in song is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Run seed; defaults to the wall clock.
    #[arg(long)]
    seed: Option<u64>,

    /// Generator settings (JSON). Missing file means defaults.
    #[arg(long, default_value = "longway.json")]
    config: PathBuf,

    /// Keep only songs whose origin matches.
    #[arg(long)]
    origin: Option<String>,

    /// Replay a key script headlessly instead of opening the terminal.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the generated run as JSON and exit.
    #[arg(long)]
    dump: bool,
}

/// Where the next seed comes from on reroll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SeedSource {
    Clock,
    Sequential,
}

impl SeedSource {
    fn next(self, current: u64) -> u64 {
        match self {
            SeedSource::Clock => clock_seed(),
            SeedSource::Sequential => current.wrapping_add(1),
        }
    }
}

struct LongWayState {
    generator: RunGenerator,
    catalog: SongCatalog,
    seeds: SeedSource,
    run: Run,
    cursor: RouteCursor,
    palette: Palette,
    hud: RouteHud,
    message_log: Vec<String>,
}

impl GameState for LongWayState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(action) = ctx.key.and_then(key_to_action) {
            if !self.handle(action) {
                ctx.quit();
                return;
            }
        }
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl LongWayState {
    fn new(generator: RunGenerator, catalog: SongCatalog, seed: u64, seeds: SeedSource) -> Self {
        let run = generator.generate(seed, &catalog.songs);
        let cursor = RouteCursor::with_pick_limit(&run, generator.config().picks_per_challenge);
        let mut state = Self {
            generator,
            catalog,
            seeds,
            run,
            cursor,
            palette: Palette::default(),
            hud: RouteHud::new(),
            message_log: Vec::new(),
        };
        state.push_log_entry(format!(
            "Seed {seed} · {} songs in catalog",
            state.catalog.len()
        ));
        state
    }

    /// Returns false once the player asks to quit.
    fn handle(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Route(RouteCommand::ToggleSong(idx)) => {
                if self.cursor.apply(&self.run, RouteCommand::ToggleSong(idx)) {
                    let entry = self.describe_picks();
                    self.push_log_entry(entry);
                }
            }
            InputAction::Route(command) => {
                if self.cursor.apply(&self.run, command) {
                    let entry = self.describe_position();
                    self.push_log_entry(entry);
                }
            }
            InputAction::Reroll => self.reroll(),
            InputAction::Dump => {
                let entry = match self.cursor.selected_node(&self.run) {
                    Some(node) => node.challenge.summary.clone(),
                    None => "No node selected".to_string(),
                };
                self.push_log_entry(entry);
            }
            InputAction::Quit => return false,
        }
        true
    }

    fn reroll(&mut self) {
        let seed = self.seeds.next(self.run.seed);
        self.run = self.generator.generate(seed, &self.catalog.songs);
        self.cursor =
            RouteCursor::with_pick_limit(&self.run, self.generator.config().picks_per_challenge);
        info!("rerolled run with seed {seed}");
        self.push_log_entry(format!("Rerolled · seed {seed}"));
    }

    fn describe_position(&self) -> String {
        let name = self
            .cursor
            .selected_node(&self.run)
            .map_or("nothing", |node| node.challenge.name.as_str());
        format!(
            "Act {} · row {} · col {}: {name}",
            self.cursor.act() + 1,
            self.cursor.row() + 1,
            self.cursor.col() + 1
        )
    }

    fn describe_picks(&self) -> String {
        let Some(node) = self.selected() else {
            return "No node selected".to_string();
        };
        let titles: Vec<&str> = self
            .cursor
            .picked()
            .iter()
            .filter_map(|idx| node.challenge.songs.get(*idx))
            .map(|song| song.title.as_str())
            .collect();
        if titles.is_empty() {
            "No songs picked".to_string()
        } else {
            format!("Picked {}", titles.join(", "))
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn selected(&self) -> Option<&Node> {
        self.cursor.selected_node(&self.run)
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        self.hud.draw(
            ctx,
            &self.palette,
            self.run.seed,
            self.cursor.act(),
            self.run.acts.len(),
        );
        if let Some(act) = self.cursor.current_act(&self.run) {
            draw_act(
                ctx,
                &self.palette,
                act,
                &self.cursor,
                Point::new(ACT_ORIGIN_X, ACT_ORIGIN_Y),
            );
        }
        draw_preview(
            ctx,
            &self.palette,
            self.selected(),
            self.cursor.picked(),
            Point::new(PREVIEW_X, PREVIEW_Y),
            PREVIEW_WIDTH,
            PREVIEW_HEIGHT,
        );
        draw_log(ctx, &self.palette, &self.message_log, LOG_PANEL_START);
    }
}

fn clock_seed() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .unsigned_abs()
}

fn load_songs(args: &Args) -> Result<SongCatalog> {
    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => {
            info!("no catalog given, using the built-in song");
            SongCatalog::builtin()
        }
    };
    let Some(origin) = &args.origin else {
        return Ok(catalog);
    };
    let filtered = catalog.with_origin(origin);
    if filtered.is_empty() {
        bail!(
            "no songs with origin {origin:?}; known origins: {}",
            catalog.origins().join(", ")
        );
    }
    info!("origin {origin}: {} of {} songs", filtered.len(), catalog.len());
    Ok(filtered)
}

fn run_script(mut state: LongWayState, mut script: ScriptedInput) -> Result<()> {
    info!("replaying {} scripted keys", script.len());
    while let Some(action) = script.next_action() {
        match action {
            InputAction::Dump => {
                let json = state.run.to_json().context("serializing run")?;
                println!("{json}");
            }
            InputAction::Quit => break,
            other => {
                state.handle(other);
                if let Some(entry) = state.message_log.first() {
                    info!("{entry}");
                }
            }
        }
    }

    println!("{}", format!("Seed {}", state.run.seed).yellow().bold());
    println!("{}", state.describe_position().cyan());
    let path = state.cursor.path();
    if !path.is_empty() {
        let steps: Vec<String> = path
            .iter()
            .map(|(row, col)| format!("{}:{}", row + 1, col + 1))
            .collect();
        println!("Path {}", steps.join(" -> "));
    }
    if let Some(node) = state.selected() {
        println!("{}", node.challenge.summary.as_str().green());
        for (idx, song) in node.challenge.songs.iter().enumerate() {
            let mark = if state.cursor.picked().contains(&idx) { '*' } else { ' ' };
            println!(" {mark} {} - {}", song.title, song.artist);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = GeneratorConfig::load_from(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let generator = RunGenerator::new(config).context("invalid generator config")?;
    let catalog = load_songs(&args)?;
    let seed = args.seed.unwrap_or_else(clock_seed);

    if let Some(path) = &args.script {
        let script = ScriptedInput::from_file(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let state = LongWayState::new(generator, catalog, seed, SeedSource::Sequential);
        return run_script(state, script);
    }

    if args.dump {
        let run = generator.generate(seed, &catalog.songs);
        println!("{}", run.to_json().context("serializing run")?);
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Long Way To The Top")
        .build()
        .map_err(|err| anyhow!("terminal setup failed: {err}"))?;
    let state = LongWayState::new(generator, catalog, seed, SeedSource::Clock);
    main_loop(context, state).map_err(|err| anyhow!("terminal loop failed: {err}"))
}

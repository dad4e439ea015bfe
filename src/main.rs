use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use engine::prelude::*;
use rand::{seq::SliceRandom, Rng};
use util::{srng, GameRng, Logos, RngExt};
use world::DungeonMap;

mod stats;

pub const GAME_NAME: &str = "survaillant";

const DEFAULT_MAP: &str = include_str!("../maps/crypt.json");

#[derive(Parser, Debug)]
#[command(
    name = GAME_NAME,
    about = "Play dungeon crawl sessions with a random agent"
)]
struct Args {
    #[arg(long, help = "Map file in JSON, a built-in map is used if omitted")]
    map: Option<PathBuf>,

    #[arg(
        long,
        value_parser = |e: &str| Ok::<Logos, &str>(Logos::new(e)),
        help = "Seed for the whole batch"
    )]
    seed: Option<Logos>,

    #[arg(long, default_value_t = 100, help = "Number of sessions to play")]
    games: usize,

    #[arg(
        long,
        default_value_t = 1000,
        help = "Cut a session off after this many turns"
    )]
    max_turns: u32,

    #[arg(
        long,
        default_value_t = GameMode::Solo,
        help = "solo, coop or versus"
    )]
    mode: GameMode,

    #[arg(
        long,
        default_value_t = 1,
        help = "Players per session, one team each in versus"
    )]
    players: usize,

    #[arg(long, help = "Rule settings file in JSON")]
    settings: Option<PathBuf>,

    #[arg(long, help = "Print the final snapshot of every session")]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    let map = match &args.map {
        Some(path) => DungeonMap::load(path)?,
        None => DungeonMap::from_json(DEFAULT_MAP)
            .context("built-in map is broken")?,
    };

    let settings: Settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => Default::default(),
    };

    let seed = args
        .seed
        .clone()
        .unwrap_or_else(|| Logos::sample(&mut rand::thread_rng(), 10));
    log::info!("seed: {seed}");

    let mut scores = Vec::with_capacity(args.games);
    for game in 0..args.games {
        let runtime = play(&args, &map, &settings, &(&seed, game))?;
        if args.dump {
            println!("{}", serde_json::to_string(&runtime.snapshot())?);
        }
        log::debug!(
            "game {game} ended on turn {} with {:?}",
            runtime.turn(),
            runtime.game_over()
        );
        scores.push(runtime.scores());
    }

    let report = stats::Report::new(map.name(), seed, &scores);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Play one session to the end or to the turn limit.
fn play(
    args: &Args,
    map: &DungeonMap,
    settings: &Settings,
    seed: &(&Logos, usize),
) -> anyhow::Result<Runtime> {
    let mut runtime = Runtime::new(map, args.mode, settings.clone(), seed)?;
    let players = args.players.max(1);
    for i in 0..players {
        let team = match args.mode {
            GameMode::Versus => i as u32 + 1,
            GameMode::Solo | GameMode::Coop => 1,
        };
        runtime.add_player(format!("agent-{i}"), team)?;
    }

    let mut agent = srng(&(seed, "agent"));
    while !runtime.is_over() && runtime.turn() < args.max_turns {
        let living: Vec<Entity> = runtime.living_players().collect();
        for p in living {
            let action = random_action(&mut agent, &runtime, p);
            runtime.execute(p, action)?;
        }
    }

    Ok(runtime)
}

/// Pick a direction and sometimes an item the player still has.
fn random_action(
    rng: &mut GameRng,
    runtime: &Runtime,
    player: Entity,
) -> Action {
    let dir = DIR_4.choose(rng).copied().unwrap_or(IVec2::X);

    if rng.one_chance_in(6) {
        if let Some(p) = runtime.player(player) {
            let items: Vec<ItemKind> =
                [ItemKind::Arrow, ItemKind::Bomb, ItemKind::Dynamite]
                    .into_iter()
                    .filter(|&k| p.inventory.count(k) > 0)
                    .collect();
            if let Some(&kind) = items.choose(rng) {
                return Action::UseItem(kind, dir);
            }
        }
    }

    // Mostly keep walking the way you're facing.
    match runtime.player(player) {
        Some(p) if rng.gen_bool(0.5) => Action::Move(p.heading.vec()),
        _ => Action::Move(dir),
    }
}

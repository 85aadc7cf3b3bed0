use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use kn_app::{AppError, Application, AutoSaver, InMemoryScores, MAX_SCORES_PAGE, load_state, save_state};
use kn_simulation::SimConfig;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::info;

/// Commands a bot picks from. The empty command stops the dog.
const COMMANDS: [&str; 5] = ["", "U", "D", "L", "R"];

/// Chance per tick that a bot changes its command.
const TURN_CHANCE: f64 = 0.1;

pub struct Options {
    pub config: PathBuf,
    pub bots: usize,
    pub ticks: u64,
    pub tick_period: u64,
    pub seed: u64,
    pub randomize_spawn_points: bool,
    pub state_file: Option<PathBuf>,
    pub save_state_period: Option<u64>,
    pub json: bool,
}

struct Bot {
    token: String,
    active: bool,
}

#[derive(Default)]
struct Totals {
    spawned: usize,
    collected: usize,
    delivered: i64,
    retired: usize,
}

pub fn run(opts: &Options) -> Result<(), String> {
    if opts.tick_period == 0 {
        return Err("tick period must be positive".into());
    }
    let delta = Duration::from_millis(opts.tick_period);

    let base = SimConfig::default()
        .with_seed(opts.seed)
        .with_randomized_spawn(opts.randomize_spawn_points);
    let game = super::read_config(&opts.config)?
        .into_game(base)
        .map_err(|e| format!("{}: {e}", opts.config.display()))?;

    let mut seeds = StdRng::seed_from_u64(opts.seed);
    let token_rng = StdRng::seed_from_u64(seeds.next_u64());
    let mut bot_rng = StdRng::seed_from_u64(seeds.next_u64());
    let mut app = Application::with_token_rng(game, InMemoryScores::new(), token_rng);

    // Players restored from a state file keep playing as bots.
    let mut bots = Vec::new();
    if let Some(path) = &opts.state_file
        && let Some(state) = load_state(path).map_err(|e| format!("{}: {e}", path.display()))?
    {
        app.restore_state(state)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        bots.extend(app.export_state().players.into_iter().map(|r| Bot {
            token: r.token.to_string(),
            active: true,
        }));
    }
    let resumed = bots.len();

    let maps = app.maps();
    if maps.is_empty() {
        return Err("config defines no maps".into());
    }
    for i in 0..opts.bots {
        let map = &maps[i % maps.len()];
        let name = format!("bot-{}", resumed + i + 1);
        let join = app.join_game(&name, map.id.as_str()).map_err(|e| e.to_string())?;
        bots.push(Bot {
            token: join.auth_token.to_string(),
            active: true,
        });
    }

    let mut saver = match (&opts.state_file, opts.save_state_period) {
        (Some(path), Some(period)) => Some(AutoSaver::new(path, Duration::from_millis(period))),
        _ => None,
    };

    let mut totals = Totals::default();
    for _ in 0..opts.ticks {
        for bot in bots.iter_mut().filter(|b| b.active) {
            if !bot_rng.random_bool(TURN_CHANCE) {
                continue;
            }
            let command = COMMANDS[bot_rng.random_range(0..COMMANDS.len())];
            match app.player_action(&bot.token, command) {
                Ok(()) => {}
                Err(AppError::UnknownToken) => bot.active = false,
                Err(e) => return Err(e.to_string()),
            }
        }

        let reports = app.tick(delta).map_err(|e| e.to_string())?;
        for report in &reports {
            totals.spawned += report.spawned;
            totals.collected += report.collected;
            totals.delivered += report.delivered;
            totals.retired += report.retired.len();
        }
        if let Some(saver) = &mut saver {
            saver.on_tick(delta, &app).map_err(|e| e.to_string())?;
        }
    }

    if let Some(path) = &opts.state_file {
        save_state(path, &app.export_state()).map_err(|e| format!("{}: {e}", path.display()))?;
    }
    info!(ticks = opts.ticks, players = app.players_registry().len(), "simulation finished");

    print_summary(opts, &app, bots.len(), &totals);
    print_players(&app);
    print_records(&app)?;

    if opts.json {
        let sessions = app.export_state().sessions;
        let json = serde_json::to_string_pretty(&sessions).map_err(|e| e.to_string())?;
        println!("{json}");
    }

    Ok(())
}

fn print_summary(opts: &Options, app: &Application, bots: usize, totals: &Totals) {
    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        opts.config.display(),
        format!(
            "({} ticks x {}ms, seed={})",
            opts.ticks, opts.tick_period, opts.seed
        )
        .dimmed()
    );
    println!(
        "  {bots} bots on {} maps, {:.1}s of game time",
        app.maps().len(),
        app.game().clock().elapsed().as_secs_f64()
    );
    println!(
        "  {} loot spawned, {} collected, {} points delivered, {} retired",
        totals.spawned, totals.collected, totals.delivered, totals.retired
    );
    println!();
}

fn print_players(app: &Application) {
    println!("  {}", "Live Players".bold().underline());
    println!();

    let mut rows: Vec<_> = app
        .players_registry()
        .iter()
        .filter_map(|p| {
            let dog = app.game().session(&p.map_id)?.dog(p.dog_id)?;
            Some((p, dog))
        })
        .collect();
    if rows.is_empty() {
        println!("  {}", "(nobody left)".dimmed());
        println!();
        return;
    }
    rows.sort_by_key(|(p, dog)| (std::cmp::Reverse(dog.score()), p.id));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Player", "Name", "Map", "Position", "Bag", "Score"]);
    for (player, dog) in rows {
        table.add_row(vec![
            player.id.to_string(),
            player.name.clone(),
            player.map_id.to_string(),
            dog.position().to_string(),
            format!("{}/{}", dog.bag().len(), dog.bag_capacity()),
            dog.score().to_string(),
        ]);
    }
    println!("{table}");
    println!();
}

fn print_records(app: &Application) -> Result<(), String> {
    let records = app.records(0, MAX_SCORES_PAGE).map_err(|e| e.to_string())?;
    if records.is_empty() {
        return Ok(());
    }

    println!("  {}", "Retired".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Score", "Play time"]);
    for (rank, record) in records.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            record.name.clone(),
            record.score.to_string(),
            format!("{:.1}s", record.play_time.as_secs_f64()),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use kn_simulation::SimConfig;

pub fn run(path: &Path) -> Result<(), String> {
    let config = super::read_config(path)?;
    let game = config
        .into_game(SimConfig::default())
        .map_err(|e| format!("{}: {e}", path.display()))?;

    println!("  {}", "Maps".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id",
        "Name",
        "Roads",
        "Buildings",
        "Offices",
        "Loot types",
        "Dog speed",
        "Bag",
    ]);
    for map in game.maps() {
        table.add_row(vec![
            map.id().to_string(),
            map.name().to_string(),
            map.roads().len().to_string(),
            map.buildings().len().to_string(),
            map.offices().len().to_string(),
            map.loot_type_count().to_string(),
            format!("{:.2}", map.dog_speed()),
            map.bag_capacity().to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let sim = game.config();
    println!(
        "  All checks passed: {} map{}",
        game.maps().len(),
        if game.maps().len() == 1 { "" } else { "s" }
    );
    println!(
        "  {}",
        format!(
            "retirement after {:.1}s idle, loot every {:.1}s with p={}",
            sim.retirement_time.as_secs_f64(),
            sim.loot_period.as_secs_f64(),
            sim.loot_probability
        )
        .dimmed()
    );

    Ok(())
}

use clap::Parser;
use notegraph::Config;
use notegraph::diagram::{self, Uid};
use std::path::PathBuf;
use anyhow::Result;

#[derive(Parser, Debug)]
#[command(name = "notegraph-inspect")]
#[command(about = "Show how each note of a Scapple diagram is classified")]
struct Args {
    /// Diagram to inspect
    path: PathBuf,
}

fn format_uids<'a>(uids: impl Iterator<Item = &'a Uid>) -> String {
    uids.map(|u| u.to_string()).collect::<Vec<_>>().join(",")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let notes = diagram::read_notes(&args.path, &config.note_parser())?;

    println!("\n=== {} ({} notes) ===\n", args.path.display(), notes.len());
    println!(
        "{:<6} {:<16} {:>14}  {:<20} {:<12} Text",
        "UID", "Role", "Position", "Connections", "Points to"
    );
    println!("{}", "-".repeat(90));

    for note in &notes {
        let text: String = note.text.lines().next().unwrap_or("").chars().take(30).collect();
        println!(
            "{:<6} {:<16} {:>14.1}  {:<20} {:<12} {}",
            note.uid.to_string(),
            note.role.to_string(),
            note.position.key(),
            format_uids(note.connections.iter()),
            format_uids(note.point_to.iter()),
            text
        );
    }

    Ok(())
}

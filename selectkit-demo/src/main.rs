use std::fs::File;
use std::sync::Arc;

use selectkit::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

const ITEMS: [&str; 4] = ["A", "B", "C", "D"];

/// Select C, A, D then deselect C, printing the view after each step.
fn walk(title: &str, config: SelectionConfig) -> Result<()> {
    println!("{title}");

    let entries: Vec<_> = ITEMS.into_iter().map(SelectableEntry::new).collect();
    let list = SelectionTrackingList::with_entries(config, entries.clone())?;

    let view = list.downgrade();
    list.subscribe_selection_changed(move |entry| {
        let Some(view) = view.upgrade() else {
            return;
        };
        let verb = if entry.is_selected() { "select" } else { "deselect" };
        println!("  {verb:<8} {} -> {:?}", entry.value(), view.selected_values());
    });

    entries[2].set_selected(true);
    entries[0].set_selected(true);
    entries[3].set_selected(true);
    entries[2].set_selected(false);

    let removed = list.remove(0)?;
    println!(
        "  remove   {} -> {:?}",
        removed.value(),
        list.selected_values()
    );
    Ok(())
}

fn network() {
    println!("network");

    let source = Arc::new(ManualConnectivity::new(true));
    let status = NetworkStatus::new(Arc::clone(&source));
    status.subscribe_changed(|available| println!("  changed  -> {available}"));

    println!("  available: {}", status.is_network_available());
    source.set_available(false);
    source.set_available(true);
}

fn main() {
    let log_file = File::create("selectkit-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let runs = [
        ("append order", SelectionConfig::default()),
        ("positional order", SelectionConfig::positional()),
    ];
    for (title, config) in runs {
        if let Err(e) = walk(title, config) {
            log::error!("{title}: {e}");
            eprintln!("Error: {}", e);
        }
    }
    network();
}

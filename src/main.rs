mod catalog_store;
mod config;
mod link_generators;
mod protocol;
mod reconcile;
mod video_search;

use std::path::PathBuf;

use catalog_store::CatalogStore;
use config::{sanitize_config, Config};
use log::{info, warn};
use protocol::{is_blank, LinkField, SongRow};
use reconcile::{pending_work, LinkReconciler};
use video_search::YoutubeSearchProvider;

fn config_file_path() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir().ok_or("Could not find config directory")?;
    Ok(config_dir.join("tunelinks.toml"))
}

fn load_or_create_config(config_file: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if !config_file.exists() {
        let default_config = Config::default();
        std::fs::write(config_file, toml::to_string(&default_config)?)?;
        return Ok(default_config);
    }
    let config_content = std::fs::read_to_string(config_file)?;
    Ok(sanitize_config(
        toml::from_str::<Config>(&config_content).unwrap_or_default(),
    ))
}

fn filled_link_count(rows: &[SongRow]) -> usize {
    rows.iter()
        .map(|row| {
            LinkField::ALL
                .iter()
                .filter(|field| !is_blank(row.derived_link(**field)))
                .count()
        })
        .sum()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_file = config_file_path()?;
    let config = load_or_create_config(&config_file)?;

    let mut clog = colog::default_builder();
    let level = if config.ui.verbose_logging {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    clog.filter(None, level);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    info!("Using config file {}", config_file.display());

    let store = CatalogStore::new(config.storage.songs_path.clone());
    let persisted = store.load()?;
    info!(
        "Loaded {} rows from {}",
        persisted.len(),
        store.songs_path().display()
    );

    // The CLI edits nothing itself, so the loaded catalog plays both roles:
    // last persisted snapshot and edited row-set. Rows the user changed in
    // the file since the previous run simply show up with blank links.
    if !pending_work(&persisted, &persisted) {
        info!("Catalog is fully linked; nothing to do");
        return Ok(());
    }

    let reconciler = LinkReconciler::new(Box::new(YoutubeSearchProvider::new(&config.search)))
        .with_video_search_enabled(config.search.enabled);

    let links_before = filled_link_count(&persisted);
    let outcome = reconciler.reconcile(&persisted, &persisted);
    let links_filled = filled_link_count(&outcome.rows).saturating_sub(links_before);

    for diagnostic in &outcome.diagnostics {
        warn!(
            "'{}' {}: {}",
            diagnostic.song,
            diagnostic.field.column_name(),
            diagnostic.message
        );
    }

    store.save(&outcome.rows)?;
    if outcome.diagnostics.is_empty() {
        info!("Saved changes: {} links filled", links_filled);
    } else {
        info!(
            "Saved changes: {} links filled, {} left for the next run",
            links_filled,
            outcome.diagnostics.len()
        );
    }

    Ok(())
}

use anyhow::{Context, Result};
use search_bar::{CommandIndex, FetchState, ResultFetcher, SearchItem, SearchSession};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::index::load_index;
use crate::view_model::{ResultsViewModel, TitleStyle};

mod config;
mod index;
mod view_model;

const USAGE: &str = "usage: search-bar <index.toml|index.json> <query...>";

/// Feed `query` into the session one keystroke at a time
async fn type_query(session: &SearchSession, query: &str, keystroke: Duration) {
    let mut typed = String::new();
    for c in query.chars() {
        typed.push(c);
        session.set_input(typed.clone());
        tokio::time::sleep(keystroke).await;
    }
}

/// Wait until the fetcher has answered `query`
async fn settled(
    fetcher: &mut ResultFetcher<SearchItem<String>>,
    query: &str,
) -> FetchState<SearchItem<String>> {
    fetcher
        .wait_for(|state| state.active_query() == Some(query) && !state.is_loading())
        .await
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let Some(index_path) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let query = args.collect::<Vec<_>>().join(" ");

    let config = Config::load();
    let items = load_index(Path::new(&index_path))
        .with_context(|| format!("Could not load search index from {}", index_path))?;
    if items.is_empty() {
        log::warn!("Index {} has no entries", index_path);
    } else {
        log::debug!("Searching {} entries", items.len());
    }

    let mut index: CommandIndex<String> = CommandIndex::new();
    index.register(Box::new(items));

    let session = SearchSession::new(&config.search);
    let mut fetcher = ResultFetcher::spawn(Some(&session), index);

    if query.trim().is_empty() {
        println!("{}\n  {}", config.search.title, config.search.placeholder);
        return Ok(());
    }

    type_query(&session, &query, Duration::from_millis(config.keystroke_ms)).await;
    let state = settled(&mut fetcher, &query).await;

    let style = TitleStyle::default();
    let vm = ResultsViewModel::from_state(&config.search.title, &state, Some(&session), style);

    println!("{}", vm.header);
    for row in &vm.rows {
        println!(
            "{}",
            row.to_plain(style, &config.highlight_open, &config.highlight_close)
        );
    }

    Ok(())
}

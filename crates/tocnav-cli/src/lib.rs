//! Terminal browser for local directory trees
//!
//! Wires the navigator core to the local filesystem:
//! - [`local`]: filesystem listing source
//! - [`repl`]: interactive command loop and text rendering

pub mod local;
pub mod repl;

pub use local::LocalDirectoryFetcher;

use std::num::NonZeroUsize;
use std::path::Path;
use tocnav_core::{DirPath, TocConfig, TocController, Transition};

/// Configuration from an optional TOML file with command-line overrides applied
///
/// # Errors
/// Returns error if the config file cannot be loaded
pub fn resolve_config(
    file: Option<&Path>,
    per_page: Option<NonZeroUsize>,
    cache_capacity: Option<NonZeroUsize>,
) -> anyhow::Result<TocConfig> {
    let mut config = match file {
        Some(path) => TocConfig::load(path)?,
        None => TocConfig::default(),
    };
    if let Some(per_page) = per_page {
        config = config.with_per_page(per_page);
    }
    if let Some(capacity) = cache_capacity {
        config = config.with_cache_capacity(capacity);
    }
    Ok(config)
}

/// Open the root and walk down to `path`, then apply search and page
///
/// Stops at the first failing step and returns its transition.
pub async fn navigate(
    toc: &TocController,
    path: &DirPath,
    search: Option<String>,
    page_index: Option<usize>,
) -> Transition {
    let mut transition = toc.on_open().await;
    for segment in path.iter() {
        if !transition.is_ok() {
            return transition;
        }
        transition = toc.on_descend(segment).await;
    }
    if !transition.is_ok() {
        return transition;
    }
    if search.is_some() {
        transition = toc.on_set_search(search);
    }
    if let Some(index) = page_index {
        transition = toc.on_set_page(index);
    }
    transition
}

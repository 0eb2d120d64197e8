//! Statistics reporting.

use console::style;

use crate::download::{CreatorStats, GlobalState};

/// Print statistics for a single creator.
pub fn print_creator_stats(stats: &CreatorStats) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for {}:", stats.creator_name)).bold()
    );
    if let Some(path) = &stats.base_path {
        println!("  Folder:       {}", path.display());
    }
    println!(
        "  Posts:        {} ({} pages)",
        stats.posts_loaded, stats.pages_fetched
    );
    println!("  Inaccessible: {}", stats.inaccessible_posts);
    if stats.capped_posts > 0 {
        println!("  Over limit:   {}", stats.capped_posts);
    }
    println!("  Downloaded:   {}", stats.downloads.completed);
    if stats.downloads.failed > 0 {
        println!("  Failed:       {}", style(stats.downloads.failed).red());
    }
    if stats.downloads.cancelled > 0 {
        println!("  Cancelled:    {}", style(stats.downloads.cancelled).yellow());
    }
    if let Some(error) = &stats.crawl_error {
        println!("  Crawl ended early: {}", style(error).yellow());
    }
}

/// Print global statistics across all creators.
pub fn print_global_stats(state: &GlobalState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Global Statistics:").bold());
    println!("  Creators processed: {}", state.creators_processed);
    if state.creators_failed > 0 {
        println!(
            "  Creators failed:    {}",
            style(state.creators_failed).red()
        );
    }
    println!("  Posts:      {}", state.posts_loaded);
    println!("  Downloaded: {}", state.downloaded);
    println!("  Failed:     {}", state.failed);
    println!("{}", style("═".repeat(50)).dim());
}

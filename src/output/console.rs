//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Patreon Crawler                                   ║
║     Crawl creator feeds and download their media      ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    creators: &[String],
    download_dir: &str,
    grouping: &str,
    max_posts: Option<usize>,
    max_parallel_downloads: usize,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Creators:  {}", creators.join(", "));
    println!("  Directory: {}", download_dir);
    println!("  Grouping:  {}", grouping);
    match max_posts {
        Some(max) => println!("  Max posts: {}", max),
        None => println!("  Max posts: unlimited"),
    }
    println!("  Parallel:  {}", max_parallel_downloads);
    println!();
}

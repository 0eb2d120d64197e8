//! Patreon Crawler - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use patreon_crawler::{
    api::{load_cookie_header, PatreonApi},
    cli::Args,
    config::{validate_config, Config},
    crawl::{CrawlOptions, Crawler},
    download::{CreatorStats, DownloadQueue, GlobalState, QueueOptions},
    error::{exit_codes, Error, Result},
    fs::get_creator_folder,
    output::{
        create_item_bar, print_banner, print_config_summary, print_creator_stats, print_error,
        print_global_stats, print_info, print_success, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(global_state) if global_state.creators_failed > 0 => {
            ExitCode::from(exit_codes::SOME_USERS_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e.root() {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Authentication(_) | Error::Api(_) | Error::CampaignNotFound(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<GlobalState> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using CLI arguments only",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);
    config.normalize_handles();

    validate_config(&config)?;

    let creators = config.targeted_creator.handles.clone();
    print_config_summary(
        &creators,
        &config.download_directory().display().to_string(),
        &config.options.grouping_strategy.to_string(),
        config.max_posts(),
        config.options.max_parallel_downloads,
    );

    // Resolve credentials before any request is made
    let cookie = load_cookie_header(&config.my_account)?;
    let api = PatreonApi::new(&cookie)?;

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let mut global_state = GlobalState::default();

    for creator in &creators {
        print_info(&format!("Crawling {}", creator));

        match process_creator(&api, &config, creator, &cancel).await {
            Ok(stats) => {
                print_creator_stats(&stats);
                global_state.add_creator_stats(&stats);
                if stats.crawl_error.is_some() {
                    global_state.mark_creator_failed();
                }
            }
            Err(Error::Cancelled) => {
                print_warning("Interrupted, skipping remaining creators");
                global_state.mark_creator_failed();
                break;
            }
            Err(e) => {
                print_error(&format!("Failed to process {}: {}", creator, e));
                global_state.mark_creator_failed();
            }
        }
    }

    print_global_stats(&global_state);

    if global_state.creators_failed == 0 {
        print_success("Done");
    }

    Ok(global_state)
}

/// Crawl one creator and download everything that was loaded.
///
/// A crawl that fails part-way still downloads the posts loaded before the
/// failure; the error is recorded in the returned stats.
async fn process_creator(
    api: &PatreonApi,
    config: &Config,
    creator: &str,
    cancel: &CancellationToken,
) -> Result<CreatorStats> {
    let base_path = get_creator_folder(config, creator)?;

    let mut stats = CreatorStats::new(creator);
    stats.base_path = Some(base_path.clone());

    let mut crawler = Crawler::new(api.clone(), creator, CrawlOptions::from_config(config))
        .with_cancellation(cancel.clone());

    let crawl_result = crawler.load_all().await;
    stats.record_crawl(crawler.state());
    let posts = crawler.into_posts();

    match crawl_result {
        Ok(()) => {}
        Err(e @ Error::Crawl { .. }) if !posts.is_empty() => {
            print_warning(&format!(
                "Crawl of {} stopped early, downloading the {} posts loaded so far: {}",
                creator,
                posts.len(),
                e
            ));
            stats.crawl_error = Some(e.to_string());
        }
        Err(e) => return Err(e),
    }

    tokio::fs::create_dir_all(&base_path).await?;

    let progress = config
        .options
        .show_downloads
        .then(|| create_item_bar("Downloading"));

    let options = QueueOptions {
        progress: progress.clone(),
        cancel: Some(cancel.clone()),
        ..QueueOptions::from_config(config)
    };

    let queue = DownloadQueue::new(api.clone(), &base_path, options);
    queue.enqueue(&posts);
    stats.downloads = queue.wait_finish().await;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    Ok(stats)
}

/// Cancel `token` on the first Ctrl-C.
fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Stopping after the current downloads...");
            token.cancel();
        }
    });
}

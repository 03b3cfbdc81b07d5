use chrono::{Duration, Utc};
use clap::Parser;
use condo_tv::config::Command;
use condo_tv::domain::model::ProportionUpdate;
use condo_tv::utils::error::ErrorSeverity;
use condo_tv::utils::logger;
use condo_tv::utils::validation::{validate_connection_code, Validate};
use condo_tv::{
    AppConfig, CliConfig, ContentMonitor, FeedNewsProvider, InMemoryStore,
    PlaylistBuilder, Result, TvContentService,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(snapshot) = &cli.snapshot {
        config.store.snapshot_path = snapshot.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: CliConfig, config: AppConfig) -> Result<()> {
    let snapshot_path = config.store.snapshot_path.clone();
    let store = InMemoryStore::from_file(&snapshot_path).await?;

    match cli.command {
        Command::Playlist { code, no_news } => {
            validate_connection_code(&code)?;
            let service = content_service(&config, store, no_news)?;
            let content = service.content_for_tv(&code).await?;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Content {
            condominium_id,
            no_news,
            news_limit,
        } => {
            let service = content_service(&config, store, no_news)?;
            let content = service
                .content_for_condominium(condominium_id, !no_news, news_limit)
                .await?;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Heartbeat { code } => {
            validate_connection_code(&code)?;
            let monitor = content_monitor(&config, store);
            let tv = monitor.record_heartbeat(&code, Utc::now()).await?;
            monitor.store().save_to_file(&snapshot_path).await?;
            println!("✅ TV '{}' is online", tv.name);
        }
        Command::Monitor => {
            let monitor = content_monitor(&config, store);
            let now = Utc::now();
            let offline = monitor.check_offline_tvs(now).await?;
            let expired = monitor.check_expired_content(now).await?;
            monitor.store().save_to_file(&snapshot_path).await?;
            println!(
                "✅ {} TV(s) marked offline, {} notice(s) and {} ad(s) expired",
                offline, expired.notices_deactivated, expired.ads_deactivated
            );
        }
        Command::RegisterTv {
            name,
            condominium_id,
            template,
        } => {
            let tv = store.register_tv(&name, condominium_id, template).await?;
            store.save_to_file(&snapshot_path).await?;
            println!("📺 TV '{}' registered, connection code {}", tv.name, tv.connection_code);
        }
        Command::SetProportion {
            tv_id,
            notices,
            ads,
            news,
        } => {
            let update = ProportionUpdate {
                notice_ratio: notices,
                ad_ratio: ads,
                news_ratio: news,
            };
            let tv = store.update_tv_proportion(tv_id, update).await?;
            store.save_to_file(&snapshot_path).await?;
            println!("⚙️ TV '{}': {}", tv.name, tv.proportion.describe());
        }
    }

    Ok(())
}

fn content_service(
    config: &AppConfig,
    store: InMemoryStore,
    no_news: bool,
) -> Result<TvContentService<InMemoryStore, FeedNewsProvider>> {
    let mut news_config = config.news.clone();
    if no_news || !config.news_enabled() {
        news_config.feeds.clear();
    }
    let news = FeedNewsProvider::new(&news_config)?;
    let builder = PlaylistBuilder::with_min_target_size(config.playlist.min_target_size);
    Ok(TvContentService::new(store, news).with_builder(builder))
}

fn content_monitor(config: &AppConfig, store: InMemoryStore) -> ContentMonitor<InMemoryStore> {
    ContentMonitor::new(store)
        .with_offline_after(Duration::minutes(config.monitor.offline_after_minutes))
}


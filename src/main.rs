use anyhow::Context;
use clap::Parser;
use design_settings::adapters::{FileDownloadHost, GhostAdminClient, InMemoryThemeCache, TracingNotifier};
use design_settings::config::cli::{Command, NavCommand, ThemeCommand};
use design_settings::core::theme_deletion::DeletionStep;
use design_settings::core::validation::NavigationItemValidator;
use design_settings::core::{ConfigProvider, SessionProvider, ThemeCache};
use design_settings::utils::{logger, validation::Validate};
use design_settings::{CliConfig, Collaborators, DesignSettings, NavigationItem, SiteConfig, ThemeRecord};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match SiteConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = Arc::new(config);
    let client = Arc::new(GhostAdminClient::new(config.as_ref(), config.access_token()));
    let cache = Arc::new(InMemoryThemeCache::new());
    let blog_base = url::Url::parse(&design_settings::core::download::with_trailing_slash(
        config.blog_url(),
    ))
    .context("blog_url is not a valid url")?;
    let host = Arc::new(FileDownloadHost::new(blog_base, config.output_dir()));

    let deps = Collaborators {
        config: config.clone(),
        session: config.clone(),
        notifier: Arc::new(TracingNotifier::new()),
        validator: Arc::new(NavigationItemValidator),
        navigation: client.clone(),
        themes: client.clone(),
        theme_cache: cache.clone(),
        download_host: host.clone(),
    };

    match cli.command {
        Command::BlogUrl => {
            let settings = DesignSettings::new(Vec::new(), deps);
            println!("{}", settings.blog_url());
        }
        Command::Nav(NavCommand::Save {
            file,
            add_label,
            add_url,
        }) => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let items: Vec<NavigationItem> =
                serde_json::from_str(&raw).context("navigation file must be a JSON array")?;
            let settings = DesignSettings::new(items, deps);

            if let Some(label) = add_label {
                settings.edit_new_nav_item(&label, add_url.as_deref().unwrap_or(""));
            }

            let saved = settings.save().await?;
            println!("✅ Saved {} navigation item(s)", saved.len());
            for item in saved {
                println!("  {} -> {}", item.label, item.url);
            }
        }
        Command::Theme(command) => {
            for theme in client.list_themes().await? {
                cache.insert(theme);
            }
            let settings = DesignSettings::new(Vec::new(), deps);
            run_theme_command(&settings, cache.as_ref(), host.as_ref(), command).await?;
        }
    }

    Ok(())
}

async fn run_theme_command(
    settings: &DesignSettings,
    cache: &InMemoryThemeCache,
    host: &FileDownloadHost,
    command: ThemeCommand,
) -> anyhow::Result<()> {
    let lookup = |name: &str| cache.peek(name).unwrap_or_else(|| ThemeRecord::new(name));

    match command {
        ThemeCommand::List => {
            let active = cache.active().map(|t| t.name);
            println!("{} theme(s) installed", cache.len());
            if let Some(name) = active {
                println!("Active: {}", name);
            }
        }
        ThemeCommand::Activate { name } => {
            let activated = settings.activate_theme(&lookup(&name)).await?;
            let report = settings.theme_report();
            match activated {
                Some(theme) => {
                    println!("✅ {} is now active", theme.name);
                    if let Some(message) = &report.message {
                        println!("{}", message);
                    }
                    for warning in &report.warnings {
                        println!("  warning: {}", warning);
                    }
                    for error in &report.errors {
                        println!("  error: {}", error);
                    }
                }
                None => {
                    println!("❌ {} could not be activated", name);
                    for issue in &report.fatal_errors {
                        println!("  fatal: {}", issue.message);
                    }
                    for issue in &report.normal_errors {
                        println!("  error: {}", issue.message);
                    }
                }
            }
            settings.hide_theme_warnings_modal();
        }
        ThemeCommand::Delete { name, yes } => {
            settings.delete_theme(Some(lookup(&name))).await?;
            if yes || confirm(&format!("Delete theme '{}'? [y/N] ", name))? {
                if let DeletionStep::Deleted(name) = settings.delete_theme(None).await? {
                    println!("🗑️  Deleted {}", name);
                }
            } else {
                settings.hide_delete_theme_modal();
                println!("Cancelled");
            }
        }
        ThemeCommand::Download { name } => {
            settings.download_theme(&lookup(&name))?;
            if let Some(channel) = host.channel() {
                for result in channel.finish().await {
                    let path = result?;
                    println!("📁 Saved to {}", path.display());
                }
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use sharelist::api::OcsClient;
use sharelist::config::{get_config_path, Config};
use sharelist::logging::init_logging;
use sharelist::logic::accounts::filter_by_accounts;
use sharelist::logic::errors::{classify_error, format_error_message};
use sharelist::logic::formatting::{format_listing_header, format_node_row};
use sharelist::logic::sorting::sort_nodes;
use sharelist::logic::views::ShareView;
use sharelist::model::Contents;
use sharelist::services::{get_view_contents, ShareAction};
use sharelist::{DisplayMode, SortMode};

/// List and manage Nextcloud shares
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to the temp dir (sharelist-debug.log)
    #[arg(short, long)]
    debug: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the shares of one view
    List {
        /// View id, see `views`
        #[arg(default_value = "shareoverview")]
        view: ShareView,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,

        /// Sort order (default: from config)
        #[arg(short, long, value_enum)]
        sort: Option<SortMode>,

        #[arg(short, long)]
        reverse: bool,

        /// Extra columns
        #[arg(long, value_enum, default_value = "off")]
        details: DisplayMode,

        /// Only shares owned by or shared with this user id (repeatable)
        #[arg(long = "account", value_name = "UID")]
        accounts: Vec<String>,
    },
    /// Show the available views
    Views,
    /// Accept pending shares
    Accept {
        #[arg(required = true)]
        share_ids: Vec<String>,
    },
    /// Reject pending shares
    Reject {
        #[arg(required = true)]
        share_ids: Vec<String>,
    },
    /// Restore deleted shares
    Restore {
        #[arg(required = true)]
        share_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = run(args).await {
        eprintln!("Error: {}", format_error_message(&error));
        if let Some(hint) = classify_error(&error).hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::Views = args.command {
        for view in ShareView::ALL {
            println!("{:<15} {}", view.id(), view.name());
        }
        return Ok(());
    }

    let config_path = get_config_path(args.config)?;
    let config = Config::load(&config_path)?;

    let _log_guard = init_logging(args.debug || config.debug);
    tracing::debug!(config = %config_path.display(), "config loaded");

    let client = OcsClient::new(
        config.base_url.clone(),
        config.username.clone(),
        config.app_password.clone(),
    );
    tracing::debug!(
        base_url = client.base_url(),
        user = client.username(),
        "client ready"
    );

    match args.command {
        Command::Views => Ok(()),
        Command::List {
            view,
            json,
            sort,
            reverse,
            details,
            accounts,
        } => {
            let mut contents = load_view(&client, &config, view).await?;
            contents.nodes = filter_by_accounts(contents.nodes, &accounts);
            let sort = sort.unwrap_or(config.sort);
            sort_nodes(&mut contents.nodes, sort, reverse);

            if json {
                let out = serde_json::to_string_pretty(&contents)
                    .context("Failed to serialize listing")?;
                println!("{}", out);
            } else {
                println!(
                    "{}",
                    format_listing_header(view.name(), contents.nodes.len(), sort)
                );
                for node in &contents.nodes {
                    println!("{}", format_node_row(node, details));
                }
                if !contents.skipped.is_empty() {
                    eprintln!("{} share record(s) skipped", contents.skipped.len());
                }
            }
            Ok(())
        }
        Command::Accept { share_ids } => {
            run_action(&client, &config, ShareAction::Accept, ShareView::PendingShares, &share_ids)
                .await
        }
        Command::Reject { share_ids } => {
            run_action(&client, &config, ShareAction::Reject, ShareView::PendingShares, &share_ids)
                .await
        }
        Command::Restore { share_ids } => {
            run_action(&client, &config, ShareAction::Restore, ShareView::DeletedShares, &share_ids)
                .await
        }
    }
}

async fn load_view(client: &OcsClient, config: &Config, view: ShareView) -> Result<Contents> {
    let contents = get_view_contents(client, &config.context(), view)
        .await
        .with_context(|| format!("Failed to load {}", view.name()))?;

    match config.max_skipped_records {
        Some(limit) => contents.ensure_skipped_within(limit),
        None => Ok(contents),
    }
}

/// Look the shares up in `view` and run `action` on them
async fn run_action(
    client: &OcsClient,
    config: &Config,
    action: ShareAction,
    view: ShareView,
    share_ids: &[String],
) -> Result<()> {
    let contents = load_view(client, config, view).await?;

    let mut nodes = Vec::new();
    for id in share_ids {
        let node = contents
            .nodes
            .iter()
            .find(|node| &node.attributes.share_id == id)
            .with_context(|| format!("No share {} in {}", id, view.name()))?;
        nodes.push(node.clone());
    }

    if !action.enabled(&nodes, view) {
        anyhow::bail!("{} is not available for the selected shares", action.id());
    }

    let results = action.exec_batch(client, &nodes).await;
    let failed: Vec<&str> = nodes
        .iter()
        .zip(&results)
        .filter(|(_, ok)| !**ok)
        .map(|(node, _)| node.attributes.share_id.as_str())
        .collect();

    if !failed.is_empty() {
        anyhow::bail!("{} failed for share(s) {}", action.id(), failed.join(", "));
    }

    for node in &nodes {
        println!("{}: {}", action.id(), node.path().trim_start_matches('/'));
    }
    Ok(())
}

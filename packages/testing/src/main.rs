use std::time::Duration;

use clap::{Parser, Subcommand};
use optiblog_client::{GitHubStatsHook, ResourceHook, SiteClient};
use optiblog_stats_models::Resource;

#[derive(Parser)]
#[command(name = "site-probe")]
#[command(about = "Exercise a running OptiBlog site API through its client hooks", long_about = None)]
struct Cli {
    #[arg(short, long, env = "SITE_URL", default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Load the aggregate stats hook and print its snapshot")]
    Stats,
    #[command(about = "Fetch one resource and print its envelope")]
    Fetch {
        /// One of: stats, contributors, issues, activity, discussions, events
        resource: String,
    },
    #[command(about = "Load the discussions and events hooks")]
    Community,
    #[command(about = "Check /health")]
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let client = SiteClient::with_timeout(&cli.url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Command::Stats => {
            let snapshot = GitHubStatsHook::mount(client, true).await.snapshot().await;

            if let Some(error) = &snapshot.error {
                anyhow::bail!("{error}");
            }

            match snapshot.data {
                Some(data) => {
                    println!(
                        "★ {} stars, {} forks, {} watchers",
                        data.repository.stars, data.repository.forks, data.repository.watchers
                    );
                    println!("{} contributors", data.contributors.len());
                    if let Some(issues) = data.issues {
                        println!(
                            "{} issues ({} open, {} closed)",
                            issues.total, issues.open, issues.closed
                        );
                    }
                    if let Some(activity) = data.activity {
                        println!(
                            "{} commits this week, {} this month",
                            activity.weekly_commits, activity.monthly_commits
                        );
                    }
                    println!("Fetched at {}", data.last_fetched);
                }
                None => println!("Repository stats unavailable"),
            }
        }
        Command::Fetch { resource } => {
            let resource = parse_resource(&resource)?;
            let envelope = client.fetch::<serde_json::Value>(resource).await?;
            println!("{}", serde_json::to_string_pretty(&envelope.data)?);
            if let Some(source) = envelope.source {
                println!("\nsource: {source}");
            }
        }
        Command::Community => {
            let discussions = ResourceHook::discussions(client.clone())
                .mounted()
                .await
                .snapshot()
                .await;
            let events = ResourceHook::events(client).mounted().await.snapshot().await;

            println!("Discussions:");
            for discussion in &discussions.data {
                println!(
                    "  {} {} ({} comments)",
                    discussion.category.emoji, discussion.title, discussion.comments
                );
            }
            println!("Events:");
            for event in &events.data {
                println!("  [{}] {} on {} at {}", event.kind, event.title, event.date, event.time);
            }

            if let Some(error) = discussions.error.or(events.error) {
                anyhow::bail!("{error}");
            }
        }
        Command::Health => {
            if !client.is_healthy().await {
                anyhow::bail!("{} is not healthy", cli.url);
            }
            println!("✓ {} is healthy", cli.url);
        }
    }

    Ok(())
}

fn parse_resource(resource: &str) -> anyhow::Result<Resource> {
    match resource.to_lowercase().as_str() {
        "stats" => Ok(Resource::Stats),
        "contributors" => Ok(Resource::Contributors),
        "issues" => Ok(Resource::Issues),
        "activity" => Ok(Resource::Activity),
        "discussions" => Ok(Resource::Discussions),
        "events" => Ok(Resource::Events),
        _ => anyhow::bail!(
            "Invalid resource: {resource}. Must be one of: stats, contributors, issues, activity, discussions, events"
        ),
    }
}

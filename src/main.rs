use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use pixelwall::commands;
use pixelwall::AppController;

const USAGE: &str = "usage: pixelwall <command>

commands:
  theme <light|dark|system>   change the theme mode
  settings                    print the current preferences
  quality <low|medium|high|original>
                              change the wallpaper quality
  favorites                   list favorited photo ids
  feed [page]                 fetch a page of the home feed
  search <query>              search wallpapers
  collections [page]          list browsable collections";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let controller = AppController::boot(None)
        .await
        .context("Failed to initialize application")?;

    let result = run(&controller, command, &args[1..]).await;

    // Queued writes must land before the process exits
    controller.flush().await;
    info!("PixelWall shutting down");
    result
}

async fn run(controller: &AppController, command: &str, rest: &[String]) -> Result<()> {
    match command {
        "theme" => {
            let mode = rest.first().ok_or_else(|| anyhow!("theme needs a mode"))?;
            let change = commands::set_theme_mode(controller, mode).map_err(|e| anyhow!(e))?;

            while controller.theme().is_animating() {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            println!(
                "theme mode: {} ({:?}), active theme: {}",
                mode,
                change.outcome,
                controller.theme().active_theme().name
            );
        }
        "settings" => {
            let envelope = controller.settings().envelope();
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        "quality" => {
            let quality = rest.first().ok_or_else(|| anyhow!("quality needs a value"))?;
            let record =
                commands::set_wallpaper_quality(controller, quality).map_err(|e| anyhow!(e))?;
            println!("wallpaper quality: {}", record.wallpaper_quality.label());
        }
        "favorites" => {
            let favorites = controller.favorites().list();
            if favorites.is_empty() {
                println!("no favorites yet");
            }
            for photo in favorites {
                let id = photo.id().map(|id| id.to_string()).unwrap_or_default();
                match photo.author() {
                    Some(author) => println!("{}  by {}", id, author),
                    None => println!("{}", id),
                }
            }
        }
        "feed" => {
            let page = page_arg(rest)?;
            let items = commands::fetch_feed(controller, page)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("feed: {}", controller.feed_query().query());
            print_feed(items);
        }
        "search" => {
            let query = rest.join(" ");
            if query.trim().is_empty() {
                bail!("search needs a query");
            }
            let items = commands::search_feed(controller, &query)
                .await
                .map_err(|e| anyhow!(e))?;
            print_feed(items);
        }
        "collections" => {
            let page = page_arg(rest)?;
            let collections = commands::list_collections(controller, page)
                .await
                .map_err(|e| anyhow!(e))?;
            for collection in collections {
                println!(
                    "{}  {} ({} photos)",
                    collection.id, collection.title, collection.total_photos
                );
            }
        }
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    }
    Ok(())
}

fn page_arg(rest: &[String]) -> Result<u32> {
    match rest.first() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("invalid page number: {}", raw)),
        None => Ok(1),
    }
}

fn print_feed(items: Vec<commands::FeedItem>) {
    for item in items {
        let marker = if item.is_favorite { "*" } else { " " };
        println!(
            "{} {}  {}",
            marker,
            item.id.unwrap_or_default(),
            item.grid_url.unwrap_or_default()
        );
    }
}

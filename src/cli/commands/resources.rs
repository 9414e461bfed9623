use clap::Subcommand;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::types::{ResourceId, ResourceKind, SortField, SortOrder};
use crate::views::{ResourceDetailView, ResourceListView, ViewState};

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "List resources of one kind")]
    List {
        #[arg(long = "type", default_value = "video", help = "Resource type: image or video")]
        kind: ResourceKind,
        #[arg(long, help = "Page number (server default when omitted)")]
        page: Option<u32>,
        #[arg(long, help = "Page size (server default when omitted)")]
        limit: Option<u32>,
        #[arg(long, help = "Search term")]
        search: Option<String>,
        #[arg(long, help = "Sort field: created_at, updated_at or title")]
        sort: Option<SortField>,
        #[arg(long, help = "Sort order: asc or desc")]
        order: Option<SortOrder>,
    },

    #[command(about = "Show one resource with its media")]
    Show {
        #[arg(help = "Resource ID")]
        id: ResourceId,
    },
}

pub async fn handle(cmd: ResourceCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ResourceCommands::List {
            kind,
            page,
            limit,
            search,
            sort,
            order,
        } => {
            let mut view = ResourceListView::new(ctx.resource_api())
                .with_kind(kind)
                .with_page(page)
                .with_limit(limit)
                .with_search(search)
                .with_sort(sort, order);
            view.load().await;

            if let ViewState::Error(message) = &view.state {
                output_error(&output_format, message, Some("LOAD_FAILED"))?;
                return Err(anyhow::anyhow!(message.clone()));
            }

            let cards = view.cards();
            if cards.is_empty() {
                return output_empty_collection(&output_format, "resources", &format!("No {} resources", kind));
            }

            match output_format {
                OutputFormat::Json => output_json("resources", &cards),
                OutputFormat::Text => {
                    println!("{:<8} {:<32} {:<7} {:<24} {}", "ID", "TITLE", "IMAGES", "TAGS", "DESCRIPTION");
                    println!("{}", "-".repeat(100));
                    for card in cards {
                        println!(
                            "{:<8} {:<32} {:<7} {:<24} {}",
                            card.id,
                            truncate(&card.alt, 32),
                            card.image_count,
                            truncate(&card.tags.join(","), 24),
                            truncate(&card.description, 40),
                        );
                    }
                    Ok(())
                }
            }
        }
        ResourceCommands::Show { id } => {
            let mut view = ResourceDetailView::new(ctx.resource_api(), id);
            view.load().await;

            let resource = match &view.state {
                ViewState::Loaded(resource) => resource,
                ViewState::Error(message) => {
                    output_error(&output_format, message, Some("LOAD_FAILED"))?;
                    return Err(anyhow::anyhow!(message.clone()));
                }
                ViewState::Idle | ViewState::Loading => return Ok(()),
            };

            match output_format {
                OutputFormat::Json => output_json(
                    "resource",
                    &serde_json::json!({
                        "resource": resource,
                        "media": view.media_items(),
                    }),
                ),
                OutputFormat::Text => {
                    println!("{} (#{})", resource.title, resource.id);
                    if !resource.title_en.is_empty() && resource.title_en != resource.title {
                        println!("  {}", resource.title_en);
                    }
                    if !resource.description.is_empty() {
                        println!("\n{}\n", resource.description);
                    }
                    if let Some(author) = &resource.author {
                        println!("{:<10} {}", "AUTHOR", author);
                    }
                    if !resource.source.is_empty() {
                        println!("{:<10} {}", "SOURCE", resource.source);
                    }
                    if !resource.tags.is_empty() {
                        println!("{:<10} {}", "TAGS", resource.tags.join(", "));
                    }
                    println!("{:<10} {}", "CREATED", resource.created_at.format("%Y-%m-%d %H:%M"));

                    let media = view.media_items();
                    if !media.is_empty() {
                        println!("\nMEDIA");
                        for item in media {
                            println!("  {:<10} {}x{:<6} {}", item.id, item.width, item.height, item.src);
                        }
                    }
                    for (provider, urls) in resource.links.iter() {
                        for url in urls {
                            println!("{:<10} {}", provider, url);
                        }
                    }
                    Ok(())
                }
            }
        }
    }
}

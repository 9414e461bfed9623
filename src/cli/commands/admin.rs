use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::types::ResourceId;
use crate::views::{AdminView, ResourceEditView, ViewState};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "List the first 100 resources")]
    List,

    #[command(about = "Delete a resource")]
    Delete {
        #[arg(help = "Resource ID")]
        id: ResourceId,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Edit resource fields")]
    Edit {
        #[arg(help = "Resource ID")]
        id: ResourceId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        title_en: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long = "tag", help = "Replace tags, may be repeated")]
        tags: Vec<String>,
        #[arg(long)]
        poster: Option<String>,
        #[arg(long, help = "Set approval")]
        approved: Option<bool>,
    },
}

/// Guarded page open; anonymous callers get pointed at the login route.
fn open_admin(ctx: &AppContext) -> anyhow::Result<AdminView> {
    AdminView::open(ctx.auth.as_ref(), ctx.resource_api()).map_err(|route| {
        anyhow::anyhow!("Not logged in. Use 'mediahub auth login <username> --redirect {}' first", route_target(&route))
    })
}

fn route_target(route: &crate::views::Route) -> String {
    match route {
        crate::views::Route::Login { redirect: Some(target) } => target.clone(),
        other => other.to_string(),
    }
}

pub async fn handle(cmd: AdminCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::List => {
            let mut view = open_admin(ctx)?;
            view.load().await;

            if let Some(message) = view.error {
                output_error(&output_format, &message, Some("LOAD_FAILED"))?;
                return Err(anyhow::anyhow!(message));
            }
            if view.resources.is_empty() {
                return output_empty_collection(&output_format, "resources", "No resources");
            }

            match output_format {
                OutputFormat::Json => output_json("resources", &view.resources),
                OutputFormat::Text => {
                    println!("{:<8} {:<32} {:<6} {:<9} {:<24} {}", "ID", "TITLE", "TYPE", "APPROVED", "AUTHOR", "CREATED");
                    println!("{}", "-".repeat(100));
                    for resource in &view.resources {
                        println!(
                            "{:<8} {:<32} {:<6} {:<9} {:<24} {}",
                            resource.id,
                            truncate(&resource.title, 32),
                            resource.resource_type,
                            resource.is_approved,
                            truncate(resource.author.as_deref().unwrap_or("-"), 24),
                            resource.created_at.format("%Y-%m-%d %H:%M"),
                        );
                    }
                    Ok(())
                }
            }
        }
        AdminCommands::Delete { id, yes } => {
            let mut view = open_admin(ctx)?;
            view.request_delete(id);

            if !yes && !confirm(&format!("Delete resource {}?", id))? {
                view.cancel_delete();
                return output_success(&output_format, "Delete cancelled", None);
            }

            if view.confirm_delete().await {
                output_success(
                    &output_format,
                    &format!("Resource {} deleted", id),
                    Some(json!({ "id": id })),
                )
            } else {
                let message = view.error.unwrap_or_default();
                output_error(&output_format, &message, Some("DELETE_FAILED"))?;
                Err(anyhow::anyhow!(message))
            }
        }
        AdminCommands::Edit {
            id,
            title,
            title_en,
            description,
            author,
            source,
            tags,
            poster,
            approved,
        } => {
            open_admin(ctx)?;
            let mut view = ResourceEditView::new(ctx.resource_api(), id);
            view.load().await;
            if let ViewState::Error(message) = &view.state {
                output_error(&output_format, message, Some("LOAD_FAILED"))?;
                return Err(anyhow::anyhow!(message.clone()));
            }

            let form = &mut view.form;
            if let Some(value) = title {
                form.title = value;
            }
            if let Some(value) = title_en {
                form.title_en = value;
            }
            if let Some(value) = description {
                form.description = value;
            }
            if let Some(value) = author {
                form.author = value;
            }
            if let Some(value) = source {
                form.source = value;
            }
            if !tags.is_empty() {
                form.tags = tags;
            }
            if let Some(value) = poster {
                form.poster_image = value;
            }
            if let Some(value) = approved {
                form.is_approved = value;
            }

            if view.save().await {
                output_success(
                    &output_format,
                    &format!("Resource {} updated", id),
                    view.state.data().map(|resource| json!({ "resource": resource })),
                )
            } else {
                let message = view.error.unwrap_or_default();
                output_error(&output_format, &message, Some("SAVE_FAILED"))?;
                Err(anyhow::anyhow!(message))
            }
        }
    }
}

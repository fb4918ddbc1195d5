use console::style;

use crate::api::{ScanBackend, UpdateEmailRequest};
use crate::cli::commands::{EmailsArgs, EmailsCommand};
use crate::cli::context::AppContext;
use crate::errors::AccessiscanError;
use crate::form::validation::check_email;
use crate::form::{Field, FieldError};
use crate::notify::Notifier;
use crate::utils::formatting::{format_timestamp, non_empty_or};

pub async fn handle_emails(args: EmailsArgs, ctx: &AppContext) -> Result<(), AccessiscanError> {
    let client = ctx.client.as_ref();
    match args.command {
        EmailsCommand::Add { email, name } => {
            ensure_usable(&email)?;
            match client.store_email(&email, name.as_deref()).await {
                Ok(stored) => ctx.notifier.success(&format!("Subscribed {} ({})", email, stored.id)),
                Err(AccessiscanError::EmailAlreadyExists) => {
                    ctx.notifier.warning(&format!("{} is already subscribed", email))
                }
                Err(e) => return Err(e),
            }
        }
        EmailsCommand::List { all, json } => {
            let emails = client.list_emails(!all).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&emails)?);
            } else if emails.is_empty() {
                println!("  {}", style("No subscribed addresses").dim());
            } else {
                for record in &emails {
                    let marker = if record.active { style("●").green() } else { style("○").dim() };
                    println!(
                        "  {} {:<12} {:<32} {:<20} {}",
                        marker,
                        record.id,
                        record.email,
                        record.name,
                        record.created_at.as_deref().map(format_timestamp).unwrap_or_default(),
                    );
                }
            }
        }
        EmailsCommand::Update { id, email, name } => {
            if let Some(email) = &email {
                ensure_usable(email)?;
            }
            let update = UpdateEmailRequest { email, name };
            if update.is_empty() {
                return Err(AccessiscanError::Config("Nothing to update: pass --email or --name".into()));
            }
            let reply = client.update_email(&id, &update).await?;
            ctx.notifier.success(non_empty_or(&reply.message, "Email updated"));
        }
        EmailsCommand::Delete { id } => {
            let reply = client.delete_email(&id).await?;
            ctx.notifier.success(non_empty_or(&reply.message, "Email deactivated"));
        }
    }
    Ok(())
}

fn ensure_usable(email: &str) -> Result<(), AccessiscanError> {
    match check_email(email) {
        None => Ok(()),
        Some(kind) => Err(AccessiscanError::Config(format!(
            "'{}' cannot be subscribed: {}",
            email,
            FieldError::new(Field::NotificationEmail, kind).message()
        ))),
    }
}

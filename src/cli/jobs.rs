use console::style;
use tracing::info;

use crate::api::{Job, ScanBackend};
use crate::cli::commands::{JobsArgs, JobsCommand};
use crate::cli::context::AppContext;
use crate::errors::AccessiscanError;
use crate::notify::Notifier;
use crate::utils::formatting::{format_timestamp, non_empty_or, truncate};

pub async fn handle_jobs(args: JobsArgs, ctx: &AppContext) -> Result<(), AccessiscanError> {
    let backend = ctx.client.as_ref();
    match args.command {
        JobsCommand::List { json } => {
            let jobs = backend.list_jobs().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                print_jobs(&jobs);
            }
        }
        JobsCommand::Show { id, json } => {
            let job = backend.find_job(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                print_job(&job);
            }
        }
        JobsCommand::Delete { id } => {
            let reply = backend.delete_job(&id).await?;
            info!(job_id = %id, "Job deleted");
            ctx.notifier.success(non_empty_or(&reply.message, "Scan request deleted successfully"));
        }
        JobsCommand::Run { id } => {
            let accepted = backend.trigger_job(&id).await?;
            ctx.notifier.success(&format!(
                "Scan triggered successfully! Job ID: {}",
                accepted.job_id
            ));
        }
    }
    Ok(())
}

pub fn print_jobs(jobs: &[Job]) {
    if jobs.is_empty() {
        println!("  {}", style("No scheduled scans").dim());
        return;
    }

    println!(
        "  {:<12} {:<32} {:<26} {:<22} {}",
        style("ID").bold(),
        style("URL").bold(),
        style("EMAIL").bold(),
        style("SCHEDULE").bold(),
        style("NEXT RUN").bold(),
    );
    for job in jobs {
        println!(
            "  {:<12} {:<32} {:<26} {:<22} {}",
            truncate(&job.id, 12),
            truncate(&job.url, 32),
            truncate(&job.email, 26),
            truncate(&job.schedule_summary(), 22),
            next_run(job),
        );
    }
    println!("  {}", style(format!("{} scheduled scan(s)", jobs.len())).dim());
}

fn print_job(job: &Job) {
    println!("  {:<10} {}", style("ID").bold(), job.id);
    println!("  {:<10} {}", style("URL").bold(), job.url);
    println!("  {:<10} {}", style("Email").bold(), job.email);
    println!("  {:<10} {}", style("Schedule").bold(), job.schedule_summary());
    println!("  {:<10} {}", style("Next run").bold(), next_run(job));
    if let Some(created) = &job.created_at {
        println!("  {:<10} {}", style("Created").bold(), format_timestamp(created));
    }
}

fn next_run(job: &Job) -> String {
    job.next_run_time
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string())
}

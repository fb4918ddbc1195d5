use console::style;
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use std::time::Instant;

use crate::api::client::user_agent;
use crate::api::ScanBackend;
use crate::cli::commands::DoctorArgs;
use crate::cli::context::AppContext;
use crate::errors::AccessiscanError;
use crate::utils::formatting::format_duration;

#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub outcome: Result<Value, String>,
    pub elapsed_ms: u64,
}

pub type Check<'a> = (&'static str, BoxFuture<'a, Result<Value, AccessiscanError>>);

/// Run each check in turn; one failing does not stop the rest.
pub async fn run_checks(checks: Vec<Check<'_>>) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(checks.len());
    for (name, check) in checks {
        let started = Instant::now();
        let outcome = check.await.map_err(|e| e.to_string());
        results.push(CheckResult {
            name,
            outcome,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
    }
    results
}

fn check<'a, F>(name: &'static str, future: F) -> Check<'a>
where
    F: Future<Output = Result<Value, AccessiscanError>> + Send + 'a,
{
    (name, Box::pin(future))
}

/// The troubleshooting checks. The test scan is only included when asked
/// for, since it queues a real scan.
pub fn backend_checks<'a>(
    backend: &'a dyn ScanBackend,
    scan: Option<(&'a str, &'a str)>,
) -> Vec<Check<'a>> {
    let mut checks = vec![
        check("Health check", async move {
            let status = backend.health().await?;
            Ok::<_, AccessiscanError>(serde_json::to_value(status)?)
        }),
        check("List jobs", async move {
            let jobs = backend.list_jobs().await?;
            Ok::<_, AccessiscanError>(serde_json::json!({ "jobs": jobs.len() }))
        }),
    ];
    if let Some((email, url)) = scan {
        checks.push(check("Run immediate scan", async move {
            let accepted = backend.run_once(email, url).await?;
            Ok::<_, AccessiscanError>(serde_json::to_value(accepted)?)
        }));
    }
    checks
}

fn build_info() -> String {
    let mut info = user_agent();
    if let Some(built) = option_env!("BUILD_TIMESTAMP") {
        info.push_str(&format!(", built {}", built));
    }
    info
}

pub async fn handle_doctor(args: DoctorArgs, ctx: &AppContext) -> Result<(), AccessiscanError> {
    println!("  Client: {}", build_info());
    println!("  API:    {}", style(ctx.client.endpoint()).bold());

    let scan = args
        .with_scan
        .then_some((args.scan_email.as_str(), args.scan_url.as_str()));
    let results = run_checks(backend_checks(ctx.client.as_ref(), scan)).await;

    let mut failed = 0;
    for result in &results {
        let elapsed = style(format_duration(result.elapsed_ms)).dim();
        match &result.outcome {
            Ok(value) => println!("  {} {} ({}): {}", style("✓").green(), result.name, elapsed, value),
            Err(error) => {
                failed += 1;
                println!("  {} {} ({}): {}", style("✗").red(), result.name, elapsed, style(error).red());
            }
        }
    }

    if failed > 0 {
        return Err(AccessiscanError::Reported {
            message: format!("{} of {} checks failed", failed, results.len()),
            exit_code: AccessiscanError::Network(String::new()).classify().exit_code,
        });
    }
    Ok(())
}

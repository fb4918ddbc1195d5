use console::style;
use std::time::Duration;

use crate::api::ScanBackend;
use crate::cli::commands::HealthArgs;
use crate::cli::context::{cancel_on_ctrl_c, AppContext};
use crate::errors::AccessiscanError;
use crate::health::{HealthPoller, PollOutcome};
use crate::notify::Notifier;

pub async fn handle_health(args: HealthArgs, ctx: &AppContext) -> Result<(), AccessiscanError> {
    if !args.wait {
        let status = ctx.client.health().await?;
        println!(
            "  {} {} is {}",
            style("●").green(),
            ctx.client.endpoint(),
            style(&status.status).bold()
        );
        return Ok(());
    }

    let interval = args
        .interval
        .map(Duration::from_secs)
        .unwrap_or(ctx.settings.poll_interval);
    let max_attempts = args.attempts.unwrap_or(ctx.settings.max_attempts);
    if interval.is_zero() || max_attempts == 0 {
        return Err(AccessiscanError::Config(
            "--interval and --attempts must be at least 1".into(),
        ));
    }

    let poller = HealthPoller::new(interval, max_attempts);
    let cancel = cancel_on_ctrl_c();
    match poller
        .wait_until_healthy(ctx.client.as_ref(), ctx.notifier.as_ref(), &cancel)
        .await
    {
        PollOutcome::Healthy { attempts } => {
            if attempts == 1 {
                ctx.notifier.success(&format!("{} is healthy", ctx.client.endpoint()));
            }
            Ok(())
        }
        PollOutcome::GaveUp { attempts } => Err(AccessiscanError::Reported {
            message: format!("Backend did not answer after {} attempts", attempts),
            exit_code: AccessiscanError::HealthTimeout { attempts }.classify().exit_code,
        }),
        PollOutcome::Cancelled { .. } => Err(AccessiscanError::Cancelled),
    }
}

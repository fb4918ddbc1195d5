use console::style;
use tracing::{info, warn};

use crate::cli::commands::ScanArgs;
use crate::cli::context::{cancel_on_ctrl_c, AppContext};
use crate::cli::jobs::print_jobs;
use crate::api::ScanBackend;
use crate::errors::AccessiscanError;
use crate::form::{opt_in, ScanRequestForm, ScanSubmitter, Schedule, SubmitOutcome, ValidationErrors};
use crate::progress::{spawn_estimator, ScanProgress, ESTIMATED_STAGES};

pub async fn handle_scan(args: ScanArgs, ctx: &AppContext) -> Result<(), AccessiscanError> {
    let defaults = ScanRequestForm::with_timezone(&ctx.settings.timezone);
    let submitter = ScanSubmitter::with_defaults(ctx.client.clone(), ctx.notifier.clone(), defaults);
    submitter.edit(|form| fill_form(form, &args, ctx.settings.default_email.as_deref()));
    let email = submitter.form().notification_email;

    match submitter.submit().await {
        SubmitOutcome::Submitted { job_id, message, schedule, .. } => {
            if !message.is_empty() && !ctx.quiet {
                println!("  {}", style(&message).dim());
            }
            info!(job_id = %job_id, schedule = %schedule, "Scan request submitted");

            if args.subscribe {
                opt_in(ctx.client.as_ref(), ctx.notifier.as_ref(), email.trim(), args.name.as_deref()).await;
            }

            if args.progress && matches!(schedule, Schedule::Immediate) {
                let events = spawn_estimator(job_id.clone(), ESTIMATED_STAGES, cancel_on_ctrl_c());
                ScanProgress::new().follow(events).await;
            }

            // Successful requests land on the job list. The scan is already
            // queued, so a failed listing must not fail the command.
            if !args.no_list && !ctx.quiet {
                match ctx.client.list_jobs().await {
                    Ok(jobs) => print_jobs(&jobs),
                    Err(e) => warn!(job_id = %job_id, error = %e, "Could not list scheduled scans"),
                }
            }
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            print_field_errors(&errors);
            let message = errors.to_string();
            Err(AccessiscanError::Reported {
                message,
                exit_code: AccessiscanError::Validation(errors).classify().exit_code,
            })
        }
        SubmitOutcome::Failed { message, classification } => Err(AccessiscanError::Reported {
            message,
            exit_code: classification.exit_code,
        }),
        SubmitOutcome::Busy => Err(AccessiscanError::Busy),
    }
}

/// Copy command-line values over the form defaults. Values that were not
/// given keep their default.
pub fn fill_form(form: &mut ScanRequestForm, args: &ScanArgs, default_email: Option<&str>) {
    if let Some(url) = &args.url {
        form.website_url = url.clone();
    }
    match (&args.email, default_email) {
        (Some(email), _) => form.notification_email = email.clone(),
        (None, Some(email)) => form.notification_email = email.to_string(),
        (None, None) => {}
    }
    form.schedule_type = args.schedule.as_str().to_string();

    let overrides = [
        (&args.timezone, &mut form.timezone),
        (&args.minute, &mut form.minute),
        (&args.hour, &mut form.hour),
        (&args.day_of_week, &mut form.day_of_week),
        (&args.every, &mut form.interval_value),
        (&args.at, &mut form.scheduled_date_time),
    ];
    for (value, field) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
    if let Some(unit) = args.unit {
        form.interval_unit = unit.as_str().to_string();
    }
}

fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!(
            "  {} {}: {}",
            style("✗").red().bold(),
            style(error.field.label()).bold(),
            error.message()
        );
    }
}

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

use super::fields::{Field, IntervalUnit, ScanRequestForm, ScheduleType};
use super::schedule::{CronFields, Schedule};

/// Domains that are syntactically fine but never receive real mail.
pub const DISALLOWED_EMAIL_DOMAINS: &[&str] = &["example.com", "test.com", "localhost"];

/// Accepted layouts for `scheduled_date_time`, as produced by a
/// `datetime-local` input with and without seconds.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

// Local part per the HTML email input rules; dotless domains such as
// `localhost` are allowed here and rejected by the denylist instead.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    MissingField,
    InvalidUrl,
    InvalidEmail,
    DisallowedDomain,
    InvalidScheduleType,
    InvalidInterval,
    InvalidDateTime,
    PastDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    pub fn message(&self) -> String {
        match self.kind {
            FieldErrorKind::MissingField => format!("{} is required", self.field.label()),
            FieldErrorKind::InvalidUrl => "Please enter a valid URL".to_string(),
            FieldErrorKind::InvalidEmail => "Please enter a valid email address".to_string(),
            FieldErrorKind::DisallowedDomain => {
                "Please use a valid email domain (e.g., gmail.com, company.com)".to_string()
            }
            FieldErrorKind::InvalidScheduleType => {
                "Schedule type must be one of immediate, cron, interval, date".to_string()
            }
            FieldErrorKind::InvalidInterval => match self.field {
                Field::IntervalUnit => "Interval unit must be minutes, hours or days".to_string(),
                _ => "Must be a whole number of at least 1".to_string(),
            },
            FieldErrorKind::InvalidDateTime => {
                "Scheduled time must look like 2030-01-31T09:00".to_string()
            }
            FieldErrorKind::PastDateTime => "Scheduled time must be in the future".to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message())
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// First error reported for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn has(&self, field: Field, kind: FieldErrorKind) -> bool {
        self.0.iter().any(|e| e.field == field && e.kind == kind)
    }

    fn push(&mut self, field: Field, kind: FieldErrorKind) {
        self.0.push(FieldError::new(field, kind));
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "Invalid scan request: {}", parts.join("; "))
    }
}

/// A scan request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub email: String,
    pub url: String,
    pub schedule: Schedule,
}

impl ScanRequestForm {
    /// Validate every input relevant to the selected schedule type against
    /// `now`, collecting all failures rather than stopping at the first.
    pub fn validate(&self, now: NaiveDateTime) -> Result<ScanRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let url = required(&mut errors, Field::WebsiteUrl, &self.website_url);
        if let Some(url) = url {
            if !is_absolute_web_url(url) {
                errors.push(Field::WebsiteUrl, FieldErrorKind::InvalidUrl);
            }
        }

        let email = required(&mut errors, Field::NotificationEmail, &self.notification_email);
        if let Some(email) = email {
            if let Some(kind) = check_email(email) {
                errors.push(Field::NotificationEmail, kind);
            }
        }

        let schedule = match required(&mut errors, Field::ScheduleType, &self.schedule_type) {
            Some(raw) => match raw.parse::<ScheduleType>() {
                Ok(schedule_type) => self.validate_schedule(schedule_type, now, &mut errors),
                Err(()) => {
                    errors.push(Field::ScheduleType, FieldErrorKind::InvalidScheduleType);
                    None
                }
            },
            None => None,
        };

        match (url, email, schedule) {
            (Some(url), Some(email), Some(schedule)) if errors.is_empty() => Ok(ScanRequest {
                email: email.to_string(),
                url: url.to_string(),
                schedule,
            }),
            _ => Err(errors),
        }
    }

    fn validate_schedule(
        &self,
        schedule_type: ScheduleType,
        now: NaiveDateTime,
        errors: &mut ValidationErrors,
    ) -> Option<Schedule> {
        if schedule_type == ScheduleType::Immediate {
            return Some(Schedule::Immediate);
        }

        let timezone = required(errors, Field::Timezone, &self.timezone);

        match schedule_type {
            ScheduleType::Immediate => Some(Schedule::Immediate),
            ScheduleType::Cron => {
                let minute = required(errors, Field::Minute, &self.minute);
                let hour = required(errors, Field::Hour, &self.hour);
                let day_of_week = required(errors, Field::DayOfWeek, &self.day_of_week);
                Some(Schedule::Cron {
                    timezone: timezone?.to_string(),
                    cron: CronFields {
                        minute: minute?.to_string(),
                        hour: hour?.to_string(),
                        day_of_week: day_of_week?.to_string(),
                    },
                })
            }
            ScheduleType::Interval => {
                let every = required(errors, Field::IntervalValue, &self.interval_value)
                    .and_then(|raw| match raw.parse::<u32>() {
                        Ok(n) if n >= 1 => Some(n),
                        _ => {
                            errors.push(Field::IntervalValue, FieldErrorKind::InvalidInterval);
                            None
                        }
                    });
                let unit = required(errors, Field::IntervalUnit, &self.interval_unit)
                    .and_then(|raw| match raw.parse::<IntervalUnit>() {
                        Ok(unit) => Some(unit),
                        Err(()) => {
                            errors.push(Field::IntervalUnit, FieldErrorKind::InvalidInterval);
                            None
                        }
                    });
                Some(Schedule::Interval {
                    timezone: timezone?.to_string(),
                    every: every?,
                    unit: unit?,
                })
            }
            ScheduleType::Date => {
                let run_at = required(errors, Field::ScheduledDateTime, &self.scheduled_date_time)
                    .and_then(|raw| match parse_local_date_time(raw) {
                        Some(run_at) if run_at > now => Some(run_at),
                        Some(_) => {
                            errors.push(Field::ScheduledDateTime, FieldErrorKind::PastDateTime);
                            None
                        }
                        None => {
                            errors.push(Field::ScheduledDateTime, FieldErrorKind::InvalidDateTime);
                            None
                        }
                    });
                Some(Schedule::Date {
                    timezone: timezone?.to_string(),
                    run_at: run_at?,
                })
            }
        }
    }
}

fn required<'a>(errors: &mut ValidationErrors, field: Field, value: &'a str) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, FieldErrorKind::MissingField);
        None
    } else {
        Some(trimmed)
    }
}

/// An http(s) URL with a host.
pub fn is_absolute_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// `None` when the address is acceptable.
pub fn check_email(raw: &str) -> Option<FieldErrorKind> {
    if !EMAIL_RE.is_match(raw) {
        return Some(FieldErrorKind::InvalidEmail);
    }
    let domain = raw.rsplit('@').next().unwrap_or_default().to_ascii_lowercase();
    if DISALLOWED_EMAIL_DOMAINS.contains(&domain.as_str()) {
        return Some(FieldErrorKind::DisallowedDomain);
    }
    None
}

pub fn parse_local_date_time(raw: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Discriminator selecting how the backend runs the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Immediate,
    Cron,
    Interval,
    Date,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Cron => "cron",
            Self::Interval => "interval",
            Self::Date => "date",
        }
    }
}

impl FromStr for ScheduleType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(Self::Immediate),
            "cron" => Ok(Self::Cron),
            "interval" => Ok(Self::Interval),
            "date" => Ok(Self::Date),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Minutes,
    #[default]
    Hours,
    Days,
}

impl IntervalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }
}

impl FromStr for IntervalUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the form's inputs, used to key validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    WebsiteUrl,
    NotificationEmail,
    ScheduleType,
    Timezone,
    Minute,
    Hour,
    DayOfWeek,
    IntervalValue,
    IntervalUnit,
    ScheduledDateTime,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WebsiteUrl => "website_url",
            Self::NotificationEmail => "notification_email",
            Self::ScheduleType => "schedule_type",
            Self::Timezone => "timezone",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfWeek => "day_of_week",
            Self::IntervalValue => "interval_value",
            Self::IntervalUnit => "interval_unit",
            Self::ScheduledDateTime => "scheduled_date_time",
        }
    }

    /// Human label, as shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebsiteUrl => "Website URL",
            Self::NotificationEmail => "Email",
            Self::ScheduleType => "Schedule type",
            Self::Timezone => "Timezone",
            Self::Minute => "Minute",
            Self::Hour => "Hour",
            Self::DayOfWeek => "Day of week",
            Self::IntervalValue => "Interval value",
            Self::IntervalUnit => "Interval unit",
            Self::ScheduledDateTime => "Scheduled time",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw, unvalidated state of the scan request form.
///
/// Every input is kept as entered so that a failed submission can be shown
/// back to the user unchanged. Only the inputs relevant to the selected
/// schedule type are looked at during validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanRequestForm {
    pub website_url: String,
    pub notification_email: String,
    pub schedule_type: String,
    pub timezone: String,
    pub minute: String,
    pub hour: String,
    pub day_of_week: String,
    pub interval_value: String,
    pub interval_unit: String,
    pub scheduled_date_time: String,
}

pub const DEFAULT_TIMEZONE: &str = "UTC";

impl Default for ScanRequestForm {
    fn default() -> Self {
        Self::with_timezone(DEFAULT_TIMEZONE)
    }
}

impl ScanRequestForm {
    /// Defaults with a different preselected timezone.
    pub fn with_timezone(timezone: &str) -> Self {
        Self {
            website_url: String::new(),
            notification_email: String::new(),
            schedule_type: ScheduleType::default().as_str().to_string(),
            timezone: timezone.to_string(),
            minute: "0".to_string(),
            hour: "9".to_string(),
            day_of_week: "mon-fri".to_string(),
            interval_value: "1".to_string(),
            interval_unit: IntervalUnit::default().as_str().to_string(),
            scheduled_date_time: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults() {
        let form = ScanRequestForm::default();
        assert_eq!(form.schedule_type, "immediate");
        assert_eq!(form.timezone, "UTC");
        assert_eq!(form.minute, "0");
        assert_eq!(form.hour, "9");
        assert_eq!(form.day_of_week, "mon-fri");
        assert_eq!(form.interval_value, "1");
        assert_eq!(form.interval_unit, "hours");
        assert!(form.website_url.is_empty());
        assert!(form.scheduled_date_time.is_empty());
    }

    #[test]
    fn test_with_timezone_only_changes_timezone() {
        let form = ScanRequestForm::with_timezone("Europe/Berlin");
        assert_eq!(form.timezone, "Europe/Berlin");
        assert_eq!(form.schedule_type, "immediate");
        assert_eq!(form.hour, "9");
    }

    #[test]
    fn test_schedule_type_parse() {
        assert_eq!("cron".parse::<ScheduleType>(), Ok(ScheduleType::Cron));
        assert_eq!("date".parse::<ScheduleType>(), Ok(ScheduleType::Date));
        assert!("weekly".parse::<ScheduleType>().is_err());
        assert!("Cron".parse::<ScheduleType>().is_err());
    }

    #[test]
    fn test_interval_unit_display() {
        assert_eq!(IntervalUnit::Minutes.to_string(), "minutes");
        assert_eq!(IntervalUnit::default(), IntervalUnit::Hours);
    }
}

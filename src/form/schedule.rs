use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::fields::{IntervalUnit, ScheduleType};

/// Wire format for `run_at`: a local date-time without offset.
pub const RUN_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CronFields {
    pub minute: String,
    pub hour: String,
    pub day_of_week: String,
}

/// `{"<unit>": n}` with exactly one unit set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntervalPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl IntervalPayload {
    pub fn new(every: u32, unit: IntervalUnit) -> Self {
        let mut payload = Self::default();
        match unit {
            IntervalUnit::Minutes => payload.minutes = Some(every),
            IntervalUnit::Hours => payload.hours = Some(every),
            IntervalUnit::Days => payload.days = Some(every),
        }
        payload
    }
}

/// Scheduling payload sent with a schedule-scan request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleSpec {
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<CronFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_at: Option<String>,
}

/// A validated schedule. Each variant carries only the inputs it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Immediate,
    Cron {
        timezone: String,
        cron: CronFields,
    },
    Interval {
        timezone: String,
        every: u32,
        unit: IntervalUnit,
    },
    Date {
        timezone: String,
        run_at: NaiveDateTime,
    },
}

impl Schedule {
    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Self::Immediate => ScheduleType::Immediate,
            Self::Cron { .. } => ScheduleType::Cron,
            Self::Interval { .. } => ScheduleType::Interval,
            Self::Date { .. } => ScheduleType::Date,
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate)
    }

    /// Payload for the schedule operation. `None` for immediate scans, which
    /// go through run-once instead.
    pub fn spec(&self) -> Option<ScheduleSpec> {
        let base = |timezone: &str| ScheduleSpec {
            schedule_type: self.schedule_type(),
            timezone: timezone.to_string(),
            cron: None,
            interval: None,
            run_at: None,
        };

        match self {
            Self::Immediate => None,
            Self::Cron { timezone, cron } => Some(ScheduleSpec {
                cron: Some(cron.clone()),
                ..base(timezone)
            }),
            Self::Interval { timezone, every, unit } => Some(ScheduleSpec {
                interval: Some(IntervalPayload::new(*every, *unit)),
                ..base(timezone)
            }),
            Self::Date { timezone, run_at } => Some(ScheduleSpec {
                run_at: Some(run_at.format(RUN_AT_FORMAT).to_string()),
                ..base(timezone)
            }),
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate => write!(f, "now"),
            Self::Cron { timezone, cron } => write!(
                f,
                "cron minute={} hour={} day_of_week={} ({})",
                cron.minute, cron.hour, cron.day_of_week, timezone
            ),
            Self::Interval { timezone, every, unit } => {
                write!(f, "every {} {} ({})", every, unit, timezone)
            }
            Self::Date { timezone, run_at } => {
                write!(f, "once at {} ({})", run_at.format(RUN_AT_FORMAT), timezone)
            }
        }
    }
}

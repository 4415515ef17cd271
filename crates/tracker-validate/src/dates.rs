//! Date arguments and list ranges.

use chrono::{Duration, Months, NaiveDate};
use tracker_core::{DATE_FORMAT, ValidationError};

/// Days covered by a list with no explicit bounds.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Parse an optional `YYYY-MM-DD` argument. Missing or blank input means `today`.
pub fn parse_date(
    input: Option<&str>,
    today: NaiveDate,
    allow_future: bool,
) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(today);
    }

    // chrono accepts single-digit months and days; the stored format does not.
    let date = if trimmed.len() == 10 {
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
    } else {
        None
    };
    let date = date.ok_or_else(|| {
        ValidationError::InvalidFormat(format!("invalid date '{trimmed}': use YYYY-MM-DD"))
    })?;

    if !allow_future && date > today {
        return Err(ValidationError::FutureDate(date));
    }
    Ok(date)
}

/// Range flags as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub week: bool,
    pub month: bool,
}

/// Reference days the relative range flags count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeAnchors {
    pub today: NaiveDate,
    /// End of the range when no bounds are given.
    pub default_end: NaiveDate,
    pub week_end: NaiveDate,
    pub month: DateRange,
}

impl RangeAnchors {
    pub fn at(today: NaiveDate) -> Self {
        Self {
            today,
            default_end: today,
            week_end: today,
            month: DateRange {
                from: today.checked_sub_months(Months::new(1)).unwrap_or(today),
                to: today,
            },
        }
    }

    /// Fixed anchors used in test mode so fixture data stays in range.
    pub fn fixture(today: NaiveDate) -> Self {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or(today);
        Self {
            today,
            default_end: day(31),
            week_end: day(14),
            month: DateRange {
                from: day(1),
                to: day(31),
            },
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Turn range flags into a concrete inclusive range.
pub fn resolve_range(
    request: &RangeRequest,
    anchors: &RangeAnchors,
) -> Result<DateRange, ValidationError> {
    let explicit = request.from.is_some() || request.to.is_some();
    if request.week && request.month {
        return Err(conflict("week", "month"));
    }
    if request.week && explicit {
        return Err(conflict("week", bound_flag(request)));
    }
    if request.month && explicit {
        return Err(conflict("month", bound_flag(request)));
    }

    if request.week {
        return Ok(DateRange {
            from: anchors.week_end - Duration::days(7),
            to: anchors.week_end,
        });
    }
    if request.month {
        return Ok(anchors.month);
    }

    // Range bounds may lie in the future; only entry dates are restricted.
    let from = request
        .from
        .as_deref()
        .map(|s| parse_date(Some(s), anchors.today, true))
        .transpose()?;
    let to = request
        .to
        .as_deref()
        .map(|s| parse_date(Some(s), anchors.today, true))
        .transpose()?;

    let range = match (from, to) {
        (Some(from), Some(to)) => DateRange { from, to },
        (Some(from), None) => DateRange {
            from,
            to: anchors.today,
        },
        (None, Some(to)) => DateRange {
            from: to - Duration::days(DEFAULT_RANGE_DAYS),
            to,
        },
        (None, None) => DateRange {
            from: anchors.default_end - Duration::days(DEFAULT_RANGE_DAYS),
            to: anchors.default_end,
        },
    };

    if range.from > range.to {
        return Err(ValidationError::InvalidFormat(format!(
            "start date {} is after end date {}",
            range.from, range.to
        )));
    }
    Ok(range)
}

fn bound_flag(request: &RangeRequest) -> &'static str {
    if request.from.is_some() { "from" } else { "to" }
}

fn conflict(a: &str, b: &str) -> ValidationError {
    ValidationError::ConflictingFlags(a.to_string(), b.to_string())
}

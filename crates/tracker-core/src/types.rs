use chrono::Weekday;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Calendar date format used on the command line and in the data files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Health-tracking category. Each category owns one JSON array file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weight,
    Exercise,
    Fasting,
    Soda,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Weight,
        Category::Exercise,
        Category::Fasting,
        Category::Soda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Exercise => "exercise",
            Self::Fasting => "fasting",
            Self::Soda => "soda",
        }
    }

    /// Name of the backing data file, e.g. `weight.json`.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Name of the sidecar lock file guarding the data file.
    pub fn lock_file_name(&self) -> String {
        format!(".{}.lock", self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weight" => Ok(Self::Weight),
            "exercise" => Ok(Self::Exercise),
            "fasting" => Ok(Self::Fasting),
            "soda" => Ok(Self::Soda),
            other => Err(format!(
                "Invalid category '{other}'. Valid: weight, exercise, fasting, soda"
            )),
        }
    }
}

/// Exercise activity. `Other` requires a companion label on the entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Jogging,
    Skiing,
    Walking,
    Cycling,
    #[value(name = "mountain_biking")]
    #[serde(rename = "mountain_biking")]
    MountainBike,
    Pickleball,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jogging => "jogging",
            Self::Skiing => "skiing",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::MountainBike => "mountain_biking",
            Self::Pickleball => "pickleball",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daily meal pattern for the fasting schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealPattern {
    FullFast,
    OneMeal,
    Regular,
}

impl MealPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullFast => "full-fast",
            Self::OneMeal => "one-meal",
            Self::Regular => "regular",
        }
    }

    /// Pattern the weekly schedule expects on `weekday`.
    ///
    /// Monday and Tuesday are full fasts, Wednesday and Thursday one meal,
    /// Friday through Sunday regular eating.
    pub fn scheduled_for(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon | Weekday::Tue => Self::FullFast,
            Weekday::Wed | Weekday::Thu => Self::OneMeal,
            Weekday::Fri | Weekday::Sat | Weekday::Sun => Self::Regular,
        }
    }
}

impl std::fmt::Display for MealPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for CLI responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

use chrono::{Local, NaiveDate};
use tracker_config::TrackerConfig;
use tracker_core::{Record, StoreError, ValidationError};
use tracker_store::RecordStore;
use tracker_validate::{
    CategoryRule, DateRange, RangeAnchors, RuleTable, ValidationMode, resolve_range,
};

use crate::cli::RangeArgs;
use crate::confirm::{AssumeYes, Confirm, Confirmation, TerminalPrompt};

/// Everything a command handler needs for one invocation.
pub(crate) struct CommandContext {
    pub store: RecordStore,
    pub rules: RuleTable,
    pub today: NaiveDate,
    pub allow_future: bool,
    pub anchors: RangeAnchors,
    confirm: Box<dyn Confirm>,
}

impl CommandContext {
    pub fn from_config(config: &TrackerConfig, assume_yes: bool) -> Result<Self, StoreError> {
        let store = RecordStore::open(&config.data_dir)?;
        let today = Local::now().date_naive();
        let anchors = if config.is_test_mode() {
            RangeAnchors::fixture(today)
        } else {
            RangeAnchors::at(today)
        };
        let confirm: Box<dyn Confirm> = if assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(TerminalPrompt)
        };
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            %today,
            test_mode = config.is_test_mode(),
            "command context ready"
        );

        Ok(Self {
            store,
            rules: config.rules.clone(),
            today,
            allow_future: config.allow_future_dates,
            anchors,
            confirm,
        })
    }

    #[cfg(test)]
    pub fn for_test(store: RecordStore, today: NaiveDate, confirm: impl Confirm + 'static) -> Self {
        Self {
            store,
            rules: RuleTable::builtin(),
            today,
            allow_future: false,
            anchors: RangeAnchors::at(today),
            confirm: Box::new(confirm),
        }
    }

    /// Date of a new or edited entry. Missing means today.
    pub fn entry_date(&self, input: Option<&str>) -> Result<NaiveDate, ValidationError> {
        tracker_validate::parse_date(input, self.today, self.allow_future)
    }

    /// Date used to look up an existing entry. Never rejected for being in the future.
    pub fn lookup_date(&self, input: Option<&str>) -> Result<NaiveDate, ValidationError> {
        tracker_validate::parse_date(input, self.today, true)
    }

    pub fn range(&self, args: &RangeArgs) -> Result<DateRange, ValidationError> {
        resolve_range(&args.to_request(), &self.anchors)
    }

    pub fn add_mode(&self) -> ValidationMode {
        ValidationMode::add(self.today).allow_future(self.allow_future)
    }

    pub fn update_mode(&self) -> ValidationMode {
        ValidationMode::update(self.today).allow_future(self.allow_future)
    }

    pub fn rule<T: Record>(&self) -> &CategoryRule {
        self.rules.get(T::CATEGORY)
    }

    pub fn confirm(&self, confirmation: &Confirmation) -> bool {
        let answer = self.confirm.confirm(confirmation);
        if !answer {
            tracing::info!(question = %confirmation.question, "confirmation declined");
        }
        answer
    }
}

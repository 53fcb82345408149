use chrono::{DateTime, Duration, Utc};
use converter_client::ExchangeRateClient;
use converter_config::ConverterConfig;
use converter_core::{
    format_value, Category, Conversion, ConversionRecord, ConverterError, Result, RateSource,
    Unit,
};
use converter_engine::Converter;
use converter_export::ExportFormat;
use converter_history::{HistoryStore, SessionHistory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Converting,
    ShownResult(ConversionRecord),
    ShownError(String),
}

/// What the user sees after pressing "convert".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `persisted` is false when the store write failed; the record is
    /// still part of the session history.
    Converted { record: ConversionRecord, persisted: bool },
    Warning(String),
    Failed(String),
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Converted { record, .. } => record.summary(),
            Outcome::Warning(message) | Outcome::Failed(message) => message.clone(),
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Outcome::Converted { .. })
    }
}

/// Current state of the category and unit selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub from: Unit,
    pub to: Unit,
}

impl Selection {
    pub fn for_category(category: Category) -> Self {
        Self {
            category,
            from: category.default_unit(),
            to: category.default_unit(),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::for_category(Category::Length)
    }
}

/// One interactive session: selectors, history and the store handle.
pub struct ConverterSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    converter: Converter,
    store: HistoryStore,
    history: SessionHistory,
    selection: Selection,
    state: SessionState,
}

impl ConverterSession {
    pub fn new(config: &ConverterConfig) -> Result<Self> {
        let client = ExchangeRateClient::new(&config.rates)?;
        let store = HistoryStore::open(config.database_path())?;
        Ok(Self::with_parts(Arc::new(client), store))
    }

    pub fn with_parts(rates: Arc<dyn RateSource>, store: HistoryStore) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            converter: Converter::new(rates),
            store,
            history: SessionHistory::new(),
            selection: Selection::default(),
            state: SessionState::Idle,
        };
        info!("Started converter session {}", session.id);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Switch category; both unit selectors reset to its unit list.
    pub fn select_category(&mut self, category: Category) -> &'static [Unit] {
        self.selection = Selection::for_category(category);
        self.state = SessionState::Idle;
        debug!("Selected category {}", category);
        category.units()
    }

    pub fn select_from(&mut self, unit: Unit) -> Result<()> {
        self.check_in_category(unit)?;
        self.selection.from = unit;
        Ok(())
    }

    pub fn select_to(&mut self, unit: Unit) -> Result<()> {
        self.check_in_category(unit)?;
        self.selection.to = unit;
        Ok(())
    }

    fn check_in_category(&self, unit: Unit) -> Result<()> {
        let category = self.selection.category;
        if category.contains(unit) {
            Ok(())
        } else {
            Err(ConverterError::UnitMismatch { category, unit })
        }
    }

    /// Convert `value` with the current selection.
    pub async fn convert(&mut self, value: f64) -> Outcome {
        let Selection { from, to, .. } = self.selection;
        self.convert_units(from, to, value).await
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn convert_units(&mut self, from: Unit, to: Unit, value: f64) -> Outcome {
        let conversion = match Conversion::new(from, to) {
            Ok(conversion) => conversion,
            Err(e) => return self.fail(e.to_string()),
        };

        if conversion.is_same_unit() {
            self.state = SessionState::Idle;
            return Outcome::Warning(ConverterError::SameUnit(from).to_string());
        }

        if !value.is_finite() {
            self.state = SessionState::Idle;
            return Outcome::Warning("Enter a finite number to convert.".to_string());
        }

        self.state = SessionState::Converting;
        match self.converter.convert(conversion, value).await {
            Ok(Some(raw)) if !raw.is_finite() => self.fail(format!(
                "Conversion failed: {} {} is out of range in {}",
                format_value(value),
                from,
                to
            )),
            Ok(Some(raw)) => self.accept(ConversionRecord::new(conversion, value, raw)),
            Ok(None) => self.fail(ConverterError::RateUnavailable { from, to }.to_string()),
            Err(e) => self.fail(format!("Conversion failed: {}", e)),
        }
    }

    fn accept(&mut self, record: ConversionRecord) -> Outcome {
        self.history.append(record.clone());

        let persisted = match self.store.insert(&record) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist conversion '{}': {}", record.summary(), e);
                false
            }
        };

        info!("Converted {}", record.summary());
        self.state = SessionState::ShownResult(record.clone());
        Outcome::Converted { record, persisted }
    }

    fn fail(&mut self, message: String) -> Outcome {
        debug!("Conversion not recorded: {}", message);
        self.state = SessionState::ShownError(message.clone());
        Outcome::Failed(message)
    }

    /// Render the whole session history in `format`.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        format.render(self.history.all())
    }

    pub fn export_to(&self, dir: impl AsRef<Path>, format: ExportFormat) -> Result<PathBuf> {
        converter_export::write_export(dir, format, self.history.all())
    }

    /// Rows persisted by this and earlier sessions.
    pub fn stored_records(&self) -> Result<Vec<ConversionRecord>> {
        self.store.records()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod units;

pub use units::{Category, Conversion, Currency, LengthUnit, TemperatureUnit, Unit, WeightUnit};

/// Number of decimal places kept on a recorded result.
pub const RESULT_DECIMALS: i32 = 4;

/// Smallest magnitude printed in scientific notation.
pub const EXPONENT_THRESHOLD: f64 = 1e16;

/// One accepted conversion. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    category: Category,
    from: Unit,
    to: Unit,
    input: f64,
    result: f64,
}

impl ConversionRecord {
    /// Build a record from a raw converter result, rounding it for display
    /// and storage.
    pub fn new(conversion: Conversion, input: f64, raw_result: f64) -> Self {
        Self {
            category: conversion.category(),
            from: conversion.from_unit(),
            to: conversion.to_unit(),
            input,
            result: round_result(raw_result),
        }
    }

    /// Rebuild a record read back from storage. The result is taken as-is.
    pub fn from_parts(
        category: Category,
        from: Unit,
        to: Unit,
        input: f64,
        result: f64,
    ) -> Result<Self> {
        for unit in [from, to] {
            if !category.contains(unit) {
                return Err(ConverterError::UnitMismatch { category, unit });
            }
        }
        Ok(Self {
            category,
            from,
            to,
            input,
            result,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn from(&self) -> Unit {
        self.from
    }

    pub fn to(&self) -> Unit {
        self.to
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    /// `{input} {from} = {result} {to}`
    pub fn summary(&self) -> String {
        format!(
            "{} {} = {} {}",
            format_value(self.input),
            self.from,
            format_value(self.result),
            self.to
        )
    }
}

/// Round half away from zero to [`RESULT_DECIMALS`] places.
///
/// Magnitudes too large to scale have no fractional digits and are
/// returned unchanged.
pub fn round_result(value: f64) -> f64 {
    let scale = 10f64.powi(RESULT_DECIMALS);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Render a number the way it was typed: integral values keep a trailing
/// `.0`, everything else uses the shortest round-trip form. Magnitudes from
/// [`EXPONENT_THRESHOLD`] up switch to scientific notation.
pub fn format_value(value: f64) -> String {
    if value.abs() >= EXPONENT_THRESHOLD {
        format!("{value:e}")
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Exchange rates quoted against a single base currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub base: Option<String>,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn rate(&self, to: Currency) -> Option<f64> {
        self.rates.get(to.code()).copied()
    }
}

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Select different units for conversion.")]
    SameUnit(Unit),

    #[error("Conversion rate from {from} to {to} not available.")]
    RateUnavailable { from: Unit, to: Unit },

    #[error("Rate service error: {0}")]
    RateService(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown {category} unit '{name}'")]
    UnknownUnit { category: Category, name: String },

    #[error("Unknown unit '{0}'")]
    UnknownUnitName(String),

    #[error("{unit} is not a {category} unit")]
    UnitMismatch { category: Category, unit: Unit },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConverterError>;

/// Source of live exchange rates.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    async fn latest_rates(&self, base: Currency) -> Result<RateTable>;
}

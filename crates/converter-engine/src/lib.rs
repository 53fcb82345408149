use converter_core::{
    Conversion, Currency, LengthUnit, RateSource, Result, TemperatureUnit, WeightUnit,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Metres per unit.
pub fn length_factor(unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meters => 1.0,
        LengthUnit::Kilometers => 1000.0,
        LengthUnit::Centimeters => 0.01,
    }
}

/// Kilograms per unit.
pub fn weight_factor(unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kilograms => 1.0,
        WeightUnit::Grams => 0.001,
        WeightUnit::Pounds => 0.453592,
    }
}

pub fn convert_temperature(from: TemperatureUnit, to: TemperatureUnit, value: f64) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Convert without any I/O. Currency pairs have no fixed formula and
/// yield `None`.
pub fn convert_fixed(conversion: &Conversion, value: f64) -> Option<f64> {
    match *conversion {
        Conversion::Length { from, to } => Some(value * (length_factor(from) / length_factor(to))),
        Conversion::Weight { from, to } => Some(value * (weight_factor(from) / weight_factor(to))),
        Conversion::Temperature { from, to } => Some(convert_temperature(from, to, value)),
        Conversion::Currency { .. } => None,
    }
}

/// Applies the fixed formulas and resolves currency pairs through a
/// [`RateSource`]. Rates are fetched on every call.
pub struct Converter {
    rates: Arc<dyn RateSource>,
}

impl Converter {
    pub fn new(rates: Arc<dyn RateSource>) -> Self {
        Self { rates }
    }

    /// `Ok(None)` means the rate for the pair was not in the response.
    /// Transport and decoding failures surface as `Err`.
    #[instrument(skip(self))]
    pub async fn convert(&self, conversion: Conversion, value: f64) -> Result<Option<f64>> {
        match conversion {
            Conversion::Currency { from, to } => self.convert_currency(from, to, value).await,
            fixed => Ok(convert_fixed(&fixed, value)),
        }
    }

    async fn convert_currency(&self, from: Currency, to: Currency, value: f64) -> Result<Option<f64>> {
        let table = self.rates.latest_rates(from).await?;
        // A zero rate is as good as no rate.
        let rate = table.rate(to).filter(|rate| *rate != 0.0);
        debug!("Rate {} -> {}: {:?}", from, to, rate);
        Ok(rate.map(|rate| value * rate))
    }
}

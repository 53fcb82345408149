use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ConverterError, Result};

/// The four supported conversion domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Meters,
    Kilometers,
    Centimeters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    Kilograms,
    Grams,
    Pounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
    Inr,
    Gbp,
}

/// A unit tagged with the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Unit {
    Length(LengthUnit),
    Weight(WeightUnit),
    Temperature(TemperatureUnit),
    Currency(Currency),
}

const LENGTH_UNITS: &[Unit] = &[
    Unit::Length(LengthUnit::Meters),
    Unit::Length(LengthUnit::Kilometers),
    Unit::Length(LengthUnit::Centimeters),
];

const WEIGHT_UNITS: &[Unit] = &[
    Unit::Weight(WeightUnit::Kilograms),
    Unit::Weight(WeightUnit::Grams),
    Unit::Weight(WeightUnit::Pounds),
];

const TEMPERATURE_UNITS: &[Unit] = &[
    Unit::Temperature(TemperatureUnit::Celsius),
    Unit::Temperature(TemperatureUnit::Fahrenheit),
];

const CURRENCY_UNITS: &[Unit] = &[
    Unit::Currency(Currency::Usd),
    Unit::Currency(Currency::Eur),
    Unit::Currency(Currency::Inr),
    Unit::Currency(Currency::Gbp),
];

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Currency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Temperature => "Temperature",
            Category::Currency => "Currency",
        }
    }

    /// Units of this category in selector order.
    pub fn units(self) -> &'static [Unit] {
        match self {
            Category::Length => LENGTH_UNITS,
            Category::Weight => WEIGHT_UNITS,
            Category::Temperature => TEMPERATURE_UNITS,
            Category::Currency => CURRENCY_UNITS,
        }
    }

    /// The unit a freshly reset selector shows.
    pub fn default_unit(self) -> Unit {
        self.units()[0]
    }

    pub fn contains(self, unit: Unit) -> bool {
        unit.category() == self
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConverterError::UnknownCategory(wanted.to_string()))
    }
}

impl Currency {
    /// ISO 4217 code used by the rate service.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Inr => "INR",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Unit {
    pub fn category(self) -> Category {
        match self {
            Unit::Length(_) => Category::Length,
            Unit::Weight(_) => Category::Weight,
            Unit::Temperature(_) => Category::Temperature,
            Unit::Currency(_) => Category::Currency,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Length(LengthUnit::Meters) => "Meters",
            Unit::Length(LengthUnit::Kilometers) => "Kilometers",
            Unit::Length(LengthUnit::Centimeters) => "Centimeters",
            Unit::Weight(WeightUnit::Kilograms) => "Kilograms",
            Unit::Weight(WeightUnit::Grams) => "Grams",
            Unit::Weight(WeightUnit::Pounds) => "Pounds",
            Unit::Temperature(TemperatureUnit::Celsius) => "Celsius",
            Unit::Temperature(TemperatureUnit::Fahrenheit) => "Fahrenheit",
            Unit::Currency(currency) => currency.code(),
        }
    }

    /// Short alias accepted on the command line.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Length(LengthUnit::Meters) => "m",
            Unit::Length(LengthUnit::Kilometers) => "km",
            Unit::Length(LengthUnit::Centimeters) => "cm",
            Unit::Weight(WeightUnit::Kilograms) => "kg",
            Unit::Weight(WeightUnit::Grams) => "g",
            Unit::Weight(WeightUnit::Pounds) => "lb",
            Unit::Temperature(TemperatureUnit::Celsius) => "c",
            Unit::Temperature(TemperatureUnit::Fahrenheit) => "f",
            Unit::Currency(currency) => currency.code(),
        }
    }

    fn matches(self, input: &str) -> bool {
        self.name().eq_ignore_ascii_case(input) || self.symbol().eq_ignore_ascii_case(input)
    }

    /// Resolve a unit name or symbol within `category`.
    ///
    /// A name that exists only in another category is reported as a
    /// mismatch rather than as an unknown unit.
    pub fn parse_in(category: Category, input: &str) -> Result<Self> {
        let input = input.trim();
        if let Some(unit) = category.units().iter().copied().find(|u| u.matches(input)) {
            return Ok(unit);
        }
        match input.parse::<Unit>() {
            Ok(unit) => Err(ConverterError::UnitMismatch { category, unit }),
            Err(_) => Err(ConverterError::UnknownUnit {
                category,
                name: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = ConverterError;

    /// Unit names are unique across categories, so a bare name is enough.
    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        Category::ALL
            .into_iter()
            .flat_map(|c| c.units().iter().copied())
            .find(|u| u.matches(input))
            .ok_or_else(|| ConverterError::UnknownUnitName(input.to_string()))
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.name().to_string()
    }
}

impl TryFrom<String> for Unit {
    type Error = ConverterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A validated pair of units from the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Length { from: LengthUnit, to: LengthUnit },
    Weight { from: WeightUnit, to: WeightUnit },
    Temperature { from: TemperatureUnit, to: TemperatureUnit },
    Currency { from: Currency, to: Currency },
}

impl Conversion {
    pub fn new(from: Unit, to: Unit) -> Result<Self> {
        match (from, to) {
            (Unit::Length(from), Unit::Length(to)) => Ok(Conversion::Length { from, to }),
            (Unit::Weight(from), Unit::Weight(to)) => Ok(Conversion::Weight { from, to }),
            (Unit::Temperature(from), Unit::Temperature(to)) => {
                Ok(Conversion::Temperature { from, to })
            }
            (Unit::Currency(from), Unit::Currency(to)) => Ok(Conversion::Currency { from, to }),
            (from, to) => Err(ConverterError::UnitMismatch {
                category: from.category(),
                unit: to,
            }),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Conversion::Length { .. } => Category::Length,
            Conversion::Weight { .. } => Category::Weight,
            Conversion::Temperature { .. } => Category::Temperature,
            Conversion::Currency { .. } => Category::Currency,
        }
    }

    pub fn from_unit(&self) -> Unit {
        match *self {
            Conversion::Length { from, .. } => Unit::Length(from),
            Conversion::Weight { from, .. } => Unit::Weight(from),
            Conversion::Temperature { from, .. } => Unit::Temperature(from),
            Conversion::Currency { from, .. } => Unit::Currency(from),
        }
    }

    pub fn to_unit(&self) -> Unit {
        match *self {
            Conversion::Length { to, .. } => Unit::Length(to),
            Conversion::Weight { to, .. } => Unit::Weight(to),
            Conversion::Temperature { to, .. } => Unit::Temperature(to),
            Conversion::Currency { to, .. } => Unit::Currency(to),
        }
    }

    pub fn is_same_unit(&self) -> bool {
        self.from_unit() == self.to_unit()
    }
}

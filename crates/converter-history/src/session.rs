use converter_core::ConversionRecord;

/// Records accepted during one session, oldest first. Append-only.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<ConversionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ConversionRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SessionHistory {
    type Item = &'a ConversionRecord;
    type IntoIter = std::slice::Iter<'a, ConversionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converter_core::{Conversion, TemperatureUnit, Unit};

    #[test]
    fn test_append_keeps_insertion_order() {
        let conversion = Conversion::new(
            Unit::Temperature(TemperatureUnit::Celsius),
            Unit::Temperature(TemperatureUnit::Fahrenheit),
        )
        .unwrap();

        let mut history = SessionHistory::new();
        assert!(history.is_empty());

        for value in [0.0, 100.0, 37.0] {
            history.append(ConversionRecord::new(conversion, value, value * 9.0 / 5.0 + 32.0));
        }

        assert_eq!(history.len(), 3);
        let inputs: Vec<f64> = history.iter().map(|r| r.input()).collect();
        assert_eq!(inputs, vec![0.0, 100.0, 37.0]);
        assert_eq!(history.all()[2].result(), 98.6);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let conversion = Conversion::new(
            Unit::Temperature(TemperatureUnit::Fahrenheit),
            Unit::Temperature(TemperatureUnit::Celsius),
        )
        .unwrap();
        let record = ConversionRecord::new(conversion, 32.0, 0.0);

        let mut history = SessionHistory::new();
        history.append(record.clone());
        history.append(record.clone());

        assert_eq!(history.all(), &[record.clone(), record]);
    }
}

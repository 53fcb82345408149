use converter_core::{Category, ConverterError, Result, Unit};
use converter_export::ExportFormat;

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Category(Category),
    From(String),
    To(String),
    Convert(f64),
    History,
    Records,
    Export(ExportFormat),
    Units,
    Help,
    Exit,
    Empty,
}

impl ShellCommand {
    /// Unit names are resolved later against the selected category.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Empty);
        }

        if let Ok(value) = parse_value(line) {
            return Ok(ShellCommand::Convert(value));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "category" | "cat" => Ok(ShellCommand::Category(required(word, rest)?.parse()?)),
            "from" => Ok(ShellCommand::From(required(word, rest)?.to_string())),
            "to" => Ok(ShellCommand::To(required(word, rest)?.to_string())),
            "convert" => Ok(ShellCommand::Convert(parse_value(required(word, rest)?)?)),
            "history" => Ok(ShellCommand::History),
            "records" => Ok(ShellCommand::Records),
            "export" => Ok(ShellCommand::Export(required(word, rest)?.parse()?)),
            "units" => Ok(ShellCommand::Units),
            "help" | "?" => Ok(ShellCommand::Help),
            "exit" | "quit" => Ok(ShellCommand::Exit),
            other => Err(ConverterError::InvalidInput(format!(
                "Unknown command '{}' (type 'help')",
                other
            ))),
        }
    }
}

fn required<'a>(command: &str, argument: &'a str) -> Result<&'a str> {
    if argument.is_empty() {
        Err(ConverterError::InvalidInput(format!(
            "'{}' needs an argument",
            command
        )))
    } else {
        Ok(argument)
    }
}

/// Parse an amount typed by the user.
pub fn parse_value(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| ConverterError::InvalidInput(format!("'{}' is not a number", input.trim())))
}

/// Resolve a unit typed at the prompt within `category`.
pub fn resolve_unit(category: Category, name: &str) -> Result<Unit> {
    Unit::parse_in(category, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use converter_core::WeightUnit;

    #[test]
    fn test_bare_number_converts() {
        assert_eq!(ShellCommand::parse(" 12.5 ").unwrap(), ShellCommand::Convert(12.5));
        assert_eq!(ShellCommand::parse("-40").unwrap(), ShellCommand::Convert(-40.0));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ShellCommand::parse("category weight").unwrap(),
            ShellCommand::Category(Category::Weight)
        );
        assert_eq!(
            ShellCommand::parse("FROM Kilograms").unwrap(),
            ShellCommand::From("Kilograms".to_string())
        );
        assert_eq!(
            ShellCommand::parse("convert 3").unwrap(),
            ShellCommand::Convert(3.0)
        );
        assert_eq!(
            ShellCommand::parse("export pdf").unwrap(),
            ShellCommand::Export(ExportFormat::Document)
        );
        assert_eq!(ShellCommand::parse("quit").unwrap(), ShellCommand::Exit);
        assert_eq!(ShellCommand::parse("   ").unwrap(), ShellCommand::Empty);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ShellCommand::parse("convert abc"),
            Err(ConverterError::InvalidInput(_))
        ));
        assert!(matches!(
            ShellCommand::parse("to"),
            Err(ConverterError::InvalidInput(_))
        ));
        assert!(matches!(
            ShellCommand::parse("category volume"),
            Err(ConverterError::UnknownCategory(_))
        ));
        assert!(matches!(
            ShellCommand::parse("launch"),
            Err(ConverterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_unit_in_category() {
        assert_eq!(
            resolve_unit(Category::Weight, "lb").unwrap(),
            Unit::Weight(WeightUnit::Pounds)
        );
        assert!(resolve_unit(Category::Weight, "meters").is_err());
    }
}

//! Output formatting for the CLI.

use serde::Serialize;
use snowplan_core::Amount;

/// JSON formatter honoring the `--pretty` flag.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes a value to a JSON string.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// A section divider for text output.
pub fn divider() -> String {
    "─".repeat(40)
}

/// Formats a milliunit amount as currency units.
pub fn money(amount: Amount) -> String {
    format!("{:.2}", amount.to_units())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_formatter_compact() {
        let formatter = JsonFormatter::new(false);
        let out = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn test_json_formatter_pretty() {
        let formatter = JsonFormatter::new(true);
        let out = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_money() {
        assert_eq!(money(Amount(1_234_560)), "1234.56");
        assert_eq!(money(Amount(-25_000)), "-25.00");
    }
}

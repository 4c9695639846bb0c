//! Order confirmation parsing.
//!
//! The confirmation dialog renders a semi-structured block:
//!
//! ```text
//! Id: 8362419
//! Amount: 790 USD
//! Card Number: 4111111111111111
//! Name: Alice
//! Date: 19/9/2026
//! ```
//!
//! Fields are found by line prefix. A missing or malformed field falls back
//! to an empty / zero value and produces a [`ParseWarning`], so one bad line
//! never hides the others. Callers decide whether warnings are fatal.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Fields read from an order confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order id
    pub order_id: String,
    /// Charged amount in whole USD
    pub amount: u64,
    /// Card number as echoed by the site
    pub card_number: String,
    /// Customer name
    pub name: String,
    /// Order date as rendered
    pub date: String,
}

/// Why a field fell back to its default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarningKind {
    /// No line carried the field's prefix
    Missing,
    /// The line was present but its value could not be read
    Malformed(String),
}

/// A confirmation field that was recovered with a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// Field label, e.g. `Amount`
    pub field: String,
    /// What went wrong
    pub kind: ParseWarningKind,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseWarningKind::Missing => write!(f, "confirmation field '{}' missing", self.field),
            ParseWarningKind::Malformed(raw) => {
                write!(f, "confirmation field '{}' malformed: {raw:?}", self.field)
            }
        }
    }
}

/// Parsed record plus every field that had to be defaulted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConfirmation {
    /// Parsed fields
    pub order: OrderConfirmation,
    /// Defaulted fields
    pub warnings: Vec<ParseWarning>,
}

impl ParsedConfirmation {
    /// Whether every field was read
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

const ID: &str = "Id";
const AMOUNT: &str = "Amount";
const CARD: &str = "Card Number";
const NAME: &str = "Name";
const DATE: &str = "Date";

/// Value after `<label>:` on the first line starting with the label
fn field<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| {
        let rest = line.strip_prefix(label)?;
        let value = rest.trim_start().strip_prefix(':')?;
        Some(value.trim())
    })
}

/// Leading decimal digits of `raw` (`"790 USD"` -> 790)
fn leading_amount(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Parse the confirmation text, logging each defaulted field at `warn`
#[must_use]
pub fn parse_confirmation(text: &str) -> ParsedConfirmation {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut warnings = Vec::new();

    let mut text_field = |label: &str| match field(&lines, label) {
        Some(value) if !value.is_empty() => value.to_string(),
        Some(_) => {
            warnings.push(ParseWarning {
                field: label.to_string(),
                kind: ParseWarningKind::Malformed(String::new()),
            });
            String::new()
        }
        None => {
            warnings.push(ParseWarning {
                field: label.to_string(),
                kind: ParseWarningKind::Missing,
            });
            String::new()
        }
    };

    let order_id = text_field(ID);
    let card_number = text_field(CARD);
    let name = text_field(NAME);
    let date = text_field(DATE);

    let amount = match field(&lines, AMOUNT) {
        Some(raw) => leading_amount(raw).unwrap_or_else(|| {
            warnings.push(ParseWarning {
                field: AMOUNT.to_string(),
                kind: ParseWarningKind::Malformed(raw.to_string()),
            });
            0
        }),
        None => {
            warnings.push(ParseWarning {
                field: AMOUNT.to_string(),
                kind: ParseWarningKind::Missing,
            });
            0
        }
    };

    for warning in &warnings {
        warn!(%warning, "order confirmation parsed with defaults");
    }

    ParsedConfirmation {
        order: OrderConfirmation {
            order_id,
            amount,
            card_number,
            name,
            date,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FULL: &str = "Id: 8362419\nAmount: 790 USD\nCard Number: 4111111111111111\nName: Alice\nDate: 19/9/2026";

    mod parse_tests {
        use super::*;

        #[test]
        fn test_full_message() {
            let parsed = parse_confirmation(FULL);
            assert!(parsed.is_complete());
            assert_eq!(parsed.order.order_id, "8362419");
            assert_eq!(parsed.order.amount, 790);
            assert_eq!(parsed.order.card_number, "4111111111111111");
            assert_eq!(parsed.order.name, "Alice");
            assert_eq!(parsed.order.date, "19/9/2026");
        }

        #[test]
        fn test_missing_field_defaults_without_masking_others() {
            let parsed = parse_confirmation("Id: 1\nCard Number: 42\nName: Bob\nDate: 1/1/2030");
            assert_eq!(parsed.order.amount, 0);
            assert_eq!(parsed.order.name, "Bob");
            assert_eq!(
                parsed.warnings,
                vec![ParseWarning {
                    field: "Amount".to_string(),
                    kind: ParseWarningKind::Missing,
                }]
            );
        }

        #[test]
        fn test_malformed_amount() {
            let parsed = parse_confirmation("Id: 1\nAmount: USD\nCard Number: 1\nName: A\nDate: d");
            assert_eq!(parsed.order.amount, 0);
            assert_eq!(parsed.warnings.len(), 1);
            assert_eq!(
                parsed.warnings[0].to_string(),
                "confirmation field 'Amount' malformed: \"USD\""
            );
        }

        #[test]
        fn test_card_line_does_not_satisfy_name() {
            let parsed = parse_confirmation("Card Number: 4111");
            assert_eq!(parsed.order.card_number, "4111");
            assert!(parsed.order.name.is_empty());
            assert_eq!(parsed.warnings.len(), 4);
        }

        #[test]
        fn test_value_keeps_inner_colons_and_padding() {
            let parsed = parse_confirmation("  Id : 7\n Date: 12:30 1/1/2030 \n");
            assert_eq!(parsed.order.order_id, "7");
            assert_eq!(parsed.order.date, "12:30 1/1/2030");
        }

        #[test]
        fn test_empty_text_warns_for_every_field() {
            let parsed = parse_confirmation("");
            assert_eq!(parsed.order, OrderConfirmation::default());
            assert_eq!(parsed.warnings.len(), 5);
        }
    }

    proptest! {
        #[test]
        fn prop_rendered_fields_parse_back(
            id in "[0-9]{1,9}",
            amount in 0u64..1_000_000,
            card in "[0-9]{12,19}",
            name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
        ) {
            let text = format!("Id: {id}\nAmount: {amount} USD\nCard Number: {card}\nName: {name}\nDate: 1/2/2030");
            let parsed = parse_confirmation(&text);
            prop_assert!(parsed.is_complete());
            prop_assert_eq!(parsed.order.order_id, id);
            prop_assert_eq!(parsed.order.amount, amount);
            prop_assert_eq!(parsed.order.card_number, card);
            prop_assert_eq!(parsed.order.name, name);
        }

        #[test]
        fn prop_never_panics(text in ".{0,200}") {
            let parsed = parse_confirmation(&text);
            prop_assert!(parsed.warnings.len() <= 5);
        }
    }
}

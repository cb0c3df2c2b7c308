use std::fmt;

use csv::StringRecord;
use serde::{Serialize, Serializer};

/// Column order of a ledger file. Snapshots append `capturedAt` after these.
pub const LEDGER_COLUMNS: [&str; 6] = [
    "name",
    "title",
    "imageRef",
    "description",
    "quantity",
    "price",
];

/// Literal stored in the description column of items that use the configured
/// default description. Expanded against live settings at load time, so a
/// later change to the configured text applies retroactively to every item
/// still carrying the placeholder.
pub const DEFAULT_DESCRIPTION_PLACEHOLDER: &str = "DEFAULT";

/// Fixed-point price in integer cents.
///
/// Serialized with exactly two fractional digits and `.` as the separator.
/// Parsing accepts both `.` and `,`; anything malformed degrades to zero —
/// the ledger is hand-edited by non-programmers and a bad price must never
/// fail the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price {
    cents: i64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    pub fn from_cents(cents: i64) -> Price {
        Price { cents }
    }

    pub fn cents(self) -> i64 {
        self.cents
    }

    /// Lenient decimal parse, `,` normalized to `.`, zero on any failure.
    /// A third fractional digit rounds half-up; further digits are dropped.
    pub fn parse_or_zero(raw: &str) -> Price {
        let text = raw.trim().replace(',', ".");
        if text.is_empty() {
            return Price::ZERO;
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };

        let (whole_text, frac_text) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        if whole_text.is_empty() && frac_text.is_empty() {
            return Price::ZERO;
        }
        if !whole_text.bytes().all(|b| b.is_ascii_digit())
            || !frac_text.bytes().all(|b| b.is_ascii_digit())
        {
            return Price::ZERO;
        }

        let whole: i64 = if whole_text.is_empty() {
            0
        } else {
            match whole_text.parse() {
                Ok(value) => value,
                Err(_) => return Price::ZERO,
            }
        };

        let mut frac_digits = frac_text.bytes().map(|b| i64::from(b - b'0'));
        let mut frac = frac_digits.next().unwrap_or(0) * 10 + frac_digits.next().unwrap_or(0);
        if frac_digits.next().is_some_and(|third| third >= 5) {
            frac += 1;
        }

        let cents = match whole.checked_mul(100).and_then(|c| c.checked_add(frac)) {
            Some(value) => value,
            None => return Price::ZERO,
        };

        Price {
            cents: if negative { -cents } else { cents },
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One sellable line of a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub name: String,
    pub title: String,
    pub image_ref: String,
    pub description: String,
    pub quantity: u64,
    pub price: Price,
    pub is_description_default: bool,
}

impl ItemRecord {
    /// Builds a record from one CSV row, matching fields by header name.
    ///
    /// All string fields are trimmed. Quantity falls back to 0 and price to
    /// 0.00 on malformed input; this never fails. The `DEFAULT` description
    /// placeholder is NOT resolved here — that needs the live settings and
    /// belongs to ledger loading.
    pub fn from_csv_row(headers: &StringRecord, row: &StringRecord) -> ItemRecord {
        ItemRecord {
            name: field(headers, row, "name").to_string(),
            title: field(headers, row, "title").to_string(),
            image_ref: field(headers, row, "imageRef").to_string(),
            description: field(headers, row, "description").to_string(),
            quantity: field(headers, row, "quantity").parse().unwrap_or(0),
            price: Price::parse_or_zero(field(headers, row, "price")),
            is_description_default: false,
        }
    }

    /// Inverse of `from_csv_row`, in `LEDGER_COLUMNS` order.
    ///
    /// Items flagged as using the default description emit the literal
    /// placeholder regardless of the in-memory text, so the row stays tied
    /// to whatever default is configured at the next load.
    pub fn to_csv_row(&self) -> [String; 6] {
        let description = if self.is_description_default {
            DEFAULT_DESCRIPTION_PLACEHOLDER.to_string()
        } else {
            self.description.clone()
        };

        [
            self.name.clone(),
            self.title.clone(),
            self.image_ref.clone(),
            description,
            self.quantity.to_string(),
            self.price.to_string(),
        ]
    }

    /// The pair that decides whether two rows are the same sellable item.
    /// Case-insensitive on both name and title.
    pub fn identity_key(&self) -> (String, String) {
        (
            self.name.trim().to_lowercase(),
            self.title.trim().to_lowercase(),
        )
    }
}

/// Value of the column named `name`, trimmed; empty when the column is
/// absent or the row is short.
fn field<'a>(headers: &StringRecord, row: &'a StringRecord, name: &str) -> &'a str {
    headers
        .iter()
        .position(|header| header == name)
        .and_then(|idx| row.get(idx))
        .unwrap_or("")
        .trim()
}

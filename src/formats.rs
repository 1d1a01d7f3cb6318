//! Built-in string formats.
//!
//! [`Format`] is the closed table of named checks shipped with the crate.
//! `url` lives in the extension table of a fresh [`Registry`](crate::Registry)
//! and is only consulted when format extensions are enabled; every other
//! entry is a plain built-in.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Attribute, ValidationError, ValidationResult};
use crate::path::JsonPath;

/// Letter ranges beyond ASCII accepted in mail and URL labels.
const UCS: &str = r"\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";

fn with_ucs(pattern: &str) -> String {
    pattern.replace("UCS", UCS)
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&with_ucs(concat!(
        r"(?i)^((([a-z]|\d|[!#$%&'*+\-/=?^_`{|}~]|[UCS])+(\.([a-z]|\d|[!#$%&'*+\-/=?^_`{|}~]|[UCS])+)*)",
        r"|((\x22)((((\x20|\x09)*(\x0d\x0a))?(\x20|\x09)+)?(([\x01-\x08\x0b\x0c\x0e-\x1f\x7f]|\x21|[\x23-\x5b]|[\x5d-\x7e]|[UCS])",
        r"|(\\([\x01-\x09\x0b\x0c\x0d-\x7f]|[UCS]))))*(((\x20|\x09)*(\x0d\x0a))?(\x20|\x09)+)?(\x22)))",
        r"@((([a-z]|\d|[UCS])|(([a-z]|\d|[UCS])([a-z]|\d|-|\.|_|~|[UCS])*([a-z]|\d|[UCS])))\.)+",
        r"(([a-z]|[UCS])|(([a-z]|[UCS])([a-z]|\d|-|\.|_|~|[UCS])*([a-z]|[UCS])))\.?$",
    )))
    .unwrap()
});

static IP_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)",
        r"\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    ))
    .unwrap()
});

static IPV6_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}$").unwrap());

static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:.\d{1,3})?Z$").unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());

// The alternation is deliberately unanchored past the first branch.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^#[a-z0-9]{6}|#[a-z0-9]{3}",
        r"|(?:rgb\(\s*(?:[+-]?\d+%?)\s*,\s*(?:[+-]?\d+%?)\s*,\s*(?:[+-]?\d+%?)\s*\))aqua",
        r"|black|blue|fuchsia|gray|green|lime|maroon|navy|olive|orange|purple|red|silver|teal|white|yellow$",
    ))
    .unwrap()
});

static HOST_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([a-zA-Z]|[a-zA-Z][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)*([A-Za-z]|[A-Za-z][A-Za-z0-9\-]*[A-Za-z0-9])",
    )
    .unwrap()
});

static MONGO_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}$").unwrap()
});

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?\d+\.\d+$").unwrap());

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&with_ucs(concat!(
        r"(?i)^(https?|ftp|git)://(((([a-z]|\d|-|\.|_|~|[UCS])|(%[\da-f]{2})|[!$&'()*+,;=]|:)*@)?",
        r"(((\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5])\.(\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5])",
        r"\.(\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5])\.(\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5]))",
        r"|((([a-z]|\d|[UCS])|(([a-z]|\d|[UCS])([a-z]|\d|-|\.|_|~|[UCS])*([a-z]|\d|[UCS])))\.)+",
        r"(([a-z]|[UCS])|(([a-z]|[UCS])([a-z]|\d|-|\.|_|~|[UCS])*([a-z]|[UCS])))\.?)(:\d*)?)",
        r"(/((([a-z]|\d|-|\.|_|~|[UCS])|(%[\da-f]{2})|[!$&'()*+,;=]|:|@)+",
        r"(/(([a-z]|\d|-|\.|_|~|[UCS])|(%[\da-f]{2})|[!$&'()*+,;=]|:|@)*)*)?)?",
        r"(\?((([a-z]|\d|-|\.|_|~|[UCS])|(%[\da-f]{2})|[!$&'()*+,;=]|:|@)|[\x{E000}-\x{F8FF}]|/|\?)*)?",
        r"(#((([a-z]|\d|-|\.|_|~|[UCS])|(%[\da-f]{2})|[!$&'()*+,;=]|:|@)|/|\?)*)?$",
    )))
    .unwrap()
});

/// A built-in named format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Email,
    IpAddress,
    Ipv6,
    DateTime,
    Date,
    Time,
    Color,
    HostName,
    UtcMillisec,
    Regex,
    MongoId,
    Uuid,
    NumberFloat,
    Float,
    Integer,
    Empty,
    Url,
}

impl Format {
    /// Resolves a lower-cased format name.
    pub fn from_name(name: &str) -> Option<Self> {
        let format = match name {
            "email" => Format::Email,
            "ip-address" => Format::IpAddress,
            "ipv6" => Format::Ipv6,
            "date-time" => Format::DateTime,
            "date" => Format::Date,
            "time" => Format::Time,
            "color" => Format::Color,
            "host-name" => Format::HostName,
            "utc-millisec" => Format::UtcMillisec,
            "regex" => Format::Regex,
            "mongo-id" => Format::MongoId,
            "uuid" => Format::Uuid,
            "number-float" => Format::NumberFloat,
            "float" => Format::Float,
            "integer" => Format::Integer,
            "empty" => Format::Empty,
            "url" => Format::Url,
            _ => return None,
        };
        Some(format)
    }

    /// Returns the format's name as written in schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::IpAddress => "ip-address",
            Format::Ipv6 => "ipv6",
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Time => "time",
            Format::Color => "color",
            Format::HostName => "host-name",
            Format::UtcMillisec => "utc-millisec",
            Format::Regex => "regex",
            Format::MongoId => "mongo-id",
            Format::Uuid => "uuid",
            Format::NumberFloat => "number-float",
            Format::Float => "float",
            Format::Integer => "integer",
            Format::Empty => "empty",
            Format::Url => "url",
        }
    }

    /// True for formats seeded into the extension table rather than the
    /// built-in table.
    pub fn is_extension(&self) -> bool {
        matches!(self, Format::Url)
    }

    /// Tests a string.
    pub fn matches_str(&self, s: &str) -> bool {
        match self {
            Format::Email => EMAIL_RE.is_match(s),
            Format::IpAddress => IP_ADDRESS_RE.is_match(s),
            Format::Ipv6 => IPV6_RE.is_match(s),
            Format::DateTime => DATE_TIME_RE.is_match(s),
            Format::Date => DATE_RE.is_match(s),
            Format::Time => TIME_RE.is_match(s),
            Format::Color => COLOR_RE.is_match(s),
            Format::HostName => HOST_NAME_RE.is_match(s),
            Format::UtcMillisec => false,
            Format::Regex => Regex::new(s).is_ok(),
            Format::MongoId => MONGO_ID_RE.is_match(s),
            Format::Uuid => UUID_RE.is_match(s),
            Format::NumberFloat | Format::Float => FLOAT_RE.is_match(s),
            Format::Integer => INTEGER_RE.is_match(s),
            Format::Empty => s.is_empty(),
            Format::Url => URL_RE.is_match(s),
        }
    }

    /// Tests any value. Only `utc-millisec` accepts non-strings (numbers >= 0).
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Format::UtcMillisec, Value::Number(n)) => n.as_f64().is_some_and(|f| f >= 0.0),
            (Format::Regex, value) => {
                value.as_str().is_some_and(|s| self.matches_str(s))
                    || matches!(
                        crate::types::ForeignValue::detect(value),
                        Some(crate::types::ForeignValue::RegExp(_))
                    )
            }
            (_, Value::String(s)) => self.matches_str(s),
            _ => false,
        }
    }

    /// Single-value check returning a `{valid, errors}` result.
    pub fn check(&self, value: &Value) -> ValidationResult {
        if self.matches(value) {
            return ValidationResult::ok();
        }
        ValidationResult::single(
            ValidationError::new(Attribute::Format.as_str(), JsonPath::root())
                .with_expected(Value::String(self.as_str().to_string()))
                .with_actual(value.clone())
                .with_message(format!("is not a valid {}", self.as_str())),
        )
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! format_checks {
    ($($fn_name:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Checks a single value against the `", stringify!($variant), "` format.")]
            pub fn $fn_name(value: &Value) -> ValidationResult {
                Format::$variant.check(value)
            }
        )*
    };
}

format_checks! {
    email => Email,
    ip_address => IpAddress,
    ipv6 => Ipv6,
    date_time => DateTime,
    date => Date,
    time => Time,
    color => Color,
    host_name => HostName,
    utc_millisec => UtcMillisec,
    regex => Regex,
    url => Url,
    mongo_id => MongoId,
    uuid => Uuid,
    number_float => NumberFloat,
    float => Float,
    integer => Integer,
    empty => Empty,
}

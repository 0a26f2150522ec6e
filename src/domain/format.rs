//! Number format templates.
//!
//! A template wraps one printf-style placeholder in literal text, e.g.
//! `%04d`, `No. %d` or `INV-%s`. Placeholders follow the rules of the
//! generation backend's `%` operator: decimal, octal and hex conversions,
//! `s`/`r`/`a` for the decimal as text, the `-+ 0#` flags, width,
//! precision and an ignored `h`/`l`/`L` length modifier. Templates the
//! backend would reject fall back to the plain decimal representation.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Largest accepted width or precision.
pub const MAX_FIELD: usize = 1024;

/// Why a template cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("template has no numeric placeholder")]
    MissingPlaceholder,

    #[error("template has {0} numeric placeholders, expected exactly one")]
    TooManyPlaceholders(usize),

    #[error("unsupported conversion '%{0}'")]
    UnsupportedConversion(String),

    #[error("incomplete format directive at byte {0}")]
    Dangling(usize),

    #[error("{field} exceeds the limit of {limit}")]
    FieldTooLarge { field: &'static str, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sign {
    #[default]
    NegativeOnly,
    Always,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Conversion {
    #[default]
    Decimal,
    Octal,
    Hex,
    UpperHex,
    Text,
}

impl Conversion {
    fn from_char(conv: &str) -> Option<Self> {
        match conv {
            "d" | "i" | "u" => Some(Self::Decimal),
            "o" => Some(Self::Octal),
            "x" => Some(Self::Hex),
            "X" => Some(Self::UpperHex),
            "s" | "r" | "a" => Some(Self::Text),
            _ => None,
        }
    }

    fn digits(self, magnitude: u64) -> String {
        match self {
            Self::Octal => format!("{:o}", magnitude),
            Self::Hex => format!("{:x}", magnitude),
            Self::UpperHex => format!("{:X}", magnitude),
            Self::Decimal | Self::Text => magnitude.to_string(),
        }
    }

    fn alternate_prefix(self) -> &'static str {
        match self {
            Self::Octal => "0o",
            Self::Hex => "0x",
            Self::UpperHex => "0X",
            Self::Decimal | Self::Text => "",
        }
    }
}

/// Parsed `%[flags][width][.precision][hlL]conv` directive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Placeholder {
    left_align: bool,
    zero_pad: bool,
    alternate: bool,
    sign: Sign,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl Placeholder {
    fn render(&self, value: i64) -> String {
        if self.conversion == Conversion::Text {
            let mut text = value.to_string();
            if let Some(precision) = self.precision {
                text.truncate(precision);
            }
            return self.pad(String::new(), text, false);
        }

        let mut digits = self.conversion.digits(value.unsigned_abs());
        if let Some(precision) = self.precision {
            if digits.len() < precision {
                digits.insert_str(0, &"0".repeat(precision - digits.len()));
            }
        }

        let mut lead = match (value < 0, self.sign) {
            (true, _) => "-",
            (false, Sign::Always) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::NegativeOnly) => "",
        }
        .to_string();
        if self.alternate {
            lead.push_str(self.conversion.alternate_prefix());
        }
        self.pad(lead, digits, self.zero_pad)
    }

    /// Pads `lead + body` to the field width. Zero fill goes between the
    /// sign/radix prefix and the digits.
    fn pad(&self, lead: String, body: String, zero_fill: bool) -> String {
        let len = lead.len() + body.len();
        if len >= self.width {
            return lead + &body;
        }

        let fill = self.width - len;
        if self.left_align {
            format!("{}{}{}", lead, body, " ".repeat(fill))
        } else if zero_fill {
            format!("{}{}{}", lead, "0".repeat(fill), body)
        } else {
            format!("{}{}{}", " ".repeat(fill), lead, body)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    head: String,
    placeholder: Placeholder,
    tail: String,
}

fn directive() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"%(?:(?P<percent>%)|(?P<flags>[-+ 0#]*)(?P<width>\d*)(?:\.(?P<precision>\d*))?[hlL]?(?P<conv>[A-Za-z]))",
        )
        .expect("Valid format directive regex")
    });
    &PATTERN
}

/// Appends a literal run, failing on a stray `%` the directive regex skipped.
fn push_literal(out: &mut String, literal: &str, offset: usize) -> Result<(), FormatError> {
    if let Some(pos) = literal.find('%') {
        return Err(FormatError::Dangling(offset + pos));
    }
    out.push_str(literal);
    Ok(())
}

/// Parses a width or precision, empty meaning zero.
fn parse_field(digits: &str, field: &'static str) -> Result<usize, FormatError> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|n| *n <= MAX_FIELD)
        .ok_or(FormatError::FieldTooLarge {
            field,
            limit: MAX_FIELD,
        })
}

fn parse_template(raw: &str) -> Result<Template, FormatError> {
    let mut head = String::new();
    let mut tail = String::new();
    let mut placeholder: Option<Placeholder> = None;
    let mut placeholders = 0usize;
    let mut cursor = 0usize;

    for caps in directive().captures_iter(raw) {
        let whole = caps.get(0).expect("capture group 0 always present");
        let out = if placeholder.is_some() { &mut tail } else { &mut head };
        push_literal(out, &raw[cursor..whole.start()], cursor)?;
        cursor = whole.end();

        if caps.name("percent").is_some() {
            out.push('%');
            continue;
        }

        let conv = caps.name("conv").map(|m| m.as_str()).unwrap_or_default();
        let conversion = Conversion::from_char(conv)
            .ok_or_else(|| FormatError::UnsupportedConversion(conv.to_string()))?;

        placeholders += 1;
        if placeholders > 1 {
            continue;
        }

        let flags = caps.name("flags").map(|m| m.as_str()).unwrap_or_default();
        let sign = if flags.contains('+') {
            Sign::Always
        } else if flags.contains(' ') {
            Sign::Space
        } else {
            Sign::NegativeOnly
        };
        let width = parse_field(
            caps.name("width").map(|m| m.as_str()).unwrap_or_default(),
            "width",
        )?;
        let precision = caps
            .name("precision")
            .map(|m| parse_field(m.as_str(), "precision"))
            .transpose()?;

        placeholder = Some(Placeholder {
            left_align: flags.contains('-'),
            zero_pad: flags.contains('0'),
            alternate: flags.contains('#'),
            sign,
            width,
            precision,
            conversion,
        });
    }

    let out = if placeholder.is_some() { &mut tail } else { &mut head };
    push_literal(out, &raw[cursor..], cursor)?;

    match (placeholder, placeholders) {
        (Some(placeholder), 1) => Ok(Template {
            head,
            placeholder,
            tail,
        }),
        (None, _) => Err(FormatError::MissingPlaceholder),
        (_, n) => Err(FormatError::TooManyPlaceholders(n)),
    }
}

/// A user-supplied number format such as `%04d`.
///
/// Construction never fails; an unusable template is remembered together
/// with the reason and renders values as plain decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    raw: String,
    parsed: Result<Template, FormatError>,
}

impl NumberFormat {
    /// Parses a template.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_template(&raw);
        Self { raw, parsed }
    }

    /// The template exactly as the user typed it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if values will be substituted into the template.
    pub fn is_usable(&self) -> bool {
        self.parsed.is_ok()
    }

    /// The reason the template falls back to plain decimals, if it does.
    pub fn error(&self) -> Option<&FormatError> {
        self.parsed.as_ref().err()
    }

    /// Renders `value` through the template.
    pub fn apply(&self, value: i64) -> String {
        match &self.parsed {
            Ok(template) => format!(
                "{}{}{}",
                template.head,
                template.placeholder.render(value),
                template.tail
            ),
            Err(_) => value.to_string(),
        }
    }
}

/// Textualizes a numeric value with an optional format.
pub fn textualize(value: i64, format: Option<&NumberFormat>) -> String {
    format.map_or_else(|| value.to_string(), |f| f.apply(value))
}

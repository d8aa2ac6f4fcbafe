//! Output formats for log records
//!
//! A format descriptor is either a preset name or a template:
//! - `json`: one JSON object per line
//! - `logfmt`: key=value pairs
//! - anything else: a template of literal text and `%{verb}` or
//!   `%{verb:arg}` directives
//!
//! Template verbs are `color`, `id`, `level`, `message`, `module`, `caller`
//! and `time`. `color` takes no argument (level color), `bold` or `reset`.
//! `time` takes a preset name or a strftime string. `id` takes an integer
//! verb such as `03x`; the others take a string verb such as `.4s` or `-8s`.

use super::error::{LoggerError, Result};
use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::{epoch_seconds, TimestampFormat};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::str::FromStr;

/// Format used when a configuration names none
pub const DEFAULT_FORMAT: &str =
    "%{color}%{time} [%{module}] %{caller} -> %{level:.4s} %{id:03x}%{color:reset} %{message}";

static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\{([a-z]+)(?::(.*?))?\}").expect("directive pattern compiles"));
static STRING_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-)?(\d+)?(?:\.(\d+))?s$").expect("string verb pattern compiles"));
static INTEGER_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0)?(\d+)?([dx])$").expect("integer verb pattern compiles"));

/// Output format for log records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `{"level":"info","ts":1736332245.123,"name":"ledger","caller":"src/main.rs:10","msg":"started"}`
    Json,

    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO module=ledger message="started"`
    Logfmt,

    /// Parsed `%{...}` template
    Template(Template),
}

impl Default for OutputFormat {
    fn default() -> Self {
        // DEFAULT_FORMAT is covered by the format tests
        OutputFormat::parse(DEFAULT_FORMAT).unwrap_or(OutputFormat::Logfmt)
    }
}

impl OutputFormat {
    /// Parse a format descriptor
    pub fn parse(descriptor: &str) -> Result<Self> {
        match descriptor {
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            template => Template::parse(template).map(OutputFormat::Template),
        }
    }

    /// Render a record, including the trailing newline
    pub fn format(&self, entry: &LogEntry) -> String {
        let mut line = match self {
            OutputFormat::Json => format_json(entry),
            OutputFormat::Logfmt => format_logfmt(entry),
            OutputFormat::Template(template) => template.render(entry),
        };
        line.push('\n');
        line
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorOption {
    Level,
    Bold,
    Reset,
}

/// Width or precision in capture group `i`, at most `u16::MAX`
fn verb_number(caps: &Captures<'_>, i: usize, verb: &str, arg: &str) -> Result<Option<usize>> {
    caps.get(i)
        .map(|m| {
            m.as_str()
                .parse::<u16>()
                .map(usize::from)
                .map_err(|_| LoggerError::format_verb(verb, arg))
        })
        .transpose()
}

/// printf-style `%[-][width][.precision]s`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StringVerb {
    left_align: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl StringVerb {
    fn parse(verb: &str, arg: &str) -> Result<Self> {
        if arg.is_empty() {
            return Ok(Self::default());
        }
        let caps = STRING_VERB
            .captures(arg)
            .ok_or_else(|| LoggerError::format_verb(verb, arg))?;
        Ok(Self {
            left_align: caps.get(1).is_some(),
            width: verb_number(&caps, 2, verb, arg)?,
            precision: verb_number(&caps, 3, verb, arg)?,
        })
    }

    fn apply(&self, value: &str, out: &mut String) {
        let value: String = match self.precision {
            Some(precision) => value.chars().take(precision).collect(),
            None => value.to_string(),
        };
        let width = self.width.unwrap_or(0);
        if self.left_align {
            out.push_str(&format!("{:<width$}", value, width = width));
        } else {
            out.push_str(&format!("{:>width$}", value, width = width));
        }
    }
}

/// printf-style `%[0][width](d|x)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IntegerVerb {
    zero_pad: bool,
    width: usize,
    hex: bool,
}

impl IntegerVerb {
    fn parse(arg: &str) -> Result<Self> {
        if arg.is_empty() {
            return Ok(Self::default());
        }
        let caps = INTEGER_VERB
            .captures(arg)
            .ok_or_else(|| LoggerError::format_verb("id", arg))?;
        Ok(Self {
            zero_pad: caps.get(1).is_some(),
            width: verb_number(&caps, 2, "id", arg)?.unwrap_or(0),
            hex: caps.get(3).map(|m| m.as_str()) == Some("x"),
        })
    }

    fn apply(&self, value: u64, out: &mut String) {
        let width = self.width;
        let rendered = match (self.hex, self.zero_pad) {
            (true, true) => format!("{:0width$x}", value, width = width),
            (true, false) => format!("{:width$x}", value, width = width),
            (false, true) => format!("{:0width$}", value, width = width),
            (false, false) => format!("{:width$}", value, width = width),
        };
        out.push_str(&rendered);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Literal(String),
    Color(ColorOption),
    Id(IntegerVerb),
    Level(StringVerb),
    Message(StringVerb),
    Module(StringVerb),
    Caller(StringVerb),
    Time(TimestampFormat),
}

/// A compiled format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    directives: Vec<Directive>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self> {
        let mut directives = Vec::new();
        let mut cursor = 0;

        for caps in DIRECTIVE.captures_iter(template) {
            let whole = caps.get(0).expect("group 0 is the whole match");
            if whole.start() > cursor {
                directives.push(Directive::Literal(template[cursor..whole.start()].to_string()));
            }
            cursor = whole.end();

            let verb = &caps[1];
            let arg = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            directives.push(Self::directive(verb, arg)?);
        }

        if cursor < template.len() {
            directives.push(Directive::Literal(template[cursor..].to_string()));
        }

        Ok(Self { directives })
    }

    fn directive(verb: &str, arg: &str) -> Result<Directive> {
        let directive = match verb {
            "color" => Directive::Color(match arg {
                "" => ColorOption::Level,
                "bold" => ColorOption::Bold,
                "reset" => ColorOption::Reset,
                other => return Err(LoggerError::color_option(other)),
            }),
            "id" => Directive::Id(IntegerVerb::parse(arg)?),
            "level" => Directive::Level(StringVerb::parse(verb, arg)?),
            "message" => Directive::Message(StringVerb::parse(verb, arg)?),
            "module" => Directive::Module(StringVerb::parse(verb, arg)?),
            "caller" => Directive::Caller(StringVerb::parse(verb, arg)?),
            "time" => Directive::Time(TimestampFormat::from_directive(arg)),
            other => return Err(LoggerError::UnknownDirective(other.to_string())),
        };
        Ok(directive)
    }

    /// Render without the trailing newline
    pub fn render(&self, entry: &LogEntry) -> String {
        let mut out = String::with_capacity(64 + entry.message.len());

        for directive in &self.directives {
            match directive {
                Directive::Literal(text) => out.push_str(text),
                Directive::Color(ColorOption::Level) => {
                    out.push_str("\x1b[");
                    out.push_str(&entry.level.color_code().to_fg_str());
                    out.push('m');
                }
                Directive::Color(ColorOption::Bold) => out.push_str("\x1b[1m"),
                Directive::Color(ColorOption::Reset) => out.push_str("\x1b[0m"),
                Directive::Id(verb) => verb.apply(entry.sequence, &mut out),
                Directive::Level(verb) => verb.apply(entry.level.to_str(), &mut out),
                Directive::Message(verb) => verb.apply(&entry.message, &mut out),
                Directive::Module(verb) => verb.apply(&entry.module, &mut out),
                Directive::Caller(verb) => {
                    verb.apply(entry.caller().as_deref().unwrap_or("?"), &mut out)
                }
                Directive::Time(format) => out.push_str(&format.format(&entry.timestamp)),
            }
        }

        if !entry.context.is_empty() {
            out.push(' ');
            out.push_str(&entry.context.format_fields());
        }

        out
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    level: &'static str,
    ts: f64,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    msg: &'a str,
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

fn format_json(entry: &LogEntry) -> String {
    let record = JsonRecord {
        level: entry.level.as_lowercase(),
        ts: epoch_seconds(&entry.timestamp),
        name: &entry.module,
        caller: entry.caller(),
        msg: &entry.message,
        fields: entry
            .context
            .fields()
            .map(|(k, v)| (k.to_string(), v.to_json_value()))
            .collect(),
    };

    serde_json::to_string(&record).unwrap_or_default()
}

fn format_logfmt(entry: &LogEntry) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            TimestampFormat::Iso8601.format(&entry.timestamp)
        ),
        format!("level={}", entry.level.to_str()),
        format!("module={}", escape_logfmt_value(&entry.module)),
        format!("message={}", quote_logfmt_value(&entry.message)),
    ];

    if let Some(caller) = entry.caller() {
        parts.push(format!("caller={}", escape_logfmt_value(&caller)));
    }

    for (key, value) in entry.context.fields() {
        let formatted_value = match value {
            FieldValue::String(s) => quote_logfmt_value(s),
            other => other.to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
    }

    parts.join(" ")
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Escape a logfmt value (quote if contains spaces)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

use super::error::RepresentationError;
use super::message::Message;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// How strictly a raw payload is checked against a representation's schema.
///
/// The default is strict: keys a representation does not declare are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Reject keys the representation does not declare.
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions::strict()
    }
}

impl ResolveOptions {
    pub fn strict() -> ResolveOptions {
        ResolveOptions { strict: true }
    }

    /// Ignore undeclared keys instead of rejecting them.
    pub fn lenient() -> ResolveOptions {
        ResolveOptions { strict: false }
    }
}

/// A value of a representation's normalized mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Json(Value),
    DateTime(DateTime<Utc>),
    Message(Box<Message>),
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::Json(value)
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn as_object<'a>(
    representation: &'static str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, RepresentationError> {
    match value.as_object() {
        Some(obj) => Ok(obj),
        None => Err(RepresentationError::NotAnObject {
            representation,
            found: type_name(value),
        }),
    }
}

/// Parses a Slack message timestamp ("1403051575.000407") into a date/time.
pub(crate) fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = match ts.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (ts, ""),
    };
    if secs.is_empty()
        || frac.len() > 9
        || !secs.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let secs: i64 = secs.parse().ok()?;
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{:0<9}", frac).parse().ok()?
    };
    Utc.timestamp_opt(secs, nanos).single()
}

// Offset-less date/times, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_datetime_str(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty timestamp".to_owned());
    }

    // "@<secs>" is an explicit epoch timestamp.
    if let Some(epoch) = raw.strip_prefix('@') {
        return parse_slack_ts(epoch).ok_or_else(|| format!("invalid epoch timestamp {:?}", epoch));
    }

    let rfc3339_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => return Ok(date.with_timezone(&Utc)),
        Err(err) => err,
    };

    // Bare digits are only epoch seconds in Slack's "<secs>.<fraction>" shape,
    // so a lone year such as "2015" is not mistaken for one.
    if raw.contains('.') {
        if let Some(date) = parse_slack_ts(raw) {
            return Ok(date);
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(rfc3339_err.to_string())
}

/// Schema checks over one borrowed raw payload.
pub(crate) struct Resolver<'a> {
    representation: &'static str,
    raw: &'a Map<String, Value>,
}

impl<'a> Resolver<'a> {
    pub fn new(representation: &'static str, raw: &'a Map<String, Value>) -> Resolver<'a> {
        Resolver { representation, raw }
    }

    pub fn check_keys(
        &self,
        required: &[&'static str],
        optional: &[&'static str],
        options: &ResolveOptions,
    ) -> Result<(), RepresentationError> {
        for key in required {
            if !self.raw.contains_key(*key) {
                return Err(RepresentationError::MissingField {
                    representation: self.representation,
                    key: *key,
                });
            }
        }

        for key in self.raw.keys() {
            let declared = required
                .iter()
                .chain(optional.iter())
                .any(|k| *k == key.as_str());
            if declared {
                continue;
            }
            if options.strict {
                return Err(RepresentationError::UnknownField {
                    representation: self.representation,
                    key: key.clone(),
                });
            }
            debug!("{}: ignoring undeclared field '{}'", self.representation, key);
        }

        Ok(())
    }

    fn mismatch(&self, key: &'static str, expected: &'static str, value: &Value) -> RepresentationError {
        RepresentationError::TypeMismatch {
            representation: self.representation,
            key,
            expected,
            found: type_name(value),
        }
    }

    pub fn value(&self, key: &'static str) -> Result<&'a Value, RepresentationError> {
        match self.raw.get(key) {
            Some(v) => Ok(v),
            None => Err(RepresentationError::MissingField {
                representation: self.representation,
                key,
            }),
        }
    }

    pub fn string(&self, key: &'static str) -> Result<String, RepresentationError> {
        let value = self.value(key)?;
        match value.as_str() {
            Some(s) => Ok(s.to_owned()),
            None => Err(self.mismatch(key, "string", value)),
        }
    }

    pub fn optional_string(&self, key: &'static str) -> Result<Option<String>, RepresentationError> {
        if !self.raw.contains_key(key) {
            return Ok(None);
        }
        self.string(key).map(Some)
    }

    pub fn boolean(&self, key: &'static str) -> Result<bool, RepresentationError> {
        let value = self.value(key)?;
        match value.as_bool() {
            Some(b) => Ok(b),
            None => Err(self.mismatch(key, "boolean", value)),
        }
    }

    pub fn integer(&self, key: &'static str) -> Result<i64, RepresentationError> {
        let value = self.value(key)?;
        match value.as_i64() {
            Some(i) => Ok(i),
            None => Err(self.mismatch(key, "integer", value)),
        }
    }

    pub fn object_ref(&self, key: &'static str) -> Result<&'a Map<String, Value>, RepresentationError> {
        let value = self.value(key)?;
        match value.as_object() {
            Some(obj) => Ok(obj),
            None => Err(self.mismatch(key, "object", value)),
        }
    }

    pub fn object(&self, key: &'static str) -> Result<Map<String, Value>, RepresentationError> {
        self.object_ref(key).map(|obj| obj.to_owned())
    }

    pub fn optional_object(
        &self,
        key: &'static str,
    ) -> Result<Option<Map<String, Value>>, RepresentationError> {
        if !self.raw.contains_key(key) {
            return Ok(None);
        }
        self.object(key).map(Some)
    }

    pub fn string_list(&self, key: &'static str) -> Result<Vec<String>, RepresentationError> {
        let value = self.value(key)?;
        let items = match value.as_array() {
            Some(items) => items,
            None => return Err(self.mismatch(key, "array", value)),
        };
        items
            .iter()
            .map(|item| match item.as_str() {
                Some(s) => Ok(s.to_owned()),
                None => Err(self.mismatch(key, "array of strings", item)),
            })
            .collect()
    }

    pub fn optional_object_list(
        &self,
        key: &'static str,
    ) -> Result<Option<Vec<Map<String, Value>>>, RepresentationError> {
        let value = match self.raw.get(key) {
            Some(value) => value,
            None => return Ok(None),
        };
        let items = match value.as_array() {
            Some(items) => items,
            None => return Err(self.mismatch(key, "array", value)),
        };
        items
            .iter()
            .map(|item| match item.as_object() {
                Some(obj) => Ok(obj.to_owned()),
                None => Err(self.mismatch(key, "array of objects", item)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Type check for a date/time field: a string or an integer of unix seconds.
    pub fn timestamp(&self, key: &'static str) -> Result<&'a Value, RepresentationError> {
        let value = self.value(key)?;
        if value.is_string() || value.is_i64() {
            Ok(value)
        } else {
            Err(self.mismatch(key, "string or integer timestamp", value))
        }
    }

    /// Normalizes a value that already passed `timestamp`.
    pub fn normalize_datetime(
        &self,
        key: &'static str,
        value: &Value,
    ) -> Result<DateTime<Utc>, RepresentationError> {
        let parsed = match value {
            Value::String(s) => parse_datetime_str(s),
            Value::Number(n) => match n.as_i64() {
                Some(secs) => Utc
                    .timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| "timestamp out of range".to_owned()),
                None => return Err(self.mismatch(key, "string or integer timestamp", value)),
            },
            _ => return Err(self.mismatch(key, "string or integer timestamp", value)),
        };
        parsed.map_err(|reason| RepresentationError::Parse {
            representation: self.representation,
            key,
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            reason,
        })
    }
}

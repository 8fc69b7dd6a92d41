use super::error::RepresentationError;
use super::resolve::{self, ResolveOptions, ResolvedValue, Resolver};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const REQUIRED: &[&str] = &["type", "ts", "text"];
const OPTIONAL: &[&str] = &["user", "bot_id", "subtype", "channel", "edited", "attachments"];

/// A single message, as found in a channel's `latest` field.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    kind: String,
    ts: String,
    text: String,
    user: Option<String>,
    bot_id: Option<String>,
    subtype: Option<String>,
    channel: Option<String>,
    edited: Option<Map<String, Value>>,
    attachments: Option<Vec<Map<String, Value>>>,
}

impl Message {
    pub fn from_raw(raw: &Map<String, Value>) -> Result<Message, RepresentationError> {
        Self::from_raw_with(raw, &ResolveOptions::default())
    }

    pub fn from_raw_with(
        raw: &Map<String, Value>,
        options: &ResolveOptions,
    ) -> Result<Message, RepresentationError> {
        let resolver = Resolver::new("message", raw);
        resolver.check_keys(REQUIRED, OPTIONAL, options)?;

        Ok(Message {
            kind: resolver.string("type")?,
            ts: resolver.string("ts")?,
            text: resolver.string("text")?,
            user: resolver.optional_string("user")?,
            bot_id: resolver.optional_string("bot_id")?,
            subtype: resolver.optional_string("subtype")?,
            channel: resolver.optional_string("channel")?,
            edited: resolver.optional_object("edited")?,
            attachments: resolver.optional_object_list("attachments")?,
        })
    }

    pub fn from_value(value: &Value) -> Result<Message, RepresentationError> {
        Self::from_value_with(value, &ResolveOptions::default())
    }

    pub fn from_value_with(
        value: &Value,
        options: &ResolveOptions,
    ) -> Result<Message, RepresentationError> {
        Self::from_raw_with(resolve::as_object("message", value)?, options)
    }

    /// The event type, "message" for regular messages.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The Slack timestamp, unique per channel.
    pub fn ts(&self) -> &str {
        &self.ts
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The user id of the author. Bot messages may carry `bot_id` instead.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn bot_id(&self) -> Option<&str> {
        self.bot_id.as_deref()
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn edited(&self) -> Option<&Map<String, Value>> {
        self.edited.as_ref()
    }

    pub fn attachments(&self) -> &[Map<String, Value>] {
        self.attachments.as_deref().unwrap_or(&[])
    }

    /// The date/time encoded in `ts`.
    pub fn posted_at(&self) -> Result<DateTime<Utc>, RepresentationError> {
        match resolve::parse_slack_ts(&self.ts) {
            Some(date) => Ok(date),
            None => Err(RepresentationError::Parse {
                representation: "message",
                key: "ts",
                value: self.ts.clone(),
                reason: "expected <seconds>.<fraction>".to_owned(),
            }),
        }
    }

    pub fn to_raw_map(&self) -> BTreeMap<String, ResolvedValue> {
        let mut map = BTreeMap::new();
        map.insert("type".to_owned(), Value::from(self.kind.as_str()).into());
        map.insert("ts".to_owned(), Value::from(self.ts.as_str()).into());
        map.insert("text".to_owned(), Value::from(self.text.as_str()).into());

        let optional_strings = [
            ("user", &self.user),
            ("bot_id", &self.bot_id),
            ("subtype", &self.subtype),
            ("channel", &self.channel),
        ];
        for (key, value) in optional_strings.iter() {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::from(value.as_str()).into());
            }
        }
        if let Some(edited) = &self.edited {
            map.insert("edited".to_owned(), Value::Object(edited.clone()).into());
        }
        if let Some(attachments) = &self.attachments {
            let list = attachments.iter().cloned().map(Value::Object).collect();
            map.insert("attachments".to_owned(), Value::Array(list).into());
        }
        map
    }
}

use super::error::RepresentationError;
use super::message::Message;
use super::resolve::{self, ResolveOptions, ResolvedValue, Resolver};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const REQUIRED: &[&str] = &[
    "id",
    "name",
    "created",
    "creator",
    "is_archived",
    "is_general",
    "members",
    "is_member",
    "last_read",
    "latest",
    "unread_count",
    "topic",
    "purpose",
];

/// A public Slack channel, as returned by `channels.info` and `channels.list`.
///
/// Built once from a raw payload and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    id: String,
    name: String,
    created: DateTime<Utc>,
    creator: String,
    is_archived: bool,
    is_general: bool,
    members: Vec<String>,
    is_member: bool,
    last_read: String,
    latest: Message,
    unread_count: i64,
    topic: Map<String, Value>,
    purpose: Map<String, Value>,
}

/// Typed view over a channel's `topic` or `purpose`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChannelTopic {
    pub value: String,
    pub creator: String,
    pub last_set: i64,
}

impl Channel {
    pub fn from_raw(raw: &Map<String, Value>) -> Result<Channel, RepresentationError> {
        Self::from_raw_with(raw, &ResolveOptions::default())
    }

    pub fn from_raw_with(
        raw: &Map<String, Value>,
        options: &ResolveOptions,
    ) -> Result<Channel, RepresentationError> {
        let resolver = Resolver::new("channel", raw);
        resolver.check_keys(REQUIRED, &[], options)?;

        let id = resolver.string("id")?;
        let name = resolver.string("name")?;
        let raw_created = resolver.timestamp("created")?;
        let creator = resolver.string("creator")?;
        let is_archived = resolver.boolean("is_archived")?;
        let is_general = resolver.boolean("is_general")?;
        let members = resolver.string_list("members")?;
        let is_member = resolver.boolean("is_member")?;
        let last_read = resolver.string("last_read")?;
        let raw_latest = resolver.object_ref("latest")?;
        let unread_count = resolver.integer("unread_count")?;
        let topic = resolver.object("topic")?;
        let purpose = resolver.object("purpose")?;

        // Normalizers only run once every field has passed its type check.
        let created = resolver.normalize_datetime("created", raw_created)?;
        let latest = Message::from_raw_with(raw_latest, options)?;

        debug!("Resolved channel {} (#{}, {} members)", id, name, members.len());

        Ok(Channel {
            id,
            name,
            created,
            creator,
            is_archived,
            is_general,
            members,
            is_member,
            last_read,
            latest,
            unread_count,
            topic,
            purpose,
        })
    }

    pub fn from_value(value: &Value) -> Result<Channel, RepresentationError> {
        Self::from_value_with(value, &ResolveOptions::default())
    }

    pub fn from_value_with(
        value: &Value,
        options: &ResolveOptions,
    ) -> Result<Channel, RepresentationError> {
        Self::from_raw_with(resolve::as_object("channel", value)?, options)
    }

    /// The ID of this channel.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The name of the channel, without a leading hash sign.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The latest message in the channel.
    pub fn latest_message(&self) -> &Message {
        &self.latest
    }

    /// The Slack timestamp of the last message the calling user has read in this channel.
    pub fn last_read(&self) -> &str {
        &self.last_read
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// The user ID of the member that created this channel.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// True for the channel every regular team member is in. Usually called
    /// #general, but teams can rename it.
    pub fn is_general(&self) -> bool {
        self.is_general
    }

    /// User ids of everyone in the channel, including accounts disabled while
    /// they were members.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn is_member(&self) -> bool {
        self.is_member
    }

    pub fn unread_count(&self) -> i64 {
        self.unread_count
    }

    pub fn topic(&self) -> &Map<String, Value> {
        &self.topic
    }

    pub fn purpose(&self) -> &Map<String, Value> {
        &self.purpose
    }

    /// The topic as a typed value, if it has the documented shape.
    pub fn topic_info(&self) -> Option<ChannelTopic> {
        serde_json::from_value(Value::Object(self.topic.clone())).ok()
    }

    pub fn purpose_info(&self) -> Option<ChannelTopic> {
        serde_json::from_value(Value::Object(self.purpose.clone())).ok()
    }

    /// The normalized mapping: `created` is a date/time and `latest` a
    /// message, so this is not the payload the channel was built from.
    pub fn to_raw_map(&self) -> BTreeMap<String, ResolvedValue> {
        let members = self.members.iter().map(|m| Value::from(m.as_str())).collect();

        let mut map = BTreeMap::new();
        map.insert("id".to_owned(), Value::from(self.id.as_str()).into());
        map.insert("name".to_owned(), Value::from(self.name.as_str()).into());
        map.insert("created".to_owned(), ResolvedValue::DateTime(self.created));
        map.insert("creator".to_owned(), Value::from(self.creator.as_str()).into());
        map.insert("is_archived".to_owned(), Value::Bool(self.is_archived).into());
        map.insert("is_general".to_owned(), Value::Bool(self.is_general).into());
        map.insert("members".to_owned(), Value::Array(members).into());
        map.insert("is_member".to_owned(), Value::Bool(self.is_member).into());
        map.insert("last_read".to_owned(), Value::from(self.last_read.as_str()).into());
        map.insert(
            "latest".to_owned(),
            ResolvedValue::Message(Box::new(self.latest.clone())),
        );
        map.insert("unread_count".to_owned(), Value::from(self.unread_count).into());
        map.insert("topic".to_owned(), Value::Object(self.topic.clone()).into());
        map.insert("purpose".to_owned(), Value::Object(self.purpose.clone()).into());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "id": "C024BE91L",
            "name": "fun",
            "created": "2015-01-01T00:00:00Z",
            "creator": "U024BE7LH",
            "is_archived": false,
            "is_general": false,
            "members": ["U024BE7LH", "U024BE7LV"],
            "is_member": true,
            "last_read": "1401383885.000061",
            "latest": {
                "type": "message",
                "user": "U024BE7LV",
                "text": "Hello",
                "ts": "1401383885.000061",
            },
            "unread_count": 0,
            "topic": { "value": "Fun times", "creator": "U024BE7LV", "last_set": 1369677212 },
            "purpose": { "value": "This channel is for fun", "creator": "U024BE7LH", "last_set": 1360782804 },
        })
    }

    fn raw(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[test]
    fn resolves_all_fields() {
        let value = payload();
        let channel = Channel::from_raw(raw(&value)).unwrap();

        assert_eq!(channel.id(), "C024BE91L");
        assert_eq!(channel.name(), "fun");
        assert_eq!(channel.creator(), "U024BE7LH");
        assert!(!channel.is_archived());
        assert!(!channel.is_general());
        assert_eq!(channel.members(), &["U024BE7LH".to_owned(), "U024BE7LV".to_owned()][..]);
        assert!(channel.is_member());
        assert_eq!(channel.last_read(), "1401383885.000061");
        assert_eq!(channel.unread_count(), 0);
        assert_eq!(channel.topic()["value"], json!("Fun times"));
        assert_eq!(channel.purpose()["creator"], json!("U024BE7LH"));

        let created = channel.created();
        assert_eq!((created.year(), created.month(), created.day()), (2015, 1, 1));
        assert_eq!(channel.latest_message().text(), "Hello");
    }

    #[test]
    fn every_required_key_is_enforced() {
        for key in REQUIRED {
            let mut value = payload();
            value.as_object_mut().unwrap().remove(*key);
            let err = Channel::from_value(&value).unwrap_err();
            assert_eq!(
                err,
                RepresentationError::MissingField {
                    representation: "channel",
                    key: *key
                },
                "removing {}",
                key
            );
        }
    }

    #[test]
    fn numeric_id_is_a_type_mismatch() {
        let mut value = payload();
        value["id"] = json!(42);
        let err = Channel::from_value(&value).unwrap_err();
        assert_eq!(
            err,
            RepresentationError::TypeMismatch {
                representation: "channel",
                key: "id",
                expected: "string",
                found: "integer"
            }
        );
    }

    #[test]
    fn type_checks_run_before_normalization() {
        let mut value = payload();
        value["created"] = json!("not-a-date");
        value["unread_count"] = json!("3");
        let err = Channel::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            RepresentationError::TypeMismatch { key: "unread_count", .. }
        ));
    }

    #[test]
    fn unparseable_created_is_a_parse_error() {
        let mut value = payload();
        value["created"] = json!("not-a-date");
        let err = Channel::from_value(&value).unwrap_err();
        assert!(matches!(err, RepresentationError::Parse { key: "created", .. }));
    }

    #[test]
    fn unix_created_is_accepted() {
        let mut value = payload();
        value["created"] = json!(1360782804);
        let channel = Channel::from_value(&value).unwrap();
        assert_eq!(channel.created().timestamp(), 1360782804);
    }

    #[test]
    fn latest_must_be_an_object() {
        let mut value = payload();
        value["latest"] = json!("1401383885.000061");
        let err = Channel::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            RepresentationError::TypeMismatch { key: "latest", expected: "object", .. }
        ));
    }

    #[test]
    fn topic_info_reads_documented_shape() {
        let mut value = payload();
        let channel = Channel::from_value(&value).unwrap();
        let topic = channel.topic_info().unwrap();
        assert_eq!(topic.value, "Fun times");
        assert_eq!(topic.last_set, 1369677212);

        value["purpose"] = json!({ "value": "no creator" });
        let channel = Channel::from_value(&value).unwrap();
        assert_eq!(channel.purpose_info(), None);
    }

    #[test]
    fn extra_keys_rejected_unless_lenient() {
        let mut value = payload();
        value["is_channel"] = json!(true);
        assert!(Channel::from_value_with(&value, &ResolveOptions::lenient()).is_ok());
        let err = Channel::from_value(&value).unwrap_err();
        assert_eq!(
            err,
            RepresentationError::UnknownField {
                representation: "channel",
                key: "is_channel".to_owned()
            }
        );
    }

    #[test]
    fn options_reach_latest_message() {
        let mut value = payload();
        value["latest"]["reactions"] = json!([]);
        let err = Channel::from_value(&value).unwrap_err();
        assert_eq!(err.representation(), "message");
        assert!(Channel::from_value_with(&value, &ResolveOptions::lenient()).is_ok());
    }
}

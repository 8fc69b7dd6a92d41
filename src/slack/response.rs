use super::channel::Channel;
use super::error::{RepresentationError, ResponseError};
use super::resolve::{self, ResolveOptions};
use serde_json::{self, Map, Value};

/// Checks the `ok`/`error` envelope every Slack API method response carries.
pub fn check_envelope(json: &Value) -> Result<&Map<String, Value>, ResponseError> {
    let obj = resolve::as_object("response", json)?;
    if let Some(err) = obj.get("error") {
        let err = match err.as_str() {
            Some(s) => s.to_owned(),
            None => err.to_string(),
        };
        warn!("Slack API response carries error {}", err);
        return Err(ResponseError::Api(err));
    }
    if let Some(Value::Bool(false)) = obj.get("ok") {
        warn!("Slack API response has ok=false");
        return Err(ResponseError::NotOk);
    }
    Ok(obj)
}

fn required<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ResponseError> {
    match obj.get(key) {
        Some(value) => Ok(value),
        None => Err(RepresentationError::MissingField {
            representation: "response",
            key,
        }
        .into()),
    }
}

/// Decoded `channels.info` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelsInfoResponse {
    pub channel: Channel,
}

impl ChannelsInfoResponse {
    pub fn from_value(json: &Value, options: &ResolveOptions) -> Result<Self, ResponseError> {
        let obj = check_envelope(json)?;
        let channel = Channel::from_value_with(required(obj, "channel")?, options)?;
        Ok(ChannelsInfoResponse { channel })
    }

    pub fn from_body(body: &str, options: &ResolveOptions) -> Result<Self, ResponseError> {
        let json: Value = serde_json::from_str(body)?;
        Self::from_value(&json, options)
    }
}

/// Decoded page of a `channels.list` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelsListResponse {
    pub channels: Vec<Channel>,
    /// Cursor for the next page, if there is one.
    pub next_cursor: Option<String>,
}

impl ChannelsListResponse {
    pub fn from_value(json: &Value, options: &ResolveOptions) -> Result<Self, ResponseError> {
        let obj = check_envelope(json)?;
        let jchannels = required(obj, "channels")?;
        let items = match jchannels.as_array() {
            Some(items) => items,
            None => {
                return Err(RepresentationError::TypeMismatch {
                    representation: "response",
                    key: "channels",
                    expected: "array",
                    found: resolve::type_name(jchannels),
                }
                .into())
            }
        };
        let channels = items
            .iter()
            .map(|c| Channel::from_value_with(c, options))
            .collect::<Result<Vec<_>, _>>()?;

        let mut next_cursor = None;
        if let Some(meta) = obj.get("response_metadata") {
            if let Some(Some(cursor)) = meta.get("next_cursor").map(|v| v.as_str()) {
                if !cursor.is_empty() {
                    next_cursor = Some(cursor.to_owned());
                }
            }
        }

        Ok(ChannelsListResponse {
            channels,
            next_cursor,
        })
    }

    pub fn from_body(body: &str, options: &ResolveOptions) -> Result<Self, ResponseError> {
        let json: Value = serde_json::from_str(body)?;
        Self::from_value(&json, options)
    }
}

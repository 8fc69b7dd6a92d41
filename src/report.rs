use serde_json::Value;

use crate::slack::{
    Channel, ChannelsInfoResponse, ChannelsListResponse, ResolveOptions, ResponseError,
};

/// The API method a saved response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Info,
    List,
}

/// An explicitly requested method wins. Otherwise a `channels` key means a
/// `channels.list` page and anything else is read as `channels.info`.
pub fn select_method(requested: Option<ApiMethod>, json: &Value) -> ApiMethod {
    match requested {
        Some(method) => method,
        None if json.get("channels").is_some() => ApiMethod::List,
        None => ApiMethod::Info,
    }
}

/// Channels decoded from one response, plus the cursor of the next page.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReport {
    pub channels: Vec<Channel>,
    pub next_cursor: Option<String>,
}

pub fn decode_channels(
    json: &Value,
    method: ApiMethod,
    options: &ResolveOptions,
) -> Result<ChannelReport, ResponseError> {
    match method {
        ApiMethod::List => {
            let page = ChannelsListResponse::from_value(json, options)?;
            Ok(ChannelReport {
                channels: page.channels,
                next_cursor: page.next_cursor,
            })
        }
        ApiMethod::Info => {
            let info = ChannelsInfoResponse::from_value(json, options)?;
            Ok(ChannelReport {
                channels: vec![info.channel],
                next_cursor: None,
            })
        }
    }
}

/// One summary line per channel.
pub fn format_channel(channel: &Channel) -> String {
    let mut line = format!(
        "{} #{} created={} members={} unread={}",
        channel.id(),
        channel.name(),
        channel.created().to_rfc3339(),
        channel.members().len(),
        channel.unread_count(),
    );
    if channel.is_archived() {
        line += " [archived]";
    }
    if channel.is_general() {
        line += " [general]";
    }
    line + &format!(" latest={:?}", channel.latest_message().text())
}

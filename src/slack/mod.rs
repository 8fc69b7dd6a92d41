mod channel;
mod error;
mod message;
mod resolve;
mod response;

pub use self::channel::{Channel, ChannelTopic};
pub use self::error::{RepresentationError, ResponseError};
pub use self::message::Message;
pub use self::resolve::{ResolveOptions, ResolvedValue};
pub use self::response::{check_envelope, ChannelsInfoResponse, ChannelsListResponse};

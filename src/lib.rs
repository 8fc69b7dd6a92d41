extern crate chrono;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod report;
pub mod settings;
pub mod slack;

pub use slack::{
    check_envelope, Channel, ChannelTopic, ChannelsInfoResponse, ChannelsListResponse, Message,
    RepresentationError, ResolveOptions, ResolvedValue, ResponseError,
};

//! Policy data types.
//!
//! - [`RawDocument`] / [`RawValue`]: the untyped tree produced by the parsers.
//! - [`PolicyConfig`] and friends: the typed result of a successful validation,
//!   handed to the render and report stages.

mod model;
mod value;

pub use model::{
    CapabilityHints, DEFAULT_DNS_TXT_LABEL, DnsTxtHint, DomainPolicy, ListenerPolicy, ListenerSet,
    MismatchAction, PolicyConfig, PolicyMode, SUPPORTED_SCHEMA_VERSION,
};
pub use value::{RawDocument, RawValue};

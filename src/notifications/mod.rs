//! Admin notification feed
//!
//! - [`model`]: wire records as delivered by REST and the push channel
//! - [`feed`]: local feed state and the pure reducer that evolves it

pub mod feed;
pub mod model;

pub use feed::{reduce, ClickTarget, Dropdown, FeedAction, FeedState};
pub use model::{
    badge_label, Notification, NotificationKind, NotificationMetadata, NotificationTarget,
    RecordId, ReviewSubmitted,
};

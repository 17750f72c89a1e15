//! Shared UI components.

pub mod layout;
pub mod nav;
pub mod notification_bell;

pub use layout::Layout;
pub use nav::Nav;
pub use notification_bell::NotificationBell;

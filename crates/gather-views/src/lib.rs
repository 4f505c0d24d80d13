//! Page-level state: each view owns its own copies of the fetched
//! collections, derives secondary state from them on every ingest, and
//! re-fetches after every mutation instead of trusting local edits.

pub mod auth;
pub mod derive;
pub mod events_page;
pub mod home;
pub mod notice;
pub mod overlay;
pub mod pagination;
pub mod profile;

pub use notice::{Notice, NoticeKind, NoticeQueue};
pub use overlay::{AttendanceOverlay, PendingChange};
pub use pagination::Pager;

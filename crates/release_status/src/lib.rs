mod aggregate;
mod format;
pub mod models;
mod select;

pub use aggregate::ReleaseAggregator;
pub use format::{acknowledgement, format_release, format_releases, NO_RELEASES};
pub use models::*;
pub use select::{
    attach_open_pull_requests, latest_tag, release_branches, select_releases, select_tag, TAG_FLOOR,
};

//! Typed resource clients.
//!
//! Each client borrows the shared `ApiClient` and only picks a method, path,
//! query and body per operation. Protocol handling (prefix, headers,
//! unwrapping, error normalization) stays in the pipeline.

mod analysis;
mod feedback;
mod hotspots;
mod live_rooms;
mod products;
mod scripts;
mod settings;

pub use analysis::Analysis;
pub use feedback::FeedbackApi;
pub use hotspots::Hotspots;
pub use live_rooms::LiveRooms;
pub use products::Products;
pub use scripts::Scripts;
pub use settings::Settings;

use crate::client::ApiClient;
use crate::http::Query;
use crate::tasks::TaskTracker;
use crate::types::Paging;

impl ApiClient {
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis::new(self)
    }

    pub fn feedback(&self) -> FeedbackApi<'_> {
        FeedbackApi::new(self)
    }

    pub fn hotspots(&self) -> Hotspots<'_> {
        Hotspots::new(self)
    }

    pub fn live_rooms(&self) -> LiveRooms<'_> {
        LiveRooms::new(self)
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn scripts(&self) -> Scripts<'_> {
        Scripts::new(self)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    pub fn tasks(&self) -> TaskTracker {
        TaskTracker::new(self.clone())
    }
}

fn paged(query: Query, paging: Paging) -> Query {
    query.opt("limit", paging.limit).opt("offset", paging.offset)
}

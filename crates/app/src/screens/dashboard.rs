use campus_client::models::analytics::Stats;
use campus_client::resources::analytics::AnalyticsApi;
use campus_client::resources::messages::MessageApi;
use campus_core::navigation::{visible_entries, NavEntry, Route};
use campus_core::roles::{can_view_reports, Role};

use super::{admit, View};
use crate::error::AppResult;
use crate::state::AppState;

/// Landing page content for the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub greeting: String,
    pub role: Role,
    /// Present only for roles that may view reports.
    pub stats: Option<Stats>,
    pub unread_messages: u64,
    /// Navigation entries the user may open, in display order.
    pub shortcuts: Vec<NavEntry>,
}

pub async fn load_dashboard(state: &AppState) -> AppResult<View<Dashboard>> {
    let user = match admit(&state.session.current(), Route::Dashboard) {
        Ok(user) => user,
        Err(view) => return Ok(view),
    };

    let stats = async {
        if can_view_reports(Some(&user)) {
            AnalyticsApi::stats(&state.api).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (stats, unread) = tokio::try_join!(stats, MessageApi::unread_total(&state.api, user.id))?;

    Ok(View::Ready(Dashboard {
        greeting: format!("Welcome back, {}", user.name),
        role: user.role,
        stats,
        unread_messages: unread.count,
        shortcuts: visible_entries(Some(&user)),
    }))
}

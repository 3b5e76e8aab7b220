//! Superadmin panel: admin list, system counters, promote and demote.

use campus_client::models::admin::SystemStats;
use campus_client::resources::superadmin::SuperAdminApi;
use campus_core::error::CoreError;
use campus_core::navigation::Route;
use campus_core::role_management::{authorize_demotion, authorize_promotion, Decision};
use campus_core::types::Id;
use campus_core::user::User;
use futures::try_join;

use super::role_management::Outcome;
use super::{admit, View};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub admins: Vec<User>,
    pub users: Vec<User>,
    pub stats: SystemStats,
}

pub struct AdminPanel {
    state: AppState,
    overview: Option<AdminOverview>,
}

impl AdminPanel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            overview: None,
        }
    }

    pub fn overview(&self) -> Option<&AdminOverview> {
        self.overview.as_ref()
    }

    pub async fn open(&mut self) -> AppResult<View<&AdminOverview>> {
        if let Err(view) = admit(&self.state.session.current(), Route::AdminManagement) {
            return Ok(view);
        }
        let overview = self.load().await?;
        let overview: &AdminOverview = self.overview.insert(overview);
        Ok(View::Ready(overview))
    }

    pub async fn promote(&mut self, user_id: Id) -> AppResult<Outcome> {
        let target = self.find(user_id)?;
        let actor = self.state.session.user();
        if authorize_promotion(actor.as_ref(), &target)? == Decision::Unchanged {
            return Ok(Outcome::Unchanged);
        }
        SuperAdminApi::promote(&self.state.api, user_id).await?;
        self.overview = Some(self.load().await?);
        Ok(Outcome::Applied)
    }

    pub async fn demote(&mut self, user_id: Id) -> AppResult<Outcome> {
        let target = self.find(user_id)?;
        let actor = self.state.session.user();
        if authorize_demotion(actor.as_ref(), &target)? == Decision::Unchanged {
            return Ok(Outcome::Unchanged);
        }
        SuperAdminApi::demote(&self.state.api, user_id).await?;
        self.overview = Some(self.load().await?);
        Ok(Outcome::Applied)
    }

    async fn load(&self) -> AppResult<AdminOverview> {
        let api = &self.state.api;
        let (admins, users, stats) = try_join!(
            SuperAdminApi::admins(api),
            SuperAdminApi::all_users(api),
            SuperAdminApi::system_stats(api),
        )?;
        Ok(AdminOverview {
            admins,
            users,
            stats,
        })
    }

    fn find(&self, user_id: Id) -> AppResult<User> {
        self.overview
            .as_ref()
            .and_then(|o| o.users.iter().find(|u| u.id == user_id))
            .cloned()
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "user",
                    id: user_id,
                }
                .into()
            })
    }
}

//! Sidebar entries kept in step with the session.

use campus_core::navigation::{visible_entries, NavEntry};
use tokio::sync::watch;

use crate::session::SessionState;

/// Recomputes the visible navigation entries whenever the session changes.
pub struct NavigationFilter {
    session: watch::Receiver<SessionState>,
    entries: Vec<NavEntry>,
}

impl NavigationFilter {
    /// Start from the session's current value.
    pub fn new(mut session: watch::Receiver<SessionState>) -> Self {
        let entries = visible_entries(session.borrow_and_update().user());
        Self { session, entries }
    }

    /// Entries for the last observed session, in declaration order.
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Wait for the next session change and recompute.
    ///
    /// Returns `None` once the session store has been dropped.
    pub async fn changed(&mut self) -> Option<&[NavEntry]> {
        self.session.changed().await.ok()?;
        self.entries = visible_entries(self.session.borrow_and_update().user());
        tracing::debug!(count = self.entries.len(), "Navigation entries recomputed");
        Some(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, Session, SessionStorage, SessionStore, TOKEN_KEY, USER_KEY};
    use campus_core::navigation::Route;
    use campus_core::roles::Role;
    use campus_core::user::User;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: "Sam".into(),
            email: "sam@school.test".into(),
            phone: None,
            role,
            created_at: None,
        }
    }

    fn routes(entries: &[NavEntry]) -> Vec<Route> {
        entries.iter().map(|e| e.route).collect()
    }

    #[tokio::test]
    async fn entries_follow_the_signed_in_role() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage
            .set(USER_KEY, &serde_json::to_string(&user(4, Role::Teacher)).unwrap())
            .unwrap();
        let store = SessionStore::new(storage);
        store.hydrate();

        let mut filter = NavigationFilter::new(store.subscribe());
        assert!(routes(filter.entries()).contains(&Route::LessonPlans));

        store
            .login(Session {
                token: "student".into(),
                user: user(9, Role::Student),
            })
            .unwrap();
        let entries = filter.changed().await.unwrap();
        assert_eq!(routes(entries), vec![Route::Dashboard, Route::Messages]);

        store.logout();
        assert!(filter.changed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn loading_session_shows_nothing_until_resolved() {
        let store = SessionStore::new(MemoryStorage::new());
        let mut filter = NavigationFilter::new(store.subscribe());
        assert!(filter.entries().is_empty());

        store
            .login(Session {
                token: "tok".into(),
                user: user(1, Role::SuperAdmin),
            })
            .unwrap();
        let entries = filter.changed().await.unwrap();
        assert_eq!(entries.first().map(|e| e.route), Some(Route::Dashboard));
        assert_eq!(entries.last().map(|e| e.route), Some(Route::AdminManagement));
    }

    #[tokio::test]
    async fn dropped_store_ends_the_stream() {
        let store = SessionStore::new(MemoryStorage::new());
        let mut filter = NavigationFilter::new(store.subscribe());
        drop(store);
        assert!(filter.changed().await.is_none());
    }
}

//! Navigation filter and route guard.
//!
//! The candidate entries are declared once, in display order. The visible
//! list is the subsequence whose gating capability holds for the current
//! user; it is never re-sorted.

use crate::roles::{can, has_any_role, Capability, Role};
use crate::user::User;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Schools,
    Branches,
    Students,
    Classes,
    Teachers,
    LessonPlans,
    Enrollments,
    Users,
    Messages,
    Reports,
    RoleManagement,
    AdminManagement,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Schools => "/schools",
            Route::Branches => "/branches",
            Route::Students => "/students",
            Route::Classes => "/classes",
            Route::Teachers => "/teachers",
            Route::LessonPlans => "/lesson-plans",
            Route::Enrollments => "/enrollments",
            Route::Users => "/users",
            Route::Messages => "/messages",
            Route::Reports => "/reports",
            Route::RoleManagement => "/role-management",
            Route::AdminManagement => "/admin-management",
        }
    }

    /// The capability a user needs to open this route. `None` for public
    /// routes.
    pub fn capability(self) -> Option<Capability> {
        match self {
            Route::Login => None,
            Route::Dashboard => Some(Capability::ViewDashboard),
            Route::Schools => Some(Capability::ViewSchools),
            Route::Branches => Some(Capability::ViewBranches),
            Route::Students => Some(Capability::ViewStudents),
            Route::Classes => Some(Capability::ViewClasses),
            Route::Teachers => Some(Capability::ViewTeachers),
            Route::LessonPlans => Some(Capability::ViewLessonPlans),
            Route::Enrollments => Some(Capability::ViewEnrollments),
            Route::Users => Some(Capability::ManageUsers),
            Route::Messages => Some(Capability::ViewMessages),
            Route::Reports => Some(Capability::ViewReports),
            Route::RoleManagement => Some(Capability::AccessRoleManagement),
            Route::AdminManagement => Some(Capability::ManageAdmins),
        }
    }

    /// Roles declared on the route guard. Empty for public routes.
    pub fn required_roles(self) -> &'static [Role] {
        self.capability().map(Capability::allowed_roles).unwrap_or(&[])
    }

    /// Resolve a path back to its route, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        ALL_ROUTES.iter().copied().find(|r| r.path() == trimmed)
    }
}

const ALL_ROUTES: [Route; 14] = [
    Route::Login,
    Route::Dashboard,
    Route::Schools,
    Route::Branches,
    Route::Students,
    Route::Classes,
    Route::Teachers,
    Route::LessonPlans,
    Route::Enrollments,
    Route::Users,
    Route::Messages,
    Route::Reports,
    Route::RoleManagement,
    Route::AdminManagement,
];

// ---------------------------------------------------------------------------
// Navigation entries
// ---------------------------------------------------------------------------

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub route: Route,
    pub capability: Capability,
}

const fn entry(label: &'static str, route: Route, capability: Capability) -> NavEntry {
    NavEntry {
        label,
        route,
        capability,
    }
}

/// Candidate entries in declaration (display) order.
pub const NAV_ENTRIES: &[NavEntry] = &[
    entry("Dashboard", Route::Dashboard, Capability::ViewDashboard),
    entry("Schools", Route::Schools, Capability::ViewSchools),
    entry("Branches", Route::Branches, Capability::ViewBranches),
    entry("Students", Route::Students, Capability::ViewStudents),
    entry("Classes", Route::Classes, Capability::ViewClasses),
    entry("Teachers", Route::Teachers, Capability::ViewTeachers),
    entry("Lesson Plans", Route::LessonPlans, Capability::ViewLessonPlans),
    entry("Enrollments", Route::Enrollments, Capability::ViewEnrollments),
    entry("Users", Route::Users, Capability::ManageUsers),
    entry("Messages", Route::Messages, Capability::ViewMessages),
    entry("Reports", Route::Reports, Capability::ViewReports),
    entry(
        "Role Management",
        Route::RoleManagement,
        Capability::AccessRoleManagement,
    ),
    entry(
        "Admin Management",
        Route::AdminManagement,
        Capability::ManageAdmins,
    ),
];

/// The entries `user` may see, in declaration order.
pub fn visible_entries(user: Option<&User>) -> Vec<NavEntry> {
    NAV_ENTRIES
        .iter()
        .filter(|e| can(user, e.capability))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Route guard
// ---------------------------------------------------------------------------

/// The session as a guard sees it.
#[derive(Debug, Clone, Copy)]
pub enum SessionView<'a> {
    /// Still hydrating from durable storage or verifying.
    Loading,
    Anonymous,
    SignedIn(&'a User),
}

/// Outcome of guarding a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Access<'a> {
    /// Render a neutral placeholder; neither grant nor deny yet.
    Loading,
    /// Unauthenticated: go to the login entry point.
    RedirectToLogin,
    /// Authenticated but not in the required set.
    Denied {
        required: &'static [Role],
        actual: Role,
    },
    Granted(&'a User),
}

/// Guard a view declared with `required` roles.
pub fn guard<'a>(session: SessionView<'a>, required: &'static [Role]) -> Access<'a> {
    match session {
        SessionView::Loading => Access::Loading,
        SessionView::Anonymous => Access::RedirectToLogin,
        SessionView::SignedIn(user) if has_any_role(Some(user), required) => {
            Access::Granted(user)
        }
        SessionView::SignedIn(user) => Access::Denied {
            required,
            actual: user.role,
        },
    }
}

/// Guard a route using its declared role set.
pub fn guard_route(session: SessionView<'_>, route: Route) -> Access<'_> {
    match route.capability() {
        None => match session {
            SessionView::SignedIn(user) => Access::Granted(user),
            SessionView::Loading => Access::Loading,
            SessionView::Anonymous => Access::RedirectToLogin,
        },
        Some(_) => guard(session, route.required_roles()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Nav".into(),
            email: "nav@school.test".into(),
            phone: None,
            role,
            created_at: None,
        }
    }

    fn routes(user: Option<&User>) -> Vec<Route> {
        visible_entries(user).iter().map(|e| e.route).collect()
    }

    #[test]
    fn teacher_sees_expected_entries_in_order() {
        let teacher = user(Role::Teacher);
        assert_eq!(
            routes(Some(&teacher)),
            vec![
                Route::Dashboard,
                Route::Schools,
                Route::Branches,
                Route::Students,
                Route::Classes,
                Route::Teachers,
                Route::LessonPlans,
                Route::Enrollments,
                Route::Messages,
                Route::Reports,
                Route::RoleManagement,
            ]
        );
        assert!(!routes(Some(&teacher)).contains(&Route::Users));
    }

    #[test]
    fn student_sees_only_dashboard_and_messages() {
        let student = user(Role::Student);
        assert_eq!(
            routes(Some(&student)),
            vec![Route::Dashboard, Route::Messages]
        );
    }

    #[test]
    fn superadmin_sees_everything() {
        let root = user(Role::SuperAdmin);
        assert_eq!(visible_entries(Some(&root)).len(), NAV_ENTRIES.len());
    }

    #[test]
    fn admin_sees_users_but_not_admin_management() {
        let admin = user(Role::Admin);
        let visible = routes(Some(&admin));
        assert!(visible.contains(&Route::Users));
        assert!(!visible.contains(&Route::AdminManagement));
    }

    #[test]
    fn absent_user_sees_nothing() {
        assert!(visible_entries(None).is_empty());
    }

    #[test]
    fn guard_loading_is_neutral() {
        assert_eq!(
            guard(SessionView::Loading, Route::Students.required_roles()),
            Access::Loading
        );
    }

    #[test]
    fn guard_anonymous_redirects() {
        assert_eq!(
            guard_route(SessionView::Anonymous, Route::Messages),
            Access::RedirectToLogin
        );
    }

    #[test]
    fn guard_denies_with_required_and_actual() {
        let student = user(Role::Student);
        assert_eq!(
            guard_route(SessionView::SignedIn(&student), Route::RoleManagement),
            Access::Denied {
                required: &[Role::SuperAdmin, Role::Admin, Role::Teacher],
                actual: Role::Student,
            }
        );
    }

    #[test]
    fn guard_grants_member_roles() {
        let teacher = user(Role::Teacher);
        assert_eq!(
            guard_route(SessionView::SignedIn(&teacher), Route::Students),
            Access::Granted(&teacher)
        );
    }

    #[test]
    fn paths_resolve_back_to_routes() {
        assert_eq!(Route::from_path("/lesson-plans/"), Some(Route::LessonPlans));
        assert_eq!(Route::from_path("/nowhere"), None);
    }
}

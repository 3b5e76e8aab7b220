//! Dashboard, reports, admin panel and messages screens.

mod common;

use assert_matches::assert_matches;
use axum::http::Method;
use campus_app::screens::admin::AdminPanel;
use campus_app::screens::dashboard::load_dashboard;
use campus_app::screens::messages::MessagesScreen;
use campus_app::screens::reports::load_report;
use campus_app::screens::role_management::Outcome;
use campus_app::screens::View;
use campus_app::AppError;
use campus_core::navigation::Route;
use campus_core::role_management::Denial;
use campus_core::roles::Role;
use common::{offline, user, FakeBackend};
use serde_json::json;

fn serve_analytics(fake: &FakeBackend) {
    fake.respond(
        Method::GET,
        "/analytics/stats",
        200,
        json!({ "totalStudents": 120, "totalTeachers": 8, "totalClasses": 10, "totalEnrollments": 300 }),
    );
    fake.respond(
        Method::GET,
        "/analytics/enrollments-by-class",
        200,
        json!([{ "className": "Math", "count": 30 }, { "className": "Art", "count": 15 }]),
    );
    fake.respond(
        Method::GET,
        "/analytics/students-by-grade",
        200,
        json!([{ "grade": "9", "count": 40 }, { "grade": "10", "count": 80 }]),
    );
    fake.respond(
        Method::GET,
        "/analytics/recent-enrollments",
        200,
        json!([{ "studentName": "Ada", "className": "Math" }]),
    );
    fake.respond(
        Method::GET,
        "/analytics/class-capacity",
        200,
        json!([{ "className": "Math", "capacity": 30, "enrolled": 30 }]),
    );
    fake.respond(
        Method::GET,
        "/analytics/activity-timeline",
        200,
        json!([{ "date": "2024-09-01", "count": 4 }]),
    );
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn teacher_dashboard_includes_stats_and_unread() {
    let fake = FakeBackend::start().await;
    serve_analytics(&fake);
    fake.respond(Method::GET, "/messages/unread/4", 200, json!({ "count": 2 }));

    let state = fake.state_for(user(4, "Tess", Role::Teacher));
    let dashboard = load_dashboard(&state).await.unwrap().ready().unwrap();

    assert_eq!(dashboard.greeting, "Welcome back, Tess");
    assert_eq!(dashboard.stats.unwrap().total_students, 120);
    assert_eq!(dashboard.unread_messages, 2);
    let routes: Vec<Route> = dashboard.shortcuts.iter().map(|e| e.route).collect();
    assert!(routes.contains(&Route::LessonPlans));
    assert!(!routes.contains(&Route::Users));
}

#[tokio::test]
async fn student_dashboard_skips_analytics() {
    let fake = FakeBackend::start().await;
    fake.respond(Method::GET, "/messages/unread/7", 200, json!({ "count": 0 }));

    let state = fake.state_for(user(7, "Stu", Role::Student));
    let dashboard = load_dashboard(&state).await.unwrap().ready().unwrap();

    assert!(dashboard.stats.is_none());
    assert!(fake
        .requests()
        .iter()
        .all(|r| !r.path.starts_with("/api/analytics")));
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_combines_all_feeds() {
    let fake = FakeBackend::start().await;
    serve_analytics(&fake);

    let state = fake.state_for(user(3, "Ada", Role::Admin));
    let report = load_report(&state).await.unwrap().ready().unwrap();

    assert_eq!(fake.request_count(), 6);
    assert_eq!(report.stats.total_enrollments, 300);
    assert_eq!(report.enrollments_by_class.bars[1].ratio, 0.5);
    assert_eq!(report.students_by_grade.max(), 80);
    assert!(report.class_capacity[0].is_full);
    assert_eq!(report.recent_enrollments[0].student_name, "Ada");
    assert_eq!(report.activity.total(), 4);
}

#[tokio::test]
async fn one_failing_feed_fails_the_report() {
    let fake = FakeBackend::start().await;
    serve_analytics(&fake);
    fake.respond(Method::GET, "/analytics/class-capacity", 500, json!({ "error": "boom" }));

    let state = fake.state_for(user(3, "Ada", Role::Admin));
    let err = load_report(&state).await.unwrap_err();
    assert_eq!(err.user_message(), "boom");
}

#[tokio::test]
async fn students_cannot_open_reports() {
    let state = offline(user(7, "Stu", Role::Student));
    assert_matches!(
        load_report(&state).await.unwrap(),
        View::AccessDenied {
            actual: Role::Student,
            ..
        }
    );
}

// ---------------------------------------------------------------------------
// Admin panel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_panel_promotes_teacher() {
    let fake = FakeBackend::start().await;
    let users = vec![
        user(1, "Root", Role::SuperAdmin),
        user(3, "Ada", Role::Admin),
        user(4, "Tess", Role::Teacher),
    ];
    fake.respond(Method::GET, "/superadmin/users/all", 200, serde_json::to_value(&users).unwrap());
    fake.respond(
        Method::GET,
        "/superadmin/admins",
        200,
        serde_json::to_value(&users[1..2]).unwrap(),
    );
    fake.respond(
        Method::GET,
        "/superadmin/system/stats",
        200,
        json!({ "totalUsers": 3, "totalAdmins": 1 }),
    );
    fake.respond(Method::POST, "/superadmin/users/4/promote", 200, json!({ "message": "ok" }));

    let mut panel = AdminPanel::new(fake.state_for(user(1, "Root", Role::SuperAdmin)));
    let overview = panel.open().await.unwrap().ready().unwrap();
    assert_eq!(overview.admins.len(), 1);
    assert_eq!(overview.stats.total_users, 3);

    assert_eq!(panel.promote(4).await.unwrap(), Outcome::Applied);
    assert_eq!(panel.promote(3).await.unwrap(), Outcome::Unchanged);
    assert_matches!(
        panel.demote(1).await,
        Err(AppError::Denied(Denial::OwnRole))
    );
    let promotes = fake
        .requests()
        .iter()
        .filter(|r| r.method == Method::POST)
        .count();
    assert_eq!(promotes, 1);
}

#[tokio::test]
async fn admins_cannot_open_the_admin_panel() {
    let mut panel = AdminPanel::new(offline(user(3, "Ada", Role::Admin)));
    assert_matches!(panel.open().await.unwrap(), View::AccessDenied { .. });
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn messages_screen_loads_contacts_and_unread_counts() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::GET,
        "/users",
        200,
        serde_json::to_value(vec![user(4, "Tess", Role::Teacher), user(7, "Stu", Role::Student)])
            .unwrap(),
    );
    fake.respond(
        Method::GET,
        "/messages/conversation",
        200,
        json!([
            { "id": 1, "senderId": 7, "receiverId": 4, "content": "hi", "createdAt": "2024-09-01T08:00:00Z", "read": false },
            { "id": 2, "senderId": 4, "receiverId": 7, "content": "hello", "createdAt": "2024-09-01T08:01:00Z", "read": false }
        ]),
    );

    let state = fake.state_for(user(4, "Tess", Role::Teacher));
    let View::Ready(screen) = MessagesScreen::open(&state).await.unwrap() else {
        panic!("messages should open");
    };

    let snapshot = screen.snapshot();
    assert_eq!(snapshot.contacts.len(), 1);
    assert_eq!(snapshot.unread_for(7), 1);
    assert_eq!(screen.poller().active_pollers(), 0);

    let err = screen.send("   ").await.unwrap_err();
    assert_eq!(err.kind(), campus_app::ErrorKind::Validation);
    screen.close().await;
}

#[tokio::test]
async fn anonymous_users_are_sent_to_login_from_messages() {
    let state = campus_app::AppState::with_storage(
        common::config(common::UNREACHABLE),
        campus_client::session::MemoryStorage::new(),
    );
    state.session.hydrate();
    let view = MessagesScreen::open(&state).await.unwrap();
    assert!(matches!(view, View::RedirectToLogin));
}

//! CRUD screens: guard, capability check, validation, then the backend.

mod common;

use assert_matches::assert_matches;
use axum::http::Method;
use campus_app::screens::crud::{EnrollmentsScreen, StudentsScreen};
use campus_app::screens::lesson_plans::LessonPlansScreen;
use campus_app::screens::modal::{ModalForm, ModalMode};
use campus_app::screens::users::UsersScreen;
use campus_app::screens::View;
use campus_app::{AppError, AppState, ErrorKind};
use campus_client::models::lesson_plan::{CreateLessonPlan, LessonPlanFilter};
use campus_client::models::student::{CreateStudent, UpdateStudent};
use campus_client::session::MemoryStorage;
use campus_core::error::CoreError;
use campus_core::navigation::Route;
use campus_core::role_management::Denial;
use campus_core::roles::{Capability, Role};
use common::{config, no, offline, user, yes, FakeBackend, UNREACHABLE};
use serde_json::json;

fn student_json(id: i64, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "email": format!("s{id}@campus.test"), "grade": "9" })
}

fn valid_student() -> CreateStudent {
    CreateStudent {
        name: "Linus".into(),
        email: "linus@campus.test".into(),
        grade: "9".into(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Route guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unresolved_session_renders_loading() {
    let state = AppState::with_storage(config(UNREACHABLE), MemoryStorage::new());
    let mut screen = StudentsScreen::new(state);
    assert_matches!(screen.open().await.unwrap(), View::Loading);
}

#[tokio::test]
async fn anonymous_session_redirects_to_login() {
    let state = AppState::with_storage(config(UNREACHABLE), MemoryStorage::new());
    state.session.hydrate();
    let mut screen = StudentsScreen::new(state);
    assert_matches!(screen.open().await.unwrap(), View::RedirectToLogin);
}

#[tokio::test]
async fn student_is_denied_the_students_screen() {
    let mut screen = StudentsScreen::new(offline(user(7, "Stu", Role::Student)));
    match screen.open().await.unwrap() {
        View::AccessDenied { required, actual } => {
            assert_eq!(actual, Role::Student);
            assert_eq!(required, Route::Students.required_roles());
        }
        other => panic!("expected denial, got {other:?}"),
    }
}

#[tokio::test]
async fn teacher_can_view_students() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::GET,
        "/students",
        200,
        json!([student_json(1, "Ada"), student_json(2, "Grace")]),
    );
    let mut screen = StudentsScreen::new(fake.state_for(user(4, "Tess", Role::Teacher)));

    let View::Ready(rows) = screen.open().await.unwrap() else {
        panic!("teacher should see students");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(
        fake.requests()[0].authorization.as_deref(),
        Some("Bearer token-4")
    );
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn teacher_cannot_create_students() {
    let mut screen = StudentsScreen::new(offline(user(4, "Tess", Role::Teacher)));

    let err = screen.create(&valid_student()).await.unwrap_err();
    assert_matches!(
        err,
        AppError::Denied(Denial::MissingCapability(Capability::CreateStudents))
    );
}

#[tokio::test]
async fn invalid_form_is_rejected_before_sending() {
    let mut screen = StudentsScreen::new(offline(user(3, "Ada", Role::Admin)));
    let form = CreateStudent {
        email: "not-an-email".into(),
        ..valid_student()
    };

    let err = screen.create(&form).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.user_message().contains("Email address is invalid"));
}

#[tokio::test]
async fn create_posts_and_reloads() {
    let fake = FakeBackend::start().await;
    fake.respond(Method::POST, "/students", 201, student_json(3, "Linus"));
    fake.respond(Method::GET, "/students", 200, json!([student_json(3, "Linus")]));
    let mut screen = StudentsScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));

    let created = screen.create(&valid_student()).await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(screen.records().len(), 1);

    let methods: Vec<Method> = fake.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::POST, Method::GET]);
}

#[tokio::test]
async fn modal_keeps_backend_error_inline() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::POST,
        "/students",
        400,
        json!({ "error": "Email already registered" }),
    );
    let mut screen = StudentsScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));

    let mut modal = ModalForm::<CreateStudent>::new();
    modal.open_create();
    modal.form = valid_student();
    let screen_ref = &mut screen;
    let created = modal
        .submit(move |_, form| async move { screen_ref.create(&form).await })
        .await;

    assert!(created.is_none());
    assert!(modal.is_open());
    assert_eq!(modal.mode(), Some(ModalMode::Create));
    assert_eq!(modal.error(), Some("Email already registered"));
}

#[tokio::test]
async fn edit_modal_sends_put_and_closes() {
    let fake = FakeBackend::start().await;
    fake.respond(Method::PUT, "/students/2", 200, student_json(2, "Grace H."));
    fake.respond(Method::GET, "/students", 200, json!([student_json(2, "Grace H.")]));
    let mut screen = StudentsScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));

    let mut modal = ModalForm::<UpdateStudent>::new();
    modal.open_edit(
        2,
        UpdateStudent {
            name: Some("Grace H.".into()),
            ..Default::default()
        },
    );
    let screen_ref = &mut screen;
    let updated = modal
        .submit(move |mode, form| async move {
            let ModalMode::Edit(id) = mode else {
                unreachable!("opened for edit");
            };
            screen_ref.update(id, &form).await
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Grace H.");
    assert!(!modal.is_open());
}

#[tokio::test]
async fn delete_asks_for_confirmation() {
    let fake = FakeBackend::start().await;
    fake.respond(Method::GET, "/students", 200, json!([student_json(2, "Grace")]));
    fake.respond(Method::DELETE, "/students/2", 200, json!({ "message": "deleted" }));
    let mut screen = StudentsScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));
    screen.open().await.unwrap();

    assert_matches!(screen.delete(2, &no).await, Err(AppError::Cancelled));
    assert!(fake.requests().iter().all(|r| r.method != Method::DELETE));

    screen.delete(2, &yes).await.unwrap();
    assert!(fake.requests().iter().any(|r| r.method == Method::DELETE));
}

#[tokio::test]
async fn deleting_an_unloaded_row_is_not_found() {
    let mut screen = StudentsScreen::new(offline(user(3, "Ada", Role::Admin)));
    let err = screen.delete(42, &yes).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { id: 42, .. }));
}

// ---------------------------------------------------------------------------
// Users screen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_screen_refuses_self_deletion() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::GET,
        "/users",
        200,
        serde_json::to_value(vec![user(1, "Root", Role::SuperAdmin), user(5, "Stu", Role::Student)])
            .unwrap(),
    );
    let mut screen = UsersScreen::new(fake.state_for(user(1, "Root", Role::SuperAdmin)));
    screen.open().await.unwrap();
    let before = fake.request_count();

    let err = screen.delete(1, &yes).await.unwrap_err();
    assert_matches!(err, AppError::Denied(Denial::OwnAccount));
    assert_eq!(fake.request_count(), before);
}

#[tokio::test]
async fn admin_cannot_delete_users() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::GET,
        "/users",
        200,
        serde_json::to_value(vec![user(5, "Stu", Role::Student)]).unwrap(),
    );
    let mut screen = UsersScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));
    screen.open().await.unwrap();

    let err = screen.delete(5, &yes).await.unwrap_err();
    assert_matches!(
        err,
        AppError::Denied(Denial::MissingCapability(Capability::DeleteUsers))
    );
}

// ---------------------------------------------------------------------------
// Lesson plans and enrollments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lesson_plan_with_unknown_status_is_rejected() {
    let mut screen = LessonPlansScreen::new(offline(user(4, "Tess", Role::Teacher)));
    let form = CreateLessonPlan {
        title: "Photosynthesis".into(),
        teacher_id: 4,
        class_id: 2,
        status: "archived".into(),
        ..Default::default()
    };

    let err = screen.create(&form).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn lesson_plans_can_be_filtered() {
    let fake = FakeBackend::start().await;
    fake.respond(
        Method::GET,
        "/lesson-plans",
        200,
        json!([{ "id": 1, "title": "Cells", "teacherId": 4, "classId": 2, "status": "approved" }]),
    );
    let screen = LessonPlansScreen::new(fake.state_for(user(4, "Tess", Role::Teacher)));

    let filter = LessonPlanFilter {
        status: Some("approved".into()),
        ..Default::default()
    };
    let plans = screen.open_filtered(&filter).await.unwrap().ready().unwrap();
    assert_eq!(plans[0].title, "Cells");
    assert_eq!(fake.requests()[0].query.as_deref(), Some("status=approved"));
}

#[tokio::test]
async fn unenroll_requires_confirmation_and_capability() {
    let fake = FakeBackend::start().await;
    fake.respond(Method::DELETE, "/enrollments/student/5/class/2", 200, json!({}));
    fake.respond(Method::GET, "/enrollments", 200, json!([]));

    let mut teacher = EnrollmentsScreen::new(fake.state_for(user(4, "Tess", Role::Teacher)));
    assert_matches!(
        teacher.unenroll(5, 2, &yes).await,
        Err(AppError::Denied(_))
    );

    let mut admin = EnrollmentsScreen::new(fake.state_for(user(3, "Ada", Role::Admin)));
    assert_matches!(admin.unenroll(5, 2, &no).await, Err(AppError::Cancelled));
    assert_eq!(fake.request_count(), 0);

    admin.unenroll(5, 2, &yes).await.unwrap();
    assert_eq!(fake.requests()[0].path, "/api/enrollments/student/5/class/2");
}

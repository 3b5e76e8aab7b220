//! Role policy table.
//!
//! Maps a (possibly absent) user to the capabilities the client gates UI
//! actions and routes on. Every function here is total: an absent user or
//! an unrecognised role yields the least-privileged answer, never a panic.
//! The backend must enforce the same rules; these checks are bypassable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::user::User;

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_UNKNOWN: &str = "unknown";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The closed set of roles, most to least privileged, plus a fallback for
/// anything the backend sends that this client does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
    #[default]
    Unknown,
}

/// The four assignable roles, most privileged first.
pub const ALL_ROLES: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Teacher, Role::Student];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPERADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Teacher => ROLE_TEACHER,
            Role::Student => ROLE_STUDENT,
            Role::Unknown => ROLE_UNKNOWN,
        }
    }

    /// Parse a wire role name. Matching ignores case and surrounding
    /// whitespace; anything else becomes [`Role::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            ROLE_SUPERADMIN => Role::SuperAdmin,
            ROLE_ADMIN => Role::Admin,
            ROLE_TEACHER => Role::Teacher,
            ROLE_STUDENT => Role::Student,
            _ => Role::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Role::Unknown
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Role predicates
// ---------------------------------------------------------------------------

fn role_of(user: Option<&User>) -> Role {
    user.map(|u| u.role).unwrap_or(Role::Unknown)
}

/// Any user carrying one of the four known roles.
pub fn is_authenticated(user: Option<&User>) -> bool {
    role_of(user).is_known()
}

pub fn is_super_admin(user: Option<&User>) -> bool {
    role_of(user) == Role::SuperAdmin
}

/// `admin` or `superadmin`.
pub fn is_admin(user: Option<&User>) -> bool {
    matches!(role_of(user), Role::Admin | Role::SuperAdmin)
}

/// `teacher`, `admin` or `superadmin`.
pub fn is_teacher_or_admin(user: Option<&User>) -> bool {
    matches!(role_of(user), Role::Teacher | Role::Admin | Role::SuperAdmin)
}

/// Exactly `student`; not inherited by higher roles.
pub fn is_student(user: Option<&User>) -> bool {
    role_of(user) == Role::Student
}

/// Exact set membership, as used by route guards. An empty set, an absent
/// user and an unknown role all yield `false`.
pub fn has_any_role(user: Option<&User>, roles: &[Role]) -> bool {
    let role = role_of(user);
    role.is_known() && roles.contains(&role)
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A gated action. Never stored; computed per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewDashboard,
    ViewMessages,
    ViewSchools,
    ManageSchools,
    ViewBranches,
    ManageBranches,
    ViewStudents,
    CreateStudents,
    EditStudents,
    DeleteStudents,
    ViewTeachers,
    ManageTeachers,
    ViewClasses,
    ManageClasses,
    ViewEnrollments,
    ManageEnrollments,
    ViewLessonPlans,
    ManageLessonPlans,
    ViewReports,
    ViewUsers,
    ManageUsers,
    AccessRoleManagement,
    ChangeRoles,
    DeleteUsers,
    ManageAdmins,
}

const ANY_AUTHENTICATED: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Teacher, Role::Student];
const TEACHER_AND_ABOVE: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Teacher];
const ADMIN_AND_ABOVE: &[Role] = &[Role::SuperAdmin, Role::Admin];
const SUPERADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

impl Capability {
    pub const ALL: [Capability; 25] = [
        Capability::ViewDashboard,
        Capability::ViewMessages,
        Capability::ViewSchools,
        Capability::ManageSchools,
        Capability::ViewBranches,
        Capability::ManageBranches,
        Capability::ViewStudents,
        Capability::CreateStudents,
        Capability::EditStudents,
        Capability::DeleteStudents,
        Capability::ViewTeachers,
        Capability::ManageTeachers,
        Capability::ViewClasses,
        Capability::ManageClasses,
        Capability::ViewEnrollments,
        Capability::ManageEnrollments,
        Capability::ViewLessonPlans,
        Capability::ManageLessonPlans,
        Capability::ViewReports,
        Capability::ViewUsers,
        Capability::ManageUsers,
        Capability::AccessRoleManagement,
        Capability::ChangeRoles,
        Capability::DeleteUsers,
        Capability::ManageAdmins,
    ];

    /// The roles holding this capability. Route guards use this set with
    /// [`has_any_role`].
    pub fn allowed_roles(self) -> &'static [Role] {
        use Capability::*;
        match self {
            ViewDashboard | ViewMessages => ANY_AUTHENTICATED,
            ViewSchools | ViewBranches | ViewStudents | ViewTeachers | ViewClasses
            | ViewEnrollments | ViewLessonPlans | ManageLessonPlans | ViewReports
            | AccessRoleManagement => TEACHER_AND_ABOVE,
            ManageSchools | ManageBranches | CreateStudents | EditStudents | DeleteStudents
            | ManageTeachers | ManageClasses | ManageEnrollments | ViewUsers | ManageUsers => {
                ADMIN_AND_ABOVE
            }
            ChangeRoles | DeleteUsers | ManageAdmins => SUPERADMIN_ONLY,
        }
    }
}

/// Whether `user` holds `capability`, composed from the role predicates.
pub fn can(user: Option<&User>, capability: Capability) -> bool {
    use Capability::*;
    match capability {
        ViewDashboard | ViewMessages => is_authenticated(user),
        ViewSchools | ViewBranches | ViewStudents | ViewTeachers | ViewClasses
        | ViewEnrollments | ViewLessonPlans | ManageLessonPlans | ViewReports
        | AccessRoleManagement => is_teacher_or_admin(user),
        ManageSchools | ManageBranches | CreateStudents | EditStudents | DeleteStudents
        | ManageTeachers | ManageClasses | ManageEnrollments | ViewUsers | ManageUsers => {
            is_admin(user)
        }
        ChangeRoles | DeleteUsers | ManageAdmins => is_super_admin(user),
    }
}

pub fn can_view_dashboard(user: Option<&User>) -> bool {
    can(user, Capability::ViewDashboard)
}

pub fn can_view_messages(user: Option<&User>) -> bool {
    can(user, Capability::ViewMessages)
}

pub fn can_view_students(user: Option<&User>) -> bool {
    can(user, Capability::ViewStudents)
}

pub fn can_create_students(user: Option<&User>) -> bool {
    can(user, Capability::CreateStudents)
}

pub fn can_edit_students(user: Option<&User>) -> bool {
    can(user, Capability::EditStudents)
}

pub fn can_delete_students(user: Option<&User>) -> bool {
    can(user, Capability::DeleteStudents)
}

pub fn can_view_teachers(user: Option<&User>) -> bool {
    can(user, Capability::ViewTeachers)
}

pub fn can_manage_teachers(user: Option<&User>) -> bool {
    can(user, Capability::ManageTeachers)
}

pub fn can_view_classes(user: Option<&User>) -> bool {
    can(user, Capability::ViewClasses)
}

pub fn can_manage_classes(user: Option<&User>) -> bool {
    can(user, Capability::ManageClasses)
}

pub fn can_view_enrollments(user: Option<&User>) -> bool {
    can(user, Capability::ViewEnrollments)
}

pub fn can_manage_enrollments(user: Option<&User>) -> bool {
    can(user, Capability::ManageEnrollments)
}

pub fn can_view_schools(user: Option<&User>) -> bool {
    can(user, Capability::ViewSchools)
}

pub fn can_manage_schools(user: Option<&User>) -> bool {
    can(user, Capability::ManageSchools)
}

pub fn can_view_branches(user: Option<&User>) -> bool {
    can(user, Capability::ViewBranches)
}

pub fn can_manage_branches(user: Option<&User>) -> bool {
    can(user, Capability::ManageBranches)
}

pub fn can_view_lesson_plans(user: Option<&User>) -> bool {
    can(user, Capability::ViewLessonPlans)
}

pub fn can_manage_lesson_plans(user: Option<&User>) -> bool {
    can(user, Capability::ManageLessonPlans)
}

pub fn can_view_reports(user: Option<&User>) -> bool {
    can(user, Capability::ViewReports)
}

pub fn can_view_users(user: Option<&User>) -> bool {
    can(user, Capability::ViewUsers)
}

pub fn can_manage_users(user: Option<&User>) -> bool {
    can(user, Capability::ManageUsers)
}

pub fn can_access_role_management(user: Option<&User>) -> bool {
    can(user, Capability::AccessRoleManagement)
}

pub fn can_change_roles(user: Option<&User>) -> bool {
    can(user, Capability::ChangeRoles)
}

pub fn can_delete_users(user: Option<&User>) -> bool {
    can(user, Capability::DeleteUsers)
}

pub fn can_manage_admins(user: Option<&User>) -> bool {
    can(user, Capability::ManageAdmins)
}

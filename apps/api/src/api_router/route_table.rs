use atrium_application::RouteAccess;
use atrium_domain::{Action, Subject};
use axum::handler::Handler;
use axum::routing::{MethodFilter, MethodRouter, on};

use crate::handlers;
use crate::state::AppState;

/// HTTP method of a declared route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl RouteMethod {
    fn filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Patch => MethodFilter::PATCH,
            Self::Delete => MethodFilter::DELETE,
        }
    }
}

/// One endpoint together with the access rule the policy gate enforces.
pub struct RouteDeclaration {
    pub method: RouteMethod,
    pub path: &'static str,
    pub access: RouteAccess,
    pub handler: MethodRouter<AppState>,
}

impl RouteDeclaration {
    fn new<H, T>(method: RouteMethod, path: &'static str, access: RouteAccess, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method,
            path,
            access,
            handler: on(method.filter(), handler),
        }
    }
}

pub fn route_table() -> Vec<RouteDeclaration> {
    use RouteMethod::{Delete, Get, Patch, Post};

    vec![
        RouteDeclaration::new(
            Get,
            "/health",
            RouteAccess::Public,
            handlers::health::health_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/auth/bootstrap",
            RouteAccess::Public,
            handlers::auth::bootstrap_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/auth/login",
            RouteAccess::Public,
            handlers::auth::login_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/auth/refresh",
            RouteAccess::Public,
            handlers::auth::refresh_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/auth/logout",
            RouteAccess::authenticated(),
            handlers::auth::logout_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/admin-users/me",
            RouteAccess::authenticated(),
            handlers::admin_users::me_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/admin-users/me/permissions",
            RouteAccess::authenticated(),
            handlers::admin_users::my_permissions_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/admin-users/me/change-password",
            RouteAccess::authenticated(),
            handlers::admin_users::change_password_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/admin-users",
            RouteAccess::requires(Action::Create, Subject::Admin),
            handlers::admin_users::create_admin_user_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/admin-users",
            RouteAccess::requires(Action::Read, Subject::Admin),
            handlers::admin_users::list_admin_users_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/admin-users/{id}",
            RouteAccess::requires(Action::Read, Subject::Admin),
            handlers::admin_users::get_admin_user_handler,
        ),
        // Own-profile edits need no grant; the service checks the rest.
        RouteDeclaration::new(
            Patch,
            "/api/v1/admin-users/{id}",
            RouteAccess::authenticated(),
            handlers::admin_users::update_admin_user_handler,
        ),
        RouteDeclaration::new(
            Delete,
            "/api/v1/admin-users/{id}",
            RouteAccess::requires(Action::Delete, Subject::Admin),
            handlers::admin_users::delete_admin_user_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/users",
            RouteAccess::requires(Action::Create, Subject::User),
            handlers::users::create_user_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/users",
            RouteAccess::requires(Action::Read, Subject::User),
            handlers::users::list_users_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/users/{id}",
            RouteAccess::requires(Action::Read, Subject::User),
            handlers::users::get_user_handler,
        ),
        RouteDeclaration::new(
            Patch,
            "/api/v1/users/{id}",
            RouteAccess::requires(Action::Update, Subject::User),
            handlers::users::update_user_handler,
        ),
        RouteDeclaration::new(
            Delete,
            "/api/v1/users/{id}",
            RouteAccess::requires(Action::Delete, Subject::User),
            handlers::users::delete_user_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/roles",
            RouteAccess::requires(Action::Create, Subject::Role),
            handlers::roles::create_role_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/roles",
            RouteAccess::requires(Action::Read, Subject::Role),
            handlers::roles::list_roles_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/roles/{id}",
            RouteAccess::requires(Action::Read, Subject::Role),
            handlers::roles::get_role_handler,
        ),
        RouteDeclaration::new(
            Patch,
            "/api/v1/roles/{id}",
            RouteAccess::requires(Action::Update, Subject::Role),
            handlers::roles::update_role_handler,
        ),
        RouteDeclaration::new(
            Delete,
            "/api/v1/roles/{id}",
            RouteAccess::requires(Action::Delete, Subject::Role),
            handlers::roles::delete_role_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/permissions",
            RouteAccess::requires(Action::Read, Subject::Role),
            handlers::roles::permission_catalogue_handler,
        ),
        RouteDeclaration::new(
            Post,
            "/api/v1/pages",
            RouteAccess::requires(Action::Create, Subject::Page),
            handlers::pages::create_page_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/pages",
            RouteAccess::Public,
            handlers::pages::list_published_pages_handler,
        ),
        // The segment is a slug for reads and an id for writes.
        RouteDeclaration::new(
            Get,
            "/api/v1/pages/{page}",
            RouteAccess::Public,
            handlers::pages::get_published_page_handler,
        ),
        RouteDeclaration::new(
            Patch,
            "/api/v1/pages/{page}",
            RouteAccess::requires(Action::Update, Subject::Page),
            handlers::pages::update_page_handler,
        ),
        RouteDeclaration::new(
            Delete,
            "/api/v1/pages/{page}",
            RouteAccess::requires(Action::Delete, Subject::Page),
            handlers::pages::delete_page_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/posts",
            RouteAccess::Public,
            handlers::posts::list_posts_handler,
        ),
        // Posts carry no grant of their own; any signed-in admin curates them.
        RouteDeclaration::new(
            Post,
            "/api/v1/posts",
            RouteAccess::authenticated(),
            handlers::posts::create_post_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/posts/{id}",
            RouteAccess::authenticated(),
            handlers::posts::get_post_handler,
        ),
        RouteDeclaration::new(
            Patch,
            "/api/v1/posts/{id}",
            RouteAccess::authenticated(),
            handlers::posts::update_post_handler,
        ),
        RouteDeclaration::new(
            Delete,
            "/api/v1/posts/{id}",
            RouteAccess::authenticated(),
            handlers::posts::delete_post_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/audit-log",
            RouteAccess::requires(Action::Read, Subject::Log),
            handlers::audit_log::list_audit_log_handler,
        ),
        RouteDeclaration::new(
            Get,
            "/api/v1/audit-log/{id}",
            RouteAccess::requires(Action::Read, Subject::Log),
            handlers::audit_log::get_audit_log_entry_handler,
        ),
    ]
}

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{
    AdminIdentity, AdminUserId, Grant, PageId, PostId, RoleId, SessionId, UserId,
};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::pagination::KeysetWindow;
use crate::{
    AccessTokenCodec, AdminUserRecord, AdminUserRepository, AuditEvent, AuditRepository,
    IssuedAccessToken, PageListFilter, PageRecord, PageRepository, PasswordHasher, RoleRecord,
    PostListFilter, PostRecord, PostRepository, RoleRepository, SessionRecord, SessionRepository,
    UserListFilter, UserRecord, UserRepository,
};

#[derive(Default)]
pub(crate) struct FakeStore {
    pub(crate) admins: Mutex<Vec<AdminUserRecord>>,
    pub(crate) roles: Mutex<Vec<RoleRecord>>,
    pub(crate) pages: Mutex<Vec<PageRecord>>,
    pub(crate) events: Mutex<Vec<AuditEvent>>,
    pub(crate) sessions: Mutex<Vec<SessionRecord>>,
    pub(crate) users: Mutex<Vec<UserRecord>>,
    pub(crate) posts: Mutex<Vec<PostRecord>>,
    pub(crate) reject_admin_inserts: AtomicBool,
}

impl FakeStore {
    pub(crate) async fn seed_role(&self, tenant_id: TenantId, grants: Vec<Grant>) -> RoleId {
        let now = Utc::now();
        let role_id = RoleId::new();
        self.roles.lock().await.push(RoleRecord {
            id: role_id,
            tenant_id,
            name: format!("role-{role_id}"),
            description: None,
            grants,
            created_by: "seed".to_owned(),
            updated_by: "seed".to_owned(),
            created_at: now,
            updated_at: now,
        });
        role_id
    }

    pub(crate) async fn seed_admin(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        email: &str,
        password: &str,
    ) -> AdminUserRecord {
        let now = Utc::now();
        let record = AdminUserRecord {
            id: AdminUserId::new(),
            tenant_id,
            username: None,
            email: email.to_owned(),
            first_name: "Seed".to_owned(),
            last_name: "Admin".to_owned(),
            full_name: "Seed Admin".to_owned(),
            bio: None,
            image: None,
            phone: None,
            role_id,
            password_hash: format!("hashed:{password}"),
            verified_at: Some(now),
            created_by: "seed".to_owned(),
            updated_by: "seed".to_owned(),
            created_at: now - Duration::seconds(1),
            updated_at: now,
        };
        self.admins.lock().await.push(record.clone());
        record
    }

    pub(crate) async fn event_actions(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .await
            .iter()
            .map(|event| event.action.as_str())
            .collect()
    }
}

pub(crate) fn identity_for(record: &AdminUserRecord) -> AdminIdentity {
    AdminIdentity::new(
        record.id,
        record.full_name.clone(),
        Some(record.email.clone()),
        record.tenant_id,
    )
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for FakeStore {
    async fn create_session(&self, record: SessionRecord) -> AppResult<()> {
        self.sessions.lock().await.push(record);
        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> AppResult<Option<SessionRecord>> {
        Ok(self
            .sessions
            .lock()
            .await
            .iter()
            .find(|session| session.id == session_id)
            .cloned())
    }

    async fn rotate_session(
        &self,
        session_id: SessionId,
        expected_hash: &str,
        secret_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions
            .iter_mut()
            .find(|session| session.id == session_id && session.secret_hash == expected_hash)
        else {
            return Ok(false);
        };
        session.secret_hash = secret_hash;
        session.expires_at = expires_at;
        session.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_session(&self, session_id: SessionId) -> AppResult<()> {
        self.sessions
            .lock()
            .await
            .retain(|session| session.id != session_id);
        Ok(())
    }
}

#[async_trait]
impl AdminUserRepository for FakeStore {
    async fn create_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        if self.reject_admin_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("admin insert failed".to_owned()));
        }
        let mut admins = self.admins.lock().await;
        if admins.iter().any(|admin| {
            admin.email == record.email
                || (record.username.is_some() && admin.username == record.username)
        }) {
            return Err(AppError::Conflict("email or username taken".to_owned()));
        }
        admins.push(record);
        Ok(())
    }

    async fn find_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .lock()
            .await
            .iter()
            .find(|admin| admin.tenant_id == tenant_id && admin.id == admin_id)
            .cloned())
    }

    async fn find_admin_user_by_email(&self, email: &str) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .lock()
            .await
            .iter()
            .find(|admin| admin.email == email)
            .cloned())
    }

    async fn find_admin_user_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .lock()
            .await
            .iter()
            .find(|admin| admin.username.as_deref() == Some(username))
            .cloned())
    }

    async fn list_admin_users(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AdminUserRecord>> {
        let admins = self.admins.lock().await;
        window.apply(
            admins
                .iter()
                .filter(|admin| admin.tenant_id == tenant_id)
                .cloned(),
        )
    }

    async fn update_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        let mut admins = self.admins.lock().await;
        let Some(existing) = admins.iter_mut().find(|admin| admin.id == record.id) else {
            return Err(AppError::NotFound("admin".to_owned()));
        };
        *existing = record;
        Ok(())
    }

    async fn soft_delete_admin_user(
        &self,
        _tenant_id: TenantId,
        admin_id: AdminUserId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        self.admins.lock().await.retain(|admin| admin.id != admin_id);
        Ok(())
    }

    async fn count_admin_users(&self, tenant_id: TenantId) -> AppResult<usize> {
        Ok(self
            .admins
            .lock()
            .await
            .iter()
            .filter(|admin| admin.tenant_id == tenant_id)
            .count())
    }

    async fn count_admin_users_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<usize> {
        Ok(self
            .admins
            .lock()
            .await
            .iter()
            .filter(|admin| admin.tenant_id == tenant_id && admin.role_id == role_id)
            .count())
    }
}

#[async_trait]
impl RoleRepository for FakeStore {
    async fn create_role(&self, record: RoleRecord) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles
            .iter()
            .any(|role| role.tenant_id == record.tenant_id && role.name == record.name)
        {
            return Err(AppError::Conflict("role name taken".to_owned()));
        }
        roles.push(record);
        Ok(())
    }

    async fn find_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.tenant_id == tenant_id && role.id == role_id)
            .cloned())
    }

    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.tenant_id == tenant_id && role.name == name)
            .cloned())
    }

    async fn list_roles(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<RoleRecord>> {
        let roles = self.roles.lock().await;
        window.apply(roles.iter().filter(|role| role.tenant_id == tenant_id).cloned())
    }

    async fn update_role(&self, record: RoleRecord) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let Some(existing) = roles.iter_mut().find(|role| role.id == record.id) else {
            return Err(AppError::NotFound("role".to_owned()));
        };
        *existing = record;
        Ok(())
    }

    async fn soft_delete_role(
        &self,
        _tenant_id: TenantId,
        role_id: RoleId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        self.roles.lock().await.retain(|role| role.id != role_id);
        Ok(())
    }
}

#[async_trait]
impl PageRepository for FakeStore {
    async fn create_page(&self, record: PageRecord) -> AppResult<()> {
        let mut pages = self.pages.lock().await;
        if pages
            .iter()
            .any(|page| page.tenant_id == record.tenant_id && page.slug == record.slug)
        {
            return Err(AppError::Conflict("slug taken".to_owned()));
        }
        pages.push(record);
        Ok(())
    }

    async fn find_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
    ) -> AppResult<Option<PageRecord>> {
        Ok(self
            .pages
            .lock()
            .await
            .iter()
            .find(|page| page.tenant_id == tenant_id && page.id == page_id)
            .cloned())
    }

    async fn find_page_by_slug(
        &self,
        tenant_id: TenantId,
        slug: &str,
    ) -> AppResult<Option<PageRecord>> {
        Ok(self
            .pages
            .lock()
            .await
            .iter()
            .find(|page| page.tenant_id == tenant_id && page.slug == slug)
            .cloned())
    }

    async fn list_pages(
        &self,
        tenant_id: TenantId,
        filter: PageListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PageRecord>> {
        let pages = self.pages.lock().await;
        window.apply(
            pages
                .iter()
                .filter(|page| page.tenant_id == tenant_id)
                .filter(|page| filter.status.is_none_or(|status| page.status == status))
                .cloned(),
        )
    }

    async fn update_page(&self, record: PageRecord) -> AppResult<()> {
        let mut pages = self.pages.lock().await;
        let Some(existing) = pages.iter_mut().find(|page| page.id == record.id) else {
            return Err(AppError::NotFound("page".to_owned()));
        };
        *existing = record;
        Ok(())
    }

    async fn soft_delete_page(
        &self,
        _tenant_id: TenantId,
        page_id: PageId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        self.pages.lock().await.retain(|page| page.id != page_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn create_user(&self, record: UserRecord) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|user| {
            user.tenant_id == record.tenant_id
                && (user.username == record.username || user.email == record.email)
        }) {
            return Err(AppError::Conflict("username or email taken".to_owned()));
        }
        users.push(record);
        Ok(())
    }

    async fn find_user(&self, tenant_id: TenantId, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.tenant_id == tenant_id && user.id == user_id)
            .cloned())
    }

    async fn list_users(
        &self,
        tenant_id: TenantId,
        filter: &UserListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<UserRecord>> {
        let users = self.users.lock().await;
        window.apply(
            users
                .iter()
                .filter(|user| user.tenant_id == tenant_id && filter.matches(user))
                .cloned(),
        )
    }

    async fn update_user(&self, record: UserRecord) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|user| {
            user.id != record.id
                && user.tenant_id == record.tenant_id
                && (user.username == record.username || user.email == record.email)
        }) {
            return Err(AppError::Conflict("username or email taken".to_owned()));
        }
        let Some(existing) = users.iter_mut().find(|user| user.id == record.id) else {
            return Err(AppError::NotFound("user".to_owned()));
        };
        *existing = record;
        Ok(())
    }

    async fn soft_delete_user(
        &self,
        _tenant_id: TenantId,
        user_id: UserId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        self.users.lock().await.retain(|user| user.id != user_id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakeStore {
    async fn create_post(&self, record: PostRecord) -> AppResult<()> {
        let mut posts = self.posts.lock().await;
        if posts
            .iter()
            .any(|post| post.tenant_id == record.tenant_id && post.slug == record.slug)
        {
            return Err(AppError::Conflict("slug taken".to_owned()));
        }
        posts.push(record);
        Ok(())
    }

    async fn find_post(&self, tenant_id: TenantId, post_id: PostId) -> AppResult<Option<PostRecord>> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|post| post.tenant_id == tenant_id && post.id == post_id)
            .cloned())
    }

    async fn list_posts(
        &self,
        tenant_id: TenantId,
        filter: &PostListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PostRecord>> {
        let posts = self.posts.lock().await;
        window.apply(
            posts
                .iter()
                .filter(|post| post.tenant_id == tenant_id && filter.matches(post))
                .cloned(),
        )
    }

    async fn count_posts_by_author(
        &self,
        tenant_id: TenantId,
        author_id: UserId,
    ) -> AppResult<usize> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .filter(|post| post.tenant_id == tenant_id && post.author_id == author_id)
            .count())
    }

    async fn update_post(&self, record: PostRecord) -> AppResult<()> {
        let mut posts = self.posts.lock().await;
        if posts.iter().any(|post| {
            post.id != record.id && post.tenant_id == record.tenant_id && post.slug == record.slug
        }) {
            return Err(AppError::Conflict("slug taken".to_owned()));
        }
        let Some(existing) = posts.iter_mut().find(|post| post.id == record.id) else {
            return Err(AppError::NotFound("post".to_owned()));
        };
        *existing = record;
        Ok(())
    }

    async fn soft_delete_post(
        &self,
        _tenant_id: TenantId,
        post_id: PostId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        self.posts.lock().await.retain(|post| post.id != post_id);
        Ok(())
    }
}

/// Reversible stand-in for Argon2id.
pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash.strip_prefix("hashed:") == Some(password))
    }
}

/// Token codec encoding the identity fields as plain text.
pub(crate) struct PlainTokenCodec;

impl AccessTokenCodec for PlainTokenCodec {
    fn issue(&self, identity: &AdminIdentity) -> AppResult<IssuedAccessToken> {
        Ok(IssuedAccessToken {
            token: format!("{}|{}", identity.subject(), identity.tenant_id()),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn verify(&self, token: &str) -> AppResult<AdminIdentity> {
        let invalid = || AppError::Unauthorized("invalid token".to_owned());
        let (subject, tenant_id) = token.split_once('|').ok_or_else(invalid)?;
        let admin_id: AdminUserId = subject.parse().map_err(|_| invalid())?;
        let tenant_id = tenant_id.parse().map_err(|_| invalid())?;
        Ok(AdminIdentity::new(admin_id, subject, None, tenant_id))
    }
}

use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{Comment, Review, Role},
};

/// ResourceKind
///
/// Explicit discriminant carried by moderated objects. The moderator tier is
/// scoped to user-generated content only, so the object-level check needs to
/// know what kind of thing it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Category,
    Genre,
    Title,
    Review,
    Comment,
}

impl ResourceKind {
    /// Kinds a moderator may edit or delete regardless of authorship.
    pub fn is_moderatable(&self) -> bool {
        matches!(self, ResourceKind::Review | ResourceKind::Comment)
    }
}

/// Moderated
///
/// Seam between the permission rules and the domain objects: anything that
/// can be the target of an object-level check exposes its kind and author.
pub trait Moderated {
    fn kind(&self) -> ResourceKind;
    fn author_id(&self) -> Uuid;
}

impl Moderated for Review {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Review
    }

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Moderated for Comment {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Comment
    }

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Request-level check for unsafe methods: writers must be authenticated.
/// Safe (read-only) routes never call this; they carry no principal at all.
pub fn require_user(principal: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    principal.ok_or(ApiError::AuthenticationRequired)
}

/// Admin gate for user management and catalog writes.
pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied)
    }
}

/// Object-level check for mutating an owned object.
///
/// Evaluated in strict tie-break order: admins pass unconditionally, then
/// moderators pass for review/comment targets, then authorship decides.
pub fn check_object(user: &AuthUser, target: &impl Moderated) -> Result<(), ApiError> {
    if user.role.is_admin() {
        return Ok(());
    }

    if target.kind().is_moderatable() && user.role >= Role::Moderator {
        return Ok(());
    }

    if target.author_id() == user.id {
        return Ok(());
    }

    Err(ApiError::PermissionDenied)
}

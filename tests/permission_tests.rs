mod common;

use common::{
    ADMIN_ID, MODERATOR_ID, OTHER_USER_ID, USER_ID, admin, moderator, regular_user, sample_comment,
    sample_review,
};
use ratehub::{
    error::ApiError,
    models::Role,
    permissions::{Moderated, ResourceKind, check_object, require_admin, require_user},
};

// --- Request-level checks ---

#[test]
fn unauthenticated_writer_is_rejected_before_object_logic() {
    let result = require_user(None);
    assert!(matches!(result, Err(ApiError::AuthenticationRequired)));
}

#[test]
fn authenticated_writer_passes_request_level_check() {
    let user = regular_user();
    let resolved = require_user(Some(&user)).expect("authenticated principal must pass");
    assert_eq!(resolved.id, USER_ID);
}

// --- Admin gate ---

#[test]
fn admin_gate_rejects_user_and_moderator() {
    assert!(matches!(
        require_admin(&regular_user()),
        Err(ApiError::PermissionDenied)
    ));
    // Moderator authority is scoped to reviews/comments; it does not open
    // the admin surface.
    assert!(matches!(
        require_admin(&moderator()),
        Err(ApiError::PermissionDenied)
    ));
    assert!(require_admin(&admin()).is_ok());
}

// --- Object-level checks ---

#[test]
fn admin_passes_object_check_regardless_of_authorship() {
    let review = sample_review(OTHER_USER_ID);
    let comment = sample_comment(OTHER_USER_ID);

    assert!(check_object(&admin(), &review).is_ok());
    assert!(check_object(&admin(), &comment).is_ok());
}

#[test]
fn moderator_passes_for_reviews_and_comments_only() {
    let review = sample_review(OTHER_USER_ID);
    let comment = sample_comment(OTHER_USER_ID);

    assert!(check_object(&moderator(), &review).is_ok());
    assert!(check_object(&moderator(), &comment).is_ok());

    // Outside the moderatable kinds the role grants nothing; the kind
    // discriminant itself reports this.
    assert!(!ResourceKind::Title.is_moderatable());
    assert!(!ResourceKind::Category.is_moderatable());
    assert!(!ResourceKind::Genre.is_moderatable());
}

#[test]
fn author_may_touch_own_objects() {
    let review = sample_review(USER_ID);
    let comment = sample_comment(USER_ID);

    assert!(check_object(&regular_user(), &review).is_ok());
    assert!(check_object(&regular_user(), &comment).is_ok());
}

#[test]
fn stranger_is_denied() {
    let review = sample_review(OTHER_USER_ID);
    let comment = sample_comment(OTHER_USER_ID);

    assert!(matches!(
        check_object(&regular_user(), &review),
        Err(ApiError::PermissionDenied)
    ));
    assert!(matches!(
        check_object(&regular_user(), &comment),
        Err(ApiError::PermissionDenied)
    ));
}

#[test]
fn moderator_author_tiebreak_order_is_admin_first() {
    // A moderator who also authored the review passes through the moderator
    // branch; an admin author short-circuits on the admin branch. Observable
    // behavior is identical, but both must pass.
    let own_review = sample_review(MODERATOR_ID);
    assert!(check_object(&moderator(), &own_review).is_ok());

    let admin_review = sample_review(ADMIN_ID);
    assert!(check_object(&admin(), &admin_review).is_ok());
}

// --- Role ordering ---

#[test]
fn role_ordering_matches_authority_tiers() {
    assert!(Role::User < Role::Moderator);
    assert!(Role::Moderator < Role::Admin);

    assert!(Role::Admin.is_admin());
    assert!(Role::Admin.is_moderator());
    assert!(Role::Moderator.is_moderator());
    assert!(!Role::Moderator.is_admin());
    assert!(!Role::User.is_moderator());
}

#[test]
fn moderated_objects_report_their_kind() {
    let review = sample_review(USER_ID);
    let comment = sample_comment(USER_ID);

    assert!(matches!(review.kind(), ResourceKind::Review));
    assert!(matches!(comment.kind(), ResourceKind::Comment));
    assert_eq!(review.author_id(), USER_ID);
}

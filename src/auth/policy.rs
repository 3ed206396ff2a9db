//! Who may do what to which resource.
//!
//! Every endpoint names its `(Resource, Action)` pair; `policy_for` turns that
//! into a `Policy` and `authorize` evaluates it against the caller's
//! `Identity`. Ownership is always "the advisor of the school the record hangs
//! off" (or the user themself, for user records), so callers pass the owner's
//! user id when the policy needs it.
//!
//! ```text
//!                 List        Create         Retrieve          Update            Destroy
//! User            superuser   open           owner|superuser   owner|superuser   owner|superuser
//! School          superuser   authenticated  owner|superuser   owner|superuser   owner|superuser
//! Assignment      superuser   superuser      owner|superuser   superuser         superuser
//! Delegate        superuser   open           owner|superuser   owner|superuser   owner|superuser
//! ```

use crate::auth::identity::Identity;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    School,
    Assignment,
    Delegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Open,
    Authenticated,
    SuperuserOnly,
    OwnerOrSuperuser,
}

pub fn policy_for(resource: Resource, action: Action) -> Policy {
    use Action::*;
    match (resource, action) {
        (_, List) => Policy::SuperuserOnly,
        (Resource::User | Resource::Delegate, Create) => Policy::Open,
        (Resource::School, Create) => Policy::Authenticated,
        (Resource::Assignment, Create | Update | Destroy) => Policy::SuperuserOnly,
        (_, Retrieve | Update | Destroy) => Policy::OwnerOrSuperuser,
    }
}

/// Evaluate `policy` for `identity`. `owner_id` is the user id that owns the
/// target object; it is only consulted by `OwnerOrSuperuser`, where `None`
/// means nobody but a superuser qualifies.
///
/// Anonymous callers always get `NotAuthenticated` rather than
/// `PermissionDenied` when a policy needs a login.
pub fn authorize(identity: &Identity, policy: Policy, owner_id: Option<i64>) -> Result<(), AppError> {
    if policy == Policy::Open {
        return Ok(());
    }
    let user = identity.require_user()?;
    match policy {
        Policy::Open | Policy::Authenticated => Ok(()),
        _ if user.is_superuser => Ok(()),
        Policy::SuperuserOnly => Err(AppError::PermissionDenied(
            "Only superusers may perform this action.".to_string(),
        )),
        Policy::OwnerOrSuperuser if owner_id == Some(user.id) => Ok(()),
        Policy::OwnerOrSuperuser => Err(AppError::PermissionDenied(
            "You do not have permission to perform this action.".to_string(),
        )),
    }
}

/// Shorthand for `authorize(identity, policy_for(resource, action), owner_id)`.
pub fn check(
    identity: &Identity,
    resource: Resource,
    action: Action,
    owner_id: Option<i64>,
) -> Result<(), AppError> {
    authorize(identity, policy_for(resource, action), owner_id)
}

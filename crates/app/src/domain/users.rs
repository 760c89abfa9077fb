//! Users
//!
//! Accounts are managed by the identity provider; only their ids reach the settlement core.

use crate::uuids::TypedUuid;

/// Marker for user identifiers.
#[derive(Debug)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

//! The signed-in caller, as reported by whatever identity provider fronts the
//! service. Passed explicitly into operations that care about it.

use serde::{Deserialize, Serialize};

/// Privilege tier of an authenticated identity.
///
/// There is one tier today: anyone who can sign in moderates.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Role {
  #[default]
  Admin,
}

impl Role {
  /// Whether this role may change a suggestion's status.
  pub fn can_moderate(self) -> bool { matches!(self, Self::Admin) }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Login name used by the identity provider.
  pub username: String,
  /// Display name, if the account has one.
  pub name:     Option<String>,
  pub email:    Option<String>,
  #[serde(default)]
  pub role:     Role,
}

impl Identity {
  /// An identity with the default role and no profile fields.
  pub fn new(username: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      name:     None,
      email:    None,
      role:     Role::default(),
    }
  }

  pub fn can_moderate(&self) -> bool { self.role.can_moderate() }
}

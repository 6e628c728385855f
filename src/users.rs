//! Users

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// User Id
pub type UserId = TypedId<UserProfile>;

/// The signed-in shopper, as saved by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: UserId,

    /// Email address
    pub email: String,

    /// Name shown in the header
    #[serde(default)]
    pub display_name: Option<String>,
}

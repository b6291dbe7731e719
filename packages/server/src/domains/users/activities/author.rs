//! Author gate for publishing.

use tracing::{debug, warn};

use crate::common::{CoreError, CoreResult, Step};
use crate::kernel::{ServerDeps, UserFilter};

/// Confirm that `username` names an existing user.
///
/// Read-only. Publishing calls this before any tag or post write, so a
/// missing author leaves the store untouched.
pub async fn validate_author(username: &str, deps: &ServerDeps) -> CoreResult<()> {
    let count = deps
        .store
        .count_users(&UserFilter::Username(username.to_string()))
        .await
        .map_err(|e| CoreError::store(Step::ValidateAuthor, e))?;

    if count == 0 {
        warn!(author = %username, "Author does not exist");
        return Err(CoreError::AuthorNotFound {
            author: username.to_string(),
        });
    }

    debug!(author = %username, "Author validated");
    Ok(())
}

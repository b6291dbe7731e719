//! User registration and maintenance.
//!
//! Single-collection operations; the only cross-entity rule users take part
//! in is the author check in `author.rs`.

use chrono::Utc;
use tracing::info;

use crate::common::{CoreError, CoreResult, Step, StoreError};
use crate::domains::users::models::{CreateUser, UpdateUser, User};
use crate::kernel::{ServerDeps, UserChanges, UserFilter};

/// Register a user. Usernames are unique.
pub async fn create_user(input: CreateUser, deps: &ServerDeps) -> CoreResult<User> {
    if input.username.trim().is_empty() {
        return Err(CoreError::InvalidInput("username is required".into()));
    }

    let filter = UserFilter::Username(input.username.clone());
    let existing = deps
        .store
        .count_users(&filter)
        .await
        .map_err(|e| CoreError::store(Step::SaveUser, e))?;
    if existing > 0 {
        return Err(CoreError::UserAlreadyExists {
            username: input.username,
        });
    }

    let user = User::new(input);
    match deps.store.insert_user(&user).await {
        Ok(_) => {}
        // Another registration won between the count and the insert.
        Err(StoreError::Duplicate { .. }) => {
            return Err(CoreError::UserAlreadyExists {
                username: user.username,
            })
        }
        Err(e) => return Err(CoreError::store(Step::SaveUser, e)),
    }

    info!(user_id = %user.id, username = %user.username, "Created user");
    Ok(user)
}

pub async fn list_users(deps: &ServerDeps) -> CoreResult<Vec<User>> {
    deps.store
        .find_users(&UserFilter::All)
        .await
        .map_err(|e| CoreError::store(Step::LoadUsers, e))
}

/// Update email and/or password of the user called `username`.
///
/// `updated_at` is bumped on every call.
pub async fn update_user(username: &str, input: UpdateUser, deps: &ServerDeps) -> CoreResult<User> {
    let filter = UserFilter::Username(username.to_string());
    let changes = UserChanges {
        email: input.email,
        password: input.password,
        updated_at: Some(Utc::now()),
    };

    let result = deps
        .store
        .update_user(&filter, &changes)
        .await
        .map_err(|e| CoreError::store(Step::SaveUser, e))?;
    if result.matched == 0 {
        return Err(CoreError::UserNotFound {
            username: username.to_string(),
        });
    }

    info!(username = %username, "Updated user");

    deps.store
        .find_users(&filter)
        .await
        .map_err(|e| CoreError::store(Step::LoadUsers, e))?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::UserNotFound {
            username: username.to_string(),
        })
}

/// Delete the user called `username`.
///
/// Their posts are kept; `Post.author` is only checked at publish time.
pub async fn delete_user(username: &str, deps: &ServerDeps) -> CoreResult<()> {
    let deleted = deps
        .store
        .delete_user(&UserFilter::Username(username.to_string()))
        .await
        .map_err(|e| CoreError::store(Step::DeleteUser, e))?;
    if deleted == 0 {
        return Err(CoreError::UserNotFound {
            username: username.to_string(),
        });
    }

    info!(username = %username, "Deleted user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> CreateUser {
        CreateUser::builder()
            .username("alice")
            .email("alice@example.com")
            .password("secret")
            .build()
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let deps = ServerDeps::in_memory();
        create_user(alice(), &deps).await.unwrap();

        let err = create_user(alice(), &deps).await.unwrap_err();
        assert!(matches!(err, CoreError::UserAlreadyExists { .. }));
        assert_eq!(list_users(&deps).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_username_is_invalid() {
        let deps = ServerDeps::in_memory();
        let err = create_user(CreateUser::builder().username("  ").build(), &deps)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let deps = ServerDeps::in_memory();
        let created = create_user(alice(), &deps).await.unwrap();

        let updated = update_user(
            "alice",
            UpdateUser {
                email: Some("new@example.com".into()),
                password: None,
            },
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.password, "secret");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_users() {
        let deps = ServerDeps::in_memory();

        let err = update_user("ghost", UpdateUser::default(), &deps)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound { .. }));

        let err = delete_user("ghost", &deps).await.unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_the_user() {
        let deps = ServerDeps::in_memory();
        create_user(alice(), &deps).await.unwrap();

        delete_user("alice", &deps).await.unwrap();
        assert!(list_users(&deps).await.unwrap().is_empty());
    }
}

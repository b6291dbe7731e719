//! Tag registration.

use tracing::{debug, info};

use crate::common::{CoreError, CoreResult, Step, StoreError};
use crate::domains::tag::models::Tag;
use crate::kernel::{ServerDeps, TagFilter};

/// Return the tag called `name`, creating it with an empty post list if it
/// does not exist yet.
///
/// Concurrent calls for the same name end with exactly one tag document.
pub async fn ensure_tag(name: &str, deps: &ServerDeps) -> CoreResult<Tag> {
    let name = name.to_lowercase();
    let upsert = deps
        .store
        .insert_tag_if_absent(&Tag::new(name.as_str()))
        .await
        .map_err(|e| CoreError::store(Step::RegisterTag, e))?;

    if upsert.created {
        info!(tag = %name, tag_id = %upsert.tag.id, "Created tag");
    } else {
        debug!(tag = %name, "Tag already registered");
    }
    Ok(upsert.tag)
}

/// Create a tag that must not exist yet.
pub async fn create_tag(name: &str, deps: &ServerDeps) -> CoreResult<Tag> {
    let name = name.to_lowercase();
    let existing = deps
        .store
        .count_tags(&TagFilter::Name(name.clone()))
        .await
        .map_err(|e| CoreError::store(Step::RegisterTag, e))?;
    if existing > 0 {
        return Err(CoreError::TagAlreadyExists { name });
    }

    let tag = Tag::new(name);
    match deps.store.insert_tag(&tag).await {
        Ok(()) => {
            info!(tag = %tag.name, tag_id = %tag.id, "Created tag");
            Ok(tag)
        }
        Err(StoreError::Duplicate { .. }) => Err(CoreError::TagAlreadyExists { name: tag.name }),
        Err(e) => Err(CoreError::store(Step::RegisterTag, e)),
    }
}

pub async fn list_tags(deps: &ServerDeps) -> CoreResult<Vec<Tag>> {
    deps.store
        .find_tags(&TagFilter::All)
        .await
        .map_err(|e| CoreError::store(Step::LoadTags, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_tag_is_idempotent() {
        let deps = ServerDeps::in_memory();

        let first = ensure_tag("rust", &deps).await.unwrap();
        let second = ensure_tag("rust", &deps).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(list_tags(&deps).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_tag_normalizes_case() {
        let deps = ServerDeps::in_memory();

        let tag = ensure_tag("Rust", &deps).await.unwrap();
        assert_eq!(tag.name, "rust");
        assert_eq!(ensure_tag("rust", &deps).await.unwrap().id, tag.id);
    }

    #[tokio::test]
    async fn create_tag_rejects_existing_names() {
        let deps = ServerDeps::in_memory();
        ensure_tag("rust", &deps).await.unwrap();

        let err = create_tag("rust", &deps).await.unwrap_err();
        assert!(matches!(err, CoreError::TagAlreadyExists { ref name } if name == "rust"));
    }

    #[tokio::test]
    async fn empty_name_is_a_regular_tag() {
        let deps = ServerDeps::in_memory();

        let tag = ensure_tag("", &deps).await.unwrap();
        assert_eq!(tag.name, "");
        assert!(tag.posts.is_empty());
    }
}

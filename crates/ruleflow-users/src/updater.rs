//! Staged user and metadata mutations.
//!
//! Mutations are applied locally to the borrowed [`UserRecord`] first so
//! that later hook code sees them, then pushed to the remote API on
//! demand. Metadata writes can be scoped under a namespace key to keep a
//! hook's fields from colliding with anything else stored on the user.

use crate::client::UserApiClient;
use crate::error::UserApiResult;
use ruleflow_core::UserRecord;
use serde_json::{Map, Value};

/// Staged mutations over one user record.
///
/// Namespacing rule: when a namespace is active, metadata keys address
/// members of the namespace object, except a key equal to the namespace
/// itself, which addresses the namespace container at the top level of
/// the metadata map (replacing it wholesale).
#[derive(Debug)]
pub struct UserUpdater<'a> {
    user: &'a mut UserRecord,
    namespace: Option<String>,
    staged: Map<String, Value>,
}

impl<'a> UserUpdater<'a> {
    /// Create an updater without metadata namespacing.
    pub fn new(user: &'a mut UserRecord) -> Self {
        Self {
            user,
            namespace: None,
            staged: Map::new(),
        }
    }

    /// Create an updater whose metadata writes are scoped under
    /// `namespace` in both metadata buckets.
    pub fn with_namespace(user: &'a mut UserRecord, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        ensure_object(&mut user.user_metadata, &namespace);
        ensure_object(&mut user.app_metadata, &namespace);

        Self {
            user,
            namespace: Some(namespace),
            staged: Map::new(),
        }
    }

    /// The user record being mutated.
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        self.user
    }

    /// Top-level fields staged for [`push_user`](Self::push_user).
    #[must_use]
    pub fn staged(&self) -> &Map<String, Value> {
        &self.staged
    }

    /// Set a top-level profile field and stage it for a remote update.
    pub fn set_user(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.user.attributes.insert(key.clone(), value.clone());
        self.staged.insert(key, value);
    }

    /// Set a user-metadata field (namespace-aware).
    pub fn set_user_meta(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        set_meta(&mut self.user.user_metadata, self.namespace.as_deref(), key, value);
    }

    /// Set an app-metadata field (namespace-aware).
    pub fn set_app_meta(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        set_meta(&mut self.user.app_metadata, self.namespace.as_deref(), key, value);
    }

    /// Get a user-metadata field (namespace-aware).
    #[must_use]
    pub fn get_user_meta(&self, key: &str) -> Option<&Value> {
        get_meta(&self.user.user_metadata, self.namespace.as_deref(), key)
    }

    /// Get an app-metadata field (namespace-aware).
    #[must_use]
    pub fn get_app_meta(&self, key: &str) -> Option<&Value> {
        get_meta(&self.user.app_metadata, self.namespace.as_deref(), key)
    }

    /// Push the staged top-level fields to the remote API.
    pub async fn push_user(&self, client: &UserApiClient) -> UserApiResult<()> {
        client.update_user(&self.user.user_id, &self.staged).await
    }

    /// Push the full user-metadata bucket to the remote API.
    pub async fn push_user_metadata(&self, client: &UserApiClient) -> UserApiResult<()> {
        client
            .update_user_metadata(&self.user.user_id, &self.user.user_metadata)
            .await
    }

    /// Push the full app-metadata bucket to the remote API.
    pub async fn push_app_metadata(&self, client: &UserApiClient) -> UserApiResult<()> {
        client
            .update_app_metadata(&self.user.user_id, &self.user.app_metadata)
            .await
    }
}

/// Make sure `map[key]` exists, seeding an empty object if absent.
fn ensure_object(map: &mut Map<String, Value>, key: &str) {
    map.entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
}

fn set_meta(
    metadata: &mut Map<String, Value>,
    namespace: Option<&str>,
    key: String,
    value: Value,
) {
    match namespace {
        Some(ns) if key != ns => {
            let container = metadata
                .entry(ns.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !container.is_object() {
                *container = Value::Object(Map::new());
            }
            if let Some(object) = container.as_object_mut() {
                object.insert(key, value);
            }
        }
        _ => {
            metadata.insert(key, value);
        }
    }
}

fn get_meta<'m>(
    metadata: &'m Map<String, Value>,
    namespace: Option<&str>,
    key: &str,
) -> Option<&'m Value> {
    match namespace {
        Some(ns) if key != ns => metadata.get(ns)?.get(key),
        _ => metadata.get(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_user() -> UserRecord {
        let mut user = UserRecord::new("user-1");
        user.user_metadata
            .insert("prop".to_string(), json!("user-value"));
        user.user_metadata
            .insert("ns".to_string(), json!({ "prop": "namespaced-user-value" }));
        user.app_metadata
            .insert("prop".to_string(), json!("app-value"));
        user.app_metadata
            .insert("ns".to_string(), json!({ "prop": "namespaced-app-value" }));
        user
    }

    #[test]
    fn test_set_user_stages_and_applies() {
        let mut user = seeded_user();
        let mut updater = UserUpdater::new(&mut user);

        updater.set_user("nickname", json!("sam"));

        assert_eq!(updater.user().attributes["nickname"], json!("sam"));
        assert_eq!(updater.staged()["nickname"], json!("sam"));
    }

    #[test]
    fn test_set_meta_without_namespace() {
        let mut user = seeded_user();
        let mut updater = UserUpdater::new(&mut user);

        updater.set_user_meta("color", json!("red"));
        updater.set_app_meta("tier", json!("gold"));

        assert_eq!(user.user_metadata["color"], json!("red"));
        assert_eq!(user.app_metadata["tier"], json!("gold"));
    }

    #[test]
    fn test_set_meta_with_namespace() {
        let mut user = seeded_user();
        let mut updater = UserUpdater::with_namespace(&mut user, "ns");

        updater.set_user_meta("color", json!("red"));
        updater.set_app_meta("tier", json!("gold"));

        assert_eq!(user.user_metadata["ns"]["color"], json!("red"));
        assert_eq!(user.user_metadata["ns"]["prop"], json!("namespaced-user-value"));
        assert_eq!(user.app_metadata["ns"]["tier"], json!("gold"));
    }

    #[test]
    fn test_namespace_key_addresses_the_container() {
        let mut user = seeded_user();
        let mut updater = UserUpdater::with_namespace(&mut user, "ns");

        updater.set_user_meta("ns", json!("flattened"));
        assert_eq!(user.user_metadata["ns"], json!("flattened"));

        let mut updater = UserUpdater::with_namespace(&mut user, "ns");
        updater.set_app_meta("ns", json!("flattened"));
        assert_eq!(user.app_metadata["ns"], json!("flattened"));
    }

    #[test]
    fn test_with_namespace_seeds_missing_containers() {
        let mut user = UserRecord::new("user-1");
        let updater = UserUpdater::with_namespace(&mut user, "ns");

        assert_eq!(updater.user().user_metadata["ns"], json!({}));
        assert_eq!(updater.user().app_metadata["ns"], json!({}));
    }

    #[test]
    fn test_get_meta_without_namespace() {
        let mut user = seeded_user();
        let updater = UserUpdater::new(&mut user);

        assert_eq!(updater.get_user_meta("prop"), Some(&json!("user-value")));
        assert_eq!(updater.get_app_meta("prop"), Some(&json!("app-value")));
        assert_eq!(updater.get_user_meta("missing"), None);
    }

    #[test]
    fn test_get_meta_with_namespace() {
        let mut user = seeded_user();
        let updater = UserUpdater::with_namespace(&mut user, "ns");

        assert_eq!(
            updater.get_user_meta("prop"),
            Some(&json!("namespaced-user-value"))
        );
        assert_eq!(
            updater.get_app_meta("prop"),
            Some(&json!("namespaced-app-value"))
        );
        assert_eq!(updater.get_app_meta("missing"), None);
    }

    #[test]
    fn test_get_namespace_key_returns_the_container() {
        let mut user = seeded_user();
        let updater = UserUpdater::with_namespace(&mut user, "ns");

        assert_eq!(
            updater.get_user_meta("ns"),
            Some(&json!({ "prop": "namespaced-user-value" }))
        );
    }

    #[test]
    fn test_set_meta_repairs_non_object_container() {
        let mut user = UserRecord::new("user-1");
        user.user_metadata.insert("ns".to_string(), json!("scalar"));

        let mut updater = UserUpdater::with_namespace(&mut user, "ns");
        updater.set_user_meta("color", json!("red"));

        assert_eq!(user.user_metadata["ns"]["color"], json!("red"));
    }
}

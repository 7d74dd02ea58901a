//! Theme store: the raw theme settings document and dotted-path edits.

use serde_json::{Map, Value};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ThemeError;

/// The theme settings document, edited in place by the customizer.
///
/// Settings are an opaque JSON tree; the SDK does not model individual
/// components. Paths are dotted strings ("components.header.logo_url");
/// numeric segments index into arrays ("sliders.0.image_url").
#[derive(Debug, Default)]
pub struct ThemeStore {
    setting: Value,
    initial: Value,
    loaded: bool,
}

impl ThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current settings tree. [`Value::Null`] before loading.
    #[must_use]
    pub fn setting(&self) -> &Value {
        &self.setting
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the tree differs from the loaded baseline.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.setting != self.initial
    }

    /// Load theme settings, keeping a pristine copy for [`Self::reset`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ThemeError> {
        let settings = api.theme_settings().await?;
        self.setting = settings.clone();
        self.initial = settings;
        self.loaded = true;
        Ok(())
    }

    /// Read the value at a dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.setting, path)
    }

    /// Write `value` at a dotted path, creating intermediate objects (or
    /// arrays, for numeric segments) along the way.
    ///
    /// Returns the value previously at the path, `None` when the path did
    /// not exist. The customizer uses this for its undo stack.
    pub fn set(&mut self, path: &str, value: Value) -> Option<Value> {
        let previous = get_path(&self.setting, path).cloned();
        set_path(&mut self.setting, path, value);
        previous
    }

    /// Settings subtree of one storefront component, when configured.
    #[must_use]
    pub fn component_settings(&self, key: &str) -> Option<&Value> {
        self.setting.get("components")?.get(key)
    }

    /// Persist the whole settings tree.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::NotLoaded`] before a load, or an API error when
    /// the save fails.
    #[instrument(skip_all)]
    pub async fn save(&mut self, api: &ApiClient) -> Result<(), ThemeError> {
        if !self.loaded {
            return Err(ThemeError::NotLoaded);
        }
        api.save_theme_settings(&self.setting).await?;
        self.initial = self.setting.clone();
        Ok(())
    }

    /// Throw away unsaved edits, restoring the loaded baseline.
    pub fn reset(&mut self) {
        self.setting = self.initial.clone();
    }
}

/// Read a dotted path out of a JSON tree.
fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match segment.parse::<usize>() {
            Ok(index) => current.get(index)?,
            Err(_) => current.get(segment)?,
        };
    }
    Some(current)
}

/// Write a dotted path into a JSON tree, creating intermediate containers.
///
/// A numeric segment turns its level into an array, padded with nulls up to
/// the index; any other segment turns its level into an object. Existing
/// non-container values along the path are overwritten.
fn set_path(current: &mut Value, path: &str, value: Value) {
    let (segment, rest) = match path.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    };

    if let Ok(index) = segment.parse::<usize>() {
        if !current.is_array() {
            *current = Value::Array(Vec::new());
        }
        let Some(array) = current.as_array_mut() else {
            return;
        };
        while array.len() <= index {
            array.push(Value::Null);
        }
        let Some(slot) = array.get_mut(index) else {
            return;
        };
        match rest {
            None => *slot = value,
            Some(rest) => set_path(slot, rest, value),
        }
    } else {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(object) = current.as_object_mut() else {
            return;
        };
        let slot = object.entry(segment).or_insert(Value::Null);
        match rest {
            None => *slot = value,
            Some(rest) => set_path(slot, rest, value),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn loaded_store(setting: Value) -> ThemeStore {
        ThemeStore {
            initial: setting.clone(),
            setting,
            loaded: true,
        }
    }

    #[test]
    fn test_set_writes_nested_path() {
        let mut store = loaded_store(json!({"components": {"header": {"sticky": false}}}));

        let previous = store.set("components.header.sticky", json!(true));
        assert_eq!(previous, Some(json!(false)));
        assert_eq!(store.get("components.header.sticky"), Some(&json!(true)));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut store = loaded_store(json!({}));

        let previous = store.set("components.footer.columns", json!(4));
        assert_eq!(previous, None);
        assert_eq!(
            store.setting(),
            &json!({"components": {"footer": {"columns": 4}}})
        );
    }

    #[test]
    fn test_numeric_segments_index_arrays() {
        let mut store = loaded_store(json!({}));

        store.set("sliders.1.title", json!("Eid Sale"));
        assert_eq!(
            store.setting(),
            &json!({"sliders": [null, {"title": "Eid Sale"}]})
        );

        store.set("sliders.0", json!({"title": "Hero"}));
        assert_eq!(store.get("sliders.0.title"), Some(&json!("Hero")));
    }

    #[test]
    fn test_set_overwrites_scalar_intermediates() {
        let mut store = loaded_store(json!({"components": "legacy"}));

        store.set("components.header.sticky", json!(true));
        assert_eq!(store.get("components.header.sticky"), Some(&json!(true)));
    }

    #[test]
    fn test_component_settings_lookup() {
        let store = loaded_store(json!({"components": {"header": {"sticky": true}}}));

        assert_eq!(
            store.component_settings("header"),
            Some(&json!({"sticky": true}))
        );
        assert!(store.component_settings("footer").is_none());
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut store = loaded_store(json!({"a": 1}));

        store.set("a", json!(2));
        assert!(store.is_dirty());

        store.reset();
        assert!(!store.is_dirty());
        assert_eq!(store.get("a"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_save_requires_load() {
        let config = crate::config::StorefrontConfig::new(
            url::Url::parse("http://localhost:9999/api/v1").unwrap(),
        );
        let api = ApiClient::new(&config).unwrap();

        let mut store = ThemeStore::new();
        let err = store.save(&api).await.unwrap_err();
        assert!(matches!(err, ThemeError::NotLoaded));
    }
}

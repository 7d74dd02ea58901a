//! Customizer store: live-edit session state on top of the theme store.

use serde_json::Value;

use crate::types::ThemeChange;

use super::theme::ThemeStore;

/// Editing state for the visual theme customizer.
///
/// The customizer writes through [`ThemeStore::set`] and keeps a change
/// stack so edits can be undone one at a time before saving.
#[derive(Debug, Default)]
pub struct CustomizerStore {
    /// Whether the customizer overlay is active.
    pub enabled: bool,
    /// Component key the editor panel is focused on.
    pub selected_component: Option<String>,
    /// DOM id of the highlighted component instance.
    pub selected_component_id: Option<String>,
    /// Whether storefront links and buttons stay clickable while editing.
    pub interactable: bool,
    changes: Vec<ThemeChange>,
}

impl CustomizerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn changes(&self) -> &[ThemeChange] {
        &self.changes
    }

    #[must_use]
    pub fn changes_count(&self) -> usize {
        self.changes.len()
    }

    /// Apply an edit to the theme and push it onto the change stack.
    pub fn record_change(&mut self, theme: &mut ThemeStore, path: String, value: Value) {
        let previous = theme.set(&path, value.clone());
        self.changes.push(ThemeChange {
            path,
            previous,
            value,
        });
    }

    /// Undo the most recent edit, restoring the value it replaced.
    ///
    /// A path that did not exist before the edit is set back to null.
    /// Returns false when the stack is empty.
    pub fn undo(&mut self, theme: &mut ThemeStore) -> bool {
        let Some(change) = self.changes.pop() else {
            return false;
        };
        theme.set(&change.path, change.previous.unwrap_or(Value::Null));
        true
    }

    /// Drop the change stack, e.g. after a successful save.
    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }

    pub fn toggle_interactable(&mut self) {
        self.interactable = !self.interactable;
    }

    pub fn select_component(&mut self, key: Option<String>) {
        self.selected_component = key;
    }

    pub fn select_component_id(&mut self, id: Option<String>) {
        self.selected_component_id = id;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_change_tracks_previous_value() {
        let mut theme = ThemeStore::new();
        theme.set("components.header.sticky", json!(false));

        let mut customizer = CustomizerStore::new();
        customizer.record_change(&mut theme, "components.header.sticky".into(), json!(true));

        assert_eq!(customizer.changes_count(), 1);
        assert_eq!(theme.get("components.header.sticky"), Some(&json!(true)));
        let change = customizer.changes().first().unwrap();
        assert_eq!(
            change.previous,
            Some(json!(false)),
            "the change must capture what it overwrote"
        );
    }

    #[test]
    fn test_undo_restores_previous_value() {
        let mut theme = ThemeStore::new();
        theme.set("components.header.logo_url", json!("/media/logo.png"));

        let mut customizer = CustomizerStore::new();
        customizer.record_change(
            &mut theme,
            "components.header.logo_url".into(),
            json!("/media/eid-logo.png"),
        );

        assert!(customizer.undo(&mut theme));
        assert_eq!(
            theme.get("components.header.logo_url"),
            Some(&json!("/media/logo.png"))
        );
        assert_eq!(customizer.changes_count(), 0);
    }

    #[test]
    fn test_undo_of_fresh_path_clears_it() {
        let mut theme = ThemeStore::new();
        let mut customizer = CustomizerStore::new();

        customizer.record_change(&mut theme, "components.banner.text".into(), json!("Eid Sale"));

        assert!(customizer.undo(&mut theme));
        assert_eq!(theme.get("components.banner.text"), Some(&json!(null)));
    }

    #[test]
    fn test_undo_on_empty_stack() {
        let mut theme = ThemeStore::new();
        let mut customizer = CustomizerStore::new();

        assert!(!customizer.undo(&mut theme));
    }

    #[test]
    fn test_toggle_interactable() {
        let mut customizer = CustomizerStore::new();
        assert!(!customizer.interactable);

        customizer.toggle_interactable();
        assert!(customizer.interactable);
    }
}

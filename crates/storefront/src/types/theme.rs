//! Theme customization types.

use serde::Serialize;
use serde_json::Value;

/// One recorded theme edit, kept on the customizer's undo stack.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeChange {
    /// Dotted settings path ("components.header.logo_url").
    pub path: String,
    /// Value at the path before the edit. `None` when the path did not exist.
    pub previous: Option<Value>,
    /// Value written by the edit.
    pub value: Value,
}

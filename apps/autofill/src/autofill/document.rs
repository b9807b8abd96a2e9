//! The document capability the engine works against.
//!
//! The engine never touches a global page. Callers hand it something that can
//! list form controls, assign values and files, and dispatch events. In a
//! browser that is the live DOM; here it is `MemoryDocument`.

use serde::{Deserialize, Serialize};

/// Opaque handle to one control, stable for the lifetime of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTag {
    Input,
    Textarea,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// Point-in-time view of a form control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: ControlId,
    pub tag: ControlTag,
    /// Lowercased `type` attribute. `None` for textarea/select, and for inputs
    /// that omit it (which browsers treat as `text`).
    pub input_type: Option<String>,
    pub name: Option<String>,
    pub dom_id: Option<String>,
    pub role: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl Control {
    pub fn is_combobox(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("combobox"))
    }

    /// Controls that take a typed string: text/email/tel inputs, textareas,
    /// and anything announcing itself as a combobox.
    pub fn is_text_like(&self) -> bool {
        if self.is_combobox() {
            return true;
        }
        match self.tag {
            ControlTag::Textarea => true,
            ControlTag::Input => matches!(
                self.input_type.as_deref().unwrap_or("text"),
                "text" | "email" | "tel"
            ),
            ControlTag::Select => false,
        }
    }

    pub fn is_file_input(&self) -> bool {
        self.tag == ControlTag::Input && self.input_type.as_deref() == Some("file")
    }

    /// Exact match on either the `name` or the `id` attribute.
    pub fn matches_name_or_id(&self, candidate: &str) -> bool {
        self.name.as_deref() == Some(candidate) || self.dom_id.as_deref() == Some(candidate)
    }

    /// Case-sensitive substring match on either the `name` or the `id` attribute.
    pub fn name_or_id_contains(&self, needle: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.contains(needle))
            || self.dom_id.as_deref().is_some_and(|i| i.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

/// Synthetic events dispatched after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomEvent {
    Input,
    Change,
    KeyDown {
        key: String,
        code: String,
        key_code: u32,
    },
}

impl DomEvent {
    /// Every event the engine fires bubbles.
    #[allow(dead_code)]
    pub fn bubbles(&self) -> bool {
        true
    }

    pub fn enter_key() -> Self {
        DomEvent::KeyDown {
            key: "Enter".to_string(),
            code: "Enter".to_string(),
            key_code: 13,
        }
    }
}

pub trait Document {
    /// Every input, textarea and select, in document order.
    fn controls(&self) -> Vec<Control>;

    fn set_value(&mut self, id: ControlId, value: &str);

    /// Replaces the control's file list.
    fn attach_files(&mut self, id: ControlId, files: Vec<AttachedFile>);

    /// Implementations backed by a real DOM must honour `event.bubbles()`.
    fn dispatch(&mut self, id: ControlId, event: DomEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(input_type: Option<&str>, role: Option<&str>) -> Control {
        Control {
            id: ControlId(0),
            tag: ControlTag::Input,
            input_type: input_type.map(str::to_string),
            name: Some("resume_upload".to_string()),
            dom_id: None,
            role: role.map(str::to_string),
            value: String::new(),
            options: vec![],
        }
    }

    #[test]
    fn test_untyped_input_is_text_like() {
        assert!(input(None, None).is_text_like());
        assert!(input(Some("email"), None).is_text_like());
        assert!(input(Some("tel"), None).is_text_like());
    }

    #[test]
    fn test_checkbox_is_not_text_like_unless_combobox() {
        assert!(!input(Some("checkbox"), None).is_text_like());
        assert!(input(Some("search"), Some("combobox")).is_text_like());
    }

    #[test]
    fn test_name_or_id_contains_is_case_sensitive() {
        let control = input(Some("file"), None);
        assert!(control.is_file_input());
        assert!(control.name_or_id_contains("resume"));
        assert!(!control.name_or_id_contains("Resume"));
    }

    #[test]
    fn test_every_event_bubbles() {
        assert!(DomEvent::Input.bubbles());
        assert!(DomEvent::Change.bubbles());
        assert!(DomEvent::enter_key().bubbles());
    }

    #[test]
    fn test_enter_key_event_shape() {
        let json = serde_json::to_value(DomEvent::enter_key()).unwrap();
        assert_eq!(json["type"], "keydown");
        assert_eq!(json["key"], "Enter");
        assert_eq!(json["key_code"], 13);
    }
}

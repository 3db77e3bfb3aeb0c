//! Labeled input rows.

use tui_input::Input;

use crate::ui::{FieldHandle, InputKind, Label, Surface, TextField};

/// Description of one labeled input.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<'a> {
    pub label: &'a str,
    pub id: &'a str,
    pub placeholder: &'a str,
    pub kind: InputKind,
}

impl<'a> FieldSpec<'a> {
    pub fn text(label: &'a str, id: &'a str, placeholder: &'a str) -> Self {
        Self {
            label,
            id,
            placeholder,
            kind: InputKind::Text,
        }
    }

    pub fn masked(label: &'a str, id: &'a str, placeholder: &'a str) -> Self {
        Self {
            kind: InputKind::Masked,
            ..Self::text(label, id, placeholder)
        }
    }
}

/// Appends a label bound to a fresh, empty input and returns the input's handle.
pub fn labeled_input<S: Surface>(surface: &mut S, def: FieldSpec<'_>) -> FieldHandle {
    surface.append_field(
        Label {
            text: def.label.to_string(),
            for_id: def.id.to_string(),
        },
        TextField {
            id: def.id.to_string(),
            placeholder: def.placeholder.to_string(),
            kind: def.kind,
            input: Input::default(),
        },
    )
}

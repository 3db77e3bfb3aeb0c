//! Toolkit-neutral widget surface for the settings views.
//!
//! Views only talk to the [`Surface`] trait: labeled inputs, buttons and a status
//! line appended to a single container. [`Container`] is the retained in-memory
//! implementation; the terminal front end renders it and feeds key events back.

pub mod render;
pub mod terminal;

use thiserror::Error;
use tui_input::Input;

/// Id of the container the views are mounted into.
pub const MOUNT_ID: &str = "app";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UiError {
    /// Required mount point does not exist; a wiring defect, not a runtime condition
    #[error("Missing element: #{0}")]
    MissingElement(String),
}

/// How an input renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Value is shown as bullets only
    Masked,
}

/// Status line coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusHandle(usize);

/// Caption bound to an input by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub for_id: String,
}

#[derive(Debug, Clone)]
pub struct TextField {
    pub id: String,
    pub placeholder: String,
    pub kind: InputKind,
    pub input: Input,
}

#[derive(Debug, Clone)]
pub enum Node {
    Field { label: Label, field: TextField },
    Button { id: String, label: String, enabled: bool },
    Status { text: String, tone: Tone },
}

/// Interaction produced by the front end for the mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A button was clicked or activated with Enter
    Activate(ButtonHandle),
    /// Enter was pressed while an input had focus
    Commit(FieldHandle),
}

/// Widget capabilities a view needs.
pub trait Surface {
    /// Removes every widget.
    fn clear(&mut self);

    fn append_field(&mut self, label: Label, field: TextField) -> FieldHandle;

    fn append_button(&mut self, id: &str, label: &str) -> ButtonHandle;

    fn append_status(&mut self) -> StatusHandle;

    fn value(&self, field: FieldHandle) -> &str;

    fn set_value(&mut self, field: FieldHandle, value: &str);

    fn set_enabled(&mut self, button: ButtonHandle, enabled: bool);

    fn is_enabled(&self, button: ButtonHandle) -> bool;

    fn set_status(&mut self, status: StatusHandle, tone: Tone, text: &str);
}

/// Retained widget list with keyboard focus.
#[derive(Debug, Clone)]
pub struct Container {
    id: String,
    nodes: Vec<Node>,
    focus: Option<usize>,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            nodes: Vec::new(),
            focus: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_field(&self, id: &str) -> Option<FieldHandle> {
        self.nodes.iter().position(|node| {
            matches!(node, Node::Field { field, .. } if field.id == id)
        })
        .map(FieldHandle)
    }

    pub fn find_button(&self, id: &str) -> Option<ButtonHandle> {
        self.nodes.iter().position(|node| {
            matches!(node, Node::Button { id: button_id, .. } if button_id == id)
        })
        .map(ButtonHandle)
    }

    /// Text and tone of the first status line.
    pub fn status(&self) -> Option<(&str, Tone)> {
        self.nodes.iter().find_map(|node| match node {
            Node::Status { text, tone } => Some((text.as_str(), *tone)),
            _ => None,
        })
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    fn is_focusable(node: &Node) -> bool {
        match node {
            Node::Field { .. } => true,
            Node::Button { enabled, .. } => *enabled,
            Node::Status { .. } => false,
        }
    }

    /// Moves focus to the next input or enabled button, wrapping around.
    pub fn focus_next(&mut self) {
        self.move_focus(true);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(false);
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.nodes.len();
        if len == 0 {
            self.focus = None;
            return;
        }
        let start = match self.focus {
            Some(i) => i,
            None if forward => len - 1,
            None => 0,
        };
        for step in 1..=len {
            let idx = if forward {
                (start + step) % len
            } else {
                (start + len - step % len) % len
            };
            if Self::is_focusable(&self.nodes[idx]) {
                self.focus = Some(idx);
                return;
            }
        }
        self.focus = None;
    }

    /// Translates Enter on the focused widget into a view event.
    ///
    /// Disabled buttons produce nothing.
    pub fn activate_focused(&self) -> Option<UiEvent> {
        let idx = self.focus?;
        match self.nodes.get(idx)? {
            Node::Field { .. } => Some(UiEvent::Commit(FieldHandle(idx))),
            Node::Button { enabled: true, .. } => Some(UiEvent::Activate(ButtonHandle(idx))),
            _ => None,
        }
    }

    /// Hands a terminal event to the focused input, if any.
    pub fn edit_focused(&mut self, event: &ratatui::crossterm::event::Event) -> bool {
        use tui_input::backend::crossterm::EventHandler;

        let Some(idx) = self.focus else {
            return false;
        };
        match self.nodes.get_mut(idx) {
            Some(Node::Field { field, .. }) => {
                field.input.handle_event(event);
                true
            }
            _ => false,
        }
    }

    fn field_mut(&mut self, handle: FieldHandle) -> Option<&mut TextField> {
        match self.nodes.get_mut(handle.0) {
            Some(Node::Field { field, .. }) => Some(field),
            _ => None,
        }
    }
}

impl Surface for Container {
    fn clear(&mut self) {
        self.nodes.clear();
        self.focus = None;
    }

    fn append_field(&mut self, label: Label, field: TextField) -> FieldHandle {
        self.nodes.push(Node::Field { label, field });
        let idx = self.nodes.len() - 1;
        if self.focus.is_none() {
            self.focus = Some(idx);
        }
        FieldHandle(idx)
    }

    fn append_button(&mut self, id: &str, label: &str) -> ButtonHandle {
        self.nodes.push(Node::Button {
            id: id.to_string(),
            label: label.to_string(),
            enabled: true,
        });
        ButtonHandle(self.nodes.len() - 1)
    }

    fn append_status(&mut self) -> StatusHandle {
        self.nodes.push(Node::Status {
            text: String::new(),
            tone: Tone::Info,
        });
        StatusHandle(self.nodes.len() - 1)
    }

    fn value(&self, handle: FieldHandle) -> &str {
        match self.nodes.get(handle.0) {
            Some(Node::Field { field, .. }) => field.input.value(),
            _ => "",
        }
    }

    fn set_value(&mut self, handle: FieldHandle, value: &str) {
        if let Some(field) = self.field_mut(handle) {
            field.input = Input::new(value.to_string());
        }
    }

    fn set_enabled(&mut self, handle: ButtonHandle, value: bool) {
        if let Some(Node::Button { enabled, .. }) = self.nodes.get_mut(handle.0) {
            *enabled = value;
        }
    }

    fn is_enabled(&self, handle: ButtonHandle) -> bool {
        matches!(self.nodes.get(handle.0), Some(Node::Button { enabled: true, .. }))
    }

    fn set_status(&mut self, handle: StatusHandle, value: Tone, message: &str) {
        if let Some(Node::Status { text, tone }) = self.nodes.get_mut(handle.0) {
            *text = message.to_string();
            *tone = value;
        }
    }
}

/// Named mount points available to the views.
#[derive(Debug, Default)]
pub struct Document {
    containers: Vec<Container>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with the standard [`MOUNT_ID`] container.
    pub fn with_mount_point() -> Self {
        let mut document = Self::new();
        document.add_container(Container::new(MOUNT_ID));
        document
    }

    pub fn add_container(&mut self, container: Container) {
        self.containers.push(container);
    }

    #[cfg(test)]
    pub fn container(&self, id: &str) -> Result<&Container, UiError> {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| UiError::MissingElement(id.to_string()))
    }

    pub fn container_mut(&mut self, id: &str) -> Result<&mut Container, UiError> {
        self.containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| UiError::MissingElement(id.to_string()))
    }
}

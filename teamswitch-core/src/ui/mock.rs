//! In-memory UI surface for tests and scenario replay

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::traits::{ContainerStyle, UiSurface, WidgetLayout};
use crate::error::UiError;
use crate::types::{MessageKey, PlayerId, WidgetId};

const ROOT: WidgetId = 0;

/// Kind of a mock widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockWidgetKind {
    Container,
    Button,
    Text,
}

/// A widget held by [`MockUi`]
#[derive(Debug, Clone, PartialEq)]
pub struct MockWidget {
    pub name: String,
    pub kind: MockWidgetKind,
    pub owner: PlayerId,
    pub parent: WidgetId,
    pub layout: WidgetLayout,
    pub enabled: bool,
    pub bg_alpha: f64,
    pub label: Option<MessageKey>,
}

#[derive(Debug, Default)]
struct MockUiState {
    widgets: HashMap<WidgetId, MockWidget>,
    next_id: WidgetId,
    input_modes: HashMap<PlayerId, bool>,
    failing_names: HashSet<String>,
}

/// Mock implementation of [`UiSurface`]
///
/// Widget names are unique across the surface, like the host UI requires.
#[derive(Debug, Default)]
pub struct MockUi {
    state: Mutex<MockUiState>,
}

impl MockUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockUiState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make creation of a widget with this name fail
    pub fn fail_on_widget(&self, name: &str) {
        self.lock().failing_names.insert(name.to_string());
    }

    /// Number of live widgets, excluding the root
    pub fn widget_count(&self) -> usize {
        self.lock().widgets.len()
    }

    pub fn widget(&self, widget: WidgetId) -> Option<MockWidget> {
        self.lock().widgets.get(&widget).cloned()
    }

    /// Look a widget up by name anywhere on the surface
    pub fn widget_id(&self, name: &str) -> Option<WidgetId> {
        self.lock()
            .widgets
            .iter()
            .find(|(_, w)| w.name == name)
            .map(|(id, _)| *id)
    }

    pub fn parent_of(&self, widget: WidgetId) -> Option<WidgetId> {
        self.widget(widget).map(|w| w.parent)
    }

    pub fn button_enabled(&self, widget: WidgetId) -> Option<bool> {
        self.widget(widget)
            .filter(|w| w.kind == MockWidgetKind::Button)
            .map(|w| w.enabled)
    }

    pub fn bg_alpha(&self, widget: WidgetId) -> Option<f64> {
        self.widget(widget).map(|w| w.bg_alpha)
    }

    /// Last input mode set for `player`; true means UI-exclusive
    pub fn input_mode(&self, player: PlayerId) -> Option<bool> {
        self.lock().input_modes.get(&player).copied()
    }

    fn insert(
        &self,
        name: &str,
        kind: MockWidgetKind,
        layout: &WidgetLayout,
        parent: WidgetId,
        owner: PlayerId,
        label: Option<MessageKey>,
    ) -> Result<WidgetId, UiError> {
        let mut state = self.lock();
        if state.failing_names.contains(name) {
            return Err(UiError::Other(format!("injected failure for {name}")));
        }
        if state.widgets.values().any(|w| w.name == name) {
            return Err(UiError::DuplicateName(name.to_string()));
        }
        if parent != ROOT && !state.widgets.contains_key(&parent) {
            return Err(UiError::WidgetNotFound(parent));
        }

        state.next_id += 1;
        let id = state.next_id;
        state.widgets.insert(
            id,
            MockWidget {
                name: name.to_string(),
                kind,
                owner,
                parent,
                layout: *layout,
                enabled: true,
                bg_alpha: 1.0,
                label,
            },
        );
        Ok(id)
    }

    fn with_widget(
        &self,
        widget: WidgetId,
        f: impl FnOnce(&mut MockWidget),
    ) -> Result<(), UiError> {
        let mut state = self.lock();
        let entry = state
            .widgets
            .get_mut(&widget)
            .ok_or(UiError::WidgetNotFound(widget))?;
        f(entry);
        Ok(())
    }
}

fn is_descendant(widgets: &HashMap<WidgetId, MockWidget>, widget: WidgetId, ancestor: WidgetId) -> bool {
    let mut current = widget;
    while let Some(w) = widgets.get(&current) {
        if w.parent == ancestor {
            return true;
        }
        current = w.parent;
    }
    false
}

impl UiSurface for MockUi {
    fn root(&self) -> WidgetId {
        ROOT
    }

    fn add_container(
        &self,
        name: &str,
        layout: &WidgetLayout,
        style: &ContainerStyle,
        parent: WidgetId,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError> {
        let id = self.insert(name, MockWidgetKind::Container, layout, parent, owner, None)?;
        self.with_widget(id, |w| w.bg_alpha = style.bg_alpha)?;
        Ok(id)
    }

    fn add_button(
        &self,
        name: &str,
        layout: &WidgetLayout,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError> {
        self.insert(name, MockWidgetKind::Button, layout, ROOT, owner, None)
    }

    fn add_text(
        &self,
        name: &str,
        layout: &WidgetLayout,
        label: MessageKey,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError> {
        self.insert(name, MockWidgetKind::Text, layout, ROOT, owner, Some(label))
    }

    fn find_widget(&self, name: &str, within: WidgetId) -> Option<WidgetId> {
        let state = self.lock();
        state
            .widgets
            .iter()
            .find(|(id, w)| {
                w.name == name && (within == ROOT || is_descendant(&state.widgets, **id, within))
            })
            .map(|(id, _)| *id)
    }

    fn widget_name(&self, widget: WidgetId) -> Option<String> {
        self.lock().widgets.get(&widget).map(|w| w.name.clone())
    }

    fn delete_widget(&self, widget: WidgetId) -> Result<(), UiError> {
        let mut state = self.lock();
        if !state.widgets.contains_key(&widget) {
            return Err(UiError::WidgetNotFound(widget));
        }
        let doomed: Vec<WidgetId> = state
            .widgets
            .keys()
            .copied()
            .filter(|id| *id == widget || is_descendant(&state.widgets, *id, widget))
            .collect();
        for id in doomed {
            state.widgets.remove(&id);
        }
        Ok(())
    }

    fn set_parent(&self, widget: WidgetId, parent: WidgetId) -> Result<(), UiError> {
        if parent != ROOT && self.widget(parent).is_none() {
            return Err(UiError::WidgetNotFound(parent));
        }
        self.with_widget(widget, |w| w.parent = parent)
    }

    fn set_bg_alpha(&self, widget: WidgetId, alpha: f64) -> Result<(), UiError> {
        self.with_widget(widget, |w| w.bg_alpha = alpha)
    }

    fn set_button_enabled(&self, widget: WidgetId, enabled: bool) -> Result<(), UiError> {
        self.with_widget(widget, |w| w.enabled = enabled)
    }

    fn set_input_mode(&self, player: PlayerId, ui_exclusive: bool) -> Result<(), UiError> {
        self.lock().input_modes.insert(player, ui_exclusive);
        Ok(())
    }
}

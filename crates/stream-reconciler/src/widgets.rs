use std::collections::HashSet;
use std::hash::BuildHasher;

/// Returns true iff `widget_id` has not been rendered yet.
pub fn should_render<S: BuildHasher>(widget_id: &str, rendered: &HashSet<String, S>) -> bool {
    !rendered.contains(widget_id)
}

/// Set of widget ids already on screen.
#[derive(Clone, Debug, Default)]
pub struct RenderedWidgets {
    ids: HashSet<String>,
}

impl RenderedWidgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff `widget_id` has not been rendered yet.
    pub fn should_render(&self, widget_id: &str) -> bool {
        should_render(widget_id, &self.ids)
    }

    /// Records `widget_id` as rendered; returns true if it was not already.
    pub fn mark_rendered(&mut self, widget_id: impl Into<String>) -> bool {
        self.ids.insert(widget_id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T: Into<String>> FromIterator<T> for RenderedWidgets {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

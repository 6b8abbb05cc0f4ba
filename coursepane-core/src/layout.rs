use url::Url;

pub const DEFAULT_MIN_WIDTH: f64 = 150.0;
pub const DEFAULT_MAX_WIDTH: f64 = 400.0;
pub const DEFAULT_SIDEBAR_WIDTH: f64 = 250.0;

pub const PLACEHOLDER_TEXT: &str = "Select an article to view details";

/// Allowed sidebar widths, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthRange {
    pub min: f64,
    pub max: f64,
}

impl WidthRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            WidthRange { min, max }
        } else {
            WidthRange { min: max, max: min }
        }
    }

    pub fn clamp(&self, width: f64) -> f64 {
        if width.is_nan() {
            return self.min;
        }
        width.max(self.min).min(self.max)
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        WidthRange {
            min: DEFAULT_MIN_WIDTH,
            max: DEFAULT_MAX_WIDTH,
        }
    }
}

/// What the right-hand pane is showing. There is no transition back to
/// `NoSelection`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    HasSelection(Url),
}

/// Effect of a selection event on the viewer pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// First selection: the placeholder gives way to a new viewer.
    Mounted,
    /// The existing viewer is pointed at a new locator in place.
    Replaced,
    /// Same locator as before; nothing to load.
    Unchanged,
}

/// View-local state of the split pane: sidebar width and selected locator.
#[derive(Debug, Clone)]
pub struct SplitLayout {
    width: f64,
    range: WidthRange,
    selection: Selection,
}

impl SplitLayout {
    pub fn new(initial_width: f64, range: WidthRange) -> Self {
        SplitLayout {
            width: range.clamp(initial_width),
            range,
            selection: Selection::NoSelection,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn range(&self) -> WidthRange {
        self.range
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_url(&self) -> Option<&Url> {
        match &self.selection {
            Selection::HasSelection(url) => Some(url),
            Selection::NoSelection => None,
        }
    }

    pub fn shows_placeholder(&self) -> bool {
        matches!(self.selection, Selection::NoSelection)
    }

    /// Replace the selected locator.
    pub fn select_article(&mut self, url: Url) -> SelectionChange {
        let change = match &self.selection {
            Selection::NoSelection => SelectionChange::Mounted,
            Selection::HasSelection(current) if *current == url => SelectionChange::Unchanged,
            Selection::HasSelection(_) => SelectionChange::Replaced,
        };
        if change != SelectionChange::Unchanged {
            log::debug!("Selection {:?}: {}", change, url);
            self.selection = Selection::HasSelection(url);
        }
        change
    }

    /// Move the divider by `delta`; returns the clamped width.
    pub fn resize_divider(&mut self, delta: f64) -> f64 {
        if !delta.is_nan() {
            self.width = self.range.clamp(self.width + delta);
        }
        self.width
    }

    /// Set an absolute width, e.g. a divider position reported by the toolkit.
    pub fn set_width(&mut self, width: f64) -> f64 {
        if !width.is_nan() {
            self.width = self.range.clamp(width);
        }
        self.width
    }

    /// Start a drag session from the current width.
    pub fn begin_drag(&self) -> DividerDrag {
        DividerDrag {
            start_width: self.width,
        }
    }

    /// Apply a drag's cumulative translation. Called on every pointer move.
    pub fn drag_to(&mut self, drag: &DividerDrag, translation: f64) -> f64 {
        self.set_width(drag.start_width + translation)
    }
}

impl Default for SplitLayout {
    fn default() -> Self {
        SplitLayout::new(DEFAULT_SIDEBAR_WIDTH, WidthRange::default())
    }
}

/// A divider drag in progress. Translations are measured from the pointer's
/// press position, so they are applied against the width at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerDrag {
    start_width: f64,
}

impl DividerDrag {
    pub fn start_width(&self) -> f64 {
        self.start_width
    }
}

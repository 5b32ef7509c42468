//! Predefined (OS-standard) menu items.
//!
//! Predefined items carry no identifier: they are rendered by the platform
//! and never appear in the [`MenuRegistry`](super::MenuRegistry).

/// Application information shown by the platform "About" item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutMetadata {
    /// Application name.
    pub name: Option<String>,
    /// Application version.
    pub version: Option<String>,
    /// Copyright notice.
    pub copyright: Option<String>,
    /// Application authors.
    pub authors: Option<Vec<String>>,
    /// Project website URL.
    pub website: Option<String>,
    /// Label shown for the website link.
    pub website_label: Option<String>,
    /// Free-form comments.
    pub comments: Option<String>,
}

/// Builder for [`AboutMetadata`].
#[derive(Debug, Clone, Default)]
pub struct AboutMetadataBuilder {
    metadata: AboutMetadata,
}

impl AboutMetadataBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }

    /// Set the application version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.metadata.version = Some(version.into());
        self
    }

    /// Set the copyright notice.
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.metadata.copyright = Some(copyright.into());
        self
    }

    /// Set the list of authors.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.authors = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the website URL.
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.metadata.website = Some(website.into());
        self
    }

    /// Set the label shown for the website link.
    pub fn with_website_label(mut self, label: impl Into<String>) -> Self {
        self.metadata.website_label = Some(label.into());
        self
    }

    /// Set free-form comments.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.metadata.comments = Some(comments.into());
        self
    }

    /// Produce the metadata. The builder can be reused afterwards.
    pub fn build(&self) -> AboutMetadata {
        self.metadata.clone()
    }
}

/// The kind of a predefined menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredefinedKind {
    /// A horizontal separator line.
    Separator,
    /// Copy the selection.
    Copy,
    /// Cut the selection.
    Cut,
    /// Paste from the clipboard.
    Paste,
    /// Select all.
    SelectAll,
    /// Undo the last action.
    Undo,
    /// Redo the last undone action.
    Redo,
    /// Minimize the focused window.
    Minimize,
    /// Maximize the focused window.
    Maximize,
    /// Toggle fullscreen for the focused window.
    Fullscreen,
    /// Hide the application.
    Hide,
    /// Hide other applications.
    HideOthers,
    /// Show all applications.
    ShowAll,
    /// Close the focused window.
    CloseWindow,
    /// Quit the application.
    Quit,
    /// Show the platform "About" panel.
    About(Option<AboutMetadata>),
}

impl PredefinedKind {
    /// Short name used in logs and debug output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Separator => "separator",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::SelectAll => "select-all",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Minimize => "minimize",
            Self::Maximize => "maximize",
            Self::Fullscreen => "fullscreen",
            Self::Hide => "hide",
            Self::HideOthers => "hide-others",
            Self::ShowAll => "show-all",
            Self::CloseWindow => "close-window",
            Self::Quit => "quit",
            Self::About(_) => "about",
        }
    }
}

/// An OS-standard menu entry with no application-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedMenuItem {
    kind: PredefinedKind,
    text: Option<String>,
}

impl PredefinedMenuItem {
    /// Create a predefined item of the given kind with the platform label.
    pub fn new(kind: PredefinedKind) -> Self {
        Self { kind, text: None }
    }

    /// Override the platform label. Ignored for separators.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if self.kind != PredefinedKind::Separator {
            self.text = Some(text.into());
        }
        self
    }

    /// A separator line.
    pub fn separator() -> Self {
        Self::new(PredefinedKind::Separator)
    }

    /// The platform "Copy" item.
    pub fn copy() -> Self {
        Self::new(PredefinedKind::Copy)
    }

    /// The platform "Cut" item.
    pub fn cut() -> Self {
        Self::new(PredefinedKind::Cut)
    }

    /// The platform "Paste" item.
    pub fn paste() -> Self {
        Self::new(PredefinedKind::Paste)
    }

    /// The platform "Select All" item.
    pub fn select_all() -> Self {
        Self::new(PredefinedKind::SelectAll)
    }

    /// The platform "Undo" item.
    pub fn undo() -> Self {
        Self::new(PredefinedKind::Undo)
    }

    /// The platform "Redo" item.
    pub fn redo() -> Self {
        Self::new(PredefinedKind::Redo)
    }

    /// The platform "Minimize" item.
    pub fn minimize() -> Self {
        Self::new(PredefinedKind::Minimize)
    }

    /// The platform "Maximize" item.
    pub fn maximize() -> Self {
        Self::new(PredefinedKind::Maximize)
    }

    /// The platform "Fullscreen" item.
    pub fn fullscreen() -> Self {
        Self::new(PredefinedKind::Fullscreen)
    }

    /// The platform "Hide" item.
    pub fn hide() -> Self {
        Self::new(PredefinedKind::Hide)
    }

    /// The platform "Hide Others" item.
    pub fn hide_others() -> Self {
        Self::new(PredefinedKind::HideOthers)
    }

    /// The platform "Show All" item.
    pub fn show_all() -> Self {
        Self::new(PredefinedKind::ShowAll)
    }

    /// The platform "Close Window" item.
    pub fn close_window() -> Self {
        Self::new(PredefinedKind::CloseWindow)
    }

    /// The platform "Quit" item, optionally relabelled.
    pub fn quit(text: Option<&str>) -> Self {
        let item = Self::new(PredefinedKind::Quit);
        match text {
            Some(text) => item.with_text(text),
            None => item,
        }
    }

    /// The platform "About" item, optionally relabelled and with metadata.
    pub fn about(text: Option<&str>, metadata: Option<AboutMetadata>) -> Self {
        let item = Self::new(PredefinedKind::About(metadata));
        match text {
            Some(text) => item.with_text(text),
            None => item,
        }
    }

    /// The kind of this item.
    pub fn kind(&self) -> &PredefinedKind {
        &self.kind
    }

    /// The label override, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_about_metadata_builder() {
        let builder = AboutMetadataBuilder::new()
            .with_name("Horizon")
            .with_version("1.0.0")
            .with_authors(["Ada", "Grace"]);
        let first = builder.build();
        let second = builder.build();
        assert_eq!(first, second);
        assert_eq!(first.name.as_deref(), Some("Horizon"));
        assert_eq!(first.authors.unwrap(), vec!["Ada", "Grace"]);
        assert!(first.website.is_none());
    }

    #[test]
    fn test_separator_ignores_text() {
        let item = PredefinedMenuItem::separator().with_text("ignored");
        assert_eq!(item.kind(), &PredefinedKind::Separator);
        assert!(item.text().is_none());
    }

    #[test]
    fn test_quit_relabel() {
        let item = PredefinedMenuItem::quit(Some("Exit"));
        assert_eq!(item.kind().name(), "quit");
        assert_eq!(item.text(), Some("Exit"));
    }

    #[test]
    fn test_about_carries_metadata() {
        let meta = AboutMetadataBuilder::new().with_name("App").build();
        let item = PredefinedMenuItem::about(None, Some(meta.clone()));
        assert_eq!(item.kind(), &PredefinedKind::About(Some(meta)));
        assert!(item.text().is_none());
    }
}

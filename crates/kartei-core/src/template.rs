use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Card rendering template of one card kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardTemplate {
    /// Question (front) markup
    pub qfmt: String,
    /// Answer (back) markup
    pub afmt: String,
    pub css: Option<String>,
}

impl CardTemplate {
    pub fn new(qfmt: impl Into<String>, afmt: impl Into<String>) -> Self {
        Self {
            qfmt: qfmt.into(),
            afmt: afmt.into(),
            css: None,
        }
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    /// Load the template parts of `kind`. Front and back are required, the
    /// stylesheet is optional.
    pub fn load(loader: &dyn TemplateLoader, kind: &str) -> Result<Self, TemplateError> {
        let qfmt = loader.load(kind, TemplatePart::Front)?;
        let afmt = loader.load(kind, TemplatePart::Back)?;
        let css = match loader.load(kind, TemplatePart::Style) {
            Ok(css) => Some(css),
            Err(TemplateError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(Self { qfmt, afmt, css })
    }

    /// Field names referenced by `{{...}}` placeholders on either side
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_placeholders(&self.qfmt, &mut names);
        collect_placeholders(&self.afmt, &mut names);
        names
    }
}

fn collect_placeholders(markup: &str, names: &mut BTreeSet<String>) {
    let mut rest = markup;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };

        let inner = after[..end].trim();
        // Section markers ({{#f}}, {{^f}}, {{/f}}) and filters ({{text:f}})
        let inner = inner.trim_start_matches(['#', '^', '/']);
        let name = inner.rsplit(':').next().unwrap_or(inner).trim();

        if !name.is_empty() && !name.starts_with('!') && name != "FrontSide" {
            names.insert(name.to_string());
        }

        rest = &after[end + 2..];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    Front,
    Back,
    Style,
}

impl TemplatePart {
    pub fn file_name(self) -> &'static str {
        match self {
            TemplatePart::Front => "front.html",
            TemplatePart::Back => "back.html",
            TemplatePart::Style => "style.css",
        }
    }
}

/// Source of template resources, keyed by card kind
pub trait TemplateLoader: Send + Sync {
    fn load(&self, kind: &str, part: TemplatePart) -> Result<String, TemplateError>;
}

/// Reads `<root>/<kind>/{front.html, back.html, style.css}`
pub struct DirTemplateLoader {
    root: PathBuf,
}

impl DirTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLoader for DirTemplateLoader {
    fn load(&self, kind: &str, part: TemplatePart) -> Result<String, TemplateError> {
        let path = self.root.join(kind).join(part.file_name());
        tracing::debug!("Loading template part from {}", path.display());

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TemplateError::NotFound {
                kind: kind.to_string(),
                part: part.file_name(),
            }),
            Err(e) => Err(TemplateError::Io(e)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template not found: {kind}/{part}")]
    NotFound { kind: String, part: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

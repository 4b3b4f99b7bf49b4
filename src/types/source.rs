use serde::{Deserialize, Serialize};

/// Citation metadata attached to an assistant answer.
///
/// The agent service treats these as opaque; the client only displays the
/// title and links to the url.  Fields missing from a payload deserialize as
/// empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Human-readable title of the cited document.
    #[serde(default)]
    pub title: String,

    /// Location of the cited document.
    #[serde(default)]
    pub url: String,

    /// Short description of the cited document.
    #[serde(default)]
    pub description: String,

    /// Keywords associated with the cited document.
    #[serde(default)]
    pub keywords: String,
}

impl Source {
    /// Create a new `Source` with a title and url.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: String::new(),
            keywords: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }
}

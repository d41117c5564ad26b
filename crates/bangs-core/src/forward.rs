//! Turning resolved entries into redirect instructions.

use url::Url;

use crate::{Entry, Result};

/// What the HTTP layer should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forward {
    /// A single `302 Found` to this URL.
    Redirect(Url),
    /// An HTML page that opens every URL; the first replaces the current tab.
    MultiTab(Vec<Url>),
}

impl Forward {
    /// HTTP status code for this response.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Redirect(_) => 302,
            Self::MultiTab(_) => 200,
        }
    }

    /// All destination URLs, the current-tab one first.
    pub fn urls(&self) -> &[Url] {
        match self {
            Self::Redirect(url) => std::slice::from_ref(url),
            Self::MultiTab(urls) => urls,
        }
    }

    /// Render the multi-destination page.
    ///
    /// Every URL after the first is opened with `window.open(.., '_blank')`,
    /// then the current tab navigates to the first. A plain redirect renders
    /// the same page with no extra tabs.
    pub fn to_html(&self) -> String {
        let urls = self.urls();
        let script: String = urls
            .iter()
            .skip(1)
            .map(|url| format!("window.open({}, '_blank');\n", js_string(url)))
            .chain(
                urls.first()
                    .map(|first| format!("window.location.href = {};\n", js_string(first))),
            )
            .collect();

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>bangs</title>\n</head>\n<body>\n<script>\n{script}</script>\n</body>\n</html>\n"
        )
    }
}

/// Quote a URL as a JavaScript string literal.
fn js_string(url: &Url) -> String {
    // JSON string syntax is valid JS; '<' never survives URL serialization.
    serde_json::Value::String(url.to_string()).to_string()
}

/// Augment every entry with the same query.
///
/// The first failure aborts the whole forward. One entry yields a
/// [`Forward::Redirect`], several a [`Forward::MultiTab`].
pub fn forward(entries: &[&Entry], query: &str) -> Result<Forward> {
    let mut urls = entries
        .iter()
        .map(|entry| entry.url.augment(query))
        .collect::<Result<Vec<_>>>()?;

    if urls.len() == 1 {
        if let Some(url) = urls.pop() {
            return Ok(Forward::Redirect(url));
        }
    }
    Ok(Forward::MultiTab(urls))
}

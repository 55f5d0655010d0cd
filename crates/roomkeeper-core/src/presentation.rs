//! Hint presentation.
//!
//! A presenter shows one resolved hint, or an explicit invalid-code state,
//! in a view separate from the operator console. Presenters own no state;
//! they only render what the ledger has already granted.

use std::path::{Path, PathBuf};

use indoc::formatdoc;
use url::Url;

use crate::error::CoreError;
use crate::hints::{HintCode, HintDictionary, HintRecord};

/// What a presenter is asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintView {
    Found { code: HintCode, record: HintRecord },
    /// Missing, blank or unknown code. `code` is the raw input, if any.
    Invalid { code: Option<String> },
}

impl HintView {
    pub fn found(code: HintCode, record: HintRecord) -> Self {
        HintView::Found { code, record }
    }

    /// Resolve a raw code against the dictionary without touching any quota.
    pub fn lookup(dict: &HintDictionary, raw: Option<&str>) -> Self {
        let parsed = raw.and_then(HintCode::parse);
        match parsed.as_ref().and_then(|c| dict.get(c).map(|r| (c, r))) {
            Some((code, record)) => HintView::found(code.clone(), record.clone()),
            None => HintView::Invalid {
                code: raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            },
        }
    }
}

/// Receives every granted hint.
pub trait PresentationPort {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError>;
}

impl<P: PresentationPort + ?Sized> PresentationPort for Box<P> {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        (**self).present(view)
    }
}

/// Presenter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl PresentationPort for NullPresenter {
    fn present(&mut self, _view: &HintView) -> Result<(), CoreError> {
        Ok(())
    }
}

// ── Standalone document ──────────────────────────────────────────────

/// Writes each hint as a self-contained HTML page and optionally opens it
/// in the system browser.
#[derive(Debug, Clone)]
pub struct DocumentPresenter {
    out_dir: PathBuf,
    open_browser: bool,
    last_written: Option<PathBuf>,
}

impl DocumentPresenter {
    pub fn new(out_dir: impl Into<PathBuf>, open_browser: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            open_browser,
            last_written: None,
        }
    }

    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }
}

impl PresentationPort for DocumentPresenter {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.out_dir)?;
        let name = match view {
            HintView::Found { code, .. } => format!("hint-{}.html", file_safe(code.as_str())),
            HintView::Invalid { .. } => "hint-invalid.html".to_string(),
        };
        let path = self.out_dir.join(name);
        std::fs::write(&path, render_document(view))?;
        tracing::debug!(path = %path.display(), "hint document written");
        if self.open_browser {
            if let Err(e) = open::that(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not open hint document");
            }
        }
        self.last_written = Some(path);
        Ok(())
    }
}

/// Render a complete HTML page for `view`. Body newlines are preserved.
pub fn render_document(view: &HintView) -> String {
    let (heading, body, footer) = match view {
        HintView::Found { code, record } => (
            escape_html(&record.title),
            escape_html(&record.body),
            format!("Code: {}", escape_html(code.as_str())),
        ),
        HintView::Invalid { code } => (
            "Invalid code".to_string(),
            "No hint is registered under this code. Check the code and try again.".to_string(),
            match code {
                Some(code) => format!("Code: {}", escape_html(code)),
                None => "No code given".to_string(),
            },
        ),
    };
    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
          <meta charset="utf-8">
          <title>{heading}</title>
          <style>
            body {{ font-family: sans-serif; max-width: 40rem; margin: 3rem auto; }}
            .body {{ white-space: pre-wrap; font-size: 1.25rem; }}
            .code {{ color: #666; }}
          </style>
        </head>
        <body>
          <h1>{heading}</h1>
          <p class="body">{body}</p>
          <p class="code">{footer}</p>
          <button onclick="window.close()">Close</button>
        </body>
        </html>
    "#,
        heading = heading,
        body = body,
        footer = footer,
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn file_safe(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

// ── Link navigation ──────────────────────────────────────────────────

/// Hands out a URL carrying only the code; the page behind it re-derives
/// the hint with [`resolve_link`].
#[derive(Debug, Clone)]
pub struct LinkPresenter {
    base: Url,
    links: Vec<Url>,
}

impl LinkPresenter {
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let base = Url::parse(base_url).map_err(|e| crate::error::ConfigError::InvalidValue {
            key: "presentation.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(Self {
            base,
            links: Vec::new(),
        })
    }

    pub fn link_for(&self, view: &HintView) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let HintView::Found { code, .. } = view {
            url.query_pairs_mut().append_pair("code", code.as_str());
        }
        url
    }

    /// Links handed out so far, oldest first.
    pub fn links(&self) -> &[Url] {
        &self.links
    }
}

impl PresentationPort for LinkPresenter {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        let url = self.link_for(view);
        tracing::debug!(%url, "hint link issued");
        self.links.push(url);
        Ok(())
    }
}

/// Re-derive a view from a hint link. Unparseable URLs, a missing `code`
/// parameter and unknown codes all yield [`HintView::Invalid`].
pub fn resolve_link(link: &str, dict: &HintDictionary) -> HintView {
    let code = Url::parse(link).ok().and_then(|url| {
        url.query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
    });
    HintView::lookup(dict, code.as_deref())
}

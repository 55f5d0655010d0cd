//! Hint presenters for the terminal front end.

use std::io::Write;

use roomkeeper_core::storage::data_dir;
use roomkeeper_core::{
    Config, CoreError, DocumentPresenter, HintView, LinkPresenter, PresentationMode,
    PresentationPort,
};

/// Prints the hint as a framed block on stdout.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PresentationPort for TerminalPresenter<W> {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        let rule = "=".repeat(48);
        match view {
            HintView::Found { code, record } => {
                writeln!(self.out, "{rule}")?;
                writeln!(self.out, "  {}", record.title)?;
                writeln!(self.out, "{rule}")?;
                for line in record.body.lines() {
                    writeln!(self.out, "  {line}")?;
                }
                writeln!(self.out, "{rule}")?;
                writeln!(self.out, "  code {code}")?;
            }
            HintView::Invalid { code } => {
                writeln!(self.out, "{rule}")?;
                writeln!(self.out, "  INVALID CODE")?;
                if let Some(code) = code {
                    writeln!(self.out, "  no hint registered under '{code}'")?;
                }
                writeln!(self.out, "{rule}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Prints the link a player-facing screen should navigate to.
pub struct PrintedLinkPresenter {
    inner: LinkPresenter,
}

impl PresentationPort for PrintedLinkPresenter {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        println!("{}", self.inner.link_for(view));
        self.inner.present(view)
    }
}

pub fn build(config: &Config) -> Result<Box<dyn PresentationPort>, CoreError> {
    Ok(match config.presentation.mode {
        PresentationMode::Terminal => Box::new(TerminalPresenter::new(std::io::stdout())),
        PresentationMode::Document => Box::new(DocumentPresenter::new(
            data_dir()?.join("hints"),
            config.presentation.open_browser,
        )),
        PresentationMode::Link => Box::new(PrintedLinkPresenter {
            inner: LinkPresenter::new(&config.presentation.base_url)?,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomkeeper_core::{HintCode, HintRecord};

    #[test]
    fn terminal_presenter_keeps_body_lines() {
        let mut buf = Vec::new();
        let mut presenter = TerminalPresenter::new(&mut buf);
        presenter
            .present(&HintView::found(
                HintCode::parse("e-5").unwrap(),
                HintRecord::new("Mirror", "first\nsecond"),
            ))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  Mirror"));
        assert!(text.contains("  first\n  second\n"));
        assert!(text.contains("code E-5"));
    }

    #[test]
    fn terminal_presenter_renders_invalid() {
        let mut buf = Vec::new();
        TerminalPresenter::new(&mut buf)
            .present(&HintView::Invalid {
                code: Some("ZZ".into()),
            })
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("INVALID CODE"));
        assert!(text.contains("'ZZ'"));
    }
}

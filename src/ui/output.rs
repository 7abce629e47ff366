use crossterm::style::Stylize;
use crossterm::terminal;
use crossterm::tty::IsTty;
use std::io::{self, Write};

/// A user-facing output stream: buffered writes, shown on `flush`
pub trait OutputStream: Write {
    /// Whether headings should carry terminal styling
    fn is_styled(&self) -> bool {
        false
    }
}

impl OutputStream for Vec<u8> {}

/// Buffers output and shows it on flush, through the `minus` pager when
/// the text does not fit on the terminal.
pub struct Pager {
    buffer: String,
    paging: bool,
    tty: bool,
}

impl Pager {
    /// `paging` enables the pager; it is still skipped when stdout is not a
    /// terminal or `NOPAGER` is set.
    pub fn new(paging: bool) -> Self {
        let tty = io::stdout().is_tty();
        Self {
            buffer: String::new(),
            paging: paging && tty && std::env::var_os("NOPAGER").is_none(),
            tty,
        }
    }

    fn fits_on_screen(&self) -> bool {
        match terminal::size() {
            Ok((_, rows)) => self.buffer.lines().count() < usize::from(rows),
            Err(_) => true,
        }
    }

    fn page(&self) -> io::Result<()> {
        let pager = minus::Pager::new();
        pager
            .set_text(self.buffer.as_str())
            .map_err(|e| io::Error::other(e.to_string()))?;
        pager
            .set_prompt("agit")
            .map_err(|e| io::Error::other(e.to_string()))?;
        minus::page_all(pager).map_err(|e| io::Error::other(e.to_string()))
    }
}

impl Write for Pager {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        if self.paging && !self.fits_on_screen() {
            self.page()?;
        } else {
            let mut stdout = io::stdout().lock();
            stdout.write_all(self.buffer.as_bytes())?;
            stdout.flush()?;
        }

        self.buffer.clear();
        Ok(())
    }
}

impl OutputStream for Pager {
    fn is_styled(&self) -> bool {
        self.tty
    }
}

fn heading<W: OutputStream + ?Sized>(out: &W, label: &str) -> String {
    if out.is_styled() {
        label.bold().cyan().to_string()
    } else {
        label.to_string()
    }
}

pub fn print_command<W: OutputStream + ?Sized>(out: &mut W, command: &str) -> io::Result<()> {
    let label = heading(out, "Command:");
    writeln!(out, "{} {}", label, command)
}

pub fn print_description<W: OutputStream + ?Sized>(
    out: &mut W,
    description: &str,
) -> io::Result<()> {
    let label = heading(out, "Description:");
    writeln!(out, "{} {}", label, description)
}

pub fn print_explanation<W: OutputStream + ?Sized>(
    out: &mut W,
    explanation: &str,
) -> io::Result<()> {
    let label = heading(out, "Explanation:");
    writeln!(out, "{}\n{}\n", label, explanation)
}

pub fn print_review<W: OutputStream + ?Sized>(out: &mut W, feedback: &str) -> io::Result<()> {
    let label = heading(out, "Review:");
    writeln!(out, "{}\n{}", label, feedback)
}

pub fn print_warning<W: OutputStream + ?Sized>(out: &mut W, reason: &str) -> io::Result<()> {
    let warning = "Warning: This seems to be a destructive command";
    if out.is_styled() {
        writeln!(out, "{}", warning.red().bold())?;
    } else {
        writeln!(out, "{}", warning)?;
    }
    writeln!(out, "Reason: {}\n", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_headings() {
        assert_eq!(
            rendered(|out| print_command(out, "git status")),
            "Command: git status\n"
        );
        assert_eq!(
            rendered(|out| print_description(out, "Show status")),
            "Description: Show status\n"
        );
    }

    #[test]
    fn test_explanation_block() {
        let text = rendered(|out| print_explanation(out, "Lists changed files."));
        assert_eq!(text, "Explanation:\nLists changed files.\n\n");
    }

    #[test]
    fn test_warning_includes_reason() {
        let text = rendered(|out| print_warning(out, "hard reset discards uncommitted changes (--hard)"));
        assert!(text.starts_with("Warning: This seems to be a destructive command\n"));
        assert!(text.contains("Reason: hard reset discards uncommitted changes (--hard)"));
    }

    #[test]
    fn test_pager_buffers_until_flush() {
        let mut pager = Pager {
            buffer: String::new(),
            paging: false,
            tty: false,
        };
        write!(pager, "hello").unwrap();
        assert_eq!(pager.buffer, "hello");
        assert!(!pager.is_styled());
    }
}

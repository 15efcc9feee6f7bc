//! File-type sniffing.

use std::path::Path;
use std::process::Command;

/// How a document's text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `pdftotext <file> -`
    Pdf,
    /// `doc2txt <file> -`, for `.doc` and `.docx`
    Doc,
    /// `odt2txt --stdout <file>`
    Odt,
    /// `unrtf --text <file>`
    Rtf,
    /// Read the raw bytes. CSV, TXT and anything unrecognized.
    Raw,
}

impl DocumentKind {
    /// Picks a kind from the file extension, case-insensitively.
    pub fn sniff(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "doc" | "docx" => DocumentKind::Doc,
            "odt" => DocumentKind::Odt,
            "rtf" => DocumentKind::Rtf,
            _ => DocumentKind::Raw,
        }
    }

    /// The converter to run, or `None` for [`DocumentKind::Raw`].
    pub fn command(self, path: &Path) -> Option<Command> {
        let (program, before, after): (&str, &[&str], &[&str]) = match self {
            DocumentKind::Pdf => ("pdftotext", &[], &["-"]),
            DocumentKind::Doc => ("doc2txt", &[], &["-"]),
            DocumentKind::Odt => ("odt2txt", &["--stdout"], &[]),
            DocumentKind::Rtf => ("unrtf", &["--text"], &[]),
            DocumentKind::Raw => return None,
        };

        let mut command = Command::new(program);
        command.args(before).arg(path).args(after);
        Some(command)
    }
}

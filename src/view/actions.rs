//! Row actions and presentation helpers.

use colored::{ColoredString, Colorize};
use reqwest::Url;
use serde::Serialize;

use crate::ingest::normalize_compact;
use crate::model::{is_absent, LetterRecord};

/// Placeholder shown for absent values. Internal data always uses `ABSENT`.
pub const DISPLAY_ABSENT: &str = "\u{2014}";

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Value for display, with absent values rendered as [`DISPLAY_ABSENT`].
#[must_use]
pub fn display(value: &str) -> &str {
    if is_absent(value) { DISPLAY_ABSENT } else { value }
}

/// WhatsApp share link for a letter, mentioning the name and PDF when known.
#[must_use]
pub fn whatsapp_link(letter: &LetterRecord) -> Option<String> {
    let name = if is_absent(&letter.name) { "registro" } else { letter.name.as_str() };
    let text = if is_absent(&letter.pdf_url) {
        format!("Confira este registro de {name}.")
    } else {
        format!("Confira esta carta de {name}: {}", letter.pdf_url)
    };
    Url::parse_with_params(WHATSAPP_BASE, &[("text", text)])
        .ok()
        .map(String::from)
}

/// Highlight class derived from a letter's access status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Blocked,
    Released,
    Pending,
    Unknown,
}

impl StatusClass {
    #[must_use]
    pub fn classify(status: &str) -> Self {
        if is_absent(status) {
            return Self::Unknown;
        }
        let s = normalize_compact(status);
        match s.as_str() {
            "sim" | "autorizado" => return Self::Released,
            "nao" | "bloqueado" => return Self::Blocked,
            _ => {}
        }
        if s.starts_with("nao")
            || s.contains("bloq")
            || s.contains("negad")
            || s.contains("suspens")
            || s.contains("inativ")
        {
            Self::Blocked
        } else if s.contains("liber")
            || s.contains("aprov")
            || s.contains("autoriz")
            || s.contains("ativ")
        {
            Self::Released
        } else if s.contains("pend") || s.contains("analise") || s.contains("aguard") {
            Self::Pending
        } else {
            Self::Unknown
        }
    }

    /// Color `text` for terminal output.
    #[must_use]
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Blocked => text.red().bold(),
            Self::Released => text.green(),
            Self::Pending => text.yellow(),
            Self::Unknown => text.normal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_sentinel() {
        assert_eq!(display("-"), DISPLAY_ABSENT);
        assert_eq!(display(""), DISPLAY_ABSENT);
        assert_eq!(display("Sede"), "Sede");
    }

    #[test]
    fn test_whatsapp_link_encodes_text() {
        let letter = LetterRecord {
            name: "Ana Lima".into(),
            pdf_url: "https://drive.example/doc?id=1".into(),
            ..LetterRecord::empty()
        };
        let link = whatsapp_link(&letter).unwrap();
        assert!(link.starts_with("https://wa.me/?text="));
        assert!(link.contains("Confira+esta+carta+de+Ana+Lima%3A+"));
        assert!(link.contains("https%3A%2F%2Fdrive.example%2Fdoc%3Fid%3D1"));
    }

    #[test]
    fn test_whatsapp_link_without_pdf() {
        let link = whatsapp_link(&LetterRecord::empty()).unwrap();
        assert_eq!(link, "https://wa.me/?text=Confira+este+registro+de+registro.");
        assert!(!link.contains("%E2%80%94"));
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(StatusClass::classify("BLOQUEADO"), StatusClass::Blocked);
        assert_eq!(StatusClass::classify("Liberado"), StatusClass::Released);
        assert_eq!(StatusClass::classify("Em análise"), StatusClass::Pending);
        assert_eq!(StatusClass::classify("-"), StatusClass::Unknown);
        assert_eq!(StatusClass::classify("xyz"), StatusClass::Unknown);
    }

    #[test]
    fn test_access_sheet_vocabulary() {
        assert_eq!(StatusClass::classify("Sim"), StatusClass::Released);
        assert_eq!(StatusClass::classify("Autorizado"), StatusClass::Released);
        assert_eq!(StatusClass::classify("Não"), StatusClass::Blocked);
        assert_eq!(StatusClass::classify("nao"), StatusClass::Blocked);
        assert_eq!(StatusClass::classify(" NÃO "), StatusClass::Blocked);
        assert_eq!(StatusClass::classify("Não autorizado"), StatusClass::Blocked);
        assert_eq!(StatusClass::classify("bloqueado"), StatusClass::Blocked);
    }
}

//! EXIF timestamps
//!
//! EXIF stores local times as `"YYYY:MM:DD HH:MM:SS"` without a zone.
//! Fractions of a second live in separate SubSecTime tags as a string of
//! decimal digits.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_TIME_PATTERN: Option<Regex> =
        Regex::new(r"^(\d{4}):(\d{2}):(\d{2}) (\d{2}):(\d{2}):(\d{2})$").ok();
}

/// A parsed EXIF date and time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Sub-second digits, e.g. `"25"` for 0.25 s
    pub subsec: Option<String>,
}

impl ExifDateTime {
    /// Parses `"YYYY:MM:DD HH:MM:SS"`
    ///
    /// Blank or zeroed placeholders that cameras write for unknown times,
    /// and out-of-range fields, give `None`.
    pub fn parse(text: &str) -> Option<ExifDateTime> {
        let pattern = DATE_TIME_PATTERN.as_ref()?;
        let caps = pattern.captures(text.trim_end_matches(&['\0', ' '][..]))?;
        let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u16>().ok());

        let parsed = ExifDateTime {
            year: field(1)?,
            month: field(2)? as u8,
            day: field(3)? as u8,
            hour: field(4)? as u8,
            minute: field(5)? as u8,
            second: field(6)? as u8,
            subsec: None,
        };

        let valid = parsed.year > 0
            && (1..=12).contains(&parsed.month)
            && (1..=31).contains(&parsed.day)
            && parsed.hour < 24
            && parsed.minute < 60
            && parsed.second <= 60;
        valid.then_some(parsed)
    }

    /// Attaches a SubSecTime value if it is made of digits
    pub fn with_subsec(mut self, subsec: Option<String>) -> Self {
        self.subsec = subsec
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()));
        self
    }

    /// Sub-second part as a fraction of a second
    pub fn subsec_fraction(&self) -> f64 {
        self.subsec
            .as_ref()
            .and_then(|digits| format!("0.{}", digits).parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

impl fmt::Display for ExifDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if let Some(subsec) = &self.subsec {
            write!(f, ".{}", subsec)?;
        }
        Ok(())
    }
}

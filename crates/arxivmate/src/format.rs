//! Text formatting utilities for dates and page file names.
//!
//! Note-taking hosts describe date formats with date-fns style tokens (`MMM do, yyyy`)
//! rather than strftime. [`format_date`] understands the tokens such hosts offer and
//! falls back to strftime when the pattern contains a `%`.
//!
//! # Examples
//!
//! ```
//! use arxivmate::format;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! assert_eq!(format::format_date(date, "MMM do, yyyy"), "Mar 1st, 2024");
//! assert_eq!(format::format_date(date, "yyyy-MM-dd"), "2024-03-01");
//! assert_eq!(format::format_date(date, "%d/%m/%Y"), "01/03/2024");
//!
//! assert_eq!(format::page_file_name("Proofs/Arguments"), "Proofs___Arguments");
//! ```

use std::fmt::Write;

use chrono::Datelike;

use super::*;

/// Date format used when neither the host nor the configuration specify one.
pub const DEFAULT_DATE_FORMAT: &str = "MMM do, yyyy";

/// Formats `date` according to a date-fns style `pattern`.
///
/// Supported tokens:
/// - `yyyy`, `yy`: year
/// - `MMMM`, `MMM`, `MM`, `M`: month name, short name, padded and plain number
/// - `dd`, `d`, `do`: padded day, plain day, day with an ordinal suffix
/// - `EEEE`, `EEE`, `EE`, `E`: weekday name and short name
///
/// Text between single quotes is copied verbatim (`''` yields a quote); any other
/// character is copied as is. A pattern containing `%` is treated as a strftime
/// string instead.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
  if pattern.contains('%') {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
      warn!("Invalid date format {pattern:?}, using {DEFAULT_DATE_FORMAT:?}");
      return format_date(date, DEFAULT_DATE_FORMAT);
    }
    return out;
  }

  let chars: Vec<char> = pattern.chars().collect();
  let mut out = String::new();
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];

    if c == '\'' {
      // Quoted literal
      i += 1;
      if chars.get(i) == Some(&'\'') {
        out.push('\'');
        i += 1;
        continue;
      }
      while i < chars.len() {
        if chars[i] == '\'' {
          if chars.get(i + 1) == Some(&'\'') {
            out.push('\'');
            i += 2;
            continue;
          }
          i += 1;
          break;
        }
        out.push(chars[i]);
        i += 1;
      }
      continue;
    }

    let run = chars[i..].iter().take_while(|&&other| other == c).count();

    match (c, run) {
      ('y', 2) => out.push_str(&date.format("%y").to_string()),
      ('y', _) => out.push_str(&date.format("%Y").to_string()),
      ('M', 1) => out.push_str(&date.month().to_string()),
      ('M', 2) => out.push_str(&date.format("%m").to_string()),
      ('M', 3) => out.push_str(&date.format("%b").to_string()),
      ('M', _) => out.push_str(&date.format("%B").to_string()),
      ('d', 1) if chars.get(i + 1) == Some(&'o') => {
        out.push_str(&ordinal(date.day()));
        i += 2;
        continue;
      },
      ('d', 1) => out.push_str(&date.day().to_string()),
      ('d', _) => out.push_str(&date.format("%d").to_string()),
      ('E', 1..=3) => out.push_str(&date.format("%a").to_string()),
      ('E', _) => out.push_str(&date.format("%A").to_string()),
      _ => (0..run).for_each(|_| out.push(c)),
    }
    i += run;
  }

  out
}

/// Renders a day of the month with its English ordinal suffix.
fn ordinal(day: u32) -> String {
  let suffix = match (day % 10, day % 100) {
    (_, 11..=13) => "th",
    (1, _) => "st",
    (2, _) => "nd",
    (3, _) => "rd",
    _ => "th",
  };
  format!("{day}{suffix}")
}

/// Converts a page title into the file name (without extension) the page is stored
/// under.
///
/// Namespace separators (`/`) become `___`, characters file systems reject are dropped,
/// and trailing dots and spaces are trimmed.
pub fn page_file_name(title: &str) -> String {
  let name: String = title
    .replace('/', "___")
    .chars()
    .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '\\' | '|' | '?' | '*') && !c.is_control())
    .collect();

  name.trim_end_matches(['.', ' ']).trim_start().to_string()
}

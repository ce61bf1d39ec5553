//! Timestamp extraction (spec §4.3).

use std::sync::OnceLock;

use lidl_receipt_core::upper_ascii;
use regex::Regex;

fn re_date() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"DATA\s*[: ]\s*([0-9]{2})/([0-9]{2})/([0-9]{4})").unwrap())
}

fn re_time() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[0O]RA\s*[: ]\s*([0-9]{2})[-: ]([0-9]{2})[-: ]([0-9]{2})").unwrap())
}

fn re_non_digit() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\D").unwrap())
}

fn clean_digits(s: &str) -> String {
    re_non_digit().replace_all(s, "0").to_string()
}

/// Find the first `DATA ...` and `ORA ...` lines and compose an ISO-8601
/// timestamp. `date` alone implies midnight; neither present is `None`.
pub fn extract_timestamp(lines: &[String]) -> Option<String> {
    let mut date: Option<String> = None;
    let mut time: Option<String> = None;

    for line in lines {
        let upper = upper_ascii(line);

        if date.is_none() {
            if let Some(c) = re_date().captures(&upper) {
                date = Some(format!("{}-{}-{}", &c[3], &c[2], &c[1]));
            }
        }

        if time.is_none() {
            if let Some(c) = re_time().captures(&upper) {
                let h = clean_digits(&c[1]);
                let m = clean_digits(&c[2]);
                let s = clean_digits(&c[3]);
                time = Some(format!("{h}:{m}:{s}"));
            }
        }
    }

    let composed = match (&date, &time) {
        (Some(d), Some(t)) => Some(format!("{d}T{t}")),
        (Some(d), None) => Some(format!("{d}T00:00:00")),
        _ => None,
    };

    if let Some(ts) = &composed {
        if chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S").is_err() {
            tracing::warn!(timestamp = %ts, "composed timestamp is not a valid calendar date/time; emitting as-extracted");
        }
    }

    composed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn composes_date_and_time() {
        let ls = lines(&["DATA: 15/03/2024", "ORA: 14-32-10"]);
        assert_eq!(extract_timestamp(&ls).as_deref(), Some("2024-03-15T14:32:10"));
    }

    #[test]
    fn date_only_defaults_to_midnight() {
        let ls = lines(&["DATA 15/03/2024"]);
        assert_eq!(extract_timestamp(&ls).as_deref(), Some("2024-03-15T00:00:00"));
    }

    #[test]
    fn neither_present_is_none() {
        let ls = lines(&["no timestamp here"]);
        assert_eq!(extract_timestamp(&ls), None);
    }

    #[test]
    fn ora_accepts_zero_in_place_of_letter_o() {
        let ls = lines(&["DATA: 01/01/2024", "0RA: 09:05:00"]);
        assert_eq!(extract_timestamp(&ls).as_deref(), Some("2024-01-01T09:05:00"));
    }

    #[test]
    fn time_separators_may_mix_dash_colon_and_space() {
        let ls = lines(&["DATA: 01/01/2024", "ORA: 10 05-22"]);
        let ts = extract_timestamp(&ls).unwrap();
        assert_eq!(ts, "2024-01-01T10:05:22");
    }
}

use crate::ParseError;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    // ^: - тег всегда с начала строки
    // [0-9A-Z]{2,3} - код тега: 20, 25, 28C, 60F, 61, 86, ...
    Regex::new(r"^:([0-9A-Z]{2,3}):").unwrap()
});

/// Разделяет строку с тегом на сам тег и строку после него.
///
/// Для строк без тега (продолжение предыдущего значения) возвращает `None`.
pub(super) fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let caps = TAG_LINE_RE.captures(line)?;
    let tag = caps.get(1)?.as_str();
    let value = &line[caps.get(0)?.end()..];

    Some((tag, value))
}

/// Завершающая строка блока сообщения: "-" или "-}"
pub(super) fn is_trailer_line(line: &str) -> bool {
    matches!(line.trim(), "-" | "-}")
}

pub(super) fn parse_mt940_yy_mm_dd(s: &str) -> Result<NaiveDate, ParseError> {
    if s.len() != 6 {
        return Err(ParseError::BadInput(format!(
            "invalid YYMMDD date: '{s}'"
        )));
    }

    let yy: i32 = s[0..2]
        .parse()
        .map_err(|_| ParseError::BadInput(format!("invalid year in YYMMDD: '{s}'")))?;
    let mm: u32 = s[2..4]
        .parse()
        .map_err(|_| ParseError::BadInput(format!("invalid month in YYMMDD: '{s}'")))?;
    let dd: u32 = s[4..6]
        .parse()
        .map_err(|_| ParseError::BadInput(format!("invalid day in YYMMDD: '{s}'")))?;

    // простое допущение: все даты в 2000-х
    let year = 2000 + yy;

    NaiveDate::from_ymd_opt(year, mm, dd).ok_or_else(|| {
        ParseError::BadInput(format!("invalid YYMMDD date components: '{s}'"))
    })
}

/// Дата проводки из MMDD, год берётся из даты валютирования.
///
/// На стыке годов (валютирование в декабре, проводка в январе и наоборот)
/// год сдвигается.
pub(super) fn derive_book_date(value_date: NaiveDate, mmdd: &str) -> Option<NaiveDate> {
    if mmdd.len() != 4 {
        return None;
    }

    let mm: u32 = mmdd[0..2].parse().ok()?;
    let dd: u32 = mmdd[2..4].parse().ok()?;

    let year = match (value_date.month(), mm) {
        (12, 1) => value_date.year() + 1,
        (1, 12) => value_date.year() - 1,
        _ => value_date.year(),
    };

    NaiveDate::from_ymd_opt(year, mm, dd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::ParseError;

    // split_tag_line

    #[test]
    fn split_tag_line_parses_valid_line() {
        let (tag, value) = split_tag_line(":20:ABC").unwrap();
        assert_eq!(tag, "20");
        assert_eq!(value, "ABC");
    }

    #[test]
    fn split_tag_line_accepts_three_char_tags() {
        let (tag, value) = split_tag_line(":28C:00049/001").unwrap();
        assert_eq!(tag, "28C");
        assert_eq!(value, "00049/001");

        let (tag, _) = split_tag_line(":60F:C140101EUR1,00").unwrap();
        assert_eq!(tag, "60F");
    }

    #[test]
    fn split_tag_line_ignores_continuation_lines() {
        assert!(split_tag_line("/CNTP/NL12INGB0001234567/").is_none());
        assert!(split_tag_line("  :20:indented").is_none());
        assert!(split_tag_line(":20ABC").is_none());
        assert!(split_tag_line(":toolong:x").is_none());
    }

    #[test]
    fn trailer_lines_are_recognized() {
        assert!(is_trailer_line("-}"));
        assert!(is_trailer_line("-\r"));
        assert!(!is_trailer_line("-EUR 12,00"));
    }

    // parse_mt940_yy_mm_dd

    #[test]
    fn parse_mt940_yy_mm_dd_parses_valid_strings() {
        assert_eq!(
            parse_mt940_yy_mm_dd("140317").unwrap(),
            NaiveDate::from_ymd_opt(2014, 3, 17).unwrap()
        );
    }

    #[test]
    fn parse_mt940_yy_mm_dd_fails_when_expected() {
        assert!(matches!(
            parse_mt940_yy_mm_dd("141301"),
            Err(ParseError::BadInput(_))
        ));
        assert!(matches!(
            parse_mt940_yy_mm_dd("abcdef"),
            Err(ParseError::BadInput(_))
        ));
        assert!(matches!(
            parse_mt940_yy_mm_dd("1403"),
            Err(ParseError::BadInput(_))
        ));
    }

    // derive_book_date

    #[test]
    fn derive_book_date_uses_value_date_year() {
        let vd = NaiveDate::from_ymd_opt(2014, 3, 17).unwrap();
        assert_eq!(
            derive_book_date(vd, "0318"),
            NaiveDate::from_ymd_opt(2014, 3, 18)
        );
    }

    #[test]
    fn derive_book_date_crosses_year_boundary() {
        let dec = NaiveDate::from_ymd_opt(2013, 12, 31).unwrap();
        assert_eq!(
            derive_book_date(dec, "0102"),
            NaiveDate::from_ymd_opt(2014, 1, 2)
        );

        let jan = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        assert_eq!(
            derive_book_date(jan, "1231"),
            NaiveDate::from_ymd_opt(2013, 12, 31)
        );
    }

    #[test]
    fn derive_book_date_is_none_on_garbage() {
        let vd = NaiveDate::from_ymd_opt(2014, 3, 17).unwrap();
        assert!(derive_book_date(vd, "0000").is_none());
        assert!(derive_book_date(vd, "99aa").is_none());
        assert!(derive_book_date(vd, "031").is_none());
    }
}

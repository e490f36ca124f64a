//! Извлечение подполей вида `/TAG/значение/значение/.../` из строк выписки.

use crate::document::LineEnding;
use crate::grammar::FieldClass;
use regex::Regex;

/// Скомпилированная грамматика одного блока подполей.
///
/// `/CNTP/` с четырьмя полями класса X превращается в
/// `/CNTP/(X*)/(X*)/(X*)/(X*)/`.
#[derive(Debug, Clone)]
pub struct SubfieldGrammar {
    width: usize,
    regex: Regex,
}

impl SubfieldGrammar {
    pub fn new(tag: &str, classes: &[FieldClass]) -> Self {
        let mut pattern = format!("/{}/", regex::escape(tag));
        for class in classes {
            pattern.push('(');
            pattern.push_str(class.pattern());
            pattern.push_str("*)/");
        }

        // тег экранирован, классы константные
        let regex = Regex::new(&pattern).expect("sub-field pattern is always valid");

        SubfieldGrammar {
            width: classes.len(),
            regex,
        }
    }

    /// Возвращает по одному значению на каждую группу.
    ///
    /// Переводы строк внутри payload вырезаются до сопоставления: многострочное
    /// поле для подполей считается одной строкой. Если блока нет, все группы `None`.
    /// Берётся только первое вхождение блока.
    pub fn extract(&self, payload: &str, line_ending: LineEnding) -> Vec<Option<String>> {
        let payload = payload.replace(line_ending.as_str(), "");

        match self.regex.captures(&payload) {
            Some(caps) => (1..=self.width)
                .map(|idx| caps.get(idx).map(|m| m.as_str().to_string()))
                .collect(),
            None => vec![None; self.width],
        }
    }
}

/// Разовое извлечение без заранее скомпилированной грамматики
pub fn extract(
    payload: &str,
    line_ending: LineEnding,
    tag: &str,
    classes: &[FieldClass],
) -> Vec<Option<String>> {
    SubfieldGrammar::new(tag, classes).extract(payload, line_ending)
}

/// Пустое подполе считаем отсутствующим
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use FieldClass::{X, X2};

    #[test]
    fn extract_recovers_three_values_in_order() {
        let values = ["NL12INGB0001234567", "J. Jansen (Utrecht)", "ref: 2020-01, {42}?"];
        let payload = format!("/TAG/{}/{}/{}/", values[0], values[1], values[2]);

        let got = extract(&payload, LineEnding::Lf, "TAG", &[X, X, X]);

        assert_eq!(
            got,
            values.iter().map(|v| Some(v.to_string())).collect::<Vec<_>>()
        );
    }

    #[test]
    fn extract_round_trips_various_class_x_values() {
        let cases: [[&str; 3]; 4] = [
            ["", "", ""],
            ["   ", " x ", "\t"],
            ["a:b", "{1:F01}", "(+?-.,)"],
            ["0", "", "last value"],
        ];

        for values in cases {
            let payload = format!("/TAG/{}/{}/{}/", values[0], values[1], values[2]);
            let got = extract(&payload, LineEnding::Lf, "TAG", &[X, X, X]);

            assert_eq!(
                got,
                values.iter().map(|v| Some(v.to_string())).collect::<Vec<_>>(),
                "payload {payload:?}"
            );
        }
    }

    #[test]
    fn extract_round_trips_value_split_by_crlf() {
        let payload = "/TAG/first/sec\r\nond/th\r\nird/";
        let got = extract(payload, LineEnding::CrLf, "TAG", &[X, X, X]);

        assert_eq!(
            got,
            vec![
                Some("first".to_string()),
                Some("second".to_string()),
                Some("third".to_string()),
            ]
        );
    }

    #[test]
    fn extract_returns_all_none_without_block() {
        let got = extract("/EREF/NOTPROVIDED/", LineEnding::Lf, "CNTP", &[X, X, X, X]);
        assert_eq!(got, vec![None, None, None, None]);
    }

    #[test]
    fn extract_strips_declared_line_ending_first() {
        let payload = "/CNTP/NL12INGB00\r\n01234567/INGBNL2A/J\r\n. Jansen/UTRECHT/";
        let got = extract(payload, LineEnding::CrLf, "CNTP", &[X, X, X, X]);

        assert_eq!(got[0].as_deref(), Some("NL12INGB0001234567"));
        assert_eq!(got[2].as_deref(), Some("J. Jansen"));
    }

    #[test]
    fn interior_field_does_not_swallow_delimiter() {
        // второе поле X обрывается на первом '/', хвост "b/" в него не попадает
        let got = extract("/STRD/CUR/a/b/", LineEnding::Lf, "STRD", &[X, X]);
        assert_eq!(got, vec![Some("CUR".to_string()), Some("a".to_string())]);
    }

    #[test]
    fn trailing_x2_field_keeps_embedded_slash() {
        let got = extract("/USTD//factuur 2020/01/", LineEnding::Lf, "USTD", &[X, X2]);
        assert_eq!(got[0].as_deref(), Some(""));
        assert_eq!(got[1].as_deref(), Some("factuur 2020/01"));
    }

    #[test]
    fn only_first_block_is_used() {
        let got = extract("/NAME/first/ /NAME/second/", LineEnding::Lf, "NAME", &[X]);
        assert_eq!(got, vec![Some("first".to_string())]);
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }
}

use crate::error::ParseError;
use crate::model::Currency;
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) fn parse_currency(raw: &str) -> Currency {
    let s = raw.trim();
    let upper = s.to_uppercase();

    match upper.as_str() {
        "EUR" => Currency::EUR,
        "USD" => Currency::USD,
        "GBP" => Currency::GBP,

        // Всё остальное как есть:
        _ => Currency::Other(s.to_string()),
    }
}

/// Разбирает беззнаковую сумму в форматах "12,50", "000000000012,50", "1234," и "100.00"
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let mut cleaned = raw.trim().replace(' ', "");

    if cleaned.contains(',') {
        if cleaned.contains('.') {
            cleaned = cleaned.replace(',', "");
        } else {
            cleaned = cleaned.replace(',', ".");
        }
    }

    // в mt940 допустима запятая без дробной части: "1234,"
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() {
        return Err(ParseError::InvalidAmount("empty amount".into()));
    }
    if cleaned.starts_with('-') {
        return Err(ParseError::InvalidAmount(format!("negative amount: {cleaned}")));
    }
    if cleaned.matches('.').count() > 1 {
        // больше одной точки: странный формат
        return Err(ParseError::InvalidAmount(format!("too many dots in amount: {cleaned}")));
    }

    Decimal::from_str(cleaned)
        .map_err(|e| ParseError::InvalidAmount(format!("{cleaned}: {e}")))
}

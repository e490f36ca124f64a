use super::TagDialect;
use crate::reader::{TagBody, TransactionLines};
use crate::subfield::non_empty;
use lazy_regex::regex_captures;
use tracing::{debug, info, warn};

/// MT940-выгрузка Rabobank (файл начинается с `:940:`)
///
/// Своих номеров выписок у Rabobank нет, вместо них берётся дата
/// открывающего баланса.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rabobank;

impl TagDialect for Rabobank {
    fn name(&self) -> &'static str {
        "rabobank"
    }

    fn sniff(&self, text: &str) -> bool {
        let matched = text.starts_with(":940:");
        if matched {
            info!("document matches Rabobank MT940 format");
        }
        matched
    }

    /// `:25:` в виде "IBAN ВАЛЮТА", в старых файлах номер с точками
    fn account_number(&self, body: &TagBody) -> Option<String> {
        let Some(line) = body.get_line("25") else {
            warn!("statement has no :25: account line");
            return None;
        };

        match regex_captures!(r"^([A-Z0-9.]+)(\s+[A-Z]+)?", line) {
            Some((_, number, _)) => {
                let number = number.replace('.', "");
                debug!(%number, "found account number");
                Some(number)
            }
            None => {
                warn!(line, "could not extract account number");
                None
            }
        }
    }

    /// Дата открывающего баланса `:60F:` (YYMMDD) как номер выписки
    fn statement_number(&self, body: &TagBody) -> Option<String> {
        let Some(line) = body.get_line("60F") else {
            warn!("statement has no :60F: opening balance");
            return None;
        };

        match regex_captures!(r"(C|D)(\d{6})([A-Z]{3})([0-9,]{1,15})", line) {
            Some((_, _, date, _, _)) => {
                debug!(date, "opening balance date used as statement number");
                Some(date.to_string())
            }
            None => {
                warn!(line, "could not extract opening balance");
                None
            }
        }
    }

    /// Счёт контрагента в хвосте `:61:`.
    ///
    /// После суммы идёт код операции (`N` + 3 цифры или `NMSC`), иногда мусор
    /// вроде NONREF/EREF/MARF, затем номер счёта: 8..24 символа, чтобы влезли и
    /// IBAN, и старые национальные номера.
    fn contra_account_number(&self, lines: &TransactionLines) -> Option<String> {
        let Some((_, _, _, _, _, _, _, account)) = regex_captures!(
            r"(\d{6})(\d{4})?((?:C|D)R?)([0-9,]{15})(N\d{3}|NMSC)([A-Z]+\s+)?([0-9A-Z]{8,24})",
            lines.detail()
        ) else {
            debug!(line = lines.detail(), "no contra account number in transaction line");
            return None;
        };

        Some(account.trim().to_string())
    }

    /// Имя есть только у операций типа ORDP: `/NAME/.../ADDR/` или `/NAME/.../REMI/`
    fn contra_account_name(&self, lines: &TransactionLines) -> Option<String> {
        let free_text = lines.free_text()?;

        if !free_text.contains("ORDP") {
            debug!("transaction type carries no contra account name");
            return None;
        }

        let payload = free_text.replace(lines.line_ending().as_str(), "");

        let Some((_, name, _, _)) = regex_captures!(r"(?s)/NAME/(.+?)(/(ADDR|REMI)/)", &payload)
        else {
            warn!(free_text, "could not extract contra account name");
            return None;
        };

        non_empty(Some(name.trim().to_string()))
    }
}

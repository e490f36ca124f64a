use super::{DescriptionStrategy, TagDialect};
use crate::grammar::FieldClass;
use crate::model::Transaction;
use crate::postprocess::correct_single_date;
use crate::reader::{TagBody, TransactionLines};
use crate::subfield::{SubfieldGrammar, non_empty};
use lazy_regex::regex_captures;
use once_cell::sync::Lazy;

/// Подполя CNTP: счёт / BIC / имя / город
static CNTP: Lazy<SubfieldGrammar> = Lazy::new(|| {
    SubfieldGrammar::new(
        "CNTP",
        &[FieldClass::X, FieldClass::X, FieldClass::X, FieldClass::X],
    )
});

const CNTP_ACCOUNT: usize = 0;
const CNTP_NAME: usize = 2;

/// Выписки ING (Нидерланды)
///
/// ING даёт в `:61:` только дату проводки, а универсальный ридер считает её
/// датой валютирования; это исправляется в [`TagDialect::correct_transaction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ing;

impl Ing {
    fn cntp_field(&self, lines: &TransactionLines, idx: usize) -> Option<String> {
        let payload = lines.free_text()?;
        let fields = CNTP.extract(payload, lines.line_ending());
        non_empty(fields.into_iter().nth(idx).flatten())
    }
}

impl TagDialect for Ing {
    fn name(&self) -> &'static str {
        "ing"
    }

    /// В заголовке `{1:F01INGBNL2A...}` BIC банка стоит с 6-го байта
    fn sniff(&self, text: &str) -> bool {
        text.as_bytes().get(6..12) == Some(b"INGBNL".as_slice())
    }

    /// `:25:` это IBAN и код валюты ISO 4217 без разделителя
    fn account_number(&self, body: &TagBody) -> Option<String> {
        let account = body.get_line("25")?.trim();

        if let Some((_, iban, _currency)) =
            regex_captures!(r"^([a-zA-Z0-9]+)([a-zA-Z]{3})$", account)
        {
            return Some(iban.to_string());
        }

        non_empty(Some(account.trim_start_matches('0').to_string()))
    }

    fn statement_number(&self, body: &TagBody) -> Option<String> {
        non_empty(body.get_line("28C").map(str::to_string))
    }

    fn contra_account_number(&self, lines: &TransactionLines) -> Option<String> {
        self.cntp_field(lines, CNTP_ACCOUNT)
    }

    fn contra_account_name(&self, lines: &TransactionLines) -> Option<String> {
        self.cntp_field(lines, CNTP_NAME)
    }

    fn description_strategies(&self) -> &'static [DescriptionStrategy] {
        &[
            DescriptionStrategy::Unstructured,
            DescriptionStrategy::Structured,
            DescriptionStrategy::Verbatim,
        ]
    }

    fn correct_transaction(&self, transaction: &mut Transaction, lines: &TransactionLines) {
        correct_single_date(transaction, lines.free_text());
    }
}

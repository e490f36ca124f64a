//! Доводка черновика транзакции, собранного ридером, правилами диалекта.

use crate::dialect::TagDialect;
use crate::model::{Account, Transaction};
use crate::reader::TransactionLines;
use chrono::NaiveDate;
use lazy_regex::regex_captures;
use tracing::{debug, warn};

/// Накладывает на черновик контрагента, описание и диалектную правку дат
pub fn apply<D: TagDialect + ?Sized>(
    dialect: &D,
    mut transaction: Transaction,
    lines: &TransactionLines,
) -> Transaction {
    let number = dialect.contra_account_number(lines);
    let name = dialect.contra_account_name(lines);

    let contra_account = if number.is_some() || name.is_some() {
        let mut account = Account::new(number);
        account.set_name(name);
        Some(account)
    } else {
        None
    };

    let description = dialect.description(lines.free_text(), lines.line_ending());

    transaction
        .set_contra_account(contra_account)
        .set_description(description);

    dialect.correct_transaction(&mut transaction, lines);

    transaction
}

/// Дата вида `transactiedatum: DD-MM-YYYY` из свободного текста.
///
/// Метка только голландская; другие языки и форматы не распознаются.
pub fn remark_date(free_text: &str) -> Option<NaiveDate> {
    let (_, raw) = regex_captures!(r"transactiedatum: (\d{2}-\d{2}-\d{4})", free_text)?;

    match NaiveDate::parse_from_str(raw, "%d-%m-%Y") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(raw, error = %e, "ignoring invalid transaction date in remark");
            None
        }
    }
}

/// Правка дат для диалектов с одной датой в `:61:`.
///
/// 1. Если дата проводки не заполнена, дата из `:61:` на самом деле дата
///    проводки: переносим её, а дату валютирования очищаем.
/// 2. Дата из примечания (`transactiedatum: ...`) становится датой валютирования.
///
/// Если ридер уже заполнил дату проводки (две даты в `:61:`), ничего не меняем.
pub fn correct_single_date(transaction: &mut Transaction, free_text: Option<&str>) {
    if transaction.book_date.is_some() {
        return;
    }

    let reader_date = transaction.value_date;
    transaction.set_book_date(reader_date).set_value_date(None);

    if let Some(date) = free_text.and_then(remark_date) {
        debug!(%date, "value date taken from remark");
        transaction.set_value_date(Some(date));
    }
}

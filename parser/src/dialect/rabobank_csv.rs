use crate::error::ParseError;
use crate::model::{Account, Statement, Transaction};
use crate::subfield::non_empty;
use crate::utils::{parse_amount, parse_currency};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Индексы колонок CSV-выгрузки Rabobank (формат 2013 года)
mod col {
    pub const OWN_ACCOUNT: usize = 0;
    pub const CURRENCY: usize = 1;
    pub const VALUE_DATE: usize = 2;
    pub const DEBIT_CREDIT: usize = 3;
    pub const AMOUNT: usize = 4;
    pub const CONTRA_ACCOUNT: usize = 5;
    pub const CONTRA_NAME: usize = 6;
    pub const BOOK_DATE: usize = 7;
    pub const DESCRIPTION: std::ops::RangeInclusive<usize> = 10..=15;

    pub const COUNT: usize = 19;
}

/// Счётчик номеров выписок для форматов без собственной нумерации.
///
/// Клоны делят одно значение. Новая сессия разбора создаёт новый счётчик,
/// поэтому параллельные сессии друг другу номера не перемешивают.
#[derive(Debug, Clone)]
pub struct StatementCounter {
    next: Arc<AtomicU64>,
}

impl StatementCounter {
    /// Счётчик, начинающийся с 1
    pub fn new() -> Self {
        StatementCounter {
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Отдаёт текущий номер и сдвигает счётчик
    pub fn next_number(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Номер, который получит следующая выписка
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for StatementCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Одна строка выгрузки, разложенная по колонкам
#[derive(Debug, Default)]
struct CsvRow {
    own_account: String,
    currency: String,
    value_date: String,
    debit_credit: String,
    amount: String,
    contra_account: String,
    contra_name: String,
    book_date: String,
    description: String,
}

impl CsvRow {
    /// Распаковывает колонки; количество колонок проверено заранее
    fn from_string_record(row: &StringRecord) -> Self {
        let get = |idx: usize| -> String { row.get(idx).unwrap_or("").to_string() };

        let description = col::DESCRIPTION.map(&get).collect::<String>();

        CsvRow {
            own_account: get(col::OWN_ACCOUNT),
            currency: get(col::CURRENCY),
            value_date: get(col::VALUE_DATE),
            debit_credit: get(col::DEBIT_CREDIT),
            amount: get(col::AMOUNT),
            contra_account: get(col::CONTRA_ACCOUNT),
            contra_name: get(col::CONTRA_NAME),
            book_date: get(col::BOOK_DATE),
            description,
        }
    }

    fn into_transaction(self, csv: &RabobankCsv) -> Result<Transaction, ParseError> {
        let amount = parse_amount(&self.amount)?;
        let amount = match self.debit_credit.as_str() {
            "C" => amount,
            "D" => -amount,
            other => {
                return Err(ParseError::InvalidDirection(format!(
                    "expected C or D, got '{other}'"
                )));
            }
        };

        let value_date = parse_csv_date(&self.value_date, "value_date");
        let book_date = parse_csv_date(&self.book_date, "book_date");

        let contra_number = non_empty(Some(self.contra_account));
        let contra_name = non_empty(Some(self.contra_name));
        let contra_account = if contra_number.is_some() || contra_name.is_some() {
            let mut account = Account::new(contra_number);
            account.set_name(contra_name);
            Some(account)
        } else {
            None
        };

        let mut transaction = Transaction::new();
        transaction
            .set_amount(amount)
            .set_contra_account(contra_account)
            .set_value_date(value_date)
            .set_book_date(book_date)
            .set_description(csv.description(&self.description));

        Ok(transaction)
    }
}

/// Дата `YYYYMMDD`; пустая или битая колонка даёт отсутствующую дату
fn parse_csv_date(raw: &str, column: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw.trim(), "%Y%m%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(column, raw, error = %e, "ignoring malformed date");
            None
        }
    }
}

/// Разбирает одну строку как CSV-запись
fn read_record(line: &str) -> Result<StringRecord, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(record) => Ok(record?),
        None => Ok(StringRecord::new()),
    }
}

/// CSV-выгрузка Rabobank: 19 колонок, каждая строка становится отдельной
/// выпиской с одной транзакцией.
#[derive(Debug, Clone)]
pub struct RabobankCsv {
    counter: StatementCounter,
}

impl RabobankCsv {
    pub const NAME: &'static str = "rabobank-csv";

    pub fn new(counter: StatementCounter) -> Self {
        RabobankCsv { counter }
    }

    pub fn counter(&self) -> &StatementCounter {
        &self.counter
    }

    /// Первая непустая строка: 19 колонок и признак C/D в четвёртой
    pub fn sniff(&self, text: &str) -> bool {
        let first_line = text
            .split('\n')
            .map(|l| l.trim_end_matches('\r'))
            .find(|l| !l.is_empty());
        let Some(line) = first_line else {
            return false;
        };

        let Ok(record) = read_record(line) else {
            return false;
        };

        let matched = record.len() == col::COUNT
            && matches!(record.get(col::DEBIT_CREDIT), Some("C") | Some("D"));
        if matched {
            info!("document matches Rabobank CSV format");
        }
        matched
    }

    /// Описание как есть; пустое считается отсутствующим
    pub fn description(&self, text: &str) -> Option<String> {
        non_empty(Some(text.to_string()))
    }

    /// Разбирает все непустые строки; первая битая строка прерывает документ.
    ///
    /// Номера выписок раздаются только после того, как разобраны все строки,
    /// поэтому прерванный документ счётчик не сдвигает.
    pub fn parse_all(&self, text: &str) -> Result<Vec<Statement>, ParseError> {
        let drafts = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.draft_statement(line))
            .collect::<Result<Vec<_>, _>>()?;

        let statements: Vec<Statement> = drafts
            .into_iter()
            .map(|draft| self.numbered(draft))
            .collect();

        debug!(rows = statements.len(), "parsed Rabobank CSV document");
        Ok(statements)
    }

    /// Одна строка CSV в выписку с одной транзакцией.
    ///
    /// Номер выписки берётся из счётчика сессии и сдвигается только для
    /// успешно разобранной строки.
    pub fn parse_row(&self, line: &str) -> Result<Statement, ParseError> {
        let draft = self.draft_statement(line)?;
        Ok(self.numbered(draft))
    }

    /// Выписка без номера
    fn draft_statement(&self, line: &str) -> Result<Statement, ParseError> {
        let record = read_record(line)?;
        if record.len() != col::COUNT {
            return Err(ParseError::ColumnCount {
                expected: col::COUNT,
                found: record.len(),
                line: line.to_string(),
            });
        }

        let row = CsvRow::from_string_record(&record);
        let account = Account::new(non_empty(Some(row.own_account.clone())));
        let currency = non_empty(Some(row.currency.clone())).map(|c| parse_currency(&c));
        let transaction = row.into_transaction(self)?;

        let mut statement = Statement::new(account, None);
        statement
            .set_currency(currency)
            .add_transaction(transaction);

        Ok(statement)
    }

    fn numbered(&self, mut statement: Statement) -> Statement {
        let number = self.counter.next_number();
        statement.set_number(Some(number.to_string()));
        statement
    }
}

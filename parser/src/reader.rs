//! Универсальный ридер тегового формата (MT940-подобного).
//!
//! Делит документ на выписки по `:20:`, выписку на теговые строки, а из пар
//! `:61:` + `:86:` собирает черновики транзакций. Всё, что зависит от банка,
//! спрашивает у [`TagDialect`].

mod utils;

use crate::dialect::TagDialect;
use crate::document::{LineEnding, RawDocument};
use crate::error::ParseError;
use crate::model::{Account, Balance, Statement, Transaction};
use crate::postprocess;
use crate::utils::{parse_amount, parse_currency};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use utils::*;

static STATEMENT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    // YYMMDD [MMDD] C|D|RC|RD [R] сумма
    Regex::new(r"(\d{6})((\d{2})(\d{2}))?(RC|RD|C|D)R?([0-9,]{1,15})").unwrap()
});

/// Одна логическая теговая строка, например `:25:` или `:86:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    /// код тега без двоеточий: "25", "28C", "60F"
    pub tag: String,
    /// значение; продолжения склеены объявленным переводом строки
    pub value: String,
}

/// Тело одной выписки: теговые строки от `:20:` до следующего `:20:`
#[derive(Debug, Clone)]
pub struct TagBody {
    lines: Vec<TagLine>,
    line_ending: LineEnding,
}

impl TagBody {
    pub fn new(lines: Vec<TagLine>, line_ending: LineEnding) -> Self {
        TagBody { lines, line_ending }
    }

    /// Разбирает текст одной выписки
    pub fn from_text(text: &str, line_ending: LineEnding) -> Self {
        TagBody::new(tokenize(text, line_ending), line_ending)
    }

    pub fn lines(&self) -> &[TagLine] {
        &self.lines
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Значение первой строки с данным тегом
    pub fn get_line(&self, tag: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.tag == tag)
            .map(|line| line.value.as_str())
    }

    /// Каждая `:61:` вместе с `:86:`, если та идёт сразу за ней
    pub fn transactions(&self) -> Vec<TransactionLines> {
        let mut result = Vec::new();
        let mut iter = self.lines.iter().peekable();

        while let Some(line) = iter.next() {
            if line.tag != "61" {
                continue;
            }

            let free_text = iter
                .next_if(|next| next.tag == "86")
                .map(|next| next.value.clone());

            result.push(TransactionLines::new(
                line.value.clone(),
                free_text,
                self.line_ending,
            ));
        }

        result
    }
}

/// Строки одной транзакции: детальная `:61:` и свободный текст `:86:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLines {
    detail: String,
    free_text: Option<String>,
    line_ending: LineEnding,
}

impl TransactionLines {
    pub fn new(detail: String, free_text: Option<String>, line_ending: LineEnding) -> Self {
        TransactionLines {
            detail,
            free_text,
            line_ending,
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn free_text(&self) -> Option<&str> {
        self.free_text.as_deref()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

/// Разбивает текст на теговые строки.
///
/// Строка без тега продолжает предыдущее значение, "-}" закрывает его,
/// всё до первого тега отбрасывается.
fn tokenize(text: &str, line_ending: LineEnding) -> Vec<TagLine> {
    let mut lines: Vec<TagLine> = Vec::new();
    let mut current: Option<TagLine> = None;

    for raw_line in text.split('\n') {
        let line = raw_line.trim_end_matches('\r');

        if let Some((tag, value)) = split_tag_line(line) {
            // закрываем предыдущую строку
            if let Some(done) = current.take() {
                lines.push(done);
            }
            current = Some(TagLine {
                tag: tag.to_string(),
                value: value.to_string(),
            });
        } else if is_trailer_line(line) {
            if let Some(done) = current.take() {
                lines.push(done);
            }
        } else if let Some(cur) = current.as_mut() {
            cur.value.push_str(line_ending.as_str());
            cur.value.push_str(line);
        }
    }

    // не забываем последнюю строку
    if let Some(done) = current.take() {
        lines.push(done);
    }

    for line in &mut lines {
        line.value = line.value.trim().to_string();
    }

    lines
}

/// Делит документ на выписки: каждая начинается со строки `:20:`
pub fn split_statements(doc: &RawDocument) -> Vec<TagBody> {
    let mut bodies: Vec<TagBody> = Vec::new();
    let mut current: Option<Vec<TagLine>> = None;

    for line in tokenize(doc.text(), doc.line_ending()) {
        if line.tag == "20" {
            if let Some(done) = current.take() {
                bodies.push(TagBody::new(done, doc.line_ending()));
            }
            current = Some(Vec::new());
        }

        // строки заголовка до первого :20: (например ":940:") не нужны
        if let Some(cur) = current.as_mut() {
            cur.push(line);
        }
    }

    if let Some(done) = current.take() {
        bodies.push(TagBody::new(done, doc.line_ending()));
    }

    bodies
}

fn parse_balance(value: &str) -> Result<Balance, ParseError> {
    let value = value.trim();

    // минимум: 1 (C/D) + 6 (дата) + 3 (валюта) + 1 (хотя бы один символ суммы) = 11
    if value.len() < 11 || !value.is_ascii() {
        return Err(ParseError::BadInput(format!(
            "balance value too short: '{value}'"
        )));
    }

    let dc_mark = &value[0..1];
    let date = parse_mt940_yy_mm_dd(&value[1..7])?;
    let currency = parse_currency(&value[7..10]);
    let amount = parse_amount(&value[10..])?;

    let amount = match dc_mark {
        "C" => amount,
        "D" => -amount,
        other => {
            return Err(ParseError::InvalidDirection(format!(
                "unknown balance direction: {other}"
            )));
        }
    };

    Ok(Balance {
        amount,
        currency,
        date,
    })
}

/// Баланс из первого найденного тега; битый баланс не мешает разбору выписки
fn find_balance(body: &TagBody, tags: &[&str]) -> Option<Balance> {
    let (tag, value) = tags
        .iter()
        .find_map(|tag| body.get_line(tag).map(|value| (*tag, value)))?;

    match parse_balance(value) {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!(tag, error = %e, "skipping malformed balance");
            None
        }
    }
}

/// Базовый черновик транзакции из строки `:61:`, до правок диалекта.
///
/// Заполняет сумму со знаком, дату валютирования и (если есть MMDD) дату
/// проводки. Строка, в которой не найти даты и суммы, считается структурной
/// ошибкой.
pub fn base_transaction(lines: &TransactionLines) -> Result<Transaction, ParseError> {
    let caps = STATEMENT_LINE_RE.captures(lines.detail()).ok_or_else(|| {
        ParseError::Mt940Tag(format!("could not parse transaction line: {}", lines.detail()))
    })?;

    // группы 1, 5 и 6 обязательны, раз совпадение есть
    let group = |idx: usize| caps.get(idx).map(|m| m.as_str()).unwrap_or_default();

    let value_date = parse_mt940_yy_mm_dd(group(1))?;

    let book_date = match caps.get(2) {
        Some(mmdd) => {
            let date = derive_book_date(value_date, mmdd.as_str());
            if date.is_none() {
                debug!(entry_date = mmdd.as_str(), "ignoring invalid entry date");
            }
            date
        }
        None => None,
    };

    let amount = parse_amount(group(6))?;
    let amount = match group(5) {
        "D" | "RC" => -amount,
        _ => amount,
    };

    let mut transaction = Transaction::new();
    transaction
        .set_amount(amount)
        .set_value_date(Some(value_date))
        .set_book_date(book_date);

    Ok(transaction)
}

/// Ридер тегового формата, параметризованный диалектом
pub struct TagReader<'d, D: TagDialect + ?Sized> {
    dialect: &'d D,
}

impl<'d, D: TagDialect + ?Sized> TagReader<'d, D> {
    pub fn new(dialect: &'d D) -> Self {
        TagReader { dialect }
    }

    pub fn parse(&self, doc: &RawDocument) -> Result<Vec<Statement>, ParseError> {
        let bodies = split_statements(doc);
        debug!(dialect = self.dialect.name(), statements = bodies.len(), "split document");

        bodies.iter().map(|body| self.statement(body)).collect()
    }

    /// Собирает одну выписку из её тела
    pub fn statement(&self, body: &TagBody) -> Result<Statement, ParseError> {
        let account = Account::new(self.dialect.account_number(body));
        let number = self.dialect.statement_number(body);

        let opening_balance = find_balance(body, &["60F", "60M"]);
        let closing_balance = find_balance(body, &["62F", "62M"]);
        let currency = opening_balance
            .as_ref()
            .or(closing_balance.as_ref())
            .map(|balance| balance.currency.clone());

        let mut statement = Statement::new(account, number);
        statement
            .set_currency(currency)
            .set_opening_balance(opening_balance)
            .set_closing_balance(closing_balance);

        for lines in body.transactions() {
            let draft = base_transaction(&lines)?;
            statement.add_transaction(postprocess::apply(self.dialect, draft, &lines));
        }

        Ok(statement)
    }
}

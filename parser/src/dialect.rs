//! Банковские диалекты: общий контракт и закрытый набор известных диалектов.

pub mod ing;
pub mod rabobank;
pub mod rabobank_csv;

use crate::document::{LineEnding, RawDocument};
use crate::error::ParseError;
use crate::grammar::FieldClass;
use crate::model::{Statement, Transaction};
use crate::reader::{TagBody, TagReader, TransactionLines};
use crate::subfield::{SubfieldGrammar, non_empty};
use once_cell::sync::Lazy;

pub use ing::Ing;
pub use rabobank::Rabobank;
pub use rabobank_csv::{RabobankCsv, StatementCounter};

static USTD: Lazy<SubfieldGrammar> =
    Lazy::new(|| SubfieldGrammar::new("USTD", &[FieldClass::X, FieldClass::X2]));

static STRD: Lazy<SubfieldGrammar> =
    Lazy::new(|| SubfieldGrammar::new("STRD", &[FieldClass::X, FieldClass::X]));

/// Способ достать описание из свободного текста транзакции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStrategy {
    /// `/USTD/тип/описание/`: оба поля склеиваются, второе может содержать '/'
    Unstructured,
    /// `/STRD/тип/описание/`: берётся только описание
    Structured,
    /// весь текст как есть
    Verbatim,
}

impl DescriptionStrategy {
    pub fn apply(self, free_text: &str, line_ending: LineEnding) -> Option<String> {
        match self {
            DescriptionStrategy::Unstructured => {
                let mut fields = USTD.extract(free_text, line_ending).into_iter();
                let kind = fields.next().flatten()?;
                let text = fields.next().flatten()?;
                non_empty(Some(kind + &text))
            }
            DescriptionStrategy::Structured => {
                non_empty(STRD.extract(free_text, line_ending).into_iter().nth(1).flatten())
            }
            DescriptionStrategy::Verbatim => {
                non_empty(Some(free_text.to_string()))
            }
        }
    }
}

/// Контракт диалекта тегового (MT940) формата.
///
/// Ни один метод не возвращает ошибку: всё, что не удалось разобрать,
/// превращается в отсутствующее поле.
pub trait TagDialect {
    /// Имя для логов
    fn name(&self) -> &'static str;

    /// Быстрая проверка, относится ли документ к этому диалекту
    fn sniff(&self, text: &str) -> bool;

    /// Номер собственного счёта из тега :25:
    fn account_number(&self, body: &TagBody) -> Option<String>;

    /// Номер выписки
    fn statement_number(&self, body: &TagBody) -> Option<String>;

    fn contra_account_number(&self, _lines: &TransactionLines) -> Option<String> {
        None
    }

    fn contra_account_name(&self, _lines: &TransactionLines) -> Option<String> {
        None
    }

    /// Стратегии извлечения описания в порядке приоритета
    fn description_strategies(&self) -> &'static [DescriptionStrategy] {
        &[DescriptionStrategy::Verbatim]
    }

    /// Описание транзакции: первая сработавшая стратегия
    fn description(&self, free_text: Option<&str>, line_ending: LineEnding) -> Option<String> {
        let free_text = free_text?;

        self.description_strategies()
            .iter()
            .find_map(|strategy| strategy.apply(free_text, line_ending))
    }

    /// Диалектная правка черновика транзакции, собранного ридером
    fn correct_transaction(&self, _transaction: &mut Transaction, _lines: &TransactionLines) {}
}

/// Вид диалекта, удобный для конфигурации (CLI, настройки сессии)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    Ing,
    Rabobank,
    RabobankCsv,
}

impl DialectKind {
    /// Порядок по умолчанию
    pub const ALL: [DialectKind; 3] = [
        DialectKind::Ing,
        DialectKind::Rabobank,
        DialectKind::RabobankCsv,
    ];
}

/// Закрытый набор поддерживаемых диалектов
#[derive(Debug, Clone)]
pub enum Dialect {
    Ing(Ing),
    Rabobank(Rabobank),
    RabobankCsv(RabobankCsv),
}

impl Dialect {
    /// Создаёт диалект по виду; CSV-диалект получает счётчик выписок сессии
    pub fn from_kind(kind: DialectKind, counter: &StatementCounter) -> Self {
        match kind {
            DialectKind::Ing => Dialect::Ing(Ing),
            DialectKind::Rabobank => Dialect::Rabobank(Rabobank),
            DialectKind::RabobankCsv => Dialect::RabobankCsv(RabobankCsv::new(counter.clone())),
        }
    }

    pub fn kind(&self) -> DialectKind {
        match self {
            Dialect::Ing(_) => DialectKind::Ing,
            Dialect::Rabobank(_) => DialectKind::Rabobank,
            Dialect::RabobankCsv(_) => DialectKind::RabobankCsv,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Ing(d) => d.name(),
            Dialect::Rabobank(d) => d.name(),
            Dialect::RabobankCsv(_) => RabobankCsv::NAME,
        }
    }

    pub fn sniff(&self, text: &str) -> bool {
        match self {
            Dialect::Ing(d) => d.sniff(text),
            Dialect::Rabobank(d) => d.sniff(text),
            Dialect::RabobankCsv(d) => d.sniff(text),
        }
    }

    /// Разбирает документ этим диалектом без повторной проверки `sniff`
    pub fn parse(&self, doc: &RawDocument) -> Result<Vec<Statement>, ParseError> {
        match self {
            Dialect::Ing(d) => TagReader::new(d).parse(doc),
            Dialect::Rabobank(d) => TagReader::new(d).parse(doc),
            Dialect::RabobankCsv(d) => d.parse_all(doc.text()),
        }
    }
}

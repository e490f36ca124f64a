use crate::dialect::{DialectKind, StatementCounter};
use crate::dispatch::Dispatcher;
use crate::document::RawDocument;
use crate::error::ParseError;
use crate::model::Statement;
use tracing::info;

/// Сессия разбора: набор диалектов и собственный счётчик номеров выписок.
///
/// Номера CSV-выписок идут подряд через все документы одной сессии; новая
/// сессия начинает снова с 1.
///
/// ```
/// use statement_dialects::ParseSession;
///
/// let session = ParseSession::new();
/// let csv = "NL00RABO0123456789,EUR,20140102,C,100.00,,,20140102,ba,,x,,,,,,,,";
/// let statements = session.parse(csv).unwrap();
/// assert_eq!(statements[0].number.as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone)]
pub struct ParseSession {
    dispatcher: Dispatcher,
    counter: StatementCounter,
}

impl ParseSession {
    /// Все известные диалекты в порядке по умолчанию
    pub fn new() -> Self {
        Self::with_dialects(&DialectKind::ALL)
    }

    /// Только перечисленные диалекты, порядок задаёт приоритет
    pub fn with_dialects(kinds: &[DialectKind]) -> Self {
        let counter = StatementCounter::new();
        let dispatcher = Dispatcher::from_kinds(kinds, &counter);

        ParseSession {
            dispatcher,
            counter,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Номер, который получит следующая CSV-выписка
    pub fn next_statement_number(&self) -> u64 {
        self.counter.peek()
    }

    /// Разбирает документ; стиль перевода строк определяется по тексту
    pub fn parse(&self, text: &str) -> Result<Vec<Statement>, ParseError> {
        self.parse_document(&RawDocument::new(text))
    }

    pub fn parse_document(&self, doc: &RawDocument) -> Result<Vec<Statement>, ParseError> {
        let dialect = self
            .dispatcher
            .select(doc.text())
            .ok_or(ParseError::UnknownDialect)?;

        let statements = dialect.parse(doc)?;
        info!(
            dialect = dialect.name(),
            statements = statements.len(),
            "document parsed"
        );

        Ok(statements)
    }
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new()
    }
}

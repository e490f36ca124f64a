use crate::dialect::{Dialect, DialectKind, StatementCounter};
use tracing::debug;

/// Упорядоченный список диалектов: побеждает первый, чей `sniff` узнал документ
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    dialects: Vec<Dialect>,
}

impl Dispatcher {
    pub fn new(dialects: Vec<Dialect>) -> Self {
        Dispatcher { dialects }
    }

    /// Диалекты заданных видов в заданном порядке
    pub fn from_kinds(kinds: &[DialectKind], counter: &StatementCounter) -> Self {
        Dispatcher::new(
            kinds
                .iter()
                .map(|kind| Dialect::from_kind(*kind, counter))
                .collect(),
        )
    }

    /// Добавляет диалект в конец списка, с самым низким приоритетом
    pub fn push(&mut self, dialect: Dialect) -> &mut Self {
        self.dialects.push(dialect);
        self
    }

    pub fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    /// Первый диалект, узнавший документ; `None` если не узнал никто
    pub fn select(&self, text: &str) -> Option<&Dialect> {
        let selected = self.dialects.iter().find(|dialect| dialect.sniff(text));

        match selected {
            Some(dialect) => debug!(dialect = dialect.name(), "dialect selected"),
            None => debug!(candidates = self.dialects.len(), "no dialect recognized the document"),
        }

        selected
    }
}

use thiserror::Error;

/// Ошибки при разборе выписок
///
/// Отсутствие отдельного поля (контрагента, описания и т.п.) ошибкой не считается,
/// такие поля просто остаются `None`. Сюда попадают только структурные нарушения,
/// после которых документ дальше разбирать нельзя.
#[derive(Debug, Error)]
pub enum ParseError {
    // обёртки

    /// обёртка csv::Error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // логические ошибки

    /// ошибка при парсинге денежной суммы
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// ошибка при парсинге направления транзакции (дебет/кредит)
    #[error("invalid direction: {0}")]
    InvalidDirection(String),
    /// очень общая ошибка плохих входных данных
    #[error("bad input: {0}")]
    BadInput(String),
    /// ошибка парсинга тега mt940
    #[error("bad mt940 tag: {0}")]
    Mt940Tag(String),
    /// строка csv с неверным количеством колонок
    #[error("expected {expected} csv columns, found {found}: {line}")]
    ColumnCount {
        expected: usize,
        found: usize,
        line: String,
    },
    /// ни один из зарегистрированных диалектов не узнал документ
    #[error("no dialect recognized the document")]
    UnknownDialect,
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use statement_dialects::{Currency, DialectKind, ParseError, ParseSession, Statement};
use std::{fs, path::PathBuf};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("rabobank_csv")
        .join("example.csv")
}

fn read_fixture() -> String {
    let path = fixture_path();
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read Rabobank CSV fixture {path:?}: {e}"))
}

fn parse_with(session: &ParseSession) -> Vec<Statement> {
    session
        .parse(&read_fixture())
        .expect("failed to parse Rabobank CSV fixture")
}

#[test]
fn csv_fixture_is_dispatched_to_csv() {
    let session = ParseSession::new();
    let dialect = session.dispatcher().select(&read_fixture()).map(|d| d.kind());
    assert_eq!(dialect, Some(DialectKind::RabobankCsv));
}

#[test]
fn csv_fixture_one_statement_per_row() {
    let statements = parse_with(&ParseSession::new());
    assert_eq!(statements.len(), 2);

    let numbers: Vec<Option<&str>> = statements.iter().map(|s| s.number.as_deref()).collect();
    assert_eq!(numbers, vec![Some("1"), Some("2")]);

    let credit = &statements[0];
    assert_eq!(credit.account.number.as_deref(), Some("NL00RABO0123456789"));
    assert_eq!(credit.currency, Some(Currency::EUR));
    assert_eq!(credit.transactions.len(), 1);

    let tx = &credit.transactions[0];
    assert_eq!(tx.amount, Decimal::new(10000, 2));
    assert_eq!(tx.value_date, NaiveDate::from_ymd_opt(2014, 1, 2));
    assert_eq!(tx.book_date, NaiveDate::from_ymd_opt(2014, 1, 2));
    assert_eq!(tx.contra_account_number(), Some("NL12INGB0001234567"));
    assert_eq!(tx.contra_account_name(), Some("J. Jansen"));
    assert_eq!(tx.description.as_deref(), Some("Factuur 2013-42"));
}

#[test]
fn csv_fixture_debit_row() {
    let statements = parse_with(&ParseSession::new());
    let tx = &statements[1].transactions[0];

    assert_eq!(tx.amount, Decimal::new(-5000, 2));
    assert_eq!(tx.value_date, NaiveDate::from_ymd_opt(2014, 1, 3));
    assert_eq!(tx.book_date, NaiveDate::from_ymd_opt(2014, 1, 4));
    assert!(tx.contra_account.is_none(), "empty contra columns mean no contra account");
    assert_eq!(tx.description.as_deref(), Some("Betaalautomaat 12:00 pasnr. 001"));
}

#[test]
fn csv_numbering_continues_within_session_only() {
    let session = ParseSession::new();
    parse_with(&session);
    let again = parse_with(&session);

    let numbers: Vec<Option<&str>> = again.iter().map(|s| s.number.as_deref()).collect();
    assert_eq!(numbers, vec![Some("3"), Some("4")]);

    // новая сессия считает заново, остальные поля совпадают
    let fresh = parse_with(&ParseSession::new());
    assert_eq!(fresh[0].number.as_deref(), Some("1"));
    pretty_assertions::assert_eq!(fresh[0].transactions, again[0].transactions);
}

#[test]
fn csv_row_with_wrong_column_count_aborts_document() {
    let text = format!("{}a,b,c\r\n", read_fixture());
    let err = ParseSession::new().parse(&text).unwrap_err();

    assert!(matches!(err, ParseError::ColumnCount { expected: 19, found: 3, .. }));
}

#[test]
fn csv_row_with_empty_value_date_keeps_the_document() {
    let text = format!(
        "{}NL00RABO0123456789,EUR,,D,50.00,,,20140103,ba,,y,,,,,,,,\r\n",
        read_fixture()
    );

    let statements = ParseSession::new()
        .parse(&text)
        .expect("empty date column should not abort the document");

    assert_eq!(statements.len(), 3);
    let tx = &statements[2].transactions[0];
    assert_eq!(tx.value_date, None);
    assert_eq!(tx.book_date, NaiveDate::from_ymd_opt(2014, 1, 3));
    assert_eq!(tx.amount, Decimal::new(-5000, 2));
}

#[test]
fn failed_document_leaves_numbering_untouched() {
    let session = ParseSession::new();
    let broken = format!("{}a,b,c\r\n", read_fixture());
    assert!(session.parse(&broken).is_err());
    assert_eq!(session.next_statement_number(), 1);

    let statements = parse_with(&session);
    assert_eq!(statements[0].number.as_deref(), Some("1"));
}

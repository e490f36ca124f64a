use chrono::NaiveDate;
use rust_decimal::Decimal;
use statement_dialects::{Currency, DialectKind, ParseSession, Statement};
use std::{fs, path::PathBuf};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ing")
        .join("example.mt940")
}

fn parse_ing_fixture() -> Vec<Statement> {
    let path = fixture_path();
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read ING fixture {path:?}: {e}"));

    ParseSession::new()
        .parse(&text)
        .expect("failed to parse ING fixture")
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn ing_fixture_is_dispatched_to_ing() {
    let path = fixture_path();
    let text = fs::read_to_string(&path).expect("fixture should be readable");

    let session = ParseSession::new();
    let dialect = session.dispatcher().select(&text).map(|d| d.kind());
    assert_eq!(dialect, Some(DialectKind::Ing));
}

#[test]
fn ing_fixture_statement_header() {
    let statements = parse_ing_fixture();
    assert_eq!(statements.len(), 1, "fixture has one :20: block");

    let stmt = &statements[0];

    // :25:NL69INGB0123456789EUR, валютный суффикс отрезан
    assert_eq!(stmt.account.number.as_deref(), Some("NL69INGB0123456789"));
    // :28C:00000
    assert_eq!(stmt.number.as_deref(), Some("00000"));
    assert_eq!(stmt.currency, Some(Currency::EUR));

    let opening = stmt.opening_balance.as_ref().expect(":60F: should be parsed");
    assert_eq!(opening.amount, Decimal::new(66223, 2));
    assert_eq!(Some(opening.date), date(2014, 2, 19));

    let closing = stmt.closing_balance.as_ref().expect(":62F: should be parsed");
    assert_eq!(closing.amount, Decimal::new(67065, 2));
}

#[test]
fn ing_fixture_transactions() {
    let statements = parse_ing_fixture();
    let txs = &statements[0].transactions;

    // :86:/SUM/ после :64: к транзакциям не относится
    assert_eq!(txs.len(), 4);

    let amounts: Vec<Decimal> = txs.iter().map(|t| t.amount).collect();
    assert_eq!(
        amounts,
        vec![
            Decimal::new(156, 2),
            Decimal::new(-157, 2),
            Decimal::new(-157, 2),
            Decimal::new(1000, 2),
        ]
    );

    // CNTP, продолженный на следующей строке
    assert_eq!(txs[0].contra_account_number(), Some("NL32INGB0000012345"));
    assert_eq!(txs[0].contra_account_name(), Some("ING BANK NV INZAKE WEB"));
    assert_eq!(txs[0].description.as_deref(), Some("EV10001REP1000001T1000001"));

    assert!(txs[1].contra_account.is_none());
    assert_eq!(txs[1].description.as_deref(), Some("TOTAAL       1 VZ"));

    // ни USTD, ни STRD: текст как есть
    assert_eq!(
        txs[3].description.as_deref(),
        Some("Storting pasnr. 001 Geldautomaat Amsterdam")
    );
}

#[test]
fn ing_fixture_dates_are_corrected() {
    let statements = parse_ing_fixture();
    let txs = &statements[0].transactions;

    // с датой проводки в :61: ничего не меняется
    assert_eq!(txs[0].value_date, date(2014, 2, 20));
    assert_eq!(txs[0].book_date, date(2014, 2, 20));

    // без даты проводки: дата из :61: становится датой проводки,
    // дата валютирования берётся из "transactiedatum"
    assert_eq!(txs[2].book_date, date(2014, 2, 20));
    assert_eq!(txs[2].value_date, date(2014, 2, 18));
    assert_eq!(txs[2].contra_account_name(), Some("ING Bank N.V. inzake WeB"));
    assert_eq!(txs[2].description.as_deref(), Some("EV123REP123412T1234"));

    // без даты проводки и без пометки в тексте
    assert_eq!(txs[3].book_date, date(2014, 2, 20));
    assert_eq!(txs[3].value_date, None);
}

#[test]
fn ing_fixture_parses_the_same_with_lf_endings() {
    let text = fs::read_to_string(fixture_path())
        .expect("fixture should be readable")
        .replace("\r\n", "\n");

    let lf = ParseSession::new().parse(&text).expect("LF variant should parse");
    let crlf = parse_ing_fixture();

    pretty_assertions::assert_eq!(lf, crlf);
}

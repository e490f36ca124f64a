use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Валюта счёта или баланса
///
/// Важно:
/// Коды, которых нет среди вариантов, хранятся в [`Currency::Other`] как есть.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Currency {
    /// Евро
    EUR,
    /// Американский доллар
    USD,
    /// Британский фунт
    GBP,

    /// Неподдерживаемая валюта
    ///
    /// Содержится как строка
    Other(String),
}

/// Счёт: собственный счёт выписки или счёт контрагента
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Account {
    /// номер счёта (IBAN или национальный номер), уже нормализованный диалектом
    pub number: Option<String>,
    /// имя владельца, обычно известно только для контрагента
    pub name: Option<String>,
}

impl Account {
    pub fn new(number: Option<String>) -> Self {
        Account { number, name: None }
    }

    pub fn set_number(&mut self, number: Option<String>) -> &mut Self {
        self.number = number;
        self
    }

    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }
}

/// Баланс счёта на дату (открывающий или закрывающий)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// сумма со знаком: дебетовый баланс отрицательный
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDate,
}

/// Центральная/корневая структура библиотеки, содержащая одну банковскую выписку.
///
/// Создаётся ридером или CSV-диалектом и заполняется через цепочку мутаторов:
/// ```
/// use statement_dialects::{Account, Statement, Transaction};
/// use rust_decimal::Decimal;
///
/// let mut tx = Transaction::new();
/// tx.set_amount(Decimal::new(-5000, 2)).set_description(Some("coffee".into()));
///
/// let account = Account::new(Some("NL00BANK0123456789".into()));
/// let mut statement = Statement::new(account, Some("1".into()));
/// statement.add_transaction(tx);
/// assert_eq!(statement.transactions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// собственный счёт
    pub account: Account,
    /// номер выписки, если диалект умеет его получить
    pub number: Option<String>,
    /// валюта счёта
    pub currency: Option<Currency>,
    /// открывающий баланс
    pub opening_balance: Option<Balance>,
    /// закрывающий баланс
    pub closing_balance: Option<Balance>,
    /// транзакции в порядке следования в документе
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Go to [`Statement`]
    pub fn new(account: Account, number: Option<String>) -> Self {
        Statement {
            account,
            number,
            currency: None,
            opening_balance: None,
            closing_balance: None,
            transactions: Vec::new(),
        }
    }

    pub fn set_account(&mut self, account: Account) -> &mut Self {
        self.account = account;
        self
    }

    pub fn set_number(&mut self, number: Option<String>) -> &mut Self {
        self.number = number;
        self
    }

    pub fn set_currency(&mut self, currency: Option<Currency>) -> &mut Self {
        self.currency = currency;
        self
    }

    pub fn set_opening_balance(&mut self, balance: Option<Balance>) -> &mut Self {
        self.opening_balance = balance;
        self
    }

    pub fn set_closing_balance(&mut self, balance: Option<Balance>) -> &mut Self {
        self.closing_balance = balance;
        self
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> &mut Self {
        self.transactions.push(transaction);
        self
    }
}

/// Одна транзакция выписки.
///
/// Знак суммы кодирует направление: дебет отрицательный, кредит положительный.
/// Даты без времени и часового пояса.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// денежная сумма со знаком
    pub amount: Decimal,
    /// дата валютирования
    pub value_date: Option<NaiveDate>,
    /// дата проводки
    pub book_date: Option<NaiveDate>,
    /// счёт и имя контрагента
    pub contra_account: Option<Account>,
    /// текстовое описание
    pub description: Option<String>,
}

impl Transaction {
    /// Go to [`Transaction`]
    pub fn new() -> Self {
        Transaction::default()
    }

    pub fn set_amount(&mut self, amount: Decimal) -> &mut Self {
        self.amount = amount;
        self
    }

    pub fn set_value_date(&mut self, date: Option<NaiveDate>) -> &mut Self {
        self.value_date = date;
        self
    }

    pub fn set_book_date(&mut self, date: Option<NaiveDate>) -> &mut Self {
        self.book_date = date;
        self
    }

    pub fn set_contra_account(&mut self, account: Option<Account>) -> &mut Self {
        self.contra_account = account;
        self
    }

    pub fn set_description(&mut self, description: Option<String>) -> &mut Self {
        self.description = description;
        self
    }

    pub fn contra_account_number(&self) -> Option<&str> {
        self.contra_account.as_ref()?.number.as_deref()
    }

    pub fn contra_account_name(&self) -> Option<&str> {
        self.contra_account.as_ref()?.name.as_deref()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::EUR => write!(f, "EUR"),
            Currency::USD => write!(f, "USD"),
            Currency::GBP => write!(f, "GBP"),
            Currency::Other(code) => write!(f, "{code}"),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book_date_str = self
            .book_date
            .map(|d| d.to_string())
            .unwrap_or_default();

        let value_date_str = self
            .value_date
            .map(|d| d.to_string())
            .unwrap_or_default();

        write!(
            f,
            "{:<10} {:<10} {:>15} {} {} {}",
            book_date_str,
            value_date_str,
            self.amount,
            self.contra_account_number().unwrap_or(""),
            self.contra_account_name().unwrap_or(""),
            self.description.as_deref().unwrap_or(""),
        )
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "statement {} account {}",
            self.number.as_deref().unwrap_or("-"),
            self.account.number.as_deref().unwrap_or("-"),
        )?;

        if let Some(balance) = &self.opening_balance {
            writeln!(f, "  opening {} {} {}", balance.date, balance.amount, balance.currency)?;
        }

        for tx in &self.transactions {
            writeln!(f, "  {tx}")?;
        }

        if let Some(balance) = &self.closing_balance {
            writeln!(f, "  closing {} {} {}", balance.date, balance.amount, balance.currency)?;
        }

        Ok(())
    }
}

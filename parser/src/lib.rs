pub mod error;
pub mod model;
pub mod document;
pub mod grammar;
pub mod subfield;
pub mod reader;
pub mod postprocess;
pub mod dialect;
pub mod dispatch;
pub mod session;

mod utils;

pub use crate::model::{Account, Balance, Currency, Statement, Transaction};
pub use crate::document::{LineEnding, RawDocument};
pub use crate::dialect::{Dialect, DialectKind, StatementCounter, TagDialect};
pub use crate::dispatch::Dispatcher;
pub use crate::session::ParseSession;
pub use crate::error::ParseError;

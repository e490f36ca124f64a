//! Классы символов для подполей банковских строк.
//!
//! Подполя разделяются `/`, поэтому внутренние поля строятся только из класса
//! [`SWIFT_X`], в котором нет ни `/`, ни `'`. Класс [`SWIFT_X2`] допускает `/` и
//! используется только для поля, которое заведомо последнее в строке.

/// Символьный класс "x" из SWIFT без `'` и `/`
pub const SWIFT_X: &str = r"[0-9a-zA-Z\-?().,+{}:\s]";

/// [`SWIFT_X`] плюс `/`. Только для последнего подполя
pub const SWIFT_X2: &str = r"[0-9a-zA-Z\-?().,+{}:\s/]";

/// Класс, из которого состоит одно подполе
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    X,
    X2,
}

impl FieldClass {
    pub fn pattern(self) -> &'static str {
        match self {
            FieldClass::X => SWIFT_X,
            FieldClass::X2 => SWIFT_X2,
        }
    }
}

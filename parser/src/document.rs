/// Стиль перевода строк, объявленный для документа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Определяет стиль по тексту: хватает одного `\r\n`
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Исходный документ целиком, неизменяемый после создания
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    text: &'a str,
    line_ending: LineEnding,
}

impl<'a> RawDocument<'a> {
    pub fn new(text: &'a str) -> Self {
        RawDocument {
            text,
            line_ending: LineEnding::detect(text),
        }
    }

    /// Явно задаёт стиль перевода строк вместо автоопределения
    pub fn with_line_ending(text: &'a str, line_ending: LineEnding) -> Self {
        RawDocument { text, line_ending }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

pub mod question;

pub use question::{AnswerRecord, OptionRecord, QuestionKind, QuestionRecord};

//! 提示词构造
//!
//! 单题文本格式是与答题协作方之间的线上契约，必须逐字节
//! 稳定：`"<题号>. <类别> <题干>\n"`，其后每行一个选项
//! `"<位置标签><内容>\n"`，填空题末尾追加 `"填空数: <n>\n"`。

use crate::models::question::{QuestionKind, QuestionRecord};

/// 要求模型只输出 JSON 答案的固定指令后缀
pub const ANSWER_FORMAT_SUFFIX: &str = r#",请以这种格式只输出答案,只输出答案,填空题不同选项都以逗号隔开:[{"id": 1, "answer": ["B"]},{"id": 2, "answer": ["A", "C"]}]"#;

/// 单题的规范提示文本
pub fn simple_question(question: &QuestionRecord) -> String {
    let mut text = format!(
        "{}. {} {}\n",
        question.id,
        question.kind.label(),
        question.title
    );
    for option in &question.options {
        text.push_str(&option.pos);
        text.push_str(&option.content);
        text.push('\n');
    }
    if question.kind == QuestionKind::FillBlank {
        text.push_str(&format!("填空数: {}\n", question.blanks));
    }
    text
}

/// 全部题目拼成一次请求的完整提示词
///
/// 各题之间以空行分隔，整体末尾带固定指令后缀
pub fn build_prompt(questions: &[QuestionRecord]) -> String {
    let joined = questions
        .iter()
        .map(simple_question)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}{}", joined, ANSWER_FORMAT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::OptionRecord;

    fn question(id: u32, kind: QuestionKind, title: &str) -> QuestionRecord {
        QuestionRecord {
            id,
            kind,
            title: title.to_string(),
            score: String::new(),
            options: Vec::new(),
            blanks: 0,
            imgs: Vec::new(),
        }
    }

    #[test]
    fn formats_choice_question_exactly() {
        let mut q = question(5, QuestionKind::Single, "What is X?");
        q.options = vec![
            OptionRecord { pos: "A.".into(), content: "Foo".into() },
            OptionRecord { pos: "B.".into(), content: "Bar".into() },
        ];

        assert_eq!(simple_question(&q), "5. 单选 What is X?\nA.Foo\nB.Bar\n");
    }

    #[test]
    fn formats_fill_blank_with_trailing_count_line() {
        let mut q = question(2, QuestionKind::FillBlank, "水的化学式是__。");
        q.blanks = 1;

        assert_eq!(simple_question(&q), "2. 填空 水的化学式是__。\n填空数: 1\n");
    }

    #[test]
    fn unknown_kind_keeps_empty_label_slot() {
        let q = question(1, QuestionKind::Unknown, "未知类别");
        assert_eq!(simple_question(&q), "1.  未知类别\n");
    }

    #[test]
    fn joins_questions_with_blank_line_and_suffix() {
        let q1 = question(1, QuestionKind::Unknown, "甲");
        let q2 = question(2, QuestionKind::Unknown, "乙");

        let prompt = build_prompt(&[q1, q2]);
        assert!(prompt.starts_with("1.  甲\n\n\n2.  乙\n"));
        assert!(prompt.ends_with(ANSWER_FORMAT_SUFFIX));
    }
}

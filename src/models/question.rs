use serde::{Deserialize, Serialize};

/// 题目类别
///
/// 页面上的类别标签只有四种（单选/多选/判断/填空），遇到
/// 无法识别的标签时保留为 `Unknown`，记录照常产出，由注入
/// 阶段按活动页面的实际容器类别决定怎么处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 单选题
    Single,
    /// 多选题
    Multi,
    /// 判断题
    TrueFalse,
    /// 填空题
    FillBlank,
    /// 未识别的类别标签
    Unknown,
}

impl QuestionKind {
    /// 从页面类别标签解析
    pub fn from_label(label: &str) -> Self {
        match label {
            "单选" => QuestionKind::Single,
            "多选" => QuestionKind::Multi,
            "判断" => QuestionKind::TrueFalse,
            "填空" => QuestionKind::FillBlank,
            _ => QuestionKind::Unknown,
        }
    }

    /// 提示词中使用的类别标签
    ///
    /// `Unknown` 对应空串，与页面上读不到标签时的原始行为一致
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Single => "单选",
            QuestionKind::Multi => "多选",
            QuestionKind::TrueFalse => "判断",
            QuestionKind::FillBlank => "填空",
            QuestionKind::Unknown => "",
        }
    }

    /// 是否为带选项列表的题型
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionKind::Single | QuestionKind::Multi | QuestionKind::TrueFalse
        )
    }
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// 位置标签，如 "A."
    pub pos: String,
    /// 选项内容；判断题归一化为 "对" / "错" 两个固定值
    pub content: String,
}

/// 一道题目的规范化表示
///
/// 由抽取器从 HTML 快照一次性构建，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 页面上印出的题号；缺失或非数字时为 0，不保证连续有序
    pub id: u32,
    pub kind: QuestionKind,
    /// 题干文本
    pub title: String,
    /// 分值原文，如 "2分"
    pub score: String,
    /// 选项列表；填空题为空
    pub options: Vec<OptionRecord>,
    /// 填空数量；选择类题型为 0
    pub blanks: usize,
    /// 题干中的图片地址
    pub imgs: Vec<String>,
}

/// 大模型返回的单题答案
///
/// 选择类题型 `answer` 为不带句点的选项位置标签（如 "B"）；
/// 填空题为逐空的文本，顺序有意义。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: u32,
    pub answer: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_label_covers_all_categories() {
        assert_eq!(QuestionKind::from_label("单选"), QuestionKind::Single);
        assert_eq!(QuestionKind::from_label("多选"), QuestionKind::Multi);
        assert_eq!(QuestionKind::from_label("判断"), QuestionKind::TrueFalse);
        assert_eq!(QuestionKind::from_label("填空"), QuestionKind::FillBlank);
        assert_eq!(QuestionKind::from_label("简答"), QuestionKind::Unknown);
        assert_eq!(QuestionKind::from_label(""), QuestionKind::Unknown);
    }

    #[test]
    fn answer_record_deserializes_collaborator_shape() {
        let raw = r#"[{"id": 1, "answer": ["B"]}, {"id": 2, "answer": ["A", "C"]}]"#;
        let answers: Vec<AnswerRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].id, 1);
        assert_eq!(answers[1].answer, vec!["A", "C"]);
    }

    #[test]
    fn answer_record_rejects_missing_fields() {
        let raw = r#"[{"id": 1}]"#;
        assert!(serde_json::from_str::<Vec<AnswerRecord>>(raw).is_err());
    }
}

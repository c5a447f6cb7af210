//! 题目抽取器
//!
//! 纯函数：页面 HTML 快照 → 规范化的 `QuestionRecord` 序列。
//! 不做任何 I/O，不依赖活动文档；残缺的子节点一律降级为
//! 空串/零值，绝不向上抛错。

use scraper::{ElementRef, Html, Selector};

use crate::models::question::{OptionRecord, QuestionKind, QuestionRecord};

/// 从 HTML 中抽取全部题目
///
/// 容器匹配两种结构角色：选择题容器与填空题容器。返回顺序
/// 即文档顺序，这是全流程的规范题目顺序，不按题号重排。
pub fn parse_questions(html: &str) -> Vec<QuestionRecord> {
    let doc = Html::parse_document(html);

    let containers = selector(".m-choiceQuestion.u-questionItem, .m-FillBlank.u-questionItem");
    let position = selector(".position");
    let cate = selector(".qaCate");
    let cate_label = selector(".qaCate span");
    let rich_txt = selector(".j-richTxt");
    let rich_img = selector(".j-richTxt img");
    let choice_items = selector(".choices > li");
    let option_pos = selector(".optionPos");
    let option_cnt = selector(".optionCnt");
    let icon_correct = selector(".u-icon-correct");
    let icon_wrong = selector(".u-icon-wrong");
    let blank_inputs = selector("textarea.j-textarea.inputtxt");

    let mut questions = Vec::new();

    for node in doc.select(&containers) {
        let id = parse_ordinal(&first_text(&node, &position));

        let label = first_text(&node, &cate_label).trim().to_string();
        let kind = QuestionKind::from_label(&label);

        // 分值挤在类别标签后面的括号里，如 "单选(2分)"
        let score = first_text(&node, &cate)
            .replacen(label.as_str(), "", 1)
            .replace(['(', ')'], "")
            .trim()
            .to_string();

        let title = first_text(&node, &rich_txt).trim().to_string();

        let imgs: Vec<String> = node
            .select(&rich_img)
            .filter_map(|img| img.value().attr("src"))
            .map(str::to_string)
            .collect();

        let mut options = Vec::new();
        if kind.is_choice() {
            for item in node.select(&choice_items) {
                let pos = first_text(&item, &option_pos).trim().to_string();
                let mut content = first_text(&item, &option_cnt).trim().to_string();
                // 判断题的选项内容不在文本里，而是一个对/错图标节点
                if kind == QuestionKind::TrueFalse {
                    if item.select(&icon_correct).next().is_some() {
                        content = "对".to_string();
                    } else if item.select(&icon_wrong).next().is_some() {
                        content = "错".to_string();
                    }
                }
                options.push(OptionRecord { pos, content });
            }
        }

        let blanks = if kind == QuestionKind::FillBlank {
            node.select(&blank_inputs).count()
        } else {
            0
        };

        questions.push(QuestionRecord {
            id,
            kind,
            title,
            score,
            options,
            blanks,
            imgs,
        });
    }

    questions
}

/// 题号解析，等价于 parseInt：取前导数字，失败回退 0
fn parse_ordinal(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn first_text(node: &ElementRef, sel: &Selector) -> String {
    node.select(sel)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default()
}

fn selector(src: &'static str) -> Selector {
    Selector::parse(src).expect("selector literal")
}

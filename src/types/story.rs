/// 三阶段流水线最终输出中每条故事记录应包含的字段
///
/// 字段只作为提示词文本嵌入到整理阶段，模型输出不会按此结构解析或校验。
pub struct StoryRecord;

impl StoryRecord {
    pub const FIELDS: [&'static str; 8] = [
        "Title",
        "Author",
        "Genre",
        "Publication Year",
        "Summary",
        "Similarity Score",
        "Storytelling framework",
        "Key takeaway",
    ];

    /// 以Markdown列表形式描述一条记录的字段
    pub fn outline() -> String {
        Self::FIELDS
            .iter()
            .map(|field| format!("- {}:", field))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

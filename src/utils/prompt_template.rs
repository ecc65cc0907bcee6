//! 提示词模板 - 带命名占位符的不可变模板

use crate::error::StoryError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// 提示词模板
///
/// 模板使用`{name}`作为占位符，`{{`和`}}`表示字面量花括号。占位符集合在构造时
/// 解析并与声明的集合比对，渲染阶段只做拼接，填入的值原样保留、不再二次解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    slots: Vec<String>,
}

impl PromptTemplate {
    /// 解析模板并校验其占位符恰好等于`slots`
    pub fn new(template: &str, slots: &[&str]) -> Result<Self, StoryError> {
        let segments = Self::parse(template)?;

        let mut found: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Slot(name) = segment
                && !found.contains(name)
            {
                found.push(name.clone());
            }
        }

        for declared in slots {
            if !found.iter().any(|name| name == declared) {
                return Err(StoryError::InvalidTemplate(format!(
                    "declared slot `{}` does not appear in the template",
                    declared
                )));
            }
        }
        if let Some(undeclared) = found.iter().find(|name| !slots.contains(&name.as_str())) {
            return Err(StoryError::InvalidTemplate(format!(
                "slot `{}` is used but not declared",
                undeclared
            )));
        }

        Ok(Self {
            segments,
            slots: found,
        })
    }

    /// 占位符名称，按首次出现顺序
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// 以`(slot, value)`对渲染模板，每个占位符都必须提供值
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, StoryError> {
        if let Some((unknown, _)) = values
            .iter()
            .find(|(name, _)| !self.slots.iter().any(|slot| slot == name))
        {
            return Err(StoryError::UnknownSlot(unknown.to_string()));
        }

        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Slot(name) => {
                    let value = values
                        .iter()
                        .find(|(slot, _)| slot == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| StoryError::MissingSlot(name.clone()))?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }

    /// 只有一个占位符的模板的便捷渲染
    pub fn render_single(&self, value: &str) -> Result<String, StoryError> {
        match self.slots.as_slice() {
            [slot] => self.render(&[(slot.as_str(), value)]),
            _ => Err(StoryError::InvalidTemplate(format!(
                "expected exactly one slot, found {}",
                self.slots.len()
            ))),
        }
    }

    fn parse(template: &str) -> Result<Vec<Segment>, StoryError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => name.push(ch),
                            Some(ch) => {
                                return Err(StoryError::InvalidTemplate(format!(
                                    "unexpected character `{}` in slot name",
                                    ch
                                )));
                            }
                            None => {
                                return Err(StoryError::InvalidTemplate(
                                    "unclosed `{`".to_string(),
                                ));
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(StoryError::InvalidTemplate("empty slot name".to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(name));
                }
                '}' => {
                    return Err(StoryError::InvalidTemplate(
                        "unmatched `}`; use `}}` for a literal brace".to_string(),
                    ));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }
}

//! Minimal Mustache-style templates
//!
//! Only what the artifact templates need:
//! - `{{name}}` substitutes a text or flag value
//! - `{{#name}}...{{/name}}` repeats over a list, or renders once for a true
//!   flag / non-empty text
//! - `{{^name}}...{{/name}}` renders for an empty list, false flag or empty text
//!
//! A section tag alone on its line takes the whole line with it, so loops can
//! be written one tag per line without leaving blank lines behind. No escaping
//! is applied; the output is source code, not HTML.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TemplateError;

/// Value bound to a template variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(bool),
    List(Vec<Scope>),
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Text(n.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<Vec<Scope>> for Value {
    fn from(items: Vec<Scope>) -> Self {
        Value::List(items)
    }
}

/// Variables visible at one nesting level. Ordered so rendering never depends
/// on hash order.
pub type Scope = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Var(String),
    Section {
        name: String,
        inverted: bool,
        body: Vec<Node>,
    },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([#^/]?)\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap()
    })
}

impl Template {
    /// Parse template source
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        // Enclosing sections: (name, inverted, nodes collected before the section opened)
        let mut open: Vec<(String, bool, Vec<Node>)> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut cursor = 0;

        for caps in tag_pattern().captures_iter(source) {
            let Some(tag) = caps.get(0) else { continue };
            let sigil = &caps[1];
            let name = caps[2].to_string();

            let (mut text_end, mut next) = (tag.start(), tag.end());
            if !sigil.is_empty() {
                if let Some((line_start, after_line)) = standalone(source, cursor, tag.start(), tag.end()) {
                    text_end = line_start;
                    next = after_line;
                }
            }

            push_text(&mut current, &source[cursor..text_end]);
            cursor = next;

            match sigil {
                "#" | "^" => {
                    open.push((name, sigil == "^", std::mem::take(&mut current)));
                }
                "/" => {
                    let (open_name, inverted, parent) = open
                        .pop()
                        .ok_or_else(|| TemplateError::UnexpectedClose { name: name.clone() })?;
                    if open_name != name {
                        return Err(TemplateError::MismatchedClose {
                            expected: open_name,
                            found: name,
                        });
                    }
                    let body = std::mem::replace(&mut current, parent);
                    current.push(Node::Section { name, inverted, body });
                }
                _ => current.push(Node::Var(name)),
            }
        }

        if let Some((name, _, _)) = open.pop() {
            return Err(TemplateError::UnclosedSection { name });
        }

        push_text(&mut current, &source[cursor..]);
        Ok(Self { nodes: current })
    }

    /// Render against a root scope
    pub fn render(&self, root: &Scope) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut stack = vec![root];
        render_nodes(&self.nodes, &mut stack, &mut out)?;
        Ok(out)
    }
}

/// If the tag spanning `start..end` is alone on its line, return the byte
/// range of that whole line including its newline.
fn standalone(source: &str, cursor: usize, start: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if line_start < cursor {
        return None;
    }
    if !source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let rest = &source[end..];
    let (tail, after_line) = match rest.find('\n') {
        Some(i) => (&rest[..i], end + i + 1),
        None => (rest, source.len()),
    };
    if !tail.chars().all(|c| c == ' ' || c == '\t' || c == '\r') {
        return None;
    }

    Some((line_start, after_line))
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn lookup<'s>(stack: &[&'s Scope], name: &str) -> Result<&'s Value, TemplateError> {
    stack
        .iter()
        .rev()
        .copied()
        .find_map(|scope| scope.get(name))
        .ok_or_else(|| TemplateError::UnknownVariable { name: name.to_string() })
}

fn render_nodes<'s>(nodes: &[Node], stack: &mut Vec<&'s Scope>, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => match lookup(stack, name)? {
                Value::Text(text) => out.push_str(text),
                Value::Flag(flag) => out.push_str(if *flag { "true" } else { "false" }),
                Value::List(_) => return Err(TemplateError::NotAScalar { name: name.clone() }),
            },
            Node::Section { name, inverted, body } => match lookup(stack, name)? {
                Value::List(items) if !inverted => {
                    for item in items {
                        stack.push(item);
                        let rendered = render_nodes(body, stack, out);
                        stack.pop();
                        rendered?;
                    }
                }
                Value::List(items) => {
                    if items.is_empty() {
                        render_nodes(body, stack, out)?;
                    }
                }
                Value::Flag(flag) => {
                    if *flag != *inverted {
                        render_nodes(body, stack, out)?;
                    }
                }
                Value::Text(text) => {
                    if text.is_empty() == *inverted {
                        render_nodes(body, stack, out)?;
                    }
                }
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, last: bool) -> Scope {
        let mut scope = Scope::new();
        scope.insert("name".to_string(), name.into());
        scope.insert("last".to_string(), last.into());
        scope
    }

    fn root() -> Scope {
        let mut scope = Scope::new();
        scope.insert("title".to_string(), "Record".into());
        scope.insert(
            "columns".to_string(),
            vec![item("name", false), item("age", true)].into(),
        );
        scope
    }

    fn render(source: &str) -> String {
        Template::parse(source).unwrap().render(&root()).unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render("no tags here\n"), "no tags here\n");
    }

    #[test]
    fn test_variable() {
        assert_eq!(render("class {{title}} {}"), "class Record {}");
        assert_eq!(render("{{ title }}"), "Record");
    }

    #[test]
    fn test_inline_loop_with_separator() {
        assert_eq!(
            render("({{#columns}}{{name}}{{^last}}, {{/last}}{{/columns}})"),
            "(name, age)"
        );
    }

    #[test]
    fn test_outer_scope_visible_in_loop() {
        assert_eq!(render("{{#columns}}{{title}}.{{name}};{{/columns}}"), "Record.name;Record.age;");
    }

    #[test]
    fn test_standalone_tags_drop_their_lines() {
        let source = "start\n{{#columns}}\n    field {{name}}\n{{/columns}}\nend\n";
        assert_eq!(render(source), "start\n    field name\n    field age\nend\n");
    }

    #[test]
    fn test_indented_standalone_tag() {
        let source = "{\n    {{#columns}}\n    {{name}}\n    {{/columns}}\n}";
        assert_eq!(render(source), "{\n    name\n    age\n}");
    }

    #[test]
    fn test_braces_next_to_tags() {
        assert_eq!(
            render("\"{{title}} {{{#columns}}{{name}}='${{name}}'{{^last}}, {{/last}}{{/columns}}}\""),
            "\"Record {name='$name', age='$age'}\""
        );
    }

    #[test]
    fn test_text_and_flag_sections() {
        assert_eq!(render("{{#title}}has title{{/title}}"), "has title");
        assert_eq!(render("{{^title}}no title{{/title}}"), "");

        let mut scope = Scope::new();
        scope.insert("package".to_string(), "".into());
        let template = Template::parse("{{#package}}package {{package}}\n{{/package}}x").unwrap();
        assert_eq!(template.render(&scope).unwrap(), "x");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Template::parse("{{#columns}}"),
            Err(TemplateError::UnclosedSection { name: "columns".to_string() })
        );
        assert_eq!(
            Template::parse("{{/columns}}"),
            Err(TemplateError::UnexpectedClose { name: "columns".to_string() })
        );
        assert_eq!(
            Template::parse("{{#a}}{{/b}}"),
            Err(TemplateError::MismatchedClose { expected: "a".to_string(), found: "b".to_string() })
        );
    }

    #[test]
    fn test_render_errors() {
        let template = Template::parse("{{missing}}").unwrap();
        assert_eq!(
            template.render(&root()),
            Err(TemplateError::UnknownVariable { name: "missing".to_string() })
        );

        let template = Template::parse("{{columns}}").unwrap();
        assert_eq!(
            template.render(&root()),
            Err(TemplateError::NotAScalar { name: "columns".to_string() })
        );
    }
}

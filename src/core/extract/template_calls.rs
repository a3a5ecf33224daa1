//! Message discovery over template trees.
//!
//! The walk only needs a handful of capabilities from a node, captured by
//! [`TemplateNode`], so it works for any template syntax that can expose them.

pub enum TemplateArg<'a> {
    Str(&'a str),
    Other,
}

pub trait TemplateNode: Sized {
    /// Nested bodies in document order (e.g. a block's program and inverse).
    fn blocks(&self) -> Vec<&[Self]>;
    fn comment(&self) -> Option<&str>;
    fn is_call(&self) -> bool;
    fn callee_name(&self) -> Option<&str>;
    fn arguments(&self) -> Vec<TemplateArg<'_>>;
    fn line(&self) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMessage {
    pub msgid: String,
    pub comments: Vec<String>,
    pub line: Option<usize>,
}

/// A translation call whose first argument is not a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicTemplateCall {
    pub line: Option<usize>,
}

#[derive(Debug, Default)]
pub struct TemplateCalls {
    pub messages: Vec<TemplateMessage>,
    pub dynamic_calls: Vec<DynamicTemplateCall>,
}

/// Collect every `<helper> "msgid"` call in document order.
///
/// Comments seen since the previous message become its extracted comments,
/// except comments whose body starts on a new line.
pub fn collect_template_calls<N: TemplateNode>(nodes: &[N], helper: &str) -> TemplateCalls {
    let mut calls = TemplateCalls::default();
    let mut pending = Vec::new();
    walk(nodes, helper, &mut pending, &mut calls);
    calls
}

fn walk<N: TemplateNode>(
    nodes: &[N],
    helper: &str,
    pending: &mut Vec<String>,
    calls: &mut TemplateCalls,
) {
    for node in nodes {
        if let Some(text) = node.comment()
            && !text.starts_with('\n')
        {
            pending.push(text.trim().to_string());
        }

        if node.is_call() && node.callee_name() == Some(helper) {
            match node.arguments().first() {
                Some(TemplateArg::Str(msgid)) => {
                    calls.messages.push(TemplateMessage {
                        msgid: msgid.to_string(),
                        comments: std::mem::take(pending),
                        line: node.line(),
                    });
                }
                _ => calls
                    .dynamic_calls
                    .push(DynamicTemplateCall { line: node.line() }),
            }
        }

        for block in node.blocks() {
            walk(block, helper, pending, calls);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::parsers::handlebars::parse_template;

    fn messages(source: &str) -> Vec<(String, Vec<String>)> {
        let nodes = parse_template(source).unwrap();
        collect_template_calls(&nodes, "i18n")
            .messages
            .into_iter()
            .map(|m| (m.msgid, m.comments))
            .collect()
    }

    #[test]
    fn test_messages_in_document_order() {
        let source = r#"
<title>{{i18n "Canvas"}}</title>
{{#if loggedIn}}
  {{i18n "Log out"}}
{{else}}
  {{#each providers}}{{i18n "Log in with provider"}}{{/each}}
{{/if}}
{{i18n "Footer"}}
"#;
        let ids: Vec<_> = messages(source).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Canvas", "Log out", "Log in with provider", "Footer"]);
    }

    #[test]
    fn test_comments_attach_to_next_message_only() {
        let source = "{{! Page heading }}{{i18n \"Rules\"}}{{i18n \"Chat\"}}";
        assert_eq!(
            messages(source),
            vec![
                ("Rules".to_string(), vec!["Page heading".to_string()]),
                ("Chat".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_comments_carry_into_blocks() {
        let source = "{{!-- Sidebar title --}}\n{{#if a}}{{i18n \"Info\"}}{{/if}}";
        assert_eq!(
            messages(source),
            vec![("Info".to_string(), vec!["Sidebar title".to_string()])]
        );
    }

    #[test]
    fn test_newline_leading_comments_are_ignored() {
        let source = "{{!--\n  Layout notes\n--}}{{i18n \"Settings\"}}";
        assert_eq!(messages(source), vec![("Settings".to_string(), vec![])]);
    }

    #[test]
    fn test_other_helpers_and_dynamic_calls() {
        let nodes = parse_template("{{t \"x\"}}{{i18n key}}{{i18n}}{{i18n \"ok\"}}").unwrap();
        let calls = collect_template_calls(&nodes, "i18n");
        assert_eq!(calls.messages.len(), 1);
        assert_eq!(calls.messages[0].msgid, "ok");
        assert_eq!(calls.dynamic_calls.len(), 2);
    }
}

//! Translation call discovery in parsed scripts.

use swc_ecma_ast::{CallExpr, Callee, Expr, Lit};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{parsers::js::ParsedScript, splice::CallSite};

/// A translation call whose first argument is not a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicCall {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptCalls {
    /// Literal calls, sorted by start offset.
    pub sites: Vec<CallSite>,
    pub dynamic_calls: Vec<DynamicCall>,
}

/// Find every `<function_name>('literal')` call in a parsed script.
pub fn collect_call_sites(script: &ParsedScript, source: &str, function_name: &str) -> ScriptCalls {
    let mut collector = CallSiteCollector {
        script,
        source,
        function_name,
        calls: ScriptCalls::default(),
    };
    script.program.visit_with(&mut collector);

    let mut calls = collector.calls;
    calls.sites.sort_by_key(|site| site.range.start);
    calls
}

struct CallSiteCollector<'a> {
    script: &'a ParsedScript,
    source: &'a str,
    function_name: &'a str,
    calls: ScriptCalls,
}

impl CallSiteCollector<'_> {
    fn is_translation_call(&self, node: &CallExpr) -> bool {
        matches!(
            &node.callee,
            Callee::Expr(expr)
                if matches!(&**expr, Expr::Ident(ident) if ident.sym.as_str() == self.function_name)
        )
    }

    fn literal_site(&self, node: &CallExpr) -> Option<CallSite> {
        let arg = node.args.first().filter(|arg| arg.spread.is_none())?;
        let Expr::Lit(Lit::Str(literal)) = &*arg.expr else {
            return None;
        };
        let argument_range = self.script.byte_range(literal.span);
        let quote = self.source.get(argument_range.start..)?.chars().next()?;
        if quote != '\'' && quote != '"' {
            return None;
        }
        Some(CallSite::new(
            self.script.byte_range(node.span),
            argument_range,
            quote,
        ))
    }
}

impl Visit for CallSiteCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.is_translation_call(node) {
            if let Some(site) = self.literal_site(node) {
                // Nested calls inside a replaced call would overlap it.
                self.calls.sites.push(site);
                return;
            }
            let (line, col) = self.script.line_col(node.span.lo);
            self.calls.dynamic_calls.push(DynamicCall { line, col });
        }
        node.visit_children_with(self);
    }
}

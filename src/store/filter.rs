//! CEL filter expressions over memos
//!
//! Expressions see the variables `content`, `tags`, `creator_id` and
//! `visibility`, e.g. `content.contains("milk")` or
//! `tags.exists(t, t == "work")`.

use super::StoreError;
use crate::memo::Memo;
use cel_interpreter::{Context, Program, Value as CelValue};

/// A conjunction of compiled filter expressions
pub struct MemoFilter {
    programs: Vec<(String, Program)>,
}

impl MemoFilter {
    /// Compile every expression, failing on the first that does not parse
    pub fn compile(expressions: &[String]) -> Result<Self, StoreError> {
        let programs = expressions
            .iter()
            .map(|expression| {
                Program::compile(expression)
                    .map(|program| (expression.clone(), program))
                    .map_err(|e| StoreError::InvalidFilter {
                        expression: expression.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { programs })
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// True when every expression evaluates to `true` for `memo`
    pub fn matches(&self, memo: &Memo) -> Result<bool, StoreError> {
        if self.programs.is_empty() {
            return Ok(true);
        }

        let mut context = Context::default();
        let variables = [
            context.add_variable("content", memo.content.clone()),
            context.add_variable("tags", memo.tags().to_vec()),
            context.add_variable("creator_id", i64::from(memo.creator_id)),
            context.add_variable("visibility", memo.visibility.as_str().to_string()),
        ];
        for added in variables {
            added.map_err(|e| StoreError::InvalidFilter {
                expression: String::new(),
                message: e.to_string(),
            })?;
        }

        for (expression, program) in &self.programs {
            let value = program
                .execute(&context)
                .map_err(|e| StoreError::InvalidFilter {
                    expression: expression.clone(),
                    message: e.to_string(),
                })?;
            match value {
                CelValue::Bool(true) => {}
                CelValue::Bool(false) => return Ok(false),
                other => {
                    return Err(StoreError::InvalidFilter {
                        expression: expression.clone(),
                        message: format!("expected a boolean result, got {:?}", other),
                    })
                }
            }
        }
        Ok(true)
    }
}

/// Quote `s` as a double-quoted CEL string literal
pub fn cel_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

use std::io::Read;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::Finding;
use crate::logs::InputSource;

/// One finding object or a JSON array of findings.
#[derive(Debug, Clone, PartialEq)]
pub enum FindingsDoc {
    One(Finding),
    Many(Vec<Finding>),
}

impl FindingsDoc {
    pub fn len(&self) -> usize {
        match self {
            FindingsDoc::One(_) => 1,
            FindingsDoc::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn read(source: &InputSource) -> Result<FindingsDoc> {
    let s = match source {
        InputSource::Stdin => {
            let mut s = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut s)
                .context("failed to read findings from stdin")?;
            s
        }
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read findings file: {}", path.display()))?,
    };
    parse(&s)
}

pub fn parse(s: &str) -> Result<FindingsDoc> {
    let value: Value = serde_json::from_str(s).context("failed to parse findings (JSON)")?;
    match value {
        Value::Object(_) => {
            let finding = serde_json::from_value(value).context("malformed finding")?;
            Ok(FindingsDoc::One(finding))
        }
        Value::Array(items) => {
            let findings = items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    serde_json::from_value::<Finding>(item)
                        .with_context(|| format!("malformed finding at index {idx}"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FindingsDoc::Many(findings))
        }
        other => bail!(
            "expected a finding object or an array of findings, got {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_object() {
        let doc = parse(r#"{"title":"Bug","cvss":{"score":9.5}}"#).expect("parse");
        let FindingsDoc::One(f) = doc else {
            panic!("expected a single finding");
        };
        assert_eq!(f.title, "Bug");
    }

    #[test]
    fn parses_array() {
        let doc = parse(r#"[{"title":"a"},{"title":"b"},{}]"#).expect("parse");
        assert_eq!(doc.len(), 3);
        assert!(matches!(doc, FindingsDoc::Many(_)));
    }

    #[test]
    fn rejects_scalars() {
        let err = parse("42").expect_err("scalar must fail");
        assert!(err.to_string().contains("a number"), "err={err}");
    }

    #[test]
    fn reports_index_of_malformed_item() {
        let err = parse(r#"[{"title":"ok"},{"title":7}]"#).expect_err("bad item");
        assert!(err.to_string().contains("index 1"), "err={err}");
    }
}

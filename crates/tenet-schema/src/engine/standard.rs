//! Default validation engine.
//!
//! Compiles a descriptor into a tree of rules once; validation walks the
//! tree and stops at the first failure. Error messages quote the dotted
//! path of the failing field, e.g. `"params.id" is required`.

use super::{CompiledSchema, ValidateOptions, ValidationEngine};
use crate::catalog::SchemaResolver;
use crate::descriptor::{PrimitiveKind, SchemaDescriptor, SchemaKind};
use crate::error::{SchemaError, SchemaResult, ValidationError};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// The built-in [`ValidationEngine`].
///
/// - strings are never coerced; the empty string is rejected unless allowed
/// - numeric and boolean strings are coerced when `convert` is on
/// - absent optional fields receive their default
/// - objects declared without fields accept any keys
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEngine;

impl ValidationEngine for StandardEngine {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn compile(
        &self,
        schema: &SchemaDescriptor,
        resolver: &dyn SchemaResolver,
    ) -> SchemaResult<Arc<dyn CompiledSchema>> {
        let mut compiler = Compiler {
            resolver,
            visiting: Vec::new(),
        };
        let root = compiler.node(schema, "")?;
        Ok(Arc::new(RuleTree { root }))
    }
}

#[derive(Debug)]
struct RuleTree {
    root: Node,
}

impl CompiledSchema for RuleTree {
    fn validate(&self, value: &Value, options: &ValidateOptions) -> Result<Value, ValidationError> {
        let input = if value.is_null() { None } else { Some(value) };
        Ok(self.root.check(input, "", options)?.unwrap_or(Value::Null))
    }
}

#[derive(Debug)]
struct Node {
    rule: Rule,
    required: bool,
    default: Option<Value>,
    valid: Vec<Value>,
}

#[derive(Debug)]
enum Rule {
    Any,
    String(StringRule),
    Number(NumberRule),
    Boolean,
    File,
    Object(IndexMap<String, Node>),
    Array(Box<Node>),
}

#[derive(Debug)]
struct StringRule {
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<Regex>,
    allow_empty: bool,
}

#[derive(Debug)]
struct NumberRule {
    integer: bool,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

struct Compiler<'r> {
    resolver: &'r dyn SchemaResolver,
    visiting: Vec<String>,
}

impl Compiler<'_> {
    fn node(&mut self, schema: &SchemaDescriptor, path: &str) -> SchemaResult<Node> {
        let entered = match &schema.id {
            Some(id) if schema.is_definition() => {
                if self.visiting.contains(id) {
                    return Err(SchemaError::CircularReference { id: id.clone() });
                }
                self.visiting.push(id.clone());
                true
            }
            _ => false,
        };

        let rule = self.rule(schema, path);

        if entered {
            self.visiting.pop();
        }

        // at a reference site, presence and default come from the site
        Ok(Node {
            rule: rule?,
            required: schema.required,
            default: schema.default.clone(),
            valid: schema.constraints.valid.clone(),
        })
    }

    fn rule(&mut self, schema: &SchemaDescriptor, path: &str) -> SchemaResult<Rule> {
        let rule = match &schema.kind {
            SchemaKind::Primitive(kind) => primitive_rule(*kind, schema, path)?,
            SchemaKind::Object(fields) => {
                let mut compiled = IndexMap::with_capacity(fields.len());
                for (name, field) in fields {
                    compiled.insert(name.clone(), self.node(field, &child_path(path, name))?);
                }
                Rule::Object(compiled)
            }
            SchemaKind::Array(Some(items)) => {
                Rule::Array(Box::new(self.node(items, &format!("{path}[]"))?))
            }
            SchemaKind::Array(None) => {
                return Err(SchemaError::MalformedArray {
                    path: label(path).to_string(),
                })
            }
            SchemaKind::Reference(id) => self.reference(id, path)?.rule,
        };
        Ok(rule)
    }

    fn reference(&mut self, id: &str, path: &str) -> SchemaResult<Node> {
        if self.visiting.iter().any(|visiting| visiting == id) {
            return Err(SchemaError::CircularReference { id: id.to_string() });
        }

        let target = self
            .resolver
            .resolve(id)
            .ok_or_else(|| SchemaError::UnresolvedReference { id: id.to_string() })?;

        self.node(target, path)
    }
}

fn primitive_rule(kind: PrimitiveKind, schema: &SchemaDescriptor, path: &str) -> SchemaResult<Rule> {
    let constraints = &schema.constraints;
    let rule = match kind {
        PrimitiveKind::String => {
            let pattern = constraints
                .pattern
                .as_deref()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                        path: label(path).to_string(),
                        pattern: pattern.to_string(),
                        source,
                    })
                })
                .transpose()?;
            Rule::String(StringRule {
                min_length: constraints.min_length,
                max_length: constraints.max_length,
                pattern,
                allow_empty: constraints.allow_empty,
            })
        }
        PrimitiveKind::Number | PrimitiveKind::Integer => Rule::Number(NumberRule {
            integer: kind == PrimitiveKind::Integer,
            minimum: constraints.minimum,
            maximum: constraints.maximum,
        }),
        PrimitiveKind::Boolean => Rule::Boolean,
        PrimitiveKind::File => Rule::File,
        PrimitiveKind::Any => Rule::Any,
    };
    Ok(rule)
}

impl Node {
    fn check(
        &self,
        value: Option<&Value>,
        path: &str,
        options: &ValidateOptions,
    ) -> Result<Option<Value>, ValidationError> {
        let Some(value) = value else {
            if self.required {
                return Err(fail(path, "is required"));
            }
            return Ok(self.default.clone());
        };

        let checked = self.rule.check(value, path, options)?;

        if !self.valid.is_empty() && !self.valid.contains(&checked) {
            let allowed: Vec<String> = self.valid.iter().map(render).collect();
            return Err(fail(
                path,
                &format!("must be one of [{}]", allowed.join(", ")),
            ));
        }

        Ok(Some(checked))
    }
}

impl Rule {
    fn check(
        &self,
        value: &Value,
        path: &str,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        match self {
            Self::Any => Ok(value.clone()),
            Self::String(rule) => rule.check(value, path),
            Self::Number(rule) => rule.check(value, path, options),
            Self::Boolean => check_boolean(value, path, options),
            Self::File => match value {
                Value::Object(_) => Ok(value.clone()),
                _ => Err(fail(path, "must be of type object")),
            },
            Self::Object(fields) => check_object(fields, value, path, options),
            Self::Array(items) => {
                let Value::Array(values) = value else {
                    return Err(fail(path, "must be an array"));
                };
                values
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        items
                            .check(Some(item), &format!("{path}[{index}]"), options)
                            .map(|checked| checked.unwrap_or(Value::Null))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

impl StringRule {
    fn check(&self, value: &Value, path: &str) -> Result<Value, ValidationError> {
        let Value::String(text) = value else {
            return Err(fail(path, "must be a string"));
        };

        if text.is_empty() && !self.allow_empty {
            return Err(fail(path, "is not allowed to be empty"));
        }

        let length = text.chars().count() as u64;
        if let Some(min) = self.min_length {
            if length < min {
                return Err(fail(
                    path,
                    &format!("length must be at least {min} characters long"),
                ));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(fail(
                    path,
                    &format!("length must be less than or equal to {max} characters long"),
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                return Err(fail(
                    path,
                    &format!(
                        "with value \"{text}\" fails to match the required pattern: /{}/",
                        pattern.as_str()
                    ),
                ));
            }
        }

        Ok(value.clone())
    }
}

impl NumberRule {
    fn check(
        &self,
        value: &Value,
        path: &str,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) if options.convert => parse_number(text),
            _ => None,
        }
        .ok_or_else(|| fail(path, "must be a number"))?;

        if self.integer && number.fract() != 0.0 {
            return Err(fail(path, "must be an integer"));
        }
        if let Some(min) = self.minimum {
            if number < min {
                return Err(fail(
                    path,
                    &format!("must be greater than or equal to {}", format_number(min)),
                ));
            }
        }
        if let Some(max) = self.maximum {
            if number > max {
                return Err(fail(
                    path,
                    &format!("must be less than or equal to {}", format_number(max)),
                ));
            }
        }

        match value {
            Value::Number(_) => Ok(value.clone()),
            _ => Ok(number_value(number)),
        }
    }
}

fn check_boolean(
    value: &Value,
    path: &str,
    options: &ValidateOptions,
) -> Result<Value, ValidationError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(text) if options.convert && text.eq_ignore_ascii_case("true") => {
            Ok(Value::Bool(true))
        }
        Value::String(text) if options.convert && text.eq_ignore_ascii_case("false") => {
            Ok(Value::Bool(false))
        }
        _ => Err(fail(path, "must be a boolean")),
    }
}

fn check_object(
    fields: &IndexMap<String, Node>,
    value: &Value,
    path: &str,
    options: &ValidateOptions,
) -> Result<Value, ValidationError> {
    let Value::Object(input) = value else {
        return Err(fail(path, "must be of type object"));
    };

    // an object declared without fields accepts anything
    if fields.is_empty() {
        return Ok(value.clone());
    }

    let mut output = Map::with_capacity(input.len());
    for (name, node) in fields {
        if let Some(checked) = node.check(input.get(name), &child_path(path, name), options)? {
            output.insert(name.clone(), checked);
        }
    }

    for (key, extra) in input {
        if fields.contains_key(key) {
            continue;
        }
        if !options.allow_unknown {
            return Err(fail(&child_path(path, key), "is not allowed"));
        }
        output.insert(key.clone(), extra.clone());
    }

    Ok(Value::Object(output))
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[allow(clippy::cast_possible_truncation)]
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(number as i64))
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        (number as i64).to_string()
    } else {
        number.to_string()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn label(path: &str) -> &str {
    if path.is_empty() {
        "value"
    } else {
        path
    }
}

fn fail(path: &str, message: &str) -> ValidationError {
    let label = label(path);
    ValidationError::new(label, format!("\"{label}\" {message}"))
}

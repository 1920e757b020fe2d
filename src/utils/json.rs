use serde_json::{Map, Value};

use crate::error::HostError;

/// Read a loosely-typed number: JSON numbers and numeric strings are accepted.
pub fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// A named object inside the metrics payload, e.g. `cpu` or `network`.
///
/// Every lookup takes a list of accepted spellings; the first one is the
/// canonical name used in error messages.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Section<'a> {
    pub fn required(root: &'a Map<String, Value>, name: &'static str) -> Result<Self, HostError> {
        Self::optional(root, name)?
            .ok_or_else(|| HostError::malformed(format!("missing section `{}`", name)))
    }

    /// `Ok(None)` when the section is absent or null, an error when it is not an object.
    pub fn optional(
        root: &'a Map<String, Value>,
        name: &'static str,
    ) -> Result<Option<Self>, HostError> {
        match root.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(fields)) => Ok(Some(Self { name, fields })),
            Some(_) => Err(HostError::malformed(format!(
                "section `{}` is not an object",
                name
            ))),
        }
    }

    pub fn from_fields(name: &'static str, fields: &'a Map<String, Value>) -> Self {
        Self { name, fields }
    }

    /// True when any of `keys` is present, even with a null value.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.fields.contains_key(*key))
    }

    pub fn get(&self, names: &[&str]) -> Option<&'a Value> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|value| !value.is_null())
    }

    pub fn object(&self, name: &'static str) -> Result<Option<Section<'a>>, HostError> {
        Section::optional(self.fields, name)
    }

    pub fn number(&self, names: &[&str]) -> Result<f64, HostError> {
        self.optional_number(names)?
            .ok_or_else(|| HostError::malformed(format!("missing field `{}`", self.path(names))))
    }

    pub fn optional_number(&self, names: &[&str]) -> Result<Option<f64>, HostError> {
        match self.get(names) {
            None => Ok(None),
            Some(value) => loose_f64(value).map(Some).ok_or_else(|| {
                HostError::malformed(format!("field `{}` is not numeric", self.path(names)))
            }),
        }
    }

    /// Whole, non-negative number such as a core count or an uptime component.
    pub fn count(&self, names: &[&str]) -> Result<u64, HostError> {
        self.optional_count(names)?
            .ok_or_else(|| HostError::malformed(format!("missing field `{}`", self.path(names))))
    }

    pub fn optional_count(&self, names: &[&str]) -> Result<Option<u64>, HostError> {
        match self.optional_number(names)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => Ok(Some(n as u64)),
            Some(_) => Err(HostError::malformed(format!(
                "field `{}` is not a whole number",
                self.path(names)
            ))),
        }
    }

    /// Free text; numbers are accepted and kept as written.
    pub fn optional_text(&self, names: &[&str]) -> Result<Option<String>, HostError> {
        match self.get(names) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(HostError::malformed(format!(
                "field `{}` is not text",
                self.path(names)
            ))),
        }
    }

    fn path(&self, names: &[&str]) -> String {
        format!("{}.{}", self.name, names.first().copied().unwrap_or_default())
    }
}

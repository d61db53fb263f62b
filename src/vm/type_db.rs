use std::collections::HashMap;
use std::str::FromStr;

use crate::error::LayoutResolutionError;
use crate::vm::TypeDataBase;

/// A [`TypeDataBase`] backed by a fixed table of field offsets.
///
/// The table can be built with [`StaticTypeDataBase::add_field`], or parsed from text in
/// the form of a `vmStructs` dump, one field per line:
///
/// ```text
/// # type::field      offset
/// Space::_bottom     0x8
/// Space::_end        16
/// ```
#[derive(Default, Clone, Debug)]
pub struct StaticTypeDataBase {
    types: HashMap<String, HashMap<String, usize>>,
}

/// A line of a type database listing could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseTypeDataBaseError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl StaticTypeDataBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the offset of `field_name` in `type_name`, replacing an earlier entry.
    pub fn add_field(&mut self, type_name: &str, field_name: &str, offset: usize) -> &mut Self {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(field_name.to_string(), offset);
        self
    }

    /// Forget a field. Used to describe a VM whose layout lacks it.
    pub fn remove_field(&mut self, type_name: &str, field_name: &str) -> Option<usize> {
        self.types
            .get_mut(type_name)
            .and_then(|fields| fields.remove(field_name))
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

impl TypeDataBase for StaticTypeDataBase {
    fn field_offset(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<usize, LayoutResolutionError> {
        let fields = self
            .types
            .get(type_name)
            .ok_or_else(|| LayoutResolutionError::TypeNotFound {
                type_name: type_name.to_string(),
            })?;
        fields
            .get(field_name)
            .copied()
            .ok_or_else(|| LayoutResolutionError::FieldNotFound {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            })
    }
}

fn parse_offset(s: &str) -> Result<usize, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

impl FromStr for StaticTypeDataBase {
    type Err = ParseTypeDataBaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut db = StaticTypeDataBase::new();
        for (index, raw_line) in s.lines().enumerate() {
            let error = |message: String| ParseTypeDataBaseError {
                line: index + 1,
                message,
            };
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (symbol, offset) = match (parts.next(), parts.next(), parts.next()) {
                (Some(symbol), Some(offset), None) => (symbol, offset),
                _ => return Err(error(format!("expected `type::field offset`, got {:?}", line))),
            };
            let (type_name, field_name) = symbol
                .split_once("::")
                .filter(|(t, f)| !t.is_empty() && !f.is_empty())
                .ok_or_else(|| error(format!("{:?} is not of the form type::field", symbol)))?;
            let offset = parse_offset(offset)
                .map_err(|e| error(format!("bad offset {:?}: {}", offset, e)))?;
            db.add_field(type_name, field_name, offset);
        }
        Ok(db)
    }
}

//! ADIF records and their text serialization.
//!
//! Every field is written as `<NAME:len>value` (or `<NAME:len:type>value`)
//! where `len` is the character count of `value`. Lines end with CR+LF.

use std::fmt;

/// Line terminator used throughout ADIF output.
pub const CRLF: &str = "\r\n";

/// Program identification written as the first header line.
pub const PROGRAM_ID: &str = "N1MM2ADIF export";

/// ADIF specification version advertised in the header.
pub const ADIF_VERSION: &str = "3.1.5";

/// A single tagged ADIF field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Canonical ADIF field name.
    pub name: &'static str,
    /// Optional data type indicator, such as `d` for dates.
    pub data_type: Option<char>,
    /// Field value.
    pub value: String,
}

impl Field {
    /// Create a field with no data type indicator.
    #[must_use]
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            data_type: None,
            value: value.into(),
        }
    }

    /// Create a field carrying a data type indicator.
    #[must_use]
    pub fn typed(name: &'static str, data_type: char, value: impl Into<String>) -> Self {
        Self {
            name,
            data_type: Some(data_type),
            value: value.into(),
        }
    }

    /// Length written into the tag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Check if the value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            Some(t) => write!(f, "<{}:{}:{}>{}", self.name, self.len(), t, self.value),
            None => write!(f, "<{}:{}>{}", self.name, self.len(), self.value),
        }
    }
}

/// One contact, as an ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdifRecord {
    fields: Vec<Field>,
}

impl AdifRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a field only when a value was derived.
    pub fn push_opt(&mut self, name: &'static str, value: Option<String>) {
        if let Some(value) = value {
            self.push(Field::new(name, value));
        }
    }

    /// Fields in emission order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up the value of the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for AdifRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{field}{CRLF}")?;
        }
        write!(f, "<EOR>{CRLF}{CRLF}")
    }
}

/// The fixed three-line file header.
#[must_use]
pub fn header() -> String {
    format!(
        "{PROGRAM_ID}{CRLF}{}{CRLF}<EOH>{CRLF}",
        Field::new("ADIF_VER", ADIF_VERSION)
    )
}

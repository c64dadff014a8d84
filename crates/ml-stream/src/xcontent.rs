//! Ordered document builder.
//!
//! Builds a JSON-equivalent document whose keys keep insertion order, for
//! rendering transport responses into API response bodies.

use serde_json::{Map, Value};

/// Document builder failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XContentError {
    #[error("field '{0}' written outside of an open object")]
    NoOpenObject(String),

    #[error("nested object started without a field name")]
    UnnamedObject,

    #[error("name '{0}' set but no object started under it")]
    DanglingName(String),

    #[error("end_object called without a matching start_object")]
    UnbalancedObject,

    #[error("document has {depth} unclosed object(s)")]
    UnclosedObject { depth: usize },

    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    #[error("document root has already been written")]
    RootAlreadyWritten,

    #[error("document is empty")]
    EmptyDocument,
}

/// A value that renders itself into an [`XContentBuilder`].
pub trait ToXContent {
    /// Append this value to `builder`.
    fn to_xcontent(&self, builder: &mut XContentBuilder) -> Result<(), XContentError>;

    /// Render into a fresh builder and return the finished document.
    fn to_document(&self) -> Result<Value, XContentError> {
        let mut builder = XContentBuilder::new();
        self.to_xcontent(&mut builder)?;
        builder.build()
    }
}

#[derive(Debug)]
struct Frame {
    /// Key under which this object lands in its parent (unused at the root).
    name: String,
    fields: Map<String, Value>,
}

/// Ordered key-value document builder.
///
/// A value rendered through [`ToXContent`] can be placed under a key of an
/// enclosing object by calling [`name`](Self::name) first; the next
/// `start_object` lands under that key instead of opening the root.
#[derive(Debug, Default)]
pub struct XContentBuilder {
    stack: Vec<Frame>,
    pending_name: Option<String>,
    root: Option<Value>,
}

impl XContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open objects.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Set the key for the next object opened with `start_object`.
    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self, XContentError> {
        let name = name.into();
        if let Some(pending) = &self.pending_name {
            return Err(XContentError::DanglingName(pending.clone()));
        }
        self.check_field(&name)?;
        self.pending_name = Some(name);
        Ok(self)
    }

    /// Open an object: the root when nothing is open, otherwise a nested
    /// object under the name set by [`name`](Self::name).
    pub fn start_object(&mut self) -> Result<&mut Self, XContentError> {
        let name = if self.stack.is_empty() {
            if self.root.is_some() {
                return Err(XContentError::RootAlreadyWritten);
            }
            String::new()
        } else {
            self.pending_name.take().ok_or(XContentError::UnnamedObject)?
        };
        self.stack.push(Frame {
            name,
            fields: Map::new(),
        });
        Ok(self)
    }

    /// Open a nested object stored under `name` in the current object.
    pub fn start_object_field(
        &mut self,
        name: impl Into<String>,
    ) -> Result<&mut Self, XContentError> {
        self.name(name)?.start_object()
    }

    /// Close the innermost open object.
    pub fn end_object(&mut self) -> Result<&mut Self, XContentError> {
        self.check_no_pending()?;
        let frame = self.stack.pop().ok_or(XContentError::UnbalancedObject)?;
        let value = Value::Object(frame.fields);
        match self.stack.last_mut() {
            Some(parent) => {
                parent.fields.insert(frame.name, value);
            }
            None => self.root = Some(value),
        }
        Ok(self)
    }

    /// Append `name: value` to the current object.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, XContentError> {
        self.check_no_pending()?;
        let name = name.into();
        self.check_field(&name)?;
        if let Some(frame) = self.stack.last_mut() {
            frame.fields.insert(name, value.into());
        }
        Ok(self)
    }

    /// Append `name: value` only when a value is present; the key is
    /// omitted entirely otherwise.
    pub fn optional_field<V: Into<Value>>(
        &mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Result<&mut Self, XContentError> {
        match value {
            Some(value) => self.field(name, value),
            None => Ok(self),
        }
    }

    /// Finish the document.
    pub fn build(self) -> Result<Value, XContentError> {
        if !self.stack.is_empty() {
            return Err(XContentError::UnclosedObject {
                depth: self.stack.len(),
            });
        }
        self.root.ok_or(XContentError::EmptyDocument)
    }

    fn check_no_pending(&self) -> Result<(), XContentError> {
        match &self.pending_name {
            Some(name) => Err(XContentError::DanglingName(name.clone())),
            None => Ok(()),
        }
    }

    fn check_field(&self, name: &str) -> Result<(), XContentError> {
        let frame = self
            .stack
            .last()
            .ok_or_else(|| XContentError::NoOpenObject(name.to_string()))?;
        if frame.fields.contains_key(name) {
            return Err(XContentError::DuplicateField(name.to_string()));
        }
        Ok(())
    }
}

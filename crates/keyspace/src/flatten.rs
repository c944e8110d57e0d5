//! value normalization
//!
//! Reduces any [Value] to the ordered list of [Scalar]s stored under one key.
//!
//! - `null` flattens to nothing
//! - arrays flatten element by element, depth first, left to right
//! - text is split on the delimiter unless the delimiter is escaped
//! - everything else is kept as a single scalar (objects as [Scalar::Opaque])
//!
//! Flattening never fails.
use crate::options::Options;
use crate::value::{Scalar, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattener {
    delimiter: Option<char>,
    escape: char,
    trim: bool,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

impl From<&Options> for Flattener {
    fn from(options: &Options) -> Self {
        Self {
            delimiter: options.delimiter,
            escape: options.escape,
            trim: options.trim,
        }
    }
}

impl Flattener {
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn flatten(&self, value: impl Into<Value>) -> Vec<Scalar> {
        let mut scalars = vec![];
        self.flatten_into(value.into(), &mut scalars);
        tracing::trace!(count = scalars.len(), "flattened");
        scalars
    }

    fn flatten_into(&self, value: Value, scalars: &mut Vec<Scalar>) {
        match value {
            Value::Null => {}
            Value::Array(elements) => {
                for element in elements {
                    self.flatten_into(element, scalars);
                }
            }
            Value::Object(object) => scalars.push(Scalar::Opaque(Box::new(Value::Object(object)))),
            Value::Scalar(Scalar::Text(text)) => {
                scalars.extend(self.split(&text).into_iter().map(Scalar::Text))
            }
            Value::Scalar(scalar) => scalars.push(scalar),
        }
    }

    /// Split text on the delimiter
    ///
    /// An escape marker right before a delimiter is dropped and the delimiter kept.
    /// Any other escape marker stays as it is. `n` unescaped delimiters always
    /// produce `n + 1` segments, so the empty string is one empty segment.
    /// Segments are only trimmed when the text was actually split.
    pub fn split(&self, text: &str) -> Vec<String> {
        let Some(delimiter) = self.delimiter else {
            return vec![text.to_string()];
        };

        let mut segments = vec![];
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == self.escape && chars.peek() == Some(&delimiter) {
                current.push(delimiter);
                chars.next();
            } else if c == delimiter {
                segments.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        segments.push(current);

        if self.trim && segments.len() > 1 {
            for segment in segments.iter_mut() {
                *segment = segment.trim().to_string();
            }
        }

        segments
    }
}

//! Detection of utility-class styling in display strings.
//!
//! Schemas carry semantics only. A label such as `"bg-blue-500 p-4"` is a
//! styling leak and is rejected.

use regex::Regex;

use crate::error::SchemaError;

const UTILITY_PATTERN: &str = r"(?x)
    ^(?:[a-z0-9]+:)*-?
    (?:
        [pm][xytrbl]?-(?:\d+(?:\.5)?|px|auto|\[[^\]]+\])
      | (?:w|h|min-w|min-h|max-w|max-h|gap|space-[xy]|inset|top|bottom|left|right|z)
            -(?:\d+(?:\.5)?|\d+/\d+|px|auto|full|screen|\[[^\]]+\])
      | (?:bg|text|border|ring|from|via|to|fill|stroke)
            -(?:[a-z]+-\d{2,3}|xs|sm|base|lg|[2-9]?xl|white|black|transparent|current|\[[^\]]+\])
      | (?:rounded|shadow)-(?:none|sm|md|lg|xl|2xl|3xl|full)
      | (?:flex|grid|justify|items|font|leading|tracking|col-span|row-span)-[a-z0-9-]+
    )$";

pub struct StyleDetector {
    utility: Regex,
}

impl StyleDetector {
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if the utility pattern fails to
    /// compile.
    pub fn new() -> Result<Self, SchemaError> {
        let utility = Regex::new(UTILITY_PATTERN).map_err(|e| SchemaError::Generation(format!("{e}")))?;
        Ok(Self { utility })
    }

    /// The first token of `text` that looks like a utility class.
    pub fn find_utility<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.split_whitespace().find(|token| self.utility.is_match(token))
    }
}

//! Start-tag snapshots used to rebuild annotation markup.
//!
//! An [`Element`] is what the tokenizer saw in a start tag: a lowercased tag
//! name and the attributes in source order, duplicates included. Attribute
//! values keep their raw spelling so the reconstructed opening tag matches
//! the original document.

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// A single attribute from a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name
    pub name: String,
    /// Raw value, `None` for bare attributes such as `disabled`
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self { name: name.into(), value: value.map(str::to_string) }
    }
}

/// A start tag: name plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self { name: name.into(), attributes }
    }

    /// Value of the last attribute called `name` with a non-empty value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|attr| attr.name == name)
            .filter_map(|attr| attr.value.as_deref())
            .filter(|value| !value.is_empty())
            .last()
    }

    /// Whether this element is an HTML void element.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Appends `<name attr="value" ...>` to `out`.
    pub fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');
    }

    /// Appends `</name>` to `out`.
    pub fn write_close_tag(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn open_tag(&self) -> String {
        let mut out = String::new();
        self.write_open_tag(&mut out);
        out
    }
}

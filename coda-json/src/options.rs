/// Layout of the text a [`Writer`](crate::Writer) produces.
///
/// The default is compact: no whitespace between tokens.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Break lines and indent nested entries
    pub pretty: bool,

    /// One level of indentation; only used when `pretty` is set
    pub indent: &'static str,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ",
        }
    }
}

impl SerializeOptions {
    /// Compact layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per line, indented by two spaces per level.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// One entry per line, indented by `indent` per level.
    pub const fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self.pretty = true;
        self
    }
}

/// Options for reading JSON.
#[derive(Debug, Clone)]
pub struct DeserializeOptions {
    /// Deepest allowed nesting of maps and lists (default: 128)
    pub max_depth: usize,

    /// Accept input with non-whitespace after the top-level value (default: false)
    pub allow_trailing_data: bool,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            allow_trailing_data: false,
        }
    }
}

impl DeserializeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Stop after the first value instead of requiring end of input.
    pub const fn allow_trailing_data(mut self) -> Self {
        self.allow_trailing_data = true;
        self
    }
}

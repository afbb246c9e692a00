//! Languages and query kinds known to tags servers

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagsError};

/// Languages with a conventional tags server deployment.
///
/// The protocol itself carries the language as free text, so callers may
/// still use names outside this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Cpp,
    Java,
    Python,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Cpp, Language::Java, Language::Python];

    /// Name sent on the wire and written into tag files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpp => "c++",
            Self::Java => "java",
            Self::Python => "python",
        }
    }

    /// Guess from a file extension (with or without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "cc" | "cpp" | "c" | "h" | "lex" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Map an editor filetype (`c`, `cpp`, `java`, `python`) to a language.
    pub fn from_editor_filetype(filetype: &str) -> Option<Self> {
        match filetype {
            "c" | "cpp" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "python" => Some(Self::Python),
            _ => None,
        }
    }

    /// Port conventionally used by this language's tags server.
    pub fn default_port(&self, call_type: CallType) -> u16 {
        match (self, call_type) {
            (Self::Cpp, CallType::Definition) => 2223,
            (Self::Java, CallType::Definition) => 2224,
            (Self::Python, CallType::Definition) => 2225,
            (Self::Cpp, CallType::Callgraph) => 2233,
            (Self::Java, CallType::Callgraph) => 2234,
            (Self::Python, CallType::Callgraph) => 2235,
        }
    }

    /// Tag file name served on the conventional port, e.g. `cpp.callers.tags.gz`.
    pub fn tags_file_name(&self, call_type: CallType) -> String {
        let stem = match self {
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Python => "python",
        };
        match call_type {
            CallType::Definition => format!("{}.tags.gz", stem),
            CallType::Callgraph => format!("{}.callers.tags.gz", stem),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = TagsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "c++" | "cpp" | "c" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            "python" | "py" => Ok(Self::Python),
            _ => Err(TagsError::UnsupportedLanguage {
                name: s.to_string(),
            }),
        }
    }
}

/// Which family of servers answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// Plain definition tags
    Definition,
    /// Call-relationship tags
    Callgraph,
}

impl CallType {
    pub fn from_callers(callers: bool) -> Self {
        if callers {
            Self::Callgraph
        } else {
            Self::Definition
        }
    }

    pub fn is_callgraph(&self) -> bool {
        matches!(self, Self::Callgraph)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Callgraph => "callgraph",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

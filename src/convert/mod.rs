//! Tag file tooling
//!
//! - [`etags`]: read and write Exuberant etags sections
//! - [`tags_file`]: the s-expression TAGS format the servers load
//! - [`callgraph`]: call-site extraction producing etags text
//! - [`vi_tags`]: vi tags, grep and list lines for editors

pub mod callgraph;
pub mod etags;
pub mod tags_file;
pub mod vi_tags;

pub use callgraph::{CallgraphExtractor, CallgraphStats, CALL_PATTERN};
pub use etags::{parse_etags, EtagsEntry, EtagsFile};
pub use tags_file::{
    convert_etags, lisp_string, Descriptor, FileTags, TagItem, TagsFile, TagsFileOptions,
    TagsHeader, TAGS_FORMAT_VERSION,
};
pub use vi_tags::{
    completion_names, grep_line, long_list_line, resolve_filename, short_list_line,
    strip_tag_url, vi_tag_line, write_vi_tags, TAG_URL_SCHEME,
};

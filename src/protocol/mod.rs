//! Tags server command protocol
//!
//! One command per connection, written as a single s-expression line and
//! terminated by CRLF. The server answers with an alist whose `value` entry
//! holds the result.
//!
//! ```text
//! // Client -> Server
//! (lookup-tag-exact (client-type "semfora") (client-version 3) (protocol-version 2)
//!   (corpus "google3") (language "c++") (callers nil) (tag "Foo"))
//!
//! // Server -> Client
//! ((value (((filename "a.cc") (tag "Foo") (lineno 10) (offset 5) (snippet "class Foo {")))))
//! ((value ((error ((message "bad corpus"))))))
//! ```

pub mod command;
pub mod response;

pub use command::{
    ClientIdentity, CommandKind, CommandRequest, Param, ParamValue, CLIENT_TYPE, CLIENT_VERSION,
    PROTOCOL_VERSION,
};
pub use response::{decode_response, decode_status, TagRecord};

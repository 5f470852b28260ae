//! Domain constants.

/// Root element name of a library document.
pub const ROOT_ELEMENT: &str = "def";

/// Format version assumed when the root element carries no `format` attribute.
pub const DEFAULT_FORMAT: i32 = 1;

/// Highest supported document format version.
pub const MAX_FORMAT: i32 = 2;

/// Conventional file extension of library documents.
pub const DOCUMENT_EXTENSION: &str = "cfg";

/// Namespace qualifier that container patterns may omit.
pub const STD_NAMESPACE: &str = "std";

/// Number of pointer indirection levels tracked per argument direction.
pub const MAX_INDIRECTION: usize = 5;

/// Highest argument number accepted in a `buffer-size` specification.
pub const MAX_BUFFER_SIZE_ARG: i32 = 5;

/// `std` qualifier as it appears in a joined qualified name.
pub const STD_PREFIX: &str = "std::";

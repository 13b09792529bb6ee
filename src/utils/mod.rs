pub mod collation;
pub mod format;

pub use collation::locale_cmp;
pub use format::format_count;

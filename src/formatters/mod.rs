pub mod json_compact;
pub mod plain;

pub use json_compact::JsonCompactFormatter;
pub use plain::PlainFormatter;

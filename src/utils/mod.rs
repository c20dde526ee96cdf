pub mod odata;
pub mod redact;
pub mod text;

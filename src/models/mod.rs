pub mod product;
pub mod tally;

pub use product::*;
pub use tally::*;

/// Value written to every Y/N flag column. The flags are placeholders for
/// manual review and are never derived from page content.
pub const FLAG_NO: &str = "N";

mod report;
mod violation;

pub use report::*;
pub use violation::*;

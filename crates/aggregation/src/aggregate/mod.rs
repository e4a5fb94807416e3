mod traits;
pub use traits::*;

mod types;
pub use types::*;

mod fetcher;
pub use fetcher::*;

mod selection;
pub use selection::*;

mod ranking;
pub use ranking::*;

mod presentation;
pub use presentation::*;

mod session;
pub use session::*;

#[cfg(test)]
mod test_sources;

#[cfg(test)]
mod types_tests;

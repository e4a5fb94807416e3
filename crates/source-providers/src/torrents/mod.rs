mod html;
mod parser;

pub use parser::TorrentStreamFormat;
pub(crate) use html::parse_results_page;
pub(crate) use parser::parse_streams;

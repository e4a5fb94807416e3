mod parser;

pub(crate) use parser::{parse_matches, parse_streams};

mod parser;

pub(crate) use parser::parse_sources;

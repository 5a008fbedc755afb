pub mod catalog_queries;
mod envelope_parser;

pub use envelope_parser::parse_page;

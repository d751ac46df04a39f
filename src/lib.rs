pub mod console;
pub mod navigator;
mod parser;
pub mod presenter;
pub mod scraper;
pub mod session;
pub mod types;
pub mod utils;

pub use crate::parser::{ParseError, parse_catalog, parse_posting, parse_results_page};
pub use crate::scraper::{ScraperError, WebScraper};

pub const BASE_URL: &str = "https://www.internships.com";

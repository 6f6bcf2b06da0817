pub mod dataset;
pub mod loader;
pub mod scale;
pub mod split;

pub use dataset::{Dataset, Record};
pub use loader::{load_file, parse_str, ErrorPolicy};
pub use scale::Standardizer;
pub use split::{train_test_split, Split};

//! Edge-list loading and preprocessing

pub mod edgelist;
pub mod parquet;
pub mod preprocessing;

pub use edgelist::load_text_edge_list;
pub use parquet::load_edge_list;
pub use preprocessing::filter_by_degree;

pub mod assign;
pub mod contrast;
pub mod extract;
pub mod generate;
pub mod kmeans;

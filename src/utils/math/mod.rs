pub mod dense;
pub mod svd;

pub mod event;
pub mod price;
pub mod product;
pub mod section;

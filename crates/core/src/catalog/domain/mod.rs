pub mod jewelry_catalog;
pub mod jewelry_item;

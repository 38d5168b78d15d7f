mod sales;

pub use sales::{sale, sales, sales_header};

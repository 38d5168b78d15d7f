use crate::core::{Dataset, DatasetHeader, Row, Value};
use std::sync::Arc;

pub fn sales_header() -> Arc<DatasetHeader> {
    Arc::new(DatasetHeader::new(
        "sales".into(),
        ["date_block_num", "shop_id", "item_id", "item_price", "item_cnt_day"],
    ))
}

pub fn sale<P: Into<Value>>(block: f64, shop: f64, item: f64, price: P, cnt: f64) -> Row {
    Row::new(vec![
        Value::from(block),
        Value::from(shop),
        Value::from(item),
        price.into(),
        Value::from(cnt),
    ])
}

/// Six rows over shops 1, 2 and 3.
///
/// | shop | prices       | item_cnt_day | items         |
/// |------|--------------|--------------|---------------|
/// | 1    | 10, 30, 18   | 1, 1, 2      | 100, 102, 101 |
/// | 2    | 20, 40       | 2, 3         | 101, 100      |
/// | 3    | 50           | 1            | 103           |
pub fn sales() -> Dataset {
    Dataset::new(
        sales_header(),
        vec![
            sale(0.0, 1.0, 100.0, 10.0, 1.0),
            sale(0.0, 2.0, 101.0, 20.0, 2.0),
            sale(0.0, 1.0, 102.0, 30.0, 1.0),
            sale(1.0, 2.0, 100.0, 40.0, 3.0),
            sale(1.0, 3.0, 103.0, 50.0, 1.0),
            sale(1.0, 1.0, 101.0, 18.0, 2.0),
        ],
    )
}

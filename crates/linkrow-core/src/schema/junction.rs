/// A two-column association table.
///
/// Every relation kind is stored the same way: one row per live
/// (master, slave) pair in `mp_<master>_<slave>`, with columns
/// `<master>_id` and `<slave>_id`. Schema generators must follow this naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    pub table: String,
    pub master_table: String,
    pub slave_table: String,
    pub master_column: String,
    pub slave_column: String,
}

impl Junction {
    pub fn between(master_table: &str, slave_table: &str) -> Junction {
        Junction {
            table: format!("mp_{master_table}_{slave_table}"),
            master_table: master_table.to_string(),
            slave_table: slave_table.to_string(),
            master_column: format!("{master_table}_id"),
            slave_column: format!("{slave_table}_id"),
        }
    }
}

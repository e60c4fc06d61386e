#[macro_export]
macro_rules! value_or_continue {
    ($expr:expr) => {
        match $expr {
            Some(value) => value,
            None => {
                debug!("no value for {:?}, skipping", stringify!($expr));

                continue;
            }
        }
    };
}

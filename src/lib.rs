#![no_std]

pub(crate) mod config;
pub mod controllers;
pub mod infrastructure;
pub(crate) mod net;

// static_cell::make_static! in main causes a compiler error
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

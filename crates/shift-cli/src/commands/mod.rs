pub mod audit;
pub mod clock;
pub mod correction;
pub mod dispatch;
pub mod employee;
pub mod entry;
pub mod override_field;
pub mod shared;

// programs/seasonal_farm/src/instructions/mod.rs

pub mod custody;
pub mod deposit;
pub mod donate;
pub mod harvest;
pub mod initialize;
pub mod sync;
pub mod views;
pub mod withdraw;

pub use deposit::*;
pub use donate::*;
pub use harvest::*;
pub use initialize::*;
pub use sync::*;
pub use views::*;
pub use withdraw::*;

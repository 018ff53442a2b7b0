pub mod appointment;
pub mod bill;
pub mod insurance;
pub mod medication;
pub mod test_result;

pub use appointment::*;
pub use bill::*;
pub use insurance::*;
pub use medication::*;
pub use test_result::*;

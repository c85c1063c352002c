pub mod doctor;
pub mod generate;
pub mod list;

pub use doctor::doctor;
pub use generate::generate;
pub use list::list;

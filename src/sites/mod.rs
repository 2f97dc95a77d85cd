pub mod cars;
pub mod forum;
pub mod hotels;

pub mod clock;
pub mod company;
pub mod device;
pub mod employee;

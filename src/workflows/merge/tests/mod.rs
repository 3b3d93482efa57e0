mod common;

mod address;
mod conflicts;
mod review;

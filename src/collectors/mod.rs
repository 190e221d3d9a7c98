pub mod collector;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod sensors;
pub mod system;

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod sensor;
pub mod system;

mod cpu;

pub use cpu::*;

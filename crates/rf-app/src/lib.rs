// Binaires et câblage applicatif de rfpulse.

pub mod cli;
pub mod player;
pub mod recorder;
pub mod scanner;

pub mod flows;
pub mod migrations;
pub mod restart;

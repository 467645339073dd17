//! sheetcalc_engine - Cell addressing and the formula expression engine.

pub mod engine;

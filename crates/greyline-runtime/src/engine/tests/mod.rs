//! Test modules for the rule engine

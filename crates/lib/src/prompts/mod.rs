//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the question generator.

pub mod tasks;

//! Classification model for expense brackets

pub mod tree;

pub use tree::ExpenseTree;
